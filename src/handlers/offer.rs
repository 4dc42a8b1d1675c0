use actix_web::{
    http::StatusCode,
    web::{Data, Path},
    HttpResponse,
};
use serde::Serialize;

use crate::context::AdminInfo;
use crate::core::services;
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;

#[derive(Debug, Serialize)]
pub struct SlotsResponse {
    pub available_slots: i64,
}

pub async fn available_slots(admin: AdminInfo, path: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<HttpResponse, Error> {
    let (offer_id,) = path.into_inner();
    admin.ensure_administrator()?;
    let mut db = manager.acquire().await?;
    let available_slots = services::enrollment::available_slots(&mut db, offer_id).await?;
    Ok(HttpResponse::build(StatusCode::OK).json(SlotsResponse { available_slots }))
}
