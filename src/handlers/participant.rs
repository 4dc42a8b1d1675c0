use actix_web::{
    http::StatusCode,
    web::{Data, Path},
    HttpResponse,
};

use crate::context::AdminInfo;
use crate::core::services;
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::storer::LocalDocumentStore;

pub async fn documents(
    admin: AdminInfo,
    path: Path<(i32,)>,
    manager: Data<PgSqlxManager>,
    store: Data<LocalDocumentStore>,
) -> Result<HttpResponse, Error> {
    let (participant_id,) = path.into_inner();
    admin.ensure_administrator()?;
    let mut db = manager.acquire().await?;
    let docs = services::documents::documents(&mut db, store.get_ref(), participant_id).await?;
    Ok(HttpResponse::build(StatusCode::OK).json(docs))
}
