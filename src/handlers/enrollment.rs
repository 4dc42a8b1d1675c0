use actix_web::{
    http::StatusCode,
    web::{Data, Json, Path, Query},
    HttpResponse,
};
use serde::{Deserialize, Serialize};

use crate::context::AdminInfo;
use crate::core::models::enrollment::{ApprovalOutcome, ListQuery, RequestState};
use crate::core::services;
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::response::List;

#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_slots: Option<i64>,
}

pub async fn approve(admin: AdminInfo, path: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<HttpResponse, Error> {
    let (request_id,) = path.into_inner();
    admin.ensure_administrator()?;
    let tx = manager.begin().await?;
    let resp = match services::enrollment::approve(tx, request_id).await? {
        ApprovalOutcome::Approved { remaining_slots } => DecisionResponse {
            status: "success",
            message: format!("Enrollment approved. Remaining slots: {}", remaining_slots),
            remaining_slots: Some(remaining_slots),
        },
        ApprovalOutcome::NoCapacity => DecisionResponse {
            status: "no_capacity",
            message: "No slots available in this discipline. The participant must select another offer.".to_owned(),
            remaining_slots: None,
        },
    };
    Ok(HttpResponse::build(StatusCode::OK).json(resp))
}

#[derive(Debug, Clone, Deserialize)]
pub struct Rejection {
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RejectionResponse {
    pub status: &'static str,
    pub message: String,
}

pub async fn reject(
    admin: AdminInfo,
    path: Path<(i32,)>,
    body: Option<Json<Rejection>>,
    manager: Data<PgSqlxManager>,
) -> Result<HttpResponse, Error> {
    let (request_id,) = path.into_inner();
    admin.ensure_administrator()?;
    let mut db = manager.acquire().await?;
    let reason = services::enrollment::reject(&mut db, request_id, body.and_then(|b| b.into_inner().reason)).await?;
    Ok(HttpResponse::build(StatusCode::OK).json(RejectionResponse {
        status: "success",
        message: format!("The enrollment was rejected. Reason: {}", reason),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ListParam {
    pub state: Option<RequestState>,
    pub discipline: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

pub async fn list(admin: AdminInfo, param: Query<ListParam>, manager: Data<PgSqlxManager>) -> Result<HttpResponse, Error> {
    admin.ensure_administrator()?;
    let param = param.into_inner();
    let mut db = manager.acquire().await?;
    let (requests, total) = services::enrollment::list_requests(
        &mut db,
        ListQuery {
            state: param.state,
            discipline: param.discipline,
            page: param.page,
            size: param.size,
        },
    )
    .await?;
    Ok(HttpResponse::build(StatusCode::OK).json(List::new(requests, total)))
}
