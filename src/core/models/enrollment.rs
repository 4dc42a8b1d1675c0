use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "request_state", rename_all = "lowercase")]
pub enum RequestState {
    Pending,
    Approved,
    Rejected,
}

impl RequestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestState::Pending => "pending",
            RequestState::Approved => "approved",
            RequestState::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EnrollmentRequest {
    pub id: i32,
    pub participant_id: i32,
    pub offer_id: i32,
    pub state: RequestState,
    pub rejection_reason: String,
    pub created_at: DateTime<Utc>,
}

/// Request row joined with participant and discipline names, for listing.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RequestDetail {
    pub id: i32,
    pub participant_id: i32,
    pub participant_name: String,
    pub offer_id: i32,
    pub discipline: String,
    pub state: RequestState,
    pub rejection_reason: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct Query {
    pub state_eq: Option<RequestState>,
    pub discipline_eq: Option<String>,
}

#[derive(Debug, Default)]
pub struct ListQuery {
    pub state: Option<RequestState>,
    pub discipline: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// Outcome of an approval decision. Errors (request not found, already
/// decided, persistence failure) are not outcomes, they surface as `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalOutcome {
    Approved { remaining_slots: i64 },
    NoCapacity,
}
