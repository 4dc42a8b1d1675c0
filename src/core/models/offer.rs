use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Offer {
    pub id: i32,
    pub discipline_id: i32,
    pub capacity: i32,
}
