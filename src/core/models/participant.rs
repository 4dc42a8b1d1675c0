use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Participant {
    pub id: i32,
    pub name: String,
    pub photo_path: String,
    pub employment_letter_path: String,
    pub payment_proof_path: String,
}

/// Retrievable URLs for a participant's supporting documents.
#[derive(Debug, Clone, Serialize)]
pub struct Documents {
    pub photo_url: String,
    pub employment_letter_url: String,
    pub payment_proof_url: String,
}
