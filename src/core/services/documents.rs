use crate::core::models::participant::Documents;
use crate::core::ports::repository::{ParticipantCommon, Store};
use crate::error::Error;
use crate::storer::DocumentStore;

/// Resolves the participant's supporting documents to retrievable URLs in
/// the external document store.
pub async fn documents<D, S>(db: &mut D, store: &S, participant_id: i32) -> Result<Documents, Error>
where
    D: Store,
    S: DocumentStore,
{
    let participant = ParticipantCommon::get(db, participant_id)
        .await?
        .ok_or(Error::NotFound("participant", participant_id))?;
    Ok(Documents {
        photo_url: store.url(&participant.photo_path),
        employment_letter_url: store.url(&participant.employment_letter_path),
        payment_proof_url: store.url(&participant.payment_proof_path),
    })
}
