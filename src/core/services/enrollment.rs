use log::{info, warn};

use crate::core::models::common::Pagination;
use crate::core::models::enrollment::{ApprovalOutcome, ListQuery, Query, RequestDetail, RequestState};
use crate::core::ports::repository::{EnrollmentCommon, OfferCommon, Store, TxStore};
use crate::error::Error;

pub static DEFAULT_REJECTION_REASON: &str = "not specified";

/// Decides an approval inside one transaction. The request row is locked
/// first, then the offer row; every approval takes the locks in this order,
/// so two approvals racing for the last slot on an offer serialize on the
/// offer lock and the loser recounts after the winner commits.
pub async fn approve<T>(mut tx: T, id: i32) -> Result<ApprovalOutcome, Error>
where
    T: TxStore,
{
    let request = EnrollmentCommon::get_for_update(&mut tx, id)
        .await?
        .ok_or(Error::NotFound("enrollment request", id))?;
    if request.state != RequestState::Pending {
        return Err(Error::BusinessError(format!(
            "enrollment request already {}(id: {})",
            request.state.as_str(),
            id
        )));
    }
    let offer = OfferCommon::get_for_update(&mut tx, request.offer_id)
        .await?
        .ok_or(Error::NotFound("offer", request.offer_id))?;
    let approved = EnrollmentCommon::count_approved(&mut tx, offer.id).await?;
    let available = offer.capacity as i64 - approved;
    if available <= 0 {
        // A request that can never succeed is removed rather than left
        // dangling in pending. The delete rides the same transaction as the
        // capacity check.
        EnrollmentCommon::delete(&mut tx, id).await?;
        tx.commit().await?;
        warn!("no slots left on offer {}, dropped request {}", offer.id, id);
        return Ok(ApprovalOutcome::NoCapacity);
    }
    EnrollmentCommon::update_decision(&mut tx, id, RequestState::Approved, "").await?;
    tx.commit().await?;
    info!("approved request {} on offer {}, {} slots remaining", id, offer.id, available - 1);
    Ok(ApprovalOutcome::Approved {
        remaining_slots: available - 1,
    })
}

/// Rejection never competes for capacity, so it runs without locking.
/// Returns the stored reason.
pub async fn reject<D>(db: &mut D, id: i32, reason: Option<String>) -> Result<String, Error>
where
    D: Store,
{
    let request = EnrollmentCommon::get(db, id)
        .await?
        .ok_or(Error::NotFound("enrollment request", id))?;
    if request.state != RequestState::Pending {
        return Err(Error::BusinessError(format!(
            "enrollment request already {}(id: {})",
            request.state.as_str(),
            id
        )));
    }
    let reason = reason.unwrap_or_else(|| DEFAULT_REJECTION_REASON.to_owned());
    EnrollmentCommon::update_decision(db, id, RequestState::Rejected, &reason).await?;
    Ok(reason)
}

pub async fn list_requests<D>(db: &mut D, query: ListQuery) -> Result<(Vec<RequestDetail>, i64), Error>
where
    D: Store,
{
    let filter = Query {
        state_eq: query.state,
        discipline_eq: query.discipline,
    };
    let total = EnrollmentCommon::count(db, &filter).await?;
    let pagination = match (query.page, query.size) {
        (Some(page), Some(size)) => Some(Pagination::new(page, size)),
        _ => None,
    };
    let requests = EnrollmentCommon::query(db, &filter, pagination).await?;
    Ok((requests, total))
}

/// Unlocked recount for display purposes. Capacity decisions never use this,
/// they recount under the offer lock in `approve`.
pub async fn available_slots<D>(db: &mut D, offer_id: i32) -> Result<i64, Error>
where
    D: Store,
{
    let offer = OfferCommon::get(db, offer_id)
        .await?
        .ok_or(Error::NotFound("offer", offer_id))?;
    let approved = EnrollmentCommon::count_approved(db, offer_id).await?;
    Ok(offer.capacity as i64 - approved)
}
