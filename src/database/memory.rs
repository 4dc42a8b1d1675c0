//! In-memory store for service tests. A transaction takes the state mutex
//! for its whole lifetime and rolls back on drop unless committed, which
//! gives the same serializability the offer row lock provides in Postgres.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::core::models::common::Pagination;
use crate::core::models::enrollment::{EnrollmentRequest, Query as EnrollmentQuery, RequestDetail, RequestState};
use crate::core::models::offer::Offer;
use crate::core::models::participant::Participant;
use crate::core::ports::repository::{Common, EnrollmentCommon, OfferCommon, ParticipantCommon, Store, TxStore};
use crate::error::Error;

#[derive(Debug, Clone, Default)]
pub struct MemState {
    pub participants: HashMap<i32, Participant>,
    pub disciplines: HashMap<i32, String>,
    pub offers: HashMap<i32, Offer>,
    pub requests: HashMap<i32, EnrollmentRequest>,
}

pub struct MemManager {
    state: Arc<Mutex<MemState>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemManager {
    pub fn new(state: MemState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Makes the next write through any transaction fail, to exercise the
    /// rollback path.
    pub fn fail_next_write(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub async fn tx(&self) -> MemTx {
        let guard = Arc::clone(&self.state).lock_owned().await;
        MemTx {
            snapshot: guard.clone(),
            guard,
            fail_writes: Arc::clone(&self.fail_writes),
            committed: false,
        }
    }
}

pub struct MemTx {
    guard: OwnedMutexGuard<MemState>,
    snapshot: MemState,
    fail_writes: Arc<AtomicBool>,
    committed: bool,
}

impl MemTx {
    fn check_write(&self) -> Result<(), Error> {
        if self.fail_writes.swap(false, Ordering::SeqCst) {
            return Err(Error::ServerError("simulated write failure".into()));
        }
        Ok(())
    }

    fn detail(&self, request: &EnrollmentRequest) -> RequestDetail {
        let participant_name = self
            .guard
            .participants
            .get(&request.participant_id)
            .map(|p| p.name.clone())
            .unwrap_or_default();
        let discipline = self
            .guard
            .offers
            .get(&request.offer_id)
            .and_then(|o| self.guard.disciplines.get(&o.discipline_id))
            .cloned()
            .unwrap_or_default();
        RequestDetail {
            id: request.id,
            participant_id: request.participant_id,
            participant_name,
            offer_id: request.offer_id,
            discipline,
            state: request.state,
            rejection_reason: request.rejection_reason.clone(),
            created_at: request.created_at,
        }
    }
}

impl Drop for MemTx {
    fn drop(&mut self) {
        if !self.committed {
            *self.guard = std::mem::take(&mut self.snapshot);
        }
    }
}

impl EnrollmentCommon for MemTx {
    async fn get(&mut self, id: i32) -> Result<Option<EnrollmentRequest>, Error> {
        Ok(self.guard.requests.get(&id).cloned())
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Option<EnrollmentRequest>, Error> {
        // the transaction already holds the whole state
        Ok(self.guard.requests.get(&id).cloned())
    }

    async fn count_approved(&mut self, offer_id: i32) -> Result<i64, Error> {
        Ok(self
            .guard
            .requests
            .values()
            .filter(|r| r.offer_id == offer_id && r.state == RequestState::Approved)
            .count() as i64)
    }

    async fn update_decision(&mut self, id: i32, state: RequestState, reason: &str) -> Result<(), Error> {
        self.check_write()?;
        if let Some(request) = self.guard.requests.get_mut(&id) {
            request.state = state;
            request.rejection_reason = reason.to_owned();
        }
        Ok(())
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        self.check_write()?;
        self.guard.requests.remove(&id);
        Ok(())
    }

    async fn query(&mut self, query: &EnrollmentQuery, pagination: Option<Pagination>) -> Result<Vec<RequestDetail>, Error> {
        let mut details: Vec<RequestDetail> = self.guard.requests.values().map(|r| self.detail(r)).collect();
        details.retain(|d| {
            query.state_eq.map(|s| d.state == s).unwrap_or(true)
                && query.discipline_eq.as_ref().map(|n| &d.discipline == n).unwrap_or(true)
        });
        details.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(pagination) = pagination {
            details = details
                .into_iter()
                .skip(pagination.offset() as usize)
                .take(pagination.size as usize)
                .collect();
        }
        Ok(details)
    }

    async fn count(&mut self, query: &EnrollmentQuery) -> Result<i64, Error> {
        let details = EnrollmentCommon::query(self, query, None).await?;
        Ok(details.len() as i64)
    }
}

impl OfferCommon for MemTx {
    async fn get(&mut self, id: i32) -> Result<Option<Offer>, Error> {
        Ok(self.guard.offers.get(&id).cloned())
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Option<Offer>, Error> {
        Ok(self.guard.offers.get(&id).cloned())
    }
}

impl ParticipantCommon for MemTx {
    async fn get(&mut self, id: i32) -> Result<Option<Participant>, Error> {
        Ok(self.guard.participants.get(&id).cloned())
    }
}

impl Common for MemTx {}
impl Store for MemTx {}

impl TxStore for MemTx {
    async fn commit(mut self) -> Result<(), Error> {
        self.committed = true;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        // drop restores the snapshot
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn one_pending_request() -> MemState {
        let mut state = MemState::default();
        state.requests.insert(
            1,
            EnrollmentRequest {
                id: 1,
                participant_id: 1,
                offer_id: 1,
                state: RequestState::Pending,
                rejection_reason: String::new(),
                created_at: Utc::now(),
            },
        );
        state
    }

    #[tokio::test]
    async fn rollback_restores_the_previous_state() {
        let manager = MemManager::new(one_pending_request());
        let mut tx = manager.tx().await;
        EnrollmentCommon::update_decision(&mut tx, 1, RequestState::Approved, "").await.unwrap();
        tx.rollback().await.unwrap();
        let mut tx = manager.tx().await;
        let request = EnrollmentCommon::get(&mut tx, 1).await.unwrap().unwrap();
        assert_eq!(request.state, RequestState::Pending);
    }

    #[tokio::test]
    async fn dropping_an_uncommitted_transaction_rolls_back() {
        let manager = MemManager::new(one_pending_request());
        let mut tx = manager.tx().await;
        EnrollmentCommon::delete(&mut tx, 1).await.unwrap();
        drop(tx);
        let mut tx = manager.tx().await;
        assert!(EnrollmentCommon::get(&mut tx, 1).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn commit_makes_changes_visible_to_later_transactions() {
        let manager = MemManager::new(one_pending_request());
        let mut tx = manager.tx().await;
        EnrollmentCommon::update_decision(&mut tx, 1, RequestState::Rejected, "late").await.unwrap();
        tx.commit().await.unwrap();
        let mut tx = manager.tx().await;
        let request = EnrollmentCommon::get(&mut tx, 1).await.unwrap().unwrap();
        assert_eq!(request.state, RequestState::Rejected);
        assert_eq!(request.rejection_reason, "late");
    }
}
