use crate::core::models::{
    common::Pagination,
    enrollment::{EnrollmentRequest, Query as EnrollmentQuery, RequestDetail, RequestState},
    offer::Offer,
    participant::Participant,
};
use crate::error::Error;

pub trait EnrollmentCommon {
    async fn get(&mut self, id: i32) -> Result<Option<EnrollmentRequest>, Error>;
    /// Same as `get` but takes the row lock for the duration of the
    /// enclosing transaction.
    async fn get_for_update(&mut self, id: i32) -> Result<Option<EnrollmentRequest>, Error>;
    /// Count of committed approved requests for the offer. Must be read
    /// within the transaction that holds the offer lock when used for a
    /// capacity decision.
    async fn count_approved(&mut self, offer_id: i32) -> Result<i64, Error>;
    async fn update_decision(&mut self, id: i32, state: RequestState, reason: &str) -> Result<(), Error>;
    async fn delete(&mut self, id: i32) -> Result<(), Error>;
    async fn query(&mut self, query: &EnrollmentQuery, pagination: Option<Pagination>) -> Result<Vec<RequestDetail>, Error>;
    async fn count(&mut self, query: &EnrollmentQuery) -> Result<i64, Error>;
}

pub trait OfferCommon {
    async fn get(&mut self, id: i32) -> Result<Option<Offer>, Error>;
    /// Locks the offer row. Serializes capacity decisions at offer
    /// granularity: two approvals for different requests on the same offer
    /// cannot both observe the same availability snapshot.
    async fn get_for_update(&mut self, id: i32) -> Result<Option<Offer>, Error>;
}

pub trait ParticipantCommon {
    async fn get(&mut self, id: i32) -> Result<Option<Participant>, Error>;
}

pub trait Common: EnrollmentCommon + OfferCommon + ParticipantCommon {}

pub trait Store: Common {}

pub trait TxStore: Store {
    async fn commit(self) -> Result<(), Error>;
    async fn rollback(self) -> Result<(), Error>;
}
