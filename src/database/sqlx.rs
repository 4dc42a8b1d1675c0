use sqlx::pool::PoolConnection;
use sqlx::{query, query_as, query_scalar, Executor, PgPool, Postgres, QueryBuilder, Transaction};

use crate::core::models::common::Pagination;
use crate::core::models::enrollment::{EnrollmentRequest, Query as EnrollmentQuery, RequestDetail, RequestState};
use crate::core::models::offer::Offer;
use crate::core::models::participant::Participant;
use crate::core::ports::repository::{Common, EnrollmentCommon, OfferCommon, ParticipantCommon, Store, TxStore};
use crate::error::Error;

pub struct PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    executor: E,
}

impl<E> EnrollmentCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn get(&mut self, id: i32) -> Result<Option<EnrollmentRequest>, Error> {
        let request = query_as(
            "SELECT id, participant_id, offer_id, state, rejection_reason, created_at
            FROM enrollment_requests
            WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut self.executor)
        .await?;
        Ok(request)
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Option<EnrollmentRequest>, Error> {
        let request = query_as(
            "SELECT id, participant_id, offer_id, state, rejection_reason, created_at
            FROM enrollment_requests
            WHERE id = $1
            FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut self.executor)
        .await?;
        Ok(request)
    }

    async fn count_approved(&mut self, offer_id: i32) -> Result<i64, Error> {
        let n: i64 = query_scalar("SELECT COUNT(*) FROM enrollment_requests WHERE offer_id = $1 AND state = 'approved'")
            .bind(offer_id)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(n)
    }

    async fn update_decision(&mut self, id: i32, state: RequestState, reason: &str) -> Result<(), Error> {
        query("UPDATE enrollment_requests SET state = $1, rejection_reason = $2 WHERE id = $3")
            .bind(state)
            .bind(reason)
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        query("DELETE FROM enrollment_requests WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(())
    }

    async fn query(&mut self, query: &EnrollmentQuery, pagination: Option<Pagination>) -> Result<Vec<RequestDetail>, Error> {
        let mut stmt = QueryBuilder::new(
            "
        SELECT
            er.id AS id,
            er.participant_id AS participant_id,
            p.name AS participant_name,
            er.offer_id AS offer_id,
            d.name AS discipline,
            er.state AS state,
            er.rejection_reason AS rejection_reason,
            er.created_at AS created_at
        FROM enrollment_requests AS er
        JOIN participants AS p ON p.id = er.participant_id
        JOIN offers AS o ON o.id = er.offer_id
        JOIN disciplines AS d ON d.id = o.discipline_id
        WHERE 1 = 1",
        );
        if let Some(state) = query.state_eq {
            stmt.push(" AND er.state = ").push_bind(state);
        }
        if let Some(discipline) = &query.discipline_eq {
            stmt.push(" AND d.name = ").push_bind(discipline.clone());
        }
        stmt.push(" ORDER BY er.created_at DESC");
        if let Some(pagination) = pagination {
            stmt.push(" LIMIT ").push_bind(pagination.size);
            stmt.push(" OFFSET ").push_bind(pagination.offset());
        }
        let requests = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        Ok(requests)
    }

    async fn count(&mut self, query: &EnrollmentQuery) -> Result<i64, Error> {
        let mut stmt = QueryBuilder::new(
            "
        SELECT COUNT(*)
        FROM enrollment_requests AS er
        JOIN offers AS o ON o.id = er.offer_id
        JOIN disciplines AS d ON d.id = o.discipline_id
        WHERE 1 = 1",
        );
        if let Some(state) = query.state_eq {
            stmt.push(" AND er.state = ").push_bind(state);
        }
        if let Some(discipline) = &query.discipline_eq {
            stmt.push(" AND d.name = ").push_bind(discipline.clone());
        }
        let (n,): (i64,) = stmt.build_query_as().fetch_one(&mut self.executor).await?;
        Ok(n)
    }
}

impl<E> OfferCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn get(&mut self, id: i32) -> Result<Option<Offer>, Error> {
        let offer = query_as("SELECT id, discipline_id, capacity FROM offers WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(offer)
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Option<Offer>, Error> {
        let offer = query_as("SELECT id, discipline_id, capacity FROM offers WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(offer)
    }
}

impl<E> ParticipantCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn get(&mut self, id: i32) -> Result<Option<Participant>, Error> {
        let participant = query_as(
            "SELECT id, name, photo_path, employment_letter_path, payment_proof_path
            FROM participants
            WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut self.executor)
        .await?;
        Ok(participant)
    }
}

impl Common for PgSqlx<PoolConnection<Postgres>> {}
impl<'a> Common for PgSqlx<Transaction<'a, Postgres>> {}
impl Store for PgSqlx<PoolConnection<Postgres>> {}
impl<'a> Store for PgSqlx<Transaction<'a, Postgres>> {}

impl<'a> TxStore for PgSqlx<Transaction<'a, Postgres>> {
    async fn commit(self) -> Result<(), Error> {
        self.executor.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        self.executor.rollback().await?;
        Ok(())
    }
}

pub struct PgSqlxManager {
    pool: PgPool,
}

impl PgSqlxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn begin(&self) -> Result<PgSqlx<Transaction<'static, Postgres>>, Error> {
        let tx = self.pool.begin().await?;
        Ok(PgSqlx { executor: tx })
    }

    pub async fn acquire(&self) -> Result<PgSqlx<PoolConnection<Postgres>>, Error> {
        let conn = self.pool.acquire().await?;
        Ok(PgSqlx { executor: conn })
    }
}
