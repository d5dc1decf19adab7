//! PostgreSQL implementation of the poll repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};

use super::{PollRepository, Saved};
use crate::domain::{Poll, PollId};
use crate::error::ApiError;

type PollRow = (i64, Option<String>, Option<String>, Option<NaiveDate>);

fn from_row((id, name, options, expiration): PollRow) -> Poll {
    Poll {
        id: Some(PollId::new(id)),
        name,
        options,
        expiration,
    }
}

fn storage_error(e: sqlx::Error) -> ApiError {
    ApiError::PersistenceError(e.to_string())
}

/// Runs the embedded schema migrations.
///
/// # Errors
///
/// Returns a [`ApiError::PersistenceError`] if a migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<(), ApiError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| ApiError::PersistenceError(e.to_string()))
}

/// PostgreSQL-backed poll store using `sqlx::PgPool`.
///
/// Every call runs in its own transaction. Queries open it `READ ONLY`.
#[derive(Debug, Clone)]
pub struct PostgresPollRepository {
    pool: PgPool,
}

impl PostgresPollRepository {
    /// Creates a repository over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin_read_only(&self) -> Result<Transaction<'static, Postgres>, ApiError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;
        sqlx::query("SET TRANSACTION READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;
        Ok(tx)
    }
}

#[async_trait]
impl PollRepository for PostgresPollRepository {
    async fn save(&self, mut poll: Poll) -> Result<Saved, ApiError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        if let Some(id) = poll.id {
            let updated = sqlx::query(
                "UPDATE poll SET name = $2, options = $3, expiration = $4 WHERE id = $1",
            )
            .bind(id.get())
            .bind(&poll.name)
            .bind(&poll.options)
            .bind(poll.expiration)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?
            .rows_affected();

            if updated > 0 {
                tx.commit().await.map_err(storage_error)?;
                return Ok(Saved::Updated(poll));
            }
            tracing::debug!(%id, "no poll to update, inserting instead");
        }

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO poll (name, options, expiration) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&poll.name)
        .bind(&poll.options)
        .bind(poll.expiration)
        .fetch_one(&mut *tx)
        .await
        .map_err(storage_error)?;

        tx.commit().await.map_err(storage_error)?;
        poll.id = Some(PollId::new(id));
        Ok(Saved::Created(poll))
    }

    async fn find_all(&self) -> Result<Vec<Poll>, ApiError> {
        let mut tx = self.begin_read_only().await?;
        let rows = sqlx::query_as::<_, PollRow>(
            "SELECT id, name, options, expiration FROM poll ORDER BY id ASC",
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(storage_error)?;
        tx.commit().await.map_err(storage_error)?;

        Ok(rows.into_iter().map(from_row).collect())
    }

    async fn find_by_id(&self, id: PollId) -> Result<Option<Poll>, ApiError> {
        let mut tx = self.begin_read_only().await?;
        let row = sqlx::query_as::<_, PollRow>(
            "SELECT id, name, options, expiration FROM poll WHERE id = $1",
        )
        .bind(id.get())
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage_error)?;
        tx.commit().await.map_err(storage_error)?;

        Ok(row.map(from_row))
    }

    async fn delete_by_id(&self, id: PollId) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM poll WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(result.rows_affected() > 0)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
