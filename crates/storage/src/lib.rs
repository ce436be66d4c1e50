use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{migrate::MigrateError, sqlite::SqlitePoolOptions, SqlitePool};
use thiserror::Error;
use uuid::Uuid;

use referral_core::types::{NewReferral, Referral};

/// Top-level database handle that owns the SQLite connection pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Establishes a new SQLite connection pool for the provided connection string.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(StorageError::Connect)?;

        apply_pragmas(&pool).await?;

        Ok(Self { pool })
    }

    /// Applies migrations located under `migrations/`.
    pub async fn run_migrations(&self) -> Result<(), StorageError> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(StorageError::Migration)?;
        Ok(())
    }

    /// Returns a handle to operate on referral records.
    pub fn referrals(&self) -> ReferralRepository {
        ReferralRepository {
            pool: self.pool.clone(),
        }
    }

    /// Drains the pool; used by the shutdown path once the server has stopped.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Exposes the inner pool when lower level access is required.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

async fn apply_pragmas(pool: &SqlitePool) -> Result<(), StorageError> {
    sqlx::query("PRAGMA journal_mode = WAL;")
        .fetch_one(pool)
        .await
        .map_err(StorageError::Pragma)?;

    sqlx::query("PRAGMA synchronous = NORMAL;")
        .execute(pool)
        .await
        .map_err(StorageError::Pragma)?;

    sqlx::query("PRAGMA busy_timeout = 5000;")
        .execute(pool)
        .await
        .map_err(StorageError::Pragma)?;

    Ok(())
}

/// General storage level errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to connect to sqlite: {0}")]
    Connect(sqlx::Error),
    #[error("failed to apply pragma: {0}")]
    Pragma(sqlx::Error),
    #[error("failed to run database migrations: {0}")]
    Migration(MigrateError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Repository owning creation of referral records.
#[derive(Clone)]
pub struct ReferralRepository {
    pool: SqlitePool,
}

impl ReferralRepository {
    /// Writes one referral row, assigning its identifier and creation
    /// timestamp.
    ///
    /// The row is durably written before this returns `Ok`. Accepting only
    /// [`NewReferral`] keeps the non-empty precondition enforced upstream;
    /// the table's CHECK constraints back it at the database layer.
    pub async fn insert(
        &self,
        submission: &NewReferral,
        now: DateTime<Utc>,
    ) -> Result<Referral, ReferralError> {
        let referral = Referral {
            id: Uuid::new_v4().to_string(),
            referrer: submission.referrer().to_string(),
            referee: submission.referee().to_string(),
            email: submission.email().to_string(),
            course: submission.course().to_string(),
            created_at: now,
        };

        sqlx::query(
            "INSERT INTO referrals (id, referrer, referee, email, course, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&referral.id)
        .bind(&referral.referrer)
        .bind(&referral.referee)
        .bind(&referral.email)
        .bind(&referral.course)
        .bind(to_rfc3339(referral.created_at))
        .execute(&self.pool)
        .await?;

        Ok(referral)
    }
}

/// Errors that can occur when persisting referrals.
#[derive(Debug, Error)]
pub enum ReferralError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

fn to_rfc3339(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}
