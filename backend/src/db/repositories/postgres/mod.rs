//! Postgres approval store using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Retry with exponential backoff for transient failures
//! - Embedded migration for the `approvals` table
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel::upsert::excluded;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task;

use crate::db::repository::{
    ApprovalRepository, ErrorContext, RepositoryError, RepositoryResult,
};
use crate::models::{ApprovalDecision, ApprovalRecord, ApprovalSnapshot};

mod models;
mod schema;

use models::{ApprovalRow, NewApprovalRow};
use schema::approvals;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    pub database_url: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connection_timeout_sec: u64,
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Read the configuration from `DATABASE_URL`/`PG_*` variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;
        let defaults = Self::default();

        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
            max_retries: env_or("PG_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("PG_RETRY_DELAY_MS", defaults.retry_delay_ms),
        })
    }

    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    pub connections_in_use: u32,
    pub idle_connections: u32,
    pub total_connections: u32,
    pub max_size: u32,
    pub total_queries: u64,
    pub failed_queries: u64,
    pub retried_operations: u64,
}

/// Diesel-backed approval store.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    total_queries: Arc<AtomicU64>,
    failed_queries: Arc<AtomicU64>,
    retried_operations: Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Build the pool and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }
        log::info!("Postgres approval store ready (pool max {})", config.max_pool_size);

        Ok(Self {
            pool,
            config,
            total_queries: Arc::new(AtomicU64::new(0)),
            failed_queries: Arc::new(AtomicU64::new(0)),
            retried_operations: Arc::new(AtomicU64::new(0)),
        })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;
        Ok(())
    }

    /// Run `f` on a pooled connection off the async runtime, retrying
    /// retryable failures with exponential backoff.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: Fn(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut retry_delay = Duration::from_millis(retry_delay_ms);
            let mut attempt = 0;

            loop {
                let outcome = match pool.get() {
                    Ok(mut conn) => {
                        total_queries.fetch_add(1, Ordering::Relaxed);
                        f(&mut conn)
                    }
                    Err(e) => Err(RepositoryError::connection_with_context(
                        e.to_string(),
                        ErrorContext::new("get_connection")
                            .with_details(format!("attempt={}", attempt + 1)),
                    )),
                };

                match outcome {
                    Ok(value) => return Ok(value),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        log::warn!("Retrying approval store operation after error: {}", e);
                        retried_operations.fetch_add(1, Ordering::Relaxed);
                        std::thread::sleep(retry_delay);
                        retry_delay *= 2;
                        attempt += 1;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }
}

#[async_trait]
impl ApprovalRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(RepositoryError::from)
        })
        .await
    }

    async fn record_decision(&self, decision: &ApprovalDecision) -> RepositoryResult<ApprovalRecord> {
        if decision.draft_id.trim().is_empty() {
            return Err(RepositoryError::validation_with_context(
                "draft_id must not be empty",
                ErrorContext::new("record_decision").with_entity("approval"),
            ));
        }
        let row = NewApprovalRow::from_decision(decision, Utc::now());
        self.with_conn(move |conn| {
            let stored: ApprovalRow = diesel::insert_into(approvals::table)
                .values(&row)
                .on_conflict(approvals::draft_id)
                .do_update()
                .set((
                    approvals::status.eq(excluded(approvals::status)),
                    approvals::decision_note.eq(excluded(approvals::decision_note)),
                    approvals::decided_at.eq(excluded(approvals::decided_at)),
                    approvals::decided_by.eq(excluded(approvals::decided_by)),
                ))
                .returning(ApprovalRow::as_returning())
                .get_result(conn)
                .map_err(|e| {
                    RepositoryError::from(e).with_operation("record_decision")
                })?;
            stored.into_record()
        })
        .await
    }

    async fn get_decision(&self, draft_id: &str) -> RepositoryResult<ApprovalRecord> {
        let draft_id = draft_id.to_string();
        self.with_conn(move |conn| {
            let row = approvals::table
                .filter(approvals::draft_id.eq(draft_id.as_str()))
                .select(ApprovalRow::as_select())
                .first::<ApprovalRow>(conn)
                .optional()
                .map_err(RepositoryError::from)?
                .ok_or_else(|| {
                    RepositoryError::not_found_with_context(
                        format!("No decision recorded for draft {}", draft_id),
                        ErrorContext::new("get_decision")
                            .with_entity("approval")
                            .with_entity_id(&draft_id),
                    )
                })?;
            row.into_record()
        })
        .await
    }

    async fn all_decisions(&self) -> RepositoryResult<ApprovalSnapshot> {
        self.with_conn(|conn| {
            let rows: Vec<ApprovalRow> = approvals::table
                .select(ApprovalRow::as_select())
                .load(conn)
                .map_err(RepositoryError::from)?;
            rows.into_iter()
                .map(|row| Ok((row.draft_id.clone(), row.parse_status()?)))
                .collect()
        })
        .await
    }

    async fn list_records(&self) -> RepositoryResult<Vec<ApprovalRecord>> {
        self.with_conn(|conn| {
            let rows: Vec<ApprovalRow> = approvals::table
                .select(ApprovalRow::as_select())
                .order(approvals::draft_id.asc())
                .load(conn)
                .map_err(RepositoryError::from)?;
            rows.into_iter().map(ApprovalRow::into_record).collect()
        })
        .await
    }
}
