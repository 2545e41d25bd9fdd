//! Approval persistence.
//!
//! The planner never talks to storage directly. Handlers and the service
//! layer read a snapshot of approval decisions through the
//! [`ApprovalRepository`] trait and hand it to the engine.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  HTTP handlers / services::run_planner        │
//! └───────────────────┬──────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────┐
//! │  ApprovalRepository (repository/)             │
//! └───────────────────┬──────────────────────────┘
//!          ┌──────────┴───────────┐
//! ┌────────▼────────┐   ┌─────────▼────────────┐
//! │ LocalRepository │   │ PostgresRepository    │
//! │   (in-memory)   │   │ (feature postgres-repo)│
//! └─────────────────┘   └──────────────────────┘
//! ```
//!
//! Stores are built with [`RepositoryFactory`] or [`RepositoryBuilder`] from
//! the environment or a `repository.toml` file.

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;

// Postgres config is colocated with the repository implementation.
#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::{PoolStats, PostgresConfig};
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    _private: (),
}
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    _private: (),
}

pub use factory::{RepositoryBuilder, RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{ApprovalRepository, ErrorContext, RepositoryError, RepositoryResult};
