//! axum REST surface over the planner and the approval store.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  HTTP layer (handlers, dto, error)            │
//! │  - JSON in/out, status validation             │
//! │  - CORS, compression, request tracing         │
//! └───────────────────┬──────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────┐
//! │  services (run_planner, approvals)            │
//! └───────────────────┬──────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────┐
//! │  db (ApprovalRepository)                      │
//! └──────────────────────────────────────────────┘
//! ```

#[cfg(feature = "http-server")]
pub mod handlers;

#[cfg(feature = "http-server")]
pub mod router;

#[cfg(feature = "http-server")]
pub mod state;

#[cfg(feature = "http-server")]
pub mod error;

#[cfg(feature = "http-server")]
pub mod dto;

#[cfg(feature = "http-server")]
pub use router::create_router;

#[cfg(feature = "http-server")]
pub use state::AppState;
