//! Service layer between the transport surfaces and the approval store.
//!
//! Functions here take any [`ApprovalRepository`](crate::db::ApprovalRepository)
//! so handlers, the worker, and tests share one code path.

pub mod approvals;
pub mod planner;

pub use approvals::{get_decision, health_check, list_decisions, list_records, record_decision};
pub use planner::run_planner;
