//! # Social Ops Planner
//!
//! Weekly publication planner for a small arts organization's social
//! channels.
//!
//! Given a set of content items (events, video uploads, deadlines), the
//! planner proposes one draft per (item, platform, format) combination,
//! blocks drafts whose dependency rules fail, scores the rest, and fills the
//! weekly publication slots over a planning horizon while honoring per-platform
//! cooldowns. Human approval decisions are persisted separately and fed back
//! into every run.
//!
//! ## Architecture
//!
//! - [`models`]: domain types (items, candidates, plan entries, approvals)
//! - [`config`]: YAML rule tables, validation, and fingerprinting
//! - [`planner`]: the pure planning engine
//! - [`db`]: approval persistence behind the repository pattern
//! - [`services`]: orchestration shared by the HTTP server and tests
//! - [`http`]: axum REST API (feature `http-server`)

// RepositoryError carries rich context for debugging
#![allow(clippy::result_large_err)]

pub mod config;
pub mod db;
pub mod models;
pub mod planner;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
