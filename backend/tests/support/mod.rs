//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, FixedOffset, TimeZone};
use serde_json::json;
use social_ops::config::{ConfigLoader, PlannerConfig};
use social_ops::models::PlannerInput;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK poisoned");
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// The `configs/` directory shipped at the workspace root.
pub fn configs_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../configs")
}

pub fn shipped_config() -> PlannerConfig {
    ConfigLoader::new(configs_dir())
        .load()
        .expect("shipped configs must load")
}

/// Wednesday 2026-03-04 09:00 UTC. Slots fall on the four Mondays 3/9..3/30.
pub fn fixed_now() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2026, 3, 4, 9, 0, 0)
        .unwrap()
}

/// A ticketed screening, an event with no ticket link, and a trailer.
pub fn sample_input_json() -> serde_json::Value {
    json!({
        "items": [
            {
                "id": "screening-0320",
                "item_type": "event",
                "event_start": "2026-03-20T19:00:00+00:00",
                "links": {
                    "eventbrite": "https://www.eventbrite.example/e/screening-0320",
                    "website": "https://cinema.example/screening-0320"
                },
                "assets": {"photo_count": 4, "video_count": 1}
            },
            {
                "id": "open-mic",
                "item_type": "event",
                "event_start": "2026-03-12T20:00:00"
            },
            {
                "id": "trailer",
                "item_type": "video_upload",
                "assets": {"video_count": 1}
            }
        ],
        "campaigns": [{"id": "spring-season"}],
        "objectives": [
            {"id": "attendance", "weight": 4},
            {"name": "growth", "weight": "2"}
        ]
    })
}

pub fn sample_input() -> PlannerInput {
    serde_json::from_value(sample_input_json()).expect("sample input must decode")
}
