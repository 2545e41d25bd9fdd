//! Content items: the immutable input of a planning run.

use serde::{Deserialize, Serialize};

use super::time::EventTime;

/// Push level that carries no urgency override.
pub const NORMAL_PUSH_LEVEL: &str = "normal";

/// External links attached to an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemLinks {
    /// Ticketing page
    #[serde(default)]
    pub eventbrite: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub youtube: Option<String>,
}

/// Media asset counts attached to an item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAssets {
    #[serde(default)]
    pub photo_count: u32,
    #[serde(default)]
    pub video_count: u32,
}

/// A content unit that may be published on one or more platforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    /// Free-form category, e.g. `event`, `video_upload`, `deadline`.
    pub item_type: String,
    #[serde(default)]
    pub audiences: Vec<String>,
    #[serde(default)]
    pub event_start: Option<EventTime>,
    /// Cooldown grouping key shared by related items.
    #[serde(default)]
    pub series_id: Option<String>,
    #[serde(default)]
    pub push_level: Option<String>,
    #[serde(default)]
    pub links: ItemLinks,
    #[serde(default)]
    pub assets: ItemAssets,
}

impl Item {
    /// Minimal item with only identifier and type set.
    pub fn new(id: impl Into<String>, item_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            item_type: item_type.into(),
            audiences: Vec::new(),
            event_start: None,
            series_id: None,
            push_level: None,
            links: ItemLinks::default(),
            assets: ItemAssets::default(),
        }
    }

    /// Key that groups publications for cooldown purposes: the series when
    /// present, otherwise the item itself.
    pub fn cooldown_group(&self) -> &str {
        self.series_id
            .as_deref()
            .filter(|series| !series.is_empty())
            .unwrap_or(&self.id)
    }

    /// Push level tag, treating a missing tag as `normal`.
    pub fn push_level_or_normal(&self) -> &str {
        self.push_level.as_deref().unwrap_or(NORMAL_PUSH_LEVEL)
    }
}
