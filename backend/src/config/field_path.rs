//! Typed field paths for dependency clauses.
//!
//! Rule tables address item attributes with dotted paths rooted at `item`
//! (`item.links.eventbrite`, `item.assets.photo_count`). Paths are resolved
//! into [`FieldPath`] when the rule table is loaded, so a typo fails the load
//! instead of silently evaluating as "absent" on every run.

use std::fmt;
use std::str::FromStr;

use crate::models::{EventTime, Item};

/// An addressable item attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Id,
    ItemType,
    Audiences,
    EventStart,
    SeriesId,
    PushLevel,
    Links,
    LinksEventbrite,
    LinksWebsite,
    LinksYoutube,
    Assets,
    AssetsPhotoCount,
    AssetsVideoCount,
}

const ROOT: &str = "item";

impl FieldPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldPath::Id => "item.id",
            FieldPath::ItemType => "item.item_type",
            FieldPath::Audiences => "item.audiences",
            FieldPath::EventStart => "item.event_start",
            FieldPath::SeriesId => "item.series_id",
            FieldPath::PushLevel => "item.push_level",
            FieldPath::Links => "item.links",
            FieldPath::LinksEventbrite => "item.links.eventbrite",
            FieldPath::LinksWebsite => "item.links.website",
            FieldPath::LinksYoutube => "item.links.youtube",
            FieldPath::Assets => "item.assets",
            FieldPath::AssetsPhotoCount => "item.assets.photo_count",
            FieldPath::AssetsVideoCount => "item.assets.video_count",
        }
    }

    /// Read the attribute from `item`. Unset optional values resolve to
    /// [`FieldValue::Absent`].
    pub fn resolve<'a>(&self, item: &'a Item) -> FieldValue<'a> {
        match self {
            FieldPath::Id => FieldValue::Text(&item.id),
            FieldPath::ItemType => FieldValue::Text(&item.item_type),
            FieldPath::Audiences => FieldValue::List(&item.audiences),
            FieldPath::EventStart => item
                .event_start
                .as_ref()
                .map_or(FieldValue::Absent, FieldValue::Timestamp),
            FieldPath::SeriesId => optional_text(&item.series_id),
            FieldPath::PushLevel => optional_text(&item.push_level),
            FieldPath::Links | FieldPath::Assets => FieldValue::Record,
            FieldPath::LinksEventbrite => optional_text(&item.links.eventbrite),
            FieldPath::LinksWebsite => optional_text(&item.links.website),
            FieldPath::LinksYoutube => optional_text(&item.links.youtube),
            FieldPath::AssetsPhotoCount => FieldValue::Number(f64::from(item.assets.photo_count)),
            FieldPath::AssetsVideoCount => FieldValue::Number(f64::from(item.assets.video_count)),
        }
    }
}

fn optional_text(value: &Option<String>) -> FieldValue<'_> {
    value.as_deref().map_or(FieldValue::Absent, FieldValue::Text)
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldPath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.');
        if parts.next() != Some(ROOT) {
            return Err(format!("Field path must start with '{}.': {}", ROOT, s));
        }
        let rest: Vec<&str> = parts.collect();
        let path = match rest.as_slice() {
            ["id"] => FieldPath::Id,
            ["item_type"] => FieldPath::ItemType,
            ["audiences"] => FieldPath::Audiences,
            ["event_start"] => FieldPath::EventStart,
            ["series_id"] => FieldPath::SeriesId,
            ["push_level"] => FieldPath::PushLevel,
            ["links"] => FieldPath::Links,
            ["links", "eventbrite"] => FieldPath::LinksEventbrite,
            ["links", "website"] => FieldPath::LinksWebsite,
            ["links", "youtube"] => FieldPath::LinksYoutube,
            ["assets"] => FieldPath::Assets,
            ["assets", "photo_count"] => FieldPath::AssetsPhotoCount,
            ["assets", "video_count"] => FieldPath::AssetsVideoCount,
            _ => return Err(format!("Unknown field path: {}", s)),
        };
        Ok(path)
    }
}

/// A resolved attribute value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Absent,
    Text(&'a str),
    Number(f64),
    List(&'a [String]),
    Timestamp(&'a EventTime),
    /// A nested group such as `item.links`.
    Record,
}

impl FieldValue<'_> {
    /// Present means set and not the empty string.
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Absent => false,
            FieldValue::Text(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Numeric view of the value; text is parsed, other shapes have none.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}
