use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Offset, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Fixed UTC offset that anchors every calendar computation in a planning run.
///
/// Naive timestamps are interpreted in this zone, slot wall-clock times are
/// expressed in it, and "days until" arithmetic compares calendar dates in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceZone(FixedOffset);

impl ReferenceZone {
    /// The UTC reference zone (default).
    pub fn utc() -> Self {
        Self(Utc.fix())
    }

    pub fn from_offset(offset: FixedOffset) -> Self {
        Self(offset)
    }

    /// Parse an offset such as `+02:00`, `-05:30`, `Z` or `UTC`.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
            return Some(Self::utc());
        }
        trimmed.parse::<FixedOffset>().ok().map(Self)
    }

    pub fn offset(&self) -> FixedOffset {
        self.0
    }

    /// Express an aware timestamp in this zone.
    pub fn localize(&self, instant: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.0)
    }

    /// Attach this zone to a wall-clock timestamp.
    ///
    /// `None` when the matching UTC instant falls outside chrono's range.
    pub fn attach(&self, naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        let utc = naive.checked_sub_signed(Duration::seconds(i64::from(self.0.local_minus_utc())))?;
        Some(DateTime::from_naive_utc_and_offset(utc, self.0))
    }

    /// Calendar date of an instant as seen from this zone.
    pub fn local_date(&self, instant: DateTime<FixedOffset>) -> NaiveDate {
        self.localize(instant).date_naive()
    }

    /// Wall-clock time `hour:minute` on `date` in this zone.
    pub fn at(&self, date: NaiveDate, hour: u32, minute: u32) -> Option<DateTime<FixedOffset>> {
        date.and_hms_opt(hour, minute, 0).and_then(|naive| self.attach(naive))
    }
}

impl Default for ReferenceZone {
    fn default() -> Self {
        Self::utc()
    }
}

/// An event start as supplied by callers: either timezone-aware or naive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventTime {
    Zoned(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
    Date(NaiveDate),
}

impl EventTime {
    /// Resolve to an aware instant, interpreting naive values in `zone`.
    ///
    /// Naive values too close to the edge of the calendar to be placed in
    /// `zone` resolve to `None`.
    pub fn resolve(&self, zone: ReferenceZone) -> Option<DateTime<FixedOffset>> {
        match *self {
            EventTime::Zoned(instant) => Some(zone.localize(instant)),
            EventTime::Naive(naive) => zone.attach(naive),
            EventTime::Date(date) => zone.attach(date.and_time(chrono::NaiveTime::MIN)),
        }
    }

    /// Calendar date of the event in `zone`.
    pub fn local_date(&self, zone: ReferenceZone) -> Option<NaiveDate> {
        self.resolve(zone).map(|instant| instant.date_naive())
    }
}

impl From<DateTime<FixedOffset>> for EventTime {
    fn from(instant: DateTime<FixedOffset>) -> Self {
        EventTime::Zoned(instant)
    }
}

/// Fixed-offset ISO-8601 rendering shared by every timestamp the planner emits.
///
/// All emitted timestamps use the same offset, so lexicographic order equals
/// chronological order.
pub fn format_timestamp(instant: DateTime<FixedOffset>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Signed number of calendar days from `from` to `to`.
pub fn day_gap(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}
