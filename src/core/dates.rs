//! Scheduling date resolution.
//!
//! Every work item gets a start and end date, even when the backend has
//! none: missing or malformed values fall back to a per-type default span
//! starting today.

use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime};

use super::config::FieldMapping;
use super::work_item::WorkItem;

/// Date layout used in diagrams and tables.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Resolved schedule of a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    /// Start date as `YYYY-MM-DD`.
    pub fn start_str(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    /// End date as `YYYY-MM-DD`.
    pub fn end_str(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

/// Resolves item dates against a field mapping.
#[derive(Debug, Clone, Copy)]
pub struct DateResolver {
    today: NaiveDate,
}

impl Default for DateResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DateResolver {
    /// Resolver anchored at the local current date.
    pub fn new() -> Self {
        Self { today: Local::now().date_naive() }
    }

    /// Resolver anchored at a fixed date.
    pub fn with_today(today: NaiveDate) -> Self {
        Self { today }
    }

    /// The date defaults are measured from.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Resolve the schedule of an item.
    ///
    /// A missing start defaults to today; a missing end defaults to the
    /// start plus the type's default span.
    pub fn resolve(&self, item: &WorkItem, mapping: &FieldMapping) -> DateSpan {
        let span = item.kind.default_span_days();

        let (start, end) = if mapping.for_type(item.kind).is_some() {
            (
                item.start.as_deref().and_then(|raw| parse_logged(item.id, "start", raw)),
                item.end.as_deref().and_then(|raw| parse_logged(item.id, "end", raw)),
            )
        } else {
            tracing::debug!("No date mapping for {} #{}, using defaults", item.kind, item.id);
            (None, None)
        };

        let start = start.unwrap_or(self.today);
        let end = end.unwrap_or_else(|| add_days(start, span));
        DateSpan { start, end }
    }
}

/// Parse a backend date value into a local calendar date.
///
/// Timestamps with an offset are converted to local time before the time
/// of day is dropped. Returns `None` for anything unparseable.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).date_naive());
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }

    DATE_FORMATS.iter().find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

fn parse_logged(id: u32, which: &str, raw: &str) -> Option<NaiveDate> {
    let parsed = parse_date(raw);
    if parsed.is_none() {
        tracing::debug!("Unparseable {} date {:?} on #{}, using default", which, raw, id);
    }
    parsed
}

fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_days(Days::new(days.unsigned_abs())).unwrap_or(date)
}
