//! The selected date range and its representation in the home page's query string.
//!
//! The range is stored under the keys `dates[start]` and `dates[end]` as
//! ISO-8601 UTC timestamps with millisecond precision, e.g.
//! `dates[start]=2024-01-01T00:00:00.000Z`. The keys and values are
//! percent-encoded in the query string.

use serde::{Deserialize, Serialize};
use time::{
    Duration, OffsetDateTime, Time, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

/// The day counts that have a dedicated preset.
pub const PRESET_DAYS: [i64; 3] = [7, 15, 30];

/// The number of days covered by the default date range.
const DEFAULT_RANGE_DAYS: i64 = 7;

const ISO_8601_MILLIS: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
);

/// A complete date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

/// A date range as read from a query string, where either end may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DatesQuery {
    pub start: Option<OffsetDateTime>,
    pub end: Option<OffsetDateTime>,
}

impl DatesQuery {
    /// Whether the start or end date is missing.
    pub fn is_invalid(&self) -> bool {
        self.start.is_none() || self.end.is_none()
    }

    /// The complete range, or `None` if either end is missing.
    pub fn range(&self) -> Option<DateRange> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(DateRange { start, end }),
            _ => None,
        }
    }
}

impl From<DateRange> for DatesQuery {
    fn from(range: DateRange) -> Self {
        Self {
            start: Some(range.start),
            end: Some(range.end),
        }
    }
}

/// The named date ranges a user can pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Today,
    Day,
    Days7,
    Days15,
    Days30,
    Custom,
}

impl Preset {
    pub fn default_preset() -> Self {
        Self::Days7
    }

    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Day => "day",
            Self::Days7 => "days-7",
            Self::Days15 => "days-15",
            Self::Days30 => "days-30",
            Self::Custom => "custom",
        }
    }

    /// Parse the value produced by [Preset::as_query_value].
    pub fn from_query_value(value: &str) -> Option<Self> {
        match value {
            "today" => Some(Self::Today),
            "day" => Some(Self::Day),
            "days-7" => Some(Self::Days7),
            "days-15" => Some(Self::Days15),
            "days-30" => Some(Self::Days30),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Day => "One day",
            Self::Days7 => "Last 7 days",
            Self::Days15 => "Last 15 days",
            Self::Days30 => "Last 30 days",
            Self::Custom => "Custom",
        }
    }

    fn from_days(days: i64) -> Option<Self> {
        match days {
            7 => Some(Self::Days7),
            15 => Some(Self::Days15),
            30 => Some(Self::Days30),
            _ => None,
        }
    }

    /// The range this preset selects when the current time is `now`.
    ///
    /// Returns `None` for [Preset::Custom], which has no fixed range.
    pub fn range(self, now: OffsetDateTime) -> Option<DateRange> {
        let days_back = match self {
            Self::Today => {
                return Some(DateRange {
                    start: now.replace_time(Time::MIDNIGHT),
                    end: now,
                });
            }
            Self::Day => 1,
            Self::Days7 => 7,
            Self::Days15 => 15,
            Self::Days30 => 30,
            Self::Custom => return None,
        };

        Some(DateRange {
            start: now - Duration::days(days_back),
            end: now,
        })
    }
}

/// The presets offered by the date selector, in display order.
///
/// Built once at start-up and shared through the application state.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetCatalog {
    presets: Vec<Preset>,
}

impl PresetCatalog {
    /// Today, then the day-count presets in ascending order, then custom.
    pub fn new() -> Self {
        let mut presets = vec![Preset::Today];
        presets.extend(PRESET_DAYS.iter().filter_map(|&days| Preset::from_days(days)));
        presets.push(Preset::Custom);

        Self { presets }
    }

    pub fn iter(&self) -> impl Iterator<Item = Preset> + '_ {
        self.presets.iter().copied()
    }
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// The query string form of [DatesQuery].
#[derive(Debug, Default, Serialize, Deserialize)]
struct DatesParams {
    #[serde(rename = "dates[start]", default)]
    start: String,
    #[serde(rename = "dates[end]", default)]
    end: String,
}

/// Serialise `dates` into a query string without the leading '?'.
///
/// `None` produces an empty query string, which resets the query.
/// Both keys are always written, a missing date is written as an empty value.
pub fn encode(dates: Option<&DatesQuery>) -> String {
    let Some(dates) = dates else {
        return String::new();
    };

    let params = DatesParams {
        start: dates.start.and_then(format_date_time).unwrap_or_default(),
        end: dates.end.and_then(format_date_time).unwrap_or_default(),
    };

    match serde_urlencoded::to_string(&params) {
        Ok(query) => query,
        Err(error) => {
            tracing::error!("could not serialize date range {dates:?}: {error}");
            String::new()
        }
    }
}

/// Parse the date range from a query string, with or without the leading '?'.
///
/// Returns `None` for an empty query string or one that is not URL-encoded.
/// Dates that are empty or are not ISO-8601 timestamps are treated as missing.
pub fn decode(query: &str) -> Option<DatesQuery> {
    let query = query.strip_prefix('?').unwrap_or(query);

    if query.is_empty() {
        return None;
    }

    let params: DatesParams = match serde_urlencoded::from_str(query) {
        Ok(params) => params,
        Err(error) => {
            tracing::debug!("ignoring malformed query string {query:?}: {error}");
            return None;
        }
    };

    Some(DatesQuery {
        start: parse_date_time(&params.start),
        end: parse_date_time(&params.end),
    })
}

/// `None` if the date-time has no UTC representation, e.g. `+10000-01-01T00:00Z`.
fn format_date_time(date_time: OffsetDateTime) -> Option<String> {
    let Some(utc) = date_time.checked_to_offset(UtcOffset::UTC) else {
        tracing::debug!("dropping date {date_time} that cannot be converted to UTC");
        return None;
    };

    utc.format(ISO_8601_MILLIS)
        .inspect_err(|error| tracing::error!("could not format {date_time}: {error}"))
        .ok()
}

/// Dates that cannot be converted to UTC are treated as missing.
fn parse_date_time(text: &str) -> Option<OffsetDateTime> {
    if text.is_empty() {
        return None;
    }

    let date_time = OffsetDateTime::parse(text, &Rfc3339)
        .inspect_err(|error| tracing::debug!("ignoring invalid date {text:?}: {error}"))
        .ok()?;

    if date_time.checked_to_offset(UtcOffset::UTC).is_none() {
        tracing::debug!("ignoring date {text:?} that cannot be converted to UTC");
        return None;
    }

    Some(date_time)
}

/// Work out which preset `range` corresponds to when the current time is `now`.
///
/// Calendar days are compared in the offset of `now`. A range that cannot be
/// shown in that offset is [Preset::Custom].
pub fn classify_preset(range: &DateRange, now: OffsetDateTime) -> Preset {
    let today = now.date();
    let (Some(start), Some(end)) = (
        range.start.checked_to_offset(now.offset()),
        range.end.checked_to_offset(now.offset()),
    ) else {
        return Preset::Custom;
    };

    if start.date() == today && end.date() == today {
        return Preset::Today;
    }

    let days_diff = (range.start - range.end).whole_days().abs();

    if days_diff <= 1 {
        return Preset::Day;
    }

    Preset::from_days(days_diff).unwrap_or(Preset::Custom)
}

/// The range shown when no range has been selected: the last week up to `now`.
pub fn default_dates(now: OffsetDateTime) -> DateRange {
    DateRange {
        start: now - Duration::days(DEFAULT_RANGE_DAYS),
        end: now,
    }
}
