//! The view state of the home page: the selected date range and preset.
//!
//! The controller does not touch the query string or the metrics source itself.
//! Every transition returns the [Effect]s the caller must carry out.

use time::OffsetDateTime;

use crate::home::date_range::{
    DateRange, DatesQuery, Preset, classify_preset, decode, default_dates, encode,
};

/// A side effect requested by a [HomeController] transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Replace the page's query string with the given one.
    ReplaceQuery(String),
    /// Fetch the metrics for the given range.
    RequestMetrics(DateRange),
}

/// Holds the selected dates and preset of the home page.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeController {
    dates: DatesQuery,
    preset: Preset,
}

impl HomeController {
    /// A controller showing the default range (the last week up to `now`).
    pub fn with_defaults(now: OffsetDateTime) -> Self {
        Self {
            dates: default_dates(now).into(),
            preset: Preset::default_preset(),
        }
    }

    /// Set up the controller for a page load with the query string `search`.
    ///
    /// A query string with a complete date range selects that range and
    /// requests its metrics. Otherwise the default range is selected and
    /// written to the query string so that the URL always shows the active
    /// range.
    pub fn mount(search: Option<&str>, now: OffsetDateTime) -> (Self, Vec<Effect>) {
        let has_range = search
            .and_then(decode)
            .is_some_and(|dates| !dates.is_invalid());

        match search {
            Some(search) if has_range => {
                let mut controller = Self::with_defaults(now);
                let effects = controller.query_changed(search, now);
                (controller, effects)
            }
            _ => {
                if let Some(search) = search.filter(|search| !search.is_empty()) {
                    tracing::debug!("no complete date range in {search:?}, using the default");
                }

                let controller = Self::with_defaults(now);
                let effects = vec![Effect::ReplaceQuery(encode(Some(&controller.dates)))];
                (controller, effects)
            }
        }
    }

    /// The user picked new dates without choosing a preset.
    ///
    /// The preset is left alone until the query string change comes back
    /// through [HomeController::query_changed].
    pub fn change_dates(&mut self, dates: DatesQuery) -> Vec<Effect> {
        self.dates = dates;

        vec![Effect::ReplaceQuery(encode(Some(&self.dates)))]
    }

    /// The user confirmed new dates, optionally by choosing a preset.
    ///
    /// Without a preset the selection is treated as [Preset::Custom].
    pub fn confirm_dates(&mut self, dates: DatesQuery, preset: Option<Preset>) -> Vec<Effect> {
        self.dates = dates;
        self.preset = preset.unwrap_or(Preset::Custom);

        vec![Effect::ReplaceQuery(encode(Some(&self.dates)))]
    }

    /// The query string changed, e.g. through browser navigation.
    ///
    /// The dates and preset follow the query string. Metrics are requested only
    /// when it holds a complete range.
    pub fn query_changed(&mut self, search: &str, now: OffsetDateTime) -> Vec<Effect> {
        self.dates = decode(search).unwrap_or_default();

        match self.dates.range() {
            Some(range) => {
                self.preset = classify_preset(&range, now);
                vec![Effect::RequestMetrics(range)]
            }
            None => Vec::new(),
        }
    }

    pub fn dates(&self) -> DatesQuery {
        self.dates
    }

    /// The selected range, or `None` if the start or end date is missing.
    pub fn range(&self) -> Option<DateRange> {
        self.dates.range()
    }

    pub fn preset(&self) -> Preset {
        self.preset
    }
}
