//! Home module
//!
//! The merchant's landing page: a greeting, a date range selector and the
//! transaction metrics for the selected range.
//! The selected range lives in the page's query string.

mod charts;
mod controller;
mod date_range;
mod handlers;
mod icons;
mod indicators;

pub use date_range::{DateRange, PresetCatalog};
pub use handlers::{get_home_page, get_metrics_api, post_dates};
