//! The shape of the metrics consumed by the home page.

use serde::{Deserialize, Serialize};

/// One category of a metric breakdown, e.g. the number of Visa transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawIndicator {
    /// The category key, e.g. "visa" or "credit_card".
    pub title: String,
    pub value: f64,
}

impl RawIndicator {
    pub fn new(title: &str, value: f64) -> Self {
        Self {
            title: title.to_owned(),
            value,
        }
    }
}

/// A status-keyed metric, e.g. the number of paid transactions.
///
/// The value may be missing, in which case it is displayed as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMetric {
    pub title: String,
    #[serde(default)]
    pub value: Option<f64>,
}

/// Transaction metrics for a date range.
///
/// Missing metrics default to zero totals and empty breakdowns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metrics {
    pub average_amount: f64,
    pub card_brands: Vec<RawIndicator>,
    pub installments: Vec<StatusMetric>,
    pub payment_methods: Vec<RawIndicator>,
    pub refuse_reasons: Vec<RawIndicator>,
    pub status: Vec<StatusMetric>,
    pub total_amount: f64,
    pub total_transactions: i64,
    pub volume_by_weekday: Vec<StatusMetric>,
}
