//! Transaction metrics for the home page.
//!
//! Stores payment transactions, computes metrics for a date range and tracks
//! the state of a metrics request.

mod aggregation;
mod models;
mod state;
mod transaction;

pub use aggregation::get_metrics;
pub use models::{Metrics, RawIndicator, StatusMetric};
pub use state::{MetricsAction, MetricsState};
pub use transaction::{NewTransaction, create_transaction, create_transaction_table};
