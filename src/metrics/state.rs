//! Tracks the lifecycle of a metrics request for the home page.

use crate::metrics::models::Metrics;

/// Events in the lifecycle of a metrics request.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricsAction {
    /// A request for metrics was sent.
    Request,
    /// The metrics arrived.
    Receive(Metrics),
    /// The request failed with the given message.
    Fail(String),
}

/// The loading, data and error state of the metrics shown on the home page.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsState {
    pub loading: bool,
    pub metrics: Option<Metrics>,
    pub error: Option<String>,
}

impl Default for MetricsState {
    /// Metrics are loading until the first request completes.
    fn default() -> Self {
        Self {
            loading: true,
            metrics: None,
            error: None,
        }
    }
}

impl MetricsState {
    /// Apply `action` and return the next state.
    ///
    /// A failed request keeps the previously received metrics.
    pub fn reduce(self, action: MetricsAction) -> Self {
        match action {
            MetricsAction::Request => Self {
                loading: true,
                metrics: None,
                error: None,
            },
            MetricsAction::Receive(metrics) => Self {
                loading: false,
                metrics: Some(metrics),
                error: None,
            },
            MetricsAction::Fail(error) => Self {
                loading: false,
                error: Some(error),
                ..self
            },
        }
    }

    /// The received metrics, or empty metrics if none have arrived.
    pub fn metrics_or_default(&self) -> Metrics {
        self.metrics.clone().unwrap_or_default()
    }
}
