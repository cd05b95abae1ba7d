//! The endpoint URIs.

/// The root route which redirects to the home page.
pub const ROOT: &str = "/";
/// The merchant's home page with the metrics for the selected dates.
pub const HOME_VIEW: &str = "/home";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route the home page's date selector submits to.
pub const HOME_DATES_API: &str = "/api/home/dates";
/// The route for getting the metrics of a date range as JSON.
pub const METRICS_API: &str = "/api/metrics";
