//! Defines the app level error type and conversions to rendered HTML pages.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    error_pages::InternalServerErrorPage,
    html::error_view,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A date submitted by the client could not be parsed.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not parse the date \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// The query string did not describe a complete date range, i.e. the
    /// start or end date was missing.
    #[error("the date range is missing its start or end date")]
    InvalidDateRange,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidDateFormat(_, date) => bad_request(
                "Invalid date",
                &format!("\"{date}\" is not a valid date. Dates should look like 2024-01-31."),
            ),
            Error::InvalidDateRange => bad_request(
                "Invalid date range",
                "Both the start and the end of the date range must be given.",
            ),
            Error::InvalidTimezoneError(timezone) => InternalServerErrorPage {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerErrorPage::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerErrorPage::default().into_response()
            }
        }
    }
}

fn bad_request(description: &str, fix: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        error_view("Bad Request", "400", description, fix),
    )
        .into_response()
}
