//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert,
    error_page::{InternalServerError, NotFoundError},
    ledger::InsufficientBalance,
    person::PersonId,
};

/// The broad classes of [Error].
///
/// Route handlers use this to pick a status code without needing to know
/// about every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller provided invalid input. No state was changed.
    Validation,
    /// A leave request could not be covered by the person's balances. No state
    /// was changed.
    InsufficientBalance,
    /// The requested record does not exist.
    NotFound,
    /// The database or the server configuration failed. Any open transaction
    /// was rolled back.
    Persistence,
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// Leave was requested for zero or a negative number of days.
    #[error("leave must be requested for at least one day, got {0}")]
    InvalidDayCount(i64),

    /// A date filter was not in `YYYY-MM-DD` format.
    #[error("\"{0}\" is not a date in the format YYYY-MM-DD")]
    InvalidDate(String),

    /// A JSON API request had a body, path or query string that could not be
    /// parsed.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// A leave request referred to a person that does not exist.
    #[error("there is no person with the ID {0}")]
    UnknownPerson(PersonId),

    /// A leave request reused a request ID that belongs to a leave record for
    /// a different person or number of days.
    #[error("the request ID \"{0}\" has already been used for a different leave request")]
    RequestIdConflict(String),

    /// A person was given an empty first or last name.
    #[error("first and last name cannot be empty")]
    EmptyName,

    /// A person was given an email address that could not be parsed.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// A person was given a negative paid or non-paid balance.
    #[error("leave balances cannot be negative")]
    NegativeBalance,

    /// The email address is already used by another person.
    #[error("the email address is already used by another person")]
    DuplicateEmail,

    /// The leave request needs more days than the person has left.
    #[error(transparent)]
    InsufficientBalance(#[from] InsufficientBalance),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The conditional balance write did not match the balances read earlier
    /// in the same transaction.
    #[error("the balances for person {0} changed while granting leave")]
    StaleBalance(PersonId),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The server was configured with a timezone name that is not recognised.
    #[error("\"{0}\" is not a valid canonical timezone name")]
    InvalidTimezoneError(String),

    /// Tried to update a person that does not exist
    #[error("tried to update a person that is not in the database")]
    UpdateMissingPerson,

    /// Tried to delete a person that does not exist
    #[error("tried to delete a person that is not in the database")]
    DeleteMissingPerson,

    /// Tried to update a leave record that does not exist
    #[error("tried to update a leave record that is not in the database")]
    UpdateMissingLeave,

    /// Tried to delete a leave record that does not exist
    #[error("tried to delete a leave record that is not in the database")]
    DeleteMissingLeave,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("person.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The class of error, see [ErrorKind].
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidDayCount(_)
            | Error::InvalidDate(_)
            | Error::MalformedRequest(_)
            | Error::UnknownPerson(_)
            | Error::RequestIdConflict(_)
            | Error::EmptyName
            | Error::InvalidEmail(_)
            | Error::NegativeBalance
            | Error::DuplicateEmail => ErrorKind::Validation,
            Error::InsufficientBalance(_) => ErrorKind::InsufficientBalance,
            Error::NotFound
            | Error::UpdateMissingPerson
            | Error::DeleteMissingPerson
            | Error::UpdateMissingLeave
            | Error::DeleteMissingLeave => ErrorKind::NotFound,
            Error::StaleBalance(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::InvalidTimezoneError(_) => ErrorKind::Persistence,
        }
    }

    /// The HTTP status code used when this error is sent to a client.
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::InsufficientBalance => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            error if error.kind() == ErrorKind::NotFound => NotFoundError.into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            Error::InvalidTimezoneError(timezone) => {
                tracing::error!("could not get the UTC offset for the timezone {timezone}");
                InternalServerError {
                    description: "Invalid timezone setting",
                    fix: "Check the timezone the server was started with.",
                }
                .into_response()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let status_code = self.status_code();

        let alert = match self {
            Error::InsufficientBalance(shortfall) => Alert::Error {
                message: "Not enough leave".to_owned(),
                details: format!(
                    "{} day(s) were requested, but only {} paid and {} non-paid day(s) are left.",
                    shortfall.requested, shortfall.available_paid, shortfall.available_non_paid
                ),
            },
            Error::UnknownPerson(person_id) => Alert::Error {
                message: "Unknown person".to_owned(),
                details: format!("Could not find a person with the ID {person_id}"),
            },
            Error::InvalidDayCount(days) => Alert::Error {
                message: "Invalid number of days".to_owned(),
                details: format!("Leave must be at least one day long, got {days}."),
            },
            Error::InvalidDate(date) => Alert::Error {
                message: "Invalid date".to_owned(),
                details: format!("\"{date}\" is not a date in the format YYYY-MM-DD."),
            },
            Error::MalformedRequest(reason) => Alert::Error {
                message: "Invalid request".to_owned(),
                details: reason,
            },
            Error::RequestIdConflict(_) => Alert::Error {
                message: "Duplicate request".to_owned(),
                details: "This form has already been submitted with different details. \
                    Reload the page and try again."
                    .to_owned(),
            },
            error @ (Error::EmptyName
            | Error::InvalidEmail(_)
            | Error::NegativeBalance
            | Error::DuplicateEmail) => Alert::Error {
                message: "Invalid person details".to_owned(),
                details: error.to_string(),
            },
            Error::UpdateMissingPerson => Alert::Error {
                message: "Could not update person".to_owned(),
                details: "The person could not be found.".to_owned(),
            },
            Error::DeleteMissingPerson => Alert::Error {
                message: "Could not delete person".to_owned(),
                details: "The person could not be found. \
                    Try refreshing the page to see if the person has already been deleted."
                    .to_owned(),
            },
            Error::UpdateMissingLeave => Alert::Error {
                message: "Could not update leave".to_owned(),
                details: "The leave record could not be found.".to_owned(),
            },
            Error::DeleteMissingLeave => Alert::Error {
                message: "Could not delete leave".to_owned(),
                details: "The leave record could not be found. \
                    Try refreshing the page to see if it has already been deleted."
                    .to_owned(),
            },
            Error::NotFound => Alert::ErrorSimple {
                message: "The requested resource could not be found".to_owned(),
            },
            Error::StaleBalance(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::InvalidTimezoneError(_) => {
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                }
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
