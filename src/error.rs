//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The uploaded file name does not end with `.csv`.
    #[error("Uploaded file is not a CSV file")]
    NotCsv,

    /// The uploaded bytes are not valid UTF-8.
    #[error("Decoding error: File encoding is not UTF-8")]
    InvalidEncoding,

    /// The header row of the CSV is missing one or more required columns.
    ///
    /// Holds the names of the missing columns.
    #[error("the CSV header is missing the columns {0:?}")]
    MissingColumns(Vec<String>),

    /// A value in a CSV row could not be converted to the type of its column,
    /// or the row has the wrong number of fields.
    ///
    /// `row` counts data rows starting from 1, row 0 is the header.
    #[error("invalid value in CSV row {row}: {message}")]
    InvalidValue {
        /// The data row that failed to parse.
        row: usize,
        /// A description of the parse failure.
        message: String,
    },

    /// A summary was requested before any dataset was uploaded.
    #[error("CSV file has not been uploaded")]
    NotUploaded,

    /// The dataset has no transactions for the requested user.
    #[error("User ID not found in CSV file")]
    UserNotFound,

    /// The multipart form did not have a `file` field.
    #[error("the multipart form has no field named \"file\"")]
    MissingFileField,

    /// The `file` field of the multipart form is a plain value, not a file.
    #[error("the multipart field \"file\" has no file name")]
    FileFieldNotAFile,

    /// The multipart form could not be parsed.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// The request body is larger than the configured upload limit.
    #[error("the uploaded file exceeds the upload limit")]
    UploadTooLarge,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An I/O error occurred while managing the database file.
    #[error("an I/O error occurred with the database file: {0}")]
    Io(String),

    /// The lock guarding the in-memory table was poisoned.
    #[error("could not acquire the table lock")]
    StoreLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", error);
        Error::SqlError(error)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        tracing::error!("an I/O error occurred: {}", error);
        Error::Io(error.to_string())
    }
}

impl Error {
    /// The status code and client facing message for this error.
    ///
    /// Schema and value errors share a message so that both store backends
    /// report malformed tables identically.
    fn status_and_detail(&self) -> (StatusCode, &'static str) {
        match self {
            Error::NotCsv => (StatusCode::BAD_REQUEST, "Uploaded file is not a CSV file"),
            Error::InvalidEncoding => (
                StatusCode::BAD_REQUEST,
                "Decoding error: File encoding is not UTF-8",
            ),
            Error::MissingColumns(_) | Error::InvalidValue { .. } => (
                StatusCode::BAD_REQUEST,
                "Table is missing some of the required rows",
            ),
            Error::NotUploaded => (StatusCode::BAD_REQUEST, "CSV file has not been uploaded"),
            Error::UserNotFound => (StatusCode::NOT_FOUND, "User ID not found in CSV file"),
            Error::MissingFileField => (StatusCode::UNPROCESSABLE_ENTITY, "Field required"),
            Error::FileFieldNotAFile => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Expected an uploaded file",
            ),
            Error::MultipartError(_) => (StatusCode::BAD_REQUEST, "Could not parse multipart form"),
            Error::UploadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Uploaded file is too large",
            ),
            Error::SqlError(_) | Error::Io(_) | Error::StoreLockError => {
                (StatusCode::BAD_REQUEST, "Error with the internal database")
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status_code, detail) = self.status_and_detail();

        if matches!(
            self,
            Error::SqlError(_) | Error::Io(_) | Error::StoreLockError
        ) {
            tracing::error!("Request failed with a storage error: {}", self);
        } else {
            tracing::debug!("Request failed: {}", self);
        }

        (status_code, Json(json!({ "detail": detail }))).into_response()
    }
}
