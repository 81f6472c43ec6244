//! The route handler for uploading a CSV file of transactions.

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, TableStore, parse_csv};

/// The name of the multipart form field that holds the CSV file.
const FILE_FIELD: &str = "file";

/// The JSON body sent after a successful upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// A message naming the uploaded file.
    pub message: String,
}

/// Replace the dataset in `store` with the transactions in a CSV file.
///
/// `file_name` must end with `.csv`. If any step fails the dataset in
/// `store` is left as it was.
///
/// # Errors
/// This function will return a:
/// - [Error::NotCsv] if `file_name` does not end with `.csv`,
/// - [Error::InvalidEncoding], [Error::MissingColumns] or [Error::InvalidValue]
///   if `bytes` is not a valid transactions table (see [parse_csv]),
/// - or a storage error if the dataset could not be replaced.
pub fn upload_file<S: TableStore>(
    store: &mut S,
    file_name: &str,
    bytes: &[u8],
) -> Result<UploadResponse, Error> {
    if !file_name.ends_with(".csv") {
        tracing::debug!("Rejected upload of '{file_name}', it is not a CSV file");
        return Err(Error::NotCsv);
    }

    let transactions = parse_csv(bytes)?;
    let transaction_count = transactions.len();

    store.replace(transactions)?;

    tracing::info!("Replaced dataset with {transaction_count} transactions from '{file_name}'");

    Ok(UploadResponse {
        message: format!("{file_name} uploaded successfully"),
    })
}

/// Route handler for uploading a CSV file in the multipart form field `file`.
///
/// Other fields in the form are ignored. A `file` part without a file name is
/// a plain form value and is rejected with [Error::FileFieldNotAFile].
pub async fn upload_csv<S>(
    State(mut state): State<AppState<S>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, Error>
where
    S: TableStore + Clone + Send + Sync + 'static,
{
    while let Some(field) = multipart.next_field().await.map_err(map_multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let Some(file_name) = field.file_name().map(str::to_owned) else {
            tracing::debug!("Multipart field '{FILE_FIELD}' has no file name");
            return Err(Error::FileFieldNotAFile);
        };
        let bytes = field.bytes().await.map_err(map_multipart_error)?;

        tracing::debug!("Received file '{}' that is {} bytes", file_name, bytes.len());

        return upload_file(&mut state.table_store, &file_name, &bytes).map(Json);
    }

    Err(Error::MissingFileField)
}

fn map_multipart_error(error: MultipartError) -> Error {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::debug!("Upload exceeded the body limit: {error}");
        return Error::UploadTooLarge;
    }

    tracing::debug!("Could not read multipart form: {error}");
    Error::MultipartError(error.body_text())
}
