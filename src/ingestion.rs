//! Parses uploaded CSV files into transaction records.

use csv::{ErrorKind, ReaderBuilder, Trim};

use crate::{Error, Transaction};

/// The columns that the header row of an uploaded CSV must contain.
///
/// Other columns may be present and are ignored.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "transaction_id",
    "user_id",
    "product_id",
    "timestamp",
    "transaction_amount",
];

/// Parse the raw bytes of an uploaded CSV file into transactions.
///
/// Expects `bytes` to be UTF-8 encoded, comma separated values with a header
/// row containing every column in [REQUIRED_COLUMNS]. Rows are returned in
/// the order they appear in the file. Parsing is all or nothing, a single bad
/// row rejects the whole file.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidEncoding] if `bytes` is not valid UTF-8,
/// - [Error::MissingColumns] if the header row lacks a required column,
/// - or [Error::InvalidValue] if a row has a non-numeric `user_id`,
///   `product_id` or `transaction_amount`, an amount that is not finite
///   (`NaN`, `inf` or out of range), or the wrong number of fields.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<Transaction>, Error> {
    let text = std::str::from_utf8(bytes).map_err(|error| {
        tracing::debug!("Uploaded file is not valid UTF-8: {error}");
        Error::InvalidEncoding
    })?;

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|error| Error::InvalidValue {
            row: 0,
            message: error.to_string(),
        })?;

    let missing_columns: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|header| header == **column))
        .map(|column| column.to_string())
        .collect();

    if !missing_columns.is_empty() {
        tracing::debug!("CSV header {headers:?} is missing {missing_columns:?}");
        return Err(Error::MissingColumns(missing_columns));
    }

    reader
        .deserialize::<Transaction>()
        .enumerate()
        .map(|(index, maybe_transaction)| {
            let row = index + 1;
            let transaction = maybe_transaction.map_err(|error| {
                let message = match error.kind() {
                    ErrorKind::Deserialize { err, .. } => err.to_string(),
                    ErrorKind::UnequalLengths {
                        expected_len, len, ..
                    } => format!("expected {expected_len} fields, found {len}"),
                    _ => error.to_string(),
                };
                tracing::debug!("Could not parse CSV row {row}: {message}");

                Error::InvalidValue { row, message }
            })?;

            if !transaction.transaction_amount.is_finite() {
                let message = format!(
                    "transaction_amount must be a finite number, got {}",
                    transaction.transaction_amount
                );
                tracing::debug!("Could not parse CSV row {row}: {message}");

                return Err(Error::InvalidValue { row, message });
            }

            Ok(transaction)
        })
        .collect()
}
