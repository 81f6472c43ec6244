//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/summary/{user_id}', use [format_endpoint].

use std::fmt::Display;

/// The route for uploading a CSV file of transactions.
pub const UPLOAD: &str = "/upload";
/// The route for getting the transaction statistics of a user.
pub const SUMMARY: &str = "/summary/{user_id}";

/// Replace the parameter in `endpoint_path` with `value`.
///
/// A parameter is a string that starts with a left brace and ends with a
/// right brace. For example, in the endpoint path '/summary/{user_id}',
/// '{user_id}' is the parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, value: impl Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        value,
        &endpoint_path[param_end..]
    )
}
