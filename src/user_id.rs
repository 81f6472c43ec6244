//! An extractor for the `user_id` path parameter of the summary route.

use axum::{
    Json,
    extract::{FromRequestParts, Path, rejection::PathRejection},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::UserId;

/// The `user_id` path parameter, validated as an integer.
///
/// Holds `None` when the parameter is an integer that does not fit in a
/// [UserId]. No stored transaction can have such a user ID.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserIdPath(pub Option<UserId>);

/// The rejection for a `user_id` path parameter that is not an integer.
#[derive(Debug)]
pub enum UserIdRejection {
    /// The parameter is not an integer.
    NotAnInteger(String),
    /// The path parameters could not be extracted at all.
    Path(PathRejection),
}

impl<S> FromRequestParts<S> for UserIdPath
where
    S: Send + Sync,
{
    type Rejection = UserIdRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw_user_id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(UserIdRejection::Path)?;

        parse_user_id(&raw_user_id)
    }
}

fn parse_user_id(raw_user_id: &str) -> Result<UserIdPath, UserIdRejection> {
    use std::num::IntErrorKind;

    match raw_user_id.parse::<UserId>() {
        Ok(user_id) => Ok(UserIdPath(Some(user_id))),
        Err(error)
            if matches!(
                error.kind(),
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow
            ) =>
        {
            Ok(UserIdPath(None))
        }
        Err(_) => Err(UserIdRejection::NotAnInteger(raw_user_id.to_owned())),
    }
}

impl IntoResponse for UserIdRejection {
    fn into_response(self) -> Response {
        match self {
            UserIdRejection::NotAnInteger(input) => {
                tracing::debug!("Rejected user ID '{input}', it is not an integer");

                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({
                        "detail": [{
                            "type": "int_parsing",
                            "loc": ["path", "user_id"],
                            "msg": "Input should be a valid integer, unable to parse string as an integer",
                            "input": input,
                        }]
                    })),
                )
                    .into_response()
            }
            UserIdRejection::Path(rejection) => rejection.into_response(),
        }
    }
}
