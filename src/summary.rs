//! The route handler for getting the transaction statistics of a user.

use axum::{Json, extract::State};

use crate::{AppState, Error, Statistics, TableStore, UserId, UserIdPath};

/// Get the statistics of the transaction amounts of `user_id` in `store`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotUploaded] if no dataset has been stored,
/// - [Error::UserNotFound] if the dataset has no transactions for `user_id`,
/// - or a storage error if the store could not be read.
pub fn summarize<S: TableStore>(store: &S, user_id: UserId) -> Result<Statistics, Error> {
    if !store.exists()? {
        return Err(Error::NotUploaded);
    }

    store.aggregate(user_id)?.ok_or(Error::UserNotFound)
}

/// Route handler for the statistics of the user in the path.
///
/// A user ID too large to be stored is reported like any other user
/// without transactions.
pub async fn get_summary<S>(
    State(state): State<AppState<S>>,
    UserIdPath(user_id): UserIdPath,
) -> Result<Json<Statistics>, Error>
where
    S: TableStore + Clone + Send + Sync + 'static,
{
    let Some(user_id) = user_id else {
        return match state.table_store.exists()? {
            true => Err(Error::UserNotFound),
            false => Err(Error::NotUploaded),
        };
    };

    summarize(&state.table_store, user_id).map(Json)
}
