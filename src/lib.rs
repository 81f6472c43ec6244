//! Transaction Summary is a small REST service for per-user transaction
//! statistics.
//!
//! A CSV file of transactions is uploaded to `POST /upload`, after which
//! `GET /summary/{user_id}` reports the maximum, minimum and mean
//! transaction amount of that user. The dataset lives in a [TableStore],
//! either held in memory ([InMemoryTableStore]) or loaded into a SQLite
//! table ([SQLiteTableStore]).

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
pub mod endpoints;
mod error;
mod ingestion;
mod logging;
mod not_found;
mod routing;
mod stores;
mod summary;
mod transaction;
mod upload;
mod user_id;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use error::Error;
pub use ingestion::{REQUIRED_COLUMNS, parse_csv};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::{DEFAULT_UPLOAD_LIMIT, build_router};
pub use stores::{DEFAULT_DB_PATH, InMemoryTableStore, SQLiteTableStore, TABLE_NAME, TableStore};
pub use summary::{get_summary, summarize};
pub use transaction::{Statistics, Transaction, UserId};
pub use upload::{UploadResponse, upload_csv, upload_file};
pub use user_id::{UserIdPath, UserIdRejection};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
