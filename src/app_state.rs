//! Implements a struct that holds the state of the REST server.

use crate::{TableStore, routing::DEFAULT_UPLOAD_LIMIT};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState<S>
where
    S: TableStore + Clone + Send + Sync + 'static,
{
    /// The store that owns the uploaded dataset.
    pub table_store: S,
    /// The largest request body, in bytes, accepted by the upload route.
    pub upload_limit: usize,
}

impl<S> AppState<S>
where
    S: TableStore + Clone + Send + Sync + 'static,
{
    /// Create a new [AppState] with the default upload limit.
    pub fn new(table_store: S) -> Self {
        Self {
            table_store,
            upload_limit: DEFAULT_UPLOAD_LIMIT,
        }
    }

    /// Set the largest request body, in bytes, accepted by the upload route.
    pub fn with_upload_limit(mut self, upload_limit: usize) -> Self {
        self.upload_limit = upload_limit;
        self
    }
}
