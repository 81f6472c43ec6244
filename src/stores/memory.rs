//! Implements a table store that keeps the dataset in process memory.

use std::sync::{Arc, RwLock};

use crate::{Error, Statistics, Transaction, UserId, stores::TableStore};

/// Stores the dataset in memory.
///
/// Clones share the same dataset. A replacement builds the new table before
/// taking the write lock and then swaps a single reference, so readers only
/// ever hold a complete table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTableStore {
    table: Arc<RwLock<Option<Arc<Vec<Transaction>>>>>,
}

impl InMemoryTableStore {
    /// Create a store with no dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a reference to the current table without holding the lock.
    fn snapshot(&self) -> Result<Option<Arc<Vec<Transaction>>>, Error> {
        let table = self.table.read().map_err(|error| {
            tracing::error!("could not acquire the table lock: {error}");
            Error::StoreLockError
        })?;

        Ok(table.clone())
    }
}

impl TableStore for InMemoryTableStore {
    fn replace(&mut self, transactions: Vec<Transaction>) -> Result<(), Error> {
        let new_table = Arc::new(transactions);

        let mut table = self.table.write().map_err(|error| {
            tracing::error!("could not acquire the table lock: {error}");
            Error::StoreLockError
        })?;
        *table = Some(new_table);

        Ok(())
    }

    fn exists(&self) -> Result<bool, Error> {
        Ok(self.snapshot()?.is_some())
    }

    fn find_by_user(&self, user_id: UserId) -> Result<Vec<Transaction>, Error> {
        let transactions = match self.snapshot()? {
            Some(table) => table
                .iter()
                .filter(|transaction| transaction.user_id == user_id)
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        Ok(transactions)
    }

    fn aggregate(&self, user_id: UserId) -> Result<Option<Statistics>, Error> {
        let Some(table) = self.snapshot()? else {
            return Ok(None);
        };

        Ok(Statistics::from_amounts(
            table
                .iter()
                .filter(|transaction| transaction.user_id == user_id)
                .map(|transaction| transaction.transaction_amount),
        ))
    }

    fn clear(&mut self) -> Result<(), Error> {
        let mut table = self.table.write().map_err(|error| {
            tracing::error!("could not acquire the table lock: {error}");
            Error::StoreLockError
        })?;
        *table = None;

        Ok(())
    }
}
