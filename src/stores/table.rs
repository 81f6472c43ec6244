//! Defines the table store trait.

use crate::{Error, Statistics, Transaction, UserId};

/// Owns the current dataset of transactions and answers queries about it.
///
/// There is at most one dataset at a time. Each call to [TableStore::replace]
/// swaps it out wholesale, readers see either the old or the new dataset and
/// never a partially written one.
pub trait TableStore {
    /// Discard the current dataset, if any, and store `transactions` in its place.
    fn replace(&mut self, transactions: Vec<Transaction>) -> Result<(), Error>;

    /// Whether a dataset has been stored.
    ///
    /// This is true after a successful [TableStore::replace], even if the
    /// dataset is empty.
    fn exists(&self) -> Result<bool, Error>;

    /// Retrieve the transactions of `user_id` in the order they were stored.
    ///
    /// Returns an empty vector if the user has no transactions or there is no dataset.
    fn find_by_user(&self, user_id: UserId) -> Result<Vec<Transaction>, Error>;

    /// Calculate the statistics of the transaction amounts of `user_id`.
    ///
    /// Returns `None` if the user has no transactions or there is no dataset.
    fn aggregate(&self, user_id: UserId) -> Result<Option<Statistics>, Error>;

    /// Discard the current dataset so that [TableStore::exists] is false again.
    fn clear(&mut self) -> Result<(), Error>;
}
