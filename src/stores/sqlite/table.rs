//! Implements a table store that loads the dataset into a SQLite table.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use rusqlite::{Connection, OpenFlags, Row, Transaction as SqlTransaction, TransactionBehavior};

use crate::{Error, Statistics, Transaction, UserId, stores::TableStore};

/// The name of the table that holds the dataset.
pub const TABLE_NAME: &str = "dummy_transactions";

/// The database file used when no other path is configured.
pub const DEFAULT_DB_PATH: &str = "dummy_transactions.db";

/// How long to wait for another connection to release its lock on the database.
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Stores the dataset in the table [TABLE_NAME] of a SQLite database file.
///
/// A connection is opened for each operation and closed when the operation
/// returns, whether it succeeded or not. The dataset exists once the database
/// file exists and contains the table.
#[derive(Debug, Clone)]
pub struct SQLiteTableStore {
    db_path: PathBuf,
    busy_timeout: Duration,
}

impl SQLiteTableStore {
    /// Create a store for the database file at `db_path`.
    ///
    /// The file is not created until the first call to [TableStore::replace].
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Set how long an operation waits for another connection's lock before failing.
    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    /// The path of the database file.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open a connection for writing, creating the database file if needed.
    fn open(&self) -> Result<Connection, Error> {
        let connection = Connection::open(&self.db_path)?;
        connection.busy_timeout(self.busy_timeout)?;

        Ok(connection)
    }

    /// Run `query` in a read transaction.
    ///
    /// Returns `None` without creating the database file if the file or the
    /// table does not exist.
    fn read<T>(
        &self,
        query: impl FnOnce(&SqlTransaction<'_>) -> Result<T, Error>,
    ) -> Result<Option<T>, Error> {
        if !self.db_path.exists() {
            return Ok(None);
        }

        let mut connection = Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        connection.busy_timeout(self.busy_timeout)?;

        let tx = connection.transaction()?;

        let table_exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
            [TABLE_NAME],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(None);
        }

        query(&tx).map(Some)
    }

    fn map_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
        Ok(Transaction {
            transaction_id: row.get(0)?,
            user_id: row.get(1)?,
            product_id: row.get(2)?,
            timestamp: row.get(3)?,
            transaction_amount: row.get(4)?,
        })
    }
}

impl TableStore for SQLiteTableStore {
    /// Drop the table and fill a new one with `transactions`.
    ///
    /// Both steps happen in one SQL transaction, if any statement fails the
    /// transaction is rolled back and the previous dataset is kept.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the database cannot be opened or written.
    fn replace(&mut self, transactions: Vec<Transaction>) -> Result<(), Error> {
        let mut connection = self.open()?;
        let tx = connection.transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {TABLE_NAME};
            CREATE TABLE {TABLE_NAME} (
                transaction_id TEXT,
                user_id INTEGER,
                product_id INTEGER,
                timestamp TEXT,
                transaction_amount REAL
            );"
        ))?;

        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {TABLE_NAME} (transaction_id, user_id, product_id, timestamp, transaction_amount)
                 VALUES (?1, ?2, ?3, ?4, ?5)"
            ))?;

            for transaction in &transactions {
                stmt.execute((
                    &transaction.transaction_id,
                    transaction.user_id,
                    transaction.product_id,
                    &transaction.timestamp,
                    transaction.transaction_amount,
                ))?;
            }
        }

        tx.commit()?;

        tracing::debug!(
            "Stored {} transactions in {}",
            transactions.len(),
            self.db_path.display()
        );

        Ok(())
    }

    fn exists(&self) -> Result<bool, Error> {
        Ok(self.read(|_| Ok(()))?.is_some())
    }

    fn find_by_user(&self, user_id: UserId) -> Result<Vec<Transaction>, Error> {
        let transactions = self.read(|tx| {
            tx.prepare(&format!(
                "SELECT transaction_id, user_id, product_id, timestamp, transaction_amount
                 FROM {TABLE_NAME} WHERE user_id = ?1 ORDER BY rowid"
            ))?
            .query_map([user_id], Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect::<Result<Vec<_>, _>>()
        })?;

        Ok(transactions.unwrap_or_default())
    }

    /// Calculate the statistics with a single aggregate query.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the query fails.
    fn aggregate(&self, user_id: UserId) -> Result<Option<Statistics>, Error> {
        let statistics = self.read(|tx| {
            let (count, maximum, minimum, mean): (i64, Option<f64>, Option<f64>, Option<f64>) = tx
                .query_row(
                    &format!(
                        "SELECT COUNT(*), MAX(transaction_amount), MIN(transaction_amount), AVG(transaction_amount)
                         FROM {TABLE_NAME} WHERE user_id = ?1"
                    ),
                    [user_id],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
                )?;

            let statistics = match (count, maximum, minimum, mean) {
                (1.., Some(maximum), Some(minimum), Some(mean)) => Some(Statistics {
                    maximum,
                    minimum,
                    mean,
                }),
                _ => None,
            };

            Ok(statistics)
        })?;

        Ok(statistics.flatten())
    }

    /// Delete the database file.
    ///
    /// # Errors
    /// Returns an [Error::Io] if the file exists but cannot be deleted.
    fn clear(&mut self) -> Result<(), Error> {
        match std::fs::remove_file(&self.db_path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod sqlite_table_store_tests {
    use std::time::Duration;

    use rusqlite::Connection;

    use crate::{
        Error, SQLiteTableStore, Statistics, TableStore,
        stores::sqlite::TABLE_NAME,
        test_utils::{TempDbPath, THREE_USER_CSV, transaction},
    };

    fn get_test_store(db_path: &TempDbPath) -> SQLiteTableStore {
        SQLiteTableStore::new(db_path.path())
    }

    #[test]
    fn missing_file_does_not_exist() {
        let db_path = TempDbPath::new();
        let store = get_test_store(&db_path);

        assert_eq!(store.exists(), Ok(false));
        assert_eq!(store.aggregate(1), Ok(None));
        assert_eq!(store.find_by_user(1), Ok(vec![]));
        assert!(
            !db_path.path().exists(),
            "reading from the store should not create the database file"
        );
    }

    #[test]
    fn file_without_table_does_not_exist() {
        let db_path = TempDbPath::new();
        Connection::open(db_path.path())
            .and_then(|connection| connection.execute_batch("CREATE TABLE other (id INTEGER);"))
            .expect("Could not create database file");
        let store = get_test_store(&db_path);

        assert_eq!(store.exists(), Ok(false));
        assert_eq!(store.aggregate(1), Ok(None));
    }

    #[test]
    fn empty_dataset_exists() {
        let db_path = TempDbPath::new();
        let mut store = get_test_store(&db_path);

        store.replace(vec![]).unwrap();

        assert_eq!(store.exists(), Ok(true));
        assert_eq!(store.aggregate(1), Ok(None));
    }

    #[test]
    fn aggregates_three_user_fixture() {
        let db_path = TempDbPath::new();
        let mut store = get_test_store(&db_path);
        store
            .replace(crate::parse_csv(THREE_USER_CSV.as_bytes()).unwrap())
            .unwrap();

        assert_eq!(
            store.aggregate(1),
            Ok(Some(Statistics {
                maximum: 30.0,
                minimum: 10.0,
                mean: 20.0
            }))
        );
        assert_eq!(
            store.aggregate(2),
            Ok(Some(Statistics {
                maximum: 15.0,
                minimum: 5.0,
                mean: 10.0
            }))
        );
        assert_eq!(
            store.aggregate(3),
            Ok(Some(Statistics {
                maximum: 50.0,
                minimum: 50.0,
                mean: 50.0
            }))
        );
        assert_eq!(store.aggregate(4), Ok(None));
        assert_eq!(store.aggregate(-1), Ok(None));
    }

    #[test]
    fn stores_rows_in_named_table() {
        let db_path = TempDbPath::new();
        let mut store = get_test_store(&db_path);
        store
            .replace(vec![transaction("a", 1, 2.0), transaction("b", 2, 3.0)])
            .unwrap();

        let connection = Connection::open(db_path.path()).unwrap();
        let count: i64 = connection
            .query_row(&format!("SELECT COUNT(*) FROM {TABLE_NAME}"), [], |row| {
                row.get(0)
            })
            .unwrap();

        assert_eq!(count, 2);
    }

    #[test]
    fn replace_discards_previous_dataset() {
        let db_path = TempDbPath::new();
        let mut store = get_test_store(&db_path);
        store
            .replace(vec![transaction("a", 1, 100.0), transaction("b", 2, 1.0)])
            .unwrap();

        store.replace(vec![transaction("c", 1, 4.0)]).unwrap();

        assert_eq!(store.find_by_user(1), Ok(vec![transaction("c", 1, 4.0)]));
        assert_eq!(store.aggregate(2), Ok(None));
    }

    #[test]
    fn find_by_user_keeps_stored_order() {
        let db_path = TempDbPath::new();
        let mut store = get_test_store(&db_path);
        let want = vec![transaction("x", 7, 3.0), transaction("y", 7, 1.0)];
        store
            .replace(vec![
                want[0].clone(),
                transaction("z", 8, 2.0),
                want[1].clone(),
            ])
            .unwrap();

        assert_eq!(store.find_by_user(7), Ok(want));
    }

    #[test]
    fn failed_replace_keeps_previous_dataset() {
        let db_path = TempDbPath::new();
        let mut store = get_test_store(&db_path);
        store.replace(vec![transaction("a", 1, 2.0)]).unwrap();

        // Holding an exclusive lock makes the replacement fail with SQLITE_BUSY.
        let blocker = Connection::open(db_path.path()).unwrap();
        blocker.execute_batch("BEGIN EXCLUSIVE;").unwrap();
        let mut impatient_store =
            SQLiteTableStore::new(db_path.path()).with_busy_timeout(Duration::ZERO);

        let got = impatient_store.replace(vec![transaction("b", 1, 9.0)]);
        drop(blocker);

        assert!(
            matches!(got, Err(Error::SqlError(_))),
            "want a SQL error, got {got:?}"
        );
        assert_eq!(store.find_by_user(1), Ok(vec![transaction("a", 1, 2.0)]));
    }

    #[test]
    fn clear_deletes_the_database_file() {
        let db_path = TempDbPath::new();
        let mut store = get_test_store(&db_path);
        store.replace(vec![transaction("a", 1, 2.0)]).unwrap();

        store.clear().unwrap();

        assert_eq!(store.exists(), Ok(false));
        assert!(!db_path.path().exists());
        assert_eq!(store.clear(), Ok(()), "clearing twice should succeed");
    }

    #[test]
    fn unreadable_database_is_a_storage_error() {
        let db_path = TempDbPath::new();
        std::fs::write(db_path.path(), b"this is not a SQLite database").unwrap();
        let store = get_test_store(&db_path);

        let got = store.aggregate(1);

        assert!(
            matches!(got, Err(Error::SqlError(_))),
            "want a SQL error, got {got:?}"
        );
    }
}
