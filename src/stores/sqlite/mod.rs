//! Contains the SQLite backed implementation of [TableStore](crate::TableStore).

mod table;

pub use table::{DEFAULT_DB_PATH, SQLiteTableStore, TABLE_NAME};
