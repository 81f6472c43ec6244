//! Contains the [TableStore] trait and its in-memory and SQLite implementations.

mod memory;
mod table;

pub mod sqlite;

pub use memory::InMemoryTableStore;
pub use sqlite::{DEFAULT_DB_PATH, SQLiteTableStore, TABLE_NAME};
pub use table::TableStore;
