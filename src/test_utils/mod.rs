#![allow(missing_docs)]

pub(crate) mod fixtures;
pub(crate) mod http;
pub(crate) mod temp_db;

pub(crate) use fixtures::{THREE_USER_CSV, THREE_USER_CSV_REPLACEMENT, transaction};
pub(crate) use http::{assert_content_type, must_get_json};
pub(crate) use temp_db::TempDbPath;
