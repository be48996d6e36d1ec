mod sqlite;

pub use sqlite::SqliteRecordStore;
