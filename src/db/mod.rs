pub mod sqlite;

pub use sqlite::{establish_connection, mask_connection_string, sqlite_path, DbError};
