//! Reference target adapters
//!
//! - `sql` - parameterized `WHERE` fragments for PostgreSQL and SQLite
//! - `document` - MongoDB-style query documents

pub mod document;
pub mod sql;

pub use document::DocumentAdapter;
pub use sql::{Backend, SqlAdapter};
