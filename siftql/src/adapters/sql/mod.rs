//! SQL target adapter for multi-database support
//!
//! Filters are assembled as [`SqlFragment`]s: SQL text interleaved with bound
//! values. A fragment is rendered for one backend at the end, which numbers
//! the placeholders in the order the values appear.

mod adapter;
mod dialect;
mod fragment;
mod postgres_dialect;
mod sqlite_dialect;

use std::str::FromStr;

pub use adapter::SqlAdapter;
pub use dialect::{MatchPosition, SqlDialect};
pub use fragment::{SqlFragment, SqlPart, SqlQuery};
pub use postgres_dialect::PostgresDialect;
pub use sqlite_dialect::SqliteDialect;

/// Database backend identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    Postgres,
}

impl Backend {
    /// Get the SQL dialect for this backend
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Backend::Sqlite => &SqliteDialect,
            Backend::Postgres => &PostgresDialect,
        }
    }

    /// Get the backend name
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Sqlite => "sqlite",
            Backend::Postgres => "postgres",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(Backend::Sqlite),
            "postgres" | "postgresql" => Ok(Backend::Postgres),
            other => Err(format!("unknown SQL backend '{}'", other)),
        }
    }
}
