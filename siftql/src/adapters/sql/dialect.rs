//! SQL dialect trait for multi-database support
//!
//! This trait defines the interface for generating database-specific SQL syntax.

use super::fragment::SqlFragment;
use crate::filter::Value;
use crate::utils::sql::{escape_like_pattern, quote_identifier};

/// Where a pattern literal must occur in the column value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPosition {
    Prefix,
    Suffix,
    Contains,
}

/// SQL dialect trait for generating database-specific SQL
///
/// Different databases have different syntax for:
/// - Parameter placeholders (? vs $1)
/// - Case-sensitive substring matching
pub trait SqlDialect: Send + Sync {
    /// Get the dialect name
    fn name(&self) -> &'static str;

    /// Generate a parameter placeholder for the given index (1-based)
    ///
    /// - SQLite: Always returns "?"
    /// - PostgreSQL: Returns "$1", "$2", etc.
    fn placeholder(&self, index: usize) -> String;

    /// Quote a storage key as a column reference
    fn quote_identifier(&self, key: &str) -> String {
        quote_identifier(key)
    }

    /// Predicate that holds for every row
    fn match_all(&self) -> &'static str {
        "1=1"
    }

    /// Predicate that holds for no row
    fn match_none(&self) -> &'static str {
        "1=0"
    }

    /// Case-sensitive match of a literal against a text column
    ///
    /// The literal is non-empty and matched verbatim. Default is an escaped
    /// `LIKE` pattern.
    fn pattern_match(&self, column: &str, literal: &str, position: MatchPosition) -> SqlFragment {
        let escaped = escape_like_pattern(literal);
        let pattern = match position {
            MatchPosition::Prefix => format!("{}%", escaped),
            MatchPosition::Suffix => format!("%{}", escaped),
            MatchPosition::Contains => format!("%{}%", escaped),
        };
        SqlFragment::sql(format!("{} LIKE ", column))
            .push_param(Value::String(pattern))
            .push_sql(" ESCAPE '\\'")
    }
}
