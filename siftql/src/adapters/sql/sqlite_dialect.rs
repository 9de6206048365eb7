//! SQLite SQL dialect implementation

use super::SqlDialect;
use super::dialect::MatchPosition;
use super::fragment::SqlFragment;
use crate::filter::Value;

/// SQLite SQL dialect
pub struct SqliteDialect;

impl SqlDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn pattern_match(&self, column: &str, literal: &str, position: MatchPosition) -> SqlFragment {
        // SQLite LIKE ignores ASCII case; compare substrings instead
        let literal = Value::String(literal.to_string());
        match position {
            MatchPosition::Prefix => SqlFragment::sql(format!("substr({}, 1, length(", column))
                .push_param(literal.clone())
                .push_sql(")) = ")
                .push_param(literal),
            MatchPosition::Suffix => SqlFragment::sql(format!("substr({}, -length(", column))
                .push_param(literal.clone())
                .push_sql(")) = ")
                .push_param(literal),
            MatchPosition::Contains => SqlFragment::sql(format!("instr({}, ", column))
                .push_param(literal)
                .push_sql(") > 0"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder() {
        assert_eq!(SqliteDialect.placeholder(1), "?");
        assert_eq!(SqliteDialect.placeholder(7), "?");
    }

    #[test]
    fn test_prefix_binds_literal_twice() {
        let query = SqliteDialect
            .pattern_match("\"name\"", "Jo_", MatchPosition::Prefix)
            .render(&SqliteDialect);
        assert_eq!(query.sql, "substr(\"name\", 1, length(?)) = ?");
        assert_eq!(
            query.params,
            vec![Value::String("Jo_".into()), Value::String("Jo_".into())]
        );
    }

    #[test]
    fn test_suffix_and_contains() {
        let suffix = SqliteDialect
            .pattern_match("\"name\"", "son", MatchPosition::Suffix)
            .render(&SqliteDialect);
        assert_eq!(suffix.sql, "substr(\"name\", -length(?)) = ?");

        let contains = SqliteDialect
            .pattern_match("\"name\"", "%", MatchPosition::Contains)
            .render(&SqliteDialect);
        assert_eq!(contains.sql, "instr(\"name\", ?) > 0");
        assert_eq!(contains.params, vec![Value::String("%".into())]);
    }
}
