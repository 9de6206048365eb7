//! Filter assembly for SQL `WHERE` clauses

use super::Backend;
use super::dialect::{MatchPosition, SqlDialect};
use super::fragment::{SqlFragment, SqlQuery};
use crate::filter::{TargetAdapter, Value};

/// Builds parameterized `WHERE` fragments for one backend
///
/// Values are always bound, never inlined. Junctions are parenthesized, so
/// fragments nest without precedence surprises.
#[derive(Debug, Clone, Copy)]
pub struct SqlAdapter {
    backend: Backend,
}

impl SqlAdapter {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// Render a fragment with this backend's placeholders
    pub fn render(&self, fragment: &SqlFragment) -> SqlQuery {
        fragment.render(self.dialect())
    }

    fn dialect(&self) -> &'static dyn SqlDialect {
        self.backend.dialect()
    }

    fn column(&self, key: &str) -> String {
        self.dialect().quote_identifier(key)
    }

    fn compare(&self, key: &str, operator: &str, value: Value) -> SqlFragment {
        SqlFragment::sql(format!("{} {} ", self.column(key), operator)).push_param(value)
    }

    fn junction(&self, filters: Vec<SqlFragment>, separator: &str, empty: &str) -> SqlFragment {
        if filters.is_empty() {
            return SqlFragment::sql(empty);
        }
        SqlFragment::sql("(")
            .push(SqlFragment::join(filters, separator))
            .push_sql(")")
    }

    fn membership(&self, key: &str, values: Vec<Value>, negated: bool) -> SqlFragment {
        if values.is_empty() {
            let dialect = self.dialect();
            return SqlFragment::sql(if negated {
                dialect.match_all()
            } else {
                dialect.match_none()
            });
        }
        let list = SqlFragment::join(
            values.into_iter().map(|v| SqlFragment::new().push_param(v)).collect(),
            ", ",
        );
        let keyword = if negated { "NOT IN" } else { "IN" };
        SqlFragment::sql(format!("{} {} (", self.column(key), keyword))
            .push(list)
            .push_sql(")")
    }

    fn pattern(&self, key: &str, literal: &str, position: MatchPosition) -> SqlFragment {
        let column = self.column(key);
        // An empty literal occurs in every string
        if literal.is_empty() {
            return SqlFragment::sql(format!("{} IS NOT NULL", column));
        }
        self.dialect().pattern_match(&column, literal, position)
    }
}

impl TargetAdapter for SqlAdapter {
    type Filter = SqlFragment;

    fn name(&self) -> &'static str {
        self.backend.name()
    }

    fn and(&self, filters: Vec<SqlFragment>) -> SqlFragment {
        self.junction(filters, " AND ", self.dialect().match_all())
    }

    fn or(&self, filters: Vec<SqlFragment>) -> SqlFragment {
        self.junction(filters, " OR ", self.dialect().match_none())
    }

    fn eq(&self, key: &str, value: Value) -> SqlFragment {
        self.compare(key, "=", value)
    }

    fn neq(&self, key: &str, value: Value) -> SqlFragment {
        self.compare(key, "<>", value)
    }

    fn gt(&self, key: &str, value: Value) -> SqlFragment {
        self.compare(key, ">", value)
    }

    fn gte(&self, key: &str, value: Value) -> SqlFragment {
        self.compare(key, ">=", value)
    }

    fn lt(&self, key: &str, value: Value) -> SqlFragment {
        self.compare(key, "<", value)
    }

    fn lte(&self, key: &str, value: Value) -> SqlFragment {
        self.compare(key, "<=", value)
    }

    fn is_in(&self, key: &str, values: Vec<Value>) -> SqlFragment {
        self.membership(key, values, false)
    }

    fn not_in(&self, key: &str, values: Vec<Value>) -> SqlFragment {
        self.membership(key, values, true)
    }

    fn prefix(&self, key: &str, literal: &str) -> SqlFragment {
        self.pattern(key, literal, MatchPosition::Prefix)
    }

    fn suffix(&self, key: &str, literal: &str) -> SqlFragment {
        self.pattern(key, literal, MatchPosition::Suffix)
    }

    fn contains(&self, key: &str, literal: &str) -> SqlFragment {
        self.pattern(key, literal, MatchPosition::Contains)
    }

    fn is_null(&self, key: &str) -> SqlFragment {
        SqlFragment::sql(format!("{} IS NULL", self.column(key)))
    }

    fn not_null(&self, key: &str) -> SqlFragment {
        SqlFragment::sql(format!("{} IS NOT NULL", self.column(key)))
    }
}
