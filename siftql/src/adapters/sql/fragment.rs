//! SQL fragments with bound values

use serde::Serialize;

use super::dialect::SqlDialect;
use crate::filter::Value;

/// One piece of a fragment
#[derive(Debug, Clone, PartialEq)]
pub enum SqlPart {
    Sql(String),
    Param(Value),
}

/// SQL text with values kept apart from it until rendering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFragment {
    parts: Vec<SqlPart>,
}

/// Rendered statement text with its parameters in placeholder order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl SqlFragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fragment made of plain SQL text
    pub fn sql(text: impl Into<String>) -> Self {
        Self::new().push_sql(text)
    }

    pub fn push_sql(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return self;
        }
        match self.parts.last_mut() {
            Some(SqlPart::Sql(last)) => last.push_str(&text),
            _ => self.parts.push(SqlPart::Sql(text)),
        }
        self
    }

    pub fn push_param(mut self, value: Value) -> Self {
        self.parts.push(SqlPart::Param(value));
        self
    }

    pub fn push(self, other: SqlFragment) -> Self {
        other.parts.into_iter().fold(self, |acc, part| match part {
            SqlPart::Sql(text) => acc.push_sql(text),
            SqlPart::Param(value) => acc.push_param(value),
        })
    }

    /// Join fragments with a separator
    pub fn join(fragments: Vec<SqlFragment>, separator: &str) -> Self {
        fragments
            .into_iter()
            .enumerate()
            .fold(Self::new(), |acc, (i, fragment)| {
                let acc = if i == 0 { acc } else { acc.push_sql(separator) };
                acc.push(fragment)
            })
    }

    pub fn parts(&self) -> &[SqlPart] {
        &self.parts
    }

    pub fn params(&self) -> impl Iterator<Item = &Value> {
        self.parts.iter().filter_map(|part| match part {
            SqlPart::Param(value) => Some(value),
            SqlPart::Sql(_) => None,
        })
    }

    /// Render with the dialect's placeholders (1-based)
    pub fn render(&self, dialect: &dyn SqlDialect) -> SqlQuery {
        let mut sql = String::new();
        let mut params = Vec::new();
        for part in &self.parts {
            match part {
                SqlPart::Sql(text) => sql.push_str(text),
                SqlPart::Param(value) => {
                    params.push(value.clone());
                    sql.push_str(&dialect.placeholder(params.len()));
                }
            }
        }
        SqlQuery { sql, params }
    }
}
