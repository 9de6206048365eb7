//! Document-store target adapter
//!
//! Produces MongoDB-style query documents as JSON. Storage keys are used as
//! dotted paths unchanged; values use extended JSON where plain JSON would
//! lose information (`$numberDecimal`, `$date`).

use serde_json::{Value as Json, json};

use crate::filter::{TargetAdapter, Value};

#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentAdapter;

impl DocumentAdapter {
    pub fn new() -> Self {
        Self
    }

    fn compare(&self, key: &str, operator: &str, value: Value) -> Json {
        json!({ key: { operator: to_json(value) } })
    }

    fn regex(&self, key: &str, pattern: String) -> Json {
        json!({ key: { "$regex": pattern } })
    }
}

/// Convert a typed value to its document representation
pub fn to_json(value: Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Integer(v) => json!(v),
        Value::Float(v) => json!(v),
        Value::Decimal(v) => json!({ "$numberDecimal": v.to_string() }),
        Value::Boolean(v) => json!(v),
        Value::DateTime(_) => json!({ "$date": value.to_string() }),
        Value::String(v) => json!(v),
    }
}

impl TargetAdapter for DocumentAdapter {
    type Filter = Json;

    fn name(&self) -> &'static str {
        "document"
    }

    fn and(&self, filters: Vec<Json>) -> Json {
        if filters.is_empty() {
            return json!({});
        }
        json!({ "$and": filters })
    }

    fn or(&self, filters: Vec<Json>) -> Json {
        // $or rejects an empty array; negating the match-all document matches nothing
        if filters.is_empty() {
            return json!({ "$nor": [{}] });
        }
        json!({ "$or": filters })
    }

    fn eq(&self, key: &str, value: Value) -> Json {
        self.compare(key, "$eq", value)
    }

    fn neq(&self, key: &str, value: Value) -> Json {
        self.compare(key, "$ne", value)
    }

    fn gt(&self, key: &str, value: Value) -> Json {
        self.compare(key, "$gt", value)
    }

    fn gte(&self, key: &str, value: Value) -> Json {
        self.compare(key, "$gte", value)
    }

    fn lt(&self, key: &str, value: Value) -> Json {
        self.compare(key, "$lt", value)
    }

    fn lte(&self, key: &str, value: Value) -> Json {
        self.compare(key, "$lte", value)
    }

    fn is_in(&self, key: &str, values: Vec<Value>) -> Json {
        let values: Vec<Json> = values.into_iter().map(to_json).collect();
        json!({ key: { "$in": values } })
    }

    fn not_in(&self, key: &str, values: Vec<Value>) -> Json {
        let values: Vec<Json> = values.into_iter().map(to_json).collect();
        json!({ key: { "$nin": values } })
    }

    fn prefix(&self, key: &str, literal: &str) -> Json {
        self.regex(key, format!("^{}", regex::escape(literal)))
    }

    fn suffix(&self, key: &str, literal: &str) -> Json {
        self.regex(key, format!("{}$", regex::escape(literal)))
    }

    fn contains(&self, key: &str, literal: &str) -> Json {
        self.regex(key, regex::escape(literal))
    }

    fn is_null(&self, key: &str) -> Json {
        json!({ "$or": [
            { key: { "$eq": null } },
            { key: { "$exists": false } },
        ] })
    }

    fn not_null(&self, key: &str) -> Json {
        json!({ "$and": [
            { key: { "$ne": null } },
            { key: { "$exists": true } },
        ] })
    }
}
