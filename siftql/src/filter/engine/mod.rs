//! Expression translation engine
//!
//! Walks an expression tree, validates every comparison against the field map
//! of the requested entity and group, casts the raw arguments to the field's
//! value type and asks a [`TargetAdapter`] for the matching fragment.
//!
//! Translation is a pure function of its inputs: no shared state, no I/O.
//! Any error aborts the whole call; no partial filter is returned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::adapter::TargetAdapter;
use super::error::FilterError;
use super::expr::Node;
use super::field::FieldDescriptor;
use super::registry::FieldMap;
use super::taxonomy::{Operator, ValueType};
use super::value::{Decimal, Value};

#[cfg(test)]
mod tests;

/// What to do with an enumeration literal that names no member
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownEnumPolicy {
    /// Treat the literal as matching no stored value
    ///
    /// `=in=` ignores the literal; any other comparison matches nothing on
    /// every backend.
    #[default]
    Null,
    /// Fail the translation with `ArgumentCastError`
    Reject,
}

/// Translation engine with its casting policy
#[derive(Debug, Clone, Copy, Default)]
pub struct Translator {
    unknown_enum: UnknownEnumPolicy,
}

/// Translate with the default policy
pub fn translate<A: TargetAdapter>(
    fields: &FieldMap,
    node: &Node,
    adapter: &A,
) -> Result<A::Filter, FilterError> {
    Translator::default().translate(fields, node, adapter)
}

impl Translator {
    pub fn new(unknown_enum: UnknownEnumPolicy) -> Self {
        Self { unknown_enum }
    }

    /// Translate an expression tree into the adapter's filter type
    pub fn translate<A: TargetAdapter>(
        &self,
        fields: &FieldMap,
        node: &Node,
        adapter: &A,
    ) -> Result<A::Filter, FilterError> {
        tracing::trace!(adapter = adapter.name(), fields = fields.len(), "Translating filter");
        self.translate_node(fields, node, adapter).inspect_err(|e| {
            tracing::debug!(adapter = adapter.name(), code = e.code(), error = %e, "Filter translation failed")
        })
    }

    fn translate_node<A: TargetAdapter>(
        &self,
        fields: &FieldMap,
        node: &Node,
        adapter: &A,
    ) -> Result<A::Filter, FilterError> {
        match node {
            Node::And { children } => {
                self.junction(fields, children, adapter, |filters| adapter.and(filters))
            }
            Node::Or { children } => {
                self.junction(fields, children, adapter, |filters| adapter.or(filters))
            }
            Node::Comparison {
                selector,
                operator,
                arguments,
            } => self.comparison(fields, selector, operator, arguments, adapter),
        }
    }

    /// Translate children in order; a single child stands for the junction
    fn junction<A, F>(
        &self,
        fields: &FieldMap,
        children: &[Node],
        adapter: &A,
        combine: F,
    ) -> Result<A::Filter, FilterError>
    where
        A: TargetAdapter,
        F: FnOnce(Vec<A::Filter>) -> A::Filter,
    {
        let mut filters = children
            .iter()
            .map(|child| self.translate_node(fields, child, adapter))
            .collect::<Result<Vec<_>, _>>()?;
        if filters.len() == 1 {
            return Ok(filters.remove(0));
        }
        Ok(combine(filters))
    }

    fn comparison<A: TargetAdapter>(
        &self,
        fields: &FieldMap,
        selector: &str,
        symbol: &str,
        arguments: &[String],
        adapter: &A,
    ) -> Result<A::Filter, FilterError> {
        let descriptor = fields
            .get(selector)
            .ok_or_else(|| FilterError::unknown_field(selector))?;

        let operator = Operator::from_symbol(symbol).ok_or_else(|| FilterError::UnknownOperator {
            field: selector.to_string(),
            symbol: symbol.to_string(),
        })?;

        // Null tests apply to every field regardless of its declared operators
        if !operator.is_null_test() && !descriptor.supports(operator) {
            return Err(FilterError::OperatorNotAllowed {
                field: selector.to_string(),
                symbol: symbol.to_string(),
            });
        }

        let unsupported = || FilterError::UnsupportedInEngine {
            field: selector.to_string(),
            symbol: symbol.to_string(),
            adapter: adapter.name(),
        };
        if !adapter.supports(operator.canonical()) {
            return Err(unsupported());
        }

        let key = descriptor.storage_key();
        match operator {
            Operator::IsNull => return Ok(adapter.is_null(key)),
            Operator::NotNull => return Ok(adapter.not_null(key)),
            _ => {}
        }

        check_arity(selector, operator, arguments.len())?;
        let mut values = arguments
            .iter()
            .map(|raw| self.cast(descriptor, raw))
            .collect::<Result<Vec<_>, _>>()?;

        // Unresolved enumeration literals match no row on any backend
        if values.iter().any(Value::is_null) {
            match operator {
                Operator::In => values.retain(|v| !v.is_null()),
                _ => return Ok(adapter.or(Vec::new())),
            }
        }

        let filter = match operator {
            Operator::In => adapter.is_in(key, values),
            Operator::NotIn => adapter.not_in(key, values),
            single => {
                let value = values.pop().unwrap_or(Value::Null);
                match single {
                    Operator::Eq => adapter.eq(key, value),
                    Operator::Neq => adapter.neq(key, value),
                    Operator::Gt | Operator::AltGt => adapter.gt(key, value),
                    Operator::Gte | Operator::AltGte => adapter.gte(key, value),
                    Operator::Lt | Operator::AltLt => adapter.lt(key, value),
                    Operator::Lte | Operator::AltLte => adapter.lte(key, value),
                    Operator::Prefix => adapter.prefix(key, &value.to_string()),
                    Operator::Suffix => adapter.suffix(key, &value.to_string()),
                    Operator::Contains => adapter.contains(key, &value.to_string()),
                    Operator::In | Operator::NotIn | Operator::IsNull | Operator::NotNull => {
                        return Err(unsupported());
                    }
                }
            }
        };
        Ok(filter)
    }

    /// Cast one raw argument to the field's value type
    fn cast(&self, descriptor: &FieldDescriptor, raw: &str) -> Result<Value, FilterError> {
        let value_type = descriptor.value_type();
        let cast_error = || FilterError::cast(descriptor.filter_name(), raw, value_type);

        match value_type {
            ValueType::Integer => raw.parse::<i64>().map(Value::Integer).map_err(|_| cast_error()),
            ValueType::Float => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Value::Float)
                .ok_or_else(cast_error),
            ValueType::Decimal => raw
                .parse::<Decimal>()
                .map(Value::Decimal)
                .map_err(|_| cast_error()),
            ValueType::Boolean => {
                if raw.eq_ignore_ascii_case("true") {
                    Ok(Value::Boolean(true))
                } else if raw.eq_ignore_ascii_case("false") {
                    Ok(Value::Boolean(false))
                } else {
                    Err(cast_error())
                }
            }
            ValueType::DateTime => DateTime::parse_from_rfc3339(raw)
                .map(|dt| Value::DateTime(dt.with_timezone(&Utc)))
                .map_err(|_| cast_error()),
            ValueType::String => Ok(Value::String(raw.to_string())),
            ValueType::Enumeration => self.resolve_enumeration(descriptor, raw),
        }
    }

    /// Resolve an enumeration literal to its canonical member name
    ///
    /// Canonical names are matched first, then display labels.
    fn resolve_enumeration(&self, descriptor: &FieldDescriptor, raw: &str) -> Result<Value, FilterError> {
        let canonical = descriptor
            .enumeration_members()
            .iter()
            .find(|member| member.as_str() == raw)
            .or_else(|| descriptor.enumeration_dictionary().and_then(|dict| dict.get(raw)));

        match (canonical, self.unknown_enum) {
            (Some(member), _) => Ok(Value::String(member.clone())),
            (None, UnknownEnumPolicy::Null) => {
                tracing::warn!(
                    field = %descriptor.filter_name(),
                    literal = %raw,
                    "Unknown enumeration literal matches nothing"
                );
                Ok(Value::Null)
            }
            (None, UnknownEnumPolicy::Reject) => Err(FilterError::cast(
                descriptor.filter_name(),
                raw,
                ValueType::Enumeration,
            )),
        }
    }
}

fn check_arity(field: &str, operator: Operator, actual: usize) -> Result<(), FilterError> {
    let (valid, expected) = if operator.is_multi_value() {
        (actual >= 1, "at least 1")
    } else {
        (actual == 1, "exactly 1")
    };
    if valid {
        return Ok(());
    }
    Err(FilterError::ArityMismatch {
        field: field.to_string(),
        symbol: operator.symbol().to_string(),
        expected,
        actual,
    })
}
