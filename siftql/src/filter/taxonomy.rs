//! Value types and comparison operators
//!
//! Defines the closed set of value types a filterable field can have, the
//! operators a comparison can use, and the table of operators that are legal
//! for each value type.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic data kind of a filterable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Integer,
    Float,
    Decimal,
    String,
    Boolean,
    DateTime,
    Enumeration,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::DateTime => "date_time",
            Self::Enumeration => "enumeration",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Comparison operator usable in a leaf expression
///
/// The serialized form is the textual token the query grammar uses.
/// `Alt*` variants are alternative spellings of the four ordering comparisons
/// and behave exactly like their canonical counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Neq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "=gt=")]
    AltGt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "=ge=")]
    AltGte,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "=lt=")]
    AltLt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "=le=")]
    AltLte,
    #[serde(rename = "=in=")]
    In,
    #[serde(rename = "=out=")]
    NotIn,
    #[serde(rename = "=null=")]
    IsNull,
    #[serde(rename = "=nonull=")]
    NotNull,
    #[serde(rename = "=prefix=")]
    Prefix,
    #[serde(rename = "=suffix=")]
    Suffix,
    #[serde(rename = "=contains=")]
    Contains,
}

impl Operator {
    pub const ALL: [Operator; 17] = [
        Self::Eq,
        Self::Neq,
        Self::Gt,
        Self::AltGt,
        Self::Gte,
        Self::AltGte,
        Self::Lt,
        Self::AltLt,
        Self::Lte,
        Self::AltLte,
        Self::In,
        Self::NotIn,
        Self::IsNull,
        Self::NotNull,
        Self::Prefix,
        Self::Suffix,
        Self::Contains,
    ];

    /// Textual token used by the query grammar
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Neq => "!=",
            Self::Gt => ">",
            Self::AltGt => "=gt=",
            Self::Gte => ">=",
            Self::AltGte => "=ge=",
            Self::Lt => "<",
            Self::AltLt => "=lt=",
            Self::Lte => "<=",
            Self::AltLte => "=le=",
            Self::In => "=in=",
            Self::NotIn => "=out=",
            Self::IsNull => "=null=",
            Self::NotNull => "=nonull=",
            Self::Prefix => "=prefix=",
            Self::Suffix => "=suffix=",
            Self::Contains => "=contains=",
        }
    }

    /// Whether the upstream grammar recognizes this operator without extensions
    pub fn is_native_to_grammar(&self) -> bool {
        !matches!(
            self,
            Self::IsNull | Self::NotNull | Self::Prefix | Self::Suffix | Self::Contains
        )
    }

    /// Whether the operator consumes a list of arguments
    pub fn is_multi_value(&self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }

    /// Whether the operator tests storage-side absence and takes no arguments
    pub fn is_null_test(&self) -> bool {
        matches!(self, Self::IsNull | Self::NotNull)
    }

    /// Canonical operator for an alias spelling (identity otherwise)
    pub fn canonical(&self) -> Operator {
        match self {
            Self::AltGt => Self::Gt,
            Self::AltGte => Self::Gte,
            Self::AltLt => Self::Lt,
            Self::AltLte => Self::Lte,
            other => *other,
        }
    }

    /// Alias spelling implied by a canonical ordering comparison
    pub fn alias(&self) -> Option<Operator> {
        match self {
            Self::Gt => Some(Self::AltGt),
            Self::Gte => Some(Self::AltGte),
            Self::Lt => Some(Self::AltLt),
            Self::Lte => Some(Self::AltLte),
            _ => None,
        }
    }

    /// Resolve a grammar token to an operator (case-insensitive)
    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        Self::ALL
            .into_iter()
            .find(|op| op.symbol().eq_ignore_ascii_case(symbol))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

const ORDERED: [Operator; 8] = [
    Operator::Gt,
    Operator::AltGt,
    Operator::Gte,
    Operator::AltGte,
    Operator::Lt,
    Operator::AltLt,
    Operator::Lte,
    Operator::AltLte,
];

/// Operators a field of the given value type may declare
///
/// `IsNull`/`NotNull` are never part of this table; the engine accepts them
/// on every field.
pub fn legal_operators(value_type: ValueType) -> BTreeSet<Operator> {
    use Operator::*;

    let mut ops = BTreeSet::new();
    match value_type {
        ValueType::Integer | ValueType::Decimal | ValueType::DateTime => {
            ops.extend([Eq, Neq, In, NotIn]);
            ops.extend(ORDERED);
        }
        // Exact equality on floating values is not offered
        ValueType::Float => {
            ops.extend([Gt, AltGt, Lt, AltLt, In, NotIn]);
        }
        ValueType::String => {
            ops.extend([Eq, Neq, In, NotIn, Prefix, Suffix, Contains]);
        }
        ValueType::Boolean => {
            ops.extend([Eq, Neq]);
        }
        ValueType::Enumeration => {
            ops.extend([Eq, Neq, In, NotIn]);
        }
    }
    ops
}

/// Add the other spelling of every ordering comparison present
///
/// Either spelling of an alias pair implies both.
pub fn close_over_aliases(ops: &mut BTreeSet<Operator>) {
    let implied: Vec<Operator> = ops
        .iter()
        .map(Operator::canonical)
        .flat_map(|canonical| std::iter::once(canonical).chain(canonical.alias()))
        .collect();
    ops.extend(implied);
}
