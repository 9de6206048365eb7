//! Filter error types

use thiserror::Error;

use super::taxonomy::ValueType;

/// Errors raised while building field metadata or translating expressions
///
/// `InvalidDeclaration` and `DuplicateFieldName` are construction errors.
/// Every other variant is local to a single translation call and carries
/// enough context for a client-facing diagnostic.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid declaration for field {field}: {reason}")]
    InvalidDeclaration { field: String, reason: String },

    #[error("Duplicate filter name {field} for entity {entity}")]
    DuplicateFieldName { entity: String, field: String },

    #[error("Field {field} is not filterable")]
    UnknownField { field: String },

    #[error("Unknown operator {symbol} for field {field}")]
    UnknownOperator { field: String, symbol: String },

    #[error("Operator {symbol} is not allowed for field {field}")]
    OperatorNotAllowed { field: String, symbol: String },

    #[error("Cannot cast {literal:?} to {value_type} for field {field}")]
    ArgumentCastError {
        field: String,
        literal: String,
        value_type: ValueType,
    },

    #[error("Operator {symbol} on field {field} expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        field: String,
        symbol: String,
        expected: &'static str,
        actual: usize,
    },

    #[error("Operator {symbol} on field {field} is not supported by {adapter}")]
    UnsupportedInEngine {
        field: String,
        symbol: String,
        adapter: &'static str,
    },
}

impl FilterError {
    pub fn invalid_declaration(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDeclaration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }

    pub fn cast(field: impl Into<String>, literal: impl Into<String>, value_type: ValueType) -> Self {
        Self::ArgumentCastError {
            field: field.into(),
            literal: literal.into(),
            value_type,
        }
    }

    /// Stable error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDeclaration { .. } => "INVALID_FILTER_DECLARATION",
            Self::DuplicateFieldName { .. } => "DUPLICATE_FILTER_FIELD",
            Self::UnknownField { .. } => "UNKNOWN_FILTER_FIELD",
            Self::UnknownOperator { .. } => "UNKNOWN_FILTER_OPERATOR",
            Self::OperatorNotAllowed { .. } => "FILTER_OPERATOR_NOT_ALLOWED",
            Self::ArgumentCastError { .. } => "INVALID_FILTER_ARGUMENT",
            Self::ArityMismatch { .. } => "INVALID_FILTER_ARGUMENT_COUNT",
            Self::UnsupportedInEngine { .. } => "UNSUPPORTED_FILTER_OPERATOR",
        }
    }

    /// Whether the error was caused by the caller's expression rather than
    /// by the service's own declarations
    pub fn is_request_error(&self) -> bool {
        !matches!(
            self,
            Self::InvalidDeclaration { .. } | Self::DuplicateFieldName { .. }
        )
    }
}
