//! Field declarations and descriptors
//!
//! A [`FieldDeclaration`] is the raw description of one filterable attribute as
//! written by the service (name, underlying data type, optional overrides).
//! [`FieldDescriptor::build`] validates it against the operator table and
//! produces the immutable per-field contract used by the registry and the
//! translation engine.

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;
use serde::Deserialize;

use super::error::FilterError;
use super::taxonomy::{Operator, ValueType, close_over_aliases, legal_operators};
use crate::utils::string::camel_to_snake;

/// Display-name accessors recognized on enumeration types, in preference order
pub const DISPLAY_ACCESSORS: [&str; 3] = ["name", "description", "desc"];

/// One member of an enumeration type
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnumMember {
    /// Canonical member name
    pub name: String,
    /// Accessor name -> value returned by that accessor for this member
    #[serde(default)]
    pub accessors: IndexMap<String, String>,
}

impl EnumMember {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accessors: IndexMap::new(),
        }
    }

    pub fn with_accessor(mut self, accessor: impl Into<String>, value: impl Into<String>) -> Self {
        self.accessors.insert(accessor.into(), value.into());
        self
    }
}

/// Static description of an enumeration type
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnumDeclaration {
    /// Accessors the type exposes
    #[serde(default)]
    pub accessors: Vec<String>,
    /// Members in declaration order
    pub members: Vec<EnumMember>,
}

impl EnumDeclaration {
    pub fn new(members: Vec<EnumMember>) -> Self {
        Self {
            accessors: Vec::new(),
            members,
        }
    }

    pub fn with_accessors(mut self, accessors: &[&str]) -> Self {
        self.accessors = accessors.iter().map(|a| a.to_string()).collect();
        self
    }

    /// First recognized display-name accessor the type exposes
    fn display_accessor(&self) -> Option<&'static str> {
        DISPLAY_ACCESSORS
            .into_iter()
            .find(|name| self.accessors.iter().any(|a| a == name))
    }

    /// First display label shared by two members, if any
    fn duplicate_label(&self) -> Option<String> {
        let mut seen = HashSet::new();
        self.dictionary_entries()
            .map(|(label, _)| label)
            .find(|label| !seen.insert(label.clone()))
    }

    fn dictionary_entries(&self) -> impl Iterator<Item = (String, String)> + '_ {
        let accessor = self.display_accessor();
        self.members.iter().map(move |member| {
            let label = accessor
                .and_then(|a| member.accessors.get(a))
                .cloned()
                .unwrap_or_else(|| member.name.clone());
            (label, member.name.clone())
        })
    }

    /// Display label -> canonical member name, in member order
    pub fn dictionary(&self) -> IndexMap<String, String> {
        self.dictionary_entries().collect()
    }
}

/// Underlying data type of a declared attribute
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Decimal,
    Bool,
    Date,
    Time,
    DateTime,
    Instant,
    Enumeration(EnumDeclaration),
    String,
    /// Any other type; filtered as text
    Other(String),
}

impl SourceType {
    /// Value type inferred when the declaration does not name one
    pub fn infer_value_type(&self) -> ValueType {
        match self {
            Self::I8 | Self::I16 | Self::I32 | Self::I64 => ValueType::Integer,
            Self::U8 | Self::U16 | Self::U32 | Self::U64 => ValueType::Integer,
            Self::F32 | Self::F64 => ValueType::Float,
            Self::Decimal => ValueType::Decimal,
            Self::Bool => ValueType::Boolean,
            Self::Date | Self::Time | Self::DateTime | Self::Instant => ValueType::DateTime,
            Self::Enumeration(_) => ValueType::Enumeration,
            Self::String | Self::Other(_) => ValueType::String,
        }
    }
}

/// Raw declaration of one filterable attribute
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldDeclaration {
    /// Attribute name on the entity
    pub attribute: String,
    /// Underlying data type of the attribute
    #[serde(rename = "type")]
    pub source_type: SourceType,
    #[serde(default)]
    pub description: String,
    /// Filter name override
    #[serde(default)]
    pub name: Option<String>,
    /// Storage key override
    #[serde(default)]
    pub key: Option<String>,
    /// Value type override
    #[serde(default)]
    pub value_type: Option<ValueType>,
    /// Declared operators; empty means "all legal operators"
    #[serde(default)]
    pub operators: Vec<Operator>,
    /// Visibility groups; empty means "visible in every group"
    #[serde(default)]
    pub groups: Vec<String>,
}

impl FieldDeclaration {
    pub fn new(attribute: impl Into<String>, source_type: SourceType) -> Self {
        Self {
            attribute: attribute.into(),
            source_type,
            description: String::new(),
            name: None,
            key: None,
            value_type: None,
            operators: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    pub fn with_operators(mut self, operators: &[Operator]) -> Self {
        self.operators = operators.to_vec();
        self
    }

    pub fn with_groups(mut self, groups: &[&str]) -> Self {
        self.groups = groups.iter().map(|g| g.to_string()).collect();
        self
    }
}

/// Validated, immutable contract for one filterable attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    filter_name: String,
    storage_key: String,
    value_type: ValueType,
    operators: BTreeSet<Operator>,
    groups: BTreeSet<String>,
    description: String,
    enumeration_dictionary: Option<IndexMap<String, String>>,
    enumeration_members: Vec<String>,
}

impl FieldDescriptor {
    /// Build a descriptor from a declaration
    ///
    /// Fails with `InvalidDeclaration` when the declared operators share
    /// nothing with the operators legal for the resolved value type, when an
    /// enumeration value type is declared on a non-enumeration attribute, or
    /// when two enumeration members share a display label.
    pub fn build(declaration: &FieldDeclaration) -> Result<Self, FilterError> {
        let filter_name = declaration
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&declaration.attribute)
            .to_string();

        let storage_key = match declaration.key.as_deref().filter(|k| !k.trim().is_empty()) {
            Some(key) => key.to_string(),
            None => camel_to_snake(&declaration.attribute),
        };

        let value_type = declaration
            .value_type
            .unwrap_or_else(|| declaration.source_type.infer_value_type());

        let legal = legal_operators(value_type);
        let operators = if declaration.operators.is_empty() {
            legal
        } else {
            let mut ops: BTreeSet<Operator> = declaration
                .operators
                .iter()
                .filter(|op| legal.contains(*op))
                .copied()
                .collect();
            close_over_aliases(&mut ops);
            ops
        };
        if operators.is_empty() {
            let declared: Vec<&str> = declaration.operators.iter().map(|op| op.symbol()).collect();
            return Err(FilterError::invalid_declaration(
                &filter_name,
                format!(
                    "none of the declared operators [{}] apply to {} values",
                    declared.join(", "),
                    value_type
                ),
            ));
        }

        let (dictionary, members) = match (value_type, &declaration.source_type) {
            (ValueType::Enumeration, SourceType::Enumeration(decl)) => {
                if let Some(label) = decl.duplicate_label() {
                    return Err(FilterError::invalid_declaration(
                        &filter_name,
                        format!("enumeration label '{}' names more than one member", label),
                    ));
                }
                let names = decl.members.iter().map(|m| m.name.clone()).collect();
                (Some(decl.dictionary()), names)
            }
            (ValueType::Enumeration, _) => {
                return Err(FilterError::invalid_declaration(
                    &filter_name,
                    "enumeration value type requires an enumeration attribute",
                ));
            }
            _ => (None, Vec::new()),
        };

        tracing::trace!(
            field = %filter_name,
            key = %storage_key,
            value_type = %value_type,
            operators = operators.len(),
            "Built field descriptor"
        );

        Ok(Self {
            filter_name,
            storage_key,
            value_type,
            operators,
            groups: declaration.groups.iter().cloned().collect(),
            description: declaration.description.clone(),
            enumeration_dictionary: dictionary,
            enumeration_members: members,
        })
    }

    pub fn filter_name(&self) -> &str {
        &self.filter_name
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn operators(&self) -> &BTreeSet<Operator> {
        &self.operators
    }

    pub fn supports(&self, operator: Operator) -> bool {
        self.operators.contains(&operator)
    }

    pub fn groups(&self) -> &BTreeSet<String> {
        &self.groups
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn enumeration_dictionary(&self) -> Option<&IndexMap<String, String>> {
        self.enumeration_dictionary.as_ref()
    }

    /// Canonical member names, in declaration order (enumerations only)
    pub fn enumeration_members(&self) -> &[String] {
        &self.enumeration_members
    }

    pub fn is_enumeration(&self) -> bool {
        self.value_type == ValueType::Enumeration
    }
}
