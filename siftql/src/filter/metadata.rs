//! Field metadata export
//!
//! Client-facing description of the fields an entity exposes to a group.
//! Storage keys and group assignments stay internal.

use indexmap::IndexMap;
use serde::Serialize;

use super::field::FieldDescriptor;
use super::taxonomy::{Operator, ValueType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMetadata {
    pub field: String,
    pub value_type: ValueType,
    pub operators: Vec<Operator>,
    pub description: String,
    /// Display label -> canonical member name (enumerations only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dictionary: Option<IndexMap<String, String>>,
}

impl From<&FieldDescriptor> for FieldMetadata {
    fn from(descriptor: &FieldDescriptor) -> Self {
        Self {
            field: descriptor.filter_name().to_string(),
            value_type: descriptor.value_type(),
            operators: descriptor.operators().iter().copied().collect(),
            description: descriptor.description().to_string(),
            dictionary: if descriptor.is_enumeration() {
                descriptor.enumeration_dictionary().cloned()
            } else {
                None
            },
        }
    }
}

/// Export every descriptor in order
pub fn export<'a, I>(descriptors: I) -> Vec<FieldMetadata>
where
    I: IntoIterator<Item = &'a FieldDescriptor>,
{
    descriptors.into_iter().map(FieldMetadata::from).collect()
}
