//! Filter registry
//!
//! Process-wide store of field descriptors per entity. Entries are written
//! once, usually at startup, and only read afterwards: the first registration
//! of an entity wins and later attempts are no-ops.
//!
//! Groups scope which fields a caller sees. A group may declare parent groups;
//! a field declared for group `D` is visible to a request for group `R` when
//! `R` is `D` or `D` is one of `R`'s (transitive) parents. Requests without a
//! group only see fields that declare no group.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use indexmap::IndexMap;

use super::error::FilterError;
use super::field::{FieldDeclaration, FieldDescriptor};

/// Filter name -> descriptor, for one entity viewed through one group
pub type FieldMap = IndexMap<String, Arc<FieldDescriptor>>;

static GLOBAL: LazyLock<FilterRegistry> = LazyLock::new(FilterRegistry::new);

#[derive(Debug, Default)]
pub struct FilterRegistry {
    entities: DashMap<String, Arc<[Arc<FieldDescriptor>]>>,
    group_parents: DashMap<String, Arc<[String]>>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared registry for the whole process
    pub fn global() -> &'static FilterRegistry {
        &GLOBAL
    }

    /// Register descriptors for an entity unless it is already present
    ///
    /// Returns `true` when this call stored the descriptors.
    pub fn register(&self, entity_id: &str, descriptors: Vec<FieldDescriptor>) -> bool {
        match self.entities.entry(entity_id.to_string()) {
            Entry::Occupied(_) => {
                tracing::debug!(entity = %entity_id, "Entity already registered, keeping first registration");
                false
            }
            Entry::Vacant(slot) => {
                tracing::debug!(entity = %entity_id, fields = descriptors.len(), "Registered entity");
                slot.insert(descriptors.into_iter().map(Arc::new).collect());
                true
            }
        }
    }

    /// Build and register declarations for an entity
    ///
    /// Declarations are not built when the entity is already registered.
    /// Any invalid declaration aborts the registration of the whole entity.
    pub fn register_declarations(
        &self,
        entity_id: &str,
        declarations: &[FieldDeclaration],
    ) -> Result<bool, FilterError> {
        if self.has_entity(entity_id) {
            tracing::trace!(entity = %entity_id, "Skipping declarations of registered entity");
            return Ok(false);
        }
        let descriptors = declarations
            .iter()
            .map(FieldDescriptor::build)
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|e| tracing::warn!(entity = %entity_id, error = %e, "Rejected entity declarations"))?;
        Ok(self.register(entity_id, descriptors))
    }

    pub fn has_entity(&self, entity_id: &str) -> bool {
        self.entities.contains_key(entity_id)
    }

    /// Registered entity identifiers, sorted
    pub fn entities(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entities.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Declare the parent groups of a group (first declaration wins)
    pub fn declare_group(&self, group: &str, parents: &[&str]) -> bool {
        match self.group_parents.entry(group.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                tracing::debug!(group = %group, parents = ?parents, "Declared group");
                slot.insert(parents.iter().map(|p| p.to_string()).collect());
                true
            }
        }
    }

    /// Whether a request for `requested` may see fields declared for `declared`
    pub fn is_assignable(&self, requested: &str, declared: &str) -> bool {
        let mut pending = vec![requested.to_string()];
        let mut seen = HashSet::new();
        while let Some(group) = pending.pop() {
            if group == declared {
                return true;
            }
            if !seen.insert(group.clone()) {
                continue;
            }
            if let Some(parents) = self.group_parents.get(&group) {
                pending.extend(parents.iter().cloned());
            }
        }
        false
    }

    fn is_visible(&self, descriptor: &FieldDescriptor, group: Option<&str>) -> bool {
        if descriptor.groups().is_empty() {
            return true;
        }
        match group {
            Some(requested) => descriptor
                .groups()
                .iter()
                .any(|declared| self.is_assignable(requested, declared)),
            None => false,
        }
    }

    /// Descriptors of an entity visible to the given group, in declaration order
    pub fn lookup(&self, entity_id: &str, group: Option<&str>) -> Vec<Arc<FieldDescriptor>> {
        let Some(descriptors) = self.entities.get(entity_id).map(|e| Arc::clone(e.value())) else {
            return Vec::new();
        };
        descriptors
            .iter()
            .filter(|d| self.is_visible(d, group))
            .cloned()
            .collect()
    }

    /// Visible descriptors keyed by filter name
    pub fn lookup_as_map(&self, entity_id: &str, group: Option<&str>) -> Result<FieldMap, FilterError> {
        let mut map = FieldMap::new();
        for descriptor in self.lookup(entity_id, group) {
            let name = descriptor.filter_name().to_string();
            if map.contains_key(&name) {
                return Err(FilterError::DuplicateFieldName {
                    entity: entity_id.to_string(),
                    field: name,
                });
            }
            map.insert(name, descriptor);
        }
        Ok(map)
    }
}
