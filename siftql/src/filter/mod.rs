//! Filter metadata and expression translation
//!
//! - `taxonomy` - value types, operators and the legal-operator table
//! - `field` - field declarations and the descriptor builder
//! - `registry` - write-once, group-aware store of descriptors per entity
//! - `expr` - expression tree produced by the query grammar parser
//! - `value` - typed comparison arguments
//! - `engine` - validation, casting and dispatch to a target adapter
//! - `adapter` - the target adapter trait
//! - `metadata` - client-facing field metadata
//!
//! ## Usage
//!
//! ```
//! use siftql::filter::{FieldDeclaration, FilterRegistry, Node, SourceType, translate};
//! use siftql::adapters::sql::{Backend, SqlAdapter};
//!
//! let registry = FilterRegistry::new();
//! registry
//!     .register_declarations("user", &[FieldDeclaration::new("age", SourceType::I32)])
//!     .unwrap();
//!
//! let fields = registry.lookup_as_map("user", None).unwrap();
//! let adapter = SqlAdapter::new(Backend::Postgres);
//! let fragment = translate(&fields, &Node::comparison("age", "=gt=", &["18"]), &adapter).unwrap();
//! assert_eq!(adapter.render(&fragment).sql, r#""age" > $1"#);
//! ```

mod adapter;
mod engine;
mod error;
mod expr;
mod field;
mod metadata;
mod registry;
mod taxonomy;
mod value;

pub use adapter::TargetAdapter;
pub use engine::{Translator, UnknownEnumPolicy, translate};
pub use error::FilterError;
pub use expr::Node;
pub use field::{
    DISPLAY_ACCESSORS, EnumDeclaration, EnumMember, FieldDeclaration, FieldDescriptor, SourceType,
};
pub use metadata::{FieldMetadata, export};
pub use registry::{FieldMap, FilterRegistry};
pub use taxonomy::{Operator, ValueType, close_over_aliases, legal_operators};
pub use value::{Decimal, DecimalError, Value};
