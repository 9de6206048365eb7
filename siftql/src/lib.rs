//! Declarative filter fields and query translation
//!
//! Fields are declared once per entity and registered in a
//! [`FilterRegistry`](filter::FilterRegistry). Incoming expression trees are
//! validated against those declarations and translated for a storage backend
//! through a [`TargetAdapter`](filter::TargetAdapter).

pub mod adapters;
pub mod core;
pub mod filter;
pub mod utils;

mod app;
