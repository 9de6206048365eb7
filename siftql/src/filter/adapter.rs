//! Target adapter trait
//!
//! A target adapter assembles backend-specific filter fragments. The
//! translation engine validates and casts every comparison, then calls exactly
//! one primitive per leaf; it never inspects the fragments it gets back.

use super::taxonomy::Operator;
use super::value::Value;

/// Filter-fragment assembly primitives for one storage backend
///
/// Alias operators never reach an adapter: `=gt=` arrives as [`gt`](Self::gt),
/// and so on. Pattern primitives receive the raw literal; escaping backend
/// metacharacters is the adapter's job.
pub trait TargetAdapter {
    /// Backend filter fragment
    type Filter;

    /// Adapter name for diagnostics
    fn name(&self) -> &'static str;

    /// Whether the backend can express the operator (default: all)
    fn supports(&self, _operator: Operator) -> bool {
        true
    }

    /// Conjunction; an empty list must yield a filter that matches everything
    fn and(&self, filters: Vec<Self::Filter>) -> Self::Filter;

    /// Disjunction; an empty list must yield a filter that matches nothing
    fn or(&self, filters: Vec<Self::Filter>) -> Self::Filter;

    fn eq(&self, key: &str, value: Value) -> Self::Filter;
    fn neq(&self, key: &str, value: Value) -> Self::Filter;
    fn gt(&self, key: &str, value: Value) -> Self::Filter;
    fn gte(&self, key: &str, value: Value) -> Self::Filter;
    fn lt(&self, key: &str, value: Value) -> Self::Filter;
    fn lte(&self, key: &str, value: Value) -> Self::Filter;

    fn is_in(&self, key: &str, values: Vec<Value>) -> Self::Filter;
    fn not_in(&self, key: &str, values: Vec<Value>) -> Self::Filter;

    fn prefix(&self, key: &str, literal: &str) -> Self::Filter;
    fn suffix(&self, key: &str, literal: &str) -> Self::Filter;
    fn contains(&self, key: &str, literal: &str) -> Self::Filter;

    fn is_null(&self, key: &str) -> Self::Filter;
    fn not_null(&self, key: &str) -> Self::Filter;
}
