//! Tests for the translation engine

use std::cell::RefCell;
use std::collections::HashSet;

use super::*;
use crate::filter::field::{EnumDeclaration, EnumMember, FieldDeclaration, SourceType};
use crate::filter::registry::FilterRegistry;

/// Adapter that renders every primitive as text and records leaf calls
#[derive(Default)]
struct RecordingAdapter {
    calls: RefCell<Vec<String>>,
    declined: HashSet<Operator>,
}

impl RecordingAdapter {
    fn declining(ops: &[Operator]) -> Self {
        Self {
            calls: RefCell::default(),
            declined: ops.iter().copied().collect(),
        }
    }

    fn leaf(&self, call: String) -> String {
        self.calls.borrow_mut().push(call.clone());
        call
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

fn list(values: &[Value]) -> String {
    values.iter().map(|v| format!("{:?}", v)).collect::<Vec<_>>().join(", ")
}

impl TargetAdapter for RecordingAdapter {
    type Filter = String;

    fn name(&self) -> &'static str {
        "recording"
    }

    fn supports(&self, operator: Operator) -> bool {
        !self.declined.contains(&operator)
    }

    fn and(&self, filters: Vec<String>) -> String {
        if filters.is_empty() {
            return "TRUE".to_string();
        }
        format!("and({})", filters.join(", "))
    }

    fn or(&self, filters: Vec<String>) -> String {
        if filters.is_empty() {
            return "FALSE".to_string();
        }
        format!("or({})", filters.join(", "))
    }

    fn eq(&self, key: &str, value: Value) -> String {
        self.leaf(format!("eq({}, {:?})", key, value))
    }

    fn neq(&self, key: &str, value: Value) -> String {
        self.leaf(format!("neq({}, {:?})", key, value))
    }

    fn gt(&self, key: &str, value: Value) -> String {
        self.leaf(format!("gt({}, {:?})", key, value))
    }

    fn gte(&self, key: &str, value: Value) -> String {
        self.leaf(format!("gte({}, {:?})", key, value))
    }

    fn lt(&self, key: &str, value: Value) -> String {
        self.leaf(format!("lt({}, {:?})", key, value))
    }

    fn lte(&self, key: &str, value: Value) -> String {
        self.leaf(format!("lte({}, {:?})", key, value))
    }

    fn is_in(&self, key: &str, values: Vec<Value>) -> String {
        self.leaf(format!("in({}, [{}])", key, list(&values)))
    }

    fn not_in(&self, key: &str, values: Vec<Value>) -> String {
        self.leaf(format!("not_in({}, [{}])", key, list(&values)))
    }

    fn prefix(&self, key: &str, literal: &str) -> String {
        self.leaf(format!("prefix({}, {:?})", key, literal))
    }

    fn suffix(&self, key: &str, literal: &str) -> String {
        self.leaf(format!("suffix({}, {:?})", key, literal))
    }

    fn contains(&self, key: &str, literal: &str) -> String {
        self.leaf(format!("contains({}, {:?})", key, literal))
    }

    fn is_null(&self, key: &str) -> String {
        self.leaf(format!("is_null({})", key))
    }

    fn not_null(&self, key: &str) -> String {
        self.leaf(format!("not_null({})", key))
    }
}

fn status_enum() -> SourceType {
    SourceType::Enumeration(
        EnumDeclaration::new(vec![
            EnumMember::new("ACTIVE").with_accessor("name", "Active"),
            EnumMember::new("SUSPENDED").with_accessor("name", "Suspended"),
        ])
        .with_accessors(&["name"]),
    )
}

fn person_fields() -> FieldMap {
    let registry = FilterRegistry::new();
    let declarations = vec![
        FieldDeclaration::new("age", SourceType::I32),
        FieldDeclaration::new("score", SourceType::F64),
        FieldDeclaration::new("balance", SourceType::Decimal),
        FieldDeclaration::new("verified", SourceType::Bool),
        FieldDeclaration::new("createdAt", SourceType::Instant),
        FieldDeclaration::new("displayName", SourceType::String).with_name("name"),
        FieldDeclaration::new("status", status_enum()),
        FieldDeclaration::new("nickname", SourceType::String).with_operators(&[Operator::Eq]),
    ];
    registry.register_declarations("person", &declarations).unwrap();
    registry.lookup_as_map("person", None).unwrap()
}

fn run(node: &Node) -> (Result<String, FilterError>, Vec<String>) {
    let adapter = RecordingAdapter::default();
    let result = translate(&person_fields(), node, &adapter);
    (result, adapter.calls())
}

#[test]
fn test_alias_comparison_yields_single_gt_call() {
    let (result, calls) = run(&Node::comparison("age", "=gt=", &["18"]));
    assert_eq!(result.unwrap(), "gt(age, Integer(18))");
    assert_eq!(calls, vec!["gt(age, Integer(18))"]);
}

#[test]
fn test_aliases_dispatch_to_canonical_primitives() {
    let cases = [
        (">", "gt"),
        ("=gt=", "gt"),
        (">=", "gte"),
        ("=ge=", "gte"),
        ("<", "lt"),
        ("=lt=", "lt"),
        ("<=", "lte"),
        ("=le=", "lte"),
    ];
    for (symbol, primitive) in cases {
        let (result, _) = run(&Node::comparison("age", symbol, &["5"]));
        assert_eq!(result.unwrap(), format!("{}(age, Integer(5))", primitive));
    }
}

#[test]
fn test_empty_and_yields_match_all() {
    let (result, calls) = run(&Node::and(vec![]));
    assert_eq!(result.unwrap(), "TRUE");
    assert!(calls.is_empty());
}

#[test]
fn test_empty_or_yields_match_nothing() {
    let (result, _) = run(&Node::or(vec![]));
    assert_eq!(result.unwrap(), "FALSE");
}

#[test]
fn test_single_child_junction_is_the_child() {
    let child = Node::comparison("age", "==", &["3"]);
    let (alone, _) = run(&child);
    let (in_or, _) = run(&Node::or(vec![child.clone()]));
    let (in_and, _) = run(&Node::and(vec![child]));
    assert_eq!(in_or.unwrap(), alone.clone().unwrap());
    assert_eq!(in_and.unwrap(), alone.unwrap());
}

#[test]
fn test_nested_tree_keeps_child_order() {
    let node = Node::and(vec![
        Node::comparison("name", "=prefix=", &["Jo"]),
        Node::or(vec![
            Node::comparison("verified", "==", &["TRUE"]),
            Node::comparison("age", "=in=", &["1", "2", "3"]),
        ]),
    ]);
    let (result, calls) = run(&node);
    assert_eq!(
        result.unwrap(),
        "and(prefix(display_name, \"Jo\"), or(eq(verified, Boolean(true)), \
         in(age, [Integer(1), Integer(2), Integer(3)])))"
    );
    assert_eq!(calls.len(), 3);
}

#[test]
fn test_casts_each_value_type() {
    let (result, _) = run(&Node::comparison("score", "<", &["2.5"]));
    assert_eq!(result.unwrap(), "lt(score, Float(2.5))");

    let (result, _) = run(&Node::comparison("balance", ">=", &["10.50"]));
    let expected = Value::Decimal("10.50".parse().unwrap());
    assert_eq!(result.unwrap(), format!("gte(balance, {:?})", expected));

    let (result, _) = run(&Node::comparison("verified", "!=", &["False"]));
    assert_eq!(result.unwrap(), "neq(verified, Boolean(false))");

    let (result, _) = run(&Node::comparison("createdAt", "=le=", &["2024-03-01T10:00:00+02:00"]));
    let ts = DateTime::parse_from_rfc3339("2024-03-01T08:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    assert_eq!(
        result.unwrap(),
        format!("lte(created_at, {:?})", Value::DateTime(ts))
    );

    let (result, _) = run(&Node::comparison("name", "==", &["  spaced  "]));
    assert_eq!(result.unwrap(), "eq(display_name, String(\"  spaced  \"))");
}

#[test]
fn test_cast_failure_names_field_literal_and_type() {
    let (result, calls) = run(&Node::comparison("age", "==", &["not-a-number"]));
    assert_eq!(
        result.unwrap_err(),
        FilterError::ArgumentCastError {
            field: "age".to_string(),
            literal: "not-a-number".to_string(),
            value_type: ValueType::Integer,
        }
    );
    assert!(calls.is_empty());
}

#[test]
fn test_cast_failures_per_type() {
    let bad = [
        ("score", ">", "NaN"),
        ("score", ">", "inf"),
        ("balance", "==", "1,5"),
        ("verified", "==", "yes"),
        ("createdAt", ">", "2024-01-01"),
        ("age", "==", "9223372036854775808"),
    ];
    for (field, op, literal) in bad {
        let (result, _) = run(&Node::comparison(field, op, &[literal]));
        assert!(
            matches!(result, Err(FilterError::ArgumentCastError { .. })),
            "{field} {op} {literal} should fail to cast"
        );
    }
}

#[test]
fn test_one_bad_list_element_fails_the_whole_comparison() {
    let (result, calls) = run(&Node::comparison("age", "=out=", &["1", "x", "3"]));
    assert!(matches!(
        result,
        Err(FilterError::ArgumentCastError { ref literal, .. }) if literal == "x"
    ));
    assert!(calls.is_empty());
}

#[test]
fn test_unknown_field_fails() {
    let (result, _) = run(&Node::comparison("ghost", "==", &["1"]));
    assert_eq!(result.unwrap_err(), FilterError::unknown_field("ghost"));
}

#[test]
fn test_storage_key_is_not_a_selector() {
    let (result, _) = run(&Node::comparison("display_name", "==", &["x"]));
    assert!(matches!(result, Err(FilterError::UnknownField { .. })));
}

#[test]
fn test_unknown_operator_fails() {
    let (result, _) = run(&Node::comparison("age", "=like=", &["1"]));
    assert_eq!(
        result.unwrap_err(),
        FilterError::UnknownOperator {
            field: "age".to_string(),
            symbol: "=like=".to_string(),
        }
    );
}

#[test]
fn test_equality_on_float_is_not_allowed() {
    let (result, _) = run(&Node::comparison("score", "==", &["1.0"]));
    assert_eq!(
        result.unwrap_err(),
        FilterError::OperatorNotAllowed {
            field: "score".to_string(),
            symbol: "==".to_string(),
        }
    );
}

#[test]
fn test_declared_subset_restricts_operators() {
    let (result, _) = run(&Node::comparison("nickname", "=contains=", &["x"]));
    assert!(matches!(result, Err(FilterError::OperatorNotAllowed { .. })));
    let (result, _) = run(&Node::comparison("nickname", "==", &["x"]));
    assert!(result.is_ok());
}

#[test]
fn test_declaring_one_spelling_allows_both() {
    let registry = FilterRegistry::new();
    registry
        .register_declarations(
            "game",
            &[FieldDeclaration::new("rank", SourceType::I32).with_operators(&[Operator::AltGt])],
        )
        .unwrap();
    let fields = registry.lookup_as_map("game", None).unwrap();
    let adapter = RecordingAdapter::default();

    for symbol in [">", "=gt="] {
        let result = translate(&fields, &Node::comparison("rank", symbol, &["3"]), &adapter);
        assert_eq!(result.unwrap(), "gt(rank, Integer(3))");
    }
    let result = translate(&fields, &Node::comparison("rank", "<", &["3"]), &adapter);
    assert!(matches!(result, Err(FilterError::OperatorNotAllowed { .. })));
}

#[test]
fn test_operator_symbols_are_case_insensitive() {
    let (result, _) = run(&Node::comparison("name", "=CONTAINS=", &["ann"]));
    assert_eq!(result.unwrap(), "contains(display_name, \"ann\")");
}

#[test]
fn test_null_tests_ignore_arguments_and_declared_operators() {
    let (result, _) = run(&Node::comparison("score", "=null=", &[]));
    assert_eq!(result.unwrap(), "is_null(score)");

    // nickname only declares ==, arguments are never cast
    let (result, _) = run(&Node::comparison("nickname", "=nonull=", &["ignored", "too"]));
    assert_eq!(result.unwrap(), "not_null(nickname)");

    let (result, _) = run(&Node::comparison("age", "=null=", &["not-a-number"]));
    assert_eq!(result.unwrap(), "is_null(age)");
}

#[test]
fn test_pattern_operators_pass_raw_literal() {
    let (result, _) = run(&Node::comparison("name", "=suffix=", &["100%_done"]));
    assert_eq!(result.unwrap(), "suffix(display_name, \"100%_done\")");
}

#[test]
fn test_arity_is_checked() {
    let (result, _) = run(&Node::comparison("age", "==", &["1", "2"]));
    assert_eq!(
        result.unwrap_err(),
        FilterError::ArityMismatch {
            field: "age".to_string(),
            symbol: "==".to_string(),
            expected: "exactly 1",
            actual: 2,
        }
    );

    let (result, _) = run(&Node::comparison("age", "=in=", &[]));
    assert!(matches!(
        result,
        Err(FilterError::ArityMismatch { actual: 0, .. })
    ));
}

#[test]
fn test_error_in_later_child_discards_earlier_results() {
    let node = Node::or(vec![
        Node::comparison("age", "==", &["1"]),
        Node::comparison("ghost", "==", &["1"]),
    ]);
    let (result, _) = run(&node);
    assert!(matches!(result, Err(FilterError::UnknownField { .. })));
}

#[test]
fn test_operator_declined_by_adapter_is_unsupported() {
    let adapter = RecordingAdapter::declining(&[Operator::Suffix, Operator::Gt]);
    let fields = person_fields();

    let result = translate(&fields, &Node::comparison("name", "=suffix=", &["x"]), &adapter);
    assert_eq!(
        result.unwrap_err(),
        FilterError::UnsupportedInEngine {
            field: "name".to_string(),
            symbol: "=suffix=".to_string(),
            adapter: "recording",
        }
    );

    // aliases are checked through their canonical operator
    let result = translate(&fields, &Node::comparison("age", "=gt=", &["1"]), &adapter);
    assert!(matches!(result, Err(FilterError::UnsupportedInEngine { .. })));
    assert!(adapter.calls().is_empty());
}

#[test]
fn test_enumeration_accepts_canonical_names_and_labels() {
    let (result, _) = run(&Node::comparison("status", "==", &["SUSPENDED"]));
    assert_eq!(result.unwrap(), "eq(status, String(\"SUSPENDED\"))");

    let (result, _) = run(&Node::comparison("status", "=in=", &["Active", "SUSPENDED"]));
    assert_eq!(
        result.unwrap(),
        "in(status, [String(\"ACTIVE\"), String(\"SUSPENDED\")])"
    );
}

// An enumeration literal that names no member does not fail the translation
// under the default policy. It matches nothing: a single-valued comparison
// becomes the empty disjunction and `=in=` drops the literal, so no backend
// ever receives a null operand. `UnknownEnumPolicy::Reject` turns it into a
// cast error instead.
#[test]
fn test_unknown_enumeration_literal_matches_nothing_by_default() {
    for symbol in ["==", "!="] {
        let (result, calls) = run(&Node::comparison("status", symbol, &["DELETED"]));
        assert_eq!(result.unwrap(), "FALSE");
        assert!(calls.is_empty());
    }

    let (result, _) = run(&Node::comparison("status", "=out=", &["ACTIVE", "gone"]));
    assert_eq!(result.unwrap(), "FALSE");

    let (result, _) = run(&Node::comparison("status", "=in=", &["ACTIVE", "gone"]));
    assert_eq!(result.unwrap(), "in(status, [String(\"ACTIVE\")])");

    let (result, _) = run(&Node::comparison("status", "=in=", &["gone"]));
    assert_eq!(result.unwrap(), "in(status, [])");
}

#[test]
fn test_canonical_member_names_win_over_labels() {
    // each label spells the other member's canonical name
    let swapped = SourceType::Enumeration(
        EnumDeclaration::new(vec![
            EnumMember::new("A").with_accessor("desc", "B"),
            EnumMember::new("B").with_accessor("desc", "A"),
        ])
        .with_accessors(&["desc"]),
    );
    let registry = FilterRegistry::new();
    registry
        .register_declarations("doc", &[FieldDeclaration::new("kind", swapped)])
        .unwrap();
    let fields = registry.lookup_as_map("doc", None).unwrap();
    let adapter = RecordingAdapter::default();

    let result = translate(&fields, &Node::comparison("kind", "==", &["A"]), &adapter);
    assert_eq!(result.unwrap(), "eq(kind, String(\"A\"))");
}

#[test]
fn test_unknown_enumeration_literal_rejected_when_configured() {
    let translator = Translator::new(UnknownEnumPolicy::Reject);
    let adapter = RecordingAdapter::default();
    let result = translator.translate(
        &person_fields(),
        &Node::comparison("status", "==", &["DELETED"]),
        &adapter,
    );
    assert_eq!(
        result.unwrap_err(),
        FilterError::ArgumentCastError {
            field: "status".to_string(),
            literal: "DELETED".to_string(),
            value_type: ValueType::Enumeration,
        }
    );
}

#[test]
fn test_enumeration_literals_are_case_sensitive() {
    let translator = Translator::new(UnknownEnumPolicy::Reject);
    let adapter = RecordingAdapter::default();
    let result = translator.translate(
        &person_fields(),
        &Node::comparison("status", "==", &["active"]),
        &adapter,
    );
    assert!(result.is_err());
}

#[test]
fn test_group_scoped_map_hides_fields() {
    let registry = FilterRegistry::new();
    registry
        .register_declarations(
            "person",
            &[
                FieldDeclaration::new("age", SourceType::I32),
                FieldDeclaration::new("salary", SourceType::Decimal).with_groups(&["hr"]),
            ],
        )
        .unwrap();
    let adapter = RecordingAdapter::default();
    let node = Node::comparison("salary", ">", &["1000"]);

    let public = registry.lookup_as_map("person", None).unwrap();
    assert!(matches!(
        translate(&public, &node, &adapter),
        Err(FilterError::UnknownField { .. })
    ));

    let hr = registry.lookup_as_map("person", Some("hr")).unwrap();
    assert!(translate(&hr, &node, &adapter).is_ok());
}

#[test]
fn test_translations_run_concurrently() {
    let fields = std::sync::Arc::new(person_fields());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let fields = std::sync::Arc::clone(&fields);
            std::thread::spawn(move || {
                let adapter = RecordingAdapter::default();
                let literal = i.to_string();
                let node = Node::comparison("age", ">", &[literal.as_str()]);
                translate(&fields, &node, &adapter).unwrap()
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), format!("gt(age, Integer({}))", i));
    }
}
