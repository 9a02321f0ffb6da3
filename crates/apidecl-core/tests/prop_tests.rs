//! Property-based tests for casting and validation
//!
//! These check invariants that should hold for any input: existence
//! ordering, validator boundaries and the agreement between `validate`'s
//! return value and the errors it collects.

use apidecl_core::*;
use proptest::prelude::*;
use serde_json::{json, Value};

/// Strategy for generating existence levels
fn existence_strategy() -> impl Strategy<Value = Existence> {
    prop_oneof![
        Just(Existence::None),
        Just(Existence::AllowOmitted),
        Just(Existence::AllowNil),
        Just(Existence::Present),
    ]
}

/// Strategy for generating arbitrary JSON input
fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::hash_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

fn profile_schema(existence: Existence) -> Schema {
    SchemaNode::object()
        .property("name", SchemaNode::string().existence(existence))
        .property(
            "score",
            SchemaNode::integer()
                .existence(existence)
                .try_validator(ValidatorKind::Maximum, &json!(100))
                .unwrap(),
        )
        .property("labels", SchemaNode::array(SchemaNode::string()))
        .into()
}

proptest! {
    #[test]
    fn validate_result_matches_errors(input in json_value_strategy(), existence in existence_strategy()) {
        let registry = Registry::new();
        let schema = profile_schema(existence);
        let node = cast_wire(Some(&input), &schema, &registry).unwrap();

        let mut errors = ValidationErrors::new();
        let valid = validate(&node, &mut errors);
        prop_assert_eq!(valid, errors.is_empty());
    }

    #[test]
    fn stronger_levels_never_accept_more(input in json_value_strategy()) {
        let registry = Registry::new();
        let mut previous_valid = true;
        for existence in [Existence::None, Existence::AllowOmitted, Existence::AllowNil, Existence::Present] {
            let schema: Schema = SchemaNode::string().existence(existence).into();
            let node = cast_wire(Some(&input), &schema, &registry).unwrap();
            let valid = node.is_valid();
            prop_assert!(previous_valid || !valid, "{} accepted what a weaker level rejected", existence);
            previous_valid = valid;
        }
    }

    #[test]
    fn maximum_boundary(value in -1000i64..1000, bound in -500i64..500, exclusive in any::<bool>()) {
        let registry = Registry::new();
        let schema: Schema = SchemaNode::integer()
            .try_validator(ValidatorKind::Maximum, &json!({ "value": bound, "exclusive": exclusive }))
            .unwrap()
            .into();
        let node = cast(Some(Raw::Integer(value)), &schema, &registry).unwrap();
        let expected = if exclusive { value < bound } else { value <= bound };
        prop_assert_eq!(node.is_valid(), expected);
    }

    #[test]
    fn integer_strings_round_trip(value in any::<i64>()) {
        let registry = Registry::new();
        let schema: Schema = SchemaNode::integer().into();
        let node = cast(Some(Raw::string(value.to_string())), &schema, &registry).unwrap();
        prop_assert_eq!(node.value(), &Casted::Integer(value));
    }
}
