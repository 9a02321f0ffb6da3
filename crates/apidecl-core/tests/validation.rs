//! Integration tests for the validation engine

use apidecl_core::validation::{validate_at, AttributePath};
use apidecl_core::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn validator(kind: ValidatorKind, config: serde_json::Value) -> Validator {
    Validator::build(kind, &config).unwrap()
}

fn signup_registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .add_schema(
            "Signup",
            SchemaNode::object()
                .property(
                    "username",
                    SchemaNode::string()
                        .required()
                        .validator(validator(ValidatorKind::MinLength, json!(3)))
                        .validator(validator(ValidatorKind::MaxLength, json!(8)))
                        .validator(validator(ValidatorKind::Pattern, json!("^[a-z]+$"))),
                )
                .property(
                    "age",
                    SchemaNode::integer()
                        .validator(validator(ValidatorKind::Minimum, json!(13)))
                        .validator(validator(ValidatorKind::Maximum, json!({ "value": 130, "exclusive": true }))),
                )
                .property(
                    "plan",
                    SchemaNode::string()
                        .existence(Existence::AllowNil)
                        .validator(validator(ValidatorKind::Enum, json!(["free", "pro"]))),
                )
                .property(
                    "interests",
                    SchemaNode::array(
                        SchemaNode::string().validator(validator(ValidatorKind::MaxLength, json!(5))),
                    )
                    .validator(validator(ValidatorKind::MinItems, json!(1))),
                )
                .property("address", Schema::reference("Address")),
        )
        .unwrap();
    registry
        .add_schema(
            "Address",
            SchemaNode::object()
                .property("zip_code", SchemaNode::string().required())
                .property("city", SchemaNode::string()),
        )
        .unwrap();
    registry
}

fn errors_for(input: serde_json::Value) -> ValidationErrors {
    let registry = signup_registry();
    let schema = Schema::reference("Signup");
    let node = cast_wire(Some(&input), &schema, &registry).unwrap();
    let mut errors = ValidationErrors::new();
    let valid = validate(&node, &mut errors);
    assert_eq!(valid, errors.is_empty());
    errors
}

#[test]
fn valid_input_has_no_errors() {
    let errors = errors_for(json!({
        "username": "ferris",
        "age": "30",
        "plan": null,
        "interests": ["rust"],
        "address": { "zip_code": "12345" }
    }));
    assert!(errors.is_empty(), "{}", errors);
}

#[test]
fn present_rejects_empty_string() {
    let errors = errors_for(json!({ "username": "", "plan": "free" }));
    assert_eq!(errors.details(), vec![("username", ErrorKind::Blank)]);
}

#[test]
fn allow_omitted_accepts_missing_values() {
    let mut registry = Registry::new();
    registry
        .add_schema(
            "Filter",
            SchemaNode::object().property("q", SchemaNode::string().existence(Existence::AllowOmitted)),
        )
        .unwrap();
    let schema = Schema::reference("Filter");
    let node = cast_wire(Some(&json!({})), &schema, &registry).unwrap();
    assert!(node.errors().is_empty());
}

#[test]
fn allow_nil_requires_the_key() {
    let errors = errors_for(json!({ "username": "ferris" }));
    assert_eq!(errors.details(), vec![("plan", ErrorKind::Blank)]);

    let errors = errors_for(json!({ "username": "ferris", "plan": null }));
    assert!(errors.is_empty());
}

#[test]
fn every_validator_reports() {
    let errors = errors_for(json!({ "username": "AB", "plan": "free" }));
    assert_eq!(
        errors.details(),
        vec![("username", ErrorKind::TooShort), ("username", ErrorKind::Invalid)]
    );
}

#[test]
fn exclusive_bound_boundary() {
    let errors = errors_for(json!({ "username": "ferris", "plan": "pro", "age": 130 }));
    let error = errors.iter().next().unwrap();
    assert_eq!(error.attribute, "age");
    assert_eq!(error.kind, ErrorKind::LessThan);
    assert_eq!(error.options.get("count"), Some(&json!(130)));

    assert!(errors_for(json!({ "username": "ferris", "plan": "pro", "age": 129 })).is_empty());
}

#[test]
fn structural_failure_is_a_single_invalid_error() {
    let errors = errors_for(json!({ "username": "ferris", "plan": "pro", "age": "old" }));
    assert_eq!(errors.details(), vec![("age", ErrorKind::Invalid)]);
}

#[test]
fn array_elements_share_the_array_path() {
    let errors = errors_for(json!({
        "username": "ferris",
        "plan": "pro",
        "interests": ["music", "photography", "gardening"]
    }));
    assert_eq!(
        errors.details(),
        vec![("interests", ErrorKind::TooLong), ("interests", ErrorKind::TooLong)]
    );
}

#[test]
fn empty_array_fails_min_items() {
    let errors = errors_for(json!({ "username": "ferris", "plan": "pro", "interests": [] }));
    assert_eq!(errors.details(), vec![("interests", ErrorKind::Invalid)]);
}

#[test]
fn nested_errors_are_dotted() {
    let errors = errors_for(json!({
        "username": "ferris",
        "plan": "gold",
        "address": { "city": "Berlin" }
    }));
    assert_eq!(
        errors.details(),
        vec![("plan", ErrorKind::Inclusion), ("address.zip_code", ErrorKind::Blank)]
    );
    assert_eq!(
        errors.to_string(),
        "Plan is not included in the list. Address zip code can't be blank"
    );
}

#[test]
fn root_errors_are_on_base() {
    let registry = Registry::new();
    let schema: Schema = SchemaNode::string().format("date").required().into();

    let node = cast(Some(Raw::string("31/12/2020")), &schema, &registry).unwrap();
    assert_eq!(node.errors().details(), vec![("base", ErrorKind::Invalid)]);
    assert_eq!(node.errors().to_string(), "is invalid");

    let node = cast(None, &schema, &registry).unwrap();
    assert_eq!(node.errors().details(), vec![("base", ErrorKind::Blank)]);
}

#[test]
fn validate_at_prefixes_paths() {
    let registry = Registry::new();
    let schema: Schema = SchemaNode::object()
        .property("id", SchemaNode::integer().required())
        .into();
    let node = cast(Some(json!({}).to_raw()), &schema, &registry).unwrap();

    let mut errors = ValidationErrors::new();
    assert!(!validate_at(&node, &AttributePath::root().child("body"), &mut errors));
    assert_eq!(errors.details(), vec![("body.id", ErrorKind::Blank)]);
}

#[test]
fn custom_catalog_formats_messages() {
    struct German;
    impl MessageCatalog for German {
        fn format(&self, kind: ErrorKind, _options: &validation::ErrorOptions, _locale: &str) -> String {
            match kind {
                ErrorKind::Blank => "muss ausgefüllt werden".to_string(),
                other => DefaultMessages::template(other).to_string(),
            }
        }
    }

    let errors = errors_for(json!({ "plan": "free" }));
    assert_eq!(errors.full_messages(&German, "de"), vec!["Username muss ausgefüllt werden"]);
}
