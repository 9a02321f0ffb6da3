//! Integration tests for the casting engine

use apidecl_core::casting::{JsonObject, WireObject};
use apidecl_core::*;
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::borrow::Cow;

fn pet_registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .add_schema(
            "Pet",
            SchemaNode::object()
                .model("Pet")
                .property("name", SchemaNode::string().required())
                .property("age", SchemaNode::integer())
                .property("vaccinated", SchemaNode::boolean())
                .property("born", SchemaNode::string().format("date"))
                .property("tags", SchemaNode::array(SchemaNode::string()))
                .property("owner", Schema::reference("Owner")),
        )
        .unwrap();
    registry
        .add_schema(
            "Owner",
            SchemaNode::object().property("email", SchemaNode::string().format("email")),
        )
        .unwrap();
    registry
}

mod coercion {
    use super::*;

    #[test]
    fn string_to_integer_round_trip() {
        let mut registry = Registry::new();
        registry
            .add_schema(
                "Pair",
                SchemaNode::object()
                    .property("a", SchemaNode::string())
                    .property("b", SchemaNode::integer()),
            )
            .unwrap();
        let schema = Schema::reference("Pair");
        let input = json!({ "a": "x", "b": "3" });

        let node = cast(Some(input.to_raw()), &schema, &registry).unwrap();
        let model = node.model().unwrap();
        assert_eq!(model.get("a").and_then(Casted::as_str), Some("x"));
        assert_eq!(model.get("b").and_then(Casted::as_i64), Some(3));
    }

    #[test]
    fn nested_references_are_resolved() {
        let registry = pet_registry();
        let schema = Schema::reference("Pet");
        let input = json!({ "name": "Rex", "owner": { "email": "a@b.c", "ignored": 1 } });

        let node = cast(Some(input.to_raw()), &schema, &registry).unwrap();
        let owner = node.attribute("owner").unwrap();
        assert_eq!(owner.model().unwrap().to_json(), json!({ "email": "a@b.c" }));
    }

    #[test]
    fn unknown_attributes_are_ignored() {
        let registry = pet_registry();
        let schema = Schema::reference("Pet");
        let input = json!({ "name": "Rex", "species": "dog" });

        let node = cast(Some(input.to_raw()), &schema, &registry).unwrap();
        let model = node.model().unwrap();
        assert!(model.get("species").is_none());
        assert_eq!(model.binding(), Some("Pet"));
        assert_eq!(
            model.attributes().keys().collect::<Vec<_>>(),
            vec!["name", "age", "vaccinated", "born", "tags", "owner"]
        );
    }

    #[test]
    fn dates_are_parsed() {
        let registry = pet_registry();
        let schema = Schema::reference("Pet");
        let input = json!({ "name": "Rex", "born": "2020-04-01" });

        let node = cast(Some(input.to_raw()), &schema, &registry).unwrap();
        assert_eq!(
            node.attribute("born").unwrap().value().as_date(),
            NaiveDate::from_ymd_opt(2020, 4, 1)
        );
    }

    #[test]
    fn scalars_are_wrapped_into_arrays() {
        let registry = pet_registry();
        let schema = Schema::reference("Pet");

        let single = json!({ "tags": "friendly" });
        let node = cast(Some(single.to_raw()), &schema, &registry).unwrap();
        assert_eq!(node.attribute("tags").unwrap().value().to_json(), json!(["friendly"]));

        let blank = json!({ "tags": "" });
        let node = cast(Some(blank.to_raw()), &schema, &registry).unwrap();
        assert_eq!(node.attribute("tags").unwrap().elements().len(), 0);
    }

    #[test]
    fn numbers_accept_integers() {
        let registry = Registry::new();
        let schema: Schema = SchemaNode::number().into();
        let node = cast(Some(Raw::Integer(4)), &schema, &registry).unwrap();
        assert_eq!(node.value(), &Casted::Number(4.0));
    }

    #[test]
    fn malformed_scalars_become_invalid_nodes() {
        let registry = Registry::new();
        let cases: Vec<(Schema, Value)> = vec![
            (SchemaNode::integer().into(), json!("three")),
            (SchemaNode::integer().into(), json!(3.5)),
            (SchemaNode::number().into(), json!("1.2.3")),
            (SchemaNode::boolean().into(), json!("yes")),
            (SchemaNode::string().format("date").into(), json!("2021-13-01")),
            (SchemaNode::string().format("date-time").into(), json!("noon")),
            (SchemaNode::string().format("duration").into(), json!("1 hour")),
            (SchemaNode::object().into(), json!("flat")),
            (SchemaNode::string().into(), json!({ "nested": true })),
        ];
        for (schema, input) in &cases {
            let node = cast(Some(input.to_raw()), schema, &registry).unwrap();
            assert!(node.is_invalid(), "{} should not cast", input);
            assert_eq!(node.value(), &Casted::Null);
        }
    }
}

mod defaults {
    use super::*;

    #[test]
    fn static_default_fills_omitted_values() {
        let registry = Registry::new();
        let schema: Schema = SchemaNode::object()
            .property("page", SchemaNode::integer().default_value(1))
            .into();

        let node = cast(Some(json!({}).to_raw()), &schema, &registry).unwrap();
        assert_eq!(node.attribute("page").unwrap().value(), &Casted::Integer(1));
    }

    #[test]
    fn explicit_null_is_kept() {
        let registry = Registry::new();
        let schema: Schema = SchemaNode::object()
            .property("page", SchemaNode::integer().default_value(1))
            .into();

        let node = cast(Some(json!({ "page": null }).to_raw()), &schema, &registry).unwrap();
        let page = node.attribute("page").unwrap();
        assert!(page.is_null());
        assert!(!page.is_omitted());
    }

    #[test]
    fn producer_runs_per_cast() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let registry = Registry::new();
        let schema: Schema = SchemaNode::string()
            .default_with(move || json!(format!("id-{}", counter.fetch_add(1, Ordering::SeqCst))))
            .into();

        let first = cast(None, &schema, &registry).unwrap();
        let second = cast(None, &schema, &registry).unwrap();
        assert_eq!(first.value().as_str(), Some("id-0"));
        assert_eq!(second.value().as_str(), Some("id-1"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn missing_without_default_is_omitted_null() {
        let registry = Registry::new();
        let schema: Schema = SchemaNode::string().into();
        let node = cast(None, &schema, &registry).unwrap();
        assert!(node.is_omitted());
        assert!(node.is_empty());
    }
}

mod modes {
    use super::*;

    #[test]
    fn wire_mode_accepts_capitalized_booleans() {
        let registry = Registry::new();
        let schema: Schema = SchemaNode::boolean().into();
        let input = json!("True");

        let wire = cast_wire(Some(&input), &schema, &registry).unwrap();
        assert_eq!(wire.value(), &Casted::Bool(true));

        let object = cast(Some(input.to_raw()), &schema, &registry).unwrap();
        assert!(object.is_invalid());
    }

    #[test]
    fn wire_mode_reads_bracketed_keys() {
        let registry = pet_registry();
        let schema = Schema::reference("Pet");
        let input = json!({ "name": "Rex", "tags[]": ["a", "b"] });

        let wire = cast_wire(Some(&input), &schema, &registry).unwrap();
        assert_eq!(wire.attribute("tags").unwrap().elements().len(), 2);

        let object = Caster::new(&registry, CastMode::Object)
            .cast_json(Some(&input), &schema)
            .unwrap();
        assert!(object.attribute("tags").unwrap().is_omitted());
    }

    #[test]
    fn empty_form_field_is_null_for_objects() {
        let registry = pet_registry();
        let input = json!({ "name": "Rex", "age": "", "owner": "" });

        let schema = Schema::reference("Pet");
        let node = cast_wire(Some(&input), &schema, &registry).unwrap();
        let owner = node.attribute("owner").unwrap();
        assert!(!owner.is_invalid());
        assert!(owner.is_null());
        assert!(!owner.is_omitted());
        assert!(node.attribute("age").unwrap().is_null());
        assert!(node.errors().is_empty(), "{}", node.errors());
    }

    #[test]
    fn explicit_sources_choose_the_key_rules() {
        let registry = pet_registry();
        let schema = Schema::reference("Pet");
        let input = json!({ "tags[]": "a" });
        let map = input.as_object().unwrap();

        let strict = cast(Some(Raw::object(JsonObject(map))), &schema, &registry).unwrap();
        assert!(strict.attribute("tags").unwrap().is_omitted());

        let tolerant = cast(Some(Raw::object(WireObject(map))), &schema, &registry).unwrap();
        assert_eq!(tolerant.attribute("tags").unwrap().value().to_json(), json!(["a"]));
    }

    #[test]
    fn registry_default_mode() {
        let registry = Registry::with_config(EngineConfig::default().with_default_cast_mode(CastMode::Wire));
        assert_eq!(Caster::for_registry(&registry).mode(), CastMode::Wire);
    }
}

mod application_objects {
    use super::*;

    struct Pet {
        name: String,
        age: Option<u32>,
        nicknames: Vec<String>,
    }

    impl AttributeSource for Pet {
        fn attribute(&self, name: &str) -> Option<Raw<'_>> {
            match name {
                "name" => Some(Raw::String(Cow::Borrowed(&self.name))),
                "age" => Some(self.age.to_raw()),
                "tags" => Some(self.nicknames.to_raw()),
                _ => None,
            }
        }
    }

    #[test]
    fn structs_cast_through_attribute_source() {
        let registry = pet_registry();
        let schema = Schema::reference("Pet");
        let pet = Pet {
            name: "Rex".into(),
            age: None,
            nicknames: vec!["T-Rex".into()],
        };

        let node = cast(Some(Raw::object(&pet)), &schema, &registry).unwrap();
        let model = node.model().unwrap();
        assert_eq!(model.get("name").and_then(Casted::as_str), Some("Rex"));
        assert_eq!(model.get("age"), Some(&Casted::Null));
        assert!(!node.attribute("age").unwrap().is_omitted());
        assert!(node.attribute("vaccinated").unwrap().is_omitted());
        assert_eq!(model.get("tags").unwrap().to_json(), json!(["T-Rex"]));
    }

    #[test]
    fn models_deserialize_into_application_types() {
        #[derive(Debug, serde::Deserialize, PartialEq)]
        struct Owner {
            email: Option<String>,
        }

        let registry = pet_registry();
        let schema = Schema::reference("Owner");
        let node = cast_wire(Some(&json!({ "email": "a@b.c" })), &schema, &registry).unwrap();
        let owner: Owner = node.model().unwrap().deserialize().unwrap();
        assert_eq!(owner, Owner { email: Some("a@b.c".into()) });
    }
}

mod references {
    use super::*;

    #[test]
    fn missing_reference_is_fatal() {
        let registry = Registry::new();
        let schema = Schema::reference("Ghost");
        let err = cast(Some(Raw::Null), &schema, &registry).unwrap_err();
        assert_eq!(err, ReferenceError::missing(ComponentKind::Schema, "Ghost"));
    }

    #[test]
    fn self_reference_is_fatal() {
        let mut registry = Registry::new();
        registry.add_schema("A", Schema::reference("A")).unwrap();
        let err = Caster::new(&registry, CastMode::Object)
            .cast_named(None, "A")
            .unwrap_err();
        assert!(matches!(err, ReferenceError::Circular { .. }));
    }

    #[test]
    fn depth_limit_applies() {
        let mut registry = Registry::with_config(EngineConfig::default().with_max_reference_depth(2));
        registry.add_schema("A", Schema::reference("B")).unwrap();
        registry.add_schema("B", Schema::reference("C")).unwrap();
        registry.add_schema("C", SchemaNode::string()).unwrap();
        let err = cast(None, &Schema::reference("A"), &registry).unwrap_err();
        assert!(matches!(err, ReferenceError::TooDeep { limit: 2, .. }));
    }

    #[test]
    fn recursive_shapes_cast_as_deep_as_the_data() {
        let mut registry = Registry::new();
        registry
            .add_schema(
                "Node",
                SchemaNode::object()
                    .property("label", SchemaNode::string())
                    .property("children", SchemaNode::array(Schema::reference("Node"))),
            )
            .unwrap();
        let input = json!({ "label": "root", "children": [ { "label": "leaf", "children": [] } ] });
        let schema = Schema::reference("Node");
        let node = cast_wire(Some(&input), &schema, &registry).unwrap();
        assert_eq!(node.value().to_json(), input);
    }
}
