//! Integration tests for active field resolution
//!
//! Exercises the registry through its public API with a hand-written
//! introspector and a custom field kind, the way an admin configuration
//! layer would drive it.

use std::sync::Arc;

use admin_fields::{
    Bindings, FieldConfig, FieldKind, FieldRegistry, FieldSource, FieldTypeCatalog, FieldsError,
    ModelIntrospector, PropertyInfo,
};
use rstest::rstest;

/// Introspector for an `order` model backed by a fixed column list.
struct OrderColumns;

impl ModelIntrospector for OrderColumns {
    fn model_name(&self) -> &str {
        "order"
    }

    fn properties(&self) -> Vec<PropertyInfo> {
        vec![
            PropertyInfo::new("id", "integer"),
            PropertyInfo::new("number", "string"),
            PropertyInfo::new("customer_id", "integer").foreign_key(),
            PropertyInfo::new("customer", "belongs_to_association").references("customer"),
            PropertyInfo::new("total", "decimal"),
            PropertyInfo::new("placed_at", "datetime"),
            PropertyInfo::new("comment", "text"),
        ]
    }
}

/// A money field shown read-only by default.
struct MoneyKind;

impl FieldKind for MoneyKind {
    fn type_name(&self) -> &str {
        "money"
    }

    fn build(&self, name: &str, properties: Option<PropertyInfo>) -> FieldConfig {
        let mut field = FieldConfig::new(name, "money", properties);
        field.set_read_only(true);
        field
    }
}

fn order_registry() -> FieldRegistry {
    let mut catalog = FieldTypeCatalog::with_builtins();
    catalog.register(MoneyKind).expect("money kind registers once");
    FieldRegistry::from_model(FieldSource::new(OrderColumns, catalog))
}

fn active(registry: &FieldRegistry) -> Vec<String> {
    registry
        .fields()
        .iter()
        .map(|f| f.name().to_string())
        .collect()
}

#[test_log::test]
fn nothing_defined_shows_everything_in_declaration_order() {
    let registry = order_registry();
    assert_eq!(
        active(&registry),
        ["id", "number", "customer_id", "customer", "total", "placed_at", "comment"]
    );
}

#[rstest]
#[case(&["total", "number"], &["total", "number"])]
#[case(&["comment", "id", "placed_at"], &["comment", "id", "placed_at"])]
#[case(&["number", "number", "total"], &["number", "total"])]
fn declarations_define_the_active_order(#[case] declared: &[&str], #[case] expected: &[&str]) {
    let mut registry = order_registry();
    for name in declared {
        registry.field(name, None).unwrap();
    }
    assert_eq!(active(&registry), expected);
}

#[test_log::test]
fn overriding_the_type_uses_the_custom_kind() {
    let mut registry = order_registry();
    registry.field("number", None).unwrap();
    let decimal_id = registry.get("total").unwrap().id();

    let total = registry.field("total", Some("money")).unwrap();
    assert_ne!(total.id(), decimal_id);
    assert!(total.is_read_only());
    assert_eq!(total.properties().map(|p| p.type_.as_str()), Some("decimal"));
    assert_eq!(total.order(), 2);

    assert!(registry.fields_of_type("decimal").is_empty());
    assert_eq!(registry.fields_of_type("money").len(), 1);
}

#[test_log::test]
fn type_is_stable_when_omitted() {
    let mut registry = order_registry();
    let first = registry.field("total", Some("money")).unwrap().id();
    let second = registry.field("total", None).unwrap();
    assert_eq!(second.id(), first);
    assert_eq!(second.field_type(), "money");
}

#[test_log::test]
fn exclusion_priming_only_fires_when_nothing_is_defined() {
    let mut primed = order_registry();
    primed.exclude_fields(&["id", "customer_id"]);
    assert_eq!(
        active(&primed),
        ["number", "customer", "total", "placed_at", "comment"]
    );

    let mut curated = order_registry();
    curated.field("number", None).unwrap();
    curated.field("total", None).unwrap();
    curated.exclude_fields(&["id"]);
    assert_eq!(active(&curated), ["number", "total"]);
}

#[test_log::test]
fn orders_are_not_renumbered_after_exclusion() {
    let mut registry = order_registry();
    registry.field("number", None).unwrap();
    registry.field("total", None).unwrap();
    registry.exclude_fields(&["number"]);
    registry.field("comment", None).unwrap();

    assert_eq!(registry.get("total").unwrap().order(), 2);
    // Counted after exclusion: total and comment are the defined fields.
    assert_eq!(registry.get("comment").unwrap().order(), 2);
    assert_eq!(active(&registry), ["total", "comment"]);
}

#[test_log::test]
fn hidden_foreign_keys_stay_out_of_visible_fields_until_declared() {
    let mut registry = order_registry();
    registry.include_all_fields();

    let bindings = Bindings::new().with("view", "list");
    let visible: Vec<&str> = registry
        .visible_fields_in(&bindings)
        .iter()
        .map(|b| b.name())
        .collect();
    assert!(!visible.contains(&"customer_id"));

    registry.field("customer_id", None).unwrap();
    let visible: Vec<&str> = registry
        .visible_fields_in(&bindings)
        .iter()
        .map(|b| b.name())
        .collect();
    assert!(visible.contains(&"customer_id"));
}

#[test_log::test]
fn visibility_predicates_are_evaluated_per_context() {
    let mut registry = order_registry();
    registry
        .field_with("comment", None, |f| {
            f.visible_if(|bound| {
                bound
                    .bindings()
                    .get("user")
                    .and_then(|user| user.get("staff"))
                    .and_then(|staff| staff.as_bool())
                    .unwrap_or(false)
            });
            Ok(())
        })
        .unwrap();
    registry.field("number", None).unwrap();

    let customer = Bindings::new().with("user", serde_json::json!({ "staff": false }));
    let staff = Bindings::new().with("user", serde_json::json!({ "staff": true }));

    registry.set_bindings(customer);
    let names: Vec<&str> = registry.visible_fields().iter().map(|b| b.name()).collect();
    assert_eq!(names, ["number"]);

    registry.set_bindings(staff);
    let bound = registry.visible_fields();
    let names: Vec<&str> = bound.iter().map(|b| b.name()).collect();
    assert_eq!(names, ["comment", "number"]);
    assert!(bound.iter().all(|b| b.bindings() == registry.bindings()));
}

#[test_log::test]
fn configurator_failures_reach_the_caller() {
    let mut registry = order_registry();
    let result = registry.fields_of_type_with("integer", |f| {
        Err(FieldsError::configuration(f.name(), "integers are frozen"))
    });
    match result {
        Err(FieldsError::Configuration { field, message }) => {
            assert_eq!(field, "id");
            assert_eq!(message, "integers are frozen");
        }
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test_log::test]
fn source_can_be_shared_between_registries() {
    let introspector: Arc<dyn ModelIntrospector> = Arc::new(OrderColumns);
    let catalog = Arc::new(FieldTypeCatalog::with_builtins());

    let mut list = FieldRegistry::from_model(FieldSource::from_shared(
        introspector.clone(),
        catalog.clone(),
    ));
    let edit = FieldRegistry::from_model(FieldSource::from_shared(introspector, catalog));

    list.field("number", None).unwrap();
    assert_eq!(active(&list), ["number"]);
    assert_eq!(edit.fields().len(), 7);
}
