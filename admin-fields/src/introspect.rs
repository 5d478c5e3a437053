//! Model introspection seam.

use crate::types::{ModelSchema, PropertyInfo};

/// Reports a model's native properties.
pub trait ModelIntrospector: Send + Sync {
    /// Name of the introspected model.
    fn model_name(&self) -> &str;

    /// All native properties, in the model's column order.
    fn properties(&self) -> Vec<PropertyInfo>;

    /// Properties of a single attribute.
    fn property(&self, name: &str) -> Option<PropertyInfo> {
        self.properties().into_iter().find(|p| p.name == name)
    }
}

impl ModelIntrospector for ModelSchema {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn properties(&self) -> Vec<PropertyInfo> {
        self.properties.clone()
    }

    fn property(&self, name: &str) -> Option<PropertyInfo> {
        self.properties.iter().find(|p| p.name == name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedColumns;

    impl ModelIntrospector for FixedColumns {
        fn model_name(&self) -> &str {
            "fixed"
        }

        fn properties(&self) -> Vec<PropertyInfo> {
            vec![
                PropertyInfo::new("a", "string"),
                PropertyInfo::new("b", "integer"),
            ]
        }
    }

    #[test]
    fn default_property_lookup_scans_properties() {
        let introspector = FixedColumns;
        assert_eq!(introspector.property("b").unwrap().type_, "integer");
        assert!(introspector.property("c").is_none());
    }

    #[test]
    fn model_schema_introspects_itself() {
        let schema = ModelSchema::new("team").with_property(PropertyInfo::new("name", "string"));
        assert_eq!(schema.model_name(), "team");
        assert_eq!(ModelIntrospector::properties(&schema).len(), 1);
        assert!(schema.property("name").is_some());
    }
}
