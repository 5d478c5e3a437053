//! The two collaborator entry points the registry consumes.

use std::fmt;
use std::sync::Arc;

use crate::catalog::{FieldKind, FieldTypeCatalog};
use crate::error::Result;
use crate::introspect::ModelIntrospector;
use crate::types::PropertyInfo;

/// Property lookup and type resolution for one model configuration.
///
/// Cheap to clone; both collaborators are shared.
#[derive(Clone)]
pub struct FieldSource {
    introspector: Arc<dyn ModelIntrospector>,
    catalog: Arc<FieldTypeCatalog>,
}

impl FieldSource {
    /// Wrap an owned introspector and catalog.
    pub fn new(introspector: impl ModelIntrospector + 'static, catalog: FieldTypeCatalog) -> Self {
        Self::from_shared(Arc::new(introspector), Arc::new(catalog))
    }

    /// Build from collaborators shared with other sources.
    pub fn from_shared(
        introspector: Arc<dyn ModelIntrospector>,
        catalog: Arc<FieldTypeCatalog>,
    ) -> Self {
        Self {
            introspector,
            catalog,
        }
    }

    /// Name of the introspected model.
    pub fn model_name(&self) -> &str {
        self.introspector.model_name()
    }

    /// All native properties of the model.
    pub fn native_properties(&self) -> Vec<PropertyInfo> {
        self.introspector.properties()
    }

    /// Native properties of `field_name`, if the model has such an attribute.
    pub fn lookup_native_properties(&self, field_name: &str) -> Option<PropertyInfo> {
        self.introspector.property(field_name)
    }

    /// The representation registered under `type_name`.
    pub fn resolve_field_type(&self, type_name: &str) -> Result<Arc<dyn FieldKind>> {
        self.catalog.resolve(type_name)
    }

    /// The type catalog used for resolution.
    pub fn catalog(&self) -> &FieldTypeCatalog {
        &self.catalog
    }
}

impl fmt::Debug for FieldSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSource")
            .field("model", &self.model_name())
            .field("catalog", &self.catalog)
            .finish()
    }
}
