use std::collections::BTreeMap;
use std::sync::Arc;

use crate::document::{DocumentError, Schema};

/// Type name to schema binding.
///
/// Populated by explicit registration at startup; there are no implicit
/// types.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    types: BTreeMap<String, Arc<Schema>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `type_name` to `schema`, replacing any previous binding.
    ///
    /// The registered name becomes the schema's document type, so documents
    /// created through it report and store `type_name`.
    pub fn register(&mut self, type_name: impl Into<String>, schema: Schema) {
        let type_name = type_name.into();
        let schema = schema.bind_type(type_name.clone());
        if let Some(key) = schema.id_key() {
            if !schema.is_declared(key) {
                log::warn!(
                    "id key '{key}' is not declared on type '{type_name}'; ids will be store-assigned"
                );
            }
        }
        if self.types.insert(type_name.clone(), Arc::new(schema)).is_some() {
            log::debug!("replaced schema binding for type '{type_name}'");
        }
    }

    pub fn lookup(&self, type_name: &str) -> Result<Arc<Schema>, DocumentError> {
        self.types
            .get(type_name)
            .cloned()
            .ok_or_else(|| DocumentError::UnknownType(type_name.to_string()))
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PropertyDef;

    #[test]
    fn lookup_unknown_fails() {
        let registry = Registry::new();
        assert!(matches!(
            registry.lookup("user"),
            Err(DocumentError::UnknownType(t)) if t == "user"
        ));
    }

    #[test]
    fn later_registration_wins() {
        let mut registry = Registry::new();
        registry.register("user", Schema::new("user"));
        registry.register("user", Schema::new("user").property("name", PropertyDef::any()));
        assert!(registry.lookup("user").unwrap().is_declared("name"));
        assert_eq!(registry.type_names().collect::<Vec<_>>(), vec!["user"]);
    }

    #[test]
    fn registered_name_is_the_document_type() {
        let mut registry = Registry::new();
        registry.register("user", Schema::new("account"));
        assert_eq!(registry.lookup("user").unwrap().doc_type(), "user");
        assert!(registry.lookup("account").is_err());
    }
}
