use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::document::DocumentError;
use super::validators::{AnyValidator, Validator};

/// Property values of one document, keyed by property name.
pub type Properties = BTreeMap<String, Value>;

static NULL: Value = Value::Null;

/// Declaration of a single property.
#[derive(Clone)]
pub struct PropertyDef {
    default: Value,
    required: bool,
    validator: Arc<dyn Validator>,
}

impl PropertyDef {
    pub fn new(validator: impl Validator + 'static) -> Self {
        Self {
            default: Value::Null,
            required: false,
            validator: Arc::new(validator),
        }
    }

    pub fn any() -> Self {
        Self::new(AnyValidator)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = value.into();
        self
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn initial(&self) -> &Value {
        &self.default
    }

    fn accepts(&self, value: &Value) -> bool {
        value.is_null() || self.validator.validate(value)
    }
}

impl fmt::Debug for PropertyDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDef")
            .field("default", &self.default)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

/// Declared properties of one document type.
///
/// Only names declared here can ever be read, written or stored on a
/// document of this type.
#[derive(Debug, Clone)]
pub struct Schema {
    doc_type: String,
    properties: BTreeMap<String, PropertyDef>,
    id_key: Option<String>,
}

impl Schema {
    pub fn new(doc_type: impl Into<String>) -> Self {
        Self {
            doc_type: doc_type.into(),
            properties: BTreeMap::new(),
            id_key: None,
        }
    }

    pub fn property(mut self, name: impl Into<String>, def: PropertyDef) -> Self {
        self.properties.insert(name.into(), def);
        self
    }

    /// Derive document ids from the value of `name`. Without an id key, or
    /// when `name` is not declared or holds `null` at save time, ids are
    /// assigned by the store.
    pub fn id_from(mut self, name: impl Into<String>) -> Self {
        self.id_key = Some(name.into());
        self
    }

    pub(crate) fn bind_type(mut self, doc_type: String) -> Self {
        self.doc_type = doc_type;
        self
    }

    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    pub fn id_key(&self) -> Option<&str> {
        self.id_key.as_deref()
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Every declared property at its default.
    pub fn defaults(&self) -> Properties {
        self.properties
            .iter()
            .map(|(name, def)| (name.clone(), def.initial().clone()))
            .collect()
    }

    pub fn get<'a>(&self, props: &'a Properties, name: &str) -> Result<&'a Value, DocumentError> {
        if !self.is_declared(name) {
            return Err(self.no_such_property(name));
        }
        Ok(props.get(name).unwrap_or(&NULL))
    }

    /// Validate and store `value`. Returns whether the stored value changed.
    /// On error `props` is left untouched.
    pub fn set(&self, props: &mut Properties, name: &str, value: Value) -> Result<bool, DocumentError> {
        let def = self
            .properties
            .get(name)
            .ok_or_else(|| self.no_such_property(name))?;

        if !def.accepts(&value) {
            return Err(DocumentError::Validation(format!(
                "invalid value for property '{name}' of type '{}': {value}",
                self.doc_type
            )));
        }

        if props.get(name) == Some(&value) {
            return Ok(false);
        }
        props.insert(name.to_string(), value);
        Ok(true)
    }

    /// Declared and holding a non-null value.
    pub fn has(&self, props: &Properties, name: &str) -> bool {
        self.is_declared(name) && props.get(name).is_some_and(|v| !v.is_null())
    }

    /// All required properties hold a non-null value.
    pub fn check_required(&self, props: &Properties) -> Result<(), DocumentError> {
        let missing: Vec<&str> = self
            .properties
            .iter()
            .filter(|(name, def)| def.is_required() && !self.has(props, name))
            .map(|(name, _)| name.as_str())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DocumentError::Validation(format!(
                "missing required properties for type '{}': {}",
                self.doc_type,
                missing.join(", ")
            )))
        }
    }

    /// Keep only declared keys from a stored payload, filling gaps with
    /// defaults. Returns the dropped keys.
    pub(crate) fn project(&self, mut payload: Properties) -> (Properties, Vec<String>) {
        let mut props = self.defaults();
        for (name, slot) in props.iter_mut() {
            if let Some(value) = payload.remove(name) {
                *slot = value;
            }
        }
        (props, payload.into_keys().collect())
    }

    fn no_such_property(&self, name: &str) -> DocumentError {
        DocumentError::NoSuchProperty {
            doc_type: self.doc_type.clone(),
            name: name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::validators::StringValidator;
    use serde_json::json;

    fn user() -> Schema {
        Schema::new("user")
            .property("login", PropertyDef::new(StringValidator::default()).required())
            .property("name", PropertyDef::new(StringValidator::default()))
            .property("active", PropertyDef::any().default_value(true))
            .id_from("login")
    }

    #[test]
    fn defaults_cover_every_declared_name() {
        let props = user().defaults();
        assert_eq!(props.len(), 3);
        assert_eq!(props["active"], json!(true));
        assert_eq!(props["name"], Value::Null);
    }

    #[test]
    fn rejected_set_leaves_props_untouched() {
        let schema = user();
        let mut props = schema.defaults();
        let before = props.clone();

        assert!(matches!(
            schema.set(&mut props, "login", json!(42)),
            Err(DocumentError::Validation(_))
        ));
        assert!(matches!(
            schema.set(&mut props, "unknown", json!("x")),
            Err(DocumentError::NoSuchProperty { .. })
        ));
        assert_eq!(props, before);
    }

    #[test]
    fn set_reports_change() {
        let schema = user();
        let mut props = schema.defaults();
        assert!(schema.set(&mut props, "login", json!("kore")).unwrap());
        assert!(!schema.set(&mut props, "login", json!("kore")).unwrap());
    }

    #[test]
    fn project_drops_undeclared_keys() {
        let mut payload = Properties::new();
        payload.insert("login".into(), json!("kore"));
        payload.insert("legacy".into(), json!(1));

        let (props, dropped) = user().project(payload);
        assert_eq!(props["login"], json!("kore"));
        assert_eq!(props["active"], json!(true));
        assert_eq!(dropped, vec!["legacy".to_string()]);
    }

    #[test]
    fn check_required_names_missing() {
        let schema = user();
        let err = schema.check_required(&schema.defaults()).unwrap_err();
        assert!(err.to_string().contains("login"));
    }
}
