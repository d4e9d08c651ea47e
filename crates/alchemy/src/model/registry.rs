//! Model registry: definitions and resolved configs keyed by model name.
//!
//! Populated during application setup, then shared read-only (usually behind
//! an `Arc`) with every `Client`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use super::codec::is_truthy;
use super::config::{ModelConfig, ModelOptions, ModelSchema, with_trailing_slash};
use crate::error::{Error, Result};
use crate::settings::RegistrySettings;
use crate::Record;

#[derive(Debug)]
pub struct ModelRegistry {
    url_prefix: String,
    definitions: HashMap<String, Record>,
    configs: HashMap<String, Arc<ModelConfig>>,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self {
            url_prefix: "/".to_string(),
            definitions: HashMap::new(),
            configs: HashMap::new(),
        }
    }

    /// Default prefix for models registered after this call.
    pub fn set_url_prefix(&mut self, prefix: &str) {
        self.url_prefix = with_trailing_slash(prefix);
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Store a copy of `defaults` as the model's definition and resolve its config.
    pub fn register_model(&mut self, name: &str, defaults: &Record, options: ModelOptions) {
        self.install(name, defaults.clone(), options);
    }

    /// Resolve and store the config for an already-defined model.
    pub fn register_config(&mut self, name: &str, options: ModelOptions) -> Result<()> {
        let definition = self
            .definitions
            .remove(name)
            .ok_or_else(|| Error::ModelNotFound(name.to_string()))?;
        self.install(name, definition, options);
        Ok(())
    }

    fn install(&mut self, name: &str, mut definition: Record, options: ModelOptions) {
        let base = options.base_url(name, &self.url_prefix);
        let id_field = options.id_field.as_deref().unwrap_or("id");
        if !definition.get(id_field).is_some_and(is_truthy) {
            definition.insert(id_field.to_string(), Value::String(String::new()));
        }
        let schema = ModelSchema {
            name: name.to_string(),
            definition: definition.clone(),
        };
        let config = options.resolve(schema, &base);
        tracing::debug!(
            "registered model {} (base={}, id_field={})",
            name,
            base,
            config.id_field
        );
        self.definitions.insert(name.to_string(), definition);
        self.configs.insert(name.to_string(), Arc::new(config));
    }

    /// Copy of the model's field defaults.
    pub fn definition(&self, name: &str) -> Option<Record> {
        self.definitions.get(name).cloned()
    }

    pub fn config(&self, name: &str) -> Result<Arc<ModelConfig>> {
        self.configs
            .get(name)
            .cloned()
            .ok_or_else(|| Error::ModelNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.configs.contains_key(name)
    }

    /// Registered model names in sorted order.
    pub fn model_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.configs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    pub fn from_settings(settings: RegistrySettings) -> Self {
        let mut registry = Self::new();
        if let Some(prefix) = settings.url_prefix.as_deref() {
            registry.set_url_prefix(prefix);
        }
        for (name, model) in settings.models {
            registry.register_model(&name, &model.defaults, model.options);
        }
        tracing::info!("loaded {} model(s) from settings", registry.len());
        registry
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(Self::from_settings(RegistrySettings::from_toml_str(s)?))
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        Ok(Self::from_settings(RegistrySettings::load_from_file(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn rec(v: Value) -> Record {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn default_routes_use_lowercase_plural() {
        let mut r = ModelRegistry::new();
        r.register_model("User", &rec(json!({"name": ""})), ModelOptions::default());
        let c = r.config("User").expect("registered");
        assert_eq!(c.urls.collection, "/users/");
        assert_eq!(c.urls.create, "/users/");
        assert_eq!(c.urls.retrieve, "/users/{id}");
        assert_eq!(c.urls.update, "/users/{id}");
        assert_eq!(c.urls.delete, "/users/{id}");
        assert_eq!(c.id_field, "id");
    }

    #[test]
    fn prefix_applies_to_later_registrations_only() {
        let mut r = ModelRegistry::new();
        r.register_model("Early", &Record::new(), ModelOptions::default());
        r.set_url_prefix("/api/v1");
        assert_eq!(r.url_prefix(), "/api/v1/");
        r.register_model("Late", &Record::new(), ModelOptions::default());
        assert_eq!(r.config("Early").expect("early").urls.collection, "/earlys/");
        assert_eq!(r.config("Late").expect("late").urls.collection, "/api/v1/lates/");
    }

    #[test]
    fn definition_is_copied_and_gains_id_field() {
        let mut defaults = rec(json!({"title": ""}));
        let mut r = ModelRegistry::new();
        r.register_model("Post", &defaults, ModelOptions::default());
        defaults.insert("mutated".into(), json!(true));
        let def = r.definition("Post").expect("defined");
        assert_eq!(Value::Object(def), json!({"title": "", "id": ""}));
        assert!(r.definition("Nope").is_none());
    }

    #[test]
    fn custom_id_field_is_added_to_definition() {
        let mut r = ModelRegistry::new();
        r.register_model("Tag", &Record::new(), ModelOptions::default().id_field("slug"));
        let def = r.definition("Tag").expect("defined");
        assert!(def.contains_key("slug"));
        assert!(!def.contains_key("id"));
    }

    #[test]
    fn falsy_id_default_is_reset_to_empty() {
        let mut r = ModelRegistry::new();
        let defaults = rec(json!({"id": null, "title": ""}));
        r.register_model("Post", &defaults, ModelOptions::default());
        r.register_model("Draft", &rec(json!({"id": 0})), ModelOptions::default());
        r.register_model("Seeded", &rec(json!({"id": 4})), ModelOptions::default());
        assert_eq!(r.definition("Post").expect("defined")["id"], json!(""));
        assert_eq!(r.definition("Draft").expect("defined")["id"], json!(""));
        assert_eq!(r.definition("Seeded").expect("defined")["id"], json!(4));
    }

    #[test]
    fn unknown_model_is_a_typed_error() {
        let mut r = ModelRegistry::new();
        let err = r.config("Ghost").expect_err("missing");
        assert!(matches!(err, Error::ModelNotFound(ref n) if n == "Ghost"));
        let err = r
            .register_config("Ghost", ModelOptions::default())
            .expect_err("missing");
        assert!(err.is_not_found());
    }

    #[test]
    fn register_config_replaces_existing_config() {
        let mut r = ModelRegistry::new();
        r.register_model("User", &Record::new(), ModelOptions::default());
        r.register_config("User", ModelOptions::default().collection_url("/people/"))
            .expect("defined");
        let c = r.config("User").expect("registered");
        assert_eq!(c.urls.collection, "/people/");
        assert_eq!(c.urls.retrieve, "/users/{id}");
    }

    #[test]
    fn names_are_sorted() {
        let mut r = ModelRegistry::new();
        for n in ["Zed", "Alpha", "Mid"] {
            r.register_model(n, &Record::new(), ModelOptions::default());
        }
        assert_eq!(r.model_names(), vec!["Alpha", "Mid", "Zed"]);
        assert_eq!(r.len(), 3);
        assert!(r.contains("Mid"));
    }

    proptest! {
        #[test]
        fn retrieve_url_ends_in_id(
            name in "[A-Z][a-zA-Z]{0,12}",
            prefix in "(/[a-z0-9]{1,6}){0,3}/?",
        ) {
            let mut r = ModelRegistry::new();
            r.set_url_prefix(&prefix);
            r.register_model(&name, &Record::new(), ModelOptions::default());
            let c = r.config(&name).expect("registered");
            let ends_in_id = c.urls.retrieve.ends_with("/{id}");
            prop_assert!(ends_in_id, "retrieve url {:?}", c.urls.retrieve);
        }
    }
}
