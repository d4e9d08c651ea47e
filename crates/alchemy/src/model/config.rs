//! Per-model configuration: URL templates, id field, and serializer hooks.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use super::codec;
use crate::Record;

/// Builds the outbound payload from an entity's current fields.
pub type ToServerFn = Arc<dyn Fn(&Record, &ModelSchema) -> Record + Send + Sync>;
/// Projects one response object onto a model; `None` means unusable data.
pub type FromServerFn = Arc<dyn Fn(&Value, &ModelSchema) -> Option<Record> + Send + Sync>;
/// Extracts a list of records from a collection response.
pub type CollectionFromServerFn =
    Arc<dyn Fn(&Value, &ModelSchema) -> Option<Vec<Record>> + Send + Sync>;

/// Name and field defaults of a registered model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSchema {
    pub name: String,
    pub definition: Record,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplates {
    pub collection: String,
    pub create: String,
    pub retrieve: String,
    pub update: String,
    pub delete: String,
}

impl UrlTemplates {
    /// Default routes under `base`; item routes append `{id}`.
    pub fn from_base(base: &str) -> Self {
        let base = with_trailing_slash(base);
        let item = format!("{base}{{id}}");
        Self {
            collection: base.clone(),
            create: base,
            retrieve: item.clone(),
            update: item.clone(),
            delete: item,
        }
    }
}

#[derive(Clone)]
pub struct Hooks {
    pub to_server: ToServerFn,
    pub from_server: FromServerFn,
    pub collection_from_server: CollectionFromServerFn,
}

impl Default for Hooks {
    fn default() -> Self {
        Self {
            to_server: Arc::new(codec::to_server),
            from_server: Arc::new(codec::from_server),
            collection_from_server: Arc::new(codec::collection_from_server),
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks").finish_non_exhaustive()
    }
}

/// Fully resolved settings for one model. Immutable once registered.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub schema: ModelSchema,
    pub id_field: String,
    pub urls: UrlTemplates,
    pub hooks: Hooks,
}

impl ModelConfig {
    pub fn name(&self) -> &str {
        &self.schema.name
    }

    pub fn to_server(&self, instance: &Record) -> Record {
        (self.hooks.to_server)(instance, &self.schema)
    }

    pub fn from_server(&self, data: &Value) -> Option<Record> {
        (self.hooks.from_server)(data, &self.schema)
    }

    pub fn collection_from_server(&self, data: &Value) -> Option<Vec<Record>> {
        (self.hooks.collection_from_server)(data, &self.schema)
    }
}

/// Caller overrides applied on top of the derived defaults.
///
/// String options may come from a settings file; hooks only from code.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModelOptions {
    pub url_prefix: Option<String>,
    pub id_field: Option<String>,
    pub collection_url: Option<String>,
    pub create_url: Option<String>,
    pub retrieve_url: Option<String>,
    pub update_url: Option<String>,
    pub delete_url: Option<String>,
    #[serde(skip)]
    pub to_server: Option<ToServerFn>,
    #[serde(skip)]
    pub from_server: Option<FromServerFn>,
    #[serde(skip)]
    pub collection_from_server: Option<CollectionFromServerFn>,
}

impl ModelOptions {
    pub fn url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = Some(prefix.into());
        self
    }

    pub fn id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = Some(field.into());
        self
    }

    pub fn collection_url(mut self, url: impl Into<String>) -> Self {
        self.collection_url = Some(url.into());
        self
    }

    pub fn create_url(mut self, url: impl Into<String>) -> Self {
        self.create_url = Some(url.into());
        self
    }

    pub fn retrieve_url(mut self, url: impl Into<String>) -> Self {
        self.retrieve_url = Some(url.into());
        self
    }

    pub fn update_url(mut self, url: impl Into<String>) -> Self {
        self.update_url = Some(url.into());
        self
    }

    pub fn delete_url(mut self, url: impl Into<String>) -> Self {
        self.delete_url = Some(url.into());
        self
    }

    pub fn to_server<F>(mut self, f: F) -> Self
    where
        F: Fn(&Record, &ModelSchema) -> Record + Send + Sync + 'static,
    {
        self.to_server = Some(Arc::new(f));
        self
    }

    pub fn from_server<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &ModelSchema) -> Option<Record> + Send + Sync + 'static,
    {
        self.from_server = Some(Arc::new(f));
        self
    }

    pub fn collection_from_server<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &ModelSchema) -> Option<Vec<Record>> + Send + Sync + 'static,
    {
        self.collection_from_server = Some(Arc::new(f));
        self
    }

    /// Base URL for models without an explicit (non-empty) `url_prefix`.
    pub(crate) fn base_url(&self, name: &str, global_prefix: &str) -> String {
        let base = match self.url_prefix.as_deref() {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => format!("{}{}s/", global_prefix, name.to_lowercase()),
        };
        with_trailing_slash(&base)
    }

    /// Merge these overrides over the baseline derived from `base`.
    pub(crate) fn resolve(&self, schema: ModelSchema, base: &str) -> ModelConfig {
        let defaults = UrlTemplates::from_base(base);
        let pick = |o: &Option<String>, d: String| o.clone().unwrap_or(d);
        let hooks = Hooks::default();
        ModelConfig {
            schema,
            id_field: self.id_field.clone().unwrap_or_else(|| "id".to_string()),
            urls: UrlTemplates {
                collection: pick(&self.collection_url, defaults.collection),
                create: pick(&self.create_url, defaults.create),
                retrieve: pick(&self.retrieve_url, defaults.retrieve),
                update: pick(&self.update_url, defaults.update),
                delete: pick(&self.delete_url, defaults.delete),
            },
            hooks: Hooks {
                to_server: self.to_server.clone().unwrap_or(hooks.to_server),
                from_server: self.from_server.clone().unwrap_or(hooks.from_server),
                collection_from_server: self
                    .collection_from_server
                    .clone()
                    .unwrap_or(hooks.collection_from_server),
            },
        }
    }
}

impl fmt::Debug for ModelOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelOptions")
            .field("url_prefix", &self.url_prefix)
            .field("id_field", &self.id_field)
            .field("collection_url", &self.collection_url)
            .field("create_url", &self.create_url)
            .field("retrieve_url", &self.retrieve_url)
            .field("update_url", &self.update_url)
            .field("delete_url", &self.delete_url)
            .field("to_server", &self.to_server.is_some())
            .field("from_server", &self.from_server.is_some())
            .field("collection_from_server", &self.collection_from_server.is_some())
            .finish()
    }
}

pub(crate) fn with_trailing_slash(s: &str) -> String {
    if s.ends_with('/') {
        s.to_string()
    } else {
        format!("{s}/")
    }
}
