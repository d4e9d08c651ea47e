//! Query entry point: resolve a model's URL, GET it, and wrap the results.

use std::sync::Arc;

use crate::Record;
use crate::entity::EntityHandle;
use crate::error::{Error, Result};
use crate::model::{ModelConfig, ModelRegistry, merge};
use crate::transport::{HttpTransport, RequestOptions};
use crate::url::{interpolate, placeholders};

/// Whether a query targets one resource or a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Single,
    Collection,
}

/// Registry plus transport; the handle application code queries through.
#[derive(Clone)]
pub struct Client {
    registry: Arc<ModelRegistry>,
    transport: Arc<dyn HttpTransport>,
}

impl Client {
    pub fn new(registry: Arc<ModelRegistry>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            registry,
            transport,
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Prepare a query. Fails immediately when `model` is not registered.
    pub fn query(
        &self,
        model: &str,
        params: Option<&Record>,
        kind: QueryKind,
    ) -> Result<ModelQuery> {
        let config = self.registry.config(model)?;
        let template = match kind {
            QueryKind::Collection => &config.urls.collection,
            QueryKind::Single => &config.urls.retrieve,
        };
        let empty = Record::new();
        let url = interpolate(template, params.unwrap_or(&empty));
        let unresolved = placeholders(&url);
        if !unresolved.is_empty() {
            tracing::debug!(
                "{} url {} has unresolved placeholders: {}",
                model,
                url,
                unresolved.join(", ")
            );
        }
        Ok(ModelQuery {
            url,
            kind,
            config,
            transport: self.transport.clone(),
        })
    }

    pub fn collection(&self, model: &str, params: Option<&Record>) -> Result<ModelQuery> {
        self.query(model, params, QueryKind::Collection)
    }

    pub fn single(&self, model: &str, params: Option<&Record>) -> Result<ModelQuery> {
        self.query(model, params, QueryKind::Single)
    }

    /// A fresh entity built from the model's defaults overlaid with `fields`.
    pub fn new_entity(&self, model: &str, fields: Record) -> Result<EntityHandle> {
        let config = self.registry.config(model)?;
        let record = merge(&config.schema.definition, fields);
        Ok(EntityHandle::new(record, config, self.transport.clone()))
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// A prepared GET against one model URL.
pub struct ModelQuery {
    url: String,
    kind: QueryKind,
    config: Arc<ModelConfig>,
    transport: Arc<dyn HttpTransport>,
}

/// Entities produced by a query.
#[derive(Debug)]
pub enum Fetched {
    One(EntityHandle),
    Many(Vec<EntityHandle>),
}

impl Fetched {
    pub fn into_one(self) -> Option<EntityHandle> {
        match self {
            Fetched::One(e) => Some(e),
            Fetched::Many(_) => None,
        }
    }

    pub fn into_many(self) -> Option<Vec<EntityHandle>> {
        match self {
            Fetched::One(_) => None,
            Fetched::Many(v) => Some(v),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Fetched::One(_) => 1,
            Fetched::Many(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ModelQuery {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    /// Issue the GET and deserialize the body into entity handles.
    pub async fn get(&self, opts: Option<RequestOptions>) -> Result<Fetched> {
        let opts = opts.unwrap_or_default();
        tracing::debug!("GET {} ({} {:?})", self.url, self.config.name(), self.kind);
        let resp = self.transport.get(&self.url, &opts).await?;
        match self.kind {
            QueryKind::Collection => {
                let Some(records) = self.config.collection_from_server(&resp.data) else {
                    return Err(self.deserialization_failed(true));
                };
                Ok(Fetched::Many(
                    records.into_iter().map(|r| self.wrap(r)).collect(),
                ))
            }
            QueryKind::Single => {
                let Some(record) = self.config.from_server(&resp.data) else {
                    return Err(self.deserialization_failed(false));
                };
                Ok(Fetched::One(self.wrap(record)))
            }
        }
    }

    fn wrap(&self, record: Record) -> EntityHandle {
        EntityHandle::new(record, self.config.clone(), self.transport.clone())
    }

    fn deserialization_failed(&self, collection: bool) -> Error {
        tracing::warn!(
            "could not deserialize {} response from {}",
            self.config.name(),
            self.url
        );
        Error::Deserialization {
            url: self.url.clone(),
            collection,
        }
    }
}

impl std::fmt::Debug for ModelQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelQuery")
            .field("model", &self.config.name())
            .field("url", &self.url)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
