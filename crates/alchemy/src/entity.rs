//! Entity handles: one deserialized record bound to its model's config.
//!
//! `save` creates (POST) or updates (PUT) depending on whether the id field is
//! populated, then merges the server's view of the record back in place.
//! `delete` is only available to handles that had an id when they were built.

use std::sync::Arc;

use serde_json::Value;

use crate::Record;
use crate::error::{Error, Result};
use crate::model::{ModelConfig, is_truthy, merge_in_place};
use crate::transport::{HttpTransport, Method, RequestOptions, Response};
use crate::url::interpolate;

pub struct EntityHandle {
    record: Record,
    config: Arc<ModelConfig>,
    transport: Arc<dyn HttpTransport>,
    can_delete: bool,
    deleted: bool,
}

impl EntityHandle {
    pub(crate) fn new(
        record: Record,
        config: Arc<ModelConfig>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let can_delete = record.get(&config.id_field).is_some_and(is_truthy);
        Self {
            record,
            config,
            transport,
            can_delete,
            deleted: false,
        }
    }

    pub fn model(&self) -> &str {
        self.config.name()
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    pub fn into_record(self) -> Record {
        self.record
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.record.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.record.insert(field.into(), value.into());
    }

    /// Current value of the id field, if any.
    pub fn id(&self) -> Option<&Value> {
        self.record.get(&self.config.id_field)
    }

    fn has_id(&self) -> bool {
        self.id().is_some_and(is_truthy)
    }

    /// Whether this handle was built with an id and may issue a delete.
    pub fn can_delete(&self) -> bool {
        self.can_delete
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Create or update the entity, then merge the response into the record.
    pub async fn save(&mut self, opts: Option<RequestOptions>) -> Result<Response> {
        self.ensure_live()?;
        let opts = opts.unwrap_or_default();
        let payload = Value::Object(self.config.to_server(&self.record));
        let (method, template) = if self.has_id() {
            (Method::Put, &self.config.urls.update)
        } else {
            (Method::Post, &self.config.urls.create)
        };
        let url = interpolate(template, &self.record);
        tracing::debug!("{} {} ({} save)", method, url, self.model());
        let resp = match method {
            Method::Put => self.transport.put(&url, &payload, &opts).await?,
            _ => self.transport.post(&url, &payload, &opts).await?,
        };
        match self.config.from_server(&resp.data) {
            Some(fresh) => merge_in_place(&mut self.record, fresh),
            None => tracing::debug!("{} save response had no usable fields", self.model()),
        }
        Ok(resp)
    }

    /// Delete the entity on the server. The handle is unusable afterwards.
    pub async fn delete(&mut self, opts: Option<RequestOptions>) -> Result<Response> {
        self.ensure_live()?;
        if !self.can_delete {
            return Err(Error::DeleteUnavailable {
                model: self.model().to_string(),
                id_field: self.config.id_field.clone(),
            });
        }
        let opts = opts.unwrap_or_default();
        let url = interpolate(&self.config.urls.delete, &self.record);
        tracing::debug!("{} {} ({} delete)", Method::Delete, url, self.model());
        let resp = self.transport.delete(&url, &opts).await?;
        self.deleted = true;
        Ok(resp)
    }

    fn ensure_live(&self) -> Result<()> {
        if self.deleted {
            return Err(Error::Deleted {
                model: self.model().to_string(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for EntityHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityHandle")
            .field("model", &self.model())
            .field("record", &self.record)
            .field("can_delete", &self.can_delete)
            .field("deleted", &self.deleted)
            .finish_non_exhaustive()
    }
}
