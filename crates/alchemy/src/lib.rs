//! Map named models to REST endpoints.
//!
//! A [`ModelRegistry`] holds, per model name, a default field set and the
//! resolved URL templates and serializer hooks. A [`Client`] pairs the
//! registry with an injected [`HttpTransport`] and turns queries into
//! [`EntityHandle`]s that can `save` and `delete` themselves.
//!
//! ```ignore
//! let mut registry = ModelRegistry::new();
//! registry.set_url_prefix("/api/v1");
//! registry.register_model("User", &defaults, ModelOptions::default());
//!
//! let client = Client::new(Arc::new(registry), transport);
//! let users = client.collection("User", None)?.get(None).await?;
//! ```

pub mod entity;
pub mod error;
pub mod model;
pub mod query;
pub mod settings;
pub mod transform;
pub mod transport;
pub mod url;

/// A plain key-value object: the shape of every model instance.
pub type Record = serde_json::Map<String, serde_json::Value>;

pub use entity::EntityHandle;
pub use error::{Error, Result};
pub use model::{ModelConfig, ModelOptions, ModelRegistry, ModelSchema, UrlTemplates};
pub use query::{Client, Fetched, ModelQuery, QueryKind};
pub use settings::RegistrySettings;
pub use transport::{HttpTransport, Method, RequestOptions, Response, TransportError};
