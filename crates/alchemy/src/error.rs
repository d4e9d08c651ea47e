//! Error kinds surfaced by the registry, queries, and entity handles.

use thiserror::Error;

use crate::transport::TransportError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// A model name was used before it was registered.
    #[error("cannot load the model \"{0}\"")]
    ModelNotFound(String),

    /// The response body did not yield any usable records.
    #[error("could not deserialize {}data from {url}", shape(.collection))]
    Deserialization { url: String, collection: bool },

    /// The injected transport rejected the request; passed through untouched.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The entity had no id when it was constructed, so it cannot be deleted.
    #[error("model \"{model}\" entity has no `{id_field}` and cannot be deleted")]
    DeleteUnavailable { model: String, id_field: String },

    #[error("model \"{model}\" entity was already deleted")]
    Deleted { model: String },

    #[error("invalid model settings: {0}")]
    Settings(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn shape(collection: &bool) -> &'static str {
    if *collection { "collection " } else { "" }
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ModelNotFound(_))
    }
}
