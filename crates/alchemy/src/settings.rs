//! TOML model settings: a declarative form of the registry configuration API.
//!
//! ```toml
//! url_prefix = "/api/v1/"
//!
//! [models.User]
//! defaults = { id = "", first_name = "" }
//! collection_url = "/people/"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Record;
use crate::error::Result;
use crate::model::ModelOptions;

#[derive(Debug, Default, Deserialize)]
pub struct RegistrySettings {
    pub url_prefix: Option<String>,
    #[serde(default)]
    pub models: BTreeMap<String, ModelSettings>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ModelSettings {
    #[serde(default)]
    pub defaults: Record,
    #[serde(flatten)]
    pub options: ModelOptions,
}

impl RegistrySettings {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        tracing::debug!("read model settings from {}", path.display());
        Self::from_toml_str(&content)
    }
}

pub fn expand_home(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Ok(home) = std::env::var("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}
