//! `alchemy-routes`: print the resolved routes of every model in a settings file.

use anyhow::Context as _;
use env_flags::env_flags;
use once_cell::sync::OnceCell;
use serde_json::{Value, json};

use alchemy::settings::expand_home;
use alchemy::{ModelRegistry, RegistrySettings};

fn init_tracing() {
    env_flags! {
        /// Tracing filter, e.g. "info", "debug", or targets format.
        RUST_LOG: &str = "warn";
        /// JSON formatting for logs; compact single-line otherwise.
        TRACING_JSON: bool = false;
        /// If set, also log to a daily rolling file in this directory.
        LOG_DIR: &str = "";
    }

    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, prelude::*};

    let filter = EnvFilter::try_new(*RUST_LOG).unwrap_or_else(|_| EnvFilter::new("warn"));

    // Logs go to stderr; stdout carries the routes document.
    let json_layer = (*TRACING_JSON).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .json()
    });
    let compact_layer = (!*TRACING_JSON).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .compact()
    });

    static FILE_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();
    let file_layer = if (*LOG_DIR).is_empty() {
        None
    } else {
        let dir = expand_home(*LOG_DIR);
        match std::fs::create_dir_all(&dir) {
            Ok(()) => {
                let appender = tracing_appender::rolling::daily(dir, "alchemy-routes.log");
                let (nb, guard) = tracing_appender::non_blocking(appender);
                let _ = FILE_GUARD.set(guard);
                Some(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_ansi(false)
                        .with_writer(nb),
                )
            }
            Err(e) => {
                eprintln!("failed to create log dir {}: {}", dir.display(), e);
                None
            }
        }
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(compact_layer)
        .with(file_layer);
    if let Err(e) = subscriber.try_init() {
        eprintln!("tracing already set: {e:?}");
    }
}

fn routes_document(registry: &ModelRegistry) -> anyhow::Result<Value> {
    let mut models = Vec::with_capacity(registry.len());
    for name in registry.model_names() {
        let config = registry.config(name)?;
        models.push(json!({
            "name": name,
            "id_field": config.id_field,
            "definition": Value::Object(config.schema.definition.clone()),
            "urls": {
                "collection": config.urls.collection,
                "create": config.urls.create,
                "retrieve": config.urls.retrieve,
                "update": config.urls.update,
                "delete": config.urls.delete,
            },
        }));
    }
    Ok(json!({ "url_prefix": registry.url_prefix(), "models": models }))
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    env_flags! {
        /// TOML model settings file; the first CLI argument takes precedence.
        ALCHEMY_MODELS: &str = "models.toml";
        /// Overrides the settings file's `url_prefix` when non-empty.
        ALCHEMY_URL_PREFIX: &str = "";
    }

    let path = match std::env::args().nth(1) {
        Some(arg) => expand_home(&arg),
        None => expand_home(*ALCHEMY_MODELS),
    };
    tracing::info!("loading models from {}", path.display());

    let mut settings = RegistrySettings::load_from_file(&path)
        .with_context(|| format!("failed to load model settings from {}", path.display()))?;
    if !(*ALCHEMY_URL_PREFIX).is_empty() {
        settings.url_prefix = Some((*ALCHEMY_URL_PREFIX).to_string());
    }
    let registry = ModelRegistry::from_settings(settings);

    let doc = routes_document(&registry)?;
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
