//! Model domain: schema and config types, default codec hooks, registry.

pub mod codec;
pub mod config;
pub mod registry;

pub use codec::*;
pub use config::*;
pub use registry::*;
