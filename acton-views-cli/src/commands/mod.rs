//! CLI command implementations

pub mod config;
pub mod locations;
pub mod resolve;

pub use config::ConfigCommand;
pub use locations::LocationsCommand;
pub use resolve::ResolveCommand;

use acton_views::config::ViewEngineConfig;
use anyhow::Result;
use std::path::Path;

/// Load configuration from an explicit file, or the standard locations
pub(crate) fn load_config(path: Option<&Path>) -> Result<ViewEngineConfig> {
    let config = match path {
        Some(path) => ViewEngineConfig::load_from(path)?,
        None => ViewEngineConfig::load()?,
    };
    Ok(config)
}
