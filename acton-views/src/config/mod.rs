//! Configuration management for acton-views
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `ACTON_VIEWS_` prefix, nested
//!    keys separated by `__`)
//! 2. `./acton-views.toml` (development)
//! 3. `~/.config/acton-views/config.toml` (user config, XDG)
//! 4. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # acton-views.toml
//! view_root = "./app"
//! view_extension = ".cshtml"
//! cache_enabled = true
//!
//! view_location_formats = [
//!     "/Views/{1}/{0}.cshtml",
//!     "/Views/Shared/{0}.cshtml",
//! ]
//!
//! [language_expander]
//! enabled = true
//! route_key = "culture"
//! format = "suffix"
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use acton_views::config::ViewEngineConfig;
//!
//! # fn example() -> Result<(), acton_views::error::ViewEngineError> {
//! let config = ViewEngineConfig::load()?;
//! println!("views live under {}", config.view_root.display());
//! # Ok(())
//! # }
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ViewEngineError;
use crate::view::{
    validate_formats, LanguageViewLocationFormat, DEFAULT_AREA_VIEW_LOCATION_FORMATS,
    DEFAULT_VIEW_EXTENSION, DEFAULT_VIEW_LOCATION_FORMATS,
};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "ACTON_VIEWS_";

/// Project-local configuration file name
pub const LOCAL_CONFIG_FILE: &str = "acton-views.toml";

/// Language expander configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageExpanderSettings {
    /// Register the language expander
    pub enabled: bool,

    /// Route value holding the request culture
    pub route_key: String,

    /// Where the language token is placed in view paths
    pub format: LanguageViewLocationFormat,
}

impl Default for LanguageExpanderSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            route_key: "culture".to_string(),
            format: LanguageViewLocationFormat::Suffix,
        }
    }
}

/// View engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewEngineConfig {
    /// Directory application-relative view paths are resolved against
    pub view_root: PathBuf,

    /// Required extension for direct view paths
    pub view_extension: String,

    /// Formats searched when the request has no area
    pub view_location_formats: Vec<String>,

    /// Formats searched when the request has an area
    pub area_view_location_formats: Vec<String>,

    /// Enable the view location cache
    pub cache_enabled: bool,

    /// Language expander settings
    pub language_expander: LanguageExpanderSettings,
}

impl Default for ViewEngineConfig {
    fn default() -> Self {
        Self {
            view_root: PathBuf::from("."),
            view_extension: DEFAULT_VIEW_EXTENSION.to_string(),
            view_location_formats: DEFAULT_VIEW_LOCATION_FORMATS
                .iter()
                .map(ToString::to_string)
                .collect(),
            area_view_location_formats: DEFAULT_AREA_VIEW_LOCATION_FORMATS
                .iter()
                .map(ToString::to_string)
                .collect(),
            cache_enabled: true,
            language_expander: LanguageExpanderSettings::default(),
        }
    }
}

impl ViewEngineConfig {
    /// Load configuration from the standard locations
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration source is malformed or a location
    /// format is invalid.
    pub fn load() -> Result<Self, ViewEngineError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = Self::recommended_path() {
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Toml::file(LOCAL_CONFIG_FILE));

        Self::finish(figment)
    }

    /// Load configuration from a specific file, still honoring the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, is malformed, or contains
    /// an invalid location format.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ViewEngineError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(figment::Error::from(format!(
                "configuration file not found: {}",
                path.display()
            ))
            .into());
        }

        let figment = Figment::from(Serialized::defaults(Self::default())).merge(Toml::file(path));
        Self::finish(figment)
    }

    fn finish(figment: Figment) -> Result<Self, ViewEngineError> {
        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every configured location format is well formed
    ///
    /// # Errors
    ///
    /// Returns [`ViewEngineError::InvalidLocationFormat`] for the first bad format.
    pub fn validate(&self) -> Result<(), ViewEngineError> {
        validate_formats(&self.view_location_formats)?;
        validate_formats(&self.area_view_location_formats)
    }

    /// Get the recommended XDG config path
    ///
    /// Returns `~/.config/acton-views/config.toml` on Linux, or `None` if no
    /// config directory can be determined.
    #[must_use]
    pub fn recommended_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("acton-views").join("config.toml"))
    }
}
