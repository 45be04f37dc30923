//! Resolve a view name against a view root

use acton_views::view::{
    ActionContext, RouteValues, ViewEngine, ViewEngineResult, AREA_KEY, CONTROLLER_KEY,
};
use anyhow::Result;
use console::style;
use std::path::PathBuf;

use super::load_config;

/// Resolves one view name and reports where it was found
pub struct ResolveCommand {
    name: String,
    route_values: RouteValues,
    partial: bool,
    root: Option<PathBuf>,
    config: Option<PathBuf>,
}

impl ResolveCommand {
    /// Create a new resolve command for `name`
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            route_values: RouteValues::new(),
            partial: false,
            root: None,
            config: None,
        }
    }

    /// Set the controller route value
    #[must_use]
    pub fn controller(mut self, controller: Option<String>) -> Self {
        if let Some(controller) = controller {
            self.route_values.insert(CONTROLLER_KEY, controller);
        }
        self
    }

    /// Set the area route value
    #[must_use]
    pub fn area(mut self, area: Option<String>) -> Self {
        if let Some(area) = area {
            self.route_values.insert(AREA_KEY, area);
        }
        self
    }

    /// Add arbitrary route values, e.g. `culture=fr`
    #[must_use]
    pub fn route_values(mut self, values: Vec<(String, String)>) -> Self {
        for (key, value) in values {
            self.route_values.insert(key, value);
        }
        self
    }

    /// Resolve as a partial view
    #[must_use]
    pub const fn partial(mut self, partial: bool) -> Self {
        self.partial = partial;
        self
    }

    /// Override the configured view root
    #[must_use]
    pub fn root(mut self, root: Option<PathBuf>) -> Self {
        self.root = root;
        self
    }

    /// Load configuration from a specific file
    #[must_use]
    pub fn config(mut self, config: Option<PathBuf>) -> Self {
        self.config = config;
        self
    }

    /// Run the lookup without printing anything
    ///
    /// # Errors
    ///
    /// Returns an error for an empty name, bad configuration, or a view that
    /// exists but cannot be loaded.
    pub async fn resolve(&self) -> Result<ViewEngineResult> {
        let mut config = load_config(self.config.as_deref())?;
        if let Some(root) = &self.root {
            config.view_root.clone_from(root);
        }

        let engine = ViewEngine::from_config(&config)?;
        let ctx = ActionContext::new(self.route_values.clone());

        let result = if self.partial {
            engine.find_partial_view(&ctx, &self.name).await?
        } else {
            engine.find_view(&ctx, &self.name).await?
        };
        Ok(result)
    }

    /// Execute the resolve command
    ///
    /// Returns `true` if the view was found.
    ///
    /// # Errors
    ///
    /// See [`resolve`](Self::resolve).
    pub async fn execute(&self) -> Result<bool> {
        match self.resolve().await? {
            ViewEngineResult::Found { view_name, .. } => {
                println!("{} {view_name}", style("found:").green().bold());
                Ok(true)
            }
            ViewEngineResult::NotFound {
                view_name,
                searched_locations,
            } => {
                println!(
                    "{} view '{view_name}' was not found. Searched locations:",
                    style("not found:").red().bold()
                );
                for location in searched_locations {
                    println!("  {location}");
                }
                Ok(false)
            }
        }
    }
}

/// Parse a `key=value` route value argument
///
/// # Errors
///
/// Returns a message if the argument has no `=` or an empty key.
pub fn parse_route_value(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{arg}'")),
    }
}
