//! View location resolution and caching
//!
//! This module provides:
//! - [`ViewEngine`] for resolving view names to renderable views
//! - [`ViewLocationExpander`] for customizing search locations
//! - [`ViewLocationCache`] for remembering resolved locations across requests
//! - [`PageLoader`] and [`ViewFactory`] seams for loading and wrapping templates
//!
//! A name starting with `~` or `/` is loaded directly. Any other name is
//! searched for using location formats such as `/Views/{1}/{0}.cshtml`, where
//! `{0}` is the view name, `{1}` the controller and `{2}` the area.
//!
//! # Examples
//!
//! ```rust
//! use acton_views::view::{ActionContext, MemoryPageLoader, RouteValues, ViewEngine};
//!
//! # async fn example() -> Result<(), acton_views::error::ViewEngineError> {
//! let pages = MemoryPageLoader::new();
//! pages.insert("/Views/Shared/Index.cshtml", "<h1>{{ title }}</h1>");
//!
//! let engine = ViewEngine::builder(pages).build()?;
//! let ctx = ActionContext::new(
//!     RouteValues::new().with("controller", "Home").with("area", "Admin"),
//! );
//!
//! let result = engine.find_view(&ctx, "Index").await?;
//! assert!(result.success());
//! assert_eq!(result.view_name(), "/Views/Shared/Index.cshtml");
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod cancellation;
pub mod context;
pub mod engine;
pub mod expander;
pub mod factory;
pub mod loader;
pub mod location;
pub mod result;

pub use cache::{DefaultViewLocationCache, ViewLocationCache, ViewLocationCacheKey};
pub use cancellation::CancellationToken;
pub use context::{ActionContext, RouteValues, AREA_KEY, CONTROLLER_KEY};
pub use engine::{ViewEngine, ViewEngineBuilder};
pub use expander::{
    LanguageViewLocationExpander, LanguageViewLocationFormat, ViewLocationExpander,
    ViewLocationExpanderContext, LANGUAGE_VALUE_KEY,
};
pub use factory::{TemplateView, TemplateViewFactory, View, ViewFactory};
#[cfg(test)]
pub use loader::MockPageLoader;
pub use loader::{FileSystemPageLoader, MemoryPageLoader, Page, PageLoader, TemplatePage};
pub use location::{
    format_location, has_extension, is_specific_path, validate_formats,
    DEFAULT_AREA_VIEW_LOCATION_FORMATS, DEFAULT_VIEW_EXTENSION, DEFAULT_VIEW_LOCATION_FORMATS,
};
pub use result::ViewEngineResult;
