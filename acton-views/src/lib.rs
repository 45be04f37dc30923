//! acton-views: view location resolution for server-rendered Rust web applications
//!
//! Resolves a logical view name such as `"Index"` into a compiled template,
//! searching conventional locations for the current controller and area, and
//! caching successful lookups across requests.
//!
//! # Design Principles
//!
//! 1. **Convention Over Configuration**: `/Views/{controller}/{view}` works out of the box
//! 2. **Diagnosable Misses**: a missing view reports every location searched
//! 3. **Pluggable Search**: expanders add or reorder search locations
//! 4. **Safe Caching**: cached locations are re-validated before use
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use acton_views::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     acton_views::observability::init()?;
//!
//!     let config = ViewEngineConfig::load()?;
//!     let engine = ViewEngine::from_config(&config)?;
//!
//!     let ctx = ActionContext::new(RouteValues::new().with("controller", "Home"));
//!     match engine.find_view(&ctx, "Index").await? {
//!         ViewEngineResult::Found { view, .. } => {
//!             println!("{}", view.render(minijinja::context! { title => "Home" })?);
//!         }
//!         ViewEngineResult::NotFound { searched_locations, .. } => {
//!             eprintln!("searched: {searched_locations:?}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```

// Lint configuration is handled at the workspace level in Cargo.toml
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod observability;
pub mod view;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! # Examples
    //!
    //! ```rust
    //! use acton_views::prelude::*;
    //! ```

    pub use crate::config::ViewEngineConfig;
    pub use crate::error::ViewEngineError;
    pub use crate::view::{
        ActionContext, CancellationToken, DefaultViewLocationCache, FileSystemPageLoader,
        LanguageViewLocationExpander, LanguageViewLocationFormat, MemoryPageLoader, Page,
        PageLoader, RouteValues, View, ViewEngine, ViewEngineResult, ViewFactory,
        ViewLocationCache, ViewLocationExpander, ViewLocationExpanderContext,
    };

    // Re-export key dependencies
    pub use minijinja;
}
