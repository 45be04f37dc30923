//! Page loaders
//!
//! A page loader turns an application-relative path such as
//! `/Views/Home/Index.cshtml` into a compiled page, or reports that nothing
//! lives there. "Nothing there" is `Ok(None)` and is part of normal control
//! flow: the view engine probes every candidate location this way. Errors are
//! reserved for pages that exist but are broken.

use async_trait::async_trait;
use minijinja::{AutoEscape, Environment, Value};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{trace, warn};

use crate::error::ViewEngineError;

/// A located, compiled template
pub trait Page: Send + Sync + fmt::Debug {
    /// The application-relative path the page was loaded from
    fn path(&self) -> &str;

    /// Render the page with the given context
    ///
    /// # Errors
    ///
    /// Returns [`ViewEngineError::Render`] if template execution fails.
    fn render(&self, context: Value) -> Result<String, ViewEngineError>;
}

/// Loads pages by path
///
/// Called speculatively and repeatedly, once per candidate location, so a
/// missing page must be cheap to report.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageLoader: Send + Sync {
    /// Load and compile the page at `path`
    ///
    /// # Errors
    ///
    /// Returns an error only if a page exists at `path` but cannot be read or
    /// compiled. A missing page is `Ok(None)`.
    async fn create_instance(&self, path: &str) -> Result<Option<Arc<dyn Page>>, ViewEngineError>;
}

/// A page compiled into its own minijinja environment
#[derive(Debug)]
pub struct TemplatePage {
    path: String,
    env: Environment<'static>,
}

impl TemplatePage {
    /// Compile template source for `path`
    ///
    /// Output is HTML-escaped regardless of the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`ViewEngineError::Compile`] if the source has syntax errors.
    pub fn compile(path: &str, source: String) -> Result<Self, ViewEngineError> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_auto_escape_callback(|_| AutoEscape::Html);

        env.add_template_owned(path.to_string(), source)
            .map_err(|source| ViewEngineError::Compile {
                path: path.to_string(),
                source,
            })?;

        Ok(Self {
            path: path.to_string(),
            env,
        })
    }
}

impl Page for TemplatePage {
    fn path(&self) -> &str {
        &self.path
    }

    fn render(&self, context: Value) -> Result<String, ViewEngineError> {
        self.env
            .get_template(&self.path)
            .and_then(|tmpl| tmpl.render(context))
            .map_err(Into::into)
    }
}

/// Strip the `~` application-root marker from a path
fn normalize_path(path: &str) -> &str {
    path.strip_prefix('~').unwrap_or(path)
}

/// Loads pages from a view root directory on disk
///
/// `/Views/Home/Index.cshtml` maps to `<root>/Views/Home/Index.cshtml`.
/// Paths that would escape the root are treated as missing.
#[derive(Debug, Clone)]
pub struct FileSystemPageLoader {
    root: PathBuf,
}

impl FileSystemPageLoader {
    /// Create a loader rooted at `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory views are loaded from
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map an application-relative path onto the view root
    ///
    /// Returns `None` if the path contains a `..` segment.
    #[must_use]
    pub fn physical_path(&self, path: &str) -> Option<PathBuf> {
        let mut full = self.root.clone();
        for segment in normalize_path(path).split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => return None,
                segment => full.push(segment),
            }
        }
        Some(full)
    }
}

#[async_trait]
impl PageLoader for FileSystemPageLoader {
    async fn create_instance(&self, path: &str) -> Result<Option<Arc<dyn Page>>, ViewEngineError> {
        let Some(physical) = self.physical_path(path) else {
            warn!(path, "Rejected view path outside the view root");
            return Ok(None);
        };

        match tokio::fs::metadata(&physical).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                trace!(path, "No view on disk");
                return Ok(None);
            }
            Err(source) => {
                return Err(ViewEngineError::Io {
                    path: path.to_string(),
                    source,
                })
            }
        }

        let source = tokio::fs::read_to_string(&physical)
            .await
            .map_err(|source| ViewEngineError::Io {
                path: path.to_string(),
                source,
            })?;

        let page = TemplatePage::compile(path, source)?;
        Ok(Some(Arc::new(page)))
    }
}

/// Loads pages from sources held in memory
///
/// Sources can be added and removed at runtime; clones share the same store.
///
/// # Examples
///
/// ```rust
/// use acton_views::view::{MemoryPageLoader, PageLoader};
///
/// # async fn example() -> Result<(), acton_views::error::ViewEngineError> {
/// let loader = MemoryPageLoader::new();
/// loader.insert("/Views/Home/Index.cshtml", "<h1>{{ title }}</h1>");
///
/// let page = loader.create_instance("/Views/Home/Index.cshtml").await?;
/// assert!(page.is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryPageLoader {
    sources: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryPageLoader {
    /// Create an empty loader
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the source at `path`
    pub fn insert(&self, path: impl AsRef<str>, source: impl Into<String>) {
        self.sources
            .write()
            .insert(normalize_path(path.as_ref()).to_string(), source.into());
    }

    /// Remove the source at `path`, returning whether it existed
    pub fn remove(&self, path: &str) -> bool {
        self.sources.write().remove(normalize_path(path)).is_some()
    }

    /// Whether a source exists at `path`
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.sources.read().contains_key(normalize_path(path))
    }

    /// Number of stored sources
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.read().len()
    }

    /// Whether the loader holds no sources
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.read().is_empty()
    }
}

#[async_trait]
impl PageLoader for MemoryPageLoader {
    async fn create_instance(&self, path: &str) -> Result<Option<Arc<dyn Page>>, ViewEngineError> {
        let source = self.sources.read().get(normalize_path(path)).cloned();
        match source {
            Some(source) => Ok(Some(Arc::new(TemplatePage::compile(path, source)?))),
            None => Ok(None),
        }
    }
}
