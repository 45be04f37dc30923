//! View location resolution
//!
//! [`ViewEngine`] turns a view name plus the request's route values into a
//! found view or a not-found result listing every location searched.
//!
//! Resolution of a logical name runs strictly in this order:
//!
//! 1. expanders populate cache-key values, in registration order
//! 2. the location cache is consulted; a hit is re-validated by loading it
//! 3. on a miss (or stale hit) expanders rewrite the format list, in order
//! 4. each format is expanded and loaded; the first page found wins and is
//!    written to the cache

use std::sync::Arc;
use tracing::{debug, info, trace};

use super::{
    format_location, has_extension, is_specific_path, ActionContext, DefaultViewLocationCache,
    FileSystemPageLoader, LanguageViewLocationExpander, Page, PageLoader, TemplateViewFactory,
    ViewEngineResult, ViewFactory, ViewLocationCache, ViewLocationExpander,
    ViewLocationExpanderContext, DEFAULT_AREA_VIEW_LOCATION_FORMATS, DEFAULT_VIEW_EXTENSION,
    DEFAULT_VIEW_LOCATION_FORMATS,
};
use crate::config::ViewEngineConfig;
use crate::error::ViewEngineError;

/// Resolves view names to views
///
/// Cheap to clone; clones share the loader, factory, cache and expanders.
///
/// # Examples
///
/// ```rust
/// use acton_views::view::{ActionContext, MemoryPageLoader, RouteValues, ViewEngine};
///
/// # async fn example() -> Result<(), acton_views::error::ViewEngineError> {
/// let pages = MemoryPageLoader::new();
/// pages.insert("/Views/Home/Index.cshtml", "<h1>Home</h1>");
///
/// let engine = ViewEngine::builder(pages).build()?;
/// let ctx = ActionContext::new(RouteValues::new().with("controller", "Home"));
///
/// let result = engine.find_view(&ctx, "Index").await?;
/// assert_eq!(result.view_name(), "/Views/Home/Index.cshtml");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ViewEngine {
    page_loader: Arc<dyn PageLoader>,
    view_factory: Arc<dyn ViewFactory>,
    cache: Arc<dyn ViewLocationCache>,
    expanders: Vec<Arc<dyn ViewLocationExpander>>,
    view_location_formats: Vec<String>,
    area_view_location_formats: Vec<String>,
    view_extension: String,
}

impl std::fmt::Debug for ViewEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewEngine")
            .field("expanders", &self.expanders.len())
            .field("view_location_formats", &self.view_location_formats)
            .field("area_view_location_formats", &self.area_view_location_formats)
            .field("view_extension", &self.view_extension)
            .finish_non_exhaustive()
    }
}

impl ViewEngine {
    /// Start building an engine around a page loader
    #[must_use]
    pub fn builder(page_loader: impl PageLoader + 'static) -> ViewEngineBuilder {
        ViewEngineBuilder::new(Arc::new(page_loader))
    }

    /// Build an engine from configuration
    ///
    /// Uses a [`FileSystemPageLoader`] rooted at `view_root`, the default view
    /// factory and an in-process location cache.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured location format is invalid.
    pub fn from_config(config: &ViewEngineConfig) -> Result<Self, ViewEngineError> {
        let mut builder = Self::builder(FileSystemPageLoader::new(&config.view_root))
            .cache(DefaultViewLocationCache::with_caching(config.cache_enabled))
            .view_extension(&config.view_extension)
            .view_location_formats(config.view_location_formats.clone())
            .area_view_location_formats(config.area_view_location_formats.clone());

        let language = &config.language_expander;
        if language.enabled {
            builder = builder.expander(LanguageViewLocationExpander::with_route_key(
                language.route_key.clone(),
                language.format,
            ));
        }

        let engine = builder.build()?;
        info!(
            view_root = %config.view_root.display(),
            cache_enabled = config.cache_enabled,
            expanders = engine.expanders.len(),
            "View engine initialized"
        );
        Ok(engine)
    }

    /// Formats searched when the request has no area
    #[must_use]
    pub fn view_location_formats(&self) -> &[String] {
        &self.view_location_formats
    }

    /// Formats searched when the request has an area
    #[must_use]
    pub fn area_view_location_formats(&self) -> &[String] {
        &self.area_view_location_formats
    }

    /// Find a full view
    ///
    /// # Errors
    ///
    /// Returns [`ViewEngineError::EmptyViewName`] before doing any work if
    /// `view_name` is empty. Loader faults, invalid formats and cancellation
    /// are also errors; a missing view is not.
    pub async fn find_view(
        &self,
        context: &ActionContext,
        view_name: &str,
    ) -> Result<ViewEngineResult, ViewEngineError> {
        if view_name.is_empty() {
            return Err(ViewEngineError::EmptyViewName);
        }
        self.resolve(context, view_name, false).await
    }

    /// Find a partial view
    ///
    /// # Errors
    ///
    /// Same as [`find_view`](Self::find_view).
    pub async fn find_partial_view(
        &self,
        context: &ActionContext,
        view_name: &str,
    ) -> Result<ViewEngineResult, ViewEngineError> {
        if view_name.is_empty() {
            return Err(ViewEngineError::EmptyViewName);
        }
        self.resolve(context, view_name, true).await
    }

    async fn resolve(
        &self,
        context: &ActionContext,
        view_name: &str,
        is_partial: bool,
    ) -> Result<ViewEngineResult, ViewEngineError> {
        if is_specific_path(view_name) {
            self.locate_by_path(context, view_name, is_partial).await
        } else {
            self.locate_by_name(context, view_name, is_partial).await
        }
    }

    async fn locate_by_path(
        &self,
        context: &ActionContext,
        path: &str,
        is_partial: bool,
    ) -> Result<ViewEngineResult, ViewEngineError> {
        if !has_extension(path, &self.view_extension) {
            debug!(path, extension = %self.view_extension, "View path lacks the template extension");
            return Ok(ViewEngineResult::not_found(path, vec![path.to_string()]));
        }

        match self.load(context, path).await? {
            Some(page) => Ok(self.found(path.to_string(), page, is_partial)),
            None => {
                debug!(path, "View not found at path");
                Ok(ViewEngineResult::not_found(path, vec![path.to_string()]))
            }
        }
    }

    async fn locate_by_name(
        &self,
        context: &ActionContext,
        view_name: &str,
        is_partial: bool,
    ) -> Result<ViewEngineResult, ViewEngineError> {
        let mut expander_context = ViewLocationExpanderContext::new(context, view_name, is_partial);
        if !self.expanders.is_empty() {
            expander_context.init_values();
            for expander in &self.expanders {
                expander.populate_values(&mut expander_context);
            }
        }

        if let Some(location) = self.cache.get(&expander_context).filter(|l| !l.is_empty()) {
            if let Some(page) = self.load(context, &location).await? {
                debug!(view_name, %location, "View location cache hit");
                return Ok(self.found(location, page, is_partial));
            }
            debug!(view_name, %location, "Cached view location no longer resolves");
        }

        let base = if expander_context.area_name().is_empty() {
            &self.view_location_formats
        } else {
            &self.area_view_location_formats
        };
        let formats = self
            .expanders
            .iter()
            .fold(base.clone(), |formats, expander| {
                expander.expand_view_locations(&expander_context, formats)
            });

        let mut searched = Vec::with_capacity(formats.len());
        for format in &formats {
            let location = format_location(
                format,
                view_name,
                expander_context.controller_name(),
                expander_context.area_name(),
            )?;
            trace!(view_name, %location, "Probing view location");

            if let Some(page) = self.load(context, &location).await? {
                if context.cancellation().is_cancelled() {
                    return Err(ViewEngineError::Cancelled);
                }
                self.cache.set(&expander_context, &location);
                debug!(view_name, %location, "View found");
                return Ok(self.found(location, page, is_partial));
            }
            searched.push(location);
        }

        debug!(view_name, searched = searched.len(), "View not found");
        Ok(ViewEngineResult::not_found(view_name, searched))
    }

    async fn load(
        &self,
        context: &ActionContext,
        path: &str,
    ) -> Result<Option<Arc<dyn Page>>, ViewEngineError> {
        let token = context.cancellation();
        if token.is_cancelled() {
            return Err(ViewEngineError::Cancelled);
        }

        token
            .run_until_cancelled(self.page_loader.create_instance(path))
            .await
            .unwrap_or(Err(ViewEngineError::Cancelled))
    }

    fn found(&self, location: String, page: Arc<dyn Page>, is_partial: bool) -> ViewEngineResult {
        ViewEngineResult::found(location, self.view_factory.get_view(page, is_partial))
    }
}

/// Builder for [`ViewEngine`]
pub struct ViewEngineBuilder {
    page_loader: Arc<dyn PageLoader>,
    view_factory: Arc<dyn ViewFactory>,
    cache: Arc<dyn ViewLocationCache>,
    expanders: Vec<Arc<dyn ViewLocationExpander>>,
    view_location_formats: Vec<String>,
    area_view_location_formats: Vec<String>,
    view_extension: String,
}

impl ViewEngineBuilder {
    fn new(page_loader: Arc<dyn PageLoader>) -> Self {
        Self {
            page_loader,
            view_factory: Arc::new(TemplateViewFactory),
            cache: Arc::new(DefaultViewLocationCache::new()),
            expanders: Vec::new(),
            view_location_formats: DEFAULT_VIEW_LOCATION_FORMATS
                .iter()
                .map(ToString::to_string)
                .collect(),
            area_view_location_formats: DEFAULT_AREA_VIEW_LOCATION_FORMATS
                .iter()
                .map(ToString::to_string)
                .collect(),
            view_extension: DEFAULT_VIEW_EXTENSION.to_string(),
        }
    }

    /// Use a custom view factory
    #[must_use]
    pub fn view_factory(mut self, factory: impl ViewFactory + 'static) -> Self {
        self.view_factory = Arc::new(factory);
        self
    }

    /// Use a custom location cache
    ///
    /// Pass a clone of a [`DefaultViewLocationCache`] to keep a handle for
    /// clearing it later.
    #[must_use]
    pub fn cache(mut self, cache: impl ViewLocationCache + 'static) -> Self {
        self.cache = Arc::new(cache);
        self
    }

    /// Append an expander; expanders run in the order they are added
    #[must_use]
    pub fn expander(mut self, expander: impl ViewLocationExpander + 'static) -> Self {
        self.expanders.push(Arc::new(expander));
        self
    }

    /// Replace the formats searched when the request has no area
    #[must_use]
    pub fn view_location_formats(mut self, formats: Vec<String>) -> Self {
        self.view_location_formats = formats;
        self
    }

    /// Replace the formats searched when the request has an area
    #[must_use]
    pub fn area_view_location_formats(mut self, formats: Vec<String>) -> Self {
        self.area_view_location_formats = formats;
        self
    }

    /// Set the extension required of direct view paths
    #[must_use]
    pub fn view_extension(mut self, extension: impl Into<String>) -> Self {
        self.view_extension = extension.into();
        self
    }

    /// Finish building
    ///
    /// # Errors
    ///
    /// Returns [`ViewEngineError::InvalidLocationFormat`] if a configured
    /// format is malformed.
    pub fn build(self) -> Result<ViewEngine, ViewEngineError> {
        super::validate_formats(&self.view_location_formats)?;
        super::validate_formats(&self.area_view_location_formats)?;

        Ok(ViewEngine {
            page_loader: self.page_loader,
            view_factory: self.view_factory,
            cache: self.cache,
            expanders: self.expanders,
            view_location_formats: self.view_location_formats,
            area_view_location_formats: self.area_view_location_formats,
            view_extension: self.view_extension,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{CancellationToken, MockPageLoader, RouteValues, TemplatePage};
    use mockall::predicate::eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn page(path: &str) -> Arc<dyn Page> {
        Arc::new(TemplatePage::compile(path, "ok".to_string()).unwrap())
    }

    fn home() -> ActionContext {
        ActionContext::new(RouteValues::new().with("controller", "Home"))
    }

    /// Counts how often the format rewriting pass runs
    struct CountingExpander(Arc<AtomicUsize>);

    impl ViewLocationExpander for CountingExpander {
        fn populate_values(&self, _context: &mut ViewLocationExpanderContext<'_>) {}

        fn expand_view_locations(
            &self,
            _context: &ViewLocationExpanderContext<'_>,
            formats: Vec<String>,
        ) -> Vec<String> {
            self.0.fetch_add(1, Ordering::SeqCst);
            formats
        }
    }

    #[tokio::test]
    async fn test_empty_name_is_usage_error() {
        let mut loader = MockPageLoader::new();
        loader.expect_create_instance().times(0);
        let engine = ViewEngine::builder(loader).build().unwrap();

        let result = engine.find_view(&home(), "").await;
        assert!(matches!(result, Err(ViewEngineError::EmptyViewName)));

        let result = engine.find_partial_view(&home(), "").await;
        assert!(matches!(result, Err(ViewEngineError::EmptyViewName)));
    }

    #[tokio::test]
    async fn test_path_without_extension_skips_loader() {
        let mut loader = MockPageLoader::new();
        loader.expect_create_instance().times(0);
        let engine = ViewEngine::builder(loader).build().unwrap();

        let result = engine.find_view(&home(), "/Foo/Bar.txt").await.unwrap();
        assert!(!result.success());
        assert_eq!(result.searched_locations(), ["/Foo/Bar.txt"]);
    }

    #[tokio::test]
    async fn test_specific_path_found() {
        let mut loader = MockPageLoader::new();
        loader
            .expect_create_instance()
            .with(eq("~/Views/Home/Index.CSHTML"))
            .times(1)
            .returning(|path| Ok(Some(page(path))));
        let engine = ViewEngine::builder(loader).build().unwrap();

        let result = engine
            .find_partial_view(&home(), "~/Views/Home/Index.CSHTML")
            .await
            .unwrap();
        assert_eq!(result.view_name(), "~/Views/Home/Index.CSHTML");
        assert!(result.view().is_some_and(|v| v.is_partial()));
    }

    #[tokio::test]
    async fn test_specific_path_missing() {
        let mut loader = MockPageLoader::new();
        loader
            .expect_create_instance()
            .times(1)
            .returning(|_| Ok(None));
        let engine = ViewEngine::builder(loader).build().unwrap();

        let result = engine
            .find_view(&home(), "/Views/Home/Gone.cshtml")
            .await
            .unwrap();
        assert_eq!(result.searched_locations(), ["/Views/Home/Gone.cshtml"]);
    }

    #[tokio::test]
    async fn test_first_match_wins_and_stops_search() {
        let mut loader = MockPageLoader::new();
        loader
            .expect_create_instance()
            .with(eq("/Views/Home/Index.cshtml"))
            .times(1)
            .returning(|path| Ok(Some(page(path))));
        loader
            .expect_create_instance()
            .with(eq("/Views/Shared/Index.cshtml"))
            .times(0);
        let engine = ViewEngine::builder(loader).build().unwrap();

        let result = engine.find_view(&home(), "Index").await.unwrap();
        assert_eq!(result.view_name(), "/Views/Home/Index.cshtml");
        assert!(result.view().is_some_and(|v| !v.is_partial()));
    }

    #[tokio::test]
    async fn test_loader_fault_propagates() {
        let mut loader = MockPageLoader::new();
        loader.expect_create_instance().times(1).returning(|path| {
            Err(ViewEngineError::Io {
                path: path.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        });
        let engine = ViewEngine::builder(loader).build().unwrap();

        let result = engine.find_view(&home(), "Index").await;
        assert!(matches!(result, Err(ViewEngineError::Io { .. })));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_expansion() {
        let expansions = Arc::new(AtomicUsize::new(0));
        let mut loader = MockPageLoader::new();
        loader
            .expect_create_instance()
            .with(eq("/Views/Home/Index.cshtml"))
            .times(2)
            .returning(|path| Ok(Some(page(path))));
        let cache = DefaultViewLocationCache::new();
        let engine = ViewEngine::builder(loader)
            .cache(cache.clone())
            .expander(CountingExpander(Arc::clone(&expansions)))
            .build()
            .unwrap();

        let first = engine.find_view(&home(), "Index").await.unwrap();
        let second = engine.find_view(&home(), "Index").await.unwrap();

        assert_eq!(first.view_name(), second.view_name());
        assert_eq!(expansions.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_not_cached() {
        let mut loader = MockPageLoader::new();
        loader.expect_create_instance().returning(|_| Ok(None));
        let cache = DefaultViewLocationCache::new();
        let engine = ViewEngine::builder(loader)
            .cache(cache.clone())
            .build()
            .unwrap();

        let result = engine.find_view(&home(), "Index").await.unwrap();
        assert!(!result.success());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_request_does_not_load() {
        let mut loader = MockPageLoader::new();
        loader.expect_create_instance().times(0);
        let cache = DefaultViewLocationCache::new();
        let engine = ViewEngine::builder(loader)
            .cache(cache.clone())
            .build()
            .unwrap();

        let token = CancellationToken::new();
        token.cancel();
        let ctx = home().with_cancellation(token);

        let result = engine.find_view(&ctx, "Index").await;
        assert!(matches!(result, Err(ViewEngineError::Cancelled)));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_during_load_skips_cache_write() {
        let token = CancellationToken::new();
        let loader_token = token.clone();
        let mut loader = MockPageLoader::new();
        loader
            .expect_create_instance()
            .with(eq("/Views/Home/Index.cshtml"))
            .times(1)
            .returning(move |path| {
                loader_token.cancel();
                Ok(Some(page(path)))
            });
        let cache = DefaultViewLocationCache::new();
        let engine = ViewEngine::builder(loader)
            .cache(cache.clone())
            .build()
            .unwrap();

        let ctx = home().with_cancellation(token);
        let result = engine.find_view(&ctx, "Index").await;

        assert!(matches!(result, Err(ViewEngineError::Cancelled)));
        assert!(ctx.cancellation().is_cancelled());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_expanded_format_is_error() {
        struct BrokenExpander;

        impl ViewLocationExpander for BrokenExpander {
            fn populate_values(&self, _context: &mut ViewLocationExpanderContext<'_>) {}

            fn expand_view_locations(
                &self,
                _context: &ViewLocationExpanderContext<'_>,
                _formats: Vec<String>,
            ) -> Vec<String> {
                vec!["/Views/{7}.cshtml".to_string()]
            }
        }

        let mut loader = MockPageLoader::new();
        loader.expect_create_instance().times(0);
        let engine = ViewEngine::builder(loader)
            .expander(BrokenExpander)
            .build()
            .unwrap();

        let result = engine.find_view(&home(), "Index").await;
        assert!(matches!(
            result,
            Err(ViewEngineError::InvalidLocationFormat { .. })
        ));
    }

    #[test]
    fn test_builder_rejects_invalid_formats() {
        let result = ViewEngine::builder(MockPageLoader::new())
            .view_location_formats(vec!["/Views/{oops}".to_string()])
            .build();
        assert!(result.is_err());
    }
}
