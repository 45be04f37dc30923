//! View location cache
//!
//! Remembers which path a logical view name resolved to, keyed by everything
//! that can change the answer: view name, controller, area, and the values
//! contributed by expanders. Only successful resolutions are stored, and the
//! view engine re-validates every hit against the page loader before trusting
//! it, so a stale entry costs one failed load and is then overwritten.

use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::ViewLocationExpanderContext;

/// Composite cache key derived from an expander context
///
/// Derivation is a pure function of the context's discriminating fields, so
/// identical inputs always address the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewLocationCacheKey {
    view_name: String,
    controller_name: String,
    area_name: String,
    values: Vec<(String, String)>,
}

impl ViewLocationCacheKey {
    /// Build a key from explicit parts
    #[must_use]
    pub fn new(
        view_name: impl Into<String>,
        controller_name: impl Into<String>,
        area_name: impl Into<String>,
        values: Option<&BTreeMap<String, String>>,
    ) -> Self {
        Self {
            view_name: view_name.into(),
            controller_name: controller_name.into(),
            area_name: area_name.into(),
            values: values
                .map(|v| v.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                .unwrap_or_default(),
        }
    }

    /// The view name this key addresses
    #[must_use]
    pub fn view_name(&self) -> &str {
        &self.view_name
    }
}

impl From<&ViewLocationExpanderContext<'_>> for ViewLocationCacheKey {
    fn from(context: &ViewLocationExpanderContext<'_>) -> Self {
        Self::new(
            context.view_name(),
            context.controller_name(),
            context.area_name(),
            context.values(),
        )
    }
}

/// Storage for resolved view locations
///
/// Implementations must be safe to share between concurrent resolutions; a
/// single key's `get`/`set` must be linearizable.
pub trait ViewLocationCache: Send + Sync {
    /// Look up the cached location for a context
    fn get(&self, context: &ViewLocationExpanderContext<'_>) -> Option<String>;

    /// Record the location a context resolved to
    fn set(&self, context: &ViewLocationExpanderContext<'_>, location: &str);
}

/// In-process location cache backed by a locked hash map
///
/// # Examples
///
/// ```rust
/// use acton_views::view::{
///     ActionContext, DefaultViewLocationCache, ViewLocationCache, ViewLocationExpanderContext,
/// };
///
/// let cache = DefaultViewLocationCache::new();
/// let action = ActionContext::default();
/// let context = ViewLocationExpanderContext::new(&action, "Index", false);
///
/// cache.set(&context, "/Views/Shared/Index.cshtml");
/// assert_eq!(cache.get(&context).as_deref(), Some("/Views/Shared/Index.cshtml"));
/// ```
#[derive(Debug, Clone)]
pub struct DefaultViewLocationCache {
    cache: Arc<RwLock<HashMap<ViewLocationCacheKey, String>>>,
    cache_enabled: bool,
}

impl Default for DefaultViewLocationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultViewLocationCache {
    /// Create an enabled cache
    #[must_use]
    pub fn new() -> Self {
        Self::with_caching(true)
    }

    /// Create a cache with explicit cache control
    ///
    /// A disabled cache never stores anything, so every resolution performs a
    /// full search. Useful while editing views during development.
    #[must_use]
    pub fn with_caching(cache_enabled: bool) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            cache_enabled,
        }
    }

    /// Look up a location by key
    #[must_use]
    pub fn get_by_key(&self, key: &ViewLocationCacheKey) -> Option<String> {
        if !self.cache_enabled {
            return None;
        }

        self.cache.read().get(key).cloned()
    }

    /// Store a location by key
    ///
    /// Empty locations are ignored.
    pub fn set_by_key(&self, key: ViewLocationCacheKey, location: &str) {
        if !self.cache_enabled || location.is_empty() {
            return;
        }

        self.cache.write().insert(key, location.to_string());
    }

    /// Clear all cached locations
    pub fn clear(&self) {
        self.cache.write().clear();
    }

    /// Check if caching is enabled
    #[must_use]
    pub const fn is_caching_enabled(&self) -> bool {
        self.cache_enabled
    }

    /// Number of cached locations
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Whether the cache holds no locations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }
}

impl ViewLocationCache for DefaultViewLocationCache {
    fn get(&self, context: &ViewLocationExpanderContext<'_>) -> Option<String> {
        self.get_by_key(&ViewLocationCacheKey::from(context))
    }

    fn set(&self, context: &ViewLocationExpanderContext<'_>, location: &str) {
        self.set_by_key(ViewLocationCacheKey::from(context), location);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{ActionContext, RouteValues};

    fn home_context() -> ActionContext {
        ActionContext::new(RouteValues::new().with("controller", "Home"))
    }

    #[test]
    fn test_cache_creation() {
        let cache = DefaultViewLocationCache::new();
        assert!(cache.is_empty());
        assert!(cache.is_caching_enabled());
    }

    #[test]
    fn test_set_then_get() {
        let cache = DefaultViewLocationCache::new();
        let action = home_context();
        let context = ViewLocationExpanderContext::new(&action, "Index", false);

        cache.set(&context, "/Views/Home/Index.cshtml");
        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.get(&context).as_deref(),
            Some("/Views/Home/Index.cshtml")
        );
    }

    #[test]
    fn test_identical_inputs_share_entry() {
        let cache = DefaultViewLocationCache::new();
        let first = home_context();
        let second = home_context();

        cache.set(
            &ViewLocationExpanderContext::new(&first, "Index", false),
            "/Views/Home/Index.cshtml",
        );
        assert!(cache
            .get(&ViewLocationExpanderContext::new(&second, "Index", false))
            .is_some());
    }

    #[test]
    fn test_key_discriminates_controller_and_area() {
        let cache = DefaultViewLocationCache::new();
        let home = home_context();
        let admin = ActionContext::new(
            RouteValues::new()
                .with("controller", "Home")
                .with("area", "Admin"),
        );

        cache.set(
            &ViewLocationExpanderContext::new(&home, "Index", false),
            "/Views/Home/Index.cshtml",
        );
        assert!(cache
            .get(&ViewLocationExpanderContext::new(&admin, "Index", false))
            .is_none());
    }

    #[test]
    fn test_key_discriminates_expander_values() {
        let cache = DefaultViewLocationCache::new();
        let action = home_context();
        let mut french = ViewLocationExpanderContext::new(&action, "Index", false);
        french.set_value("language", "fr");
        let mut german = ViewLocationExpanderContext::new(&action, "Index", false);
        german.set_value("language", "de");

        cache.set(&french, "/Views/Home/Index.fr.cshtml");
        assert!(cache.get(&german).is_none());
        assert!(cache.get(&french).is_some());
    }

    #[test]
    fn test_key_ignores_value_insertion_order() {
        let action = home_context();
        let mut a = ViewLocationExpanderContext::new(&action, "Index", false);
        a.set_value("theme", "dark");
        a.set_value("language", "fr");
        let mut b = ViewLocationExpanderContext::new(&action, "Index", false);
        b.set_value("language", "fr");
        b.set_value("theme", "dark");

        assert_eq!(ViewLocationCacheKey::from(&a), ViewLocationCacheKey::from(&b));
    }

    #[test]
    fn test_set_overwrites() {
        let cache = DefaultViewLocationCache::new();
        let action = home_context();
        let context = ViewLocationExpanderContext::new(&action, "Index", false);

        cache.set(&context, "/Views/Home/Index.cshtml");
        cache.set(&context, "/Views/Shared/Index.cshtml");
        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.get(&context).as_deref(),
            Some("/Views/Shared/Index.cshtml")
        );
    }

    #[test]
    fn test_empty_location_not_stored() {
        let cache = DefaultViewLocationCache::new();
        let action = home_context();
        let context = ViewLocationExpanderContext::new(&action, "Index", false);

        cache.set(&context, "");
        assert!(cache.is_empty());
    }

    #[test]
    fn test_with_caching_disabled() {
        let cache = DefaultViewLocationCache::with_caching(false);
        let action = home_context();
        let context = ViewLocationExpanderContext::new(&action, "Index", false);

        cache.set(&context, "/Views/Home/Index.cshtml");
        assert_eq!(cache.len(), 0);
        assert!(cache.get(&context).is_none());
    }

    #[test]
    fn test_clear() {
        let cache = DefaultViewLocationCache::new();
        let action = home_context();
        cache.set(
            &ViewLocationExpanderContext::new(&action, "Index", false),
            "/Views/Home/Index.cshtml",
        );
        cache.set(
            &ViewLocationExpanderContext::new(&action, "About", false),
            "/Views/Home/About.cshtml",
        );
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_access() {
        let cache = DefaultViewLocationCache::new();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    let action = home_context();
                    let name = format!("View{i}");
                    let context = ViewLocationExpanderContext::new(&action, &name, false);
                    cache.set(&context, &format!("/Views/Home/{name}.cshtml"));
                    cache.get(&context)
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap().is_some());
        }
        assert_eq!(cache.len(), 8);
    }
}
