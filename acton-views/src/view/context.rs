//! Ambient request context consumed by view resolution

use std::collections::HashMap;

use super::CancellationToken;

/// Route value key naming the controller
pub const CONTROLLER_KEY: &str = "controller";

/// Route value key naming the area
pub const AREA_KEY: &str = "area";

/// Route values matched for the current request
///
/// Only `controller` and `area` are read by the view engine itself;
/// expanders may read any other key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteValues(HashMap<String, String>);

impl RouteValues {
    /// Create an empty route value map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route value
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert or replace a route value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a route value
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Look up a route value, treating a missing key as the empty string
    #[must_use]
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    /// Number of route values
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no route values
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, String>> for RouteValues {
    fn from(values: HashMap<String, String>) -> Self {
        Self(values)
    }
}

impl<K, V> FromIterator<(K, V)> for RouteValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Per-request context handed to the view engine
///
/// # Examples
///
/// ```rust
/// use acton_views::view::{ActionContext, RouteValues};
///
/// let ctx = ActionContext::new(RouteValues::new().with("controller", "Home"));
/// assert_eq!(ctx.controller_name(), "Home");
/// assert_eq!(ctx.area_name(), "");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ActionContext {
    route_values: RouteValues,
    cancellation: CancellationToken,
}

impl ActionContext {
    /// Create a context from matched route values
    #[must_use]
    pub fn new(route_values: RouteValues) -> Self {
        Self {
            route_values,
            cancellation: CancellationToken::new(),
        }
    }

    /// Tie this context to the request's cancellation token
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Matched route values
    #[must_use]
    pub const fn route_values(&self) -> &RouteValues {
        &self.route_values
    }

    /// Controller token, empty when absent
    #[must_use]
    pub fn controller_name(&self) -> &str {
        self.route_values.get_or_empty(CONTROLLER_KEY)
    }

    /// Area token, empty when absent
    #[must_use]
    pub fn area_name(&self) -> &str {
        self.route_values.get_or_empty(AREA_KEY)
    }

    /// The request's cancellation token
    #[must_use]
    pub const fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }
}
