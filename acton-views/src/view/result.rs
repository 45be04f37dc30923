//! Outcome of a view lookup

use super::View;

/// Result of resolving a view name
///
/// `NotFound` always lists every location that was tried, in order, so a
/// missing view can be diagnosed from the result alone.
#[derive(Debug)]
pub enum ViewEngineResult {
    /// A page was found and wrapped in a view
    Found {
        /// The exact name or path that succeeded
        view_name: String,
        /// The renderable view
        view: Box<dyn View>,
    },
    /// No candidate location produced a page
    NotFound {
        /// The requested view name
        view_name: String,
        /// Every location tried, in search order
        searched_locations: Vec<String>,
    },
}

impl ViewEngineResult {
    /// Create a found result
    #[must_use]
    pub fn found(view_name: impl Into<String>, view: Box<dyn View>) -> Self {
        Self::Found {
            view_name: view_name.into(),
            view,
        }
    }

    /// Create a not-found result
    #[must_use]
    pub fn not_found(view_name: impl Into<String>, searched_locations: Vec<String>) -> Self {
        Self::NotFound {
            view_name: view_name.into(),
            searched_locations,
        }
    }

    /// Whether a view was found
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    /// The view name carried by either variant
    #[must_use]
    pub fn view_name(&self) -> &str {
        match self {
            Self::Found { view_name, .. } | Self::NotFound { view_name, .. } => view_name,
        }
    }

    /// The found view, if any
    #[must_use]
    pub fn view(&self) -> Option<&dyn View> {
        match self {
            Self::Found { view, .. } => Some(view.as_ref()),
            Self::NotFound { .. } => None,
        }
    }

    /// Take ownership of the found view, if any
    #[must_use]
    pub fn into_view(self) -> Option<Box<dyn View>> {
        match self {
            Self::Found { view, .. } => Some(view),
            Self::NotFound { .. } => None,
        }
    }

    /// Locations searched before giving up; empty when found
    #[must_use]
    pub fn searched_locations(&self) -> &[String] {
        match self {
            Self::Found { .. } => &[],
            Self::NotFound {
                searched_locations, ..
            } => searched_locations,
        }
    }
}
