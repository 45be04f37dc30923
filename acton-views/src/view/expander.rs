//! Pluggable view location expanders
//!
//! Expanders run in registration order, in two passes per resolution:
//!
//! 1. [`ViewLocationExpander::populate_values`] contributes key/value pairs
//!    that become part of the location cache key.
//! 2. [`ViewLocationExpander::expand_view_locations`] rewrites the candidate
//!    format list. It only runs when the cache could not satisfy the lookup.
//!
//! Later expanders observe everything earlier ones contributed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::location::{escape_braces, find_placeholder};
use super::ActionContext;

/// Per-resolution context shared by the expander chain
#[derive(Debug, Clone)]
pub struct ViewLocationExpanderContext<'a> {
    action_context: &'a ActionContext,
    view_name: String,
    controller_name: String,
    area_name: String,
    is_partial: bool,
    values: Option<BTreeMap<String, String>>,
}

impl<'a> ViewLocationExpanderContext<'a> {
    /// Create a context for one resolution attempt
    #[must_use]
    pub fn new(action_context: &'a ActionContext, view_name: &str, is_partial: bool) -> Self {
        Self {
            action_context,
            view_name: view_name.to_string(),
            controller_name: action_context.controller_name().to_string(),
            area_name: action_context.area_name().to_string(),
            is_partial,
            values: None,
        }
    }

    /// The request this resolution belongs to
    #[must_use]
    pub const fn action_context(&self) -> &'a ActionContext {
        self.action_context
    }

    /// The logical view name being resolved
    #[must_use]
    pub fn view_name(&self) -> &str {
        &self.view_name
    }

    /// Controller token, empty when the route has none
    #[must_use]
    pub fn controller_name(&self) -> &str {
        &self.controller_name
    }

    /// Area token, empty when the route has none
    #[must_use]
    pub fn area_name(&self) -> &str {
        &self.area_name
    }

    /// Whether a partial view was requested
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        self.is_partial
    }

    /// Values contributed by expanders
    ///
    /// `None` when no expanders are registered.
    #[must_use]
    pub const fn values(&self) -> Option<&BTreeMap<String, String>> {
        self.values.as_ref()
    }

    /// Look up a value contributed by an earlier expander
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.as_ref()?.get(key).map(String::as_str)
    }

    /// Contribute a value to the cache key
    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
    }

    pub(crate) fn init_values(&mut self) {
        self.values.get_or_insert_with(BTreeMap::new);
    }
}

/// A strategy that customizes where views are searched for
///
/// # Examples
///
/// ```rust
/// use acton_views::view::{ViewLocationExpander, ViewLocationExpanderContext};
///
/// /// Searches a theme folder before the defaults
/// struct ThemeExpander;
///
/// impl ViewLocationExpander for ThemeExpander {
///     fn populate_values(&self, context: &mut ViewLocationExpanderContext<'_>) {
///         context.set_value("theme", "dark");
///     }
///
///     fn expand_view_locations(
///         &self,
///         context: &ViewLocationExpanderContext<'_>,
///         formats: Vec<String>,
///     ) -> Vec<String> {
///         let theme = context.value("theme").unwrap_or_default().to_string();
///         std::iter::once(format!("/Themes/{theme}/{{0}}.cshtml"))
///             .chain(formats)
///             .collect()
///     }
/// }
/// ```
pub trait ViewLocationExpander: Send + Sync {
    /// Contribute values that discriminate cached locations
    fn populate_values(&self, context: &mut ViewLocationExpanderContext<'_>);

    /// Rewrite the ordered list of location formats
    fn expand_view_locations(
        &self,
        context: &ViewLocationExpanderContext<'_>,
        formats: Vec<String>,
    ) -> Vec<String>;
}

/// Where [`LanguageViewLocationExpander`] places the language token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageViewLocationFormat {
    /// `Index.fr.cshtml`
    #[default]
    Suffix,
    /// `fr/Index.cshtml`
    SubFolder,
}

/// Searches language-specific views before the neutral ones
///
/// The culture is read from a route value (default key `culture`).
/// For a culture `fr` and format `/Views/{1}/{0}.cshtml`, the suffix mode
/// searches `/Views/{1}/{0}.fr.cshtml` and then the original.
#[derive(Debug, Clone)]
pub struct LanguageViewLocationExpander {
    route_key: String,
    format: LanguageViewLocationFormat,
}

/// Expander value key holding the request language
pub const LANGUAGE_VALUE_KEY: &str = "language";

impl LanguageViewLocationExpander {
    /// Create an expander reading the `culture` route value
    #[must_use]
    pub fn new(format: LanguageViewLocationFormat) -> Self {
        Self::with_route_key("culture", format)
    }

    /// Create an expander reading a custom route value
    #[must_use]
    pub fn with_route_key(route_key: impl Into<String>, format: LanguageViewLocationFormat) -> Self {
        Self {
            route_key: route_key.into(),
            format,
        }
    }

    /// Rewrite the first real `{0}` placeholder; `None` if there is none
    fn localize(&self, format: &str, language: &str) -> Option<String> {
        let placeholder = find_placeholder(format, "0")?;
        let language = escape_braces(language);
        let token = match self.format {
            LanguageViewLocationFormat::Suffix => format!("{{0}}.{language}"),
            LanguageViewLocationFormat::SubFolder => format!("{language}/{{0}}"),
        };

        let mut localized = format.to_string();
        localized.replace_range(placeholder, &token);
        Some(localized)
    }
}

impl Default for LanguageViewLocationExpander {
    fn default() -> Self {
        Self::new(LanguageViewLocationFormat::default())
    }
}

impl ViewLocationExpander for LanguageViewLocationExpander {
    fn populate_values(&self, context: &mut ViewLocationExpanderContext<'_>) {
        let language = context
            .action_context()
            .route_values()
            .get(&self.route_key)
            .unwrap_or_default()
            .to_string();
        context.set_value(LANGUAGE_VALUE_KEY, language);
    }

    fn expand_view_locations(
        &self,
        context: &ViewLocationExpanderContext<'_>,
        formats: Vec<String>,
    ) -> Vec<String> {
        let language = match context.value(LANGUAGE_VALUE_KEY) {
            Some(language) if !language.is_empty() => language,
            _ => return formats,
        };

        let mut expanded = Vec::with_capacity(formats.len() * 2);
        for format in formats {
            if let Some(localized) = self.localize(&format, language) {
                expanded.push(localized);
            }
            expanded.push(format);
        }
        expanded
    }
}
