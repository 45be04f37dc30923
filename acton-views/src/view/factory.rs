//! View factory
//!
//! Wraps a found page in a renderable view. Every call produces a fresh view
//! with its own render state, so views are never shared between requests.

use minijinja::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use super::Page;
use crate::error::ViewEngineError;

/// A renderable view instance
pub trait View: Send + Sync + fmt::Debug {
    /// Path of the page backing this view
    fn path(&self) -> &str;

    /// Whether the view was resolved as a partial
    fn is_partial(&self) -> bool;

    /// Render the view with a model
    ///
    /// # Errors
    ///
    /// Returns [`ViewEngineError::Render`] if template execution fails.
    fn render(&self, model: Value) -> Result<String, ViewEngineError>;
}

/// Creates views from pages
pub trait ViewFactory: Send + Sync {
    /// Wrap `page` in a new view
    fn get_view(&self, page: Arc<dyn Page>, is_partial: bool) -> Box<dyn View>;
}

/// View over a compiled template page
///
/// View data set on one instance is merged into the model at render time
/// and is private to that instance.
#[derive(Debug)]
pub struct TemplateView {
    page: Arc<dyn Page>,
    is_partial: bool,
    view_data: HashMap<String, Value>,
}

impl TemplateView {
    /// Create a view over `page`
    #[must_use]
    pub fn new(page: Arc<dyn Page>, is_partial: bool) -> Self {
        Self {
            page,
            is_partial,
            view_data: HashMap::new(),
        }
    }

    /// Attach a value visible to the template alongside the model
    pub fn set_view_data(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.view_data.insert(key.into(), value.into());
    }

    /// View data attached to this instance
    #[must_use]
    pub const fn view_data(&self) -> &HashMap<String, Value> {
        &self.view_data
    }
}

impl View for TemplateView {
    fn path(&self) -> &str {
        self.page.path()
    }

    fn is_partial(&self) -> bool {
        self.is_partial
    }

    fn render(&self, model: Value) -> Result<String, ViewEngineError> {
        if self.view_data.is_empty() {
            return self.page.render(model);
        }

        let mut merged: BTreeMap<String, Value> = self
            .view_data
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        // Model entries win over view data of the same name.
        if let Ok(keys) = model.try_iter() {
            for key in keys {
                if let (Some(name), Ok(value)) = (key.as_str(), model.get_item(&key)) {
                    merged.insert(name.to_string(), value);
                }
            }
        }

        self.page.render(Value::from_serialize(&merged))
    }
}

/// Default factory producing [`TemplateView`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateViewFactory;

impl ViewFactory for TemplateViewFactory {
    fn get_view(&self, page: Arc<dyn Page>, is_partial: bool) -> Box<dyn View> {
        Box::new(TemplateView::new(page, is_partial))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::TemplatePage;
    use minijinja::context;

    fn page(source: &str) -> Arc<dyn Page> {
        Arc::new(TemplatePage::compile("/Views/Home/Index.cshtml", source.to_string()).unwrap())
    }

    #[test]
    fn test_factory_passes_partial_flag() {
        let factory = TemplateViewFactory;
        let view = factory.get_view(page("hi"), true);
        assert!(view.is_partial());
        assert_eq!(view.path(), "/Views/Home/Index.cshtml");

        let view = factory.get_view(page("hi"), false);
        assert!(!view.is_partial());
    }

    #[test]
    fn test_render_with_model() {
        let view = TemplateViewFactory.get_view(page("{{ name }}"), false);
        assert_eq!(view.render(context! { name => "Ada" }).unwrap(), "Ada");
    }

    #[test]
    fn test_view_data_is_per_instance() {
        let shared = page("{{ title }}|{{ name }}");
        let mut first = TemplateView::new(Arc::clone(&shared), false);
        first.set_view_data("title", "First");
        let second = TemplateView::new(shared, false);

        assert_eq!(
            first.render(context! { name => "Ada" }).unwrap(),
            "First|Ada"
        );
        assert!(second.view_data().is_empty());
        assert_eq!(second.render(context! { name => "Ada" }).unwrap(), "|Ada");
    }
}
