//! Axum extractors for the view engine's request context
//!
//! Matched path parameters become route values, so a route such as
//! `/{area}/{controller}/{action}` feeds area and controller straight into
//! view resolution.
//!
//! # Example
//!
//! ```rust,no_run
//! use acton_views::view::{ActionContext, ViewEngine};
//! use axum::{extract::State, response::Html, routing::get, Router};
//!
//! async fn show(State(engine): State<ViewEngine>, ctx: ActionContext) -> Html<String> {
//!     let result = engine.find_view(&ctx, "Index").await.expect("view lookup");
//!     let html = result
//!         .view()
//!         .map(|view| view.render(minijinja::context! {}).unwrap_or_default())
//!         .unwrap_or_default();
//!     Html(html)
//! }
//!
//! # fn app(engine: ViewEngine) -> Router {
//! Router::new()
//!     .route("/{controller}", get(show))
//!     .with_state(engine)
//! # }
//! ```

use axum::extract::{FromRequestParts, Path};
use http::request::Parts;
use std::collections::HashMap;
use std::convert::Infallible;

use crate::view::{ActionContext, RouteValues};

impl<S> FromRequestParts<S> for RouteValues
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Routes without parameters reject `Path`; that just means no values.
        let values = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map(|Path(values)| values)
            .unwrap_or_default();

        Ok(Self::from(values))
    }
}

impl<S> FromRequestParts<S> for ActionContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let route_values = RouteValues::from_request_parts(parts, state).await?;
        Ok(Self::new(route_values))
    }
}
