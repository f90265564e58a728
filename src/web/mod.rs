//! The HTTP surface: index page, document pages, search API and assets.

pub mod assets;
pub mod handlers;
pub mod markdown;
pub mod render;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::core::DocumentStore;
pub use markdown::{CommonMarkRenderer, MarkdownRenderer};

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppContext {
    pub store: DocumentStore,
    pub title: String,
    pub renderer: Arc<dyn MarkdownRenderer>,
}

impl AppContext {
    /// A context rendering markdown with [`CommonMarkRenderer`].
    pub fn new(store: DocumentStore, title: impl Into<String>) -> Self {
        Self {
            store,
            title: title.into(),
            renderer: Arc::new(CommonMarkRenderer::default()),
        }
    }
}

pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/doc/*rel_path", get(handlers::document))
        .route("/api/search", get(handlers::search))
        .route("/static/*path", get(handlers::static_asset))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
