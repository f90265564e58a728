use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use super::markdown::strip_frontmatter;
use super::{assets, render, AppContext};
use crate::core::{ContentLoader, CoreError, Document, DocumentStore, Indexer, SearchEngine};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

pub async fn index(State(ctx): State<AppContext>) -> Html<String> {
    let docs = ctx.store.documents();
    let trees = Indexer::build_trees(docs);
    let groups = Indexer::group_by_directory(docs);
    Html(render::render_index(&ctx.title, &trees, &groups, docs.len()))
}

pub async fn document(
    State(ctx): State<AppContext>,
    Path(rel_path): Path<String>,
) -> Response {
    let Some(idx) = ctx.store.index_of(&rel_path) else {
        return (StatusCode::NOT_FOUND, "404 page not found").into_response();
    };

    if let Err(e) = ensure_loaded(ctx.store.clone(), idx).await {
        tracing::warn!("Failed to load document {}: {}", rel_path, e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to read document: {rel_path}"),
        )
            .into_response();
    }

    let doc = &ctx.store.documents()[idx];
    let body = ctx.renderer.render(strip_frontmatter(doc.content.text()));
    Html(render::render_document(&ctx.title, doc, &body)).into_response()
}

/// Reads the document's content on the blocking pool unless it is already
/// loaded.
async fn ensure_loaded(store: DocumentStore, idx: usize) -> Result<(), CoreError> {
    if store.documents()[idx].content.is_loaded() {
        return Ok(());
    }
    tokio::task::spawn_blocking(move || {
        ContentLoader::load_one(&store.documents()[idx]).map(|_| ())
    })
    .await?
}

pub async fn search(
    State(ctx): State<AppContext>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Document>>, (StatusCode, String)> {
    let query = params.q.trim().to_string();
    if query.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let store = ctx.store.clone();
    let results = tokio::task::spawn_blocking(move || {
        if store.needs_content_loading() {
            ContentLoader::load_all(store.documents());
        }
        SearchEngine::search(store.documents(), &query)
            .into_iter()
            .cloned()
            .collect::<Vec<Document>>()
    })
    .await
    .map_err(|e| {
        tracing::error!("Search task failed: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Search failed".to_string())
    })?;

    tracing::debug!("Search for {:?} matched {} documents", params.q, results.len());
    Ok(Json(results))
}

pub async fn static_asset(Path(path): Path<String>) -> Response {
    match assets::load(&path) {
        Some((data, content_type)) => {
            ([(header::CONTENT_TYPE, content_type)], data.into_owned()).into_response()
        }
        None => (StatusCode::NOT_FOUND, "404 page not found").into_response(),
    }
}
