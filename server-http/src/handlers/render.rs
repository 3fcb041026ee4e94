use crate::state::AppState;
use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Response},
};
use chrono::Utc;
use promo::domain::SelectionKey;
use tracing::warn;

/// GET /promos/render
///
/// The server-rendered surface. A disabled feature, an empty selection,
/// or a store failure all come back as empty output, never as an error
/// page. With async loading enabled the body is a placeholder container
/// carrying a fresh anti-forgery token for the deferred fetch.
pub async fn render_promos(State(state): State<AppState>) -> Response {
    let settings = state.settings_snapshot().await;
    if !settings.feature_enabled {
        return Html(String::new()).into_response();
    }

    let items = match state
        .selection
        .selection(SelectionKey::Shortcode, &settings, Utc::now())
        .await
    {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, "render surface falling back to empty output");
            return Html(String::new()).into_response();
        }
    };

    if items.is_empty() {
        return Html(String::new()).into_response();
    }

    let html = if settings.ajax_enabled {
        render_placeholder(&state)
    } else {
        state.renderer.render_blocks(&items)
    };

    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], html).into_response()
}

fn render_placeholder(state: &AppState) -> String {
    let token = state.tokens.issue();
    format!(
        "<div class=\"promo-blocks-placeholder\" data-endpoint=\"/promos/load\" data-token=\"{token}\"></div>"
    )
}
