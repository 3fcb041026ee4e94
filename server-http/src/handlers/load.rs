use crate::models::{LoadFailure, LoadRequest, LoadSuccess};
use crate::state::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use promo::domain::SelectionKey;
use tracing::{info, warn};

/// POST /promos/load
///
/// Deferred content fetch for the placeholder container. Gated on the
/// anti-forgery token issued at render time, then on the feature flag;
/// both failures surface as 403 with a machine-readable message.
pub async fn load_promos(
    State(state): State<AppState>,
    Json(request): Json<LoadRequest>,
) -> Response {
    let valid = request
        .token
        .as_deref()
        .is_some_and(|token| state.tokens.validate(token));

    if !valid {
        info!("async load rejected: invalid token");
        return (
            StatusCode::FORBIDDEN,
            Json(LoadFailure::new("Invalid token")),
        )
            .into_response();
    }

    let settings = state.settings_snapshot().await;
    if !settings.feature_enabled {
        return (
            StatusCode::FORBIDDEN,
            Json(LoadFailure::new("Feature disabled")),
        )
            .into_response();
    }

    match state
        .selection
        .selection(SelectionKey::AsyncLoad, &settings, Utc::now())
        .await
    {
        Ok(items) if items.is_empty() => Json(LoadSuccess::new("")).into_response(),
        Ok(items) => Json(LoadSuccess::new(state.renderer.render_blocks(&items))).into_response(),
        Err(e) => {
            warn!(error = %e, "async load failed against the content store");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(LoadFailure::new("Content temporarily unavailable")),
            )
                .into_response()
        }
    }
}
