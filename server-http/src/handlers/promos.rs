use crate::models::{ErrorResponse, PromoResponse, PromosQuery};
use crate::state::AppState;
use crate::validation::validate_limit;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::Utc;
use promo::domain::SelectionKey;
use shared::Error;
use tracing::{info, warn};

/// GET /v1/promos?limit=N
///
/// Structured read surface. `limit` is validated 1..=50 (default 5) and
/// each distinct value gets its own cache slot.
pub async fn get_promos(
    State(state): State<AppState>,
    Query(query): Query<PromosQuery>,
) -> Result<Json<Vec<PromoResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let limit = validate_limit(query.limit).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!("invalid_limit: {e}"))),
        )
    })?;

    let settings = state.settings_snapshot().await;
    if !settings.feature_enabled {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::new("feature_disabled")),
        ));
    }

    info!(limit, "API promos request");

    match state
        .selection
        .selection(SelectionKey::Api { limit }, &settings, Utc::now())
        .await
    {
        Ok(items) => Ok(Json(items.into_iter().map(PromoResponse::from).collect())),
        Err(Error::StoreUnavailable(reason)) => {
            warn!(%reason, "content store unavailable for API request");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::new("store_unavailable")),
            ))
        }
        Err(e) => {
            warn!(error = %e, "unexpected selection failure");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("internal_error")),
            ))
        }
    }
}
