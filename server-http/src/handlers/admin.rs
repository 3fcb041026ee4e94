use crate::models::{ClearCacheResponse, DeleteItemResponse, ErrorResponse, PromoResponse};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use promo::domain::{PromoDraft, Settings};
use promo::events::PromoEvent;
use tracing::info;

/// POST /admin/items
pub async fn create_item(
    State(state): State<AppState>,
    Json(draft): Json<PromoDraft>,
) -> (StatusCode, Json<PromoResponse>) {
    let item = state.store.insert(draft);
    info!(item_id = item.id, "promo item created");

    state.publish(PromoEvent::item_changed(item.id));
    (StatusCode::CREATED, Json(PromoResponse::from(item)))
}

/// GET /admin/items/{id}
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<PromoResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.get(id) {
        Some(item) => Ok(Json(PromoResponse::from(item))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("item_not_found")),
        )),
    }
}

/// PUT /admin/items/{id}
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(draft): Json<PromoDraft>,
) -> Result<Json<PromoResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.update(id, draft) {
        Some(item) => {
            info!(item_id = id, "promo item updated");
            state.publish(PromoEvent::item_changed(id));
            Ok(Json(PromoResponse::from(item)))
        }
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("item_not_found")),
        )),
    }
}

/// DELETE /admin/items/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Json<DeleteItemResponse> {
    let deleted = state.store.remove(id);
    if deleted {
        info!(item_id = id, "promo item deleted");
        state.publish(PromoEvent::item_changed(id));
    }
    Json(DeleteItemResponse { deleted })
}

/// GET /admin/settings
pub async fn get_settings(State(state): State<AppState>) -> Json<Settings> {
    Json(state.settings_snapshot().await)
}

/// PUT /admin/settings
///
/// The settings persistence boundary: values are clamped into range here,
/// then the change is broadcast so every cached selection gets dropped.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(new_settings): Json<Settings>,
) -> Json<Settings> {
    let sanitized = new_settings.sanitized();
    *state.settings.write().await = sanitized;
    info!(
        feature_enabled = sanitized.feature_enabled,
        max_blocks = sanitized.max_blocks,
        cache_ttl_minutes = sanitized.cache_ttl_minutes,
        ajax_enabled = sanitized.ajax_enabled,
        "settings updated"
    );

    state.publish(PromoEvent::settings_changed());
    Json(sanitized)
}

/// POST /admin/cache/clear
pub async fn clear_cache(State(state): State<AppState>) -> Json<ClearCacheResponse> {
    state.publish(PromoEvent::cache_clear_requested());
    Json(ClearCacheResponse { requested: true })
}
