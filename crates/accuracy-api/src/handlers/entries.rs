//! Entry persistence and read handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use tracing::info;

use accuracy_domain::{EntryPage, NewEntry, StoredPoint};

use crate::context::ApiContext;
use crate::error::{ApiError, ApiResult};

/// Save confirmation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub message: String,
    pub entry_id: i64,
}

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
}

/// Persist a computed assessment: summary row plus its points.
pub async fn save_entry(
    State(ctx): State<ApiContext>,
    Json(entry): Json<NewEntry>,
) -> ApiResult<Json<SaveResponse>> {
    let store = ctx.store.lock().await;
    let entry_id = store.insert_entry(&entry)?;

    info!(entry_id, points = entry.points.len(), "entry saved");

    Ok(Json(SaveResponse {
        message: "Data saved successfully.".to_string(),
        entry_id,
    }))
}

/// Paginated entry listing, newest first. `page` defaults to 1.
pub async fn list_entries(
    State(ctx): State<ApiContext>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<EntryPage>> {
    let page = params.page.unwrap_or(1).max(1);
    let store = ctx.store.lock().await;
    Ok(Json(store.list_entries(page, ctx.page_size)?))
}

/// All point rows of one entry, in upload order.
pub async fn entry_points(
    State(ctx): State<ApiContext>,
    Path(entry_id): Path<i64>,
) -> ApiResult<Json<Vec<StoredPoint>>> {
    let store = ctx.store.lock().await;
    if !store.entry_exists(entry_id)? {
        return Err(ApiError::NotFound {
            entity_type: "entry".to_string(),
            id: entry_id.to_string(),
        });
    }
    Ok(Json(store.points_by_entry(entry_id)?))
}
