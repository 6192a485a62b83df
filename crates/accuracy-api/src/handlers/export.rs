//! CSV download handler.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use crate::context::ApiContext;
use crate::error::ApiResult;

/// Download every stored point as a CSV attachment.
pub async fn download_csv(State(ctx): State<ApiContext>) -> ApiResult<impl IntoResponse> {
    let csv = ctx.store.lock().await.export_csv()?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"accuracy_data.csv\"",
            ),
        ],
        csv,
    ))
}
