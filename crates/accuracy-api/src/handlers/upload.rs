//! Upload-and-compute handler.

use axum::Json;
use axum::extract::{Multipart, State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use accuracy_domain::{MetricsSummary, PointPair};

use crate::context::ApiContext;
use crate::error::{ApiError, ApiResult};
use crate::sheets;

/// A computed (not yet persisted) assessment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub all_metrics: MetricsSummary,
    pub non_outlier_metrics: MetricsSummary,
    pub points: Vec<PointPair>,
    pub created_at: DateTime<Utc>,
    pub file1_name: String,
    pub file2_name: String,
}

/// Accept two spreadsheet files (measured, reference), compute accuracy
/// metrics, and return the report.
///
/// Nothing is persisted here; saving is a separate explicit call once the
/// client confirms the result.
pub async fn process_upload(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let upload_id = Uuid::new_v4();
    let mut files: Vec<(String, Vec<u8>)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidUpload(e.to_string()))?
    {
        let name = field.file_name().unwrap_or("upload.xlsx").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidUpload(e.to_string()))?;
        files.push((name, bytes.to_vec()));
    }

    let [(file1_name, bytes_a), (file2_name, bytes_b)] =
        <[(String, Vec<u8>); 2]>::try_from(files).map_err(|files| {
            ApiError::InvalidUpload(format!(
                "expected exactly two spreadsheet files, got {}",
                files.len()
            ))
        })?;

    let dataset_a = sheets::parse_workbook(&bytes_a)?;
    let dataset_b = sheets::parse_workbook(&bytes_b)?;

    let report = ctx.engine.analyze(&dataset_a, &dataset_b)?;

    info!(
        %upload_id,
        file1 = %file1_name,
        file2 = %file2_name,
        pairs = report.points.len(),
        mean_m = report.all_metrics.mean,
        "assessment computed"
    );

    Ok(Json(UploadResponse {
        all_metrics: report.all_metrics,
        non_outlier_metrics: report.non_outlier_metrics,
        points: report.points,
        created_at: Utc::now(),
        file1_name,
        file2_name,
    }))
}
