//! Download handler for generated mixes.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Serve a previously produced output file by its generated name.
pub async fn download(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Response> {
    // Generated names never contain path separators.
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(ApiError::not_found("file not found"));
    }

    let target = state.config.output_dir.join(&name);
    let data = tokio::fs::read(&target)
        .await
        .map_err(|_| ApiError::not_found("file not found"))?;

    let headers = [
        (header::CONTENT_TYPE, "audio/wav".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", name),
        ),
    ];
    Ok((headers, data).into_response())
}
