//! Upload page handler.

use axum::extract::State;
use axum::response::Html;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const BUNDLED_INDEX_HTML: &str = include_str!("../../static/index.html");

/// Serve the upload page.
///
/// A configured `index_html` path that cannot be read is an internal
/// configuration error, not a not-found.
pub async fn index(State(state): State<AppState>) -> ApiResult<Html<String>> {
    match &state.config.index_html {
        Some(path) => {
            let page = tokio::fs::read_to_string(path)
                .await
                .map_err(|_| ApiError::internal("interface page not found"))?;
            Ok(Html(page))
        }
        None => Ok(Html(BUNDLED_INDEX_HTML.to_string())),
    }
}
