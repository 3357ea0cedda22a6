use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use spark_shared::errors::AppResult;
use spark_shared::middleware::ValidatedQuery;
use spark_shared::types::ApiResponse;

use crate::models::PopularTarget;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct PopularParams {
    #[validate(range(min = 0, message = "min_likes must not be negative"))]
    pub min_likes: Option<i64>,
}

/// GET /internal/popular?min_likes=50 - users whose like count exceeds the
/// threshold, for the reporting job.
pub async fn popular_targets(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(params): ValidatedQuery<PopularParams>,
) -> AppResult<Json<ApiResponse<Vec<PopularTarget>>>> {
    let min_likes = params.min_likes.unwrap_or(state.config.popular_min_likes);
    let popular = state.decisions.popular(min_likes)?;

    tracing::debug!(min_likes = min_likes, found = popular.len(), "popular targets computed");

    Ok(Json(ApiResponse::ok(popular)))
}
