use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use mediatree_model::{SearchQuery, SearchResponse};

use crate::infra::{app_state::AppState, errors::AppResult};

/// `GET /api/v1/search?q&type`
///
/// The walk is blocking, so it runs on the blocking pool.
pub async fn search_handler(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> AppResult<Json<SearchResponse>> {
    let Query(SearchQuery { q, filter_type }) = query?;
    state.search.validate_term(&q)?;

    let engine = state.search.clone();
    let response =
        tokio::task::spawn_blocking(move || engine.search(&q, filter_type))
            .await??;
    Ok(Json(response))
}
