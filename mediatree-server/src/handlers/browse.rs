use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use tracing::debug;

use mediatree_model::{BrowseQuery, BrowseResponse};

use crate::infra::{app_state::AppState, errors::AppResult};

/// `GET /api/v1/browse?path&search&sortBy&sortOrder&filterType`
pub async fn browse_handler(
    State(state): State<AppState>,
    query: Result<Query<BrowseQuery>, QueryRejection>,
) -> AppResult<Json<BrowseResponse>> {
    let Query(query) = query?;
    let listing = state.catalog.browse(&query).await?;
    debug!(
        path = %listing.current_path,
        items = listing.items.len(),
        "directory listed"
    );
    Ok(Json(listing))
}
