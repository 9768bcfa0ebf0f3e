//! Library domain
//!
//! Browse and search against the server. Requests for a target already in
//! flight are no-ops, results of superseded requests are dropped, and a
//! failure never clears the listing that is already on screen.

pub mod requests;

use std::{fmt, sync::Arc};

use log::{debug, warn};
use mediatree_core::search::DEFAULT_MAX_TERM_LENGTH;
use mediatree_model::{BrowseQuery, BrowseResponse, SearchQuery, SearchResponse};
use parking_lot::{Mutex, RwLock};

use crate::{
    error::PlayerError,
    infra::services::ApiService,
};

pub use requests::{
    PendingRequest, RequestKind, RequestTicket, RequestTracker,
};

/// What happened to one browse or search call.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    /// The result is now the rendered listing.
    Rendered,
    /// The same target was already in flight; nothing was sent.
    Duplicate,
    /// A newer request of the same kind was issued; the result was dropped.
    Superseded,
    /// The request failed; the previous listing is left intact.
    Failed(PlayerError),
}

/// What the library view renders.
#[derive(Debug, Clone, Default)]
pub struct LibraryState {
    pub query: BrowseQuery,
    pub listing: Option<BrowseResponse>,
    pub search: Option<SearchResponse>,
    pub last_error: Option<PlayerError>,
}

pub struct LibraryDomain {
    api: Arc<dyn ApiService>,
    tracker: Mutex<RequestTracker>,
    state: RwLock<LibraryState>,
    max_term_length: usize,
}

impl fmt::Debug for LibraryDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryDomain")
            .field("api", &self.api)
            .field("max_term_length", &self.max_term_length)
            .finish_non_exhaustive()
    }
}

impl LibraryDomain {
    pub fn new(api: Arc<dyn ApiService>) -> Self {
        Self {
            api,
            tracker: Mutex::new(RequestTracker::new()),
            state: RwLock::new(LibraryState::default()),
            max_term_length: DEFAULT_MAX_TERM_LENGTH,
        }
    }

    pub fn with_max_term_length(mut self, max_term_length: usize) -> Self {
        self.max_term_length = max_term_length;
        self
    }

    pub fn snapshot(&self) -> LibraryState {
        self.state.read().clone()
    }

    pub fn listing(&self) -> Option<BrowseResponse> {
        self.state.read().listing.clone()
    }

    pub fn search_results(&self) -> Option<SearchResponse> {
        self.state.read().search.clone()
    }

    pub fn last_error(&self) -> Option<PlayerError> {
        self.state.read().last_error.clone()
    }

    pub async fn browse(&self, query: BrowseQuery) -> RequestOutcome {
        let Some(pending) = PendingRequest::begin(
            &self.tracker,
            RequestKind::Browse,
            browse_key(&query),
        ) else {
            return RequestOutcome::Duplicate;
        };

        let result = self.api.browse(&query).await;
        if !pending.finish() {
            return RequestOutcome::Superseded;
        }

        let mut state = self.state.write();
        match result {
            Ok(listing) => {
                debug!(
                    "[Library] Rendering {} entries for '{}'",
                    listing.items.len(),
                    listing.current_path
                );
                state.query = query;
                state.listing = Some(listing);
                state.last_error = None;
                RequestOutcome::Rendered
            }
            Err(err) => {
                warn!("[Library] Browse failed: {}", err);
                state.last_error = Some(err.clone());
                RequestOutcome::Failed(err)
            }
        }
    }

    /// Whole-tree search. Empty or over-long terms are rejected here and
    /// never sent.
    pub async fn search(&self, query: SearchQuery) -> RequestOutcome {
        let term = query.q.trim();
        if term.is_empty() {
            return self.reject(PlayerError::validation("search term is empty"));
        }
        if term.chars().count() > self.max_term_length {
            return self.reject(PlayerError::validation(format!(
                "search term exceeds {} characters",
                self.max_term_length
            )));
        }

        let key = format!("{}|{}", term, query.filter_type.as_str());
        let Some(pending) =
            PendingRequest::begin(&self.tracker, RequestKind::Search, key)
        else {
            return RequestOutcome::Duplicate;
        };

        let result = self.api.search(&query).await;
        if !pending.finish() {
            return RequestOutcome::Superseded;
        }

        let mut state = self.state.write();
        match result {
            Ok(results) => {
                debug!("[Library] {} search results", results.total_results);
                state.search = Some(results);
                state.last_error = None;
                RequestOutcome::Rendered
            }
            Err(err) => {
                warn!("[Library] Search failed: {}", err);
                state.last_error = Some(err.clone());
                RequestOutcome::Failed(err)
            }
        }
    }

    pub fn clear_search(&self) {
        self.state.write().search = None;
    }

    fn reject(&self, err: PlayerError) -> RequestOutcome {
        self.state.write().last_error = Some(err.clone());
        RequestOutcome::Failed(err)
    }
}

fn browse_key(query: &BrowseQuery) -> String {
    format!(
        "{}?search={}&sortBy={}&sortOrder={}&filterType={}",
        query.path,
        query.search_term,
        query.sort_by.as_str(),
        query.sort_order.as_str(),
        query.filter_type.as_str()
    )
}
