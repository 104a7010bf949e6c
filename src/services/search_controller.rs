use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{
        MovieSummary, PaginationCursor, SearchFilters, SearchParameters, SearchResultPage, MIN_PAGE,
    },
    services::{presentation::Notifier, providers::HttpTransport, query_builder::QueryBuilder},
};

/// Shown when paging forward from the last page
pub const NO_MORE_RESULTS: &str = "No more movies match";
/// Shown when paging back from the first page
pub const NO_PAGE_BEFORE_FIRST: &str = "There's no page 0";

/// Lifecycle of a search session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Searching,
    Populated,
}

/// How a search or navigation command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The response was applied to the held page and cursor
    Updated,
    /// A newer request was issued while this one was in flight; its
    /// response was dropped
    Superseded,
    /// Navigation hit the first or last page; nothing changed
    Boundary,
    /// Nothing has been searched yet
    Idle,
}

/// Read-only copy of the controller state for rendering
#[derive(Debug, Clone)]
pub struct SearchSnapshot {
    pub text: Option<String>,
    pub cursor: PaginationCursor,
    pub results: Option<SearchResultPage>,
    pub phase: SearchPhase,
    /// Set when the latest request failed; cleared by the next success
    pub last_error: Option<String>,
}

struct SearchState {
    text: Option<String>,
    cursor: PaginationCursor,
    results: Option<SearchResultPage>,
    /// Text and cursor that belong to `results`
    shown: (Option<String>, PaginationCursor),
    /// Text and page of the last failed request, reissued by `refresh`
    retry: Option<(String, u32)>,
    filters: SearchFilters,
    phase: SearchPhase,
    last_error: Option<String>,
    /// Bumped on every request; a response is applied only if it still
    /// matches
    generation: u64,
}

impl SearchState {
    fn new(filters: SearchFilters) -> Self {
        Self {
            text: None,
            cursor: PaginationCursor::default(),
            results: None,
            shown: (None, PaginationCursor::default()),
            retry: None,
            filters,
            phase: SearchPhase::Idle,
            last_error: None,
            generation: 0,
        }
    }

    fn begin_request(&mut self) -> AppResult<(u64, SearchParameters)> {
        let params = SearchParameters::new(self.text.clone().unwrap_or_default())
            .with_filters(self.filters.clone())
            .with_page(self.cursor.page)?;
        self.generation += 1;
        self.phase = SearchPhase::Searching;
        Ok((self.generation, params))
    }

    /// Puts text and cursor back in step with the held results after a
    /// failed request
    fn roll_back(&mut self, failed: &SearchParameters) {
        self.retry = Some((failed.query.clone(), failed.page()));
        let (text, cursor) = self.shown.clone();
        self.text = text;
        self.cursor = cursor;
    }

    fn settled_phase(&self) -> SearchPhase {
        if self.results.is_some() {
            SearchPhase::Populated
        } else {
            SearchPhase::Idle
        }
    }
}

/// Owns one search session: the query text, the current result page and the
/// pagination cursor
///
/// Page and cursor are only ever updated together, under one write lock.
/// Responses that arrive after a newer request was issued are discarded.
pub struct SearchController {
    transport: Arc<dyn HttpTransport>,
    notifier: Arc<dyn Notifier>,
    queries: QueryBuilder,
    notice_duration: Duration,
    state: RwLock<SearchState>,
}

impl SearchController {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        notifier: Arc<dyn Notifier>,
        queries: QueryBuilder,
        filters: SearchFilters,
        notice_duration: Duration,
    ) -> Self {
        Self {
            transport,
            notifier,
            queries,
            notice_duration,
            state: RwLock::new(SearchState::new(filters)),
        }
    }

    /// Starts a new search for `text` from page 1
    ///
    /// Empty text is searched like any other; suppressing it is up to the
    /// caller.
    pub async fn search(&self, text: &str) -> AppResult<SearchOutcome> {
        self.search_page(text, MIN_PAGE).await
    }

    /// Starts a new search for `text` at `page`
    pub async fn search_page(&self, text: &str, page: u32) -> AppResult<SearchOutcome> {
        SearchParameters::new(text).with_page(page)?;
        let (generation, params) = {
            let mut state = self.state.write().await;
            state.text = Some(text.to_string());
            state.cursor.reset();
            state.cursor.page = page;
            state.begin_request()?
        };

        self.execute(generation, params).await
    }

    /// Moves to the next page of the current search
    pub async fn next_page(&self) -> AppResult<SearchOutcome> {
        let (generation, params) = {
            let mut state = self.state.write().await;
            if !state.cursor.advance() {
                drop(state);
                self.notifier.notify(NO_MORE_RESULTS, self.notice_duration);
                return Ok(SearchOutcome::Boundary);
            }
            state.begin_request()?
        };

        self.execute(generation, params).await
    }

    /// Moves to the previous page of the current search
    pub async fn previous_page(&self) -> AppResult<SearchOutcome> {
        let (generation, params) = {
            let mut state = self.state.write().await;
            if !state.cursor.retreat() {
                drop(state);
                self.notifier
                    .notify(NO_PAGE_BEFORE_FIRST, self.notice_duration);
                return Ok(SearchOutcome::Boundary);
            }
            state.begin_request()?
        };

        self.execute(generation, params).await
    }

    /// Re-issues the last failed request, or the current text and page when
    /// nothing has failed
    pub async fn refresh(&self) -> AppResult<SearchOutcome> {
        let (generation, params) = {
            let mut state = self.state.write().await;
            if let Some((text, page)) = state.retry.clone() {
                if state.text.as_deref() != Some(text.as_str()) {
                    state.cursor.reset();
                }
                state.text = Some(text);
                state.cursor.page = page;
            } else if state.text.is_none() {
                return Ok(SearchOutcome::Idle);
            }
            state.begin_request()?
        };

        self.execute(generation, params).await
    }

    /// Replaces the filters used by subsequent requests
    pub async fn set_filters(&self, filters: SearchFilters) {
        self.state.write().await.filters = filters;
    }

    pub async fn filters(&self) -> SearchFilters {
        self.state.read().await.filters.clone()
    }

    pub async fn cursor(&self) -> PaginationCursor {
        self.state.read().await.cursor
    }

    pub async fn snapshot(&self) -> SearchSnapshot {
        let state = self.state.read().await;
        SearchSnapshot {
            text: state.text.clone(),
            cursor: state.cursor,
            results: state.results.clone(),
            phase: state.phase,
            last_error: state.last_error.clone(),
        }
    }

    /// Entry `index` (zero-based) of the held result page
    pub async fn select(&self, index: usize) -> AppResult<MovieSummary> {
        let state = self.state.read().await;
        let results = state
            .results
            .as_ref()
            .ok_or_else(|| AppError::InvalidInput("No search results to select from".to_string()))?;

        results.results.get(index).cloned().ok_or_else(|| {
            AppError::InvalidInput(format!(
                "No result at position {} (page has {})",
                index + 1,
                results.len()
            ))
        })
    }

    async fn execute(&self, generation: u64, params: SearchParameters) -> AppResult<SearchOutcome> {
        let url = self.queries.search_url(&params);
        tracing::debug!(
            query = %params.query,
            page = params.page(),
            generation,
            "Searching movies"
        );

        let fetched = match self.transport.get_json(&url).await {
            Ok(body) => serde_json::from_value::<SearchResultPage>(body).map_err(AppError::from),
            Err(e) => Err(e),
        };

        let mut state = self.state.write().await;
        if state.generation != generation {
            tracing::debug!(
                generation,
                latest = state.generation,
                "Discarding superseded search response"
            );
            return Ok(SearchOutcome::Superseded);
        }

        match fetched {
            Ok(page) => {
                state
                    .cursor
                    .set_total_pages(page.total_pages.unwrap_or(1));
                tracing::info!(
                    query = %params.query,
                    page = state.cursor.page,
                    total_pages = state.cursor.total_pages,
                    results = page.len(),
                    "Search completed"
                );
                state.results = Some(page);
                state.shown = (state.text.clone(), state.cursor);
                state.retry = None;
                state.phase = SearchPhase::Populated;
                state.last_error = None;
                Ok(SearchOutcome::Updated)
            }
            Err(e) => {
                tracing::warn!(
                    query = %params.query,
                    page = params.page(),
                    error = %e,
                    "Search failed, keeping previous results"
                );
                state.roll_back(&params);
                state.last_error = Some(e.to_string());
                state.phase = state.settled_phase();
                Err(e)
            }
        }
    }
}
