use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{MovieDetail, MovieSummary},
    services::{
        presentation::{Dismissal, ModalPayload, ModalPresenter},
        providers::HttpTransport,
        query_builder::QueryBuilder,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailPhase {
    Idle,
    Loading,
    Loaded,
}

/// How a detail fetch ended
#[derive(Debug, Clone, PartialEq)]
pub enum DetailOutcome {
    Updated(MovieDetail),
    /// Another fetch was started before this one completed
    Superseded,
}

#[derive(Debug, Clone)]
pub struct DetailSnapshot {
    /// Movie most recently requested
    pub movie_id: Option<u64>,
    pub detail: Option<MovieDetail>,
    pub phase: DetailPhase,
    pub last_error: Option<String>,
}

struct DetailState {
    movie_id: Option<u64>,
    detail: Option<MovieDetail>,
    phase: DetailPhase,
    last_error: Option<String>,
    generation: u64,
}

/// Fetches one movie's full record and hands it to the view that asked for it
///
/// Holds at most one `MovieDetail`, replaced wholesale by each completed
/// fetch.
pub struct DetailController {
    transport: Arc<dyn HttpTransport>,
    queries: QueryBuilder,
    language: String,
    state: RwLock<DetailState>,
}

impl DetailController {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        queries: QueryBuilder,
        language: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            queries,
            language: language.into(),
            state: RwLock::new(DetailState {
                movie_id: None,
                detail: None,
                phase: DetailPhase::Idle,
                last_error: None,
                generation: 0,
            }),
        }
    }

    /// Fetches the full record for `movie_id` and stores it once it arrives
    pub async fn fetch_detail(&self, movie_id: u64) -> AppResult<DetailOutcome> {
        let generation = {
            let mut state = self.state.write().await;
            state.generation += 1;
            state.movie_id = Some(movie_id);
            state.phase = DetailPhase::Loading;
            state.generation
        };

        let url = self.queries.detail_url(movie_id, &self.language);
        let fetched = match self.transport.get_json(&url).await {
            Ok(body) => serde_json::from_value::<MovieDetail>(body).map_err(AppError::from),
            Err(e) => Err(e),
        };

        let mut state = self.state.write().await;
        if state.generation != generation {
            tracing::debug!(
                movie_id,
                generation,
                latest = state.generation,
                "Discarding superseded detail response"
            );
            return Ok(DetailOutcome::Superseded);
        }

        match fetched {
            Ok(detail) => {
                tracing::info!(
                    movie_id,
                    title = %detail.display_title(),
                    status = ?detail.status,
                    "Movie detail fetched"
                );
                state.detail = Some(detail.clone());
                state.phase = DetailPhase::Loaded;
                state.last_error = None;
                Ok(DetailOutcome::Updated(detail))
            }
            Err(e) => {
                tracing::warn!(movie_id, error = %e, "Movie detail fetch failed");
                state.last_error = Some(e.to_string());
                state.phase = if state.detail.is_some() {
                    DetailPhase::Loaded
                } else {
                    DetailPhase::Idle
                };
                Err(e)
            }
        }
    }

    /// Opens a modal for a search-list entry
    ///
    /// Waits for the full record and presents it. When the fetch fails (or is
    /// overtaken by another one) the summary is presented instead and the
    /// error stays in `last_error`.
    pub async fn open(
        &self,
        summary: &MovieSummary,
        presenter: &dyn ModalPresenter,
    ) -> AppResult<Dismissal> {
        let movie_id = summary.id.ok_or_else(|| {
            AppError::InvalidInput(format!(
                "\"{}\" has no identifier to look up",
                summary.display_title()
            ))
        })?;

        let payload = match self.fetch_detail(movie_id).await {
            Ok(DetailOutcome::Updated(detail)) => ModalPayload::Detail(detail),
            Ok(DetailOutcome::Superseded) => ModalPayload::Summary(summary.clone()),
            Err(e) => {
                tracing::warn!(
                    movie_id,
                    error = %e,
                    "Presenting summary without detail"
                );
                ModalPayload::Summary(summary.clone())
            }
        };

        let dismissal = presenter.present(payload).await;
        tracing::debug!(movie_id, dismissed = dismissal.dismissed, "Modal closed");
        Ok(dismissal)
    }

    pub async fn current(&self) -> Option<MovieDetail> {
        self.state.read().await.detail.clone()
    }

    pub async fn snapshot(&self) -> DetailSnapshot {
        let state = self.state.read().await;
        DetailSnapshot {
            movie_id: state.movie_id,
            detail: state.detail.clone(),
            phase: state.phase,
            last_error: state.last_error.clone(),
        }
    }
}
