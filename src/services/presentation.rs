use std::time::Duration;

use crate::models::{MovieDetail, MovieSummary};

/// Shows short-lived notices to the user
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, duration: Duration);
}

/// What a modal is asked to display
#[derive(Debug, Clone, PartialEq)]
pub enum ModalPayload {
    /// Only the search-list entry is available
    Summary(MovieSummary),
    Detail(MovieDetail),
}

impl ModalPayload {
    pub fn movie_id(&self) -> Option<u64> {
        match self {
            ModalPayload::Summary(summary) => summary.id,
            ModalPayload::Detail(detail) => detail.id,
        }
    }
}

/// Signal handed back when a modal closes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dismissal {
    pub dismissed: bool,
}

/// Displays a movie and resolves once the user closes it
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ModalPresenter: Send + Sync {
    async fn present(&self, payload: ModalPayload) -> Dismissal;
}
