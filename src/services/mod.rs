pub mod detail;
pub mod images;
pub mod presentation;
pub mod providers;
pub mod query_builder;
pub mod search_controller;

pub use detail::{DetailController, DetailOutcome, DetailPhase, DetailSnapshot};
pub use images::ImageResolver;
pub use presentation::{Dismissal, ModalPayload, ModalPresenter, Notifier};
pub use providers::{HttpTransport, ReqwestTransport};
pub use query_builder::QueryBuilder;
pub use search_controller::{
    SearchController, SearchOutcome, SearchPhase, SearchSnapshot, NO_MORE_RESULTS,
    NO_PAGE_BEFORE_FIRST,
};
