pub mod movie;
pub mod pagination;
pub mod search;

pub use movie::{
    Collection, Genre, MovieDetail, MovieStatus, MovieSummary, ProductionCompany,
    ProductionCountry, SpokenLanguage,
};
pub use pagination::PaginationCursor;
pub use search::{
    SearchFilters, SearchParameters, SearchResultPage, DEFAULT_LANGUAGE, MAX_PAGE, MIN_PAGE,
};
