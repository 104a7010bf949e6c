use serde::{Deserialize, Serialize};

use super::movie::{skip_invalid_entries, MovieSummary};
use crate::error::{AppError, AppResult};

/// Lowest page the search endpoint accepts
pub const MIN_PAGE: u32 = 1;
/// Highest page the search endpoint accepts
pub const MAX_PAGE: u32 = 1000;

pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Filters applied to every search, independent of the query text and page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub language: String,
    pub include_adult: bool,
    /// ISO 3166-1 code, uppercase
    pub region: Option<String>,
    pub year: Option<u16>,
    pub primary_release_year: Option<u16>,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            include_adult: false,
            region: None,
            year: None,
            primary_release_year: None,
        }
    }
}

/// Everything needed to build one search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParameters {
    pub query: String,
    page: u32,
    pub filters: SearchFilters,
}

impl SearchParameters {
    /// Page 1 with default filters
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: MIN_PAGE,
            filters: SearchFilters::default(),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Sets the page, rejecting anything outside 1..=1000
    pub fn with_page(mut self, page: u32) -> AppResult<Self> {
        if !(MIN_PAGE..=MAX_PAGE).contains(&page) {
            return Err(AppError::InvalidInput(format!(
                "page must be between {} and {}, got {}",
                MIN_PAGE, MAX_PAGE, page
            )));
        }
        self.page = page;
        Ok(self)
    }

    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.filters.language = language.into();
        self
    }

    pub fn with_include_adult(mut self, include_adult: bool) -> Self {
        self.filters.include_adult = include_adult;
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.filters.region = Some(region.into());
        self
    }

    pub fn with_year(mut self, year: u16) -> Self {
        self.filters.year = Some(year);
        self
    }

    pub fn with_primary_release_year(mut self, year: u16) -> Self {
        self.filters.primary_release_year = Some(year);
        self
    }
}

/// One page of search results as returned by the database
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchResultPage {
    pub page: Option<u32>,
    #[serde(deserialize_with = "skip_invalid_entries")]
    pub results: Vec<MovieSummary>,
    pub total_results: Option<u64>,
    pub total_pages: Option<u32>,
}

impl SearchResultPage {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
