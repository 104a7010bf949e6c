use crate::{config::Config, models::SearchParameters};

pub const SEARCH_MOVIE_PATH: &str = "/search/movie";
pub const MOVIE_DETAIL_PATH: &str = "/movie";

/// Builds request URLs for the movie database
///
/// Search URLs carry their fields in a fixed order: `api_key`, `language`,
/// `query`, `page`, `include_adult`, then whichever of `region`, `year` and
/// `primary_release_year` are set. Only the query text is percent-encoded;
/// every other value is written as-is.
#[derive(Clone)]
pub struct QueryBuilder {
    api_url: String,
    api_key: String,
}

impl QueryBuilder {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            api_url,
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_root(), config.api_key.clone())
    }

    /// Endpoint prefix every search URL starts with, including the `?`
    pub fn search_prefix(&self) -> String {
        format!("{}{}?", self.api_url, SEARCH_MOVIE_PATH)
    }

    pub fn search_url(&self, params: &SearchParameters) -> String {
        let filters = &params.filters;
        let mut fields: Vec<(&str, String)> = vec![
            ("api_key", self.api_key.clone()),
            ("language", filters.language.clone()),
            ("query", urlencoding::encode(&params.query).into_owned()),
            ("page", params.page().to_string()),
            ("include_adult", filters.include_adult.to_string()),
        ];

        if let Some(region) = &filters.region {
            fields.push(("region", region.clone()));
        }
        if let Some(year) = filters.year {
            fields.push(("year", year.to_string()));
        }
        if let Some(year) = filters.primary_release_year {
            fields.push(("primary_release_year", year.to_string()));
        }

        format!("{}{}", self.search_prefix(), join_fields(&fields))
    }

    /// URL for one movie's full record, e.g. `/movie/550?api_key=..&language=en-US`
    pub fn detail_url(&self, movie_id: u64, language: &str) -> String {
        let fields = [
            ("api_key", self.api_key.clone()),
            ("language", language.to_string()),
        ];
        format!(
            "{}{}/{}?{}",
            self.api_url,
            MOVIE_DETAIL_PATH,
            movie_id,
            join_fields(&fields)
        )
    }
}

impl std::fmt::Debug for QueryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("api_url", &self.api_url)
            .field("api_key", &"***")
            .finish()
    }
}

fn join_fields(fields: &[(&str, String)]) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

/// Masks the `api_key` value of a request URL for logging
pub fn redact_api_key(url: &str) -> String {
    const KEY: &str = "api_key=";
    let Some(start) = url.find(KEY).map(|i| i + KEY.len()) else {
        return url.to_string();
    };
    let end = url[start..]
        .find('&')
        .map(|i| start + i)
        .unwrap_or(url.len());
    format!("{}***{}", &url[..start], &url[end..])
}
