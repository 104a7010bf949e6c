use chrono::{Datelike, NaiveDate};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use std::fmt::Display;

/// Treats an explicit JSON `null` the same as a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decodes a list entry by entry, dropping entries that don't fit `T`
///
/// A `null` or missing list is empty. A value that is not a list at all is
/// still an error.
pub(crate) fn skip_invalid_entries<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<T>(entry) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(
                    index,
                    record = std::any::type_name::<T>(),
                    error = %e,
                    "Skipping malformed list entry"
                );
                None
            }
        })
        .collect())
}

/// One entry of a search result page
///
/// The database omits or nulls fields freely, so everything is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MovieSummary {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub original_language: Option<String>,
    pub overview: Option<String>,
    /// Relative path, resolve with `ImageResolver`
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    /// `YYYY-MM-DD`, sometimes an empty string
    pub release_date: Option<String>,
    pub popularity: Option<f64>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
    pub adult: Option<bool>,
    pub video: Option<bool>,
    #[serde(deserialize_with = "null_as_default")]
    pub genre_ids: Vec<u64>,
}

impl MovieSummary {
    /// Title to show in a list, falling back to the original title
    pub fn display_title(&self) -> &str {
        non_empty(&self.title)
            .or_else(|| non_empty(&self.original_title))
            .unwrap_or("Untitled")
    }

    pub fn release_year(&self) -> Option<i32> {
        parse_release_year(self.release_date.as_deref())
    }
}

/// Lifecycle status of a movie
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MovieStatus {
    Rumored,
    Planned,
    #[serde(rename = "In Production")]
    InProduction,
    #[serde(rename = "Post Production")]
    PostProduction,
    Released,
    Canceled,
    /// Anything the database adds later
    #[serde(other)]
    Unknown,
}

impl Display for MovieStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MovieStatus::Rumored => "Rumored",
            MovieStatus::Planned => "Planned",
            MovieStatus::InProduction => "In Production",
            MovieStatus::PostProduction => "Post Production",
            MovieStatus::Released => "Released",
            MovieStatus::Canceled => "Canceled",
            MovieStatus::Unknown => "Unknown",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Genre {
    pub id: Option<u64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProductionCompany {
    pub name: Option<String>,
    pub id: Option<u64>,
    pub logo_path: Option<String>,
    pub origin_country: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProductionCountry {
    /// ISO 3166-1 code
    pub iso_3166_1: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SpokenLanguage {
    /// ISO 639-1 code
    pub iso_639_1: Option<String>,
    pub name: Option<String>,
}

/// Collection (franchise) a movie belongs to
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Collection {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

/// Full record returned by the movie details endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MovieDetail {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub original_language: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub popularity: Option<f64>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
    pub adult: Option<bool>,
    pub video: Option<bool>,
    pub budget: Option<u64>,
    pub revenue: Option<u64>,
    /// Minutes
    pub runtime: Option<u32>,
    pub homepage: Option<String>,
    pub imdb_id: Option<String>,
    pub status: Option<MovieStatus>,
    pub tagline: Option<String>,
    pub belongs_to_collection: Option<Collection>,
    #[serde(deserialize_with = "skip_invalid_entries")]
    pub genres: Vec<Genre>,
    #[serde(deserialize_with = "skip_invalid_entries")]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(deserialize_with = "skip_invalid_entries")]
    pub production_countries: Vec<ProductionCountry>,
    #[serde(deserialize_with = "skip_invalid_entries")]
    pub spoken_languages: Vec<SpokenLanguage>,
}

impl MovieDetail {
    pub fn display_title(&self) -> &str {
        non_empty(&self.title)
            .or_else(|| non_empty(&self.original_title))
            .unwrap_or("Untitled")
    }

    pub fn release_year(&self) -> Option<i32> {
        parse_release_year(self.release_date.as_deref())
    }

    pub fn genre_names(&self) -> Vec<&str> {
        self.genres
            .iter()
            .filter_map(|g| g.name.as_deref())
            .collect()
    }
}

impl From<&MovieDetail> for MovieSummary {
    fn from(detail: &MovieDetail) -> Self {
        Self {
            id: detail.id,
            title: detail.title.clone(),
            original_title: detail.original_title.clone(),
            original_language: detail.original_language.clone(),
            overview: detail.overview.clone(),
            poster_path: detail.poster_path.clone(),
            backdrop_path: detail.backdrop_path.clone(),
            release_date: detail.release_date.clone(),
            popularity: detail.popularity,
            vote_average: detail.vote_average,
            vote_count: detail.vote_count,
            adult: detail.adult,
            video: detail.video,
            genre_ids: detail.genres.iter().filter_map(|g| g.id).collect(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

fn parse_release_year(date: Option<&str>) -> Option<i32> {
    date.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .map(|d| d.year())
}
