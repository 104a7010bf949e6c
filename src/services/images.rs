use crate::{config::Config, models::MovieSummary};

/// Turns relative image paths from the database into loadable URLs
///
/// Plain concatenation: the path is not checked for a leading slash or any
/// other well-formedness.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    prefix: String,
}

impl ImageResolver {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.image_prefix.clone())
    }

    pub fn resolve(&self, path: &str) -> String {
        format!("{}{}", self.prefix, path)
    }

    /// Resolves an optional path, passing `None` through
    pub fn resolve_opt(&self, path: Option<&str>) -> Option<String> {
        path.map(|p| self.resolve(p))
    }

    pub fn poster_url(&self, movie: &MovieSummary) -> Option<String> {
        self.resolve_opt(movie.poster_path.as_deref())
    }

    pub fn backdrop_url(&self, movie: &MovieSummary) -> Option<String> {
        self.resolve_opt(movie.backdrop_path.as_deref())
    }
}
