use std::fmt::Write as _;
use std::time::Duration;

/// Terminal implementations of the presentation collaborators, plus the text
/// rendering shared by the CLI commands
use crate::{
    models::{MovieDetail, MovieSummary},
    services::{
        presentation::{Dismissal, ModalPayload, ModalPresenter, Notifier},
        search_controller::SearchSnapshot,
        ImageResolver,
    },
};

const RULE_WIDTH: usize = 100;

/// Prints notices to stderr; a terminal has no timed toast, so the duration
/// is only logged
#[derive(Debug, Default, Clone)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str, duration: Duration) {
        tracing::debug!(duration_ms = duration.as_millis() as u64, "Notice shown");
        eprintln!("» {}", message);
    }
}

/// Prints the movie card to stdout and reports it dismissed straight away
#[derive(Debug, Clone)]
pub struct ConsoleModal {
    images: ImageResolver,
}

impl ConsoleModal {
    pub fn new(images: ImageResolver) -> Self {
        Self { images }
    }
}

#[async_trait::async_trait]
impl ModalPresenter for ConsoleModal {
    async fn present(&self, payload: ModalPayload) -> Dismissal {
        let card = match &payload {
            ModalPayload::Detail(detail) => render_detail(detail, &self.images),
            ModalPayload::Summary(summary) => render_summary(summary, &self.images),
        };
        println!("{}", card);
        Dismissal { dismissed: true }
    }
}

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

fn title_with_year(title: &str, year: Option<i32>) -> String {
    match year {
        Some(year) => format!("{} ({})", title, year),
        None => title.to_string(),
    }
}

/// Numbered listing of the held result page with a pagination footer
pub fn render_page(snapshot: &SearchSnapshot) -> String {
    let mut out = String::new();
    let Some(page) = &snapshot.results else {
        return "No search yet.".to_string();
    };

    let query = snapshot.text.as_deref().unwrap_or_default();
    if page.is_empty() {
        let _ = writeln!(out, "No results found for: {}", query);
    } else {
        let _ = writeln!(out, "Results for: {}", query);
        let _ = writeln!(out, "{}", rule());
        for (i, movie) in page.results.iter().enumerate() {
            let _ = write!(
                out,
                "{:>2}. {}",
                i + 1,
                title_with_year(movie.display_title(), movie.release_year())
            );
            if let Some(vote) = movie.vote_average {
                let _ = write!(out, " | ★ {:.1}", vote);
            }
            if let Some(id) = movie.id {
                let _ = write!(out, " | id {}", id);
            }
            let _ = writeln!(out);
        }
        let _ = writeln!(out, "{}", rule());
    }

    let _ = write!(
        out,
        "Page {} of {}",
        snapshot.cursor.page, snapshot.cursor.total_pages
    );
    if let Some(total) = page.total_results {
        let _ = write!(out, " ({} movies)", total);
    }
    if let Some(error) = &snapshot.last_error {
        let _ = write!(out, "\nLast request failed: {}", error);
    }
    out
}

/// Card for a movie when only the list entry is known
pub fn render_summary(movie: &MovieSummary, images: &ImageResolver) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(
        out,
        "{}",
        title_with_year(movie.display_title(), movie.release_year())
    );
    if let Some(overview) = movie.overview.as_deref().filter(|o| !o.is_empty()) {
        let _ = writeln!(out, "\n{}", overview);
    }
    if let Some(poster) = images.poster_url(movie) {
        let _ = writeln!(out, "\nPoster: {}", poster);
    }
    let _ = write!(out, "(full details unavailable)\n{}", rule());
    out
}

/// Card for a movie's full record
pub fn render_detail(detail: &MovieDetail, images: &ImageResolver) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(
        out,
        "{}",
        title_with_year(detail.display_title(), detail.release_year())
    );
    if let Some(tagline) = detail.tagline.as_deref().filter(|t| !t.is_empty()) {
        let _ = writeln!(out, "\"{}\"", tagline);
    }

    let mut facts = Vec::new();
    if let Some(status) = detail.status {
        facts.push(status.to_string());
    }
    if let Some(runtime) = detail.runtime.filter(|r| *r > 0) {
        facts.push(format!("{} min", runtime));
    }
    let genres = detail.genre_names();
    if !genres.is_empty() {
        facts.push(genres.join(", "));
    }
    if let Some(vote) = detail.vote_average {
        facts.push(format!(
            "★ {:.1} ({} votes)",
            vote,
            detail.vote_count.unwrap_or_default()
        ));
    }
    if !facts.is_empty() {
        let _ = writeln!(out, "{}", facts.join(" | "));
    }

    if let Some(overview) = detail.overview.as_deref().filter(|o| !o.is_empty()) {
        let _ = writeln!(out, "\n{}", overview);
    }

    let _ = writeln!(out);
    if let Some(collection) = detail
        .belongs_to_collection
        .as_ref()
        .and_then(|c| c.name.as_deref())
    {
        let _ = writeln!(out, "Collection: {}", collection);
    }
    if let Some(budget) = detail.budget.filter(|b| *b > 0) {
        let _ = writeln!(out, "Budget: ${}", budget);
    }
    if let Some(revenue) = detail.revenue.filter(|r| *r > 0) {
        let _ = writeln!(out, "Revenue: ${}", revenue);
    }
    let companies: Vec<&str> = detail
        .production_companies
        .iter()
        .filter_map(|c| c.name.as_deref())
        .collect();
    if !companies.is_empty() {
        let _ = writeln!(out, "Produced by: {}", companies.join(", "));
    }
    let languages: Vec<&str> = detail
        .spoken_languages
        .iter()
        .filter_map(|l| l.name.as_deref().or(l.iso_639_1.as_deref()))
        .collect();
    if !languages.is_empty() {
        let _ = writeln!(out, "Languages: {}", languages.join(", "));
    }
    if let Some(imdb) = &detail.imdb_id {
        let _ = writeln!(out, "IMDb: https://www.imdb.com/title/{}", imdb);
    }
    if let Some(homepage) = detail.homepage.as_deref().filter(|h| !h.is_empty()) {
        let _ = writeln!(out, "Homepage: {}", homepage);
    }
    if let Some(poster) = images.resolve_opt(detail.poster_path.as_deref()) {
        let _ = writeln!(out, "Poster: {}", poster);
    }
    let _ = write!(out, "{}", rule());
    out
}
