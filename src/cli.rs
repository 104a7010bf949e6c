use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    config::Config,
    console::{render_detail, render_page, ConsoleModal, ConsoleNotifier},
    error::AppResult,
    models::SearchFilters,
    services::{
        DetailController, DetailOutcome, HttpTransport, ImageResolver, QueryBuilder,
        ReqwestTransport, SearchController, SearchOutcome,
    },
};

#[derive(Parser)]
#[command(name = "cinesearch")]
#[command(about = "Search The Movie Database from the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one search and print a page of results
    Search {
        /// Search text
        query: String,

        /// Results page (1-1000)
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Print the full record of one movie
    Detail {
        /// Movie database identifier
        id: u64,

        /// Response language, overrides the configured one
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Interactive search with paging and detail cards
    Browse {
        /// Initial search text
        query: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,
    },
}

/// Search filters; anything left out falls back to the configuration
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Response language, e.g. en-US
    #[arg(short, long)]
    pub language: Option<String>,

    /// Include adult titles
    #[arg(long)]
    pub include_adult: bool,

    /// ISO 3166-1 region used to filter release dates
    #[arg(long)]
    pub region: Option<String>,

    /// Release year
    #[arg(long)]
    pub year: Option<u16>,

    /// Year of first release
    #[arg(long)]
    pub primary_release_year: Option<u16>,
}

impl FilterArgs {
    pub fn into_filters(self, config: &Config) -> SearchFilters {
        SearchFilters {
            language: self.language.unwrap_or_else(|| config.language.clone()),
            include_adult: self.include_adult || config.include_adult,
            region: self.region.or_else(|| config.region.clone()),
            year: self.year,
            primary_release_year: self.primary_release_year,
        }
    }
}

/// One line typed at the `browse` prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Search(String),
    Next,
    Previous,
    Open(usize),
    Refresh,
    Help,
    Quit,
    Unknown(String),
}

impl BrowseCommand {
    /// Lines starting with `:` are commands; anything else is search text
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(command) = line.strip_prefix(':') else {
            return BrowseCommand::Search(line.to_string());
        };

        let mut parts = command.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("n" | "next"), None) => BrowseCommand::Next,
            (Some("p" | "prev"), None) => BrowseCommand::Previous,
            (Some("r" | "refresh"), None) => BrowseCommand::Refresh,
            (Some("h" | "help"), None) => BrowseCommand::Help,
            (Some("q" | "quit"), None) => BrowseCommand::Quit,
            (Some("o" | "open"), Some(index)) => match index.parse::<usize>() {
                Ok(n) if n >= 1 => BrowseCommand::Open(n),
                _ => BrowseCommand::Unknown(line.to_string()),
            },
            _ => BrowseCommand::Unknown(line.to_string()),
        }
    }
}

const BROWSE_HELP: &str = "Type text to search. Commands: :n next page, :p previous page, \
:o <number> open a result, :r retry, :h help, :q quit";

pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let transport: Arc<dyn HttpTransport> =
        Arc::new(ReqwestTransport::new(config.request_timeout())?);
    tracing::debug!(transport = transport.name(), api_url = %config.api_root(), "Client ready");

    match cli.command {
        Commands::Search {
            query,
            page,
            filters,
        } => {
            let search = search_controller(&config, transport, filters);
            search.search_page(&query, page).await?;
            println!("{}", render_page(&search.snapshot().await));
        }
        Commands::Detail { id, language } => {
            let language = language.unwrap_or_else(|| config.language.clone());
            let controller =
                DetailController::new(transport, QueryBuilder::from_config(&config), language);
            if let DetailOutcome::Updated(detail) = controller.fetch_detail(id).await? {
                println!(
                    "{}",
                    render_detail(&detail, &ImageResolver::from_config(&config))
                );
            }
        }
        Commands::Browse { query, filters } => {
            browse(&config, transport, query, filters).await?;
        }
    }

    Ok(())
}

fn search_controller(
    config: &Config,
    transport: Arc<dyn HttpTransport>,
    filters: FilterArgs,
) -> SearchController {
    SearchController::new(
        transport,
        Arc::new(ConsoleNotifier),
        QueryBuilder::from_config(config),
        filters.into_filters(config),
        config.notice_duration(),
    )
}

async fn browse(
    config: &Config,
    transport: Arc<dyn HttpTransport>,
    initial: Option<String>,
    filters: FilterArgs,
) -> Result<()> {
    let language = filters
        .language
        .clone()
        .unwrap_or_else(|| config.language.clone());
    let search = search_controller(config, transport.clone(), filters);
    let detail = DetailController::new(transport, QueryBuilder::from_config(config), language);
    let modal = ConsoleModal::new(ImageResolver::from_config(config));

    println!("{}", BROWSE_HELP);
    if let Some(text) = initial {
        report(search.search(&text).await);
        println!("{}", render_page(&search.snapshot().await));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match BrowseCommand::parse(&line) {
            BrowseCommand::Search(text) => {
                report(search.search(&text).await);
                println!("{}", render_page(&search.snapshot().await));
            }
            BrowseCommand::Next => {
                if matches!(
                    search.next_page().await,
                    Ok(SearchOutcome::Updated) | Err(_)
                ) {
                    println!("{}", render_page(&search.snapshot().await));
                }
            }
            BrowseCommand::Previous => {
                if matches!(
                    search.previous_page().await,
                    Ok(SearchOutcome::Updated) | Err(_)
                ) {
                    println!("{}", render_page(&search.snapshot().await));
                }
            }
            BrowseCommand::Refresh => {
                report(search.refresh().await);
                println!("{}", render_page(&search.snapshot().await));
            }
            BrowseCommand::Open(number) => match search.select(number - 1).await {
                Ok(summary) => report(detail.open(&summary, &modal).await),
                Err(e) => eprintln!("{}", e),
            },
            BrowseCommand::Help => println!("{}", BROWSE_HELP),
            BrowseCommand::Quit => break,
            BrowseCommand::Unknown(input) => {
                eprintln!("Unknown command: {} (:h for help)", input)
            }
        }
    }

    Ok(())
}

/// Errors at the prompt never end the session. Remote failures are already
/// part of the rendered page (`last_error`), so only local ones are printed.
fn report<T>(result: AppResult<T>) {
    if let Err(e) = result {
        tracing::debug!(error = %e, "Command failed");
        if !e.is_remote() {
            eprintln!("{}", e);
        }
    }
}
