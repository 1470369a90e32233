//! Anime dashboard CLI application.

mod render;

use anime_dashboard::export;
use anime_dashboard::{Dashboard, DashboardSettings, JikanClient, SearchRequest, TopRequest};
use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use shared::{AnimeType, Config, DataPaths, LogConfig, TopFilter};
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search anime by title
    Search {
        /// Title to search for
        query: String,

        /// Minimum score to display
        #[arg(long)]
        min_score: Option<f64>,

        /// Anime formats to include (comma separated)
        #[arg(short = 't', long = "type", value_delimiter = ',', default_value = "tv")]
        types: Vec<AnimeType>,

        /// Search across every format
        #[arg(long, conflicts_with = "types")]
        any_type: bool,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Show a ranking list
    Top {
        /// Ranking category: all, airing, popular or upcoming
        #[arg(long, default_value = "all")]
        category: TopFilter,

        /// Restrict to one format
        #[arg(short = 't', long = "type")]
        anime_type: Option<AnimeType>,

        /// Minimum score to display
        #[arg(long)]
        min_score: Option<f64>,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Suggest titles for partially typed queries
    Suggest {
        /// Partial titles; repeated terms are served from the cache
        #[arg(required = true)]
        terms: Vec<String>,
    },

    /// Compare two anime side by side
    Compare {
        /// First title
        first: String,

        /// Second title
        second: String,

        #[command(flatten)]
        export: ExportArgs,
    },
}

#[derive(ClapArgs, Debug)]
struct ExportArgs {
    /// Export the displayed table as CSV
    #[arg(long)]
    export: bool,

    /// CSV output path (defaults to the configured export directory)
    #[arg(long, requires = "export")]
    output: Option<PathBuf>,
}

impl ExportArgs {
    /// Destination for the export, if one was requested
    fn target(&self, paths: &DataPaths, default_name: &str) -> Option<PathBuf> {
        if !self.export {
            return None;
        }
        Some(
            self.output
                .clone()
                .unwrap_or_else(|| paths.export_file(default_name)),
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    let paths = DataPaths::from_config(&config);

    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        config.log_level()?
    };

    shared::logging::init(LogConfig {
        log_dir: paths.logs_dir().to_string_lossy().to_string(),
        component: "anime-dashboard".to_string(),
        default_level: log_level,
        console: config.logging.console,
        file: config.logging.file,
        json_format: config.logging.json_format,
    })?;

    info!("Anime dashboard starting");
    if args.config.exists() {
        info!(config_file = %args.config.display(), "Loaded configuration");
    } else {
        warn!(config_file = %args.config.display(), "Config file not found, using defaults");
    }

    let client = JikanClient::new(&config.jikan).context("Failed to create Jikan client")?;
    let mut dashboard = Dashboard::new(client, DashboardSettings::from(&config));

    match args.command {
        Command::Search {
            query,
            min_score,
            types,
            any_type,
            export: csv_out,
        } => {
            let request = SearchRequest {
                min_score: min_score.unwrap_or(dashboard.settings().search_min_score),
                types: if any_type { Vec::new() } else { types },
                query,
            };
            let result = dashboard.search(&request).await;
            render::search(&request.query, &result);

            if let Some(path) = csv_out.target(&paths, &export::search_file_name(&request.query)) {
                if result.warning.is_none() && !result.anime.is_empty() {
                    export::to_file(&path, |file| export::write_search_results(file, &result.anime))?;
                    println!("Exported {} rows to {}", result.anime.len(), path.display());
                }
            }
        }

        Command::Top {
            category,
            anime_type,
            min_score,
            export: csv_out,
        } => {
            let request = TopRequest {
                filter: category,
                anime_type,
                min_score: min_score.unwrap_or(dashboard.settings().top_min_score),
            };
            let result = dashboard.top(&request).await;
            render::top(category.label(), &result);

            if let Some(path) = csv_out.target(&paths, export::RANKINGS_FILE) {
                if result.warning.is_none() {
                    export::to_file(&path, |file| export::write_rankings(file, &result.anime))?;
                    println!("Exported {} rows to {}", result.anime.len(), path.display());
                }
            }
        }

        Command::Suggest { terms } => {
            for (i, term) in terms.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                let suggestions = dashboard.suggest(term).await;
                render::suggestions(term, &suggestions);
            }
            debug!(cached_queries = dashboard.suggestion_cache().len(), "Suggestion cache");
        }

        Command::Compare {
            first,
            second,
            export: csv_out,
        } => {
            let outcome = dashboard.compare(&first, &second).await;
            if let Some(warning) = &outcome.warning {
                println!("Warning: {}", warning);
            }

            if let Some(matchup) = &outcome.matchup {
                render::comparison(matchup);

                if let Some(path) = csv_out.target(&paths, export::COMPARISON_FILE) {
                    export::to_file(&path, |file| {
                        export::write_comparison(file, &matchup.left, &matchup.right)
                    })?;
                    println!("Exported comparison to {}", path.display());
                }
            }
        }
    }

    let (used, allowed) = dashboard.source_mut().rate_limit_stats();
    debug!(used = used, allowed = allowed, "Rate limit usage over the last minute");
    info!("Anime dashboard finished");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn test_search_args() {
        let args = Args::parse_from(["anime-dashboard", "search", "Naruto", "-t", "tv,movie", "--min-score", "6"]);
        match args.command {
            Command::Search {
                query,
                min_score,
                types,
                any_type,
                export: csv_out,
            } => {
                assert_eq!(query, "Naruto");
                assert_eq!(min_score, Some(6.0));
                assert_eq!(types, vec![AnimeType::Tv, AnimeType::Movie]);
                assert!(!any_type);
                assert!(!csv_out.export);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_search_defaults_to_tv() {
        let args = Args::parse_from(["anime-dashboard", "search", "Bleach"]);
        let Command::Search { types, .. } = args.command else {
            panic!("expected search");
        };
        assert_eq!(types, vec![AnimeType::Tv]);
    }

    #[test]
    fn test_top_args() {
        let args = Args::parse_from(["anime-dashboard", "--verbose", "top", "--category", "popular", "--export"]);
        assert!(args.verbose);
        let Command::Top { category, anime_type, export: csv_out, .. } = args.command else {
            panic!("expected top");
        };
        assert_eq!(category, TopFilter::Popular);
        assert_eq!(anime_type, None);

        let paths = DataPaths::new("data");
        assert_eq!(
            csv_out.target(&paths, export::RANKINGS_FILE),
            Some(PathBuf::from("data/exports/top_anime_rankings.csv"))
        );
    }

    #[test]
    fn test_output_requires_export() {
        let result = Args::try_parse_from(["anime-dashboard", "compare", "A", "B", "--output", "x.csv"]);
        assert!(result.is_err());
    }
}
