mod config;
mod contest_cmd;
mod render;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::{ApiClient, ReferenceCache, ReferenceSource};
use contest::{Navigator, ProblemSearch, ProblemSupplier, Route};
use tracing::Level;

use crate::config::CliAppConfig;
use crate::contest_cmd::{ContestArgs, Target};

#[derive(Parser)]
#[command(name = "bacha")]
#[command(about = "Plan and publish virtual contests", long_about = None, version)]
struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show which page a site path resolves to
    Route {
        path: String,
        /// Selected user id
        #[arg(long)]
        user: Option<String>,
        /// Rival user id (repeatable)
        #[arg(long = "rival")]
        rivals: Vec<String>,
    },
    /// Search the problem catalog
    Search {
        #[arg(required = true)]
        query: Vec<String>,
        /// Print the n-th result as JSON
        #[arg(long)]
        pick: Option<usize>,
    },
    /// Create a new virtual contest
    Create(ContestArgs),
    /// Edit an existing virtual contest
    Update {
        contest_id: String,
        #[command(flatten)]
        args: ContestArgs,
    },
    /// List recent public contests
    Recent {
        /// Only contests you own
        #[arg(long, conflicts_with = "joined")]
        mine: bool,
        /// Only contests you have joined
        #[arg(long)]
        joined: bool,
    },
    /// Show one contest with its problems
    Show { contest_id: String },
    /// Join a contest
    Join { contest_id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    match cli.command {
        Command::Route {
            path,
            user,
            rivals,
        } => {
            let mut navigator = Navigator::new().context("Failed to build route table")?;
            navigator.update_user_ids(user.unwrap_or_default(), rivals);
            render::print_page(&navigator.dispatch(&path), cli.json)
        }
        Command::Search { query, pick } => {
            let config = CliAppConfig::load().context("Failed to load config")?;
            search(&config, &query.join(" "), pick, cli.json).await
        }
        Command::Create(args) => {
            let config = CliAppConfig::load().context("Failed to load config")?;
            contest_cmd::run(&config, Target::Create, &args, cli.json).await
        }
        Command::Update { contest_id, args } => {
            let config = CliAppConfig::load().context("Failed to load config")?;
            contest_cmd::run(&config, Target::Update(contest_id), &args, cli.json).await
        }
        Command::Recent { mine, joined } => {
            let api = client_from_config()?;
            let contests = if mine {
                api.my_contests().await
            } else if joined {
                api.participated_contests().await
            } else {
                api.recent_contests().await
            }
            .context("Failed to load contests")?;
            render::print_contests(&contests, cli.json)
        }
        Command::Show { contest_id } => {
            let api = client_from_config()?;
            let details = api
                .get_contest(&contest_id)
                .await
                .with_context(|| format!("Failed to load contest {contest_id}"))?;
            render::print_details(&details, cli.json)
        }
        Command::Join { contest_id } => {
            let api = client_from_config()?;
            api.join_contest(&contest_id)
                .await
                .with_context(|| format!("Failed to join contest {contest_id}"))?;
            let path = Route::ShowContest { contest_id }.path();
            println!("{}", api.url(&format!("#{path}")));
            Ok(())
        }
    }
}

fn client_from_config() -> Result<ApiClient> {
    let config = CliAppConfig::load().context("Failed to load config")?;
    ApiClient::new(&config.api, &config.auth).context("Failed to build API client")
}

async fn search(config: &CliAppConfig, query: &str, pick: Option<usize>, json: bool) -> Result<()> {
    let api = ApiClient::new(&config.api, &config.auth).context("Failed to build API client")?;
    let cache = ReferenceCache::new(Arc::new(api) as Arc<dyn ReferenceSource>);
    let problems = cache.problems().await.context("Failed to load problems")?;

    let mut search = ProblemSearch::new(problems.values().cloned());
    search.set_query(query);

    if let Some(index) = pick {
        if search.select(index).is_none() {
            anyhow::bail!("No result at index {index}");
        }
        return render::print_json(&search.supply());
    }

    let results = search.results();
    if json {
        render::print_json(&results)
    } else {
        render::print_search_results(&results);
        Ok(())
    }
}
