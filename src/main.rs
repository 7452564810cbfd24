use std::{sync::Arc, time::Duration};

use clap::{Parser, Subcommand};
use log::{debug, info};
use serde::Serialize;

use github_explorer::{
    ExplorerClient, ExplorerClientConfig, FetcherRateLimitEnforcer, FetcherRetrier,
    GITHUB_API_ENDPOINT, GITHUB_WEB_ENDPOINT, GitHubExplorer, HtmlPageFetcher, ItemFailurePolicy,
    LogRateLimitObserver, RepositoryFetcher, RestFetcher, StdResult, TrendingPeriod,
};

/// Command line arguments for the GitHub explorer
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// GitHub access token used for the REST API
    #[arg(short, long, env = "GITHUB_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// REST API endpoint
    #[arg(long, default_value = GITHUB_API_ENDPOINT)]
    api_endpoint: String,

    /// Website endpoint
    #[arg(long, default_value = GITHUB_WEB_ENDPOINT)]
    web_endpoint: String,

    /// Maximum number of attempts per repository request (1 disables retries)
    #[arg(short, long, default_value_t = 1)]
    max_attempts: u32,

    /// Leave out the repositories that fail to be fetched instead of failing the listing
    #[arg(long)]
    skip_failed: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show one repository
    Repository { owner: String, name: String },

    /// List the trending repositories
    Trending {
        /// Time window: daily, weekly or monthly
        #[arg(short, long, default_value_t = TrendingPeriod::Daily)]
        since: TrendingPeriod,

        /// Language slug to filter with
        #[arg(short, long)]
        language: Option<String>,
    },

    /// List the languages the trending repositories can be filtered with
    Languages,

    /// List the curated collections
    Showcases,

    /// List the repositories of a curated collection
    Showcase { slug: String },
}

#[tokio::main]
async fn main() -> StdResult<()> {
    env_logger::init();
    let args = Args::parse();
    debug!("Exploring with command: {:?}", args.command);

    let explorer = build_explorer(&args)?;
    match &args.command {
        Command::Repository { owner, name } => {
            print_json(&explorer.get_repository(owner, name).await?)?
        }
        Command::Trending { since, language } => {
            let language = language.as_deref();
            print_json(&explorer.get_trending_repositories(*since, language).await?)?
        }
        Command::Languages => print_json(&explorer.get_languages().await?)?,
        Command::Showcases => print_json(&explorer.get_showcases().await?)?,
        Command::Showcase { slug } => print_json(&explorer.get_showcase_repositories(slug).await?)?,
    }
    info!("Exploration completed");

    Ok(())
}

fn build_explorer(args: &Args) -> StdResult<Arc<dyn GitHubExplorer>> {
    let mut fetcher: Arc<dyn RepositoryFetcher> = Arc::new(RestFetcher::try_new(
        &args.api_endpoint,
        args.token.as_deref(),
    )?);
    if args.max_attempts > 1 {
        fetcher = Arc::new(FetcherRetrier::new(
            fetcher,
            args.max_attempts,
            Duration::from_secs(1),
        ));
    }
    let fetcher = Arc::new(FetcherRateLimitEnforcer::new(
        fetcher,
        Arc::new(LogRateLimitObserver),
    ));
    let page_fetcher = Arc::new(HtmlPageFetcher::try_new(&args.web_endpoint)?);
    let config = ExplorerClientConfig {
        item_failure_policy: if args.skip_failed {
            ItemFailurePolicy::Skip
        } else {
            ItemFailurePolicy::Abort
        },
    };

    Ok(Arc::new(ExplorerClient::new(fetcher, page_fetcher, config)))
}

fn print_json<T: Serialize>(value: &T) -> StdResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}
