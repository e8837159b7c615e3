use std::process::ExitCode;

use apify_lab::lessons::{
    amazon::AmazonOptions, crawler::CrawlerOptions, datasets::DatasetsOptions,
    google_maps::GoogleMapsOptions, instagram::InstagramOptions, runs::RunsOptions,
    schedules::SchedulesOptions, tiktok::TiktokOptions, twitter::TwitterOptions,
    web_scraper::WebScraperOptions,
};
use apify_lab::{info_time, lessons, ApifyClient, Config, Result};
use chrono::Local;
use clap::{Parser, Subcommand};

/// Walkthroughs of the Apify API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    /// Apify API token
    #[arg(long, global = true, env = "APIFY_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// API base URL
    #[arg(long, global = true, env = "APIFY_API_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    lesson: Lesson,
}

#[derive(Subcommand, Debug)]
enum Lesson {
    /// 01: check the connection, show the account and a few actors
    Hello,
    /// 02: crawl a website into text and markdown
    Crawler(CrawlerOptions),
    /// 03: web scraper with a custom page function
    WebScraper(WebScraperOptions),
    /// 04: businesses, ratings and reviews from Google Maps
    GoogleMaps(GoogleMapsOptions),
    /// 05: posts of an Instagram profile
    Instagram(InstagramOptions),
    /// 06: videos of TikTok profiles or hashtags
    Tiktok(TiktokOptions),
    /// 07: tweets matching a search query
    Twitter(TwitterOptions),
    /// 08: Amazon search results and price analysis
    Amazon(AmazonOptions),
    /// 09: create, fill and read a dataset
    Datasets(DatasetsOptions),
    /// 10: records in a key-value store
    KvStore,
    /// 11: start, poll and inspect an actor run
    Runs(RunsOptions),
    /// 12: schedules and webhooks
    Schedules(SchedulesOptions),
}

async fn run(args: Args) -> Result<()> {
    let config = Config::new(args.token, args.base_url)?;
    let client = ApifyClient::new(&config)?;

    match &args.lesson {
        Lesson::Hello => lessons::hello::run(&client, &config).await,
        Lesson::Crawler(opts) => lessons::crawler::run(&client, opts).await,
        Lesson::WebScraper(opts) => lessons::web_scraper::run(&client, opts).await,
        Lesson::GoogleMaps(opts) => lessons::google_maps::run(&client, opts).await,
        Lesson::Instagram(opts) => lessons::instagram::run(&client, opts).await,
        Lesson::Tiktok(opts) => lessons::tiktok::run(&client, opts).await,
        Lesson::Twitter(opts) => lessons::twitter::run(&client, opts).await,
        Lesson::Amazon(opts) => lessons::amazon::run(&client, opts).await,
        Lesson::Datasets(opts) => lessons::datasets::run(&client, opts).await,
        Lesson::KvStore => lessons::kv_store::run(&client).await,
        Lesson::Runs(opts) => lessons::runs::run(&client, opts).await,
        Lesson::Schedules(opts) => lessons::schedules::run(&client, opts).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let start_time = Local::now();

    if let Err(e) = run(Args::parse()).await {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }
    info_time!(start_time, "Full program time:");

    ExitCode::SUCCESS
}
