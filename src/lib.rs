//! Walkthroughs of the Apify REST API.
//!
//! Every lesson is a short linear procedure: build an input, call one actor or storage
//! endpoint, then print what came back as tables and panels. The remote platform does
//! all the crawling; this crate only sequences calls and formats their results.

mod macros;

pub mod client;
pub mod config;
mod error;
pub mod lessons;
pub mod model;
pub mod parse;
pub mod poll;
pub mod render;

pub use client::ApifyClient;
pub use config::Config;
pub use error::{Error, Result};

/// Environment variable holding the API token.
pub const TOKEN_ENV_VAR: &str = "APIFY_API_TOKEN";
/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV_VAR: &str = "APIFY_API_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "https://api.apify.com/v2";
/// Web console, used for "view it here" links in the summaries.
const CONSOLE_URL: &str = "https://console.apify.com";

const POLL_INTERVAL_SECS: u64 = 2;
const POLL_MAX_WAIT_SECS: u64 = 60;
