use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.p.2chat.io/open";

/// Page cap applied when a request does not specify one.
pub const DEFAULT_MAX_PAGES: u32 = 10;

/// Numbers searched by `search-all` when SEARCH_NUMBERS is not set. The list
/// may contain duplicates; the orchestrator dedupes at use.
const DEFAULT_SEARCH_NUMBERS: &[&str] = &[
    "+6580910054",
    "+6580261704",
    "+6587675861",
    "+6287811366678",
    "+6580914206",
    "+6580914387",
    "+6582040239",
    "+6582040694",
    "+6582040239",
    "+6580910054",
    "+6580910158",
];

/// Runtime configuration, sourced from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub port: u16,
    pub search_numbers: Vec<String>,
    pub export_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("API_KEY")
            .context("API_KEY environment variable is required")?;

        let base_url =
            env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().context("PORT must be a valid port number")?,
            Err(_) => 3000,
        };

        let search_numbers = match env::var("SEARCH_NUMBERS") {
            Ok(raw) => raw
                .split(',')
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .collect(),
            Err(_) => DEFAULT_SEARCH_NUMBERS.iter().map(|n| n.to_string()).collect(),
        };

        let export_dir = env::var("EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("exports"));

        Ok(Self {
            api_key,
            base_url,
            port,
            search_numbers,
            export_dir,
        })
    }
}
