// ⚙️ Configuration - CLI flags and the explicit config handed to the pipeline
//
// Endpoint, key and file locations are plain values passed in at
// construction time; nothing here is process-global.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://developer.nps.gov/api/v1/parks";
pub const DEFAULT_CACHE_FILE: &str = "national_parks.json";
pub const DEFAULT_VISITOR_FILE: &str = "parkVisitation.csv";
pub const DEFAULT_LIMIT: u32 = 471;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// CLI
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "park-explorer",
    version,
    about = "Explore US National Parks by state, topic and activity"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Cached API response (delete it to force a refresh)
    #[arg(long, global = true, default_value = DEFAULT_CACHE_FILE)]
    pub cache: PathBuf,

    /// Visitor-count table (CSV with Park and RecreationVisitors2022 columns)
    #[arg(long, global = true, default_value = DEFAULT_VISITOR_FILE)]
    pub visitors: PathBuf,

    /// JSON rule table replacing the built-in name normalization rules
    #[arg(long, global = true)]
    pub rules: Option<PathBuf>,

    /// Park API endpoint
    #[arg(long, global = true, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Park API key (only needed when the cache is missing)
    #[arg(long, global = true, env = "NPS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Maximum number of park records to request
    #[arg(long, global = true, default_value_t = DEFAULT_LIMIT)]
    pub limit: u32,

    /// HTTP timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Use the line-mode shell instead of the terminal UI
    #[arg(long, global = true)]
    pub plain: bool,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Play the park selection game (default)
    Play,
    /// Re-fetch park data, rewrite the cache and print a summary
    Refresh,
    /// Print a catalog summary and visitor names that matched no park
    Report,
}

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub limit: u32,
    pub timeout: Duration,
    pub cache_path: PathBuf,
    pub visitor_path: PathBuf,
    pub rules_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            limit: DEFAULT_LIMIT,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_path: PathBuf::from(DEFAULT_CACHE_FILE),
            visitor_path: PathBuf::from(DEFAULT_VISITOR_FILE),
            rules_path: None,
        }
    }
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        Config {
            endpoint: cli.endpoint.clone(),
            api_key: cli.api_key.clone(),
            limit: cli.limit,
            timeout: Duration::from_secs(cli.timeout_secs),
            cache_path: cli.cache.clone(),
            visitor_path: cli.visitors.clone(),
            rules_path: cli.rules.clone(),
        }
    }
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Play)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_files() {
        let cli = Cli::parse_from(["park-explorer"]);
        let config = Config::from(&cli);

        assert_eq!(cli.command(), Command::Play);
        assert_eq!(config.cache_path, PathBuf::from("national_parks.json"));
        assert_eq!(config.visitor_path, PathBuf::from("parkVisitation.csv"));
        assert_eq!(config.limit, 471);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.rules_path.is_none());
    }

    #[test]
    fn test_flags_and_subcommand() {
        let cli = Cli::parse_from([
            "park-explorer",
            "report",
            "--cache",
            "/tmp/parks.json",
            "--limit",
            "10",
            "--api-key",
            "abc",
            "--plain",
        ]);
        let config = Config::from(&cli);

        assert_eq!(cli.command(), Command::Report);
        assert!(cli.plain);
        assert_eq!(config.cache_path, PathBuf::from("/tmp/parks.json"));
        assert_eq!(config.limit, 10);
        assert_eq!(config.api_key.as_deref(), Some("abc"));
    }
}
