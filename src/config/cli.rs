use crate::config::toml_config::TomlConfig;
use crate::config::PortalConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "portal-catalog")]
#[command(about = "Browse the interoperability service catalog of the EDI portal")]
pub struct CliConfig {
    /// Optional TOML settings file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Upstream API base URL (overrides API_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    /// Skip TLS certificate verification for this run
    #[arg(long, global = true)]
    pub insecure: bool,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List catalog entries, filtered and paginated
    List {
        /// Case-insensitive text matched against service code, description and member
        #[arg(short, long)]
        search: Option<String>,

        /// Only entries of this member ("todos" for all)
        #[arg(short, long)]
        member: Option<String>,

        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Print the matching entries as JSON instead of cards
        #[arg(long)]
        json: bool,
    },
    /// Show the detail of one service
    Show {
        /// Service id (idServicio)
        id: i64,

        #[arg(long)]
        json: bool,
    },
    /// List member names with their service count
    Members,
    /// Log in only and report the outcome
    Login,
    /// Log in, fetch the catalog and print the first entry
    Probe,
}

impl CliConfig {
    /// Settings file, environment, then command line flags.
    pub fn resolve(&self) -> Result<PortalConfig> {
        let file = match &self.config {
            Some(path) => Some(TomlConfig::from_file(path)?),
            None => None,
        };

        let mut config = PortalConfig::load(file.as_ref())?;

        if let Some(base_url) = &self.base_url {
            config.base_url = Some(base_url.clone());
        }
        if let Some(seconds) = self.timeout_seconds {
            config.transport.timeout = Duration::from_secs(seconds);
        }
        if self.insecure {
            config.transport.accept_invalid_certs = true;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_command() {
        let cli = CliConfig::try_parse_from([
            "portal-catalog",
            "list",
            "--search",
            "deuda",
            "--page",
            "2",
            "--insecure",
        ])
        .unwrap();

        assert!(cli.insecure);
        match cli.command {
            Command::List { search, member, page, json } => {
                assert_eq!(search.as_deref(), Some("deuda"));
                assert!(member.is_none());
                assert_eq!(page, 2);
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_flags_override_resolved_config() {
        let cli = CliConfig::try_parse_from([
            "portal-catalog",
            "--base-url",
            "http://127.0.0.1:8080/api",
            "--timeout-seconds",
            "3",
            "login",
        ])
        .unwrap();

        let config = cli.resolve().unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://127.0.0.1:8080/api"));
        assert_eq!(config.transport.timeout, Duration::from_secs(3));
    }
}
