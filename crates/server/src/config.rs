use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use midweek_core::{FetchConfig, WorkbookConfig};

/// Serve weekly meeting programs over HTTP
#[derive(Parser, Debug, Clone)]
#[command(name = "midweek-server")]
#[command(author = "Midweek Contributors")]
#[command(version)]
#[command(about = "Serve weekly meeting programs as JSON", long_about = None)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "MIDWEEK_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Site root that page and reference links resolve against
    #[arg(long, env = "MIDWEEK_SITE_ROOT", default_value = "https://wol.jw.org")]
    pub site_root: String,

    /// Root of the reference API
    #[arg(long, env = "MIDWEEK_API_ROOT", default_value = "https://wol.jw.org/wol/api/v1")]
    pub api_root: String,

    /// Timeout for each upstream fetch, in seconds
    #[arg(long, env = "MIDWEEK_TIMEOUT", default_value = "30")]
    pub timeout: u64,

    /// Timeout for a whole request, in seconds
    #[arg(long, env = "MIDWEEK_REQUEST_TIMEOUT", default_value = "120")]
    pub request_timeout: u64,

    /// Custom User-Agent for upstream requests
    #[arg(long, env = "MIDWEEK_USER_AGENT")]
    pub user_agent: Option<String>,
}

impl ServerConfig {
    pub fn workbook_config(&self) -> WorkbookConfig {
        WorkbookConfig::builder().site_root(&self.site_root).api_root(&self.api_root).build()
    }

    pub fn fetch_config(&self) -> FetchConfig {
        let mut config = FetchConfig { timeout: self.timeout, ..Default::default() };
        if let Some(user_agent) = &self.user_agent {
            config.user_agent = user_agent.clone();
        }
        config
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::try_parse_from(["midweek-server"]).unwrap();
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.workbook_config().api_root, "https://wol.jw.org/wol/api/v1");
        assert_eq!(config.fetch_config().timeout, 30);
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_flags_override() {
        let config = ServerConfig::try_parse_from([
            "midweek-server",
            "--bind",
            "0.0.0.0:9000",
            "--timeout",
            "5",
            "--user-agent",
            "midweek-test",
        ])
        .unwrap();
        assert_eq!(config.bind.to_string(), "0.0.0.0:9000");
        assert_eq!(config.fetch_config().timeout, 5);
        assert_eq!(config.fetch_config().user_agent, "midweek-test");
    }
}
