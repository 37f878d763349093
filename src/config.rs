use clap::Parser;
use std::num::NonZeroUsize;
use std::time::Duration;

/// Subscribable iCalendar feeds for esports leagues
#[derive(Parser, Debug, Clone)]
#[command(name = "esports-calendar", version, about)]
pub struct Config {
    /// HTTP listen address for the feed endpoint
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:3000")]
    pub listen_addr: String,

    /// PandaScore API base URL
    #[arg(
        long,
        env = "PANDASCORE_API_URL",
        default_value = "https://api.pandascore.co"
    )]
    pub pandascore_api_url: String,

    /// PandaScore API token (sent as a bearer token)
    #[arg(long, env = "PANDASCORE_TOKEN", hide_env_values = true)]
    pub pandascore_token: Option<String>,

    /// Maximum age of a cached calendar before it is re-rendered (seconds)
    #[arg(long, env = "CACHE_TTL_SECS", default_value = "300")]
    pub cache_ttl_secs: u64,

    /// Maximum number of league calendars kept in memory
    #[arg(long, env = "CACHE_CAPACITY", default_value = "256")]
    pub cache_capacity: usize,

    /// Timeout for each upstream request (seconds)
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value = "10")]
    pub upstream_timeout_secs: u64,

    /// Page size requested from each PandaScore match partition
    #[arg(long, env = "PER_PAGE", default_value = "100")]
    pub per_page: u32,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.cache_ttl_secs == 0 {
            anyhow::bail!("cache_ttl_secs must be positive");
        }
        if self.cache_capacity == 0 {
            anyhow::bail!("cache_capacity must be positive");
        }
        if self.upstream_timeout_secs == 0 {
            anyhow::bail!("upstream_timeout_secs must be positive");
        }
        if !(1..=100).contains(&self.per_page) {
            anyhow::bail!("per_page must be between 1 and 100");
        }
        let url = url::Url::parse(&self.pandascore_api_url)
            .map_err(|e| anyhow::anyhow!("Invalid PANDASCORE_API_URL: {}", e))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("PANDASCORE_API_URL must be an http(s) URL");
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn cache_capacity(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.cache_capacity).unwrap_or(NonZeroUsize::MIN)
    }
}
