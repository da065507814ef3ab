use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Client configuration snapshot
///
/// Every field is optional: an empty `Options` fetches directly, without
/// cookies, using the default user agent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Options {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default)]
    pub user_agent: Option<String>,

    /// File listing upstream proxies, one URL per line
    #[serde(rename = "proxy-file", default)]
    pub proxy_file: Option<PathBuf>,

    /// Directory tree of per-domain cookie files
    #[serde(rename = "cookie-dir", default)]
    pub cookie_dir: Option<PathBuf>,

    #[serde(default)]
    pub transport: TransportOptions,
}

/// Settings handed to the underlying HTTP transport
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransportOptions {
    /// Total request timeout (seconds); unset means no limit
    #[serde(rename = "timeout-secs", default)]
    pub timeout_secs: Option<u64>,

    /// TCP connect timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Maximum redirect hops followed per request
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl TransportOptions {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            max_redirects: default_max_redirects(),
        }
    }
}

fn default_connect_timeout_secs() -> u64 {
    10
}

// Same limit as reqwest's default redirect policy
fn default_max_redirects() -> usize {
    10
}
