use std::time::Duration;

use serde::Deserialize;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "swarp.toml";

/// Top-level server configuration, loaded from `swarp.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub web_root: String,
    pub upstream: UpstreamConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".to_string(),
            web_root: "web".to_string(),
            upstream: UpstreamConfig::default(),
        }
    }
}

/// Roblox catalog endpoints and outbound request policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Host serving `/universes/v1/places/{placeId}/universe`.
    pub universes_base_url: String,
    /// Host serving `/v1/games?universeIds=`.
    pub games_base_url: String,
    /// Host serving `/v1/games/icons`.
    pub thumbnails_base_url: String,
    /// Per-request timeout for every catalog call.
    pub timeout_secs: u64,
    /// Icon dimensions requested from the thumbnails API.
    pub icon_size: String,
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            universes_base_url: "https://apis.roblox.com".to_string(),
            games_base_url: "https://games.roblox.com".to_string(),
            thumbnails_base_url: "https://thumbnails.roblox.com".to_string(),
            timeout_secs: 10,
            icon_size: "512x512".to_string(),
            user_agent: concat!("swarp-server/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Point all three catalog hosts at one base URL (used by tests and
    /// local mirrors).
    pub fn with_single_host(base_url: &str) -> Self {
        Self {
            universes_base_url: base_url.to_string(),
            games_base_url: base_url.to_string(),
            thumbnails_base_url: base_url.to_string(),
            ..Self::default()
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn is_icon_size(size: &str) -> bool {
    match size.split_once('x') {
        Some((w, h)) => {
            !w.is_empty()
                && !h.is_empty()
                && w.bytes().all(|b| b.is_ascii_digit())
                && h.bytes().all(|b| b.is_ascii_digit())
        },
        None => false,
    }
}

impl ServerConfig {
    /// Check the configuration, returning a description of the first problem.
    pub fn validate(&self) -> Result<(), String> {
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(format!(
                "listen_addr {:?} is not a valid socket address",
                self.listen_addr
            ));
        }

        let upstream = &self.upstream;
        for (key, url) in [
            ("upstream.universes_base_url", &upstream.universes_base_url),
            ("upstream.games_base_url", &upstream.games_base_url),
            ("upstream.thumbnails_base_url", &upstream.thumbnails_base_url),
        ] {
            if !is_http_url(url) {
                return Err(format!("{key} must be an http(s) URL, got {url:?}"));
            }
        }
        if upstream.timeout_secs == 0 {
            return Err("upstream.timeout_secs must be > 0".to_string());
        }
        if !is_icon_size(&upstream.icon_size) {
            return Err(format!(
                "upstream.icon_size must look like 512x512, got {:?}",
                upstream.icon_size
            ));
        }

        if !std::path::Path::new(&self.web_root).is_dir() {
            tracing::warn!(
                web_root = %self.web_root,
                "web_root does not exist, static files will 404"
            );
        }
        Ok(())
    }

    /// Load config from `SWARP_CONFIG` (or `swarp.toml`) if it exists, then
    /// apply env var overrides.
    pub fn load() -> Self {
        let path = std::env::var("SWARP_CONFIG").unwrap_or_else(|_| CONFIG_FILE.to_string());
        let mut config = match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<ServerConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!(path = %path, "Loaded configuration");
                    cfg
                },
                Err(e) => {
                    tracing::warn!(path = %path, "Failed to parse config: {e}, using defaults");
                    ServerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!(path = %path, "No config file found, using defaults");
                ServerConfig::default()
            },
        };

        // Environment variable overrides
        if let Ok(port) = std::env::var("PORT")
            && let Ok(port) = port.parse::<u16>()
        {
            config.listen_addr = format!("0.0.0.0:{port}");
        }
        if let Ok(addr) = std::env::var("SWARP_LISTEN_ADDR")
            && !addr.is_empty()
        {
            config.listen_addr = addr;
        }
        if let Ok(root) = std::env::var("SWARP_WEB_ROOT")
            && !root.is_empty()
        {
            config.web_root = root;
        }
        if let Ok(val) = std::env::var("SWARP_UPSTREAM_TIMEOUT_SECS")
            && let Ok(n) = val.parse::<u64>()
        {
            config.upstream.timeout_secs = n;
        }

        config
    }
}
