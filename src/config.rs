// src/config.rs
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://hacker-news.firebaseio.com";
pub const DEFAULT_ID_LIMIT: u32 = 200;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CACHE_TTL_MINUTES: u64 = 5;
pub const DEFAULT_PORT: u16 = 8080;

pub const ENV_BASE_URL: &str = "HN_BASE_URL";
pub const ENV_ID_LIMIT: &str = "HN_ID_LIMIT";
pub const ENV_TIMEOUT_SECS: &str = "HN_TIMEOUT_SECS";
pub const ENV_CACHE_TTL_MINUTES: &str = "STORIES_CACHE_TTL_MINUTES";
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_PORT: &str = "PORT";
pub const ENV_DEBUG_ROUTES: &str = "DEBUG_ROUTES";

#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream API root, without trailing slash.
    pub base_url: String,
    /// `limitToFirst` sent with the newest-ids query.
    pub id_limit: u32,
    pub request_timeout: Duration,
    pub cache_ttl: Duration,
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Mount `/metrics` next to the stories route.
    pub debug_routes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            id_limit: DEFAULT_ID_LIMIT,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_MINUTES * 60),
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            debug_routes: false,
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    /// Unset, unparsable or out-of-range values keep their defaults (a warning is logged for the latter two).
    pub fn from_env() -> Self {
        let d = Self::default();
        let base_url = std::env::var(ENV_BASE_URL)
            .ok()
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(d.base_url);

        Self {
            base_url,
            id_limit: env_parse_where(ENV_ID_LIMIT, d.id_limit, |v| *v > 0),
            request_timeout: Duration::from_secs(env_parse_where(
                ENV_TIMEOUT_SECS,
                DEFAULT_TIMEOUT_SECS,
                |v| *v > 0,
            )),
            cache_ttl: Duration::from_secs(
                env_parse(ENV_CACHE_TTL_MINUTES, DEFAULT_CACHE_TTL_MINUTES).saturating_mul(60),
            ),
            bind_addr: env_parse(ENV_BIND_ADDR, d.bind_addr),
            port: env_parse(ENV_PORT, d.port),
            debug_routes: std::env::var(ENV_DEBUG_ROUTES).ok().as_deref() == Some("1"),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env_parse_where(key, default, |_| true)
}

/// Like `env_parse`, but values rejected by `valid` also fall back to `default`.
fn env_parse_where<T: FromStr>(key: &str, default: T, valid: impl Fn(&T) -> bool) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(v) if valid(&v) => v,
            _ => {
                tracing::warn!(key, value = %raw, "invalid value, using default");
                default
            }
        },
        Err(_) => default,
    }
}
