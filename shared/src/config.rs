use std::str::FromStr;
use tracing::warn;

/// Which cache implementation backs the word-count cache
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheBackend {
    Moka,
    Memory,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "moka" => Ok(CacheBackend::Moka),
            "memory" => Ok(CacheBackend::Memory),
            other => Err(format!(
                "Invalid cache backend '{}'. Must be 'moka' or 'memory'",
                other
            )),
        }
    }
}

pub struct Config {
    pub host: String,
    pub http_port: u16,
    pub data_dir: String,
    pub cache_backend: CacheBackend,
    pub cache_capacity: u64,
    pub allowed_origins: Vec<String>,
}

impl Config {
    const DEFAULT_HOST: &str = "0.0.0.0";
    const DEFAULT_HTTP_PORT: u16 = 8080;
    const DEFAULT_DATA_DIR: &str = "./data";
    const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let http_port = match lookup("BULLETIN_HTTP_PORT") {
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
                warn!(
                    "BULLETIN_HTTP_PORT '{}' is not a valid port, using {}",
                    raw,
                    Self::DEFAULT_HTTP_PORT
                );
                Self::DEFAULT_HTTP_PORT
            }),
            None => Self::DEFAULT_HTTP_PORT,
        };

        let cache_backend = match lookup("BULLETIN_CACHE_BACKEND") {
            Some(raw) => raw.parse::<CacheBackend>().unwrap_or_else(|e| {
                warn!("{}, falling back to moka", e);
                CacheBackend::Moka
            }),
            None => CacheBackend::Moka,
        };

        let cache_capacity = match lookup("BULLETIN_CACHE_CAPACITY") {
            Some(raw) => raw.parse::<u64>().unwrap_or_else(|_| {
                warn!(
                    "BULLETIN_CACHE_CAPACITY '{}' is not a number, using {}",
                    raw,
                    Self::DEFAULT_CACHE_CAPACITY
                );
                Self::DEFAULT_CACHE_CAPACITY
            }),
            None => Self::DEFAULT_CACHE_CAPACITY,
        };

        Self {
            host: lookup("BULLETIN_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string()),
            http_port,
            data_dir: lookup("BULLETIN_DATA_DIR")
                .unwrap_or_else(|| Self::DEFAULT_DATA_DIR.to_string()),
            cache_backend,
            cache_capacity,
            allowed_origins: lookup("BULLETIN_ALLOWED_ORIGINS")
                .unwrap_or_else(|| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }
}
