use anyhow::{anyhow, Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";
pub const DEFAULT_DEBOUNCE_MS: u64 = 250;
pub const DEFAULT_SUPPRESSION_MS: u64 = 300;
pub const DEFAULT_MAX_SUGGESTIONS: usize = 20;
pub const DEFAULT_DROPDOWN_Z_INDEX: i32 = 9999;

#[derive(Clone, Debug)]
pub struct TypeaheadConfig {
    pub api_base: Url,
    pub debounce: Duration,
    pub suppression: Duration,
    pub max_suggestions: usize,
    pub dropdown_z_index: i32,
}

impl Default for TypeaheadConfig {
    fn default() -> Self {
        Self {
            api_base: Url::parse(DEFAULT_API_BASE).expect("default api base is a valid url"),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            suppression: Duration::from_millis(DEFAULT_SUPPRESSION_MS),
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            dropdown_z_index: DEFAULT_DROPDOWN_Z_INDEX,
        }
    }
}

impl TypeaheadConfig {
    pub fn from_env() -> Result<Self> {
        let api_base = std::env::var("STOCKSEARCH_API_BASE")
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let api_base = Url::parse(&api_base)
            .with_context(|| format!("STOCKSEARCH_API_BASE is not a valid url: {}", api_base))?;

        let debounce = Duration::from_millis(env_or("STOCKSEARCH_DEBOUNCE_MS", DEFAULT_DEBOUNCE_MS)?);
        let suppression =
            Duration::from_millis(env_or("STOCKSEARCH_SUPPRESSION_MS", DEFAULT_SUPPRESSION_MS)?);
        let max_suggestions = env_or("STOCKSEARCH_MAX_SUGGESTIONS", DEFAULT_MAX_SUGGESTIONS)?;
        let dropdown_z_index = env_or("STOCKSEARCH_DROPDOWN_Z_INDEX", DEFAULT_DROPDOWN_Z_INDEX)?;

        let config = Self {
            api_base,
            debounce,
            suppression,
            max_suggestions,
            dropdown_z_index,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_suggestions == 0 {
            return Err(anyhow!("max_suggestions must be at least 1"));
        }
        // A programmatic query update schedules a debounce; it has to land inside the window.
        if self.suppression <= self.debounce {
            return Err(anyhow!(
                "suppression window ({:?}) must be longer than the debounce delay ({:?})",
                self.suppression,
                self.debounce
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub data_dir: PathBuf,
    pub bind: SocketAddr,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let data_dir = PathBuf::from(
            std::env::var("STOCKSEARCH_DATA_DIR").unwrap_or_else(|_| "data".to_string()),
        );
        let bind = env_or("STOCKSEARCH_BIND", SocketAddr::from(([0, 0, 0, 0], 8000)))?;
        Ok(Self { data_dir, bind })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{} has an invalid value {:?}: {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}
