use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_ROOT: &str = "https://fsa-puppy-bowl.herokuapp.com/api";
pub const DEFAULT_COHORT: &str = "2410-ftb-et-web-am";
const LOG_DIR: &str = "roster_terminal";
const LOG_FILE: &str = "roster.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterConfig {
    pub base_url: String,
    pub timeout: Option<Duration>,
    pub log_filter: String,
    pub log_file: Option<PathBuf>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            base_url: base_url(DEFAULT_API_ROOT, DEFAULT_COHORT),
            timeout: None,
            log_filter: "info".to_string(),
            log_file: default_log_path(),
        }
    }
}

impl RosterConfig {
    /// Reads `.env.local`, then `.env`, then the process environment.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_env()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let base_url = match get("ROSTER_BASE_URL") {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => {
                let root = get("ROSTER_API_ROOT").unwrap_or_else(|| DEFAULT_API_ROOT.to_string());
                let cohort = get("ROSTER_COHORT").unwrap_or_else(|| DEFAULT_COHORT.to_string());
                base_url(&root, &cohort)
            }
        };
        let timeout = get("ROSTER_TIMEOUT_SECS")
            .and_then(|val| val.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        let log_filter = get("LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        let log_file = get("ROSTER_LOG_FILE")
            .map(PathBuf::from)
            .or_else(|| log_path_from(get("XDG_CACHE_HOME"), get("HOME")));

        Self {
            base_url,
            timeout,
            log_filter,
            log_file,
        }
    }
}

pub fn base_url(api_root: &str, cohort: &str) -> String {
    format!(
        "{}/{}",
        api_root.trim_end_matches('/'),
        cohort.trim_matches('/')
    )
}

fn default_log_path() -> Option<PathBuf> {
    let non_empty = |key: &str| env::var(key).ok().filter(|v| !v.trim().is_empty());
    log_path_from(non_empty("XDG_CACHE_HOME"), non_empty("HOME"))
}

fn log_path_from(cache_home: Option<String>, home: Option<String>) -> Option<PathBuf> {
    if let Some(base) = cache_home {
        return Some(PathBuf::from(base).join(LOG_DIR).join(LOG_FILE));
    }
    let home = home?;
    Some(PathBuf::from(home).join(".cache").join(LOG_DIR).join(LOG_FILE))
}
