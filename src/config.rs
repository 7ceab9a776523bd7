use std::str::FromStr;

pub const CURRENCY_SYMBOL: &str = "₩";
pub const DEFAULT_SYNC_TIMEOUT_MS: u32 = 15_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(()),
        }
    }
}

/// Connection details for the hosted row store and identity provider.
#[derive(Clone, Debug, PartialEq)]
pub struct RemoteConfig {
    pub base_url: String,
    pub anon_key: String,
}

impl RemoteConfig {
    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// `None` when no remote store is wired up; data then lives in local storage.
    pub remote: Option<RemoteConfig>,
    pub sync_timeout_ms: u32,
    pub currency_symbol: String,
    pub log_level: LogLevel,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_parts(
            option_env!("GAGYEBU_SUPABASE_URL"),
            option_env!("GAGYEBU_SUPABASE_ANON_KEY"),
            option_env!("GAGYEBU_SYNC_TIMEOUT_MS"),
            option_env!("GAGYEBU_LOG"),
        )
    }

    pub fn from_parts(
        url: Option<&str>,
        anon_key: Option<&str>,
        timeout_ms: Option<&str>,
        log_level: Option<&str>,
    ) -> Self {
        let url = url.map(|u| u.trim().trim_end_matches('/')).unwrap_or("");
        let anon_key = anon_key.map(str::trim).unwrap_or("");
        let remote = if url.is_empty() || anon_key.is_empty() {
            None
        } else {
            Some(RemoteConfig {
                base_url: url.to_string(),
                anon_key: anon_key.to_string(),
            })
        };

        let sync_timeout_ms = timeout_ms
            .and_then(|t| t.trim().parse::<u32>().ok())
            .filter(|t| *t > 0)
            .unwrap_or(DEFAULT_SYNC_TIMEOUT_MS);

        let log_level = log_level
            .and_then(|l| l.parse::<LogLevel>().ok())
            .unwrap_or(LogLevel::Info);

        AppConfig {
            remote,
            sync_timeout_ms,
            currency_symbol: CURRENCY_SYMBOL.to_string(),
            log_level,
        }
    }

    pub fn is_local(&self) -> bool {
        self.remote.is_none()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_parts(None, None, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_remote() {
        let config = AppConfig::default();
        assert!(config.is_local());
        assert_eq!(config.sync_timeout_ms, 15_000);
        assert_eq!(config.currency_symbol, "₩");
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_remote_requires_url_and_key() {
        let only_url = AppConfig::from_parts(Some("https://x.supabase.co"), None, None, None);
        assert!(only_url.is_local());

        let both = AppConfig::from_parts(Some("https://x.supabase.co/"), Some("key"), None, None);
        let remote = both.remote.clone().unwrap();
        assert_eq!(remote.base_url, "https://x.supabase.co");
        assert_eq!(remote.rest_url("transactions"), "https://x.supabase.co/rest/v1/transactions");
        assert_eq!(
            remote.auth_url("/token?grant_type=password"),
            "https://x.supabase.co/auth/v1/token?grant_type=password"
        );
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = AppConfig::from_parts(None, None, Some("soon"), Some("loud"));
        assert_eq!(config.sync_timeout_ms, DEFAULT_SYNC_TIMEOUT_MS);
        assert_eq!(config.log_level, LogLevel::Info);

        let config = AppConfig::from_parts(None, None, Some("0"), Some("DEBUG"));
        assert_eq!(config.sync_timeout_ms, DEFAULT_SYNC_TIMEOUT_MS);
        assert_eq!(config.log_level, LogLevel::Debug);

        let config = AppConfig::from_parts(None, None, Some(" 5000 "), Some("warning"));
        assert_eq!(config.sync_timeout_ms, 5000);
        assert_eq!(config.log_level.to_filter(), log::LevelFilter::Warn);
    }
}
