use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use evep_core::AppError;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Where platform calls go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformBackend {
    /// Remote platform REST API.
    Http {
        /// API origin, e.g. `https://evep.example.org`.
        base_url: Url,
        /// Per-request timeout.
        timeout: Duration,
    },
    /// Seeded in-process platform for local development.
    Memory,
}

impl PlatformBackend {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Http { .. } => "http",
            Self::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub platform_backend: PlatformBackend,
    pub console_host: String,
    pub console_port: u16,
    pub frontend_url: String,
    pub query_cache_ttl: Duration,
    pub wizard_ttl: Duration,
}

impl ConsoleConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let platform_backend = match lookup("PLATFORM_BACKEND")
            .unwrap_or_else(|| "http".to_owned())
            .as_str()
        {
            "http" => {
                let raw_base_url = lookup("PLATFORM_API_BASE_URL")
                    .filter(|value| !value.trim().is_empty())
                    .ok_or_else(|| {
                        AppError::Validation("PLATFORM_API_BASE_URL is required".to_owned())
                    })?;
                let base_url = Url::parse(raw_base_url.trim()).map_err(|error| {
                    AppError::Validation(format!("invalid PLATFORM_API_BASE_URL: {error}"))
                })?;
                if !matches!(base_url.scheme(), "http" | "https") {
                    return Err(AppError::Validation(
                        "PLATFORM_API_BASE_URL must use http or https".to_owned(),
                    ));
                }

                let timeout_secs = parse_or(&lookup, "PLATFORM_TIMEOUT_SECS", 15_u64)?;
                PlatformBackend::Http {
                    base_url,
                    timeout: Duration::from_secs(timeout_secs.max(1)),
                }
            }
            "memory" => PlatformBackend::Memory,
            other => {
                return Err(AppError::Validation(format!(
                    "PLATFORM_BACKEND must be either 'http' or 'memory', got '{other}'"
                )));
            }
        };

        Ok(Self {
            platform_backend,
            console_host: lookup("CONSOLE_HOST").unwrap_or_else(|| "127.0.0.1".to_owned()),
            console_port: parse_or(&lookup, "CONSOLE_PORT", 3013_u16)?,
            frontend_url: lookup("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_owned()),
            query_cache_ttl: Duration::from_secs(parse_or(&lookup, "QUERY_CACHE_TTL_SECS", 30_u64)?),
            wizard_ttl: Duration::from_secs(
                parse_or(&lookup, "WIZARD_TTL_SECS", 7200_u64)?.max(60),
            ),
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.console_host).map_err(|error| {
            AppError::Internal(format!(
                "invalid CONSOLE_HOST '{}': {error}",
                self.console_host
            ))
        })?;
        Ok(SocketAddr::from((host, self.console_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_or<T, F>(lookup: &F, name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name).filter(|value| !value.trim().is_empty()) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use evep_core::AppError;

    use super::{ConsoleConfig, PlatformBackend};

    fn load(pairs: &[(&str, &str)]) -> Result<ConsoleConfig, AppError> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ConsoleConfig::from_lookup(|name| values.get(name).cloned())
    }

    #[test]
    fn base_url_is_required_for_http_backend() {
        let result = load(&[]);

        assert!(
            matches!(result, Err(AppError::Validation(message)) if message == "PLATFORM_API_BASE_URL is required")
        );
    }

    #[test]
    fn memory_backend_needs_no_base_url() {
        let Ok(config) = load(&[("PLATFORM_BACKEND", "memory")]) else {
            panic!("memory config should load");
        };

        assert_eq!(config.platform_backend, PlatformBackend::Memory);
        assert_eq!(config.console_port, 3013);
        assert_eq!(config.query_cache_ttl, Duration::from_secs(30));
        assert_eq!(config.wizard_ttl, Duration::from_secs(7200));
        assert!(config.socket_address().is_ok());
    }

    #[test]
    fn http_backend_reads_url_and_timeout() {
        let Ok(config) = load(&[
            ("PLATFORM_API_BASE_URL", "https://evep.example.org/"),
            ("PLATFORM_TIMEOUT_SECS", "5"),
            ("CONSOLE_PORT", "4000"),
        ]) else {
            panic!("http config should load");
        };

        let PlatformBackend::Http { base_url, timeout } = config.platform_backend else {
            panic!("expected http backend");
        };
        assert_eq!(base_url.host_str(), Some("evep.example.org"));
        assert_eq!(timeout, Duration::from_secs(5));
        assert_eq!(config.console_port, 4000);
    }

    #[test]
    fn wizard_ttl_has_a_one_minute_floor() {
        let short = load(&[("PLATFORM_BACKEND", "memory"), ("WIZARD_TTL_SECS", "5")]);
        let long = load(&[("PLATFORM_BACKEND", "memory"), ("WIZARD_TTL_SECS", "900")]);

        assert_eq!(short.map(|config| config.wizard_ttl).ok(), Some(Duration::from_secs(60)));
        assert_eq!(long.map(|config| config.wizard_ttl).ok(), Some(Duration::from_secs(900)));
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(load(&[("PLATFORM_API_BASE_URL", "not a url")]).is_err());
        assert!(load(&[("PLATFORM_API_BASE_URL", "ftp://evep.example.org")]).is_err());
        assert!(load(&[("PLATFORM_BACKEND", "memory"), ("CONSOLE_PORT", "99999")]).is_err());
        assert!(load(&[("PLATFORM_BACKEND", "grpc")]).is_err());
    }
}
