use serde::Deserialize;

pub const DEFAULT_LMS_BASE_URL: &str = "https://acadlms.d2l-partners.brightspace.com/d2l/api";
pub const DEFAULT_API_VERSION: &str = "1.43";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub lms_base_url: String,
    pub lms_token: String,
    /// Learning Platform API version (enrollments, org structure).
    pub lp_version: String,
    /// Learning Environment API version (grades).
    pub le_version: String,
    /// Maximum in-flight per-course lookups. 1 keeps the lookups sequential.
    pub fetch_concurrency: usize,
    pub lms_timeout_secs: Option<u64>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let config = Self {
            port: lookup("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            lms_base_url: non_blank("LMS_BASE_URL")
                .map_or_else(|| Ok(DEFAULT_LMS_BASE_URL.to_string()), validate_base_url)?,
            lms_token: lookup("LMS_API_TOKEN")
                .ok_or_else(|| anyhow::anyhow!("LMS_API_TOKEN environment variable required"))
                .and_then(|token| {
                    if token.trim().is_empty() {
                        anyhow::bail!("LMS_API_TOKEN cannot be empty");
                    }
                    Ok(token)
                })?,
            lp_version: non_blank("LMS_LP_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            le_version: non_blank("LMS_LE_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            fetch_concurrency: lookup("FETCH_CONCURRENCY")
                .unwrap_or_else(|| "1".to_string())
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("FETCH_CONCURRENCY must be a positive integer"))
                .and_then(|n| {
                    if n == 0 {
                        anyhow::bail!("FETCH_CONCURRENCY must be at least 1");
                    }
                    Ok(n)
                })?,
            lms_timeout_secs: non_blank("LMS_TIMEOUT_SECS")
                .map(|raw| {
                    raw.trim().parse().map_err(|_| {
                        anyhow::anyhow!("LMS_TIMEOUT_SECS must be a whole number of seconds")
                    })
                })
                .transpose()?,
        };

        // Token stays out of the logs
        tracing::debug!("LMS Base URL: {}", config.lms_base_url);
        tracing::debug!(
            "LMS API versions: lp={} le={}",
            config.lp_version,
            config.le_version
        );
        tracing::debug!("Fetch concurrency: {}", config.fetch_concurrency);
        if let Some(secs) = config.lms_timeout_secs {
            tracing::info!("LMS request timeout configured: {}s", secs);
        }
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    /// Config pointing at an arbitrary LMS root, used by tests and tooling.
    pub fn for_base_url(lms_base_url: impl Into<String>, lms_token: impl Into<String>) -> Self {
        Self {
            port: 0,
            lms_base_url: lms_base_url.into(),
            lms_token: lms_token.into(),
            lp_version: DEFAULT_API_VERSION.to_string(),
            le_version: DEFAULT_API_VERSION.to_string(),
            fetch_concurrency: 1,
            lms_timeout_secs: None,
        }
    }
}

fn validate_base_url(url: String) -> anyhow::Result<String> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("LMS_BASE_URL must start with http:// or https://");
    }
    Ok(url.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_with_only_token() {
        let config = config_from(&[("LMS_API_TOKEN", "secret")]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.lms_base_url, DEFAULT_LMS_BASE_URL);
        assert_eq!(config.lms_token, "secret");
        assert_eq!(config.lp_version, "1.43");
        assert_eq!(config.le_version, "1.43");
        assert_eq!(config.fetch_concurrency, 1);
        assert!(config.lms_timeout_secs.is_none());
    }

    #[test]
    fn test_all_variables_set() {
        let config = config_from(&[
            ("LMS_API_TOKEN", "secret"),
            ("LMS_BASE_URL", "https://lms.example.com/d2l/api/"),
            ("LMS_LP_VERSION", "1.40"),
            ("LMS_LE_VERSION", "1.41"),
            ("PORT", "8080"),
            ("FETCH_CONCURRENCY", "4"),
            ("LMS_TIMEOUT_SECS", " 15 "),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.lms_base_url, "https://lms.example.com/d2l/api");
        assert_eq!(config.lp_version, "1.40");
        assert_eq!(config.le_version, "1.41");
        assert_eq!(config.fetch_concurrency, 4);
        assert_eq!(config.lms_timeout_secs, Some(15));
    }

    #[test]
    fn test_token_required() {
        assert!(config_from(&[]).is_err());
        assert!(config_from(&[("LMS_API_TOKEN", "  ")]).is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let token = ("LMS_API_TOKEN", "secret");
        assert!(config_from(&[token, ("PORT", "http")]).is_err());
        assert!(config_from(&[token, ("FETCH_CONCURRENCY", "0")]).is_err());
        assert!(config_from(&[token, ("FETCH_CONCURRENCY", "-2")]).is_err());
        assert!(config_from(&[token, ("LMS_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config_from(&[token, ("LMS_BASE_URL", "lms.example.com")]).is_err());
    }

    #[test]
    fn test_blank_optionals_fall_back() {
        let config = config_from(&[
            ("LMS_API_TOKEN", "secret"),
            ("LMS_BASE_URL", " "),
            ("LMS_LP_VERSION", ""),
            ("LMS_TIMEOUT_SECS", ""),
        ])
        .unwrap();
        assert_eq!(config.lms_base_url, DEFAULT_LMS_BASE_URL);
        assert_eq!(config.lp_version, "1.43");
        assert!(config.lms_timeout_secs.is_none());
    }

    #[test]
    fn test_base_url_validation() {
        assert!(validate_base_url("ftp://lms.example.com".to_string()).is_err());
        assert_eq!(
            validate_base_url("https://lms.example.com/d2l/api/".to_string()).unwrap(),
            "https://lms.example.com/d2l/api"
        );
    }

    #[test]
    fn test_for_base_url_defaults() {
        let config = Config::for_base_url("http://127.0.0.1:9999", "token");
        assert_eq!(config.lp_version, "1.43");
        assert_eq!(config.le_version, "1.43");
        assert_eq!(config.fetch_concurrency, 1);
        assert!(config.lms_timeout_secs.is_none());
    }
}
