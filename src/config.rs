use anyhow::Context;
use reqwest::Url;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Outbound onboarding webhook. A missing URL is a per-request error, not a boot failure.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub onboarding_url: Option<Url>,
    pub timeout_secs: u64,
}

/// Cross-origin policy applied to the API and announced by the relay.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allow_origin: String,
    pub allow_methods: String,
    pub allow_headers: String,
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: "*".into(),
            allow_methods: "GET, POST, PUT, DELETE, OPTIONS".into(),
            allow_headers: "Content-Type, Authorization".into(),
            max_age_secs: 86_400,
        }
    }
}

impl CorsConfig {
    /// `None` allows any origin; otherwise the comma-separated allow-list.
    pub fn origins(&self) -> Option<Vec<&str>> {
        let raw = self.allow_origin.trim();
        if raw == "*" {
            return None;
        }
        Some(
            raw.split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .collect(),
        )
    }

    /// Value for `Access-Control-Allow-Origin` on a response to `request_origin`.
    ///
    /// A single configured origin is always announced. With several, only a
    /// listed request origin is echoed back; `None` means the header is omitted.
    pub fn allow_origin_for<'a>(&'a self, request_origin: Option<&'a str>) -> Option<&'a str> {
        match self.origins() {
            None => Some("*"),
            Some(list) if list.len() == 1 => Some(list[0]),
            Some(list) => request_origin.filter(|o| list.contains(o)),
        }
    }

    /// Whether responses depend on the request's `Origin` header.
    pub fn varies_by_origin(&self) -> bool {
        self.origins().is_some_and(|list| list.len() > 1)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub webhook: WebhookConfig,
    pub cors: CorsConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "mealmind".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "mealmind-users".into()),
            ttl_minutes: env_parse("JWT_TTL_MINUTES").unwrap_or(60),
        };

        let onboarding_url = match std::env::var("N8N_ONBOARDING_WEBHOOK_URL") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                Url::parse(raw.trim()).context("N8N_ONBOARDING_WEBHOOK_URL is not a valid URL")?,
            ),
            _ => None,
        };
        if onboarding_url.is_none() {
            tracing::warn!("N8N_ONBOARDING_WEBHOOK_URL is not set; onboarding relay will answer 500");
        }
        let webhook = WebhookConfig {
            onboarding_url,
            timeout_secs: env_parse("WEBHOOK_TIMEOUT_SECS").unwrap_or(10),
        };

        let defaults = CorsConfig::default();
        let cors = CorsConfig {
            allow_origin: std::env::var("CORS_ALLOW_ORIGIN").unwrap_or(defaults.allow_origin),
            allow_methods: std::env::var("CORS_ALLOW_METHODS").unwrap_or(defaults.allow_methods),
            allow_headers: std::env::var("CORS_ALLOW_HEADERS").unwrap_or(defaults.allow_headers),
            max_age_secs: env_parse("CORS_MAX_AGE_SECS").unwrap_or(defaults.max_age_secs),
        };

        Ok(Self {
            database_url,
            jwt,
            webhook,
            cors,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}
