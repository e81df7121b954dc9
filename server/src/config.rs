use anyhow::{Context, Result, bail};
use platform_authn::AuthConfig;
use platform_db::DatabaseSettings;

const DEV_SECRET: &str = "dev-secret";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub auth: AuthConfig,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Read configuration from the environment. Outside dev mode the token
    /// signing secret must be provided explicitly.
    pub fn load(dev: bool) -> Result<Self> {
        let database = DatabaseSettings::from_env().context("invalid database settings")?;

        let jwt_secret = match std::env::var("AUTH_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if dev => DEV_SECRET.to_string(),
            _ => bail!("AUTH_SECRET must be set (or run with --dev)"),
        };
        let token_ttl_minutes = match std::env::var("TOKEN_TTL_MINUTES") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .with_context(|| format!("invalid TOKEN_TTL_MINUTES: {raw}"))?,
            Err(_) => 60,
        };

        let cors_allowed_origins = parse_origins(
            &std::env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
        );

        Ok(Self {
            database,
            auth: AuthConfig::new(jwt_secret, token_ttl_minutes),
            cors_allowed_origins,
        })
    }

    /// Configuration for in-process use, e.g. tests.
    pub fn for_database(database: DatabaseSettings, jwt_secret: impl Into<String>) -> Self {
        Self {
            database,
            auth: AuthConfig::new(jwt_secret, 60),
            cors_allowed_origins: Vec::new(),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}
