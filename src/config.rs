use actix_web::cookie::SameSite;
use std::env;
use std::fmt;

/// Process-wide settings, loaded once at startup and read-only afterwards.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub allowed_origins: Vec<String>,
    pub server_port: u16,
    pub server_host: String,
    pub cookie_same_site: SameSite,
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid(key, value) => write!(f, "{} has an invalid value: {}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("jwt_secret", &"<redacted>")
            .field("allowed_origins", &self.allowed_origins)
            .field("server_port", &self.server_port)
            .field("server_host", &self.server_host)
            .field("cookie_same_site", &self.cookie_same_site)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::Invalid("JWT_SECRET", "empty".into()));
        }

        let port = env::var("PORT").unwrap_or_else(|_| "3005".to_string());
        let server_port = port
            .parse()
            .map_err(|_| ConfigError::Invalid("PORT", port.clone()))?;

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let same_site = env::var("COOKIE_SAME_SITE").unwrap_or_else(|_| "strict".to_string());
        let cookie_same_site = parse_same_site(&same_site)
            .ok_or_else(|| ConfigError::Invalid("COOKIE_SAME_SITE", same_site.clone()))?;

        Ok(Self {
            database_url,
            jwt_secret,
            allowed_origins,
            server_port,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            cookie_same_site,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_same_site(value: &str) -> Option<SameSite> {
    match value.to_ascii_lowercase().as_str() {
        "strict" => Some(SameSite::Strict),
        "lax" => Some(SameSite::Lax),
        "none" => Some(SameSite::None),
        _ => None,
    }
}
