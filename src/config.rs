use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub email: EmailConfig,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_env")]
    pub env: String,

    #[serde(default = "default_app_host")]
    pub host: String,

    #[serde(default = "default_app_port")]
    pub port: u16,

    /// Public base URL of the deployment, used in outbound email links.
    #[serde(default = "default_app_url")]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub uri: String,

    #[serde(default = "default_db_name")]
    pub db_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,

    #[serde(default = "default_jwt_token_ttl")]
    pub token_ttl_secs: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub smtp_username: String,

    #[serde(default)]
    pub smtp_password: String,

    #[serde(default = "default_smtp_from")]
    pub smtp_from: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_rate_limit_max_requests")]
    pub max_requests: u32,

    #[serde(default = "default_rate_limit_window_secs")]
    pub window_secs: u64,
}

// Default value functions
fn default_app_env() -> String {
    "development".to_string()
}

fn default_app_host() -> String {
    "0.0.0.0".to_string()
}

fn default_app_port() -> u16 {
    8080
}

fn default_app_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_db_name() -> String {
    "blog".to_string()
}

fn default_jwt_token_ttl() -> i64 {
    365 * 24 * 3600 // 365 days
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_smtp_from() -> String {
    "noreply@blogservice.dev".to_string()
}

fn default_rate_limit_max_requests() -> u32 {
    200
}

fn default_rate_limit_window_secs() -> u64 {
    900 // 15 minutes
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenv::dotenv().ok();

        let app = AppConfig {
            env: env::var("APP_ENV").unwrap_or_else(|_| default_app_env()),
            host: env::var("APP_HOST").unwrap_or_else(|_| default_app_host()),
            port: env::var("APP_PORT")
                .unwrap_or_else(|_| default_app_port().to_string())
                .parse()
                .unwrap_or(default_app_port()),
            url: env::var("APP_URL").unwrap_or_else(|_| default_app_url()),
        };

        let database = DatabaseConfig {
            uri: env::var("MONGO_URI").expect("MONGO_URI must be set"),
            db_name: env::var("MONGO_DB").unwrap_or_else(|_| default_db_name()),
        };

        let jwt = JwtConfig {
            secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            token_ttl_secs: env::var("JWT_TOKEN_TTL_SECS")
                .unwrap_or_else(|_| default_jwt_token_ttl().to_string())
                .parse()
                .unwrap_or(default_jwt_token_ttl()),
        };

        let email = EmailConfig {
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| default_smtp_host()),
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| default_smtp_port().to_string())
                .parse()
                .unwrap_or(default_smtp_port()),
            smtp_username: env::var("SMTP_USERNAME").unwrap_or_default(),
            smtp_password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            smtp_from: env::var("SMTP_FROM").unwrap_or_else(|_| default_smtp_from()),
        };

        let rate_limit = RateLimitConfig {
            max_requests: env::var("RATE_LIMIT_MAX_REQUESTS")
                .unwrap_or_else(|_| default_rate_limit_max_requests().to_string())
                .parse()
                .unwrap_or(default_rate_limit_max_requests()),
            window_secs: env::var("RATE_LIMIT_WINDOW_SECS")
                .unwrap_or_else(|_| default_rate_limit_window_secs().to_string())
                .parse()
                .unwrap_or(default_rate_limit_window_secs()),
        };

        Ok(Config {
            app,
            database,
            jwt,
            email,
            rate_limit,
        })
    }

    pub fn is_production(&self) -> bool {
        self.app.env == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        assert_eq!(default_app_env(), "development");
        assert_eq!(default_app_host(), "0.0.0.0");
        assert_eq!(default_app_port(), 8080);
        assert_eq!(default_db_name(), "blog");
        assert_eq!(default_jwt_token_ttl(), 31_536_000);
        assert_eq!(default_rate_limit_max_requests(), 200);
        assert_eq!(default_rate_limit_window_secs(), 900);
    }
}
