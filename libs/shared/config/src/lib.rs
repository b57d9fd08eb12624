use std::env;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub jwt_secret: String,
    pub environment: String,
    pub database_url: String,
    pub database_api_key: String,
    pub cors_origins: Vec<String>,
    /// When set, a rejected trainer application no longer blocks a new one
    /// from the same email.
    pub trainer_reapply_after_rejection: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            jwt_secret: String::new(),
            environment: "development".to_string(),
            database_url: String::new(),
            database_api_key: String::new(),
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            trainer_reapply_after_rejection: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            port: env::var("PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            jwt_secret: env::var("SECRET")
                .unwrap_or_else(|_| {
                    warn!("SECRET not set, using empty value");
                    String::new()
                }),
            environment: env::var("NODE_ENV")
                .unwrap_or_else(|_| "development".to_string()),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("DATABASE_URL not set, falling back to the in-memory store");
                    String::new()
                }),
            database_api_key: env::var("DATABASE_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("DATABASE_API_KEY not set, using empty value");
                    String::new()
                }),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| parse_origins(&origins))
                .unwrap_or_else(|_| vec![DEFAULT_CORS_ORIGIN.to_string()]),
            trainer_reapply_after_rejection: env::var("TRAINER_REAPPLY_AFTER_REJECTION")
                .map(|flag| parse_flag(&flag))
                .unwrap_or(false),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.jwt_secret.is_empty() && self.has_database()
    }

    pub fn has_database(&self) -> bool {
        !self.database_url.is_empty()
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}
