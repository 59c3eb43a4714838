use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            jwt_secret: env::var("MEDITRUST_JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("MEDITRUST_JWT_SECRET not set, using empty value");
                    String::new()
                }),
            bind_addr: env::var("MEDITRUST_BIND_ADDR")
                .unwrap_or_else(|_| {
                    warn!("MEDITRUST_BIND_ADDR not set, using default");
                    "0.0.0.0:3000".to_string()
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.jwt_secret.is_empty()
    }
}
