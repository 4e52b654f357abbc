use anyhow::{anyhow, Result};
use dotenvy::dotenv;
use secrecy::Secret;
use serde::Deserialize;
use std::env;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub service_name: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    pub db_name: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct JwtConfig {
    pub secret: Secret<String>,
    pub access_token_expiry_minutes: i64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct StorageConfig {
    /// Directory report PDFs are written to; also served at `/uploads`.
    pub upload_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let host = env::var("PLANTATION_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PLANTATION_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()?;

        let db_url = env::var("PLANTATION_DATABASE_URL")
            .map_err(|_| anyhow!("PLANTATION_DATABASE_URL must be set"))?;
        let db_name =
            env::var("PLANTATION_DATABASE_NAME").unwrap_or_else(|_| "plantation_db".to_string());

        let jwt_secret =
            env::var("PLANTATION_JWT_SECRET").unwrap_or_else(|_| "dev-secret".to_string());
        let jwt_expiry_minutes = env::var("PLANTATION_JWT_EXPIRY_MINUTES")
            .unwrap_or_else(|_| "60".to_string())
            .parse()?;

        let upload_dir =
            env::var("PLANTATION_UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());

        Ok(Self {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: Secret::new(db_url),
                db_name,
            },
            jwt: JwtConfig {
                secret: Secret::new(jwt_secret),
                access_token_expiry_minutes: jwt_expiry_minutes,
            },
            storage: StorageConfig { upload_dir },
            service_name: "plantation-service".to_string(),
        })
    }
}
