use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Which persistence backend holds user progress records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressBackend {
    Memory,
    File,
    Postgres,
}

impl ProgressBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressBackend::Memory => "memory",
            ProgressBackend::File => "file",
            ProgressBackend::Postgres => "postgres",
        }
    }
}

impl FromStr for ProgressBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(ProgressBackend::Memory),
            "file" => Ok(ProgressBackend::File),
            "postgres" | "postgresql" => Ok(ProgressBackend::Postgres),
            other => bail!("Unknown PROGRESS_BACKEND '{other}' (expected memory, file or postgres)"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable required by the selected backend is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: ProgressBackend,
    pub progress_file: PathBuf,
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let backend = optional_env("PROGRESS_BACKEND")
            .map(|v| v.parse::<ProgressBackend>())
            .transpose()?
            .unwrap_or(ProgressBackend::Memory);

        let database_url = match backend {
            ProgressBackend::Postgres => Some(require_env("DATABASE_URL")?),
            _ => optional_env("DATABASE_URL"),
        };

        Ok(Config {
            backend,
            progress_file: optional_env("PROGRESS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/progress.json")),
            database_url,
            port: optional_env("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
