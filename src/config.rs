use anyhow::{Context, Result};
use clap::Parser;
use std::{env, str::FromStr};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_upload_bytes: usize,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Missing-persons registry API")]
pub struct Args {
    /// Host to bind to (overrides REGISTRY_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides REGISTRY_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides REGISTRY_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Maximum request body size in bytes (overrides REGISTRY_MAX_UPLOAD_BYTES)
    #[arg(long)]
    pub max_upload_bytes: Option<usize>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        let args = Args::parse();
        let migrate = args.migrate;
        let cfg = Self::merge(args, |key| env::var(key).ok())?;
        Ok((cfg, migrate))
    }

    /// CLI values win; otherwise the environment; otherwise defaults.
    pub fn merge(args: Args, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env_host = lookup("REGISTRY_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let env_port = parse_or(&lookup, "REGISTRY_PORT", 3000)?;
        let env_db = lookup("REGISTRY_DATABASE_URL")
            .unwrap_or_else(|| "sqlite://./data/registry.db".into());
        let env_limit = parse_or(&lookup, "REGISTRY_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;

        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            database_url: args.database_url.unwrap_or(env_db),
            max_upload_bytes: args.max_upload_bytes.unwrap_or(env_limit),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value
            .parse::<T>()
            .with_context(|| format!("parsing {} value `{}`", key, value)),
        None => Ok(default),
    }
}
