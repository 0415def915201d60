use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tax_core::db::DbConfig;

/// Municipal tax rate service.
#[derive(Parser, Debug, Clone)]
#[command(name = "municipal-tax-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Storage backend (memory or sqlite)
    #[arg(long, env = "TAX_DB_BACKEND", default_value = "memory")]
    pub backend: String,

    /// Database location: a file path, a sqlx URL, or :memory:
    #[arg(long = "db", env = "TAX_DB_URL", default_value = ":memory:")]
    pub database: String,

    /// Address to bind
    #[arg(long, env = "TAX_API_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Seed SQL directory, applied after migrations (sqlite only)
    #[arg(long, env = "TAX_DB_SEEDS_DIR")]
    pub seeds: Option<PathBuf>,
}

impl Cli {
    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            backend: self.backend.clone(),
            connection_string: self.database.clone(),
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn host_defaults_to_all_interfaces() {
        let cli = Cli::try_parse_from(["municipal-tax-api"]).unwrap();

        assert_eq!(cli.host, "0.0.0.0");
        assert!(cli.bind_addr().is_ok());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "municipal-tax-api",
            "--backend",
            "sqlite",
            "--db",
            "taxes.db",
            "--host",
            "127.0.0.1",
            "--port",
            "9000",
            "--seeds",
            "seeds",
        ])
        .unwrap();

        assert_eq!(cli.db_config().backend, "sqlite");
        assert_eq!(cli.db_config().connection_string, "taxes.db");
        assert_eq!(cli.bind_addr().unwrap(), "127.0.0.1:9000".parse().unwrap());
        assert_eq!(cli.seeds, Some(PathBuf::from("seeds")));
    }

    #[test]
    fn bad_host_is_reported() {
        let cli = Cli::try_parse_from(["municipal-tax-api", "--host", "not a host"]).unwrap();

        assert!(cli.bind_addr().is_err());
    }
}
