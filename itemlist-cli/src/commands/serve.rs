//! HTTP server command for the item list API
//!
//! Resolves store and listener settings from flags, environment and `.env`,
//! opens the pool, then runs the server until shutdown.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use sqlx::postgres::PgSslMode;

use itemlist_server::db::pool::{DEFAULT_MAX_CONNECTIONS, DEFAULT_PG_PORT};
use itemlist_server::{create_pool, run_server, ConnectionTarget, DatabaseConfig, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Interface to bind to
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// PostgreSQL connection string (takes precedence over DB_* settings)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Database host, used when no connection string is given
    #[arg(long, env = "DB_HOST")]
    pub db_host: Option<String>,

    /// Database port
    #[arg(long, env = "DB_PORT", default_value_t = DEFAULT_PG_PORT)]
    pub db_port: u16,

    /// Database user
    #[arg(long, env = "DB_USER")]
    pub db_user: Option<String>,

    /// Database password
    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// Database name
    #[arg(long, env = "DB_NAME")]
    pub db_name: Option<String>,

    /// TLS mode for the store connection (disable, prefer, require, ...)
    ///
    /// `require` encrypts without verifying the server certificate.
    #[arg(long, env = "DB_SSL_MODE")]
    pub db_ssl_mode: Option<PgSslMode>,

    /// Maximum pooled store connections (1 = single shared connection)
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Directory of static files served for unmatched GET paths
    #[arg(long, env = "PUBLIC_DIR", default_value = "public")]
    pub public_dir: PathBuf,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ServeArgs {
    /// Store settings: connection string first, then discrete DB_* parts.
    pub fn database_config(&self) -> Result<DatabaseConfig> {
        let target = if let Some(url) = non_empty(&self.database_url) {
            ConnectionTarget::Url(url.to_string())
        } else if let Some(host) = non_empty(&self.db_host) {
            ConnectionTarget::Parts {
                host: host.to_string(),
                port: self.db_port,
                user: non_empty(&self.db_user).map(str::to_string),
                password: self.db_password.clone(),
                database: non_empty(&self.db_name).map(str::to_string),
            }
        } else {
            bail!(
                "database not configured. Set --database-url / DATABASE_URL, \
                 or DB_HOST (with DB_USER, DB_PASSWORD, DB_NAME), in the environment or ./.env"
            );
        };

        Ok(DatabaseConfig {
            target,
            ssl_mode: self.db_ssl_mode,
            max_connections: self.max_connections,
        })
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: SocketAddr::new(self.host, self.port),
            cors_permissive: self.cors_permissive,
            public_dir: Some(self.public_dir.clone()),
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let db_config = args.database_config()?;
    let config = args.server_config();

    tracing::info!(
        store = ?db_config.target,
        max_connections = db_config.max_connections,
        "Connecting to database"
    );

    let pool = create_pool(&db_config)
        .await
        .context("Failed to connect to database")?;

    // Run server (blocks until shutdown, closes the pool on the way out)
    run_server(pool, config).await.context("Server error")?;

    Ok(())
}
