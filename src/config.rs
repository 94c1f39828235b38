//! Environment-backed configuration options.
//!
//! Everything the pipeline needs from the environment is declared here as clap
//! option structs and flattened into each subcommand, so configuration is read
//! exactly once at startup and passed by reference from then on. No component
//! performs its own environment lookup.

use clap::Parser;

/// Acelerato API credentials (HTTP basic auth)
#[derive(Parser, Clone, Debug)]
pub struct ApiOpts {
    /// Operator e-mail used as the basic-auth username
    #[arg(long, env = "API_EMAIL")]
    pub api_email: String,

    /// Operator token used as the basic-auth password
    #[arg(long, env = "API_TOKEN", hide_env_values = true)]
    pub api_token: String,
}

/// MySQL store connection options
#[derive(Parser, Clone, Debug)]
pub struct StoreOpts {
    /// MySQL host
    #[arg(long, env = "DB_HOST")]
    pub db_host: String,

    /// MySQL port
    #[arg(long, env = "DB_PORT", default_value = "3306")]
    pub db_port: u16,

    /// MySQL user
    #[arg(long, env = "DB_USER")]
    pub db_user: String,

    /// MySQL password
    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: String,

    /// Target database name
    #[arg(long, env = "DB_NAME")]
    pub db_name: String,
}
