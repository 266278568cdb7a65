use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

/// Uptick watch registry server
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(long, env = "UPTICK_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    #[arg(long, env = "UPTICK_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Path of the watch database, created if missing
    #[arg(long, env = "UPTICK_DATABASE", default_value = "watches.db")]
    pub database: PathBuf,

    /// Maximum number of pooled database connections
    #[arg(long, env = "UPTICK_POOL_SIZE", default_value_t = 8)]
    pub pool_size: usize,

    /// Comma separated browser origins allowed to call the API
    #[arg(
        long,
        env = "UPTICK_CORS_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:5173,http://127.0.0.1:5173"
    )]
    pub cors_origins: Vec<String>,
}

impl ServerArgs {
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.bind.parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Configured origins with blanks dropped, so an empty variable allows none
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_origins
            .iter()
            .map(|origin| origin.trim())
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }
}
