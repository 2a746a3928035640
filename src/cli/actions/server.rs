use crate::api::{self, ServerConfig};
use anyhow::Result;
use secrecy::SecretString;
use std::{path::PathBuf, time::Duration};
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub cors_origin: String,
    pub cookie_secret: SecretString,
    pub cookie_secure: bool,
    pub slider_dir: String,
    pub max_upload_bytes: usize,
    pub db_max_connections: u32,
    pub db_acquire_timeout_seconds: u64,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database is unreachable or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    debug!(
        port = args.port,
        cors_origin = %args.cors_origin,
        slider_dir = %args.slider_dir,
        "starting server"
    );

    let config = ServerConfig {
        port: args.port,
        dsn: args.dsn,
        cors_origin: args.cors_origin,
        cookie_secret: args.cookie_secret,
        cookie_secure: args.cookie_secure,
        slider_dir: PathBuf::from(args.slider_dir),
        max_upload_bytes: args.max_upload_bytes,
        db_max_connections: args.db_max_connections,
        db_acquire_timeout: Duration::from_secs(args.db_acquire_timeout_seconds),
    };

    api::new(config).await
}
