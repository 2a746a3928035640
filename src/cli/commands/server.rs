use anyhow::{Context, Result, anyhow};
use clap::{Arg, ArgAction, Command};
use secrecy::SecretString;

pub const ARG_PORT: &str = "port";
pub const ARG_DSN: &str = "dsn";
pub const ARG_CORS_ORIGIN: &str = "cors-origin";
pub const ARG_COOKIE_SECRET: &str = "cookie-secret";
pub const ARG_COOKIE_SECURE: &str = "cookie-secure";
pub const ARG_SLIDER_DIR: &str = "slider-dir";
pub const ARG_MAX_UPLOAD_BYTES: &str = "max-upload-bytes";
pub const ARG_DB_MAX_CONNECTIONS: &str = "db-max-connections";
pub const ARG_DB_ACQUIRE_TIMEOUT: &str = "db-acquire-timeout";

/// HMAC keys shorter than this are rejected at startup.
pub const MIN_COOKIE_SECRET_LEN: usize = 32;

#[must_use]
pub fn with_args(command: Command) -> Command {
    let command = with_http_args(command);
    let command = with_session_args(command);
    with_database_args(command)
}

fn with_http_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("SHOWROOM_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_CORS_ORIGIN)
                .long("cors-origin")
                .help("Single origin allowed to call the API with credentials, example: https://example.com")
                .env("SHOWROOM_CORS_ORIGIN")
                .required(true),
        )
        .arg(
            Arg::new(ARG_SLIDER_DIR)
                .long("slider-dir")
                .help("Directory holding slider images")
                .env("SHOWROOM_SLIDER_DIR")
                .default_value("SliderImages"),
        )
        .arg(
            Arg::new(ARG_MAX_UPLOAD_BYTES)
                .long("max-upload-bytes")
                .help("Maximum request body size for image uploads")
                .env("SHOWROOM_MAX_UPLOAD_BYTES")
                .default_value("10485760")
                .value_parser(clap::value_parser!(usize)),
        )
}

fn with_session_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_COOKIE_SECRET)
                .long("cookie-secret")
                .help("Secret used to sign the session cookie (at least 32 bytes)")
                .env("SHOWROOM_COOKIE_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_COOKIE_SECURE)
                .long("cookie-secure")
                .help("Mark the session cookie as Secure (serve over HTTPS)")
                .env("SHOWROOM_COOKIE_SECURE")
                .action(ArgAction::SetTrue),
        )
}

fn with_database_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_DSN)
                .short('d')
                .long("dsn")
                .help("Database connection string")
                .env("SHOWROOM_DSN")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_DB_MAX_CONNECTIONS)
                .long("db-max-connections")
                .help("Maximum number of pooled database connections")
                .env("SHOWROOM_DB_MAX_CONNECTIONS")
                .default_value("5")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new(ARG_DB_ACQUIRE_TIMEOUT)
                .long("db-acquire-timeout")
                .help("Seconds to wait for a database connection before failing the request")
                .env("SHOWROOM_DB_ACQUIRE_TIMEOUT")
                .default_value("5")
                .value_parser(clap::value_parser!(u64)),
        )
}

/// Validated server options.
pub struct Options {
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

impl Options {
    /// Parse server options from matches.
    ///
    /// # Errors
    /// Returns an error if a required argument is missing or the cookie secret is too short.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let dsn = matches
            .get_one::<String>(ARG_DSN)
            .cloned()
            .context("missing required argument: --dsn")?;
        let cors_origin = matches
            .get_one::<String>(ARG_CORS_ORIGIN)
            .cloned()
            .context("missing required argument: --cors-origin")?;
        let cookie_secret = matches
            .get_one::<String>(ARG_COOKIE_SECRET)
            .cloned()
            .context("missing required argument: --cookie-secret")?;

        if cookie_secret.len() < MIN_COOKIE_SECRET_LEN {
            return Err(anyhow!(
                "--cookie-secret must be at least {MIN_COOKIE_SECRET_LEN} bytes long"
            ));
        }

        Ok(Self {
            port: matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080),
            dsn,
            cors_origin,
            cookie_secret: SecretString::from(cookie_secret),
            cookie_secure: matches.get_flag(ARG_COOKIE_SECURE),
            slider_dir: matches
                .get_one::<String>(ARG_SLIDER_DIR)
                .cloned()
                .unwrap_or_else(|| "SliderImages".to_string()),
            max_upload_bytes: matches
                .get_one::<usize>(ARG_MAX_UPLOAD_BYTES)
                .copied()
                .unwrap_or(10 * 1024 * 1024),
            db_max_connections: matches
                .get_one::<u32>(ARG_DB_MAX_CONNECTIONS)
                .copied()
                .unwrap_or(5),
            db_acquire_timeout_seconds: matches
                .get_one::<u64>(ARG_DB_ACQUIRE_TIMEOUT)
                .copied()
                .unwrap_or(5),
        })
    }
}
