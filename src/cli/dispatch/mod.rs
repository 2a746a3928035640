//! Command-line argument dispatch.
//!
//! Maps validated CLI arguments to the action the binary executes: either
//! starting the API server or hashing an administrator password.

use crate::cli::actions::{Action, hash_password, server::Args};
use crate::cli::commands::{password, server};
use anyhow::{Context, Result};

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    if let Some(sub_m) = matches.subcommand_matches(password::SUBCOMMAND) {
        let cost = sub_m
            .get_one::<u32>(password::ARG_COST)
            .copied()
            .context("missing required argument: --cost")?;
        return Ok(Action::HashPassword(hash_password::Args { cost }));
    }

    let opts = server::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port: opts.port,
        dsn: opts.dsn,
        cors_origin: opts.cors_origin,
        cookie_secret: opts.cookie_secret,
        cookie_secure: opts.cookie_secure,
        slider_dir: opts.slider_dir,
        max_upload_bytes: opts.max_upload_bytes,
        db_max_connections: opts.db_max_connections,
        db_acquire_timeout_seconds: opts.db_acquire_timeout_seconds,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_password_subcommand_maps_to_action() {
        temp_env::with_vars([("SHOWROOM_BCRYPT_COST", None::<&str>)], || {
            let matches =
                crate::cli::commands::new().get_matches_from(vec!["showroom", "hash-password"]);
            let action = handler(&matches);
            assert!(matches!(
                action,
                Ok(Action::HashPassword(hash_password::Args { cost: 10 }))
            ));
        });
    }

    #[test]
    fn server_action_requires_long_secret() {
        temp_env::with_vars(
            [
                ("SHOWROOM_DSN", Some("postgres://user@localhost:5432/showroom")),
                ("SHOWROOM_CORS_ORIGIN", Some("https://example.com")),
                ("SHOWROOM_COOKIE_SECRET", Some("too-short")),
            ],
            || {
                let matches = crate::cli::commands::new().get_matches_from(vec!["showroom"]);
                let result = handler(&matches);
                assert!(result.is_err());
                if let Err(err) = result {
                    assert!(err.to_string().contains("--cookie-secret"));
                }
            },
        );
    }

    #[test]
    fn server_action_from_env() {
        temp_env::with_vars(
            [
                ("SHOWROOM_DSN", Some("postgres://user@localhost:5432/showroom")),
                ("SHOWROOM_CORS_ORIGIN", Some("https://example.com")),
                (
                    "SHOWROOM_COOKIE_SECRET",
                    Some("an-admin-cookie-secret-of-enough-length"),
                ),
                ("SHOWROOM_PORT", Some("9090")),
            ],
            || {
                let matches = crate::cli::commands::new().get_matches_from(vec!["showroom"]);
                match handler(&matches) {
                    Ok(Action::Server(args)) => {
                        assert_eq!(args.port, 9090);
                        assert_eq!(args.cors_origin, "https://example.com");
                    }
                    other => panic!("unexpected action: {other:?}"),
                }
            },
        );
    }
}
