use clap::{Arg, Command};

pub const SUBCOMMAND: &str = "hash-password";
pub const ARG_COST: &str = "cost";

/// Subcommand used to provision the administrator password digest.
#[must_use]
pub fn command() -> Command {
    Command::new(SUBCOMMAND)
        .about("Hash an administrator password for the users table")
        .long_about(
            "Reads the password from SHOWROOM_ADMIN_PASSWORD or, when unset, from the first line of stdin, and prints the bcrypt digest.",
        )
        .arg(
            Arg::new(ARG_COST)
                .long("cost")
                .help("bcrypt cost factor (4-31)")
                .env("SHOWROOM_BCRYPT_COST")
                .default_value("10")
                .value_parser(clap::value_parser!(u32).range(4..=31)),
        )
}
