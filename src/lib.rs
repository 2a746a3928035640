//! # Showroom (site administration backend)
//!
//! `showroom` serves the public data of a business showcase website (contacts,
//! settings, price lists, slider images) and lets a single administrator edit it.
//!
//! ## Authentication
//!
//! The administrator is provisioned out of band: `showroom hash-password` prints a
//! `bcrypt` digest that is inserted into the `users` table by hand. `POST /login`
//! verifies the password and sets the `userLogin` cookie, a stateless session token
//! signed with HMAC-SHA256 that expires one hour after issuance. There is no server
//! side session store and no revocation; expiry is the only way a session ends.
//!
//! ## Site data
//!
//! Contacts and settings are fixed key/value rows edited as a group inside a single
//! database transaction. Materials and services are independent catalog rows edited
//! one statement at a time; updates and deletes that match no row return `404`.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
