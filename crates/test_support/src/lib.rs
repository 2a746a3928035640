//! Throwaway Postgres containers for database-backed tests.
//!
//! Tests call [`runtime::ensure_container_runtime`] (or [`postgres::PostgresContainer::start`],
//! which calls it) and skip themselves when it fails, so the suite still passes on
//! machines without Docker or Podman.

pub mod postgres;
pub mod runtime;

use uuid::Uuid;

/// A uniquely named container network, so parallel tests never share containers.
#[derive(Debug, Clone)]
pub struct TestNetwork {
    name: String,
}

impl TestNetwork {
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            name: unique_name(prefix),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

pub(crate) fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}
