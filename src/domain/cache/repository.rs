//! Cache trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Raw key/value cache backend
///
/// Values are opaque JSON strings. A missing key is `Ok(None)`, never an error,
/// so callers can tell a miss apart from a transport failure.
#[async_trait]
pub trait Cache: Send + Sync + Debug {
    /// Gets a raw value from the cache
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Upserts a raw value as a single atomic write
    async fn set_raw(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Deletes a value, returning whether the key existed
    async fn delete(&self, key: &str) -> Result<bool, DomainError>;

    /// Drops every entry owned by this cache
    async fn clear(&self) -> Result<(), DomainError>;

    /// Round-trips to the backend without touching data
    async fn ping(&self) -> Result<(), DomainError>;
}
