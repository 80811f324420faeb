//! Remote client trait for TeamPasswordManager access.
//!
//! This module defines the [`TpmClient`] trait the lookup layer drives. The
//! trait covers exactly the calls a lookup needs: search, read, create,
//! update and password generation.

use crate::entry::{CreatedEntry, Entry, EntryFields, EntryId, EntryRef, GeneratedPassword};
use crate::error::ClientError;
use async_trait::async_trait;

/// Result type for client calls.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// An authenticated session with a TeamPasswordManager installation.
///
/// # Implementations
///
/// - [`TpmApiV4`](crate::backends::tpm::TpmApiV4): HTTP client for the v4 API
/// - [`MockClient`](crate::backends::mock::MockClient): in-memory store with
///   error injection
///
/// Every method may fail with a [`ClientError`] whose message is meant for
/// humans; the lookup layer forwards it unchanged.
#[async_trait]
pub trait TpmClient: Send + Sync {
    /// Returns the client name (e.g., "tpm-v4", "mock").
    fn name(&self) -> &str;

    /// Searches entries with the service's query syntax.
    ///
    /// `name:[db]` restricts the search to entries named exactly `db`.
    async fn search_entries(&self, query: &str) -> ClientResult<Vec<EntryRef>>;

    /// Fetches the full detail of one entry.
    async fn get_entry(&self, id: &EntryId) -> ClientResult<Entry>;

    /// Creates a new entry from the given fields.
    async fn create_entry(&self, fields: &EntryFields) -> ClientResult<CreatedEntry>;

    /// Overwrites the given fields of an existing entry.
    async fn update_entry(&self, id: &EntryId, fields: &EntryFields) -> ClientResult<()>;

    /// Asks the service for a new random password.
    async fn generate_password(&self) -> ClientResult<GeneratedPassword>;
}
