//! Mock client for testing.
//!
//! This client keeps entries in memory, records every call it receives and
//! can be told to fail any operation, so code driving a [`TpmClient`] can be
//! tested without a TeamPasswordManager installation.

use crate::client::{ClientResult, TpmClient};
use crate::config::ConnectionParams;
use crate::entry::{CreatedEntry, Entry, EntryFields, EntryId, EntryRef, GeneratedPassword};
use crate::error::ClientError;
use crate::factory::ClientFactory;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct MockState {
    entries: BTreeMap<u64, Entry>,
    next_id: u64,

    searches: Vec<String>,
    creates: Vec<EntryFields>,
    updates: Vec<(EntryId, EntryFields)>,
    generated: Vec<String>,

    search_error: Option<ClientError>,
    get_error: Option<ClientError>,
    create_error: Option<ClientError>,
    update_error: Option<ClientError>,
    generate_error: Option<ClientError>,
}

/// In-memory TeamPasswordManager stand-in.
///
/// Clones share the same storage, so a test can keep one handle for
/// assertions while the lookup owns another.
///
/// Search understands the exact-match form `name:[X]`; any other query
/// matches entries whose name contains it, ignoring case.
///
/// # Example
///
/// ```
/// use tpmstore::backends::mock::MockClient;
/// use tpmstore::{ClientError, TpmClient};
///
/// #[tokio::main]
/// async fn main() {
///     let mock = MockClient::new();
///     mock.add_entry("db-root", &[("password", "s3cret")]).await;
///
///     let found = mock.search_entries("name:[db-root]").await.unwrap();
///     assert_eq!(found.len(), 1);
///
///     mock.set_get_error(Some(ClientError::Api("Entry is locked".into()))).await;
///     assert!(mock.get_entry(&found[0].id).await.is_err());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    state: Arc<RwLock<MockState>>,
}

impl MockClient {
    /// Creates an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates an entry and returns its identifier.
    pub async fn add_entry(&self, name: &str, fields: &[(&str, &str)]) -> EntryId {
        let mut state = self.state.write().await;
        state.next_id += 1;
        let id = state.next_id;

        let mut entry = Entry::default();
        entry.insert("id", json!(id));
        entry.insert("name", json!(name));
        for (key, value) in fields {
            entry.insert(*key, json!(value));
        }
        entry.insert("created_on", json!(Utc::now().to_rfc3339()));

        state.entries.insert(id, entry);
        EntryId::from(id)
    }

    /// Returns a stored entry.
    pub async fn entry(&self, id: &EntryId) -> Option<Entry> {
        let state = self.state.read().await;
        numeric(id).and_then(|n| state.entries.get(&n).cloned())
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    /// Whether nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }

    /// Queries received by `search_entries`, in order.
    pub async fn searches(&self) -> Vec<String> {
        self.state.read().await.searches.clone()
    }

    /// Payloads received by `create_entry`, in order.
    pub async fn creates(&self) -> Vec<EntryFields> {
        self.state.read().await.creates.clone()
    }

    /// Identifiers and payloads received by `update_entry`, in order.
    pub async fn updates(&self) -> Vec<(EntryId, EntryFields)> {
        self.state.read().await.updates.clone()
    }

    /// Passwords handed out by `generate_password`, in order.
    pub async fn generated(&self) -> Vec<String> {
        self.state.read().await.generated.clone()
    }

    /// Makes `search_entries` fail.
    pub async fn set_search_error(&self, err: Option<ClientError>) {
        self.state.write().await.search_error = err;
    }

    /// Makes `get_entry` fail.
    pub async fn set_get_error(&self, err: Option<ClientError>) {
        self.state.write().await.get_error = err;
    }

    /// Makes `create_entry` fail.
    pub async fn set_create_error(&self, err: Option<ClientError>) {
        self.state.write().await.create_error = err;
    }

    /// Makes `update_entry` fail.
    pub async fn set_update_error(&self, err: Option<ClientError>) {
        self.state.write().await.update_error = err;
    }

    /// Makes `generate_password` fail.
    pub async fn set_generate_error(&self, err: Option<ClientError>) {
        self.state.write().await.generate_error = err;
    }

    /// Returns a factory handing out this mock.
    pub fn factory(&self) -> MockFactory {
        MockFactory {
            client: self.clone(),
            connect_error: None,
            connections: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

fn numeric(id: &EntryId) -> Option<u64> {
    id.as_str().parse().ok()
}

fn matches_query(entry: &Entry, query: &str) -> bool {
    let name = entry.name().unwrap_or_default();
    match query
        .strip_prefix("name:[")
        .and_then(|rest| rest.strip_suffix(']'))
    {
        Some(exact) => name == exact,
        None => name.to_lowercase().contains(&query.to_lowercase()),
    }
}

fn apply_fields(entry: &mut Entry, fields: &EntryFields) {
    for (field, value) in fields.iter() {
        entry.insert(field.as_str(), Value::String(value.to_string()));
    }
}

#[async_trait]
impl TpmClient for MockClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search_entries(&self, query: &str) -> ClientResult<Vec<EntryRef>> {
        let mut state = self.state.write().await;
        state.searches.push(query.to_string());

        if let Some(ref err) = state.search_error {
            return Err(err.clone());
        }

        Ok(state
            .entries
            .iter()
            .filter(|(_, entry)| matches_query(entry, query))
            .map(|(id, _)| EntryRef::new(*id))
            .collect())
    }

    async fn get_entry(&self, id: &EntryId) -> ClientResult<Entry> {
        let state = self.state.read().await;

        if let Some(ref err) = state.get_error {
            return Err(err.clone());
        }

        numeric(id)
            .and_then(|n| state.entries.get(&n).cloned())
            .ok_or_else(|| ClientError::Api(format!("Password not found: {}", id)))
    }

    async fn create_entry(&self, fields: &EntryFields) -> ClientResult<CreatedEntry> {
        let mut state = self.state.write().await;
        state.creates.push(fields.clone());

        if let Some(ref err) = state.create_error {
            return Err(err.clone());
        }

        state.next_id += 1;
        let id = state.next_id;

        let mut entry = Entry::default();
        entry.insert("id", json!(id));
        apply_fields(&mut entry, fields);
        entry.insert("created_on", json!(Utc::now().to_rfc3339()));
        state.entries.insert(id, entry);

        Ok(CreatedEntry {
            id: EntryId::from(id),
        })
    }

    async fn update_entry(&self, id: &EntryId, fields: &EntryFields) -> ClientResult<()> {
        let mut state = self.state.write().await;
        state.updates.push((id.clone(), fields.clone()));

        if let Some(ref err) = state.update_error {
            return Err(err.clone());
        }

        let entry = numeric(id)
            .and_then(|n| state.entries.get_mut(&n))
            .ok_or_else(|| ClientError::Api(format!("Password not found: {}", id)))?;

        apply_fields(entry, fields);
        entry.insert("updated_on", json!(Utc::now().to_rfc3339()));
        Ok(())
    }

    async fn generate_password(&self) -> ClientResult<GeneratedPassword> {
        let mut state = self.state.write().await;

        if let Some(ref err) = state.generate_error {
            return Err(err.clone());
        }

        let password = uuid::Uuid::new_v4().simple().to_string();
        state.generated.push(password.clone());
        Ok(GeneratedPassword { password })
    }
}

/// Factory handing out clones of one [`MockClient`].
///
/// Records the connection parameters of every `connect` call and can be
/// told to fail instead.
#[derive(Debug, Clone)]
pub struct MockFactory {
    client: MockClient,
    connect_error: Option<ClientError>,
    connections: Arc<Mutex<Vec<ConnectionParams>>>,
}

impl MockFactory {
    /// Makes every `connect` call fail with `err`.
    pub fn with_connect_error(mut self, err: ClientError) -> Self {
        self.connect_error = Some(err);
        self
    }

    /// Connection parameters received so far.
    pub fn connections(&self) -> Vec<ConnectionParams> {
        match self.connections.lock() {
            Ok(conns) => conns.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ClientFactory for MockFactory {
    fn connect(&self, conn: &ConnectionParams) -> ClientResult<Box<dyn TpmClient>> {
        if let Ok(mut conns) = self.connections.lock() {
            conns.push(conn.clone());
        }

        if let Some(ref err) = self.connect_error {
            return Err(err.clone());
        }

        Ok(Box::new(self.client.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryField;

    #[tokio::test]
    async fn test_exact_and_fuzzy_search() {
        let mock = MockClient::new();
        mock.add_entry("db-root", &[]).await;
        mock.add_entry("db-root-replica", &[]).await;

        let exact = mock.search_entries("name:[db-root]").await.unwrap();
        assert_eq!(exact.len(), 1);

        let fuzzy = mock.search_entries("DB-ROOT").await.unwrap();
        assert_eq!(fuzzy.len(), 2);

        assert_eq!(mock.searches().await, vec!["name:[db-root]", "DB-ROOT"]);
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let mock = MockClient::new();
        let fields = EntryFields::new()
            .with(EntryField::Name, "web")
            .with(EntryField::Password, "pw")
            .with(EntryField::ProjectId, "4");

        let created = mock.create_entry(&fields).await.unwrap();
        let entry = mock.get_entry(&created.id).await.unwrap();

        assert_eq!(entry.field("password").as_deref(), Some("pw"));
        assert_eq!(entry.field("project_id").as_deref(), Some("4"));
        assert_eq!(mock.creates().await, vec![fields]);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let mock = MockClient::new();
        let id = mock.add_entry("web", &[("password", "old"), ("notes", "keep")]).await;

        let fields = EntryFields::new().with(EntryField::Password, "new");
        mock.update_entry(&id, &fields).await.unwrap();

        let entry = mock.entry(&id).await.unwrap();
        assert_eq!(entry.field("password").as_deref(), Some("new"));
        assert_eq!(entry.field("notes").as_deref(), Some("keep"));
        assert!(entry.field("updated_on").is_some());
    }

    #[tokio::test]
    async fn test_update_unknown_entry() {
        let mock = MockClient::new();
        let result = mock.update_entry(&EntryId::from(99), &EntryFields::new()).await;
        assert!(matches!(result, Err(ClientError::Api(_))));
    }

    #[tokio::test]
    async fn test_generated_passwords_are_unique() {
        let mock = MockClient::new();
        let a = mock.generate_password().await.unwrap();
        let b = mock.generate_password().await.unwrap();
        assert_ne!(a.password, b.password);
        assert_eq!(mock.generated().await.len(), 2);
    }

    #[tokio::test]
    async fn test_error_injection() {
        let mock = MockClient::new();
        mock.set_search_error(Some(ClientError::Connection("down".into())))
            .await;

        let result = mock.search_entries("x").await;
        assert_eq!(result.unwrap_err(), ClientError::Connection("down".into()));

        mock.set_search_error(None).await;
        assert!(mock.search_entries("x").await.is_ok());
    }

    #[test]
    fn test_factory_records_connections() {
        let factory = MockClient::new().factory();
        let conn = ConnectionParams::new("https://tpm", "u", "p").with_unlock_reason("audit");

        assert!(factory.connect(&conn).is_ok());
        assert_eq!(factory.connections(), vec![conn.clone()]);

        let failing = factory.with_connect_error(ClientError::Config("bad url".into()));
        assert!(failing.connect(&conn).is_err());
    }
}
