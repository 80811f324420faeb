//! Search, create, update and read of a single entry.
//!
//! [`execute`] runs one lookup against a freshly built client:
//!
//! | matches | `create` | outcome |
//! |---------|----------|---------|
//! | 0 | false | [`TpmStoreError::NotFound`] |
//! | 0 | true | entry created, password returned |
//! | 1 | false | requested field returned |
//! | 1 | true | entry updated, password returned |
//! | >1 | any | [`TpmStoreError::AmbiguousMatch`] |
//!
//! Search and the following create or update are separate calls, so two
//! concurrent lookups creating the same name may both see zero matches.

use crate::client::TpmClient;
use crate::config::ConnectionParams;
use crate::entry::{EntryField, EntryFields, EntryRef};
use crate::error::ClientError;
use crate::factory::ClientFactory;
use crate::notify::Notifier;
use crate::request::{parse_terms, LookupRequest};
use crate::{Result, TpmStoreError};
use tracing::{debug, instrument};

/// Parses `terms` and executes the lookup.
///
/// # Example
///
/// ```
/// use tpmstore::backends::mock::MockClient;
/// use tpmstore::notify::SilentNotifier;
/// use tpmstore::{lookup, ClientError, ConnectionParams, TpmClient};
///
/// #[tokio::main]
/// async fn main() -> tpmstore::Result<()> {
///     let mock = MockClient::new();
///     mock.add_entry("db-root", &[("password", "s3cret")]).await;
///
///     let factory = move |_: &ConnectionParams| -> Result<Box<dyn TpmClient>, ClientError> {
///         Ok(Box::new(mock.clone()))
///     };
///
///     let terms: Vec<String> = ["https://tpm.example.com", "user", "pass", "name=db-root"]
///         .iter()
///         .map(|s| s.to_string())
///         .collect();
///
///     let result = lookup::run(&terms, &factory, &SilentNotifier).await?;
///     assert_eq!(result, vec!["s3cret".to_string()]);
///     Ok(())
/// }
/// ```
pub async fn run(
    terms: &[String],
    factory: &dyn ClientFactory,
    notifier: &dyn Notifier,
) -> Result<Vec<String>> {
    let (conn, req) = parse_terms(terms)?;
    execute(&conn, &req, factory, notifier).await
}

/// Executes a lookup.
///
/// The request is checked before any client is built: a request with
/// neither a name nor a search query fails without touching the service.
///
/// # Errors
///
/// - [`TpmStoreError::Validation`]: no name or search query, malformed URL,
///   or `project_id` missing when a new entry has to be created
/// - [`TpmStoreError::NotFound`]: no match and `create` is false, or the
///   requested field does not exist on the matched entry
/// - [`TpmStoreError::AmbiguousMatch`]: more than one match
/// - [`TpmStoreError::Remote`]: any client failure, message unchanged
#[instrument(skip_all, fields(url = %conn.display_url(), create = req.create))]
pub async fn execute(
    conn: &ConnectionParams,
    req: &LookupRequest,
    factory: &dyn ClientFactory,
    notifier: &dyn Notifier,
) -> Result<Vec<String>> {
    let query = req.search_expression()?;

    let client = factory
        .connect(conn)
        .map_err(|e| classify(e, &conn.url))?;

    debug!(client = client.name(), %query, "searching entries");
    let matches = client
        .search_entries(&query)
        .await
        .map_err(|e| classify(e, &conn.url))?;
    debug!(count = matches.len(), "search finished");

    match (matches.as_slice(), req.create) {
        ([], false) => Err(TpmStoreError::NotFound(format!(
            "Found no match for: {}",
            req.label()
        ))),
        ([], true) => create(client.as_ref(), req, notifier).await,
        ([found], true) => update(client.as_ref(), found, req, notifier).await,
        ([found], false) => read(client.as_ref(), found, req).await,
        (_, _) => Err(TpmStoreError::AmbiguousMatch(format!(
            "Found more then one match for the entry, please be more specific: {}",
            req.label()
        ))),
    }
}

async fn create(
    client: &dyn TpmClient,
    req: &LookupRequest,
    notifier: &dyn Notifier,
) -> Result<Vec<String>> {
    notifier.notice(&format!("No entry found, will create: {}", req.label()));

    if req.project_id().is_none() {
        return Err(TpmStoreError::Validation(
            "To create a complete new entry, project_id is mandatory.".to_string(),
        ));
    }

    let (fields, password) = resolve_password(client, req).await?;

    let created = client.create_entry(&fields).await?;
    notifier.notice(&format!("Created new entry with ID: {}", created.id));

    Ok(vec![password])
}

async fn update(
    client: &dyn TpmClient,
    found: &EntryRef,
    req: &LookupRequest,
    notifier: &dyn Notifier,
) -> Result<Vec<String>> {
    let entry = client.get_entry(&found.id).await?;
    notifier.notice(&format!(
        "Will update entry \"{}\" with ID \"{}\"",
        entry.name().unwrap_or_default(),
        found.id
    ));

    let (fields, password) = resolve_password(client, req).await?;

    client.update_entry(&found.id, &fields).await?;

    Ok(vec![password])
}

async fn read(client: &dyn TpmClient, found: &EntryRef, req: &LookupRequest) -> Result<Vec<String>> {
    let entry = client.get_entry(&found.id).await?;

    let value = entry.field(&req.return_value).ok_or_else(|| {
        TpmStoreError::NotFound(format!(
            "Entry \"{}\" has no field: {}",
            entry.name().unwrap_or_else(|| req.label().to_string()),
            req.return_value
        ))
    })?;

    Ok(vec![value])
}

/// Returns the payload to send and the password to hand back.
///
/// A `random` password is replaced by one generated by the service. The
/// returned password is the locally held value, never read back from the
/// stored entry.
async fn resolve_password(
    client: &dyn TpmClient,
    req: &LookupRequest,
) -> Result<(EntryFields, String)> {
    let mut fields = req.entry_fields.clone();

    if req.wants_random_password() {
        let generated = client.generate_password().await?;
        fields.set(EntryField::Password, generated.password);
    }

    let password = fields
        .get(EntryField::Password)
        .unwrap_or_default()
        .to_string();

    Ok((fields, password))
}

fn classify(err: ClientError, url: &str) -> TpmStoreError {
    match err {
        ClientError::Config(_) => TpmStoreError::Validation(format!(
            "First argument has to be a valid URL to TeamPasswordManager API: {}",
            url
        )),
        other => other.into(),
    }
}
