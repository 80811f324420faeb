//! HTTP client implementation.

use super::wire::{entry_payload, error_message};
use crate::client::{ClientResult, TpmClient};
use crate::config::{ClientOptions, ConnectionParams};
use crate::entry::{CreatedEntry, Entry, EntryFields, EntryId, EntryRef, GeneratedPassword};
use crate::error::ClientError;
use crate::factory::ClientFactory;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Number of results the v4 API returns per search page.
pub const PAGE_SIZE: usize = 20;

const UNLOCK_REASON_HEADER: &str = "X-Unlock-Reason";
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Derives the API root from an installation URL.
///
/// The URL must be absolute with an `http` or `https` scheme and a host.
/// Query and fragment are dropped; `index.php/api/v4/` is appended unless
/// the path already ends in `index.php`.
///
/// ```
/// use tpmstore::backends::tpm::api_root;
///
/// let root = api_root("https://tpm.example.com/tpm/").unwrap();
/// assert_eq!(root.as_str(), "https://tpm.example.com/tpm/index.php/api/v4/");
///
/// assert!(api_root("ftp://foo.bar").is_err());
/// ```
///
/// # Errors
///
/// Returns [`ClientError::Config`] for anything else.
pub fn api_root(url: &str) -> ClientResult<Url> {
    let mut parsed = Url::parse(url)
        .map_err(|e| ClientError::Config(format!("invalid API URL {}: {}", url, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(ClientError::Config(format!(
            "API URL must use http or https: {}",
            url
        )));
    }

    let base = parsed.path().trim_end_matches('/').to_string();
    let path = if base.ends_with("/index.php") {
        format!("{}/api/v4/", base)
    } else {
        format!("{}/index.php/api/v4/", base)
    };

    parsed.set_path(&path);
    parsed.set_query(None);
    parsed.set_fragment(None);
    Ok(parsed)
}

/// Client for the TeamPasswordManager v4 API.
///
/// Each instance holds its own connection pool and is meant to live for
/// one lookup.
#[derive(Clone)]
pub struct TpmApiV4 {
    http: Client,
    root: Url,
    username: String,
    password: String,
    unlock_reason: Option<String>,
}

impl TpmApiV4 {
    /// Creates a client for the given installation.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Config`]: the URL is not a usable API URL
    /// - [`ClientError::Connection`]: the HTTP client could not be built
    pub fn new(conn: &ConnectionParams, options: &ClientOptions) -> ClientResult<Self> {
        let root = api_root(&conn.url)?;

        let http = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.as_str())
            .build()
            .map_err(|e| ClientError::Connection(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            root,
            username: conn.username.clone(),
            password: conn.password.clone(),
            unlock_reason: conn.unlock_reason.clone(),
        })
    }

    /// Returns the API root requests are made against.
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// Builds an endpoint URL from path segments, percent-encoding each.
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.root.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("not a base URL: {}", self.root)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends one request and returns the decoded body, if any.
    async fn send(&self, method: Method, url: Url, body: Option<Value>) -> ClientResult<Option<Value>> {
        debug!(%method, path = url.path(), "TeamPasswordManager request");

        let mut request = self
            .http
            .request(method, url.clone())
            .basic_auth(&self.username, Some(&self.password))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE);

        if let Some(ref reason) = self.unlock_reason {
            request = request.header(UNLOCK_REASON_HEADER, reason.as_str());
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_builder() {
                ClientError::Api(format!("Invalid request for {}: {}", url, e))
            } else {
                ClientError::Connection(format!("Connection error for {}: {}", url, e))
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Connection(format!("Connection error for {}: {}", url, e)))?;

        if !status.is_success() {
            debug!(%status, "TeamPasswordManager rejected request");
            return Err(ClientError::Api(
                error_message(&text).unwrap_or_else(|| format!("{} {}: {}", status, url, text.trim())),
            ));
        }

        if text.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&text)?))
    }

    async fn fetch<T: DeserializeOwned>(&self, method: Method, url: Url, body: Option<Value>) -> ClientResult<T> {
        let value = self
            .send(method, url, body)
            .await?
            .ok_or_else(|| ClientError::Decode("Empty response from TeamPasswordManager API".to_string()))?;
        Ok(serde_json::from_value(value)?)
    }
}

impl std::fmt::Debug for TpmApiV4 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TpmApiV4")
            .field("root", &self.root.as_str())
            .field("username", &self.username)
            .field("unlock_reason", &self.unlock_reason)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TpmClient for TpmApiV4 {
    fn name(&self) -> &str {
        "tpm-v4"
    }

    async fn search_entries(&self, query: &str) -> ClientResult<Vec<EntryRef>> {
        let mut found = Vec::new();
        let mut page = 1usize;

        loop {
            let page_file = format!("{}.json", page);
            let url = self.endpoint(&["passwords", "search", query, "page", &page_file])?;
            let batch: Vec<EntryRef> = self.fetch(Method::GET, url, None).await?;

            let last = batch.len() < PAGE_SIZE;
            found.extend(batch);
            if last {
                break;
            }
            page += 1;
        }

        Ok(found)
    }

    async fn get_entry(&self, id: &EntryId) -> ClientResult<Entry> {
        let url = self.endpoint(&["passwords", &format!("{}.json", id)])?;
        self.fetch(Method::GET, url, None).await
    }

    async fn create_entry(&self, fields: &EntryFields) -> ClientResult<CreatedEntry> {
        let url = self.endpoint(&["passwords.json"])?;
        self.fetch(Method::POST, url, Some(entry_payload(fields))).await
    }

    async fn update_entry(&self, id: &EntryId, fields: &EntryFields) -> ClientResult<()> {
        let url = self.endpoint(&["passwords", &format!("{}.json", id)])?;
        self.send(Method::PUT, url, Some(entry_payload(fields))).await?;
        Ok(())
    }

    async fn generate_password(&self) -> ClientResult<GeneratedPassword> {
        let url = self.endpoint(&["generate_password.json"])?;
        self.fetch(Method::GET, url, None).await
    }
}

/// Factory building a [`TpmApiV4`] per lookup.
#[derive(Debug, Clone, Default)]
pub struct TpmFactory {
    options: ClientOptions,
}

impl TpmFactory {
    /// Creates a factory with the given client options.
    pub fn new(options: ClientOptions) -> Self {
        Self { options }
    }
}

impl ClientFactory for TpmFactory {
    fn connect(&self, conn: &ConnectionParams) -> ClientResult<Box<dyn TpmClient>> {
        Ok(Box::new(TpmApiV4::new(conn, &self.options)?))
    }
}
