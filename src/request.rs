//! Parsing of lookup terms into a structured request.
//!
//! A lookup arrives as a flat list of strings: three positional connection
//! terms followed by `key=value` pairs.
//!
//! ```
//! use tpmstore::request::parse_terms;
//!
//! let terms: Vec<String> = [
//!     "https://tpm.example.com", "ansible", "s3cret",
//!     "name=db-root", "return_value=username", "reason=deploy",
//! ]
//! .iter()
//! .map(|s| s.to_string())
//! .collect();
//!
//! let (conn, req) = parse_terms(&terms)?;
//! assert_eq!(conn.unlock_reason.as_deref(), Some("deploy"));
//! assert_eq!(req.search_expression()?, "name:[db-root]");
//! assert_eq!(req.return_value, "username");
//! # Ok::<(), tpmstore::TpmStoreError>(())
//! ```

use crate::config::ConnectionParams;
use crate::entry::{EntryField, EntryFields};
use crate::validation::{
    missing_target, parse_create_flag, require_target, split_term, validate_term_count,
};
use crate::Result;
use tracing::debug;

/// Field returned when the caller does not ask for another one.
pub const DEFAULT_RETURN_VALUE: &str = "password";

/// Password value asking for a generated password.
pub const RANDOM_PASSWORD: &str = "random";

/// A lookup request.
///
/// The entry name and project live in [`entry_fields`](Self::entry_fields)
/// alongside the other attributes; [`name`](Self::name) and
/// [`project_id`](Self::project_id) read them from there.
///
/// ```
/// use tpmstore::{EntryField, LookupRequest};
///
/// let req = LookupRequest::for_name("web")
///     .with_create(true)
///     .with_field(EntryField::ProjectId, "4");
/// assert_eq!(req.search_expression()?, "name:[web]");
/// assert_eq!(req.project_id(), Some("4"));
///
/// assert!(LookupRequest::default().search_expression().is_err());
/// # Ok::<(), tpmstore::TpmStoreError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    /// Raw search query, used verbatim when set
    pub search: Option<String>,
    /// Field to return from a plain lookup
    pub return_value: String,
    /// Whether to create or update the entry
    pub create: bool,
    /// Attributes forwarded to create and update, including name and project
    pub entry_fields: EntryFields,
}

impl Default for LookupRequest {
    fn default() -> Self {
        Self {
            search: None,
            return_value: DEFAULT_RETURN_VALUE.to_string(),
            create: false,
            entry_fields: EntryFields::new(),
        }
    }
}

impl LookupRequest {
    /// Parses the full term list and returns the request part.
    ///
    /// See [`parse_terms`] for the rules.
    pub fn parse(terms: &[String]) -> Result<Self> {
        parse_terms(terms).map(|(_, req)| req)
    }

    /// Creates a request for the entry with this exact name.
    pub fn for_name(name: impl Into<String>) -> Self {
        Self::default().with_field(EntryField::Name, name)
    }

    /// Creates a request for a raw search query.
    pub fn for_search(query: impl Into<String>) -> Self {
        Self {
            search: Some(query.into()),
            ..Self::default()
        }
    }

    /// Sets one entry attribute.
    pub fn with_field(mut self, field: EntryField, value: impl Into<String>) -> Self {
        self.entry_fields.set(field, value);
        self
    }

    /// Sets whether the entry is created or updated.
    pub fn with_create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    /// Sets the field returned by a plain lookup.
    pub fn with_return_value(mut self, field: impl Into<String>) -> Self {
        self.return_value = field.into();
        self
    }

    /// Returns the single search expression sent to the service.
    ///
    /// A raw `search=` query wins; otherwise an exact-match query is built
    /// from the name.
    ///
    /// # Errors
    ///
    /// Returns [`TpmStoreError::Validation`](crate::TpmStoreError::Validation)
    /// when neither a name nor a search query is set.
    pub fn search_expression(&self) -> Result<String> {
        match (self.search.as_deref(), self.name()) {
            (Some(search), _) => Ok(search.to_string()),
            (None, Some(name)) => Ok(format!("name:[{}]", name)),
            (None, None) => Err(missing_target()),
        }
    }

    /// Returns the label used in messages: the name, or the raw search.
    pub fn label(&self) -> &str {
        self.name()
            .or(self.search.as_deref())
            .unwrap_or_default()
    }

    /// Exact name of the target entry, if any.
    pub fn name(&self) -> Option<&str> {
        self.entry_fields.get(EntryField::Name)
    }

    /// Project for newly created entries, if any.
    pub fn project_id(&self) -> Option<&str> {
        self.entry_fields.get(EntryField::ProjectId)
    }

    /// Caller-supplied password, if any.
    pub fn password(&self) -> Option<&str> {
        self.entry_fields.get(EntryField::Password)
    }

    /// Caller-supplied username, if any.
    pub fn username(&self) -> Option<&str> {
        self.entry_fields.get(EntryField::Username)
    }

    /// Caller-supplied access info, if any.
    pub fn access_info(&self) -> Option<&str> {
        self.entry_fields.get(EntryField::AccessInfo)
    }

    /// Caller-supplied tags, if any.
    pub fn tags(&self) -> Option<&str> {
        self.entry_fields.get(EntryField::Tags)
    }

    /// Caller-supplied e-mail, if any.
    pub fn email(&self) -> Option<&str> {
        self.entry_fields.get(EntryField::Email)
    }

    /// Caller-supplied expiry date, if any.
    pub fn expiry_date(&self) -> Option<&str> {
        self.entry_fields.get(EntryField::ExpiryDate)
    }

    /// Caller-supplied notes, if any.
    pub fn notes(&self) -> Option<&str> {
        self.entry_fields.get(EntryField::Notes)
    }

    /// Whether the caller asked for a generated password.
    pub fn wants_random_password(&self) -> bool {
        self.password() == Some(RANDOM_PASSWORD)
    }
}

/// Parses lookup terms into connection parameters and a request.
///
/// - At least four terms are required.
/// - Terms one to three are the API URL, user and password.
/// - Every later term without `=` is ignored; the others are split on the
///   first `=`. Unknown keys are ignored. A repeated key overwrites the
///   earlier value.
/// - `create` accepts only `True` or `False`.
/// - `name` or `search` must be present.
///
/// # Errors
///
/// Returns [`TpmStoreError::Validation`](crate::TpmStoreError::Validation)
/// with the caller-facing message.
pub fn parse_terms(terms: &[String]) -> Result<(ConnectionParams, LookupRequest)> {
    validate_term_count(terms)?;

    let (positional, rest) = terms.split_at(3);
    let mut conn = ConnectionParams::new(&positional[0], &positional[1], &positional[2]);
    let mut req = LookupRequest::default();

    for term in rest {
        let Some((key, value)) = split_term(term) else {
            debug!("ignoring term without '='");
            continue;
        };

        match key {
            "create" => req.create = parse_create_flag(value)?,
            "search" => req.search = Some(value.to_string()),
            "return_value" => req.return_value = value.to_string(),
            "reason" => conn.unlock_reason = Some(value.to_string()),
            _ => match EntryField::from_key(key) {
                Some(field) => req.entry_fields.set(field, value),
                None => debug!(key, "ignoring unknown term"),
            },
        }
    }

    require_target(req.name(), req.search.as_deref())?;

    Ok((conn, req))
}
