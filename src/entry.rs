//! Entry data structures exchanged with the remote service.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Opaque identifier of a stored entry.
///
/// The v4 API uses integers; anything else the service might hand back is
/// kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(String);

impl EntryId {
    /// Creates an identifier from its textual form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for EntryId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for EntryId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.parse::<u64>() {
            Ok(n) => serializer.serialize_u64(n),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for EntryId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Num(u64),
            Str(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Num(n) => Self(n.to_string()),
            RawId::Str(s) => Self(s),
        })
    }
}

/// A persistable entry attribute.
///
/// Only these keys ever reach a create or update call; parser bookkeeping
/// such as `create` or `reason` has no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryField {
    /// Entry name
    Name,
    /// Secret value
    Password,
    /// Login name stored in the entry
    Username,
    /// Where the credential is used (e.g. `ssh://root@host`)
    AccessInfo,
    /// Comma separated tags
    Tags,
    /// Contact e-mail
    Email,
    /// ISO 8601 expiry date
    ExpiryDate,
    /// Free text notes
    Notes,
    /// Project the entry belongs to
    ProjectId,
}

impl EntryField {
    /// All persistable fields, in wire order.
    pub const ALL: [EntryField; 9] = [
        Self::Name,
        Self::Password,
        Self::Username,
        Self::AccessInfo,
        Self::Tags,
        Self::Email,
        Self::ExpiryDate,
        Self::Notes,
        Self::ProjectId,
    ];

    /// Returns the API key of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Password => "password",
            Self::Username => "username",
            Self::AccessInfo => "access_info",
            Self::Tags => "tags",
            Self::Email => "email",
            Self::ExpiryDate => "expiry_date",
            Self::Notes => "notes",
            Self::ProjectId => "project_id",
        }
    }

    /// Looks up a field by its API key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == key)
    }
}

impl std::fmt::Display for EntryField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied attributes forwarded verbatim to create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFields(BTreeMap<EntryField, String>);

impl EntryFields {
    /// Creates an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing any previous value.
    pub fn set(&mut self, field: EntryField, value: impl Into<String>) {
        self.0.insert(field, value.into());
    }

    /// Builder form of [`EntryFields::set`].
    pub fn with(mut self, field: EntryField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Returns a field value.
    pub fn get(&self, field: EntryField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Checks whether a field was supplied.
    pub fn contains(&self, field: EntryField) -> bool {
        self.0.contains_key(&field)
    }

    /// Iterates over the supplied fields in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (EntryField, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Number of supplied fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for EntryFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(k, v)| (k.as_str(), v)))
    }
}

/// Summary of a search hit.
///
/// Only the identifier is used; the remaining attributes are kept as the
/// service sent them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRef {
    /// Identifier of the matched entry
    pub id: EntryId,

    /// Everything else the search returned
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl EntryRef {
    /// Creates a reference carrying only an identifier.
    pub fn new(id: impl Into<EntryId>) -> Self {
        Self {
            id: id.into(),
            attributes: Map::new(),
        }
    }
}

/// Full detail of a stored entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entry(Map<String, Value>);

impl Entry {
    /// Wraps a JSON object.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Returns the entry identifier, if present.
    pub fn id(&self) -> Option<EntryId> {
        self.0
            .get("id")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Returns the entry name, if present.
    pub fn name(&self) -> Option<String> {
        self.field("name")
    }

    /// Projects one field to text.
    ///
    /// Strings are returned verbatim, `null` as the empty string, and any
    /// other JSON value in its compact JSON form. Returns `None` when the
    /// entry has no such field.
    ///
    /// ```
    /// use tpmstore::Entry;
    /// use serde_json::json;
    ///
    /// let entry: Entry = serde_json::from_value(json!({
    ///     "id": 42, "username": "root", "notes": null
    /// })).unwrap();
    /// assert_eq!(entry.field("username").as_deref(), Some("root"));
    /// assert_eq!(entry.field("id").as_deref(), Some("42"));
    /// assert_eq!(entry.field("notes").as_deref(), Some(""));
    /// assert_eq!(entry.field("email"), None);
    /// ```
    pub fn field(&self, name: &str) -> Option<String> {
        self.0.get(name).map(|value| match value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        })
    }

    /// Sets a raw field value.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    /// Borrows the underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Response to a create call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedEntry {
    /// Identifier assigned by the service
    pub id: EntryId,
}

/// Response to a password generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPassword {
    /// The freshly generated password
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_id_accepts_numbers_and_strings() {
        let a: EntryId = serde_json::from_value(json!(42)).unwrap();
        let b: EntryId = serde_json::from_value(json!("42")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "42");
        assert_eq!(serde_json::to_value(&a).unwrap(), json!(42));
        assert_eq!(serde_json::to_value(EntryId::new("abc")).unwrap(), json!("abc"));
    }

    #[test]
    fn test_entry_field_keys() {
        for field in EntryField::ALL {
            assert_eq!(EntryField::from_key(field.as_str()), Some(field));
        }
        assert_eq!(EntryField::from_key("create"), None);
        assert_eq!(EntryField::from_key("reason"), None);
        assert_eq!(EntryField::AccessInfo.to_string(), "access_info");
    }

    #[test]
    fn test_entry_fields_serialize_as_object() {
        let fields = EntryFields::new()
            .with(EntryField::Name, "db")
            .with(EntryField::ProjectId, "4")
            .with(EntryField::Password, "pw");

        assert_eq!(
            serde_json::to_value(&fields).unwrap(),
            json!({"name": "db", "password": "pw", "project_id": "4"})
        );
        assert_eq!(fields.len(), 3);
        assert!(fields.contains(EntryField::ProjectId));
        assert!(!fields.contains(EntryField::Notes));
    }

    #[test]
    fn test_entry_ref_keeps_extra_attributes() {
        let r: EntryRef =
            serde_json::from_value(json!({"id": 7, "name": "db", "locked": false})).unwrap();
        assert_eq!(r.id, EntryId::from(7));
        assert_eq!(r.attributes.get("name"), Some(&json!("db")));
    }

    #[test]
    fn test_entry_projection() {
        let entry: Entry = serde_json::from_value(json!({
            "id": 3,
            "name": "db",
            "project": {"id": 4, "name": "infra"},
            "locked": true
        }))
        .unwrap();

        assert_eq!(entry.id(), Some(EntryId::from(3)));
        assert_eq!(entry.name().as_deref(), Some("db"));
        assert_eq!(entry.field("locked").as_deref(), Some("true"));
        assert_eq!(
            entry.field("project").as_deref(),
            Some(r#"{"id":4,"name":"infra"}"#)
        );
    }
}
