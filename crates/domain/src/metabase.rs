//! Snapshots of Metabase objects as returned by its REST API.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize};

/// Metabase database identifier.
///
/// Metabase returns numeric ids while the permission graph keys them as
/// strings, so both forms normalize to the decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatabaseId(#[serde(deserialize_with = "string_or_number")] String);

impl DatabaseId {
    /// Creates a database identifier from its string form.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<u64> for DatabaseId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl Display for DatabaseId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Database connected to Metabase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    /// Remote identifier.
    pub id: DatabaseId,
    /// Display name.
    pub name: String,
}

/// Native query permission level reported for a (group, database) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativePermission {
    /// The group may write native queries.
    Write,
    /// The provider reported no native permission.
    None,
    /// Any other provider value. Never treated as write.
    Unspecified(String),
}

impl NativePermission {
    /// Classifies a provider value. Matching is exact and case-sensitive.
    #[must_use]
    pub fn from_provider(value: &str) -> Self {
        match value {
            "write" => Self::Write,
            "" => Self::None,
            other => Self::Unspecified(other.to_owned()),
        }
    }

    /// Returns true only for the exact `write` level.
    #[must_use]
    pub fn allows_write(&self) -> bool {
        matches!(self, Self::Write)
    }
}

/// Data-access details of one permission graph entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataAccessDetails {
    /// Raw native permission value.
    #[serde(rename = "native", default, deserialize_with = "string_or_null")]
    pub native_permission: String,
}

impl DataAccessDetails {
    /// Creates access details carrying the given native permission value.
    #[must_use]
    pub fn with_native(native_permission: impl Into<String>) -> Self {
        Self {
            native_permission: native_permission.into(),
        }
    }

    /// Returns the classified native permission.
    #[must_use]
    pub fn native(&self) -> NativePermission {
        NativePermission::from_provider(self.native_permission.as_str())
    }
}

/// Permission graph entry for one (group, database) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPermission {
    /// Data-access details.
    #[serde(default)]
    pub data: DataAccessDetails,
}

impl GroupPermission {
    /// Creates an entry with the given native permission value.
    #[must_use]
    pub fn native(native_permission: impl Into<String>) -> Self {
        Self {
            data: DataAccessDetails::with_native(native_permission),
        }
    }
}

/// Metabase user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetabaseUser {
    /// Remote identifier.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Login email.
    #[serde(default)]
    pub email: Option<String>,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Whether the account is currently enabled.
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(value) => value.to_string(),
        RawId::Text(value) => value,
    })
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::{Database, GroupPermission, MetabaseUser, NativePermission};

    #[test]
    fn native_permission_is_case_sensitive() {
        assert!(NativePermission::from_provider("write").allows_write());
        assert!(!NativePermission::from_provider("WRITE").allows_write());
        assert!(!NativePermission::from_provider("").allows_write());
        assert_eq!(
            NativePermission::from_provider("query-builder"),
            NativePermission::Unspecified("query-builder".to_owned())
        );
    }

    #[test]
    fn database_id_accepts_numbers_and_strings() {
        let numeric = serde_json::from_str::<Database>(r#"{"id": 1, "name": "SalesDB"}"#);
        let text = serde_json::from_str::<Database>(r#"{"id": "1", "name": "SalesDB"}"#);

        assert!(numeric.is_ok());
        assert_eq!(numeric.ok(), text.ok());
    }

    #[test]
    fn group_permission_tolerates_missing_or_null_native() {
        let missing = serde_json::from_str::<GroupPermission>(r#"{"data": {"schemas": "all"}}"#);
        let null = serde_json::from_str::<GroupPermission>(r#"{"data": {"native": null}}"#);

        assert_eq!(missing.ok(), Some(GroupPermission::native("")));
        assert_eq!(null.ok(), Some(GroupPermission::native("")));
    }

    #[test]
    fn user_parses_activity_flag() {
        let user = serde_json::from_str::<MetabaseUser>(
            r#"{"id": 7, "email": "ana@example.com", "is_active": true}"#,
        );

        let Ok(user) = user else {
            panic!("user payload should parse");
        };
        assert_eq!(user.id, "7");
        assert!(user.is_active);
    }
}
