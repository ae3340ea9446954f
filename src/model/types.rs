/*!
 * Model Types
 * Identifiers, object classification and attribute values for the object index
 */

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::security::rights;

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Model errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Object {dn} has no usable security descriptor")]
    DescriptorMissing { dn: String },

    #[error("Object not found: {dn}")]
    NotFound { dn: String },

    #[error("Malformed attribute {attribute} on {dn}: {reason}")]
    MalformedAttribute {
        dn: String,
        attribute: String,
        reason: String,
    },

    #[error("Invalid SID: {0}")]
    InvalidSid(String),
}

/// Stable arena index of an object inside an [`ObjectIndex`](super::ObjectIndex).
///
/// Identity is by index, never by pointer; the ledger and all round-tracking
/// maps key on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl ObjectId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Object type classifier, matched exhaustively by the rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Other,
    AttributeSchema,
    Group,
    ForeignSecurityPrincipal,
    User,
    Computer,
    ManagedServiceAccount,
    OrganizationalUnit,
    Container,
    GroupPolicyContainer,
    CertificateTemplate,
    Domain,
    /// Synthetic object created by a preprocessor (e.g. a logon script)
    Script,
}

impl ObjectType {
    /// Schema object-class GUID for this type, used when matching
    /// create-child / delete-child ACEs against a child's class.
    pub fn class_guid(self) -> Uuid {
        match self {
            ObjectType::User => rights::CLASS_USER,
            ObjectType::Computer => rights::CLASS_COMPUTER,
            ObjectType::Group => rights::CLASS_GROUP,
            ObjectType::Domain => rights::CLASS_DOMAIN,
            ObjectType::GroupPolicyContainer => rights::CLASS_GROUP_POLICY_CONTAINER,
            ObjectType::OrganizationalUnit => rights::CLASS_ORGANIZATIONAL_UNIT,
            ObjectType::AttributeSchema => rights::CLASS_ATTRIBUTE_SCHEMA,
            _ => rights::UNKNOWN_GUID,
        }
    }
}

/// Security identifier in textual `S-1-...` form.
///
/// Binary SID decoding happens in the loader; the core only ever sees the
/// textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sid(String);

impl Sid {
    /// Parse a textual SID, rejecting anything without the `S-` prefix
    pub fn parse(s: &str) -> ModelResult<Self> {
        if !s.starts_with("S-") || s.len() < 4 {
            return Err(ModelError::InvalidSid(s.to_string()));
        }
        Ok(Sid(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn known(s: &str) -> Self {
        Sid(s.to_string())
    }

    /// S-1-1-0, applies to every principal
    pub fn everyone() -> Self {
        Sid::known("S-1-1-0")
    }

    /// S-1-5-11, applies to every authenticated principal
    pub fn authenticated_users() -> Self {
        Sid::known("S-1-5-11")
    }

    /// S-1-5-10, the object itself
    pub fn self_principal() -> Self {
        Sid::known("S-1-5-10")
    }

    /// S-1-3-4, the implicit owner-rights principal
    pub fn owner_rights() -> Self {
        Sid::known("S-1-3-4")
    }

    /// S-1-3-0
    pub fn creator_owner() -> Self {
        Sid::known("S-1-3-0")
    }

    /// S-1-5-18
    pub fn local_system() -> Self {
        Sid::known("S-1-5-18")
    }

    /// S-1-5-32-544, BUILTIN\Administrators
    pub fn builtin_administrators() -> Self {
        Sid::known("S-1-5-32-544")
    }

    /// S-1-5-32-555, BUILTIN\Remote Desktop Users
    pub fn remote_desktop_users() -> Self {
        Sid::known("S-1-5-32-555")
    }

    /// S-1-5-32-562, BUILTIN\Distributed COM Users
    pub fn distributed_com_users() -> Self {
        Sid::known("S-1-5-32-562")
    }
}

impl std::fmt::Display for Sid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Attribute names consumed by the rules
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Name,
    Member,
    MemberOf,
    SidHistory,
    ServicePrincipalName,
    UserAccountControl,
    GpLink,
    GpOptions,
    HostServiceAccount,
    GroupMsaMembership,
    ObjectCategory,
    /// Marker set by the SPN rule
    MetaHasSpn,
    Custom(String),
}

/// One attribute value, typed by the loader
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Text(String),
    Int(i64),
    Sid(Sid),
    Guid(Uuid),
    Blob(Vec<u8>),
    /// Embedded security descriptor (e.g. msDS-GroupMSAMembership), decoded
    /// by the loader
    Descriptor(crate::security::SecurityDescriptor),
}

impl AttributeValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(i) => Some(*i),
            AttributeValue::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn as_sid(&self) -> Option<&Sid> {
        match self {
            AttributeValue::Sid(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_descriptor(&self) -> Option<&crate::security::SecurityDescriptor> {
        match self {
            AttributeValue::Descriptor(sd) => Some(sd),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sid_parse() {
        assert!(Sid::parse("S-1-5-21-1-2-3-512").is_ok());
        assert!(Sid::parse("X-1-5").is_err());
        assert!(Sid::parse("").is_err());
    }

    #[test]
    fn test_class_guid_known_types() {
        assert_eq!(ObjectType::User.class_guid(), rights::CLASS_USER);
        assert_eq!(ObjectType::Other.class_guid(), rights::UNKNOWN_GUID);
    }

    #[test]
    fn test_attribute_value_coercion() {
        assert_eq!(AttributeValue::Text("512".into()).as_int(), Some(512));
        assert_eq!(AttributeValue::Int(7).as_int(), Some(7));
        assert!(AttributeValue::Int(7).as_text().is_none());
    }
}
