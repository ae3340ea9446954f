/*!
 * Security Descriptor Types
 * Access masks, access-control entries and parsed descriptors
 *
 * Binary decoding below the ACE-iteration level happens in the loader; the
 * core receives descriptors already parsed into these types, with generic
 * rights expanded to their constituent specific rights.
 */

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Sid;

/// Access-rights bitmask on an ACE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AccessMask(pub u32);

impl AccessMask {
    pub const CREATE_CHILD: AccessMask = AccessMask(0x0000_0001);
    pub const DELETE_CHILD: AccessMask = AccessMask(0x0000_0002);
    pub const LIST_CONTENTS: AccessMask = AccessMask(0x0000_0004);
    /// Validated write (DS "self" right)
    pub const WRITE_PROPERTY_EXTENDED: AccessMask = AccessMask(0x0000_0008);
    pub const READ_PROPERTY: AccessMask = AccessMask(0x0000_0010);
    pub const WRITE_PROPERTY: AccessMask = AccessMask(0x0000_0020);
    /// Extended rights
    pub const CONTROL_ACCESS: AccessMask = AccessMask(0x0000_0100);
    pub const DELETE: AccessMask = AccessMask(0x0001_0000);
    pub const READ_CONTROL: AccessMask = AccessMask(0x0002_0000);
    pub const WRITE_DACL: AccessMask = AccessMask(0x0004_0000);
    pub const WRITE_OWNER: AccessMask = AccessMask(0x0008_0000);
    pub const GENERIC_ALL: AccessMask = AccessMask(0x1000_0000);
    pub const GENERIC_WRITE: AccessMask = AccessMask(0x4000_0000);
    pub const GENERIC_READ: AccessMask = AccessMask(0x8000_0000);

    /// True if every bit of `right` is present in this mask
    pub fn contains(self, right: AccessMask) -> bool {
        self.0 & right.0 == right.0
    }

    pub fn union(self, other: AccessMask) -> AccessMask {
        AccessMask(self.0 | other.0)
    }
}

/// Kind of an access-control entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AceKind {
    Allow,
    Deny,
    AllowObject,
    DenyObject,
}

impl AceKind {
    pub fn is_allow(self) -> bool {
        matches!(self, AceKind::Allow | AceKind::AllowObject)
    }

    pub fn is_deny(self) -> bool {
        matches!(self, AceKind::Deny | AceKind::DenyObject)
    }

    pub fn is_object_scoped(self) -> bool {
        matches!(self, AceKind::AllowObject | AceKind::DenyObject)
    }
}

/// Per-ACE inheritance flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AceFlags(pub u8);

impl AceFlags {
    pub const CONTAINER_INHERIT: AceFlags = AceFlags(0x02);
    pub const INHERIT_ONLY: AceFlags = AceFlags(0x08);
    pub const INHERITED: AceFlags = AceFlags(0x10);

    pub fn contains(self, flag: AceFlags) -> bool {
        self.0 & flag.0 == flag.0
    }
}

/// One ordered entry of a discretionary ACL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ace {
    pub kind: AceKind,
    pub trustee: Sid,
    pub mask: AccessMask,
    /// Sub-object-type scope; `None` applies to all sub-object types
    pub object_type: Option<Uuid>,
    /// Class of child objects the entry propagates to
    pub inherited_object_type: Option<Uuid>,
    pub flags: AceFlags,
}

impl Ace {
    pub fn allow(trustee: Sid, mask: AccessMask) -> Self {
        Self {
            kind: AceKind::Allow,
            trustee,
            mask,
            object_type: None,
            inherited_object_type: None,
            flags: AceFlags::default(),
        }
    }

    pub fn deny(trustee: Sid, mask: AccessMask) -> Self {
        Self {
            kind: AceKind::Deny,
            ..Self::allow(trustee, mask)
        }
    }

    pub fn allow_object(trustee: Sid, mask: AccessMask, object_type: Uuid) -> Self {
        Self {
            kind: AceKind::AllowObject,
            object_type: Some(object_type),
            ..Self::allow(trustee, mask)
        }
    }

    pub fn deny_object(trustee: Sid, mask: AccessMask, object_type: Uuid) -> Self {
        Self {
            kind: AceKind::DenyObject,
            object_type: Some(object_type),
            ..Self::allow(trustee, mask)
        }
    }
}

/// Security-descriptor control flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlFlags(pub u16);

impl ControlFlags {
    pub const DACL_PRESENT: ControlFlags = ControlFlags(0x0004);
    /// Blocks upward inheritance of the parent's ACL
    pub const DACL_PROTECTED: ControlFlags = ControlFlags(0x1000);

    pub fn contains(self, flag: ControlFlags) -> bool {
        self.0 & flag.0 == flag.0
    }

    pub fn union(self, other: ControlFlags) -> ControlFlags {
        ControlFlags(self.0 | other.0)
    }
}

/// Parsed security descriptor: owner plus ordered DACL.
///
/// The loader orders the DACL so that explicit denies precede the allows
/// they constrain, matching access-check semantics.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SecurityDescriptor {
    pub owner: Option<Sid>,
    pub control: ControlFlags,
    pub dacl: Vec<Ace>,
}

impl SecurityDescriptor {
    pub fn new(owner: Option<Sid>, control: ControlFlags, dacl: Vec<Ace>) -> Self {
        Self { owner, control, dacl }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_contains() {
        let mask = AccessMask::WRITE_PROPERTY.union(AccessMask::WRITE_DACL);
        assert!(mask.contains(AccessMask::WRITE_PROPERTY));
        assert!(mask.contains(AccessMask::WRITE_DACL));
        assert!(!mask.contains(AccessMask::WRITE_OWNER));
    }

    #[test]
    fn test_ace_kind_predicates() {
        assert!(AceKind::AllowObject.is_allow());
        assert!(AceKind::AllowObject.is_object_scoped());
        assert!(AceKind::Deny.is_deny());
        assert!(!AceKind::Deny.is_object_scoped());
    }

    #[test]
    fn test_control_flags() {
        let control = ControlFlags::DACL_PRESENT.union(ControlFlags::DACL_PROTECTED);
        assert!(control.contains(ControlFlags::DACL_PROTECTED));
        assert!(!ControlFlags::DACL_PRESENT.contains(ControlFlags::DACL_PROTECTED));
    }
}
