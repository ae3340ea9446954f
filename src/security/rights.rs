/*!
 * Well-Known Rights GUIDs
 * Extended-right, property-set, attribute and schema-class identifiers
 * referenced by the rule set
 */

use uuid::Uuid;

/// Matches any sub-object type; only unscoped entries grant it
pub const NULL_GUID: Uuid = Uuid::nil();

/// Sentinel for object classes without a modeled schema GUID
pub const UNKNOWN_GUID: Uuid = Uuid::from_u128(u128::MAX);

// Extended rights

/// User-Force-Change-Password
pub const RESET_PASSWORD: Uuid = Uuid::from_u128(0x00299570_246d_11d0_a768_00aa006e0529);
/// DS-Replication-Get-Changes
pub const DS_REPLICATION_GET_CHANGES: Uuid =
    Uuid::from_u128(0x1131f6aa_9c07_11d1_f79f_00c04fc2dcd2);
/// DS-Replication-Get-Changes-All
pub const DS_REPLICATION_GET_CHANGES_ALL: Uuid =
    Uuid::from_u128(0x1131f6ad_9c07_11d1_f79f_00c04fc2dcd2);
/// DS-Replication-Synchronize
pub const DS_REPLICATION_SYNCHRONIZE: Uuid =
    Uuid::from_u128(0x1131f6ab_9c07_11d1_f79f_00c04fc2dcd2);
/// Certificate-Enrollment
pub const CERTIFICATE_ENROLL: Uuid = Uuid::from_u128(0x0e10c968_78fb_11d2_90d4_00c04f79dc55);

// Attributes and validated writes

/// member
pub const ATTR_MEMBER: Uuid = Uuid::from_u128(0xbf9679c0_0de6_11d0_a285_00aa003049e2);
/// Membership property set
pub const ATTR_SET_GROUP_MEMBERSHIP: Uuid =
    Uuid::from_u128(0xbc0ac240_79a9_11d0_9020_00c04fc2d4cf);
/// sIDHistory
pub const ATTR_SID_HISTORY: Uuid = Uuid::from_u128(0x17eb4278_d167_11d0_b002_0000f80367c1);
/// msDS-AllowedToActOnBehalfOfOtherIdentity
pub const ATTR_ALLOWED_TO_ACT: Uuid = Uuid::from_u128(0x3f78c3e5_f79a_46bd_a0b8_9d18116ddc79);
/// msDS-GroupMSAMembership
pub const ATTR_GROUP_MSA_MEMBERSHIP: Uuid =
    Uuid::from_u128(0x888eedd6_ce04_df40_b462_b8a50e41ba38);
/// gPLink
pub const ATTR_GP_LINK: Uuid = Uuid::from_u128(0xf30e3bbe_9ff0_11d1_b603_0000f80367c1);
/// msDS-KeyCredentialLink
pub const ATTR_KEY_CREDENTIAL_LINK: Uuid = Uuid::from_u128(0x5b47d60f_6090_40b2_9f37_2a4de88f3063);
/// attributeSecurityGUID on a schema attribute
pub const ATTR_SECURITY_GUID: Uuid = Uuid::from_u128(0xbf967924_0de6_11d0_a285_00aa003049e2);
/// altSecurityIdentities
pub const ATTR_ALT_SECURITY_IDENTITIES: Uuid =
    Uuid::from_u128(0x00fbf30c_91fe_11d1_aebc_0000f80367c1);
/// profilePath
pub const ATTR_PROFILE_PATH: Uuid = Uuid::from_u128(0xbf967a05_0de6_11d0_a285_00aa003049e2);
/// scriptPath
pub const ATTR_SCRIPT_PATH: Uuid = Uuid::from_u128(0xbf9679a8_0de6_11d0_a285_00aa003049e2);
/// Self-Membership validated write shares the member attribute GUID
pub const VALIDATED_SELF_MEMBERSHIP: Uuid = ATTR_MEMBER;
/// Validated-SPN
pub const VALIDATED_SPN: Uuid = Uuid::from_u128(0xf3a64788_5306_11d1_a9c5_0000f80367c1);

// Schema classes

pub const CLASS_USER: Uuid = Uuid::from_u128(0xbf967aba_0de6_11d0_a285_00aa003049e2);
pub const CLASS_COMPUTER: Uuid = Uuid::from_u128(0xbf967a86_0de6_11d0_a285_00aa003049e2);
pub const CLASS_GROUP: Uuid = Uuid::from_u128(0xbf967a9c_0de6_11d0_a285_00aa003049e2);
pub const CLASS_DOMAIN: Uuid = Uuid::from_u128(0x19195a5a_6da0_11d0_afd3_00c04fd930c9);
pub const CLASS_GROUP_POLICY_CONTAINER: Uuid =
    Uuid::from_u128(0xf30e3bc2_9ff0_11d1_b603_0000f80367c1);
pub const CLASS_ORGANIZATIONAL_UNIT: Uuid =
    Uuid::from_u128(0xbf967aa5_0de6_11d0_a285_00aa003049e2);
pub const CLASS_ATTRIBUTE_SCHEMA: Uuid = Uuid::from_u128(0xbf967a80_0de6_11d0_a285_00aa003049e2);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guids_are_distinct() {
        let all = [
            RESET_PASSWORD,
            DS_REPLICATION_GET_CHANGES,
            DS_REPLICATION_GET_CHANGES_ALL,
            DS_REPLICATION_SYNCHRONIZE,
            CERTIFICATE_ENROLL,
            ATTR_MEMBER,
            ATTR_SET_GROUP_MEMBERSHIP,
            ATTR_SID_HISTORY,
            ATTR_ALLOWED_TO_ACT,
            ATTR_GROUP_MSA_MEMBERSHIP,
            ATTR_GP_LINK,
            ATTR_KEY_CREDENTIAL_LINK,
            ATTR_SECURITY_GUID,
            ATTR_ALT_SECURITY_IDENTITIES,
            ATTR_PROFILE_PATH,
            ATTR_SCRIPT_PATH,
            VALIDATED_SPN,
            CLASS_USER,
            CLASS_COMPUTER,
            CLASS_GROUP,
            CLASS_DOMAIN,
            CLASS_GROUP_POLICY_CONTAINER,
            CLASS_ORGANIZATIONAL_UNIT,
            CLASS_ATTRIBUTE_SCHEMA,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_null_guid_is_nil() {
        assert!(NULL_GUID.is_nil());
        assert_ne!(NULL_GUID, UNKNOWN_GUID);
    }
}
