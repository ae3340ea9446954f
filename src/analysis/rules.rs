/*!
 * Analysis Rules
 * The declarative rule set turning descriptors and facts into ledger edges
 *
 * Each rule filters by object type first, then inspects the object's
 * descriptor or preprocessed facts, and records edges from the granted
 * trustee to the analyzed object. A rule that finds nothing applicable
 * records nothing; absence of an edge is the default, not an error.
 */

use log::{debug, error, warn};

use super::context::{AnalysisContext, ReplicationFacts};
use crate::ledger::Method;
use crate::model::{Attribute, AttributeValue, Object, ObjectId, ObjectType, ScriptPhase, Sid};
use crate::security::rights;
use crate::security::types::{AccessMask, AceKind};
use uuid::Uuid;

/// Phase a rule runs in; membership facts must exist before ACL rules can
/// resolve group trustees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulePhase {
    Membership,
    Acl,
}

/// One analysis rule: a name and a function from object to ledger edges
pub struct Rule {
    pub name: &'static str,
    pub phase: RulePhase,
    pub description: Option<&'static str>,
    pub analyze: fn(&AnalysisContext<'_>, ObjectId),
}

/// Emit an edge per DACL entry that effectively grants `right` in `scope`.
///
/// `types` filters the analyzed object (empty slice = all types). The
/// trustee side of each matching entry becomes the edge source.
fn acl_edges(
    ctx: &AnalysisContext<'_>,
    id: ObjectId,
    types: &[ObjectType],
    right: AccessMask,
    scope: Uuid,
    method: Method,
    probability: u8,
) {
    let Some(object) = ctx.index.get(id) else {
        return;
    };
    if !types.is_empty() && !types.contains(&object.object_type()) {
        return;
    }
    let Ok(sd) = object.descriptor() else {
        return;
    };
    let access = ctx.access();
    for index in 0..sd.dacl.len() {
        if access.allows(sd, index, &object, right, scope) {
            let trustee = ctx.index.find_or_add_sid(&sd.dacl[index].trustee);
            ctx.record(trustee, id, method, probability);
        }
    }
}

/// Trustees granted a replication extended right on this object
fn replication_trustees(
    ctx: &AnalysisContext<'_>,
    id: ObjectId,
    scope: Uuid,
    mark: fn(&ReplicationFacts, ObjectId),
) {
    let Some(object) = ctx.index.get(id) else {
        return;
    };
    let Ok(sd) = object.descriptor() else {
        return;
    };
    let access = ctx.access();
    for index in 0..sd.dacl.len() {
        if access.allows(sd, index, &object, AccessMask::CONTROL_ACCESS, scope) {
            let trustee = ctx.index.find_or_add_sid(&sd.dacl[index].trustee);
            mark(ctx.replication(), trustee);
        }
    }
}

/// Local-group assignments from preprocessed GPO facts
fn local_group_edges(
    ctx: &AnalysisContext<'_>,
    id: ObjectId,
    group_sid: &str,
    method: Method,
    probability: u8,
) {
    let Some(facts) = ctx.index.gpo_facts(id) else {
        return;
    };
    for pair in &facts.local_groups {
        if pair.group_sid != group_sid {
            continue;
        }
        match Sid::parse(&pair.member_sid) {
            Ok(member) => {
                let source = ctx.index.find_or_add_sid(&member);
                ctx.record(source, id, method, probability);
            }
            Err(_) => {
                warn!(
                    "Detected {method} assignment, but could not parse SID {}",
                    pair.member_sid
                );
            }
        }
    }
}

fn gpo_config_container(ctx: &AnalysisContext<'_>, id: ObjectId, name: &str, method: Method) {
    let Some(object) = ctx.index.get(id) else {
        return;
    };
    if object.object_type() != ObjectType::Container
        || object.one_attr_str(&Attribute::Name) != Some(name)
    {
        return;
    }
    let Some(parent) = ctx.index.parent(id) else {
        return;
    };
    let Some(parent_object) = ctx.index.get(parent) else {
        return;
    };
    if parent_object.object_type() != ObjectType::GroupPolicyContainer {
        return;
    }
    ctx.record(parent, id, method, 100);
}

fn analyze_gpo_links(ctx: &AnalysisContext<'_>, id: ObjectId) {
    let Some(object) = ctx.index.get(id) else {
        return;
    };
    // Only computers; users are not meaningfully compromised this way
    if object.object_type() != ObjectType::Computer {
        return;
    }
    let mut current = id;
    loop {
        let Some(current_object) = ctx.index.get(current) else {
            break;
        };
        if current_object.one_attr_str(&Attribute::GpOptions) == Some("1") {
            // Inheritance is blocked, don't move upwards
            break;
        }
        let Some(parent) = ctx.index.parent(current) else {
            break;
        };
        current = parent;
        let Some(parent_object) = ctx.index.get(parent) else {
            break;
        };
        let links = parent_object
            .one_attr_str(&Attribute::GpLink)
            .unwrap_or("")
            .trim();
        if links.is_empty() {
            continue;
        }
        if !links.starts_with('[') || !links.ends_with(']') {
            warn!("Error parsing gPLink on {}: {}", object.dn(), links);
            continue;
        }
        for link in links[1..links.len() - 1].split("][") {
            let Some((dn_part, link_type)) = link.split_once(';') else {
                warn!("Error parsing gPLink on {}: {}", object.dn(), links);
                continue;
            };
            if link_type == "1" || link_type == "3" {
                // Link is disabled
                continue;
            }
            let linked_dn = dn_part.strip_prefix("LDAP://").unwrap_or(dn_part);
            match ctx.index.find_dn(linked_dn) {
                Some(gpo) => ctx.record(gpo, id, Method::GpoAffectsComputer, 100),
                None => warn!(
                    "Object {} linked to GPO that is not found: {}",
                    object.dn(),
                    linked_dn
                ),
            }
        }
    }
}

fn analyze_group_members(ctx: &AnalysisContext<'_>, id: ObjectId) {
    let Some(object) = ctx.index.get(id) else {
        return;
    };
    if object.object_type() != ObjectType::Group
        && object.object_type() != ObjectType::ForeignSecurityPrincipal
    {
        return;
    }
    for value in object.attr(&Attribute::Member) {
        match value {
            AttributeValue::Text(dn) => match ctx.index.find_dn(dn) {
                Some(member) => ctx.record(member, id, Method::MemberOfGroup, 100),
                None => warn!("Group {} member not found: {dn}", object.dn()),
            },
            AttributeValue::Sid(sid) => {
                let member = ctx.index.find_or_add_sid(sid);
                ctx.record(member, id, Method::MemberOfGroup, 100);
            }
            _ => {}
        }
    }
}

fn analyze_deny_indicator(ctx: &AnalysisContext<'_>, id: ObjectId) {
    let Some(object) = ctx.index.get(id) else {
        return;
    };
    let Ok(sd) = object.descriptor() else {
        return;
    };
    for entry in &sd.dacl {
        if entry.kind.is_deny() {
            let trustee = ctx.index.find_or_add_sid(&entry.trustee);
            // Not a probability of success, just an indicator
            ctx.record(trustee, id, Method::AclContainsDeny, 0);
        }
    }
}

fn analyze_ownership(ctx: &AnalysisContext<'_>, id: ObjectId) {
    let Some(object) = ctx.index.get(id) else {
        return;
    };
    let Ok(sd) = object.descriptor() else {
        return;
    };
    // A deny for the OWNER RIGHTS SID removes the owner's implicit control
    // of the DACL
    let owner_rights_denied = sd
        .dacl
        .iter()
        .any(|entry| entry.kind == AceKind::Deny && entry.trustee == Sid::owner_rights());
    if owner_rights_denied {
        return;
    }
    if let Some(owner) = &sd.owner {
        let source = ctx.index.find_or_add_sid(owner);
        ctx.record(source, id, Method::Owns, 100);
    }
}

fn analyze_inherited_acl(ctx: &AnalysisContext<'_>, id: ObjectId) {
    use crate::security::ControlFlags;
    let Some(object) = ctx.index.get(id) else {
        return;
    };
    let Ok(sd) = object.descriptor() else {
        return;
    };
    if sd.control.contains(ControlFlags::DACL_PROTECTED) {
        return;
    }
    if let Some(parent) = ctx.index.parent(id) {
        ctx.record(parent, id, Method::InheritsSecurity, 100);
    }
}

fn analyze_delete_children(ctx: &AnalysisContext<'_>, id: ObjectId) {
    let Some(object) = ctx.index.get(id) else {
        return;
    };
    let Some(parent) = ctx.index.parent(id) else {
        return;
    };
    let Some(parent_object) = ctx.index.get(parent) else {
        return;
    };
    let Ok(sd) = parent_object.descriptor() else {
        return;
    };
    let class = object.object_type().class_guid();
    let access = ctx.access();
    for index in 0..sd.dacl.len() {
        if access.allows(sd, index, &parent_object, AccessMask::DELETE_CHILD, class) {
            let trustee = ctx.index.find_or_add_sid(&sd.dacl[index].trustee);
            ctx.record(trustee, id, Method::DeleteChildrenTarget, 100);
        }
    }
}

fn analyze_has_spn(ctx: &AnalysisContext<'_>, id: ObjectId) {
    let Some(object) = ctx.index.get(id) else {
        return;
    };
    if object.object_type() != ObjectType::User {
        return;
    }
    if object.attr(&Attribute::ServicePrincipalName).is_empty() {
        return;
    }
    object.set_marker(Attribute::MetaHasSpn, AttributeValue::Int(1));
    let dn = format!(
        "CN=Authenticated Users,CN=WellKnown Security Principals,CN=Configuration,{}",
        ctx.index.base()
    );
    let Some(authenticated_users) = ctx.index.find_dn(&dn) else {
        error!("Could not locate Authenticated Users");
        return;
    };
    ctx.record(authenticated_users, id, Method::HasSpn, 50);
}

fn analyze_has_spn_no_preauth(ctx: &AnalysisContext<'_>, id: ObjectId) {
    const UAC_DONT_REQUIRE_PREAUTH: i64 = 0x400000;
    let Some(object) = ctx.index.get(id) else {
        return;
    };
    if object.object_type() != ObjectType::User {
        return;
    }
    let Some(uac) = object.attr_int(&Attribute::UserAccountControl) else {
        return;
    };
    if uac & UAC_DONT_REQUIRE_PREAUTH == 0 {
        return;
    }
    if object.attr(&Attribute::ServicePrincipalName).is_empty() {
        return;
    }
    ctx.record(ctx.index.attacker(), id, Method::HasSpnNoPreauth, 50);
}

fn analyze_msa_password_readers(ctx: &AnalysisContext<'_>, id: ObjectId) {
    let Some(object) = ctx.index.get(id) else {
        return;
    };
    for value in object.attr(&Attribute::GroupMsaMembership) {
        let Some(sd) = value.as_descriptor() else {
            continue;
        };
        for entry in &sd.dacl {
            if entry.kind == AceKind::Allow {
                let trustee = ctx.index.find_or_add_sid(&entry.trustee);
                ctx.record(trustee, id, Method::ReadMsaPassword, 100);
            }
        }
    }
}

fn analyze_hosted_msa(ctx: &AnalysisContext<'_>, id: ObjectId) {
    let Some(object) = ctx.index.get(id) else {
        return;
    };
    for value in object.attr(&Attribute::HostServiceAccount) {
        let Some(dn) = value.as_text() else {
            continue;
        };
        match ctx.index.find_dn(dn) {
            Some(msa) => ctx.record(id, msa, Method::HasMsa, 100),
            None => warn!("Host service account not found for {}: {dn}", object.dn()),
        }
    }
}

fn analyze_sid_history(ctx: &AnalysisContext<'_>, id: ObjectId) {
    let Some(object) = ctx.index.get(id) else {
        return;
    };
    for value in object.attr(&Attribute::SidHistory) {
        if let Some(sid) = value.as_sid() {
            let target = ctx.index.find_or_add_sid(sid);
            ctx.record(id, target, Method::SidHistoryEquality, 100);
        }
    }
}

fn analyze_scheduled_tasks(ctx: &AnalysisContext<'_>, id: ObjectId) {
    let Some(facts) = ctx.index.gpo_facts(id) else {
        return;
    };
    for task in &facts.scheduled_tasks {
        // Informational only until UNC-path exploitation is modeled
        debug!("Scheduled task {} runs {}", task.name, task.command);
    }
}

fn analyze_machine_scripts(ctx: &AnalysisContext<'_>, id: ObjectId) {
    let Some(facts) = ctx.index.gpo_facts(id) else {
        return;
    };
    let Some(gpo) = ctx.index.get(id) else {
        return;
    };
    let gpo_name = gpo
        .one_attr_str(&Attribute::Name)
        .unwrap_or_else(|| gpo.dn());
    for (number, script) in facts.scripts.iter().enumerate() {
        let phase = match script.phase {
            ScriptPhase::Startup => "Startup",
            ScriptPhase::Shutdown => "Shutdown",
        };
        let command = format!("{} {}", script.command, script.parameters);
        let synthetic = Object::new(
            format!("CN={phase} Script {number} from GPO {gpo_name},CN=synthetic"),
            ObjectType::Script,
        )
        .with_attr(
            Attribute::ObjectCategory,
            AttributeValue::Text("Script".into()),
        )
        .with_attr(
            Attribute::Name,
            AttributeValue::Text(format!(
                "Machine {} script {}",
                phase.to_ascii_lowercase(),
                command.trim()
            )),
        );
        let script_id = ctx.index.add_synthetic(synthetic);
        ctx.record(script_id, id, Method::MachineScript, 100);
    }
}

/// The full rule set, in the order the build runs them.
///
/// No global registry: callers pass this (or their own list) into
/// [`build_ledger`](super::build_ledger).
pub fn default_rules() -> Vec<Rule> {
    const CONTAINERS: &[ObjectType] = &[ObjectType::Container, ObjectType::OrganizationalUnit];
    const ACCOUNTS: &[ObjectType] = &[
        ObjectType::User,
        ObjectType::Computer,
        ObjectType::ManagedServiceAccount,
    ];

    vec![
        Rule {
            name: "MemberOfGroup",
            phase: RulePhase::Membership,
            description: None,
            analyze: analyze_group_members,
        },
        Rule {
            name: "GpoAffectsComputer",
            phase: RulePhase::Acl,
            description: None,
            analyze: analyze_gpo_links,
        },
        Rule {
            name: "GpoMachineConfig",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| gpo_config_container(ctx, id, "Machine", Method::GpoMachineConfig),
        },
        Rule {
            name: "GpoUserConfig",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| gpo_config_container(ctx, id, "User", Method::GpoUserConfig),
        },
        Rule {
            name: "CreateUser",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| {
                acl_edges(
                    ctx,
                    id,
                    CONTAINERS,
                    AccessMask::CREATE_CHILD,
                    rights::CLASS_USER,
                    Method::CreateUser,
                    100,
                )
            },
        },
        Rule {
            name: "CreateGroup",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| {
                acl_edges(
                    ctx,
                    id,
                    CONTAINERS,
                    AccessMask::CREATE_CHILD,
                    rights::CLASS_GROUP,
                    Method::CreateGroup,
                    100,
                )
            },
        },
        Rule {
            name: "CreateComputer",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| {
                acl_edges(
                    ctx,
                    id,
                    CONTAINERS,
                    AccessMask::CREATE_CHILD,
                    rights::CLASS_COMPUTER,
                    Method::CreateComputer,
                    100,
                )
            },
        },
        Rule {
            name: "CreateAnyObject",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| {
                acl_edges(
                    ctx,
                    id,
                    CONTAINERS,
                    AccessMask::CREATE_CHILD,
                    rights::NULL_GUID,
                    Method::CreateAnyObject,
                    100,
                )
            },
        },
        Rule {
            name: "DeleteObject",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| {
                acl_edges(
                    ctx,
                    id,
                    &[],
                    AccessMask::DELETE,
                    rights::NULL_GUID,
                    Method::DeleteObject,
                    100,
                )
            },
        },
        Rule {
            name: "DeleteChildrenTarget",
            phase: RulePhase::Acl,
            description: Some("Parent container grants delete-child over this object's class"),
            analyze: analyze_delete_children,
        },
        Rule {
            name: "InheritsSecurity",
            phase: RulePhase::Acl,
            description: None,
            analyze: analyze_inherited_acl,
        },
        Rule {
            name: "AclContainsDeny",
            phase: RulePhase::Acl,
            description: Some("Indicator only; a deny entry may not block every path"),
            analyze: analyze_deny_indicator,
        },
        Rule {
            name: "Owns",
            phase: RulePhase::Acl,
            description: None,
            analyze: analyze_ownership,
        },
        Rule {
            name: "GenericAll",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| {
                acl_edges(
                    ctx,
                    id,
                    &[],
                    AccessMask::GENERIC_ALL,
                    rights::NULL_GUID,
                    Method::GenericAll,
                    100,
                )
            },
        },
        Rule {
            name: "WriteAll",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| {
                acl_edges(
                    ctx,
                    id,
                    &[],
                    AccessMask::GENERIC_WRITE,
                    rights::NULL_GUID,
                    Method::WriteAll,
                    100,
                )
            },
        },
        Rule {
            name: "WritePropertyAll",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| {
                acl_edges(
                    ctx,
                    id,
                    &[],
                    AccessMask::WRITE_PROPERTY,
                    rights::NULL_GUID,
                    Method::WritePropertyAll,
                    100,
                )
            },
        },
        Rule {
            name: "WriteExtendedAll",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| {
                acl_edges(
                    ctx,
                    id,
                    &[],
                    AccessMask::WRITE_PROPERTY_EXTENDED,
                    rights::NULL_GUID,
                    Method::WriteExtendedAll,
                    100,
                )
            },
        },
        Rule {
            name: "TakeOwnership",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| {
                acl_edges(
                    ctx,
                    id,
                    &[],
                    AccessMask::WRITE_OWNER,
                    rights::NULL_GUID,
                    Method::TakeOwnership,
                    100,
                )
            },
        },
        Rule {
            name: "WriteDacl",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| {
                acl_edges(
                    ctx,
                    id,
                    &[],
                    AccessMask::WRITE_DACL,
                    rights::NULL_GUID,
                    Method::WriteDacl,
                    100,
                )
            },
        },
        Rule {
            name: "WriteAttributeSecurityGuid",
            phase: RulePhase::Acl,
            description: Some(
                "Modifying an attribute's security set can promote it to a weaker attribute set",
            ),
            analyze: |ctx, id| {
                acl_edges(
                    ctx,
                    id,
                    &[ObjectType::AttributeSchema],
                    AccessMask::WRITE_PROPERTY,
                    rights::ATTR_SECURITY_GUID,
                    Method::WriteAttributeSecurityGuid,
                    25,
                )
            },
        },
        Rule {
            name: "ResetPassword",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| {
                acl_edges(
                    ctx,
                    id,
                    ACCOUNTS,
                    AccessMask::CONTROL_ACCESS,
                    rights::RESET_PASSWORD,
                    Method::ResetPassword,
                    100,
                )
            },
        },
        Rule {
            name: "HasSpn",
            phase: RulePhase::Acl,
            description: Some("Kerberoastable: any authenticated user can request a service ticket"),
            analyze: analyze_has_spn,
        },
        Rule {
            name: "HasSpnNoPreauth",
            phase: RulePhase::Acl,
            description: None,
            analyze: analyze_has_spn_no_preauth,
        },
        Rule {
            name: "WriteSpn",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| {
                acl_edges(
                    ctx,
                    id,
                    &[ObjectType::User],
                    AccessMask::WRITE_PROPERTY,
                    rights::VALIDATED_SPN,
                    Method::WriteSpn,
                    30,
                )
            },
        },
        Rule {
            name: "WriteValidatedSpn",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| {
                acl_edges(
                    ctx,
                    id,
                    &[ObjectType::User],
                    AccessMask::WRITE_PROPERTY_EXTENDED,
                    rights::VALIDATED_SPN,
                    Method::WriteValidatedSpn,
                    30,
                )
            },
        },
        Rule {
            name: "WriteAllowedToAct",
            phase: RulePhase::Acl,
            description: Some(
                "Writing msDS-AllowedToActOnBehalfOfOtherIdentity enables impersonation via any SPN-enabled account",
            ),
            analyze: |ctx, id| {
                acl_edges(
                    ctx,
                    id,
                    &[ObjectType::Computer],
                    AccessMask::WRITE_PROPERTY,
                    rights::ATTR_ALLOWED_TO_ACT,
                    Method::WriteAllowedToAct,
                    100,
                )
            },
        },
        Rule {
            name: "AddMember",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| {
                acl_edges(
                    ctx,
                    id,
                    &[ObjectType::Group],
                    AccessMask::WRITE_PROPERTY,
                    rights::ATTR_MEMBER,
                    Method::AddMember,
                    100,
                )
            },
        },
        Rule {
            name: "AddMemberGroupAttr",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| {
                acl_edges(
                    ctx,
                    id,
                    &[ObjectType::Group],
                    AccessMask::WRITE_PROPERTY,
                    rights::ATTR_SET_GROUP_MEMBERSHIP,
                    Method::AddMemberGroupAttr,
                    100,
                )
            },
        },
        Rule {
            name: "AddSelfMember",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| {
                acl_edges(
                    ctx,
                    id,
                    &[ObjectType::Group],
                    AccessMask::WRITE_PROPERTY_EXTENDED,
                    rights::VALIDATED_SELF_MEMBERSHIP,
                    Method::AddSelfMember,
                    100,
                )
            },
        },
        Rule {
            name: "ReadMsaPassword",
            phase: RulePhase::Acl,
            description: None,
            analyze: analyze_msa_password_readers,
        },
        Rule {
            name: "WriteAltSecurityIdentities",
            phase: RulePhase::Acl,
            description: Some(
                "Defines a certificate that can be used to authenticate as the user",
            ),
            analyze: |ctx, id| {
                acl_edges(
                    ctx,
                    id,
                    &[ObjectType::User],
                    AccessMask::WRITE_PROPERTY,
                    rights::ATTR_ALT_SECURITY_IDENTITIES,
                    Method::WriteAltSecurityIdentities,
                    100,
                )
            },
        },
        Rule {
            name: "WriteProfilePath",
            phase: RulePhase::Acl,
            description: Some("Triggers user auth against an attacker-controlled UNC path"),
            analyze: |ctx, id| {
                acl_edges(
                    ctx,
                    id,
                    &[ObjectType::User],
                    AccessMask::WRITE_PROPERTY,
                    rights::ATTR_PROFILE_PATH,
                    Method::WriteProfilePath,
                    100,
                )
            },
        },
        Rule {
            name: "WriteScriptPath",
            phase: RulePhase::Acl,
            description: Some("Triggers user auth against an attacker-controlled UNC path"),
            analyze: |ctx, id| {
                acl_edges(
                    ctx,
                    id,
                    &[ObjectType::User],
                    AccessMask::WRITE_PROPERTY,
                    rights::ATTR_SCRIPT_PATH,
                    Method::WriteScriptPath,
                    100,
                )
            },
        },
        Rule {
            name: "HasMsa",
            phase: RulePhase::Acl,
            description: None,
            analyze: analyze_hosted_msa,
        },
        Rule {
            name: "WriteKeyCredentialLink",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| {
                acl_edges(
                    ctx,
                    id,
                    &[ObjectType::User, ObjectType::Computer],
                    AccessMask::WRITE_PROPERTY,
                    rights::ATTR_KEY_CREDENTIAL_LINK,
                    Method::WriteKeyCredentialLink,
                    100,
                )
            },
        },
        Rule {
            name: "SidHistoryEquality",
            phase: RulePhase::Acl,
            description: None,
            analyze: analyze_sid_history,
        },
        Rule {
            name: "AllExtendedRights",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| {
                acl_edges(
                    ctx,
                    id,
                    &[],
                    AccessMask::CONTROL_ACCESS,
                    rights::NULL_GUID,
                    Method::AllExtendedRights,
                    100,
                )
            },
        },
        Rule {
            name: "LocalAdminRights",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| {
                local_group_edges(ctx, id, "S-1-5-32-544", Method::LocalAdminRights, 100)
            },
        },
        Rule {
            name: "LocalRdpRights",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| {
                local_group_edges(ctx, id, "S-1-5-32-555", Method::LocalRdpRights, 30)
            },
        },
        Rule {
            name: "LocalDcomRights",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| {
                local_group_edges(ctx, id, "S-1-5-32-562", Method::LocalDcomRights, 50)
            },
        },
        Rule {
            name: "CertificateEnroll",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| {
                acl_edges(
                    ctx,
                    id,
                    &[ObjectType::CertificateTemplate],
                    AccessMask::CONTROL_ACCESS,
                    rights::CERTIFICATE_ENROLL,
                    Method::CertificateEnroll,
                    100,
                )
            },
        },
        Rule {
            name: "ScheduledTaskOnUncPath",
            phase: RulePhase::Acl,
            description: None,
            analyze: analyze_scheduled_tasks,
        },
        Rule {
            name: "MachineScript",
            phase: RulePhase::Acl,
            description: None,
            analyze: analyze_machine_scripts,
        },
        Rule {
            name: "DcReplicationGetChanges",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| {
                replication_trustees(ctx, id, rights::DS_REPLICATION_GET_CHANGES, |facts, t| {
                    facts.mark_get_changes(t)
                })
            },
        },
        Rule {
            name: "DcReplicationGetChangesAll",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| {
                replication_trustees(ctx, id, rights::DS_REPLICATION_GET_CHANGES_ALL, |facts, t| {
                    facts.mark_get_changes_all(t)
                })
            },
        },
        Rule {
            name: "DcReplicationSynchronize",
            phase: RulePhase::Acl,
            description: None,
            analyze: |ctx, id| {
                replication_trustees(ctx, id, rights::DS_REPLICATION_SYNCHRONIZE, |facts, t| {
                    facts.mark_synchronize(t)
                })
            },
        },
    ]
}
