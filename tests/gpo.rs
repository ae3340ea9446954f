/*!
 * Group-policy analysis tests: link resolution, local-group assignments and
 * machine-script synthesis
 */

use adgraph::analysis::{build_ledger, default_rules};
use adgraph::ledger::Method;
use adgraph::model::{
    Attribute, AttributeValue, GpoFacts, LocalGroupFact, Object, ObjectIndex, ObjectType,
    ScriptFact, ScriptPhase, Sid,
};

fn sid(s: &str) -> Sid {
    Sid::parse(s).unwrap()
}

const GPO_DN: &str = "CN=Baseline,CN=Policies,CN=System,DC=example,DC=com";

#[test]
fn linked_gpo_affects_computer() {
    let index = ObjectIndex::new("DC=example,DC=com");
    let gpo = index.insert(Object::new(GPO_DN, ObjectType::GroupPolicyContainer));
    index.insert(
        Object::new("OU=Workstations,DC=example,DC=com", ObjectType::OrganizationalUnit)
            .with_attr(
                Attribute::GpLink,
                AttributeValue::Text(format!("[LDAP://{GPO_DN};0]")),
            ),
    );
    let pc = index.insert(Object::new(
        "CN=PC1,OU=Workstations,DC=example,DC=com",
        ObjectType::Computer,
    ));

    let build = build_ledger(&index, &default_rules());
    assert!(build
        .ledger
        .methods_between(gpo, pc)
        .is_some_and(|m| m.contains(Method::GpoAffectsComputer)));
}

#[test]
fn disabled_link_and_blocked_inheritance_are_skipped() {
    let index = ObjectIndex::new("DC=example,DC=com");
    let gpo = index.insert(Object::new(GPO_DN, ObjectType::GroupPolicyContainer));

    // Link type 1 is disabled
    index.insert(
        Object::new("OU=Disabled,DC=example,DC=com", ObjectType::OrganizationalUnit).with_attr(
            Attribute::GpLink,
            AttributeValue::Text(format!("[LDAP://{GPO_DN};1]")),
        ),
    );
    let disabled_pc = index.insert(Object::new(
        "CN=PC1,OU=Disabled,DC=example,DC=com",
        ObjectType::Computer,
    ));

    // gpOptions 1 on the computer blocks inheritance entirely
    index.insert(
        Object::new("OU=Blocked,DC=example,DC=com", ObjectType::OrganizationalUnit).with_attr(
            Attribute::GpLink,
            AttributeValue::Text(format!("[LDAP://{GPO_DN};0]")),
        ),
    );
    let blocked_pc = index.insert(
        Object::new("CN=PC2,OU=Blocked,DC=example,DC=com", ObjectType::Computer)
            .with_attr(Attribute::GpOptions, AttributeValue::Text("1".into())),
    );

    let build = build_ledger(&index, &default_rules());
    assert!(build.ledger.methods_between(gpo, disabled_pc).is_none());
    assert!(build.ledger.methods_between(gpo, blocked_pc).is_none());
}

#[test]
fn local_group_assignments_from_policy_files() {
    let index = ObjectIndex::new("DC=example,DC=com");
    let helpdesk_sid = sid("S-1-5-21-1-2-3-1107");
    let helpdesk = index.insert(
        Object::new("CN=Helpdesk,DC=example,DC=com", ObjectType::Group)
            .with_sid(helpdesk_sid.clone()),
    );
    let gpo = index.insert(Object::new(GPO_DN, ObjectType::GroupPolicyContainer));
    index.attach_gpo_facts(
        gpo,
        GpoFacts {
            local_groups: vec![
                LocalGroupFact {
                    group_sid: "S-1-5-32-544".into(),
                    member_sid: helpdesk_sid.as_str().into(),
                },
                LocalGroupFact {
                    group_sid: "S-1-5-32-555".into(),
                    member_sid: helpdesk_sid.as_str().into(),
                },
            ],
            ..Default::default()
        },
    );

    let build = build_ledger(&index, &default_rules());
    let methods = build.ledger.methods_between(helpdesk, gpo).unwrap();
    assert_eq!(methods.probability(Method::LocalAdminRights), Some(100));
    assert_eq!(methods.probability(Method::LocalRdpRights), Some(30));
    assert!(!methods.contains(Method::LocalDcomRights));
}

#[test]
fn machine_scripts_become_synthetic_objects() {
    let index = ObjectIndex::new("DC=example,DC=com");
    let gpo = index.insert(
        Object::new(GPO_DN, ObjectType::GroupPolicyContainer)
            .with_attr(Attribute::Name, AttributeValue::Text("Baseline".into())),
    );
    index.attach_gpo_facts(
        gpo,
        GpoFacts {
            scripts: vec![ScriptFact {
                phase: ScriptPhase::Startup,
                command: r"\\fs\share\deploy.bat".into(),
                parameters: "/quiet".into(),
            }],
            ..Default::default()
        },
    );

    let before = index.len();
    let build = build_ledger(&index, &default_rules());
    assert_eq!(index.len(), before + 1);

    let script = index
        .find_dn("CN=Startup Script 0 from GPO Baseline,CN=synthetic")
        .unwrap();
    assert_eq!(index.get(script).unwrap().object_type(), ObjectType::Script);
    assert!(build
        .ledger
        .methods_between(script, gpo)
        .is_some_and(|m| m.contains(Method::MachineScript)));
}

#[test]
fn gpo_config_containers_chain_to_policy() {
    let index = ObjectIndex::new("DC=example,DC=com");
    let gpo = index.insert(Object::new(GPO_DN, ObjectType::GroupPolicyContainer));
    let machine = index.insert(
        Object::new(format!("CN=Machine,{GPO_DN}"), ObjectType::Container)
            .with_attr(Attribute::Name, AttributeValue::Text("Machine".into())),
    );
    let user = index.insert(
        Object::new(format!("CN=User,{GPO_DN}"), ObjectType::Container)
            .with_attr(Attribute::Name, AttributeValue::Text("User".into())),
    );

    let build = build_ledger(&index, &default_rules());
    assert!(build
        .ledger
        .methods_between(gpo, machine)
        .is_some_and(|m| m.contains(Method::GpoMachineConfig)));
    assert!(build
        .ledger
        .methods_between(gpo, user)
        .is_some_and(|m| m.contains(Method::GpoUserConfig)));
}
