/*!
 * Ledger Build
 * Runs every rule against every object, in two phases
 */

use log::debug;

use super::context::{AnalysisContext, ReplicationFacts};
use super::rules::{Rule, RulePhase};
use crate::ledger::{EdgeLedger, FrozenLedger, MembershipView};
use crate::model::ObjectIndex;

/// Completed ledger build: the frozen edge graph plus the auxiliary facts
/// the rules accumulated along the way.
pub struct LedgerBuild {
    /// Adjacency for path expansion
    pub frozen: FrozenLedger,
    /// Raw ledger, for per-pair method queries outside full expansion
    pub ledger: EdgeLedger,
    /// Transitive group-membership closure used during the build
    pub membership: MembershipView,
    /// DC-replication rights observed per trustee
    pub replication: ReplicationFacts,
}

/// Build the relationship ledger by running `rules` over every object in
/// the index exactly once.
///
/// Two phases: membership rules run first so that the ACL-dependent rules
/// can resolve group trustees transitively. The returned ledger is
/// immutable input to path expansion.
pub fn build_ledger(index: &ObjectIndex, rules: &[Rule]) -> LedgerBuild {
    let ledger = EdgeLedger::new();
    let replication = ReplicationFacts::new();
    let ids = index.all_ids();

    let membership_rules: Vec<&Rule> = rules
        .iter()
        .filter(|r| r.phase == RulePhase::Membership)
        .collect();
    let acl_rules: Vec<&Rule> = rules.iter().filter(|r| r.phase == RulePhase::Acl).collect();

    let empty = MembershipView::empty();
    {
        let ctx = AnalysisContext::new(index, &ledger, &empty, &replication);
        for rule in &membership_rules {
            for &id in &ids {
                (rule.analyze)(&ctx, id);
            }
        }
    }
    debug!(
        "Membership phase produced {} edges over {} objects",
        ledger.len(),
        ids.len()
    );

    let membership = MembershipView::from_ledger(&ledger);
    {
        let ctx = AnalysisContext::new(index, &ledger, &membership, &replication);
        for rule in &acl_rules {
            for &id in &ids {
                (rule.analyze)(&ctx, id);
            }
        }
    }
    debug!("Ledger build complete: {} edges", ledger.len());

    LedgerBuild {
        frozen: ledger.freeze(),
        ledger,
        membership,
        replication,
    }
}
