/*!
 * Analysis Context
 * Shared state handed to every rule invocation
 */

use ahash::RandomState;
use dashmap::DashMap;

use crate::ledger::{EdgeLedger, MembershipView, Method};
use crate::model::{ObjectId, ObjectIndex};
use crate::security::AccessEngine;

/// DC-replication rights observed for one trustee.
///
/// The three rights are kept as separate facts and never combined into a
/// composite edge; downstream consumers decide what a complete set means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplicationRights {
    pub get_changes: bool,
    pub get_changes_all: bool,
    pub synchronize: bool,
}

/// Per-trustee accumulator for DC-replication rights
pub struct ReplicationFacts {
    facts: DashMap<ObjectId, ReplicationRights, RandomState>,
}

impl ReplicationFacts {
    pub fn new() -> Self {
        Self {
            facts: DashMap::with_hasher(RandomState::new()),
        }
    }

    pub fn mark_get_changes(&self, trustee: ObjectId) {
        self.facts.entry(trustee).or_default().get_changes = true;
    }

    pub fn mark_get_changes_all(&self, trustee: ObjectId) {
        self.facts.entry(trustee).or_default().get_changes_all = true;
    }

    pub fn mark_synchronize(&self, trustee: ObjectId) {
        self.facts.entry(trustee).or_default().synchronize = true;
    }

    pub fn get(&self, trustee: ObjectId) -> Option<ReplicationRights> {
        self.facts.get(&trustee).map(|r| *r)
    }

    /// All trustees with observed rights, sorted by id
    pub fn all(&self) -> Vec<(ObjectId, ReplicationRights)> {
        let mut all: Vec<(ObjectId, ReplicationRights)> =
            self.facts.iter().map(|e| (*e.key(), *e.value())).collect();
        all.sort_unstable_by_key(|(id, _)| *id);
        all
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

impl Default for ReplicationFacts {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-mostly state shared by every rule invocation in a build pass.
///
/// Rules read the index and membership view, and write only through
/// [`record`](Self::record), the replication accumulator and the index's
/// synthetic/marker operations.
pub struct AnalysisContext<'a> {
    pub index: &'a ObjectIndex,
    ledger: &'a EdgeLedger,
    membership: &'a MembershipView,
    replication: &'a ReplicationFacts,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(
        index: &'a ObjectIndex,
        ledger: &'a EdgeLedger,
        membership: &'a MembershipView,
        replication: &'a ReplicationFacts,
    ) -> Self {
        Self {
            index,
            ledger,
            membership,
            replication,
        }
    }

    /// Record that `source` can compromise `target` via `method`
    pub fn record(&self, source: ObjectId, target: ObjectId, method: Method, probability: u8) {
        self.ledger.record(source, target, method, probability);
    }

    /// Access decision engine bound to this pass's membership facts
    pub fn access(&self) -> AccessEngine<'a> {
        AccessEngine::new(self.index, self.membership)
    }

    pub fn replication(&self) -> &ReplicationFacts {
        self.replication
    }
}
