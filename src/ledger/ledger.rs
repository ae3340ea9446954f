/*!
 * Edge Ledger
 * Concurrent per-pair storage of compromise methods and probabilities
 */

use ahash::{AHashMap, AHashSet, RandomState};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::methods::{Method, MethodSet};
use crate::model::ObjectId;

#[derive(Debug, Clone)]
struct EdgeEntry {
    methods: MethodSet,
    seq: u64,
}

/// Ledger of "source can compromise target" edges under construction.
///
/// Keyed by the ordered pair of object ids; tags accumulate per pair and a
/// pair with zero tags is never stored. Insertion is safe from concurrent
/// rule invocations analyzing different objects.
pub struct EdgeLedger {
    edges: DashMap<(ObjectId, ObjectId), EdgeEntry, RandomState>,
    seq: AtomicU64,
}

impl EdgeLedger {
    pub fn new() -> Self {
        Self {
            edges: DashMap::with_hasher(RandomState::new()),
            seq: AtomicU64::new(0),
        }
    }

    /// Record that `source` can compromise `target` via `method`.
    ///
    /// Idempotent per (pair, method); a later call with a different
    /// probability overwrites only that method's probability.
    pub fn record(&self, source: ObjectId, target: ObjectId, method: Method, probability: u8) {
        self.edges
            .entry((source, target))
            .or_insert_with(|| EdgeEntry {
                methods: MethodSet::new(),
                seq: self.seq.fetch_add(1, Ordering::Relaxed),
            })
            .methods
            .set(method, probability);
    }

    /// Accumulated methods between a pair, if any edge exists
    pub fn methods_between(&self, source: ObjectId, target: ObjectId) -> Option<MethodSet> {
        self.edges.get(&(source, target)).map(|e| e.methods)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// All edges in insertion order, for deterministic inspection
    pub fn edges(&self) -> Vec<(ObjectId, ObjectId, MethodSet)> {
        let mut edges: Vec<(u64, ObjectId, ObjectId, MethodSet)> = self
            .edges
            .iter()
            .map(|e| {
                let (source, target) = *e.key();
                (e.seq, source, target, e.methods)
            })
            .collect();
        edges.sort_unstable_by_key(|e| e.0);
        edges.into_iter().map(|(_, s, t, m)| (s, t, m)).collect()
    }

    /// Freeze into immutable adjacency for path expansion
    pub fn freeze(&self) -> FrozenLedger {
        let mut forward: AHashMap<ObjectId, Vec<(ObjectId, MethodSet)>> = AHashMap::new();
        let mut reverse: AHashMap<ObjectId, Vec<(ObjectId, MethodSet)>> = AHashMap::new();
        for entry in self.edges.iter() {
            let (source, target) = *entry.key();
            forward.entry(source).or_default().push((target, entry.methods));
            reverse.entry(target).or_default().push((source, entry.methods));
        }
        // Sorted per node so traversal never depends on map iteration order
        for list in forward.values_mut().chain(reverse.values_mut()) {
            list.sort_unstable_by_key(|(id, _)| *id);
        }
        FrozenLedger { forward, reverse }
    }
}

impl Default for EdgeLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable adjacency view of a completed ledger build
pub struct FrozenLedger {
    forward: AHashMap<ObjectId, Vec<(ObjectId, MethodSet)>>,
    reverse: AHashMap<ObjectId, Vec<(ObjectId, MethodSet)>>,
}

impl FrozenLedger {
    /// Edges where `id` is the compromising side, sorted by target id
    pub fn outgoing(&self, id: ObjectId) -> &[(ObjectId, MethodSet)] {
        self.forward.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Edges where `id` is the compromised side, sorted by source id
    pub fn incoming(&self, id: ObjectId) -> &[(ObjectId, MethodSet)] {
        self.reverse.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edge_count(&self) -> usize {
        self.forward.values().map(Vec::len).sum()
    }
}

/// Transitive group-membership closure, derived from the phase-one ledger's
/// member-of edges and consumed by the access decision engine.
pub struct MembershipView {
    groups: AHashMap<ObjectId, Vec<ObjectId>>,
}

impl MembershipView {
    /// View with no membership facts, for the phase-one rules themselves
    pub fn empty() -> Self {
        Self {
            groups: AHashMap::new(),
        }
    }

    /// Build the closure from every `MemberOfGroup` edge in the ledger
    pub fn from_ledger(ledger: &EdgeLedger) -> Self {
        let mut direct: AHashMap<ObjectId, Vec<ObjectId>> = AHashMap::new();
        for (member, group, methods) in ledger.edges() {
            if methods.contains(Method::MemberOfGroup) {
                direct.entry(member).or_default().push(group);
            }
        }

        let mut groups: AHashMap<ObjectId, Vec<ObjectId>> = AHashMap::new();
        for &member in direct.keys() {
            let mut seen: AHashSet<ObjectId> = AHashSet::new();
            let mut queue: Vec<ObjectId> = direct.get(&member).cloned().unwrap_or_default();
            while let Some(group) = queue.pop() {
                if seen.insert(group) {
                    if let Some(parents) = direct.get(&group) {
                        queue.extend(parents.iter().copied());
                    }
                }
            }
            let mut closure: Vec<ObjectId> = seen.into_iter().collect();
            closure.sort_unstable();
            groups.insert(member, closure);
        }
        Self { groups }
    }

    /// All groups `id` is transitively a member of
    pub fn groups_of(&self, id: ObjectId) -> &[ObjectId] {
        self.groups.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_member_of(&self, id: ObjectId, group: ObjectId) -> bool {
        self.groups_of(id).binary_search(&group).is_ok()
    }
}
