/*!
 * Path Expansion Engine
 * Round-based bounded graph search over the frozen ledger
 */

use ahash::{AHashMap, AHashSet};
use log::debug;
use std::time::Instant;

use crate::graph::{AttackGraph, GraphConnection, GraphNode, MethodProbability};
use crate::ledger::{FrozenLedger, MethodMask, MethodSet};
use crate::model::{ObjectId, ObjectIndex, ObjectSet, ObjectType};

/// Which side of the ledger the frontier explores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Explore edges where frontier objects are compromise *targets*:
    /// answers "who can reach the targets"
    Forward,
    /// Explore edges where frontier objects are compromise *sources*:
    /// answers "what can the seeds reach"
    Reverse,
}

/// Parameters for one expansion run
#[derive(Debug, Clone)]
pub struct ExpandOptions {
    pub direction: Direction,
    /// When enabled, edges into already-seen earlier-round objects are kept
    pub backlinks: bool,
    /// Number of expansion rounds; 0 yields the seed nodes only
    pub max_depth: u32,
    /// Per-node surviving-edge cap; 0 = unlimited. Over the cap, only
    /// group-target edges are kept and the rest are counted on the node.
    pub max_outgoing: usize,
    /// Minimum of the max probability across an edge's surviving methods
    pub min_probability: u8,
    /// Methods the traversal may use
    pub methods: MethodMask,
    /// External cancellation deadline, checked at round boundaries only;
    /// mid-round work is allowed to complete
    pub deadline: Option<Instant>,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            direction: Direction::Forward,
            backlinks: false,
            max_depth: 99,
            max_outgoing: 0,
            min_probability: 0,
            methods: MethodMask::all(),
            deadline: None,
        }
    }
}

/// Expand attack paths from `seeds` over the frozen ledger.
///
/// Round-based: every frontier object is processed once per round and the
/// round counter only advances after the whole frontier is done, so
/// back-link decisions never depend on intra-round ordering. Exported
/// connections always point attacker -> victim regardless of direction.
pub fn expand(
    frozen: &FrozenLedger,
    index: &ObjectIndex,
    seeds: &ObjectSet,
    exclude: Option<&ObjectSet>,
    options: &ExpandOptions,
) -> AttackGraph {
    let attacker = index.attacker();

    // Object -> round it was processed in; 0 = reached but unprocessed
    let mut rounds: AHashMap<ObjectId, u32> = seeds.iter().map(|id| (id, 0)).collect();
    let mut connections: AHashMap<(ObjectId, ObjectId), MethodSet> = AHashMap::new();
    let mut can_expand: AHashMap<ObjectId, usize> = AHashMap::new();

    let mut round: u32 = 1;
    let mut progressed = true;
    while progressed && round <= options.max_depth {
        if let Some(deadline) = options.deadline {
            if Instant::now() >= deadline {
                debug!("Expansion deadline reached at round {round}");
                break;
            }
        }
        progressed = false;

        let mut frontier: Vec<ObjectId> = rounds
            .iter()
            .filter(|(_, processed)| **processed == 0)
            .map(|(id, _)| *id)
            .collect();
        frontier.sort_unstable();
        debug!(
            "Processing round {round} with {} total objects, {} unprocessed",
            rounds.len(),
            frontier.len()
        );

        let mut newly_reached: AHashSet<ObjectId> = AHashSet::new();
        for object in frontier {
            progressed = true;

            let neighbors = match options.direction {
                Direction::Forward => frozen.incoming(object),
                Direction::Reverse => frozen.outgoing(object),
            };

            let mut survivors: Vec<(ObjectId, MethodSet)> = Vec::new();
            for (next, methods) in neighbors {
                let detected = methods.intersect(options.methods);
                if detected.is_empty() || detected.is_only_deny_indicator() {
                    // Nothing usable, or just a deny indicator
                    continue;
                }
                let filtered = methods.filtered(detected);
                if filtered.max_probability() < options.min_probability {
                    continue;
                }
                if exclude.is_some_and(|set| set.contains(*next)) {
                    continue;
                }
                // Edges toward the attacker are always interesting; otherwise
                // drop links back into earlier rounds unless requested
                if *next != attacker && !options.backlinks {
                    if let Some(&processed) = rounds.get(next) {
                        if processed != 0 && processed < round {
                            continue;
                        }
                    }
                }
                survivors.push((*next, filtered));
            }

            if options.max_outgoing == 0 || survivors.len() <= options.max_outgoing {
                for (next, methods) in survivors {
                    connections.insert((object, next), methods);
                    if !rounds.contains_key(&next) {
                        newly_reached.insert(next);
                    }
                }
            } else {
                debug!(
                    "Outgoing expansion limit hit for object {:?}, {} connections",
                    object,
                    survivors.len()
                );
                // Groups are assumed few enough to always expand
                let total = survivors.len();
                let mut kept = 0usize;
                for (next, methods) in survivors {
                    let is_group = index
                        .get(next)
                        .map_or(false, |o| o.object_type() == ObjectType::Group);
                    if is_group {
                        connections.insert((object, next), methods);
                        if !rounds.contains_key(&next) {
                            newly_reached.insert(next);
                        }
                        kept += 1;
                    }
                }
                can_expand.insert(object, total - kept);
            }
            rounds.insert(object, round);
        }

        debug!("Round {round} yielded {} new objects", newly_reached.len());
        for id in newly_reached {
            rounds.insert(id, 0);
        }
        round += 1;
    }

    materialize(index, seeds, options, rounds, connections, can_expand)
}

fn materialize(
    index: &ObjectIndex,
    seeds: &ObjectSet,
    options: &ExpandOptions,
    rounds: AHashMap<ObjectId, u32>,
    connections: AHashMap<(ObjectId, ObjectId), MethodSet>,
    can_expand: AHashMap<ObjectId, usize>,
) -> AttackGraph {
    let mut graph_connections: Vec<GraphConnection> = connections
        .into_iter()
        .map(|((from, to), methods)| {
            // In forward mode the traversal walked victim -> attacker; swap
            // so the export always points attacker -> victim
            let (source, target) = match options.direction {
                Direction::Forward => (to, from),
                Direction::Reverse => (from, to),
            };
            GraphConnection {
                source,
                target,
                methods: methods
                    .iter()
                    .map(|(method, probability)| MethodProbability {
                        method,
                        probability,
                    })
                    .collect(),
            }
        })
        .collect();
    graph_connections.sort_unstable_by_key(|c| (c.source, c.target));

    let mut graph_nodes: Vec<GraphNode> = rounds
        .keys()
        .filter_map(|&id| {
            let object = index.get(id)?;
            Some(GraphNode {
                id,
                distinguished_name: object.dn().to_string(),
                sid: object.sid().cloned(),
                object_type: object.object_type(),
                target: seeds.contains(id),
                can_expand: can_expand.get(&id).copied().unwrap_or(0),
            })
        })
        .collect();
    graph_nodes.sort_unstable_by_key(|n| n.id);

    AttackGraph {
        nodes: graph_nodes,
        connections: graph_connections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{EdgeLedger, Method};
    use crate::model::{Object, ObjectSet};

    fn index_with(n: u32) -> ObjectIndex {
        let index = ObjectIndex::new("DC=example,DC=com");
        for i in 0..n {
            index.insert(Object::new(
                format!("CN=Object{i},DC=example,DC=com"),
                ObjectType::User,
            ));
        }
        index
    }

    fn seeds(ids: &[ObjectId]) -> ObjectSet {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_zero_depth_returns_seeds_only() {
        let index = index_with(3);
        let ledger = EdgeLedger::new();
        ledger.record(ObjectId(1), ObjectId(2), Method::GenericAll, 100);

        let graph = expand(
            &ledger.freeze(),
            &index,
            &seeds(&[ObjectId(2)]),
            None,
            &ExpandOptions {
                max_depth: 0,
                ..Default::default()
            },
        );
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.nodes[0].id, ObjectId(2));
        assert!(graph.nodes[0].target);
        assert!(graph.connections.is_empty());
    }

    #[test]
    fn test_forward_swaps_to_attacker_victim() {
        let index = index_with(3);
        let ledger = EdgeLedger::new();
        // 1 can compromise 2
        ledger.record(ObjectId(1), ObjectId(2), Method::GenericAll, 100);

        let graph = expand(
            &ledger.freeze(),
            &index,
            &seeds(&[ObjectId(2)]),
            None,
            &ExpandOptions {
                direction: Direction::Forward,
                max_depth: 1,
                ..Default::default()
            },
        );
        // Exported edge points attacker -> victim
        assert!(graph.connection(ObjectId(1), ObjectId(2)).is_some());
        assert!(graph.node(ObjectId(1)).is_some());
    }

    #[test]
    fn test_reverse_walks_outgoing_edges() {
        let index = index_with(4);
        let ledger = EdgeLedger::new();
        ledger.record(ObjectId(1), ObjectId(2), Method::Owns, 100);
        ledger.record(ObjectId(2), ObjectId(3), Method::Owns, 100);

        let graph = expand(
            &ledger.freeze(),
            &index,
            &seeds(&[ObjectId(1)]),
            None,
            &ExpandOptions {
                direction: Direction::Reverse,
                max_depth: 2,
                ..Default::default()
            },
        );
        assert!(graph.connection(ObjectId(1), ObjectId(2)).is_some());
        assert!(graph.connection(ObjectId(2), ObjectId(3)).is_some());
    }

    #[test]
    fn test_method_filter_and_deny_indicator() {
        let index = index_with(3);
        let ledger = EdgeLedger::new();
        ledger.record(ObjectId(1), ObjectId(2), Method::AclContainsDeny, 0);
        ledger.record(ObjectId(1), ObjectId(2), Method::WriteDacl, 100);

        // Only the deny indicator enabled: edge must not traverse
        let graph = expand(
            &ledger.freeze(),
            &index,
            &seeds(&[ObjectId(2)]),
            None,
            &ExpandOptions {
                max_depth: 1,
                methods: MethodMask::none().with(Method::AclContainsDeny),
                ..Default::default()
            },
        );
        assert!(graph.connections.is_empty());

        // WriteDacl enabled: traverses, and the exported connection carries
        // only the enabled method
        let graph = expand(
            &ledger.freeze(),
            &index,
            &seeds(&[ObjectId(2)]),
            None,
            &ExpandOptions {
                max_depth: 1,
                methods: MethodMask::none().with(Method::WriteDacl),
                ..Default::default()
            },
        );
        let connection = graph.connection(ObjectId(1), ObjectId(2)).unwrap();
        assert_eq!(connection.methods.len(), 1);
        assert_eq!(connection.methods[0].method, Method::WriteDacl);
    }

    #[test]
    fn test_min_probability_filter() {
        let index = index_with(3);
        let ledger = EdgeLedger::new();
        ledger.record(ObjectId(1), ObjectId(2), Method::WriteSpn, 30);

        let graph = expand(
            &ledger.freeze(),
            &index,
            &seeds(&[ObjectId(2)]),
            None,
            &ExpandOptions {
                max_depth: 1,
                min_probability: 50,
                ..Default::default()
            },
        );
        assert!(graph.connections.is_empty());
    }

    #[test]
    fn test_exclude_set() {
        let index = index_with(3);
        let ledger = EdgeLedger::new();
        ledger.record(ObjectId(1), ObjectId(2), Method::Owns, 100);

        let graph = expand(
            &ledger.freeze(),
            &index,
            &seeds(&[ObjectId(2)]),
            Some(&seeds(&[ObjectId(1)])),
            &ExpandOptions {
                max_depth: 2,
                ..Default::default()
            },
        );
        assert!(graph.connections.is_empty());
        assert!(graph.node(ObjectId(1)).is_none());
    }

    #[test]
    fn test_backlink_suppression_and_attacker_exemption() {
        let attacker = ObjectId(0);
        let index = index_with(4);
        let ledger = EdgeLedger::new();
        // 2 -> seed 1 (round 1), 3 -> 2 (round 2), and 1 -> 3 would point
        // back into round-1 territory
        ledger.record(ObjectId(2), ObjectId(1), Method::Owns, 100);
        ledger.record(ObjectId(3), ObjectId(2), Method::Owns, 100);
        ledger.record(ObjectId(1), ObjectId(3), Method::Owns, 100);
        // Attacker edge from 3's frontier position
        ledger.record(attacker, ObjectId(3), Method::HasSpnNoPreauth, 50);

        let options = ExpandOptions {
            direction: Direction::Forward,
            max_depth: 5,
            ..Default::default()
        };
        let graph = expand(&ledger.freeze(), &index, &seeds(&[ObjectId(1)]), None, &options);

        // 3 is processed at round 3; its incoming edge from 1 (processed
        // round 1) is a back-link and must be dropped
        assert!(graph.connection(ObjectId(1), ObjectId(3)).is_none());
        // Edges toward the attacker are always recorded
        assert!(graph.connection(attacker, ObjectId(3)).is_some());

        // With back-links enabled the dropped edge appears
        let graph = expand(
            &ledger.freeze(),
            &index,
            &seeds(&[ObjectId(1)]),
            None,
            &ExpandOptions {
                backlinks: true,
                ..options
            },
        );
        assert!(graph.connection(ObjectId(1), ObjectId(3)).is_some());
    }

    #[test]
    fn test_fanout_cap_keeps_groups_and_counts_drops() {
        let index = ObjectIndex::new("DC=example,DC=com");
        // id 1: the capped victim; ids 2-4 users, id 5 a group
        for i in 1..=4 {
            index.insert(Object::new(
                format!("CN=Object{i},DC=example,DC=com"),
                ObjectType::User,
            ));
        }
        let group = index.insert(Object::new("CN=Group,DC=example,DC=com", ObjectType::Group));

        let ledger = EdgeLedger::new();
        for i in 2..=4 {
            ledger.record(ObjectId(i), ObjectId(1), Method::GenericAll, 100);
        }
        ledger.record(group, ObjectId(1), Method::GenericAll, 100);

        let graph = expand(
            &ledger.freeze(),
            &index,
            &seeds(&[ObjectId(1)]),
            None,
            &ExpandOptions {
                direction: Direction::Forward,
                max_depth: 1,
                max_outgoing: 2,
                ..Default::default()
            },
        );

        // Only the group edge survives; three non-group edges were dropped
        assert_eq!(graph.connections.len(), 1);
        assert!(graph.connection(group, ObjectId(1)).is_some());
        assert_eq!(graph.node(ObjectId(1)).unwrap().can_expand, 3);
        assert!(graph.node(ObjectId(2)).is_none());
    }

    #[test]
    fn test_at_cap_keeps_everything() {
        let index = index_with(4);
        let ledger = EdgeLedger::new();
        ledger.record(ObjectId(1), ObjectId(3), Method::Owns, 100);
        ledger.record(ObjectId(2), ObjectId(3), Method::Owns, 100);

        let graph = expand(
            &ledger.freeze(),
            &index,
            &seeds(&[ObjectId(3)]),
            None,
            &ExpandOptions {
                direction: Direction::Forward,
                max_depth: 1,
                max_outgoing: 2,
                ..Default::default()
            },
        );
        assert_eq!(graph.connections.len(), 2);
        assert_eq!(graph.node(ObjectId(3)).unwrap().can_expand, 0);
    }
}
