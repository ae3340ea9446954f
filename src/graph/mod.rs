/*!
 * Attack-Path Graph
 * Exported result of a path expansion, with JSON round-trip support
 */

use serde::{Deserialize, Serialize};

use crate::ledger::Method;
use crate::model::{ObjectId, ObjectType, Sid};

/// One method tag on an exported connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodProbability {
    pub method: Method,
    pub probability: u8,
}

/// One node of the exported graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: ObjectId,
    pub distinguished_name: String,
    pub sid: Option<Sid>,
    pub object_type: ObjectType,
    /// Present in the requested seed/target set
    pub target: bool,
    /// Edges dropped from this node by the fan-out cap
    pub can_expand: usize,
}

/// One directed connection, always pointing attacker -> victim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConnection {
    pub source: ObjectId,
    pub target: ObjectId,
    pub methods: Vec<MethodProbability>,
}

/// The exported attack-path graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackGraph {
    pub nodes: Vec<GraphNode>,
    pub connections: Vec<GraphConnection>,
}

impl AttackGraph {
    pub fn node(&self, id: ObjectId) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn connection(&self, source: ObjectId, target: ObjectId) -> Option<&GraphConnection> {
        self.connections
            .iter()
            .find(|c| c.source == source && c.target == target)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> AttackGraph {
        AttackGraph {
            nodes: vec![
                GraphNode {
                    id: ObjectId(1),
                    distinguished_name: "CN=Alice,DC=example,DC=com".into(),
                    sid: Some(Sid::parse("S-1-5-21-1-2-3-1104").unwrap()),
                    object_type: ObjectType::User,
                    target: false,
                    can_expand: 0,
                },
                GraphNode {
                    id: ObjectId(2),
                    distinguished_name: "CN=Admins,DC=example,DC=com".into(),
                    sid: Some(Sid::parse("S-1-5-21-1-2-3-512").unwrap()),
                    object_type: ObjectType::Group,
                    target: true,
                    can_expand: 3,
                },
            ],
            connections: vec![GraphConnection {
                source: ObjectId(1),
                target: ObjectId(2),
                methods: vec![
                    MethodProbability {
                        method: Method::AddMember,
                        probability: 100,
                    },
                    MethodProbability {
                        method: Method::WriteDacl,
                        probability: 100,
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_json_round_trip_is_isomorphic() {
        let graph = sample();
        let json = graph.to_json().unwrap();
        let restored = AttackGraph::from_json(&json).unwrap();
        assert_eq!(graph, restored);
    }

    #[test]
    fn test_lookup_helpers() {
        let graph = sample();
        assert!(graph.node(ObjectId(2)).unwrap().target);
        assert_eq!(graph.node(ObjectId(2)).unwrap().can_expand, 3);
        assert!(graph.connection(ObjectId(1), ObjectId(2)).is_some());
        assert!(graph.connection(ObjectId(2), ObjectId(1)).is_none());
    }
}
