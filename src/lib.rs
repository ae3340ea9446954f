/*!
 * adgraph
 * Attack-path analysis for Active Directory snapshots
 *
 * The crate takes a loaded directory snapshot (objects with parsed security
 * descriptors), runs a rule set over every object to build a ledger of
 * "source can compromise target" edges, and expands bounded attack-path
 * graphs from a chosen set of target objects.
 *
 * Pipeline:
 * 1. Load objects into an [`model::ObjectIndex`]
 * 2. Build the edge ledger with [`analysis::build_ledger`]
 * 3. Expand paths with [`expansion::expand`]
 * 4. Export the resulting [`graph::AttackGraph`] as JSON
 */

pub mod analysis;
pub mod expansion;
pub mod graph;
pub mod ledger;
pub mod model;
pub mod security;

pub use analysis::{build_ledger, default_rules, AnalysisContext, LedgerBuild, Rule};
pub use expansion::{expand, Direction, ExpandOptions};
pub use graph::AttackGraph;
pub use ledger::{EdgeLedger, FrozenLedger, Method, MethodMask, MethodSet};
pub use model::{Object, ObjectId, ObjectIndex, ObjectSet, ObjectType, Sid};
pub use security::{AccessMask, Ace, SecurityDescriptor};
