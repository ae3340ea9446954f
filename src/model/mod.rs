/*!
 * Model Module
 * Directory objects, identifiers and the arena-backed object index
 *
 * Objects and descriptors are built by an external loader and are read-only
 * for the analysis core; mutation is limited to marker attributes and
 * synthetic objects created by preprocessors.
 */

pub mod facts;
pub mod index;
pub mod object;
pub mod types;

pub use facts::{GpoFacts, LocalGroupFact, ScheduledTaskFact, ScriptFact, ScriptPhase};
pub use index::{ObjectIndex, ObjectSet, ATTACKER_DN};
pub use object::Object;
pub use types::{Attribute, AttributeValue, ModelError, ModelResult, ObjectId, ObjectType, Sid};
