/*!
 * Expansion Module
 * Round-based attack-path search over the frozen ledger
 */

pub mod engine;

pub use engine::{expand, Direction, ExpandOptions};
