/*!
 * Ledger Module
 * Compromise-method tags and the concurrent relationship ledger
 */

pub mod ledger;
pub mod methods;

pub use ledger::{EdgeLedger, FrozenLedger, MembershipView};
pub use methods::{Method, MethodMask, MethodSet};
