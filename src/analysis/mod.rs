/*!
 * Analysis Module
 * Rule framework, the default rule set and the two-phase ledger build
 */

pub mod build;
pub mod context;
pub mod rules;

pub use build::{build_ledger, LedgerBuild};
pub use context::{AnalysisContext, ReplicationFacts, ReplicationRights};
pub use rules::{default_rules, Rule, RulePhase};
