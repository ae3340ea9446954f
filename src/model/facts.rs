/*!
 * Preprocessed Policy Facts
 * Typed facts the GPO file preprocessor attaches to policy objects
 *
 * Parsing of the underlying XML/INI policy files happens in the loader; the
 * core only consumes these already-typed facts.
 */

use serde::{Deserialize, Serialize};

/// One local-group membership assignment found in a GPO
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalGroupFact {
    /// Textual SID of the local group being populated (e.g. S-1-5-32-544)
    pub group_sid: String,
    /// Textual SID of the member being added
    pub member_sid: String,
}

/// Phase a GPO machine script runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptPhase {
    Startup,
    Shutdown,
}

/// One machine startup/shutdown script defined by a GPO
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptFact {
    pub phase: ScriptPhase,
    pub command: String,
    pub parameters: String,
}

/// One scheduled task defined by a GPO (informational only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTaskFact {
    pub name: String,
    pub command: String,
}

/// All preprocessed facts for one policy object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpoFacts {
    pub local_groups: Vec<LocalGroupFact>,
    pub scripts: Vec<ScriptFact>,
    pub scheduled_tasks: Vec<ScheduledTaskFact>,
}

impl GpoFacts {
    pub fn is_empty(&self) -> bool {
        self.local_groups.is_empty() && self.scripts.is_empty() && self.scheduled_tasks.is_empty()
    }
}
