/// Declares `fn $name() -> &'static Regex`, compiled once on first use.
macro_rules! cached_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static ::regex::Regex {
            static RE: ::std::sync::OnceLock<::regex::Regex> = ::std::sync::OnceLock::new();
            RE.get_or_init(|| ::regex::Regex::new($pattern).expect("valid regex"))
        }
    };
}

pub mod error;
pub mod markdown;
pub mod phase_docs;
pub mod planning;
pub mod project;
pub mod roadmap;
pub mod state_doc;
pub mod todos;

pub use error::PlanningError;
pub use planning::PlanningRoot;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Pending,
    InProgress,
    Completed,
    Shipped,
}

impl Default for PhaseStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl PhaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseStatus::Pending => "pending",
            PhaseStatus::InProgress => "in_progress",
            PhaseStatus::Completed => "completed",
            PhaseStatus::Shipped => "shipped",
        }
    }

    /// Only `Completed` counts as done when inferring the active phase;
    /// shipped milestone records still count as open.
    pub fn is_completed(&self) -> bool {
        matches!(self, PhaseStatus::Completed)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, PhaseStatus::Completed | PhaseStatus::Shipped)
    }
}

impl fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhaseStatus {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_lowercase();
        match normalized.as_str() {
            "pending" => Ok(PhaseStatus::Pending),
            "in_progress" | "in-progress" | "inprogress" => Ok(PhaseStatus::InProgress),
            "completed" | "complete" | "done" => Ok(PhaseStatus::Completed),
            "shipped" => Ok(PhaseStatus::Shipped),
            other => Err(format!("Unknown phase status: {other}")),
        }
    }
}

/// One roadmap entry. Checkbox and table rows are named `Phase <N>: <title>`;
/// shipped milestones are named `<version> <name>` and carry `version`/`phases`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Phase {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: PhaseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phases: Option<String>,
}

impl Phase {
    pub fn new(name: impl Into<String>, description: impl Into<String>, status: PhaseStatus) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            status,
            version: None,
            phases: None,
        }
    }

    pub fn number(&self) -> Option<u32> {
        roadmap::phase_number_from_name(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub text: String,
    pub checked: bool,
}

impl Todo {
    pub fn pending(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            checked: false,
        }
    }

    pub fn done(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            checked: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Concern {
    pub text: String,
}

/// A checkbox line from the `### Active` section of PROJECT.md.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActiveTask {
    pub text: String,
    pub checked: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectInfo {
    #[serde(default)]
    pub active_tasks: Vec<ActiveTask>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Roadmap {
    #[serde(default)]
    pub phases: Vec<Phase>,
}

impl Roadmap {
    pub fn active_phase(&self) -> Option<&Phase> {
        roadmap::infer_active_phase(&self.phases)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_phase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_phases: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_name: Option<String>,
    #[serde(default)]
    pub milestone_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phases_shipped: Option<u32>,
    #[serde(default)]
    pub progress_percent: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_status: Option<String>,
    #[serde(default)]
    pub state_todos: Vec<Todo>,
    #[serde(default)]
    pub concerns: Vec<Concern>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanDoc {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhaseDocs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plans: Vec<PlanDoc>,
}

impl PhaseDocs {
    pub fn is_empty(&self) -> bool {
        self.context.is_none()
            && self.research.is_none()
            && self.verification.is_none()
            && self.plans.is_empty()
    }
}

/// Everything the dashboard shows, re-read from disk on every call to
/// [`PlanningRoot::snapshot`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectSnapshot {
    pub project: ProjectInfo,
    pub roadmap: Roadmap,
    pub state: ProjectState,
    pub phase_docs: PhaseDocs,
    pub pending_todos: Vec<Todo>,
    pub completed_todos: Vec<Todo>,
    pub concerns: Vec<Concern>,
    pub latest_summary: Option<String>,
    pub inferred_active_phase: Option<Phase>,
    /// Documents that existed but could not be read; each degraded to its default.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
}

impl ProjectSnapshot {
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
