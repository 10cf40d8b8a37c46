//! View-model derivations from a [`ProjectSnapshot`]. Nothing here touches the
//! terminal, so the rules for what gets highlighted or collapsed are tested
//! directly.

use crate::state::Tab;
use crate::theme;
use gsd_core::roadmap::phase_number_from_name;
use gsd_core::state_doc::leading_phase_number;
use gsd_core::{Phase, PhaseStatus, PlanDoc, ProjectSnapshot, ProjectState};

/// How many finished phases stay visible before the rest collapse; `None`
/// shows everything.
pub const EXPAND_LEVELS: [Option<usize>; 4] = [Some(3), Some(5), Some(10), None];

pub const NO_ROADMAP: &str = "No roadmap available.";
pub const NO_TODOS: &str = "No todos found.";
pub const NO_CONCERNS: &str = "No concerns.";

pub fn expand_label(level: Option<usize>) -> String {
    match level {
        Some(count) => count.to_string(),
        None => "All".to_string(),
    }
}

/// The phase the roadmap should highlight, with the status used to decide
/// whether it is still live.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseTarget {
    pub info: Option<String>,
    pub status: Option<String>,
}

impl PhaseTarget {
    pub fn number(&self) -> Option<u32> {
        self.info.as_deref().and_then(target_number)
    }

    fn is_complete(&self) -> bool {
        self.status.as_deref().map(mentions_complete).unwrap_or(false)
    }
}

fn mentions_complete(text: &str) -> bool {
    text.to_lowercase().contains("complete")
}

/// Once STATE.md reports the current phase complete, the next unfinished
/// roadmap phase becomes the target.
pub fn target_phase(state: &ProjectState, inferred: Option<&Phase>) -> PhaseTarget {
    let state_says_complete = state
        .phase_status
        .as_deref()
        .map(mentions_complete)
        .unwrap_or(false);

    match inferred {
        Some(phase) if state_says_complete => PhaseTarget {
            info: Some(phase.name.clone()),
            status: Some(PhaseStatus::InProgress.as_str().to_string()),
        },
        _ => PhaseTarget {
            info: state.current_phase.clone(),
            status: state.phase_status.clone(),
        },
    }
}

/// `6 of 7 (Template Versioning)` -> 6, `Phase 6: Template Versioning` -> 6.
pub fn target_number(info: &str) -> Option<u32> {
    leading_phase_number(info).or_else(|| phase_number_from_name(info))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadmapRow<'a> {
    pub icon: &'static str,
    pub name: &'a str,
    pub status: PhaseStatus,
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoadmapView<'a> {
    /// Leading finished phases folded into a single summary line.
    pub collapsed: usize,
    pub rows: Vec<RoadmapRow<'a>>,
}

impl RoadmapView<'_> {
    pub fn collapsed_label(&self) -> Option<String> {
        (self.collapsed > 0).then(|| {
            format!(
                "{} {} earlier phases completed",
                theme::icons::FINISHED,
                self.collapsed
            )
        })
    }
}

pub fn roadmap_view<'a>(
    phases: &'a [Phase],
    target: &PhaseTarget,
    max_visible: Option<usize>,
) -> RoadmapView<'a> {
    let leading_finished = phases
        .iter()
        .take_while(|phase| phase.status.is_finished())
        .count();
    let keep = max_visible.unwrap_or(leading_finished);
    let collapsed = leading_finished.saturating_sub(keep);

    let target_number = target.number();
    let target_complete = target.is_complete();

    let rows = phases
        .iter()
        .skip(collapsed)
        .map(|phase| {
            let matches_target = target_number.is_some() && phase.number() == target_number;
            RoadmapRow {
                icon: theme::status_icon(phase.status),
                name: phase.name.as_str(),
                status: phase.status,
                active: matches_target && !target_complete,
            }
        })
        .collect();

    RoadmapView { collapsed, rows }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub phase_line: String,
    pub progress: u8,
    pub last_activity: String,
}

pub fn stats_view(state: &ProjectState) -> StatsView {
    let (phase_line, progress) = if state.milestone_complete {
        let line = match &state.milestone_version {
            Some(version) => format!("Milestone {version} Complete!"),
            None => "Milestone Complete!".to_string(),
        };
        (line, 100)
    } else {
        let current = state.current_phase.as_deref().unwrap_or("N/A");
        (format!("Phase: {current}"), state.progress_percent.min(100))
    };

    StatsView {
        phase_line,
        progress,
        last_activity: format!(
            "Last Activity: {}",
            state.last_activity.as_deref().unwrap_or("N/A")
        ),
    }
}

pub fn plans_markdown(plans: &[PlanDoc]) -> String {
    plans
        .iter()
        .map(|plan| format!("# {}\n\n{}\n\n---\n\n", plan.name, plan.content))
        .collect()
}

/// Markdown body for a document tab, or its placeholder. The dashboard tab
/// has no document.
pub fn tab_document(tab: Tab, snapshot: &ProjectSnapshot) -> Option<String> {
    let docs = &snapshot.phase_docs;
    let text = match tab {
        Tab::Dashboard => return None,
        Tab::Summary => snapshot
            .latest_summary
            .clone()
            .unwrap_or_else(|| "*No summary found for current phase.*".to_string()),
        Tab::Context => docs
            .context
            .clone()
            .unwrap_or_else(|| "*No Context document found for current phase.*".to_string()),
        Tab::Research => docs
            .research
            .clone()
            .unwrap_or_else(|| "*No Research document found for current phase.*".to_string()),
        Tab::Plans if docs.plans.is_empty() => "*No Plans found for current phase.*".to_string(),
        Tab::Plans => plans_markdown(&docs.plans),
        Tab::Review => docs
            .verification
            .clone()
            .unwrap_or_else(|| "*No Verification document found for current phase.*".to_string()),
    };
    Some(text)
}
