//! STATE.md parsing.
//!
//! The phase line and the progress line have both been written in several
//! shapes over time. Each shape is an independent matcher; matchers run in a
//! fixed order and the first hit wins.

use crate::markdown::{dash_bullet, normalize_bold_labels, section_lines, unchecked_item};
use crate::{Concern, ProjectState, Todo};
use regex::Regex;

/// Sentinel authors write under an empty concerns heading.
const NO_CONCERNS_SENTINEL: &str = "none.";

/// Phase fields recovered from the `Phase:` line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhasePosition {
    pub current_phase: Option<String>,
    pub phase_number: Option<u32>,
    pub total_phases: Option<u32>,
    pub phase_name: Option<String>,
    pub milestone_complete: bool,
    pub milestone_version: Option<String>,
    pub phases_shipped: Option<u32>,
    pub phase_status: Option<String>,
}

pub type PhaseMatcher = fn(&str) -> Option<PhasePosition>;

pub const PHASE_MATCHERS: [PhaseMatcher; 5] = [
    match_phase_of_total,
    match_milestone_complete,
    match_not_started,
    match_numbered_title,
    match_any_phase,
];

pub type ProgressMatcher = fn(&str) -> Option<&str>;

pub const PROGRESS_MATCHERS: [ProgressMatcher; 4] = [
    match_labelled_bar,
    match_fraction_count,
    match_labelled_percent,
    match_bare_bar,
];

cached_regex!(
    phase_of_total_re,
    r"Phase:[ \t]*(\d+)[ \t]+of[ \t]+(\d+)[ \t]*\(([^)\n]+)\)"
);
cached_regex!(
    milestone_complete_re,
    r"Phase:[ \t]*(v[\d.]+)[ \t]+complete[ \t]*[-–—][ \t]*(\d+)[ \t]+of[ \t]+(\d+)[ \t]+phases?[ \t]+shipped"
);
cached_regex!(not_started_re, r"(?i)Phase:[ \t]*Not[ \t]+started");
cached_regex!(numbered_title_re, r"Phase:[ \t]*(\d+)[ \t]*[-–—][ \t]*(.+)");
cached_regex!(any_phase_re, r"Phase:[ \t]*(.+)");

cached_regex!(labelled_bar_re, r"Progress:[ \t]*\[[^\]\n]*\][ \t]*(\d+)%");
cached_regex!(fraction_count_re, r"(\d+)%[ \t]*\(\d+/\d+[ \t]+[^)\n]+\)");
cached_regex!(labelled_percent_re, r"Progress:[^\n]*?(\d+)%");
cached_regex!(bare_bar_re, r"\[[\x{2580}-\x{259F}■□#=\- ]+\][ \t]*(\d+)%");

cached_regex!(last_activity_re, r"Last activity:[ \t]*(.*)");
cached_regex!(avg_duration_re, r"Average duration:[ \t]*(.*)");
cached_regex!(status_re, r"Status:[ \t]*(.*)");

fn parse_count(raw: &str) -> Option<u32> {
    raw.parse().ok()
}

/// `Phase: 5 of 7 (Template Versioning)`
pub fn match_phase_of_total(content: &str) -> Option<PhasePosition> {
    let captures = phase_of_total_re().captures(content)?;
    let number = captures.get(1)?.as_str();
    let total = captures.get(2)?.as_str();
    let name = captures.get(3)?.as_str();

    Some(PhasePosition {
        current_phase: Some(format!("{number} of {total} ({name})")),
        phase_number: parse_count(number),
        total_phases: parse_count(total),
        phase_name: Some(name.to_string()),
        ..PhasePosition::default()
    })
}

/// `Phase: v1.0 complete — 7 of 7 phases shipped`
pub fn match_milestone_complete(content: &str) -> Option<PhasePosition> {
    let captures = milestone_complete_re().captures(content)?;
    let version = captures.get(1)?.as_str();

    Some(PhasePosition {
        current_phase: Some(format!("{version} complete")),
        total_phases: parse_count(captures.get(3)?.as_str()),
        milestone_complete: true,
        milestone_version: Some(version.to_string()),
        phases_shipped: parse_count(captures.get(2)?.as_str()),
        ..PhasePosition::default()
    })
}

/// `Phase: Not started`, any case.
pub fn match_not_started(content: &str) -> Option<PhasePosition> {
    not_started_re().find(content)?;
    Some(PhasePosition {
        current_phase: Some("Not started".to_string()),
        phase_status: Some("not_started".to_string()),
        ..PhasePosition::default()
    })
}

/// `Phase: 3 - MCP Server Integration`, with a hyphen, en dash or em dash.
pub fn match_numbered_title(content: &str) -> Option<PhasePosition> {
    let captures = numbered_title_re().captures(content)?;
    let number = captures.get(1)?.as_str();
    let name = captures.get(2)?.as_str().trim();

    Some(PhasePosition {
        current_phase: Some(format!("{number} - {name}")),
        phase_number: parse_count(number),
        phase_name: Some(name.to_string()),
        ..PhasePosition::default()
    })
}

/// Anything else after `Phase:`; only the summary text is kept.
pub fn match_any_phase(content: &str) -> Option<PhasePosition> {
    let captures = any_phase_re().captures(content)?;
    let rest = captures.get(1)?.as_str().trim();
    if rest.is_empty() {
        return None;
    }
    Some(PhasePosition {
        current_phase: Some(rest.to_string()),
        ..PhasePosition::default()
    })
}

pub fn parse_phase_position(content: &str) -> Option<PhasePosition> {
    PHASE_MATCHERS.iter().find_map(|matcher| matcher(content))
}

/// Leading digits of a phase summary: `3 of 5 - Polish` -> 3, `3 (Polish)` -> 3.
pub fn leading_phase_number(current_phase: &str) -> Option<u32> {
    let end = current_phase
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(current_phase.len());
    current_phase[..end].parse().ok()
}

fn first_capture<'a>(re: &Regex, content: &'a str) -> Option<&'a str> {
    re.captures(content)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// `Progress: [██████░░░░] 60%`
pub fn match_labelled_bar(content: &str) -> Option<&str> {
    first_capture(labelled_bar_re(), content)
}

/// `100% (16/16 plans completed)` or `38% (10/26 requirements)`
pub fn match_fraction_count(content: &str) -> Option<&str> {
    first_capture(fraction_count_re(), content)
}

/// `Progress: 3 of 5 phases (60%)`
pub fn match_labelled_percent(content: &str) -> Option<&str> {
    first_capture(labelled_percent_re(), content)
}

/// `[██████░░░░] 60%` with no label.
pub fn match_bare_bar(content: &str) -> Option<&str> {
    first_capture(bare_bar_re(), content)
}

/// Percentage from the first progress format that matches, clamped to 100.
/// Zero when nothing matches or the digits do not fit an integer.
pub fn parse_progress(content: &str) -> u8 {
    PROGRESS_MATCHERS
        .iter()
        .find_map(|matcher| matcher(content))
        .and_then(|digits| digits.parse::<u32>().ok())
        .map(|value| value.min(100) as u8)
        .unwrap_or(0)
}

fn trailing_text(re: &Regex, content: &str) -> Option<String> {
    let text = first_capture(re, content)?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn is_pending_todos_heading(title: &str) -> bool {
    title.to_lowercase().starts_with("pending todos")
}

fn is_concerns_heading(title: &str) -> bool {
    let compact: String = title
        .to_lowercase()
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .collect();
    compact.starts_with("blockers/concerns")
}

pub fn parse_state_todos(content: &str) -> Vec<Todo> {
    section_lines(content, is_pending_todos_heading)
        .into_iter()
        .filter_map(unchecked_item)
        .map(Todo::pending)
        .collect()
}

pub fn parse_concerns(content: &str) -> Vec<Concern> {
    section_lines(content, is_concerns_heading)
        .into_iter()
        .filter_map(dash_bullet)
        .filter(|text| !text.eq_ignore_ascii_case(NO_CONCERNS_SENTINEL))
        .map(|text| Concern {
            text: text.to_string(),
        })
        .collect()
}

/// Builds a [`ProjectState`] from STATE.md text. Never fails; anything the
/// document does not say is left absent or at its default.
pub fn parse_state(content: &str) -> ProjectState {
    let normalized = normalize_bold_labels(content);
    let content: &str = &normalized;

    let position = parse_phase_position(content).unwrap_or_default();
    let phase_status = position
        .phase_status
        .or_else(|| trailing_text(status_re(), content));

    ProjectState {
        current_phase: position.current_phase,
        phase_number: position.phase_number,
        total_phases: position.total_phases,
        phase_name: position.phase_name,
        milestone_complete: position.milestone_complete,
        milestone_version: position.milestone_version,
        phases_shipped: position.phases_shipped,
        progress_percent: parse_progress(content),
        last_activity: trailing_text(last_activity_re(), content),
        avg_duration: trailing_text(avg_duration_re(), content),
        phase_status,
        state_todos: parse_state_todos(content),
        concerns: parse_concerns(content),
    }
}
