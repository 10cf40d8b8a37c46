//! ROADMAP.md parsing.
//!
//! Roadmaps drift between three line formats, sometimes within one file:
//!
//! ```text
//! - [x] **Phase 1: Setup** - Initial setup
//! - SHIPPED **v1.0 Parser Stabilization** — Phases 1-7
//! | 1. Foundation | v1.0 | 3/3 | Complete |
//! ```
//!
//! Each format is a [`PhaseLineParser`]; every line is offered to the parsers
//! in that order and the first match wins.

use crate::{Phase, PhaseStatus};

pub trait PhaseLineParser {
    fn parse_line(&self, line: &str) -> Option<Phase>;
}

/// `- [x] **Phase 1.1: Title** - description`
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckboxLine;

/// `- SHIPPED **v1.0 Name** — Phases 1-7`
#[derive(Debug, Clone, Copy, Default)]
pub struct ShippedLine;

/// `| 1. Title | ... | Complete |` or `| 1 - Title | ✓ Complete | ... |`
#[derive(Debug, Clone, Copy, Default)]
pub struct TableRow;

pub const DEFAULT_PARSERS: [&dyn PhaseLineParser; 3] = [&CheckboxLine, &ShippedLine, &TableRow];

cached_regex!(
    checkbox_re,
    r"^- \[(?P<status>.)\]\s*\*\*(?P<name>Phase\s+[\d.]+:.*?)\*\*(?:\s*[-–—]\s*(?P<desc>.*))?$"
);
cached_regex!(
    shipped_re,
    r"^- SHIPPED\s+\*\*(?P<version>v[\d.]+)\s+(?P<name>.*?)\*\*\s*[-–—]\s*Phases?\s*(?P<phases>[\d\-–,\s]+)"
);
cached_regex!(table_dot_re, r"^(\d+)\.\s*(.+)$");
cached_regex!(table_dash_re, r"^(\d+)\s*[-–—]\s*(.+)$");
cached_regex!(phase_number_re, r"Phase\s+(\d+)");

/// Anything other than `x`, `X` or `/` reads as pending.
pub fn checkbox_status(status: char) -> PhaseStatus {
    match status {
        'x' | 'X' => PhaseStatus::Completed,
        '/' => PhaseStatus::InProgress,
        _ => PhaseStatus::Pending,
    }
}

/// Status keywords can sit in any column, so every cell is scanned.
pub fn table_status<S: AsRef<str>>(cells: &[S]) -> PhaseStatus {
    let lowered: Vec<String> = cells
        .iter()
        .map(|cell| cell.as_ref().to_lowercase())
        .collect();

    let completed = lowered
        .iter()
        .any(|cell| cell.contains("complete") || cell.contains("shipped") || cell.contains('✓'));
    if completed {
        return PhaseStatus::Completed;
    }

    let active = lowered
        .iter()
        .any(|cell| cell.contains("progress") || cell.contains("active"));
    if active {
        return PhaseStatus::InProgress;
    }

    PhaseStatus::Pending
}

impl PhaseLineParser for CheckboxLine {
    fn parse_line(&self, line: &str) -> Option<Phase> {
        let captures = checkbox_re().captures(line)?;
        let status = captures
            .name("status")
            .and_then(|m| m.as_str().chars().next())
            .map(checkbox_status)
            .unwrap_or_default();
        let name = captures.name("name")?.as_str().trim();
        let description = captures
            .name("desc")
            .map(|m| m.as_str().trim())
            .unwrap_or_default();

        Some(Phase::new(name, description, status))
    }
}

impl PhaseLineParser for ShippedLine {
    fn parse_line(&self, line: &str) -> Option<Phase> {
        let captures = shipped_re().captures(line)?;
        let version = captures.name("version")?.as_str();
        let name = captures.name("name")?.as_str().trim();
        let phases = captures.name("phases")?.as_str().trim();

        Some(Phase {
            name: format!("{version} {name}"),
            description: format!("Phases {phases}"),
            status: PhaseStatus::Shipped,
            version: Some(version.to_string()),
            phases: Some(phases.to_string()),
        })
    }
}

impl PhaseLineParser for TableRow {
    fn parse_line(&self, line: &str) -> Option<Phase> {
        if !line.starts_with('|') {
            return None;
        }

        let cells: Vec<&str> = line
            .split('|')
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
            .collect();
        if cells.len() < 3 {
            return None;
        }

        let first = cells[0];
        if first.to_lowercase().contains("phase") || first.starts_with('-') {
            return None;
        }

        let captures = table_dot_re()
            .captures(first)
            .or_else(|| table_dash_re().captures(first))?;
        let number = captures.get(1)?.as_str();
        let title = captures.get(2)?.as_str().trim();

        Some(Phase::new(
            format!("Phase {number}: {title}"),
            "",
            table_status(&cells[1..]),
        ))
    }
}

pub fn parse_roadmap(content: &str) -> Vec<Phase> {
    parse_roadmap_with(content, &DEFAULT_PARSERS)
}

pub fn parse_roadmap_with(content: &str, parsers: &[&dyn PhaseLineParser]) -> Vec<Phase> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| parsers.iter().find_map(|parser| parser.parse_line(line)))
        .collect()
}

/// First phase that is not completed, in roadmap order. Shipped milestone
/// records count as not completed.
pub fn infer_active_phase(phases: &[Phase]) -> Option<&Phase> {
    phases.iter().find(|phase| !phase.status.is_completed())
}

/// Integer part of the `Phase <N>` in a phase name (`Phase 1.1: x` gives 1).
pub fn phase_number_from_name(name: &str) -> Option<u32> {
    phase_number_re()
        .captures(name)
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses(phases: &[Phase]) -> Vec<PhaseStatus> {
        phases.iter().map(|phase| phase.status).collect()
    }

    #[test]
    fn checkbox_completed_with_description() {
        let phase = CheckboxLine
            .parse_line("- [x] **Phase 1: Setup** - Initial setup")
            .expect("checkbox phase");
        assert_eq!(phase.name, "Phase 1: Setup");
        assert_eq!(phase.description, "Initial setup");
        assert_eq!(phase.status, PhaseStatus::Completed);
        assert_eq!(phase.version, None);
    }

    #[test]
    fn checkbox_without_description() {
        let phase = CheckboxLine
            .parse_line("- [ ] **Phase 2: Implementation**")
            .expect("checkbox phase");
        assert_eq!(phase.name, "Phase 2: Implementation");
        assert_eq!(phase.description, "");
        assert_eq!(phase.status, PhaseStatus::Pending);
    }

    #[test]
    fn checkbox_decimal_and_extra_whitespace() {
        let decimal = CheckboxLine
            .parse_line("- [X] **Phase 1.1: Hotfix** - Emergency fix")
            .expect("decimal phase");
        assert_eq!(decimal.name, "Phase 1.1: Hotfix");
        assert_eq!(decimal.status, PhaseStatus::Completed);
        assert_eq!(decimal.number(), Some(1));

        let spaced = CheckboxLine
            .parse_line("- [x]  **Phase 1: Setup**  -  Initial setup")
            .expect("spaced phase");
        assert_eq!(spaced.name, "Phase 1: Setup");
        assert_eq!(spaced.description, "Initial setup");
    }

    #[test]
    fn checkbox_status_mapping_is_total() {
        assert_eq!(checkbox_status('x'), PhaseStatus::Completed);
        assert_eq!(checkbox_status('X'), PhaseStatus::Completed);
        assert_eq!(checkbox_status('/'), PhaseStatus::InProgress);
        assert_eq!(checkbox_status(' '), PhaseStatus::Pending);
        for other in ['-', '?', 'o', '~', '✓'] {
            assert_eq!(checkbox_status(other), PhaseStatus::Pending);
        }
        let phase = CheckboxLine
            .parse_line("- [~] **Phase 4: Odd** - unknown marker")
            .expect("odd marker still parses");
        assert_eq!(phase.status, PhaseStatus::Pending);
    }

    #[test]
    fn checkbox_rejects_todo_lines() {
        assert!(CheckboxLine.parse_line("- [ ] write the docs").is_none());
        assert!(CheckboxLine.parse_line("- [x] **Milestone 1: x**").is_none());
    }

    #[test]
    fn shipped_line_with_em_dash_and_hyphen() {
        let phase = ShippedLine
            .parse_line("- SHIPPED **v1.0 Parser Stabilization** — Phases 1-7")
            .expect("shipped");
        assert_eq!(phase.name, "v1.0 Parser Stabilization");
        assert_eq!(phase.description, "Phases 1-7");
        assert_eq!(phase.status, PhaseStatus::Shipped);
        assert_eq!(phase.version.as_deref(), Some("v1.0"));
        assert_eq!(phase.phases.as_deref(), Some("1-7"));
        assert_eq!(phase.number(), None);

        let hyphen = ShippedLine
            .parse_line("- SHIPPED **v2.0 Feature Set** - Phase 3")
            .expect("shipped with hyphen");
        assert_eq!(hyphen.phases.as_deref(), Some("3"));
    }

    #[test]
    fn table_rows_with_dot_and_dash_titles() {
        let dot = TableRow
            .parse_line("| 1. Foundation | v1.0 | 3/3 | Complete |")
            .expect("dot row");
        assert_eq!(dot.name, "Phase 1: Foundation");
        assert_eq!(dot.status, PhaseStatus::Completed);
        assert_eq!(dot.description, "");

        let dash = TableRow
            .parse_line("| 1 - Foundation & Type Safety | ✓ Complete (2026-02-14) | 5 | 5 | 100% |")
            .expect("dash row");
        assert_eq!(dash.name, "Phase 1: Foundation & Type Safety");
        assert_eq!(dash.status, PhaseStatus::Completed);

        let em_dash = TableRow
            .parse_line("| 7 — Launch | Planned | 0 |")
            .expect("em dash row");
        assert_eq!(em_dash.name, "Phase 7: Launch");
        assert_eq!(em_dash.status, PhaseStatus::Pending);
    }

    #[test]
    fn table_rejects_header_separator_and_short_rows() {
        assert!(TableRow
            .parse_line("| Phase | Milestone | Plans | Status |")
            .is_none());
        assert!(TableRow
            .parse_line("|-------|-----------|-------|--------|")
            .is_none());
        assert!(TableRow.parse_line("| 1. Setup | Complete |").is_none());
        assert!(TableRow
            .parse_line("| Setup | v1 | 1/1 | Complete |")
            .is_none());
    }

    #[test]
    fn table_status_scans_every_cell() {
        assert_eq!(table_status(&["v2.0", "0/3", "In Progress"]), PhaseStatus::InProgress);
        assert_eq!(table_status(&["Active", "v2"]), PhaseStatus::InProgress);
        assert_eq!(table_status(&["Shipped", "v1"]), PhaseStatus::Completed);
        assert_eq!(table_status(&["✓", "in progress"]), PhaseStatus::Completed);
        assert_eq!(table_status(&["v2.0", "0/2", "Not started"]), PhaseStatus::Pending);
        assert_eq!(table_status::<&str>(&[]), PhaseStatus::Pending);
    }

    #[test]
    fn mixed_formats_keep_document_order() {
        let content = "\
# Roadmap

## Shipped Milestones

- SHIPPED **v1.0 Core** — Phases 1-3

## v2.0 Milestone Progress

| Phase | Milestone | Plans | Status |
|-------|-----------|-------|--------|
| 1. Migration | v2.0 | 2/2 | Complete |

## Current Work

- [/] **Phase 2: New Features** - Adding features
- [ ] **Phase 3: Testing** - Test everything
";
        let phases = parse_roadmap(content);
        assert_eq!(phases.len(), 4);
        assert_eq!(
            statuses(&phases),
            vec![
                PhaseStatus::Shipped,
                PhaseStatus::Completed,
                PhaseStatus::InProgress,
                PhaseStatus::Pending,
            ]
        );
        assert_eq!(phases[1].name, "Phase 1: Migration");
    }

    #[test]
    fn prose_and_empty_documents_yield_nothing() {
        assert!(parse_roadmap("").is_empty());
        assert!(parse_roadmap("# Roadmap\n\nJust some text.\n- a bullet\n").is_empty());
    }

    #[test]
    fn custom_parser_list_limits_grammars() {
        let content = "- [x] **Phase 1: A**\n| 2. B | v1 | Complete |\n";
        let parsers: [&dyn PhaseLineParser; 1] = [&TableRow];
        let only_tables = parse_roadmap_with(content, &parsers);
        assert_eq!(only_tables.len(), 1);
        assert_eq!(only_tables[0].name, "Phase 2: B");
    }

    #[test]
    fn infer_active_phase_cases() {
        assert!(infer_active_phase(&[]).is_none());

        let all_done = parse_roadmap("- [x] **Phase 1: A**\n- [x] **Phase 2: B**\n");
        assert!(infer_active_phase(&all_done).is_none());

        let mixed = parse_roadmap(
            "- [x] **Phase 1: Done**\n- [/] **Phase 2: Current**\n- [ ] **Phase 3: Later**\n",
        );
        let active = infer_active_phase(&mixed).expect("active phase");
        assert_eq!(active.name, "Phase 2: Current");
        assert_eq!(active.status, PhaseStatus::InProgress);

        let shipped_first = parse_roadmap(
            "- SHIPPED **v1.0 Core** — Phases 1-3\n- [ ] **Phase 4: Next**\n",
        );
        let active = infer_active_phase(&shipped_first).expect("shipped counts as open");
        assert_eq!(active.status, PhaseStatus::Shipped);
    }
}
