use crate::markdown::heading;
use crate::{ActiveTask, ProjectInfo};

const ACTIVE_HEADING_LEVEL: usize = 3;
const CHECKBOX_PREFIX_LEN: usize = "- [ ]".len();

/// Checkbox lines under `### Active` in PROJECT.md. The section closes at the
/// next heading of level three or above.
pub fn parse_active_tasks(content: &str) -> Vec<ActiveTask> {
    let mut tasks = Vec::new();
    let mut in_active = false;

    for line in content.lines() {
        let line = line.trim();
        if let Some((level, title)) = heading(line) {
            if in_active && level <= ACTIVE_HEADING_LEVEL {
                break;
            }
            if level == ACTIVE_HEADING_LEVEL && title.starts_with("Active") {
                in_active = true;
            }
            continue;
        }

        if !in_active || !line.starts_with("- [") {
            continue;
        }

        let checked = line.starts_with("- [x]") || line.starts_with("- [X]");
        let text = line.get(CHECKBOX_PREFIX_LEN..).unwrap_or_default().trim();
        tasks.push(ActiveTask {
            text: text.to_string(),
            checked,
        });
    }

    tasks
}

pub fn parse_project(content: &str) -> ProjectInfo {
    ProjectInfo {
        active_tasks: parse_active_tasks(content),
    }
}
