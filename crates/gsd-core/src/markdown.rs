//! Line-level markdown helpers shared by the document parsers.

use std::borrow::Cow;

cached_regex!(bold_label_re, r"\*\*([A-Za-z][A-Za-z /]*?):\*\*");

/// Rewrites `**Label:**` to `Label:` so bold and plain labels parse the same.
pub fn normalize_bold_labels(content: &str) -> Cow<'_, str> {
    bold_label_re().replace_all(content, "$1:")
}

/// Returns `(level, title)` for an ATX heading line such as `## Pending Todos`.
pub fn heading(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim_start();
    let level = trimmed.chars().take_while(|ch| *ch == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((level, rest.trim()))
}

/// Lines under the first heading whose title satisfies `matches`, up to the
/// next heading of the same or a higher level. Empty if no heading matches.
pub fn section_lines<'a, F>(content: &'a str, matches: F) -> Vec<&'a str>
where
    F: Fn(&str) -> bool,
{
    let mut lines = Vec::new();
    let mut section_level: Option<usize> = None;

    for line in content.lines() {
        match (heading(line), section_level) {
            (Some((level, _)), Some(open)) if level <= open => break,
            (Some((level, title)), None) => {
                if matches(title) {
                    section_level = Some(level);
                }
            }
            (_, Some(_)) => lines.push(line),
            (None, None) => {}
        }
    }

    lines
}

/// Text of an unchecked `- [ ] text` task line.
pub fn unchecked_item(line: &str) -> Option<&str> {
    let text = line.trim().strip_prefix("- [ ]")?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Text of a `- text` bullet. Task-list lines count as bullets too.
pub fn dash_bullet(line: &str) -> Option<&str> {
    let text = line.trim().strip_prefix("- ")?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
