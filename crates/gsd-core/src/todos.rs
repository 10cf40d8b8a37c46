use crate::Todo;
use std::collections::HashSet;

cached_regex!(date_prefix_re, r"^\d{4}-\d{2}-\d{2}-");

/// `2026-02-07-settings-detail-page-refactor` -> `Settings detail page refactor`.
/// Only the first letter changes case. The rest of the name keeps its original
/// casing, so `fix-API-timeout` becomes `Fix API timeout`.
pub fn prettify_todo_name(stem: &str) -> String {
    let without_date = date_prefix_re().replace(stem, "");
    let spaced = without_date.replace('-', " ");

    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// File-sourced todos first, then state-document todos whose text is not
/// already present (compared case-insensitively).
pub fn merge_pending_todos(file_todos: Vec<Todo>, state_todos: Vec<Todo>) -> Vec<Todo> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::with_capacity(file_todos.len() + state_todos.len());

    for todo in file_todos.into_iter().chain(state_todos) {
        if seen.insert(todo.text.to_lowercase()) {
            merged.push(todo);
        }
    }

    merged
}

pub fn sort_by_text(todos: &mut [Todo]) {
    todos.sort_by(|a, b| a.text.cmp(&b.text));
}
