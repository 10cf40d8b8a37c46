//! Reads the `.planning/` tree of a project.
//!
//! Every method goes back to disk; nothing is cached between calls. A missing
//! file or directory reads as empty. Other read failures surface as
//! [`PlanningError`] from the individual methods, and [`PlanningRoot::snapshot`]
//! turns them into snapshot issues instead of failing the whole pass.

use crate::error::PlanningError;
use crate::phase_docs::{collect_phase_docs, is_summary_file};
use crate::project::parse_project;
use crate::roadmap::{infer_active_phase, parse_roadmap};
use crate::state_doc::{leading_phase_number, parse_state};
use crate::todos::{merge_pending_todos, prettify_todo_name, sort_by_text};
use crate::{Phase, PhaseDocs, ProjectInfo, ProjectSnapshot, ProjectState, Roadmap, Todo};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const PLANNING_DIR: &str = ".planning";
pub const PROJECT_FILE: &str = "PROJECT.md";
pub const ROADMAP_FILE: &str = "ROADMAP.md";
pub const STATE_FILE: &str = "STATE.md";
pub const PHASES_DIR: &str = "phases";
pub const PENDING_TODOS_DIR: &str = "todos/pending";
pub const DONE_TODOS_DIR: &str = "todos/done";

#[derive(Debug, Clone)]
pub struct PlanningRoot {
    project_path: PathBuf,
    planning_path: PathBuf,
}

impl PlanningRoot {
    pub fn new(project_path: impl Into<PathBuf>) -> Self {
        let project_path = project_path.into();
        let planning_path = project_path.join(PLANNING_DIR);
        Self {
            project_path,
            planning_path,
        }
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    pub fn planning_path(&self) -> &Path {
        &self.planning_path
    }

    pub fn exists(&self) -> bool {
        self.planning_path.is_dir()
    }

    pub fn parse_project(&self) -> Result<ProjectInfo, PlanningError> {
        let content = read_optional(&self.planning_path.join(PROJECT_FILE))?;
        Ok(content.as_deref().map(parse_project).unwrap_or_default())
    }

    pub fn parse_roadmap(&self) -> Result<Roadmap, PlanningError> {
        let content = read_optional(&self.planning_path.join(ROADMAP_FILE))?;
        let phases = content.as_deref().map(parse_roadmap).unwrap_or_default();
        Ok(Roadmap { phases })
    }

    pub fn infer_active_phase(&self) -> Result<Option<Phase>, PlanningError> {
        let roadmap = self.parse_roadmap()?;
        Ok(infer_active_phase(&roadmap.phases).cloned())
    }

    pub fn parse_state(&self) -> Result<ProjectState, PlanningError> {
        let content = read_optional(&self.planning_path.join(STATE_FILE))?;
        Ok(content.as_deref().map(parse_state).unwrap_or_default())
    }

    /// First directory under `phases/` whose name starts with the zero-padded
    /// phase number. Entries are checked in name order.
    pub fn phase_directory_for(&self, phase_number: u32) -> Result<Option<PathBuf>, PlanningError> {
        let prefix = format!("{phase_number:02}");
        let entries = list_dir(&self.planning_path.join(PHASES_DIR))?;
        Ok(entries.into_iter().find(|path| {
            path.is_dir()
                && path
                    .file_name()
                    .map(|name| name.to_string_lossy().starts_with(&prefix))
                    .unwrap_or(false)
        }))
    }

    pub fn phase_directory(
        &self,
        state: &ProjectState,
        roadmap: &Roadmap,
    ) -> Result<Option<PathBuf>, PlanningError> {
        match resolve_phase_number(state, roadmap) {
            Some(number) => self.phase_directory_for(number),
            None => Ok(None),
        }
    }

    pub fn active_phase_directory(&self) -> Result<Option<PathBuf>, PlanningError> {
        let state = self.parse_state()?;
        let roadmap = self.parse_roadmap()?;
        self.phase_directory(&state, &roadmap)
    }

    /// Documents of one phase directory. A file that cannot be read is logged
    /// and left out; the rest are still collected.
    pub fn parse_phase_docs(&self, phase_dir: &Path) -> Result<PhaseDocs, PlanningError> {
        self.read_phase_docs(phase_dir).map(|(docs, _skipped)| docs)
    }

    /// Like [`Self::parse_phase_docs`], also returning the errors of the files
    /// that were skipped. Only a failure to list the directory is fatal.
    pub fn read_phase_docs(
        &self,
        phase_dir: &Path,
    ) -> Result<(PhaseDocs, Vec<PlanningError>), PlanningError> {
        let mut files = Vec::new();
        let mut skipped = Vec::new();
        for path in markdown_files(phase_dir)? {
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            match read_optional(&path) {
                Ok(Some(content)) => files.push((name, content)),
                Ok(None) => {}
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable phase document");
                    skipped.push(err);
                }
            }
        }
        Ok((collect_phase_docs(files), skipped))
    }

    /// Body of the lexicographically last `*-SUMMARY.md` in the phase directory.
    pub fn latest_phase_summary(&self, phase_dir: &Path) -> Result<Option<String>, PlanningError> {
        let latest = markdown_files(phase_dir)?
            .into_iter()
            .filter(|path| {
                path.file_name()
                    .map(|name| is_summary_file(&name.to_string_lossy()))
                    .unwrap_or(false)
            })
            .last();
        match latest {
            Some(path) => read_optional(&path),
            None => Ok(None),
        }
    }

    /// One unchecked todo per file in `todos/pending/`, in file-name order.
    pub fn pending_todo_files(&self) -> Result<Vec<Todo>, PlanningError> {
        let files = markdown_files(&self.planning_path.join(PENDING_TODOS_DIR))?;
        Ok(files
            .iter()
            .filter_map(|path| todo_text(path))
            .map(Todo::pending)
            .collect())
    }

    pub fn pending_todos(&self) -> Result<Vec<Todo>, PlanningError> {
        let state = self.parse_state()?;
        Ok(merge_pending_todos(
            self.pending_todo_files()?,
            state.state_todos,
        ))
    }

    /// One checked todo per file in `todos/done/`, sorted by display text.
    pub fn completed_todos(&self) -> Result<Vec<Todo>, PlanningError> {
        let files = markdown_files(&self.planning_path.join(DONE_TODOS_DIR))?;
        let mut todos: Vec<Todo> = files
            .iter()
            .filter_map(|path| todo_text(path))
            .map(Todo::done)
            .collect();
        sort_by_text(&mut todos);
        Ok(todos)
    }

    /// Reads every document once and assembles the dashboard snapshot. A
    /// document that fails to read is logged, noted in `issues`, and replaced
    /// by its default.
    pub fn snapshot(&self) -> ProjectSnapshot {
        let mut issues = Vec::new();

        let project = recover(&mut issues, PROJECT_FILE, self.parse_project());
        let roadmap = recover(&mut issues, ROADMAP_FILE, self.parse_roadmap());
        let state = recover(&mut issues, STATE_FILE, self.parse_state());
        let inferred_active_phase = infer_active_phase(&roadmap.phases).cloned();

        let phase_dir = recover(&mut issues, PHASES_DIR, self.phase_directory(&state, &roadmap));
        let (phase_docs, latest_summary) = match &phase_dir {
            Some(dir) => {
                let (docs, skipped) = recover(&mut issues, PHASES_DIR, self.read_phase_docs(dir));
                issues.extend(skipped.iter().map(PlanningError::to_string));
                let summary = recover(&mut issues, PHASES_DIR, self.latest_phase_summary(dir));
                (docs, summary)
            }
            None => (PhaseDocs::default(), None),
        };

        let pending_files = recover(&mut issues, PENDING_TODOS_DIR, self.pending_todo_files());
        let pending_todos = merge_pending_todos(pending_files, state.state_todos.clone());
        let completed_todos = recover(&mut issues, DONE_TODOS_DIR, self.completed_todos());
        let concerns = state.concerns.clone();

        debug!(
            root = %self.project_path.display(),
            phases = roadmap.phases.len(),
            pending_todos = pending_todos.len(),
            phase_dir = ?phase_dir,
            issues = issues.len(),
            "planning snapshot collected"
        );

        ProjectSnapshot {
            project,
            roadmap,
            state,
            phase_docs,
            pending_todos,
            completed_todos,
            concerns,
            latest_summary,
            inferred_active_phase,
            issues,
        }
    }
}

/// The state document's phase number wins, then the leading number of its
/// free-form phase line; otherwise the number of the first unfinished
/// roadmap phase.
pub fn resolve_phase_number(state: &ProjectState, roadmap: &Roadmap) -> Option<u32> {
    state
        .phase_number
        .or_else(|| state.current_phase.as_deref().and_then(leading_phase_number))
        .or_else(|| infer_active_phase(&roadmap.phases).and_then(Phase::number))
}

fn recover<T: Default>(issues: &mut Vec<String>, document: &str, result: Result<T, PlanningError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            warn!(
                document,
                path = %err.path().display(),
                error = %err,
                "planning document unreadable; using empty value"
            );
            issues.push(err.to_string());
            T::default()
        }
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, PlanningError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(PlanningError::read(path, err)),
    }
}

/// Directory entries sorted by path; a missing directory lists as empty.
fn list_dir(dir: &Path) -> Result<Vec<PathBuf>, PlanningError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(PlanningError::list_dir(dir, err)),
    };

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| PlanningError::list_dir(dir, err))?;
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}

fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>, PlanningError> {
    Ok(list_dir(dir)?
        .into_iter()
        .filter(|path| path.is_file() && path.extension().map(|ext| ext == "md").unwrap_or(false))
        .collect())
}

fn todo_text(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_string_lossy();
    let text = prettify_todo_name(&stem);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
