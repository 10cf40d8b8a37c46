use gsd_core::{PhaseStatus, PlanningRoot, Todo};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, body: &str) {
    let path = root.join(".planning").join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture dir");
    }
    fs::write(path, body).expect("write fixture");
}

fn fixture() -> TempDir {
    tempfile::tempdir().expect("tempdir")
}

#[test]
fn roadmap_checkboxes_drive_inferred_phase() {
    let dir = fixture();
    write(
        dir.path(),
        "ROADMAP.md",
        "- [x] **Phase 1: A** - x\n- [ ] **Phase 2: B**\n",
    );

    let snapshot = PlanningRoot::new(dir.path()).snapshot();
    let statuses: Vec<PhaseStatus> = snapshot.roadmap.phases.iter().map(|p| p.status).collect();
    assert_eq!(statuses, vec![PhaseStatus::Completed, PhaseStatus::Pending]);
    assert_eq!(
        snapshot.inferred_active_phase.as_ref().map(|p| p.name.as_str()),
        Some("Phase 2: B")
    );

    let json = snapshot.to_json().expect("snapshot serializes");
    assert_eq!(json["roadmap"]["phases"][0]["status"], "completed");
    assert_eq!(json["roadmap"]["phases"][1]["name"], "Phase 2: B");
    assert_eq!(json["inferred_active_phase"]["status"], "pending");
}

#[test]
fn missing_planning_dir_gives_default_snapshot() {
    let dir = fixture();
    let root = PlanningRoot::new(dir.path());
    assert!(!root.exists());

    let snapshot = root.snapshot();
    assert!(snapshot.roadmap.phases.is_empty());
    assert!(snapshot.inferred_active_phase.is_none());
    assert_eq!(snapshot.state.progress_percent, 0);
    assert!(snapshot.phase_docs.is_empty());
    assert!(snapshot.latest_summary.is_none());
    assert!(snapshot.issues.is_empty());
}

#[test]
fn state_document_feeds_phase_directory() {
    let dir = fixture();
    write(
        dir.path(),
        "STATE.md",
        "Phase: 5 of 7 (Template Versioning)\nProgress: [██████░░░░] 60%\n",
    );
    write(dir.path(), "phases/04-old/04-CONTEXT.md", "old context");
    write(dir.path(), "phases/05-template-versioning/05-CONTEXT.md", "ctx");
    write(dir.path(), "phases/05-template-versioning/05-RESEARCH.md", "research");
    write(dir.path(), "phases/05-template-versioning/05-02-PLAN.md", "plan two");
    write(dir.path(), "phases/05-template-versioning/05-01-PLAN.md", "plan one");
    write(dir.path(), "phases/05-template-versioning/05-01-SUMMARY.md", "first summary");
    write(dir.path(), "phases/05-template-versioning/05-02-SUMMARY.md", "second summary");

    let root = PlanningRoot::new(dir.path());
    let snapshot = root.snapshot();

    assert_eq!(snapshot.state.phase_number, Some(5));
    assert_eq!(snapshot.state.total_phases, Some(7));
    assert_eq!(snapshot.state.progress_percent, 60);

    let phase_dir = root
        .active_phase_directory()
        .expect("readable")
        .expect("phase dir resolved");
    assert!(phase_dir.ends_with("phases/05-template-versioning"));

    assert_eq!(snapshot.phase_docs.context.as_deref(), Some("ctx"));
    assert_eq!(snapshot.phase_docs.research.as_deref(), Some("research"));
    assert!(snapshot.phase_docs.verification.is_none());
    let plans: Vec<&str> = snapshot
        .phase_docs
        .plans
        .iter()
        .map(|p| p.content.as_str())
        .collect();
    assert_eq!(plans, vec!["plan one", "plan two"]);
    assert_eq!(snapshot.latest_summary.as_deref(), Some("second summary"));
}

#[test]
fn roadmap_inference_used_when_state_has_no_number() {
    let dir = fixture();
    write(
        dir.path(),
        "ROADMAP.md",
        "- [x] **Phase 1: Setup**\n- [ ] **Phase 2: Build** - core work\n",
    );
    write(dir.path(), "STATE.md", "Phase: Not started\n");
    write(dir.path(), "phases/02-build/02-VERIFICATION.md", "checks");

    let snapshot = PlanningRoot::new(dir.path()).snapshot();
    assert_eq!(snapshot.state.phase_status.as_deref(), Some("not_started"));
    assert_eq!(snapshot.phase_docs.verification.as_deref(), Some("checks"));
}

#[test]
fn unmatched_phase_directory_leaves_docs_empty() {
    let dir = fixture();
    write(dir.path(), "STATE.md", "Phase: 9 of 9 (Late)\n");
    write(dir.path(), "phases/01-start/01-CONTEXT.md", "ctx");

    let snapshot = PlanningRoot::new(dir.path()).snapshot();
    assert!(snapshot.phase_docs.is_empty());
    assert!(snapshot.latest_summary.is_none());
}

#[test]
fn pending_todos_merge_files_and_state() {
    let dir = fixture();
    write(dir.path(), "todos/pending/2026-02-07-fix-login.md", "");
    write(dir.path(), "todos/pending/write-docs.md", "");
    write(
        dir.path(),
        "STATE.md",
        "## Pending Todos\n- [ ] fix login\n- [ ] Ship release\n",
    );

    let root = PlanningRoot::new(dir.path());
    let pending = root.pending_todos().expect("readable");
    assert_eq!(
        pending,
        vec![
            Todo::pending("Fix login"),
            Todo::pending("Write docs"),
            Todo::pending("Ship release"),
        ]
    );
    assert_eq!(root.snapshot().pending_todos, pending);
}

#[test]
fn completed_todos_sorted_and_checked() {
    let dir = fixture();
    write(dir.path(), "todos/done/2026-01-02-zebra-task.md", "");
    write(dir.path(), "todos/done/alpha-task.md", "");
    write(dir.path(), "todos/done/notes.txt", "");

    let completed = PlanningRoot::new(dir.path())
        .completed_todos()
        .expect("readable");
    assert_eq!(
        completed,
        vec![Todo::done("Alpha task"), Todo::done("Zebra task")]
    );
}

#[test]
fn concerns_and_active_tasks_are_lifted() {
    let dir = fixture();
    write(
        dir.path(),
        "STATE.md",
        "### Blockers/Concerns\n- None.\n- Token budget is tight\n",
    );
    write(
        dir.path(),
        "PROJECT.md",
        "### Active\n- [ ] Live reload\n- [x] Parse roadmap\n### Out of Scope\n- [ ] Web\n",
    );

    let snapshot = PlanningRoot::new(dir.path()).snapshot();
    let concerns: Vec<&str> = snapshot.concerns.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(concerns, vec!["Token budget is tight"]);
    assert_eq!(snapshot.project.active_tasks.len(), 2);
    assert!(snapshot.project.active_tasks[1].checked);
}

#[test]
fn snapshot_rereads_disk_every_call() {
    let dir = fixture();
    write(dir.path(), "ROADMAP.md", "- [ ] **Phase 1: A**\n");
    let root = PlanningRoot::new(dir.path());
    assert_eq!(root.snapshot().roadmap.phases[0].status, PhaseStatus::Pending);

    write(dir.path(), "ROADMAP.md", "- [x] **Phase 1: A**\n");
    assert_eq!(root.snapshot().roadmap.phases[0].status, PhaseStatus::Completed);
}

#[test]
fn unreadable_document_is_recorded_as_issue() {
    let dir = fixture();
    write(dir.path(), "ROADMAP.md", "- [ ] **Phase 1: A**\n");
    fs::write(dir.path().join(".planning/STATE.md"), [0xff, 0xfe, 0x00]).expect("write bytes");

    let snapshot = PlanningRoot::new(dir.path()).snapshot();
    assert_eq!(snapshot.roadmap.phases.len(), 1);
    assert_eq!(snapshot.state.current_phase, None);
    assert_eq!(snapshot.issues.len(), 1);
    assert!(snapshot.issues[0].contains("STATE.md"));
}

#[test]
fn leading_number_of_phase_line_picks_directory() {
    let dir = fixture();
    write(dir.path(), "STATE.md", "Phase: 3 of 5 - Polish\n");
    write(
        dir.path(),
        "ROADMAP.md",
        "- [x] **Phase 1: A**\n- [ ] **Phase 2: B**\n- [ ] **Phase 3: C**\n",
    );
    write(dir.path(), "phases/02-b/02-CONTEXT.md", "phase two ctx");
    write(dir.path(), "phases/03-c/03-CONTEXT.md", "phase three ctx");

    let root = PlanningRoot::new(dir.path());
    let snapshot = root.snapshot();
    assert_eq!(snapshot.state.phase_number, None);
    assert_eq!(snapshot.inferred_active_phase.as_ref().and_then(|p| p.number()), Some(2));
    assert_eq!(snapshot.phase_docs.context.as_deref(), Some("phase three ctx"));

    let phase_dir = root
        .active_phase_directory()
        .expect("readable")
        .expect("phase dir resolved");
    assert!(phase_dir.ends_with("phases/03-c"));
}

#[test]
fn unreadable_phase_document_skips_only_that_file() {
    let dir = fixture();
    write(dir.path(), "STATE.md", "Phase: 1 of 2 (Setup)\n");
    write(dir.path(), "phases/01-setup/01-CONTEXT.md", "ctx");
    write(dir.path(), "phases/01-setup/01-01-PLAN.md", "plan");
    fs::write(dir.path().join(".planning/phases/01-setup/01-02-PLAN.md"), [0xff, 0xfe])
        .expect("write bytes");

    let root = PlanningRoot::new(dir.path());
    let snapshot = root.snapshot();
    assert_eq!(snapshot.phase_docs.context.as_deref(), Some("ctx"));
    let plans: Vec<&str> = snapshot
        .phase_docs
        .plans
        .iter()
        .map(|p| p.content.as_str())
        .collect();
    assert_eq!(plans, vec!["plan"]);
    assert_eq!(snapshot.issues.len(), 1);
    assert!(snapshot.issues[0].contains("01-02-PLAN.md"));

    let phase_dir = dir.path().join(".planning/phases/01-setup");
    let docs = root.parse_phase_docs(&phase_dir).expect("listing succeeds");
    assert_eq!(docs.context.as_deref(), Some("ctx"));
    assert_eq!(docs.plans.len(), 1);
}
