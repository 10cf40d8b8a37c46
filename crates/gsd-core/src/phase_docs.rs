use crate::{PhaseDocs, PlanDoc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocKind {
    Context,
    Research,
    Verification,
    Plan,
}

impl DocKind {
    pub const ALL: [DocKind; 4] = [
        DocKind::Context,
        DocKind::Research,
        DocKind::Verification,
        DocKind::Plan,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            DocKind::Context => "CONTEXT",
            DocKind::Research => "RESEARCH",
            DocKind::Verification => "VERIFICATION",
            DocKind::Plan => "PLAN",
        }
    }
}

/// Case-sensitive keyword match; the first kind in [`DocKind::ALL`] order wins.
pub fn classify_phase_doc(file_name: &str) -> Option<DocKind> {
    DocKind::ALL
        .into_iter()
        .find(|kind| file_name.contains(kind.keyword()))
}

pub fn is_summary_file(file_name: &str) -> bool {
    file_name.ends_with("-SUMMARY.md")
}

/// Builds [`PhaseDocs`] from `(file name, body)` pairs. Pairs are visited in
/// file-name order, so when two files share a singular kind the
/// lexicographically last one is kept.
pub fn collect_phase_docs(mut files: Vec<(String, String)>) -> PhaseDocs {
    files.sort_by(|a, b| a.0.cmp(&b.0));

    let mut docs = PhaseDocs::default();
    for (name, content) in files {
        match classify_phase_doc(&name) {
            Some(DocKind::Context) => docs.context = Some(content),
            Some(DocKind::Research) => docs.research = Some(content),
            Some(DocKind::Verification) => docs.verification = Some(content),
            Some(DocKind::Plan) => docs.plans.push(PlanDoc { name, content }),
            None => {}
        }
    }

    docs
}
