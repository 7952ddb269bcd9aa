use crate::vocab::{canonical_keyword, normalize, translate_label};
use atlas_model::{Library, Process, ProcessKind};
use std::collections::HashSet;

/// Upper bound on the returned shortlist.
pub const MAX_SUGGESTIONS: usize = 6;

/// Score every process against a problem description and the requested
/// feature classes, returning the top candidates by descending score.
/// Library order is preserved on ties; zero-score processes are excluded.
pub fn suggest<'a>(
    problem: &str,
    feature_classes: &[String],
    library: &'a Library,
) -> Vec<&'a Process> {
    let query = normalize(problem);
    let wanted: HashSet<String> = feature_classes
        .iter()
        .map(|class| canonical_keyword(class))
        .collect();

    let mut scored: Vec<(&Process, u32)> = library
        .processes
        .iter()
        .filter_map(|process| {
            let score = score_process(process, &query, &wanted);
            (score > 0).then_some((process, score))
        })
        .collect();

    // Stable sort keeps library order on equal scores.
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.truncate(MAX_SUGGESTIONS);
    scored.into_iter().map(|(process, _)| process).collect()
}

fn score_process(process: &Process, query: &str, wanted: &HashSet<String>) -> u32 {
    let mut score = 0;

    let title = normalize(&format!("{} {}", translate_label(&process.name), process.id));
    if !query.is_empty() && title.contains(query) {
        score += 3;
    }

    // Class matches dominate the title match.
    for class in &process.feature_classes {
        if wanted.contains(&canonical_keyword(class)) {
            score += 4;
        }
    }

    if process.kind == ProcessKind::Main {
        score += 1;
    }

    score
}
