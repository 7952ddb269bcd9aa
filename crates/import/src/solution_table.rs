use crate::adapter::ImportAdapter;
use crate::error::Result;
use crate::NUMERIC_ID;
use atlas_model::{Library, Link, LinkKind, Process, ProcessKind, StorageLocation, StorageValue};
use atlas_suggest::translate_label;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};

/// Inclusive numeric range, hyphen or en-dash, optional spaces.
static RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{3,})\s*[-–]\s*(\d{3,})$").expect("valid regex"));

static SUB_KIND: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)teil").expect("valid regex"));

/// Storage columns of the export, mapped to canonical location keys.
const STORAGE_COLUMNS: [(&str, &str); 4] = [
    ("Ablageort konstruktiv", "constructive"),
    ("Ablageort steuerungstechnisch", "control"),
    ("Ablageort prüftechnisch", "test"),
    ("Ablageort robotertechnisch", "robot"),
];

/// Adapter for the tabular solution-table export: a JSON array of row
/// objects, one process per row, with German column headers and a
/// dependency column holding either an id list or a numeric range.
pub struct SolutionTableAdapter;

impl ImportAdapter for SolutionTableAdapter {
    fn suffixes(&self) -> &'static [&'static str] {
        &[".json"]
    }

    fn parse(&self, bytes: &[u8]) -> Result<Library> {
        let rows: Vec<Map<String, Value>> = serde_json::from_slice(bytes)?;

        let mut processes = Vec::new();
        let mut links = Vec::new();

        for row in &rows {
            let id = cell(row, "Prozessnummer");
            let name = translate_label(&cell(row, "Prozessname")).to_string();
            if id.is_empty() || name.is_empty() {
                continue;
            }

            let kind = if SUB_KIND.is_match(&cell(row, "Prozessart")) {
                ProcessKind::Sub
            } else {
                ProcessKind::Main
            };

            let feature_classes = ["Merkmalsklasse 1", "Merkmalsklasse 2", "Merkmalsklasse 3"]
                .iter()
                .map(|column| cell(row, column))
                .filter(|value| !value.is_empty() && value != "-")
                .map(|value| translate_label(&value).to_string())
                .collect();

            let constraints = ["Randbedingung 1", "Randbedingung 2"]
                .iter()
                .map(|column| cell(row, column))
                .filter(|value| !value.is_empty())
                .collect();

            let mut storage = BTreeMap::new();
            for (column, key) in STORAGE_COLUMNS {
                let value = cell(row, column);
                if !value.is_empty() {
                    storage.insert(key.to_string(), StorageValue::One(value));
                }
            }

            let mut process = Process::new(id.clone(), name, kind);
            process.feature_classes = feature_classes;
            process.constraints = constraints;
            process.storage = (!storage.is_empty()).then_some(StorageLocation::Named(storage));
            processes.push(process);

            // Dependency links: a main process lists its children, a sub
            // process its parent.
            for other in parse_range_or_list(&cell(row, "Verknüpfungen Prozessebene")) {
                let link = match kind {
                    ProcessKind::Main => Link::new(id.clone(), other, LinkKind::Contains),
                    ProcessKind::Sub => Link::new(other, id.clone(), LinkKind::Contains),
                };
                links.push(link);
            }
        }

        let mut seen = HashSet::new();
        links.retain(|l| seen.insert((l.from.clone(), l.to.clone(), l.kind)));

        Ok(Library {
            processes,
            links,
            ..Library::default()
        })
    }
}

/// String view of a cell, whatever JSON type the export produced.
fn cell(row: &Map<String, Value>, column: &str) -> String {
    match row.get(column) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Expand a dependency cell into individual process ids.
///
/// `"100001-100006"` expands to the six consecutive ids, zero-padded to the
/// width of the start token; otherwise the cell is split on separators and
/// non-numeric tokens are dropped.
pub fn parse_range_or_list(text: &str) -> Vec<String> {
    let s = text.trim();
    if s.is_empty() {
        return Vec::new();
    }

    if let Some(caps) = RANGE.captures(s) {
        if let (Ok(start), Ok(end)) = (caps[1].parse::<u64>(), caps[2].parse::<u64>()) {
            let width = caps[1].len();
            let (lo, hi) = (start.min(end), start.max(end));
            return (lo..=hi).map(|i| format!("{i:0width$}")).collect();
        }
    }

    s.split(|c: char| matches!(c, ';' | ',' | '\n') || c.is_whitespace())
        .map(str::trim)
        .filter(|token| NUMERIC_ID.is_match(token))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn range_expands_to_consecutive_zero_padded_ids() {
        assert_eq!(
            parse_range_or_list("100001-100006"),
            ["100001", "100002", "100003", "100004", "100005", "100006"]
        );
        assert_eq!(parse_range_or_list("100001 – 100003"), ["100001", "100002", "100003"]);
    }

    #[test]
    fn reversed_ranges_still_expand_ascending() {
        assert_eq!(parse_range_or_list("100003-100001"), ["100001", "100002", "100003"]);
    }

    #[test]
    fn zero_padding_follows_the_start_token_width() {
        assert_eq!(parse_range_or_list("00008-00011"), ["00008", "00009", "00010", "00011"]);
    }

    #[test]
    fn lists_keep_only_numeric_tokens() {
        assert_eq!(parse_range_or_list("100001,100002"), ["100001", "100002"]);
        assert_eq!(parse_range_or_list("100001; abc 100002"), ["100001", "100002"]);
        assert_eq!(parse_range_or_list("  "), Vec::<String>::new());
    }

    fn row(pairs: &[(&str, &str)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect()
    }

    #[test]
    fn main_process_rows_link_parent_to_child() {
        let rows = vec![row(&[
            ("Prozessnummer", "100000"),
            ("Prozessname", "Etikett applizieren"),
            ("Prozessart", "Hauptprozess"),
            ("Merkmalsklasse 1", "Applizieren"),
            ("Merkmalsklasse 2", "-"),
            ("Verknüpfungen Prozessebene", "100001-100002"),
        ])];
        let bytes = serde_json::to_vec(&rows).unwrap();

        let lib = SolutionTableAdapter.parse(&bytes).unwrap();
        assert_eq!(lib.processes.len(), 1);

        let process = &lib.processes[0];
        assert_eq!(process.name, "Apply label");
        assert_eq!(process.kind, ProcessKind::Main);
        assert_eq!(process.feature_classes, ["Applying"]);

        let keys: Vec<_> = lib.links.iter().map(|l| (l.from.as_str(), l.to.as_str())).collect();
        assert_eq!(keys, [("100000", "100001"), ("100000", "100002")]);
    }

    #[test]
    fn sub_process_rows_link_child_from_parent() {
        let rows = vec![row(&[
            ("Prozessnummer", "100001"),
            ("Prozessname", "Etikett drucken und bereitstellen"),
            ("Prozessart", "Teilprozess"),
            ("Ablageort konstruktiv", "K:/plans"),
            ("Verknüpfungen Prozessebene", "100000"),
        ])];
        let bytes = serde_json::to_vec(&rows).unwrap();

        let lib = SolutionTableAdapter.parse(&bytes).unwrap();
        let process = &lib.processes[0];
        assert_eq!(process.kind, ProcessKind::Sub);
        match &process.storage {
            Some(StorageLocation::Named(map)) => {
                assert_eq!(map.get("constructive"), Some(&StorageValue::One("K:/plans".into())));
            }
            other => panic!("expected named storage, got {other:?}"),
        }
        assert_eq!(lib.links[0].from, "100000");
        assert_eq!(lib.links[0].to, "100001");
    }

    #[test]
    fn rows_without_id_or_name_are_skipped_and_links_deduplicate() {
        let rows = vec![
            row(&[("Prozessnummer", ""), ("Prozessname", "nameless")]),
            row(&[
                ("Prozessnummer", "100000"),
                ("Prozessname", "Drucken"),
                ("Prozessart", "Hauptprozess"),
                ("Verknüpfungen Prozessebene", "100001,100001"),
            ]),
        ];
        let bytes = serde_json::to_vec(&rows).unwrap();

        let lib = SolutionTableAdapter.parse(&bytes).unwrap();
        assert_eq!(lib.processes.len(), 1);
        assert_eq!(lib.links.len(), 1);
    }
}
