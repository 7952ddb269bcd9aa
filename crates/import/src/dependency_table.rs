use crate::NUMERIC_ID;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static BRACKET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*)\[(.+)\]$").expect("valid regex"));
static SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*[;,\t]\s*").expect("valid regex"));

/// A process named in a dependency table, with or without an id. Doubles as
/// the wire shape of the dependency update payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

/// Parsed dependency table: the first row is the main process, the rest are
/// its sub-processes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyTable {
    pub main: ProcessRef,
    pub subs: Vec<ProcessRef>,
}

/// Parse a pasted dependency table. Blank lines and `#` comments are
/// skipped; `None` means the text held no rows at all.
pub fn parse_dependency_table(text: &str) -> Option<DependencyTable> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();

    let (first, rest) = lines.split_first()?;
    let main = parse_cell(first);
    let subs = rest
        .iter()
        .map(|line| parse_cell(line))
        .filter(|row| !row.name.is_empty())
        .collect();

    Some(DependencyTable { main, subs })
}

/// Parse one cell. Supported forms: `Name [12345]`, `12345, Name`,
/// `Name; 12345`, a bare numeric id, a bare name.
fn parse_cell(cell: &str) -> ProcessRef {
    let raw = cell.trim();

    if let Some(caps) = BRACKET.captures(raw) {
        let name = caps[1]
            .trim()
            .trim_end_matches(|c: char| c == '-' || c == ':' || c.is_whitespace())
            .trim()
            .to_string();
        return ProcessRef {
            id: Some(caps[2].trim().to_string()),
            name,
        };
    }

    let parts: Vec<&str> = SEPARATOR.split(raw).collect();
    if parts.len() >= 2 {
        if NUMERIC_ID.is_match(parts[0]) {
            return ProcessRef {
                id: Some(parts[0].to_string()),
                name: parts[1..].join(" "),
            };
        }
        if NUMERIC_ID.is_match(parts[parts.len() - 1]) {
            return ProcessRef {
                id: Some(parts[parts.len() - 1].to_string()),
                name: parts[..parts.len() - 1].join(" "),
            };
        }
        return ProcessRef {
            id: None,
            name: raw.to_string(),
        };
    }

    // A lone id is kept as both id and name.
    if NUMERIC_ID.is_match(raw) {
        return ProcessRef {
            id: Some(raw.to_string()),
            name: raw.to_string(),
        };
    }
    ProcessRef {
        id: None,
        name: raw.to_string(),
    }
}
