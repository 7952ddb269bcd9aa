use crate::adapter::ImportAdapter;
use crate::error::Result;
use atlas_model::{
    BuildingBlock, Library, Link, LinkKind, Process, ProcessKind, PropertyValue, StorageLocation,
    StorageValue,
};
use atlas_suggest::translate_label;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

static SUB_KIND: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)teil|sub").expect("valid regex"));

/// Header names that count as storage-location columns.
static STORAGE_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)ablage|storage|konstruktiv|steuerung|test|robot").expect("valid regex"));

/// Columns that never become building-block properties.
static RESERVED_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)id|name|category|hersteller|ablage|prozess|process|type").expect("valid regex"));

const ID_COLUMNS: [&str; 3] = ["id", "ID", "Process ID"];
const NAME_COLUMNS: [&str; 4] = ["name", "Name", "Process Name", "Name deutsch"];
const TYPE_COLUMNS: [&str; 3] = ["type", "Type", "Prozessart"];
const CLASS_COLUMNS: [&str; 4] = ["merkmalsklassen", "Merkmalsklassen", "Klasse", "class"];
const CONSTRAINT_COLUMNS: [&str; 2] = ["randbedingungen", "Randbedingungen"];
const SUB_PROCESS_COLUMNS: [&str; 2] = ["partialProcesses", "Teilprozesse"];
const BLOCK_COLUMNS: [&str; 2] = ["buildingBlocks", "Bausteine"];
const CATEGORY_COLUMNS: [&str; 3] = ["category", "Category", "Bauteilkategorie"];
const MANUFACTURER_COLUMNS: [&str; 3] = ["hersteller", "Hersteller", "Manufacturer"];
const BLOCK_STORAGE_COLUMNS: [&str; 2] = ["ablageort", "Ablageort"];

/// Adapter for decoded workbook rows: a JSON object mapping sheet names to
/// arrays of row objects, the shape a spreadsheet export produces.
///
/// Each sheet is classified by its column headers: process rows, building
///-block rows, or free text captured as notes.
pub struct SheetRowsAdapter;

impl ImportAdapter for SheetRowsAdapter {
    fn suffixes(&self) -> &'static [&'static str] {
        &[".sheets.json"]
    }

    fn parse(&self, bytes: &[u8]) -> Result<Library> {
        let sheets: BTreeMap<String, Vec<Map<String, Value>>> = serde_json::from_slice(bytes)?;

        let mut library = Library::default();
        for (sheet, rows) in &sheets {
            let Some(first) = rows.first() else {
                continue;
            };
            let headers: Vec<String> = first.keys().map(|h| h.to_lowercase()).collect();

            let looks_like_process = headers.iter().any(|h| h.contains("process"))
                || headers.iter().any(|h| h == "id")
                || headers.iter().any(|h| h == "type");
            let looks_like_block = headers.iter().any(|h| {
                h.contains("building")
                    || h.contains("block")
                    || h.contains("categor")
                    || h.contains("kategorie")
            });

            // Block markers are the more specific signal; a block sheet
            // usually carries an id column too.
            if looks_like_block {
                parse_block_rows(rows, &mut library);
                continue;
            }
            if looks_like_process {
                parse_process_rows(rows, &mut library);
                continue;
            }

            log::debug!("sheet {sheet} matched no record shape; capturing rows as notes");
            for row in rows {
                let line = row
                    .values()
                    .map(text)
                    .filter(|v| !v.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                if !line.is_empty() {
                    library.notes.push(line);
                }
            }
        }

        Ok(library)
    }
}

fn parse_process_rows(rows: &[Map<String, Value>], library: &mut Library) {
    for row in rows {
        let id = first_cell(row, &ID_COLUMNS);
        let name = translate_label(&first_cell(row, &NAME_COLUMNS)).to_string();
        if id.is_empty() || name.is_empty() {
            continue;
        }

        let kind = if SUB_KIND.is_match(&first_cell(row, &TYPE_COLUMNS)) {
            ProcessKind::Sub
        } else {
            ProcessKind::Main
        };

        let mut process = Process::new(id.clone(), name, kind);
        process.feature_classes = list_field(row, &CLASS_COLUMNS)
            .into_iter()
            .map(|c| translate_label(&c).to_string())
            .collect();
        process.constraints = list_field(row, &CONSTRAINT_COLUMNS);
        process.sub_processes = list_field(row, &SUB_PROCESS_COLUMNS);
        process.building_blocks = list_field(row, &BLOCK_COLUMNS);
        process.storage = storage_from_headers(row);

        // Inline relation columns double as explicit links.
        for child in &process.sub_processes {
            library
                .links
                .push(Link::new(id.clone(), child.clone(), LinkKind::Contains));
        }
        for block in &process.building_blocks {
            library
                .links
                .push(Link::new(id.clone(), block.clone(), LinkKind::Uses));
        }

        library.processes.push(process);
    }
}

fn parse_block_rows(rows: &[Map<String, Value>], library: &mut Library) {
    for row in rows {
        let id = first_cell(row, &ID_COLUMNS[..2]);
        let name = first_cell(row, &NAME_COLUMNS[..2]);
        if id.is_empty() || name.is_empty() {
            continue;
        }

        let mut block = BuildingBlock::new(
            id,
            name,
            translate_label(&first_cell(row, &CATEGORY_COLUMNS)).to_string(),
        );

        let manufacturer = first_cell(row, &MANUFACTURER_COLUMNS);
        block.manufacturer = (!manufacturer.is_empty()).then_some(manufacturer);

        let storage = first_cell(row, &BLOCK_STORAGE_COLUMNS);
        block.storage = (!storage.is_empty()).then_some(storage);

        for (header, value) in row {
            if RESERVED_HEADER.is_match(header) {
                continue;
            }
            let property = match value {
                Value::Number(n) => n.as_f64().map(PropertyValue::Number),
                other => {
                    let s = text(other);
                    (!s.is_empty()).then_some(PropertyValue::Text(s))
                }
            };
            if let Some(property) = property {
                block.properties.insert(header.clone(), property);
            }
        }

        library.building_blocks.push(block);
    }
}

fn storage_from_headers(row: &Map<String, Value>) -> Option<StorageLocation> {
    let mut map = BTreeMap::new();
    for (header, value) in row {
        if !STORAGE_HEADER.is_match(header) {
            continue;
        }
        let entry = match value {
            Value::Array(items) => {
                StorageValue::Many(items.iter().map(text).filter(|v| !v.is_empty()).collect())
            }
            other => {
                let s = text(other);
                if s.is_empty() {
                    continue;
                }
                StorageValue::One(s)
            }
        };
        map.insert(header.clone(), entry);
    }
    (!map.is_empty()).then_some(StorageLocation::Named(map))
}

/// First non-empty cell among the given column spellings.
fn first_cell(row: &Map<String, Value>, columns: &[&str]) -> String {
    columns
        .iter()
        .map(|column| row.get(*column).map(text).unwrap_or_default())
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

/// List cell: either a JSON array or a separator-delimited string.
fn list_field(row: &Map<String, Value>, columns: &[&str]) -> Vec<String> {
    for column in columns {
        match row.get(*column) {
            Some(Value::Array(items)) => {
                let values: Vec<String> =
                    items.iter().map(text).filter(|v| !v.is_empty()).collect();
                if !values.is_empty() {
                    return values;
                }
            }
            Some(other) => {
                let values: Vec<String> = text(other)
                    .split(|c: char| matches!(c, ',' | ';' | '\n'))
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .collect();
                if !values.is_empty() {
                    return values;
                }
            }
            None => {}
        }
    }
    Vec::new()
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}
