use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Process kind within the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessKind {
    /// Top-level manufacturing process.
    Main,
    /// Partial process contained in a main process.
    Sub,
}

/// Storage-location metadata: either a flat string or a mapping of named
/// locations to one or more values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StorageLocation {
    Flat(String),
    Named(BTreeMap<String, StorageValue>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StorageValue {
    One(String),
    Many(Vec<String>),
}

/// Manufacturing process record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    /// Identifier, unique within the library.
    pub id: String,

    /// Display name.
    pub name: String,

    pub kind: ProcessKind,

    /// Feature-class tags used by the suggestion engine.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feature_classes: Vec<String>,

    /// Constraint tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<String>,

    /// Legacy nested containment: ids of partial processes (main processes).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_processes: Vec<String>,

    /// Legacy nested containment: ids of building blocks (partial processes).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub building_blocks: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageLocation>,
}

impl Process {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ProcessKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            feature_classes: Vec::new(),
            constraints: Vec::new(),
            sub_processes: Vec::new(),
            building_blocks: Vec::new(),
            storage: None,
        }
    }
}

/// Arbitrary building-block property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    Number(f64),
}

/// Reusable hardware/software building block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingBlock {
    /// Identifier, unique within the library.
    pub id: String,

    pub name: String,

    /// Grouping category, discovered dynamically from the data.
    pub category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertyValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
}

impl BuildingBlock {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            manufacturer: None,
            properties: BTreeMap::new(),
            storage: None,
        }
    }
}

/// Edge kind between library entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkKind {
    Contains,
    Uses,
    SolvedBy,
}

/// Directed, typed edge between two library-entity identifiers.
///
/// Identity key is `(from, to, kind)`; a library must not hold two links
/// with the same key. Endpoints should reference existing ids, but dangling
/// references are tolerated and skipped wherever links are resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: LinkKind,
}

impl Link {
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: LinkKind) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
        }
    }

    /// Identity key used for deduplication.
    pub fn key(&self) -> (&str, &str, LinkKind) {
        (&self.from, &self.to, self.kind)
    }
}

/// The whole library document as loaded from persistence or imports.
///
/// Every collection defaults to empty so a partial or foreign document
/// deserializes best-effort instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    #[serde(default)]
    pub processes: Vec<Process>,

    #[serde(default)]
    pub building_blocks: Vec<BuildingBlock>,

    #[serde(default)]
    pub links: Vec<Link>,

    #[serde(default)]
    pub notes: Vec<String>,
}

impl Library {
    pub fn process(&self, id: &str) -> Option<&Process> {
        self.processes.iter().find(|p| p.id == id)
    }

    pub fn process_mut(&mut self, id: &str) -> Option<&mut Process> {
        self.processes.iter_mut().find(|p| p.id == id)
    }

    pub fn building_block(&self, id: &str) -> Option<&BuildingBlock> {
        self.building_blocks.iter().find(|b| b.id == id)
    }

    /// Explicit links authored from the given entity.
    pub fn links_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Link> {
        self.links.iter().filter(move |l| l.from == id)
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
            && self.building_blocks.is_empty()
            && self.links.is_empty()
            && self.notes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn library_deserializes_with_missing_collections() {
        let lib: Library = serde_json::from_str("{}").unwrap();
        assert!(lib.is_empty());

        let lib: Library = serde_json::from_str(r#"{"notes":["hint"]}"#).unwrap();
        assert_eq!(lib.notes, vec!["hint".to_string()]);
    }

    #[test]
    fn link_kind_uses_wire_names() {
        let link = Link::new("a", "b", LinkKind::SolvedBy);
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["type"], "solved-by");

        let parsed: Link = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, link);
    }

    #[test]
    fn storage_location_accepts_flat_and_named_shapes() {
        let flat: StorageLocation = serde_json::from_str(r#""K:/plans""#).unwrap();
        assert_eq!(flat, StorageLocation::Flat("K:/plans".to_string()));

        let named: StorageLocation =
            serde_json::from_str(r#"{"control":"PLC-7","test":["T1","T2"]}"#).unwrap();
        match named {
            StorageLocation::Named(map) => {
                assert_eq!(
                    map.get("control"),
                    Some(&StorageValue::One("PLC-7".to_string()))
                );
                assert_eq!(
                    map.get("test"),
                    Some(&StorageValue::Many(vec!["T1".into(), "T2".into()]))
                );
            }
            other => panic!("expected named storage, got {other:?}"),
        }
    }

    #[test]
    fn process_round_trips_with_camel_case_fields() {
        let mut process = Process::new("100000", "Apply label", ProcessKind::Main);
        process.sub_processes = vec!["100001".to_string()];
        process.feature_classes = vec!["Applying".to_string()];

        let json = serde_json::to_value(&process).unwrap();
        assert_eq!(json["kind"], "main");
        assert_eq!(json["subProcesses"][0], "100001");
        assert_eq!(json["featureClasses"][0], "Applying");

        let parsed: Process = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, process);
    }
}
