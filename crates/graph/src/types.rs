use atlas_model::{
    BuildingBlock, LinkKind, Process, ProcessKind, PropertyValue, StorageLocation,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Displayed node variant. Build and layout code pattern-matches on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// Synthetic root for a free-text problem description.
    Problem,
    MainProcess,
    PartialProcess,
    BuildingBlock,
    /// Taxonomy/grouping node with no library entity behind it.
    Category,
}

/// Subset of Process/BuildingBlock metadata carried for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMeta {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feature_classes: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageLocation>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertyValue>,
}

/// Node of the displayed graph.
///
/// Identifiers are drawn from library entity ids, plus synthetic prefixes
/// (`problem:`, `cat:`, `tail:`, ...) for nodes without a library entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

impl DisplayNode {
    pub fn from_process(process: &Process) -> Self {
        Self {
            id: process.id.clone(),
            name: process.name.clone(),
            kind: match process.kind {
                ProcessKind::Main => NodeKind::MainProcess,
                ProcessKind::Sub => NodeKind::PartialProcess,
            },
            meta: NodeMeta {
                feature_classes: process.feature_classes.clone(),
                constraints: process.constraints.clone(),
                storage: process.storage.clone(),
                properties: BTreeMap::new(),
            },
        }
    }

    pub fn from_block(block: &BuildingBlock) -> Self {
        Self {
            id: block.id.clone(),
            name: block.name.clone(),
            kind: NodeKind::BuildingBlock,
            meta: NodeMeta {
                feature_classes: Vec::new(),
                constraints: Vec::new(),
                storage: block.storage.clone().map(StorageLocation::Flat),
                properties: block.properties.clone(),
            },
        }
    }

    /// Root node for a free-text problem description.
    pub fn problem(text: &str) -> Self {
        Self {
            id: format!("problem:{text}"),
            name: text.to_string(),
            kind: NodeKind::Problem,
            meta: NodeMeta::default(),
        }
    }

    /// Bare taxonomy node.
    pub fn category(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::Category,
            meta: NodeMeta::default(),
        }
    }
}

/// Edge of the displayed graph, same shape as a library link but scoped to
/// currently displayed nodes. Identity key is `(from, to, kind)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayEdge {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: LinkKind,
}
