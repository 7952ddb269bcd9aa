use crate::graph::DisplayGraph;
use crate::types::{DisplayNode, NodeKind, NodeMeta};
use atlas_model::{Library, LinkKind, Process, ProcessKind};
use std::collections::{HashMap, HashSet};

/// Id of the synthetic catalogue root.
pub const CATALOGUE_ROOT_ID: &str = "root";

/// Storage-location leaves shown when no process carries a location map.
const DEFAULT_STORAGE_KEYS: [&str; 4] = [
    "Constructive",
    "Control Technology",
    "Test Technology",
    "Robot Technology",
];

/// Maximum characters of note text shown on a note leaf.
const NOTE_PREVIEW_CHARS: usize = 80;

/// Single-root projection: one displayed node for the starting process, no
/// edges. This seeds the expansion engine.
pub fn seed_process(process: &Process) -> DisplayGraph {
    let mut graph = DisplayGraph::new();
    graph.add_node(DisplayNode::from_process(process));
    graph
}

/// Full catalogue projection for the mind-map view.
///
/// Organizes the entire library under one synthetic root and a fixed
/// taxonomy of categories; all relationships are `contains` edges. Block
/// categories, feature classes and storage keys are discovered from the
/// data in first-seen order.
pub fn build_catalogue(library: &Library) -> DisplayGraph {
    let mut graph = DisplayGraph::new();

    graph.add_node(DisplayNode::category(
        CATALOGUE_ROOT_ID,
        "Process and Component Catalogue for Automation",
    ));

    let sections = [
        ("cat:processes", "Processes"),
        ("cat:modular", "Baukasten (Modular System)"),
        ("cat:types", "Process Types"),
        ("cat:storage", "Storage Locations"),
        ("cat:notes", "Notes/Hints"),
    ];
    for (id, name) in sections {
        graph.add_node(DisplayNode::category(id, name));
        graph.add_edge(CATALOGUE_ROOT_ID, id, LinkKind::Contains);
    }

    // Processes split into main and sub.
    graph.add_node(DisplayNode::category("cat:main", "Main Processes"));
    graph.add_node(DisplayNode::category("cat:sub", "Sub-Processes"));
    graph.add_edge("cat:processes", "cat:main", LinkKind::Contains);
    graph.add_edge("cat:processes", "cat:sub", LinkKind::Contains);

    for process in &library.processes {
        let node_id = format!("proc:{}", process.id);
        let kind = match process.kind {
            ProcessKind::Main => NodeKind::MainProcess,
            ProcessKind::Sub => NodeKind::PartialProcess,
        };
        graph.add_node(DisplayNode {
            id: node_id.clone(),
            name: process.name.clone(),
            kind,
            meta: NodeMeta::default(),
        });
        let parent = match process.kind {
            ProcessKind::Main => "cat:main",
            ProcessKind::Sub => "cat:sub",
        };
        graph.add_edge(parent, &node_id, LinkKind::Contains);

        // Identifier tail leaf, a visual affordance rather than an entity.
        let tail_id = format!("tail:{}", process.id);
        graph.add_node(DisplayNode::category(
            &tail_id,
            format!("Process ID: {}", process.id),
        ));
        graph.add_edge(&node_id, &tail_id, LinkKind::Contains);
    }

    // Modular system: building blocks grouped by discovered category.
    let mut category_order: Vec<&str> = Vec::new();
    let mut by_category: HashMap<&str, Vec<&atlas_model::BuildingBlock>> = HashMap::new();
    for block in &library.building_blocks {
        let entry = by_category.entry(block.category.as_str()).or_default();
        if entry.is_empty() {
            category_order.push(block.category.as_str());
        }
        entry.push(block);
    }
    for category in category_order {
        let category_id = format!("bbcat:{category}");
        graph.add_node(DisplayNode::category(&category_id, category));
        graph.add_edge("cat:modular", &category_id, LinkKind::Contains);
        for block in &by_category[category] {
            let block_id = format!("bb:{}", block.id);
            graph.add_node(DisplayNode {
                id: block_id.clone(),
                name: block.name.clone(),
                kind: NodeKind::BuildingBlock,
                meta: NodeMeta::default(),
            });
            graph.add_edge(&category_id, &block_id, LinkKind::Contains);
        }
    }

    // Process types: feature classes across all processes, deduplicated.
    let mut seen_classes: HashSet<&str> = HashSet::new();
    for process in &library.processes {
        for class in &process.feature_classes {
            if !seen_classes.insert(class.as_str()) {
                continue;
            }
            let class_id = format!("type:{class}");
            graph.add_node(DisplayNode::category(&class_id, class));
            graph.add_edge("cat:types", &class_id, LinkKind::Contains);
        }
    }

    // Storage locations: key names from the processes' location maps.
    let mut storage_keys: Vec<&str> = Vec::new();
    let mut seen_keys: HashSet<&str> = HashSet::new();
    for process in &library.processes {
        if let Some(atlas_model::StorageLocation::Named(map)) = &process.storage {
            for key in map.keys() {
                if seen_keys.insert(key.as_str()) {
                    storage_keys.push(key.as_str());
                }
            }
        }
    }
    if storage_keys.is_empty() {
        storage_keys.extend(DEFAULT_STORAGE_KEYS);
    }
    for key in storage_keys {
        let key_id = format!("stor:{key}");
        graph.add_node(DisplayNode::category(&key_id, key));
        graph.add_edge("cat:storage", &key_id, LinkKind::Contains);
    }

    for (i, note) in library.notes.iter().enumerate() {
        let note_id = format!("note:{i}");
        graph.add_node(DisplayNode::category(&note_id, note_preview(note)));
        graph.add_edge("cat:notes", &note_id, LinkKind::Contains);
    }

    log::debug!(
        "built catalogue view: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    graph
}

fn note_preview(note: &str) -> String {
    if note.chars().count() <= NOTE_PREVIEW_CHARS {
        return note.to_string();
    }
    let mut preview: String = note.chars().take(NOTE_PREVIEW_CHARS).collect();
    preview.push('…');
    preview
}
