use crate::graph::DisplayGraph;
use crate::types::{DisplayNode, NodeKind};
use atlas_model::{Library, LinkKind};
use std::collections::{HashSet, VecDeque};

/// Expand a collapsed node, collapse an expanded one.
///
/// A node counts as expanded when it has at least one outgoing displayed
/// edge.
pub fn toggle(graph: &mut DisplayGraph, library: &Library, id: &str) {
    if graph.has_outgoing(id) {
        collapse(graph, id);
    } else {
        expand(graph, library, id);
    }
}

/// Reveal the neighbors of a displayed node.
///
/// Explicit library links authored from the node take priority; their targets
/// are resolved against processes first, then building blocks, and dangling
/// targets are skipped. Only when no link is authored for the node at all
/// does the legacy inline containment encoding apply: a main process reveals
/// its listed partial processes via synthetic `contains` edges, a partial
/// process its building blocks via synthetic `uses` edges.
///
/// Already displayed nodes and edges are left untouched; nothing is removed.
pub fn expand(graph: &mut DisplayGraph, library: &Library, id: &str) {
    let Some(node) = graph.node(id) else {
        return;
    };
    let kind = node.kind;

    let mut authored = 0usize;
    for link in library.links_from(id) {
        authored += 1;
        if link.to == id {
            log::debug!("skipping self-referential link on {id}");
            continue;
        }
        let Some(target) = resolve_entity(library, &link.to) else {
            log::debug!("skipping dangling link target {}", link.to);
            continue;
        };
        graph.add_node(target);
        graph.add_edge(id, &link.to, link.kind);
    }
    if authored > 0 {
        return;
    }

    match kind {
        NodeKind::MainProcess => {
            let Some(process) = library.process(id) else {
                return;
            };
            for child_id in &process.sub_processes {
                if let Some(child) = library.process(child_id) {
                    graph.add_node(DisplayNode::from_process(child));
                    graph.add_edge(id, child_id, LinkKind::Contains);
                }
            }
        }
        NodeKind::PartialProcess => {
            let Some(process) = library.process(id) else {
                return;
            };
            for block_id in &process.building_blocks {
                if let Some(block) = library.building_block(block_id) {
                    graph.add_node(DisplayNode::from_block(block));
                    graph.add_edge(id, block_id, LinkKind::Uses);
                }
            }
        }
        _ => {}
    }
}

/// Hide the entire expanded subtree under a node.
///
/// Breadth-first traversal from the direct children through displayed edges
/// only; everything reached is removed (the clicked node itself stays, even
/// when a cycle leads back to it). An empty removal set leaves the state
/// unchanged.
pub fn collapse(graph: &mut DisplayGraph, id: &str) {
    let mut removal: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<String> = graph.children(id).into();

    while let Some(current) = queue.pop_front() {
        if !removal.insert(current.clone()) {
            continue;
        }
        queue.extend(graph.children(&current));
    }
    removal.remove(id);

    for node_id in &removal {
        graph.remove_node(node_id);
    }
}

fn resolve_entity(library: &Library, id: &str) -> Option<DisplayNode> {
    if let Some(process) = library.process(id) {
        return Some(DisplayNode::from_process(process));
    }
    library.building_block(id).map(DisplayNode::from_block)
}
