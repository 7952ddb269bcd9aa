use crate::graph::DisplayGraph;
use crate::types::NodeKind;
use std::collections::HashMap;

/// Iteration cap for the relaxation loop. A cycle in the displayed edges
/// stops propagating once the cap is hit; the depths computed so far are
/// accepted as-is.
pub const MAX_RELAX_PASSES: usize = 1000;

/// Assign an integer layer to every displayed node for the layered layout.
///
/// Longest-path-from-source layering: the first displayed main process seeds
/// depth 0 (every problem node does when no main process is displayed), then
/// `depth(v) >= depth(u) + 1` is relaxed over the displayed edges until a
/// full pass changes nothing. Nodes still unassigned afterwards get a
/// kind-based default.
pub fn compute_depths(graph: &DisplayGraph) -> HashMap<String, i32> {
    let mut depth: HashMap<String, i32> = HashMap::new();

    match graph.nodes().find(|n| n.kind == NodeKind::MainProcess) {
        Some(main) => {
            depth.insert(main.id.clone(), 0);
        }
        None => {
            for node in graph.nodes().filter(|n| n.kind == NodeKind::Problem) {
                depth.insert(node.id.clone(), 0);
            }
        }
    }

    let edges: Vec<(String, String)> = graph.edges().map(|e| (e.from, e.to)).collect();
    let mut changed = true;
    let mut passes = 0;
    while changed && passes < MAX_RELAX_PASSES {
        changed = false;
        passes += 1;
        for (from, to) in &edges {
            let Some(&from_depth) = depth.get(from) else {
                continue;
            };
            let current = depth.get(to).copied().unwrap_or(-1);
            let next = current.max(from_depth + 1);
            if next != current {
                depth.insert(to.clone(), next);
                changed = true;
            }
        }
    }
    if passes == MAX_RELAX_PASSES {
        log::warn!("depth relaxation hit the iteration cap; accepting current layering");
    }

    for node in graph.nodes() {
        if !depth.contains_key(&node.id) {
            let fallback = match node.kind {
                NodeKind::MainProcess => 0,
                NodeKind::PartialProcess => 1,
                NodeKind::BuildingBlock => 2,
                _ => 0,
            };
            depth.insert(node.id.clone(), fallback);
        }
    }

    depth
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DisplayNode;
    use atlas_model::LinkKind;
    use pretty_assertions::assert_eq;

    fn process_node(id: &str, kind: NodeKind) -> DisplayNode {
        DisplayNode {
            id: id.to_string(),
            name: id.to_uppercase(),
            kind,
            meta: Default::default(),
        }
    }

    fn chain() -> DisplayGraph {
        let mut graph = DisplayGraph::new();
        graph.add_node(process_node("m", NodeKind::MainProcess));
        graph.add_node(process_node("p1", NodeKind::PartialProcess));
        graph.add_node(process_node("p2", NodeKind::PartialProcess));
        graph.add_node(process_node("b", NodeKind::BuildingBlock));
        graph.add_edge("m", "p1", LinkKind::Contains);
        graph.add_edge("m", "p2", LinkKind::Contains);
        graph.add_edge("p1", "b", LinkKind::Uses);
        graph
    }

    #[test]
    fn main_process_seeds_depth_zero() {
        let depth = compute_depths(&chain());
        assert_eq!(depth["m"], 0);
        assert_eq!(depth["p1"], 1);
        assert_eq!(depth["p2"], 1);
        assert_eq!(depth["b"], 2);
    }

    #[test]
    fn relaxation_reaches_a_fixed_point() {
        let graph = chain();
        let first = compute_depths(&graph);
        let second = compute_depths(&graph);
        assert_eq!(first, second);
    }

    #[test]
    fn longest_path_wins_on_diamonds() {
        let mut graph = chain();
        // m -> p1 -> p2 raises p2 above its direct edge from m.
        graph.add_edge("p1", "p2", LinkKind::Contains);
        let depth = compute_depths(&graph);
        assert_eq!(depth["p2"], 2);
    }

    #[test]
    fn problem_nodes_seed_when_no_main_process_is_displayed() {
        let mut graph = DisplayGraph::new();
        graph.add_node(DisplayNode::problem("label falls off"));
        graph.add_node(process_node("p1", NodeKind::PartialProcess));
        graph.add_edge("problem:label falls off", "p1", LinkKind::SolvedBy);

        let depth = compute_depths(&graph);
        assert_eq!(depth["problem:label falls off"], 0);
        assert_eq!(depth["p1"], 1);
    }

    #[test]
    fn disconnected_nodes_fall_back_by_kind() {
        let mut graph = chain();
        graph.add_node(process_node("lonely-block", NodeKind::BuildingBlock));
        graph.add_node(process_node("lonely-sub", NodeKind::PartialProcess));
        graph.add_node(DisplayNode::category("cat:x", "X"));

        let depth = compute_depths(&graph);
        assert_eq!(depth["lonely-block"], 2);
        assert_eq!(depth["lonely-sub"], 1);
        assert_eq!(depth["cat:x"], 0);
    }

    #[test]
    fn cycles_terminate_within_the_iteration_cap() {
        let mut graph = DisplayGraph::new();
        graph.add_node(process_node("m", NodeKind::MainProcess));
        graph.add_node(process_node("a", NodeKind::PartialProcess));
        graph.add_node(process_node("b", NodeKind::PartialProcess));
        graph.add_edge("m", "a", LinkKind::Contains);
        graph.add_edge("a", "b", LinkKind::Contains);
        graph.add_edge("b", "a", LinkKind::Contains);

        let depth = compute_depths(&graph);
        // The cycle keeps raising a and b until the cap; whatever remains
        // must still cover every node.
        assert_eq!(depth.len(), 3);
        assert_eq!(depth["m"], 0);
    }
}
