use crate::depth::compute_depths;
use crate::graph::DisplayGraph;
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Horizontal spacing between flowchart columns.
pub const LAYER_WIDTH: f64 = 220.0;

/// Vertical padding reserved at the top of a flowchart column.
const COLUMN_TOP_MARGIN: f64 = 40.0;

/// Drawing surface the layout targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Computed positions plus the canvas size they assume. Pure output; both
/// layouts are recomputed from scratch after every graph mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub positions: HashMap<String, Point>,
    pub width: f64,
    pub height: f64,
}

/// Left-to-right flowchart layout.
///
/// Nodes group into vertical columns by computed depth, columns run left to
/// right by ascending depth with fixed spacing, and nodes within a column
/// spread evenly over the viewport height (a single node centers). The
/// canvas widens to fit the number of columns.
pub fn layered(graph: &DisplayGraph, viewport: Viewport) -> Layout {
    let depth = compute_depths(graph);

    let mut columns: BTreeMap<i32, Vec<&str>> = BTreeMap::new();
    for node in graph.nodes() {
        let d = depth.get(&node.id).copied().unwrap_or(0);
        columns.entry(d).or_default().push(&node.id);
    }

    let max_depth = columns.keys().next_back().copied().unwrap_or(0).max(0);
    let min_depth = columns.keys().next().copied().unwrap_or(0).min(0);
    let layers = (max_depth - min_depth + 1) as f64;
    let width = viewport.width.max(layers * LAYER_WIDTH + 200.0);
    let start_x = (width - layers * LAYER_WIDTH) / 2.0;

    let mut positions = HashMap::new();
    for (d, column) in &columns {
        let usable = (viewport.height - COLUMN_TOP_MARGIN).max(200.0);
        let step = if column.len() > 1 {
            usable / (column.len() as f64 + 1.0)
        } else {
            usable / 2.0
        };

        let x = start_x + ((d - min_depth) as f64) * LAYER_WIDTH;
        for (i, id) in column.iter().enumerate() {
            let y = if column.len() == 1 {
                viewport.height / 2.0
            } else {
                COLUMN_TOP_MARGIN + step * (i as f64 + 1.0)
            };
            positions.insert((*id).to_string(), Point { x, y });
        }
    }

    Layout {
        positions,
        width,
        height: viewport.height,
    }
}

/// Radial mind-map layout around the first displayed node.
///
/// Nodes group into concentric rings by BFS distance from the root through
/// displayed edges; unreachable nodes default to the first ring. Ring radius
/// grows linearly with distance and nodes on a ring sit at equal angular
/// increments starting from the top.
pub fn radial(graph: &DisplayGraph, viewport: Viewport) -> Layout {
    let cx = viewport.width / 2.0;
    let cy = viewport.height / 2.0;
    let mut positions = HashMap::new();

    let Some(root) = graph.first() else {
        return Layout {
            positions,
            width: viewport.width,
            height: viewport.height,
        };
    };
    let root_id = root.id.clone();

    let mut distance: HashMap<String, usize> = HashMap::new();
    distance.insert(root_id.clone(), 0);
    let mut queue = VecDeque::from([root_id.clone()]);
    while let Some(current) = queue.pop_front() {
        let level = distance[&current];
        for next in graph.children(&current) {
            if !distance.contains_key(&next) {
                distance.insert(next.clone(), level + 1);
                queue.push_back(next);
            }
        }
    }

    let mut rings: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
    for node in graph.nodes() {
        let d = distance.get(&node.id).copied().unwrap_or(1);
        rings.entry(d).or_default().push(&node.id);
    }

    let max_distance = rings.keys().next_back().copied().unwrap_or(0);
    let radius_step = cx.min(cy) / (max_distance as f64 + 2.0);

    positions.insert(root_id, Point { x: cx, y: cy });
    for (d, ring) in &rings {
        if *d == 0 {
            continue;
        }
        let angle_step = std::f64::consts::TAU / ring.len() as f64;
        let radius = (*d as f64 + 0.5) * radius_step;
        for (i, id) in ring.iter().enumerate() {
            let angle = i as f64 * angle_step - std::f64::consts::FRAC_PI_2;
            positions.insert(
                (*id).to_string(),
                Point {
                    x: cx + radius * angle.cos(),
                    y: cy + radius * angle.sin(),
                },
            );
        }
    }

    Layout {
        positions,
        width: viewport.width,
        height: viewport.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DisplayNode, NodeKind};
    use atlas_model::LinkKind;

    const VIEWPORT: Viewport = Viewport {
        width: 1200.0,
        height: 800.0,
    };

    fn process_node(id: &str, kind: NodeKind) -> DisplayNode {
        DisplayNode {
            id: id.to_string(),
            name: id.to_uppercase(),
            kind,
            meta: Default::default(),
        }
    }

    fn star() -> DisplayGraph {
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

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn layered_columns_step_by_layer_width() {
        let layout = layered(&star(), VIEWPORT);

        let m = layout.positions["m"];
        let p1 = layout.positions["p1"];
        let b = layout.positions["b"];
        assert_close(p1.x - m.x, LAYER_WIDTH);
        assert_close(b.x - p1.x, LAYER_WIDTH);
    }

    #[test]
    fn single_node_columns_center_vertically() {
        let layout = layered(&star(), VIEWPORT);
        assert_close(layout.positions["m"].y, VIEWPORT.height / 2.0);
        assert_close(layout.positions["b"].y, VIEWPORT.height / 2.0);
    }

    #[test]
    fn multi_node_columns_spread_evenly() {
        let layout = layered(&star(), VIEWPORT);

        // Two nodes at depth 1 over usable height 760: steps of 760/3.
        let step = (VIEWPORT.height - 40.0) / 3.0;
        assert_close(layout.positions["p1"].y, 40.0 + step);
        assert_close(layout.positions["p2"].y, 40.0 + 2.0 * step);
    }

    #[test]
    fn layered_canvas_grows_with_column_count() {
        let mut graph = DisplayGraph::new();
        graph.add_node(process_node("m", NodeKind::MainProcess));
        let mut prev = "m".to_string();
        for i in 0..8 {
            let id = format!("p{i}");
            graph.add_node(process_node(&id, NodeKind::PartialProcess));
            graph.add_edge(&prev, &id, LinkKind::Contains);
            prev = id;
        }

        let layout = layered(&graph, VIEWPORT);
        assert_close(layout.width, 9.0 * LAYER_WIDTH + 200.0);
        assert_close(layout.height, VIEWPORT.height);
    }

    #[test]
    fn radial_places_the_root_at_the_center() {
        let layout = radial(&star(), VIEWPORT);
        let m = layout.positions["m"];
        assert_close(m.x, VIEWPORT.width / 2.0);
        assert_close(m.y, VIEWPORT.height / 2.0);
    }

    #[test]
    fn radial_first_ring_starts_at_the_top() {
        let layout = radial(&star(), VIEWPORT);

        // max distance 2 → step = 400 / 4; first ring node sits straight up
        // at radius 1.5 * step.
        let step = 400.0 / 4.0;
        let p1 = layout.positions["p1"];
        assert_close(p1.x, VIEWPORT.width / 2.0);
        assert_close(p1.y, VIEWPORT.height / 2.0 - 1.5 * step);
    }

    #[test]
    fn radial_ring_radii_grow_with_distance() {
        let layout = radial(&star(), VIEWPORT);
        let cx = VIEWPORT.width / 2.0;
        let cy = VIEWPORT.height / 2.0;
        let dist = |p: Point| ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt();

        let step = 400.0 / 4.0;
        assert_close(dist(layout.positions["p1"]), 1.5 * step);
        assert_close(dist(layout.positions["b"]), 2.5 * step);
    }

    #[test]
    fn unreachable_nodes_default_to_the_first_ring() {
        let mut graph = star();
        graph.add_node(process_node("island", NodeKind::BuildingBlock));

        let layout = radial(&graph, VIEWPORT);
        let cx = VIEWPORT.width / 2.0;
        let cy = VIEWPORT.height / 2.0;
        let p = layout.positions["island"];
        let dist = ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt();
        assert_close(dist, 1.5 * (400.0 / 4.0));
    }

    #[test]
    fn empty_graph_produces_an_empty_layout() {
        let graph = DisplayGraph::new();
        assert!(radial(&graph, VIEWPORT).positions.is_empty());
        assert!(layered(&graph, VIEWPORT).positions.is_empty());
    }
}
