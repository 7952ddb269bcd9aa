//! # Atlas Graph
//!
//! The interactive display graph over the process library: projection of
//! library records into displayed nodes and edges, the expand/collapse state
//! machine, and the deterministic 2-D layouts.
//!
//! ## Architecture
//!
//! ```text
//! Library
//!     │
//!     ├──> Graph Builder
//!     │      ├─ single-root projection around one process
//!     │      └─ full catalogue projection (fixed taxonomy)
//!     │
//!     ├──> Display Graph (petgraph)
//!     │      ├─ Nodes: problem / process / building block / category
//!     │      └─ Edges: contains / uses / solved-by
//!     │
//!     ├──> Expansion Engine
//!     │      ├─ expand: reveal linked or contained neighbors
//!     │      └─ collapse: drop everything reachable from a node
//!     │
//!     └──> Layouts
//!            ├─ Depth Calculator (constraint relaxation)
//!            ├─ layered left-to-right flowchart
//!            └─ radial mind-map around the first node
//! ```

mod builder;
mod depth;
mod expand;
mod graph;
mod layout;
mod types;

pub use builder::{build_catalogue, seed_process, CATALOGUE_ROOT_ID};
pub use depth::{compute_depths, MAX_RELAX_PASSES};
pub use expand::{collapse, expand, toggle};
pub use graph::DisplayGraph;
pub use layout::{layered, radial, Layout, Point, Viewport, LAYER_WIDTH};
pub use types::{DisplayEdge, DisplayNode, NodeKind, NodeMeta};
