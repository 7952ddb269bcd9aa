use atlas_graph::{build_catalogue, seed_process, DisplayGraph, DisplayNode, NodeKind};
use atlas_import::{
    parse_dependency_table, AdapterRegistry, DependencyTable, ImportDiagnostic, ImportFile,
};
use atlas_model::{add_link_unique, ensure_process, Library, LinkKind, ProcessKind};
use atlas_suggest::suggest;
use serde::{Deserialize, Serialize};

/// Feature classes assumed when the user gives none.
pub const DEFAULT_FEATURE_CLASSES: [&str; 3] = ["Applying", "Printing", "Preparing"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Flowchart,
    Mindmap,
}

/// Token identifying the session state an asynchronous operation started
/// from. A completion whose token no longer matches is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

/// Owned session state. Transitions consume the session and return the next
/// state; none of them can fail, failures at the boundary degrade to an
/// unchanged session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub library: Option<Library>,
    pub graph: DisplayGraph,
    pub selected: Option<String>,
    pub search_query: String,
    pub view_mode: ViewMode,
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> Generation {
        Generation(self.generation)
    }

    fn bump(mut self) -> Self {
        self.generation += 1;
        self
    }

    /// Replace the library wholesale. The displayed graph keeps referring to
    /// entity ids, so the current exploration stays usable.
    pub fn load_library(mut self, library: Library) -> Self {
        self.library = Some(library);
        self.bump()
    }

    /// Apply the result of an asynchronous library load that started at
    /// `started_at`. A stale completion (a newer user action happened since)
    /// is discarded; a failed load (`None`) keeps the prior state.
    pub fn apply_loaded_library(self, started_at: Generation, library: Option<Library>) -> Self {
        if started_at != self.generation() {
            log::debug!("discarding stale library load completion");
            return self;
        }
        match library {
            Some(library) => self.load_library(library),
            None => self,
        }
    }

    /// Discard the displayed graph and selection; the library stays loaded.
    pub fn reset(mut self) -> Self {
        self.graph = DisplayGraph::new();
        self.selected = None;
        self.bump()
    }

    pub fn set_search_query(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self.bump()
    }

    pub fn select_node(mut self, id: Option<String>) -> Self {
        self.selected = id;
        self.bump()
    }

    pub fn set_view_mode(mut self, mode: ViewMode) -> Self {
        self.view_mode = mode;
        self.bump()
    }

    /// Start an exploration from a free-text problem description: a problem
    /// root with the suggested processes attached via `solved-by` edges.
    pub fn set_problem(mut self, problem: &str, feature_classes: &[String]) -> Self {
        let Some(library) = &self.library else {
            return self;
        };

        let mut graph = DisplayGraph::new();
        let problem_node = DisplayNode::problem(problem);
        let problem_id = problem_node.id.clone();
        graph.add_node(problem_node);
        for process in suggest(problem, feature_classes, library) {
            let process_id = process.id.clone();
            graph.add_node(DisplayNode::from_process(process));
            graph.add_edge(&problem_id, &process_id, LinkKind::SolvedBy);
        }

        self.graph = graph;
        self.selected = Some(problem_id);
        self.bump()
    }

    /// Start an exploration from a known process: a single-root projection,
    /// auto-expanded once to show its sub-processes or components.
    pub fn start_from_process(mut self, process_id: &str) -> Self {
        let Some(library) = &self.library else {
            return self;
        };
        let Some(process) = library.process(process_id) else {
            return self;
        };

        let mut graph = seed_process(process);
        atlas_graph::expand(&mut graph, library, process_id);

        self.graph = graph;
        self.selected = Some(process_id.to_string());
        self.view_mode = ViewMode::Flowchart;
        self.bump()
    }

    /// Resolve a free-text query to a starting point: a process whose name,
    /// id or feature classes contain the query (main processes preferred),
    /// or a problem-rooted suggestion view when nothing matches.
    pub fn search_and_start(self, query: &str) -> Self {
        let Some(library) = &self.library else {
            return self;
        };
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return self;
        }

        let needle = trimmed.to_lowercase();
        let best_match = {
            let matches: Vec<_> = library
                .processes
                .iter()
                .filter(|p| {
                    p.name.to_lowercase().contains(&needle)
                        || p.id.to_lowercase().contains(&needle)
                        || p.feature_classes
                            .iter()
                            .any(|class| class.to_lowercase().contains(&needle))
                })
                .collect();
            matches
                .iter()
                .find(|p| p.kind == ProcessKind::Main)
                .or(matches.first())
                .map(|p| p.id.clone())
        };

        match best_match {
            Some(id) => self.start_from_process(&id),
            None => {
                let classes: Vec<String> = DEFAULT_FEATURE_CLASSES
                    .iter()
                    .map(|class| class.to_string())
                    .collect();
                self.set_problem(trimmed, &classes)
            }
        }
    }

    /// Expand or collapse a displayed node. Collapse never needs the
    /// library; expand without a loaded library is a no-op.
    pub fn toggle_node(mut self, id: &str) -> Self {
        if self.graph.has_outgoing(id) {
            atlas_graph::collapse(&mut self.graph, id);
        } else if let Some(library) = &self.library {
            atlas_graph::expand(&mut self.graph, library, id);
        }
        self.bump()
    }

    pub fn expand_node(mut self, id: &str) -> Self {
        if let Some(library) = &self.library {
            atlas_graph::expand(&mut self.graph, library, id);
        }
        self.bump()
    }

    /// Attach fresh suggestions under the displayed problem root using the
    /// default feature classes. Already displayed processes stay untouched.
    pub fn automate(mut self) -> Self {
        let Some(library) = &self.library else {
            return self;
        };
        let Some(root) = self.graph.nodes().find(|n| n.kind == NodeKind::Problem) else {
            return self;
        };
        let root_id = root.id.clone();
        let root_name = root.name.clone();

        let classes: Vec<String> = DEFAULT_FEATURE_CLASSES
            .iter()
            .map(|class| class.to_string())
            .collect();
        let additions: Vec<DisplayNode> = suggest(&root_name, &classes, library)
            .into_iter()
            .filter(|process| !self.graph.contains(&process.id))
            .map(DisplayNode::from_process)
            .collect();

        for node in additions {
            let id = node.id.clone();
            self.graph.add_node(node);
            self.graph.add_edge(&root_id, &id, LinkKind::SolvedBy);
        }
        self.bump()
    }

    /// Import a pasted dependency table: ensure the named processes exist,
    /// link main to subs, and show the result in flowchart mode. The parsed
    /// table is returned alongside so the caller can post it to the backend.
    pub fn import_dependencies(mut self, text: &str) -> (Self, Option<DependencyTable>) {
        let Some(table) = parse_dependency_table(text) else {
            return (self, None);
        };

        let mut library = self.library.take().unwrap_or_default();
        let main_id = ensure_process(
            &mut library,
            table.main.id.as_deref(),
            &table.main.name,
            ProcessKind::Main,
        );
        let sub_ids: Vec<String> = table
            .subs
            .iter()
            .map(|sub| ensure_process(&mut library, sub.id.as_deref(), &sub.name, ProcessKind::Sub))
            .collect();
        for sub_id in &sub_ids {
            add_link_unique(&mut library, &main_id, sub_id, LinkKind::Contains);
        }

        let mut graph = DisplayGraph::new();
        if let Some(main) = library.process(&main_id) {
            graph.add_node(DisplayNode::from_process(main));
        }
        for sub_id in &sub_ids {
            if let Some(sub) = library.process(sub_id) {
                graph.add_node(DisplayNode::from_process(sub));
            }
            graph.add_edge(&main_id, sub_id, LinkKind::Contains);
        }

        self.library = Some(library);
        self.graph = graph;
        self.view_mode = ViewMode::Flowchart;
        self.selected = Some(main_id);
        (self.bump(), Some(table))
    }

    /// Import a batch of files through the adapter registry and show the
    /// merged library as a catalogue mind-map. Files that fail to parse are
    /// skipped; their diagnostics are returned with the new state.
    pub fn import_files(
        mut self,
        files: &[ImportFile],
        registry: &AdapterRegistry,
    ) -> (Self, Vec<ImportDiagnostic>) {
        let base = self.library.take().unwrap_or_default();
        let (library, diagnostics) = registry.import_all(files, base);

        let graph = build_catalogue(&library);
        self.selected = graph.first().map(|n| n.id.clone());
        self.library = Some(library);
        self.graph = graph;
        self.view_mode = ViewMode::Mindmap;
        (self.bump(), diagnostics)
    }
}
