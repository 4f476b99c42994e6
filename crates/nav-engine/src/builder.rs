//! Fluent builder for constructing a [`Navigator`].

use log::info;

use nav_spatial::{Graph, KdTree};

use crate::{EngineConfig, EngineResult, Navigator};

/// Fluent builder for [`Navigator`].
///
/// # Required inputs
///
/// - [`Graph`], fully populated by the ingestion layer.
///
/// # Optional inputs (have defaults)
///
/// | Method        | Default                    |
/// |---------------|----------------------------|
/// | `.config(c)`  | `EngineConfig::default()`  |
///
/// # Example
///
/// ```rust,ignore
/// let nav = NavigatorBuilder::new(graph)
///     .config(EngineConfig { max_candidates: 16, ..Default::default() })
///     .build()?;
/// ```
pub struct NavigatorBuilder {
    graph:  Graph,
    config: Option<EngineConfig>,
}

impl NavigatorBuilder {
    pub fn new(graph: Graph) -> Self {
        Self { graph, config: None }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Validate the configuration, freeze the graph (dense index), and build
    /// the spatial index over every node.
    pub fn build(self) -> EngineResult<Navigator> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let mut graph = self.graph;
        graph.build_index();
        let tree = KdTree::from_graph(&graph);

        info!(
            "navigator ready: {} nodes ({} routable), {} edges",
            graph.node_count(),
            graph.dense().map_or(0, |d| d.len()),
            graph.edge_count(),
        );
        Ok(Navigator::from_parts(graph, tree, config))
    }
}
