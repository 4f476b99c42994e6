//! The query facade over a frozen graph and its spatial index.

use log::{debug, trace};
use rustc_hash::FxHashSet;

use nav_core::{GeoPoint, NodeId};
use nav_guide::{GuidanceConfig, NavInstruction, build_instructions};
use nav_spatial::{Algorithm, Graph, KdTree, Route, shortest_path};

use crate::{EngineConfig, EngineResult};

// ── Result types ──────────────────────────────────────────────────────────────

/// A coordinate-to-coordinate answer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Journey {
    /// Snapped origin node; `None` when no routable node exists at all.
    pub start: Option<NodeId>,
    /// Snapped destination node.
    pub end: Option<NodeId>,
    pub route: Route,
    /// Empty when the route is unreachable or trivial.
    pub instructions: Vec<NavInstruction>,
    /// Shortest-path searches run while resolving candidates.
    pub attempts: usize,
}

impl Journey {
    fn unreachable(start: Option<NodeId>, end: Option<NodeId>, attempts: usize) -> Self {
        Self { start, end, route: Route::unreachable(0), instructions: Vec::new(), attempts }
    }

    pub fn is_reachable(&self) -> bool {
        self.route.is_reachable()
    }
}

/// Dijkstra and A* run on the same query.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlgorithmComparison {
    pub dijkstra: Route,
    pub astar:    Route,
}

impl AlgorithmComparison {
    /// Fraction of Dijkstra's expansions that A* avoided, in `[0, 1]`.
    /// Zero when Dijkstra settled nothing.
    pub fn settled_savings(&self) -> f64 {
        if self.dijkstra.settled == 0 {
            return 0.0;
        }
        let saved = self.dijkstra.settled.saturating_sub(self.astar.settled);
        saved as f64 / self.dijkstra.settled as f64
    }
}

// ── Navigator ─────────────────────────────────────────────────────────────────

/// Immutable routing service.  `Send + Sync`; share it behind an `Arc`.
///
/// Construct with [`NavigatorBuilder`](crate::NavigatorBuilder).  To change
/// the topology, take the graph back with [`into_graph`](Self::into_graph),
/// mutate it, and build a new navigator.
pub struct Navigator {
    graph:  Graph,
    tree:   KdTree,
    config: EngineConfig,
}

impl Navigator {
    pub(crate) fn from_parts(graph: Graph, tree: KdTree, config: EngineConfig) -> Self {
        Self { graph, tree, config }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn index(&self) -> &KdTree {
        &self.tree
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Release the graph for modification.
    pub fn into_graph(self) -> Graph {
        self.graph
    }

    // ── Snapping ──────────────────────────────────────────────────────────

    /// Up to `k` node ids nearest `pos` that satisfy `accept`, nearest first.
    pub fn resolve_nearest<F>(&self, pos: GeoPoint, k: usize, accept: F) -> Vec<NodeId>
    where
        F: Fn(NodeId) -> bool,
    {
        self.tree.k_nearest_where(pos, k, accept)
    }

    /// Up to `k` nodes nearest `pos` that have at least one incident edge.
    pub fn resolve_routable(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        self.resolve_nearest(pos, k, |id| self.graph.has_neighbors(id))
    }

    // ── Paths and guidance ────────────────────────────────────────────────

    pub fn shortest_path(&self, start: NodeId, end: NodeId, algorithm: Algorithm) -> EngineResult<Route> {
        Ok(shortest_path(&self.graph, start, end, algorithm)?)
    }

    /// Guidance for `path`.  Either threshold may be overridden; the other
    /// comes from the navigator's configuration.
    pub fn build_instructions(
        &self,
        path: &[NodeId],
        turn_threshold_deg: Option<f64>,
        small_angle_deg: Option<f64>,
    ) -> EngineResult<Vec<NavInstruction>> {
        let base = self.config.guidance;
        let config = GuidanceConfig::new(
            turn_threshold_deg.unwrap_or(base.turn_threshold_deg),
            small_angle_deg.unwrap_or(base.small_angle_deg),
        )?;
        Ok(build_instructions(&self.graph, path, &config)?)
    }

    /// Run both algorithms on the same endpoints.
    pub fn compare(&self, start: NodeId, end: NodeId) -> EngineResult<AlgorithmComparison> {
        Ok(AlgorithmComparison {
            dijkstra: self.shortest_path(start, end, Algorithm::Dijkstra)?,
            astar:    self.shortest_path(start, end, Algorithm::AStar)?,
        })
    }

    // ── Coordinate queries ────────────────────────────────────────────────

    /// Snap both coordinates to routable nodes, route between them, and
    /// narrate the result.
    ///
    /// Candidates are tried in ascending combined rank (nearest pair first).
    /// When no tried pair is connected the candidate count doubles, from
    /// `initial_candidates` up to `max_candidates`.  A journey that stays
    /// unreachable keeps the nearest candidates as `start` / `end`.
    ///
    /// # Errors
    ///
    /// [`EngineError::Core`](crate::EngineError::Core) for a non-finite or
    /// out-of-range coordinate.
    pub fn route_between(&self, from: GeoPoint, to: GeoPoint, algorithm: Algorithm) -> EngineResult<Journey> {
        GeoPoint::try_new(from.lat, from.lon)?;
        GeoPoint::try_new(to.lat, to.lon)?;

        let mut k = self.config.initial_candidates;
        let mut tried: FxHashSet<(NodeId, NodeId)> = FxHashSet::default();
        let mut nearest: (Option<NodeId>, Option<NodeId>);

        loop {
            let starts = self.resolve_routable(from, k);
            let ends = self.resolve_routable(to, k);
            nearest = (starts.first().copied(), ends.first().copied());
            if starts.is_empty() || ends.is_empty() {
                break;
            }

            let mut pairs: Vec<(usize, usize)> = (0..starts.len())
                .flat_map(|i| (0..ends.len()).map(move |j| (i, j)))
                .collect();
            pairs.sort_unstable_by_key(|&(i, j)| (i + j, i));

            for (i, j) in pairs {
                let (s, e) = (starts[i], ends[j]);
                if !tried.insert((s, e)) {
                    continue;
                }
                let route = self.shortest_path(s, e, algorithm)?;
                trace!("candidate {s} -> {e}: {}", if route.is_reachable() { "connected" } else { "unreachable" });
                if route.is_reachable() {
                    let instructions = build_instructions(&self.graph, &route.path, &self.config.guidance)?;
                    debug!(
                        "{algorithm} journey {s} -> {e}: {:.1} m over {} edges after {} attempt(s)",
                        route.distance_m,
                        route.edge_count(),
                        tried.len(),
                    );
                    return Ok(Journey { start: Some(s), end: Some(e), route, instructions, attempts: tried.len() });
                }
            }

            let exhausted = starts.len() < k && ends.len() < k;
            if k >= self.config.max_candidates || exhausted {
                break;
            }
            k = (k * 2).min(self.config.max_candidates);
        }

        debug!("no connected candidate pair within {k} candidates ({} attempts)", tried.len());
        Ok(Journey::unreachable(nearest.0, nearest.1, tried.len()))
    }

    /// [`route_between`](Self::route_between) with the configured
    /// `default_algorithm`.
    pub fn route_between_default(&self, from: GeoPoint, to: GeoPoint) -> EngineResult<Journey> {
        self.route_between(from, to, self.config.default_algorithm)
    }

    /// [`route_between`](Self::route_between) for each `(from, to)` pair, in
    /// input order.  Runs on the Rayon pool with the `parallel` feature.
    pub fn route_many(&self, queries: &[(GeoPoint, GeoPoint)], algorithm: Algorithm) -> Vec<EngineResult<Journey>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            queries.par_iter().map(|&(from, to)| self.route_between(from, to, algorithm)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            queries.iter().map(|&(from, to)| self.route_between(from, to, algorithm)).collect()
        }
    }

    /// [`route_many`](Self::route_many) with the configured `default_algorithm`.
    pub fn route_many_default(&self, queries: &[(GeoPoint, GeoPoint)]) -> Vec<EngineResult<Journey>> {
        self.route_many(queries, self.config.default_algorithm)
    }
}
