//! Routing trait and the two shortest-path searches.
//!
//! # Algorithms
//!
//! [`DijkstraRouter`] and [`AStarRouter`] share one label-setting search over
//! the graph's [`DenseIndex`](crate::DenseIndex); they differ only in the
//! priority key:
//!
//! | Router   | Key                                    |
//! |----------|----------------------------------------|
//! | Dijkstra | `g(v)`                                 |
//! | A*       | `g(v) + c · haversine(v, goal)`        |
//!
//! `c` is [`DenseIndex::heuristic_scale`](crate::DenseIndex::heuristic_scale):
//! `1` for graphs whose edges are never shorter than the straight line, and
//! smaller when an explicit weight (or a node moved after weighting) breaks
//! that.  The scaled estimate is admissible and consistent on every
//! non-negative graph, so both routers return the same total distance and
//! A* just settles fewer nodes.
//!
//! # Results
//!
//! A search that exhausts the queue without reaching the goal returns
//! [`Route::unreachable`] (`distance_m = +∞`, empty path); that is an answer,
//! not an error.  Errors are reserved for misuse: a stale dense index or an
//! endpoint id the graph has never seen.
//!
//! Tie-breaking among equal keys follows heap order; when several optimal
//! paths exist, either may be returned.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::debug;

use nav_core::{DenseIdx, GeoPoint, NodeId};

use crate::graph::{DenseIndex, Graph};
use crate::{SpatialError, SpatialResult};

// ── Algorithm ─────────────────────────────────────────────────────────────────

/// Which shortest-path search to run.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    Dijkstra,
    #[default]
    AStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::Dijkstra, Algorithm::AStar];

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::AStar    => "astar",
        }
    }

    /// The stateless router implementing this algorithm.
    pub fn router(self) -> &'static dyn Router {
        match self {
            Algorithm::Dijkstra => &DijkstraRouter,
            Algorithm::AStar    => &AStarRouter,
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Total path length in metres; `f64::INFINITY` when unreachable.
    pub distance_m: f64,
    /// Node ids from source to destination; empty when unreachable.
    pub path: Vec<NodeId>,
    /// Nodes popped and expanded by the search.
    pub settled: usize,
}

impl Route {
    /// The "no path exists" sentinel.
    pub fn unreachable(settled: usize) -> Self {
        Self { distance_m: f64::INFINITY, path: Vec::new(), settled }
    }

    /// Source equals destination.
    pub fn trivial(node: NodeId) -> Self {
        Self { distance_m: 0.0, path: vec![node], settled: 0 }
    }

    pub fn is_reachable(&self) -> bool {
        !self.path.is_empty()
    }

    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.path.len() == 1
    }

    pub fn edge_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`: one router instance serves
/// concurrent queries against a shared, frozen [`Graph`].  Per-query state
/// belongs on the stack of `route`, never on `self`.
pub trait Router: Send + Sync {
    /// Compute the shortest route from `from` to `to`.
    ///
    /// # Errors
    ///
    /// [`SpatialError::IndexNotBuilt`] if the graph's dense index is stale,
    /// [`SpatialError::NodeNotFound`] if either id is not a graph node.
    fn route(&self, graph: &Graph, from: NodeId, to: NodeId) -> SpatialResult<Route>;

    fn algorithm(&self) -> Algorithm;
}

/// Uninformed label-setting search.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, graph: &Graph, from: NodeId, to: NodeId) -> SpatialResult<Route> {
        run(graph, from, to, Algorithm::Dijkstra, |_, _| 0.0)
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Dijkstra
    }
}

/// Haversine-guided search.
#[derive(Copy, Clone, Debug, Default)]
pub struct AStarRouter;

impl Router for AStarRouter {
    fn route(&self, graph: &Graph, from: NodeId, to: NodeId) -> SpatialResult<Route> {
        run(graph, from, to, Algorithm::AStar, |v, goal| v.distance_m(goal))
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::AStar
    }
}

/// Convenience wrapper: route with the router for `algorithm`.
pub fn shortest_path(
    graph: &Graph,
    from: NodeId,
    to: NodeId,
    algorithm: Algorithm,
) -> SpatialResult<Route> {
    algorithm.router().route(graph, from, to)
}

// ── Search internals ──────────────────────────────────────────────────────────

/// Priority-queue entry: min-ordered on `key`, carrying the tentative
/// distance `cost` so stale entries can be recognised on pop.
#[derive(Copy, Clone, Debug)]
struct QueueEntry {
    key:  f64,
    cost: f64,
    node: DenseIdx,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    // Reversed so BinaryHeap (a max-heap) pops the smallest key first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .total_cmp(&self.key)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Resolve endpoints, handle the degenerate cases, then search.
///
/// `heuristic(v, goal)` estimates the remaining distance from a node position.
fn run<H>(
    graph: &Graph,
    from: NodeId,
    to: NodeId,
    algorithm: Algorithm,
    heuristic: H,
) -> SpatialResult<Route>
where
    H: Fn(GeoPoint, GeoPoint) -> f64,
{
    let dense = graph.dense().ok_or(SpatialError::IndexNotBuilt)?;
    for id in [from, to] {
        if !graph.contains_node(id) {
            return Err(SpatialError::NodeNotFound(id));
        }
    }
    if from == to {
        return Ok(Route::trivial(from));
    }

    // Isolated nodes are outside the dense index and cannot be reached.
    let (Some(source), Some(goal)) = (dense.index_of(from), dense.index_of(to)) else {
        debug!("{algorithm} {from} -> {to}: endpoint has no edges");
        return Ok(Route::unreachable(0));
    };

    let goal_pos = dense.pos(goal);
    let scale = dense.heuristic_scale();
    let route = search(dense, source, goal, |v| scale * heuristic(dense.pos(v), goal_pos));
    debug!(
        "{algorithm} {from} -> {to}: settled {} nodes, {:.1} m",
        route.settled, route.distance_m,
    );
    Ok(route)
}

fn search<H>(dense: &DenseIndex, source: DenseIdx, goal: DenseIdx, h: H) -> Route
where
    H: Fn(DenseIdx) -> f64,
{
    let n = dense.len();
    // dist[v] = best known distance (m) from source to v.
    let mut dist   = vec![f64::INFINITY; n];
    // parent[v] = predecessor on the best known path; INVALID if unreached.
    let mut parent = vec![DenseIdx::INVALID; n];
    let mut heap   = BinaryHeap::new();
    let mut settled = 0usize;

    dist[source.index()] = 0.0;
    heap.push(QueueEntry { key: h(source), cost: 0.0, node: source });

    while let Some(QueueEntry { cost, node, .. }) = heap.pop() {
        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }
        if node == goal {
            return Route {
                distance_m: cost,
                path: reconstruct(dense, &parent, source, goal),
                settled,
            };
        }
        settled += 1;

        for (next, weight_m) in dense.out_edges(node) {
            let next_cost = cost + weight_m;
            if next_cost < dist[next.index()] {
                dist[next.index()] = next_cost;
                parent[next.index()] = node;
                heap.push(QueueEntry { key: next_cost + h(next), cost: next_cost, node: next });
            }
        }
    }

    Route::unreachable(settled)
}

fn reconstruct(dense: &DenseIndex, parent: &[DenseIdx], source: DenseIdx, goal: DenseIdx) -> Vec<NodeId> {
    let mut path = vec![dense.id_of(goal)];
    let mut cur = goal;
    while cur != source {
        cur = parent[cur.index()];
        path.push(dense.id_of(cur));
    }
    path.reverse();
    path
}
