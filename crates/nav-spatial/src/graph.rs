//! Road graph representation and its dense search index.
//!
//! # Two layers
//!
//! [`Graph`] is the mutable, id-keyed form the ingestion layer fills in:
//! a node table `NodeId → GeoPoint` and an undirected adjacency relation
//! `NodeId → [(neighbor, weight_m)]`.  Every edge is stored in both
//! directions.
//!
//! [`DenseIndex`] is derived from it by [`Graph::build_index`].  It numbers
//! the adjacency keys `0..N-1` and lays the edges out in **Compressed Sparse
//! Row (CSR)** form.  Given a `DenseIdx n`, its outgoing edges occupy:
//!
//! ```text
//! edge_to[ out_start[n] .. out_start[n+1] ]
//! ```
//!
//! so the inner loop of Dijkstra/A* is a contiguous memory scan with no
//! hashing.  Only nodes with at least one edge are numbered; an isolated
//! node can be snapped to but never routed through.

use log::{debug, warn};
use rustc_hash::FxHashMap;

use nav_core::{DenseIdx, GeoPoint, NodeId, haversine_m};

use crate::{SpatialError, SpatialResult};

// ── Adjacency entry ───────────────────────────────────────────────────────────

/// One directed half of an undirected road segment.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Neighbor {
    pub to: NodeId,
    pub weight_m: f64,
}

// ── Graph ─────────────────────────────────────────────────────────────────────

/// Undirected, weighted road graph keyed by source-map node ids.
///
/// # Example
///
/// ```
/// use nav_core::{GeoPoint, NodeId};
/// use nav_spatial::Graph;
///
/// let mut g = Graph::new();
/// g.add_node(NodeId(1), GeoPoint::new(24.90, 67.05));
/// g.add_node(NodeId(2), GeoPoint::new(24.91, 67.05));
/// let w = g.add_edge(NodeId(1), NodeId(2)).unwrap(); // haversine weight
/// assert!((w - 1_112.0).abs() < 1.0);
/// g.build_index();
/// assert_eq!(g.dense().unwrap().len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Graph {
    nodes:     FxHashMap<NodeId, GeoPoint>,
    adjacency: FxHashMap<NodeId, Vec<Neighbor>>,
    /// `None` until `build_index` runs, and again after any mutation.
    dense:     Option<DenseIndex>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for the expected number of nodes to reduce rehashing when
    /// bulk-loading a metropolitan extract.
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            nodes:     FxHashMap::with_capacity_and_hasher(nodes, Default::default()),
            adjacency: FxHashMap::with_capacity_and_hasher(nodes, Default::default()),
            dense:     None,
        }
    }

    /// Great-circle distance in metres between two `(lat, lon)` pairs.
    #[inline]
    pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
        haversine_m(lat1, lon1, lat2, lon2)
    }

    // ── Mutation (ingestion only) ─────────────────────────────────────────

    /// Insert or overwrite a node.  Returns the previous position, if any.
    ///
    /// Edges already attached to `id` keep their stored weights.
    pub fn add_node(&mut self, id: NodeId, pos: GeoPoint) -> Option<GeoPoint> {
        self.dense = None;
        self.nodes.insert(id, pos)
    }

    /// Add an undirected edge weighted by the haversine distance between the
    /// current positions of `from` and `to`.  Returns the weight used.
    ///
    /// # Errors
    ///
    /// [`SpatialError::NodeNotFound`] if either endpoint has not been added;
    /// the graph is left unchanged.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> SpatialResult<f64> {
        let (a, b) = self.endpoints(from, to)?;
        let weight_m = a.distance_m(b);
        self.insert_symmetric(from, to, weight_m);
        Ok(weight_m)
    }

    /// Add an undirected edge with an explicit weight in metres.
    ///
    /// Weights shorter than the great-circle distance between the endpoints
    /// are accepted; [`DenseIndex::heuristic_scale`] shrinks the A* estimate
    /// to compensate.
    ///
    /// # Errors
    ///
    /// [`SpatialError::NodeNotFound`] for a missing endpoint,
    /// [`SpatialError::InvalidWeight`] for a negative or non-finite weight.
    pub fn add_edge_weighted(&mut self, from: NodeId, to: NodeId, weight_m: f64) -> SpatialResult<()> {
        self.endpoints(from, to)?;
        if !(weight_m.is_finite() && weight_m >= 0.0) {
            return Err(SpatialError::InvalidWeight { from, to, weight: weight_m });
        }
        self.insert_symmetric(from, to, weight_m);
        Ok(())
    }

    fn endpoints(&self, from: NodeId, to: NodeId) -> SpatialResult<(GeoPoint, GeoPoint)> {
        let lookup = |id: NodeId| {
            self.nodes.get(&id).copied().ok_or_else(|| {
                warn!("rejecting edge {from} -> {to}: {id} is not in the node set");
                SpatialError::NodeNotFound(id)
            })
        };
        Ok((lookup(from)?, lookup(to)?))
    }

    fn insert_symmetric(&mut self, from: NodeId, to: NodeId, weight_m: f64) {
        self.dense = None;
        self.adjacency.entry(from).or_default().push(Neighbor { to, weight_m });
        self.adjacency.entry(to).or_default().push(Neighbor { to: from, weight_m });
    }

    // ── Dense index ───────────────────────────────────────────────────────

    /// Number the adjacency keys `0..N-1` (in key-set iteration order) and
    /// build the CSR edge arrays.  O(N + E).
    ///
    /// Must be called again after any `add_node` / `add_edge`.
    pub fn build_index(&mut self) -> &DenseIndex {
        let dense = DenseIndex::build(&self.nodes, &self.adjacency);
        debug!(
            "dense index built: {} routable nodes, {} directed edges ({} nodes total)",
            dense.len(),
            dense.edge_count(),
            self.nodes.len(),
        );
        self.dense.insert(dense)
    }

    /// The dense index, or `None` if it was never built or is stale.
    #[inline]
    pub fn dense(&self) -> Option<&DenseIndex> {
        self.dense.as_ref()
    }

    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.dense.is_some()
    }

    // ── Read-only views ───────────────────────────────────────────────────

    pub fn nodes(&self) -> &FxHashMap<NodeId, GeoPoint> {
        &self.nodes
    }

    pub fn adjacency(&self) -> &FxHashMap<NodeId, Vec<Neighbor>> {
        &self.adjacency
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<GeoPoint> {
        self.nodes.get(&id).copied()
    }

    #[inline]
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Adjacent edges of `id`; empty for unknown or isolated nodes.
    pub fn neighbors(&self, id: NodeId) -> &[Neighbor] {
        self.adjacency.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub fn degree(&self, id: NodeId) -> usize {
        self.neighbors(id).len()
    }

    /// `true` if `id` has at least one adjacent edge.  The usual predicate
    /// for snapping query coordinates to routable nodes.
    #[inline]
    pub fn has_neighbors(&self, id: NodeId) -> bool {
        !self.neighbors(id).is_empty()
    }

    /// Weight of the lightest edge `from → to`, if they are adjacent.
    pub fn edge_weight(&self, from: NodeId, to: NodeId) -> Option<f64> {
        self.neighbors(from)
            .iter()
            .filter(|n| n.to == to)
            .map(|n| n.weight_m)
            .min_by(f64::total_cmp)
    }

    /// Haversine distance between two stored nodes.
    pub fn distance_between(&self, a: NodeId, b: NodeId) -> Option<f64> {
        Some(self.node(a)?.distance_m(self.node(b)?))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges (each stored twice internally).
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// ── DenseIndex ────────────────────────────────────────────────────────────────

/// Immutable `NodeId ↔ DenseIdx` bijection plus CSR adjacency.
///
/// Produced by [`Graph::build_index`]; all fields are derived and never
/// mutated afterwards.
#[derive(Clone, Debug)]
pub struct DenseIndex {
    id_to_index: FxHashMap<NodeId, DenseIdx>,
    index_to_id: Vec<NodeId>,
    /// Position of each dense node.  Indexed by `DenseIdx`.
    node_pos:    Vec<GeoPoint>,
    /// CSR row pointer.  Length = `len() + 1`.
    out_start:   Vec<u32>,
    edge_to:     Vec<DenseIdx>,
    edge_weight: Vec<f64>,
    /// `min(1, weight / haversine)` over all edges.
    heuristic_scale: f64,
}

impl DenseIndex {
    fn build(
        nodes: &FxHashMap<NodeId, GeoPoint>,
        adjacency: &FxHashMap<NodeId, Vec<Neighbor>>,
    ) -> Self {
        let n = adjacency.len();
        let mut id_to_index = FxHashMap::with_capacity_and_hasher(n, Default::default());
        let mut index_to_id = Vec::with_capacity(n);
        let mut node_pos = Vec::with_capacity(n);

        for (i, &id) in adjacency.keys().enumerate() {
            id_to_index.insert(id, DenseIdx(i as u32));
            index_to_id.push(id);
            // add_edge only accepts known endpoints, so every key has a position.
            node_pos.push(nodes[&id]);
        }

        let edge_count: usize = adjacency.values().map(Vec::len).sum();
        let mut out_start = Vec::with_capacity(n + 1);
        let mut edge_to = Vec::with_capacity(edge_count);
        let mut edge_weight = Vec::with_capacity(edge_count);

        let mut heuristic_scale: f64 = 1.0;
        out_start.push(0u32);
        for (i, id) in index_to_id.iter().enumerate() {
            for nb in &adjacency[id] {
                // Symmetric insertion guarantees every neighbor is itself a key.
                let to = id_to_index[&nb.to];
                // Positions are read now, so nodes moved after their edges
                // were weighted are measured where they currently are.
                let crow_m = node_pos[i].distance_m(node_pos[to.index()]);
                if crow_m > 0.0 {
                    heuristic_scale = heuristic_scale.min(nb.weight_m / crow_m);
                }
                edge_to.push(to);
                edge_weight.push(nb.weight_m);
            }
            out_start.push(edge_to.len() as u32);
        }
        debug_assert_eq!(edge_to.len(), edge_count);

        Self { id_to_index, index_to_id, node_pos, out_start, edge_to, edge_weight, heuristic_scale }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.index_to_id.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index_to_id.is_empty()
    }

    /// Total directed edges (twice the undirected count).
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    #[inline]
    pub fn index_of(&self, id: NodeId) -> Option<DenseIdx> {
        self.id_to_index.get(&id).copied()
    }

    #[inline]
    pub fn id_of(&self, idx: DenseIdx) -> NodeId {
        self.index_to_id[idx.index()]
    }

    /// Factor in `[0, 1]` applied to the great-circle estimate in A*.
    ///
    /// `1.0` when no edge is shorter than the straight line between its
    /// endpoints (always true for derived weights).  Otherwise the largest
    /// factor `c` with `c · haversine(u, v) ≤ weight(u, v)` on every edge,
    /// which keeps the scaled estimate admissible and consistent.
    #[inline]
    pub fn heuristic_scale(&self) -> f64 {
        self.heuristic_scale
    }

    /// Node ids in dense order.
    pub fn ids(&self) -> &[NodeId] {
        &self.index_to_id
    }

    #[inline]
    pub fn pos(&self, idx: DenseIdx) -> GeoPoint {
        self.node_pos[idx.index()]
    }

    /// `(neighbor, weight_m)` pairs of `idx` as a contiguous scan.
    #[inline]
    pub fn out_edges(&self, idx: DenseIdx) -> impl Iterator<Item = (DenseIdx, f64)> + '_ {
        let start = self.out_start[idx.index()] as usize;
        let end   = self.out_start[idx.index() + 1] as usize;
        self.edge_to[start..end]
            .iter()
            .copied()
            .zip(self.edge_weight[start..end].iter().copied())
    }

    #[inline]
    pub fn out_degree(&self, idx: DenseIdx) -> usize {
        (self.out_start[idx.index() + 1] - self.out_start[idx.index()]) as usize
    }
}
