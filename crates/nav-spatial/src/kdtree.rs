//! 2-D KD-tree for snapping coordinates to graph nodes.
//!
//! # Projection
//!
//! Points are projected once, at build time, onto a local equirectangular
//! plane centred on the mean latitude of the input:
//!
//! ```text
//! x = R · lon_rad · cos(ref_lat_rad)
//! y = R · lat_rad
//! ```
//!
//! Distances in that plane track true ground distance closely across a
//! single metropolitan area.  The reference latitude is part of the tree
//! instance ([`Projection`]), so trees built from different regions coexist
//! without interference.  Do not query a tree far outside the extent it was
//! built from.
//!
//! # Layout
//!
//! Nodes live in one contiguous arena (`Vec<KdNode>`) linked by `u32`
//! child indices.  The arena is the input point array itself, reordered in
//! place by recursive median selection (x at even depth, y at odd depth), so
//! the tree is balanced without any explicit rebalancing.
//!
//! The tree is immutable after [`KdTree::build`]; rebuild it when the node
//! set changes.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::debug;

use nav_core::{EARTH_RADIUS_M, GeoPoint, NodeId};

use crate::Graph;

/// Arena link meaning "no child".
const NIL: u32 = u32::MAX;

// ── Input point ───────────────────────────────────────────────────────────────

/// A node id with its geographic position, as fed to [`KdTree::build`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KdPoint {
    pub id: NodeId,
    pub pos: GeoPoint,
}

impl KdPoint {
    #[inline]
    pub fn new(id: NodeId, pos: GeoPoint) -> Self {
        Self { id, pos }
    }
}

// ── Projection ────────────────────────────────────────────────────────────────

/// Equirectangular projection fixed at build time.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Projection {
    ref_lat_deg: f64,
    cos_ref: f64,
}

impl Projection {
    pub fn new(ref_lat_deg: f64) -> Self {
        Self { ref_lat_deg, cos_ref: ref_lat_deg.to_radians().cos() }
    }

    /// Centre on the arithmetic mean latitude of `points` (0° if empty).
    fn centered_on(points: &[KdPoint]) -> Self {
        if points.is_empty() {
            return Self::new(0.0);
        }
        let sum: f64 = points.iter().map(|p| p.pos.lat).sum();
        Self::new(sum / points.len() as f64)
    }

    #[inline]
    pub fn ref_lat_deg(&self) -> f64 {
        self.ref_lat_deg
    }

    /// Planar `[x, y]` in metres.
    #[inline]
    pub fn project(&self, pos: GeoPoint) -> [f64; 2] {
        [
            EARTH_RADIUS_M * pos.lon.to_radians() * self.cos_ref,
            EARTH_RADIUS_M * pos.lat.to_radians(),
        ]
    }
}

// ── Arena node ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct KdNode {
    id:    NodeId,
    xy:    [f64; 2],
    left:  u32,
    right: u32,
}

#[inline]
fn sq_dist(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}

// ── k-nearest accumulator ─────────────────────────────────────────────────────

/// Max-heap entry ordered by squared distance (ties broken by id).
#[derive(Copy, Clone, Debug)]
struct Candidate {
    dist2: f64,
    id:    NodeId,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist2.total_cmp(&other.dist2).then(self.id.cmp(&other.id))
    }
}

/// Bounded max-heap holding the `k` best candidates seen so far.
///
/// Owned by a single `k_nearest` call and threaded through the recursion by
/// `&mut`; nothing outlives the query.
struct KBest {
    k:    usize,
    heap: BinaryHeap<Candidate>,
}

impl KBest {
    fn new(k: usize) -> Self {
        Self { k, heap: BinaryHeap::with_capacity(k) }
    }

    fn offer(&mut self, cand: Candidate) {
        if self.heap.len() < self.k {
            self.heap.push(cand);
        } else if let Some(mut worst) = self.heap.peek_mut() {
            if cand < *worst {
                *worst = cand;
            }
        }
    }

    /// Squared radius a subtree must beat to matter.  Infinite until full.
    fn bound(&self) -> f64 {
        if self.heap.len() < self.k {
            f64::INFINITY
        } else {
            self.heap.peek().map_or(f64::INFINITY, |c| c.dist2)
        }
    }

    fn into_sorted_ids(self) -> Vec<NodeId> {
        self.heap.into_sorted_vec().into_iter().map(|c| c.id).collect()
    }
}

// ── KdTree ────────────────────────────────────────────────────────────────────

/// Balanced 2-D KD-tree over projected node coordinates.
///
/// `KdTree` is plain data (`Send + Sync`); any number of threads may query a
/// shared instance concurrently.  Every query allocates its own scratch.
#[derive(Clone, Debug)]
pub struct KdTree {
    nodes:      Vec<KdNode>,
    root:       u32,
    projection: Projection,
}

impl Default for KdTree {
    fn default() -> Self {
        Self::build(&[])
    }
}

impl KdTree {
    /// Build from `points`.  O(N log N).
    pub fn build(points: &[KdPoint]) -> Self {
        let projection = Projection::centered_on(points);
        let mut nodes: Vec<KdNode> = points
            .iter()
            .map(|p| KdNode {
                id:    p.id,
                xy:    projection.project(p.pos),
                left:  NIL,
                right: NIL,
            })
            .collect();

        let root = build_range(&mut nodes, 0, 0);
        debug!(
            "kd-tree built: {} points, reference latitude {:.5}°",
            nodes.len(),
            projection.ref_lat_deg(),
        );
        Self { nodes, root, projection }
    }

    /// Index every node of `graph`, isolated ones included.  Filter with a
    /// predicate such as [`Graph::has_neighbors`] at query time.
    pub fn from_graph(graph: &Graph) -> Self {
        let points: Vec<KdPoint> = graph
            .nodes()
            .iter()
            .map(|(&id, &pos)| KdPoint::new(id, pos))
            .collect();
        Self::build(&points)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn reference_lat_deg(&self) -> f64 {
        self.projection.ref_lat_deg()
    }

    // ── Nearest ───────────────────────────────────────────────────────────

    /// Nearest indexed node to `pos`.  `None` only if the tree is empty.
    pub fn nearest(&self, pos: GeoPoint) -> Option<NodeId> {
        self.nearest_where(pos, |_| true)
    }

    /// Nearest node satisfying `accept`.  `None` if the tree is empty or no
    /// node is accepted.
    pub fn nearest_where<F>(&self, pos: GeoPoint, accept: F) -> Option<NodeId>
    where
        F: Fn(NodeId) -> bool,
    {
        if self.root == NIL {
            return None;
        }
        let q = self.projection.project(pos);
        let mut best: Option<(f64, NodeId)> = None;
        self.nearest_rec(self.root, q, 0, &accept, &mut best);
        best.map(|(_, id)| id)
    }

    /// Nearest node other than the nearest one.
    pub fn second_nearest(&self, pos: GeoPoint) -> Option<NodeId> {
        let first = self.nearest(pos)?;
        self.nearest_where(pos, |id| id != first)
    }

    fn nearest_rec<F>(
        &self,
        at: u32,
        q: [f64; 2],
        depth: usize,
        accept: &F,
        best: &mut Option<(f64, NodeId)>,
    ) where
        F: Fn(NodeId) -> bool,
    {
        let node = &self.nodes[at as usize];
        let d2 = sq_dist(node.xy, q);
        let improves = best.is_none_or(|(b, _)| d2 < b);
        if improves && accept(node.id) {
            *best = Some((d2, node.id));
        }

        let (near, far, diff) = self.split(node, q, depth);
        if near != NIL {
            self.nearest_rec(near, q, depth + 1, accept, best);
        }
        let bound = best.map_or(f64::INFINITY, |(b, _)| b);
        if far != NIL && diff * diff < bound {
            self.nearest_rec(far, q, depth + 1, accept, best);
        }
    }

    // ── k-nearest ─────────────────────────────────────────────────────────

    /// Up to `k` nearest nodes, ascending by distance.
    pub fn k_nearest(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        self.k_nearest_where(pos, k, |_| true)
    }

    /// Up to `k` nearest nodes satisfying `accept`, ascending by distance.
    /// Fewer than `k` are returned when fewer are accepted.
    pub fn k_nearest_where<F>(&self, pos: GeoPoint, k: usize, accept: F) -> Vec<NodeId>
    where
        F: Fn(NodeId) -> bool,
    {
        if self.root == NIL || k == 0 {
            return Vec::new();
        }
        let q = self.projection.project(pos);
        let mut acc = KBest::new(k.min(self.nodes.len()));
        self.k_nearest_rec(self.root, q, 0, &accept, &mut acc);
        acc.into_sorted_ids()
    }

    fn k_nearest_rec<F>(&self, at: u32, q: [f64; 2], depth: usize, accept: &F, acc: &mut KBest)
    where
        F: Fn(NodeId) -> bool,
    {
        let node = &self.nodes[at as usize];
        let d2 = sq_dist(node.xy, q);
        if d2 < acc.bound() && accept(node.id) {
            acc.offer(Candidate { dist2: d2, id: node.id });
        }

        let (near, far, diff) = self.split(node, q, depth);
        if near != NIL {
            self.k_nearest_rec(near, q, depth + 1, accept, acc);
        }
        if far != NIL && diff * diff < acc.bound() {
            self.k_nearest_rec(far, q, depth + 1, accept, acc);
        }
    }

    /// Children ordered (query side, other side) plus the signed offset of
    /// the query from the splitting plane.
    #[inline]
    fn split(&self, node: &KdNode, q: [f64; 2], depth: usize) -> (u32, u32, f64) {
        let axis = depth % 2;
        let diff = q[axis] - node.xy[axis];
        if diff < 0.0 {
            (node.left, node.right, diff)
        } else {
            (node.right, node.left, diff)
        }
    }
}

/// Recursively median-split `nodes` on alternating axes and link children.
/// Returns the arena index of the subtree root.
fn build_range(nodes: &mut [KdNode], offset: usize, depth: usize) -> u32 {
    if nodes.is_empty() {
        return NIL;
    }
    let axis = depth % 2;
    let mid = nodes.len() / 2;
    nodes.select_nth_unstable_by(mid, |a, b| a.xy[axis].total_cmp(&b.xy[axis]));

    let (lower, rest) = nodes.split_at_mut(mid);
    let (median, upper) = rest.split_at_mut(1);
    median[0].left = build_range(lower, offset, depth + 1);
    median[0].right = build_range(upper, offset + mid + 1, depth + 1);
    (offset + mid) as u32
}
