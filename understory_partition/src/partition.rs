// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core partition implementation: weight aggregation, band assignment, span splitting, queries.

use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;
use kurbo::{Point, Rect, Size};

use crate::types::{LayoutNode, NodeId, PartitionOptions, Sibling};

/// Comparator applied to each sibling group before layout.
///
/// `Ordering::Less` places the first sibling earlier along the weight axis.
/// Sorting is stable, so equal siblings keep the children accessor's order.
pub type SortFn<T> = dyn for<'a, 'b> Fn(&Sibling<'a, T>, &Sibling<'b, T>) -> Ordering;

const ROOT: NodeId = NodeId::new(0);

/// A laid-out hierarchy.
///
/// Nodes live in a flat arena indexed by [`NodeId`] (pre-order). Parent links
/// are plain ids, so the structure holds no references into the caller's data
/// and no ownership cycles.
#[derive(Clone)]
pub struct Partition {
    nodes: Vec<LayoutNode>,
    visible: Vec<NodeId>,
    size: Size,
    max_depth: u32,
    band: f64,
    exclude_root: bool,
}

impl core::fmt::Debug for Partition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Partition")
            .field("nodes_total", &self.nodes.len())
            .field("nodes_visible", &self.visible.len())
            .field("size", &self.size)
            .field("max_depth", &self.max_depth)
            .field("band", &self.band)
            .field("exclude_root", &self.exclude_root)
            .finish_non_exhaustive()
    }
}

/// Scratch record used while gathering the caller's tree.
struct Gathered<'a, T> {
    datum: &'a T,
    parent: Option<usize>,
    source_index: usize,
    depth: u32,
    weight: f64,
    children: Vec<usize>,
}

impl Partition {
    /// Lay out the tree rooted at `root`.
    ///
    /// - `children` returns a datum's children; an empty slice makes it a leaf.
    /// - `weight` returns a datum's own weight. Negative, NaN, and infinite
    ///   weights count as `0`.
    /// - `sort`, if present, orders every sibling group.
    ///
    /// The root spans the full weight extent unless the whole tree is weightless,
    /// in which case every node has a zero span and nothing is visible.
    ///
    /// The children accessor must not introduce cycles.
    pub fn compute<T, C, W>(
        root: &T,
        children: C,
        weight: W,
        sort: Option<&SortFn<T>>,
        options: PartitionOptions,
    ) -> Self
    where
        C: for<'a> Fn(&'a T) -> &'a [T],
        W: Fn(&T) -> f64,
    {
        let mut gathered = Vec::new();
        gather(root, None, 0, 0, &children, &weight, sort, &mut gathered);
        let mut partition = Self::from_gathered(&gathered, options);
        partition.assign_bounds();
        if options.exclude_root {
            partition.exclude_root_band();
        }
        partition.collect_visible();
        partition
    }

    /// Renumber gathered nodes in pre-order (after sorting) and link them by id.
    fn from_gathered<T>(gathered: &[Gathered<'_, T>], options: PartitionOptions) -> Self {
        let mut order = Vec::with_capacity(gathered.len());
        let mut new_ids = vec![ROOT; gathered.len()];
        let mut stack = vec![0_usize];
        while let Some(g) = stack.pop() {
            new_ids[g] = id_at(order.len());
            order.push(g);
            stack.extend(gathered[g].children.iter().rev().copied());
        }

        let nodes: Vec<LayoutNode> = order
            .iter()
            .map(|&g| {
                let src = &gathered[g];
                LayoutNode {
                    parent: src.parent.map(|p| new_ids[p]),
                    children: src.children.iter().map(|&c| new_ids[c]).collect(),
                    depth: src.depth,
                    weight: src.weight,
                    bounds: Rect::ZERO,
                    source_index: src.source_index,
                }
            })
            .collect();

        let max_depth = nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        Self {
            nodes,
            visible: Vec::new(),
            size: options.size,
            max_depth,
            band: options.size.height / f64::from(max_depth + 1),
            exclude_root: options.exclude_root,
        }
    }

    /// Top-down pass: fixed-width depth bands, weight spans split among siblings.
    fn assign_bounds(&mut self) {
        let band = self.band;
        if let Some(root) = self.nodes.first_mut() {
            // A weightless tree collapses like any other weightless subtree.
            let width = if root.weight > 0.0 { self.size.width } else { 0.0 };
            root.bounds = Rect::new(0.0, 0.0, width, band);
        }
        // Pre-order guarantees every parent is placed before its children.
        for i in 0..self.nodes.len() {
            let parent = &self.nodes[i];
            let (x0, x1) = parent.weight_span();
            let total: f64 = parent
                .children
                .iter()
                .map(|c| self.nodes[c.index()].weight)
                .sum();
            let k = if total > 0.0 { (x1 - x0) / total } else { 0.0 };
            let mut x = x0;
            for c in 0..self.nodes[i].children.len() {
                let child_id = self.nodes[i].children[c];
                let child = &mut self.nodes[child_id.index()];
                let start = x;
                x += child.weight * k;
                let depth = f64::from(child.depth);
                child.bounds = Rect::new(start, band * depth, x, band * (depth + 1.0));
            }
        }
    }

    /// Drop band 0 and linearly stretch the remaining bands over the depth extent.
    fn exclude_root_band(&mut self) {
        let extent = self.size.height;
        let root_band = self.band;
        if self.max_depth == 0 || extent <= root_band {
            return;
        }
        let scale = extent / (extent - root_band);
        for node in &mut self.nodes {
            node.bounds.y0 = (node.bounds.y0 - root_band) * scale;
            node.bounds.y1 = (node.bounds.y1 - root_band) * scale;
        }
        self.band = extent / f64::from(self.max_depth);
    }

    fn collect_visible(&mut self) {
        self.visible = (0..self.nodes.len())
            .map(id_at)
            .filter(|&id| self.is_visible(id))
            .collect();
    }

    /// Returns true if `id` is part of the visible sequence.
    ///
    /// A node is visible when it has a non-zero weight span and is not an
    /// excluded root.
    pub fn is_visible(&self, id: NodeId) -> bool {
        if self.exclude_root && id == ROOT {
            return false;
        }
        self.nodes
            .get(id.index())
            .is_some_and(|n| n.bounds.width() > 0.0)
    }

    /// Look up a node by id, including nodes outside the visible sequence.
    pub fn get(&self, id: NodeId) -> Option<&LayoutNode> {
        self.nodes.get(id.index())
    }

    /// The root node's id.
    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// Iterate the visible nodes in pre-order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &LayoutNode)> + '_ {
        self.visible
            .iter()
            .map(move |&id| (id, &self.nodes[id.index()]))
    }

    /// Ids of the visible nodes in pre-order.
    pub fn visible_ids(&self) -> &[NodeId] {
        &self.visible
    }

    /// Number of visible nodes.
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    /// True if no node is visible.
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Number of nodes in the arena, visible or not.
    pub fn all_len(&self) -> usize {
        self.nodes.len()
    }

    /// Deepest level in the tree (the root alone is `0`).
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Width of one depth band, after root exclusion if enabled.
    pub fn band(&self) -> f64 {
        self.band
    }

    /// Canonical extent this partition was laid out in.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Whether the root band was excluded.
    pub fn excludes_root(&self) -> bool {
        self.exclude_root
    }

    /// Path from the root to `id` (inclusive). Empty if `id` is unknown.
    pub fn path_to_root(&self, mut id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.get(id).is_none() {
            return out;
        }
        loop {
            out.push(id);
            match self.nodes[id.index()].parent {
                Some(p) => id = p,
                None => break,
            }
        }
        out.reverse();
        out
    }

    /// Hit test a canonical-space point. Returns the visible node whose bounds contain it.
    ///
    /// Descends one band at a time from the root, so the cost is bounded by
    /// depth × fan-out rather than the node count.
    pub fn hit(&self, pt: Point) -> Option<NodeId> {
        if self.nodes.is_empty() {
            return None;
        }
        let mut level: &[NodeId] = core::slice::from_ref(&ROOT);
        loop {
            let id = *level.iter().find(|id| {
                let b = self.nodes[id.index()].bounds;
                b.x0 <= pt.x && pt.x < b.x1
            })?;
            let node = &self.nodes[id.index()];
            if pt.y < node.bounds.y0 {
                return None;
            }
            if pt.y < node.bounds.y1 {
                return self.is_visible(id).then_some(id);
            }
            level = &node.children;
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "NodeId uses 32-bit indices by design."
)]
const fn id_at(index: usize) -> NodeId {
    NodeId::new(index as u32)
}

fn sanitize_weight(w: f64) -> f64 {
    if w.is_finite() && w > 0.0 { w } else { 0.0 }
}

/// Depth-first gather: aggregates weights bottom-up and sorts each sibling group.
fn gather<'a, T, C, W>(
    datum: &'a T,
    parent: Option<usize>,
    source_index: usize,
    depth: u32,
    children: &C,
    weight: &W,
    sort: Option<&SortFn<T>>,
    out: &mut Vec<Gathered<'a, T>>,
) -> usize
where
    C: for<'b> Fn(&'b T) -> &'b [T],
    W: Fn(&T) -> f64,
{
    let idx = out.len();
    out.push(Gathered {
        datum,
        parent,
        source_index,
        depth,
        weight: 0.0,
        children: Vec::new(),
    });

    let mut total = sanitize_weight(weight(datum));
    let mut kids = Vec::new();
    for (i, child) in children(datum).iter().enumerate() {
        let c = gather(child, Some(idx), i, depth + 1, children, weight, sort, out);
        total += out[c].weight;
        kids.push(c);
    }
    if let Some(cmp) = sort {
        kids.sort_by(|&a, &b| {
            let sa = Sibling {
                datum: out[a].datum,
                weight: out[a].weight,
            };
            let sb = Sibling {
                datum: out[b].datum,
                weight: out[b].weight,
            };
            cmp(&sa, &sb)
        });
    }

    out[idx].weight = total;
    out[idx].children = kids;
    idx
}
