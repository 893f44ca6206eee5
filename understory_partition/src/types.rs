// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the partition: node identifiers, laid-out nodes, and sibling views.

use alloc::vec::Vec;
use kurbo::Rect;

/// Identifier for a node in a [`Partition`](crate::Partition).
///
/// This is a small, copyable handle holding the node's pre-order index in the
/// layout pass that produced it.
///
/// ## Semantics
///
/// - The root is always index `0`; descendants follow in pre-order, siblings in
///   their final (possibly sorted) order.
/// - Identifiers are only meaningful for the partition that produced them.
///   Any relayout (new data, accessors, comparator, orientation, canvas size,
///   or root exclusion) may hand the same index to a different node.
/// - Because indices are reassigned deterministically, an unchanged tree laid out
///   twice yields the same identifiers, which lets a renderer key its elements
///   by `NodeId` and morph between layouts.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32) -> Self {
        Self(idx)
    }

    /// Pre-order index of this node within its partition.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Layout axis in screen space.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Axis {
    /// Horizontal screen axis.
    X,
    /// Vertical screen axis.
    Y,
}

/// A node after layout.
///
/// Geometry is stored in canonical partition space: `x` runs along the weight
/// axis (sibling share) and `y` along the depth axis (tree level). Use
/// [`Orientation::to_screen`](crate::Orientation::to_screen) to frame it.
#[derive(Clone, Debug)]
pub struct LayoutNode {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) depth: u32,
    pub(crate) weight: f64,
    pub(crate) bounds: Rect,
    pub(crate) source_index: usize,
}

impl LayoutNode {
    /// Parent node, `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in layout order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Tree level; the root is `0`.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Aggregate weight: own weight plus the aggregate weight of all children.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Canonical bounds (`x` = weight axis, `y` = depth axis).
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Interval covered along the weight axis.
    pub fn weight_span(&self) -> (f64, f64) {
        (self.bounds.x0, self.bounds.x1)
    }

    /// Interval covered along the depth axis.
    pub fn depth_span(&self) -> (f64, f64) {
        (self.bounds.y0, self.bounds.y1)
    }

    /// Position of this node's datum in its parent's children list, as returned
    /// by the children accessor (before sorting). The root reports `0`.
    ///
    /// Together with [`Partition::path_to_root`](crate::Partition::path_to_root)
    /// this resolves a node back to the caller's data without storing references
    /// into it.
    pub fn source_index(&self) -> usize {
        self.source_index
    }
}

/// A sibling as seen by a sort comparator: the caller's datum plus its aggregate weight.
#[derive(Debug)]
pub struct Sibling<'a, T> {
    /// The caller's datum.
    pub datum: &'a T,
    /// Aggregate weight of the datum's subtree.
    pub weight: f64,
}

impl<T> Clone for Sibling<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Sibling<'_, T> {}

/// Options controlling a layout pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PartitionOptions {
    /// Canonical extent: `width` along the weight axis, `height` along the depth axis.
    ///
    /// See [`Orientation::canonical_size`](crate::Orientation::canonical_size) to
    /// derive it from a canvas size.
    pub size: kurbo::Size,
    /// Drop the root band and stretch the remaining bands over the full depth extent.
    pub exclude_root: bool,
}

impl Default for PartitionOptions {
    fn default() -> Self {
        Self {
            size: kurbo::Size::new(1.0, 1.0),
            exclude_root: false,
        }
    }
}
