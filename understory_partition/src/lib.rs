// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_partition --heading-base-level=0

//! Understory Partition: a Kurbo-native weighted partition layout.
//!
//! Understory Partition lays out a tree as an icicle: every node becomes a rectangle whose
//! extent along the weight axis is proportional to its aggregate weight, and whose position
//! along the depth axis is its tree level.
//!
//! - Aggregates weights bottom-up (own weight plus descendants).
//! - Assigns fixed-width depth bands and splits each parent's weight span among its children.
//! - Optionally drops the root band and stretches the remaining bands.
//! - Frames canonical geometry on a canvas in one of four [`Orientation`]s.
//! - Answers hit tests and root→node paths without touching the caller's data.
//!
//! ## Canonical space
//!
//! Layout happens in a canonical space where `x` is the weight axis and `y` is the depth axis.
//! [`Orientation::canonical_size`] turns a canvas size into that space and
//! [`Orientation::to_screen`] maps node bounds back onto the canvas.
//!
//! ## Identity
//!
//! Nodes are stored in a flat arena and addressed by [`NodeId`], the node's pre-order index.
//! Ids are stable for the lifetime of one [`Partition`]; a new layout pass renumbers.
//! Each [`LayoutNode`] records its [`source_index`](LayoutNode::source_index) so callers can
//! walk from the root to the originating datum instead of having the layout write into it.
//!
//! ## Not a renderer
//!
//! This crate knows nothing about zoom, culling, or drawing. Those live in higher layers that
//! consume the node sequence produced here.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use understory_partition::{Orientation, Partition, PartitionOptions};
//!
//! struct Item {
//!     size: f64,
//!     children: Vec<Item>,
//! }
//!
//! let tree = Item {
//!     size: 0.0,
//!     children: vec![
//!         Item { size: 4.0, children: vec![] },
//!         Item { size: 6.0, children: vec![] },
//!     ],
//! };
//!
//! let orientation = Orientation::TopDown;
//! let canvas = Size::new(100.0, 100.0);
//! let partition = Partition::compute(
//!     &tree,
//!     |d| d.children.as_slice(),
//!     |d| d.size,
//!     None,
//!     PartitionOptions { size: orientation.canonical_size(canvas), exclude_root: false },
//! );
//!
//! // Root plus two children.
//! assert_eq!(partition.len(), 3);
//!
//! // The second child spans 60% of the width, in the second band.
//! let (id, node) = partition.nodes().nth(2).unwrap();
//! let screen = orientation.to_screen(node.bounds(), canvas);
//! assert_eq!((screen.width(), screen.y0), (60.0, 50.0));
//!
//! // Hit testing goes through canonical space.
//! let hit = partition.hit(orientation.to_canonical(Point::new(90.0, 75.0), canvas));
//! assert_eq!(hit, Some(id));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod orientation;
mod partition;
mod types;

pub use orientation::{LabelAnchor, Orientation, ParseOrientationError};
pub use partition::{Partition, SortFn};
pub use types::{Axis, LayoutNode, NodeId, PartitionOptions, Sibling};
