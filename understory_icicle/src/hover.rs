// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover tracking over root→node paths.
//!
//! The chart hit tests every pointer move; [`HoverState`] turns consecutive
//! hits into the nodes the pointer left and entered, so callbacks fire only
//! when the hovered node actually changes.
//!
//! ```
//! use understory_icicle::hover::HoverState;
//!
//! let mut hover = HoverState::<u32>::default();
//! let d = hover.update(&[0, 1, 4]);
//! assert_eq!(d.entered, [0, 1, 4]);
//! let d = hover.update(&[0, 2]);
//! assert_eq!((d.left.as_slice(), d.entered.as_slice()), (&[4, 1][..], &[2][..]));
//! ```

/// Nodes left and entered by one hover update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverDiff<K> {
    /// Nodes no longer under the pointer, innermost first.
    pub left: Vec<K>,
    /// Nodes newly under the pointer, outermost first.
    pub entered: Vec<K>,
}

impl<K> HoverDiff<K> {
    /// True if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.entered.is_empty()
    }
}

/// The currently hovered root→node path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverState<K> {
    path: Vec<K>,
}

impl<K> Default for HoverState<K> {
    fn default() -> Self {
        Self { path: Vec::new() }
    }
}

impl<K: Copy + Eq> HoverState<K> {
    /// Current root→node path; empty when nothing is hovered.
    pub fn path(&self) -> &[K] {
        &self.path
    }

    /// The innermost hovered node.
    pub fn target(&self) -> Option<K> {
        self.path.last().copied()
    }

    /// Replace the hovered path with `next` and report what changed.
    pub fn update(&mut self, next: &[K]) -> HoverDiff<K> {
        let shared = self
            .path
            .iter()
            .zip(next)
            .take_while(|(a, b)| a == b)
            .count();
        let diff = HoverDiff {
            left: self.path[shared..].iter().rev().copied().collect(),
            entered: next[shared..].to_vec(),
        };
        self.path.clear();
        self.path.extend_from_slice(next);
        diff
    }

    /// Forget the hovered path, reporting every node as left.
    pub fn clear(&mut self) -> HoverDiff<K> {
        self.update(&[])
    }
}
