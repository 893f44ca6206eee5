// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene reconciliation: keeps a rendering surface in step with the culled node set.
//!
//! ## Model
//!
//! Each visible node becomes a [`Cell`] keyed by its [`NodeId`]. A [`Scene`]
//! remembers the cells of the previous pass and, given the next set, emits the
//! minimal enter/update/exit calls on a [`Surface`]:
//!
//! - New ids are entered collapsed along the weight axis, then updated to their
//!   target so the surface can grow them in.
//! - Ids present in both passes are updated.
//! - Ids missing from the next pass are exited; surfaces free them.
//!
//! Geometry changes are timed by a [`Transition`]. [`Transition::NONE`] asks the
//! surface to snap, which is what direct manipulation needs. The view transform
//! of a pass moves over the same transition as its cells, so label
//! counter-scaling and the view reach each scale together.

use std::collections::BTreeMap;
use std::time::Duration;

use kurbo::{Affine, Rect, Vec2};
use understory_partition::{Axis, LabelAnchor, NodeId};

/// Timing for attribute changes on the surface.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Transition {
    /// Interpolation time. Zero snaps.
    pub duration: Duration,
}

impl Transition {
    /// Apply immediately.
    pub const NONE: Self = Self {
        duration: Duration::ZERO,
    };

    /// Interpolate over `duration`.
    pub const fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// True if this transition snaps.
    pub fn is_instant(&self) -> bool {
        self.duration.is_zero()
    }
}

/// Label counter-scaling that keeps glyphs a constant screen size.
///
/// Cells are drawn under the zoom transform, which stretches the zoom axis by
/// `k`. The label is scaled by `1 / k` along `axis`, with `k` interpolated from
/// `from_k` to `to_k` over the update's transition, in step with the view
/// passed to [`Surface::set_view`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InverseScale {
    /// Axis the zoom stretches.
    pub axis: Axis,
    /// Scale at the start of the transition.
    pub from_k: f64,
    /// Scale at the end of the transition.
    pub to_k: f64,
}

impl InverseScale {
    /// A settled scale of `k`.
    pub fn settled(axis: Axis, k: f64) -> Self {
        Self {
            axis,
            from_k: k,
            to_k: k,
        }
    }

    /// Label transform at transition progress `t` in `[0, 1]`.
    pub fn at(&self, t: f64) -> Affine {
        let k = self.from_k + (self.to_k - self.from_k) * t;
        match self.axis {
            Axis::X => Affine::scale_non_uniform(1.0 / k, 1.0),
            Axis::Y => Affine::scale_non_uniform(1.0, 1.0 / k),
        }
    }
}

/// A cell's text label.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    /// Text to draw.
    pub text: String,
    /// Opacity in `[0, 1]`; fades labels that would not fit.
    pub opacity: f64,
    /// Horizontal text anchor.
    pub anchor: LabelAnchor,
    /// Position relative to the cell's top-left corner.
    pub offset: Vec2,
    /// Use light text, because the fill is dark.
    pub light: bool,
    /// Counter-scaling against the zoom.
    pub scale: InverseScale,
}

/// Everything a surface needs to draw one node.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    /// Screen rectangle in canvas coordinates, before the zoom transform.
    pub rect: Rect,
    /// Fill color, as given by the color accessor.
    pub fill: String,
    /// Class list; always starts with `node`.
    pub classes: Vec<String>,
    /// Label, if labels are shown.
    pub label: Option<Label>,
}

impl Cell {
    /// This cell squeezed to zero size along the weight axis, about its center.
    ///
    /// `weight_axis` is the screen axis carrying weight for the current orientation.
    pub fn collapsed(&self, weight_axis: Axis) -> Self {
        let c = self.rect.center();
        let rect = match weight_axis {
            Axis::X => Rect::new(c.x, self.rect.y0, c.x, self.rect.y1),
            Axis::Y => Rect::new(self.rect.x0, c.y, self.rect.x1, c.y),
        };
        Self {
            rect,
            ..self.clone()
        }
    }
}

/// A rendering backend driven by a [`Scene`].
pub trait Surface {
    /// Move the zoom transform applied to every cell to `view` over `transition`.
    fn set_view(&mut self, view: Affine, transition: Transition);
    /// Create the element for `id` in its initial state.
    fn enter(&mut self, id: NodeId, cell: &Cell);
    /// Move the element for `id` to `cell` over `transition`.
    fn update(&mut self, id: NodeId, cell: &Cell, transition: Transition);
    /// Remove the element for `id`, after `transition`.
    fn exit(&mut self, id: NodeId, transition: Transition);
}

/// What one reconcile pass did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reconciled {
    /// Ids created this pass.
    pub entered: Vec<NodeId>,
    /// Ids that already existed and were updated.
    pub updated: Vec<NodeId>,
    /// Ids removed this pass.
    pub exited: Vec<NodeId>,
}

/// The set of cells currently on a surface.
#[derive(Debug)]
pub struct Scene {
    live: BTreeMap<NodeId, Cell>,
    label_k: f64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// An empty scene.
    pub fn new() -> Self {
        Self {
            live: BTreeMap::new(),
            label_k: 1.0,
        }
    }

    /// Ids currently on the surface, ascending.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.live.keys().copied()
    }

    /// The last cell sent for `id`.
    pub fn cell(&self, id: NodeId) -> Option<&Cell> {
        self.live.get(&id)
    }

    /// True if `id` is on the surface.
    pub fn contains(&self, id: NodeId) -> bool {
        self.live.contains_key(&id)
    }

    /// Number of live cells.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// True if nothing is on the surface.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Scale of the last pass, where the next label tween starts.
    pub fn label_scale(&self) -> f64 {
        self.label_k
    }

    /// Reconcile `cells` (the next visible set, at zoom scale `k`) against the
    /// previous pass.
    ///
    /// `weight_axis` is the screen axis entering cells grow along. Label
    /// counter-scaling tweens from the scale of the previous pass to `k`, the
    /// same way the view does.
    pub fn reconcile<S: Surface + ?Sized>(
        &mut self,
        cells: Vec<(NodeId, Cell)>,
        k: f64,
        weight_axis: Axis,
        transition: Transition,
        surface: &mut S,
    ) -> Reconciled {
        let mut out = Reconciled::default();
        let mut next = BTreeMap::new();
        let mut prev = std::mem::take(&mut self.live);

        for (id, mut cell) in cells {
            if let Some(label) = cell.label.as_mut() {
                label.scale = InverseScale {
                    axis: label.scale.axis,
                    from_k: self.label_k,
                    to_k: k,
                };
            }
            if prev.remove(&id).is_some() {
                out.updated.push(id);
            } else {
                surface.enter(id, &cell.collapsed(weight_axis));
                out.entered.push(id);
            }
            surface.update(id, &cell, transition);
            next.insert(id, cell);
        }

        for id in prev.into_keys() {
            surface.exit(id, transition);
            out.exited.push(id);
        }

        self.live = next;
        self.label_k = k;

        #[cfg(feature = "tracing")]
        tracing::trace!(
            entered = out.entered.len(),
            updated = out.updated.len(),
            exited = out.exited.len(),
            instant = transition.is_instant(),
            "scene reconciled"
        );
        out
    }
}
