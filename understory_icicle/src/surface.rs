// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A headless [`Surface`] that records what it is asked to draw.

use std::collections::BTreeMap;

use kurbo::Affine;
use understory_partition::NodeId;

use crate::scene::{Cell, Surface, Transition};

/// One call received by a [`Headless`] surface.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    /// [`Surface::set_view`].
    View(Affine, Transition),
    /// [`Surface::enter`].
    Enter(NodeId, Cell),
    /// [`Surface::update`].
    Update(NodeId, Cell, Transition),
    /// [`Surface::exit`].
    Exit(NodeId, Transition),
}

/// Keeps the target state of every element plus a log of calls.
///
/// Useful for tests, for server-side snapshots, and as a reference for
/// writing real backends.
#[derive(Clone, Debug, Default)]
pub struct Headless {
    cells: BTreeMap<NodeId, Cell>,
    view: Affine,
    log: Vec<SurfaceOp>,
}

impl Headless {
    /// Target state of the element for `id`.
    pub fn cell(&self, id: NodeId) -> Option<&Cell> {
        self.cells.get(&id)
    }

    /// All live elements, by id.
    pub fn cells(&self) -> impl Iterator<Item = (NodeId, &Cell)> + '_ {
        self.cells.iter().map(|(id, c)| (*id, c))
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if there are no live elements.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Target of the last view transform.
    pub fn view(&self) -> Affine {
        self.view
    }

    /// Calls received so far.
    pub fn log(&self) -> &[SurfaceOp] {
        &self.log
    }

    /// Drain the call log.
    pub fn take_log(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.log)
    }
}

impl Surface for Headless {
    fn set_view(&mut self, view: Affine, transition: Transition) {
        self.view = view;
        self.log.push(SurfaceOp::View(view, transition));
    }

    fn enter(&mut self, id: NodeId, cell: &Cell) {
        self.cells.insert(id, cell.clone());
        self.log.push(SurfaceOp::Enter(id, cell.clone()));
    }

    fn update(&mut self, id: NodeId, cell: &Cell, transition: Transition) {
        self.cells.insert(id, cell.clone());
        self.log.push(SurfaceOp::Update(id, cell.clone(), transition));
    }

    fn exit(&mut self, id: NodeId, transition: Transition) {
        self.cells.remove(&id);
        self.log.push(SurfaceOp::Exit(id, transition));
    }
}
