// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_icicle --heading-base-level=0

//! Understory Icicle: the core of an interactive icicle chart.
//!
//! A [`Chart`] turns a caller-owned tree into a set of positioned, labelled cells on a
//! [`Surface`], and keeps that set in step with zooming and panning.
//!
//! - Lays the tree out with [`understory_partition`], in any of four orientations.
//! - Zooms and pans along the weight axis only, through [`understory_zoom`].
//! - Culls cells that are off screen or thinner than a pixel threshold ([`cull()`]).
//! - Reconciles each pass into enter/update/exit calls keyed by node id ([`Scene`]).
//! - Hit tests pointer events, tracks hover, and builds breadcrumb tooltips.
//!
//! ## Data
//!
//! The chart never copies or mutates your tree. Weights, children, labels, colors, and
//! extra classes are read through [`Accessor`]s: either a field key resolved by the
//! [`Record`] trait, or a function. With the `json` feature, `serde_json::Value` is a
//! [`Record`], so a JSON document can be charted directly.
//!
//! ## Update cycle
//!
//! Setters chain and only record what they invalidate. [`Chart::update`] applies the
//! pending work in order: relayout, zoom reset, then cull and reconcile. Between updates,
//! [`Chart::handle_event`] and [`Chart::tick`] drive interaction and zoom transitions.
//!
//! ## Surfaces
//!
//! A [`Surface`] is whatever draws: a retained scene graph, a DOM, a GPU batch. It receives
//! the view transform and per-node cells. [`Headless`] records calls and is handy for tests
//! and snapshots.
//!
//! # Example
//!
//! ```rust
//! use kurbo::Point;
//! use understory_icicle::{Chart, Headless, PointerEvent, Record};
//! use understory_partition::Orientation;
//!
//! struct Node {
//!     name: &'static str,
//!     value: f64,
//!     children: Vec<Node>,
//! }
//!
//! impl Record for Node {
//!     fn number(&self, key: &str) -> Option<f64> {
//!         (key == "value").then_some(self.value)
//!     }
//!     fn text(&self, key: &str) -> Option<String> {
//!         (key == "name").then(|| self.name.to_owned())
//!     }
//!     fn list(&self, key: &str) -> &[Self] {
//!         if key == "children" { &self.children } else { &[] }
//!     }
//! }
//!
//! let leaf = |name, value| Node { name, value, children: vec![] };
//! let tree = Node { name: "root", value: 0.0, children: vec![leaf("a", 4.0), leaf("b", 6.0)] };
//!
//! let mut chart = Chart::new(Headless::default());
//! chart
//!     .set_width(100.0)
//!     .set_height(100.0)
//!     .set_orientation(Orientation::TopDown)
//!     .set_disable_animations(true)
//!     .set_data(tree);
//!
//! let pass = chart.update();
//! assert_eq!(pass.entered.len(), 3);
//!
//! // Clicking "b" zooms it to fill the width.
//! let out = chart.handle_event(PointerEvent::Click(Point::new(70.0, 75.0)));
//! let b = out.target.unwrap();
//! assert_eq!(chart.breadcrumb(b), ["root", "b"]);
//! assert!((chart.zoom().transform().k - 100.0 / 60.0).abs() < 1e-9);
//! ```

mod accessor;
mod chart;
mod color;
mod config;
mod cull;
pub mod hover;
mod scene;
mod surface;
mod tooltip;

pub use accessor::{Accessor, Children, ChildrenFn, FromRecord, Record};
pub use chart::{Chart, EventOutcome, NodeCallback, NodePredicate, NodeText, PointerEvent};
pub use color::{Contrast, Luminance};
pub use config::{ChartOptions, Invalidation};
pub use cull::{cull, label_opacity};
pub use scene::{Cell, InverseScale, Label, Reconciled, Scene, Surface, Transition};
pub use surface::{Headless, SurfaceOp};
pub use tooltip::{Tooltip, escape};
