// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_zoom --heading-base-level=0

//! Understory Zoom: a Kurbo-native zoom/pan state machine.
//!
//! Understory Zoom owns a single [`ZoomTransform`] (`translate(x, y) ∘ scale(k)`) and keeps it
//! inside a scale extent and a translate extent, along the axes you enable.
//! It has no event loop and no clock of its own: the host drives it with operations and with
//! [`Zoom::advance`] once per frame.
//!
//! - Programmatic zooms ([`Zoom::zoom_by`], [`Zoom::zoom_reset`], [`Zoom::zoom_to`]) take a
//!   duration. Zero applies at once; otherwise a linear transition starts.
//! - Direct manipulation ([`Zoom::pan_by`], [`Zoom::scale_at`]) always applies at once and is
//!   tagged [`direct`](ZoomChange::direct), so consumers can skip their own animation.
//! - A new operation replaces any transition in flight, starting from where it got to.
//! - Every applied transform is reported as a [`ZoomChange`], both as a return value and to an
//!   optional listener, in application order.
//!
//! ## Lifecycle
//!
//! A fresh [`Zoom`] is [`Uninitialized`](ZoomState::Uninitialized) and ignores every operation
//! until [`Zoom::attach`] gives it a viewport. This lets owners issue zoom calls before their
//! surface exists without special-casing it.
//!
//! ## Constraints
//!
//! Scale is clamped to [`Zoom::scale_extent`] (default `[1, ∞)`). Translation is then corrected
//! so the viewport stays inside [`Zoom::translate_extent`], centering the extent when it is
//! smaller than the viewport. Translation along an axis missing from [`Zoom::axes`] is always `0`.
//!
//! # Example
//!
//! ```rust
//! use core::time::Duration;
//! use kurbo::Rect;
//! use understory_zoom::{Zoom, ZoomAxes, ZoomTransform};
//!
//! let view = Rect::new(0.0, 0.0, 400.0, 300.0);
//! let mut zoom = Zoom::new();
//! zoom.set_translate_extent(view).set_axes(ZoomAxes::X);
//!
//! // Not attached yet: ignored.
//! assert!(zoom.zoom_by(2.0, Duration::ZERO).is_none());
//!
//! zoom.attach(view);
//! let change = zoom.zoom_by(2.0, Duration::ZERO).unwrap();
//! assert_eq!(change.transform, ZoomTransform::new(-200.0, 0.0, 2.0));
//!
//! // Animated: sampled by the host once per frame.
//! zoom.zoom_reset(Duration::from_millis(200));
//! let step = zoom.advance(Duration::from_millis(100)).unwrap();
//! assert_eq!(step.transform.k, 1.5);
//! ```
//!
//! This crate is `no_std` and uses `alloc`. [`wheel_factor`] needs the `std` feature.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod transform;
mod zoom;

pub use transform::{ZoomAxes, ZoomTransform};
#[cfg(feature = "std")]
pub use zoom::wheel_factor;
pub use zoom::{DeltaMode, Listener, Zoom, ZoomChange, ZoomState};
