// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The zoom/pan state machine.

use alloc::boxed::Box;
use core::time::Duration;
use kurbo::{Point, Rect, Vec2};

use crate::transform::{ZoomAxes, ZoomTransform};

/// Lifecycle of a [`Zoom`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ZoomState {
    /// Not attached to a viewport yet. Every operation is a no-op.
    Uninitialized,
    /// Attached, no transition in flight.
    Idle,
    /// Attached, a timed transition is being sampled by [`Zoom::advance`].
    Transitioning,
}

/// Notification emitted each time a transform is applied.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ZoomChange {
    /// The transform now in effect.
    pub transform: ZoomTransform,
    /// The transform in effect before this change.
    pub previous: ZoomTransform,
    /// Time left in the transition that produced this change; zero for the final
    /// sample and for immediate changes.
    pub remaining: Duration,
    /// True when the change comes from direct manipulation (drag or wheel).
    ///
    /// Consumers should apply such changes without animation, so that visuals
    /// track the pointer.
    pub direct: bool,
}

/// A zoom change listener.
pub type Listener = dyn FnMut(&ZoomChange);

#[derive(Copy, Clone, Debug)]
struct Transition {
    from: ZoomTransform,
    to: ZoomTransform,
    duration: Duration,
    elapsed: Duration,
}

/// Zoom/pan engine.
///
/// Owns a [`ZoomTransform`] and keeps it within a scale extent and a
/// translate extent, on a subset of axes. Programmatic operations
/// ([`zoom_by`](Self::zoom_by), [`zoom_reset`](Self::zoom_reset),
/// [`zoom_to`](Self::zoom_to)) may animate; direct manipulation
/// ([`pan_by`](Self::pan_by), [`scale_at`](Self::scale_at)) never does.
///
/// Starting any operation while a transition is in flight discards the rest of
/// that transition; the new operation starts from the transform reached so far.
pub struct Zoom {
    state: ZoomState,
    transform: ZoomTransform,
    viewport: Rect,
    scale_extent: (f64, f64),
    translate_extent: Rect,
    axes: ZoomAxes,
    transition: Option<Transition>,
    listener: Option<Box<Listener>>,
}

impl core::fmt::Debug for Zoom {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Zoom")
            .field("state", &self.state)
            .field("transform", &self.transform)
            .field("viewport", &self.viewport)
            .field("scale_extent", &self.scale_extent)
            .field("translate_extent", &self.translate_extent)
            .field("axes", &self.axes)
            .field("has_listener", &self.listener.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self::new()
    }
}

impl Zoom {
    /// Create an unattached engine at the identity transform.
    ///
    /// Defaults: scale extent `[1, ∞)`, unbounded translate extent, both axes enabled.
    pub fn new() -> Self {
        Self {
            state: ZoomState::Uninitialized,
            transform: ZoomTransform::IDENTITY,
            viewport: Rect::ZERO,
            scale_extent: (1.0, f64::INFINITY),
            translate_extent: Rect::new(
                f64::NEG_INFINITY,
                f64::NEG_INFINITY,
                f64::INFINITY,
                f64::INFINITY,
            ),
            axes: ZoomAxes::all(),
            transition: None,
            listener: None,
        }
    }

    /// Mount the engine on a viewport. Operations take effect from here on.
    pub fn attach(&mut self, viewport: Rect) {
        self.viewport = viewport;
        if self.state == ZoomState::Uninitialized {
            self.state = ZoomState::Idle;
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ZoomState {
        self.state
    }

    /// True once [`attach`](Self::attach) has been called.
    pub fn is_attached(&self) -> bool {
        self.state != ZoomState::Uninitialized
    }

    /// True while a timed transition is in flight.
    pub fn is_transitioning(&self) -> bool {
        self.state == ZoomState::Transitioning
    }

    /// The transform currently in effect.
    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    /// The transform the engine is heading to: the transition target if one is
    /// in flight, otherwise the current transform.
    pub fn target(&self) -> ZoomTransform {
        self.transition.map_or(self.transform, |t| t.to)
    }

    /// Viewport rectangle in screen space.
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Replace the viewport without touching the transform.
    pub fn set_viewport(&mut self, viewport: Rect) -> &mut Self {
        self.viewport = viewport;
        self
    }

    /// Allowed `[min, max]` scale.
    pub fn scale_extent(&self) -> (f64, f64) {
        self.scale_extent
    }

    /// Set the allowed scale range. Bounds are swapped if given in reverse.
    pub fn set_scale_extent(&mut self, min: f64, max: f64) -> &mut Self {
        self.scale_extent = if min <= max { (min, max) } else { (max, min) };
        self
    }

    /// World-space rectangle the viewport must stay within.
    pub fn translate_extent(&self) -> Rect {
        self.translate_extent
    }

    /// Set the world-space rectangle the viewport must stay within.
    pub fn set_translate_extent(&mut self, extent: Rect) -> &mut Self {
        self.translate_extent = extent;
        self
    }

    /// Axes along which the transform may translate.
    pub fn axes(&self) -> ZoomAxes {
        self.axes
    }

    /// Choose the axes along which the transform may translate.
    ///
    /// The current transform and any running transition lose their
    /// translation on axes that become disabled.
    pub fn set_axes(&mut self, axes: ZoomAxes) -> &mut Self {
        self.axes = axes;
        self.transform = self.transform.pinned(axes);
        if let Some(tr) = self.transition.as_mut() {
            tr.from = tr.from.pinned(axes);
            tr.to = tr.to.pinned(axes);
        }
        self
    }

    /// Register a listener that sees every applied change, in order.
    pub fn set_listener(&mut self, listener: impl FnMut(&ZoomChange) + 'static) -> &mut Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Remove the listener, if any.
    pub fn clear_listener(&mut self) -> &mut Self {
        self.listener = None;
        self
    }

    /// Scale by `factor` about the viewport center.
    pub fn zoom_by(&mut self, factor: f64, duration: Duration) -> Option<ZoomChange> {
        if !self.is_attached() {
            return self.ignored("zoom_by");
        }
        let target = self.scaled_about(factor, self.viewport.center());
        self.transition_to(target, duration)
    }

    /// Return to the origin at minimum scale.
    ///
    /// The reset transform is exactly `{x: 0, y: 0, k: min}`; it is not shifted
    /// by the translate extent.
    pub fn zoom_reset(&mut self, duration: Duration) -> Option<ZoomChange> {
        if !self.is_attached() {
            return self.ignored("zoom_reset");
        }
        let target = ZoomTransform::new(0.0, 0.0, self.scale_extent.0);
        self.transition_to(target, duration)
    }

    /// Zoom to scale `k` with the world-space offset `(x, y)` at the origin.
    ///
    /// The resulting transform is `identity.scale(k).translate(x, y)`, so a
    /// world coordinate `-x` lands on screen coordinate `0`.
    pub fn zoom_to(&mut self, x: f64, y: f64, k: f64, duration: Duration) -> Option<ZoomChange> {
        if !self.is_attached() {
            return self.ignored("zoom_to");
        }
        let k = self.clamp_scale(k);
        let target = ZoomTransform::IDENTITY.with_scale(k).translate(x, y);
        self.transition_to(self.constrain(target), duration)
    }

    /// Apply an arbitrary transform, constrained, optionally animated.
    pub fn set_transform(
        &mut self,
        transform: ZoomTransform,
        duration: Duration,
    ) -> Option<ZoomChange> {
        if !self.is_attached() {
            return self.ignored("set_transform");
        }
        let target = self.constrain(transform.with_scale(self.clamp_scale(transform.k)));
        self.transition_to(target, duration)
    }

    /// Pan by a screen-space offset. Applies immediately.
    pub fn pan_by(&mut self, delta: Vec2) -> Option<ZoomChange> {
        if !self.is_attached() {
            return self.ignored("pan_by");
        }
        self.cancel_transition();
        let t = self.transform;
        let moved = ZoomTransform::new(t.x + delta.x, t.y + delta.y, t.k);
        Some(self.apply(self.constrain(moved), Duration::ZERO, true))
    }

    /// Scale by `factor` keeping the screen point `anchor` fixed. Applies immediately.
    ///
    /// This is the wheel gesture; see [`wheel_factor`](crate::wheel_factor).
    pub fn scale_at(&mut self, factor: f64, anchor: Point) -> Option<ZoomChange> {
        if !self.is_attached() {
            return self.ignored("scale_at");
        }
        self.cancel_transition();
        let target = self.scaled_about(factor, anchor);
        Some(self.apply(target, Duration::ZERO, true))
    }

    /// Sample the running transition `dt` later.
    ///
    /// Returns the applied change, or `None` when nothing is in flight.
    pub fn advance(&mut self, dt: Duration) -> Option<ZoomChange> {
        let mut tr = self.transition?;
        tr.elapsed = tr.elapsed.saturating_add(dt);
        let remaining = tr.duration.saturating_sub(tr.elapsed);
        let next = if remaining.is_zero() {
            self.transition = None;
            self.state = ZoomState::Idle;
            #[cfg(feature = "tracing")]
            tracing::debug!(transform = ?tr.to, "zoom transition finished");
            tr.to
        } else {
            let t = tr.elapsed.as_secs_f64() / tr.duration.as_secs_f64();
            self.transition = Some(tr);
            tr.from.lerp(tr.to, t)
        };
        Some(self.apply(next, remaining, false))
    }

    /// Stop the running transition where it is.
    pub fn cancel_transition(&mut self) {
        if self.transition.take().is_some() {
            #[cfg(feature = "tracing")]
            tracing::debug!(transform = ?self.transform, "zoom transition cancelled");
            self.state = ZoomState::Idle;
        }
    }

    fn transition_to(&mut self, target: ZoomTransform, duration: Duration) -> Option<ZoomChange> {
        self.cancel_transition();
        let target = target.pinned(self.axes);
        if duration.is_zero() {
            return Some(self.apply(target, Duration::ZERO, false));
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(from = ?self.transform, to = ?target, ?duration, "zoom transition started");
        self.transition = Some(Transition {
            from: self.transform,
            to: target,
            duration,
            elapsed: Duration::ZERO,
        });
        self.state = ZoomState::Transitioning;
        None
    }

    fn apply(&mut self, transform: ZoomTransform, remaining: Duration, direct: bool) -> ZoomChange {
        let change = ZoomChange {
            transform: transform.pinned(self.axes),
            previous: self.transform,
            remaining,
            direct,
        };
        self.transform = change.transform;
        #[cfg(feature = "tracing")]
        tracing::trace!(transform = ?change.transform, direct, "zoom applied");
        if let Some(listener) = self.listener.as_mut() {
            listener(&change);
        }
        change
    }

    fn scaled_about(&self, factor: f64, anchor: Point) -> ZoomTransform {
        let t = self.transform;
        let world = t.invert(anchor);
        let scaled = t.with_scale(self.clamp_scale(t.k * factor));
        self.constrain(scaled.align(anchor, world))
    }

    fn clamp_scale(&self, k: f64) -> f64 {
        let (min, max) = self.scale_extent;
        k.max(min).min(max)
    }

    /// Shift `t` so the viewport stays inside the translate extent.
    ///
    /// When the extent is smaller than the viewport along an axis, the extent is
    /// centered in it.
    fn constrain(&self, t: ZoomTransform) -> ZoomTransform {
        let vp = self.viewport;
        let ex = self.translate_extent;
        let lo = t.invert(Point::new(vp.x0, vp.y0));
        let hi = t.invert(Point::new(vp.x1, vp.y1));
        let dx = correction(lo.x - ex.x0, hi.x - ex.x1);
        let dy = correction(lo.y - ex.y0, hi.y - ex.y1);
        t.translate(dx, dy)
    }

    fn ignored(&self, op: &'static str) -> Option<ZoomChange> {
        #[cfg(feature = "tracing")]
        tracing::trace!(op, "zoom operation before attach ignored");
        let _ = op;
        None
    }
}

/// World-space correction along one axis, given how far the viewport's low and
/// high edges overshoot the extent's low and high edges.
fn correction(d0: f64, d1: f64) -> f64 {
    if d1 > d0 {
        (d0 + d1) / 2.0
    } else if d0 < 0.0 {
        d0
    } else {
        d1.max(0.0)
    }
}

/// How a wheel delta is measured.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DeltaMode {
    /// Pixels.
    #[default]
    Pixel,
    /// Lines.
    Line,
    /// Pages.
    Page,
}

/// Scale factor for a wheel delta: `2^(-delta × unit)` with units of 0.002 per
/// pixel, 0.05 per line and 1 per page. Scrolling down zooms out.
#[cfg(feature = "std")]
pub fn wheel_factor(delta: f64, mode: DeltaMode) -> f64 {
    let unit = match mode {
        DeltaMode::Pixel => 0.002,
        DeltaMode::Line => 0.05,
        DeltaMode::Page => 1.0,
    };
    2.0_f64.powf(-delta * unit)
}
