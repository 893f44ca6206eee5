// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The zoom transform and the set of axes it acts on.

use kurbo::{Affine, Point};

bitflags::bitflags! {
    /// Axes along which panning and zooming are enabled.
    ///
    /// A disabled axis keeps a translation of `0` and, when converted with
    /// [`ZoomTransform::to_affine`], a scale of `1`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ZoomAxes: u8 {
        /// Horizontal screen axis.
        const X = 0b0000_0001;
        /// Vertical screen axis.
        const Y = 0b0000_0010;
    }
}

impl Default for ZoomAxes {
    fn default() -> Self {
        Self::all()
    }
}

/// World-to-screen zoom transform: `screen = world × k + (x, y)`.
///
/// Translation is in screen units and is applied after scaling, matching
/// `translate(x, y) ∘ scale(k)`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoomTransform {
    /// Horizontal translation.
    pub x: f64,
    /// Vertical translation.
    pub y: f64,
    /// Uniform scale factor.
    pub k: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    /// No translation, unit scale.
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 1.0);

    /// Create a transform from its translation and scale.
    pub const fn new(x: f64, y: f64, k: f64) -> Self {
        Self { x, y, k }
    }

    /// Map a world point to screen space.
    pub fn apply(&self, p: Point) -> Point {
        Point::new(p.x * self.k + self.x, p.y * self.k + self.y)
    }

    /// Map a screen point back to world space.
    pub fn invert(&self, p: Point) -> Point {
        Point::new((p.x - self.x) / self.k, (p.y - self.y) / self.k)
    }

    /// Same translation, scale replaced by `k`.
    pub fn with_scale(self, k: f64) -> Self {
        Self { k, ..self }
    }

    /// Translate by a world-space offset, i.e. by `(dx, dy) × k` on screen.
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + self.k * dx, self.y + self.k * dy, self.k)
    }

    /// Shift so that world point `world` lands on screen point `screen`.
    pub fn align(self, screen: Point, world: Point) -> Self {
        Self::new(
            screen.x - world.x * self.k,
            screen.y - world.y * self.k,
            self.k,
        )
    }

    /// Linear interpolation of each component independently.
    pub fn lerp(self, to: Self, t: f64) -> Self {
        Self::new(
            self.x + (to.x - self.x) * t,
            self.y + (to.y - self.y) * t,
            self.k + (to.k - self.k) * t,
        )
    }

    /// Affine form, scaling only along enabled `axes`.
    pub fn to_affine(&self, axes: ZoomAxes) -> Affine {
        let sx = if axes.contains(ZoomAxes::X) { self.k } else { 1.0 };
        let sy = if axes.contains(ZoomAxes::Y) { self.k } else { 1.0 };
        Affine::translate((self.x, self.y)) * Affine::scale_non_uniform(sx, sy)
    }

    /// Force translation on disabled axes to `0`.
    pub fn pinned(self, axes: ZoomAxes) -> Self {
        Self::new(
            if axes.contains(ZoomAxes::X) { self.x } else { 0.0 },
            if axes.contains(ZoomAxes::Y) { self.y } else { 0.0 },
            self.k,
        )
    }
}
