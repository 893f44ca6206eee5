// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Orientation mapping between canonical partition space and screen space.
//!
//! Canonical space puts the weight axis on `x` and the depth axis on `y`.
//! Each [`Orientation`] frames that space on a canvas:
//!
//! | Orientation | depth axis | weight axis |
//! |---|---|---|
//! | [`TopDown`](Orientation::TopDown) | `y`, downwards | `x` |
//! | [`BottomUp`](Orientation::BottomUp) | `y`, flipped about the canvas height | `x` |
//! | [`LeftRight`](Orientation::LeftRight) | `x`, rightwards | `y` |
//! | [`RightLeft`](Orientation::RightLeft) | `x`, flipped about the canvas width | `y` |
//!
//! Zooming and panning act along the weight axis only, see [`Orientation::zoom_axis`].

use alloc::string::{String, ToString};
use kurbo::{Point, Rect, Size, Vec2};

use crate::types::Axis;

/// Inset between a horizontal cell's edge and its label, in pixels.
const LABEL_INSET: f64 = 4.0;

/// Direction in which the tree grows on screen.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Root at the top.
    #[cfg_attr(feature = "serde", serde(rename = "td"))]
    TopDown,
    /// Root at the bottom.
    #[cfg_attr(feature = "serde", serde(rename = "bu"))]
    BottomUp,
    /// Root at the left.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "lr"))]
    LeftRight,
    /// Root at the right.
    #[cfg_attr(feature = "serde", serde(rename = "rl"))]
    RightLeft,
}

/// Horizontal text anchor for cell labels.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum LabelAnchor {
    /// Text starts at the anchor point.
    Start,
    /// Text is centered on the anchor point.
    Middle,
    /// Text ends at the anchor point.
    End,
}

/// Error returned when parsing an unknown orientation key.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown orientation `{0}`, expected one of td, bu, lr, rl")]
pub struct ParseOrientationError(String);

impl Orientation {
    /// All orientations, in key order `td`, `bu`, `lr`, `rl`.
    pub const ALL: [Self; 4] = [
        Self::TopDown,
        Self::BottomUp,
        Self::LeftRight,
        Self::RightLeft,
    ];

    /// Short key: `td`, `bu`, `lr`, or `rl`.
    pub const fn key(self) -> &'static str {
        match self {
            Self::TopDown => "td",
            Self::BottomUp => "bu",
            Self::LeftRight => "lr",
            Self::RightLeft => "rl",
        }
    }

    /// True when depth runs along the screen `x` axis.
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftRight | Self::RightLeft)
    }

    /// Screen axis carrying the weight axis; the only axis that pans and zooms.
    pub const fn zoom_axis(self) -> Axis {
        if self.is_horizontal() { Axis::Y } else { Axis::X }
    }

    /// Screen axis carrying the depth axis.
    pub const fn depth_axis(self) -> Axis {
        if self.is_horizontal() { Axis::X } else { Axis::Y }
    }

    /// Canonical layout extent for a canvas: `(weight extent, depth extent)`.
    pub fn canonical_size(self, canvas: Size) -> Size {
        if self.is_horizontal() {
            Size::new(canvas.height, canvas.width)
        } else {
            canvas
        }
    }

    /// Map canonical bounds to a screen rectangle on `canvas`.
    pub fn to_screen(self, b: Rect, canvas: Size) -> Rect {
        match self {
            Self::TopDown => Rect::new(b.x0, b.y0, b.x1, b.y1),
            Self::BottomUp => Rect::new(b.x0, canvas.height - b.y1, b.x1, canvas.height - b.y0),
            Self::LeftRight => Rect::new(b.y0, b.x0, b.y1, b.x1),
            Self::RightLeft => Rect::new(canvas.width - b.y1, b.x0, canvas.width - b.y0, b.x1),
        }
    }

    /// Map a screen point on `canvas` back to canonical space.
    pub fn to_canonical(self, p: Point, canvas: Size) -> Point {
        match self {
            Self::TopDown => p,
            Self::BottomUp => Point::new(p.x, canvas.height - p.y),
            Self::LeftRight => Point::new(p.y, p.x),
            Self::RightLeft => Point::new(p.y, canvas.width - p.x),
        }
    }

    /// Text anchor for labels.
    pub const fn label_anchor(self) -> LabelAnchor {
        match self {
            Self::LeftRight => LabelAnchor::Start,
            Self::RightLeft => LabelAnchor::End,
            Self::TopDown | Self::BottomUp => LabelAnchor::Middle,
        }
    }

    /// Label position relative to the cell's top-left corner.
    pub fn label_offset(self, cell: Size) -> Vec2 {
        let x = match self {
            Self::LeftRight => LABEL_INSET,
            Self::RightLeft => cell.width - LABEL_INSET,
            Self::TopDown | Self::BottomUp => cell.width / 2.0,
        };
        Vec2::new(x, cell.height / 2.0)
    }
}

impl core::fmt::Display for Orientation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.key())
    }
}

impl core::str::FromStr for Orientation {
    type Err = ParseOrientationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|o| o.key() == s)
            .ok_or_else(|| ParseOrientationError(s.to_string()))
    }
}
