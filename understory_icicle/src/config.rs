// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plain-value chart options and the invalidation flags they raise.

use std::time::Duration;

use kurbo::Size;
use understory_partition::Orientation;

bitflags::bitflags! {
    /// Work pending before the next [`Chart::update`](crate::Chart::update).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Invalidation: u8 {
        /// Rebuild the partition from the data.
        const LAYOUT     = 0b0000_0001;
        /// Return the zoom to its reset transform.
        const ZOOM_RESET = 0b0000_0010;
        /// Re-cull and reconcile the scene.
        const RENDER     = 0b0000_0100;
    }
}

/// Options that are plain values, as opposed to accessors and callbacks.
///
/// With the `serde` feature these (de)serialize with every field optional;
/// `transition_duration` is expressed in milliseconds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChartOptions {
    /// Canvas width in pixels.
    pub width: f64,
    /// Canvas height in pixels.
    pub height: f64,
    /// Direction the tree grows in.
    pub orientation: Orientation,
    /// Cells narrower than this many pixels along the weight axis are culled.
    pub min_segment_width: f64,
    /// Leave the root out and give its band to the rest of the tree.
    pub exclude_root: bool,
    /// Draw cell labels.
    pub show_labels: bool,
    /// Duration of animated transitions.
    #[cfg_attr(feature = "serde", serde(with = "millis"))]
    pub transition_duration: Duration,
    /// Apply every change at once.
    pub disable_animations: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            orientation: Orientation::LeftRight,
            min_segment_width: 0.8,
            exclude_root: false,
            show_labels: true,
            transition_duration: Duration::from_millis(800),
            disable_animations: false,
        }
    }
}

impl ChartOptions {
    /// Canvas size.
    pub fn canvas(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// What has to be redone to go from `self` to `next`.
    pub fn diff(&self, next: &Self) -> Invalidation {
        let mut out = Invalidation::empty();
        if self.width != next.width
            || self.height != next.height
            || self.orientation != next.orientation
        {
            out |= Invalidation::LAYOUT | Invalidation::ZOOM_RESET;
        }
        if self.exclude_root != next.exclude_root {
            out |= Invalidation::LAYOUT;
        }
        if self.min_segment_width != next.min_segment_width
            || self.show_labels != next.show_labels
            || self.disable_animations != next.disable_animations
        {
            out |= Invalidation::RENDER;
        }
        out
    }
}

#[cfg(feature = "serde")]
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
