// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport culling and label legibility.
//!
//! Both are pure functions of the layout and the current zoom transform, so
//! they are re-evaluated on every transform change and carry no state between
//! calls.

use kurbo::Size;
use understory_partition::{Axis, NodeId, Orientation, Partition};
use understory_zoom::ZoomTransform;

/// Label height ramp for horizontal orientations, in pixels.
const HEIGHT_RAMP: (f64, f64) = (15.0, 40.0);
/// Label width-per-character ramp for vertical orientations, in pixels.
const WIDTH_PER_CHAR_RAMP: (f64, f64) = (4.0, 8.0);

/// Visible nodes, in pre-order, under `transform`.
///
/// A node survives when its weight-axis interval, projected along the zoom
/// axis, overlaps the viewport and is at least `min_segment_width` pixels
/// wide. The depth axis never zooms, so every band is always in view.
pub fn cull(
    partition: &Partition,
    transform: ZoomTransform,
    orientation: Orientation,
    canvas: Size,
    min_segment_width: f64,
) -> Vec<NodeId> {
    let k = transform.k;
    let tr = match orientation.zoom_axis() {
        Axis::X => transform.x,
        Axis::Y => transform.y,
    };
    let extent = orientation.canonical_size(canvas).width;
    let lo = -tr / k;
    let hi = (extent - tr) / k;
    let min = min_segment_width / k;
    partition
        .nodes()
        .filter(|(_, node)| {
            let (x0, x1) = node.weight_span();
            x1 >= lo && x0 <= hi && x1 - x0 >= min
        })
        .map(|(id, _)| id)
        .collect()
}

/// Label opacity in `[0, 1]` for a cell of unscaled screen size `cell` at scale `k`.
///
/// Horizontal orientations ramp on the rendered height; vertical ones on the
/// rendered width available per label character.
pub fn label_opacity(orientation: Orientation, cell: Size, k: f64, label_chars: usize) -> f64 {
    if orientation.is_horizontal() {
        ramp(cell.height * k, HEIGHT_RAMP)
    } else {
        ramp(cell.width * k / label_chars as f64, WIDTH_PER_CHAR_RAMP)
    }
}

fn ramp(v: f64, (lo, hi): (f64, f64)) -> f64 {
    if v.is_nan() {
        return 0.0;
    }
    ((v - lo) / (hi - lo)).clamp(0.0, 1.0)
}
