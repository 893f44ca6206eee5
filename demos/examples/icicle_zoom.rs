// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drive zoom transitions frame by frame and watch cells enter and exit.
//!
//! Run:
//! - `RUST_LOG=understory_icicle=trace cargo run -p understory_demos --example icicle_zoom`

use std::time::Duration;

use kurbo::{Point, Vec2};
use tracing_subscriber::EnvFilter;
use understory_icicle::{Chart, Headless, PointerEvent, Record};
use understory_partition::Orientation;
use understory_zoom::DeltaMode;

const FRAME: Duration = Duration::from_millis(100);

struct Node {
    name: String,
    value: f64,
    children: Vec<Node>,
}

impl Record for Node {
    fn number(&self, key: &str) -> Option<f64> {
        (key == "value").then_some(self.value)
    }

    fn text(&self, key: &str) -> Option<String> {
        (key == "name").then(|| self.name.clone())
    }

    fn list(&self, key: &str) -> &[Self] {
        if key == "children" { &self.children } else { &[] }
    }
}

/// `fanout` levels deep, with leaf weights growing left to right.
fn tree(name: String, fanout: usize, depth: usize) -> Node {
    let children = if depth == 0 {
        Vec::new()
    } else {
        (0..fanout)
            .map(|i| tree(format!("{name}.{i}"), fanout, depth - 1))
            .collect()
    };
    let value = if depth == 0 { 1.0 + name.len() as f64 } else { 0.0 };
    Node {
        name,
        value,
        children,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut chart = Chart::new(Headless::default());
    chart
        .set_width(800.0)
        .set_height(400.0)
        .set_orientation(Orientation::LeftRight)
        .set_min_segment_width(2.0)
        .set_transition_duration(Duration::from_millis(400))
        .set_on_zoom(|change| {
            let t = change.transform;
            println!(
                "  zoom x={:.1} y={:.1} k={:.3} remaining={:?}{}",
                t.x,
                t.y,
                t.k,
                change.remaining,
                if change.direct { " (direct)" } else { "" }
            );
        })
        .set_data(tree("r".to_owned(), 6, 3));

    let first = chart.update();
    println!("== Mounted: {} cells ==", first.entered.len());
    // Settle the initial zoom reset.
    while chart.tick(FRAME).is_some() {}

    // Click the last top-level branch; in `lr` the weight axis runs down the canvas.
    let at = Point::new(250.0, 390.0);
    let out = chart.handle_event(PointerEvent::Click(at));
    let Some(target) = out.target else {
        println!("nothing under {at:?}");
        return;
    };
    println!("== Zoom to {} ==", chart.breadcrumb(target).join(" → "));
    while let Some(pass) = chart.tick(FRAME) {
        println!(
            "  frame: +{} ~{} -{}",
            pass.entered.len(),
            pass.updated.len(),
            pass.exited.len()
        );
    }

    println!("== Wheel and drag ==");
    chart.handle_event(PointerEvent::Wheel {
        at: Point::new(400.0, 200.0),
        delta: 3.0,
        mode: DeltaMode::Line,
    });
    chart.handle_event(PointerEvent::Drag(Vec2::new(0.0, -40.0)));
    println!("  {} cells live", chart.scene().len());

    println!("== Reset ==");
    chart.zoom_reset();
    while chart.tick(FRAME).is_some() {}
    println!("  {} cells live", chart.scene().len());
}
