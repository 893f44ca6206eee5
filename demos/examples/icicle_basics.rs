// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lay out a small tree and print the cells a surface would draw.
//!
//! Run:
//! - `cargo run -p understory_demos --example icicle_basics`

use understory_icicle::{Accessor, Chart, Children, Headless, Record};
use understory_partition::Orientation;

struct Dir {
    name: &'static str,
    bytes: f64,
    entries: Vec<Dir>,
}

impl Record for Dir {}

fn file(name: &'static str, bytes: f64) -> Dir {
    Dir {
        name,
        bytes,
        entries: Vec::new(),
    }
}

fn dir(name: &'static str, entries: Vec<Dir>) -> Dir {
    Dir {
        name,
        bytes: 0.0,
        entries,
    }
}

fn main() {
    let tree = dir(
        "/",
        vec![
            dir("src", vec![file("lib.rs", 1200.0), file("chart.rs", 2400.0)]),
            dir("tests", vec![file("scenarios.rs", 900.0)]),
            file("README.md", 300.0),
            file(".keep", 0.0),
        ],
    );

    let mut chart = Chart::new(Headless::default());
    chart
        .set_width(640.0)
        .set_height(240.0)
        .set_orientation(Orientation::TopDown)
        .set_disable_animations(true)
        .set_children(Children::func(|d: &Dir| d.entries.as_slice()))
        .set_size(Accessor::func(|d: &Dir| d.bytes))
        .set_label(Accessor::func(|d: &Dir| d.name.to_owned()))
        .set_color(Accessor::func(|d: &Dir| {
            let fill = if d.entries.is_empty() { "#4682b4" } else { "lightgrey" };
            fill.to_owned()
        }));

    let pass = chart.update();
    println!("== First pass ==");
    println!(
        "  entered {} / updated {} / exited {}",
        pass.entered.len(),
        pass.updated.len(),
        pass.exited.len()
    );

    // `.keep` weighs nothing, so it never reaches the surface.
    for (id, cell) in chart.surface().cells() {
        let label = cell.label.as_ref().map_or("", |l| l.text.as_str());
        let r = cell.rect;
        println!(
            "  {:>2} {:<14} [{:>6.1}, {:>6.1}] x [{:>5.1}, {:>5.1}] fill={} light_text={}",
            id.index(),
            label,
            r.x0,
            r.x1,
            r.y0,
            r.y1,
            cell.fill,
            cell.label.as_ref().is_some_and(|l| l.light),
        );
    }
    assert_eq!(chart.scene().len(), 7);

    // Leave the root out: every other band gets taller.
    chart.set_exclude_root(true).update();
    println!("== Root excluded ==");
    for id in chart.scene().ids() {
        println!("  {}", chart.breadcrumb(id).join(" / "));
    }
}
