// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart a JSON document with options loaded from JSON, and hover it.
//!
//! Run:
//! - `cargo run -p understory_demos --example icicle_json`

use kurbo::Point;
use serde_json::json;
use understory_icicle::{Accessor, Chart, ChartOptions, Headless, PointerEvent, Tooltip};

/// Prints what a real overlay would display.
struct Stdout;

impl Tooltip for Stdout {
    fn show(&mut self, html: &str, at: Point) {
        println!("  tooltip at ({:.0}, {:.0}): {html}", at.x, at.y);
    }

    fn hide(&mut self) {
        println!("  tooltip hidden");
    }
}

fn main() -> Result<(), serde_json::Error> {
    let data = json!({
        "name": "flare",
        "children": [
            { "name": "analytics", "children": [
                { "name": "cluster", "value": 3938 },
                { "name": "graph", "value": 3534 },
                { "name": "optimization", "value": 7074 }
            ]},
            { "name": "animate", "children": [
                { "name": "Easing", "value": 17010 },
                { "name": "Tween", "value": 6006 }
            ]},
            { "name": "empty", "children": [] }
        ]
    });

    // Missing fields keep their defaults.
    let options: ChartOptions = serde_json::from_str(
        r#"{ "width": 600, "height": 300, "orientation": "td", "transition_duration": 0 }"#,
    )?;
    println!("options: {}", serde_json::to_string(&options)?);

    let mut chart = Chart::new(Headless::default());
    chart
        .set_options(options)
        .set_color(Accessor::func(|d: &serde_json::Value| {
            let fill = if d.get("children").is_some() { "#2f4f4f" } else { "#ffd700" };
            fill.to_owned()
        }))
        .set_tooltip_content(|_, node| format!("<b>{}</b>", node.weight()))
        .set_tooltip(Stdout)
        .set_data(data);
    chart.update();
    println!("{} cells", chart.scene().len());

    println!("== Hover ==");
    for x in [50.0, 60.0, 400.0, 400.0] {
        let out = chart.handle_event(PointerEvent::Move(Point::new(x, 250.0)));
        println!("  ({x}, 250) -> {:?}", out.target.map(|id| chart.breadcrumb(id)));
    }
    chart.handle_event(PointerEvent::Leave);
    Ok(())
}
