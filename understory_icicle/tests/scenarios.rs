// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end chart behavior against a headless surface.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use kurbo::{Point, Rect};
use understory_icicle::{
    Accessor, Chart, Headless, PointerEvent, Record, SurfaceOp, Tooltip, Transition,
};
use understory_partition::{NodeId, Orientation};
use understory_zoom::{DeltaMode, ZoomTransform};

#[derive(Debug)]
struct Node {
    name: String,
    value: f64,
    children: Vec<Node>,
}

fn node(name: &str, value: f64, children: Vec<Node>) -> Node {
    Node {
        name: name.to_owned(),
        value,
        children,
    }
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

/// `A` with two leaves `B: 4` and `C: 6`.
fn abc() -> Node {
    node(
        "A",
        10.0,
        vec![node("B", 4.0, vec![]), node("C", 6.0, vec![])],
    )
}

/// `root` with a leaf `B: 4` and a branch `C` holding `D: 6`.
fn deep() -> Node {
    node(
        "root",
        0.0,
        vec![
            node("B", 4.0, vec![]),
            node("C", 0.0, vec![node("D", 6.0, vec![])]),
        ],
    )
}

fn mounted(tree: Node, orientation: Orientation) -> Chart<Node, Headless> {
    let mut chart = Chart::new(Headless::default());
    chart
        .set_width(100.0)
        .set_height(100.0)
        .set_orientation(orientation)
        .set_disable_animations(true)
        .set_data(tree);
    chart.update();
    chart
}

fn find(chart: &Chart<Node, Headless>, name: &str) -> NodeId {
    let partition = chart.partition().expect("laid out");
    partition
        .nodes()
        .map(|(id, _)| id)
        .find(|&id| chart.datum(id).is_some_and(|d| d.name == name))
        .unwrap_or_else(|| panic!("no visible node named {name}"))
}

fn names(chart: &Chart<Node, Headless>) -> Vec<String> {
    chart
        .scene()
        .ids()
        .filter_map(|id| chart.datum(id))
        .map(|d| d.name.clone())
        .collect()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn rect_close(a: Rect, b: Rect) -> bool {
    close(a.x0, b.x0) && close(a.y0, b.y0) && close(a.x1, b.x1) && close(a.y1, b.y1)
}

#[test]
fn siblings_split_the_weight_axis_in_a_shared_band() {
    let chart = mounted(abc(), Orientation::TopDown);
    let b = chart.scene().cell(find(&chart, "B")).unwrap();
    let c = chart.scene().cell(find(&chart, "C")).unwrap();
    // Depth bands are 50px; one pixel is given up between bands.
    assert!(rect_close(b.rect, Rect::new(0.0, 50.0, 40.0, 99.0)), "{:?}", b.rect);
    assert!(rect_close(c.rect, Rect::new(40.0, 50.0, 100.0, 99.0)), "{:?}", c.rect);
    assert_eq!(names(&chart), ["A", "B", "C"]);
}

#[test]
fn horizontal_layout_shrinks_the_width() {
    let chart = mounted(abc(), Orientation::LeftRight);
    let c = chart.scene().cell(find(&chart, "C")).unwrap();
    assert!(rect_close(c.rect, Rect::new(50.0, 40.0, 99.0, 100.0)), "{:?}", c.rect);
}

#[test]
fn zoom_to_node_fills_the_viewport() {
    let mut chart = mounted(abc(), Orientation::TopDown);
    let c = find(&chart, "C");
    assert!(chart.zoom_to_node(c));
    let t = chart.zoom().transform();
    assert!(close(t.k, 100.0 / 60.0), "k = {}", t.k);
    // C's start edge lands at 0 and its end at the canvas edge.
    assert!(close(t.x + t.k * 40.0, 0.0), "x = {}", t.x);
    assert!(close(t.x + t.k * 100.0, 100.0));
    assert_eq!(t.y, 0.0);
    assert_eq!(chart.surface().view(), t.to_affine(chart.zoom().axes()));
}

#[test]
fn zoom_to_node_animates_over_ticks() {
    let mut chart = Chart::new(Headless::default());
    chart
        .set_width(100.0)
        .set_height(100.0)
        .set_orientation(Orientation::TopDown)
        .set_transition_duration(Duration::from_millis(800))
        .set_data(abc());
    chart.update();
    let c = find(&chart, "C");

    assert!(chart.zoom_to_node(c));
    assert_eq!(chart.zoom().transform(), ZoomTransform::IDENTITY, "starts on the next tick");
    chart.surface_mut().take_log();

    let half = chart.tick(Duration::from_millis(400)).expect("transitioning");
    let half_k = 1.0 + (100.0 / 60.0 - 1.0) / 2.0;
    assert!(close(chart.zoom().transform().k, half_k));
    assert!(!half.updated.is_empty());
    let remaining = Transition::new(Duration::from_millis(400));
    let log = chart.surface().log();
    assert!(
        log.iter()
            .any(|op| matches!(op, SurfaceOp::Update(_, _, t) if *t == remaining)),
        "mid-transition updates carry the remaining time"
    );
    // The view moves over the same time as the label counter-scale.
    assert!(matches!(log.first(), Some(SurfaceOp::View(_, t)) if *t == remaining));
    let scale = chart.scene().cell(c).unwrap().label.as_ref().unwrap().scale;
    assert_eq!(scale.from_k, 1.0);
    assert!(close(scale.to_k, half_k));

    chart.tick(Duration::from_millis(400)).expect("final sample");
    assert!(close(chart.zoom().transform().k, 100.0 / 60.0));
    assert!(chart.tick(Duration::from_millis(16)).is_none());
}

#[test]
fn orientation_change_relayouts_and_resets_zoom() {
    let mut chart = mounted(abc(), Orientation::LeftRight);
    chart.zoom_by(2.0);
    assert_ne!(chart.zoom().transform(), ZoomTransform::IDENTITY);

    chart.set_orientation(Orientation::TopDown).update();
    assert_eq!(chart.zoom().transform(), ZoomTransform::IDENTITY);
    assert_eq!(chart.partition().unwrap().size().width, 100.0);
    let c = chart.scene().cell(find(&chart, "C")).unwrap();
    assert!(rect_close(c.rect, Rect::new(40.0, 50.0, 100.0, 99.0)));
}

#[test]
fn animated_orientation_change_keeps_the_depth_axis_still() {
    let mut chart = Chart::new(Headless::default());
    chart
        .set_width(100.0)
        .set_height(100.0)
        .set_orientation(Orientation::LeftRight)
        .set_transition_duration(Duration::from_millis(100))
        .set_data(abc());
    chart.update();
    chart.handle_event(PointerEvent::Wheel {
        at: Point::new(50.0, 50.0),
        delta: -500.0,
        mode: DeltaMode::Pixel,
    });
    assert_eq!(chart.zoom().transform(), ZoomTransform::new(0.0, -50.0, 2.0));

    // Y stops being the zoom axis before the reset has had a single tick.
    chart.set_orientation(Orientation::TopDown).update();
    assert!(chart.zoom().is_transitioning());
    assert_eq!(chart.zoom().transform().y, 0.0);
    assert_eq!(chart.surface().view().translation().y, 0.0);

    chart.tick(Duration::from_millis(100)).expect("final sample");
    assert_eq!(chart.zoom().transform(), ZoomTransform::IDENTITY);
}

#[test]
fn all_zero_weights_render_nothing() {
    let mut chart = mounted(abc(), Orientation::TopDown);
    assert_eq!(chart.scene().len(), 3);
    chart.set_size(Accessor::Const(0.0)).update();
    assert!(chart.scene().is_empty());
    assert!(chart.surface().is_empty());
}

#[test]
fn weightless_branch_is_dropped_others_stay() {
    let mut chart = mounted(deep(), Orientation::TopDown);
    chart
        .set_size(Accessor::func(|d: &Node| if d.name == "D" { 0.0 } else { d.value }))
        .update();
    assert_eq!(names(&chart), ["root", "B"]);
}

#[test]
fn zoom_before_mount_is_ignored() {
    let mut chart = Chart::new(Headless::default());
    chart.set_data(abc()).set_disable_animations(true);
    chart.zoom_by(2.0);
    let out = chart.handle_event(PointerEvent::Wheel {
        at: Point::new(10.0, 10.0),
        delta: -100.0,
        mode: DeltaMode::Pixel,
    });
    assert!(!out.prevent_default);
    chart.update();
    assert_eq!(chart.zoom().transform(), ZoomTransform::IDENTITY);
}

#[test]
fn click_on_canvas_resets_zoom() {
    let mut chart = mounted(deep(), Orientation::TopDown);
    chart.zoom_by(2.0);
    assert_eq!(chart.zoom().transform(), ZoomTransform::new(-50.0, 0.0, 2.0));
    // Below B, which is a leaf one level above the deepest band.
    let out = chart.handle_event(PointerEvent::Click(Point::new(10.0, 90.0)));
    assert_eq!(out.target, None);
    assert_eq!(chart.zoom().transform(), ZoomTransform::IDENTITY);
}

#[test]
fn double_click_never_zooms() {
    let mut chart = mounted(abc(), Orientation::TopDown);
    let out = chart.handle_event(PointerEvent::DoubleClick(Point::new(70.0, 75.0)));
    assert_eq!(out.target, Some(find(&chart, "C")));
    assert_eq!(chart.zoom().transform(), ZoomTransform::IDENTITY);
}

#[test]
fn click_handler_replaces_zoom() {
    let mut chart = mounted(abc(), Orientation::TopDown);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    chart.set_on_click(move |d: Option<&Node>, _| {
        sink.borrow_mut().push(d.map(|d| d.name.clone()));
    });
    chart.handle_event(PointerEvent::Click(Point::new(70.0, 75.0)));
    assert_eq!(*seen.borrow(), [Some("C".to_owned())]);
    assert_eq!(chart.zoom().transform(), ZoomTransform::IDENTITY);
}

#[test]
fn right_click_prevents_default_only_when_handled() {
    let mut chart = mounted(abc(), Orientation::TopDown);
    let at = Point::new(10.0, 75.0);
    assert!(!chart.handle_event(PointerEvent::RightClick(at)).prevent_default);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    chart.set_on_right_click(move |d: Option<&Node>, _| {
        sink.borrow_mut().push(d.map(|d| d.name.clone()));
    });
    let out = chart.handle_event(PointerEvent::RightClick(at));
    assert!(out.prevent_default);
    assert_eq!(*seen.borrow(), [Some("B".to_owned())]);

    chart.clear_on_right_click();
    assert!(!chart.handle_event(PointerEvent::RightClick(at)).prevent_default);
}

#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<Option<String>>>>);

impl Tooltip for Recorder {
    fn show(&mut self, html: &str, _at: Point) {
        self.0.borrow_mut().push(Some(html.to_owned()));
    }

    fn hide(&mut self) {
        self.0.borrow_mut().push(None);
    }
}

#[test]
fn hover_shows_breadcrumb_tooltip_once_per_node() {
    let mut chart = mounted(deep(), Orientation::TopDown);
    let tooltip = Recorder::default();
    let hovered = Rc::new(RefCell::new(Vec::new()));
    let sink = hovered.clone();
    chart
        .set_tooltip(tooltip.clone())
        .set_on_hover(move |d: Option<&Node>, _| sink.borrow_mut().push(d.map(|d| d.name.clone())));

    let d = find(&chart, "D");
    assert_eq!(chart.handle_event(PointerEvent::Move(Point::new(70.0, 90.0))).target, Some(d));
    chart.handle_event(PointerEvent::Move(Point::new(75.0, 95.0)));
    assert_eq!(chart.hover_path().last(), Some(&d));
    chart.handle_event(PointerEvent::Move(Point::new(10.0, 90.0)));

    assert_eq!(
        *tooltip.0.borrow(),
        [
            Some(r#"<div class="tooltip-title">root &rarr; C &rarr; D</div>"#.to_owned()),
            None,
        ]
    );
    assert_eq!(*hovered.borrow(), [Some("D".to_owned()), None]);
    assert!(chart.hover_path().is_empty());
}

#[test]
fn relayout_hides_the_tooltip_of_a_vanished_node() {
    let mut chart = mounted(deep(), Orientation::TopDown);
    let tooltip = Recorder::default();
    chart.set_tooltip(tooltip.clone());
    chart.handle_event(PointerEvent::Move(Point::new(70.0, 90.0)));
    assert!(!chart.hover_path().is_empty());

    chart
        .set_size(Accessor::func(|d: &Node| if d.name == "D" { 0.0 } else { d.value }))
        .update();
    assert!(chart.hover_path().is_empty());
    assert_eq!(
        *tooltip.0.borrow(),
        [
            Some(r#"<div class="tooltip-title">root &rarr; C &rarr; D</div>"#.to_owned()),
            None,
        ]
    );
}

#[test]
fn tooltip_title_skips_excluded_root_and_escapes() {
    let mut chart = mounted(deep(), Orientation::TopDown);
    chart
        .set_exclude_root(true)
        .set_label(Accessor::func(|d: &Node| format!("<{}>", d.name)))
        .update();
    let d = find(&chart, "D");
    assert_eq!(
        chart.tooltip_html(d).as_deref(),
        Some(r#"<div class="tooltip-title">&lt;C&gt; &rarr; &lt;D&gt;</div>"#)
    );

    chart.set_tooltip_content(|d: &Node, _| format!("<i>{}</i>", d.value));
    chart.set_tooltip_title(|d: &Node, _| d.name.clone());
    assert_eq!(
        chart.tooltip_html(d).as_deref(),
        Some(r#"<div class="tooltip-title">D</div><i>6</i>"#)
    );

    chart.set_show_tooltip(|d: &Node, _| d.name != "D");
    assert_eq!(chart.tooltip_html(d), None);
}

#[test]
fn wheel_and_drag_apply_without_animation() {
    let mut chart = Chart::new(Headless::default());
    chart
        .set_width(100.0)
        .set_height(100.0)
        .set_orientation(Orientation::TopDown)
        .set_data(abc());
    chart.update();
    chart.surface_mut().take_log();

    let out = chart.handle_event(PointerEvent::Wheel {
        at: Point::new(50.0, 50.0),
        delta: -500.0,
        mode: DeltaMode::Pixel,
    });
    assert!(out.prevent_default);
    assert!(chart.zoom().transform().k > 1.0);
    assert!(!chart.zoom().is_transitioning());
    chart.handle_event(PointerEvent::Drag(kurbo::Vec2::new(-5.0, 30.0)));
    // The depth axis never pans.
    assert_eq!(chart.zoom().transform().y, 0.0);

    let log = chart.surface().log();
    assert!(log.iter().all(|op| match op {
        SurfaceOp::View(_, t) | SurfaceOp::Update(_, _, t) | SurfaceOp::Exit(_, t) => {
            *t == Transition::NONE
        }
        SurfaceOp::Enter(..) => true,
    }));
}

#[test]
fn entering_cells_grow_from_their_center() {
    let chart = mounted(abc(), Orientation::TopDown);
    let c = find(&chart, "C");
    let entered = chart.surface().log().iter().find_map(|op| match op {
        SurfaceOp::Enter(id, cell) if *id == c => Some(cell.rect),
        _ => None,
    });
    let rect = entered.expect("C entered");
    assert!(close(rect.x0, 70.0) && close(rect.x1, 70.0), "{rect:?}");
}

#[test]
fn culled_cells_exit_and_return() {
    let tree = node(
        "A",
        0.0,
        vec![node("B", 4.0, vec![]), node("C", 2.0, vec![]), node("E", 4.0, vec![])],
    );
    let mut chart = mounted(tree, Orientation::TopDown);
    let b = find(&chart, "B");
    chart.surface_mut().take_log();

    chart.zoom_to_node(find(&chart, "E"));
    assert!(!chart.scene().contains(b));
    assert!(chart.surface().log().contains(&SurfaceOp::Exit(b, Transition::NONE)));
    chart.zoom_reset();
    assert!(chart.scene().contains(b));
}

#[test]
fn labels_follow_options_and_contrast() {
    let mut chart = mounted(abc(), Orientation::TopDown);
    let c = find(&chart, "C");
    let label = chart.scene().cell(c).unwrap().label.clone().expect("labels on");
    assert_eq!(label.text, "C");
    assert_eq!(label.opacity, 1.0);
    assert!(!label.light, "lightgrey takes dark text");

    chart
        .set_color(Accessor::Const("#000".to_owned()))
        .set_node_class_name(Some(Accessor::func(|d: &Node| format!("n-{} x", d.name))))
        .update();
    let cell = chart.scene().cell(c).unwrap();
    assert_eq!(cell.fill, "#000");
    assert_eq!(cell.classes, ["node", "n-C", "x"]);
    assert!(cell.label.as_ref().unwrap().light);

    chart.set_show_labels(false).update();
    assert!(chart.scene().cell(c).unwrap().label.is_none());
}

#[test]
fn min_segment_width_culls_thin_cells() {
    let mut chart = mounted(abc(), Orientation::TopDown);
    chart.set_min_segment_width(50.0).update();
    assert_eq!(names(&chart), ["A", "C"]);
    chart.zoom_by(2.0);
    assert!(names(&chart).contains(&"B".to_owned()));
}

#[test]
fn datum_is_unavailable_while_relayout_is_pending() {
    let mut chart = mounted(abc(), Orientation::TopDown);
    let b = find(&chart, "B");
    chart.set_data(deep());
    assert!(chart.datum(b).is_none());
    chart.update();
    assert_eq!(chart.datum(b).map(|d| d.name.as_str()), Some("B"));
}

#[test]
fn on_zoom_sees_every_applied_sample() {
    let mut chart = Chart::new(Headless::default());
    chart
        .set_width(100.0)
        .set_height(100.0)
        .set_orientation(Orientation::TopDown)
        .set_transition_duration(Duration::from_millis(200))
        .set_data(abc());
    chart.update();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    chart.set_on_zoom(move |change| sink.borrow_mut().push(change.transform.k));

    chart.zoom_by(2.0);
    while chart.tick(Duration::from_millis(100)).is_some() {}
    assert_eq!(*seen.borrow(), [1.5, 2.0]);

    chart.clear_on_zoom().zoom_reset();
    chart.tick(Duration::from_millis(200));
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn every_cell_is_drawn_from_its_own_datum() {
    let tree = node(
        "root",
        0.0,
        vec![
            node("B", 4.0, vec![node("B1", 1.0, vec![]), node("B2", 3.0, vec![])]),
            node("C", 0.0, vec![node("D", 6.0, vec![node("D1", 6.0, vec![])])]),
        ],
    );
    let mut chart = mounted(tree, Orientation::LeftRight);
    chart.set_exclude_root(true).update();
    chart.zoom_by(1.5);
    assert!(!chart.scene().is_empty());
    for id in chart.scene().ids() {
        let label = chart.scene().cell(id).unwrap().label.as_ref().unwrap();
        assert_eq!(Some(&label.text), chart.breadcrumb(id).last());
    }
}
