// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The chart: configuration, the update cycle, and pointer interaction.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use kurbo::{Point, Rect, Vec2};
use understory_partition::{
    Axis, LayoutNode, NodeId, Orientation, Partition, PartitionOptions, Sibling, SortFn,
};
use understory_zoom::{DeltaMode, Zoom, ZoomAxes, ZoomChange, wheel_factor};

use crate::accessor::{Accessor, Children, Record};
use crate::color::{Contrast, Luminance};
use crate::config::{ChartOptions, Invalidation};
use crate::cull::{cull, label_opacity};
use crate::hover::HoverState;
use crate::scene::{Cell, InverseScale, Label, Reconciled, Scene, Surface, Transition};
use crate::tooltip::{self, Tooltip};

/// Fill used when the color accessor yields nothing.
const DEFAULT_COLOR: &str = "lightgrey";

/// Interaction callback: the datum under the pointer (`None` for empty canvas)
/// and the pointer position.
pub type NodeCallback<T> = dyn Fn(Option<&T>, Point);
/// Text derived from a datum and its layout node.
pub type NodeText<T> = dyn Fn(&T, &LayoutNode) -> String;
/// Predicate over a datum and its layout node.
pub type NodePredicate<T> = dyn Fn(&T, &LayoutNode) -> bool;

/// A normalized pointer event, in canvas coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PointerEvent {
    /// Primary activation.
    Click(Point),
    /// Secondary activation.
    RightClick(Point),
    /// Double activation. Never zooms.
    DoubleClick(Point),
    /// Pointer moved to a position over the canvas.
    Move(Point),
    /// Pointer left the canvas.
    Leave,
    /// Wheel turned at `at`.
    Wheel {
        /// Pointer position.
        at: Point,
        /// Vertical wheel delta; positive scrolls down (zooms out).
        delta: f64,
        /// Unit of `delta`.
        mode: DeltaMode,
    },
    /// Drag moved by a screen-space offset.
    Drag(Vec2),
}

/// What the host should know after [`Chart::handle_event`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// Node under the pointer, if the event is positional.
    pub target: Option<NodeId>,
    /// Suppress the platform's default action (context menu, page scroll).
    pub prevent_default: bool,
}

/// An interactive icicle chart over caller data `T`, drawing into `S`.
///
/// Configure it with the `set_*` methods (they chain), then call
/// [`update`](Self::update). Setters only record what changed; nothing is
/// recomputed until the next update. Between updates the chart reacts to
/// [`handle_event`](Self::handle_event) and [`tick`](Self::tick), which re-cull
/// and reconcile without relayout.
///
/// The chart mounts on its first update: zoom calls made before that are
/// ignored.
pub struct Chart<T, S> {
    options: ChartOptions,
    data: Option<T>,
    children: Children<T>,
    size: Accessor<T, f64>,
    label: Accessor<T, String>,
    color: Accessor<T, String>,
    node_class_name: Option<Accessor<T, String>>,
    sort: Option<Rc<SortFn<T>>>,
    show_tooltip: Rc<NodePredicate<T>>,
    tooltip_title: Option<Rc<NodeText<T>>>,
    tooltip_content: Option<Rc<NodeText<T>>>,
    on_click: Option<Rc<NodeCallback<T>>>,
    on_right_click: Option<Rc<NodeCallback<T>>>,
    on_hover: Option<Rc<NodeCallback<T>>>,
    contrast: Box<dyn Contrast>,
    tooltip: Option<Box<dyn Tooltip>>,
    surface: S,
    zoom: Zoom,
    partition: Option<Partition>,
    scene: Scene,
    hover: HoverState<NodeId>,
    pending: Invalidation,
}

impl<T, S: fmt::Debug> fmt::Debug for Chart<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chart")
            .field("options", &self.options)
            .field("has_data", &self.data.is_some())
            .field("partition", &self.partition)
            .field("zoom", &self.zoom)
            .field("scene", &self.scene)
            .field("pending", &self.pending)
            .field("surface", &self.surface)
            .finish_non_exhaustive()
    }
}

impl<T: Record, S: Surface> Chart<T, S> {
    /// A chart with default options drawing into `surface`.
    ///
    /// Defaults read children from `"children"`, weight from `"value"` and
    /// labels from `"name"`, and fill every cell light grey.
    pub fn new(surface: S) -> Self {
        Self {
            options: ChartOptions::default(),
            data: None,
            children: Children::key("children"),
            size: Accessor::key("value"),
            label: Accessor::key("name"),
            color: Accessor::Const(DEFAULT_COLOR.to_owned()),
            node_class_name: None,
            sort: None,
            show_tooltip: Rc::new(|_: &T, _: &LayoutNode| true),
            tooltip_title: None,
            tooltip_content: None,
            on_click: None,
            on_right_click: None,
            on_hover: None,
            contrast: Box::new(Luminance),
            tooltip: None,
            surface,
            zoom: Zoom::new(),
            partition: None,
            scene: Scene::new(),
            hover: HoverState::default(),
            pending: Invalidation::LAYOUT | Invalidation::RENDER,
        }
    }

    // --- plain options ---

    /// All plain-value options.
    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// Replace all plain-value options at once.
    pub fn set_options(&mut self, options: ChartOptions) -> &mut Self {
        self.pending |= self.options.diff(&options);
        self.options = options;
        self
    }

    fn edit_options(&mut self, edit: impl FnOnce(&mut ChartOptions)) -> &mut Self {
        let mut next = self.options.clone();
        edit(&mut next);
        self.set_options(next)
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> f64 {
        self.options.width
    }

    /// Set the canvas width. Relayouts and resets the zoom.
    pub fn set_width(&mut self, width: f64) -> &mut Self {
        self.edit_options(|o| o.width = width)
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> f64 {
        self.options.height
    }

    /// Set the canvas height. Relayouts and resets the zoom.
    pub fn set_height(&mut self, height: f64) -> &mut Self {
        self.edit_options(|o| o.height = height)
    }

    /// Direction the tree grows in.
    pub fn orientation(&self) -> Orientation {
        self.options.orientation
    }

    /// Set the orientation. Relayouts and resets the zoom.
    pub fn set_orientation(&mut self, orientation: Orientation) -> &mut Self {
        self.edit_options(|o| o.orientation = orientation)
    }

    /// Culling threshold in pixels.
    pub fn min_segment_width(&self) -> f64 {
        self.options.min_segment_width
    }

    /// Set the culling threshold in pixels.
    pub fn set_min_segment_width(&mut self, px: f64) -> &mut Self {
        self.edit_options(|o| o.min_segment_width = px)
    }

    /// Whether the root is left out.
    pub fn exclude_root(&self) -> bool {
        self.options.exclude_root
    }

    /// Leave the root out. Relayouts.
    pub fn set_exclude_root(&mut self, exclude: bool) -> &mut Self {
        self.edit_options(|o| o.exclude_root = exclude)
    }

    /// Whether labels are drawn.
    pub fn show_labels(&self) -> bool {
        self.options.show_labels
    }

    /// Show or hide labels.
    pub fn set_show_labels(&mut self, show: bool) -> &mut Self {
        self.edit_options(|o| o.show_labels = show)
    }

    /// Duration of animated transitions.
    pub fn transition_duration(&self) -> Duration {
        self.options.transition_duration
    }

    /// Set the duration of animated transitions.
    pub fn set_transition_duration(&mut self, duration: Duration) -> &mut Self {
        self.edit_options(|o| o.transition_duration = duration)
    }

    /// Whether animations are disabled.
    pub fn disable_animations(&self) -> bool {
        self.options.disable_animations
    }

    /// Apply every change at once.
    pub fn set_disable_animations(&mut self, disable: bool) -> &mut Self {
        self.edit_options(|o| o.disable_animations = disable)
    }

    // --- data and accessors ---

    /// The root datum.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Replace the tree. Relayouts.
    pub fn set_data(&mut self, root: T) -> &mut Self {
        self.data = Some(root);
        self.pending |= Invalidation::LAYOUT;
        self
    }

    /// Children accessor.
    pub fn children(&self) -> &Children<T> {
        &self.children
    }

    /// Set the children accessor. Relayouts.
    pub fn set_children(&mut self, children: Children<T>) -> &mut Self {
        self.children = children;
        self.pending |= Invalidation::LAYOUT;
        self
    }

    /// Weight accessor.
    pub fn size(&self) -> &Accessor<T, f64> {
        &self.size
    }

    /// Set the weight accessor. Relayouts and resets the zoom.
    pub fn set_size(&mut self, size: Accessor<T, f64>) -> &mut Self {
        self.size = size;
        self.pending |= Invalidation::LAYOUT | Invalidation::ZOOM_RESET;
        self
    }

    /// Sibling comparator, if any.
    pub fn sort(&self) -> Option<&SortFn<T>> {
        self.sort.as_deref()
    }

    /// Order siblings with `cmp`. Relayouts.
    pub fn set_sort(
        &mut self,
        cmp: impl for<'a, 'b> Fn(&Sibling<'a, T>, &Sibling<'b, T>) -> Ordering + 'static,
    ) -> &mut Self {
        self.sort = Some(Rc::new(cmp));
        self.pending |= Invalidation::LAYOUT;
        self
    }

    /// Keep siblings in data order. Relayouts.
    pub fn clear_sort(&mut self) -> &mut Self {
        self.sort = None;
        self.pending |= Invalidation::LAYOUT;
        self
    }

    /// Label accessor.
    pub fn label(&self) -> &Accessor<T, String> {
        &self.label
    }

    /// Set the label accessor.
    pub fn set_label(&mut self, label: Accessor<T, String>) -> &mut Self {
        self.label = label;
        self.pending |= Invalidation::RENDER;
        self
    }

    /// Fill color accessor.
    pub fn color(&self) -> &Accessor<T, String> {
        &self.color
    }

    /// Set the fill color accessor.
    pub fn set_color(&mut self, color: Accessor<T, String>) -> &mut Self {
        self.color = color;
        self.pending |= Invalidation::RENDER;
        self
    }

    /// Extra class accessor.
    pub fn node_class_name(&self) -> Option<&Accessor<T, String>> {
        self.node_class_name.as_ref()
    }

    /// Set an accessor for extra, space-separated classes on each cell.
    pub fn set_node_class_name(&mut self, classes: Option<Accessor<T, String>>) -> &mut Self {
        self.node_class_name = classes;
        self.pending |= Invalidation::RENDER;
        self
    }

    /// Set the label contrast rule.
    pub fn set_contrast(&mut self, contrast: impl Contrast + 'static) -> &mut Self {
        self.contrast = Box::new(contrast);
        self.pending |= Invalidation::RENDER;
        self
    }

    // --- tooltip ---

    /// Attach a tooltip overlay.
    pub fn set_tooltip(&mut self, tooltip: impl Tooltip + 'static) -> &mut Self {
        self.tooltip = Some(Box::new(tooltip));
        self
    }

    /// Decide per node whether hovering shows the tooltip.
    pub fn set_show_tooltip(
        &mut self,
        show: impl Fn(&T, &LayoutNode) -> bool + 'static,
    ) -> &mut Self {
        self.show_tooltip = Rc::new(show);
        self
    }

    /// Replace the breadcrumb title with custom HTML.
    pub fn set_tooltip_title(
        &mut self,
        title: impl Fn(&T, &LayoutNode) -> String + 'static,
    ) -> &mut Self {
        self.tooltip_title = Some(Rc::new(title));
        self
    }

    /// Go back to the breadcrumb title.
    pub fn clear_tooltip_title(&mut self) -> &mut Self {
        self.tooltip_title = None;
        self
    }

    /// HTML shown below the title.
    pub fn set_tooltip_content(
        &mut self,
        content: impl Fn(&T, &LayoutNode) -> String + 'static,
    ) -> &mut Self {
        self.tooltip_content = Some(Rc::new(content));
        self
    }

    // --- interaction callbacks ---

    /// Handle clicks yourself. Replaces zoom-to-node and click-to-reset.
    pub fn set_on_click(&mut self, f: impl Fn(Option<&T>, Point) + 'static) -> &mut Self {
        self.on_click = Some(Rc::new(f));
        self
    }

    /// Restore the default click behavior.
    pub fn clear_on_click(&mut self) -> &mut Self {
        self.on_click = None;
        self
    }

    /// Handle right clicks. While set, the platform context menu is suppressed.
    pub fn set_on_right_click(&mut self, f: impl Fn(Option<&T>, Point) + 'static) -> &mut Self {
        self.on_right_click = Some(Rc::new(f));
        self
    }

    /// Stop handling right clicks.
    pub fn clear_on_right_click(&mut self) -> &mut Self {
        self.on_right_click = None;
        self
    }

    /// Called when the hovered node changes, with `None` over empty canvas.
    pub fn set_on_hover(&mut self, f: impl Fn(Option<&T>, Point) + 'static) -> &mut Self {
        self.on_hover = Some(Rc::new(f));
        self
    }

    /// Stop reporting hover changes.
    pub fn clear_on_hover(&mut self) -> &mut Self {
        self.on_hover = None;
        self
    }

    /// Called for every applied zoom transform.
    pub fn set_on_zoom(&mut self, f: impl Fn(&ZoomChange) + 'static) -> &mut Self {
        self.zoom.set_listener(f);
        self
    }

    /// Stop reporting zoom changes.
    pub fn clear_on_zoom(&mut self) -> &mut Self {
        self.zoom.clear_listener();
        self
    }

    // --- state ---

    /// The rendering surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The rendering surface, mutably.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The zoom engine.
    pub fn zoom(&self) -> &Zoom {
        &self.zoom
    }

    /// The current layout, once data has been laid out.
    pub fn partition(&self) -> Option<&Partition> {
        self.partition.as_ref()
    }

    /// Cells currently on the surface.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Work waiting for the next [`update`](Self::update).
    pub fn pending(&self) -> Invalidation {
        self.pending
    }

    /// Currently hovered root→node path.
    pub fn hover_path(&self) -> &[NodeId] {
        self.hover.path()
    }

    /// Layout node for `id`.
    pub fn node(&self, id: NodeId) -> Option<&LayoutNode> {
        self.partition.as_ref()?.get(id)
    }

    /// The caller datum laid out as `id`.
    ///
    /// `None` for unknown ids and while a relayout is pending.
    pub fn datum(&self, id: NodeId) -> Option<&T> {
        if self.pending.contains(Invalidation::LAYOUT) {
            return None;
        }
        datum_at(self.data.as_ref()?, &self.children, self.partition.as_ref()?, id)
    }

    /// Labels from the root to `id`; the root is skipped when excluded.
    pub fn breadcrumb(&self, id: NodeId) -> Vec<String> {
        let Some(partition) = self.partition.as_ref() else {
            return Vec::new();
        };
        let skip = usize::from(self.options.exclude_root);
        partition
            .path_to_root(id)
            .into_iter()
            .skip(skip)
            .filter_map(|n| self.datum(n))
            .map(|d| self.label.resolve(d).unwrap_or_default())
            .collect()
    }

    /// Tooltip HTML for `id`, or `None` if the tooltip is suppressed for it.
    pub fn tooltip_html(&self, id: NodeId) -> Option<String> {
        let datum = self.datum(id)?;
        let node = self.node(id)?;
        if !(self.show_tooltip)(datum, node) {
            return None;
        }
        let title = match &self.tooltip_title {
            Some(title) => title(datum, node),
            None => self
                .breadcrumb(id)
                .iter()
                .map(|s| tooltip::escape(s))
                .collect::<Vec<_>>()
                .join(tooltip::SEPARATOR),
        };
        let content = self
            .tooltip_content
            .as_ref()
            .map(|content| content(datum, node))
            .unwrap_or_default();
        Some(tooltip::html(&title, &content))
    }

    /// The visible node under a canvas point, if any.
    pub fn hit(&self, at: Point) -> Option<NodeId> {
        let partition = self.partition.as_ref()?;
        let view = self.zoom.transform().to_affine(self.zoom.axes());
        let canvas = self.options.canvas();
        let local = self.options.orientation.to_canonical(view.inverse() * at, canvas);
        let id = partition.hit(local)?;
        self.scene.contains(id).then_some(id)
    }

    // --- update cycle ---

    /// Apply pending changes: relayout, zoom reset, then cull and reconcile.
    ///
    /// The first call mounts the chart.
    pub fn update(&mut self) -> Reconciled {
        let canvas = self.options.canvas();
        let viewport = Rect::from_origin_size(Point::ORIGIN, canvas);
        if self.zoom.is_attached() {
            self.zoom.set_viewport(viewport);
        } else {
            self.zoom.attach(viewport);
        }
        let axes = match self.options.orientation.zoom_axis() {
            Axis::X => ZoomAxes::X,
            Axis::Y => ZoomAxes::Y,
        };
        self.zoom.set_translate_extent(viewport).set_axes(axes);

        let pending = std::mem::replace(&mut self.pending, Invalidation::empty());
        if pending.contains(Invalidation::LAYOUT) {
            self.relayout();
        }
        if pending.contains(Invalidation::ZOOM_RESET) {
            self.zoom.zoom_reset(self.animation());
        }
        self.render(Transition::new(self.animation()))
    }

    /// Advance a running zoom transition by `dt` and redraw.
    ///
    /// Returns `None` when no transition is running.
    pub fn tick(&mut self, dt: Duration) -> Option<Reconciled> {
        let change = self.zoom.advance(dt)?;
        Some(self.zoom_changed(change))
    }

    /// Zoom so the subtree of `id` fills the viewport along the weight axis.
    ///
    /// Returns `false` for unknown or zero-span nodes and before mounting.
    pub fn zoom_to_node(&mut self, id: NodeId) -> bool {
        let Some((x0, x1)) = self.node(id).map(LayoutNode::weight_span) else {
            return false;
        };
        if x1 <= x0 || !self.zoom.is_attached() {
            #[cfg(feature = "tracing")]
            tracing::trace!(id = id.index(), "zoom to node ignored");
            return false;
        }
        let o = self.options.orientation;
        let extent = o.canonical_size(self.options.canvas()).width;
        let k = extent / (x1 - x0);
        let (x, y) = match o.zoom_axis() {
            Axis::X => (-x0, 0.0),
            Axis::Y => (0.0, -x0),
        };
        if let Some(change) = self.zoom.zoom_to(x, y, k, self.animation()) {
            self.zoom_changed(change);
        }
        true
    }

    /// Scale by `factor` about the viewport center.
    pub fn zoom_by(&mut self, factor: f64) -> &mut Self {
        if let Some(change) = self.zoom.zoom_by(factor, self.animation()) {
            self.zoom_changed(change);
        }
        self
    }

    /// Return to the unzoomed view.
    pub fn zoom_reset(&mut self) -> &mut Self {
        if let Some(change) = self.zoom.zoom_reset(self.animation()) {
            self.zoom_changed(change);
        }
        self
    }

    /// Route a pointer event.
    pub fn handle_event(&mut self, event: PointerEvent) -> EventOutcome {
        match event {
            PointerEvent::Click(at) => {
                let target = self.hit(at);
                if let Some(on_click) = self.on_click.clone() {
                    on_click(target.and_then(|id| self.datum(id)), at);
                } else if let Some(id) = target {
                    self.zoom_to_node(id);
                } else {
                    self.zoom_reset();
                }
                EventOutcome {
                    target,
                    prevent_default: false,
                }
            }
            PointerEvent::RightClick(at) => {
                let target = self.hit(at);
                let handler = self.on_right_click.clone();
                if let Some(on_right_click) = &handler {
                    on_right_click(target.and_then(|id| self.datum(id)), at);
                }
                EventOutcome {
                    target,
                    prevent_default: handler.is_some(),
                }
            }
            PointerEvent::DoubleClick(at) => EventOutcome {
                target: self.hit(at),
                prevent_default: false,
            },
            PointerEvent::Move(at) => self.hover_at(at),
            PointerEvent::Leave => {
                self.hover.clear();
                if let Some(tooltip) = self.tooltip.as_mut() {
                    tooltip.hide();
                }
                EventOutcome::default()
            }
            PointerEvent::Wheel { at, delta, mode } => {
                let change = self.zoom.scale_at(wheel_factor(delta, mode), at);
                let prevent_default = change.is_some();
                if let Some(change) = change {
                    self.zoom_changed(change);
                }
                EventOutcome {
                    target: None,
                    prevent_default,
                }
            }
            PointerEvent::Drag(delta) => {
                if let Some(change) = self.zoom.pan_by(delta) {
                    self.zoom_changed(change);
                }
                EventOutcome::default()
            }
        }
    }

    fn hover_at(&mut self, at: Point) -> EventOutcome {
        let target = self.hit(at);
        let path = match (target, self.partition.as_ref()) {
            (Some(id), Some(partition)) => partition.path_to_root(id),
            _ => Vec::new(),
        };
        let diff = self.hover.update(&path);
        if diff.is_empty() {
            if target.is_some() {
                if let Some(tooltip) = self.tooltip.as_mut() {
                    tooltip.move_to(at);
                }
            }
        } else {
            #[cfg(feature = "tracing")]
            tracing::trace!(left = diff.left.len(), entered = diff.entered.len(), "hover changed");
            if let Some(on_hover) = self.on_hover.clone() {
                on_hover(target.and_then(|id| self.datum(id)), at);
            }
            let html = target.and_then(|id| self.tooltip_html(id));
            if let Some(tooltip) = self.tooltip.as_mut() {
                match html {
                    Some(html) => tooltip.show(&html, at),
                    None => tooltip.hide(),
                }
            }
        }
        EventOutcome {
            target,
            prevent_default: false,
        }
    }

    fn animation(&self) -> Duration {
        if self.options.disable_animations {
            Duration::ZERO
        } else {
            self.options.transition_duration
        }
    }

    fn zoom_changed(&mut self, change: ZoomChange) -> Reconciled {
        let transition = if change.direct || self.options.disable_animations {
            Transition::NONE
        } else {
            Transition::new(change.remaining)
        };
        self.render(transition)
    }

    fn relayout(&mut self) {
        // Old ids mean nothing in the new layout.
        if !self.hover.path().is_empty() {
            self.hover.clear();
            if let Some(tooltip) = self.tooltip.as_mut() {
                tooltip.hide();
            }
        }
        let Some(root) = self.data.as_ref() else {
            self.partition = None;
            return;
        };
        let children = &self.children;
        let size = &self.size;
        let orientation = self.options.orientation;
        let partition = Partition::compute(
            root,
            |d| children.resolve(d),
            |d| size.resolve(d).unwrap_or(0.0),
            self.sort.as_deref(),
            PartitionOptions {
                size: orientation.canonical_size(self.options.canvas()),
                exclude_root: self.options.exclude_root,
            },
        );
        #[cfg(feature = "tracing")]
        tracing::debug!(
            nodes = partition.all_len(),
            visible = partition.len(),
            max_depth = partition.max_depth(),
            %orientation,
            "relayout"
        );
        self.partition = Some(partition);
    }

    fn render(&mut self, transition: Transition) -> Reconciled {
        let t = self.zoom.transform();
        self.surface.set_view(t.to_affine(self.zoom.axes()), transition);
        let cells = self.cells(t.k);
        let weight_axis = self.options.orientation.zoom_axis();
        self.scene
            .reconcile(cells, t.k, weight_axis, transition, &mut self.surface)
    }

    fn cells(&self, k: f64) -> Vec<(NodeId, Cell)> {
        let (Some(partition), Some(root)) = (self.partition.as_ref(), self.data.as_ref()) else {
            return Vec::new();
        };
        let o = &self.options;
        let mut walk = DatumWalk::new(root, &self.children, partition);
        cull(
            partition,
            self.zoom.transform(),
            o.orientation,
            o.canvas(),
            o.min_segment_width,
        )
        .into_iter()
        .filter_map(|id| {
            let node = partition.get(id)?;
            let datum = walk.datum(id)?;
            Some((id, self.cell(datum, node, k)))
        })
        .collect()
    }

    fn cell(&self, datum: &T, node: &LayoutNode, k: f64) -> Cell {
        let o = self.options.orientation;
        let screen = o.to_screen(node.bounds(), self.options.canvas());
        // One pixel of separation between depth bands.
        let rect = match o.depth_axis() {
            Axis::X => Rect {
                x1: (screen.x1 - 1.0).max(screen.x0),
                ..screen
            },
            Axis::Y => Rect {
                y1: (screen.y1 - 1.0).max(screen.y0),
                ..screen
            },
        };
        let fill = self
            .color
            .resolve(datum)
            .unwrap_or_else(|| DEFAULT_COLOR.to_owned());
        let mut classes = vec!["node".to_owned()];
        if let Some(extra) = self.node_class_name.as_ref().and_then(|a| a.resolve(datum)) {
            classes.extend(extra.split_whitespace().map(str::to_owned));
        }
        let label = self.options.show_labels.then(|| {
            let text = self.label.resolve(datum).unwrap_or_default();
            Label {
                opacity: label_opacity(o, screen.size(), k, text.chars().count()),
                anchor: o.label_anchor(),
                offset: o.label_offset(screen.size()),
                light: !self.contrast.is_light(&fill),
                scale: InverseScale::settled(o.zoom_axis(), k),
                text,
            }
        });
        Cell {
            rect,
            fill,
            classes,
            label,
        }
    }
}

/// Walk from `root` along the recorded child positions to the datum of `id`.
fn datum_at<'a, T: Record>(
    root: &'a T,
    children: &Children<T>,
    partition: &Partition,
    id: NodeId,
) -> Option<&'a T> {
    let mut datum = root;
    for step in partition.path_to_root(id).into_iter().skip(1) {
        let node = partition.get(step)?;
        datum = children.resolve(datum).get(node.source_index())?;
    }
    Some(datum)
}

/// Resolves data for ids visited in pre-order.
///
/// Keeps the datum of every node on the current root path, so each id costs
/// one child lookup when its parent was visited before it.
struct DatumWalk<'a, T> {
    root: &'a T,
    children: &'a Children<T>,
    partition: &'a Partition,
    path: Vec<(NodeId, &'a T)>,
}

impl<'a, T: Record> DatumWalk<'a, T> {
    fn new(root: &'a T, children: &'a Children<T>, partition: &'a Partition) -> Self {
        Self {
            root,
            children,
            partition,
            path: Vec::new(),
        }
    }

    fn datum(&mut self, id: NodeId) -> Option<&'a T> {
        let node = self.partition.get(id)?;
        let Some(parent) = node.parent() else {
            self.path.clear();
            self.path.push((id, self.root));
            return Some(self.root);
        };
        while self.path.last().is_some_and(|&(top, _)| top != parent) {
            self.path.pop();
        }
        let parent_datum = match self.path.last() {
            Some(&(_, d)) => d,
            None => {
                let d = datum_at(self.root, self.children, self.partition, parent)?;
                self.path.push((parent, d));
                d
            }
        };
        let datum = self.children.resolve(parent_datum).get(node.source_index())?;
        self.path.push((id, datum));
        Some(datum)
    }
}
