//! Auxiliary widgets: the horizontal work slider and the palette lightbox.
//!
//! Simple event wiring over the view model — no routing or history
//! involvement. Sliders scroll one item per button press and support mouse
//! dragging; the lightbox shows palette images fullscreen and advances
//! cyclically on click.

use crate::app::App;
use crate::dom::NodeId;
use crate::layout::to_px;
use crate::markup;
use maud::html;
use std::collections::BTreeMap;

/// Mutable widget state owned by the app.
#[derive(Debug, Clone, Default)]
pub struct WidgetState {
    /// Drag state per horizontal gallery strip.
    pub sliders: BTreeMap<NodeId, SliderDrag>,
    /// Lightbox image list and position.
    pub lightbox: LightboxState,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SliderDrag {
    pub dragging: bool,
    pub start_x: f64,
    pub start_left: f64,
}

#[derive(Debug, Clone, Default)]
pub struct LightboxState {
    pub sources: Vec<String>,
    pub index: usize,
}

// ---------------------------------------------------------------------------
// Horizontal slider
// ---------------------------------------------------------------------------

/// Wire every horizontal gallery wrapper. A `data-init` marker on the
/// wrapper keeps repeated initialization from double-wiring.
pub fn init_sliders(app: &mut App) {
    let wrappers = app
        .doc
        .query_class(app.doc.root(), "horizontal-gallery-wrapper");
    for wrapper in wrappers {
        if app.doc.get(wrapper).attr("data-init") == Some("1") {
            continue;
        }
        app.doc.get_mut(wrapper).set_attr("data-init", "1");
        let Some(strip) = app.doc.find_class(wrapper, "horizontal-gallery") else {
            continue;
        };
        app.widgets.sliders.insert(strip, SliderDrag::default());
        update_fades(app, wrapper);
    }
}

/// One scroll step: first item's width plus the strip gap, or the visible
/// width when the strip is empty.
fn scroll_step(app: &App, strip: NodeId) -> f64 {
    match app.doc.find_class(strip, "work-item") {
        Some(item) => {
            let width = app.doc.get(item).metrics.rect_width.unwrap_or(0.0);
            let gap = app
                .doc
                .get(strip)
                .style("gap")
                .and_then(to_px)
                .unwrap_or(0.0);
            (width + gap).round()
        }
        None => app.doc.get(strip).metrics.client_width,
    }
}

fn max_scroll(app: &App, strip: NodeId) -> f64 {
    let m = &app.doc.get(strip).metrics;
    (m.scroll_width - m.client_width).max(0.0)
}

fn scroll_strip_to(app: &mut App, strip: NodeId, left: f64) {
    let clamped = left.clamp(0.0, max_scroll(app, strip));
    app.doc.get_mut(strip).metrics.scroll_left = clamped;
    if let Some(wrapper) = app
        .doc
        .ancestors_inclusive(strip)
        .into_iter()
        .find(|&n| app.doc.get(n).has_class("horizontal-gallery-wrapper"))
    {
        update_fades(app, wrapper);
    }
}

/// Sync the wrapper's edge-fade classes with the strip's scroll position.
pub fn update_fades(app: &mut App, wrapper: NodeId) {
    let Some(strip) = app.doc.find_class(wrapper, "horizontal-gallery") else {
        return;
    };
    let m = &app.doc.get(strip).metrics;
    let at_start = m.scroll_left <= 0.0;
    let at_end = (m.scroll_left + m.client_width).ceil() >= m.scroll_width;

    let wrapper_el = app.doc.get_mut(wrapper);
    if at_start {
        wrapper_el.add_class("at-start");
    } else {
        wrapper_el.remove_class("at-start");
    }
    if at_end {
        wrapper_el.add_class("at-end");
    } else {
        wrapper_el.remove_class("at-end");
    }
}

/// Refresh fades on every wrapper; called on viewport resize.
pub fn refresh_all_fades(app: &mut App) {
    let wrappers = app
        .doc
        .query_class(app.doc.root(), "horizontal-gallery-wrapper");
    for wrapper in wrappers {
        update_fades(app, wrapper);
    }
}

fn handle_slide_button(app: &mut App, node: NodeId) -> bool {
    let Some(button) = app
        .doc
        .ancestors_inclusive(node)
        .into_iter()
        .find(|&n| app.doc.get(n).has_class("slide-button"))
    else {
        return false;
    };
    let Some(wrapper) = app
        .doc
        .ancestors_inclusive(button)
        .into_iter()
        .find(|&n| app.doc.get(n).has_class("horizontal-gallery-wrapper"))
    else {
        return false;
    };
    let Some(strip) = app.doc.find_class(wrapper, "horizontal-gallery") else {
        return false;
    };
    let step = scroll_step(app, strip);
    let delta = if app.doc.get(button).has_class("left") {
        -step
    } else {
        step
    };
    let left = app.doc.get(strip).metrics.scroll_left + delta;
    scroll_strip_to(app, strip, left);
    true
}

/// Begin a drag when the pointer lands inside a wired strip.
pub fn pointer_down(app: &mut App, node: NodeId, x: f64) {
    let Some(strip) = app
        .doc
        .ancestors_inclusive(node)
        .into_iter()
        .find(|&n| app.doc.get(n).has_class("horizontal-gallery"))
    else {
        return;
    };
    let start_left = app.doc.get(strip).metrics.scroll_left;
    if let Some(drag) = app.widgets.sliders.get_mut(&strip) {
        drag.dragging = true;
        drag.start_x = x;
        drag.start_left = start_left;
        app.doc.get_mut(strip).add_class("dragging");
    }
}

/// Drag in progress: scroll opposite to pointer travel.
pub fn pointer_move(app: &mut App, x: f64) {
    let dragging: Vec<(NodeId, SliderDrag)> = app
        .widgets
        .sliders
        .iter()
        .filter(|(_, d)| d.dragging)
        .map(|(&n, &d)| (n, d))
        .collect();
    for (strip, drag) in dragging {
        scroll_strip_to(app, strip, drag.start_left - (x - drag.start_x));
    }
}

/// End every drag.
pub fn pointer_up(app: &mut App) {
    let strips: Vec<NodeId> = app.widgets.sliders.keys().copied().collect();
    for strip in strips {
        if let Some(drag) = app.widgets.sliders.get_mut(&strip)
            && drag.dragging
        {
            drag.dragging = false;
            app.doc.get_mut(strip).remove_class("dragging");
        }
    }
}

// ---------------------------------------------------------------------------
// Palette lightbox
// ---------------------------------------------------------------------------

/// Build the fullscreen modal once, hidden, at the document root.
pub fn init_lightbox(app: &mut App) {
    if app.doc.by_id("palette-modal").is_some() {
        return;
    }
    let template = html! {
        div id="palette-modal" style="display: none" {
            div class="modal-overlay" data-action="close" {}
            div class="modal-content" {
                img id="palette-modal-img" alt="";
            }
            button class="modal-close" aria-label="Close" data-action="close" { "×" }
        }
    }
    .into_string();
    let nodes = markup::parse_fragment(&template);
    if let Some(node) = nodes.first() {
        let modal = markup::instantiate(&mut app.doc, node);
        let root = app.doc.root();
        app.doc.append_child(root, modal);
    }
}

fn lightbox_open(app: &App) -> bool {
    app.doc
        .by_id("palette-modal")
        .map(|m| app.doc.get(m).style("display") == Some("flex"))
        .unwrap_or(false)
}

/// Gather the palette grid's image sources, in DOM order.
fn collect_sources(app: &mut App) {
    let sources = app
        .doc
        .by_id("palette")
        .and_then(|palette| app.doc.find_class(palette, "palette-grid"))
        .map(|grid| {
            app.doc
                .query_tag(grid, "img")
                .into_iter()
                .filter_map(|img| app.doc.get(img).attr("src").map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    app.widgets.lightbox.sources = sources;
}

/// Open the modal at position `i`, wrapping in both directions.
fn open_at(app: &mut App, i: isize) {
    if app.widgets.lightbox.sources.is_empty() {
        collect_sources(app);
    }
    let len = app.widgets.lightbox.sources.len() as isize;
    if len == 0 {
        return;
    }
    let idx = i.rem_euclid(len) as usize;
    app.widgets.lightbox.index = idx;
    let src = app.widgets.lightbox.sources[idx].clone();

    let Some(modal) = app.doc.by_id("palette-modal") else {
        return;
    };
    if let Some(img) = app.doc.by_id("palette-modal-img") {
        app.doc.get_mut(img).set_attr("src", &src);
    }
    app.doc.get_mut(modal).set_style("display", "flex");
    app.doc.get_mut(modal).set_attr("aria-hidden", "false");
    let root = app.doc.root();
    app.doc.get_mut(root).set_style("overflow", "hidden");
}

/// Close the modal and restore page scrolling.
pub fn close_lightbox(app: &mut App) {
    let Some(modal) = app.doc.by_id("palette-modal") else {
        return;
    };
    app.doc.get_mut(modal).set_style("display", "none");
    app.doc.get_mut(modal).set_attr("aria-hidden", "true");
    let root = app.doc.root();
    app.doc.get_mut(root).remove_style("overflow");
}

fn advance_lightbox(app: &mut App) {
    let next = app.widgets.lightbox.index as isize + 1;
    open_at(app, next);
}

fn handle_lightbox_click(app: &mut App, node: NodeId) -> bool {
    // Close controls and the modal image only matter while open.
    if lightbox_open(app) {
        if app
            .doc
            .ancestors_inclusive(node)
            .into_iter()
            .any(|n| app.doc.get(n).attr("data-action") == Some("close"))
        {
            close_lightbox(app);
            return true;
        }
        if app.doc.get(node).id() == Some("palette-modal-img") {
            advance_lightbox(app);
            return true;
        }
    }

    // A palette grid image opens the modal at its own position.
    if app.doc.get(node).tag == "img" {
        let in_palette_grid = app.doc.ancestors_inclusive(node).into_iter().any(|n| {
            app.doc.get(n).has_class("palette-grid")
                && app
                    .doc
                    .ancestors_inclusive(n)
                    .into_iter()
                    .any(|p| app.doc.get(p).id() == Some("palette"))
        });
        if in_palette_grid {
            collect_sources(app);
            let src = app.doc.get(node).attr("src").unwrap_or("");
            let pos = app
                .widgets
                .lightbox
                .sources
                .iter()
                .position(|s| s == src)
                .unwrap_or(0);
            open_at(app, pos as isize);
            return true;
        }
    }
    false
}

/// Route a click through the widgets. Returns whether it was consumed.
pub fn handle_click(app: &mut App, node: NodeId) -> bool {
    handle_lightbox_click(app, node) || handle_slide_button(app, node)
}

/// Escape closes an open lightbox.
pub fn handle_key(app: &mut App, key: &str) {
    if key == "Escape" && lightbox_open(app) {
        close_lightbox(app);
    }
}
