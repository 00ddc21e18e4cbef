//! Inline detail panel: one artwork shown in place of the gallery grid.
//!
//! The panel is a state machine over {hidden, shown-for-artwork(id)}. Its
//! DOM is built lazily exactly once — from a compile-time template pushed
//! through the same fragment parser as fetched sections — and then reused:
//! hiding marks it hidden, it is never destroyed. Prev/next follow DOM
//! order at the moment of showing, and the controls disappear entirely
//! (visibility, not disabling) at the gallery boundaries.

use crate::app::App;
use crate::artworks::to_abs;
use crate::dom::NodeId;
use crate::gallery;
use crate::history::StatePayload;
use crate::markup;
use crate::sections;
use maud::html;

/// Adjacency of the artwork currently in the panel. Rewritten on every
/// `show`; consumed when the prev/next controls are clicked.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetailState {
    pub current: Option<u32>,
    pub prev: Option<u32>,
    pub next: Option<u32>,
}

/// Show the detail panel for `id`. No-op when the table has no such
/// artwork — the panel (if any) is left exactly as it was.
pub fn show(app: &mut App, id: u32) {
    let Some(art) = app.artworks.get(id).cloned() else {
        return;
    };

    let illustration = app.config.sections.illustration.clone();
    sections::show(app, &illustration);

    let Some(panel) = ensure_panel(app) else {
        return;
    };

    if let Some(img) = app.doc.by_id("inline-detail-image") {
        app.doc.get_mut(img).set_attr("src", &to_abs(&art.image));
        app.doc.get_mut(img).set_attr("alt", &art.title);
    }
    if let Some(title) = app.doc.by_id("inline-detail-title") {
        app.doc.set_text(title, &art.title);
    }
    if let Some(date) = app.doc.by_id("inline-detail-date") {
        app.doc.set_text(date, art.date.as_deref().unwrap_or(""));
    }
    if let Some(desc) = app.doc.by_id("inline-detail-desc") {
        populate_description(app, desc, id, &art.description);
    }

    let order = app
        .gallery_node()
        .map(|g| gallery::ids_in_dom_order(&app.doc, g))
        .unwrap_or_default();
    let pos = order.iter().position(|&x| x == id);
    let prev = pos.filter(|&i| i > 0).map(|i| order[i - 1]);
    let next = pos.and_then(|i| order.get(i + 1).copied());
    app.detail = DetailState {
        current: Some(id),
        prev,
        next,
    };
    set_control_visible(app, "inline-prev", prev.is_some());
    set_control_visible(app, "inline-next", next.is_some());

    app.doc.get_mut(panel).remove_class("hidden");

    let top = app.doc.get(panel).metrics.offset_top;
    let margin = app.config.scroll.margin;
    app.viewport.scroll_to(top - margin);
}

/// Mark the panel hidden. No-op when it was never built. The DOM node is
/// kept for the next `show`.
pub fn hide(app: &mut App) {
    if let Some(panel) = app.doc.by_id("inline-detail") {
        app.doc.get_mut(panel).add_class("hidden");
    }
}

/// Previous-artwork control: push a history entry and re-show.
pub fn nav_prev(app: &mut App) {
    if let Some(id) = app.detail.prev {
        push_detail_entry(app, id);
        show(app, id);
    }
}

/// Next-artwork control.
pub fn nav_next(app: &mut App) {
    if let Some(id) = app.detail.next {
        push_detail_entry(app, id);
        show(app, id);
    }
}

/// Back control: history entry for the bare gallery, hide the panel, and
/// scroll back to the gallery section's top.
pub fn nav_back(app: &mut App) {
    let path = app.history.location().path;
    let illustration = app.config.sections.illustration.clone();
    app.history
        .push(&format!("{path}#{illustration}"), StatePayload::empty());
    hide(app);
    let top = app
        .doc
        .by_id(&illustration)
        .map(|n| app.doc.get(n).metrics.offset_top)
        .unwrap_or(0.0);
    let margin = app.config.scroll.margin;
    app.viewport.scroll_to(top - margin);
}

/// Push the canonical detail entry `#<gallery>?id=<id>` for `id`.
pub(crate) fn push_detail_entry(app: &mut App, id: u32) {
    let path = app.history.location().path;
    let illustration = &app.config.sections.illustration;
    app.history.push(
        &format!("{path}#{illustration}?id={id}"),
        StatePayload::detail(id),
    );
}

/// Description precedence: inline `desc-<id>` template → card/image
/// `data-desc` attribute → the artwork table's default.
fn populate_description(app: &mut App, desc: NodeId, id: u32, table_default: &str) {
    app.doc.clear_children(desc);
    if let Some(template) = app.doc.by_id(&format!("desc-{id}")) {
        app.doc.clone_children_into(template, desc);
        return;
    }
    let from_attr = app.gallery_node().and_then(|gallery| {
        let card = gallery::card_for_id(&app.doc, gallery, id)?;
        let own = app.doc.get(card).attr("data-desc").map(str::trim);
        let from_img = app
            .doc
            .find_tag(card, "img")
            .and_then(|img| app.doc.get(img).attr("data-desc"))
            .map(str::trim);
        crate::artworks::resolve(&[own, from_img]).map(str::to_string)
    });
    let text = from_attr.unwrap_or_else(|| table_default.to_string());
    app.doc.set_text(desc, &text);
}

fn set_control_visible(app: &mut App, control_id: &str, visible: bool) {
    if let Some(node) = app.doc.by_id(control_id) {
        let value = if visible { "visible" } else { "hidden" };
        app.doc.get_mut(node).set_style("visibility", value);
    }
}

/// Build the panel on first use, inserted inside the gallery section's
/// inner wrapper just before the grid. Returns the existing panel on
/// every later call.
fn ensure_panel(app: &mut App) -> Option<NodeId> {
    if let Some(panel) = app.doc.by_id("inline-detail") {
        return Some(panel);
    }
    let section = app.doc.by_id(&app.config.sections.illustration)?;
    let inner = app.doc.find_class(section, "section-inner")?;
    let grid = app.doc.find_class(inner, "gallery");

    let template = html! {
        div id="inline-detail" class="inline-detail hidden" {
            div class="illust-detail-wrap" {
                div class="illust-detail-left" {
                    img id="inline-detail-image" alt="";
                }
                div class="illust-detail-right" {
                    h2 id="inline-detail-title" {}
                    p class="detail-meta" id="inline-detail-date" {}
                    div id="inline-detail-desc" class="detail-desc" {}
                    div class="detail-nav" {
                        a href="#" id="inline-back" { "Back to WORK" }
                        div class="prev-next" {
                            a href="#" id="inline-prev" { "prev" }
                            span { " / " }
                            a href="#" id="inline-next" { "next" }
                        }
                    }
                }
            }
        }
    }
    .into_string();

    let nodes = markup::parse_fragment(&template);
    let panel = markup::instantiate(&mut app.doc, nodes.first()?);
    app.doc.insert_before(inner, panel, grid);
    Some(panel)
}
