//! Gallery indexing: turning card anchors into the artwork table.
//!
//! One pass over the gallery container's anchors, in DOM order, per card:
//! parse the identifier out of the link target, pull title/description/date
//! from markup with the documented precedence, merge into the table, dress
//! the card (classes, title overlay), and wire click and image-load
//! behavior. The pass is idempotent — overlays are skipped when present,
//! subscriptions dedupe, and the window recompute hook registers once.
//!
//! Gallery order is never cached: prev/next adjacency always re-reads the
//! anchors from the document.

use crate::app::App;
use crate::artworks::MarkupFields;
use crate::dom::{Document, NodeId};
use crate::layout;
use crate::markup;
use maud::html;
use tracing::debug;

/// Extract the numeric identifier from a card link target: the first
/// `id=<digits>` token anywhere in the href. Absent or malformed → 0,
/// the "no identifier" sentinel.
pub fn parse_card_id(href: &str) -> u32 {
    let mut rest = href;
    while let Some(pos) = rest.find("id=") {
        let after = &rest[pos + 3..];
        let digits: String = after.chars().take_while(char::is_ascii_digit).collect();
        if !digits.is_empty() {
            return digits.parse().unwrap_or(0);
        }
        rest = after;
    }
    0
}

/// Artwork identifiers in document order. The canonical ordering for
/// prev/next navigation; anchors without an identifier are skipped.
pub fn ids_in_dom_order(doc: &Document, gallery: NodeId) -> Vec<u32> {
    doc.query_tag(gallery, "a")
        .into_iter()
        .filter_map(|a| {
            let id = parse_card_id(doc.get(a).attr("href").unwrap_or(""));
            (id > 0).then_some(id)
        })
        .collect()
}

/// Find the card anchor for an artwork id, if the gallery has one.
pub fn card_for_id(doc: &Document, gallery: NodeId, id: u32) -> Option<NodeId> {
    doc.query_tag(gallery, "a")
        .into_iter()
        .find(|&a| parse_card_id(doc.get(a).attr("href").unwrap_or("")) == id)
}

/// Index every gallery card, then run one layout pass and register the
/// viewport recompute hook. Safe to call again after the gallery's markup
/// changes.
pub fn init_gallery(app: &mut App) {
    let Some(gallery) = app.gallery_node() else {
        return;
    };
    let anchors = app.doc.query_tag(gallery, "a");
    if anchors.is_empty() {
        return;
    }
    debug!(cards = anchors.len(), "indexing gallery");

    for anchor in anchors {
        index_card(app, anchor);
    }

    layout::layout_gallery(app);

    // One-time viewport hooks; repeated init must not stack listeners.
    app.subs.window_layout = true;
}

fn index_card(app: &mut App, anchor: NodeId) {
    let id = parse_card_id(app.doc.get(anchor).attr("href").unwrap_or(""));
    let img = app.doc.find_tag(anchor, "img");

    let attr_of = |doc: &Document, node: Option<NodeId>, name: &str| -> String {
        node.and_then(|n| doc.get(n).attr(name))
            .unwrap_or("")
            .trim()
            .to_string()
    };

    let alt_title = attr_of(&app.doc, img, "alt");
    let title = {
        let explicit = attr_of(&app.doc, Some(anchor), "data-title");
        if explicit.is_empty() { alt_title.clone() } else { explicit }
    };
    let description = {
        let own = attr_of(&app.doc, Some(anchor), "data-desc");
        if own.is_empty() {
            attr_of(&app.doc, img, "data-desc")
        } else {
            own
        }
    };
    let date = attr_of(&app.doc, Some(anchor), "data-date");

    if id > 0 {
        app.artworks.merge(
            id,
            MarkupFields {
                title,
                image: attr_of(&app.doc, img, "src"),
                description,
                date: if date.is_empty() { None } else { Some(date) },
            },
        );
    }

    app.doc.get_mut(anchor).add_class("illust-card");
    app.doc.get_mut(anchor).add_class("work-item");

    ensure_overlay(app, anchor, id, &alt_title);

    if id > 0 {
        app.subs.register_card(anchor, id);
    }

    // Layout now if the image is ready, otherwise once on its load event.
    if let Some(img) = img {
        if app.doc.get(img).metrics.complete {
            layout::layout_gallery(app);
        } else {
            app.subs.defer_layout_to_image(img);
        }
    }
}

/// Add the hover overlay carrying the card title. Exactly one per card —
/// re-indexing a decorated card is a no-op.
fn ensure_overlay(app: &mut App, anchor: NodeId, id: u32, alt_title: &str) {
    if app.doc.find_class(anchor, "overlay").is_some() {
        return;
    }
    let title = app
        .artworks
        .get(id)
        .map(|a| a.title.clone())
        .unwrap_or_else(|| alt_title.to_string());
    let overlay_html = html! {
        div class="overlay" {
            span class="title" { (title) }
        }
    }
    .into_string();
    let nodes = markup::parse_fragment(&overlay_html);
    if let Some(node) = nodes.first() {
        let overlay = markup::instantiate(&mut app.doc, node);
        app.doc.append_child(anchor, overlay);
    }
}
