//! Shared fixtures for the folio-engine test suite.
//!
//! Builders assemble the same view-model shapes the fragment loader would
//! produce from real markup — mostly by parsing fixture HTML through the
//! production parser — plus lookup helpers for the pieces tests assert on.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut app = app_with_gallery(&[(1, "Tropical Summer"), (3, "Puppy")]);
//! crate::gallery::init_gallery(&mut app);
//! assert_eq!(panel_title(&app), None);
//! ```

use crate::app::App;
use crate::config::EngineConfig;
use crate::dom::{Document, NodeId};
use crate::markup;

/// A document with a `main` container and one empty `<section>` per name.
pub fn app_with_sections(names: &[&str]) -> App {
    let mut doc = Document::new("body");
    let container = doc.create_element("main");
    doc.get_mut(container).set_attr("id", "main-container");
    let root = doc.root();
    doc.append_child(root, container);

    for name in names {
        let section = doc.create_element("section");
        doc.get_mut(section).set_attr("id", name);
        doc.append_child(container, section);
    }
    App::new(EngineConfig::default(), doc, container, "/")
}

/// A document carrying the illustration section with a gallery of cards,
/// one per `(id, title)` pair, in the given order.
///
/// Cards mirror the real markup: an anchor with an `id=<n>` link target
/// wrapping an `<img>` whose alt text is the title. The grid uses an 8px
/// row height and no gap unless a test sets one.
pub fn app_with_gallery(cards: &[(u32, &str)]) -> App {
    let mut app = app_with_sections(&[]);

    let mut html = String::from(
        r#"<section id="illustration"><div class="section-inner"><div class="gallery" style="grid-auto-rows: 8px">"#,
    );
    for (id, title) in cards {
        html.push_str(&format!(
            r#"<a href="/?id={id}"><img src="/images/illust_images/{id}.jpg" alt="{title}"></a>"#
        ));
    }
    html.push_str("</div></div></section>");

    let nodes = markup::parse_fragment(&html);
    let section = markup::instantiate(&mut app.doc, &nodes[0]);
    app.doc.append_child(app.container, section);
    app
}

/// A horizontal slider fixture: wrapper, strip (400px visible of 800px
/// scrollable, 10px gap), `count` 200px-wide items, and both buttons.
pub fn app_with_slider(count: usize) -> App {
    let mut app = app_with_sections(&["moreworks"]);
    let section = app.doc.by_id("moreworks").unwrap();

    let mut html = String::from(
        r#"<div class="horizontal-gallery-wrapper"><div class="horizontal-gallery" style="gap: 10px">"#,
    );
    for i in 0..count {
        html.push_str(&format!(r#"<div class="work-item" data-n="{i}"></div>"#));
    }
    html.push_str(
        r#"</div><button class="slide-button left"></button><button class="slide-button right"></button></div>"#,
    );

    let nodes = markup::parse_fragment(&html);
    let wrapper = markup::instantiate(&mut app.doc, &nodes[0]);
    app.doc.append_child(section, wrapper);

    let strip = app.doc.find_class(wrapper, "horizontal-gallery").unwrap();
    app.doc.get_mut(strip).metrics.client_width = 400.0;
    app.doc.get_mut(strip).metrics.scroll_width = 800.0;
    for item in app.doc.query_class(strip, "work-item") {
        app.doc.get_mut(item).metrics.rect_width = Some(200.0);
    }
    app
}

/// A palette section whose grid holds one image per source path.
pub fn app_with_palette(sources: &[&str]) -> App {
    let mut app = app_with_sections(&[]);

    let mut html = String::from(r#"<section id="palette"><div class="palette-grid">"#);
    for src in sources {
        html.push_str(&format!(r#"<a href="{src}"><img src="{src}" alt=""></a>"#));
    }
    html.push_str("</div></section>");

    let nodes = markup::parse_fragment(&html);
    let section = markup::instantiate(&mut app.doc, &nodes[0]);
    app.doc.append_child(app.container, section);
    app
}

// =========================================================================
// Lookups
// =========================================================================

/// The gallery grid node. Panics if the fixture has none.
pub fn gallery_node(app: &App) -> NodeId {
    app.gallery_node().expect("fixture has no gallery")
}

/// The `--span` custom property of an artwork's card.
pub fn card_span(app: &App, id: u32) -> Option<String> {
    let card = app.gallery_card(id)?;
    app.doc.get(card).style("--span").map(str::to_string)
}

/// Set the measured bounding-box height of an artwork's image.
pub fn set_image_height(app: &mut App, id: u32, height: f64) {
    let img = app.gallery_image(id).expect("fixture has no such image");
    app.doc.get_mut(img).metrics.rect_height = Some(height);
}

/// Text of the detail panel title, if the panel exists.
pub fn panel_title(app: &App) -> Option<String> {
    let title = app.doc.by_id("inline-detail-title")?;
    Some(app.doc.text_content(title))
}
