//! Masonry layout: per-card grid-row spans from rendered image heights.
//!
//! The gallery is a CSS grid with a small fixed row height; each card
//! spans however many rows its image needs, so variable-height artwork
//! tiles without gaps. The span calculation is pure math over three
//! numbers — image height, row height, gap — kept in standalone functions
//! so it is testable without a document.
//!
//! `layout_gallery` is safe to call arbitrarily often: it only reads
//! measured metrics and rewrites derived style, so resize storms and
//! repeated image-load events converge on the same spans.

use crate::app::App;

/// Leading-number parse with CSS unit tolerance: `"8px"` → 8.0.
/// Returns `None` for values with no leading number (`"calc(1rem)"`).
pub fn to_px(value: &str) -> Option<f64> {
    let s = value.trim();
    let mut end = 0;
    for (i, c) in s.char_indices() {
        if c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+')) {
            end = i + c.len_utf8();
        } else {
            break;
        }
    }
    s[..end].parse::<f64>().ok()
}

/// Rows a card must span for its image to fit.
///
/// `max(1, ceil((height + gap) / (row_height + gap)))`; a non-positive row
/// height degrades to a single row rather than dividing by zero.
pub fn row_span(height: f64, row_height: f64, gap: f64) -> u32 {
    if row_height <= 0.0 {
        return 1;
    }
    let span = ((height + gap) / (row_height + gap)).ceil();
    (span.max(1.0)) as u32
}

/// Row height from the grid's `grid-auto-rows`, defaulting when the
/// property is unset, non-numeric, or zero.
fn resolve_row_height(style_value: Option<&str>, default: f64) -> f64 {
    style_value
        .and_then(to_px)
        .filter(|&v| v != 0.0)
        .unwrap_or(default)
}

/// Gap resolution chain: `row-gap` → `gap` → custom property → 0.
/// Zero values fall through to the next source.
fn resolve_gap(row_gap: Option<&str>, gap: Option<&str>, custom: Option<&str>) -> f64 {
    [row_gap, gap, custom]
        .into_iter()
        .filter_map(|v| v.and_then(to_px))
        .find(|&v| v != 0.0)
        .unwrap_or(0.0)
}

/// Recompute the row span of every gallery card with an image.
///
/// Cards without an image are left alone. Missing gallery container is a
/// valid "nothing to do" state.
pub fn layout_gallery(app: &mut App) {
    let Some(gallery) = app.gallery_node() else {
        return;
    };

    let row_height = resolve_row_height(
        app.doc.get(gallery).style("grid-auto-rows"),
        app.config.layout.default_row_height,
    );
    let section = app.doc.closest_tag(gallery, "section");
    let custom_gap = section.and_then(|s| {
        app.doc
            .get(s)
            .style(&app.config.layout.gap_property)
            .map(str::to_string)
    });
    let gap = resolve_gap(
        app.doc.get(gallery).style("row-gap"),
        app.doc.get(gallery).style("gap"),
        custom_gap.as_deref(),
    );

    for card in app.doc.query_tag(gallery, "a") {
        let Some(img) = app.doc.find_tag(card, "img") else {
            continue;
        };
        let metrics = &app.doc.get(img).metrics;
        let height = metrics
            .rect_height
            .or(metrics.offset_height)
            .unwrap_or(0.0);
        let span = row_span(height, row_height, gap);
        let card_el = app.doc.get_mut(card);
        card_el.set_style("--span", &span.to_string());
        card_el.set_style("grid-row-end", &format!("span {span}"));
    }
}
