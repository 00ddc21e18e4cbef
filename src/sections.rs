//! Section visibility control.
//!
//! Exactly one top-level section is visible at a time; within the notebook
//! section, at most one sub-category. Both inline display and the `hidden`
//! class are kept in sync for sub-categories, since the stylesheet keys off
//! either. Unknown identifiers are a valid "nothing to do" state — routing
//! stays tolerant of sections whose fragments failed to load.

use crate::app::App;
use crate::dom::DisplayMode;

/// Hide every top-level section and sub-category, then show only
/// `section_id`. No-op for unknown identifiers.
///
/// Showing the illustration gallery schedules a layout recompute for the
/// next frame (images may have resized while hidden).
pub fn show(app: &mut App, section_id: &str) {
    for section in app.doc.query_tag(app.container, "section") {
        app.doc.hide(section);
    }
    hide_sub_categories(app);

    let Some(target) = app.doc.by_id(section_id) else {
        return;
    };
    let mode = app.config.display_mode(section_id);
    app.doc.show(target, mode);

    if section_id == app.config.sections.illustration {
        app.scheduler.request_layout();
    }
}

/// Reveal one notebook sub-category, hiding the notebook index and every
/// other sub-category. No-op if `notebook-<category>` doesn't exist.
pub fn show_sub_category(app: &mut App, category: &str) {
    let index_id = app.config.sections.notebook_index.clone();
    if let Some(index) = app.doc.by_id(&index_id) {
        app.doc.hide(index);
    }
    hide_sub_categories(app);

    let target_id = format!("{}{}", app.config.sections.subcategory_prefix, category);
    let Some(target) = app.doc.by_id(&target_id) else {
        return;
    };
    app.doc.get_mut(target).remove_class("hidden");
    app.doc.show(target, DisplayMode::Block);
}

/// Leave a sub-category and return to the notebook index.
pub fn go_back_to_index(app: &mut App) {
    hide_sub_categories(app);
    let index_id = app.config.sections.notebook_index.clone();
    show(app, &index_id);
}

/// Collapse or expand the content following a notebook post title.
pub fn toggle_post(app: &mut App, title: crate::dom::NodeId) {
    let Some(content) = app.doc.next_sibling(title) else {
        return;
    };
    if app.doc.get(content).has_class("hidden") {
        app.doc.get_mut(content).remove_class("hidden");
    } else {
        app.doc.get_mut(content).add_class("hidden");
    }
}

fn hide_sub_categories(app: &mut App) {
    for sub in app.doc.query_class(app.doc.root(), "notebook-category") {
        app.doc.get_mut(sub).add_class("hidden");
        app.doc.hide(sub);
    }
}
