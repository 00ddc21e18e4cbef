//! The in-page router.
//!
//! Runs on initial load and on every hash-change and pop-state event, and
//! only on the landing page — other documents navigate normally, except
//! for hash links and the logo, which are normalized back to the landing
//! page.
//!
//! The navigation state is a derived tuple (is-home, hash, legacy query
//! id) re-read from the location on every run; nothing routing-related is
//! cached. Legacy `?id=<n>` links are canonicalized to the
//! `#<gallery>?id=<n>` hash form exactly once, with `replace` rather than
//! `push` so back-navigation cannot re-trigger the migration.

use crate::app::App;
use crate::detail;
use crate::history::StatePayload;
use crate::sections;

/// Run the routing algorithm against the current location.
pub fn route(app: &mut App) {
    let loc = app.history.location();
    if !loc.is_home() {
        return;
    }

    // One-time legacy migration: bare ?id=N becomes the canonical hash
    // form. Replace, not push — a single history entry.
    if loc.hash.is_empty()
        && let Some(id) = loc.legacy_id()
    {
        let illustration = &app.config.sections.illustration;
        app.history.replace(
            &format!("{}#{illustration}?id={id}", loc.path),
            StatePayload::detail(id),
        );
    }

    // Re-read: the migration above may have rewritten the location.
    let loc = app.history.location();
    let (name, id) = loc.hash_route();
    let name = name.to_string();
    let illustration = app.config.sections.illustration.clone();

    if name == illustration
        && let Some(id) = id
        && app.artworks.contains(id)
    {
        detail::show(app, id);
        app.scheduler.request_layout();
        return;
    }

    if !loc.hash.is_empty() {
        sections::show(app, &name);
        if name == illustration {
            app.scheduler.request_layout();
        } else {
            detail::hide(app);
        }
        return;
    }

    let landing = app.config.sections.landing.clone();
    sections::show(app, &landing);
}

/// Handle a click on a hash link (`#x` or `/#x`).
///
/// On the landing page this is an in-page navigation: push and route. On
/// any other document it rewrites the location to the landing page with
/// the hash applied. Returns whether the click was consumed; the host
/// lets unconsumed links perform default navigation.
pub fn handle_link_click(app: &mut App, href: &str) -> bool {
    let hash = if let Some(rest) = href.strip_prefix("/#") {
        rest
    } else if let Some(rest) = href.strip_prefix('#') {
        rest
    } else {
        return false;
    };

    if !app.history.location().is_home() {
        // Leave the current document for the landing page, hash applied.
        app.history
            .push(&format!("/#{hash}"), StatePayload::empty());
        route(app);
        return true;
    }

    let path = app.history.location().path;
    app.history
        .push(&format!("{path}#{hash}"), StatePayload::empty());
    route(app);
    true
}

/// The logo always returns to the landing page's home anchor, from any
/// document.
pub fn handle_logo_click(app: &mut App) {
    let landing = app.config.sections.landing.clone();
    app.history
        .push(&format!("/#{landing}"), StatePayload::empty());
    route(app);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{app_with_gallery, app_with_sections, panel_title};

    fn shown(app: &App, id: &str) -> bool {
        app.doc
            .by_id(id)
            .map(|n| app.doc.is_shown(n))
            .unwrap_or(false)
    }

    #[test]
    fn empty_hash_shows_landing() {
        let mut app = app_with_sections(&["home", "about"]);
        route(&mut app);
        assert!(shown(&app, "home"));
        assert!(!shown(&app, "about"));
    }

    #[test]
    fn hash_shows_named_section() {
        let mut app = app_with_sections(&["home", "about"]);
        app.history.replace("/#about", StatePayload::empty());
        route(&mut app);
        assert!(shown(&app, "about"));
        assert!(!shown(&app, "home"));
    }

    #[test]
    fn legacy_query_is_rewritten_once_with_replace() {
        let mut app = app_with_gallery(&[(3, "Puppy"), (5, "Adventure")]);
        app.history.replace("/?id=5", StatePayload::empty());

        route(&mut app);

        assert_eq!(app.history.url(), "/#illustration?id=5");
        assert_eq!(app.history.len(), 1);
        assert_eq!(panel_title(&app).as_deref(), Some("Adventure"));
    }

    #[test]
    fn detail_hash_opens_panel_and_requests_layout() {
        let mut app = app_with_gallery(&[(3, "Puppy")]);
        app.history
            .replace("/#illustration?id=3", StatePayload::empty());

        route(&mut app);

        assert_eq!(panel_title(&app).as_deref(), Some("Puppy"));
        assert!(app.scheduler.layout_pending());
    }

    #[test]
    fn detail_hash_with_unknown_id_falls_back_to_section_show() {
        let mut app = app_with_gallery(&[(3, "Puppy")]);
        app.history
            .replace("/#illustration?id=42", StatePayload::empty());

        route(&mut app);

        // The gallery section shows; no panel is built for the bad id.
        assert!(shown(&app, "illustration"));
        assert!(app.doc.by_id("inline-detail").is_none());
    }

    #[test]
    fn section_hash_hides_open_detail_panel() {
        let mut app = app_with_gallery(&[(3, "Puppy")]);
        app.history
            .replace("/#illustration?id=3", StatePayload::empty());
        route(&mut app);

        app.history.replace("/#about", StatePayload::empty());
        route(&mut app);

        let panel = app.doc.by_id("inline-detail").unwrap();
        assert!(app.doc.get(panel).has_class("hidden"));
    }

    #[test]
    fn router_is_inert_off_the_landing_page() {
        let mut app = app_with_sections(&["home", "about"]);
        app.history
            .replace("/notebook/post.html#about", StatePayload::empty());
        route(&mut app);
        // Nothing shown or hidden: display styles untouched.
        let about = app.doc.by_id("about").unwrap();
        assert_eq!(app.doc.get(about).style("display"), None);
    }

    #[test]
    fn unknown_hash_is_tolerated() {
        let mut app = app_with_sections(&["home", "about"]);
        app.history.replace("/#missing", StatePayload::empty());
        route(&mut app);
        assert!(!shown(&app, "home"));
        assert!(!shown(&app, "about"));
    }

    #[test]
    fn hash_link_click_pushes_and_routes() {
        let mut app = app_with_sections(&["home", "about"]);
        assert!(handle_link_click(&mut app, "#about"));
        assert_eq!(app.history.url(), "/#about");
        assert_eq!(app.history.len(), 2);
        assert!(shown(&app, "about"));
    }

    #[test]
    fn non_hash_link_is_not_consumed() {
        let mut app = app_with_sections(&["home"]);
        assert!(!handle_link_click(&mut app, "/notebook/post.html"));
        assert_eq!(app.history.len(), 1);
    }

    #[test]
    fn hash_link_from_another_document_returns_home() {
        let mut app = app_with_sections(&["home", "about"]);
        app.history
            .replace("/notebook/post.html", StatePayload::empty());
        assert!(handle_link_click(&mut app, "/#about"));
        assert_eq!(app.history.url(), "/#about");
        assert!(shown(&app, "about"));
    }

    #[test]
    fn logo_always_navigates_to_home_anchor() {
        let mut app = app_with_sections(&["home", "about"]);
        app.history
            .replace("/notebook/post.html", StatePayload::empty());
        handle_logo_click(&mut app);
        assert_eq!(app.history.url(), "/#home");
        assert!(shown(&app, "home"));
    }
}
