//! Engine state and the event dispatch loop.
//!
//! [`App`] owns everything the page session needs: the view model, the
//! history list, the artwork table, widget state, and the frame scheduler.
//! Hosts drive it with three calls:
//!
//! 1. [`App::boot`] — assemble the page from fragments and run the initial
//!    route (the `window.onload` sequence).
//! 2. [`App::dispatch`] — feed each discrete event as it happens.
//! 3. [`App::run_frame`] — present a frame; at most one deferred layout
//!    recompute runs per call.
//!
//! On non-landing documents, boot skips assembly entirely: only the logo
//! link and hash-link normalization stay active, everything else is inert.

use crate::artworks::ArtworkTable;
use crate::config::EngineConfig;
use crate::detail::{self, DetailState};
use crate::dom::{Document, NodeId, Viewport};
use crate::events::{Event, Scheduler, Subscriptions};
use crate::fragments::{FragmentSource, LoadReport, load_sections};
use crate::gallery;
use crate::history::History;
use crate::layout;
use crate::router;
use crate::widgets::{self, WidgetState};
use tracing::debug;

/// One page session.
pub struct App {
    pub config: EngineConfig,
    pub doc: Document,
    /// The container sections are injected into.
    pub container: NodeId,
    pub history: History,
    pub viewport: Viewport,
    pub artworks: ArtworkTable,
    pub scheduler: Scheduler,
    pub subs: Subscriptions,
    pub detail: DetailState,
    pub widgets: WidgetState,
}

impl App {
    /// Bare engine over an existing document; no loading or wiring.
    pub fn new(config: EngineConfig, doc: Document, container: NodeId, initial_url: &str) -> Self {
        App {
            config,
            doc,
            container,
            history: History::new(initial_url),
            viewport: Viewport::default(),
            artworks: ArtworkTable::with_defaults(),
            scheduler: Scheduler::default(),
            subs: Subscriptions::default(),
            detail: DetailState::default(),
            widgets: WidgetState::default(),
        }
    }

    /// Full startup: load fragments, index the gallery, wire widgets and
    /// link delegation, route once, and schedule the first layout pass.
    ///
    /// The after-load steps run only once every fragment attempt has
    /// settled. On non-landing URLs nothing is loaded.
    pub fn boot(
        config: EngineConfig,
        doc: Document,
        container: NodeId,
        initial_url: &str,
        source: &dyn FragmentSource,
    ) -> (Self, LoadReport) {
        let mut app = App::new(config, doc, container, initial_url);
        // Hash links and the logo are normalized from every document, not
        // just the landing page.
        app.subs.link_delegation = true;
        if !app.history.location().is_home() {
            debug!(url = initial_url, "non-landing document, engine idle");
            return (app, LoadReport::default());
        }

        let names = app.config.sections.names.clone();
        let report = load_sections(&mut app.doc, app.container, source, &names);
        debug!(
            loaded = report.loaded(),
            skipped = report.skipped(),
            "sections settled"
        );

        gallery::init_gallery(&mut app);
        widgets::init_sliders(&mut app);
        widgets::init_lightbox(&mut app);
        router::route(&mut app);
        app.scheduler.request_layout();
        (app, report)
    }

    /// Feed one event into the engine. Handlers are idempotent; repeated
    /// or overlapping events are safe.
    pub fn dispatch(&mut self, event: Event) {
        match event {
            Event::HashChange | Event::PopState => router::route(self),
            Event::Resize | Event::OrientationChange => {
                if self.subs.window_layout {
                    self.scheduler.request_layout();
                }
                widgets::refresh_all_fades(self);
            }
            Event::ImageLoaded(img) => {
                // One-shot per image: the trigger is consumed on fire.
                if self.subs.take_image_trigger(img) {
                    layout::layout_gallery(self);
                }
            }
            Event::Click(node) => self.handle_click(node),
            Event::PointerDown { node, x } => widgets::pointer_down(self, node, x),
            Event::PointerMove { x } => widgets::pointer_move(self, x),
            Event::PointerUp => widgets::pointer_up(self),
            Event::KeyDown(key) => widgets::handle_key(self, &key),
        }
    }

    /// Present one frame: run the deferred layout recompute if one is
    /// pending. Any number of requests since the last frame collapse into
    /// a single pass.
    pub fn run_frame(&mut self) {
        if self.scheduler.take_layout_request() {
            layout::layout_gallery(self);
        }
    }

    /// History back, surfacing the pop-state event like a browser would.
    pub fn go_back(&mut self) {
        if self.history.back() {
            self.dispatch(Event::PopState);
        }
    }

    /// History forward, surfacing the pop-state event.
    pub fn go_forward(&mut self) {
        if self.history.forward() {
            self.dispatch(Event::PopState);
        }
    }

    fn handle_click(&mut self, node: NodeId) {
        // Widgets first: lightbox close/advance and slider buttons consume
        // their clicks outright.
        if widgets::handle_click(self, node) {
            return;
        }
        let Some(anchor) = self.doc.closest_tag(node, "a") else {
            return;
        };

        // Gallery card: history entry + detail panel, valid ids only.
        if let Some(id) = self.subs.card_id(anchor) {
            if self.artworks.contains(id) {
                detail::push_detail_entry(self, id);
                detail::show(self, id);
            }
            return;
        }

        let anchor_id = self.doc.get(anchor).id().map(str::to_string);
        match anchor_id.as_deref() {
            Some("inline-prev") => return detail::nav_prev(self),
            Some("inline-next") => return detail::nav_next(self),
            Some("inline-back") => return detail::nav_back(self),
            _ => {}
        }

        if self.doc.get(anchor).has_class("logo") {
            return router::handle_logo_click(self);
        }

        if self.subs.link_delegation {
            let href = self
                .doc
                .get(anchor)
                .attr("href")
                .unwrap_or("")
                .to_string();
            router::handle_link_click(self, &href);
        }
    }

    // ------------------------------------------------------------------
    // Lookups shared by controllers
    // ------------------------------------------------------------------

    /// The gallery grid inside the illustration section.
    pub fn gallery_node(&self) -> Option<NodeId> {
        let section = self.doc.by_id(&self.config.sections.illustration)?;
        self.doc.find_class(section, "gallery")
    }

    /// The card anchor for an artwork id.
    pub fn gallery_card(&self, id: u32) -> Option<NodeId> {
        gallery::card_for_id(&self.doc, self.gallery_node()?, id)
    }

    /// The image inside an artwork's card.
    pub fn gallery_image(&self, id: u32) -> Option<NodeId> {
        self.doc.find_tag(self.gallery_card(id)?, "img")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{app_with_gallery, panel_title, set_image_height};

    #[test]
    fn card_click_pushes_history_and_opens_panel() {
        let mut app = app_with_gallery(&[(1, "Tropical Summer"), (3, "Puppy")]);
        gallery::init_gallery(&mut app);

        let card = app.gallery_card(3).unwrap();
        app.dispatch(Event::Click(card));

        assert_eq!(app.history.url(), "/#illustration?id=3");
        assert_eq!(app.history.len(), 2);
        assert_eq!(panel_title(&app).as_deref(), Some("Puppy"));
    }

    #[test]
    fn click_on_card_image_bubbles_to_the_anchor() {
        let mut app = app_with_gallery(&[(3, "Puppy")]);
        gallery::init_gallery(&mut app);

        let img = app.gallery_image(3).unwrap();
        app.dispatch(Event::Click(img));

        assert_eq!(panel_title(&app).as_deref(), Some("Puppy"));
    }

    #[test]
    fn resize_schedules_layout_only_after_gallery_init() {
        let mut app = app_with_gallery(&[(1, "Tropical Summer")]);
        app.dispatch(Event::Resize);
        assert!(!app.scheduler.layout_pending());

        gallery::init_gallery(&mut app);
        app.dispatch(Event::Resize);
        assert!(app.scheduler.layout_pending());
    }

    #[test]
    fn run_frame_consumes_one_pending_layout() {
        let mut app = app_with_gallery(&[(1, "Tropical Summer")]);
        gallery::init_gallery(&mut app);
        set_image_height(&mut app, 1, 80.0);

        app.dispatch(Event::Resize);
        app.dispatch(Event::Resize);
        app.run_frame();

        assert!(!app.scheduler.layout_pending());
        assert_eq!(
            crate::test_helpers::card_span(&app, 1),
            Some("10".to_string())
        );
    }

    #[test]
    fn image_load_lays_out_once_per_image() {
        let mut app = app_with_gallery(&[(1, "Tropical Summer")]);
        gallery::init_gallery(&mut app);
        let img = app.gallery_image(1).unwrap();

        set_image_height(&mut app, 1, 80.0);
        app.dispatch(Event::ImageLoaded(img));
        assert_eq!(
            crate::test_helpers::card_span(&app, 1),
            Some("10".to_string())
        );

        // A second load event for the same image is ignored.
        set_image_height(&mut app, 1, 160.0);
        app.dispatch(Event::ImageLoaded(img));
        assert_eq!(
            crate::test_helpers::card_span(&app, 1),
            Some("10".to_string())
        );
    }

    #[test]
    fn go_back_routes_from_the_restored_url() {
        let mut app = app_with_gallery(&[(3, "Puppy")]);
        gallery::init_gallery(&mut app);
        app.subs.link_delegation = true;
        crate::router::route(&mut app);

        let card = app.gallery_card(3).unwrap();
        app.dispatch(Event::Click(card));
        assert_eq!(panel_title(&app).as_deref(), Some("Puppy"));

        app.go_back();
        assert_eq!(app.history.url(), "/");
        let home = app.doc.by_id("home");
        // The gallery fixture has no home section; the router tolerates it.
        assert!(home.is_none());
    }
}
