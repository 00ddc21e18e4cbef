//! # Folio Engine
//!
//! The client-side navigation engine of a single-page illustration
//! portfolio, as a library. One document is loaded for the whole session;
//! the engine simulates multi-page navigation inside it: a hash/query
//! router keeps browser history in step with visible state, an indexer
//! turns gallery markup into an artwork table, a masonry pass sizes cards
//! from their rendered image heights, and an inline detail panel replaces
//! per-artwork pages.
//!
//! # Architecture: Boot, Dispatch, Frame
//!
//! A host embeds the engine through three calls:
//!
//! ```text
//! 1. App::boot      fragments → document    (assemble page, route once)
//! 2. App::dispatch  event → state change    (clicks, hashchange, resize…)
//! 3. App::run_frame pending work → layout   (≤ 1 recompute per frame)
//! ```
//!
//! There is no browser underneath — the rendering surface is an explicit
//! view model ([`dom::Document`]) the host keeps in sync with whatever
//! actually paints. That keeps every controller a plain function over
//! owned state, testable against a hand-built tree.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`app`] | Engine state, boot sequence, event dispatch |
//! | [`router`] | Hash/query navigation algorithm, legacy link migration |
//! | [`sections`] | One-visible-section display control |
//! | [`gallery`] | Card indexing: identifiers, metadata precedence, wiring |
//! | [`artworks`] | Artwork records and the id-keyed lookup table |
//! | [`detail`] | Inline detail panel lifecycle and prev/next navigation |
//! | [`layout`] | Masonry row spans from measured image heights |
//! | [`fragments`] | All-settled section loading from a fragment source |
//! | [`history`] | Location parsing and the push/replace/back entry list |
//! | [`events`] | Event types, subscriptions, frame scheduler |
//! | [`widgets`] | Horizontal slider and palette lightbox |
//! | [`dom`] | The arena-backed view model tree |
//! | [`markup`] | Tolerant HTML fragment parser and serializer |
//! | [`config`] | `folio.toml` loading and validation |
//! | [`output`] | CLI state reports |
//!
//! # Design Decisions
//!
//! ## Strict Numeric Identifiers
//!
//! Artwork identifiers are `u32` end to end. The `id=<integer>` token is
//! parsed once at the markup boundary; there is no string-keyed lookup
//! anywhere, so the table cannot drift into the string/number aliasing the
//! original grew over time.
//!
//! ## Derived Navigation State
//!
//! The router never stores where it is. Every run re-reads the location
//! (path, hash, legacy query) and acts on that tuple, which makes
//! `hashchange`, `popstate`, and initial load literally the same code
//! path. History state payloads are written for fidelity but never read.
//!
//! ## All-Settled Fragment Loading
//!
//! One broken section fragment costs exactly that section. The loader
//! attempts every name, logs failures at warn level, inserts survivors in
//! declared order, and only then lets initialization continue.
//!
//! ## Compile-Time Templates Through the Runtime Parser
//!
//! The engine's own markup (detail panel skeleton, card overlays, the
//! lightbox modal) is written as [Maud](https://maud.lambda.xyz/)
//! templates, rendered to strings at compile time, and instantiated
//! through the same fragment parser as fetched sections. One code path
//! builds all DOM, whatever its origin.
//!
//! ## Coalesced Layout
//!
//! Resize storms, image loads, and routing all just request a recompute;
//! the frame scheduler collapses any number of requests into at most one
//! masonry pass per frame. The pass itself only reads measurements and
//! writes derived style, so over-running it is harmless.

pub mod app;
pub mod artworks;
pub mod config;
pub mod detail;
pub mod dom;
pub mod events;
pub mod fragments;
pub mod gallery;
pub mod history;
pub mod layout;
pub mod markup;
pub mod output;
pub mod router;
pub mod sections;
pub mod widgets;

#[cfg(test)]
pub(crate) mod test_helpers;
