//! Artwork records and the identifier-keyed lookup table.
//!
//! Each gallery card resolves to an [`Artwork`]: title, image path,
//! description, optional date. Values merge from three sources in priority
//! order — inline description templates, markup attributes, and the static
//! defaults below — with one asymmetry: an image path is never overwritten
//! once populated, while title/description/date take any non-empty override
//! from a later indexing pass.
//!
//! Identifiers are strict `u32` keys. They are parsed once from the
//! `id=<integer>` token of a card's link target; 0 means "no identifier"
//! and never enters the table.

use serde::Serialize;
use std::collections::BTreeMap;

/// One gallery item. Built during indexing, read-only afterward.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Artwork {
    pub title: String,
    /// Absolute image path (leading slash).
    pub image: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Identifier-keyed artwork lookup, iterated in ascending id order.
#[derive(Debug, Clone, Default)]
pub struct ArtworkTable {
    entries: BTreeMap<u32, Artwork>,
}

impl ArtworkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table pre-populated with the built-in portfolio pieces.
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        for (id, title, image, description) in DEFAULT_ARTWORKS {
            table.entries.insert(
                *id,
                Artwork {
                    title: (*title).to_string(),
                    image: (*image).to_string(),
                    description: (*description).to_string(),
                    date: None,
                },
            );
        }
        table
    }

    pub fn get(&self, id: u32) -> Option<&Artwork> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge one indexing pass worth of markup-derived values for `id`.
    ///
    /// - `title`: non-empty wins over the stored title; an empty override
    ///   keeps the stored value, and a missing entry synthesizes
    ///   "Artwork #id".
    /// - `image`: only fills an empty slot — markup never replaces a
    ///   populated image reference.
    /// - `description` / `date`: overwritten only by non-empty values.
    ///
    /// Id 0 is the "no identifier" sentinel and is ignored.
    pub fn merge(&mut self, id: u32, incoming: MarkupFields) {
        if id == 0 {
            return;
        }
        let entry = self.entries.entry(id).or_default();

        if !incoming.title.is_empty() {
            entry.title = incoming.title;
        } else if entry.title.is_empty() {
            entry.title = format!("Artwork #{id}");
        }
        if entry.image.is_empty() {
            entry.image = to_abs(&incoming.image);
        }
        if !incoming.description.is_empty() {
            entry.description = incoming.description;
        }
        if let Some(date) = incoming.date.filter(|d| !d.is_empty()) {
            entry.date = Some(date);
        }
    }
}

/// Values extracted from one card's markup, pre-trimmed by the caller.
#[derive(Debug, Clone, Default)]
pub struct MarkupFields {
    pub title: String,
    pub image: String,
    pub description: String,
    pub date: Option<String>,
}

/// Normalize a path to absolute form: exactly one leading slash.
/// Empty input stays empty.
pub fn to_abs(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    format!("/{}", path.trim_start_matches('/'))
}

/// Resolve a field from sources in priority order: first non-empty wins.
pub fn resolve<'a>(sources: &[Option<&'a str>]) -> Option<&'a str> {
    sources
        .iter()
        .filter_map(|opt| opt.map(str::trim).filter(|s| !s.is_empty()))
        .next()
}

/// Built-in artworks. Markup attributes override title/description/date at
/// indexing time but never the image path.
const DEFAULT_ARTWORKS: &[(u32, &str, &str, &str)] = &[
    (
        1,
        "Tropical Summer",
        "/images/illust_images/tropicalsummer.jpg",
        "The buzz of a sweltering summer day.",
    ),
    (
        2,
        "Travel",
        "/images/illust_images/travel.jpg",
        "Warm scenery from the road.",
    ),
    (
        3,
        "Puppy",
        "/images/illust_images/puppy.jpg",
        "A cozy day with a puppy.",
    ),
    (
        4,
        "Magical Night",
        "/images/illust_images/magicalnight.jpg",
        "A night that felt like magic.",
    ),
    (
        5,
        "Adventure",
        "/images/illust_images/advanture2.jpg",
        "The moment an adventure begins.",
    ),
    (
        6,
        "Cake",
        "/images/illust_images/cake.jpg",
        "The memory of a sweet cake.",
    ),
];
