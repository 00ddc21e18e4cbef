//! Browser location parsing and the session history list.
//!
//! Navigation state is derived, never stored: the router re-reads the
//! current URL on every event and the state payload attached to entries is
//! informational only. Three URL shapes matter:
//!
//! - `<path>#<section>` — plain section deep link
//! - `<path>#illustration?id=<n>` — detail deep link (id rides in the
//!   hash's query-like suffix)
//! - `<path>?id=<n>` — legacy detail link, accepted once and canonicalized
//!   to the hash form by the router via `replace`
//!
//! The history list mirrors the browser contract: `push` truncates any
//! forward entries before appending, `replace` swaps the current entry in
//! place, and `back`/`forward` only move the cursor — the caller turns the
//! move into a `PopState` event.

use serde::Serialize;

/// Parsed pieces of the current URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Path component, e.g. `/` or `/notebook/post.html`.
    pub path: String,
    /// Query string without the leading `?`; empty when absent.
    pub query: String,
    /// Hash fragment without the leading `#`; empty when absent.
    pub hash: String,
}

impl Location {
    /// Parse a URL into path, query, and hash. Accepts bare paths
    /// (`/index.html?id=5#about`) as well as full URLs.
    pub fn parse(url: &str) -> Self {
        let url = url
            .split_once("://")
            .and_then(|(_, rest)| rest.find('/').map(|i| &rest[i..]))
            .unwrap_or(url);
        let (before_hash, hash) = match url.split_once('#') {
            Some((b, h)) => (b, h),
            None => (url, ""),
        };
        let (path, query) = match before_hash.split_once('?') {
            Some((p, q)) => (p, q),
            None => (before_hash, ""),
        };
        let path = if path.is_empty() { "/" } else { path };
        Location {
            path: path.to_string(),
            query: query.to_string(),
            hash: hash.to_string(),
        }
    }

    /// Whether this is the landing page: `/` or `/index.html`.
    pub fn is_home(&self) -> bool {
        self.path == "/" || self.path == "/index.html"
    }

    /// Split the hash into its section name and query-like suffix:
    /// `illustration?id=5` → `("illustration", Some(5))`.
    pub fn hash_route(&self) -> (&str, Option<u32>) {
        match self.hash.split_once('?') {
            Some((name, query)) => (name, query_id(query)),
            None => (self.hash.as_str(), None),
        }
    }

    /// Identifier from the legacy `?id=<n>` query, if present and numeric.
    pub fn legacy_id(&self) -> Option<u32> {
        query_id(&self.query)
    }
}

/// Extract a positive integer `id` from a query string.
fn query_id(query: &str) -> Option<u32> {
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("id="))
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|&id| id > 0)
}

/// Payload attached to a history entry. The router never trusts it — truth
/// is re-derived from the URL — but it mirrors what the page would store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StatePayload {
    Empty {},
    Detail { page: &'static str, id: u32 },
}

impl StatePayload {
    pub fn detail(id: u32) -> Self {
        StatePayload::Detail { page: "detail", id }
    }

    pub fn empty() -> Self {
        StatePayload::Empty {}
    }
}

/// One session history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub url: String,
    pub state: StatePayload,
}

/// The session history: entry list plus cursor.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl History {
    pub fn new(initial_url: &str) -> Self {
        History {
            entries: vec![HistoryEntry {
                url: initial_url.to_string(),
                state: StatePayload::empty(),
            }],
            cursor: 0,
        }
    }

    /// Current URL.
    pub fn url(&self) -> &str {
        &self.entries[self.cursor].url
    }

    /// Parsed current location.
    pub fn location(&self) -> Location {
        Location::parse(self.url())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Append a new entry, dropping any forward entries first.
    pub fn push(&mut self, url: &str, state: StatePayload) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(HistoryEntry {
            url: url.to_string(),
            state,
        });
        self.cursor += 1;
    }

    /// Swap the current entry in place. Never grows the list.
    pub fn replace(&mut self, url: &str, state: StatePayload) {
        self.entries[self.cursor] = HistoryEntry {
            url: url.to_string(),
            state,
        };
    }

    /// Move back one entry. Returns whether the cursor moved; a move means
    /// the host should dispatch a pop-state event.
    pub fn back(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Move forward one entry. Returns whether the cursor moved.
    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Location parsing
    // =========================================================================

    #[test]
    fn parses_path_query_and_hash() {
        let loc = Location::parse("/index.html?id=5#about");
        assert_eq!(loc.path, "/index.html");
        assert_eq!(loc.query, "id=5");
        assert_eq!(loc.hash, "about");
    }

    #[test]
    fn parses_full_url() {
        let loc = Location::parse("https://example.com/index.html#illustration?id=3");
        assert_eq!(loc.path, "/index.html");
        assert_eq!(loc.hash, "illustration?id=3");
    }

    #[test]
    fn bare_path_has_empty_query_and_hash() {
        let loc = Location::parse("/");
        assert_eq!(loc.path, "/");
        assert!(loc.query.is_empty());
        assert!(loc.hash.is_empty());
    }

    #[test]
    fn is_home_for_root_and_index() {
        assert!(Location::parse("/").is_home());
        assert!(Location::parse("/index.html").is_home());
        assert!(!Location::parse("/notebook/post.html").is_home());
    }

    #[test]
    fn hash_route_splits_query_suffix() {
        let loc = Location::parse("/#illustration?id=5");
        assert_eq!(loc.hash_route(), ("illustration", Some(5)));

        let loc = Location::parse("/#about");
        assert_eq!(loc.hash_route(), ("about", None));

        let loc = Location::parse("/");
        assert_eq!(loc.hash_route(), ("", None));
    }

    #[test]
    fn hash_route_ignores_non_numeric_id() {
        let loc = Location::parse("/#illustration?id=abc");
        assert_eq!(loc.hash_route(), ("illustration", None));
    }

    #[test]
    fn hash_route_ignores_zero_id() {
        let loc = Location::parse("/#illustration?id=0");
        assert_eq!(loc.hash_route(), ("illustration", None));
    }

    #[test]
    fn legacy_id_from_search_query() {
        assert_eq!(Location::parse("/?id=5").legacy_id(), Some(5));
        assert_eq!(Location::parse("/?foo=1&id=7").legacy_id(), Some(7));
        assert_eq!(Location::parse("/").legacy_id(), None);
    }

    // =========================================================================
    // History list
    // =========================================================================

    #[test]
    fn push_appends_and_advances_cursor() {
        let mut h = History::new("/");
        h.push("/#about", StatePayload::empty());
        assert_eq!(h.len(), 2);
        assert_eq!(h.url(), "/#about");
    }

    #[test]
    fn replace_swaps_in_place() {
        let mut h = History::new("/?id=5");
        h.replace("/#illustration?id=5", StatePayload::detail(5));
        assert_eq!(h.len(), 1);
        assert_eq!(h.url(), "/#illustration?id=5");
    }

    #[test]
    fn push_after_back_drops_forward_entries() {
        let mut h = History::new("/");
        h.push("/#about", StatePayload::empty());
        h.push("/#illustration", StatePayload::empty());
        assert!(h.back());
        h.push("/#palette", StatePayload::empty());
        assert_eq!(h.len(), 3);
        assert_eq!(h.url(), "/#palette");
        assert!(!h.forward());
    }

    #[test]
    fn back_stops_at_first_entry() {
        let mut h = History::new("/");
        assert!(!h.back());
        h.push("/#about", StatePayload::empty());
        assert!(h.back());
        assert_eq!(h.url(), "/");
        assert!(!h.back());
    }

    #[test]
    fn state_payload_serializes_like_the_page_would() {
        let detail = serde_json::to_string(&StatePayload::detail(4)).unwrap();
        assert_eq!(detail, r#"{"page":"detail","id":4}"#);
        let empty = serde_json::to_string(&StatePayload::empty()).unwrap();
        assert_eq!(empty, "{}");
    }
}
