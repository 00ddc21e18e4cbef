//! Section fragment loading.
//!
//! The page is assembled at boot from named fragments, one per section,
//! fetched through a [`FragmentSource`]. Loading is all-settled: every name
//! in the list gets an attempt, failures are logged at warn level and
//! skipped, and one bad fragment never blocks the rest. The batch is done
//! only when every attempt has settled; only then does initialization
//! continue.
//!
//! Recovered sections are appended to the container in **declared list
//! order**, never completion order — gallery semantics (DOM-order
//! adjacency) depend on insertion order being deterministic.

use crate::dom::{Document, NodeId};
use crate::markup;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("fragment not found: {0}")]
    NotFound(String),
    #[error("IO error reading {name}: {source}")]
    Io {
        name: String,
        source: std::io::Error,
    },
}

/// Supplies raw markup for a named section fragment.
pub trait FragmentSource {
    fn fetch(&self, name: &str) -> Result<String, FetchError>;
}

/// Reads fragments from `<site>/sections/<name>.html`.
pub struct DirSource {
    sections_dir: PathBuf,
}

impl DirSource {
    pub fn new(site_dir: &Path) -> Self {
        DirSource {
            sections_dir: site_dir.join("sections"),
        }
    }
}

impl FragmentSource for DirSource {
    fn fetch(&self, name: &str) -> Result<String, FetchError> {
        let path = self.sections_dir.join(format!("{name}.html"));
        if !path.exists() {
            return Err(FetchError::NotFound(name.to_string()));
        }
        fs::read_to_string(&path).map_err(|source| FetchError::Io {
            name: name.to_string(),
            source,
        })
    }
}

/// In-memory fragment map. Test and embedding convenience.
#[derive(Default)]
pub struct MapSource {
    fragments: BTreeMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, html: &str) {
        self.fragments.insert(name.to_string(), html.to_string());
    }
}

impl FragmentSource for MapSource {
    fn fetch(&self, name: &str) -> Result<String, FetchError> {
        self.fragments
            .get(name)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(name.to_string()))
    }
}

/// Outcome of one fragment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentOutcome {
    /// Section extracted and appended.
    Loaded,
    /// Fetch failed; fragment skipped.
    SkippedFetch,
    /// Fetched, but no single top-level section root; skipped.
    SkippedNoRoot,
}

/// Per-name results of a load batch, in declared order.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub outcomes: Vec<(String, FragmentOutcome)>,
}

impl LoadReport {
    pub fn loaded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == FragmentOutcome::Loaded)
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.loaded()
    }
}

/// Fetch every named fragment and append each recovered section to
/// `container`, in list order.
///
/// Never fails as a whole: a fetch error or an unusable fragment is logged
/// and recorded in the report, and the remaining names still load. When
/// this returns, every attempt has settled — callers sequence the rest of
/// initialization after it.
pub fn load_sections(
    doc: &mut Document,
    container: NodeId,
    source: &dyn FragmentSource,
    names: &[String],
) -> LoadReport {
    let mut report = LoadReport::default();
    for name in names {
        let outcome = load_one(doc, container, source, name);
        report.outcomes.push((name.clone(), outcome));
    }
    report
}

fn load_one(
    doc: &mut Document,
    container: NodeId,
    source: &dyn FragmentSource,
    name: &str,
) -> FragmentOutcome {
    let html = match source.fetch(name) {
        Ok(html) => html,
        Err(err) => {
            warn!(fragment = name, error = %err, "skipping fragment: fetch failed");
            return FragmentOutcome::SkippedFetch;
        }
    };
    let nodes = markup::parse_fragment(&html);
    let Some(section) = markup::section_root(&nodes) else {
        warn!(fragment = name, "skipping fragment: no <section> root");
        return FragmentOutcome::SkippedNoRoot;
    };
    let section_id = markup::instantiate(doc, section);
    doc.append_child(container, section_id);
    FragmentOutcome::Loaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use std::fs;
    use tempfile::TempDir;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn section_ids(doc: &Document, container: NodeId) -> Vec<String> {
        doc.get(container)
            .children()
            .iter()
            .map(|&c| doc.get(c).attr("id").unwrap_or("").to_string())
            .collect()
    }

    #[test]
    fn loads_all_fragments_in_declared_order() {
        let mut source = MapSource::new();
        // Insertion into the source is alphabetical; the declared list is
        // not. Declared order must win.
        source.insert("about", r#"<section id="about"></section>"#);
        source.insert("home", r#"<section id="home"></section>"#);

        let mut doc = Document::new("main");
        let container = doc.root();
        let report = load_sections(&mut doc, container, &source, &names(&["home", "about"]));

        assert_eq!(report.loaded(), 2);
        assert_eq!(section_ids(&doc, container), vec!["home", "about"]);
    }

    #[test]
    fn missing_fragment_is_skipped_not_fatal() {
        let mut source = MapSource::new();
        source.insert("home", r#"<section id="home"></section>"#);

        let mut doc = Document::new("main");
        let container = doc.root();
        let report = load_sections(
            &mut doc,
            container,
            &source,
            &names(&["home", "missing", "home"]),
        );

        assert_eq!(report.loaded(), 2);
        assert_eq!(report.skipped(), 1);
        assert_eq!(
            report.outcomes[1],
            ("missing".to_string(), FragmentOutcome::SkippedFetch)
        );
    }

    #[test]
    fn fragment_without_section_root_is_skipped() {
        let mut source = MapSource::new();
        source.insert("bad", "<div>no section here</div>");
        source.insert("home", r#"<section id="home"></section>"#);

        let mut doc = Document::new("main");
        let container = doc.root();
        let report = load_sections(&mut doc, container, &source, &names(&["bad", "home"]));

        assert_eq!(report.loaded(), 1);
        assert_eq!(
            report.outcomes[0],
            ("bad".to_string(), FragmentOutcome::SkippedNoRoot)
        );
        assert_eq!(section_ids(&doc, container), vec!["home"]);
    }

    #[test]
    fn failure_in_the_middle_does_not_abort_the_batch() {
        let mut source = MapSource::new();
        source.insert("a", r#"<section id="a"></section>"#);
        source.insert("c", r#"<section id="c"></section>"#);

        let mut doc = Document::new("main");
        let container = doc.root();
        let report = load_sections(&mut doc, container, &source, &names(&["a", "b", "c"]));

        assert_eq!(report.loaded(), 2);
        assert_eq!(section_ids(&doc, container), vec!["a", "c"]);
    }

    #[test]
    fn dir_source_reads_sections_dir() {
        let tmp = TempDir::new().unwrap();
        let sections = tmp.path().join("sections");
        fs::create_dir_all(&sections).unwrap();
        fs::write(sections.join("home.html"), r#"<section id="home"></section>"#).unwrap();

        let source = DirSource::new(tmp.path());
        assert!(source.fetch("home").is_ok());
        assert!(matches!(
            source.fetch("nope"),
            Err(FetchError::NotFound(_))
        ));
    }
}
