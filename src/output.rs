//! CLI output formatting.
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.
//!
//! The route report reads as a state inventory: which sections are
//! visible and how, what the detail panel holds, the history list with a
//! cursor marker, and the computed card spans.

use crate::app::App;
use crate::fragments::{FragmentOutcome, LoadReport};
use crate::gallery;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Per-fragment load outcomes, in declared order.
///
/// ```text
/// Sections
/// 001 home           loaded
/// 002 about          skipped (fetch failed)
/// Loaded 1 of 2 sections
/// ```
pub fn format_load_report(report: &LoadReport) -> Vec<String> {
    let mut lines = vec!["Sections".to_string()];
    for (pos, (name, outcome)) in report.outcomes.iter().enumerate() {
        let status = match outcome {
            FragmentOutcome::Loaded => "loaded",
            FragmentOutcome::SkippedFetch => "skipped (fetch failed)",
            FragmentOutcome::SkippedNoRoot => "skipped (no section root)",
        };
        lines.push(format!("{} {:<18} {}", format_index(pos + 1), name, status));
    }
    lines.push(format!(
        "Loaded {} of {} sections",
        report.loaded(),
        report.outcomes.len()
    ));
    lines
}

pub fn print_load_report(report: &LoadReport) {
    for line in format_load_report(report) {
        println!("{line}");
    }
}

/// The engine's visible state after routing.
pub fn format_route_report(app: &App) -> Vec<String> {
    let mut lines = vec![format!("URL: {}", app.history.url())];

    lines.push("Sections".to_string());
    for section in app.doc.query_tag(app.container, "section") {
        let id = app.doc.get(section).attr("id").unwrap_or("(anonymous)");
        let display = app.doc.get(section).style("display").unwrap_or("unset");
        lines.push(format!("    {id:<20} {display}"));
    }

    lines.push(format_detail_line(app));

    lines.push("History".to_string());
    for (pos, entry) in app.history.entries().iter().enumerate() {
        let marker = if pos == app.history.cursor() { ">" } else { " " };
        let state = serde_json::to_string(&entry.state).unwrap_or_default();
        lines.push(format!(
            "  {marker} {} {} {}",
            format_index(pos + 1),
            entry.url,
            state
        ));
    }

    if let Some(gallery) = app.gallery_node() {
        lines.push("Spans".to_string());
        for id in gallery::ids_in_dom_order(&app.doc, gallery) {
            let span = app
                .gallery_card(id)
                .and_then(|c| app.doc.get(c).style("--span").map(str::to_string))
                .unwrap_or_else(|| "-".to_string());
            lines.push(format!("    {} {span} rows", format_index(id as usize)));
        }
    }
    lines
}

fn format_detail_line(app: &App) -> String {
    let Some(panel) = app.doc.by_id("inline-detail") else {
        return "Detail panel: not built".to_string();
    };
    if app.doc.get(panel).has_class("hidden") {
        return "Detail panel: hidden".to_string();
    }
    let title = app
        .doc
        .by_id("inline-detail-title")
        .map(|t| app.doc.text_content(t))
        .unwrap_or_default();
    let nav = |id: Option<u32>| id.map_or("-".to_string(), |i| i.to_string());
    format!(
        "Detail panel: {title} (prev {} / next {})",
        nav(app.detail.prev),
        nav(app.detail.next)
    )
}

pub fn print_route_report(app: &App) {
    for line in format_route_report(app) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragments::{FragmentOutcome, LoadReport};
    use crate::test_helpers::app_with_gallery;

    fn report() -> LoadReport {
        LoadReport {
            outcomes: vec![
                ("home".to_string(), FragmentOutcome::Loaded),
                ("about".to_string(), FragmentOutcome::SkippedFetch),
                ("palette".to_string(), FragmentOutcome::SkippedNoRoot),
            ],
        }
    }

    #[test]
    fn load_report_lists_each_outcome() {
        let lines = format_load_report(&report());
        assert_eq!(lines[0], "Sections");
        assert!(lines[1].starts_with("001 home"));
        assert!(lines[1].ends_with("loaded"));
        assert!(lines[2].contains("skipped (fetch failed)"));
        assert!(lines[3].contains("skipped (no section root)"));
        assert_eq!(lines[4], "Loaded 1 of 3 sections");
    }

    #[test]
    fn route_report_shows_sections_and_history_cursor() {
        let mut app = app_with_gallery(&[(3, "Puppy")]);
        crate::gallery::init_gallery(&mut app);
        crate::router::route(&mut app);

        let lines = format_route_report(&app);
        assert_eq!(lines[0], "URL: /");
        assert!(lines.iter().any(|l| l.contains("illustration")));
        assert!(lines.iter().any(|l| l.trim_start().starts_with("> 001 /")));
    }

    #[test]
    fn route_report_names_the_open_artwork() {
        let mut app = app_with_gallery(&[(3, "Puppy"), (5, "Adventure")]);
        crate::gallery::init_gallery(&mut app);
        crate::detail::show(&mut app, 3);

        let lines = format_route_report(&app);
        assert!(
            lines
                .iter()
                .any(|l| l.contains("Detail panel: Puppy (prev - / next 5)"))
        );
    }
}
