use clap::{Parser, Subcommand};
use folio_engine::app::App;
use folio_engine::dom::Document;
use folio_engine::events::Event;
use folio_engine::fragments::{DirSource, LoadReport};
use folio_engine::history::StatePayload;
use folio_engine::{config, markup, output};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Navigation engine driver for a single-page portfolio")]
#[command(long_about = "\
Navigation engine driver for a single-page portfolio

Boots the engine against a site directory the way a browser session would,
then reports the visible state: which sections show, what the detail panel
holds, the history list, and the computed masonry spans.

Site structure:

  site/
  ├── folio.toml               # Engine config (optional)
  └── sections/                # One fragment per section
      ├── home.html            # <section id=\"home\">…</section>
      ├── about.html
      ├── illustration.html    # Gallery cards: <a href=\"?id=3\"><img …></a>
      └── ...

URL shapes:
  /#about                 section deep link
  /#illustration?id=3     artwork detail deep link
  /?id=3                  legacy detail link (canonicalized on first route)")]
#[command(version)]
struct Cli {
    /// Site directory containing folio.toml and sections/
    #[arg(long, default_value = "site", global = true)]
    site: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the site's fragments without simulating navigation
    Check,
    /// Boot at a URL, optionally follow more navigations, print the state
    Route {
        /// Initial URL, e.g. "/#illustration?id=3"
        url: String,
        /// Further navigations applied in order, e.g. --event "/#about"
        #[arg(long = "event")]
        events: Vec<String>,
    },
    /// Boot at a URL and print the resulting document as HTML
    Render {
        /// Initial URL
        url: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Check => {
            let (app, report) = boot(&cli.site, "/")?;
            output::print_load_report(&report);
            let sections = app.doc.query_tag(app.container, "section").len();
            println!("Document carries {sections} sections");
        }
        Command::Route { url, events } => {
            let (mut app, report) = boot(&cli.site, &url)?;
            output::print_load_report(&report);
            for target in events {
                app.history.push(&target, StatePayload::empty());
                app.dispatch(Event::HashChange);
                app.run_frame();
            }
            println!();
            output::print_route_report(&app);
        }
        Command::Render { url } => {
            let (app, _) = boot(&cli.site, &url)?;
            println!("{}", markup::serialize(&app.doc, app.doc.root()));
        }
    }

    Ok(())
}

/// Assemble a fresh document and boot the engine against the site dir.
fn boot(site: &Path, url: &str) -> Result<(App, LoadReport), Box<dyn std::error::Error>> {
    let engine_config = config::load_config(site)?;

    let mut doc = Document::new("body");
    let container = doc.create_element("main");
    doc.get_mut(container).set_attr("id", "main-container");
    let root = doc.root();
    doc.append_child(root, container);

    let source = DirSource::new(site);
    let (mut app, report) = App::boot(engine_config, doc, container, url, &source);
    app.run_frame();
    Ok((app, report))
}
