//! CLI interface for the labeller.
//!
//! One invocation is one annotation session: images directory, label schema,
//! and record file in; one CSV row per annotated image out. Re-running with
//! the same record file resumes where the last session stopped.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::console::Console;
use crate::images::ImageSource;
use crate::operator;
use crate::schema;
use crate::session::Session;
use crate::storage::RecordStore;
use crate::viewer::Viewer;

/// Image labeller: answer a tree of questions about every image in a directory.
#[derive(Debug, Parser)]
#[command(name = "labeller", version, after_long_help = SCHEMA_HELP)]
pub struct Cli {
    /// Directory containing the images to annotate.
    pub images_dir: PathBuf,

    /// JSON document describing the label tree.
    pub schema: PathBuf,

    /// CSV file to write records to. Created if missing, resumed if present.
    pub records: PathBuf,

    /// Operator name recorded with every image.
    /// Falls back to `LABELLER_OPERATOR`, the config file, then a prompt.
    #[arg(long)]
    pub operator: Option<String>,

    /// Config file (default: `~/.labeller/config.toml`).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable coloured output.
    #[arg(long)]
    pub no_color: bool,

    /// Include images in subdirectories.
    #[arg(long)]
    pub recursive: bool,
}

const SCHEMA_HELP: &str = r#"Schema format:
  {"labels": [
    {"label_name": "vehicle", "type": "categorical",
     "choices": ["bike", {"choice_name": "car", "labels": [
       {"label_name": "doors", "type": "categorical", "choices": ["2", "4"]}]}]},
    {"label_name": "night", "type": "boolean"}
  ]}

  type: categorical (records the choice name), boolean (records 0 or 1,
  choices default to true/false), leaf (records nothing; the default).
  Labels are asked last-declared first; a choice's labels are asked right
  after it is selected. Answer -1 when a label can't be assessed."#;

/// Run the CLI, returning an error message on failure.
pub fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let schema = schema::load(&cli.schema).map_err(|e| e.to_string())?;
    schema::check_reserved(&schema, &config.reserved_columns()).map_err(|e| e.to_string())?;

    let images = ImageSource::open(&cli.images_dir, config.image_formats()?, config.recursive)
        .map_err(|e| e.to_string())?;
    let store = RecordStore::open(&cli.records)
        .map_err(|e| format!("failed to open {}: {e}", cli.records.display()))?;
    let viewer = Viewer::new(config.viewer.clone());
    if !viewer.is_enabled() {
        tracing::info!("no viewer configured, images will not be displayed");
    }

    let mut console = Console::stdio(config.color);
    let mut session = Session::new(&schema, &config, images, store, viewer);

    let remaining = session.prepare(&mut console).map_err(|e| e.to_string())?;
    if remaining.is_empty() {
        eprintln!("Nothing left to annotate.");
        return Ok(());
    }

    let operator =
        operator::resolve_or_ask(cli.operator.as_deref(), config.operator.as_deref(), &mut console)
            .map_err(|e| format!("failed to read operator name: {e}"))?;
    tracing::info!(%operator, "operator resolved");

    let summary = session
        .run(&mut console, &operator, &remaining)
        .map_err(|e| e.to_string())?;

    eprintln!(
        "Annotated {} of {} image(s), skipped {}. Records saved to {}",
        summary.annotated,
        summary.total,
        summary.skipped,
        cli.records.display()
    );
    Ok(())
}

/// Load the config file and apply command-line overrides.
fn load_config(cli: &Cli) -> Result<Config, String> {
    let mut config = Config::load(cli.config.as_deref())?;
    if cli.no_color || !io::stdout().is_terminal() {
        config.color = false;
    }
    if cli.recursive {
        config.recursive = true;
    }
    Ok(config)
}
