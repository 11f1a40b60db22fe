//! Schema conversion CLI
//!
//! Reads a JSON Schema document (JSON or YAML), converts it to a
//! modelldcatno information model, and writes the resulting Turtle graph
//! to stdout or a file.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use jsonschema2rdf::model::turtle;
use jsonschema2rdf::{
    parse, ConvertConfig, Schema, SequentialSkolemizer, Skolemizer, UuidSkolemizer,
};

#[derive(Parser)]
#[command(name = "schema-convert")]
#[command(about = "Convert a JSON Schema document to a modelldcatno graph")]
struct Cli {
    /// Path to the schema document (JSON or YAML)
    input: PathBuf,

    /// Base namespace URI for minted identifiers
    #[arg(short, long)]
    base_uri: Option<String>,

    /// Write the graph to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to a config file (defaults to jsonschema2rdf.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Mint sequential skolem identifiers for reproducible output
    #[arg(long)]
    deterministic: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ConvertConfig::load_from(cli.config.as_deref())?;

    let base_uri = cli
        .base_uri
        .or(config.conversion.base_uri)
        .context("no base URI given; pass --base-uri or set conversion.base_uri in the config")?;

    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let document = parse::parse_document(&text)
        .with_context(|| format!("failed to parse {}", cli.input.display()))?;
    anyhow::ensure!(
        document.is_object(),
        "{} does not contain a schema document",
        cli.input.display()
    );

    let skolemizer: Box<dyn Skolemizer> = if cli.deterministic || config.conversion.deterministic {
        Box::new(SequentialSkolemizer::new(&config.conversion.skolem_base))
    } else {
        Box::new(UuidSkolemizer::new(&config.conversion.skolem_base))
    };

    let mut schema = Schema::with_skolemizer(&base_uri, document, skolemizer)?;
    let parsed = parse::parse_schema(&mut schema);
    let graph = turtle::render_document(&parsed.model_elements, &parsed.orphan_elements);

    match cli.output {
        Some(output) => {
            fs::write(&output, &graph)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!(
                "Wrote {} model elements and {} orphan elements to {}",
                parsed.model_elements.len(),
                parsed.orphan_elements.len(),
                output.display()
            );
        }
        None => print!("{graph}"),
    }

    Ok(())
}
