use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use stool::config::Config;
use stool::file::detect::InputFormat;
use stool::file::loader::load_input;
use stool::file::saver::write_output;
use stool::query::Query;
use stool::render::template::OutputTemplate;
use stool::render::{render, RenderStyle};

const SEARCH_HELP: &str = "\
The search path consists mainly of dot-delimited path elements:
    locale.en.errors.0.text

Brackets can be used if the element might have conflicting syntax:
    keys[\"key with spaces and dot.\"].value

The special value [*] resolves to all the values of a sequence or mapping:
    contacts[*].name

Simple tests consist of a path, a comparison and a value:
    contacts[zip_code == \"90210\"].name
    contacts[phones.length() > 2].name

Functions: len(), length(), json(), js(), jsonpretty(), jspretty(),
jpretty(), jsoneval(), jeval(), yaml(), yml(), yamleval(), yeval(),
keys(), flatten(), flat(), results()

A template given with --template or --template-file is rendered once per
result. The result is `result`; the keys of a mapping result are variables
too. The yaml, json and jsonpretty filters serialize a value:
    stool -s 'clients[*]' -t 'The secret is {{ client_secret | json }}'";

/// stool - query and reformat structured files
#[derive(Parser)]
#[command(name = "stool")]
#[command(version)]
#[command(about = "A tool for querying and reformatting structured files", long_about = None)]
#[command(after_help = SEARCH_HELP)]
struct Cli {
    /// The structured file to read, or - for stdin
    input: Option<String>,

    /// The file to write, or - for stdout
    output: Option<String>,

    /// The structured file to read (overrides the first positional argument)
    #[arg(short = 'i', long = "in")]
    in_file: Option<String>,

    /// The file to write (overrides the second positional argument)
    #[arg(short = 'o', long = "out")]
    out_file: Option<String>,

    /// The search path applied to the input before rendering
    #[arg(short, long, default_value = ".")]
    search: String,

    /// Input format: json or yaml; anything else auto-detects
    #[arg(short, long)]
    format: Option<String>,

    /// How to render each result
    #[arg(short, long, value_enum)]
    render: Option<RenderStyle>,

    /// Template rendered once per result (overrides --render)
    #[arg(short, long, conflicts_with = "template_file")]
    template: Option<String>,

    /// Read the template from this file
    #[arg(short = 'T', long)]
    template_file: Option<PathBuf>,

    /// Read settings from this file instead of ~/.config/stool/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log more (repeat for even more)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn input(&self) -> &str {
        self.in_file
            .as_deref()
            .or(self.input.as_deref())
            .unwrap_or("-")
    }

    fn output(&self) -> &str {
        self.out_file
            .as_deref()
            .or(self.output.as_deref())
            .unwrap_or("-")
    }

    /// Parses the template given on the command line or in a file, if any.
    fn output_template(&self, indent_size: usize) -> Result<Option<OutputTemplate>> {
        match (&self.template, &self.template_file) {
            (_, Some(path)) => OutputTemplate::from_file(path, indent_size).map(Some),
            (Some(text), None) => OutputTemplate::new(text.as_str(), indent_size).map(Some),
            (None, None) => Ok(None),
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` wins over `-v`.
fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    // CLI format overrides config format
    let format = match &cli.format {
        Some(name) => InputFormat::from_name(name),
        None => config.input_format(),
    };
    let style = cli.render.unwrap_or(config.render);
    let template = cli.output_template(config.indent_size)?;

    let query = Query::parse(&cli.search)
        .with_context(|| format!("invalid search path {:?}", cli.search))?;
    tracing::debug!(path = query.path(), chunks = query.chunks().len(), "parsed search path");

    let document = load_input(cli.input(), format)?;

    let results = query
        .evaluate(&document)
        .with_context(|| format!("could not evaluate {:?}", query.path()))?;
    tracing::info!(results = results.len(), "search complete");

    let rendered = match &template {
        Some(template) => template.render(&results)?,
        None => render(&results, style, config.indent_size)?,
    };
    write_output(cli.output(), rendered.as_bytes())
}
