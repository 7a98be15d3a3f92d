//! Command-line interface for confscan
//! Inspect what the scanners see in a configuration source.
//!
//! Usage:
//!   confscan tokenize `<text>`                      - Split a scalar into literal/placeholder segments
//!   confscan comments `<path>` [--spans `<json>`]   - List the comment blocks of a file
//!   confscan attach `<path>` --spans `<json>`       - Show the prefix/inline comments of each node
//!   confscan coerce `<tag>` `<text>`                - Convert a scalar with the default tag processors
//!
//! Global options: --format json|yaml, --config `<toml>`. Logging is controlled by
//! `CONFSCAN_LOG` (falling back to `RUST_LOG`), e.g. `CONFSCAN_LOG=confscan=debug`.

use clap::{Arg, ArgMatches, Command};
use confscan::coercion::{Tag, TagRegistry};
use confscan::comments::{read_comments_from_path_with, Association, CommentIndex, NodeSpan, NodeSpanIndex};
use confscan::config::{load_defaults, Loader, ScanConfig};
use serde::Serialize;
use std::fs;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    let matches = Command::new("confscan")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect comments and substitution placeholders in configuration sources")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format")
                .value_parser(["json", "yaml"])
                .default_value("json")
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the built-in defaults")
                .global(true),
        )
        .subcommand(
            Command::new("tokenize")
                .about("Split a scalar into literal and placeholder segments")
                .arg(Arg::new("text").help("Raw scalar text").required(true).index(1)),
        )
        .subcommand(
            Command::new("comments")
                .about("List the comment blocks of a file")
                .arg(Arg::new("path").help("Path to the source file").required(true).index(1))
                .arg(
                    Arg::new("spans")
                        .long("spans")
                        .help("JSON file with the terminal node spans of the source"),
                ),
        )
        .subcommand(
            Command::new("attach")
                .about("Show the prefix and inline comment of every node span")
                .arg(Arg::new("path").help("Path to the source file").required(true).index(1))
                .arg(
                    Arg::new("spans")
                        .long("spans")
                        .help("JSON file with the terminal node spans of the source")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("coerce")
                .about("Convert a scalar with the built-in tag processors")
                .arg(Arg::new("tag").help("Type tag, e.g. !!int").required(true).index(1))
                .arg(Arg::new("text").help("Raw scalar text").required(true).index(2)),
        )
        .get_matches();

    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("json")
        .to_string();
    let config = load_config(matches.get_one::<String>("config"));

    match matches.subcommand() {
        Some(("tokenize", sub)) => handle_tokenize_command(&config, sub, &format),
        Some(("comments", sub)) => handle_comments_command(&config, sub, &format),
        Some(("attach", sub)) => handle_attach_command(&config, sub, &format),
        Some(("coerce", sub)) => handle_coerce_command(&config, sub, &format),
        _ => unreachable!("a subcommand is required"),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CONFSCAN_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn load_config(path: Option<&String>) -> ScanConfig {
    let loaded = match path {
        Some(path) => Loader::new().with_file(path).build(),
        None => load_defaults(),
    };
    loaded.unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    })
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_else(|| {
            eprintln!("Missing argument: {}", name);
            std::process::exit(2);
        })
}

fn load_spans(path: Option<&String>) -> NodeSpanIndex {
    let Some(path) = path else {
        return NodeSpanIndex::default();
    };
    let source = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading spans file {}: {}", path, e);
        std::process::exit(1);
    });
    let spans: Vec<NodeSpan> = serde_json::from_str(&source).unwrap_or_else(|e| {
        eprintln!("Invalid spans file {}: {}", path, e);
        std::process::exit(1);
    });
    NodeSpanIndex::new(spans)
}

fn emit<T: Serialize>(value: &T, format: &str) {
    let rendered = match format {
        "yaml" => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        _ => serde_json::to_string_pretty(value)
            .map(|json| json + "\n")
            .map_err(|e| e.to_string()),
    };
    match rendered {
        Ok(text) => print!("{}", text),
        Err(e) => {
            eprintln!("Error formatting output: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle the tokenize command
fn handle_tokenize_command(config: &ScanConfig, matches: &ArgMatches, format: &str) {
    #[derive(Serialize)]
    struct Output {
        segments: confscan::SubstitutableValues,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        diagnostics: Vec<confscan::diagnostics::Diagnostic>,
    }

    let tokenizer = config.tokenizer().unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });
    let (segments, diagnostics) = tokenizer.tokenize_with_diagnostics(required(matches, "text"));
    emit(&Output { segments, diagnostics }, format);
}

/// Handle the comments command
fn handle_comments_command(config: &ScanConfig, matches: &ArgMatches, format: &str) {
    let spans = load_spans(matches.get_one::<String>("spans"));
    let comments = scan_file(config, required(matches, "path"), &spans);
    emit(&comments, format);
}

/// Handle the attach command
fn handle_attach_command(config: &ScanConfig, matches: &ArgMatches, format: &str) {
    #[derive(Serialize)]
    struct Attached<'a> {
        span: NodeSpan,
        comments: Vec<&'a str>,
        #[serde(flatten)]
        association: Association<'a>,
    }

    let spans = load_spans(matches.get_one::<String>("spans"));
    let index = CommentIndex::new(scan_file(config, required(matches, "path"), &spans));
    let attached: Vec<Attached<'_>> = spans
        .spans()
        .iter()
        .map(|span| {
            let association = index.associate(span);
            Attached {
                span: *span,
                comments: association.comment_lines(),
                association,
            }
        })
        .collect();
    emit(&attached, format);
}

/// Handle the coerce command
fn handle_coerce_command(config: &ScanConfig, matches: &ArgMatches, format: &str) {
    let tokenizer = config.tokenizer().unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });
    let registry = TagRegistry::with_tokenizer(tokenizer);
    let tag = Tag::new(required(matches, "tag"));
    let conversion = registry.convert(Some(&tag), required(matches, "text"));
    emit(&conversion, format);
}

fn scan_file(config: &ScanConfig, path: &str, spans: &NodeSpanIndex) -> Vec<confscan::Comment> {
    let syntax = config.comment_syntax().unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });
    read_comments_from_path_with(&syntax, path, spans).unwrap_or_else(|e| {
        eprintln!("Scan error: {}", e);
        std::process::exit(1);
    })
}
