// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! speccheck: run the examples in a markdown document.

mod bindings;
mod output;

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use clap::Parser;
use speccheck_check::{CheckConfig, Engine, Report};
use speccheck_doc::Document;
use speccheck_interp::Interpreter;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use bindings::Binding;

#[derive(Parser, Debug)]
#[command(name = "speccheck")]
#[command(about = "Check the js examples in a markdown document and mark them passed or failed")]
#[command(version)]
struct Args {
    /// The document to check, and any `name=path` bindings to install
    /// before the first block runs
    #[arg(value_name = "DOCUMENT | NAME=PATH")]
    inputs: Vec<String>,

    /// Write the annotated document here and exit 0 whatever the results
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Also check blocks tagged with this language
    #[arg(long = "lang", value_name = "LANG")]
    langs: Vec<String>,

    /// Remove markers from an earlier run before checking
    #[arg(long)]
    strip: bool,

    /// Print the per-block results as JSON
    #[arg(long)]
    json: bool,

    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// The document path and bindings, split out of the positional arguments.
/// An argument with `=` is a binding; otherwise it names the document.
fn split_inputs(inputs: &[String]) -> Result<(PathBuf, Vec<Binding>)> {
    let mut document = None;
    let mut bindings = Vec::new();
    for input in inputs {
        if input.contains('=') {
            bindings.push(Binding::parse(input)?);
        } else {
            document = Some(PathBuf::from(input));
        }
    }
    match document {
        Some(path) => Ok((path, bindings)),
        None => bail!("missing document filename"),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("SPECCHECK_LOG").unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(args: &Args) -> Result<i32> {
    let (path, bindings) = split_inputs(&args.inputs)?;

    let source = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let mut doc = Document::parse(&source);

    let mut config = CheckConfig::default().with_strip_markers(args.strip);
    for lang in &args.langs {
        config = config.with_language(lang.as_str());
    }

    let mut engine = Engine::new(Interpreter::new());
    for binding in &bindings {
        let value = binding.load()?;
        engine.bind(&binding.name, value);
    }

    info!(path = %path.display(), "checking");
    let report = engine.check_document(&mut doc, &config);
    debug!(total = report.total, failed = report.failed, "done");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&path, &report);
    }

    if let Some(report_path) = &args.report {
        fs::write(report_path, doc.render()).with_context(|| format!("writing {}", report_path.display()))?;
        return Ok(0);
    }

    if !report.is_success() {
        for block in report.failures() {
            eprintln!("{}: {}", output::line_label(block.line), block.verdict.message().unwrap_or_default());
        }
        eprintln!("{}: Errors present in specification", output::error_label());
        return Ok(1);
    }
    Ok(0)
}

fn print_summary(path: &std::path::Path, report: &Report) {
    println!("{}", output::file_path(&path.display().to_string()));
    for block in &report.blocks {
        let status = if block.verdict.is_pass() { output::status_pass() } else { output::status_fail() };
        println!("  {} line {}", status, block.line);
    }
    println!(
        "{} blocks, {}, {}",
        report.total,
        output::passed_count(report.passed),
        output::failed_count(report.failed)
    );
}

fn main() {
    let args = Args::parse();
    output::init();
    init_logging(args.verbose);

    let outcome = speccheck_interp::with_eval_stack(move || run(&args))
        .context("starting the evaluation thread")
        .and_then(|result| result);
    match outcome {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{}: {:#}", output::error_label(), e);
            process::exit(1);
        }
    }
}
