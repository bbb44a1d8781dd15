//! Brik semantic checker
//!
//! Reads a program, runs lexing, parsing and semantic analysis, and prints
//! the symbol table of every scope as it closes. On the first error a single
//! diagnostic goes to stderr. The exit code is 0 either way; only the
//! diagnostic tells success from failure.

mod frontend;
mod types;
mod utils;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;

use frontend::dump::TextDump;
use frontend::lexer::Lexer;
use frontend::parser::Parser as BrikParser;
use frontend::semantic::SemanticAnalyzer;
use utils::Error;

/// Brik semantic checker
#[derive(Parser, Debug)]
#[command(name = "brikc")]
#[command(version = "0.1.0")]
#[command(about = "Semantic checker for the Brik teaching language")]
struct Cli {
    /// Input source file; reads standard input when absent
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Render the diagnostic as a JSON object
    #[arg(long)]
    json: bool,
}

/// Structured form of one diagnostic, for `--json`
#[derive(Serialize, Debug)]
struct Diagnostic {
    kind: &'static str,
    line: Option<usize>,
    message: String,
}

impl From<&Error> for Diagnostic {
    fn from(error: &Error) -> Self {
        Self {
            kind: error.kind(),
            line: error.span().map(|s| s.line),
            message: error.to_string(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let source = read_source(&cli)?;

    if let Err(error) = check(&source) {
        report(&error, cli.json);
    }

    // Always exit 0; diagnostics carry the verdict.
    Ok(())
}

fn read_source(cli: &Cli) -> anyhow::Result<String> {
    match &cli.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("failed to read standard input")?;
            Ok(source)
        }
    }
}

/// Run the full pipeline; scope dumps go to stdout as analysis progresses
fn check(source: &str) -> Result<(), Error> {
    let tokens = Lexer::new(source).tokenize();
    let program = BrikParser::new(tokens).parse_program()?;

    let stdout = std::io::stdout();
    let mut dump = TextDump::new(stdout.lock());
    SemanticAnalyzer::new(&mut dump).analyze(&program)
}

fn report(error: &Error, json: bool) {
    if json {
        let diagnostic = Diagnostic::from(error);
        match serde_json::to_string(&diagnostic) {
            Ok(rendered) => eprintln!("{}", rendered),
            Err(_) => eprintln!("{}", error),
        }
    } else {
        eprintln!("{}", error);
    }
}
