#![recursion_limit = "256"]

mod document;
mod finder;
mod fixture;
mod parser;
mod store;
mod validate;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::bail;
use chrono::{SecondsFormat, Utc};
use clap::{Parser, Subcommand};

use document::Document;

#[derive(Parser)]
#[command(name = "ustav_parser", about = "Extract \"AI Solved Business Problems\" into USTAV JSON")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse Chapter 1 of the book into the USTAV document
    Parse {
        /// Plain-text book to read
        #[arg(short, long, default_value = store::BOOK_PATH)]
        book: PathBuf,
        /// Where to write the JSON document
        #[arg(short, long, default_value = store::OUTPUT_PATH)]
        output: PathBuf,
    },
    /// Write the hand-finalized Chapter 1 document
    Fixture {
        #[arg(short, long, default_value = store::OUTPUT_PATH)]
        output: PathBuf,
    },
    /// List lines containing top-level section headings
    FindSections {
        /// Text file to scan (default: the PREFACE file)
        path: Option<PathBuf>,
    },
    /// Check the structure of a written USTAV document
    Validate {
        #[arg(default_value = store::OUTPUT_PATH)]
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { book, output } => {
            let doc = run_parse(&book, &output, &timestamp())?;
            println!("\n✓ Saved to {}", output.display());
            println!("  - {} chapter(s)", doc.chapters.len());
            println!("  - {} problem(s)", doc.metadata.total_problems);
            println!("  - {} prompt(s)", doc.metadata.total_prompts);
            let failure_modes: usize = doc.chapters.iter().map(|c| c.failure_mode_count()).sum();
            println!("  - {} failure mode(s)", failure_modes);
            Ok(())
        }
        Commands::Fixture { output } => {
            let s = fixture::write(&output)?;
            println!("✓ Successfully wrote Chapter 1 (Logistics & Supply Chain) to {}", output.display());
            println!("  Chapters:      {}", s.chapters);
            println!("  Problems:      {}", s.problems);
            println!("  Prompts:       {}", s.prompts);
            println!("  Failure Modes: {}", s.failure_modes);
            println!("  File size:     {:.2} KB", s.bytes as f64 / 1024.0);
            Ok(())
        }
        Commands::FindSections { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from(finder::PREFACE_PATH));
            let hits = finder::scan_file(&path)?;
            for hit in &hits {
                println!("{}", hit);
            }
            Ok(())
        }
        Commands::Validate { path } => {
            let report = validate::validate_file(&path)?;
            println!("{}", report);
            if !report.passed() {
                bail!("{} validation error(s) in {}", report.errors.len(), path.display());
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

/// Load, extract and save. Nothing is written unless extraction succeeds.
fn run_parse(book: &Path, output: &Path, extracted_at: &str) -> anyhow::Result<Document> {
    let text = store::load_book(book)?;
    let doc = match parser::parse_book(&text, extracted_at) {
        Ok(doc) => doc,
        Err(e) => {
            println!("✗ Parse failed: {}", e);
            return Err(e.into());
        }
    };
    store::save_document(output, &doc)?;
    Ok(doc)
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
