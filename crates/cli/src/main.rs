//! CLI tool that checks a slide deck for factual inconsistencies.
//!
//! Extracts per-slide text from a .pptx, OCRs images in the deck's folder,
//! flattens everything into facts, and asks Gemini to flag numeric, textual,
//! and timeline contradictions across them.

use anyhow::{bail, Context, Result};
use clap::Parser;
use deckcheck_core::{build_facts, Deck, DeckFormat, Issue};
use deckcheck_detect::{Detection, Detector, GeminiClient, DEFAULT_MODEL};
use deckcheck_ocr::TesseractEngine;
use deckcheck_pptx::PptxParser;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Check a PowerPoint deck for factual inconsistencies across slides.
#[derive(Parser, Debug)]
#[command(name = "deckcheck")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input deck file (.pptx)
    deck: PathBuf,

    /// Output file for the issue list
    #[arg(short, long, default_value = "inconsistencies.json")]
    output: PathBuf,

    /// Gemini model identifier
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    // The credential is required up front, before any extraction work
    let api_key = match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.is_empty() => key,
        _ => bail!("Please set GEMINI_API_KEY as an environment variable."),
    };

    if !args.deck.exists() {
        eprintln!("Error: {} not found", args.deck.display());
        return Ok(());
    }

    println!("Extracting text from PPTX...");
    let deck = parse_deck(&args.deck)?;
    println!("Extracted {} slides.", deck.slides.len());

    println!("Searching for images in same folder...");
    let images = deckcheck_ocr::find_images(&args.deck)
        .with_context(|| format!("Failed to list folder of {}", args.deck.display()))?;
    println!("Found {} images for OCR.", images.len());

    let ocr_texts = if images.is_empty() {
        BTreeMap::new()
    } else {
        match TesseractEngine::new() {
            Ok(mut engine) => deckcheck_ocr::ocr_images(&mut engine, &images),
            Err(e) => {
                log::warn!("OCR engine unavailable, skipping images: {}", e);
                BTreeMap::new()
            }
        }
    };
    println!("OCR extracted text from {} images.", ocr_texts.len());

    let facts = build_facts(&deck, &ocr_texts);
    println!("Built {} facts.", facts.len());

    println!("Checking inconsistencies with Gemini...");
    let detector = Detector::new(GeminiClient::new(api_key, args.model));
    let issues = match detector.detect(&facts)? {
        Detection::Issues(issues) => issues,
        Detection::Inconclusive { raw } => {
            log::warn!(
                "Model output not valid JSON; treating as no findings. Raw output:\n{}",
                raw
            );
            Vec::new()
        }
    };

    // Save results
    let json = serde_json::to_string_pretty(&issues)?;
    std::fs::write(&args.output, json)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    // Pretty print
    println!("\n=== Inconsistencies Found ===");
    if issues.is_empty() {
        println!("No inconsistencies detected.");
    } else {
        for (idx, issue) in issues.iter().enumerate() {
            println!("{}", format_issue_line(idx + 1, issue));
        }
    }

    println!("\nFull results saved to {}", args.output.display());

    Ok(())
}

/// Open and parse the deck, sniffing the format from magic bytes with an
/// extension fallback.
fn parse_deck(path: &Path) -> Result<Deck> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = BufReader::new(file);

    let mut magic = [0u8; 4];
    reader
        .read_exact(&mut magic)
        .with_context(|| "Failed to read file header")?;

    DeckFormat::from_magic(&magic)
        .or_else(|| {
            path.extension()
                .and_then(|e| e.to_str())
                .and_then(DeckFormat::from_extension)
        })
        .ok_or_else(|| anyhow::anyhow!("Could not detect file format (expected .pptx)"))?;

    // Re-open for parsing; the header read consumed the reader
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    log::debug!("Parsing as PPTX");
    let deck = PptxParser::new()
        .parse(reader, filename)
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(deck)
}

/// One console report line: `1. [NUMERIC] Slides: 1, 2 → description`.
fn format_issue_line(idx: usize, issue: &Issue) -> String {
    let kind = issue
        .kind
        .map(|k| k.to_string().to_uppercase())
        .unwrap_or_else(|| "UNKNOWN".to_string());
    let slides = issue
        .slides
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}. [{}] Slides: {} → {}", idx, kind, slides, issue.description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckcheck_core::{IssueKind, Source};

    #[test]
    fn test_format_issue_line() {
        let issue = Issue {
            slides: vec![Source::Slide(1), Source::Slide(2)],
            kind: Some(IssueKind::Numeric),
            description: "Revenue figures differ for 2023".to_string(),
        };
        assert_eq!(
            format_issue_line(1, &issue),
            "1. [NUMERIC] Slides: 1, 2 → Revenue figures differ for 2023"
        );
    }

    #[test]
    fn test_format_issue_line_missing_kind_and_image_source() {
        let issue = Issue {
            slides: vec![Source::Slide(3), Source::Image("chart.png".into())],
            kind: None,
            description: "Chart disagrees with slide".to_string(),
        };
        assert_eq!(
            format_issue_line(2, &issue),
            "2. [UNKNOWN] Slides: 3, chart.png → Chart disagrees with slide"
        );
    }
}
