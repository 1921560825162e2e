//! Flattening extracted text into facts.
//!
//! One fact per non-blank line, tagged with the slide number or image
//! filename it came from. Lines are trimmed and NFC-normalized (OCR output
//! frequently arrives with decomposed combining characters).

use crate::types::{Deck, Fact, Source};
use std::collections::BTreeMap;
use unicode_normalization::UnicodeNormalization;

/// Build the fact list from slide text and OCR text.
///
/// Slide facts come first in slide order, then image facts in map order.
/// Blank lines are dropped; no deduplication across sources.
pub fn build_facts(deck: &Deck, ocr_texts: &BTreeMap<String, String>) -> Vec<Fact> {
    let mut facts = Vec::new();

    for slide in &deck.slides {
        push_lines(&mut facts, Source::Slide(slide.number), &slide.text());
    }

    for (image_name, text) in ocr_texts {
        push_lines(&mut facts, Source::Image(image_name.clone()), text);
    }

    facts
}

/// Split `text` on newlines and append one fact per non-blank trimmed line.
fn push_lines(facts: &mut Vec<Fact>, source: Source, text: &str) {
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        facts.push(Fact::new(source.clone(), line.nfc().collect::<String>()));
    }
}
