//! Domain types for extracted deck content and reported issues.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a fact came from: a deck slide or an image file next to the deck.
///
/// Serializes untagged so the fact payload carries a plain number for slides
/// and a plain string for image filenames, matching what the model is
/// prompted to echo back in an issue's `slides` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Source {
    /// 1-based slide number.
    Slide(usize),
    /// Base filename of an image in the deck's folder.
    Image(String),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Slide(n) => write!(f, "{}", n),
            Source::Image(name) => write!(f, "{}", name),
        }
    }
}

/// One line of extracted text tagged with its origin.
///
/// The source field serializes as `slide` — the wire shape the model prompt
/// describes (`"slide": 3` or `"slide": "chart.png"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    #[serde(rename = "slide")]
    pub source: Source,
    pub text: String,
}

impl Fact {
    /// Create a new fact.
    pub fn new(source: Source, text: impl Into<String>) -> Self {
        Self {
            source,
            text: text.into(),
        }
    }
}

/// Category of a reported inconsistency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    /// Different numbers for the same metric.
    Numeric,
    /// Claims that cannot both be true.
    Textual,
    /// Timeline or date mismatches.
    Timeline,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IssueKind::Numeric => "numeric",
            IssueKind::Textual => "textual",
            IssueKind::Timeline => "timeline",
        };
        f.write_str(s)
    }
}

/// One inconsistency reported by the model.
///
/// Every field is defaulted: the model occasionally omits one, and a missing
/// `type` is rendered as `UNKNOWN` rather than rejecting the whole reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Slide numbers and/or image names the contradiction spans.
    #[serde(default)]
    pub slides: Vec<Source>,

    /// Inconsistency category, if the model supplied a known one.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<IssueKind>,

    /// Short explanation of the contradiction.
    #[serde(default)]
    pub description: String,
}

/// A deck with its per-slide extracted text, in slide order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    /// Original filename (without path).
    pub filename: String,

    /// Slides in presentation order, numbered 1..N.
    pub slides: Vec<ExtractedSlide>,
}

impl Deck {
    /// Create an empty deck with the given filename.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            slides: Vec::new(),
        }
    }

    /// Add a slide to the deck.
    pub fn add_slide(&mut self, slide: ExtractedSlide) {
        self.slides.push(slide);
    }
}

/// A single extracted slide: the trimmed text of each shape that had any.
///
/// A slide with no textual shapes still gets an entry, so a deck with N
/// slides always yields N of these, keyed 1..N.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedSlide {
    /// 1-based slide number.
    pub number: usize,

    /// Non-blank shape texts in document order.
    pub shapes: Vec<String>,
}

impl ExtractedSlide {
    /// Create a new slide with the given number.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            shapes: Vec::new(),
        }
    }

    /// Add a shape's text if it is non-blank after trimming.
    pub fn add_shape_text(&mut self, text: &str) {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            self.shapes.push(trimmed.to_string());
        }
    }

    /// The slide's text: shape texts joined with newlines.
    pub fn text(&self) -> String {
        self.shapes.join("\n")
    }
}

/// The file format of the input deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckFormat {
    /// Office Open XML presentation (.pptx).
    Pptx,
}

impl DeckFormat {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pptx" => Some(Self::Pptx),
            _ => None,
        }
    }

    /// Detect format from file magic bytes.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        // PPTX is a ZIP file (PK\x03\x04)
        if bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
            return Some(Self::Pptx);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_serializes_untagged() {
        let slide = serde_json::to_string(&Source::Slide(3)).unwrap();
        assert_eq!(slide, "3");

        let image = serde_json::to_string(&Source::Image("chart.png".into())).unwrap();
        assert_eq!(image, "\"chart.png\"");
    }

    #[test]
    fn test_fact_wire_shape() {
        let fact = Fact::new(Source::Slide(2), "Revenue was $5M in 2023");
        let json = serde_json::to_string(&fact).unwrap();
        assert_eq!(json, r#"{"slide":2,"text":"Revenue was $5M in 2023"}"#);
    }

    #[test]
    fn test_issue_deserializes_mixed_sources() {
        let json = r#"{"slides":[1,"chart.png"],"type":"numeric","description":"differs"}"#;
        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(
            issue.slides,
            vec![Source::Slide(1), Source::Image("chart.png".into())]
        );
        assert_eq!(issue.kind, Some(IssueKind::Numeric));
        assert_eq!(issue.description, "differs");
    }

    #[test]
    fn test_issue_missing_type_is_none() {
        let json = r#"{"slides":[1,2],"description":"no category given"}"#;
        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.kind, None);
    }

    #[test]
    fn test_issue_unknown_type_is_schema_error() {
        let json = r#"{"slides":[1],"type":"vibes","description":"x"}"#;
        assert!(serde_json::from_str::<Issue>(json).is_err());
    }

    #[test]
    fn test_slide_skips_blank_shape_text() {
        let mut slide = ExtractedSlide::new(1);
        slide.add_shape_text("Title");
        slide.add_shape_text("  ");
        slide.add_shape_text("Body");
        assert_eq!(slide.text(), "Title\nBody");
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(DeckFormat::from_extension("pptx"), Some(DeckFormat::Pptx));
        assert_eq!(DeckFormat::from_extension("PPTX"), Some(DeckFormat::Pptx));
        assert_eq!(DeckFormat::from_extension("ppt"), None);
        assert_eq!(
            DeckFormat::from_magic(&[0x50, 0x4B, 0x03, 0x04]),
            Some(DeckFormat::Pptx)
        );
        assert_eq!(DeckFormat::from_magic(b"%PDF"), None);
    }
}
