//! Sibling-image discovery and OCR text extraction.
//!
//! Images living next to the deck file are run through Tesseract; each image
//! that fails is logged and skipped, so one corrupt file never aborts the
//! run. The engine sits behind a trait so the fold can be tested with a stub.

pub mod engine;

pub use engine::{OcrEngine, TesseractEngine};

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Image extensions eligible for OCR, matched case-insensitively.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Errors from the OCR engine.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Tesseract failed to initialize (missing language data, bad datapath).
    #[error("OCR engine init failed: {0}")]
    Init(String),

    /// The image could not be loaded.
    #[error("Failed to load image: {0}")]
    ImageLoad(String),

    /// Recognition itself failed.
    #[error("Text recognition failed: {0}")]
    Recognition(String),
}

/// List image files in the same directory as the deck.
///
/// Non-recursive; order is whatever the directory listing yields.
pub fn find_images(deck_path: &Path) -> io::Result<Vec<PathBuf>> {
    // A bare filename has an empty parent; treat that as the current dir.
    let folder = match deck_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut images = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_file() && is_image_path(&path) {
            images.push(path);
        }
    }
    Ok(images)
}

/// Whether a path has one of the allowed image extensions.
fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_lowercase();
            IMAGE_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// Run OCR over each image, keyed by base filename.
///
/// An entry appears only when the recognized text is non-blank after
/// trimming. Any per-image failure is logged as a warning naming the path
/// and the image is skipped; remaining images still run.
pub fn ocr_images<E: OcrEngine>(engine: &mut E, paths: &[PathBuf]) -> BTreeMap<String, String> {
    let mut results = BTreeMap::new();

    for path in paths {
        match engine.read_text(path) {
            Ok(text) => {
                if !text.trim().is_empty() {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| path.display().to_string());
                    results.insert(name, text);
                }
            }
            Err(e) => {
                log::warn!("OCR failed for {}: {}", path.display(), e);
            }
        }
    }

    results
}
