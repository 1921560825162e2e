//! OCR engine abstraction and the Tesseract implementation.

use crate::OcrError;
use leptess::LepTess;
use std::path::Path;

/// Something that can read text out of an image file.
pub trait OcrEngine {
    /// Recognize the text in the image at `path`.
    fn read_text(&mut self, path: &Path) -> Result<String, OcrError>;
}

/// Local OCR via Tesseract (leptess bindings).
pub struct TesseractEngine {
    inner: LepTess,
}

impl TesseractEngine {
    /// Initialize Tesseract with the default data path and English language
    /// data.
    pub fn new() -> Result<Self, OcrError> {
        let inner = LepTess::new(None, "eng").map_err(|e| OcrError::Init(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl OcrEngine for TesseractEngine {
    fn read_text(&mut self, path: &Path) -> Result<String, OcrError> {
        self.inner
            .set_image(path)
            .map_err(|e| OcrError::ImageLoad(e.to_string()))?;
        self.inner
            .get_utf8_text()
            .map_err(|e| OcrError::Recognition(e.to_string()))
    }
}
