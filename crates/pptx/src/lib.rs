//! PPTX (Office Open XML) slide-text extraction.
//!
//! Parses .pptx files, which are ZIP archives of XML documents, into
//! per-slide concatenated shape text.

pub mod parser;

pub use parser::PptxParser;
