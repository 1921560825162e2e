//! Core domain types and fact building for slide-deck inconsistency
//! checking.

pub mod error;
pub mod facts;
pub mod types;

pub use error::{Error, Result};
pub use facts::build_facts;
pub use types::{Deck, DeckFormat, ExtractedSlide, Fact, Issue, IssueKind, Source};
