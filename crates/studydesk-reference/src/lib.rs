//! Studydesk Reference - read-only legal reference library
//!
//! Documents live in the shared `legislation` collection. The library lists,
//! searches and filters them and summarises the collection; it never writes.

pub mod document;
pub mod error;
pub mod library;

pub use document::{paragraphs, LegalDocument, LegalKind, LegalSection};
pub use error::{ReferenceError, Result};
pub use library::{LibraryStats, ReferenceLibrary, LEGISLATION_COLLECTION};
