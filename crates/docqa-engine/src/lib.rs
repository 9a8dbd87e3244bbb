//! docqa-engine
//!
//! The document store plus the cross-document query surface: per-document
//! scoring, global aggregation and answer synthesis.

pub mod aggregate;
pub mod answer;
pub mod query;
pub mod store;

pub use answer::{DEFAULT_MAX_ANSWER_CHARS, NO_RELEVANT_PASSAGES};
pub use query::{answer, extract};
pub use store::{Document, DocumentStore, Snapshot};
