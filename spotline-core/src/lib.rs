// Spotline Core Library
//
// Order normalization & consolidation engine: turns noisy, per-week
// extracted insertion-order tables into the minimal, audit-exact set of
// broadcast schedule lines for traffic-system submission.

pub mod config;
pub mod consolidate;
pub mod error;
pub mod language;
pub mod normalizer;
pub mod parser;
pub mod processor;
pub mod rates;
pub mod types;

// Re-export main types and functions for easy use
pub use config::{ProfileManager, SourceKind, SourceProfile};
pub use error::{OrderError, RowError};
pub use language::SouthAsianChoice;
pub use processor::{ExtractedOrder, OrderProcessor};
pub use types::*;
