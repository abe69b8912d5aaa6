//! Removal-impact scanning: recursive traversal, per-entry outcomes, aggregation.

pub mod extensions;
pub mod result;
pub mod walker;

pub use result::ScanResult;
pub use walker::{EntryOutcome, ScanOptions, SkipReason, TreeScanner, scan};
