//! Append-only JSONL journal of advisories shown, with graceful degradation.

pub mod jsonl;
