//! Top-level routed pages.

pub mod evidence_explorer;
pub mod not_found;
