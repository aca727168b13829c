//! Literature corpus: JSONL decoding and deterministic seeded fill for
//! records with missing fields.

mod corpus;
mod loader;
mod synth;
mod types;

pub use loader::{CORPUS_CANDIDATES, CorpusUnavailable, load_corpus, seed_evidence};
pub use types::{EvidenceSource, PartialEvidence};
