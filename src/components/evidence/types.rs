/// A fully populated literature record, ready to display.
#[derive(Clone, Debug, PartialEq)]
pub struct EvidenceSource {
	pub id: String,
	pub title: String,
	pub authors: String,
	pub journal: String,
	pub year: i32,
	pub citation_count: u32,
	/// 0..1
	pub quality_score: f64,
	pub evidence_type: String,
	pub key_findings: String,
	/// 0..1
	pub relevance_score: f64,
	pub tags: Vec<String>,
	pub url: String,
}

/// A decoded corpus record before the seeded fill. `None` means the source
/// line did not carry the field (after alias resolution and coercion).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PartialEvidence {
	pub id: String,
	pub title: Option<String>,
	pub authors: Option<String>,
	pub journal: Option<String>,
	pub year: Option<i32>,
	pub citation_count: Option<u32>,
	pub quality_score: Option<f64>,
	/// Already normalized to a slug when present.
	pub evidence_type: Option<String>,
	pub key_findings: Option<String>,
	pub relevance_score: Option<f64>,
	pub tags: Vec<String>,
	pub url: Option<String>,
}
