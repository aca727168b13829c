//! Deterministic fill for missing evidence fields.
//!
//! Each record's id seeds an xmur3 hash feeding a mulberry32 PRNG, so the
//! same id always yields the same synthetic values across reloads.

use super::corpus::derive_quality;
use super::types::{EvidenceSource, PartialEvidence};

pub const JOURNALS: &[&str] = &[
	"Annals of the Rheumatic Diseases",
	"Arthritis & Rheumatology",
	"Lupus Science & Medicine",
	"The Lancet Rheumatology",
	"Nature Medicine",
	"NEJM",
	"BMJ",
	"JAMA",
];
pub const STUDY_TYPES: &[&str] = &[
	"systematic-review",
	"clinical-trial",
	"cohort-study",
	"methodology",
];
pub const BIOMARKERS: &[&str] = &[
	"Anti-dsDNA",
	"Anti-Sm",
	"Anti-Ro/SSA",
	"Anti-La/SSB",
	"Complement C3",
	"Complement C4",
	"Interferon Signature",
	"ANA",
	"Anti-RNP",
	"Urinary NGAL",
];
pub const PATHWAYS: &[&str] = &[
	"Complement System",
	"Type I IFN",
	"B-cell Activation",
	"TLR7/9",
	"NETosis",
];
pub const SYMPTOMS: &[&str] = &[
	"Malar Rash",
	"Arthritis",
	"Nephritis",
	"Photosensitivity",
	"Oral Ulcers",
	"Cytopenia",
];
const LAST_NAMES: &[&str] = &[
	"Chen", "Patel", "Garcia", "Johnson", "Lee", "Kumar", "Martinez", "Wang", "Brown", "Davis",
	"Lopez", "Nguyen", "Singh", "Zhang", "Hernandez", "Kim", "Jackson", "Lewis", "Rodriguez",
	"Clark",
];

fn xmur3(seed: &str) -> u32 {
	let mut h: u32 = 1779033703 ^ seed.len() as u32;
	for byte in seed.bytes() {
		h = (h ^ byte as u32).wrapping_mul(3432918353);
		h = h.rotate_left(13);
	}
	h = (h ^ (h >> 16)).wrapping_mul(2246822507);
	h = (h ^ (h >> 13)).wrapping_mul(3266489909);
	h ^ (h >> 16)
}

/// mulberry32: a tiny 32-bit PRNG with uniform output in [0, 1).
pub struct Mulberry32 {
	state: u32,
}

impl Mulberry32 {
	pub fn from_seed_str(seed: &str) -> Self {
		Self { state: xmur3(seed) }
	}

	pub fn next_f64(&mut self) -> f64 {
		self.state = self.state.wrapping_add(0x6d2b_79f5);
		let mut t = self.state;
		t = (t ^ (t >> 15)).wrapping_mul(t | 1);
		t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
		(t ^ (t >> 14)) as f64 / 4294967296.0
	}

	/// Uniform integer in the inclusive range.
	fn int_in(&mut self, min: i64, max: i64) -> i64 {
		(self.next_f64() * (max - min + 1) as f64) as i64 + min
	}

	fn sample<'a>(&mut self, pool: &[&'a str]) -> &'a str {
		pool[(self.next_f64() * pool.len() as f64) as usize]
	}

	/// Standard normal via Box-Muller.
	fn normal(&mut self) -> f64 {
		let mut u = 0.0;
		let mut v = 0.0;
		while u == 0.0 {
			u = self.next_f64();
		}
		while v == 0.0 {
			v = self.next_f64();
		}
		(-2.0 * u.ln()).sqrt() * (2.0 * std::f64::consts::PI * v).cos()
	}
}

fn make_authors(rng: &mut Mulberry32) -> String {
	let count = rng.int_in(2, 6) as usize;
	let mut pool: Vec<&str> = LAST_NAMES.to_vec();
	// Fisher-Yates, driven by the seeded stream.
	for i in (1..pool.len()).rev() {
		let j = rng.int_in(0, i as i64) as usize;
		pool.swap(i, j);
	}
	pool.truncate(count);
	pool.iter()
		.map(|name| {
			let initial = (b'A' + rng.int_in(0, 25) as u8) as char;
			format!("{name}, {initial}.")
		})
		.collect::<Vec<_>>()
		.join(", ")
}

/// Log-normal citation counts, clamped to [0, 1500].
fn make_citations(rng: &mut Mulberry32) -> u32 {
	let x = (3.5 + 0.7 * rng.normal()).exp();
	x.round().clamp(0.0, 1500.0) as u32
}

/// Rounds to two decimals and renders without trailing zeros, so 0.8 stays
/// "0.8" and 2.0 stays "2".
fn format_metric(value: f64) -> String {
	let rounded = (value * 100.0).round() / 100.0;
	let mut text = format!("{rounded:.2}");
	while text.ends_with('0') {
		text.pop();
	}
	if text.ends_with('.') {
		text.pop();
	}
	text
}

fn make_findings(
	rng: &mut Mulberry32,
	biomarker: Option<String>,
	symptom: Option<String>,
	evidence_type: &str,
) -> String {
	let metric = rng.sample(&[
		"AUC",
		"sensitivity",
		"specificity",
		"hazard ratio",
		"odds ratio",
	]);
	let value = match metric {
		"AUC" => format_metric(0.78 + rng.next_f64() * 0.19),
		"sensitivity" | "specificity" => format!("{}%", rng.int_in(75, 98)),
		_ => format_metric(1.3 + rng.next_f64() * 2.9),
	};
	let biomarker = biomarker.unwrap_or_else(|| rng.sample(BIOMARKERS).to_string());
	let symptom = symptom.unwrap_or_else(|| rng.sample(SYMPTOMS).to_string());
	format!(
		"{biomarker} associated with {} showing {metric} of {value} in {}.",
		symptom.to_lowercase(),
		evidence_type.replace('-', " ")
	)
}

fn evidence_url(id: &str) -> String {
	// Percent-encode just enough for ids carrying DOI-style slashes.
	let encoded: String = id
		.chars()
		.map(|c| match c {
			'/' => "%2F".to_string(),
			' ' => "%20".to_string(),
			c => c.to_string(),
		})
		.collect();
	format!("https://example.org/evidence/{encoded}")
}

/// First tag naming a pool entry, returned as written in the tag list.
fn tag_match(tags: &[String], pool: &[&str]) -> Option<String> {
	tags.iter()
		.find(|tag| pool.iter().any(|candidate| candidate.to_lowercase() == **tag))
		.cloned()
}

/// Completes a partial record deterministically. Fields present in the
/// source are never overwritten.
pub fn fill_missing(partial: PartialEvidence, index: usize, now_year: i32) -> EvidenceSource {
	let id = if partial.id.is_empty() {
		format!("doc_{index}")
	} else {
		partial.id
	};
	let mut rng = Mulberry32::from_seed_str(&format!("{id}::seed"));

	let title = partial
		.title
		.unwrap_or_else(|| format!("Untitled Evidence {id}"));
	let authors = partial.authors.unwrap_or_else(|| make_authors(&mut rng));
	let journal = partial
		.journal
		.unwrap_or_else(|| rng.sample(JOURNALS).to_string());
	let year = partial
		.year
		.filter(|y| *y > 1900)
		.unwrap_or_else(|| rng.int_in(2015, 2024) as i32);
	let evidence_type = partial
		.evidence_type
		.unwrap_or_else(|| rng.sample(STUDY_TYPES).to_string());
	let citation_count = partial
		.citation_count
		.unwrap_or_else(|| make_citations(&mut rng));
	let key_findings = match partial.key_findings {
		Some(findings) => findings,
		None => {
			// A matched biomarker tag leads the sentence, shouted.
			let biomarker = tag_match(&partial.tags, BIOMARKERS).map(|t| t.to_uppercase());
			let symptom = tag_match(&partial.tags, SYMPTOMS);
			make_findings(&mut rng, biomarker, symptom, &evidence_type)
		}
	};
	let tags = if partial.tags.is_empty() {
		let mut tags = vec![
			"sle".to_string(),
			"lupus".to_string(),
			rng.sample(BIOMARKERS).to_lowercase(),
			rng.sample(SYMPTOMS).to_lowercase(),
			rng.sample(PATHWAYS).to_lowercase(),
			evidence_type.clone(),
		];
		let mut seen = std::collections::HashSet::new();
		tags.retain(|t| seen.insert(t.clone()));
		tags
	} else {
		partial.tags
	};
	let url = partial.url.unwrap_or_else(|| evidence_url(&id));

	let quality_score = partial.quality_score.unwrap_or_else(|| {
		(derive_quality(citation_count, year, &evidence_type, now_year) * 100.0).round() / 100.0
	});
	let relevance_score = partial.relevance_score.unwrap_or_else(|| {
		(((quality_score + 0.02 + 0.1 * rng.next_f64()) * 100.0).round() / 100.0).min(0.97)
	});

	EvidenceSource {
		id,
		title,
		authors,
		journal,
		year,
		citation_count,
		quality_score,
		evidence_type,
		key_findings,
		relevance_score,
		tags,
		url,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn partial(id: &str) -> PartialEvidence {
		PartialEvidence {
			id: id.into(),
			..Default::default()
		}
	}

	#[test]
	fn prng_is_deterministic_and_in_range() {
		let mut a = Mulberry32::from_seed_str("pmid_34521::seed");
		let mut b = Mulberry32::from_seed_str("pmid_34521::seed");
		for _ in 0..64 {
			let x = a.next_f64();
			assert_eq!(x, b.next_f64());
			assert!((0.0..1.0).contains(&x));
		}

		let mut c = Mulberry32::from_seed_str("other::seed");
		assert_ne!(a.next_f64(), c.next_f64());
	}

	#[test]
	fn same_id_fills_identically() {
		let first = fill_missing(partial("doc_7"), 0, 2025);
		let second = fill_missing(partial("doc_7"), 3, 2025);
		assert_eq!(first, second);
	}

	#[test]
	fn filled_values_respect_ranges() {
		for i in 0..40 {
			let record = fill_missing(partial(&format!("doc_{i}")), i, 2025);
			assert!((2015..=2024).contains(&record.year));
			assert!(record.citation_count <= 1500);
			assert!((0.5..=0.98).contains(&record.quality_score));
			assert!(record.relevance_score <= 0.97);
			assert!(!record.authors.is_empty());
			assert!(!record.tags.is_empty());
			assert!(STUDY_TYPES.contains(&record.evidence_type.as_str()));
			assert!(record.url.starts_with("https://example.org/evidence/"));
		}
	}

	#[test]
	fn present_fields_are_never_overwritten() {
		let record = fill_missing(
			PartialEvidence {
				id: "pmid_1".into(),
				title: Some("Kept".into()),
				journal: Some("NEJM".into()),
				year: Some(2019),
				citation_count: Some(12),
				quality_score: Some(0.91),
				evidence_type: Some("clinical-trial".into()),
				tags: vec!["lupus".into()],
				..Default::default()
			},
			0,
			2025,
		);
		assert_eq!(record.title, "Kept");
		assert_eq!(record.journal, "NEJM");
		assert_eq!(record.year, 2019);
		assert_eq!(record.citation_count, 12);
		assert_eq!(record.quality_score, 0.91);
		assert_eq!(record.evidence_type, "clinical-trial");
		assert_eq!(record.tags, vec!["lupus"]);
	}

	#[test]
	fn tagged_biomarkers_steer_generated_findings() {
		let record = fill_missing(
			PartialEvidence {
				id: "pmid_2".into(),
				tags: vec!["ana".into(), "nephritis".into()],
				..Default::default()
			},
			0,
			2025,
		);
		assert!(record.key_findings.starts_with("ANA associated with nephritis"));
	}

	#[test]
	fn matched_tags_are_uppercased_in_findings() {
		let record = fill_missing(
			PartialEvidence {
				id: "pmid_4".into(),
				tags: vec!["anti-dsdna".into()],
				..Default::default()
			},
			0,
			2025,
		);
		assert!(record.key_findings.starts_with("ANTI-DSDNA associated with"));
	}

	#[test]
	fn metric_values_drop_trailing_zeros() {
		assert_eq!(format_metric(0.8), "0.8");
		assert_eq!(format_metric(0.83), "0.83");
		assert_eq!(format_metric(2.0), "2");
		assert_eq!(format_metric(1.5), "1.5");
		assert_eq!(format_metric(3.14159), "3.14");
	}

	#[test]
	fn pre_1900_years_are_refilled() {
		let record = fill_missing(
			PartialEvidence {
				id: "pmid_3".into(),
				year: Some(1850),
				..Default::default()
			},
			0,
			2025,
		);
		assert!((2015..=2024).contains(&record.year));
	}
}
