//! JSONL corpus decoding: permissive alias resolution and coercion into
//! [`PartialEvidence`] at the boundary, so nothing loosely typed travels
//! further.

use serde_json::Value;

use super::types::PartialEvidence;

fn coerce_string(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		Value::Array(items) => items
			.iter()
			.map(coerce_string)
			.filter(|s| !s.is_empty())
			.collect::<Vec<_>>()
			.join(", "),
		Value::Number(n) => n.to_string(),
		Value::Bool(b) => b.to_string(),
		_ => String::new(),
	}
}

fn coerce_number(value: &Value) -> Option<f64> {
	match value {
		Value::Number(n) => n.as_f64(),
		Value::String(s) => s.trim().parse().ok(),
		_ => None,
	}
	.filter(|n: &f64| n.is_finite())
}

/// Normalizes free-form study-type strings onto the fixed display slugs.
pub fn normalize_evidence_type(raw: &str) -> String {
	let raw = raw.trim().to_lowercase();
	if raw.is_empty() {
		return "methodology".into();
	}
	if raw.contains("systematic") || raw.contains("meta") {
		return "systematic-review".into();
	}
	if raw.contains("random") || raw.contains("trial") {
		return "clinical-trial".into();
	}
	if raw.contains("cohort") {
		return "cohort-study".into();
	}
	raw.split_whitespace().collect::<Vec<_>>().join("-")
}

fn clean_tags(value: &Value) -> Vec<String> {
	let raw: Vec<String> = match value {
		Value::Array(items) => items.iter().map(coerce_string).collect(),
		other => coerce_string(other)
			.split([';', ','])
			.map(str::to_string)
			.collect(),
	};
	raw.iter()
		.map(|t| t.trim().to_lowercase())
		.filter(|t| !t.is_empty())
		.collect()
}

/// Quality heuristic for records that carry no explicit score: recency,
/// citation boost and a study-type bonus, clamped to [0.5, 0.98].
pub fn derive_quality(citation_count: u32, year: i32, evidence_type: &str, now_year: i32) -> f64 {
	let year = if year > 0 { year } else { now_year };
	let recency = (1.0 - (now_year - year) as f64 / 10.0).clamp(0.0, 1.0);
	let type_bonus = match evidence_type {
		"systematic-review" => 0.15,
		"clinical-trial" => 0.1,
		"cohort-study" => 0.05,
		_ => 0.0,
	};
	let cite_boost = ((1.0 + citation_count as f64).log10() / 3.0).clamp(0.0, 1.0);
	(0.6 * recency + 0.3 * cite_boost + type_bonus).clamp(0.5, 0.98)
}

fn field<'a>(record: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
	aliases
		.iter()
		.find_map(|key| record.get(*key))
		.filter(|v| !v.is_null())
}

fn string_field(record: &Value, aliases: &[&str]) -> Option<String> {
	field(record, aliases)
		.map(coerce_string)
		.map(|s| s.trim().to_string())
		.filter(|s| !s.is_empty())
}

fn decode_record(record: &Value, index: usize) -> PartialEvidence {
	let id = string_field(record, &["id", "pmid", "doi"]).unwrap_or_else(|| format!("doc_{index}"));

	let year = string_field(record, &["year", "publication_year"])
		.and_then(|s| s.parse::<i32>().ok())
		.or_else(|| {
			field(record, &["year", "publication_year"]).and_then(|v| coerce_number(v).map(|n| n as i32))
		})
		.or_else(|| {
			string_field(record, &["date"]).and_then(|d| d.get(..4)?.parse::<i32>().ok())
		});

	PartialEvidence {
		id,
		title: string_field(record, &["title", "paper_title", "name"]),
		authors: string_field(record, &["authors", "author_list", "author"]),
		journal: string_field(record, &["journal", "venue"]),
		year,
		citation_count: field(record, &["citationCount", "citations", "cited_by"])
			.and_then(coerce_number)
			.filter(|n| *n >= 0.0)
			.map(|n| n.round() as u32),
		quality_score: field(record, &["qualityScore"]).and_then(coerce_number),
		evidence_type: string_field(record, &["evidenceType", "study_design", "type"])
			.map(|raw| normalize_evidence_type(&raw)),
		key_findings: string_field(record, &["keyFindings", "abstract", "summary"]),
		relevance_score: field(record, &["relevanceScore"]).and_then(coerce_number),
		tags: field(record, &["tags", "keywords"])
			.map(clean_tags)
			.unwrap_or_default(),
		url: string_field(record, &["url", "link", "source"]),
	}
}

/// Parses a JSONL corpus: one record per non-empty line, malformed lines
/// skipped silently.
pub fn parse_jsonl(text: &str) -> Vec<PartialEvidence> {
	text.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty())
		.enumerate()
		.filter_map(|(index, line)| {
			let record: Value = serde_json::from_str(line).ok()?;
			record.is_object().then(|| decode_record(&record, index))
		})
		.collect()
}
