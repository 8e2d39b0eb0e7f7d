//! Result Normalizer
//!
//! Maps whatever the analysis service returned into one [`NormalizedResult`].
//!
//! The service schema has moved several times: `ai_score` went from a bare
//! probability to `{score, metrics}`, and eligibility / GenAI sections were
//! bolted on later. Each canonical field is resolved through its own chain:
//!
//! ```text
//! typed object form  ->  scalar legacy form  ->  canonical (stored) form  ->  default
//! ```
//!
//! Chains are independent, so a payload mixing shapes across sections still
//! normalizes. `normalize` never fails.

mod fields;
mod types;


pub use fields::ScoreField;
pub use types::{
    AiMetrics, Citation, Decision, Eligibility, FeatureScore, GenAiFeatures, NormalizedResult,
};

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use fields::{field, number, probability, strings};

/// Label used when the service gave no recommendation
pub const UNKNOWN_DECISION: &str = "Unknown";

// ============================================================================
// MAIN NORMALIZATION FUNCTION
// ============================================================================

/// Normalize a raw payload (or a previously stored canonical result)
pub fn normalize(raw: &Value) -> NormalizedResult {
    let empty = Map::new();
    let root = raw.as_object().unwrap_or(&empty);
    let scores = root
        .get("scores")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let file_path = field(root, &["file", "filePath"])
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let file_name = fields::file_name(&file_path);

    let (ai_probability, ai_metrics) = resolve_ai(root, scores);
    let (final_probability, decision_label) = resolve_final(root, scores);

    NormalizedResult {
        file_name,
        file_path,
        ai_probability,
        ai_metrics,
        plagiarism_score: resolve_plagiarism(root, scores),
        citation: resolve_citation(root, scores),
        final_probability,
        decision: Decision::classify(&decision_label),
        decision_label,
        matches: field(root, &["matches"]).map(strings).unwrap_or_default(),
        eligibility: resolve_eligibility(root),
        genai_features: resolve_genai(root, scores),
    }
}

// ============================================================================
// FALLBACK CHAINS
// ============================================================================

fn resolve_ai(root: &Map<String, Value>, scores: &Map<String, Value>) -> (f64, AiMetrics) {
    let (score, metrics) = match scores.get("ai_score").and_then(ScoreField::from_value) {
        Some(ScoreField::Detailed { score, metrics }) => (score, Some(metrics)),
        Some(ScoreField::Scalar(score)) => (Some(score), None),
        None => (None, None),
    };

    let score = score.or_else(|| field(root, &["aiProbability"]).and_then(number));
    let metrics = metrics.or_else(|| field(root, &["aiMetrics"]).map(fields::metrics));

    (
        score.map(probability).unwrap_or(0.0),
        metrics.unwrap_or_default(),
    )
}

fn resolve_plagiarism(root: &Map<String, Value>, scores: &Map<String, Value>) -> f64 {
    scores
        .get("plagiarism_score")
        .and_then(ScoreField::from_value)
        .and_then(|score| score.score())
        .or_else(|| field(root, &["plagiarismScore"]).and_then(number))
        .map(probability)
        .unwrap_or(0.0)
}

fn resolve_final(root: &Map<String, Value>, scores: &Map<String, Value>) -> (f64, String) {
    let (probability_value, label) = match scores.get("final") {
        Some(Value::Object(map)) => (
            field(map, &["final_probability", "probability", "score"]).and_then(number),
            field(map, &["decision"]).and_then(Value::as_str),
        ),
        Some(other) => (number(other), None),
        None => (None, None),
    };

    let probability_value =
        probability_value.or_else(|| field(root, &["finalProbability"]).and_then(number));
    let label = label
        .or_else(|| field(root, &["decisionLabel"]).and_then(Value::as_str))
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .unwrap_or(UNKNOWN_DECISION);

    (
        probability_value.map(probability).unwrap_or(0.0),
        label.to_string(),
    )
}

fn resolve_citation(root: &Map<String, Value>, scores: &Map<String, Value>) -> Option<Citation> {
    field(scores, &["citation_score"])
        .and_then(fields::citation)
        .or_else(|| field(root, &["citation"]).and_then(fields::citation))
}

fn resolve_eligibility(root: &Map<String, Value>) -> Option<Eligibility> {
    let map = field(root, &["eligibility"])?.as_object()?;

    Some(Eligibility {
        is_eligible: field(map, &["is_eligible", "isEligible"])
            .and_then(fields::flag)
            .unwrap_or(false),
        integrity_score: field(map, &["integrity_score", "integrityScore"])
            .and_then(number)
            .map(probability)
            .unwrap_or(0.0),
        reasons: field(map, &["reasons"]).map(strings).unwrap_or_default(),
    })
}

fn resolve_genai(root: &Map<String, Value>, scores: &Map<String, Value>) -> Option<GenAiFeatures> {
    let map = field(scores, &["genai_features"])
        .or_else(|| field(root, &["genai_features", "genaiFeatures"]))?
        .as_object()?;

    let features: BTreeMap<String, FeatureScore> = field(map, &["features"])
        .and_then(Value::as_object)
        .map(|features| {
            features
                .iter()
                .filter_map(|(key, value)| {
                    fields::feature_score(value).map(|score| (key.clone(), score))
                })
                .collect()
        })
        .unwrap_or_default();

    Some(GenAiFeatures {
        composite_score: field(map, &["composite_score", "compositeScore"])
            .and_then(number)
            .map(probability)
            .unwrap_or(0.0),
        features,
        interpretation: field(map, &["interpretation"])
            .map(strings)
            .unwrap_or_default(),
    })
}
