use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// DECISION CLASS
// ============================================================================

/// Coarse bucket derived from the service's free-text recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Decision {
    Accept,
    Reject,
    #[default]
    Unknown,
}

impl Decision {
    /// Classify a decision label.
    ///
    /// Case-insensitive substring match. A label mentioning both "accept"
    /// and "reject" is ambiguous and stays `Unknown`.
    pub fn classify(label: &str) -> Self {
        let lower = label.to_lowercase();
        match (lower.contains("accept"), lower.contains("reject")) {
            (true, false) => Decision::Accept,
            (false, true) => Decision::Reject,
            _ => Decision::Unknown,
        }
    }

    /// Accent color used by renderers
    pub fn color(&self) -> &'static str {
        match self {
            Decision::Accept => "#6ee7b7",
            Decision::Reject => "#fca5a5",
            Decision::Unknown => "#fbbf24",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Accept => "accept",
            Decision::Reject => "reject",
            Decision::Unknown => "neutral",
        }
    }
}

// ============================================================================
// CANONICAL MODEL
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiMetrics {
    pub perplexity: Option<f64>,
    pub burstiness: Option<f64>,
    pub avg_sentence_length: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Citation {
    pub score: f64,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Eligibility {
    pub is_eligible: bool,
    pub integrity_score: f64,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureScore {
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenAiFeatures {
    pub composite_score: f64,
    pub features: BTreeMap<String, FeatureScore>,
    pub interpretation: Vec<String>,
}

/// One completed analysis in canonical form.
///
/// Built only by [`super::normalize`]; never mutated afterwards. Deserializing
/// goes through the normalizer as well, so stored copies written by older
/// clients (or by the service itself) decode with the same tolerance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResult {
    pub file_path: String,
    pub file_name: String,
    pub ai_probability: f64,
    pub ai_metrics: AiMetrics,
    pub plagiarism_score: f64,
    pub citation: Option<Citation>,
    pub final_probability: f64,
    pub decision: Decision,
    pub decision_label: String,
    pub matches: Vec<String>,
    pub eligibility: Option<Eligibility>,
    pub genai_features: Option<GenAiFeatures>,
}

impl<'de> Deserialize<'de> for NormalizedResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(super::normalize(&raw))
    }
}
