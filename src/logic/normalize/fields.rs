//! Field readers shared by the fallback chains.
//!
//! Every reader is total: an absent, null or ill-typed value comes back as
//! `None` (or an empty collection) and the caller moves on to the next tier.

use serde_json::{Map, Value};

use super::types::{AiMetrics, Citation, FeatureScore};

// ============================================================================
// SCORE FIELD
// ============================================================================

/// The two shapes a score has taken across service versions.
///
/// Early services sent a bare probability; later ones send an object with
/// the score plus the metrics that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreField {
    Scalar(f64),
    Detailed {
        score: Option<f64>,
        metrics: AiMetrics,
    },
}

impl ScoreField {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(ScoreField::Detailed {
                score: field(map, &["score"]).and_then(number),
                metrics: field(map, &["metrics"]).map(metrics).unwrap_or_default(),
            }),
            other => number(other).map(ScoreField::Scalar),
        }
    }

    pub fn score(&self) -> Option<f64> {
        match self {
            ScoreField::Scalar(score) => Some(*score),
            ScoreField::Detailed { score, .. } => *score,
        }
    }
}

// ============================================================================
// PRIMITIVE READERS
// ============================================================================

/// First present, non-null value among `keys`
pub fn field<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| !value.is_null())
}

/// Finite number, also accepting numeric strings
pub fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Clamp into [0, 1]
pub fn probability(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Raw metric: finite and non-negative, otherwise unknown
pub fn metric(value: &Value) -> Option<f64> {
    number(value).filter(|v| *v >= 0.0)
}

pub fn count(value: &Value) -> Option<u32> {
    metric(value).map(|v| v.min(u32::MAX as f64) as u32)
}

pub fn flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// String list; a lone string counts as a one-element list
pub fn strings(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Value::String(s) => vec![s.clone()],
        _ => Vec::new(),
    }
}

// ============================================================================
// COMPOSITE READERS
// ============================================================================

pub fn metrics(value: &Value) -> AiMetrics {
    let Some(map) = value.as_object() else {
        return AiMetrics::default();
    };

    AiMetrics {
        perplexity: field(map, &["perplexity"]).and_then(metric),
        burstiness: field(map, &["burstiness"]).and_then(metric),
        avg_sentence_length: field(
            map,
            &["avg_sentence_len", "avg_sentence_length", "avgSentenceLength"],
        )
        .and_then(metric),
    }
}

pub fn citation(value: &Value) -> Option<Citation> {
    match value {
        Value::Object(map) => Some(Citation {
            score: field(map, &["score"])
                .and_then(number)
                .map(probability)
                .unwrap_or(0.0),
            count: field(map, &["count"]).and_then(count).unwrap_or(0),
        }),
        other => number(other).map(|score| Citation {
            score: probability(score),
            count: 0,
        }),
    }
}

pub fn feature_score(value: &Value) -> Option<FeatureScore> {
    ScoreField::from_value(value)
        .and_then(|field| field.score())
        .map(|score| FeatureScore {
            score: probability(score),
        })
}

/// Last path segment, accepting both separator styles
pub fn file_name(path: &str) -> String {
    path.rsplit(|c| c == '/' || c == '\\')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("Unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_score_field_shapes() {
        assert_eq!(ScoreField::from_value(&json!(0.4)), Some(ScoreField::Scalar(0.4)));
        assert_eq!(ScoreField::from_value(&json!("0.25")), Some(ScoreField::Scalar(0.25)));
        assert_eq!(ScoreField::from_value(&json!(null)), None);
        assert_eq!(ScoreField::from_value(&json!([1, 2])), None);

        let detailed = ScoreField::from_value(&json!({"score": 0.3, "metrics": {"perplexity": 12}}))
            .unwrap();
        assert_eq!(detailed.score(), Some(0.3));
        match detailed {
            ScoreField::Detailed { metrics, .. } => assert_eq!(metrics.perplexity, Some(12.0)),
            other => panic!("expected detailed, got {:?}", other),
        }
    }

    #[test]
    fn test_number_rejects_garbage() {
        assert_eq!(number(&json!("-")), None);
        assert_eq!(number(&json!("NaN")), None);
        assert_eq!(number(&json!(true)), None);
        assert_eq!(number(&json!(" 7 ")), Some(7.0));
    }

    #[test]
    fn test_probability_clamps() {
        assert_eq!(probability(1.7), 1.0);
        assert_eq!(probability(-0.2), 0.0);
        assert_eq!(probability(f64::NAN), 0.0);
        assert_eq!(probability(0.42), 0.42);
    }

    #[test]
    fn test_file_name_strips_both_separators() {
        assert_eq!(file_name("data/uploads/a.pdf"), "a.pdf");
        assert_eq!(file_name(r"C:\papers\b.docx"), "b.docx");
        assert_eq!(file_name("plain.txt"), "plain.txt");
        assert_eq!(file_name(""), "Unknown");
        assert_eq!(file_name("dir/"), "Unknown");
    }

    #[test]
    fn test_field_skips_null() {
        let value = json!({"a": null, "b": 2});
        let map = value.as_object().unwrap();
        assert_eq!(field(map, &["a", "b"]), Some(&json!(2)));
        assert_eq!(field(map, &["c"]), None);
    }
}
