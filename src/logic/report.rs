//! Plain-text analysis report, as offered for download by the web client

use chrono::{DateTime, Utc};

use super::normalize::NormalizedResult;

/// Whole-percent rendering of a [0, 1] value
pub fn fmt_pct(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{}%", (value * 100.0).round() as i64)
}

fn fmt_metric(value: Option<f64>) -> String {
    value
        .map(|v| {
            if v.fract() == 0.0 {
                format!("{}", v as i64)
            } else {
                format!("{}", v)
            }
        })
        .unwrap_or_else(|| "N/A".to_string())
}

/// `thesis.pdf` -> `thesis_pdf_analysis_report.txt`
pub fn file_name(result: &NormalizedResult) -> String {
    format!("{}_analysis_report.txt", result.file_name.replace('.', "_"))
}

pub fn render(result: &NormalizedResult, generated_at: DateTime<Utc>) -> String {
    let file = if result.file_path.is_empty() {
        "Unknown"
    } else {
        result.file_path.as_str()
    };

    let segments = if result.matches.is_empty() {
        "None found.".to_string()
    } else {
        result.matches.join("\n\n")
    };

    let mut lines = vec![
        "SCHOLARLY PAPER DETECTION REPORT".to_string(),
        "================================".to_string(),
        format!("Date: {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
        format!("File: {}", file),
        String::new(),
        "ANALYSIS SUMMARY".to_string(),
        "----------------".to_string(),
        format!("Recommendation: {}", result.decision_label),
        format!("Combined Probability: {}", fmt_pct(result.final_probability)),
        String::new(),
        "DETAILED SCORES".to_string(),
        "---------------".to_string(),
        format!("AI Likelihood: {}", fmt_pct(result.ai_probability)),
        format!("Plagiarism Score: {}", fmt_pct(result.plagiarism_score)),
    ];

    if let Some(citation) = &result.citation {
        lines.push(format!(
            "Citation Credibility: {} ({} citations)",
            citation.score, citation.count
        ));
    }

    lines.extend([
        String::new(),
        "METRICS".to_string(),
        "-------".to_string(),
        format!("Perplexity: {}", fmt_metric(result.ai_metrics.perplexity)),
        format!("Burstiness: {}", fmt_metric(result.ai_metrics.burstiness)),
        format!(
            "Avg Sentence Length: {}",
            fmt_metric(result.ai_metrics.avg_sentence_length)
        ),
    ]);

    if let Some(eligibility) = &result.eligibility {
        lines.extend([
            String::new(),
            "ELIGIBILITY".to_string(),
            "-----------".to_string(),
            format!(
                "Eligible: {}",
                if eligibility.is_eligible { "Yes" } else { "No" }
            ),
            format!("Integrity Score: {}", fmt_pct(eligibility.integrity_score)),
        ]);
        lines.extend(eligibility.reasons.iter().map(|r| format!("- {}", r)));
    }

    if let Some(genai) = &result.genai_features {
        lines.extend([
            String::new(),
            "GENAI PATTERNS".to_string(),
            "--------------".to_string(),
            format!("Composite Score: {}", fmt_pct(genai.composite_score)),
        ]);
        lines.extend(
            genai
                .features
                .iter()
                .map(|(key, feature)| format!("{}: {}", key, fmt_pct(feature.score))),
        );
        lines.extend(genai.interpretation.iter().map(|i| format!("- {}", i)));
    }

    lines.extend([
        String::new(),
        "SUSPICIOUS SEGMENTS".to_string(),
        "-------------------".to_string(),
        segments,
        String::new(),
        "--------------------------------".to_string(),
        "Generated by Scholarly Paper Detector".to_string(),
    ]);

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::normalize::normalize;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_fmt_pct() {
        assert_eq!(fmt_pct(0.0), "0%");
        assert_eq!(fmt_pct(0.605), "61%");
        assert_eq!(fmt_pct(1.0), "100%");
        assert_eq!(fmt_pct(f64::NAN), "0%");
    }

    #[test]
    fn test_report_file_name() {
        let result = normalize(&json!({"file": "uploads/my.thesis.pdf"}));
        assert_eq!(file_name(&result), "my_thesis_pdf_analysis_report.txt");
    }

    #[test]
    fn test_render_report() {
        let result = normalize(&json!({
            "file": "data/uploads/b.pdf",
            "scores": {
                "ai_score": {"score": 0.12, "metrics": {"perplexity": 55, "burstiness": 0.7}},
                "plagiarism_score": 0,
                "final": {"final_probability": 0.08, "decision": "Accept"}
            }
        }));
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();

        let text = render(&result, at);

        assert!(text.starts_with("SCHOLARLY PAPER DETECTION REPORT"));
        assert!(text.contains("Date: 2026-03-01 09:30:00 UTC"));
        assert!(text.contains("File: data/uploads/b.pdf"));
        assert!(text.contains("Recommendation: Accept"));
        assert!(text.contains("Combined Probability: 8%"));
        assert!(text.contains("AI Likelihood: 12%"));
        assert!(text.contains("Perplexity: 55"));
        assert!(text.contains("Burstiness: 0.7"));
        assert!(text.contains("Avg Sentence Length: N/A"));
        assert!(text.contains("None found."));
        assert!(!text.contains("ELIGIBILITY"));
    }

    #[test]
    fn test_render_optional_sections() {
        let result = normalize(&json!({
            "file": "c.pdf",
            "matches": ["para 1", "para 7"],
            "eligibility": {"is_eligible": false, "integrity_score": 0.3, "reasons": ["Too much AI"]},
            "scores": {"genai_features": {"composite_score": 0.5, "features": {"claude_hedging": {"score": 0.4}}}}
        }));

        let text = render(&result, Utc::now());

        assert!(text.contains("Eligible: No"));
        assert!(text.contains("- Too much AI"));
        assert!(text.contains("claude_hedging: 40%"));
        assert!(text.contains("para 1\n\npara 7"));
    }
}
