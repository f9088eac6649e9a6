use serde::{Deserialize, Serialize};

use crate::identity::SessionIdentity;
use crate::scoring::{AnalysisResults, ContentType};

/// Caller-side reduction of a weighted result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualitySummary {
    /// Weighted mean over complete dimensions, `None` if every dimension failed.
    pub overall_score: Option<u32>,
    pub complete_dimensions: usize,
    pub failed_dimensions: usize,
    pub content_type: String,
}

impl QualitySummary {
    /// Computes `Σ(score × weight) / Σ(weight)` over complete dimensions.
    ///
    /// Dimensions without an attached weight (archives written before
    /// weighting) use the profile of `content_type`.
    pub fn from_results(results: &AnalysisResults, content_type: &str) -> Self {
        let content_type = ContentType::from_label(content_type);
        let profile = content_type.profile();

        let (weighted_sum, weight_total) = results
            .iter()
            .filter_map(|(dimension, result)| {
                let score = result.score?;
                let weight = result
                    .content_type_weight
                    .unwrap_or_else(|| profile.weight(*dimension));
                Some((score as f64 * weight, weight))
            })
            .fold((0.0, 0.0), |(s, w), (ds, dw)| (s + ds, w + dw));

        let overall_score = (weight_total > 0.0).then(|| (weighted_sum / weight_total).round() as u32);

        Self {
            overall_score,
            complete_dimensions: results.complete_count(),
            failed_dimensions: results.failed_count(),
            content_type: content_type.as_str().to_string(),
        }
    }
}

/// Envelope returned to the calling workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResponse {
    pub success: bool,
    pub session_id: SessionIdentity,
    pub cache_hit: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<AnalysisResults>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<QualitySummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ScoringResponse {
    pub fn completed(
        session_id: SessionIdentity,
        cache_hit: bool,
        results: AnalysisResults,
        content_type: &str,
    ) -> Self {
        let summary = QualitySummary::from_results(&results, content_type);
        let message = if cache_hit {
            "Reused archived dimension results".to_string()
        } else {
            format!(
                "Scored {} of {} dimensions",
                summary.complete_dimensions,
                summary.complete_dimensions + summary.failed_dimensions
            )
        };
        Self {
            success: true,
            session_id,
            cache_hit,
            results: Some(results),
            summary: Some(summary),
            message: Some(message),
        }
    }

    pub fn failure(session_id: SessionIdentity, message: impl Into<String>) -> Self {
        Self {
            success: false,
            session_id,
            cache_hit: false,
            results: None,
            summary: None,
            message: Some(message.into()),
        }
    }
}
