//! Content-type weight profiles and the weighting step.
//!
//! Every profile's five weights sum to `1.0`; this is checked at compile time.
//! Unknown content types use the `mixed` profile.

use std::fmt;

use tracing::debug;

use super::types::{AnalysisResults, Dimension};

/// Per-dimension weight fractions for one content type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightProfile {
    pub relevance: f64,
    pub freshness: f64,
    pub clarity: f64,
    pub accuracy: f64,
    pub completeness: f64,
}

impl WeightProfile {
    pub const fn new(
        relevance: f64,
        freshness: f64,
        clarity: f64,
        accuracy: f64,
        completeness: f64,
    ) -> Self {
        Self {
            relevance,
            freshness,
            clarity,
            accuracy,
            completeness,
        }
    }

    pub const fn sum(&self) -> f64 {
        self.relevance + self.freshness + self.clarity + self.accuracy + self.completeness
    }

    pub fn weight(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Relevance => self.relevance,
            Dimension::Freshness => self.freshness,
            Dimension::Clarity => self.clarity,
            Dimension::Accuracy => self.accuracy,
            Dimension::Completeness => self.completeness,
        }
    }

    /// Weight as a whole percentage, e.g. `0.30` → `30`.
    pub fn percent(&self, dimension: Dimension) -> u32 {
        (self.weight(dimension) * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    ApiReference,
    Tutorial,
    Conceptual,
    HowTo,
    Reference,
    Troubleshooting,
    Overview,
    Changelog,
    Mixed,
}

const WEIGHT_TABLE: [(ContentType, WeightProfile); 9] = [
    (ContentType::ApiReference, WeightProfile::new(0.15, 0.25, 0.20, 0.30, 0.10)),
    (ContentType::Tutorial, WeightProfile::new(0.20, 0.20, 0.30, 0.20, 0.10)),
    (ContentType::Conceptual, WeightProfile::new(0.25, 0.10, 0.35, 0.20, 0.10)),
    (ContentType::HowTo, WeightProfile::new(0.20, 0.15, 0.30, 0.25, 0.10)),
    (ContentType::Reference, WeightProfile::new(0.15, 0.20, 0.20, 0.30, 0.15)),
    (ContentType::Troubleshooting, WeightProfile::new(0.25, 0.15, 0.25, 0.25, 0.10)),
    (ContentType::Overview, WeightProfile::new(0.30, 0.10, 0.30, 0.15, 0.15)),
    (ContentType::Changelog, WeightProfile::new(0.15, 0.40, 0.15, 0.20, 0.10)),
    (ContentType::Mixed, WeightProfile::new(0.20, 0.20, 0.20, 0.20, 0.20)),
];

static WEIGHTS: [(ContentType, WeightProfile); 9] = WEIGHT_TABLE;

const WEIGHT_SUM_EPSILON: f64 = 1e-9;

const _: () = {
    let mut i = 0;
    while i < WEIGHT_TABLE.len() {
        let sum = WEIGHT_TABLE[i].1.sum();
        assert!(
            sum > 1.0 - WEIGHT_SUM_EPSILON && sum < 1.0 + WEIGHT_SUM_EPSILON,
            "weight profile does not sum to 1.0"
        );
        i += 1;
    }
};

impl ContentType {
    pub const ALL: [ContentType; 9] = [
        ContentType::ApiReference,
        ContentType::Tutorial,
        ContentType::Conceptual,
        ContentType::HowTo,
        ContentType::Reference,
        ContentType::Troubleshooting,
        ContentType::Overview,
        ContentType::Changelog,
        ContentType::Mixed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::ApiReference => "api-reference",
            ContentType::Tutorial => "tutorial",
            ContentType::Conceptual => "conceptual",
            ContentType::HowTo => "how-to",
            ContentType::Reference => "reference",
            ContentType::Troubleshooting => "troubleshooting",
            ContentType::Overview => "overview",
            ContentType::Changelog => "changelog",
            ContentType::Mixed => "mixed",
        }
    }

    /// Parses a label, accepting `_`/space separators and common aliases.
    pub fn parse_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_lowercase().replace(['_', ' '], "-");
        let found = match normalized.as_str() {
            "api-reference" | "api" | "api-docs" | "api-doc" => ContentType::ApiReference,
            "tutorial" | "guide" => ContentType::Tutorial,
            "conceptual" | "concept" | "explanation" => ContentType::Conceptual,
            "how-to" | "howto" => ContentType::HowTo,
            "reference" => ContentType::Reference,
            "troubleshooting" | "faq" => ContentType::Troubleshooting,
            "overview" | "landing" | "introduction" => ContentType::Overview,
            "changelog" | "release-notes" => ContentType::Changelog,
            "mixed" => ContentType::Mixed,
            _ => return None,
        };
        Some(found)
    }

    /// Like [`ContentType::parse_label`], falling back to [`ContentType::Mixed`].
    pub fn from_label(label: &str) -> Self {
        Self::parse_label(label).unwrap_or(ContentType::Mixed)
    }

    pub fn profile(&self) -> &'static WeightProfile {
        WEIGHTS
            .iter()
            .find(|(ct, _)| ct == self)
            .map(|(_, profile)| profile)
            .unwrap_or(&WEIGHTS[WEIGHTS.len() - 1].1)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weight profile for a free-form content-type label.
pub fn weights_for(label: &str) -> &'static WeightProfile {
    ContentType::from_label(label).profile()
}

/// Finding prepended to every weighted dimension.
pub fn weight_disclosure(content_type: ContentType, dimension: Dimension) -> String {
    format!(
        "Content type: {} (weight: {}%)",
        content_type,
        content_type.profile().percent(dimension)
    )
}

/// Annotates every complete dimension with its content-type weight.
///
/// Scores are left as graded; `originalScore` records them alongside the
/// weight so callers can combine `score × contentTypeWeight` themselves.
/// Failed dimensions pass through untouched.
pub fn apply_weights(mut results: AnalysisResults, content_type: &str) -> AnalysisResults {
    let content_type = ContentType::from_label(content_type);
    let profile = content_type.profile();

    for (dimension, result) in results.iter_mut() {
        let Some(score) = result.score else {
            debug!(dimension = %dimension, "Skipping weighting for failed dimension");
            continue;
        };

        result.original_score = Some(score);
        result.content_type_weight = Some(profile.weight(*dimension));
        result.content_type = Some(content_type.as_str().to_string());
        result
            .findings
            .insert(0, weight_disclosure(content_type, *dimension));
    }

    results
}
