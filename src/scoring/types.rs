use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// One of the five independently graded quality aspects.
pub enum Dimension {
    Relevance,
    Freshness,
    Clarity,
    Accuracy,
    Completeness,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Relevance,
        Dimension::Freshness,
        Dimension::Clarity,
        Dimension::Accuracy,
        Dimension::Completeness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Relevance => "relevance",
            Dimension::Freshness => "freshness",
            Dimension::Clarity => "clarity",
            Dimension::Accuracy => "accuracy",
            Dimension::Completeness => "completeness",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dimension::ALL
            .into_iter()
            .find(|d| d.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("Unknown dimension: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionStatus {
    Complete,
    Failed,
}

/// Recommendation urgency. Unrecognized labels read as `medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        Priority::from(value.as_str())
    }
}

impl From<&str> for Priority {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "high" | "critical" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Medium,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub impact: String,
}

impl Recommendation {
    pub fn new(priority: Priority, action: impl Into<String>, impact: impl Into<String>) -> Self {
        Self {
            priority,
            action: action.into(),
            impact: impact.into(),
        }
    }
}

/// Outcome of grading one dimension.
///
/// Created unweighted by the scorer; the weighting step fills in
/// `original_score`, `content_type_weight` and `content_type` for complete
/// dimensions only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionResult {
    /// `0..=100`, or `None` when the dimension failed.
    pub score: Option<u32>,
    pub status: DimensionStatus,
    #[serde(default)]
    pub findings: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    /// Wall-clock time spent on this dimension, in milliseconds.
    #[serde(default)]
    pub processing_time: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl DimensionResult {
    pub fn complete(
        score: u32,
        findings: Vec<String>,
        recommendations: Vec<Recommendation>,
        elapsed: Duration,
    ) -> Self {
        Self {
            score: Some(score),
            status: DimensionStatus::Complete,
            findings,
            recommendations,
            failure_reason: None,
            processing_time: elapsed.as_millis() as u64,
            original_score: None,
            content_type_weight: None,
            content_type: None,
        }
    }

    pub fn failed(reason: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            score: None,
            status: DimensionStatus::Failed,
            findings: Vec::new(),
            recommendations: Vec::new(),
            failure_reason: Some(reason.into()),
            processing_time: elapsed.as_millis() as u64,
            original_score: None,
            content_type_weight: None,
            content_type: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == DimensionStatus::Complete && self.score.is_some()
    }

    pub fn is_weighted(&self) -> bool {
        self.content_type_weight.is_some()
    }
}

/// Dimension name → result. Serialized as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResults(BTreeMap<Dimension, DimensionResult>);

impl AnalysisResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, dimension: Dimension, result: DimensionResult) -> Option<DimensionResult> {
        self.0.insert(dimension, result)
    }

    pub fn get(&self, dimension: Dimension) -> Option<&DimensionResult> {
        self.0.get(&dimension)
    }

    pub fn get_mut(&mut self, dimension: Dimension) -> Option<&mut DimensionResult> {
        self.0.get_mut(&dimension)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Dimension, DimensionResult> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> btree_map::IterMut<'_, Dimension, DimensionResult> {
        self.0.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn complete_count(&self) -> usize {
        self.0.values().filter(|r| r.is_complete()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.0.len() - self.complete_count()
    }
}

impl FromIterator<(Dimension, DimensionResult)> for AnalysisResults {
    fn from_iter<I: IntoIterator<Item = (Dimension, DimensionResult)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for AnalysisResults {
    type Item = (Dimension, DimensionResult);
    type IntoIter = btree_map::IntoIter<Dimension, DimensionResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
