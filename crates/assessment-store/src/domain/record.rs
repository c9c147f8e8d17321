//! # Assessment Records
//!
//! The logical record produced when an assessment completes, plus the typed
//! metrics blocks it carries.
//!
//! Each metrics kind is its own struct with explicit optional fields, so a
//! missing block is `None` rather than an absent JSON key discovered at
//! runtime.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unix timestamp in seconds since epoch.
pub type Timestamp = u64;

/// Outcome of an assessment as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    /// Stored in full.
    #[default]
    Completed,
    /// Stored after lossy optimization or as a fallback record.
    CompletedWithSizeLimit,
    /// The assessment itself failed.
    Error,
}

impl AssessmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentStatus::Completed => "completed",
            AssessmentStatus::CompletedWithSizeLimit => "completed_with_size_limit",
            AssessmentStatus::Error => "error",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "completed" => Some(AssessmentStatus::Completed),
            "completed_with_size_limit" => Some(AssessmentStatus::CompletedWithSizeLimit),
            "error" => Some(AssessmentStatus::Error),
            _ => None,
        }
    }

    /// True when stored detail is known to be incomplete.
    pub fn is_degraded(&self) -> bool {
        matches!(self, AssessmentStatus::CompletedWithSizeLimit)
    }
}

/// Score of a single security control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlScore {
    pub control_name: String,
    pub category: String,
    pub current_score: f64,
    pub max_score: f64,
    pub implementation_status: String,
}

/// Secure-score block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecureScoreMetrics {
    pub current_score: f64,
    pub max_score: f64,
    pub percentage: f64,
    #[serde(default)]
    pub control_scores: Vec<ControlScore>,
    /// Number of controls before optimization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_controls_found: Option<usize>,
    /// Number of controls kept by optimization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controls_stored_count: Option<usize>,
}

/// One licensed SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseDetail {
    pub sku_part_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_plan_name: Option<String>,
    pub total_units: u64,
    pub consumed_units: u64,
}

/// License block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseMetrics {
    pub total_licenses: u64,
    pub assigned_licenses: u64,
    pub utilization_rate: f64,
    #[serde(default)]
    pub license_details: Vec<LicenseDetail>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Metrics carried by an assessment record.
///
/// The `optimized`, `compressed` and `partial` markers tell the reporting
/// layer that detail was reduced at write time and must be shown as such.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure_score: Option<SecureScoreMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<LicenseMetrics>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub optimized: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub compressed: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub partial: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_items_found: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_retained: Option<usize>,
}

impl Metrics {
    /// Detail items (controls and license lines) currently held.
    pub fn item_count(&self) -> usize {
        let controls = self
            .secure_score
            .as_ref()
            .map_or(0, |s| s.control_scores.len());
        let licenses = self
            .license
            .as_ref()
            .map_or(0, |l| l.license_details.len());
        controls + licenses
    }

    /// Metrics with every detail list removed, keeping totals and markers.
    pub fn aggregates_only(&self) -> Metrics {
        Metrics {
            secure_score: self.secure_score.as_ref().map(|s| SecureScoreMetrics {
                control_scores: Vec::new(),
                controls_stored_count: Some(0),
                ..s.clone()
            }),
            license: self.license.as_ref().map(|l| LicenseMetrics {
                license_details: Vec::new(),
                ..l.clone()
            }),
            items_retained: Some(0),
            ..self.clone()
        }
    }
}

/// A remediation recommendation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

impl Recommendation {
    /// True when the entry has a non-blank title or description.
    pub fn has_content(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.title) || present(&self.description)
    }
}

/// A completed (or failed) security posture assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    pub id: String,
    pub customer_id: String,
    pub tenant_id: String,
    pub timestamp: Timestamp,
    pub status: AssessmentStatus,
    pub score: f64,
    #[serde(default)]
    pub metrics: Metrics,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    /// Set on fallback records only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl AssessmentRecord {
    /// Create a completed record with a fresh id.
    pub fn new(
        customer_id: impl Into<String>,
        tenant_id: impl Into<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.into(),
            tenant_id: tenant_id.into(),
            timestamp,
            status: AssessmentStatus::Completed,
            score: 0.0,
            metrics: Metrics::default(),
            recommendations: Vec::new(),
            diagnostic: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_status(mut self, status: AssessmentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_recommendations(mut self, recommendations: Vec<Recommendation>) -> Self {
        self.recommendations = recommendations;
        self
    }

    /// Name of the first numeric field that is NaN or infinite.
    ///
    /// JSON cannot represent such values, so they would not survive a
    /// round trip.
    pub fn non_finite_field(&self) -> Option<&'static str> {
        if !self.score.is_finite() {
            return Some("score");
        }
        if let Some(s) = &self.metrics.secure_score {
            if !s.current_score.is_finite() || !s.max_score.is_finite() {
                return Some("secureScore");
            }
            if !s.percentage.is_finite() {
                return Some("secureScore.percentage");
            }
            if s.control_scores
                .iter()
                .any(|c| !c.current_score.is_finite() || !c.max_score.is_finite())
            {
                return Some("secureScore.controlScores");
            }
        }
        if let Some(l) = &self.metrics.license {
            if !l.utilization_rate.is_finite() {
                return Some("license.utilizationRate");
            }
        }
        None
    }
}
