//! # Payload Optimizer
//!
//! Lossy, priority-based size reduction for assessment payloads.
//!
//! ## Policy (applied in order)
//!
//! 1. Controls: stable sort by `maxScore` descending, keep the top K,
//!    truncate name/category/status.
//! 2. Recommendations: drop entries with neither title nor description,
//!    keep the top K, truncate descriptions.
//! 3. Aggregates are copied through unconditionally.
//! 4. Provenance (`totalItemsFound`, `itemsRetained`, `optimized`) is attached.
//! 5. While still over the target budget: halve the control list, then drop
//!    license details. The floor is an aggregates-only object.
//!
//! Re-applying the optimizer to its own output changes nothing.

use crate::domain::config::OptimizerConfig;
use crate::domain::estimator::estimate_json_size;
use crate::domain::record::{ControlScore, Metrics, Recommendation, SecureScoreMetrics};

#[cfg(test)]
mod tests;

/// Lossy size reducer.
#[derive(Debug, Clone, Default)]
pub struct Optimizer {
    config: OptimizerConfig,
}

impl Optimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Reduce `metrics` until its compact JSON fits `target_size` characters,
    /// or only aggregates remain.
    pub fn optimize_metrics(&self, metrics: &Metrics, target_size: usize) -> Metrics {
        self.optimize_metrics_with(metrics, target_size, |m| estimate_json_size(m).ok())
    }

    /// Like [`optimize_metrics`](Self::optimize_metrics), measuring with
    /// `measure` so the budget holds for the text actually stored.
    ///
    /// `measure` returning `None` counts as oversized.
    pub fn optimize_metrics_with<F>(
        &self,
        metrics: &Metrics,
        target_size: usize,
        measure: F,
    ) -> Metrics
    where
        F: Fn(&Metrics) -> Option<usize>,
    {
        let total_found = metrics
            .total_items_found
            .unwrap_or_else(|| metrics.item_count());

        let mut out = Metrics {
            secure_score: metrics
                .secure_score
                .as_ref()
                .map(|s| self.optimize_secure_score(s)),
            license: metrics.license.clone(),
            optimized: true,
            total_items_found: Some(total_found),
            ..metrics.clone()
        };

        Self::enforce_budget(&mut out, target_size, &measure);
        out
    }

    /// Filter, cap and truncate the recommendation list.
    pub fn optimize_recommendations(&self, recommendations: &[Recommendation]) -> Vec<Recommendation> {
        recommendations
            .iter()
            .filter(|r| r.has_content())
            .take(self.config.max_recommendations)
            .map(|r| Recommendation {
                description: r
                    .description
                    .as_deref()
                    .map(|d| truncate_chars(d, self.config.max_description_len)),
                ..r.clone()
            })
            .collect()
    }

    fn optimize_secure_score(&self, score: &SecureScoreMetrics) -> SecureScoreMetrics {
        let total_found = score
            .total_controls_found
            .unwrap_or(score.control_scores.len());

        let mut controls = score.control_scores.clone();
        // sort_by is stable: equal maxScore keeps input order
        controls.sort_by(|a, b| b.max_score.total_cmp(&a.max_score));
        controls.truncate(self.config.max_controls);

        let controls: Vec<ControlScore> = controls
            .into_iter()
            .map(|c| ControlScore {
                control_name: truncate_chars(&c.control_name, self.config.max_control_name_len),
                category: truncate_chars(&c.category, self.config.max_category_len),
                implementation_status: truncate_chars(
                    &c.implementation_status,
                    self.config.max_status_len,
                ),
                ..c
            })
            .collect();

        SecureScoreMetrics {
            current_score: score.current_score,
            max_score: score.max_score,
            percentage: score.percentage,
            total_controls_found: Some(total_found),
            controls_stored_count: Some(controls.len()),
            control_scores: controls,
        }
    }

    fn enforce_budget<F>(metrics: &mut Metrics, target_size: usize, measure: &F)
    where
        F: Fn(&Metrics) -> Option<usize>,
    {
        loop {
            // Provenance is part of the measured text
            metrics.items_retained = Some(metrics.item_count());
            if measure(&*metrics).is_some_and(|size| size <= target_size) {
                return;
            }

            if let Some(score) = metrics.secure_score.as_mut() {
                if !score.control_scores.is_empty() {
                    let keep = score.control_scores.len() / 2;
                    score.control_scores.truncate(keep);
                    score.controls_stored_count = Some(keep);
                    continue;
                }
            }

            if let Some(license) = metrics.license.as_mut() {
                if !license.license_details.is_empty() {
                    license.license_details.clear();
                    continue;
                }
            }

            return;
        }
    }
}

/// Cap `text` at `max` characters, marking the cut with "...".
///
/// The result is exactly `max` characters when cut, so cutting again is a
/// no-op.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let mut out: String = text.chars().take(max - 3).collect();
    out.push_str("...");
    out
}
