//! # Write Orchestration
//!
//! Walks the write state machine until a stage's entity is accepted by the
//! adapter or the fallback record is rejected too.

use super::*;
use crate::domain::entity::StorageEntity;
use crate::domain::estimator::text_size;
use crate::domain::fallback::build_fallback_record;
use crate::domain::pipeline::{
    next_stage, plan_chunked, plan_fallback, plan_unchunked, stale_properties, stored_status,
    EncodedPayload, StageOutcome, WritePlan, WriteStage,
};
use crate::domain::record::Metrics;
use crate::ports::outbound::WriteMode;
use serde::Serialize;

impl<SA, PS> AssessmentStoreService<SA, PS>
where
    SA: StorageAdapter,
    PS: PayloadSerializer,
{
    pub(crate) fn run_write(&self, record: &AssessmentRecord) -> Result<WriteResult, StoreError> {
        if let Some(field) = record.non_finite_field() {
            return Err(StoreError::SizeEstimation {
                reason: format!("{field} is not a finite number"),
            });
        }
        if i64::try_from(record.timestamp).is_err() {
            return Err(StoreError::SizeEstimation {
                reason: format!("timestamp {} exceeds the storable range", record.timestamp),
            });
        }

        let partition_key = self.config.partition_key.as_str();
        let previous = self.adapter.get(partition_key, &record.id)?;
        let mode = if previous.is_some() {
            WriteMode::Replace
        } else {
            WriteMode::Insert
        };

        let mut stage = WriteStage::Direct;
        let mut optimized: Option<EncodedPayload> = None;
        let mut last_reason = String::new();

        loop {
            let attempt = match stage {
                WriteStage::Direct => {
                    let payload = EncodedPayload {
                        metrics: self.encode(&record.metrics)?,
                        recommendations: self.encode(&record.recommendations)?,
                    };
                    self.log_sizes(stage, &payload);
                    self.plan_single(record, &payload, stage)
                }
                WriteStage::Optimized => {
                    let payload = self.optimized_payload(record)?;
                    self.log_sizes(stage, &payload);
                    let attempt = self.plan_single(record, &payload, stage);
                    optimized = Some(payload);
                    attempt
                }
                WriteStage::Chunked => {
                    let payload = match optimized.take() {
                        Some(payload) => payload,
                        None => self.optimized_payload(record)?,
                    };
                    plan_chunked(
                        partition_key,
                        record,
                        &payload,
                        stored_status(record.status, stage),
                        self.config.max_property_size,
                        self.config.max_chunks,
                    )
                }
                WriteStage::Fallback => Ok(plan_fallback(
                    partition_key,
                    &build_fallback_record(record, &last_reason),
                )),
                WriteStage::Failed => {
                    self.metrics.record_write(stage, 0);
                    tracing::error!(
                        "[store] ❌ Record {} could not be stored: {}",
                        record.id,
                        last_reason
                    );
                    return Err(StoreError::StorageCapacityExceeded {
                        record_id: record.id.clone(),
                        reason: last_reason,
                    });
                }
            };

            let outcome = match attempt {
                Ok(mut plan) => {
                    if stage.is_lossy() {
                        plan.mark_size_limited();
                    }
                    match self.commit(plan, stage, mode, previous.as_ref())? {
                        Ok(result) => return Ok(result),
                        Err(reason) => {
                            last_reason = reason;
                            StageOutcome::Rejected
                        }
                    }
                }
                Err(outcome) => {
                    last_reason = format!("{stage} write: {}", describe(outcome));
                    outcome
                }
            };

            let next = next_stage(stage, outcome);
            tracing::info!(
                "[store] Record {} {} → {} ({})",
                record.id,
                stage,
                next,
                last_reason
            );
            stage = next;
        }
    }

    /// Put the planned entity.
    ///
    /// The inner `Err` carries the reason for a capacity rejection, which
    /// moves the pipeline on. Other adapter errors abort the write.
    fn commit(
        &self,
        plan: WritePlan,
        stage: WriteStage,
        mode: WriteMode,
        previous: Option<&StorageEntity>,
    ) -> Result<Result<WriteResult, String>, StoreError> {
        let stale = previous
            .map(|prev| stale_properties(prev, &plan.entity))
            .unwrap_or_default();
        let row_key = plan.entity.row_key.clone();

        if let Err(source) = self.adapter.put(plan.entity, mode) {
            if !source.is_capacity_violation() {
                return Err(StoreError::Storage { source });
            }
            let rejected = StoreError::StorageRejected { stage, source };
            tracing::warn!("[store] ⚠ {}", rejected);
            return Ok(Err(rejected.to_string()));
        }

        self.metrics.record_write(stage, plan.chunks_used);
        if !stale.is_empty() {
            tracing::debug!(
                "[store] Cleared {} stale properties from {}",
                stale.len(),
                row_key
            );
        }
        if stage.is_lossy() {
            tracing::warn!(
                "[store] ⚠ Record {} stored at {} stage as {}",
                row_key,
                stage,
                plan.status.as_str()
            );
        } else {
            tracing::info!("[store] ✓ Record {} stored", row_key);
        }

        Ok(Ok(WriteResult {
            status: plan.status,
            chunks_used: plan.chunks_used,
            stage,
            stale_properties_cleared: stale.len(),
        }))
    }

    fn plan_single(
        &self,
        record: &AssessmentRecord,
        payload: &EncodedPayload,
        stage: WriteStage,
    ) -> Result<WritePlan, StageOutcome> {
        plan_unchunked(
            &self.config.partition_key,
            record,
            payload,
            stored_status(record.status, stage),
            self.config.max_property_size,
            self.config.max_chunks,
        )
    }

    /// Optimized, minified payload text for `record`.
    fn optimized_payload(&self, record: &AssessmentRecord) -> Result<EncodedPayload, StoreError> {
        let source = Metrics {
            compressed: self.compressor.is_enabled(),
            ..record.metrics.clone()
        };
        let metrics = self.optimizer.optimize_metrics_with(
            &source,
            self.config.chunk_capacity(),
            |m| self.stored_size(m),
        );
        let recommendations = self
            .optimizer
            .optimize_recommendations(&record.recommendations);

        Ok(EncodedPayload {
            metrics: self.compressor.compress(&self.encode(&metrics)?),
            recommendations: self.compressor.compress(&self.encode(&recommendations)?),
        })
    }

    /// Characters `value` occupies once serialized and compressed.
    fn stored_size(&self, value: &Metrics) -> Option<usize> {
        if !self.compressor.is_enabled() {
            return self.serializer.estimate_size(value).ok();
        }
        let text = self.serializer.to_text(value).ok()?;
        Some(text_size(&self.compressor.compress(&text)))
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, StoreError> {
        self.serializer
            .to_text(value)
            .map_err(|e| StoreError::SizeEstimation { reason: e.message })
    }

    fn log_sizes(&self, stage: WriteStage, payload: &EncodedPayload) {
        tracing::debug!(
            "[store] {} payload sizes: metrics={} recommendations={} budget={}",
            stage,
            text_size(&payload.metrics),
            text_size(&payload.recommendations),
            self.config.max_property_size
        );
    }
}

fn describe(outcome: StageOutcome) -> &'static str {
    match outcome {
        StageOutcome::OverFieldBudget => "payload exceeds the property budget",
        StageOutcome::OverChunkCeiling => "payload exceeds the chunk ceiling",
        StageOutcome::Rejected => "rejected by storage",
    }
}
