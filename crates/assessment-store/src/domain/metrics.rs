//! # Store Metrics
//!
//! Counters for write stages and read outcomes.
//!
//! ## Metrics Exported
//!
//! - Writes completed per stage (direct, optimized, chunked, fallback)
//! - Writes that failed permanently
//! - Chunk properties written
//! - Reads and partial reads

use crate::domain::pipeline::WriteStage;
use std::sync::atomic::{AtomicU64, Ordering};

/// Combined store metrics
#[derive(Debug, Default)]
pub struct StoreMetricsCollector {
    pub direct_writes: AtomicU64,
    pub optimized_writes: AtomicU64,
    pub chunked_writes: AtomicU64,
    pub fallback_writes: AtomicU64,
    /// Writes that ended in `StorageCapacityExceeded`
    pub failed_writes: AtomicU64,
    pub chunks_written: AtomicU64,
    pub reads: AtomicU64,
    /// Reads that returned `partial = true`
    pub partial_reads: AtomicU64,
}

impl StoreMetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a write that ended at `stage`; `Failed` counts a permanent failure
    pub fn record_write(&self, stage: WriteStage, chunks: usize) {
        let counter = match stage {
            WriteStage::Direct => &self.direct_writes,
            WriteStage::Optimized => &self.optimized_writes,
            WriteStage::Chunked => &self.chunked_writes,
            WriteStage::Fallback => &self.fallback_writes,
            WriteStage::Failed => &self.failed_writes,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.chunks_written
            .fetch_add(chunks as u64, Ordering::Relaxed);
    }

    pub fn record_read(&self, partial: bool) {
        self.reads.fetch_add(1, Ordering::Relaxed);
        if partial {
            self.partial_reads.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Writes that lost detail (optimized, chunked or fallback)
    pub fn degraded_writes(&self) -> u64 {
        self.optimized_writes.load(Ordering::Relaxed)
            + self.chunked_writes.load(Ordering::Relaxed)
            + self.fallback_writes.load(Ordering::Relaxed)
    }

    /// Export as Prometheus-style metrics string
    pub fn export_prometheus(&self) -> String {
        let stage = |name: &str, counter: &AtomicU64| {
            format!(
                "assessment_store_writes_total{{stage=\"{}\"}} {}\n",
                name,
                counter.load(Ordering::Relaxed)
            )
        };

        let mut out = String::from(
            "# HELP assessment_store_writes_total Record writes by pipeline stage\n\
             # TYPE assessment_store_writes_total counter\n",
        );
        out.push_str(&stage("direct", &self.direct_writes));
        out.push_str(&stage("optimized", &self.optimized_writes));
        out.push_str(&stage("chunked", &self.chunked_writes));
        out.push_str(&stage("fallback", &self.fallback_writes));
        out.push_str(&stage("failed", &self.failed_writes));
        out.push_str(&format!(
            "# HELP assessment_store_chunks_written_total Chunk properties written\n\
             # TYPE assessment_store_chunks_written_total counter\n\
             assessment_store_chunks_written_total {}\n\
             # HELP assessment_store_reads_total Record reads\n\
             # TYPE assessment_store_reads_total counter\n\
             assessment_store_reads_total {}\n\
             # HELP assessment_store_partial_reads_total Reads returning partial data\n\
             # TYPE assessment_store_partial_reads_total counter\n\
             assessment_store_partial_reads_total {}\n",
            self.chunks_written.load(Ordering::Relaxed),
            self.reads.load(Ordering::Relaxed),
            self.partial_reads.load(Ordering::Relaxed),
        ));
        out
    }
}
