//! # Store Configuration
//!
//! Size budgets and optimizer limits, injected into the service at
//! construction so tests can vary them deterministically.

use std::env;

/// Hard per-property limit of the backing table store, in characters.
pub const HARD_PROPERTY_LIMIT: usize = 64_000;

/// Default per-property budget, leaving headroom under the hard limit.
pub const DEFAULT_PROPERTY_BUDGET: usize = 50_000;

/// Default ceiling on chunks per logical property.
pub const DEFAULT_MAX_CHUNKS: usize = 200;

/// Default property-count limit of the backing table store.
pub const DEFAULT_MAX_PROPERTIES: usize = 252;

/// Configuration for the record store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Largest property the pipeline will emit, in characters (default: 50,000).
    pub max_property_size: usize,

    /// Chunk ceiling per logical property (default: 200).
    ///
    /// Payloads needing more chunks than this go straight to fallback.
    pub max_chunks: usize,

    /// Partition all assessment rows are written under.
    pub partition_key: String,

    /// Run the lossless minifier after optimization (default: true).
    pub compress_payloads: bool,

    /// Optimizer limits.
    pub optimizer: OptimizerConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_property_size: DEFAULT_PROPERTY_BUDGET,
            max_chunks: DEFAULT_MAX_CHUNKS,
            partition_key: "assessments".to_string(),
            compress_payloads: true,
            optimizer: OptimizerConfig::default(),
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ASSESSMENT_STORE_MAX_PROPERTY_SIZE`: property budget (default: 50000, capped at 64000)
    /// - `ASSESSMENT_STORE_MAX_CHUNKS`: chunk ceiling (default: 200)
    /// - `ASSESSMENT_STORE_PARTITION`: partition key (default: assessments)
    /// - `ASSESSMENT_STORE_COMPRESS`: minify optimized payloads (default: true)
    /// - `ASSESSMENT_STORE_MAX_CONTROLS`: controls kept by the optimizer (default: 50)
    /// - `ASSESSMENT_STORE_MAX_RECOMMENDATIONS`: recommendations kept (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let optimizer = OptimizerConfig {
            max_controls: env_usize("ASSESSMENT_STORE_MAX_CONTROLS")
                .unwrap_or(defaults.optimizer.max_controls),
            max_recommendations: env_usize("ASSESSMENT_STORE_MAX_RECOMMENDATIONS")
                .unwrap_or(defaults.optimizer.max_recommendations),
            ..defaults.optimizer.clone()
        };

        Self {
            max_property_size: env_usize("ASSESSMENT_STORE_MAX_PROPERTY_SIZE")
                .unwrap_or(defaults.max_property_size),
            max_chunks: env_usize("ASSESSMENT_STORE_MAX_CHUNKS").unwrap_or(defaults.max_chunks),
            partition_key: env::var("ASSESSMENT_STORE_PARTITION")
                .unwrap_or(defaults.partition_key),
            compress_payloads: env::var("ASSESSMENT_STORE_COMPRESS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.compress_payloads),
            optimizer,
        }
        .normalized()
    }

    pub fn with_max_property_size(mut self, size: usize) -> Self {
        self.max_property_size = size;
        self.normalized()
    }

    pub fn with_max_chunks(mut self, chunks: usize) -> Self {
        self.max_chunks = chunks;
        self.normalized()
    }

    pub fn with_partition_key(mut self, partition_key: impl Into<String>) -> Self {
        self.partition_key = partition_key.into();
        self
    }

    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress_payloads = enabled;
        self
    }

    pub fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Total characters a chunked property may hold.
    pub fn chunk_capacity(&self) -> usize {
        self.max_property_size.saturating_mul(self.max_chunks)
    }

    fn normalized(mut self) -> Self {
        self.max_property_size = self.max_property_size.clamp(1, HARD_PROPERTY_LIMIT);
        self.max_chunks = self.max_chunks.max(1);
        self
    }
}

fn env_usize(key: &str) -> Option<usize> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Limits applied by the optimizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizerConfig {
    /// Controls kept, highest `maxScore` first (default: 50).
    pub max_controls: usize,
    /// Recommendations kept (default: 10).
    pub max_recommendations: usize,
    pub max_control_name_len: usize,
    pub max_category_len: usize,
    pub max_status_len: usize,
    pub max_description_len: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_controls: 50,
            max_recommendations: 10,
            max_control_name_len: 100,
            max_category_len: 50,
            max_status_len: 50,
            max_description_len: 500,
        }
    }
}

/// Limits enforced by a table store adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLimits {
    /// Per-property size limit in characters.
    pub max_property_size: usize,
    /// Properties per entity, excluding partition and row key.
    pub max_properties: usize,
}

impl Default for TableLimits {
    fn default() -> Self {
        Self {
            max_property_size: HARD_PROPERTY_LIMIT,
            max_properties: DEFAULT_MAX_PROPERTIES,
        }
    }
}

impl TableLimits {
    pub fn new(max_property_size: usize, max_properties: usize) -> Self {
        Self {
            max_property_size,
            max_properties,
        }
    }
}
