//! Latency and outcome reporting for `fingerprint_file` and `curate_results`.
//!
//! No recorder is installed by default, in which case both entry points skip
//! timing altogether.

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::PipelineError;

/// Metrics observer for pipeline stages.
pub trait FingerprintMetrics: Send + Sync {
    /// One file read + fingerprint. `token_count` is zero for header-only
    /// records and failures.
    fn record_fingerprint(
        &self,
        latency: Duration,
        token_count: usize,
        result: Result<(), PipelineError>,
    );

    /// One curation pass. `kept` is the number of results returned.
    fn record_curation(&self, latency: Duration, kept: usize, result: Result<(), PipelineError>);
}

static RECORDER: RwLock<Option<Arc<dyn FingerprintMetrics>>> = RwLock::new(None);

/// Install or clear the global pipeline metrics recorder.
pub fn set_fingerprint_metrics(recorder: Option<Arc<dyn FingerprintMetrics>>) {
    *RECORDER.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = recorder;
}

pub(crate) struct MetricsSpan {
    recorder: Arc<dyn FingerprintMetrics>,
    start: Instant,
}

impl MetricsSpan {
    pub(crate) fn start() -> Option<Self> {
        let recorder = RECORDER
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        recorder.map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    pub(crate) fn record_fingerprint(self, token_count: usize, result: Result<(), PipelineError>) {
        self.recorder
            .record_fingerprint(self.start.elapsed(), token_count, result);
    }

    pub(crate) fn record_curation(self, kept: usize, result: Result<(), PipelineError>) {
        self.recorder
            .record_curation(self.start.elapsed(), kept, result);
    }
}
