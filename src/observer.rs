// 📣 Pipeline Observer - progress reporting kept out of the core logic

use std::path::Path;
use tracing::{debug, info, warn};

/// Receives progress notifications. Every method defaults to a no-op, so an
/// observer only implements what it cares about.
pub trait PipelineObserver {
    /// A numbered stage began
    fn stage(&self, _step: usize, _total: usize, _label: &str) {}

    /// A collection of `count` items was loaded or produced
    fn loaded(&self, _what: &str, _count: usize) {}

    /// Periodic extraction progress
    fn progress(&self, _processed: usize, _matched: usize) {}

    /// A matched source food became an output record
    fn converted(&self, _converted: usize, _description: &str) {}

    /// An output file was written
    fn written(&self, _path: &Path, _bytes: u64) {}

    /// Something odd but recoverable
    fn notice(&self, _message: &str) {}
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Forwards notifications to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn stage(&self, step: usize, total: usize, label: &str) {
        info!("[{}/{}] {}", step, total, label);
    }

    fn loaded(&self, what: &str, count: usize) {
        info!(count, "loaded {}", what);
    }

    fn progress(&self, processed: usize, matched: usize) {
        info!(processed, matched, "matching progress");
    }

    fn converted(&self, converted: usize, description: &str) {
        let preview: String = description.chars().take(50).collect();
        debug!(converted, latest = %preview, "converted matches");
    }

    fn written(&self, path: &Path, bytes: u64) {
        info!(bytes, "saved {} ({:.1} KB)", path.display(), bytes as f64 / 1024.0);
    }

    fn notice(&self, message: &str) {
        warn!("{}", message);
    }
}
