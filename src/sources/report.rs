//! Non-fatal warning sink for source loaders.

use std::sync::Mutex;

/// Receives warnings about sources that degraded to an empty mapping.
pub trait Reporter: Send + Sync {
    fn warn(&self, source: &str, message: &str);
}

/// Forwards warnings to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn warn(&self, source: &str, message: &str) {
        tracing::warn!("{source}: {message}");
    }
}

/// Collects warnings in memory, formatted as `source: message`.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    warnings: Mutex<Vec<String>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().map(|w| w.clone()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.lock().map(|w| w.is_empty()).unwrap_or(true)
    }
}

impl Reporter for MemoryReporter {
    fn warn(&self, source: &str, message: &str) {
        if let Ok(mut warnings) = self.warnings.lock() {
            warnings.push(format!("{source}: {message}"));
        }
    }
}

impl<R: Reporter + ?Sized> Reporter for std::sync::Arc<R> {
    fn warn(&self, source: &str, message: &str) {
        (**self).warn(source, message)
    }
}
