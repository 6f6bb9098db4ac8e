use std::sync::Mutex;

/// Counters for simulation requests issued by the presenter.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub requested: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub aborted: usize,
    pub replayed: usize,
}

#[derive(Default)]
struct Metrics {
    snapshot: MetricsSnapshot,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut MetricsSnapshot)) {
        if let Ok(mut metrics) = self.inner.lock() {
            apply(&mut metrics.snapshot);
        }
    }

    pub fn record_requested(&self) {
        self.update(|m| m.requested += 1);
    }

    pub fn record_succeeded(&self) {
        self.update(|m| m.succeeded += 1);
    }

    pub fn record_failed(&self) {
        self.update(|m| m.failed += 1);
    }

    pub fn record_aborted(&self) {
        self.update(|m| m.aborted += 1);
    }

    pub fn record_replayed(&self) {
        self.update(|m| m.replayed += 1);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            metrics.snapshot
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
