//! Sinks for per-currency failures

use crate::core::error::RateFailure;
use std::sync::Mutex;
use tracing::warn;

pub trait FailureReporter: Send + Sync {
    fn report(&self, failure: &RateFailure);
}

/// Emits each failure as a structured `tracing` warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl FailureReporter for LogReporter {
    fn report(&self, failure: &RateFailure) {
        warn!(
            currency_code = %failure.currency_code,
            error_kind = %failure.kind,
            "{}",
            failure.message
        );
    }
}

/// Logs failures and keeps them around for the caller to inspect.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    failures: Mutex<Vec<RateFailure>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(&self) -> Vec<RateFailure> {
        self.failures
            .lock()
            .map(|failures| failures.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl FailureReporter for RecordingReporter {
    fn report(&self, failure: &RateFailure) {
        LogReporter.report(failure);
        let mut failures = self
            .failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        failures.push(failure.clone());
    }
}
