//! ScanSimulator — timed, cancellable mock menu analysis.
//!
//! State machine: Idle → Scanning → Complete, Scanning → Idle on cancel, and
//! Complete → Scanning only through a fresh `start_scan`. The timer runs on a
//! background task that reports a `ScanCompletion` on the channel given to
//! `new()`; completions from a cancelled or superseded scan are discarded.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::classifier::Classifier;
use super::model::ScanResult;
use crate::profile::ActiveFilters;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Scanning,
    Complete(ScanResult),
}

/// A finished timer, waiting to be applied.
#[derive(Debug)]
pub struct ScanCompletion {
    generation: u64,
    result: ScanResult,
}

pub struct ScanSimulator {
    classifier: Arc<dyn Classifier>,
    latency: Duration,
    tx: mpsc::UnboundedSender<ScanCompletion>,
    state: ScanState,
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl ScanSimulator {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        latency: Duration,
        tx: mpsc::UnboundedSender<ScanCompletion>,
    ) -> Self {
        Self {
            classifier,
            latency,
            tx,
            state: ScanState::Idle,
            generation: 0,
            task: None,
        }
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn is_scanning(&self) -> bool {
        self.state == ScanState::Scanning
    }

    /// The most recent completed result, if it has not been replaced.
    pub fn result(&self) -> Option<&ScanResult> {
        match &self.state {
            ScanState::Complete(result) => Some(result),
            _ => None,
        }
    }

    /// Begin a scan against a snapshot of `filters`.
    ///
    /// Returns `false` without doing anything if a scan is already running.
    /// Must be called from within a tokio runtime.
    pub fn start_scan(&mut self, filters: ActiveFilters) -> bool {
        if self.is_scanning() {
            debug!("Scan already in progress");
            return false;
        }

        self.generation += 1;
        self.state = ScanState::Scanning;

        let generation = self.generation;
        let classifier = Arc::clone(&self.classifier);
        let latency = self.latency;
        let tx = self.tx.clone();
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(latency).await;
            let result = ScanResult::new(classifier.classify(&filters));
            let _ = tx.send(ScanCompletion { generation, result });
        }));

        info!(generation, latency_ms = latency.as_millis() as u64, "Scan started");
        true
    }

    /// Abort the running scan and drop its pending result.
    ///
    /// Returns whether a scan was in flight. A completed result is kept.
    pub fn cancel_scan(&mut self) -> bool {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        if !self.is_scanning() {
            return false;
        }

        self.generation += 1;
        self.state = ScanState::Idle;
        info!("Scan cancelled");
        true
    }

    /// Apply a finished timer. Returns the result if it belongs to the running scan.
    pub fn complete(&mut self, completion: ScanCompletion) -> Option<&ScanResult> {
        if completion.generation != self.generation || !self.is_scanning() {
            debug!(
                generation = completion.generation,
                current = self.generation,
                "Discarding stale scan result"
            );
            return None;
        }

        self.task = None;
        info!(
            scan_id = %completion.result.id,
            safe = completion.result.safe_items.len(),
            risky = completion.result.risky_items.len(),
            "Scan complete"
        );
        self.state = ScanState::Complete(completion.result);
        self.result()
    }

    /// Forget the last result and return to idle. Running scans are cancelled.
    pub fn reset(&mut self) {
        self.cancel_scan();
        self.state = ScanState::Idle;
    }
}

impl Drop for ScanSimulator {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
