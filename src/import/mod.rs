//! Controlled, resumable execution of an import batch.
//!
//! Each selected record is submitted to the create-mutation strictly
//! sequentially. Sequential submission bounds load on the backend, keeps
//! the completion order deterministic for the progress counters, and makes
//! "cancel after record N" well-defined. Status is tracked per record by
//! its stable index; all transitions and counter updates flow through a
//! single writer, so no locking is needed on top of the awaited loop.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::bail;
use log::{debug, info, warn};

use crate::api::RecordSubmitter;
use crate::error::SubmitError;
use crate::model::{ImportEntity, ParsedImportRecord};

/// Per-record import state. Absence from the status map means pending.
/// `error` is the only state a retry can leave from; `success` and
/// `skipped` are absorbing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordStatus {
    Pending,
    Importing,
    Success,
    /// The record already exists server-side (duplicate/conflict); counted
    /// separately from failures so the summary does not alarm the user.
    Skipped(String),
    Error(String),
}

impl RecordStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Skipped(_) | Self::Error(_))
    }
}

/// Aggregate counters for the current run. `completed` counts every record
/// that reached a terminal state in this batch, successes and failures
/// alike, and only ever grows during a run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportProgress {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub in_progress: bool,
}

/// Cooperative cancellation handle. The flag is checked between records;
/// an in-flight submission is never aborted mid-request, so no record is
/// left with an ambiguous status.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Callback invoked once per record state transition.
pub type TransitionFn<'a> = &'a mut dyn FnMut(usize, &RecordStatus);

enum CounterMode {
    /// Normal batch processing: every terminal record counts as completed.
    Batch,
    /// Retry of an already-counted record: `completed` stays put and the
    /// prior failure has been un-counted by the caller.
    Retry,
}

#[derive(Default)]
pub struct ImportManager {
    statuses: HashMap<usize, RecordStatus>,
    progress: ImportProgress,
    cancel: CancelToken,
}

impl ImportManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status of a record; records never touched by an import are pending.
    pub fn status(&self, index: usize) -> RecordStatus {
        self.statuses
            .get(&index)
            .cloned()
            .unwrap_or(RecordStatus::Pending)
    }

    pub fn progress(&self) -> &ImportProgress {
        &self.progress
    }

    /// Indices currently in the error state, in ascending order.
    pub fn failed_indices(&self) -> Vec<usize> {
        let mut failed: Vec<usize> = self
            .statuses
            .iter()
            .filter(|(_, status)| matches!(status, RecordStatus::Error(_)))
            .map(|(index, _)| *index)
            .collect();
        failed.sort_unstable();
        failed
    }

    /// Handle for cancelling the in-flight sequential loop from outside it.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Clear all status and progress tracking, e.g. when the caller
    /// discards the current batch for a new file.
    pub fn reset(&mut self) {
        self.statuses.clear();
        self.progress = ImportProgress::default();
        self.cancel.clear();
    }

    /// Import the records at `indices`, one at a time, in the given order.
    ///
    /// Invalid records are left untouched and not counted. Resolves when
    /// every given index reached a terminal state or cancellation took
    /// effect; unprocessed indices then remain pending.
    pub async fn import_records<T: ImportEntity>(
        &mut self,
        records: &[ParsedImportRecord<T>],
        indices: &[usize],
        submitter: &dyn RecordSubmitter,
        on_transition: TransitionFn<'_>,
    ) {
        self.cancel.clear();
        self.progress = ImportProgress {
            total: indices.len(),
            in_progress: true,
            ..ImportProgress::default()
        };
        info!("importing {} records", indices.len());

        for &index in indices {
            if self.cancel.is_cancelled() {
                info!(
                    "import cancelled after {} of {} records",
                    self.progress.completed, self.progress.total
                );
                break;
            }
            let Some(record) = records.iter().find(|r| r.index == index) else {
                warn!("no record with index {index}, skipping");
                continue;
            };
            if !record.is_valid() {
                debug!("record {index} is invalid, skipping submission");
                continue;
            }
            if self.status(index) == RecordStatus::Success {
                debug!("record {index} already imported, skipping");
                continue;
            }
            self.submit_record(record, submitter, CounterMode::Batch, on_transition)
                .await;
        }

        self.progress.in_progress = false;
    }

    /// Re-submit a single record currently in the error state.
    ///
    /// Counters are adjusted incrementally: the prior failure is
    /// un-counted and `completed` stays unchanged, since the record was
    /// already counted by the run that failed it.
    pub async fn retry_record<T: ImportEntity>(
        &mut self,
        records: &[ParsedImportRecord<T>],
        index: usize,
        submitter: &dyn RecordSubmitter,
        on_transition: TransitionFn<'_>,
    ) -> anyhow::Result<()> {
        let RecordStatus::Error(_) = self.status(index) else {
            bail!("record {index} is not in a failed state");
        };
        let Some(record) = records.iter().find(|r| r.index == index) else {
            bail!("no record with index {index}");
        };

        self.progress.failed = self.progress.failed.saturating_sub(1);
        self.progress.in_progress = true;
        self.submit_record(record, submitter, CounterMode::Retry, on_transition)
            .await;
        self.progress.in_progress = false;
        Ok(())
    }

    /// Re-submit every failed record, sequentially, honoring cancellation.
    pub async fn retry_failed<T: ImportEntity>(
        &mut self,
        records: &[ParsedImportRecord<T>],
        submitter: &dyn RecordSubmitter,
        on_transition: TransitionFn<'_>,
    ) {
        let failed = self.failed_indices();
        if failed.is_empty() {
            return;
        }
        info!("retrying {} failed records", failed.len());
        self.cancel.clear();
        self.progress.in_progress = true;
        for index in failed {
            if self.cancel.is_cancelled() {
                info!("retry cancelled");
                break;
            }
            let Some(record) = records.iter().find(|r| r.index == index) else {
                continue;
            };
            self.progress.failed = self.progress.failed.saturating_sub(1);
            self.submit_record(record, submitter, CounterMode::Retry, on_transition)
                .await;
        }
        self.progress.in_progress = false;
    }

    /// The single writer for record transitions and progress counters.
    async fn submit_record<T: ImportEntity>(
        &mut self,
        record: &ParsedImportRecord<T>,
        submitter: &dyn RecordSubmitter,
        mode: CounterMode,
        on_transition: TransitionFn<'_>,
    ) {
        let index = record.index;
        self.transition(index, RecordStatus::Importing, on_transition);

        let result = submitter.submit(T::KIND, record.data.payload()).await;

        if let CounterMode::Batch = mode {
            self.progress.completed += 1;
        }
        let status = match result {
            Ok(_) => RecordStatus::Success,
            Err(SubmitError { message, conflict }) if conflict => {
                self.progress.skipped += 1;
                RecordStatus::Skipped(message)
            }
            Err(e) => {
                self.progress.failed += 1;
                RecordStatus::Error(SubmitError::failure(e.message).message)
            }
        };
        debug!("record {index} -> {status:?}");
        self.transition(index, status, on_transition);
    }

    fn transition(&mut self, index: usize, status: RecordStatus, on_transition: TransitionFn<'_>) {
        on_transition(index, &status);
        self.statuses.insert(index, status);
    }
}
