//! Monotonic application of pipeline reports onto graph state.
//!
//! Submissions are not de-duplicated: a second submit while one is in
//! flight simply starts another request, and nothing guarantees which
//! completes first. Each completion is therefore treated as a full-state
//! replacement, ordered by a ticket taken at submission time: a report
//! older than the newest one already applied is discarded instead of
//! overwriting fresher results.

use serde_json::Value;

use super::report::PipelineReport;
use crate::graph::GraphStore;

/// Ordering token for one submission, taken before the request is sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SubmissionTicket(u64);

/// What happened when a report was offered for application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The report was fresh and error-free; `fields_written` output fields
    /// were folded into the store.
    Applied { fields_written: usize },
    /// The report was fresh but carried a service-side validation error;
    /// it becomes the latest resolved result, and no fields were written.
    AcceptedWithError,
    /// A newer report was already applied; this one was discarded whole.
    Stale,
}

/// Hands out submission tickets and folds reports back last-writer-wins,
/// where "last" means latest *issued*, not latest *completed*.
#[derive(Clone, Debug, Default)]
pub struct OutputApplier {
    next_ticket: u64,
    applied: u64,
}

impl OutputApplier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the ticket for a submission about to be sent.
    pub fn ticket(&mut self) -> SubmissionTicket {
        self.next_ticket += 1;
        SubmissionTicket(self.next_ticket)
    }

    /// Offer a completed report for application.
    ///
    /// Fresh, error-free reports write each `{nodeId: text}` output entry
    /// into that node's `output` field via
    /// [`GraphStore::update_node_field`]; entries naming unknown nodes are
    /// skipped. Reports carrying a service error are accepted (they are the
    /// most recent resolved result) but fold nothing.
    pub fn apply(
        &mut self,
        store: &mut GraphStore,
        report: &PipelineReport,
        ticket: SubmissionTicket,
    ) -> ApplyOutcome {
        if ticket.0 <= self.applied {
            tracing::debug!(ticket = ticket.0, applied = self.applied, "stale report discarded");
            return ApplyOutcome::Stale;
        }
        self.applied = ticket.0;

        if let Some(error) = &report.error {
            tracing::warn!(%error, "pipeline report carried a validation error");
            return ApplyOutcome::AcceptedWithError;
        }

        let mut fields_written = 0;
        for (node_id, text) in report.output_entries() {
            if store.update_node_field(node_id, "output", Value::String(text.to_string())) {
                fields_written += 1;
            } else {
                tracing::warn!(%node_id, "report output names a node not in the graph");
            }
        }
        ApplyOutcome::Applied { fields_written }
    }
}
