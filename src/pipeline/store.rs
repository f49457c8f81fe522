//! The raw collection of payment records and how it is (re)loaded from the backend.

use crate::api::{Backend, Resource};
use crate::error::Res;
use crate::model::{decode_batch, Record};
use anyhow::Context;
use tracing::{debug, warn};

/// Identifies one reload request. Tickets increase in the order reloads are started.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub struct ReloadTicket(u64);

/// What happened to a completed reload.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ReloadOutcome {
    /// The store now holds this many records.
    Applied(usize),
    /// A reload that was started later has already been applied, so this result was dropped.
    Stale,
}

/// Holds the raw records. The collection is only ever replaced wholesale: a failed reload leaves
/// it untouched, and a successful one swaps in the complete new batch.
#[derive(Debug, Default, Clone)]
pub struct RecordStore {
    records: Vec<Record>,
    next_ticket: u64,
    applied: Option<ReloadTicket>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Whether any reload has succeeded yet.
    pub fn is_loaded(&self) -> bool {
        self.applied.is_some()
    }

    /// Starts a reload. Pass the ticket to `finish_reload` together with the fetch result.
    pub fn begin_reload(&mut self) -> ReloadTicket {
        let ticket = ReloadTicket(self.next_ticket);
        self.next_ticket += 1;
        ticket
    }

    /// Completes a reload. On error the records are left as they were and the error is returned.
    /// When reloads overlap, the one that was started last wins regardless of which finishes last.
    pub fn finish_reload(
        &mut self,
        ticket: ReloadTicket,
        result: Res<Vec<Record>>,
    ) -> Res<ReloadOutcome> {
        let records = result.context("Failed to reload payments, keeping the previous list")?;
        if self.applied.is_some_and(|applied| ticket < applied) {
            debug!("Dropping stale reload {ticket:?}, {:?} is newer", self.applied);
            return Ok(ReloadOutcome::Stale);
        }
        self.records = records;
        self.applied = Some(ticket);
        Ok(ReloadOutcome::Applied(self.records.len()))
    }

    /// Fetches payments from `backend` and replaces the store's contents. No retry is attempted.
    pub async fn load(&mut self, backend: &mut (dyn Backend + Send)) -> Res<&[Record]> {
        let ticket = self.begin_reload();
        let result = fetch_payments(backend).await;
        if let Err(e) = &result {
            warn!("Reload failed: {e:#}");
        }
        self.finish_reload(ticket, result)?;
        Ok(self.records())
    }
}

/// Lists and decodes payments. Entries that are not payment objects are skipped.
pub(crate) async fn fetch_payments(backend: &mut (dyn Backend + Send)) -> Res<Vec<Record>> {
    let values = backend.list(Resource::Payments).await?;
    let fetched = values.len();
    let records: Vec<Record> = decode_batch("payment", values);
    debug!("Decoded {} of {fetched} payments", records.len());
    Ok(records)
}
