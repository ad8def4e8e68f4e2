//! Dose ledger: "on-board" accounting for insulin and carbohydrate.
//!
//! ```text
//!   record_dose ──▶ Ledger<Dose> ──▶ total_insulin_on_board(now)
//!   record_meal ──▶ Ledger<Meal> ──▶ total_carbs_on_board(now)
//!                        ▲
//!                   PurgeTask (one per ledger, own thread)
//! ```
//!
//! Aggregates filter by expiry at query time.  Purging only reclaims
//! memory, so the totals are the same whether or not it has run.

pub mod entry;
pub mod purge;

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::app::ports::ClockPort;
use crate::clock::Timestamp;

pub use entry::{Dose, Expiring, Meal};
pub use purge::PurgeTask;

/// Default purge cadence (real seconds).
pub const DEFAULT_PURGE_INTERVAL: Duration = Duration::from_secs(10);

// ═══════════════════════════════════════════════════════════════
//  Single-kind ledger
// ═══════════════════════════════════════════════════════════════

/// A thread-safe list of entries of one kind.
pub struct Ledger<E> {
    label: &'static str,
    entries: Arc<Mutex<Vec<E>>>,
}

impl<E: Expiring> Ledger<E> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Append an entry.
    pub fn record(&self, entry: E) {
        lock(&self.entries).push(entry);
    }

    /// Sum of quantities still on board at `now`.
    pub fn total_on_board(&self, now: Timestamp) -> f64 {
        lock(&self.entries)
            .iter()
            .filter(|e| e.is_active(now))
            .map(Expiring::quantity)
            .sum()
    }

    /// Drop every entry whose end time is before `now`.  Returns the
    /// number removed.
    pub fn purge_expired(&self, now: Timestamp) -> usize {
        purge_entries(&self.entries, now)
    }

    /// Entries held, expired or not.
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl<E: Expiring + Clone> Ledger<E> {
    /// Copy of the entries still on board at `now`.
    pub fn active(&self, now: Timestamp) -> Vec<E> {
        lock(&self.entries)
            .iter()
            .filter(|e| e.is_active(now))
            .cloned()
            .collect()
    }
}

impl<E: Expiring + Send + 'static> Ledger<E> {
    /// Start a background thread purging this ledger against `clock`.
    pub fn spawn_purge<C>(&self, clock: Arc<C>, interval: Duration) -> io::Result<PurgeTask>
    where
        C: ClockPort + Send + Sync + ?Sized + 'static,
    {
        let entries = Arc::clone(&self.entries);
        PurgeTask::spawn(self.label, interval, move || {
            purge_entries(&entries, clock.now())
        })
    }
}

fn lock<E>(entries: &Mutex<Vec<E>>) -> MutexGuard<'_, Vec<E>> {
    // Entries are immutable values; a panic mid-push cannot leave one
    // half-written, so a poisoned list is still consistent.
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

fn purge_entries<E: Expiring>(entries: &Mutex<Vec<E>>, now: Timestamp) -> usize {
    let mut guard = lock(entries);
    let before = guard.len();
    guard.retain(|e| e.end_time() >= now);
    before - guard.len()
}

// ═══════════════════════════════════════════════════════════════
//  Insulin + carbohydrate ledger pair
// ═══════════════════════════════════════════════════════════════

/// The insulin and carbohydrate ledgers plus their purge tasks.
pub struct DoseLedger {
    insulin: Ledger<Dose>,
    carbs: Ledger<Meal>,
    purge_tasks: Vec<PurgeTask>,
}

impl DoseLedger {
    pub fn new() -> Self {
        Self {
            insulin: Ledger::new("insulin"),
            carbs: Ledger::new("carbs"),
            purge_tasks: Vec::new(),
        }
    }

    /// Record an insulin injection of `units` starting at `time`.
    pub fn record_dose(&self, time: Timestamp, units: f64) {
        self.insulin.record(Dose::new(time, units));
    }

    /// Record `carbs` grams eaten at `time`.
    pub fn record_meal(&self, time: Timestamp, carbs: f64) {
        self.carbs.record(Meal::new(time, carbs));
    }

    pub fn total_insulin_on_board(&self, now: Timestamp) -> f64 {
        self.insulin.total_on_board(now)
    }

    pub fn total_carbs_on_board(&self, now: Timestamp) -> f64 {
        self.carbs.total_on_board(now)
    }

    /// Purge both ledgers synchronously.  Returns the total removed.
    pub fn purge_expired(&self, now: Timestamp) -> usize {
        self.insulin.purge_expired(now) + self.carbs.purge_expired(now)
    }

    /// Start one purge thread per ledger.  No-op if already running.
    pub fn start_purge<C>(&mut self, clock: Arc<C>, interval: Duration) -> io::Result<()>
    where
        C: ClockPort + Send + Sync + ?Sized + 'static,
    {
        if !self.purge_tasks.is_empty() {
            return Ok(());
        }
        let insulin_task = self.insulin.spawn_purge(Arc::clone(&clock), interval)?;
        let carbs_task = self.carbs.spawn_purge(clock, interval)?;
        self.purge_tasks = vec![insulin_task, carbs_task];
        Ok(())
    }

    /// Stop and join the purge threads.
    pub fn stop_purge(&mut self) {
        for task in self.purge_tasks.drain(..) {
            task.stop();
        }
    }

    pub fn is_purging(&self) -> bool {
        !self.purge_tasks.is_empty() && self.purge_tasks.iter().all(PurgeTask::is_running)
    }

    pub fn insulin(&self) -> &Ledger<Dose> {
        &self.insulin
    }

    pub fn carbs(&self) -> &Ledger<Meal> {
        &self.carbs
    }
}

impl Default for DoseLedger {
    fn default() -> Self {
        Self::new()
    }
}
