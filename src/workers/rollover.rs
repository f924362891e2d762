//! Daily rollover worker.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::counter::TallyStore;
use crate::db::{DbError, RecordStore};

/// How a closed-out day is written to the durable store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloverPolicy {
    /// Plain insert. Used when rollover is the only writer for a date;
    /// a collision is a data-integrity error, logged, never fatal.
    SnapshotInsert,
    /// Insert-or-update. Used when the update handler also persists
    /// eagerly, so today's row usually exists before rollover runs.
    ContinuousUpsert,
}

/// Periodically closes out the counters at local-midnight boundaries.
///
/// One long-lived task per process. Each wake computes "today" in the
/// configured zone and asks the counter store to reset; when a rollover
/// happened, the pre-reset totals are persisted for the finished date.
/// Persistence failures are logged and the loop continues: losing one
/// historical row is preferred over losing live counting.
pub struct Rollover {
    shutdown_ctx: CancellationToken,
    store: Arc<TallyStore>,
    records: Arc<RecordStore>,
    timezone: Tz,
    poll_interval: Duration,
    policy: RolloverPolicy,
}

impl Rollover {
    pub fn new(
        ctx: CancellationToken,
        store: Arc<TallyStore>,
        records: Arc<RecordStore>,
        timezone: Tz,
        poll_interval: Duration,
        policy: RolloverPolicy,
    ) -> Arc<Self> {
        Arc::new(Self {
            shutdown_ctx: ctx,
            store,
            records,
            timezone,
            poll_interval,
            policy,
        })
    }

    /// Spawns the worker loop. Exits promptly on shutdown.
    pub fn spawn(self: &Arc<Self>) {
        let worker = Arc::clone(self);

        tokio::task::spawn(async move {
            let mut interval = tokio::time::interval(worker.poll_interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // Skip the first immediate tick to match interval behavior
            interval.tick().await;

            info!(
                component = "rollover",
                event = "started",
                timezone = %worker.timezone,
                poll_interval = ?worker.poll_interval,
                "rollover worker started"
            );

            loop {
                tokio::select! {
                    _ = worker.shutdown_ctx.cancelled() => {
                        info!(
                            component = "rollover",
                            event = "stopped",
                            "rollover worker stopped"
                        );
                        return;
                    }
                    _ = interval.tick() => {
                        worker.run_once(worker.today());
                    }
                }
            }
        });
    }

    /// Current date in the configured zone.
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }

    /// One wake cycle: check the date and persist the closed day, if any.
    ///
    /// If the process slept across several midnights, everything accrued
    /// since the old reset date is still attributed to that date; dates in
    /// between saw no increments and get no rows.
    pub fn run_once(&self, today: NaiveDate) {
        let Some(closed) = self.store.reset_if_rolled_over(today) else {
            return;
        };

        info!(
            component = "rollover",
            event = "day_closed",
            date = %closed.date,
            fresh = closed.fresh,
            rotten = closed.rotten,
            "day rolled over"
        );

        let result = match self.policy {
            RolloverPolicy::SnapshotInsert => {
                self.records.insert_day(closed.date, closed.fresh, closed.rotten)
            }
            RolloverPolicy::ContinuousUpsert => {
                self.records.upsert_day(closed.date, closed.fresh, closed.rotten)
            }
        };

        match result {
            Ok(()) => {}
            Err(DbError::Duplicate(date)) => {
                // Counters are already reset; the existing row wins.
                error!(
                    component = "rollover",
                    event = "duplicate_record",
                    date = %date,
                    "record for closed day already exists"
                );
            }
            Err(e) => {
                // Known risk: the in-memory reset already happened, so this
                // day's row is lost if the store stays unavailable.
                error!(
                    component = "rollover",
                    event = "persist_failed",
                    date = %closed.date,
                    error = %e,
                    "failed to persist closed day"
                );
            }
        }
    }
}
