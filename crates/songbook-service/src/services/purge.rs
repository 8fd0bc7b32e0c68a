//! Purge scheduler
//!
//! Periodically removes accounts whose grace period has elapsed, together
//! with every song they own. Each candidate is re-claimed and deleted in its
//! own transaction, so an account cancelled after the candidate snapshot
//! survives, and a failure on one candidate does not stop the sweep.

use std::time::Duration;

use chrono::{DateTime, Utc};
use songbook_core::traits::PurgeOutcome;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Default interval between sweeps.
pub const DEFAULT_PURGE_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Tally of one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeReport {
    /// Ids in the snapshot
    pub candidates: usize,
    /// Accounts deleted together with their songs
    pub purged: usize,
    /// Candidates no longer due when re-claimed
    pub skipped: usize,
    /// Candidates whose transaction failed; retried next sweep
    pub failed: usize,
    pub songs_deleted: u64,
}

/// Background sweep over accounts pending deletion
pub struct PurgeScheduler {
    ctx: ServiceContext,
    interval: Duration,
}

impl PurgeScheduler {
    pub fn new(ctx: ServiceContext) -> Self {
        Self {
            ctx,
            interval: DEFAULT_PURGE_INTERVAL,
        }
    }

    /// Override the sweep interval. Must be non-zero.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one sweep as of `now`.
    ///
    /// Only the candidate query can fail the sweep as a whole.
    #[instrument(skip(self))]
    pub async fn run_once(&self, now: DateTime<Utc>) -> ServiceResult<PurgeReport> {
        let repo = self.ctx.account_repo();
        let candidates = repo
            .find_purge_candidates(now, self.ctx.settings().purge_batch_size)
            .await?;

        let mut report = PurgeReport {
            candidates: candidates.len(),
            ..PurgeReport::default()
        };

        for account_id in candidates {
            match repo.purge_if_due(account_id, now).await {
                Ok(PurgeOutcome::Purged { songs_deleted }) => {
                    info!(account_id = %account_id, songs_deleted, "Account purged");
                    report.purged += 1;
                    report.songs_deleted += songs_deleted;
                }
                Ok(PurgeOutcome::NotClaimed) => {
                    debug!(account_id = %account_id, "Purge candidate no longer due, skipped");
                    report.skipped += 1;
                }
                Err(e) => {
                    error!(account_id = %account_id, error = %e, "Failed to purge account");
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }

    async fn run_cycle(&self) {
        debug!("Starting purge sweep");

        match self.run_once(self.ctx.now()).await {
            Ok(report) if report.candidates > 0 => info!(
                candidates = report.candidates,
                purged = report.purged,
                skipped = report.skipped,
                failed = report.failed,
                songs_deleted = report.songs_deleted,
                "Purge sweep finished"
            ),
            Ok(_) => debug!("Purge sweep found nothing due"),
            Err(e) => warn!(error = %e, "Purge sweep failed"),
        }
    }

    /// Start the sweep loop as a background task.
    ///
    /// The first sweep runs immediately. A sweep always finishes before the
    /// next tick is taken, and ticks missed while sweeping are skipped.
    pub fn start(self) -> PurgeSchedulerHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!(interval_secs = self.interval.as_secs(), "Purge scheduler started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => self.run_cycle().await,
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            info!("Purge scheduler stopped");
        });

        PurgeSchedulerHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Handle to a running [`PurgeScheduler`]
pub struct PurgeSchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PurgeSchedulerHandle {
    /// Stop the loop, waiting for an in-flight sweep to finish
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            warn!(error = %e, "Purge scheduler task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
