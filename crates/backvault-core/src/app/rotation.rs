//! Rotation scheduler - カデンスごとにダンプと剪定を駆動する
//!
//! | ジョブ  | カデンス (KST)          | 書き込み先                         | 剪定            |
//! |---------|-------------------------|------------------------------------|-----------------|
//! | Hourly  | 04/08/12/16/20 時       | hourly                             | hourly → 6      |
//! | Daily   | 毎日 0 時               | hourly + daily（同じタイムスタンプ） | hourly, daily   |
//! | Weekly  | 日曜 0 時               | weekly                             | weekly → 12     |
//! | Monthly | 1 日 0 時               | monthly（四半期末月は + yearly）     | monthly → 12    |
//!
//! 0 時の hourly は Daily のカスケードで書かれるので、Hourly のカデンスには含めません。
//! yearly は剪定しません（無期限・手動管理）。
//!
//! 1 サイクル（書き込み + 剪定）は 1 つの直列化単位です。
//! あるサイクルの失敗はログに残し、他のサイクルには影響させません。

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Datelike, Utc, Weekday};
use tokio::sync::{Mutex, watch};
use tokio::time::MissedTickBehavior;

use super::DumpExecutor;
use super::retention::{PruneSummary, prune};
use super::scheduler::{Cadence, Scheduler};
use crate::domain::{BackupArtifact, BackupError, Tier, file_timestamp, to_kst};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationJob {
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

impl RotationJob {
    pub const ALL: [RotationJob; 4] = [
        RotationJob::Hourly,
        RotationJob::Daily,
        RotationJob::Weekly,
        RotationJob::Monthly,
    ];

    pub fn cadence(&self) -> Cadence {
        match self {
            RotationJob::Hourly => Cadence::Hours(vec![4, 8, 12, 16, 20]),
            RotationJob::Daily => Cadence::Daily,
            RotationJob::Weekly => Cadence::Weekly(Weekday::Sun),
            RotationJob::Monthly => Cadence::Monthly,
        }
    }

    /// Tiers one cycle writes into, cascades included.
    pub fn target_tiers(&self, now: DateTime<Utc>) -> Vec<Tier> {
        match self {
            RotationJob::Hourly => vec![Tier::Hourly],
            RotationJob::Daily => vec![Tier::Hourly, Tier::Daily],
            RotationJob::Weekly => vec![Tier::Weekly],
            RotationJob::Monthly if is_quarter_end(now) => vec![Tier::Monthly, Tier::Yearly],
            RotationJob::Monthly => vec![Tier::Monthly],
        }
    }
}

/// March, June, September or December in KST.
pub fn is_quarter_end(now: DateTime<Utc>) -> bool {
    matches!(to_kst(now).month(), 3 | 6 | 9 | 12)
}

#[derive(Debug, Clone)]
pub struct CycleReport {
    pub job: RotationJob,
    pub timestamp: String,
    pub written: Vec<BackupArtifact>,
    pub pruned: Vec<(Tier, PruneSummary)>,
}

pub struct RotationScheduler {
    executor: Arc<DumpExecutor>,
    cycle: Mutex<()>,
}

impl RotationScheduler {
    pub fn new(executor: Arc<DumpExecutor>) -> Self {
        Self {
            executor,
            cycle: Mutex::new(()),
        }
    }

    pub fn executor(&self) -> &Arc<DumpExecutor> {
        &self.executor
    }

    /// Cadence table for all rotation jobs, starting at `start`.
    pub fn schedule(start: DateTime<Utc>) -> Scheduler<RotationJob> {
        let mut scheduler = Scheduler::new(start);
        for job in RotationJob::ALL {
            scheduler.add(job.cadence(), job);
        }
        scheduler
    }

    /// One write + prune cycle for `job` as if triggered at `now`.
    pub async fn run_cycle(
        &self,
        job: RotationJob,
        now: DateTime<Utc>,
    ) -> Result<CycleReport, BackupError> {
        let _cycle = self.cycle.lock().await;

        let timestamp = file_timestamp(now);
        let tiers = job.target_tiers(now);
        tracing::info!(?job, %timestamp, ?tiers, "rotation cycle started");

        let written = self
            .executor
            .run_dump_into(&tiers, Some(&timestamp))
            .await?;

        let layout = self.executor.layout();
        let policy = self.executor.policy();
        let mut pruned = Vec::new();
        for &tier in &tiers {
            let Some(keep) = policy.keep_count(tier) else {
                continue;
            };
            match prune(tier, &layout.tier_dir(tier), keep).await {
                Ok(summary) => pruned.push((tier, summary)),
                Err(e) => tracing::warn!(%tier, error = %e, "prune after write failed"),
            }
        }

        tracing::info!(?job, %timestamp, written = written.len(), "rotation cycle finished");
        Ok(CycleReport {
            job,
            timestamp,
            written,
            pruned,
        })
    }

    /// Run every job due at `now`. Failures are logged and do not stop later jobs.
    pub async fn dispatch(
        &self,
        schedule: &mut Scheduler<RotationJob>,
        now: DateTime<Utc>,
    ) -> Vec<(RotationJob, Result<CycleReport, BackupError>)> {
        let mut results = Vec::new();
        for job in schedule.tick(now) {
            let result = self.run_cycle(job, now).await;
            if let Err(e) = &result {
                tracing::warn!(?job, error = %e, "rotation cycle failed");
            }
            results.push((job, result));
        }
        results
    }

    /// Poll the cadence table until `shutdown` flips to true or its sender is dropped.
    pub async fn run(&self, poll_interval: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut schedule = Self::schedule(self.executor.now());
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        if let Some(next) = schedule.next_fire() {
            tracing::info!(next = %to_kst(next), "rotation scheduler started");
        }

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                _ = ticker.tick() => {}
            }

            let now = self.executor.now();
            self.dispatch(&mut schedule, now).await;
        }
        tracing::info!("rotation scheduler stopped");
    }
}
