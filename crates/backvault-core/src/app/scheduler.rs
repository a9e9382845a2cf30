//! Scheduler - (Cadence, Job) の組を持ち、tick ごとに実行すべきジョブを返す
//!
//! 実時間を待たずに「今」を渡して呼べるので、カデンスの判定を単体テストできます。
//! カデンスはすべて KST の正時で評価します。

use chrono::{DateTime, Datelike, TimeDelta, Timelike, Utc, Weekday};

use crate::domain::to_kst;

/// Longest gap between two firings of any cadence, in hours (a 31-day month plus slack).
const SEARCH_HORIZON_HOURS: i64 = 24 * 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cadence {
    /// Top of each listed KST hour.
    Hours(Vec<u32>),
    /// KST midnight.
    Daily,
    /// KST midnight on the given weekday.
    Weekly(Weekday),
    /// KST midnight on the 1st.
    Monthly,
}

impl Cadence {
    fn fires_at(&self, at: DateTime<Utc>) -> bool {
        let local = to_kst(at);
        match self {
            Cadence::Hours(hours) => hours.contains(&local.hour()),
            Cadence::Daily => local.hour() == 0,
            Cadence::Weekly(weekday) => local.hour() == 0 && local.weekday() == *weekday,
            Cadence::Monthly => local.hour() == 0 && local.day() == 1,
        }
    }

    /// First firing instant strictly after `after`.
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let top_of_hour = after
            .with_minute(0)
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_nanosecond(0))?;
        (1..=SEARCH_HORIZON_HOURS)
            .map(|h| top_of_hour + TimeDelta::hours(h))
            .find(|candidate| self.fires_at(*candidate))
    }
}

struct Entry<J> {
    cadence: Cadence,
    job: J,
    last_tick: DateTime<Utc>,
}

/// Cooperative cadence table. Owned by a single dispatch loop.
pub struct Scheduler<J> {
    start: DateTime<Utc>,
    entries: Vec<Entry<J>>,
}

impl<J: Clone> Scheduler<J> {
    /// Firings at or before `start` are never reported.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            start,
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, cadence: Cadence, job: J) -> &mut Self {
        self.entries.push(Entry {
            cadence,
            job,
            last_tick: self.start,
        });
        self
    }

    /// Jobs with a firing in `(previous tick, now]`, in registration order.
    ///
    /// Several missed firings of one entry collapse into a single run.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<J> {
        let mut due = Vec::new();
        for entry in &mut self.entries {
            if now <= entry.last_tick {
                continue;
            }
            if entry
                .cadence
                .next_after(entry.last_tick)
                .is_some_and(|next| next <= now)
            {
                due.push(entry.job.clone());
            }
            entry.last_tick = now;
        }
        due
    }

    /// Earliest upcoming firing across all entries.
    pub fn next_fire(&self) -> Option<DateTime<Utc>> {
        self.entries
            .iter()
            .filter_map(|entry| entry.cadence.next_after(entry.last_tick))
            .min()
    }
}
