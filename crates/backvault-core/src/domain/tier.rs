//! Tier - バックアップの保持区分
//!
//! 各 Tier はディレクトリ 1 つと保持数 1 つに対応します。
//! - hourly / daily / weekly / monthly / yearly: ローテーション対象
//! - manual: ダンプツールが直接書き込むスクラッチ領域（`dumps/`）

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Manual,
}

impl Tier {
    /// Menu / enumeration order. Rotation tiers first, scratch last.
    pub const ALL: [Tier; 6] = [
        Tier::Hourly,
        Tier::Daily,
        Tier::Weekly,
        Tier::Monthly,
        Tier::Yearly,
        Tier::Manual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Hourly => "hourly",
            Tier::Daily => "daily",
            Tier::Weekly => "weekly",
            Tier::Monthly => "monthly",
            Tier::Yearly => "yearly",
            Tier::Manual => "manual",
        }
    }

    /// Directory name of the tier. The manual tier lives in the scratch
    /// directory and is resolved by `BackupLayout`, not by this name.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Tier::Manual => "dumps",
            other => other.as_str(),
        }
    }

    /// Filename written into this tier for a given KST timestamp.
    ///
    /// `backup-{type}-{timestamp}-KST.sql`
    pub fn artifact_filename(&self, timestamp: &str) -> String {
        format!("backup-{}-{}-KST.sql", self.as_str(), timestamp)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown tier '{0}' (expected hourly, daily, weekly, monthly, yearly or manual)")]
pub struct ParseTierError(String);

impl FromStr for Tier {
    type Err = ParseTierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseTierError(s.to_string()))
    }
}

/// RetentionPolicy は Tier ごとの保持数
///
/// プロセス全体で共有され、起動後は読み取り専用です。
/// `None` は無制限（手動管理）を表します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub hourly: usize,
    pub daily: usize,
    pub weekly: usize,
    pub monthly: usize,
    pub manual: usize,
}

impl RetentionPolicy {
    pub fn keep_count(&self, tier: Tier) -> Option<usize> {
        match tier {
            Tier::Hourly => Some(self.hourly),
            Tier::Daily => Some(self.daily),
            Tier::Weekly => Some(self.weekly),
            Tier::Monthly => Some(self.monthly),
            Tier::Yearly => None,
            Tier::Manual => Some(self.manual),
        }
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            hourly: 6,
            daily: 30,
            weekly: 12,
            monthly: 12,
            manual: 30,
        }
    }
}
