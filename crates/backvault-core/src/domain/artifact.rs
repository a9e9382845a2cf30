//! BackupArtifact - 保持されている 1 つのダンプファイル
//!
//! 書き込み後は不変。識別子は絶対パスです。

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use super::Tier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupArtifact {
    pub tier: Tier,
    pub filename: String,
    pub path: PathBuf,
    /// File mtime.
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
}

impl BackupArtifact {
    /// Size rendered for menus (`512 B`, `1.5 KB`, `12.0 MB`).
    pub fn display_size(&self) -> String {
        const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
        if self.size_bytes < 1024 {
            return format!("{} B", self.size_bytes);
        }
        let mut value = self.size_bytes as f64 / 1024.0;
        let mut unit = 0;
        while value >= 1024.0 && unit < UNITS.len() - 1 {
            value /= 1024.0;
            unit += 1;
        }
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// `backup-*.sql`
pub fn is_backup_file_name(name: &str) -> bool {
    name.len() > "backup-.sql".len() && name.starts_with("backup-") && name.ends_with(".sql")
}
