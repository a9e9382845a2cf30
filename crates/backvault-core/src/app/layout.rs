//! BackupLayout - Tier ごとのディレクトリ配置
//!
//! ```text
//! <backup_root>/hourly/backup-hourly-<ts>-KST.sql
//! <backup_root>/daily/...
//! <backup_root>/weekly/...
//! <backup_root>/monthly/...
//! <backup_root>/yearly/...
//! <dumps_dir>/backup-<tool-defined>.sql     # manual / スクラッチ
//! ```

use std::path::{Path, PathBuf};

use crate::domain::{BackupError, Tier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupLayout {
    backup_root: PathBuf,
    dumps_dir: PathBuf,
}

impl BackupLayout {
    pub fn new(backup_root: impl Into<PathBuf>, dumps_dir: impl Into<PathBuf>) -> Self {
        Self {
            backup_root: backup_root.into(),
            dumps_dir: dumps_dir.into(),
        }
    }

    pub fn backup_root(&self) -> &Path {
        &self.backup_root
    }

    /// Scratch directory the dump tool writes into. Also the manual tier.
    pub fn dumps_dir(&self) -> &Path {
        &self.dumps_dir
    }

    pub fn tier_dir(&self, tier: Tier) -> PathBuf {
        match tier {
            Tier::Manual => self.dumps_dir.clone(),
            other => self.backup_root.join(other.dir_name()),
        }
    }

    /// Create every tier directory that does not exist yet.
    pub async fn ensure_dirs(&self) -> Result<(), BackupError> {
        for tier in Tier::ALL {
            let dir = self.tier_dir(tier);
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|e| BackupError::io(&dir, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_tier_maps_to_dumps_dir() {
        let layout = BackupLayout::new("/srv/backup", "/srv/dumps");
        assert_eq!(layout.tier_dir(Tier::Manual), PathBuf::from("/srv/dumps"));
        assert_eq!(layout.tier_dir(Tier::Weekly), PathBuf::from("/srv/backup/weekly"));
    }

    #[tokio::test]
    async fn ensure_dirs_creates_all_six() {
        let root = tempfile::tempdir().unwrap();
        let layout = BackupLayout::new(root.path().join("backup"), root.path().join("dumps"));
        layout.ensure_dirs().await.unwrap();
        for tier in Tier::ALL {
            assert!(layout.tier_dir(tier).is_dir(), "{tier} dir missing");
        }
        // second call is a no-op
        layout.ensure_dirs().await.unwrap();
    }
}
