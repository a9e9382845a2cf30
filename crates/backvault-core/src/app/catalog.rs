//! Catalog - Tier ディレクトリの一覧（新しい順）
//!
//! ディレクトリはスケジューラ（書き込み側）と選択メニュー（読み取り側）で
//! ロックなしに共有されます。一覧中に剪定で消えたファイルは単に載りません。

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::BackupLayout;
use crate::domain::{BackupArtifact, BackupError, Tier, is_backup_file_name};

/// `backup-*.sql` files in `dir`, newest mtime first. A missing directory is empty.
pub async fn list_artifacts(tier: Tier, dir: &Path) -> Result<Vec<BackupArtifact>, BackupError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(BackupError::io(dir, e)),
    };

    let mut artifacts = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| BackupError::io(dir, e))?
    {
        let filename = entry.file_name().to_string_lossy().into_owned();
        if !is_backup_file_name(&filename) {
            continue;
        }
        let path = entry.path();
        let metadata = match entry.metadata().await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(BackupError::io(&path, e)),
        };
        if !metadata.is_file() {
            continue;
        }
        let modified = metadata.modified().map_err(|e| BackupError::io(&path, e))?;
        artifacts.push(BackupArtifact {
            tier,
            filename,
            path,
            created_at: DateTime::<Utc>::from(modified),
            size_bytes: metadata.len(),
        });
    }

    sort_newest_first(&mut artifacts);
    Ok(artifacts)
}

/// Ties on mtime fall back to the file name, which embeds the timestamp.
pub fn sort_newest_first(artifacts: &mut [BackupArtifact]) {
    artifacts.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.filename.cmp(&a.filename))
    });
}

#[derive(Debug, Clone)]
pub struct TierListing {
    pub tier: Tier,
    pub dir: PathBuf,
    pub artifacts: Vec<BackupArtifact>,
}

/// Snapshot of every tier directory.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    listings: Vec<TierListing>,
}

impl Catalog {
    pub async fn scan(layout: &BackupLayout) -> Result<Self, BackupError> {
        let mut listings = Vec::with_capacity(Tier::ALL.len());
        for tier in Tier::ALL {
            let dir = layout.tier_dir(tier);
            let artifacts = list_artifacts(tier, &dir).await?;
            listings.push(TierListing {
                tier,
                dir,
                artifacts,
            });
        }
        Ok(Self { listings })
    }

    pub fn from_listings(listings: Vec<TierListing>) -> Self {
        Self { listings }
    }

    pub fn listings(&self) -> &[TierListing] {
        &self.listings
    }

    pub fn non_empty(&self) -> Vec<&TierListing> {
        self.listings
            .iter()
            .filter(|listing| !listing.artifacts.is_empty())
            .collect()
    }

    pub fn get(&self, tier: Tier) -> Option<&TierListing> {
        self.listings.iter().find(|listing| listing.tier == tier)
    }

    pub fn count(&self, tier: Tier) -> usize {
        self.get(tier).map_or(0, |listing| listing.artifacts.len())
    }

    pub fn is_empty(&self) -> bool {
        self.listings.iter().all(|listing| listing.artifacts.is_empty())
    }
}
