//! Retention pruner - 保持数を超えた古いアーティファクトを削除する
//!
//! 書き込み直後に同期的に走ります。単独では走りません。
//! 削除は物理削除です。1 ファイルの削除失敗はログに残して次へ進みます。

use std::path::Path;

use super::catalog::list_artifacts;
use crate::domain::{BackupArtifact, BackupError, Tier};

/// Summary of one pruning pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneSummary {
    pub removed: usize,
    pub kept: usize,
    pub failed: usize,
}

/// Delete every `backup-*.sql` in `dir` beyond the `keep_count` newest.
///
/// Only a failure to list the directory is an error.
pub async fn prune(tier: Tier, dir: &Path, keep_count: usize) -> Result<PruneSummary, BackupError> {
    let artifacts = list_artifacts(tier, dir).await?;
    let kept = artifacts.len().min(keep_count);
    let mut summary = remove_artifacts(tier, &artifacts[kept..]).await;
    summary.kept = kept;
    Ok(summary)
}

/// Remove each artifact in turn. A failed removal is logged and counted, never fatal.
async fn remove_artifacts(tier: Tier, doomed: &[BackupArtifact]) -> PruneSummary {
    let mut summary = PruneSummary::default();
    for artifact in doomed {
        match tokio::fs::remove_file(&artifact.path).await {
            Ok(()) => {
                tracing::info!(%tier, file = %artifact.filename, "pruned old backup");
                summary.removed += 1;
            }
            Err(e) => {
                tracing::warn!(
                    %tier,
                    path = %artifact.path.display(),
                    error = %e,
                    "failed to remove old backup"
                );
                summary.failed += 1;
            }
        }
    }
    summary
}
