//! Dump executor - 外部ダンプを実行し、成果物を Tier ディレクトリへコピーする
//!
//! # フロー
//! 1. KST タイムスタンプを決める（指定がなければ Clock から）
//! 2. DumpRunner でスクラッチディレクトリにダンプを書かせる
//! 3. スクラッチ内で mtime が最新の `backup-*.sql` を「今作られたもの」とみなす
//! 4. 各 Tier ディレクトリへ `backup-{tier}-{ts}-KST.sql` としてコピー（移動ではない）
//! 5. スクラッチを manual の保持数まで剪定
//!
//! 手順 3 は共有ディレクトリの最新ファイルを拾うため、同時実行すると別の
//! ダンプを拾い得ます。すべてのダンプ呼び出しを 1 つの Mutex で直列化しています。

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::BackupLayout;
use super::catalog::list_artifacts;
use super::retention::prune;
use crate::domain::{BackupArtifact, BackupError, RetentionPolicy, Tier, file_timestamp};
use crate::ports::{Clock, DumpRunner};

pub struct DumpExecutor {
    layout: BackupLayout,
    runner: Arc<dyn DumpRunner>,
    clock: Arc<dyn Clock>,
    policy: RetentionPolicy,
    serial: Mutex<()>,
}

impl DumpExecutor {
    pub fn new(
        layout: BackupLayout,
        runner: Arc<dyn DumpRunner>,
        clock: Arc<dyn Clock>,
        policy: RetentionPolicy,
    ) -> Self {
        Self {
            layout,
            runner,
            clock,
            policy,
            serial: Mutex::new(()),
        }
    }

    pub fn layout(&self) -> &BackupLayout {
        &self.layout
    }

    pub fn policy(&self) -> &RetentionPolicy {
        &self.policy
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Dump once into a single tier.
    pub async fn run_dump(
        &self,
        tier: Tier,
        timestamp: Option<&str>,
    ) -> Result<BackupArtifact, BackupError> {
        let mut artifacts = self.run_dump_into(&[tier], timestamp).await?;
        artifacts
            .pop()
            .ok_or_else(|| BackupError::ArtifactNotFound(self.layout.tier_dir(tier)))
    }

    /// Dump once and copy the result into every tier in `tiers` under one timestamp.
    ///
    /// A dump failure aborts before anything is copied, so no tier directory
    /// ever receives a partial file.
    pub async fn run_dump_into(
        &self,
        tiers: &[Tier],
        timestamp: Option<&str>,
    ) -> Result<Vec<BackupArtifact>, BackupError> {
        let _serial = self.serial.lock().await;

        let timestamp = timestamp
            .map(str::to_string)
            .unwrap_or_else(|| file_timestamp(self.clock.now()));
        let scratch = self.layout.dumps_dir();
        tokio::fs::create_dir_all(scratch)
            .await
            .map_err(|e| BackupError::io(scratch, e))?;

        self.runner.run(scratch, &timestamp).await?;

        let produced = list_artifacts(Tier::Manual, scratch)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BackupError::ArtifactNotFound(scratch.to_path_buf()))?;
        tracing::debug!(file = %produced.filename, "dump produced");

        let mut written = Vec::with_capacity(tiers.len());
        for &tier in tiers {
            if tier == Tier::Manual {
                written.push(produced.clone());
                continue;
            }
            let dir = self.layout.tier_dir(tier);
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|e| BackupError::io(&dir, e))?;
            let dest = dir.join(tier.artifact_filename(&timestamp));
            tokio::fs::copy(&produced.path, &dest)
                .await
                .map_err(|e| BackupError::io(&produced.path, e))?;
            let artifact = read_artifact(tier, &dest).await?;
            tracing::info!(%tier, file = %artifact.filename, bytes = artifact.size_bytes, "backup written");
            written.push(artifact);
        }

        if let Some(keep) = self.policy.keep_count(Tier::Manual)
            && let Err(e) = prune(Tier::Manual, scratch, keep).await
        {
            tracing::warn!(error = %e, "failed to prune scratch dumps");
        }

        Ok(written)
    }
}

async fn read_artifact(tier: Tier, path: &Path) -> Result<BackupArtifact, BackupError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| BackupError::io(path, e))?;
    let modified = metadata.modified().map_err(|e| BackupError::io(path, e))?;
    Ok(BackupArtifact {
        tier,
        filename: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        path: path.to_path_buf(),
        created_at: DateTime::<Utc>::from(modified),
        size_bytes: metadata.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::CannedDumpRunner;
    use crate::ports::FixedClock;
    use chrono::TimeZone;

    const DUMP: &str = "CREATE TABLE t (id int);\nINSERT INTO t VALUES (1);\n";

    fn executor(root: &Path, runner: Arc<CannedDumpRunner>) -> DumpExecutor {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 3, 0, 0).unwrap());
        DumpExecutor::new(
            BackupLayout::new(root.join("backup"), root.join("dumps")),
            runner,
            Arc::new(clock),
            RetentionPolicy::default(),
        )
    }

    #[tokio::test]
    async fn copies_dump_into_tier_under_kst_name() {
        let root = tempfile::tempdir().unwrap();
        let runner = Arc::new(CannedDumpRunner::new(DUMP));
        let exec = executor(root.path(), runner.clone());

        let artifact = exec.run_dump(Tier::Daily, None).await.unwrap();

        assert_eq!(artifact.filename, "backup-daily-2024-03-01T12-00-00-KST.sql");
        assert_eq!(artifact.path.parent().unwrap(), exec.layout().tier_dir(Tier::Daily));
        assert_eq!(std::fs::read_to_string(&artifact.path).unwrap(), DUMP);
        // copied, not moved
        assert!(root.path().join("dumps/backup-2024-03-01T12-00-00.sql").exists());
        assert_eq!(runner.runs(), 1);
    }

    #[tokio::test]
    async fn explicit_timestamp_wins_over_clock() {
        let root = tempfile::tempdir().unwrap();
        let exec = executor(root.path(), Arc::new(CannedDumpRunner::new(DUMP)));

        let artifact = exec
            .run_dump(Tier::Weekly, Some("2030-01-01T00-00-00"))
            .await
            .unwrap();
        assert_eq!(artifact.filename, "backup-weekly-2030-01-01T00-00-00-KST.sql");
    }

    #[tokio::test]
    async fn fan_out_runs_the_tool_once() {
        let root = tempfile::tempdir().unwrap();
        let runner = Arc::new(CannedDumpRunner::new(DUMP));
        let exec = executor(root.path(), runner.clone());

        let written = exec
            .run_dump_into(&[Tier::Hourly, Tier::Daily], None)
            .await
            .unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(runner.runs(), 1);
    }

    #[tokio::test]
    async fn manual_tier_returns_the_scratch_file() {
        let root = tempfile::tempdir().unwrap();
        let exec = executor(root.path(), Arc::new(CannedDumpRunner::new(DUMP)));

        let artifact = exec.run_dump(Tier::Manual, None).await.unwrap();
        assert_eq!(artifact.tier, Tier::Manual);
        assert_eq!(artifact.filename, "backup-2024-03-01T12-00-00.sql");
    }

    #[tokio::test]
    async fn failed_dump_leaves_tier_untouched() {
        let root = tempfile::tempdir().unwrap();
        let runner = Arc::new(CannedDumpRunner::new(DUMP));
        runner.set_failing(true);
        let exec = executor(root.path(), runner);

        let err = exec.run_dump(Tier::Daily, None).await.unwrap_err();
        assert!(matches!(err, BackupError::DumpFailed(_)));
        assert!(!exec.layout().tier_dir(Tier::Daily).exists());
    }

    #[tokio::test]
    async fn scratch_is_pruned_to_manual_keep_count() {
        let root = tempfile::tempdir().unwrap();
        let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()));
        let policy = RetentionPolicy {
            manual: 2,
            ..RetentionPolicy::default()
        };
        let exec = DumpExecutor::new(
            BackupLayout::new(root.path().join("backup"), root.path().join("dumps")),
            Arc::new(CannedDumpRunner::new(DUMP)),
            clock,
            policy,
        );

        for hour in 0..4 {
            exec.run_dump(Tier::Hourly, Some(&format!("2024-03-01T0{hour}-00-00")))
                .await
                .unwrap();
        }
        let scratch = list_artifacts(Tier::Manual, exec.layout().dumps_dir())
            .await
            .unwrap();
        assert_eq!(scratch.len(), 2);
    }
}
