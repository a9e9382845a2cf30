//! BackupService - ホストアプリケーションに公開する窓口
//!
//! - 手動バックアップ: 指定 Tier（既定は daily）に 1 回書き込み、完了メッセージを返す。
//!   カデンスの時計には触れず、カスケードもしない
//! - 現在のアーティファクト数の照会

use std::sync::Arc;

use super::catalog::Catalog;
use super::dump::DumpExecutor;
use super::status::TierCounts;
use crate::domain::{BackupError, Tier, display_timestamp};

pub struct BackupService {
    executor: Arc<DumpExecutor>,
}

impl BackupService {
    pub fn new(executor: Arc<DumpExecutor>) -> Self {
        Self { executor }
    }

    /// Run a manual backup into `tier` (daily when `None`).
    pub async fn manual_backup(&self, tier: Option<Tier>) -> Result<String, BackupError> {
        let tier = tier.unwrap_or(Tier::Daily);
        tracing::info!(%tier, "manual backup requested");
        let artifact = self.executor.run_dump(tier, None).await?;
        Ok(format!(
            "Manual {tier} backup completed: {} ({}, {})",
            artifact.path.display(),
            artifact.display_size(),
            display_timestamp(artifact.created_at)
        ))
    }

    pub async fn artifact_counts(&self) -> Result<TierCounts, BackupError> {
        let catalog = Catalog::scan(self.executor.layout()).await?;
        Ok(TierCounts::from_catalog(&catalog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::BackupLayout;
    use crate::domain::RetentionPolicy;
    use crate::impls::CannedDumpRunner;
    use crate::ports::SystemClock;

    fn service(root: &std::path::Path) -> BackupService {
        let executor = DumpExecutor::new(
            BackupLayout::new(root.join("backup"), root.join("dumps")),
            Arc::new(CannedDumpRunner::new("SELECT 1;")),
            Arc::new(SystemClock),
            RetentionPolicy::default(),
        );
        BackupService::new(Arc::new(executor))
    }

    #[tokio::test]
    async fn manual_backup_defaults_to_daily() {
        let root = tempfile::tempdir().unwrap();
        let service = service(root.path());

        let message = service.manual_backup(None).await.unwrap();

        assert!(message.starts_with("Manual daily backup completed"));
        let counts = service.artifact_counts().await.unwrap();
        assert_eq!(counts.daily, 1);
        // manual writes never cascade
        assert_eq!(counts.hourly, 0);
        // the scratch dump is kept as the manual tier
        assert_eq!(counts.manual, 1);
    }

    #[tokio::test]
    async fn manual_backup_into_weekly() {
        let root = tempfile::tempdir().unwrap();
        let service = service(root.path());

        service.manual_backup(Some(Tier::Weekly)).await.unwrap();

        let counts = service.artifact_counts().await.unwrap();
        assert_eq!(counts.weekly, 1);
        assert_eq!(counts.total(), 2);
    }
}
