//! CannedDumpRunner - 外部ツールなしでダンプを「生成」するテスト用実装
//!
//! スクラッチディレクトリに `backup-{timestamp}.sql` を直接書きます。

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::BackupError;
use crate::ports::DumpRunner;

pub struct CannedDumpRunner {
    contents: String,
    fail: AtomicBool,
    runs: AtomicUsize,
}

impl CannedDumpRunner {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
            fail: AtomicBool::new(false),
            runs: AtomicUsize::new(0),
        }
    }

    /// Make subsequent runs fail like a crashed dump tool.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::Relaxed);
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl DumpRunner for CannedDumpRunner {
    async fn run(&self, scratch_dir: &Path, timestamp: &str) -> Result<(), BackupError> {
        self.runs.fetch_add(1, Ordering::Relaxed);
        if self.fail.load(Ordering::Relaxed) {
            return Err(BackupError::DumpFailed("canned failure".to_string()));
        }
        let path = scratch_dir.join(format!("backup-{timestamp}.sql"));
        tokio::fs::write(&path, &self.contents)
            .await
            .map_err(|e| BackupError::io(&path, e))
    }
}
