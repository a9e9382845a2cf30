//! Errors - エラー型と分類
//!
//! # 分類
//! - プロセスレベル（致命的）: 接続不可、バックアップなし、不正な選択
//! - Tier 書き込み失敗: ダンプ失敗。その Tier のサイクルだけを中断
//! - 文単位のリストア失敗は `StatementError`（ports::sql_session）で扱い、ここには来ない

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dump command failed: {0}")]
    DumpFailed(String),

    #[error("dump finished but no backup-*.sql file was found in {}", .0.display())]
    ArtifactNotFound(PathBuf),

    #[error("no backups found in any tier")]
    NoBackups,

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("backup file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("database connection failed: {0}")]
    Connection(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("prompt failed: {0}")]
    Prompt(#[source] std::io::Error),
}

impl BackupError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BackupError::Io {
            path: path.into(),
            source,
        }
    }
}
