//! DumpRunner port - 外部ダンプツールの呼び出し
//!
//! ダンプツール自体はこのクレートの範囲外です。ツールはスクラッチディレクトリに
//! タイムスタンプ付きの `backup-*.sql` を書き出して終了します。
//!
//! # 実装
//! - **ProcessDumpRunner**: サブプロセス起動（本番用）
//! - **CannedDumpRunner**: 固定内容のファイルを直接書く（テスト用）

use std::path::Path;

use async_trait::async_trait;

use crate::domain::BackupError;

#[async_trait]
pub trait DumpRunner: Send + Sync {
    /// Produce one dump in `scratch_dir` and return once the tool has exited
    /// successfully. A failure leaves nothing for the caller to copy.
    async fn run(&self, scratch_dir: &Path, timestamp: &str) -> Result<(), BackupError>;
}
