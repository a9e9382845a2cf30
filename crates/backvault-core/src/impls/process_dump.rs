//! ProcessDumpRunner - 外部ダンプツールをサブプロセスとして起動
//!
//! ツールには `BACKUP_TIMESTAMP`（KST）と `BACKUP_DUMPS_DIR` を渡します。
//! `DATABASE_*` はプロセス環境からそのまま継承されます。

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::DumpCommand;
use crate::domain::BackupError;
use crate::ports::DumpRunner;

pub struct ProcessDumpRunner {
    command: DumpCommand,
}

impl ProcessDumpRunner {
    pub fn new(command: DumpCommand) -> Self {
        Self { command }
    }
}

#[async_trait]
impl DumpRunner for ProcessDumpRunner {
    async fn run(&self, scratch_dir: &Path, timestamp: &str) -> Result<(), BackupError> {
        tracing::debug!(command = %self.command, %timestamp, "starting dump command");

        let output = Command::new(&self.command.program)
            .args(&self.command.args)
            .env("BACKUP_TIMESTAMP", timestamp)
            .env("BACKUP_DUMPS_DIR", scratch_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| BackupError::DumpFailed(format!("{}: {e}", self.command.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BackupError::DumpFailed(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}
