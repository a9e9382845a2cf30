//! Config - 環境変数からの設定読み込み
//!
//! - `DATABASE_HOST` / `DATABASE_PORT` / `DATABASE_USERNAME` / `DATABASE_PASSWORD` /
//!   `DATABASE_NAME` / `DATABASE_SSL`
//! - `BACKUP_DUMP_COMMAND`（外部ダンプツールのコマンドライン）
//!
//! テストではプロセス環境に触れないよう `from_lookup` を使います。

use std::fmt;

use crate::domain::BackupError;

const DEFAULT_PORT: u16 = 5432;
/// Used when `BACKUP_DUMP_COMMAND` is unset.
pub const DEFAULT_DUMP_COMMAND: &str = "npm run db:dump";

#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    /// TLS required, certificate not verified.
    pub ssl: bool,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, BackupError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, BackupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| BackupError::Config(format!("{key} is not set")))
        };

        let port = match lookup("DATABASE_PORT").filter(|value| !value.is_empty()) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                BackupError::Config(format!("DATABASE_PORT is not a valid port: {raw}"))
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: required("DATABASE_HOST")?,
            port,
            username: required("DATABASE_USERNAME")?,
            password: lookup("DATABASE_PASSWORD").unwrap_or_default(),
            database: required("DATABASE_NAME")?,
            ssl: lookup("DATABASE_SSL").as_deref() == Some("true"),
        })
    }

    /// `host:port/database`, for warnings shown before a restore.
    pub fn describe(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.database)
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("database", &self.database)
            .field("ssl", &self.ssl)
            .finish()
    }
}

/// Command line of the external dump tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl DumpCommand {
    /// Whitespace-split command line. No shell quoting.
    pub fn parse(line: &str) -> Result<Self, BackupError> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| BackupError::Config("dump command is empty".to_string()))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl fmt::Display for DumpCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
