//! PgSession - sqlx による PostgreSQL 接続（SqlSession の本番実装）
//!
//! プールは使わず、リストア 1 回につき専用の接続を 1 本だけ持ちます。

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgSslMode};
use sqlx::{Connection, Executor};

use crate::config::DatabaseConfig;
use crate::domain::BackupError;
use crate::ports::{SqlSession, StatementError};

pub struct PgSession {
    conn: Option<PgConnection>,
}

impl PgSession {
    /// Failing here is fatal for the whole restore.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, BackupError> {
        let ssl_mode = if config.ssl {
            // Require encrypts without verifying the server certificate.
            PgSslMode::Require
        } else {
            PgSslMode::Disable
        };
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.username)
            .password(&config.password)
            .database(&config.database)
            .ssl_mode(ssl_mode);

        let conn = PgConnection::connect_with(&options)
            .await
            .map_err(|e| BackupError::Connection(format!("{}: {e}", config.describe())))?;
        Ok(Self { conn: Some(conn) })
    }
}

#[async_trait]
impl SqlSession for PgSession {
    async fn execute(&mut self, statement: &str) -> Result<(), StatementError> {
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| StatementError::Connection("connection already closed".to_string()))?;
        conn.execute(sqlx::raw_sql(statement))
            .await
            .map(|_| ())
            .map_err(statement_error)
    }

    async fn close(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };
        if let Err(e) = conn.close().await {
            // The pooler may already have dropped the socket.
            tracing::debug!(error = %e, "ignoring error while closing restore connection");
        }
    }
}

fn statement_error(err: sqlx::Error) -> StatementError {
    match err {
        sqlx::Error::Database(db_err) => StatementError::Statement(db_err.message().to_string()),
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolClosed
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::WorkerCrashed => StatementError::Connection(err.to_string()),
        other => StatementError::Statement(other.to_string()),
    }
}
