//! SqlSession port - リストア先 DB への排他接続
//!
//! 1 回のリストアで開き、使い、閉じます。文はすべて逐次実行です。

use async_trait::async_trait;
use thiserror::Error;

/// Failure of a single statement.
#[derive(Debug, Error)]
pub enum StatementError {
    /// The server rejected the statement. Classified, never fatal.
    #[error("{0}")]
    Statement(String),

    /// The connection itself is gone. Aborts the run.
    #[error("connection lost: {0}")]
    Connection(String),
}

#[async_trait]
pub trait SqlSession: Send {
    /// Run one statement to completion. No transaction wrapping.
    async fn execute(&mut self, statement: &str) -> Result<(), StatementError>;

    /// Best-effort close. Errors are the implementor's to swallow.
    async fn close(&mut self);
}
