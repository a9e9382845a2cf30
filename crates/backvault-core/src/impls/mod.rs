//! Impls - ports の実装
//!
//! # 本番用
//! - **ProcessDumpRunner**: 外部ダンプツールのサブプロセス起動
//! - **PgSession**: sqlx による PostgreSQL 接続
//! - **StdioPrompter**: 端末入出力
//!
//! # テスト用
//! - **CannedDumpRunner**: 固定内容のダンプを直接書く
//! - **ScriptedPrompter**: 決められた回答を返す

pub mod canned_dump;
pub mod pg_session;
pub mod process_dump;
pub mod scripted_prompter;
pub mod stdio_prompter;

pub use self::canned_dump::CannedDumpRunner;
pub use self::pg_session::PgSession;
pub use self::process_dump::ProcessDumpRunner;
pub use self::scripted_prompter::ScriptedPrompter;
pub use self::stdio_prompter::StdioPrompter;
