//! backvault-core
//!
//! SQL ダンプのローテーション（hourly / daily / weekly / monthly / yearly / manual）と
//! 対話的リストアのための部品。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（tier, timestamp, artifact, outcome, tokenizer, classifier, errors）
//! - **ports**: 抽象化レイヤー（Clock, DumpRunner, Prompter, SqlSession）
//! - **app**: アプリケーションロジック（dump, retention, scheduler, rotation, selector, restore, service）
//! - **impls**: ports の実装（ProcessDumpRunner, PgSession, StdioPrompter, テスト用実装）
//! - **config**: 環境変数からの設定

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;
