//! Error classifier - リストア時のエラーを ignorable / critical に分類
//!
//! DDL 適用済みのスキーマにダンプ全体を再生すると、CREATE TABLE/INDEX や
//! 命名規則付き制約（PK_ / FK_ / UQ_ / IDX_）の重複エラーが必ず出ます。
//! これらは想定内のノイズなので、リストアを止めず、運用者にも警告しません。

const IGNORABLE_PATTERNS: [&str; 10] = [
    "already exists",
    "does not exist",
    "multiple primary keys",
    "relation \"idx_",
    "relation \"pk_",
    "relation \"uq_",
    "relation \"fk_",
    "constraint \"fk_",
    "constraint \"pk_",
    "constraint \"uq_",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Ignorable,
    Critical,
}

/// Case-insensitive substring match against the known re-application noise.
pub fn is_ignorable(message: &str) -> bool {
    let message = message.to_lowercase();
    IGNORABLE_PATTERNS
        .iter()
        .any(|pattern| message.contains(pattern))
}

pub fn classify(message: &str) -> ErrorClass {
    if is_ignorable(message) {
        ErrorClass::Ignorable
    } else {
        ErrorClass::Critical
    }
}
