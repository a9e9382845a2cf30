//! Statement tokenizer - ダンプ全文を SQL 文の列に分割する
//!
//! 文字列リテラルを意識した 1 パスの走査です。I/O も状態も持ちません。
//!
//! # 既知の制限
//! - エスケープはバックスラッシュ（`\'`）のみ。SQL 標準の `''` は
//!   「文字列終了 → 新しい文字列開始」として解釈される
//! - `$tag$ ... $tag$` のドル引用は扱わない（関数本体内の `;` で分割される）
//! - 行全体が `--` で始まるコメント行だけを落とす。行末コメント内の `;` や引用符は保護されない
//! - 引用符の対応が取れていない入力はエラーにならず、退化した分割結果になる

/// Split raw dump text into statements, in source order.
///
/// Statements are trimmed and never include their terminating `;`.
/// A trailing statement without a `;` is kept when non-empty.
pub fn tokenize(text: &str) -> Vec<String> {
    let source = strip_comment_lines(text);

    let mut statements = Vec::new();
    let mut buffer = String::new();
    let mut in_string = false;
    let mut delimiter = '\'';
    let mut prev: Option<char> = None;

    for ch in source.chars() {
        match ch {
            '\'' | '"' if prev != Some('\\') => {
                if !in_string {
                    in_string = true;
                    delimiter = ch;
                } else if ch == delimiter {
                    in_string = false;
                }
                buffer.push(ch);
            }
            ';' if !in_string => {
                flush(&mut buffer, &mut statements);
            }
            _ => buffer.push(ch),
        }
        prev = Some(ch);
    }
    flush(&mut buffer, &mut statements);

    statements
}

fn flush(buffer: &mut String, statements: &mut Vec<String>) {
    let statement = buffer.trim();
    if !statement.is_empty() && !statement.starts_with("--") {
        statements.push(statement.to_string());
    }
    buffer.clear();
}

fn strip_comment_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n")
}
