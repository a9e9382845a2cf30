//! Restore executor - ダンプを 1 文ずつライブ DB に流す
//!
//! - 文は必ずダンプ内の順序で、前の文の完了を待ってから次を発行する
//! - トランザクションで包まない。各文は個別に commit / 失敗する
//! - 文の失敗は分類して数えるだけで、決して致命的にしない
//! - 接続レベルの失敗だけが実行全体を中断する
//! - 最後に接続をベストエフォートで閉じる
//! - 致命的でない失敗と進捗はログとは別に運用者へ即座に表示する

use std::io::ErrorKind;
use std::path::Path;

use crate::domain::{BackupError, ErrorClass, RestoreOutcome, classify, tokenize};
use crate::ports::{Prompter, SqlSession, StatementError};

/// Progress is reported every this many statements.
pub const PROGRESS_EVERY: usize = 100;

/// Read the selected dump. A file pruned since it was listed is `FileNotFound`.
pub async fn read_dump(path: &Path) -> Result<String, BackupError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => BackupError::FileNotFound(path.to_path_buf()),
            _ => BackupError::io(path, e),
        })
}

/// Replay `sql_text` statement by statement, then close `session`.
///
/// Critical statement failures and progress lines are shown through `out` as they happen.
pub async fn restore<S>(
    sql_text: &str,
    session: &mut S,
    out: &dyn Prompter,
) -> Result<RestoreOutcome, BackupError>
where
    S: SqlSession + ?Sized,
{
    let statements = tokenize(sql_text);
    tracing::info!(total = statements.len(), "restore started");

    let result = replay(&statements, session, out).await;
    session.close().await;

    if let Ok(outcome) = &result {
        tracing::info!(
            executed = outcome.executed_count,
            ignored = outcome.ignored_error_count,
            critical = outcome.critical_error_count,
            "restore finished"
        );
    }
    result
}

async fn replay<S>(
    statements: &[String],
    session: &mut S,
    out: &dyn Prompter,
) -> Result<RestoreOutcome, BackupError>
where
    S: SqlSession + ?Sized,
{
    let total = statements.len();
    let mut outcome = RestoreOutcome::default();

    for (i, statement) in statements.iter().enumerate() {
        let number = i + 1;
        match session.execute(statement).await {
            Ok(()) => outcome.record_success(),
            Err(StatementError::Statement(message)) => match classify(&message) {
                ErrorClass::Ignorable => {
                    tracing::debug!(number, %message, "ignorable restore error");
                    outcome.record_ignored();
                }
                ErrorClass::Critical => {
                    outcome.record_critical();
                    out.say(&format!(
                        "Statement {number} failed: {message}\n  {}",
                        preview(statement)
                    ));
                    tracing::warn!(
                        number,
                        statement = %preview(statement),
                        %message,
                        "statement failed"
                    );
                }
            },
            Err(StatementError::Connection(message)) => {
                return Err(BackupError::Connection(message));
            }
        }

        if number % PROGRESS_EVERY == 0 {
            let line = format!(
                "progress {number}/{total} (ignored {}, critical {})",
                outcome.ignored_error_count, outcome.critical_error_count
            );
            out.say(&line);
            tracing::info!("{line}");
        }
    }

    Ok(outcome)
}

fn preview(statement: &str) -> String {
    const MAX: usize = 80;
    let single_line = statement.split_whitespace().collect::<Vec<_>>().join(" ");
    match single_line.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &single_line[..cut]),
        None => single_line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::catalog::list_artifacts;
    use crate::app::catalog::test_support::write_aged;
    use crate::domain::Tier;
    use crate::impls::ScriptedPrompter;
    use async_trait::async_trait;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeSession {
        failures: HashMap<usize, StatementError>,
        executed: Vec<String>,
        closed: bool,
    }

    impl FakeSession {
        fn failing_at(mut self, number: usize, error: StatementError) -> Self {
            self.failures.insert(number, error);
            self
        }
    }

    #[async_trait]
    impl SqlSession for FakeSession {
        async fn execute(&mut self, statement: &str) -> Result<(), StatementError> {
            self.executed.push(statement.to_string());
            match self.failures.remove(&self.executed.len()) {
                Some(error) => Err(error),
                None => Ok(()),
            }
        }

        async fn close(&mut self) {
            self.closed = true;
        }
    }

    const FIVE: &str = "CREATE TABLE a (id int);\n\
                        INSERT INTO a VALUES (1);\n\
                        CREATE TABLE b (id int);\n\
                        INSERT INTO b VALUES (NULL);\n\
                        INSERT INTO a VALUES (2);\n";

    #[tokio::test]
    async fn keeps_going_after_ignorable_and_critical_errors() {
        let mut session = FakeSession::default()
            .failing_at(3, StatementError::Statement(r#"relation "b" already exists"#.into()))
            .failing_at(
                4,
                StatementError::Statement(
                    r#"null value in column "id" violates not-null constraint"#.into(),
                ),
            );

        let out = ScriptedPrompter::default();
        let outcome = restore(FIVE, &mut session, &out).await.unwrap();

        assert_eq!(
            outcome,
            RestoreOutcome {
                executed_count: 4,
                ignored_error_count: 1,
                critical_error_count: 1,
            }
        );
        assert_eq!(session.executed.len(), 5);
        assert_eq!(session.executed[4], "INSERT INTO a VALUES (2)");
        assert!(session.closed);
        assert!(!outcome.is_clean());

        // only the critical failure reaches the operator
        let shown = out.transcript();
        assert_eq!(shown.len(), 1);
        assert!(shown[0].starts_with("Statement 4 failed: null value"));
        assert!(shown[0].contains("INSERT INTO b VALUES (NULL)"));
    }

    #[tokio::test]
    async fn connection_loss_aborts_and_still_closes() {
        let mut session = FakeSession::default()
            .failing_at(2, StatementError::Connection("socket closed".into()));

        let out = ScriptedPrompter::default();
        let err = restore(FIVE, &mut session, &out).await.unwrap_err();

        assert!(matches!(err, BackupError::Connection(_)));
        assert_eq!(session.executed.len(), 2);
        assert!(session.closed);
    }

    #[tokio::test]
    async fn statements_run_in_dump_order() {
        let dump: String = (1..=250).map(|i| format!("INSERT INTO t VALUES ({i});\n")).collect();
        let mut session = FakeSession::default();
        let out = ScriptedPrompter::default();

        let outcome = restore(&dump, &mut session, &out).await.unwrap();

        assert_eq!(outcome.executed_count, 250);
        assert!(outcome.is_clean());
        let expected: Vec<String> = (1..=250).map(|i| format!("INSERT INTO t VALUES ({i})")).collect();
        assert_eq!(session.executed, expected);
        assert_eq!(
            out.transcript(),
            vec![
                "progress 100/250 (ignored 0, critical 0)",
                "progress 200/250 (ignored 0, critical 0)",
            ]
        );
    }

    #[tokio::test]
    async fn empty_dump_is_a_clean_noop() {
        let mut session = FakeSession::default();
        let out = ScriptedPrompter::default();
        let outcome = restore("-- nothing here\n", &mut session, &out).await.unwrap();
        assert_eq!(outcome, RestoreOutcome::default());
        assert!(session.closed);
    }

    #[test]
    fn preview_flattens_and_truncates() {
        assert_eq!(preview("SELECT\n  1"), "SELECT 1");
        let long = "x".repeat(100);
        assert_eq!(preview(&long).len(), 83);
    }

    #[tokio::test]
    async fn dump_pruned_after_listing_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write_aged(dir.path(), "backup-daily-2024-03-01T00-00-00-KST.sql", 10);
        let listed = list_artifacts(Tier::Daily, dir.path()).await.unwrap();
        let path = listed[0].path.clone();

        assert!(read_dump(&path).await.unwrap().contains("SELECT 1;"));

        std::fs::remove_file(&path).unwrap();
        let err = read_dump(&path).await.unwrap_err();
        assert!(matches!(err, BackupError::FileNotFound(p) if p == path));
    }
}
