//! ScriptedPrompter - 決められた回答を順に返すテスト用 Prompter
//!
//! 表示された行とプロンプトは `transcript()` で確認できます。

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::domain::BackupError;
use crate::ports::Prompter;

#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    transcript: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            transcript: Mutex::new(Vec::new()),
        }
    }

    pub fn transcript(&self) -> Vec<String> {
        self.transcript
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    fn record(&self, line: &str) {
        if let Ok(mut lines) = self.transcript.lock() {
            lines.push(line.to_string());
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn say(&self, line: &str) {
        self.record(line);
    }

    fn read_line(&self, prompt: &str) -> Result<String, BackupError> {
        self.record(prompt);
        self.answers
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop_front())
            .ok_or_else(|| {
                BackupError::Prompt(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "no scripted answer left",
                ))
            })
    }
}
