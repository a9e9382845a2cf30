//! Prompter port - 対話入出力の抽象化
//!
//! リストア選択メニューを実端末なしでテストできるように、
//! stdin/stdout を直接触らずこの trait 越しに行います。

use crate::domain::BackupError;

/// Answer to a numbered menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Zero-based index into the presented options.
    Index(usize),
    Cancel,
}

pub trait Prompter: Send + Sync {
    /// Print one line to the operator.
    fn say(&self, line: &str);

    /// Show `prompt` and read one line of input (without the newline).
    fn read_line(&self, prompt: &str) -> Result<String, BackupError>;

    /// Numbered menu answer: `1..=count` selects, `0` cancels.
    /// Anything else is an error; there is no retry loop.
    fn ask_selection(&self, prompt: &str, count: usize) -> Result<Selection, BackupError> {
        let answer = self.read_line(prompt)?;
        parse_selection(&answer, count)
    }

    /// Only a literal `yes` confirms.
    fn ask_yes_no(&self, prompt: &str) -> Result<bool, BackupError> {
        let answer = self.read_line(prompt)?;
        Ok(answer.trim() == "yes")
    }
}

pub fn parse_selection(answer: &str, count: usize) -> Result<Selection, BackupError> {
    let number: usize = answer
        .trim()
        .parse()
        .map_err(|_| BackupError::InvalidSelection(format!("'{}' is not a number", answer.trim())))?;
    match number {
        0 => Ok(Selection::Cancel),
        n if n <= count => Ok(Selection::Index(n - 1)),
        n => Err(BackupError::InvalidSelection(format!(
            "{n} is out of range (1-{count})"
        ))),
    }
}
