//! StdioPrompter - 端末（stdin/stdout）を使う Prompter

use std::io::{self, BufRead, Write};

use crate::domain::BackupError;
use crate::ports::Prompter;

#[derive(Debug, Default, Clone, Copy)]
pub struct StdioPrompter;

impl Prompter for StdioPrompter {
    fn say(&self, line: &str) {
        println!("{line}");
    }

    fn read_line(&self, prompt: &str) -> Result<String, BackupError> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{prompt}").map_err(BackupError::Prompt)?;
        stdout.flush().map_err(BackupError::Prompt)?;
        drop(stdout);

        // Blocks the calling worker thread. Prompts only run before the restore
        // connection opens, with nothing else scheduled on the runtime.
        let mut answer = String::new();
        io::stdin()
            .lock()
            .read_line(&mut answer)
            .map_err(BackupError::Prompt)?;
        Ok(answer.trim_end_matches(['\r', '\n']).to_string())
    }
}
