//! ui::prompts
//!
//! Interactive prompts.
//!
//! # Design
//!
//! Prompting is a capability. Production code reads answers from the
//! terminal through [`TerminalPrompter`]; tests script the answers with
//! [`ScriptedPrompter`]. Callers only see the [`Prompter`] trait.

use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::sync::Mutex;

use thiserror::Error;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Input ended before an answer was given.
    #[error("no more input available")]
    Exhausted,

    #[error("IO error: {0}")]
    IoError(String),
}

/// Something that can ask the operator a question.
pub trait Prompter: Send + Sync {
    /// Show `message` and return the raw answer line (without newline).
    fn ask(&self, message: &str) -> Result<String, PromptError>;
}

/// Reads answers from stdin, writing the question to stderr.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&self, message: &str) -> Result<String, PromptError> {
        let mut stderr = std::io::stderr();
        write!(stderr, "{} ", message).map_err(|e| PromptError::IoError(e.to_string()))?;
        stderr
            .flush()
            .map_err(|e| PromptError::IoError(e.to_string()))?;

        let mut line = String::new();
        let read = std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| PromptError::IoError(e.to_string()))?;
        if read == 0 {
            return Err(PromptError::Exhausted);
        }

        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Replays a fixed sequence of answers and remembers the questions asked.
///
/// # Example
///
/// ```
/// use gdk_release::ui::prompts::{Prompter, ScriptedPrompter};
///
/// let prompter = ScriptedPrompter::new(["maybe", "y"]);
/// assert_eq!(prompter.ask("Retry?").unwrap(), "maybe");
/// assert_eq!(prompter.ask("Retry?").unwrap(), "y");
/// assert!(prompter.ask("Retry?").is_err());
/// assert_eq!(prompter.questions().len(), 3);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    questions: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            questions: Mutex::new(Vec::new()),
        }
    }

    /// Questions asked so far, in order.
    pub fn questions(&self) -> Vec<String> {
        self.questions
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&self, message: &str) -> Result<String, PromptError> {
        if let Ok(mut questions) = self.questions.lock() {
            questions.push(message.to_string());
        }

        self.answers
            .lock()
            .map_err(|e| PromptError::IoError(e.to_string()))?
            .pop_front()
            .ok_or(PromptError::Exhausted)
    }
}

/// Ask a yes/no question until the answer normalizes to `y` or `n`.
///
/// Answers are trimmed and lower-cased; anything else asks again.
pub fn confirm(prompter: &dyn Prompter, message: &str) -> Result<bool, PromptError> {
    loop {
        let answer = prompter.ask(message)?;
        match answer.trim().to_lowercase().as_str() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => continue,
        }
    }
}
