// SPDX-License-Identifier: MIT

//! Interactive question loop
//!
//! Reads one question per line and runs the question graph once for each.
//! `exit`, `quit` and `q` (any case) end the loop, as does end of input.
//! Blank lines re-prompt without touching the graph.

use crate::adk::error::{ChainError, NodeError};
use crate::chain::workflow::{QuestionGraph, QuestionState};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub const PROMPT: &str = "ask : ";
pub const NOT_RELATED: &str = "The query is not related to machine learning topics.";

const EXIT_COMMANDS: [&str; 3] = ["exit", "quit", "q"];

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Quit,
    Empty,
    Question(String),
}

/// Classify a raw input line. Whitespace only matters for the checks; a
/// question is kept exactly as typed.
pub fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Input::Empty
    } else if EXIT_COMMANDS
        .iter()
        .any(|cmd| trimmed.eq_ignore_ascii_case(cmd))
    {
        Input::Quit
    } else {
        Input::Question(line.to_string())
    }
}

/// What to tell the user about a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Answer(String),
    NotRelated,
}

impl Outcome {
    /// Read the result of a finished run. A state without a classification,
    /// or classified as machine learning but unanswered, is incomplete.
    pub fn from_state(state: &QuestionState) -> Result<Self, NodeError> {
        match (state.classification(), state.answer()) {
            (Some(true), Some(answer)) => Ok(Outcome::Answer(answer.to_string())),
            (Some(true), None) => Err(NodeError::MissingField("answer")),
            (Some(false), _) => Ok(Outcome::NotRelated),
            (None, _) => Err(NodeError::MissingField("classification")),
        }
    }

    pub fn render(&self) -> String {
        match self {
            Outcome::Answer(answer) => format!("AI's Answer: {}", answer),
            Outcome::NotRelated => NOT_RELATED.to_string(),
        }
    }
}

/// Counters for a finished session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub asked: usize,
    pub failed: usize,
}

/// Drives the question graph from a line-oriented console
pub struct Session<'a> {
    graph: &'a QuestionGraph,
}

impl<'a> Session<'a> {
    pub fn new(graph: &'a QuestionGraph) -> Self {
        Self { graph }
    }

    /// Run the graph once for a single question with a fresh state
    pub async fn ask(&self, question: &str) -> Result<QuestionState, ChainError> {
        self.graph.invoke(QuestionState::new(question)).await
    }

    /// Prompt, read and answer until the user quits or input ends.
    ///
    /// Node failures are reported on `output` and the loop continues; graph
    /// and configuration errors end the session with an error.
    pub async fn run<R, W>(&self, input: R, mut output: W) -> Result<SessionStats, ChainError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut stats = SessionStats::default();
        let mut lines = input.lines();

        loop {
            output.write_all(PROMPT.as_bytes()).await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                output.write_all(b"\n").await?;
                break;
            };

            let question = match parse_input(&line) {
                Input::Quit => break,
                Input::Empty => continue,
                Input::Question(question) => question,
            };

            stats.asked += 1;
            let message = match self.ask(&question).await {
                Ok(state) => match Outcome::from_state(&state) {
                    Ok(outcome) => outcome.render(),
                    Err(e) => {
                        log::error!("Run finished with an incomplete state: {}", e);
                        stats.failed += 1;
                        format!("Error: {}", e)
                    }
                },
                Err(e) if e.is_recoverable() => {
                    log::warn!("Question failed: {}", e);
                    stats.failed += 1;
                    format!("Error: {}", e)
                }
                Err(e) => return Err(e),
            };

            output.write_all(message.as_bytes()).await?;
            output.write_all(b"\n").await?;
        }

        output.flush().await?;
        Ok(stats)
    }
}
