//! Per-side conversation context and the game master's message texts.

use serde::{Deserialize, Serialize};

use crate::core::{Board, Roll};
use crate::rules::Violation;

/// Correction sent after a reply that does not parse.
pub const FORMAT_CORRECTION: &str = "INVALID FORMAT: Your answer must contain a line of the form \
'MY MOVE: X -> N ; Y -> N'. Please try again.";

/// Author of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One conversation entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Message history of one side.
///
/// The first push seeds the history from the task prompt: its first line
/// becomes the system message and the remaining lines the opening user
/// message. Consecutive messages with the same role are merged, separated
/// by a newline, so the history always alternates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    prompt: String,
    messages: Vec<Message>,
}

impl Conversation {
    /// Empty conversation that will be seeded from `prompt`.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            messages: Vec::new(),
        }
    }

    /// Append a message.
    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        if self.messages.is_empty() {
            self.seed();
        }
        let content = content.into();
        match self.messages.last_mut() {
            Some(last) if last.role == role => {
                last.content.push('\n');
                last.content.push_str(&content);
            }
            _ => self.messages.push(Message { role, content }),
        }
    }

    /// Messages so far.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Most recent message.
    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn seed(&mut self) {
        let mut lines = self.prompt.lines();
        let Some(system) = lines.next().filter(|l| !l.trim().is_empty()) else {
            return;
        };
        let task = lines
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        self.messages.push(Message {
            role: Role::System,
            content: system.to_string(),
        });
        if !task.is_empty() {
            self.messages.push(Message {
                role: Role::User,
                content: task,
            });
        }
    }
}

/// Message announcing a turn.
#[must_use]
pub fn turn_message(board: &Board, turn: usize, roll: Roll) -> String {
    format!(
        "Current state: {}\nTurn number: {}, Roll: {}. Where will you move your token?",
        board.render(),
        turn,
        roll
    )
}

/// Correction sent after a rejected move.
#[must_use]
pub fn correction_message(violation: &Violation) -> String {
    let detail = match violation {
        Violation::SimultaneousMove => {
            "Both of your in-play tokens were moved simultaneously. ".to_string()
        }
        Violation::NotMovedToBoard(t) => format!("Token {} can be played to the board but wasn't. ", t),
        Violation::NotMoved(t) => format!("Token {} can be moved but wasn't. ", t),
        Violation::IncorrectMove(t) => format!("Token {} was moved incorrectly. ", t),
    };
    format!("INVALID MOVE: {}Please try again.", detail)
}
