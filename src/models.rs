use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Classified purpose of one line of user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Help,
    Greet,
    Echo,
    Create,
    List,
    Delete,
    AskAi,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Help => "HELP",
            Intent::Greet => "GREET",
            Intent::Echo => "ECHO",
            Intent::Create => "CREATE",
            Intent::List => "LIST",
            Intent::Delete => "DELETE",
            Intent::AskAi => "ASK_AI",
            Intent::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Slot holding a task name for CREATE and DELETE
pub const SLOT_TASK: &str = "task";
/// Slot holding the text to repeat for ECHO
pub const SLOT_TEXT: &str = "text";
/// Slot holding the question for ASK_AI
pub const SLOT_PROMPT: &str = "prompt";

/// Named values extracted from one input line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slots(BTreeMap<&'static str, String>);

impl Slots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.0.insert(name, value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// One user line and the reply it produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub user: String,
    pub reply: String,
}

/// In-memory session history, never persisted
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<Exchange>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, user: impl Into<String>, reply: impl Into<String>) {
        self.entries.push(Exchange {
            user: user.into(),
            reply: reply.into(),
        });
    }

    pub fn entries(&self) -> &[Exchange] {
        &self.entries
    }

    /// The last `n` exchanges, oldest first
    pub fn recent(&self, n: usize) -> &[Exchange] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A todo item as served by the placeholder API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Todo {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub completed: bool,
}
