//! Turns a detected intent into the reply shown to the user.
//!
//! Nothing here returns an error: missing slots become usage hints and
//! storage or LLM failures become advisory strings.

use crate::format::format_task_list;
use crate::intent::DEFAULT_PROMPT;
use crate::llm::{Answer, HISTORY_TURNS};
use crate::models::{Intent, SLOT_PROMPT, SLOT_TASK, SLOT_TEXT, Slots, Transcript};
use crate::store::TaskStore;
use tracing::warn;

pub const HELP_TEXT: &str = "\
Commands:
  help | h | ?            Show this help
  hello / hi              Say hello
  echo <text>             Repeat <text>
  add <task>              Add a task (also: create)
  list                    List tasks (also: show, ls)
  remove <task>           Remove a task (also: delete)
  ai: <question>          Ask the assistant (also: ask, explain)
  quit | exit             Leave";

pub const GREETING: &str = "Hello! Type 'help' to see what I can do.";
pub const EMPTY_ECHO: &str = "(nothing to echo)";
pub const NO_TASKS: &str = "No tasks yet.";
pub const CREATE_HINT: &str = "Please include a task name. Example: add buy milk";
pub const DELETE_HINT: &str = "Please include a task to remove. Example: remove buy milk";
pub const AI_UNAVAILABLE: &str = "AI unavailable. Start a chat with --provider to enable it.";
pub const NOT_UNDERSTOOD: &str = "I did not understand. Type 'help'.";

/// Produce the reply for `intent`.
///
/// CREATE and DELETE mutate `store`. ASK_AI calls `answer` with the prompt
/// slot and, when given, the most recent transcript exchanges as context.
pub fn respond(
    intent: Intent,
    slots: &Slots,
    store: &mut dyn TaskStore,
    answer: Option<&dyn Answer>,
    transcript: Option<&Transcript>,
) -> String {
    match intent {
        Intent::Help => HELP_TEXT.to_string(),
        Intent::Greet => GREETING.to_string(),
        Intent::Echo => match slot(slots, SLOT_TEXT) {
            "" => EMPTY_ECHO.to_string(),
            text => text.to_string(),
        },
        Intent::Create => {
            let task = slot(slots, SLOT_TASK);
            if task.is_empty() {
                return CREATE_HINT.to_string();
            }
            match store.add(task) {
                Ok(()) => format!("Added: {task}"),
                Err(e) => storage_failure(e),
            }
        }
        Intent::List => {
            let tasks = store.load();
            if tasks.is_empty() {
                NO_TASKS.to_string()
            } else {
                format_task_list(&tasks)
            }
        }
        Intent::Delete => {
            let task = slot(slots, SLOT_TASK);
            if task.is_empty() {
                return DELETE_HINT.to_string();
            }
            match store.remove(task) {
                Ok(true) => format!("Removed: {task}"),
                Ok(false) => format!("Task not found: {task}"),
                Err(e) => storage_failure(e),
            }
        }
        Intent::AskAi => {
            let Some(answer) = answer else {
                return AI_UNAVAILABLE.to_string();
            };
            let prompt = match slot(slots, SLOT_PROMPT) {
                "" => DEFAULT_PROMPT,
                p => p,
            };
            let history = transcript
                .map(|t| t.recent(HISTORY_TURNS))
                .unwrap_or_default();
            match answer.answer(prompt, history) {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "answer failed");
                    format!("(LLM unavailable: {e})")
                }
            }
        }
        Intent::Unknown => NOT_UNDERSTOOD.to_string(),
    }
}

fn slot<'a>(slots: &'a Slots, name: &str) -> &'a str {
    slots.get(name).map(str::trim).unwrap_or_default()
}

fn storage_failure(e: crate::error::AppError) -> String {
    warn!(error = %e, "task store write failed");
    format!("(storage unavailable: {e})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use crate::intent::detect;
    use crate::models::Exchange;
    use crate::store::{JsonFileStore, MemoryStore};
    use std::cell::Cell;
    use std::fs;
    use tempfile::TempDir;

    fn reply(input: &str, store: &mut MemoryStore) -> String {
        let (intent, slots) = detect(input);
        respond(intent, &slots, store, None, None)
    }

    #[test]
    fn test_create_list_delete() {
        let mut store = MemoryStore::new();

        assert_eq!(reply("add buy milk", &mut store), "Added: buy milk");

        let out = reply("list", &mut store);
        assert!(out.contains("Your tasks ("));
        assert!(out.contains("buy milk"));

        assert_eq!(reply("remove buy milk", &mut store), "Removed: buy milk");
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_list_empty() {
        let mut store = MemoryStore::new();
        assert_eq!(
            respond(Intent::List, &Slots::new(), &mut store, None, None),
            "No tasks yet."
        );
    }

    #[test]
    fn test_list_in_store_order() {
        let mut store = MemoryStore::with_tasks(["a", "b"]);
        let out = respond(Intent::List, &Slots::new(), &mut store, None, None);
        let header = out.find("Your tasks (2):").unwrap();
        let first = out.find("1. a").unwrap();
        let second = out.find("2. b").unwrap();
        assert!(header < first && first < second);
    }

    #[test]
    fn test_missing_task_slot_gives_hints() {
        let mut store = MemoryStore::new();
        assert_eq!(
            respond(Intent::Create, &Slots::new(), &mut store, None, None),
            CREATE_HINT
        );
        let blank = Slots::new().with(SLOT_TASK, "   ");
        assert_eq!(
            respond(Intent::Delete, &blank, &mut store, None, None),
            DELETE_HINT
        );
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_delete_missing_task() {
        let mut store = MemoryStore::with_tasks(["a"]);
        assert_eq!(reply("delete z", &mut store), "Task not found: z");
        assert_eq!(store.load(), vec!["a"]);
    }

    #[test]
    fn test_echo() {
        let mut store = MemoryStore::new();
        assert_eq!(reply("echo Hi There", &mut store), "Hi There");
        assert_eq!(
            respond(Intent::Echo, &Slots::new(), &mut store, None, None),
            EMPTY_ECHO
        );
    }

    #[test]
    fn test_fixed_replies() {
        let mut store = MemoryStore::new();
        assert!(reply("help", &mut store).contains("add <task>"));
        assert_eq!(reply("hello", &mut store), GREETING);
        assert!(reply("asdf qwer", &mut store).to_lowercase().contains("did not understand"));
    }

    #[test]
    fn test_ask_ai_without_answer() {
        let mut store = MemoryStore::new();
        assert_eq!(reply("ai: hi", &mut store), AI_UNAVAILABLE);
    }

    #[test]
    fn test_ask_ai_passes_prompt() {
        let mut store = MemoryStore::new();
        let answer = |p: &str| -> Result<String, LlmError> { Ok(format!("answer to {p}")) };
        let slots = Slots::new().with(SLOT_PROMPT, "x");
        let out = respond(Intent::AskAi, &slots, &mut store, Some(&answer), None);
        assert_eq!(out, "answer to x");
    }

    #[test]
    fn test_ask_ai_failure_is_contained() {
        let mut store = MemoryStore::new();
        let boom = |_: &str| -> Result<String, LlmError> {
            Err(LlmError::Transport("boom".to_string()))
        };
        let slots = Slots::new().with(SLOT_PROMPT, "x");
        let out = respond(Intent::AskAi, &slots, &mut store, Some(&boom), None);
        assert!(out.contains("LLM unavailable"));
        assert!(out.contains("boom"));
    }

    #[test]
    fn test_create_storage_failure_is_contained() {
        let temp_dir = TempDir::new().unwrap();
        let blocked = temp_dir.path().join("not-a-dir");
        fs::write(&blocked, "plain file").unwrap();
        let mut store = JsonFileStore::new(&blocked);

        let slots = Slots::new().with(SLOT_TASK, "a");
        let out = respond(Intent::Create, &slots, &mut store, None, None);
        assert!(out.starts_with("(storage unavailable: "), "got {out:?}");
        assert!(store.load().is_empty());
        assert_eq!(fs::read_to_string(&blocked).unwrap(), "plain file");
    }

    /// Store that reads fine but refuses every write
    struct ReadOnlyStore(Vec<String>);

    impl TaskStore for ReadOnlyStore {
        fn load(&self) -> Vec<String> {
            self.0.clone()
        }

        fn save(&mut self, _tasks: &[String]) -> crate::error::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    #[test]
    fn test_delete_storage_failure_is_contained() {
        let mut store = ReadOnlyStore(vec!["a".to_string()]);
        let slots = Slots::new().with(SLOT_TASK, "a");
        let out = respond(Intent::Delete, &slots, &mut store, None, None);
        assert_eq!(out, "(storage unavailable: IO error: read-only)");
        assert_eq!(store.load(), vec!["a"]);
    }

    struct CountingAnswer {
        seen_history: Cell<usize>,
    }

    impl Answer for CountingAnswer {
        fn answer(&self, _prompt: &str, history: &[Exchange]) -> Result<String, LlmError> {
            self.seen_history.set(history.len());
            Ok("ok".to_string())
        }
    }

    #[test]
    fn test_ask_ai_receives_transcript() {
        let mut store = MemoryStore::new();
        let mut transcript = Transcript::new();
        for i in 0..HISTORY_TURNS + 3 {
            transcript.push(format!("add t{i}"), format!("Added: t{i}"));
        }

        let answer = CountingAnswer {
            seen_history: Cell::new(0),
        };
        let slots = Slots::new().with(SLOT_PROMPT, "what next");
        respond(
            Intent::AskAi,
            &slots,
            &mut store,
            Some(&answer),
            Some(&transcript),
        );
        assert_eq!(answer.seen_history.get(), HISTORY_TURNS);
    }
}
