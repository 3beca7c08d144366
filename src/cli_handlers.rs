use crate::config::{LlmSettings, Settings};
use crate::error::Result;
use crate::format::format_task_list;
use crate::llm::{Answer, Provider};
use crate::respond::{CREATE_HINT, DELETE_HINT};
use crate::session::{Session, run_echo_loop};
use crate::store::TaskStore;
use crate::todo;
use std::io;
use tracing::warn;

/// Handle the chat command
pub fn handle_chat(settings: &Settings, greet: bool) -> Result<()> {
    let provider = provider_or_mock(&settings.llm);
    let mut store = settings.store();

    let stdin = io::stdin();
    let mut session = Session::new(&mut store, Some(&provider)).greet(greet);
    session.run(stdin.lock(), io::stdout())?;

    Ok(())
}

/// Build the configured provider, falling back to the offline mock
fn provider_or_mock(llm: &LlmSettings) -> Provider {
    match llm.build_provider() {
        Ok(provider) => provider,
        Err(e) => {
            warn!(error = %e, "provider unavailable, falling back to mock");
            println!("(LLM provider unavailable: {e}; using mock)");
            Provider::Mock
        }
    }
}

/// Handle the add command
pub fn handle_add(settings: &Settings, task: &str) -> Result<()> {
    let task = task.trim();
    if task.is_empty() {
        println!("{CREATE_HINT}");
        return Ok(());
    }

    let mut store = settings.store();
    store.add(task)?;
    println!("Added: {task}");
    Ok(())
}

/// Handle the list command
pub fn handle_list(settings: &Settings) -> Result<()> {
    let store = settings.store();
    println!("{}", format_task_list(&store.load()));
    Ok(())
}

/// Handle the remove command
pub fn handle_remove(settings: &Settings, task: &str) -> Result<()> {
    let task = task.trim();
    if task.is_empty() {
        println!("{DELETE_HINT}");
        return Ok(());
    }

    let mut store = settings.store();
    if store.remove(task)? {
        println!("Removed.");
    } else {
        println!("Task not found.");
    }
    Ok(())
}

/// Handle the echo command
pub fn handle_echo() -> Result<()> {
    let stdin = io::stdin();
    run_echo_loop(stdin.lock(), io::stdout())?;
    Ok(())
}

/// Handle the ask command. Unlike chat, a failure here is an error.
pub fn handle_ask(settings: &Settings, prompt: &str) -> Result<()> {
    let provider = settings.llm.build_provider()?;
    let answer = provider.answer(prompt, &[])?;
    println!("{answer}");
    Ok(())
}

/// Handle the todo command
pub fn handle_todo(id: Option<i64>, mock: Option<&std::path::Path>) -> Result<()> {
    let mut data = None;

    if let Some(id) = id {
        match todo::fetch_todo(id) {
            Ok(item) => data = Some(item),
            Err(e) => println!("HTTP unavailable: {e}"),
        }
    }

    let item = match (data, mock) {
        (Some(item), _) => item,
        (None, Some(path)) => todo::load_mock(path)?,
        (None, None) => {
            println!("No data available. Provide --id or --mock.");
            return Ok(());
        }
    };

    println!("{}", todo::summarize(&item));
    Ok(())
}
