//! Plain-text rendering of task lists.

/// Render `tasks` as a numbered list with a count header.
pub fn format_task_list(tasks: &[String]) -> String {
    if tasks.is_empty() {
        return "No tasks.".to_string();
    }

    let mut lines = Vec::with_capacity(tasks.len() + 1);
    lines.push(format!("Your tasks ({}):", tasks.len()));
    for (i, task) in tasks.iter().enumerate() {
        lines.push(format!("  {}. {task}", i + 1));
    }
    lines.join("\n")
}
