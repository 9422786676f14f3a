use chrono::NaiveDate;

use crate::cli::context::{resolve_id, split_flags, usage, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::services::TodoService;
use crate::core::view::{SortOrder, StatusFilter};
use crate::domain::{Priority, Task, TaskDraft, ValidationError};

use super::print_rows;

const USAGE: &str = "task <add|list|done|edit|remove|filter|priority|sort|hide-completed|stats|overdue>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "task",
        "Manage the to-do list",
        "task add <text> [--priority low|medium|high] [--due YYYY-MM-DD]\n\
         task edit <row|id> <text> [--priority ..] [--due ..]\n\
         task done|remove <row|id>\n\
         task list | stats | overdue\n\
         task filter all|active|completed\n\
         task priority all|low|medium|high\n\
         task sort smart|newest|oldest|name-asc|name-desc\n\
         task hide-completed on|off",
        cmd_task,
    )]
}

fn cmd_task(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((action, rest)) = args.split_first() else {
        return list(context);
    };
    match action.to_ascii_lowercase().as_str() {
        "add" => add(context, rest),
        "list" | "ls" => list(context),
        "done" | "toggle" => toggle(context, rest),
        "edit" => edit(context, rest),
        "remove" | "rm" | "delete" => remove(context, rest),
        "filter" => {
            let filter: StatusFilter = single(rest, "task filter all|active|completed")?.parse()?;
            let saved = TodoService::set_filter(&mut context.organizer.tasks, filter);
            save_view(context, saved);
            list(context)
        }
        "priority" => {
            let value = single(rest, "task priority all|low|medium|high")?;
            let priority = match value.to_ascii_lowercase().as_str() {
                "all" => None,
                other => Some(other.parse::<Priority>()?),
            };
            let saved = TodoService::set_priority_filter(&mut context.organizer.tasks, priority);
            save_view(context, saved);
            list(context)
        }
        "sort" => {
            let sort: SortOrder = single(rest, "task sort <order>")?.parse()?;
            let saved = TodoService::set_sort(&mut context.organizer.tasks, sort);
            save_view(context, saved);
            list(context)
        }
        "hide-completed" => {
            let hide = parse_switch(single(rest, "task hide-completed on|off")?)?;
            let saved = TodoService::set_hide_completed(&mut context.organizer.tasks, hide);
            save_view(context, saved);
            list(context)
        }
        "stats" => stats(context),
        "overdue" => overdue(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown task action `{other}`; {USAGE}"
        ))),
    }
}

fn draft_from(args: &[&str], command: &str) -> Result<TaskDraft, CommandError> {
    let (words, flags) = split_flags(args)?;
    if words.is_empty() {
        return Err(usage(command));
    }
    let priority = match flags.get("priority") {
        Some(value) => value.parse()?,
        None => Priority::default(),
    };
    let mut draft = TaskDraft::new(words.join(" "), priority);
    if let Some(due) = flags.get("due") {
        let date = NaiveDate::parse_from_str(due, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(due.to_string()))?;
        draft = draft.with_due_date(date);
    }
    Ok(draft)
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let draft = draft_from(args, "task add <text> [--priority ..] [--due ..]")?;
    let mutation = context.organizer.tasks.add(draft)?;
    context.report_mutation("Task added.", &mutation);
    Ok(())
}

fn edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((target, rest)) = args.split_first() else {
        return Err(usage("task edit <row|id> <text>"));
    };
    let Some(id) = resolve_id(&context.organizer.tasks, target)? else {
        return Ok(());
    };
    let mut draft = draft_from(rest, "task edit <row|id> <text>")?;
    if let Some(existing) = context.organizer.tasks.get(&id) {
        let (_, flags) = split_flags(rest)?;
        if !flags.contains_key("priority") {
            draft.priority = existing.priority;
        }
        if !flags.contains_key("due") {
            draft.due_date = existing.due_date;
        }
    }
    if let Some(mutation) = context.organizer.tasks.update(&id, draft)? {
        context.report_mutation("Task updated.", &mutation);
    }
    Ok(())
}

fn toggle(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(id) = resolve_id(&context.organizer.tasks, single(args, "task done <row|id>")?)? else {
        return Ok(());
    };
    if let Some(mutation) = TodoService::toggle(&mut context.organizer.tasks, &id) {
        let done = context
            .organizer
            .tasks
            .get(&id)
            .is_some_and(|task| task.completed);
        let message = if done { "Task completed." } else { "Task reopened." };
        context.report_mutation(message, &mutation);
    }
    Ok(())
}

fn remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(id) = resolve_id(&context.organizer.tasks, single(args, "task remove <row|id>")?)? else {
        return Ok(());
    };
    let mode = context.mode;
    let removal = context
        .organizer
        .tasks
        .remove(&id, &|prompt: &str| io::confirm(mode, prompt));
    context.report_removal(removal, "task")
}

fn list(context: &mut ShellContext) -> CommandResult {
    let view = context.organizer.tasks.view().clone();
    output::section(format!(
        "Tasks (filter: {}, sort: {}{})",
        view.filter,
        view.sort,
        view.priority
            .map(|priority| format!(", priority: {priority}"))
            .unwrap_or_default()
    ));
    print_rows(&context.organizer.tasks, task_line);
    Ok(())
}

fn stats(context: &mut ShellContext) -> CommandResult {
    let stats = TodoService::stats(&context.organizer.tasks);
    output::section("Task stats");
    output::info(format!("  Total     : {}", stats.total));
    output::info(format!("  Completed : {}", stats.completed));
    output::info(format!("  Pending   : {}", stats.pending));
    output::info(format!(
        "  Pending by priority: high {} / medium {} / low {}",
        stats.high, stats.medium, stats.low
    ));
    Ok(())
}

fn overdue(context: &mut ShellContext) -> CommandResult {
    let today = context.clock.today();
    let overdue = TodoService::overdue(&context.organizer.tasks, today);
    output::section("Overdue tasks");
    if overdue.is_empty() {
        output::info("Nothing overdue.");
    }
    for task in overdue {
        output::warning(task_line(task));
    }
    Ok(())
}

pub(crate) fn task_line(task: &Task) -> String {
    let mut line = format!(
        "[{}] {} ({})",
        if task.completed { "x" } else { " " },
        task.text,
        task.priority
    );
    if let Some(due) = task.due_date {
        line.push_str(&format!(" due {}", due.format("%b %-d, %Y")));
    }
    line
}

fn save_view(context: &ShellContext, saved: bool) {
    if !saved {
        context.warn_unsaved();
    }
}

pub(crate) fn single<'a>(args: &[&'a str], command: &str) -> Result<&'a str, CommandError> {
    match args {
        [value] => Ok(value),
        _ => Err(usage(command)),
    }
}

fn parse_switch(value: &str) -> Result<bool, CommandError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "yes" | "true" => Ok(true),
        "off" | "no" | "false" => Ok(false),
        other => Err(CommandError::InvalidArguments(format!(
            "expected on or off, got `{other}`"
        ))),
    }
}
