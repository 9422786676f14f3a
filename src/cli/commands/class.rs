use crate::cli::context::{resolve_id, split_flags, usage, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::services::ScheduleService;
use crate::domain::{ClassDraft, ClassSession, ClockTime, Day};
use crate::utils::format::format_time;

use super::print_rows;
use super::task::single;

const ADD_USAGE: &str = "class add <name> <day> <HH:MM> <HH:MM> [--room R] [--color RRGGBB]";
const EDIT_USAGE: &str = "class edit <row|id> <name> <day> <start> <end> [--room R] [--color RRGGBB]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "class",
        "Manage the weekly class schedule",
        "class add <name> <day> <start> <end> [--room R] [--color RRGGBB]\n\
         class edit <row|id> <name> <day> <start> <end> [--room R] [--color RRGGBB]\n\
         (write the color without `#`, or quote it: '#RRGGBB')\n\
         class remove <row|id>\n\
         class list | week | today | stats\n\
         class day <day>",
        cmd_class,
    )]
}

fn cmd_class(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((action, rest)) = args.split_first() else {
        return week(context);
    };
    match action.to_ascii_lowercase().as_str() {
        "add" => add(context, rest),
        "edit" => edit(context, rest),
        "remove" | "rm" | "delete" => remove(context, rest),
        "list" | "ls" => {
            output::section("Classes");
            print_rows(&context.organizer.schedule, class_line);
            Ok(())
        }
        "week" => week(context),
        "today" => {
            let today = Day::from(chrono::Datelike::weekday(&context.clock.today()));
            day(context, today)
        }
        "day" => {
            let wanted: Day = single(rest, "class day <day>")?.parse()?;
            day(context, wanted)
        }
        "stats" => stats(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown class action `{other}`"
        ))),
    }
}

/// Builds a draft from positional fields; `current` supplies room and color
/// when the flags are omitted on edit.
fn draft_from(
    args: &[&str],
    command: &str,
    current: Option<&ClassSession>,
) -> Result<ClassDraft, CommandError> {
    let (positional, flags) = split_flags(args)?;
    let [name, day, start, end] = positional.as_slice() else {
        return Err(usage(command));
    };
    let mut draft = ClassDraft::new(
        *name,
        day.parse::<Day>()?,
        start.parse::<ClockTime>()?,
        end.parse::<ClockTime>()?,
    );
    if let Some(current) = current {
        draft.room = current.room.clone();
        draft.color = current.color.clone();
    }
    if let Some(room) = flags.get("room") {
        draft = draft.with_room(*room);
    }
    if let Some(color) = flags.get("color") {
        draft = draft.with_color(normalize_color(color));
    }
    Ok(draft)
}

fn normalize_color(value: &str) -> String {
    if value.starts_with('#') {
        value.to_string()
    } else {
        format!("#{value}")
    }
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let draft = draft_from(args, ADD_USAGE, None)?;
    let mutation = context.organizer.schedule.add(draft)?;
    context.report_mutation("Class added.", &mutation);
    Ok(())
}

fn edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((target, rest)) = args.split_first() else {
        return Err(usage(EDIT_USAGE));
    };
    let Some(id) = resolve_id(&context.organizer.schedule, target)? else {
        return Ok(());
    };
    let draft = draft_from(rest, EDIT_USAGE, context.organizer.schedule.get(&id))?;
    if let Some(mutation) = context.organizer.schedule.update(&id, draft)? {
        context.report_mutation("Class updated.", &mutation);
    }
    Ok(())
}

fn remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(id) = resolve_id(&context.organizer.schedule, single(args, "class remove <row|id>")?)? else {
        return Ok(());
    };
    let mode = context.mode;
    let removal = context
        .organizer
        .schedule
        .remove(&id, &|prompt: &str| io::confirm(mode, prompt));
    context.report_removal(removal, "class")
}

fn week(context: &mut ShellContext) -> CommandResult {
    output::section("Weekly schedule");
    if context.organizer.schedule.is_empty() {
        output::info("No classes scheduled. Add your first class!");
        return Ok(());
    }
    for (day, sessions) in ScheduleService::week(&context.organizer.schedule) {
        if sessions.is_empty() {
            continue;
        }
        output::info(format!("{day}"));
        for session in sessions {
            output::info(format!("  {}", class_line(session)));
        }
    }
    Ok(())
}

fn day(context: &mut ShellContext, day: Day) -> CommandResult {
    output::section(format!("Classes on {day}"));
    let sessions = ScheduleService::classes_for_day(&context.organizer.schedule, day);
    if sessions.is_empty() {
        output::info(format!("No classes on {day}."));
    }
    for session in sessions {
        output::info(format!("  {}", class_line(session)));
    }
    Ok(())
}

fn stats(context: &mut ShellContext) -> CommandResult {
    let today = Day::from(chrono::Datelike::weekday(&context.clock.today()));
    let stats = ScheduleService::stats(&context.organizer.schedule, today);
    output::section("Schedule stats");
    output::info(format!("  Total classes : {}", stats.total));
    output::info(format!("  Today ({today}) : {}", stats.today));
    for (day, count) in &stats.by_day {
        output::info(format!("  {:<10}: {}", day.to_string(), count));
    }
    Ok(())
}

pub(crate) fn class_line(session: &ClassSession) -> String {
    let mut line = format!("{} {}", session.day, format_time(session.start_time));
    if let Some(end) = session.end_time {
        line.push_str(&format!(" - {}", format_time(end)));
    }
    line.push_str(&format!("  {}", session.name));
    if let Some(room) = &session.room {
        line.push_str(&format!(" @ {room}"));
    }
    line
}
