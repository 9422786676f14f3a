use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::utils::format::format_currency;

use super::class::class_line;
use super::task::task_line;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "overview",
        "Dashboard across tasks, schedule and budget",
        "overview",
        cmd_overview,
    )]
}

fn cmd_overview(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let Some(overview) = context.overview() else {
        return Ok(());
    };
    let currency = context.currency();
    output::section("Overview");
    output::info(format!("  Pending tasks    : {}", overview.pending_tasks));
    output::info(format!("  High priority    : {}", overview.high_priority));
    output::info(format!(
        "  Classes today    : {} ({})",
        overview.today_classes, overview.today
    ));
    let balance = format!("  Balance          : {}", format_currency(overview.balance, currency));
    if overview.balance_negative {
        output::warning(balance);
    } else {
        output::info(balance);
    }

    output::section("Upcoming tasks");
    if overview.upcoming_tasks.is_empty() {
        output::info("No pending tasks");
    }
    for task in &overview.upcoming_tasks {
        output::info(format!("  {}", task_line(task)));
    }

    output::section("Today's schedule");
    if overview.todays_schedule.is_empty() {
        output::info("No classes today");
    }
    for session in &overview.todays_schedule {
        output::info(format!("  {}", class_line(session)));
    }
    Ok(())
}
