use crate::cli::context::{usage, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::config::Theme;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("theme", "Show or switch the theme", "theme [light|dark|toggle]", cmd_theme),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new("help", "Show available commands", "help [command]", cmd_help),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_theme(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let current = context.organizer.theme();
    let next = match args {
        [] => {
            output::info(format!("Theme: {current}"));
            return Ok(());
        }
        [value] if value.eq_ignore_ascii_case("toggle") => current.toggled(),
        [value] => value.parse::<Theme>()?,
        _ => return Err(usage("theme [light|dark|toggle]")),
    };
    output::set_theme(next);
    if context.organizer.set_theme(next) {
        output::success(format!("Theme set to {next}."));
    } else {
        context.warn_unsaved();
    }
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Organizer Core {}", meta.version));
    output::info(format!("  Build hash : {} ({})", meta.git_hash, meta.git_status));
    output::info(format!("  Built at   : {}", meta.timestamp));
    output::info(format!("  Target     : {}", meta.target));
    output::info(format!("  Profile    : {}", meta.profile));
    output::info(format!("  Rustc      : {}", meta.rustc));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.registry.get(&name.to_ascii_lowercase()) {
            Some(entry) => {
                output::section(format!("Help: {}", entry.name));
                output::info(format!("  {}", entry.description));
                for line in entry.usage.lines() {
                    output::info(format!("  {}", line.trim()));
                }
            }
            None => context.suggest_command(name),
        }
        return Ok(());
    }
    output::section("Available commands");
    for entry in context.registry.list() {
        output::info(format!("  {:<10} {}", entry.name, entry.description));
    }
    output::hint("Use `help <command>` for details.");
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
