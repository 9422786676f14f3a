//! Shell state, dispatch and error reporting.

use std::{collections::HashMap, io, sync::Arc, time::Instant};

use rustyline::error::ReadlineError;
use thiserror::Error;

use crate::cli::{commands, io as cli_io, output, registry::CommandRegistry};
use crate::config::{Config, ConfigManager};
use crate::core::errors::OrganizerError;
use crate::core::manager::{Mutation, RecordManager, Removal};
use crate::core::services::{Overview, OverviewTracker};
use crate::core::Organizer;
use crate::domain::{Identifiable, Record};
use crate::storage::{JsonFileStore, Store};
use crate::utils::clock::{Clock, SystemClock};

pub const SCRIPT_ENV: &str = "ORGANIZER_CORE_CLI_SCRIPT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

impl CliMode {
    pub fn from_env() -> Self {
        if std::env::var_os(SCRIPT_ENV).is_some() {
            CliMode::Script
        } else {
            CliMode::Interactive
        }
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] OrganizerError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] OrganizerError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<crate::domain::ValidationError> for CommandError {
    fn from(err: crate::domain::ValidationError) -> Self {
        CommandError::Core(err.into())
    }
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub organizer: Organizer,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub tracker: OverviewTracker,
    pub clock: Box<dyn Clock>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let data_dir = config.resolve_data_dir(config_manager.base_dir());
        let backend = JsonFileStore::new(data_dir)?.with_quota(config.storage_quota_bytes);
        let organizer = Organizer::open(Arc::new(Store::new(Box::new(backend))));
        Ok(Self::with_parts(mode, organizer, config_manager, config))
    }

    pub fn with_parts(
        mode: CliMode,
        organizer: Organizer,
        config_manager: ConfigManager,
        config: Config,
    ) -> Self {
        output::set_plain(mode == CliMode::Script);
        output::set_theme(organizer.theme());
        Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            tracker: OverviewTracker::new(config.overview_debounce()),
            organizer,
            config_manager,
            config,
            clock: Box::new(SystemClock),
            running: true,
        }
    }

    pub fn prompt(&self) -> String {
        "organizer> ".into()
    }

    pub(crate) fn dispatch(&mut self, command: &str, args: &[&str]) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.handler(command) else {
            self.suggest_command(command);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        if let Some(best) = self.registry.suggest(input) {
            output::info(format!("Did you mean `{best}`?"));
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::Core(err) if err.is_user_error() => output::error(err),
            other => {
                tracing::error!(error = %other, "command failed");
                output::error(other);
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> bool {
        cli_io::confirm(self.mode, "Exit shell?")
    }

    pub fn currency(&self) -> &str {
        &self.config.currency
    }

    /// Prints the success line and, if the write failed, the storage warning.
    pub(crate) fn report_mutation(&self, message: impl std::fmt::Display, mutation: &Mutation) {
        output::success(message);
        if !mutation.persisted {
            self.warn_unsaved();
        }
    }

    pub(crate) fn warn_unsaved(&self) {
        output::warning("Storage is unavailable or full; changes are kept for this session only.");
    }

    /// Asks before deleting and reports the outcome.
    pub(crate) fn report_removal(&self, removal: Removal, noun: &str) -> CommandResult {
        match removal {
            Removal::Removed(mutation) => {
                self.report_mutation(format!("Deleted {noun}."), &mutation);
                Ok(())
            }
            Removal::Declined => {
                output::info("Nothing deleted.");
                Ok(())
            }
            Removal::NotFound => {
                output::info(format!("No such {noun}. Nothing deleted."));
                Ok(())
            }
        }
    }

    /// Current overview, refreshed through the debounce tracker.
    pub(crate) fn overview(&mut self) -> Option<Overview> {
        self.tracker.activate();
        self.tracker
            .poll(&self.organizer, self.clock.today(), Instant::now())
    }
}

/// Maps a row number from the last listing (1-based) or a literal id to a record id.
///
/// An unknown literal id is not an error: edits and deletes of missing records
/// are no-ops, so this prints a note and yields `None`.
pub(crate) fn resolve_id<R: Record>(
    manager: &RecordManager<R>,
    token: &str,
) -> Result<Option<String>, CommandError> {
    if let Ok(index) = token.parse::<usize>() {
        let rows = manager.render();
        return index
            .checked_sub(1)
            .and_then(|idx| rows.rows().get(idx))
            .map(|row| Some(row.record.id().to_string()))
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!("no {} at row {index}", R::PLURAL))
            });
    }
    let found = manager.get(token).map(|record| record.id().to_string());
    if found.is_none() {
        tracing::debug!(kind = R::PLURAL, id = token, "reference to unknown id");
        output::info(format!("No {} match id `{token}`. Nothing changed.", R::PLURAL));
    }
    Ok(found)
}

/// Splits `--name value` pairs from positional arguments.
pub(crate) fn split_flags<'a>(
    args: &[&'a str],
) -> Result<(Vec<&'a str>, HashMap<&'a str, &'a str>), CommandError> {
    let mut positional = Vec::new();
    let mut flags = HashMap::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.strip_prefix("--") {
            Some(name) => {
                let value = iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments(format!("missing value for --{name}"))
                })?;
                flags.insert(name, *value);
            }
            None => positional.push(*arg),
        }
    }
    Ok((positional, flags))
}

pub(crate) fn usage(text: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {text}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::shell::handle_line;
    use crate::utils::clock::FixedClock;
    use chrono::{NaiveDate, TimeZone, Utc};
    use tempfile::TempDir;

    fn script_context(temp: &TempDir) -> ShellContext {
        let config_manager = ConfigManager::with_base_dir(temp.path()).unwrap();
        ShellContext::with_parts(
            CliMode::Script,
            Organizer::in_memory(),
            config_manager,
            Config::default(),
        )
    }

    #[test]
    fn overdue_follows_the_shell_clock() {
        let temp = TempDir::new().unwrap();
        let mut context = script_context(&temp);
        context.clock = Box::new(FixedClock(
            Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0).unwrap(),
        ));
        handle_line(&mut context, "task add Essay --due 2025-01-05").unwrap();
        handle_line(&mut context, "task add Lab --due 2025-01-20").unwrap();
        handle_line(&mut context, "task overdue").unwrap();

        let today = context.clock.today();
        assert_eq!(today, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        let overdue = crate::core::services::TodoService::overdue(&context.organizer.tasks, today);
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].text, "Essay");

        let overview = context.overview().unwrap();
        assert_eq!(overview.pending_tasks, 2);
    }

    #[test]
    fn edits_keep_fields_that_were_not_given() {
        let temp = TempDir::new().unwrap();
        let mut context = script_context(&temp);
        handle_line(
            &mut context,
            "class add Math monday 09:00 10:00 --room R101 --color '#123456'",
        )
        .unwrap();
        handle_line(&mut context, "class edit 1 Algebra monday 09:00 10:00").unwrap();
        let session = &context.organizer.schedule.all()[0];
        assert_eq!(session.name, "Algebra");
        assert_eq!(session.room.as_deref(), Some("R101"));
        assert_eq!(session.color, "#123456");

        handle_line(&mut context, "budget expense 20 Lunch --category food").unwrap();
        handle_line(&mut context, "budget edit 1 expense 25 Lunch").unwrap();
        let txn = &context.organizer.budget.all()[0];
        assert_eq!(txn.amount, 25.0);
        assert_eq!(txn.category, crate::domain::Category::Food);
    }

    #[test]
    fn class_color_is_accepted_without_hash() {
        let temp = TempDir::new().unwrap();
        let mut context = script_context(&temp);
        handle_line(&mut context, "class add Math monday 09:00 10:00 --color 123456").unwrap();
        assert_eq!(context.organizer.schedule.all()[0].color, "#123456");
        handle_line(&mut context, "class edit 1 Math monday 09:00 10:00 --color abcdef").unwrap();
        assert_eq!(context.organizer.schedule.all()[0].color, "#abcdef");
        assert!(handle_line(&mut context, "class add Art friday 13:00 14:00 --color red").is_err());
    }

    #[test]
    fn unknown_ids_are_ignored_on_edit_and_delete() {
        let temp = TempDir::new().unwrap();
        let mut context = script_context(&temp);
        handle_line(&mut context, "task add Essay").unwrap();
        let revision = context.organizer.tasks.revision();

        handle_line(&mut context, "task edit task_missing Renamed").unwrap();
        handle_line(&mut context, "task done task_missing").unwrap();
        handle_line(&mut context, "task remove task_missing").unwrap();
        handle_line(&mut context, "budget remove transaction_missing").unwrap();

        assert_eq!(context.organizer.tasks.revision(), revision);
        assert_eq!(context.organizer.tasks.all()[0].text, "Essay");
        assert!(handle_line(&mut context, "task remove 7").is_err(), "row out of range");
    }

    #[test]
    fn config_set_persists_and_exit_stops_the_loop() {
        let temp = TempDir::new().unwrap();
        let mut context = script_context(&temp);
        handle_line(&mut context, "config set currency usd").unwrap();
        assert_eq!(context.currency(), "USD");
        assert_eq!(context.config_manager.load().unwrap().currency, "USD");
        assert!(handle_line(&mut context, "config set colour red").is_err());

        let control = handle_line(&mut context, "exit").unwrap();
        assert_eq!(control, LoopControl::Exit);
        assert!(!context.running);
    }

    #[test]
    fn flags_are_split_from_positionals() {
        let (positional, flags) =
            split_flags(&["Buy", "milk", "--priority", "high", "now"]).unwrap();
        assert_eq!(positional, vec!["Buy", "milk", "now"]);
        assert_eq!(flags.get("priority"), Some(&"high"));
        assert!(split_flags(&["--due"]).is_err());
    }
}
