use std::path::PathBuf;

use crate::cli::context::{usage, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::config::Config;
use crate::core::services::OverviewTracker;

const USAGE: &str = "config [show|set <key> <value>|backup [note]|backups|restore <name>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and manage application settings",
        "config show\n\
         config set currency|locale|overview_debounce_ms|storage_quota_bytes|data_dir <value>\n\
         config backup [note] | backups | restore <name>",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((action, rest)) = args.split_first() else {
        return show(context);
    };
    match action.to_ascii_lowercase().as_str() {
        "show" => show(context),
        "set" => {
            let [key, value @ ..] = rest else {
                return Err(usage("config set <key> <value>"));
            };
            if value.is_empty() {
                return Err(usage("config set <key> <value>"));
            }
            apply(&mut context.config, key, &value.join(" "))?;
            context.config_manager.save(&context.config)?;
            context.tracker = OverviewTracker::new(context.config.overview_debounce());
            if matches!(*key, "storage_quota_bytes" | "data_dir") {
                output::hint("Storage settings take effect the next time the shell starts.");
            }
            output::success(format!("Updated `{key}`."));
            Ok(())
        }
        "backup" => {
            let note = (!rest.is_empty()).then(|| rest.join(" "));
            let name = context
                .config_manager
                .backup(&context.config, note.as_deref())?;
            output::success(format!("Configuration backed up as {name}."));
            Ok(())
        }
        "backups" => {
            let names = context.config_manager.list_backups()?;
            output::section("Configuration backups");
            if names.is_empty() {
                output::info("No backups yet.");
            }
            for name in names {
                output::info(format!("  {name}"));
            }
            Ok(())
        }
        "restore" => {
            let [name] = rest else {
                return Err(usage("config restore <name>"));
            };
            context.config = context.config_manager.restore(name)?;
            context.tracker = OverviewTracker::new(context.config.overview_debounce());
            output::success(format!("Configuration restored from {name}."));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{other}`; usage: {USAGE}"
        ))),
    }
}

fn show(context: &ShellContext) -> CommandResult {
    let config = &context.config;
    output::section("Configuration");
    output::info(format!("  File                 : {}", context.config_manager.path().display()));
    output::info(format!("  currency             : {}", config.currency));
    output::info(format!("  locale               : {}", config.locale));
    output::info(format!("  overview_debounce_ms : {}", config.overview_debounce_ms));
    output::info(format!(
        "  storage_quota_bytes  : {}",
        config
            .storage_quota_bytes
            .map_or_else(|| "unlimited".to_string(), |bytes| bytes.to_string())
    ));
    output::info(format!(
        "  data_dir             : {}",
        config
            .resolve_data_dir(context.config_manager.base_dir())
            .display()
    ));
    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<(), CommandError> {
    let invalid = || CommandError::InvalidArguments(format!("invalid value `{value}` for {key}"));
    match key {
        "currency" => config.currency = value.to_ascii_uppercase(),
        "locale" => config.locale = value.to_string(),
        "overview_debounce_ms" => {
            config.overview_debounce_ms = value.parse().map_err(|_| invalid())?;
        }
        "storage_quota_bytes" => {
            config.storage_quota_bytes = match value {
                "none" | "unlimited" => None,
                other => Some(other.parse().map_err(|_| invalid())?),
            };
        }
        "data_dir" => {
            config.data_dir = match value {
                "default" => None,
                other => Some(PathBuf::from(other)),
            };
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown config key `{other}`"
            )))
        }
    }
    Ok(())
}
