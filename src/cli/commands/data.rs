use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::cli::context::{usage, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::services::ExportService;
use crate::utils::paths::{ensure_dir, export_dir_in};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "export",
            "Export transactions as CSV or everything as a JSON backup",
            "export csv|backup [path]",
            cmd_export,
        ),
        CommandEntry::new(
            "import",
            "Replace all data with a JSON backup",
            "import <path>",
            cmd_import,
        ),
        CommandEntry::new(
            "clear",
            "Delete every task, class, transaction and preference",
            "clear",
            cmd_clear,
        ),
    ]
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let now = context.clock.now();
    let (contents, default_name) = match args.first().map(|kind| kind.to_ascii_lowercase()) {
        Some(kind) if kind == "csv" => (
            ExportService::transactions_csv(context.organizer.budget.all())?,
            ExportService::csv_file_name(now),
        ),
        Some(kind) if kind == "backup" || kind == "json" => (
            ExportService::backup_json(&context.organizer, now)?,
            ExportService::backup_file_name(now),
        ),
        _ => return Err(usage("export csv|backup [path]")),
    };
    let path = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => {
            let dir = export_dir_in(context.config_manager.base_dir());
            ensure_dir(&dir)?;
            dir.join(default_name)
        }
    };
    let written = ExportService::write_file(&path, &contents)?;
    output::success(format!("Exported to {}", written.display()));
    Ok(())
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [path] = args else {
        return Err(usage("import <path>"));
    };
    let path = Path::new(path);
    let json = fs::read_to_string(path).map_err(|err| {
        CommandError::InvalidArguments(format!("cannot read {}: {err}", path.display()))
    })?;
    if !io::confirm(context.mode, "Importing replaces all current data. Continue?") {
        output::info("Import cancelled.");
        return Ok(());
    }
    let report = ExportService::restore_backup(&mut context.organizer, &json)?;
    output::success(format!(
        "Imported {} tasks, {} classes and {} transactions.",
        report.tasks, report.classes, report.transactions
    ));
    if !report.persisted {
        context.warn_unsaved();
    }
    Ok(())
}

fn cmd_clear(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !io::confirm(context.mode, "Delete all organizer data?") {
        output::info("Nothing deleted.");
        return Ok(());
    }
    let cleared = context.organizer.clear_all();
    output::set_theme(context.organizer.theme());
    if cleared {
        output::success("All data cleared.");
    } else {
        context.warn_unsaved();
    }
    Ok(())
}
