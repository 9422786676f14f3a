pub mod budget;
pub mod class;
pub mod config;
pub mod data;
pub mod overview;
pub mod system;
pub mod task;

use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::manager::RecordManager;
use crate::core::view::{Affordance, ListView};
use crate::domain::{Identifiable, Record};

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(task::definitions());
    commands.extend(class::definitions());
    commands.extend(budget::definitions());
    commands.extend(overview::definitions());
    commands.extend(data::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

/// Prints the rendered view of a collection as numbered rows.
pub(crate) fn print_rows<R: Record>(manager: &RecordManager<R>, line: impl Fn(&R) -> String) {
    match manager.render() {
        ListView::Empty(message) => output::info(message),
        ListView::Rows(rows) => {
            for (idx, row) in rows.iter().enumerate() {
                let actions: Vec<&str> = row
                    .affordances
                    .iter()
                    .map(|affordance| match affordance {
                        Affordance::Toggle => "done",
                        Affordance::Edit => "edit",
                        Affordance::Delete => "remove",
                    })
                    .collect();
                output::info(format!("{:>3}. {}", idx + 1, line(row.record)));
                output::hint(format!("     {} | {}", row.record.id(), actions.join("/")));
            }
        }
    }
}
