//! CSV and JSON exports plus backup restore.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use csv::Writer;
use serde::{Deserialize, Serialize};

use crate::core::errors::{OrganizerError, Result};
use crate::core::manager::RecordManager;
use crate::core::organizer::Organizer;
use crate::domain::{ClassSession, Task, Transaction, ValidationError};
use crate::storage::json_backend::{tmp_path, write_atomic};
use crate::utils::format::format_date;

pub const CSV_HEADER: [&str; 5] = ["Type", "Description", "Amount", "Category", "Date"];

/// Full backup document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub classes: Vec<ClassSession>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    pub export_date: DateTime<Utc>,
}

/// Counts of records brought in by a restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreReport {
    pub tasks: usize,
    pub classes: usize,
    pub transactions: usize,
    pub persisted: bool,
}

pub struct ExportService;

impl ExportService {
    pub fn transactions_csv(transactions: &[Transaction]) -> Result<String> {
        if transactions.is_empty() {
            return Err(ValidationError::NothingToExport("transactions").into());
        }
        let mut wtr = Writer::from_writer(vec![]);
        wtr.write_record(CSV_HEADER)?;
        for txn in transactions {
            wtr.write_record([
                txn.kind.to_string(),
                txn.description.clone(),
                txn.amount.to_string(),
                txn.category.to_string(),
                format_date(txn.created_at),
            ])?;
        }
        let data = wtr
            .into_inner()
            .map_err(|err| OrganizerError::Export(err.to_string()))?;
        String::from_utf8(data).map_err(|err| OrganizerError::Export(err.to_string()))
    }

    pub fn backup(organizer: &Organizer, now: DateTime<Utc>) -> Backup {
        Backup {
            tasks: organizer.tasks.all().to_vec(),
            classes: organizer.schedule.all().to_vec(),
            transactions: organizer.budget.all().to_vec(),
            export_date: now,
        }
    }

    pub fn backup_json(organizer: &Organizer, now: DateTime<Utc>) -> Result<String> {
        Ok(serde_json::to_string_pretty(&Self::backup(organizer, now))?)
    }

    /// Replaces all three collections with the contents of a backup document.
    /// Nothing is replaced unless every record is valid and ids are unique.
    pub fn restore_backup(organizer: &mut Organizer, json: &str) -> Result<RestoreReport> {
        let backup: Backup = serde_json::from_str(json)
            .map_err(|err| OrganizerError::Export(format!("invalid backup: {err}")))?;
        RecordManager::<Task>::check_all(&backup.tasks)?;
        RecordManager::<ClassSession>::check_all(&backup.classes)?;
        RecordManager::<Transaction>::check_all(&backup.transactions)?;
        let report = RestoreReport {
            tasks: backup.tasks.len(),
            classes: backup.classes.len(),
            transactions: backup.transactions.len(),
            persisted: true,
        };
        let mut persisted = organizer.tasks.replace_all(backup.tasks);
        persisted &= organizer.schedule.replace_all(backup.classes);
        persisted &= organizer.budget.replace_all(backup.transactions);
        tracing::info!(
            tasks = report.tasks,
            classes = report.classes,
            transactions = report.transactions,
            "restored backup"
        );
        Ok(RestoreReport {
            persisted,
            ..report
        })
    }

    pub fn csv_file_name(now: DateTime<Utc>) -> String {
        format!("budget_transactions_{}.csv", now.timestamp_millis())
    }

    pub fn backup_file_name(now: DateTime<Utc>) -> String {
        format!("student_organizer_backup_{}.json", now.timestamp_millis())
    }

    /// Writes `contents` to `path` via a temporary sibling file.
    pub fn write_file(path: &Path, contents: &str) -> Result<PathBuf> {
        let tmp = tmp_path(path);
        write_atomic(&tmp, contents)?;
        fs::rename(&tmp, path)?;
        Ok(path.to_path_buf())
    }
}
