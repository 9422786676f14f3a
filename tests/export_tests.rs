mod common;

use std::fs;

use chrono::{TimeZone, Utc};
use organizer_core::{
    core::services::ExportService,
    domain::{Category, ClassDraft, ClockTime, Day, Priority, TaskDraft, TransactionDraft},
    Organizer, OrganizerError,
};
use organizer_core::domain::ValidationError;

fn populated() -> Organizer {
    let mut organizer = Organizer::in_memory();
    let jan = Utc.with_ymd_and_hms(2025, 1, 5, 10, 0, 0).unwrap();
    organizer
        .tasks
        .add_at(TaskDraft::new("Finish lab report", Priority::High), jan)
        .unwrap();
    organizer
        .schedule
        .add_at(
            ClassDraft::new(
                "Calculus",
                Day::Thursday,
                ClockTime::hm(8, 0).unwrap(),
                ClockTime::hm(9, 30).unwrap(),
            ),
            jan,
        )
        .unwrap();
    organizer
        .budget
        .add_at(TransactionDraft::income("Allowance", 1500.0, Category::Other), jan)
        .unwrap();
    organizer
        .budget
        .add_at(
            TransactionDraft::expense("Textbook \"Vol. 2\"", 420.75, Category::Education),
            jan,
        )
        .unwrap();
    organizer
}

#[test]
fn csv_export_lists_every_transaction_with_formatted_dates() {
    let organizer = populated();
    let csv = ExportService::transactions_csv(organizer.budget.all()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Type,Description,Amount,Category,Date");
    assert_eq!(
        lines[1],
        r#"expense,"Textbook ""Vol. 2""",420.75,education,"Jan 5, 2025""#
    );
    assert_eq!(lines[2], r#"income,Allowance,1500,other,"Jan 5, 2025""#);
    assert_eq!(lines.len(), 3);
}

#[test]
fn backup_restores_into_an_empty_organizer() {
    let source = populated();
    let now = Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap();
    let json = ExportService::backup_json(&source, now).unwrap();
    assert!(json.contains("\"exportDate\""));

    let (mut target, _) = common::setup_organizer();
    let report = ExportService::restore_backup(&mut target, &json).unwrap();
    assert_eq!((report.tasks, report.classes, report.transactions), (1, 1, 2));
    assert!(report.persisted);
    assert_eq!(target.tasks.all(), source.tasks.all());
    assert_eq!(target.schedule.all(), source.schedule.all());
    assert_eq!(target.budget.all(), source.budget.all());
}

#[test]
fn malformed_backup_leaves_data_untouched() {
    let mut organizer = populated();
    assert!(ExportService::restore_backup(&mut organizer, "[1, 2, 3]").is_err());
    assert_eq!(organizer.tasks.len(), 1);
    assert_eq!(organizer.budget.len(), 2);
}

fn backup_with(tasks: &str, transactions: &str) -> String {
    format!(
        r#"{{"tasks":{tasks},"classes":[],"transactions":{transactions},"exportDate":"2025-01-06T00:00:00Z"}}"#
    )
}

const GOOD_TASK: &str = r#"{"id":"task_1","text":"Essay","priority":"high","completed":false,"createdAt":"2025-01-05T10:00:00Z"}"#;
const GOOD_TXN: &str = r#"{"id":"transaction_1","type":"income","description":"Allowance","amount":50,"category":"other","createdAt":"2025-01-05T10:00:00Z"}"#;

#[test]
fn invalid_backup_records_are_rejected_before_anything_is_replaced() {
    let blank_task = GOOD_TASK.replace("Essay", "   ");
    let negative_txn = GOOD_TXN.replace("\"amount\":50", "\"amount\":-50");
    let cases = [
        backup_with(&format!("[{blank_task}]"), "[]"),
        backup_with(&format!("[{GOOD_TASK},{GOOD_TASK}]"), "[]"),
        backup_with(&format!("[{GOOD_TASK}]"), &format!("[{negative_txn}]")),
    ];

    for json in &cases {
        let mut organizer = populated();
        let before = (
            organizer.tasks.all().to_vec(),
            organizer.schedule.all().to_vec(),
            organizer.budget.all().to_vec(),
        );
        let err = ExportService::restore_backup(&mut organizer, json).unwrap_err();
        assert!(matches!(err, OrganizerError::Validation(_)), "{err}");
        assert_eq!(organizer.tasks.all(), before.0.as_slice());
        assert_eq!(organizer.schedule.all(), before.1.as_slice());
        assert_eq!(organizer.budget.all(), before.2.as_slice());
    }

    let mut organizer = populated();
    let err = ExportService::restore_backup(
        &mut organizer,
        &backup_with(&format!("[{GOOD_TASK},{GOOD_TASK}]"), "[]"),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        OrganizerError::Validation(ValidationError::DuplicateId(ref id)) if id == "task_1"
    ));

    let report = ExportService::restore_backup(
        &mut organizer,
        &backup_with(&format!("[{GOOD_TASK}]"), &format!("[{GOOD_TXN}]")),
    )
    .unwrap();
    assert_eq!((report.tasks, report.transactions), (1, 1));
}

#[test]
fn export_files_are_written_atomically_with_default_names() {
    let base = common::temp_base();
    let now = Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap();
    let name = ExportService::csv_file_name(now);
    assert_eq!(name, format!("budget_transactions_{}.csv", now.timestamp_millis()));
    assert!(ExportService::backup_file_name(now).starts_with("student_organizer_backup_"));

    let path = base.join(name);
    let written = ExportService::write_file(&path, "Type\n").unwrap();
    assert_eq!(fs::read_to_string(&written).unwrap(), "Type\n");
    assert!(!base.join(format!("{}.tmp", path.file_name().unwrap().to_string_lossy())).exists());
}
