pub mod class_session;
pub mod common;
pub mod task;
pub mod transaction;

pub use class_session::{ClassDraft, ClassSession, ClockTime, Day, ScheduleStats};
pub use common::{
    generate_id, Displayable, Identifiable, NamedEntity, Record, ValidationError,
};
pub use task::{Priority, Task, TaskDraft, TaskStats};
pub use transaction::{BudgetStats, Category, Transaction, TransactionDraft, TransactionKind};
