pub mod budget_service;
pub mod export_service;
pub mod overview_service;
pub mod schedule_service;
pub mod todo_service;

pub use budget_service::{BudgetAlert, BudgetService, BudgetStatus, BudgetSummary};
pub use export_service::{Backup, ExportService, RestoreReport};
pub use overview_service::{Overview, OverviewService, OverviewTracker};
pub use schedule_service::ScheduleService;
pub use todo_service::TodoService;
