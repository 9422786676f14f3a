use std::sync::Arc;

use crate::config::Theme;
use crate::core::manager::RecordManager;
use crate::domain::{ClassSession, Task, Transaction};
use crate::storage::Store;

pub const THEME_KEY: &str = "student_organizer_theme";

/// Owns the shared store and the three record collections.
pub struct Organizer {
    store: Arc<Store>,
    pub tasks: RecordManager<Task>,
    pub schedule: RecordManager<ClassSession>,
    pub budget: RecordManager<Transaction>,
}

/// Revision counters of the three collections, in task/schedule/budget order.
pub type Revisions = [u64; 3];

impl Organizer {
    pub fn open(store: Arc<Store>) -> Self {
        tracing::info!("loading organizer collections");
        Self {
            tasks: RecordManager::load(store.clone()),
            schedule: RecordManager::load(store.clone()),
            budget: RecordManager::load(store.clone()),
            store,
        }
    }

    pub fn in_memory() -> Self {
        Self::open(Arc::new(Store::in_memory()))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn revisions(&self) -> Revisions {
        [
            self.tasks.revision(),
            self.schedule.revision(),
            self.budget.revision(),
        ]
    }

    pub fn theme(&self) -> Theme {
        self.store.get(THEME_KEY).unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) -> bool {
        self.store.set(THEME_KEY, &theme)
    }

    /// Wipes every stored key and empties the in-memory collections.
    pub fn clear_all(&mut self) -> bool {
        let cleared = self.store.clear();
        self.tasks.reload();
        self.schedule.reload();
        self.budget.reload();
        cleared
    }
}
