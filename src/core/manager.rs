//! Generic record collection with validated commands and write-through persistence.

use std::{collections::HashSet, sync::Arc};

use chrono::{DateTime, Utc};

use crate::core::errors::{OrganizerError, Result};
use crate::core::view::{self, ListView, ViewPreferences};
use crate::domain::{
    generate_id, Displayable, Identifiable, NamedEntity, Record, Task, ValidationError,
};
use crate::storage::Store;

/// Outcome of a successful mutation. `persisted == false` means the in-memory
/// change stands but could not be written; callers surface a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub id: String,
    pub persisted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    Removed(Mutation),
    Declined,
    NotFound,
}

/// Yes/no decision requested before destructive commands.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Owns one collection of records, newest first, mirrored to a store key.
pub struct RecordManager<R: Record> {
    records: Vec<R>,
    view: ViewPreferences,
    store: Arc<Store>,
    revision: u64,
}

impl<R: Record> RecordManager<R> {
    /// Rehydrates the collection and its view preferences from the store.
    pub fn load(store: Arc<Store>) -> Self {
        let records: Vec<R> = store.get(R::STORAGE_KEY).unwrap_or_default();
        let view = store.get(&Self::view_key()).unwrap_or_default();
        tracing::debug!(kind = R::PLURAL, count = records.len(), "loaded collection");
        Self {
            records,
            view,
            store,
            revision: 0,
        }
    }

    pub fn view_key() -> String {
        format!("{}_view", R::STORAGE_KEY)
    }

    pub fn all(&self) -> &[R] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Incremented on every successful mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn add(&mut self, draft: R::Draft) -> Result<Mutation> {
        self.add_at(draft, Utc::now())
    }

    /// Validates and prepends a new record created at `now`.
    pub fn add_at(&mut self, draft: R::Draft, now: DateTime<Utc>) -> Result<Mutation> {
        R::validate(&draft)?;
        let record = R::from_draft(self.unique_id(now), now, draft);
        self.ensure_no_conflict(&record, None)?;
        let id = record.id().to_string();
        self.records.insert(0, record);
        tracing::debug!(kind = R::PLURAL, %id, "added record");
        Ok(self.commit(id))
    }

    /// Replaces the editable fields of `id`. Unknown ids are a silent no-op.
    pub fn update(&mut self, id: &str, draft: R::Draft) -> Result<Option<Mutation>> {
        let Some(index) = self.position(id) else {
            tracing::debug!(kind = R::PLURAL, id, "update skipped for unknown id");
            return Ok(None);
        };
        R::validate(&draft)?;
        let mut candidate = self.records[index].clone();
        candidate.apply(draft);
        self.ensure_no_conflict(&candidate, Some(id))?;
        self.records[index] = candidate;
        Ok(Some(self.commit(id.to_string())))
    }

    /// Removes `id` once `confirm` approves a prompt naming the record.
    pub fn remove(&mut self, id: &str, confirm: &dyn Confirm) -> Removal {
        let Some(record) = self.get(id) else {
            return Removal::NotFound;
        };
        let prompt = format!("Are you sure you want to delete \"{}\"?", record.name());
        if !confirm.confirm(&prompt) {
            return Removal::Declined;
        }
        self.records.retain(|record| record.id() != id);
        tracing::debug!(kind = R::PLURAL, id, "removed record");
        Removal::Removed(self.commit(id.to_string()))
    }

    /// Validates records from outside the manager: every record passes its
    /// draft rules and no id appears twice.
    pub fn check_all(records: &[R]) -> Result<()> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in records {
            record.check()?;
            if !seen.insert(record.id()) {
                return Err(ValidationError::DuplicateId(record.id().to_string()).into());
            }
        }
        Ok(())
    }

    /// Swaps in a whole collection, as when restoring a backup. Callers run
    /// [`check_all`](Self::check_all) first.
    pub fn replace_all(&mut self, records: Vec<R>) -> bool {
        self.records = records;
        self.revision += 1;
        self.persist()
    }

    /// Re-reads the collection and view preferences from the store,
    /// discarding unsaved state.
    pub fn reload(&mut self) {
        self.records = self.store.get(R::STORAGE_KEY).unwrap_or_default();
        self.view = self.store.get(&Self::view_key()).unwrap_or_default();
        self.revision += 1;
    }

    pub fn persist(&self) -> bool {
        let saved = self.store.set(R::STORAGE_KEY, &self.records);
        if !saved {
            tracing::warn!(kind = R::PLURAL, "changes kept in memory but not saved");
        }
        saved
    }

    pub fn view(&self) -> &ViewPreferences {
        &self.view
    }

    pub fn set_view(&mut self, view: ViewPreferences) -> bool {
        self.view = view;
        self.store.set(&Self::view_key(), &self.view)
    }

    /// Edits the view preferences in place and persists them.
    pub fn update_view<F>(&mut self, edit: F) -> bool
    where
        F: FnOnce(&mut ViewPreferences),
    {
        let mut view = self.view.clone();
        edit(&mut view);
        self.set_view(view)
    }

    pub fn render(&self) -> ListView<'_, R> {
        view::render(&self.records, &self.view)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    fn commit(&mut self, id: String) -> Mutation {
        self.revision += 1;
        let persisted = self.persist();
        Mutation { id, persisted }
    }

    fn unique_id(&self, now: DateTime<Utc>) -> String {
        loop {
            let id = generate_id(R::ID_PREFIX, now);
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn ensure_no_conflict(&self, candidate: &R, exclude: Option<&str>) -> Result<()> {
        let clash = self
            .records
            .iter()
            .filter(|existing| Some(existing.id()) != exclude)
            .find(|existing| candidate.conflicts_with(existing));
        match clash {
            Some(existing) => Err(OrganizerError::Conflict(format!(
                "overlaps with {}",
                existing.display_label()
            ))),
            None => Ok(()),
        }
    }
}

impl RecordManager<Task> {
    /// Flips the completion flag of a task. Unknown ids are ignored.
    pub fn toggle_complete(&mut self, id: &str) -> Option<Mutation> {
        let task = self.records.iter_mut().find(|task| task.id == id)?;
        task.completed = !task.completed;
        tracing::debug!(id, completed = task.completed, "toggled task");
        Some(self.commit(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Priority, TaskDraft, ValidationError};
    use crate::storage::MemoryStore;

    fn manager() -> RecordManager<Task> {
        RecordManager::load(Arc::new(Store::in_memory()))
    }

    #[test]
    fn add_prepends_and_persists() {
        let mut tasks = manager();
        let first = tasks.add(TaskDraft::new("first", Priority::Low)).unwrap();
        let second = tasks.add(TaskDraft::new("second", Priority::Low)).unwrap();
        assert!(first.persisted && second.persisted);
        assert_eq!(tasks.all()[0].id, second.id);
        assert_eq!(tasks.revision(), 2);

        let reloaded: RecordManager<Task> = RecordManager::load(tasks.store.clone());
        assert_eq!(reloaded.all(), tasks.all());
    }

    #[test]
    fn invalid_add_leaves_collection_untouched() {
        let mut tasks = manager();
        let err = tasks.add(TaskDraft::new("   ", Priority::High)).unwrap_err();
        assert!(matches!(
            err,
            OrganizerError::Validation(ValidationError::Required(_))
        ));
        assert!(tasks.is_empty());
        assert_eq!(tasks.revision(), 0);
    }

    #[test]
    fn update_unknown_id_is_a_no_op() {
        let mut tasks = manager();
        tasks.add(TaskDraft::new("keep", Priority::Low)).unwrap();
        let outcome = tasks
            .update("task_0_missing", TaskDraft::new("changed", Priority::High))
            .unwrap();
        assert_eq!(outcome, None);
        assert_eq!(tasks.all()[0].text, "keep");
    }

    #[test]
    fn update_keeps_identity_and_rejects_empty_text() {
        let mut tasks = manager();
        let id = tasks.add(TaskDraft::new("draft", Priority::Low)).unwrap().id;
        let created = tasks.all()[0].created_at;
        tasks
            .update(&id, TaskDraft::new("final", Priority::High))
            .unwrap();
        let task = tasks.get(&id).unwrap();
        assert_eq!(task.text, "final");
        assert_eq!(task.created_at, created);

        assert!(tasks.update(&id, TaskDraft::new("", Priority::High)).is_err());
        assert_eq!(tasks.get(&id).unwrap().text, "final");
    }

    #[test]
    fn remove_respects_confirmation() {
        let mut tasks = manager();
        let id = tasks.add(TaskDraft::new("Buy milk", Priority::Low)).unwrap().id;

        let declined = tasks.remove(&id, &|prompt: &str| {
            assert!(prompt.contains("Buy milk"));
            false
        });
        assert_eq!(declined, Removal::Declined);
        assert_eq!(tasks.len(), 1);

        assert!(matches!(tasks.remove(&id, &|_: &str| true), Removal::Removed(_)));
        assert!(tasks.get(&id).is_none());
        assert_eq!(tasks.remove(&id, &|_: &str| true), Removal::NotFound);
    }

    #[test]
    fn storage_failure_is_reported_but_memory_keeps_change() {
        let store = Arc::new(Store::new(Box::new(MemoryStore::with_quota(16))));
        let mut tasks: RecordManager<Task> = RecordManager::load(store);
        let outcome = tasks
            .add(TaskDraft::new("too big for the quota", Priority::Low))
            .unwrap();
        assert!(!outcome.persisted);
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn toggle_flips_and_ignores_unknown_ids() {
        let mut tasks = manager();
        let id = tasks.add(TaskDraft::new("toggle me", Priority::Low)).unwrap().id;
        assert!(tasks.toggle_complete(&id).is_some());
        assert!(tasks.get(&id).unwrap().completed);
        assert!(tasks.toggle_complete(&id).is_some());
        assert!(!tasks.get(&id).unwrap().completed);
        assert_eq!(tasks.toggle_complete("nope"), None);
    }

    #[test]
    fn view_preferences_round_trip_through_store() {
        let mut tasks = manager();
        let prefs = ViewPreferences {
            hide_completed: true,
            ..ViewPreferences::default()
        };
        assert!(tasks.set_view(prefs.clone()));
        let reloaded: RecordManager<Task> = RecordManager::load(tasks.store.clone());
        assert_eq!(reloaded.view(), &prefs);
    }
}
