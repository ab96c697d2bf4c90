use crate::db::kv_store::KeyValueStore;
use crate::db::repository::HABITS_KEY;
use crate::error::Error;
use crate::models::habit::Habit;
use crate::stores::collection::{PersistedCollection, new_id};
use chrono::Utc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HabitStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

pub struct HabitStore<S: KeyValueStore> {
    collection: PersistedCollection<Habit, S>,
}

impl<S: KeyValueStore> HabitStore<S> {
    pub fn load(store: S) -> Self {
        Self {
            collection: PersistedCollection::load(store, HABITS_KEY),
        }
    }

    pub fn list(&self) -> &[Habit] {
        self.collection.records()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.collection.unsaved()
    }

    pub fn add(&mut self, name: &str, description: &str) -> Result<Habit, Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid_input("Habit name cannot be empty"));
        }

        let id = new_id(|candidate| self.list().iter().any(|h| h.id == candidate));
        let habit = Habit::new(id, name.to_string(), description.trim().to_string(), Utc::now());
        tracing::info!("Adding habit {} ({})", habit.name, habit.id);
        self.collection
            .mutate(|records| records.insert(0, habit.clone()));
        Ok(habit)
    }

    /// Flips the habit's completion for today. Returns the updated habit, or
    /// `None` if there is no habit with `id`.
    pub fn toggle(&mut self, id: &str) -> Option<Habit> {
        if !self.list().iter().any(|h| h.id == id) {
            return None;
        }
        self.collection.mutate(|records| {
            records.iter_mut().find(|h| h.id == id).map(|habit| {
                habit.toggle();
                habit.clone()
            })
        })
    }

    pub fn remove(&mut self, id: &str) {
        self.collection.mutate(|records| records.retain(|h| h.id != id));
    }

    /// Clears completion and streaks of every habit.
    pub fn reset_all(&mut self) {
        tracing::info!("Resetting {} habits", self.list().len());
        self.collection
            .mutate(|records| records.iter_mut().for_each(Habit::reset));
    }

    pub fn stats(&self) -> HabitStats {
        let total = self.list().len();
        let completed = self.list().iter().filter(|h| h.completed).count();
        HabitStats {
            total,
            completed,
            pending: total - completed,
        }
    }
}
