use crate::db::kv_store::KeyValueStore;
use crate::db::repository::GOALS_KEY;
use crate::error::Error;
use crate::models::goal::Goal;
use crate::stores::collection::{PersistedCollection, new_id};
use chrono::{NaiveDate, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
}

pub struct GoalStore<S: KeyValueStore> {
    collection: PersistedCollection<Goal, S>,
}

impl<S: KeyValueStore> GoalStore<S> {
    pub fn load(store: S) -> Self {
        Self {
            collection: PersistedCollection::load(store, GOALS_KEY),
        }
    }

    pub fn list(&self) -> &[Goal] {
        self.collection.records()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.collection.unsaved()
    }

    /// Creates a goal. `target` is the raw text entered and must be a whole
    /// number of at least one.
    pub fn add(
        &mut self,
        name: &str,
        description: &str,
        target: &str,
        target_date: Option<NaiveDate>,
    ) -> Result<Goal, Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid_input("Goal name cannot be empty"));
        }
        let target = match target.trim().parse::<u32>() {
            Ok(target) if target >= 1 => target,
            _ => {
                return Err(Error::invalid_input(format!(
                    "Invalid target '{}'. Must be a whole number of at least 1",
                    target.trim()
                )));
            }
        };

        let id = new_id(|candidate| self.list().iter().any(|g| g.id == candidate));
        let goal = Goal::new(
            id,
            name.to_string(),
            description.trim().to_string(),
            target,
            target_date,
            Utc::now(),
        );
        tracing::info!("Adding goal {} ({}) with target {}", goal.name, goal.id, goal.target);
        self.collection
            .mutate(|records| records.insert(0, goal.clone()));
        Ok(goal)
    }

    pub fn toggle(&mut self, id: &str) -> Option<Goal> {
        self.update(id, Goal::toggle)
    }

    /// Moves the goal's progress by `delta`, keeping it within `0..=target`.
    pub fn update_progress(&mut self, id: &str, delta: i64) -> Option<Goal> {
        self.update(id, |goal| goal.update_progress(delta))
    }

    pub fn remove(&mut self, id: &str) {
        self.collection.mutate(|records| records.retain(|g| g.id != id));
    }

    pub fn stats(&self) -> GoalStats {
        let total = self.list().len();
        let completed = self.list().iter().filter(|g| g.completed).count();
        GoalStats {
            total,
            completed,
            in_progress: total - completed,
        }
    }

    fn update(&mut self, id: &str, change: impl FnOnce(&mut Goal)) -> Option<Goal> {
        if !self.list().iter().any(|g| g.id == id) {
            return None;
        }
        self.collection.mutate(|records| {
            records.iter_mut().find(|g| g.id == id).map(|goal| {
                change(goal);
                goal.clone()
            })
        })
    }
}
