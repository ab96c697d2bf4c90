use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub streak: u32,
    pub created_at: DateTime<Utc>,
}

impl Habit {
    pub fn new(id: String, name: String, description: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            description,
            completed: false,
            streak: 0,
            created_at,
        }
    }

    /// Flips today's completion. Completing extends the streak, undoing it
    /// takes the day back off.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
        self.streak = if self.completed {
            self.streak.saturating_add(1)
        } else {
            self.streak.saturating_sub(1)
        };
    }

    pub fn reset(&mut self) {
        self.completed = false;
        self.streak = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_habit() -> Habit {
        Habit::new(
            "h1".to_string(),
            "Read".to_string(),
            String::new(),
            Utc::now(),
        )
    }

    #[test]
    fn test_toggle_twice_restores_streak() {
        let mut habit = create_test_habit();
        habit.toggle();
        assert!(habit.completed);
        assert_eq!(habit.streak, 1);

        habit.toggle();
        assert!(!habit.completed);
        assert_eq!(habit.streak, 0);
    }

    #[test]
    fn test_untoggle_never_goes_negative() {
        let mut habit = create_test_habit();
        habit.completed = true;
        habit.streak = 0;

        habit.toggle();
        assert_eq!(habit.streak, 0);
    }

    #[test]
    fn test_habit_json_uses_camel_case() {
        let json = serde_json::to_value(create_test_habit()).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
    }
}
