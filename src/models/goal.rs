use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// How far a single progress button press moves a goal.
pub const PROGRESS_STEP: i64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub target: u32,
    #[serde(default)]
    pub current: u32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, with = "optional_date")]
    pub target_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(
        id: String,
        name: String,
        description: String,
        target: u32,
        target_date: Option<NaiveDate>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            target,
            current: 0,
            completed: false,
            target_date,
            created_at,
        }
    }

    /// Marking a goal complete fills its progress; reopening it leaves the
    /// progress where it was.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
        if self.completed {
            self.current = self.target;
        }
    }

    pub fn update_progress(&mut self, delta: i64) {
        let next = (i64::from(self.current) + delta).clamp(0, i64::from(self.target));
        self.current = next as u32;
        self.completed = self.current >= self.target;
    }

    /// Whole-number percentage, capped at 100.
    pub fn progress_percent(&self) -> u32 {
        if self.target == 0 {
            return 100;
        }
        let ratio = f64::from(self.current) / f64::from(self.target) * 100.0;
        ratio.min(100.0).round() as u32
    }
}

/// Target dates are stored as `""` when unset.
mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_goal(target: u32) -> Goal {
        Goal::new(
            "g1".to_string(),
            "Read 50 books".to_string(),
            String::new(),
            target,
            None,
            Utc::now(),
        )
    }

    #[test]
    fn test_progress_is_clamped() {
        let mut goal = create_test_goal(25);
        goal.update_progress(-PROGRESS_STEP);
        assert_eq!(goal.current, 0);
        assert!(!goal.completed);

        goal.update_progress(PROGRESS_STEP);
        goal.update_progress(PROGRESS_STEP);
        goal.update_progress(PROGRESS_STEP);
        assert_eq!(goal.current, 25);
        assert!(goal.completed);
    }

    #[test]
    fn test_progress_below_target_reopens_goal() {
        let mut goal = create_test_goal(10);
        goal.toggle();
        assert!(goal.completed);
        assert_eq!(goal.current, 10);

        goal.update_progress(-5);
        assert_eq!(goal.current, 5);
        assert!(!goal.completed);
    }

    #[test]
    fn test_toggle_off_keeps_progress() {
        let mut goal = create_test_goal(100);
        goal.update_progress(30);
        goal.toggle();
        goal.toggle();
        assert!(!goal.completed);
        assert_eq!(goal.current, 100);
    }

    #[test]
    fn test_progress_percent() {
        let mut goal = create_test_goal(3);
        goal.current = 1;
        assert_eq!(goal.progress_percent(), 33);
        goal.current = 3;
        assert_eq!(goal.progress_percent(), 100);
    }

    #[test]
    fn test_empty_target_date_round_trips() {
        let goal = create_test_goal(100);
        let json = serde_json::to_string(&goal).unwrap();
        assert!(json.contains(r#""targetDate":"""#));

        let parsed: Goal = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.target_date, None);
    }

    #[test]
    fn test_target_date_parses() {
        let json = r#"{"id":"1","name":"Run","target":5,"current":2,"completed":false,
            "targetDate":"2025-06-30","createdAt":"2025-01-01T10:00:00Z"}"#;
        let goal: Goal = serde_json::from_str(json).unwrap();
        assert_eq!(goal.target_date, NaiveDate::from_ymd_opt(2025, 6, 30));
        assert_eq!(goal.current, 2);
    }
}
