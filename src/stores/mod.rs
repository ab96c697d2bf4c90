mod collection;
pub mod goal_store;
pub mod habit_store;
pub mod transaction_store;
