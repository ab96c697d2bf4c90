pub mod category;
pub mod goal;
pub mod habit;
pub mod transaction;
