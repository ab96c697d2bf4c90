pub mod add;
pub mod analytics;
pub mod dashboard;
pub mod export;
pub mod import;
pub mod report;
