pub mod discover;
pub mod report;
