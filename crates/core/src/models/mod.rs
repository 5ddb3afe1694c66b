pub mod holding;
pub mod portfolio;
pub mod report;
pub mod settings;
