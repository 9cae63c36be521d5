pub mod habit;
pub mod mood;
pub mod settings;
