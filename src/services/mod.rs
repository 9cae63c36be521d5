pub mod assessment_service;
pub mod habit_aggregator;
pub mod habit_service;
pub mod mood_catalog;
pub mod session_service;
