//! Deterministic generation of the recurring household bill schedule.

pub mod generator;

pub use generator::{generate_schedule, merge_by_id, target_year, ROLLOVER_MONTH_INDEX};
