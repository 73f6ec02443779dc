//! Services and shared helpers built on the bill domain.

pub mod services;
pub mod time;
pub mod utils;
