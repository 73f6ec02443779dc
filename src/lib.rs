#![doc(test(attr(deny(warnings))))]

//! Finance Splitter tracks a two-person household's recurring bills: it
//! generates the yearly schedule, splits every bill 50/50, and keeps records in
//! a database with a local cache to fall back on.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod schedule;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Finance Splitter tracing initialized.");
    });
}
