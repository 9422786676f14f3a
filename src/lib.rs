#![doc(test(attr(deny(warnings))))]

//! Organizer Core keeps a student's tasks, weekly class schedule and budget
//! in validated record collections persisted to a key-value store.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use crate::core::{Organizer, OrganizerError, Result};

static INIT: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT.call_once(|| {
        utils::init_tracing();
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "organizer core initialized");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_is_idempotent() {
        super::init();
        super::init();
    }
}
