//! Test utilities for the wanderlust crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`). The
//! in-memory adapters honour the same uniqueness and cascade rules as the
//! PostgreSQL schema so HTTP scenarios can run without a database.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

mod images;
mod in_memory;

pub use images::RecordingImageStore;
pub use in_memory::InMemoryStore;

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn fixture_timestamp() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single() {
        Some(timestamp) => timestamp,
        None => panic!("fixture timestamp must be valid"),
    }
}

/// Clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Default for FixedClock {
    fn default() -> Self {
        Self(fixture_timestamp())
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Clock that advances one second every time it is read.
///
/// Gives each created entity a distinct timestamp so newest-first ordering
/// is deterministic.
#[derive(Debug)]
pub struct SteppingClock(Mutex<DateTime<Utc>>);

impl Default for SteppingClock {
    fn default() -> Self {
        Self(Mutex::new(fixture_timestamp()))
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut now = lock(&self.0);
        let current = *now;
        *now += TimeDelta::seconds(1);
        current
    }
}
