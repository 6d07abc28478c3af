#![allow(dead_code)]

use chrono::NaiveDate;
use questlog_core::{FixedClock, KeyValueStore, MemoryStore, StoreError, StoreResult};

pub fn day(year: i32, month: u32, date: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, date).unwrap()
}

pub fn clock_on(year: i32, month: u32, date: u32) -> FixedClock {
    FixedClock::new(day(year, month, date))
}

/// Store that reads from an inner memory store but rejects every write.
#[derive(Default)]
pub struct ReadOnlyStore {
    pub inner: MemoryStore,
    pub rejected_writes: usize,
}

impl KeyValueStore for ReadOnlyStore {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.load(key)
    }

    fn save(&mut self, _key: &str, _value: &str) -> StoreResult<()> {
        self.rejected_writes += 1;
        Err(StoreError::Unavailable("quota exceeded".to_string()))
    }
}

/// Store whose reads always fail.
pub struct UnreadableStore;

impl KeyValueStore for UnreadableStore {
    fn load(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(StoreError::Unavailable("corrupted payload".to_string()))
    }

    fn save(&mut self, _key: &str, _value: &str) -> StoreResult<()> {
        Ok(())
    }
}
