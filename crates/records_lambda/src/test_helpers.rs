use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use records_core::clock::Clock;
use records_core::contract::{primary_key, Item};
use serde_json::Value;

use crate::adapters::item_table::{DeleteOutcome, ItemTable};
use crate::adapters::object_store::ObjectStore;
use crate::adapters::StoreError;

pub const TEST_TABLE: &str = "records-test";

pub fn item(value: Value) -> Item {
    match value {
        Value::Object(map) => map,
        other => panic!("item fixture must be an object, got {other}"),
    }
}

pub fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 8, 6, 14, 43, 23)
        .single()
        .expect("valid timestamp")
        + TimeDelta::microseconds(687_000)
}

/// Clock that advances one microsecond per reading.
pub struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            next: Mutex::new(start),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().expect("poisoned mutex");
        let current = *next;
        *next = current + TimeDelta::microseconds(1);
        current
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// In-memory table that records every call made against it.
#[derive(Default)]
pub struct RecordingTable {
    items: Mutex<BTreeMap<String, Item>>,
    calls: Mutex<Vec<&'static str>>,
    delete_failure: Option<StoreError>,
}

impl RecordingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_deletes(error: StoreError) -> Self {
        Self {
            delete_failure: Some(error),
            ..Self::new()
        }
    }

    pub fn seed(&self, stored: Item) {
        let key = storage_key(&stored);
        self.items
            .lock()
            .expect("poisoned mutex")
            .insert(key, stored);
    }

    pub fn stored(&self, id: &str) -> Option<Item> {
        self.items
            .lock()
            .expect("poisoned mutex")
            .get(&Value::from(id).to_string())
            .cloned()
    }

    pub fn item_count(&self) -> usize {
        self.items.lock().expect("poisoned mutex").len()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("poisoned mutex").clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().expect("poisoned mutex").clear();
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().expect("poisoned mutex").push(call);
    }
}

fn storage_key(item: &Item) -> String {
    primary_key(item)
        .map(Value::to_string)
        .unwrap_or_default()
}

impl ItemTable for RecordingTable {
    fn table_name(&self) -> &str {
        TEST_TABLE
    }

    fn get_item(&self, key: &Item) -> Result<Option<Item>, StoreError> {
        self.record("get_item");
        Ok(self
            .items
            .lock()
            .expect("poisoned mutex")
            .get(&storage_key(key))
            .cloned())
    }

    fn put_item(&self, item: &Item) -> Result<(), StoreError> {
        self.record("put_item");
        self.seed(item.clone());
        Ok(())
    }

    fn delete_item_if_exists(&self, key: &Item) -> Result<DeleteOutcome, StoreError> {
        self.record("delete_item_if_exists");
        if let Some(error) = &self.delete_failure {
            return Err(error.clone());
        }

        let removed = self
            .items
            .lock()
            .expect("poisoned mutex")
            .remove(&storage_key(key));
        Ok(match removed {
            Some(_) => DeleteOutcome::Deleted,
            None => DeleteOutcome::PreconditionFailed,
        })
    }
}

#[derive(Default)]
pub struct RecordingStore {
    writes: Mutex<HashMap<String, Vec<u8>>>,
    denied_prefix: Option<&'static str>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn denying(prefix: &'static str) -> Self {
        Self {
            denied_prefix: Some(prefix),
            ..Self::new()
        }
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .writes
            .lock()
            .expect("poisoned mutex")
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    pub fn body(&self, key: &str) -> Option<Vec<u8>> {
        self.writes
            .lock()
            .expect("poisoned mutex")
            .get(key)
            .cloned()
    }
}

impl ObjectStore for RecordingStore {
    fn write_object(&self, key: &str, body: &[u8]) -> Result<(), StoreError> {
        if let Some(prefix) = self.denied_prefix {
            if key.starts_with(prefix) {
                return Err(StoreError::backend(
                    "PutObject",
                    format!("simulated write failure for key: {key}"),
                ));
            }
        }

        self.writes
            .lock()
            .expect("poisoned mutex")
            .insert(key.to_string(), body.to_vec());
        Ok(())
    }
}
