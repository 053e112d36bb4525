// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 The genapt Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The shared polygon-index counter (spec §3, §9 "Global counter"):
//! a single-writer monotonically increasing id source, initialized from
//! disk on startup and fsync'd on shutdown. Failure to persist it is the
//! one `Io` error the orchestrator treats as fatal to the whole run
//! rather than just the affected airport (spec §4.H).

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::Error;

/// Where a counter keeps its persisted value. A file-backed store is
/// the only implementation this crate ships; the persistent-storage
/// *backend* beyond that is out of scope, per spec §1.
pub trait CounterStore {
    fn load(&self) -> Result<u64, Error>;
    fn save(&self, value: u64) -> Result<(), Error>;
}

/// Persists the counter as a decimal number in a single file, fsync'd
/// on every save so a crash never loses an already-allocated id.
pub struct FileCounterStore {
    path: PathBuf,
}

impl FileCounterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CounterStore for FileCounterStore {
    fn load(&self) -> Result<u64, Error> {
        if !self.path.exists() {
            return Ok(0);
        }
        let text = fs::read_to_string(&self.path)?;
        text.trim()
            .parse::<u64>()
            .map_err(|e| Error::InputFormat(format!("bad counter file {}: {e}", self.path.display())))
    }

    fn save(&self, value: u64) -> Result<(), Error> {
        let mut file = fs::File::create(&self.path)?;
        write!(file, "{value}")?;
        file.sync_all()?;
        Ok(())
    }
}

/// The shared polygon-id allocator. `next()` is the only hot-path
/// operation; it locks briefly, increments in memory, and does not
/// touch disk — persistence happens on [`IdCounter::flush`], called
/// once after all airports in a run have finished (spec §4.H scheduling
/// model: "no long-running I/O happens with the shared lock held").
pub struct IdCounter<S: CounterStore> {
    store: S,
    value: Mutex<u64>,
}

impl<S: CounterStore> IdCounter<S> {
    /// Loads the starting value from `store`.
    pub fn open(store: S) -> Result<Self, Error> {
        let value = store.load()?;
        Ok(Self {
            store,
            value: Mutex::new(value),
        })
    }

    /// Allocates and returns the next id, starting from 0.
    pub fn next(&self) -> u64 {
        let mut guard = self.value.lock().unwrap_or_else(|e| e.into_inner());
        let id = *guard;
        *guard += 1;
        id
    }

    /// Writes the current value back to the store. Must be called once
    /// after all concurrent allocation has stopped.
    pub fn flush(&self) -> Result<(), Error> {
        let value = *self.value.lock().unwrap_or_else(|e| e.into_inner());
        self.store.save(value)
    }

    pub fn current(&self) -> u64 {
        *self.value.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// A store with no backing file, for tests and for `--start-id` runs
/// that don't need cross-run persistence.
pub struct InMemoryCounterStore {
    start: u64,
}

impl InMemoryCounterStore {
    pub fn new(start: u64) -> Self {
        Self { start }
    }
}

impl CounterStore for InMemoryCounterStore {
    fn load(&self) -> Result<u64, Error> {
        Ok(self.start)
    }

    fn save(&self, _value: u64) -> Result<(), Error> {
        Ok(())
    }
}

/// Convenience constructor matching the CLI's `--start-id` flag: when
/// `path` already holds a counter, it wins; otherwise the run starts at
/// `start_id`.
pub fn open_or_start(path: &Path, start_id: u64) -> Result<IdCounter<FileCounterStore>, Error> {
    let existing = path.exists();
    let counter = IdCounter::open(FileCounterStore::new(path))?;
    if !existing {
        let mut guard = counter.value.lock().unwrap_or_else(|e| e.into_inner());
        *guard = start_id;
    }
    Ok(counter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn allocates_monotonically_increasing_ids() {
        let counter = IdCounter::open(InMemoryCounterStore::new(0)).unwrap();
        let a = counter.next();
        let b = counter.next();
        let c = counter.next();
        assert_eq!((a, b, c), (0, 1, 2));
    }

    #[test]
    fn flush_then_reopen_resumes_from_saved_value() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("next-id");

        {
            let counter = open_or_start(&path, 0).unwrap();
            for _ in 0..5 {
                counter.next();
            }
            counter.flush().unwrap();
        }

        let resumed = open_or_start(&path, 0).unwrap();
        assert_eq!(resumed.current(), 5);
    }

    #[test]
    fn missing_file_starts_at_requested_start_id() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("does-not-exist-yet");
        let counter = open_or_start(&path, 1000).unwrap();
        assert_eq!(counter.next(), 1000);
    }
}
