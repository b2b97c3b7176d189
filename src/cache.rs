//! Bounded, process-wide memo of per-PID details.
//!
//! Entries are never invalidated: if the OS recycles a PID before its entry
//! is evicted, the old process's details are returned.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::model::ProcessDetails;
use crate::platform::ProcessInspector;

pub const DEFAULT_CAPACITY: usize = 1024;

/// Each field is `None` until looked up, then `Some(result)`.
#[derive(Debug, Clone, Default)]
struct CachedDetails {
    full_command: Option<Option<String>>,
    parent_pid: Option<Option<u32>>,
    cwd: Option<Option<String>>,
    last_used: u64,
}

#[derive(Debug, Default)]
struct LruStore {
    entries: HashMap<u32, CachedDetails>,
    clock: u64,
}

impl LruStore {
    /// Read a field of `pid`, refreshing its recency.
    fn get<T: Clone>(&mut self, pid: u32, field: fn(&CachedDetails) -> &Option<T>) -> Option<T> {
        self.clock += 1;
        let clock = self.clock;
        let entry = self.entries.get_mut(&pid)?;
        entry.last_used = clock;
        field(entry).clone()
    }

    /// Store a field of `pid`, evicting the least recently used PID if full.
    /// A field filled by a concurrent lookup is left as is.
    fn put<T>(
        &mut self,
        capacity: usize,
        pid: u32,
        value: T,
        field: fn(&mut CachedDetails) -> &mut Option<T>,
    ) {
        self.clock += 1;
        if !self.entries.contains_key(&pid) && self.entries.len() >= capacity {
            self.evict_oldest();
        }
        let entry = self.entries.entry(pid).or_default();
        entry.last_used = self.clock;
        let slot = field(entry);
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_used)
            .map(|(pid, _)| *pid);
        if let Some(pid) = oldest {
            log::debug!("process cache full, evicting PID {}", pid);
            self.entries.remove(&pid);
        }
    }
}

/// Memoised `full_command`, `parent_pid` and `working_dir` lookups.
///
/// Built once at startup and shared by reference. The lock is released while
/// the inspector runs, so concurrent lookups of one PID may both run the
/// command; the first stored result wins.
#[derive(Debug)]
pub struct ProcessInfoCache {
    capacity: usize,
    store: Mutex<LruStore>,
}

impl Default for ProcessInfoCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ProcessInfoCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            store: Mutex::new(LruStore::default()),
        }
    }

    pub fn full_command(&self, inspector: &dyn ProcessInspector, pid: u32) -> Option<String> {
        self.memoize(
            pid,
            |e| &e.full_command,
            |e| &mut e.full_command,
            || inspector.full_command(pid),
        )
    }

    pub fn parent_pid(&self, inspector: &dyn ProcessInspector, pid: u32) -> Option<u32> {
        self.memoize(
            pid,
            |e| &e.parent_pid,
            |e| &mut e.parent_pid,
            || inspector.parent_pid(pid),
        )
    }

    pub fn working_dir(&self, inspector: &dyn ProcessInspector, pid: u32) -> Option<String> {
        self.memoize(pid, |e| &e.cwd, |e| &mut e.cwd, || inspector.working_dir(pid))
    }

    /// All three lookups for `pid`.
    pub fn details(&self, inspector: &dyn ProcessInspector, pid: u32) -> ProcessDetails {
        ProcessDetails {
            full_command: self.full_command(inspector, pid),
            parent_pid: self.parent_pid(inspector, pid),
            cwd: self.working_dir(inspector, pid),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    #[allow(dead_code)]
    pub fn clear(&self) {
        let mut store = self.lock();
        store.entries.clear();
        store.clock = 0;
    }

    fn memoize<T: Clone>(
        &self,
        pid: u32,
        read: fn(&CachedDetails) -> &Option<Option<T>>,
        write: fn(&mut CachedDetails) -> &mut Option<Option<T>>,
        fetch: impl FnOnce() -> Option<T>,
    ) -> Option<T> {
        if let Some(hit) = self.lock().get(pid, read) {
            return hit;
        }
        let value = fetch();
        let mut store = self.lock();
        store.put(self.capacity, pid, value, write);
        // Another caller may have stored first.
        store.get(pid, read).flatten()
    }

    fn lock(&self) -> MutexGuard<'_, LruStore> {
        // A panic while holding the lock cannot leave the map inconsistent.
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
