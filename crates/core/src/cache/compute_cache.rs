use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Condvar, Mutex};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::debug;

use super::generation::{GenerationClock, GenerationStamp};
use crate::errors::Result;
use crate::ledger::EntityKind;

/// Rendezvous point for callers of one in-progress computation.
#[derive(Default)]
struct Flight {
    done: Mutex<bool>,
    signal: Condvar,
}

impl Flight {
    fn wait(&self) {
        let mut done = self.done.lock().unwrap();
        while !*done {
            done = self.signal.wait(done).unwrap();
        }
    }

    fn finish(&self) {
        let mut done = self.done.lock().unwrap();
        *done = true;
        self.signal.notify_all();
    }
}

enum Slot<V> {
    Ready { value: V, stamp: GenerationStamp },
    InFlight(Arc<Flight>),
}

enum Role<V> {
    Hit(V),
    Lead(Arc<Flight>),
    Wait(Arc<Flight>),
}

/// Memoizes one family of derived values, each entry tagged with the
/// generations of the entity kinds the family depends on.
///
/// Entries are never evicted by size or age; a stale entry is detected
/// lazily at lookup time and replaced by the next computation. At most one
/// computation per key runs at a time: concurrent callers for the same key
/// block until the leader publishes, then reuse its result. No map guard is
/// held while computing or waiting, so a computation may itself consult
/// other keys (on this or another cache) without deadlocking. It must not
/// request its own key.
pub struct ComputeCache<K, V> {
    clock: Arc<GenerationClock>,
    depends_on: &'static [EntityKind],
    entries: DashMap<K, Slot<V>>,
}

impl<K, V> ComputeCache<K, V>
where
    K: Clone + Eq + Hash + Debug,
    V: Clone,
{
    pub fn new(clock: Arc<GenerationClock>, depends_on: &'static [EntityKind]) -> Self {
        Self {
            clock,
            depends_on,
            entries: DashMap::new(),
        }
    }

    /// Returns the cached value for `key` when its stamp is still current,
    /// otherwise runs `compute` and caches the result. Errors propagate to
    /// the caller without leaving an entry behind, so the next lookup
    /// retries.
    pub fn get_or_compute<F>(&self, key: K, mut compute: F) -> Result<V>
    where
        F: FnMut() -> Result<V>,
    {
        loop {
            match self.classify(&key) {
                Role::Hit(value) => return Ok(value),
                Role::Lead(flight) => return self.lead(&key, &flight, &mut compute),
                // The leader may have failed, or a write may have landed
                // while it ran. Re-classify once it signals.
                Role::Wait(flight) => flight.wait(),
            }
        }
    }

    /// Decides, under the shard guard, whether this caller reuses the entry,
    /// leads a new computation, or waits for the current leader.
    fn classify(&self, key: &K) -> Role<V> {
        match self.entries.entry(key.clone()) {
            Entry::Occupied(mut occupied) => {
                let current = self.clock.snapshot();
                let role = match occupied.get() {
                    Slot::Ready { value, stamp } if stamp.matches(&current, self.depends_on) => {
                        Role::Hit(value.clone())
                    }
                    Slot::Ready { .. } => Role::Lead(Arc::new(Flight::default())),
                    Slot::InFlight(flight) => Role::Wait(Arc::clone(flight)),
                };
                if let Role::Lead(flight) = &role {
                    debug!("Cache entry for {:?} is stale, recomputing", key);
                    occupied.insert(Slot::InFlight(Arc::clone(flight)));
                }
                role
            }
            Entry::Vacant(vacant) => {
                debug!("No cache entry for {:?}, computing", key);
                let flight = Arc::new(Flight::default());
                vacant.insert(Slot::InFlight(Arc::clone(&flight)));
                Role::Lead(flight)
            }
        }
    }

    fn lead<F>(&self, key: &K, flight: &Arc<Flight>, compute: &mut F) -> Result<V>
    where
        F: FnMut() -> Result<V>,
    {
        let _cleanup = FlightCleanup {
            cache: self,
            key,
            flight,
        };
        // Snapshot before the computation reads any data. A write landing
        // mid-flight then stamps the entry stale rather than fresh.
        let stamp = self.clock.snapshot();
        let value = compute()?;
        self.entries.insert(
            key.clone(),
            Slot::Ready {
                value: value.clone(),
                stamp,
            },
        );
        Ok(value)
    }
}

/// Signals the flight and clears its marker when the leader is done, whether
/// it published, returned an error, or panicked.
struct FlightCleanup<'a, K, V>
where
    K: Clone + Eq + Hash + Debug,
    V: Clone,
{
    cache: &'a ComputeCache<K, V>,
    key: &'a K,
    flight: &'a Arc<Flight>,
}

impl<K, V> Drop for FlightCleanup<'_, K, V>
where
    K: Clone + Eq + Hash + Debug,
    V: Clone,
{
    fn drop(&mut self) {
        // After a successful publish the slot holds Ready, so this is a
        // no-op. On error or panic it removes our in-flight marker and the
        // woken waiters elect a new leader.
        self.cache.entries.remove_if(self.key, |_, slot| {
            matches!(slot, Slot::InFlight(other) if Arc::ptr_eq(other, self.flight))
        });
        self.flight.finish();
    }
}
