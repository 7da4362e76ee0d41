use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;

use crate::ledger::EntityKind;

/// Process-wide monotonic counters, one per entity kind.
///
/// The write path calls [`bump`](Self::bump) synchronously after every
/// committed mutation; cache lookups and insertions call
/// [`snapshot`](Self::snapshot). Nothing else touches the counters, and they
/// never decrease.
#[derive(Debug, Default)]
pub struct GenerationClock {
    counters: [AtomicU64; EntityKind::COUNT],
}

impl GenerationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the counter for `kind`. Called once per committed write.
    pub fn bump(&self, kind: EntityKind) {
        let previous = self.counters[kind.index()].fetch_add(1, Ordering::SeqCst);
        debug!("Generation bump for {:?}: {}", kind, previous + 1);
    }

    /// Copies all counters. The components are read one at a time, so a
    /// snapshot taken concurrently with a bump may mix old and new values;
    /// monotonicity plus the equality test in [`GenerationStamp::matches`]
    /// means such a snapshot can only look stale, never spuriously fresh.
    pub fn snapshot(&self) -> GenerationStamp {
        let mut values = [0u64; EntityKind::COUNT];
        for kind in EntityKind::ALL {
            values[kind.index()] = self.counters[kind.index()].load(Ordering::SeqCst);
        }
        GenerationStamp(values)
    }
}

/// Point-in-time copy of the generation counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationStamp([u64; EntityKind::COUNT]);

impl GenerationStamp {
    /// True when every counter in `kinds` agrees between `self` and
    /// `current`. Counters for kinds outside `kinds` are ignored.
    pub fn matches(&self, current: &GenerationStamp, kinds: &[EntityKind]) -> bool {
        kinds
            .iter()
            .all(|kind| self.0[kind.index()] == current.0[kind.index()])
    }

    #[cfg(test)]
    pub(crate) fn value(&self, kind: EntityKind) -> u64 {
        self.0[kind.index()]
    }
}
