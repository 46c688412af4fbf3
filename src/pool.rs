//! Reusable object pools for debug-draw primitives.
//!
//! An [`ObjectsPool`] holds two arenas of the same item type:
//!
//! - `instant` — valid for exactly one frame; a linear cursor hands out
//!   slots and [`reset_counter`](ObjectsPool::reset_counter) rewinds it at
//!   frame end.
//! - `delayed` — items with individual countdown lifetimes; a recycle scan
//!   claims the first expired slot before the arena is allowed to grow.
//!
//! Both arenas grow on demand and never fail; a sustained-underuse
//! heuristic shrinks them back so bursty frames do not pin memory forever.

use std::any::type_name;

/// Seconds the instant arena must stay below half occupancy before it is
/// shrunk to the current usage.
const SHRINK_INSTANT_AFTER_SECS: f64 = 10.0;

/// Seconds the delayed arena must stay below quarter occupancy before its
/// expired entries are dropped.
const SHRINK_DELAYED_AFTER_SECS: f64 = 15.0;

/// An item storable in an [`ObjectsPool`].
///
/// `Default` must produce a *fresh* item: one that reports
/// `is_expired() == true` so a recycle scan may claim it.
pub trait PoolItem: Default {
    fn is_expired(&self) -> bool;
}

/// A two-arena slab of reusable primitive instances.
#[derive(Debug)]
pub struct ObjectsPool<T: PoolItem> {
    pub(crate) instant: Vec<T>,
    pub(crate) delayed: Vec<T>,

    pub(crate) visible_objects: usize,

    pub(crate) used_instant: usize,
    /// Instant usage of the previous frame, kept for statistics after the
    /// cursor rewinds.
    pub(crate) prev_used_instant: usize,
    /// Non-expired delayed entries counted during the last buffer fill,
    /// kept for statistics.
    pub(crate) used_delayed: usize,

    /// Scan position for delayed recycling; persists across `get` calls
    /// within a frame so a claimed slot is not handed out twice.
    recycle_cursor: usize,

    shrink_instant_countdown: f64,
    shrink_delayed_countdown: f64,
}

impl<T: PoolItem> Default for ObjectsPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PoolItem> ObjectsPool<T> {
    pub fn new() -> Self {
        Self {
            instant: Vec::new(),
            delayed: Vec::new(),
            visible_objects: 0,
            used_instant: 0,
            prev_used_instant: 0,
            used_delayed: 0,
            recycle_cursor: 0,
            shrink_instant_countdown: SHRINK_INSTANT_AFTER_SECS,
            shrink_delayed_countdown: SHRINK_DELAYED_AFTER_SECS,
        }
    }

    /// Hand out a writable slot.
    ///
    /// Instant requests take the next unused slot, growing the arena when
    /// it is exhausted. Delayed requests scan forward from the recycle
    /// cursor for the first expired slot and only append when none exists;
    /// a live slot is never handed out. Growth never fails.
    ///
    /// The returned reference must be written through immediately; a later
    /// `get` on the same pool may grow the arena and move its contents.
    pub fn get(&mut self, is_delayed: bool) -> &mut T {
        if is_delayed {
            while self.recycle_cursor < self.delayed.len() {
                let idx = self.recycle_cursor;
                self.recycle_cursor += 1;
                if self.delayed[idx].is_expired() {
                    return &mut self.delayed[idx];
                }
            }

            log::trace!("appending {} to delayed arena", type_name::<T>());
            let idx = self.delayed.len();
            self.delayed.push(T::default());
            self.recycle_cursor = idx + 1;
            &mut self.delayed[idx]
        } else {
            if self.used_instant < self.instant.len() {
                let idx = self.used_instant;
                self.used_instant += 1;
                return &mut self.instant[idx];
            }

            log::trace!("appending {} to instant arena", type_name::<T>());
            let idx = self.instant.len();
            self.instant.push(T::default());
            self.used_instant = idx + 1;
            &mut self.instant[idx]
        }
    }

    /// Per-frame bookkeeping: apply the shrink heuristic, then rewind the
    /// instant cursor and the delayed recycle cursor.
    ///
    /// `buffer_kind` only labels diagnostics.
    pub fn reset_counter(&mut self, delta: f64, buffer_kind: usize) {
        if !self.instant.is_empty() && (self.used_instant as f64) < self.instant.len() as f64 * 0.5
        {
            self.shrink_instant_countdown -= delta;
            if self.shrink_instant_countdown <= 0.0 {
                self.shrink_instant_countdown = SHRINK_INSTANT_AFTER_SECS;

                log::debug!(
                    "shrinking instant arena of {} from {} to {} (kind {})",
                    type_name::<T>(),
                    self.instant.len(),
                    self.used_instant,
                    buffer_kind
                );
                self.instant.truncate(self.used_instant);
            }
        } else {
            self.shrink_instant_countdown = SHRINK_INSTANT_AFTER_SECS;
        }

        self.used_instant = 0;
        self.recycle_cursor = 0;

        if !self.delayed.is_empty() && (self.used_delayed as f64) < self.delayed.len() as f64 * 0.25
        {
            self.shrink_delayed_countdown -= delta;
            if self.shrink_delayed_countdown <= 0.0 {
                self.shrink_delayed_countdown = SHRINK_DELAYED_AFTER_SECS;

                // Stable sort, live entries first: the truncated tail is
                // all expired. The keep count is measured here rather than
                // taken from `used_delayed`, which may be stale when no
                // fill pass ran this frame.
                self.delayed.sort_by_key(|o| o.is_expired());
                let live = self
                    .delayed
                    .iter()
                    .take_while(|o| !o.is_expired())
                    .count();

                log::debug!(
                    "shrinking delayed arena of {} from {} to {} (kind {})",
                    type_name::<T>(),
                    self.delayed.len(),
                    live,
                    buffer_kind
                );
                self.delayed.truncate(live);
            }
        } else {
            self.shrink_delayed_countdown = SHRINK_DELAYED_AFTER_SECS;
        }
    }

    /// Zero the visible-object tally.
    pub fn reset_visible_counter(&mut self) {
        self.visible_objects = 0;
    }

    /// Drop all elements and zero every counter and timer.
    pub fn clear_pools(&mut self) {
        self.instant.clear();
        self.delayed.clear();
        self.used_instant = 0;
        self.used_delayed = 0;
        self.prev_used_instant = 0;
        self.recycle_cursor = 0;
        self.shrink_instant_countdown = SHRINK_INSTANT_AFTER_SECS;
        self.shrink_delayed_countdown = SHRINK_DELAYED_AFTER_SECS;

        self.reset_visible_counter();
    }

    pub fn instant_len(&self) -> usize {
        self.instant.len()
    }

    pub fn delayed_len(&self) -> usize {
        self.delayed.len()
    }

    pub fn used_instant(&self) -> usize {
        self.used_instant
    }

    pub fn used_delayed(&self) -> usize {
        self.used_delayed
    }

    pub fn visible_objects(&self) -> usize {
        self.visible_objects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct TestItem {
        expiration_time: f64,
        used_once: bool,
        tag: u32,
    }

    impl Default for TestItem {
        fn default() -> Self {
            // Fresh items are expired, mirroring a freshly grown slot.
            Self {
                expiration_time: 0.0,
                used_once: true,
                tag: 0,
            }
        }
    }

    impl TestItem {
        fn activate(&mut self, expiration_time: f64, tag: u32) {
            self.expiration_time = expiration_time;
            self.used_once = false;
            self.tag = tag;
        }

        fn expire(&mut self) {
            self.expiration_time = 0.0;
            self.used_once = true;
        }
    }

    impl PoolItem for TestItem {
        fn is_expired(&self) -> bool {
            if self.expiration_time > 0.0 {
                return false;
            }
            self.used_once
        }
    }

    #[test]
    fn test_instant_grows_then_reuses_slots() {
        let mut pool: ObjectsPool<TestItem> = ObjectsPool::new();

        for i in 0..5 {
            pool.get(false).tag = 100 + i;
        }
        assert_eq!(pool.instant_len(), 5);
        assert_eq!(pool.used_instant(), 5);

        pool.reset_counter(0.016, 0);
        assert_eq!(pool.used_instant(), 0);
        // One frame below the threshold must not shrink anything.
        assert_eq!(pool.instant_len(), 5);

        // Next frame reuses the same slots, by index, without appending.
        let first = pool.get(false);
        assert_eq!(first.tag, 100);
        assert_eq!(pool.instant_len(), 5);
    }

    #[test]
    fn test_delayed_recycles_only_expired() {
        let mut pool: ObjectsPool<TestItem> = ObjectsPool::new();

        pool.get(true).activate(100.0, 1); // stays live
        pool.get(true).activate(0.0, 2);
        pool.get(true).activate(0.0, 3);
        assert_eq!(pool.delayed_len(), 3);

        // Expire tags 2 and 3, keep tag 1 live.
        pool.delayed[1].expire();
        pool.delayed[2].expire();
        pool.reset_counter(0.016, 0);

        // The scan claims the first expired slot, never the live one.
        let slot = pool.get(true);
        assert_eq!(slot.tag, 2);
        slot.activate(50.0, 4);

        let slot = pool.get(true);
        assert_eq!(slot.tag, 3);
        slot.activate(50.0, 5);

        // Everything is live now; the next request must append.
        let slot = pool.get(true);
        assert_eq!(slot.tag, 0);
        assert_eq!(pool.delayed_len(), 4);
    }

    #[test]
    fn test_delayed_slot_not_handed_out_twice_per_frame() {
        let mut pool: ObjectsPool<TestItem> = ObjectsPool::new();
        pool.get(true).activate(0.0, 1);
        pool.delayed[0].expire();
        pool.reset_counter(0.016, 0);

        // First get claims the expired slot but does not write to it; the
        // second get within the same frame must not return it again.
        let first_tag = pool.get(true).tag;
        let second_tag = pool.get(true).tag;
        assert_eq!(first_tag, 1);
        assert_eq!(second_tag, 0);
        assert_eq!(pool.delayed_len(), 2);
    }

    #[test]
    fn test_instant_shrinks_after_sustained_underuse() {
        let mut pool: ObjectsPool<TestItem> = ObjectsPool::new();

        for _ in 0..10 {
            pool.get(false);
        }
        pool.reset_counter(1.0, 0);
        assert_eq!(pool.instant_len(), 10);

        // Ten seconds of using only 2 of 10 slots.
        for _ in 0..10 {
            pool.get(false);
            pool.get(false);
            pool.reset_counter(1.0, 0);
        }
        assert_eq!(pool.instant_len(), 2);
    }

    #[test]
    fn test_high_usage_frame_resets_shrink_countdown() {
        let mut pool: ObjectsPool<TestItem> = ObjectsPool::new();

        for _ in 0..10 {
            pool.get(false);
        }
        pool.reset_counter(1.0, 0);

        // Nine underused seconds...
        for _ in 0..9 {
            pool.get(false);
            pool.reset_counter(1.0, 0);
        }
        assert_eq!(pool.instant_len(), 10);

        // ...then one busy frame rearms the countdown.
        for _ in 0..10 {
            pool.get(false);
        }
        pool.reset_counter(1.0, 0);

        for _ in 0..9 {
            pool.get(false);
            pool.reset_counter(1.0, 0);
        }
        assert_eq!(pool.instant_len(), 10);
    }

    #[test]
    fn test_delayed_shrink_never_discards_live() {
        let mut pool: ObjectsPool<TestItem> = ObjectsPool::new();

        for i in 0..8 {
            let slot = pool.get(true);
            if i < 2 {
                slot.activate(1000.0, i); // live
            } else {
                slot.activate(0.0, 100 + i);
            }
        }
        for slot in pool.delayed.iter_mut().skip(2) {
            slot.expire();
        }

        // `used_delayed` is deliberately stale (no fill pass ran); the
        // shrink must still keep every live entry.
        assert_eq!(pool.used_delayed(), 0);
        for _ in 0..4 {
            pool.reset_counter(5.0, 0);
        }

        assert_eq!(pool.delayed_len(), 2);
        let mut tags: Vec<u32> = pool.delayed.iter().map(|o| o.tag).collect();
        tags.sort_unstable();
        assert_eq!(tags, vec![0, 1]);
    }

    #[test]
    fn test_delayed_shrink_drops_expired_tail() {
        let mut pool: ObjectsPool<TestItem> = ObjectsPool::new();

        for i in 0..8 {
            pool.get(true).activate(0.0, i);
        }
        for slot in pool.delayed.iter_mut() {
            slot.expire();
        }

        for _ in 0..4 {
            pool.reset_counter(5.0, 0);
        }
        assert_eq!(pool.delayed_len(), 0);
    }

    #[test]
    fn test_clear_pools() {
        let mut pool: ObjectsPool<TestItem> = ObjectsPool::new();
        for _ in 0..4 {
            pool.get(false);
            pool.get(true).activate(10.0, 7);
        }
        pool.visible_objects = 3;

        pool.clear_pools();
        assert_eq!(pool.instant_len(), 0);
        assert_eq!(pool.delayed_len(), 0);
        assert_eq!(pool.used_instant(), 0);
        assert_eq!(pool.used_delayed(), 0);
        assert_eq!(pool.visible_objects(), 0);
    }
}
