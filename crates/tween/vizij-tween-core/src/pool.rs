//! Explicit free list for tween links.
//!
//! Pools are handed to builders (or owned by a manager) rather than looked up
//! in a process-wide registry. Links are reset before they are retained, so a
//! link coming out of [`TweenPool::obtain`] is indistinguishable from a fresh one.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::tween::TweenLink;

/// Pool handle shared between builders and running chains.
pub type SharedPool = Rc<RefCell<TweenPool>>;

/// Lifetime counters, for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Links handed out by `obtain`.
    pub obtained: u64,
    /// Links that had to be allocated because the free list was empty.
    pub created: u64,
    /// Links returned and retained.
    pub recycled: u64,
    /// Links returned while the pool was full.
    pub discarded: u64,
}

#[derive(Debug)]
pub struct TweenPool {
    free: Vec<TweenLink>,
    capacity: usize,
    stats: PoolStats,
}

impl Default for TweenPool {
    fn default() -> Self {
        Self::new(128)
    }
}

impl TweenPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity.min(1024)),
            capacity,
            stats: PoolStats::default(),
        }
    }

    /// Create a pool ready to be shared.
    pub fn shared(capacity: usize) -> SharedPool {
        Rc::new(RefCell::new(Self::new(capacity)))
    }

    pub fn obtain(&mut self) -> TweenLink {
        self.stats.obtained += 1;
        match self.free.pop() {
            Some(link) => link,
            None => {
                self.stats.created += 1;
                TweenLink::new()
            }
        }
    }

    /// Check a link back in. It is reset first.
    pub fn free(&mut self, mut link: TweenLink) {
        link.reset();
        if self.free.len() < self.capacity {
            self.free.push(link);
            self.stats.recycled += 1;
        } else {
            self.stats.discarded += 1;
        }
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Drop all retained links.
    pub fn clear(&mut self) {
        self.free.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obtain_reuses_freed_links() {
        let mut pool = TweenPool::new(4);
        let link = pool.obtain();
        assert_eq!(pool.stats().created, 1);
        pool.free(link);
        assert_eq!(pool.free_count(), 1);
        let _again = pool.obtain();
        assert_eq!(pool.free_count(), 0);
        assert_eq!(
            pool.stats(),
            PoolStats {
                obtained: 2,
                created: 1,
                recycled: 1,
                discarded: 0,
            }
        );
    }

    #[test]
    fn capacity_bounds_retention() {
        let mut pool = TweenPool::new(1);
        pool.free(TweenLink::new());
        pool.free(TweenLink::new());
        assert_eq!(pool.free_count(), 1);
        assert_eq!(pool.stats().discarded, 1);
        pool.clear();
        assert_eq!(pool.free_count(), 0);
    }
}
