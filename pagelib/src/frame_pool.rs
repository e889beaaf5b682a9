use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::replacement_policies::{Clock, Fifo, LeastRecentlyUsed, ReplacementPolicy};

/// Identifier of a virtual page in a reference stream
pub type PageId = u64;

/// What happened to a single reference
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Access {
    /// The page was already resident
    Hit,
    /// The page missed and went into a free frame
    Fill,
    /// The page missed with every frame occupied, `victim` was evicted to make room
    Evict { victim: PageId },
}

impl Access {
    pub fn is_miss(&self) -> bool {
        !matches!(self, Access::Hit)
    }
}

/// A generic trait for frame pools
///
/// Technically not required as we're using static dispatch through GenericFramePool, but it keeps
/// the engines independent of the concrete pool type
pub trait FramePoolTrait {
    /// References a page, admitting it (and evicting if needed) on a miss
    ///
    /// The pool and its replacement policy are always updated, on hits and misses alike
    ///
    /// # Arguments
    ///
    /// * `page`: The referenced page
    /// * `time`: The 0-based position of the reference in the stream
    ///
    /// returns: Access
    fn access(&mut self, page: PageId, time: u64) -> Access;

    /// Number of frames in the pool
    fn capacity(&self) -> usize;

    /// Number of frames currently holding a page. Never exceeds the capacity
    fn resident_count(&self) -> usize;

    /// Whether a page is currently resident
    fn contains(&self, page: PageId) -> bool;
}

/// A fixed capacity frame pool, parameterised by a replacement policy
///
/// Frames are slots in a vector, with a hash map from page to slot for constant time membership.
/// The replacement policy only ever deals in slots, the pool does the bookkeeping of which page
/// lives where
pub struct FramePool<R: ReplacementPolicy> {
    frames: Vec<PageId>,
    resident: HashMap<PageId, usize>,
    capacity: usize,
    replacement_policy: R,
}

impl<R: ReplacementPolicy> FramePool<R> {
    pub fn new(capacity: usize, policy: R) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }
        Ok(Self {
            frames: Vec::with_capacity(capacity),
            resident: HashMap::with_capacity(capacity),
            capacity,
            replacement_policy: policy,
        })
    }
}

impl<R: ReplacementPolicy> FramePoolTrait for FramePool<R> {
    fn access(&mut self, page: PageId, time: u64) -> Access {
        if let Some(&slot) = self.resident.get(&page) {
            self.replacement_policy.update_on_hit(slot, time);
            return Access::Hit;
        }
        // Free frames are handed out in order, so the next free slot is the current length
        if self.frames.len() < self.capacity {
            let slot = self.frames.len();
            self.frames.push(page);
            self.resident.insert(page, slot);
            self.replacement_policy.update_on_fill(slot, time);
            return Access::Fill;
        }
        let slot = self.replacement_policy.get_victim_slot(time);
        let victim = std::mem::replace(&mut self.frames[slot], page);
        self.resident.remove(&victim);
        self.resident.insert(page, slot);
        Access::Evict { victim }
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn resident_count(&self) -> usize {
        self.frames.len()
    }

    fn contains(&self, page: PageId) -> bool {
        self.resident.contains_key(&page)
    }
}

/// Enum for the three pool types provided by the library
///
/// Trait objects would cost a virtual call per reference, explicit branching lets the compiler
/// inline the policy functions into the access loop
pub enum GenericFramePool {
    Fifo(FramePool<Fifo>),
    LeastRecentlyUsed(FramePool<LeastRecentlyUsed>),
    Clock(FramePool<Clock>),
}

impl From<FramePool<Fifo>> for GenericFramePool {
    fn from(value: FramePool<Fifo>) -> Self {
        Self::Fifo(value)
    }
}

impl From<FramePool<LeastRecentlyUsed>> for GenericFramePool {
    fn from(value: FramePool<LeastRecentlyUsed>) -> Self {
        Self::LeastRecentlyUsed(value)
    }
}

impl From<FramePool<Clock>> for GenericFramePool {
    fn from(value: FramePool<Clock>) -> Self {
        Self::Clock(value)
    }
}

impl FramePoolTrait for GenericFramePool {
    fn access(&mut self, page: PageId, time: u64) -> Access {
        match self {
            GenericFramePool::Fifo(p) => p.access(page, time),
            GenericFramePool::LeastRecentlyUsed(p) => p.access(page, time),
            GenericFramePool::Clock(p) => p.access(page, time),
        }
    }

    fn capacity(&self) -> usize {
        match self {
            GenericFramePool::Fifo(p) => p.capacity(),
            GenericFramePool::LeastRecentlyUsed(p) => p.capacity(),
            GenericFramePool::Clock(p) => p.capacity(),
        }
    }

    fn resident_count(&self) -> usize {
        match self {
            GenericFramePool::Fifo(p) => p.resident_count(),
            GenericFramePool::LeastRecentlyUsed(p) => p.resident_count(),
            GenericFramePool::Clock(p) => p.resident_count(),
        }
    }

    fn contains(&self, page: PageId) -> bool {
        match self {
            GenericFramePool::Fifo(p) => p.contains(page),
            GenericFramePool::LeastRecentlyUsed(p) => p.contains(page),
            GenericFramePool::Clock(p) => p.contains(page),
        }
    }
}
