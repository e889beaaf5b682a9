use serde::{Deserialize, Serialize};

use crate::config::{FaultCounting, PolicyKind};
use crate::error::Result;
use crate::frame_pool::{Access, FramePool, FramePoolTrait, GenericFramePool, PageId};
use crate::replacement_policies::{Clock, Fifo, LeastRecentlyUsed};

/// The outcome of running one reference stream through one policy with one frame count
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PolicyResult {
    pub hits: u64,
    pub cold_misses: u64,
    pub evictions: u64,
}

impl PolicyResult {
    /// The page faults under a given counting convention
    pub fn faults(&self, counting: FaultCounting) -> u64 {
        match counting {
            FaultCounting::AllMisses => self.cold_misses + self.evictions,
            FaultCounting::EvictionsOnly => self.evictions,
        }
    }

    pub fn references(&self) -> u64 {
        self.hits + self.cold_misses + self.evictions
    }
}

/// Creates an empty frame pool for a policy
///
/// # Arguments
///
/// * `kind`: The replacement policy
/// * `frames`: The number of frames, must be at least 1
///
/// returns: Result<GenericFramePool, Error>
pub fn new_pool(kind: PolicyKind, frames: usize) -> Result<GenericFramePool> {
    Ok(match kind {
        PolicyKind::Fifo => GenericFramePool::from(FramePool::new(frames, Fifo::new(frames))?),
        PolicyKind::LeastRecentlyUsed => {
            GenericFramePool::from(FramePool::new(frames, LeastRecentlyUsed::new(frames))?)
        }
        PolicyKind::Clock => GenericFramePool::from(FramePool::new(frames, Clock::new(frames))?),
    })
}

/// Runs a reference stream through a fresh pool, strictly in stream order
///
/// Each call builds its own pool, so repeated calls with the same arguments always agree
///
/// # Arguments
///
/// * `kind`: The replacement policy
/// * `trace`: The reference stream, which may be empty
/// * `frames`: The number of frames, must be at least 1
///
/// returns: Result<PolicyResult, Error>
pub fn simulate(kind: PolicyKind, trace: &[PageId], frames: usize) -> Result<PolicyResult> {
    let mut pool = new_pool(kind, frames)?;
    let mut result = PolicyResult::default();
    for (time, &page) in trace.iter().enumerate() {
        match pool.access(page, time as u64) {
            Access::Hit => result.hits += 1,
            Access::Fill => result.cold_misses += 1,
            Access::Evict { .. } => result.evictions += 1,
        }
    }
    debug_assert!(pool.resident_count() <= pool.capacity());
    Ok(result)
}

/// Counts the page faults of a policy, where every miss is a fault
pub fn count_faults(kind: PolicyKind, trace: &[PageId], frames: usize) -> Result<u64> {
    Ok(simulate(kind, trace, frames)?.faults(FaultCounting::AllMisses))
}

/// Page faults under first in, first out replacement
///
/// # Examples
///
/// ```
/// use pagelib::simulator::fifo;
/// assert_eq!(fifo(&[1, 2, 3, 1, 2, 4], 3).unwrap(), 4);
/// ```
pub fn fifo(trace: &[PageId], frames: usize) -> Result<u64> {
    count_faults(PolicyKind::Fifo, trace, frames)
}

/// Page faults under least recently used replacement
///
/// # Examples
///
/// ```
/// use pagelib::simulator::lru;
/// assert_eq!(lru(&[1, 2, 3, 1, 2, 4], 3).unwrap(), 4);
/// ```
pub fn lru(trace: &[PageId], frames: usize) -> Result<u64> {
    count_faults(PolicyKind::LeastRecentlyUsed, trace, frames)
}

/// Page faults under clock (second chance) replacement
///
/// # Examples
///
/// ```
/// use pagelib::simulator::clock;
/// assert_eq!(clock(&[1, 2, 3, 1, 2, 4], 3).unwrap(), 4);
/// ```
pub fn clock(trace: &[PageId], frames: usize) -> Result<u64> {
    count_faults(PolicyKind::Clock, trace, frames)
}
