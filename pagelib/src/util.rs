use std::collections::HashSet;

use crate::frame_pool::PageId;

/// Number of distinct pages in a trace. With at least this many frames, every policy faults
/// exactly once per distinct page
pub fn distinct_pages(trace: &[PageId]) -> usize {
    trace.iter().collect::<HashSet<_>>().len()
}

/// A trace cycling through `0..pages`, `length` references long
///
/// With fewer frames than pages this is the worst case for FIFO and LRU, every reference misses
pub fn looping_trace(pages: PageId, length: usize) -> Vec<PageId> {
    (0..pages.max(1)).cycle().take(length).collect()
}
