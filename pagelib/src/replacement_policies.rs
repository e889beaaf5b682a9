/// A generic trait for implementing new replacement policies. Can be used to parameterise a
/// FramePool.
///
/// Policies never see page identifiers, only frame slots. The pool fills slots in order
/// `0..capacity` and a replacement always reuses the victim's slot, so slot order is admission
/// order until the first eviction
pub trait ReplacementPolicy {
    /// Updates the policy when a resident page is referenced again
    ///
    /// Not applicable for some policies, a default which does nothing is provided
    ///
    /// # Arguments
    ///
    /// * `slot`: The slot holding the referenced page
    /// * `time`: The logical clock, the 0-based position of the reference in the stream
    ///
    /// returns: ()
    fn update_on_hit(&mut self, _slot: usize, _time: u64) {}

    /// Updates the policy when a page is admitted into a free slot
    ///
    /// # Arguments
    ///
    /// * `slot`: The previously empty slot the page was placed in
    /// * `time`: The logical clock
    ///
    /// returns: ()
    fn update_on_fill(&mut self, _slot: usize, _time: u64) {}

    /// Used by the pool to pick a victim when a miss occurs and every slot is occupied.
    ///
    /// Implementations should assume that when this method is called, the returned slot is
    /// immediately refilled with the incoming page, and record that admission themselves
    ///
    /// # Arguments
    ///
    /// * `time`: The logical clock of the reference which missed
    ///
    /// returns: usize
    fn get_victim_slot(&mut self, time: u64) -> usize;
}

/// First in, first out
///
/// Because the replacement reuses the victim's slot, the arrival queue is just a pointer cycling
/// over the slots: the slot under it always holds the oldest resident page
pub struct Fifo {
    next: usize,
    frames: usize,
}

impl Fifo {
    pub fn new(frames: usize) -> Self {
        Self {
            next: 0,
            frames,
        }
    }
}

impl ReplacementPolicy for Fifo {
    fn get_victim_slot(&mut self, _time: u64) -> usize {
        let victim = self.next;
        self.next = (self.next + 1) % self.frames;
        victim
    }
}

/// Least Recently Used replacement policy
///
/// This implementation keeps track of when each slot was last used, using the position of the
/// reference in the stream as the logical clock, so timestamps are unique and strictly increasing
pub struct LeastRecentlyUsed {
    last_used_times: Vec<u64>,
}

impl LeastRecentlyUsed {
    pub fn new(frames: usize) -> Self {
        Self {
            last_used_times: vec![0; frames],
        }
    }
}

impl ReplacementPolicy for LeastRecentlyUsed {
    fn update_on_hit(&mut self, slot: usize, time: u64) {
        self.last_used_times[slot] = time;
    }

    fn update_on_fill(&mut self, slot: usize, time: u64) {
        self.last_used_times[slot] = time;
    }

    fn get_victim_slot(&mut self, time: u64) -> usize {
        // Manual scan rather than min_by, ties go to the lowest slot
        let mut index = 0;
        let mut min_value = u64::MAX;
        let mut min_index = 0;
        while index < self.last_used_times.len() {
            if self.last_used_times[index] < min_value {
                min_value = self.last_used_times[index];
                min_index = index;
            }
            index += 1;
        }
        self.last_used_times[min_index] = time;
        min_index
    }
}

/// Clock (second chance) replacement policy
///
/// Each slot carries a use bit, set on admission and on every hit. The hand starts at the front of
/// the circular order on each eviction, clearing set bits as it passes, and stops at the first
/// clear one. At most one full sweep plus one slot is ever visited
pub struct Clock {
    use_bits: Vec<bool>,
}

impl Clock {
    pub fn new(frames: usize) -> Self {
        Self {
            use_bits: vec![false; frames],
        }
    }
}

impl ReplacementPolicy for Clock {
    fn update_on_hit(&mut self, slot: usize, _time: u64) {
        self.use_bits[slot] = true;
    }

    fn update_on_fill(&mut self, slot: usize, _time: u64) {
        self.use_bits[slot] = true;
    }

    fn get_victim_slot(&mut self, _time: u64) -> usize {
        let mut hand = 0;
        while self.use_bits[hand] {
            self.use_bits[hand] = false;
            hand = (hand + 1) % self.use_bits.len();
        }
        // The new page takes the victim's place in the order
        self.use_bits[hand] = true;
        hand
    }
}
