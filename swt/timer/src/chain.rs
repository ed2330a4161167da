//! Sorted chain of pending timers
//!
//! Timer records live in a fixed arena of `N` slots. Pending records are
//! threaded into a doubly linked chain through slot indices, ordered by
//! non-decreasing relative time. Every mutating operation leaves the chain
//! sorted with consistent back links; debug builds verify this after each
//! mutation.

use crate::record::TimerRecord;

/// Fixed-capacity arena of timer records plus the pending chain
pub struct TimerChain<C, const N: usize> {
    slots: [TimerRecord<C>; N],
    head: Option<usize>,
    len: usize,
}

impl<C, const N: usize> TimerChain<C, N> {
    /// Create an arena where every slot is vacant
    pub const fn new() -> Self {
        Self {
            slots: [TimerRecord::<C>::VACANT; N],
            head: None,
            len: 0,
        }
    }

    /// Number of slots in the arena
    pub const fn capacity(&self) -> usize {
        N
    }

    /// First pending slot, the one the hardware is armed for
    pub fn head(&self) -> Option<usize> {
        self.head
    }

    /// Number of pending timers
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if no timer is pending
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Get a created record
    pub fn get(&self, idx: usize) -> Option<&TimerRecord<C>> {
        self.slots.get(idx).filter(|record| record.created)
    }

    pub(crate) fn get_mut(&mut self, idx: usize) -> Option<&mut TimerRecord<C>> {
        self.slots.get_mut(idx).filter(|record| record.created)
    }

    /// Overwrite a slot with a freshly created record.
    ///
    /// The slot must not be linked.
    pub(crate) fn install(&mut self, idx: usize, record: TimerRecord<C>) {
        debug_assert!(!self.is_linked(idx), "installing over a pending slot");
        self.slots[idx] = record;
    }

    /// Check if a slot is part of the chain
    pub fn is_linked(&self, idx: usize) -> bool {
        self.head == Some(idx) || self.slots.get(idx).is_some_and(|record| record.prev.is_some())
    }

    /// Relative time of a slot
    pub(crate) fn time(&self, idx: usize) -> u32 {
        self.slots[idx].relative_time
    }

    pub(crate) fn set_time(&mut self, idx: usize, time: u32) {
        self.slots[idx].relative_time = time;
    }

    /// Successor of a linked slot
    pub(crate) fn next_of(&self, idx: usize) -> Option<usize> {
        self.slots[idx].next
    }

    pub(crate) fn record(&self, idx: usize) -> &TimerRecord<C> {
        &self.slots[idx]
    }

    /// Make `idx` the new head.
    ///
    /// Its relative time must not exceed the current head's.
    pub(crate) fn push_front(&mut self, idx: usize) {
        let old = self.head;
        self.slots[idx].prev = None;
        self.slots[idx].next = old;
        if let Some(old) = old {
            self.slots[old].prev = Some(idx);
        }
        self.head = Some(idx);
        self.len += 1;

        debug_assert!(self.check_invariants());
    }

    /// Insert `idx` in time order, scanning forward from the linked slot
    /// `from`.
    ///
    /// The record lands before the first node with a strictly greater time,
    /// so timers with equal times keep their insertion order. With an empty
    /// chain the record becomes the head.
    pub(crate) fn insert_sorted(&mut self, idx: usize, from: Option<usize>) {
        let time = self.slots[idx].relative_time;
        let mut cursor = from;
        let mut last = None;

        while let Some(current) = cursor {
            if time < self.slots[current].relative_time {
                let prev = self.slots[current].prev;
                self.slots[idx].prev = prev;
                self.slots[idx].next = Some(current);
                self.slots[current].prev = Some(idx);
                match prev {
                    Some(prev) => self.slots[prev].next = Some(idx),
                    None => self.head = Some(idx),
                }
                self.len += 1;
                debug_assert!(self.check_invariants());
                return;
            }
            last = Some(current);
            cursor = self.slots[current].next;
        }

        self.slots[idx].next = None;
        self.slots[idx].prev = last;
        match last {
            Some(tail) => self.slots[tail].next = Some(idx),
            None => self.head = Some(idx),
        }
        self.len += 1;

        debug_assert!(self.check_invariants());
    }

    /// Detach a linked slot, keeping its relative time.
    ///
    /// Both links of the removed record are cleared, whether it was the
    /// head, a middle node or the tail.
    pub(crate) fn unlink(&mut self, idx: usize) {
        let prev = self.slots[idx].prev;
        let next = self.slots[idx].next;

        match prev {
            Some(prev) => self.slots[prev].next = next,
            None => self.head = next,
        }
        if let Some(next) = next {
            self.slots[next].prev = prev;
        }

        self.slots[idx].prev = None;
        self.slots[idx].next = None;
        self.len -= 1;

        debug_assert!(self.check_invariants());
    }

    /// Detach a linked slot and mark it stopped
    pub(crate) fn remove(&mut self, idx: usize) {
        self.unlink(idx);
        self.slots[idx].relative_time = 0;
    }

    /// Re-zero the frame of reference: subtract `shift` elapsed ticks from
    /// every pending record.
    ///
    /// The same amount comes off every record, so the order is preserved.
    pub(crate) fn rebase(&mut self, shift: u32) {
        log::trace!("rebasing {} pending timers by {} ticks", self.len, shift);

        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let record = &mut self.slots[idx];
            record.relative_time = record.relative_time.saturating_sub(shift);
            cursor = record.next;
        }

        debug_assert!(self.check_invariants());
    }

    /// Iterate over pending records in expiry order
    pub fn iter(&self) -> Iter<'_, C, N> {
        Iter {
            chain: self,
            cursor: self.head,
        }
    }

    /// Verify ordering, link symmetry and length.
    pub fn check_invariants(&self) -> bool {
        let mut prev: Option<usize> = None;
        let mut cursor = self.head;
        let mut count = 0;

        while let Some(idx) = cursor {
            if count >= N {
                return false;
            }
            let record = &self.slots[idx];
            if !record.created || record.prev != prev {
                return false;
            }
            if let Some(prev) = prev {
                if self.slots[prev].relative_time > record.relative_time {
                    return false;
                }
            }
            prev = Some(idx);
            cursor = record.next;
            count += 1;
        }

        count == self.len
    }
}

impl<C, const N: usize> Default for TimerChain<C, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the pending chain
pub struct Iter<'a, C, const N: usize> {
    chain: &'a TimerChain<C, N>,
    cursor: Option<usize>,
}

impl<'a, C, const N: usize> Iterator for Iter<'a, C, N> {
    type Item = (usize, &'a TimerRecord<C>);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let record = &self.chain.slots[idx];
        self.cursor = record.next;
        Some((idx, record))
    }
}
