//! One hash bucket's fixed-length doubly-linked LRU list.
//!
//! Backed by a fixed `[Entry; 1024]` array linked by `u16` indices rather
//! than pointers, so the whole bucket lives in one contiguous allocation
//! and the move-to-front/evict-least-recent bookkeeping stays safe.

pub(crate) const BUCKET_LEN: usize = 1024;

#[derive(Clone)]
pub(crate) struct Entry {
    pub(crate) id: u64,
    pub(crate) string: Option<String>,
    prev: Option<u16>,
    next: Option<u16>,
}

impl Entry {
    const fn empty() -> Self {
        Self {
            id: 0,
            string: None,
            prev: None,
            next: None,
        }
    }
}

pub(crate) struct BucketList {
    entries: Box<[Entry; BUCKET_LEN]>,
    most_recent: u16,
    least_recent: u16,
}

impl BucketList {
    pub(crate) fn new() -> Self {
        let mut entries: Box<[Entry; BUCKET_LEN]> =
            Box::new(std::array::from_fn(|_| Entry::empty()));
        for i in 0..BUCKET_LEN {
            entries[i].prev = if i == 0 { None } else { Some((i - 1) as u16) };
            entries[i].next = if i + 1 < BUCKET_LEN {
                Some((i + 1) as u16)
            } else {
                None
            };
        }
        Self {
            entries,
            most_recent: 0,
            least_recent: (BUCKET_LEN - 1) as u16,
        }
    }

    /// Walks the list most-recent-first looking for a populated slot whose
    /// id matches. An unused slot (`string == None`) never counts as a
    /// match, even if its zero-initialized id happens to equal `id`: a
    /// null string slot is simply unused.
    pub(crate) fn find(&self, id: u64) -> Option<u16> {
        let mut cursor = Some(self.most_recent);
        while let Some(idx) = cursor {
            let entry = &self.entries[idx as usize];
            if entry.id == id && entry.string.is_some() {
                return Some(idx);
            }
            cursor = entry.next;
        }
        None
    }

    pub(crate) fn string_at(&self, idx: u16) -> &str {
        self.entries[idx as usize]
            .string
            .as_deref()
            .expect("string_at called on an unused slot")
    }

    pub(crate) fn least_recent_is_occupied(&self) -> bool {
        self.entries[self.least_recent as usize].string.is_some()
    }

    /// Overwrites the least-recent slot with `(id, string)` and promotes it
    /// to most-recent, returning its index.
    pub(crate) fn insert_at_least_recent(&mut self, id: u64, string: String) -> u16 {
        let idx = self.least_recent;
        self.entries[idx as usize].id = id;
        self.entries[idx as usize].string = Some(string);
        self.make_most_recent(idx);
        idx
    }

    /// Detaches `idx` from its current position and relinks it at the
    /// front, updating `least_recent` if `idx` was the tail.
    pub(crate) fn make_most_recent(&mut self, idx: u16) {
        if self.most_recent == idx {
            return;
        }
        let (prev, next) = (self.entries[idx as usize].prev, self.entries[idx as usize].next);
        if let Some(prev) = prev {
            self.entries[prev as usize].next = next;
        }
        if let Some(next) = next {
            self.entries[next as usize].prev = prev;
        } else {
            // idx was the tail.
            self.least_recent = prev.expect("list has more than one entry");
        }
        self.entries[self.most_recent as usize].prev = Some(idx);
        self.entries[idx as usize].next = Some(self.most_recent);
        self.entries[idx as usize].prev = None;
        self.most_recent = idx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_list_has_no_populated_slots() {
        let list = BucketList::new();
        assert!(list.find(0).is_none());
        assert!(!list.least_recent_is_occupied());
    }

    #[test]
    fn insert_then_find_hits_most_recent() {
        let mut list = BucketList::new();
        let idx = list.insert_at_least_recent(7, "seven".to_string());
        assert_eq!(list.find(7), Some(idx));
        assert_eq!(list.string_at(idx), "seven");
    }

    #[test]
    fn make_most_recent_moves_tail_pointer() {
        let mut list = BucketList::new();
        // fill the whole list, forcing eviction, and check structural
        // integrity: most recent is always the last-touched slot.
        for i in 0..BUCKET_LEN as u64 {
            list.insert_at_least_recent(i, i.to_string());
        }
        let last_idx = list.find(BUCKET_LEN as u64 - 1).unwrap();
        assert_eq!(list.most_recent, last_idx);

        let hit_idx = list.find(0).unwrap();
        list.make_most_recent(hit_idx);
        assert_eq!(list.most_recent, hit_idx);
    }
}
