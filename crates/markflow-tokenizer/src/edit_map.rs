//! Batched splices of an event log.
//!
//! Resolvers collect their edits first and apply them in one pass at the end,
//! so the indices they computed stay valid while they work. Applying the map
//! also re-targets chunk links (`previous`/`next`) that point past an edit.

use std::collections::BTreeMap;

use crate::event::Event;

/// Pending edits: at `index`, remove `remove` events and insert `add`.
#[derive(Debug, Default)]
pub struct EditMap {
    edits: BTreeMap<usize, (usize, Vec<Event>)>,
}

impl EditMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an edit. Insertions at an index that already has an edit are
    /// placed after the ones queued earlier.
    pub fn add(&mut self, index: usize, remove: usize, add: Vec<Event>) {
        self.add_impl(index, remove, add, false);
    }

    /// Queue an edit whose insertions go before those queued earlier at the
    /// same index.
    pub fn add_before(&mut self, index: usize, remove: usize, add: Vec<Event>) {
        self.add_impl(index, remove, add, true);
    }

    fn add_impl(&mut self, index: usize, remove: usize, mut add: Vec<Event>, before: bool) {
        if remove == 0 && add.is_empty() {
            return;
        }
        let edit = self.edits.entry(index).or_default();
        edit.0 += remove;
        if before {
            add.append(&mut edit.1);
            edit.1 = add;
        } else {
            edit.1.append(&mut add);
        }
    }

    /// Apply every edit to `events`.
    pub fn consume(self, events: &mut Vec<Event>) {
        if self.edits.is_empty() {
            return;
        }

        // Old index → shift, as a sorted list of (first affected index, delta).
        let mut shifts: Vec<(usize, isize)> = Vec::with_capacity(self.edits.len());
        let mut delta: isize = 0;
        for (index, (remove, add)) in &self.edits {
            delta += add.len() as isize - *remove as isize;
            shifts.push((index + remove, delta));
        }
        let shift = |old: usize| -> usize {
            let position = shifts.partition_point(|&(from, _)| from <= old);
            if position == 0 {
                old
            } else {
                (old as isize + shifts[position - 1].1) as usize
            }
        };
        for event in events.iter_mut() {
            event.token.previous = event.token.previous.map(shift);
            event.token.next = event.token.next.map(shift);
        }

        let old = std::mem::take(events);
        let mut result = Vec::with_capacity((old.len() as isize + delta).max(0) as usize);
        let mut old = old.into_iter();
        let mut cursor = 0;
        for (index, (remove, add)) in self.edits {
            debug_assert!(index >= cursor, "edits must not overlap");
            result.extend(old.by_ref().take(index - cursor));
            for _ in 0..remove {
                old.next();
            }
            result.extend(add);
            cursor = index + remove;
        }
        result.extend(old);
        *events = result;
    }
}
