use ember_common::EntityHandle;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone)]
struct Slot<C> {
    seq: u64,
    value: C,
}

/// Storage for one component kind.
///
/// Lookup is a hash probe; iteration follows first-insertion order, which
/// an overwrite does not change.
#[derive(Debug, Clone)]
pub struct Table<C> {
    entries: HashMap<EntityHandle, Slot<C>>,
    order: BTreeMap<u64, EntityHandle>,
    next_seq: u64,
}

impl<C> Default for Table<C> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            order: BTreeMap::new(),
            next_seq: 0,
        }
    }
}

impl<C> Table<C> {
    /// Insert or overwrite; returns the stored value.
    pub(crate) fn insert(&mut self, entity: EntityHandle, value: C) -> &mut C {
        match self.entries.entry(entity) {
            Entry::Occupied(occupied) => {
                let slot = occupied.into_mut();
                slot.value = value;
                &mut slot.value
            }
            Entry::Vacant(vacant) => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.order.insert(seq, entity);
                &mut vacant.insert(Slot { seq, value }).value
            }
        }
    }

    pub(crate) fn remove(&mut self, entity: EntityHandle) -> Option<C> {
        let slot = self.entries.remove(&entity)?;
        self.order.remove(&slot.seq);
        Some(slot.value)
    }

    pub(crate) fn get_mut(&mut self, entity: EntityHandle) -> Option<&mut C> {
        self.entries.get_mut(&entity).map(|slot| &mut slot.value)
    }

    pub fn get(&self, entity: EntityHandle) -> Option<&C> {
        self.entries.get(&entity).map(|slot| &slot.value)
    }

    pub fn contains(&self, entity: EntityHandle) -> bool {
        self.entries.contains_key(&entity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entities in insertion order.
    pub fn handles(&self) -> impl Iterator<Item = EntityHandle> + '_ {
        self.order.values().copied()
    }

    /// `(entity, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityHandle, &C)> + '_ {
        self.order
            .values()
            .filter_map(|e| self.entries.get(e).map(|slot| (*e, &slot.value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handles(table: &Table<&'static str>) -> Vec<u64> {
        table.handles().map(|e| e.0).collect()
    }

    #[test]
    fn iteration_follows_insertion_not_handle_order() {
        let mut t = Table::default();
        t.insert(EntityHandle(5), "five");
        t.insert(EntityHandle(1), "one");
        t.insert(EntityHandle(3), "three");
        assert_eq!(handles(&t), vec![5, 1, 3]);
    }

    #[test]
    fn overwrite_keeps_position() {
        let mut t = Table::default();
        t.insert(EntityHandle(0), "a");
        t.insert(EntityHandle(1), "b");
        t.insert(EntityHandle(0), "c");
        assert_eq!(handles(&t), vec![0, 1]);
        assert_eq!(t.get(EntityHandle(0)), Some(&"c"));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn remove_then_reinsert_moves_to_end() {
        let mut t = Table::default();
        t.insert(EntityHandle(0), "a");
        t.insert(EntityHandle(1), "b");
        assert_eq!(t.remove(EntityHandle(0)), Some("a"));
        assert!(!t.contains(EntityHandle(0)));
        t.insert(EntityHandle(0), "a2");
        assert_eq!(handles(&t), vec![1, 0]);
    }

    #[test]
    fn iter_pairs_values() {
        let mut t = Table::default();
        t.insert(EntityHandle(2), "x");
        t.insert(EntityHandle(7), "y");
        let pairs: Vec<_> = t.iter().map(|(e, v)| (e.0, *v)).collect();
        assert_eq!(pairs, vec![(2, "x"), (7, "y")]);
    }
}
