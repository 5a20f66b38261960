use crate::asm::error_codes::ErrorCode;
use crate::asm::Error;

/// Handle to an entry of a [`List`].
///
/// Handles stay valid until their entry is removed. A handle to a removed entry
/// is rejected, even when its storage has been reused for a newer entry.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub struct EntryId {
    index: usize,
    generation: u32,
}

struct Entry<T> {
    context: T,
    next: Option<EntryId>,
    previous: Option<EntryId>,
}

struct Slot<T> {
    generation: u32,
    entry: Option<Entry<T>>,
}

/// A doubly-linked sequence whose entries live in an arena.
///
/// Insertion after a known entry and removal of a known entry are O(1),
/// positional lookup walks from the head and is O(index).
pub struct List<T> {
    slots: Vec<Slot<T>>,
    vacant: Vec<usize>,
    head: Option<EntryId>,
    tail: Option<EntryId>,
    size: usize,
}

impl<T> Default for List<T> {
    fn default() -> Self {
        List {
            slots: Vec::new(),
            vacant: Vec::new(),
            head: None,
            tail: None,
            size: 0,
        }
    }
}

impl<T> List<T> {
    pub fn new() -> List<T> {
        List::default()
    }

    pub fn head(&self) -> Option<EntryId> {
        self.head
    }

    pub fn tail(&self) -> Option<EntryId> {
        self.tail
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    fn entry(&self, id: EntryId) -> Option<&Entry<T>> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    fn entry_mut(&mut self, id: EntryId) -> Option<&mut Entry<T>> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_mut())
    }

    fn valid_entry_mut(&mut self, id: EntryId) -> Result<&mut Entry<T>, Error> {
        self.entry_mut(id)
            .ok_or_else(|| raise!(ErrorCode::InvalidEntry, "Invalid entry: {}", id.index))
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.entry(id).is_some()
    }

    pub fn get_context(&self, id: EntryId) -> Option<&T> {
        self.entry(id).map(|entry| &entry.context)
    }

    pub fn get_context_mut(&mut self, id: EntryId) -> Option<&mut T> {
        self.entry_mut(id).map(|entry| &mut entry.context)
    }

    pub fn next(&self, id: EntryId) -> Option<EntryId> {
        self.entry(id).and_then(|entry| entry.next)
    }

    pub fn previous(&self, id: EntryId) -> Option<EntryId> {
        self.entry(id).and_then(|entry| entry.previous)
    }

    /// Returns the entry at `index`, counting from the head.
    pub fn get(&self, index: usize) -> Result<EntryId, Error> {
        if index >= self.size {
            return Err(raise!(ErrorCode::IndexOutOfRange, "Invalid index: {index}"));
        }
        let mut current = self.head;
        for _ in 0..index {
            current = current.and_then(|id| self.next(id));
        }
        current.ok_or_else(|| raise!(ErrorCode::IndexOutOfRange, "Invalid index: {index}"))
    }

    fn allocate(&mut self, entry: Entry<T>) -> Result<EntryId, Error> {
        if let Some(index) = self.vacant.pop() {
            let slot = &mut self.slots[index];
            slot.entry = Some(entry);
            return Ok(EntryId {
                index,
                generation: slot.generation,
            });
        }
        self.slots.try_reserve(1).map_err(|err| {
            raise!(
                ErrorCode::AllocationFailure,
                "Failed to allocate list entry: {err}"
            )
        })?;
        self.slots.push(Slot {
            generation: 0,
            entry: Some(entry),
        });
        Ok(EntryId {
            index: self.slots.len() - 1,
            generation: 0,
        })
    }

    /// Inserts `context` after the entry `after`, or at the head if `after` is `None`.
    pub fn insert(&mut self, after: Option<EntryId>, context: T) -> Result<EntryId, Error> {
        let next = match after {
            Some(after) => self.valid_entry_mut(after)?.next,
            None => self.head,
        };
        let id = self.allocate(Entry {
            context,
            next,
            previous: after,
        })?;
        match after {
            Some(after) => self.valid_entry_mut(after)?.next = Some(id),
            None => self.head = Some(id),
        }
        match next {
            Some(next) => self.valid_entry_mut(next)?.previous = Some(id),
            None => self.tail = Some(id),
        }
        self.size += 1;
        Ok(id)
    }

    /// Appends `context` after the current tail.
    pub fn push_back(&mut self, context: T) -> Result<EntryId, Error> {
        self.insert(self.tail, context)
    }

    /// Unlinks the entry and hands its context back to the caller.
    pub fn remove(&mut self, id: EntryId) -> Result<T, Error> {
        if self.size == 0 {
            return Err(raise!(ErrorCode::EmptyList, "Empty list"));
        }
        if !self.contains(id) {
            return Err(raise!(ErrorCode::InvalidEntry, "Invalid entry: {}", id.index));
        }
        let slot = &mut self.slots[id.index];
        let Some(entry) = slot.entry.take() else {
            return Err(raise!(ErrorCode::InvalidEntry, "Invalid entry: {}", id.index));
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.vacant.push(id.index);

        match entry.previous {
            Some(previous) => self.valid_entry_mut(previous)?.next = entry.next,
            None => self.head = entry.next,
        }
        match entry.next {
            Some(next) => self.valid_entry_mut(next)?.previous = entry.previous,
            None => self.tail = entry.previous,
        }
        self.size -= 1;
        Ok(entry.context)
    }

    /// Removes every entry. Handles taken before stay invalid.
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.entry.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.vacant.push(index);
            }
        }
        self.head = None;
        self.tail = None;
        self.size = 0;
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            front: self.head,
            back: self.tail,
            remaining: self.size,
        }
    }
}

pub struct Iter<'a, T> {
    list: &'a List<T>,
    front: Option<EntryId>,
    back: Option<EntryId>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = self.list.entry(self.front?)?;
        self.front = entry.next;
        self.remaining -= 1;
        Some(&entry.context)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = self.list.entry(self.back?)?;
        self.back = entry.previous;
        self.remaining -= 1;
        Some(&entry.context)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::asm::error_codes::ErrorCode;
    use crate::asm::list::{EntryId, List};
    use itertools::Itertools;

    fn check_structure<T>(list: &List<T>) {
        if list.is_empty() {
            assert_eq!(list.head(), None);
            assert_eq!(list.tail(), None);
            return;
        }
        let head = list.head().expect("Non-empty list has a head");
        let tail = list.tail().expect("Non-empty list has a tail");
        assert_eq!(list.previous(head), None);
        assert_eq!(list.next(tail), None);

        let mut forward = 0;
        let mut current = Some(head);
        while let Some(id) = current {
            forward += 1;
            assert!(forward <= list.len(), "Cycle in forward links");
            current = list.next(id);
        }
        let mut backward = 0;
        let mut current = Some(tail);
        while let Some(id) = current {
            backward += 1;
            assert!(backward <= list.len(), "Cycle in backward links");
            current = list.previous(id);
        }
        assert_eq!(forward, list.len());
        assert_eq!(backward, list.len());
    }

    fn contents(list: &List<u32>) -> Vec<u32> {
        list.iter().copied().collect_vec()
    }

    #[test]
    fn empty_list() {
        let list: List<u32> = List::new();
        check_structure(&list);
        assert_eq!(list.len(), 0);
        assert_eq!(list.get(0).unwrap_err().code(), ErrorCode::IndexOutOfRange);
        assert_eq!(list.iter().count(), 0);
    }

    #[test]
    fn insert_at_head_and_tail() {
        let mut list = List::new();
        let two = list.insert(None, 2).unwrap();
        list.insert(None, 1).unwrap();
        list.insert(Some(two), 3).unwrap();
        list.push_back(4).unwrap();
        check_structure(&list);
        assert_eq!(contents(&list), vec![1, 2, 3, 4]);
        assert_eq!(list.iter().rev().copied().collect_vec(), vec![4, 3, 2, 1]);
    }

    #[test]
    fn insert_in_the_middle() {
        let mut list = List::new();
        let one = list.push_back(1).unwrap();
        list.push_back(3).unwrap();
        let two = list.insert(Some(one), 2).unwrap();
        check_structure(&list);
        assert_eq!(contents(&list), vec![1, 2, 3]);
        assert_eq!(list.previous(two), Some(one));
        assert_eq!(list.get(1).unwrap(), two);
    }

    #[test]
    fn get_by_index() {
        let mut list = List::new();
        for value in 0..10 {
            list.push_back(value * 10).unwrap();
        }
        for index in 0..10 {
            let id = list.get(index).unwrap();
            assert_eq!(list.get_context(id), Some(&(index as u32 * 10)));
        }
        assert_eq!(list.get(10).unwrap_err().code(), ErrorCode::IndexOutOfRange);
    }

    #[test]
    fn update_context_in_place() {
        let mut list = List::new();
        let first = list.push_back(1).unwrap();
        let second = list.push_back(2).unwrap();
        *list.get_context_mut(second).unwrap() += 40;
        assert_eq!(contents(&list), vec![1, 42]);

        list.remove(first).unwrap();
        assert_eq!(list.get_context_mut(first), None);
        assert_eq!(list.get_context_mut(second), Some(&mut 42));
    }

    #[test]
    fn remove_entries() {
        let mut list = List::new();
        let ids = (0..5).map(|value| list.push_back(value).unwrap()).collect_vec();
        assert_eq!(list.remove(ids[0]), Ok(0));
        check_structure(&list);
        assert_eq!(list.remove(ids[4]), Ok(4));
        check_structure(&list);
        assert_eq!(list.remove(ids[2]), Ok(2));
        check_structure(&list);
        assert_eq!(contents(&list), vec![1, 3]);
        assert_eq!(list.head(), Some(ids[1]));
        assert_eq!(list.tail(), Some(ids[3]));
    }

    #[test]
    fn remove_from_empty_list() {
        let mut list = List::new();
        let id = list.push_back(1).unwrap();
        list.remove(id).unwrap();
        assert_eq!(list.remove(id).unwrap_err().code(), ErrorCode::EmptyList);
        check_structure(&list);
    }

    #[test]
    fn stale_handles_are_rejected() {
        let mut list = List::new();
        let first = list.push_back(1).unwrap();
        list.push_back(2).unwrap();
        list.remove(first).unwrap();
        // reuses the storage of `first`
        let third = list.push_back(3).unwrap();
        assert_ne!(first, third);
        assert_eq!(list.get_context(first), None);
        assert_eq!(list.remove(first).unwrap_err().code(), ErrorCode::InvalidEntry);
        assert_eq!(
            list.insert(Some(first), 4).unwrap_err().code(),
            ErrorCode::InvalidEntry
        );
        assert_eq!(contents(&list), vec![2, 3]);
    }

    #[test]
    fn structure_survives_mixed_operations() {
        let mut list = List::new();
        let mut ids: Vec<EntryId> = vec![];
        let mut state: u32 = 0x2a;
        for step in 0..500u32 {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let choice = (state >> 16) % 4;
            if choice == 0 && !ids.is_empty() {
                let id = ids.swap_remove((state as usize >> 8) % ids.len());
                list.remove(id).unwrap();
            } else if choice == 1 && !ids.is_empty() {
                let after = ids[(state as usize >> 8) % ids.len()];
                ids.push(list.insert(Some(after), step).unwrap());
            } else if choice == 2 {
                ids.push(list.insert(None, step).unwrap());
            } else {
                ids.push(list.push_back(step).unwrap());
            }
            check_structure(&list);
            assert_eq!(list.len(), ids.len());
        }
        list.clear();
        check_structure(&list);
    }

    #[test]
    fn clear_invalidates_handles() {
        let mut list = List::new();
        let first = list.push_back(1).unwrap();
        list.push_back(2).unwrap();
        list.clear();
        check_structure(&list);
        assert!(!list.contains(first));

        let fresh = list.push_back(3).unwrap();
        assert_ne!(fresh, first);
        assert_eq!(list.get_context(first), None);
        assert_eq!(contents(&list), vec![3]);
    }
}
