//! Growth-only object pool for high-churn entities.
//!
//! Slots are reused instead of reallocated: `acquire` hands out the first
//! inactive slot or appends a new one, `release` deactivates a slot in place.
//! The backing store never shrinks.

pub trait Pooled: Default {
    fn is_active(&self) -> bool;

    /// Return to the inactive state, dropping any references held.
    fn deactivate(&mut self);
}

#[derive(Debug, Clone)]
pub struct Pool<T: Pooled> {
    slots: Vec<T>,
}

impl<T: Pooled> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Pooled> Pool<T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, T::default);
        Self { slots }
    }

    /// A free slot and its index. The caller is expected to activate it.
    pub fn acquire(&mut self) -> (usize, &mut T) {
        let index = match self.slots.iter().position(|slot| !slot.is_active()) {
            Some(index) => index,
            None => {
                self.slots.push(T::default());
                self.slots.len() - 1
            }
        };
        (index, &mut self.slots[index])
    }

    pub fn release(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.deactivate();
        }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)
    }

    /// Number of slots ever allocated, active or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_active()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter(|slot| slot.is_active())
    }
}
