use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Handle to a vehicle slot. The generation guards against a handle outliving
/// the vehicle it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct VehicleId {
    index: usize,
    generation: u32,
}

impl VehicleId {
    pub fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Generational arena that hands out stable ids and reuses freed slots.
pub struct Arena<T> {
    items: Vec<Option<T>>,
    generations: Vec<u32>,
    free_list: VecDeque<usize>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            generations: Vec::new(),
            free_list: VecDeque::new(),
        }
    }

    pub fn insert(&mut self, item: T) -> VehicleId {
        if let Some(index) = self.free_list.pop_front() {
            self.items[index] = Some(item);
            return VehicleId::new(index, self.generations[index]);
        }

        let index = self.items.len();
        self.items.push(Some(item));
        self.generations.push(0);
        VehicleId::new(index, 0)
    }

    pub fn get(&self, id: VehicleId) -> Option<&T> {
        if self.is_valid(id) {
            self.items.get(id.index()).and_then(|slot| slot.as_ref())
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, id: VehicleId) -> Option<&mut T> {
        if self.is_valid(id) {
            self.items.get_mut(id.index()).and_then(|slot| slot.as_mut())
        } else {
            None
        }
    }

    pub fn remove(&mut self, id: VehicleId) -> Option<T> {
        if !self.is_valid(id) {
            return None;
        }
        let item = self.items[id.index()].take();
        if item.is_some() {
            self.generations[id.index()] = self.generations[id.index()].wrapping_add(1);
            self.free_list.push_back(id.index());
        }
        item
    }

    pub fn iter(&self) -> impl Iterator<Item = (VehicleId, &T)> + '_ {
        self.items.iter().enumerate().filter_map(|(index, slot)| {
            slot.as_ref()
                .map(|item| (VehicleId::new(index, self.generations[index]), item))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.items.iter_mut().filter_map(|slot| slot.as_mut())
    }

    /// Raw slots, vacant ones included. Lets callers split the storage
    /// across worker threads.
    pub fn slots_mut(&mut self) -> &mut [Option<T>] {
        &mut self.items
    }

    pub fn ids(&self) -> impl Iterator<Item = VehicleId> + '_ {
        self.iter().map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.items.len() - self.free_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_valid(&self, id: VehicleId) -> bool {
        self.generations
            .get(id.index())
            .is_some_and(|&generation| generation == id.generation())
    }
}
