use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Dense index handed out by an [`Arena`].
pub trait ArenaId: Copy + Eq {
    fn from_index(index: usize) -> Self;
    fn index(&self) -> usize;
}

/// Stable identity of a joint inside a linkage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JointId(pub usize);

impl ArenaId for JointId {
    fn from_index(index: usize) -> Self {
        Self(index)
    }

    fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "joint #{}", self.0)
    }
}

/// Stable identity of a rigid link inside a linkage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstraintId(pub usize);

impl ArenaId for ConstraintId {
    fn from_index(index: usize) -> Self {
        Self(index)
    }

    fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "link #{}", self.0)
    }
}

/// Append-only arena addressed by typed ids.
///
/// Items are never removed one at a time; [`Arena::clear`] drops the whole
/// model, so an id stays valid until the next clear.
#[derive(Debug, Clone)]
pub struct Arena<I, T> {
    items: Vec<T>,
    _id: PhantomData<I>,
}

impl<I: ArenaId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ArenaId, T> Arena<I, T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            _id: PhantomData,
        }
    }

    pub fn insert(&mut self, item: T) -> I {
        let id = I::from_index(self.items.len());
        self.items.push(item);
        id
    }

    pub fn get(&self, id: I) -> Option<&T> {
        self.items.get(id.index())
    }

    pub fn get_mut(&mut self, id: I) -> Option<&mut T> {
        self.items.get_mut(id.index())
    }

    /// Two disjoint mutable borrows, in argument order.
    pub fn get2_mut(&mut self, id_a: I, id_b: I) -> Option<(&mut T, &mut T)> {
        let (a, b) = (id_a.index(), id_b.index());
        if a == b || a >= self.items.len() || b >= self.items.len() {
            return None;
        }

        let (first, second, flipped) = if a < b { (a, b, false) } else { (b, a, true) };
        let (left, right) = self.items.split_at_mut(second);
        let first_slot = &mut left[first];
        let second_slot = &mut right[0];

        if flipped {
            Some((second_slot, first_slot))
        } else {
            Some((first_slot, second_slot))
        }
    }

    pub fn contains(&self, id: I) -> bool {
        id.index() < self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> + '_ {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| (I::from_index(index), item))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (I, &mut T)> + '_ {
        self.items
            .iter_mut()
            .enumerate()
            .map(|(index, item)| (I::from_index(index), item))
    }

    pub fn values(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = I> + '_ {
        (0..self.items.len()).map(I::from_index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
