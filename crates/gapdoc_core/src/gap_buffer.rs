//! Array-backed sequence with a movable gap at the edit point.
//!
//! Inserts and removals happen at the gap, which is relocated to the target
//! index first. Relocation cost is proportional to the distance moved, so
//! edits that stay local (typing, deleting, line splits near the caret) are
//! amortized O(1).

use crate::constants::{DEFAULT_GAP_BUFFER_CAPACITY, TRIM_EXCESS_THRESHOLD};
use std::iter::Chain;
use std::ops::{Index, IndexMut};
use std::slice;
use tracing::trace;

/// Physical location of the unused region inside the backing vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct GapRange {
    start: usize,
    len: usize,
}

impl GapRange {
    fn end(&self) -> usize {
        self.start + self.len
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Gap buffer with `Vec`-like indexed access.
///
/// Slots inside the gap always hold `T::default()`, so removed elements are
/// never retained by the backing store.
#[derive(Clone, Debug)]
pub struct GapBuffer<T> {
    buffer: Vec<T>,
    gap: GapRange,
    initial_capacity: usize,
}

/// Borrowing iterator over the logical elements of a [`GapBuffer`].
pub type Iter<'a, T> = Chain<slice::Iter<'a, T>, slice::Iter<'a, T>>;

/// Mutable iterator over the logical elements of a [`GapBuffer`].
pub type IterMut<'a, T> = Chain<slice::IterMut<'a, T>, slice::IterMut<'a, T>>;

impl<T> GapBuffer<T> {
    /// Number of physical slots, live elements plus gap.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.capacity() - self.gap.len
    }

    /// Returns `true` when the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Logical index the gap currently sits in front of.
    pub fn gap_start(&self) -> usize {
        self.gap.start
    }

    /// Capacity floor that [`trim_excess`](Self::trim_excess) never goes under.
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    fn physical_index(&self, index: usize) -> usize {
        if index < self.gap.start {
            index
        } else {
            index + self.gap.len
        }
    }

    /// Returns the element at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len() {
            Some(&self.buffer[self.physical_index(index)])
        } else {
            None
        }
    }

    /// Mutable variant of [`get`](Self::get).
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len() {
            let physical = self.physical_index(index);
            Some(&mut self.buffer[physical])
        } else {
            None
        }
    }

    /// Returns the live elements before and after the gap.
    pub fn as_slices(&self) -> (&[T], &[T]) {
        (
            &self.buffer[..self.gap.start],
            &self.buffer[self.gap.end()..],
        )
    }

    /// Iterates the live elements in logical order.
    pub fn iter(&self) -> Iter<'_, T> {
        let (front, back) = self.as_slices();
        front.iter().chain(back.iter())
    }

    /// Mutably iterates the live elements in logical order.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let (front, rest) = self.buffer.split_at_mut(self.gap.start);
        front.iter_mut().chain(rest[self.gap.len..].iter_mut())
    }

    /// Copies `count` elements starting at `index` into a new vector.
    ///
    /// # Panics
    /// Panics when `index..index + count` is not within `0..=len()`.
    pub fn slice_to_vec(&self, index: usize, count: usize) -> Vec<T>
    where
        T: Clone,
    {
        let end = self.checked_range_end(index, count);
        let mut out = Vec::with_capacity(count);
        let (front, back) = self.as_slices();
        let front_end = end.min(front.len());
        if index < front_end {
            out.extend_from_slice(&front[index..front_end]);
        }
        let back_start = index.max(front.len());
        if back_start < end {
            out.extend_from_slice(&back[back_start - front.len()..end - front.len()]);
        }
        out
    }

    fn checked_range_end(&self, index: usize, count: usize) -> usize {
        let len = self.len();
        match index.checked_add(count) {
            Some(end) if end <= len => end,
            _ => panic!(
                "range {}..{}+{} out of bounds for gap buffer of length {}",
                index, index, count, len
            ),
        }
    }
}

impl<T: Default> GapBuffer<T> {
    /// Create an empty buffer with the default capacity floor.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_GAP_BUFFER_CAPACITY)
    }

    /// Create an empty buffer whose capacity never drops under `initial_capacity`.
    pub fn with_capacity(initial_capacity: usize) -> Self {
        let initial_capacity = initial_capacity.max(1);
        let mut buffer = Vec::with_capacity(initial_capacity);
        buffer.resize_with(initial_capacity, T::default);
        Self {
            buffer,
            gap: GapRange {
                start: 0,
                len: initial_capacity,
            },
            initial_capacity,
        }
    }

    /// Insert `value` before `index`.
    ///
    /// # Panics
    /// Panics when `index > len()`.
    pub fn insert(&mut self, index: usize, value: T) {
        self.move_gap(index);
        self.write_at_gap(value);
    }

    /// Insert every element of `values` before `index`, preserving order.
    ///
    /// # Panics
    /// Panics when `index > len()`.
    pub fn insert_range<I>(&mut self, index: usize, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.move_gap(index);
        let values = values.into_iter();
        let (incoming, _) = values.size_hint();
        if incoming > self.gap.len {
            self.reallocate(self.capacity().max(incoming) * 2);
        }
        for value in values {
            self.write_at_gap(value);
        }
    }

    /// Append `value` at the end.
    pub fn push(&mut self, value: T) {
        self.insert(self.len(), value);
    }

    fn write_at_gap(&mut self, value: T) {
        if self.gap.is_empty() {
            self.reallocate(self.capacity() * 2);
        }
        self.buffer[self.gap.start] = value;
        self.gap.start += 1;
        self.gap.len -= 1;
    }

    /// Remove and return the element at `index`.
    ///
    /// # Panics
    /// Panics when `index >= len()`.
    pub fn remove_at(&mut self, index: usize) -> T {
        assert!(
            index < self.len(),
            "remove index {} out of bounds for gap buffer of length {}",
            index,
            self.len()
        );
        self.move_gap(index);
        let value = std::mem::take(&mut self.buffer[self.gap.end()]);
        self.gap.len += 1;
        value
    }

    /// Remove `count` elements starting at `index` and return them in order.
    ///
    /// # Panics
    /// Panics when `index..index + count` is not within `0..=len()`.
    pub fn remove_range(&mut self, index: usize, count: usize) -> Vec<T> {
        self.checked_range_end(index, count);
        self.move_gap(index);
        let start = self.gap.end();
        let removed = self.buffer[start..start + count]
            .iter_mut()
            .map(std::mem::take)
            .collect();
        self.gap.len += count;
        removed
    }

    /// Remove every element, keeping the current capacity.
    pub fn clear(&mut self) {
        for slot in self.iter_mut() {
            *slot = T::default();
        }
        self.gap = GapRange {
            start: 0,
            len: self.capacity(),
        };
    }

    /// Shrink the backing store when utilization is under 90%.
    pub fn trim_excess(&mut self) {
        if (self.len() as f64) < (self.capacity() as f64) * TRIM_EXCESS_THRESHOLD {
            self.reallocate(self.len());
        }
    }

    /// Relocate the gap so that it starts at logical index `target`.
    ///
    /// Only the elements between the old and new gap position move; each one
    /// is swapped across the gap so the slot it leaves holds a default value.
    ///
    /// # Panics
    /// Panics when `target > len()`.
    pub fn move_gap(&mut self, target: usize) {
        assert!(
            target <= self.len(),
            "gap target {} out of bounds for gap buffer of length {}",
            target,
            self.len()
        );
        if target == self.gap.start {
            return;
        }
        if self.gap.is_empty() {
            self.gap.start = target;
            return;
        }

        let gap_len = self.gap.len;
        if target < self.gap.start {
            for i in (target..self.gap.start).rev() {
                self.buffer.swap(i, i + gap_len);
            }
        } else {
            for i in self.gap.end()..target + gap_len {
                self.buffer.swap(i, i - gap_len);
            }
        }
        trace!(from = self.gap.start, to = target, "moved gap");
        self.gap.start = target;
    }

    /// Resize the backing store to `new_capacity`, changing only the gap.
    ///
    /// The request is clamped to the initial capacity floor.
    ///
    /// # Panics
    /// Panics when the clamped capacity is smaller than `len()`.
    pub fn reallocate(&mut self, new_capacity: usize) {
        let new_capacity = new_capacity.max(self.initial_capacity);
        if new_capacity == self.capacity() {
            return;
        }
        assert!(
            new_capacity >= self.len(),
            "capacity {} cannot hold {} elements",
            new_capacity,
            self.len()
        );

        let old_capacity = self.capacity();
        let new_gap_len = new_capacity - self.len();
        let mut old = std::mem::take(&mut self.buffer);
        let backward = old.split_off(self.gap.end());
        old.truncate(self.gap.start);

        let mut buffer = Vec::with_capacity(new_capacity);
        buffer.extend(old);
        buffer.resize_with(self.gap.start + new_gap_len, T::default);
        buffer.extend(backward);

        trace!(from = old_capacity, to = new_capacity, "reallocated gap buffer");
        self.buffer = buffer;
        self.gap.len = new_gap_len;
    }
}

impl<T: Default> Default for GapBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for GapBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!(
                "index {} out of bounds for gap buffer of length {}",
                index,
                self.len()
            ),
        }
    }
}

impl<T> IndexMut<usize> for GapBuffer<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len();
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!(
                "index {} out of bounds for gap buffer of length {}",
                index, len
            ),
        }
    }
}

impl<'a, T> IntoIterator for &'a GapBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Default> Extend<T> for GapBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_range(self.len(), iter);
    }
}

impl<T: Default> FromIterator<T> for GapBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut buffer = Self::new();
        buffer.extend(iter);
        buffer
    }
}
