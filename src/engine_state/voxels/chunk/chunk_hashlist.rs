//! # Chunk Hash List
//!
//! An open-addressing hash table from chunk coordinate to an owned value, threaded with
//! a doubly-linked list of bucket indices that preserves insertion order.
//!
//! ## Layout
//!
//! - Buckets live in a power-of-two sized array and are probed linearly from the
//!   FNV-1a hash of the coordinate's bytes.
//! - Removal leaves a tombstone. Lookups probe past tombstones; insertion reuses the
//!   first tombstone met on the probe path.
//! - The linked list (`first`/`last`, per-bucket `prev`/`next`) gives a stable
//!   iteration order for rendering and for the streaming eviction scan.
//!
//! ## Growth
//!
//! Before an insert, if `live + tombstones + 1` would exceed 3/4 of the bucket count the
//! table is rebuilt at `max(16, next_pow2(16 * live))` buckets. Tombstones are dropped
//! and the list keeps its relative order. Removal never rebuilds.

use cgmath::Point3;
use log::debug;

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// Smallest bucket count, and the live-count multiplier used on rebuild.
const GROWTH_FACTOR: usize = 16;

/// FNV-1a over a byte slice.
pub fn fnv_1a(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ *byte as u32).wrapping_mul(FNV_PRIME)
    })
}

fn hash_position(position: Point3<i32>) -> u32 {
    let mut bytes = [0u8; 12];
    bytes[0..4].copy_from_slice(&position.x.to_le_bytes());
    bytes[4..8].copy_from_slice(&position.y.to_le_bytes());
    bytes[8..12].copy_from_slice(&position.z.to_le_bytes());
    fnv_1a(&bytes)
}

#[derive(Debug)]
enum BucketState<T> {
    /// Never used; terminates probing.
    Empty,
    /// Logically deleted; probed through until the next rebuild.
    Tombstone,
    Occupied(T),
}

#[derive(Debug)]
struct Bucket<T> {
    position: Point3<i32>,
    state: BucketState<T>,
    prev: Option<usize>,
    next: Option<usize>,
}

impl<T> Bucket<T> {
    fn empty() -> Self {
        Bucket {
            position: Point3::new(0, 0, 0),
            state: BucketState::Empty,
            prev: None,
            next: None,
        }
    }
}

/// Spatial hash table of chunk coordinates with insertion-ordered iteration.
///
/// Each value is owned by exactly one bucket at a time; [`ChunkHashList::remove`]
/// hands ownership back to the caller so a chunk can be recycled under a new key.
#[derive(Debug)]
pub struct ChunkHashList<T> {
    buckets: Vec<Bucket<T>>,
    used: usize,
    tombstones: usize,
    first: Option<usize>,
    last: Option<usize>,
}

impl<T> Default for ChunkHashList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ChunkHashList<T> {
    /// Creates an empty table. No buckets are allocated until the first insert.
    pub fn new() -> Self {
        Self::with_bucket_count(0)
    }

    fn with_bucket_count(total: usize) -> Self {
        ChunkHashList {
            buckets: (0..total).map(|_| Bucket::empty()).collect(),
            used: 0,
            tombstones: 0,
            first: None,
            last: None,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.used
    }

    /// Whether the table holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Total bucket count.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Number of tombstoned buckets awaiting the next rebuild.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Probes for `position` in a non-empty bucket array.
    ///
    /// Returns the live match if there is one, otherwise the first tombstone on the
    /// probe path, otherwise the empty bucket that ended the probe.
    fn probe_in(buckets: &[Bucket<T>], position: Point3<i32>) -> usize {
        let total = buckets.len();
        let mut index = hash_position(position) as usize % total;
        let mut tombstone = None;
        loop {
            let bucket = &buckets[index];
            match &bucket.state {
                BucketState::Empty => return tombstone.unwrap_or(index),
                BucketState::Tombstone => {
                    tombstone.get_or_insert(index);
                }
                BucketState::Occupied(_) if bucket.position == position => return index,
                BucketState::Occupied(_) => {}
            }
            index = (index + 1) % total;
        }
    }

    fn live_index(&self, position: Point3<i32>) -> Option<usize> {
        if self.buckets.is_empty() {
            return None;
        }
        let index = Self::probe_in(&self.buckets, position);
        match self.buckets[index].state {
            BucketState::Occupied(_) => Some(index),
            _ => None,
        }
    }

    /// Returns the live value stored for `position`, treating empty and tombstoned
    /// buckets as absent.
    pub fn get_checked(&self, position: Point3<i32>) -> Option<&T> {
        let index = self.live_index(position)?;
        match &self.buckets[index].state {
            BucketState::Occupied(value) => Some(value),
            _ => None,
        }
    }

    /// Mutable variant of [`ChunkHashList::get_checked`].
    pub fn get_checked_mut(&mut self, position: Point3<i32>) -> Option<&mut T> {
        let index = self.live_index(position)?;
        match &mut self.buckets[index].state {
            BucketState::Occupied(value) => Some(value),
            _ => None,
        }
    }

    /// Whether a live entry exists for `position`.
    pub fn contains(&self, position: Point3<i32>) -> bool {
        self.live_index(position).is_some()
    }

    /// Inserts a value for a position the caller has already established is absent.
    ///
    /// The entry is appended to the end of the iteration order. May rebuild the table.
    pub fn insert(&mut self, position: Point3<i32>, value: T) {
        debug_assert!(!self.contains(position), "insert of a live position {position:?}");

        if (self.used + self.tombstones + 1) > (self.buckets.len() * 3) / 4 {
            self.rebuild();
        }

        let index = Self::probe_in(&self.buckets, position);
        let bucket = &mut self.buckets[index];
        if let BucketState::Tombstone = bucket.state {
            self.tombstones -= 1;
        }
        bucket.position = position;
        bucket.state = BucketState::Occupied(value);
        self.link_back(index);
        self.used += 1;
    }

    /// Removes the live entry for `position`, returning its value.
    ///
    /// The bucket becomes a tombstone and leaves the iteration order.
    pub fn remove(&mut self, position: Point3<i32>) -> Option<T> {
        let index = self.live_index(position)?;
        let state = std::mem::replace(&mut self.buckets[index].state, BucketState::Tombstone);
        self.unlink(index);
        self.used -= 1;
        self.tombstones += 1;
        match state {
            BucketState::Occupied(value) => Some(value),
            _ => None,
        }
    }

    /// Iterates live entries in insertion order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.first,
        }
    }

    /// First position, in insertion order, whose entry satisfies `predicate`.
    pub fn find_first<F>(&self, mut predicate: F) -> Option<Point3<i32>>
    where
        F: FnMut(Point3<i32>, &T) -> bool,
    {
        self.iter()
            .find(|(position, value)| predicate(*position, value))
            .map(|(position, _)| position)
    }

    fn link_back(&mut self, index: usize) {
        self.buckets[index].prev = self.last;
        self.buckets[index].next = None;
        match self.last {
            Some(last) => self.buckets[last].next = Some(index),
            None => self.first = Some(index),
        }
        self.last = Some(index);
    }

    fn unlink(&mut self, index: usize) {
        let prev = self.buckets[index].prev.take();
        let next = self.buckets[index].next.take();
        match prev {
            Some(prev) => self.buckets[prev].next = next,
            None => self.first = next,
        }
        match next {
            Some(next) => self.buckets[next].prev = prev,
            None => self.last = prev,
        }
    }

    fn rebuild(&mut self) {
        let mut total = GROWTH_FACTOR;
        while total < self.used * GROWTH_FACTOR {
            total *= 2;
        }

        let mut old = std::mem::replace(self, Self::with_bucket_count(total));
        let mut cursor = old.first;
        while let Some(old_index) = cursor {
            let old_bucket = &mut old.buckets[old_index];
            cursor = old_bucket.next;
            let position = old_bucket.position;
            if let BucketState::Occupied(value) =
                std::mem::replace(&mut old_bucket.state, BucketState::Empty)
            {
                let index = Self::probe_in(&self.buckets, position);
                self.buckets[index].position = position;
                self.buckets[index].state = BucketState::Occupied(value);
                self.link_back(index);
                self.used += 1;
            }
        }

        debug!(
            "Rebuilt chunk hash list: {} live entries, {} -> {} buckets, {} tombstones dropped",
            self.used,
            old.buckets.len(),
            total,
            old.tombstones
        );
    }
}

/// Insertion-order iterator over a [`ChunkHashList`].
pub struct Iter<'a, T> {
    list: &'a ChunkHashList<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Point3<i32>, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        let list = self.list;
        let bucket = &list.buckets[index];
        self.cursor = bucket.next;
        match &bucket.state {
            BucketState::Occupied(value) => Some((bucket.position, value)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn random_position(rng: &mut fastrand::Rng, spread: i32) -> Point3<i32> {
        Point3::new(
            rng.i32(-spread..=spread),
            rng.i32(-spread..=spread),
            rng.i32(-spread..=spread),
        )
    }

    #[test]
    fn fnv_1a_matches_reference_vectors() {
        assert_eq!(fnv_1a(b""), 0x811c9dc5);
        assert_eq!(fnv_1a(b"a"), 0xe40c292c);
        assert_eq!(fnv_1a(b"foobar"), 0xbf9cf968);
    }

    #[test]
    fn first_insert_allocates_sixteen_buckets() {
        let mut list = ChunkHashList::new();
        assert_eq!(list.capacity(), 0);
        assert!(list.get_checked(Point3::new(0, 0, 0)).is_none());

        list.insert(Point3::new(0, 0, 0), 7u32);
        assert_eq!(list.capacity(), 16);
        assert_eq!(list.get_checked(Point3::new(0, 0, 0)), Some(&7));
    }

    #[test]
    fn load_factor_and_rebuild_invariants_hold_under_churn() {
        let mut rng = fastrand::Rng::with_seed(0x5eed);
        let mut list = ChunkHashList::new();
        let mut model: HashMap<Point3<i32>, u32> = HashMap::new();

        for step in 0..5_000u32 {
            let position = random_position(&mut rng, 6);
            if rng.u8(0..3) == 0 {
                assert_eq!(list.remove(position), model.remove(&position));
            } else if !model.contains_key(&position) {
                let capacity_before = list.capacity();
                let live_before = list.len();
                list.insert(position, step);
                model.insert(position, step);

                assert!(list.len() + list.tombstones() <= list.capacity() * 3 / 4);
                if list.capacity() != capacity_before {
                    assert_eq!(list.tombstones(), 0);
                    assert_eq!(list.len(), live_before + 1);
                    assert!(list.capacity().is_power_of_two());
                }
            }
            assert_eq!(list.len(), model.len());
        }

        for (position, value) in &model {
            assert_eq!(list.get_checked(*position), Some(value));
        }
        for _ in 0..500 {
            let position = random_position(&mut rng, 12);
            assert_eq!(list.get_checked(position), model.get(&position));
        }
    }

    #[test]
    fn removed_positions_read_as_absent_and_can_return() {
        let mut list = ChunkHashList::new();
        for x in 0..10 {
            list.insert(Point3::new(x, 0, 0), x);
        }
        assert_eq!(list.remove(Point3::new(3, 0, 0)), Some(3));
        assert_eq!(list.remove(Point3::new(3, 0, 0)), None);
        assert!(list.get_checked(Point3::new(3, 0, 0)).is_none());
        assert_eq!(list.tombstones(), 1);

        for x in (0..10).filter(|x| *x != 3) {
            assert_eq!(list.get_checked(Point3::new(x, 0, 0)), Some(&x));
        }

        list.insert(Point3::new(3, 0, 0), 33);
        assert_eq!(list.get_checked(Point3::new(3, 0, 0)), Some(&33));
        assert_eq!(list.len(), 10);
    }

    #[test]
    fn iteration_keeps_insertion_order_across_removal_and_rebuild() {
        let mut list = ChunkHashList::new();
        let mut expected = Vec::new();
        for i in 0..40 {
            let position = Point3::new(i, -i, i * 2);
            list.insert(position, i);
            expected.push(position);
            if i % 3 == 0 {
                let victim = expected.remove(expected.len() / 2);
                list.remove(victim);
            }
        }
        let order: Vec<Point3<i32>> = list.iter().map(|(position, _)| position).collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn get_checked_mut_updates_in_place() {
        let mut list = ChunkHashList::new();
        list.insert(Point3::new(1, 2, 3), String::from("a"));
        if let Some(value) = list.get_checked_mut(Point3::new(1, 2, 3)) {
            value.push('b');
        }
        assert_eq!(list.get_checked(Point3::new(1, 2, 3)).map(String::as_str), Some("ab"));
    }

    #[test]
    fn find_first_scans_in_insertion_order() {
        let mut list = ChunkHashList::new();
        list.insert(Point3::new(9, 0, 0), ());
        list.insert(Point3::new(5, 0, 0), ());
        list.insert(Point3::new(7, 0, 0), ());
        assert_eq!(list.find_first(|p, _| p.x > 4), Some(Point3::new(9, 0, 0)));
        assert_eq!(list.find_first(|p, _| p.x < 8), Some(Point3::new(5, 0, 0)));
        assert_eq!(list.find_first(|p, _| p.x > 100), None);
    }
}
