//! Iteration Module
//!
//! Read-only walks over the recency ring.

use std::hash::Hash;
use std::iter::FusedIterator;

use crate::cache::slots::SlotStore;

// == Iter ==
/// Iterator over `(&K, &V)` from least to most recently used.
pub struct Iter<'a, K, V> {
    slots: &'a SlotStore<K, V>,
    front: usize,
    back: usize,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V>
where
    K: Hash + Eq + Clone,
{
    pub(crate) fn new(slots: &'a SlotStore<K, V>, head: Option<usize>, len: usize) -> Self {
        let ends = head.and_then(|head| slots.get(head).map(|entry| (head, entry.prev)));
        let (front, back, remaining) = match ends {
            Some((head, tail)) => (head, tail, len),
            None => (0, 0, 0),
        };
        Self {
            slots,
            front,
            back,
            remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V>
where
    K: Hash + Eq + Clone,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = self.slots.get(self.front)?;
        self.front = entry.next;
        self.remaining -= 1;
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V>
where
    K: Hash + Eq + Clone,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = self.slots.get(self.back)?;
        self.back = entry.prev;
        self.remaining -= 1;
        Some((&entry.key, &entry.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> where K: Hash + Eq + Clone {}

impl<K, V> FusedIterator for Iter<'_, K, V> where K: Hash + Eq + Clone {}

// == Keys ==
/// Keys in recency order. See [`Iter`].
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) fn new(inner: Iter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V>
where
    K: Hash + Eq + Clone,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V>
where
    K: Hash + Eq + Clone,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> where K: Hash + Eq + Clone {}

// == Values ==
/// Values in recency order. See [`Iter`].
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) fn new(inner: Iter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V>
where
    K: Hash + Eq + Clone,
{
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V>
where
    K: Hash + Eq + Clone,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> where K: Hash + Eq + Clone {}

#[cfg(test)]
mod tests {
    use crate::cache::{GetOptions, TtlCache};
    use crate::clock::ManualClock;
    use crate::config::CacheConfig;

    fn cache() -> TtlCache<i32, i32> {
        let mut cache = TtlCache::builder()
            .config(CacheConfig::default())
            .clock(ManualClock::new(0))
            .build()
            .unwrap();
        for i in 0..3 {
            cache.set(i, i * 2);
        }
        cache
    }

    #[test]
    fn test_iter_lru_to_mru() {
        let cache = cache();
        let entries: Vec<(i32, i32)> = cache.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(entries, vec![(0, 0), (1, 2), (2, 4)]);
        assert_eq!(cache.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(cache.values().copied().collect::<Vec<_>>(), vec![0, 2, 4]);
    }

    #[test]
    fn test_iter_rev_and_exact_size() {
        let cache = cache();
        let keys: Vec<i32> = cache.keys().rev().copied().collect();
        assert_eq!(keys, vec![2, 1, 0]);
        assert_eq!(cache.iter().len(), 3);

        let mut iter = cache.iter();
        assert_eq!(iter.next(), Some((&0, &0)));
        assert_eq!(iter.next_back(), Some((&2, &4)));
        assert_eq!(iter.next(), Some((&1, &2)));
        assert_eq!(iter.next_back(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_iter_follows_recency() {
        let mut cache = cache();
        cache
            .get_with(&0, GetOptions::new().update_age_on_get(true))
            .unwrap();
        cache.set(1, 20);
        assert_eq!(cache.keys().copied().collect::<Vec<_>>(), vec![2, 0, 1]);
    }

    #[test]
    fn test_iter_empty() {
        let cache: TtlCache<i32, i32> = TtlCache::new(CacheConfig::default()).unwrap();
        assert_eq!(cache.iter().next(), None);
        assert_eq!(cache.keys().next_back(), None);
        assert_eq!((&cache).into_iter().count(), 0);
    }
}
