use super::editops::{EditOp, seq_editops};
use crate::cache::{CacheStats, DEFAULT_CACHE_CAPACITY, MemoCache};
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;

type SequencePair<T> = (Vec<T>, Vec<T>);

/// Edit distance engine with a memoization cache keyed by the compared sequences.
///
/// Repeated comparisons of equal inputs return the cached script. The cache is bounded
/// and owned by the engine; call [`EditDistanceEngine::clear`] between independent
/// document pairs to release memory.
///
/// # Example
///
/// ```rust
/// use ocreval::distance::EditDistanceEngine;
///
/// let engine = EditDistanceEngine::<char>::default();
/// let a: Vec<char> = "Fnord".chars().collect();
/// let b: Vec<char> = "Food".chars().collect();
/// assert_eq!(engine.distance(&a, &b), 2);
/// assert_eq!(engine.cache_stats().entries, 1);
/// ```
#[derive(Debug)]
pub struct EditDistanceEngine<T> {
    cache: MemoCache<SequencePair<T>, Arc<[EditOp]>>,
}

impl<T> Default for EditDistanceEngine<T>
where
    T: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::with_capacity(NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN))
    }
}

impl<T> EditDistanceEngine<T>
where
    T: Eq + Hash + Clone,
{
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            cache: MemoCache::new(capacity),
        }
    }

    /// Minimal edit script from `seq1` to `seq2`.
    pub fn editops(&self, seq1: &[T], seq2: &[T]) -> Arc<[EditOp]> {
        let key = (seq1.to_vec(), seq2.to_vec());
        self.cache
            .get_or_insert_with(key, || Arc::from(seq_editops(seq1, seq2)))
    }

    /// Levenshtein distance; every operation of the minimal script costs one.
    pub fn distance(&self, seq1: &[T], seq2: &[T]) -> usize {
        self.editops(seq1, seq2).len()
    }

    /// Distance divided by the longer length, `0` for two empty sequences.
    pub fn normalized_distance(&self, seq1: &[T], seq2: &[T]) -> f64 {
        let longest = seq1.len().max(seq2.len());
        if longest == 0 {
            return 0.0;
        }
        self.distance(seq1, seq2) as f64 / longest as f64
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::chars_normalized;

    #[test]
    fn test_engine_caches_by_value() {
        let engine = EditDistanceEngine::<String>::default();
        let a = chars_normalized("Schlyñ");
        let b = chars_normalized("Schlym\u{0303}");

        assert_eq!(engine.distance(&a, &b), 1);
        assert_eq!(engine.distance(&a.clone(), &b.clone()), 1);

        let stats = engine.cache_stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_engine_direction_matters_for_script() {
        let engine = EditDistanceEngine::<char>::default();
        let a: Vec<char> = "Foo".chars().collect();
        let b: Vec<char> = "Food".chars().collect();
        assert_eq!(&*engine.editops(&a, &b), &[EditOp::Insert { left: 3, right: 3 }]);
        assert_eq!(&*engine.editops(&b, &a), &[EditOp::Delete { left: 3, right: 3 }]);
        assert_eq!(engine.cache_stats().entries, 2);
    }

    #[test]
    fn test_engine_clear() {
        let engine = EditDistanceEngine::<char>::default();
        engine.distance(&['a'], &['b']);
        engine.clear();
        assert_eq!(engine.cache_stats().entries, 0);
    }

    #[test]
    fn test_engine_bounded_capacity() {
        let engine = EditDistanceEngine::<u8>::with_capacity(NonZeroUsize::new(2).unwrap());
        engine.distance(&[1], &[2]);
        engine.distance(&[1], &[3]);
        engine.distance(&[1], &[4]);
        let stats = engine.cache_stats();
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.evictions, 1);
    }

    #[test]
    fn test_engine_normalized_distance() {
        let engine = EditDistanceEngine::<char>::default();
        assert_eq!(engine.normalized_distance(&[], &[]), 0.0);
        assert_eq!(engine.normalized_distance(&['a', 'b'], &['a', 'c']), 0.5);
    }
}
