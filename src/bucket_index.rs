//! BucketIndex: separate chaining over positions into the value store.
//!
//! Bucket `b` holds every position whose recorded hash reduces to `b`
//! modulo the bucket count. Chains are small inline arrays, not linked nodes,
//! so a short chain costs no allocation. Order within a chain is irrelevant.
//!
//! Invariant (maintained by DenseHashMap): each position `0..len` of the
//! value store appears in exactly one chain, the one its hash reduces to.

use smallvec::SmallVec;

/// Chains hold up to two positions inline before spilling to the heap.
pub(crate) type Chain = SmallVec<[usize; 2]>;

/// Bucket count of a freshly created or cleared index.
pub const INITIAL_BUCKET_COUNT: usize = 1;

#[derive(Debug, Clone)]
pub(crate) struct BucketIndex {
    buckets: Vec<Chain>,
}

impl BucketIndex {
    pub(crate) fn new() -> Self {
        Self {
            buckets: vec![Chain::new(); INITIAL_BUCKET_COUNT],
        }
    }

    #[inline]
    pub(crate) fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub(crate) fn bucket_of(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    /// Positions chained under the bucket `hash` reduces to.
    #[inline]
    pub(crate) fn chain(&self, hash: u64) -> &[usize] {
        &self.buckets[self.bucket_of(hash)]
    }

    pub(crate) fn insert(&mut self, hash: u64, pos: usize) {
        let b = self.bucket_of(hash);
        self.buckets[b].push(pos);
    }

    /// Drop `pos` from its chain by swapping it with the chain's last element.
    /// Returns false if `pos` was not chained under `hash`.
    pub(crate) fn remove(&mut self, hash: u64, pos: usize) -> bool {
        let b = self.bucket_of(hash);
        let chain = &mut self.buckets[b];
        match chain.iter().position(|&p| p == pos) {
            Some(i) => {
                chain.swap_remove(i);
                true
            }
            None => false,
        }
    }

    /// Rewrite the chain entry `from` to `to` in the bucket `hash` reduces to.
    /// Returns false if `from` was not chained under `hash`.
    pub(crate) fn repoint(&mut self, hash: u64, from: usize, to: usize) -> bool {
        let b = self.bucket_of(hash);
        match self.buckets[b].iter_mut().find(|p| **p == from) {
            Some(p) => {
                *p = to;
                true
            }
            None => false,
        }
    }

    /// Throw away every chain and rechain positions `0..` from `hashes`
    /// against `bucket_count` buckets.
    pub(crate) fn rebuild<I>(&mut self, bucket_count: usize, hashes: I)
    where
        I: IntoIterator<Item = u64>,
    {
        debug_assert!(bucket_count >= 1);
        self.buckets.clear();
        self.buckets.resize_with(bucket_count, Chain::new);
        for (pos, hash) in hashes.into_iter().enumerate() {
            self.insert(hash, pos);
        }
    }

    /// Back to a single empty bucket, releasing chain storage.
    pub(crate) fn reset(&mut self) {
        self.buckets = vec![Chain::new(); INITIAL_BUCKET_COUNT];
    }

    #[cfg(test)]
    pub(crate) fn chains(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.buckets.iter().map(|c| c.as_slice())
    }

    #[cfg(any(test, feature = "bench_internal"))]
    pub(crate) fn stats(&self) -> ChainStats {
        let mut stats = ChainStats {
            bucket_count: self.buckets.len(),
            ..ChainStats::default()
        };
        for chain in &self.buckets {
            stats.positions += chain.len();
            if chain.is_empty() {
                stats.empty_buckets += 1;
            }
            if chain.spilled() {
                stats.spilled_chains += 1;
            }
            stats.longest_chain = stats.longest_chain.max(chain.len());
        }
        stats
    }
}

impl Default for BucketIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Shape of the bucket index, for benches and diagnostics.
#[cfg(any(test, feature = "bench_internal"))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChainStats {
    pub bucket_count: usize,
    pub positions: usize,
    pub empty_buckets: usize,
    pub longest_chain: usize,
    /// Chains that outgrew their inline storage.
    pub spilled_chains: usize,
}
