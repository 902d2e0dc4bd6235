//! Fairness-first bucketed sampling.
//!
//! Given a group of buckets with unequal populations and a target count, the
//! sampler first takes every bucket that cannot even cover the per-bucket
//! average in full, then fills the remaining demand one item per bucket in
//! rounds, picking uniformly at random among the items not yet taken.

use std::collections::{BTreeMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

/// Outcome of one [`distribute`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution<K, I> {
    /// Selected items, each at most once.
    pub selected: Vec<I>,
    /// Selected count for every bucket of the group; sums to `selected.len()`.
    pub per_bucket: BTreeMap<K, usize>,
    /// Count asked for by the caller.
    pub requested: usize,
    /// Count actually aimed for after clamping to the available supply.
    pub target: usize,
}

impl<K, I> Distribution<K, I> {
    fn empty(requested: usize) -> Self {
        Self {
            selected: Vec::new(),
            per_bucket: BTreeMap::new(),
            requested,
            target: 0,
        }
    }

    pub fn was_clamped(&self) -> bool {
        self.target < self.requested
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }
}

/// Build the sampler's random source: reproducible when a seed is given.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Select up to `target_count` items from the buckets named in `bucket_keys`.
///
/// 1. The target is clamped to the total supply of the group.
/// 2. `average = target / bucket_count` is computed once, against the full
///    bucket count of the group.
/// 3. Every bucket holding at most `average` items is taken whole.
/// 4. The remaining demand is filled in rounds over the other buckets in
///    ascending key order, one uniformly random untaken item per bucket per
///    round, until the demand is met or every bucket is drained.
///
/// Keys missing from `items_by_bucket` are empty buckets. Repeated keys are
/// considered once, and an item listed more than once (in one bucket or
/// across buckets) belongs to the first bucket of `bucket_keys` listing it.
pub fn distribute<K, I, R>(
    bucket_keys: &[K],
    items_by_bucket: &BTreeMap<K, Vec<I>>,
    target_count: usize,
    rng: &mut R,
) -> Distribution<K, I>
where
    K: Ord + Copy + Debug,
    I: Clone + Eq + Hash,
    R: Rng,
{
    if target_count == 0 {
        return Distribution::empty(target_count);
    }

    let mut claimed = HashSet::new();
    let mut pools: BTreeMap<K, Vec<I>> = BTreeMap::new();
    for key in bucket_keys {
        pools
            .entry(*key)
            .or_insert_with(|| unique_items(items_by_bucket.get(key), &mut claimed));
    }
    if pools.is_empty() {
        return Distribution::empty(target_count);
    }

    let available: usize = pools.values().map(Vec::len).sum();
    let mut distribution = Distribution::empty(target_count);
    distribution.target = target_count.min(available);
    if distribution.was_clamped() {
        warn!(
            requested = target_count,
            available, "requested sample count exceeds available items; clamping"
        );
    }

    let mut remaining = distribution.target;
    let average = remaining / pools.len();

    // Fairness pass.
    let mut open: Vec<(K, Vec<I>)> = Vec::with_capacity(pools.len());
    for (key, pool) in pools {
        if pool.len() <= average {
            debug!(bucket = ?key, taken = pool.len(), average, "bucket taken whole");
            remaining -= pool.len();
            distribution.per_bucket.insert(key, pool.len());
            distribution.selected.extend(pool);
        } else {
            distribution.per_bucket.insert(key, 0);
            open.push((key, pool));
        }
    }

    // Greedy fill, one item per bucket per round.
    while remaining > 0 && !open.is_empty() {
        for (key, pool) in open.iter_mut() {
            if remaining == 0 {
                break;
            }
            if pool.is_empty() {
                continue;
            }
            let index = rng.gen_range(0..pool.len());
            let item = pool.swap_remove(index);
            distribution.selected.push(item);
            *distribution.per_bucket.entry(*key).or_insert(0) += 1;
            remaining -= 1;
        }
        open.retain(|(_, pool)| !pool.is_empty());
    }

    distribution
}

/// Items of one bucket not already claimed by an earlier bucket of the group.
fn unique_items<I: Clone + Eq + Hash>(items: Option<&Vec<I>>, claimed: &mut HashSet<I>) -> Vec<I> {
    let Some(items) = items else {
        return Vec::new();
    };
    items
        .iter()
        .filter(|item| claimed.insert((*item).clone()))
        .cloned()
        .collect()
}
