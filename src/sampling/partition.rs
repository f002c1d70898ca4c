// src/sampling/partition.rs

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

/// Split `sum` into `count` positive integers that add up to exactly `sum`.
///
/// Starts from one group holding all `sum` unit tokens and keeps splitting a
/// randomly chosen group (of at least two tokens) at a random point until
/// there are `count` groups. The result is shuffled so that no position is
/// biased towards the large early groups.
///
/// Returns `None` when there are not enough tokens (`sum < count`) or when
/// `count == 0`.
pub fn partition_int(sum: u64, count: usize, rng: &mut dyn RngCore) -> Option<Vec<u64>> {
    if count == 0 || sum < count as u64 {
        return None;
    }

    let mut groups: Vec<u64> = Vec::with_capacity(count);
    groups.push(sum);

    while groups.len() < count {
        let splittable: Vec<usize> = groups
            .iter()
            .enumerate()
            .filter(|(_, size)| **size >= 2)
            .map(|(i, _)| i)
            .collect();

        // sum >= count guarantees at least one group of size >= 2 here.
        let idx = *splittable.choose(rng)?;
        let size = groups[idx];
        let left = rng.gen_range(1..size);
        groups[idx] = left;
        groups.push(size - left);
    }

    groups.shuffle(rng);
    Some(groups)
}
