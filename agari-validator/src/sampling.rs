//! Deterministic file ordering and record sampling.
//!
//! A seeded run shuffles the file list with `ChaCha8Rng::seed_from_u64(seed)`
//! and draws the final sample with `seed + 1`, so the two steps never share
//! a stream. Unseeded runs draw both generators from the thread RNG.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Vendored Fisher-Yates shuffle.
///
/// Kept local rather than using `rand::seq::SliceRandom` so that a seeded
/// run picks the same files and hands across `rand` releases.
pub fn fisher_yates_shuffle<T>(slice: &mut [T], rng: &mut impl Rng) {
    for i in (1..slice.len()).rev() {
        let j = rng.random_range(0..=i);
        slice.swap(i, j);
    }
}

fn rng_for(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_rng(&mut rand::rng()),
    }
}

/// Shuffles the discovered files in place.
pub fn shuffle_files<T>(files: &mut [T], seed: Option<u64>) {
    let mut rng = rng_for(seed);
    fisher_yates_shuffle(files, &mut rng);
}

/// Picks `n` items uniformly without replacement. Returns `items` untouched
/// when there are no more than `n`.
pub fn sample<T>(mut items: Vec<T>, n: usize, seed: Option<u64>) -> Vec<T> {
    if items.len() <= n {
        return items;
    }
    let mut rng = rng_for(seed.map(|s| s.wrapping_add(1)));
    fisher_yates_shuffle(&mut items, &mut rng);
    items.truncate(n);
    items
}
