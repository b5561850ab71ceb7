//! Deck shuffling
//!
//! Fisher–Yates over a copy of the input. The random source is injected so
//! tests can pass a seeded `ChaCha8Rng` and get a reproducible order.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded generator, or one seeded from the system time when `seed` is `None`
pub fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    let seed = seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });
    ChaCha8Rng::seed_from_u64(seed)
}

/// Returns a uniformly random permutation of `items`; the input is not touched.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = rng.gen_range(0..=i);
        out.swap(i, j);
    }
    out
}

/// Picks up to `n` random items, skipping every item equal to `exclude`.
pub fn pick_random<T: Clone + PartialEq, R: Rng + ?Sized>(
    items: &[T],
    n: usize,
    exclude: Option<&T>,
    rng: &mut R,
) -> Vec<T> {
    let pool: Vec<T> = match exclude {
        Some(excluded) => items.iter().filter(|x| *x != excluded).cloned().collect(),
        None => items.to_vec(),
    };
    let mut picked = shuffle(&pool, rng);
    picked.truncate(n);
    picked
}

/// Uniform choice of one element, `None` for an empty slice
pub fn choose<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.gen_range(0..items.len()))
}
