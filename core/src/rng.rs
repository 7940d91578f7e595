//! Deterministic random number generation.
//!
//! RULE: Nothing in the generator may call any platform RNG.
//! All randomness flows through a single GenRng seeded from the master
//! seed and consumed by the stages in their fixed registration order.
//! Same seed + same stage order = identical dataset, always.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// The one random stream for a generation run.
/// Threaded as `&mut` through every stage; never cloned, never global.
pub struct GenRng {
    inner: Pcg64Mcg,
}

impl GenRng {
    pub fn new(master_seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(master_seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Integer in [lo, hi], both ends inclusive.
    pub fn int_in(&mut self, lo: i64, hi: i64) -> i64 {
        assert!(lo <= hi, "int_in: lo must be <= hi");
        lo + self.next_u64_below((hi - lo + 1) as u64) as i64
    }

    /// Float uniform in [lo, hi).
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Pick one element uniformly.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.next_u64_below(items.len() as u64) as usize]
    }

    /// Pick one element with the given relative weights.
    /// Weights need not sum to 1; the last element absorbs rounding.
    pub fn pick_weighted<'a, T>(&mut self, items: &'a [T], weights: &[f64]) -> &'a T {
        assert_eq!(items.len(), weights.len(), "weights must match items");
        let total: f64 = weights.iter().sum();
        let roll = self.next_f64() * total;
        let mut cumulative = 0.0;
        for (item, w) in items.iter().zip(weights) {
            cumulative += w;
            if roll < cumulative {
                return item;
            }
        }
        items.last().expect("pick_weighted on empty slice")
    }

    /// In-place Fisher–Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_u64_below(i as u64 + 1) as usize;
            items.swap(i, j);
        }
    }

    /// Sample k distinct elements, order randomized. When k >= len,
    /// returns a shuffled copy of everything.
    pub fn sample<T: Clone>(&mut self, items: &[T], k: usize) -> Vec<T> {
        let mut pool: Vec<T> = items.to_vec();
        self.shuffle(&mut pool);
        pool.truncate(k.min(pool.len()));
        pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = GenRng::new(42);
        let mut b = GenRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_f64(), b.next_f64());
        }
    }

    #[test]
    fn int_in_respects_bounds() {
        let mut rng = GenRng::new(7);
        for _ in 0..1000 {
            let v = rng.int_in(3, 9);
            assert!((3..=9).contains(&v));
        }
    }

    #[test]
    fn pick_weighted_prefers_heavy_weights() {
        let mut rng = GenRng::new(99);
        let items = ["a", "b"];
        let mut a_count = 0;
        for _ in 0..1000 {
            if *rng.pick_weighted(&items, &[0.9, 0.1]) == "a" {
                a_count += 1;
            }
        }
        assert!(a_count > 700, "expected heavy skew toward 'a', got {a_count}");
    }

    #[test]
    fn sample_returns_distinct_elements() {
        let mut rng = GenRng::new(5);
        let items: Vec<i64> = (0..50).collect();
        let sampled = rng.sample(&items, 10);
        assert_eq!(sampled.len(), 10);
        let mut seen = sampled.clone();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 10, "sample must not repeat elements");
    }
}
