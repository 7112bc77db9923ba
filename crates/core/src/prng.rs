//! Seedable Xorshift64 generator for lattice jitter and spark spawning.
//!
//! A field built with the same seed places and spawns identically, which
//! keeps snapshots and tests reproducible. Frame timing is not part of that
//! guarantee.

use serde::{Deserialize, Serialize};

/// Xorshift64 PRNG with shifts (13, 7, 17).
///
/// Seed 0 is a fixed point of the algorithm and is replaced by a non-zero
/// fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform f64 in [0, 1) from the upper 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform f64 in [min, max). Returns `min` when the range is empty.
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        min + self.next_f64() * (max - min)
    }

    /// Uniform f64 in [-amplitude, amplitude]; zero amplitude draws nothing.
    pub fn next_signed(&mut self, amplitude: f64) -> f64 {
        if amplitude <= 0.0 {
            return 0.0;
        }
        (self.next_f64() * 2.0 - 1.0) * amplitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_42_first_value_is_stable() {
        // Changing this value changes every seeded lattice and spark burst.
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    #[test]
    fn zero_seed_is_replaced() {
        let mut rng = Xorshift64::new(0);
        assert_ne!(rng.next_u64(), 0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Xorshift64::new(7);
        let mut b = Xorshift64::new(7);
        for i in 0..500 {
            assert_eq!(a.next_u64(), b.next_u64(), "diverged at {i}");
        }
    }

    #[test]
    fn empty_range_returns_min() {
        let mut rng = Xorshift64::new(3);
        assert_eq!(rng.next_range(5.0, 5.0), 5.0);
        assert_eq!(rng.next_range(5.0, 1.0), 5.0);
    }

    #[test]
    fn zero_amplitude_is_exactly_zero() {
        let mut rng = Xorshift64::new(3);
        for _ in 0..100 {
            assert_eq!(rng.next_signed(0.0), 0.0);
        }
    }

    #[test]
    fn state_survives_serialization() {
        let mut rng = Xorshift64::new(99);
        for _ in 0..10 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: Xorshift64 = serde_json::from_str(&json).unwrap();
        for _ in 0..20 {
            assert_eq!(rng.next_u64(), restored.next_u64());
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn next_f64_in_unit_interval(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_f64();
                    prop_assert!((0.0..1.0).contains(&v));
                }
            }

            #[test]
            fn next_range_in_bounds(
                seed: u64,
                min in -1e4_f64..1e4,
                span in 1e-3_f64..1e4,
            ) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_range(min, min + span);
                    prop_assert!(v >= min && v <= min + span, "{v} outside [{min}, {}]", min + span);
                }
            }

            #[test]
            fn next_signed_within_amplitude(seed: u64, amp in 0.0_f64..100.0) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_signed(amp);
                    prop_assert!(v.abs() <= amp, "{v} exceeds amplitude {amp}");
                }
            }
        }
    }
}
