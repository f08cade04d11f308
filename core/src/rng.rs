//! Deterministic random number generation.
//!
//! RULE: Nothing in the generator may call any platform RNG.
//! All randomness flows through StreamRng instances derived
//! from the single master seed stored on the run record.
//!
//! Each household gets one stream per signal slot, seeded from
//! (master_seed, household_index, slot). This means:
//!   - Households are independent; any index can be regenerated alone.
//!   - Adding a new signal slot never changes existing signals' streams.

use crate::types::HouseholdIndex;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG for one signal of one household.
pub struct StreamRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl StreamRng {
    /// Create a stream directly from a seed. Used by tests that need
    /// a standalone source without a bank.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Integer in [min, max], both ends inclusive.
    pub fn range_i64(&mut self, min: i64, max: i64) -> i64 {
        assert!(min <= max, "empty integer range [{min}, {max}]");
        // Two's-complement span; 0 means the full i64 range.
        let span = (max as u64).wrapping_sub(min as u64).wrapping_add(1);
        let offset = if span == 0 {
            self.next_u64()
        } else {
            self.next_u64_below(span)
        };
        min.wrapping_add(offset as i64)
    }

    /// Float in [min, max).
    pub fn range_f64(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Uniform pick from a non-empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        assert!(!items.is_empty(), "pick() from empty slice");
        &items[self.next_u64_below(items.len() as u64) as usize]
    }
}

/// All signal RNGs for a single run, indexed by household and slot.
#[derive(Debug, Clone)]
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn for_signal(&self, household: HouseholdIndex, slot: SignalSlot) -> StreamRng {
        let derived_seed = self.master_seed
            ^ household.wrapping_add(1).wrapping_mul(0x9e37_79b9_7f4a_7c15)
            ^ (slot as u64 + 1).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        StreamRng::from_seed(derived_seed).with_name(slot.name())
    }
}

/// Stable signal slot assignments.
/// NEVER reorder or remove entries. Only append.
/// Reordering changes every signal's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum SignalSlot {
    Profile = 0,
    Utilities = 1,
    Insurance = 2,
    Medical = 3,
    Counseling = 4,
    Calls = 5,
    Timeline = 6,
    Forecast = 7,
}

impl SignalSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Utilities => "utilities",
            Self::Insurance => "insurance",
            Self::Medical => "medical",
            Self::Counseling => "counseling",
            Self::Calls => "calls",
            Self::Timeline => "timeline",
            Self::Forecast => "forecast",
        }
    }
}
