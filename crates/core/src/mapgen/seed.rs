//! Seed mixing and sampling helpers over the generation RNG.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

static RUNTIME_SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

pub(crate) fn layout_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(mix_seed(seed))
}

/// Seed for runs that did not ask for one; distinct across calls within a process.
pub(crate) fn runtime_seed() -> u64 {
    let now_nanos =
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0_u128, |duration| duration.as_nanos());
    let pid = u64::from(std::process::id());
    let counter = RUNTIME_SEED_COUNTER.fetch_add(1, Ordering::Relaxed);

    let entropy = (now_nanos as u64)
        ^ ((now_nanos >> 64) as u64)
        ^ pid.rotate_left(17)
        ^ counter.rotate_left(7);

    mix_seed(entropy)
}

pub(crate) fn mix_seed(seed: u64) -> u64 {
    let mut mixed = seed ^ 0x9E37_79B9_7F4A_7C15;
    mixed ^= mixed >> 30;
    mixed = mixed.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed ^= mixed >> 27;
    mixed = mixed.wrapping_mul(0x94D0_49BB_1331_11EB);
    mixed ^ (mixed >> 31)
}

/// Uniform sample in `[0, 1)` with 24 bits of precision.
pub(crate) fn unit_f32(rng: &mut ChaCha8Rng) -> f32 {
    (rng.next_u64() >> 40) as f32 * (1.0 / (1_u32 << 24) as f32)
}

pub(crate) fn range_f32(rng: &mut ChaCha8Rng, min_value: f32, max_value: f32) -> f32 {
    debug_assert!(min_value <= max_value);
    min_value + unit_f32(rng) * (max_value - min_value)
}

pub(crate) fn range_u32(rng: &mut ChaCha8Rng, min_value: u32, max_value: u32) -> u32 {
    debug_assert!(min_value <= max_value);
    let range_size = u64::from(max_value - min_value) + 1;
    min_value + (rng.next_u64() % range_size) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_u32_stays_inside_requested_bounds() {
        let mut rng = layout_rng(12_345);
        for _ in 0..500 {
            let value = range_u32(&mut rng, 7, 13);
            assert!((7..=13).contains(&value));
        }
    }

    #[test]
    fn range_f32_stays_inside_requested_bounds() {
        let mut rng = layout_rng(99);
        for _ in 0..500 {
            let value = range_f32(&mut rng, 1.0, 6000.0);
            assert!((1.0..=6000.0).contains(&value), "{value} escaped the range");
        }
    }

    #[test]
    fn same_seed_yields_same_stream() {
        let mut a = layout_rng(42);
        let mut b = layout_rng(42);
        for _ in 0..16 {
            assert_eq!(range_u32(&mut a, 0, 1_000), range_u32(&mut b, 0, 1_000));
        }
    }

    #[test]
    fn runtime_seeds_differ_between_calls() {
        assert_ne!(runtime_seed(), runtime_seed());
    }
}
