//! Deterministic RNG utilities for reproducible tests.

use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Create a deterministic `ChaCha8Rng` from a seed.
///
/// All test randomization should go through this to ensure reproducibility.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Draw a unit quaternion by normalizing a random 4-vector.
pub fn random_unit_quaternion(rng: &mut impl Rng) -> UnitQuaternion<f32> {
    loop {
        let q = Quaternion::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        if q.norm() > 1e-3 {
            return UnitQuaternion::from_quaternion(q);
        }
    }
}

/// Draw a position inside the cube `[-extent, extent]^3`.
pub fn random_position(rng: &mut impl Rng, extent: f32) -> Vector3<f32> {
    Vector3::new(
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_rng_is_deterministic() {
        let mut rng1 = seeded_rng(42);
        let mut rng2 = seeded_rng(42);
        let v1: f32 = rng1.r#gen();
        let v2: f32 = rng2.r#gen();
        assert!((v1 - v2).abs() < f32::EPSILON);
    }

    #[test]
    fn random_quaternion_is_unit() {
        let mut rng = seeded_rng(3);
        for _ in 0..100 {
            let q = random_unit_quaternion(&mut rng);
            assert!((q.norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn random_position_within_extent() {
        let mut rng = seeded_rng(9);
        for _ in 0..100 {
            let p = random_position(&mut rng, 2.0);
            assert!(p.iter().all(|c| c.abs() <= 2.0));
        }
    }
}
