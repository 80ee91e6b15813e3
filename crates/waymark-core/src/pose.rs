//! World-to-camera extrinsic extraction.
//!
//! [`PoseExtractor`] turns a camera orientation quaternion and world position
//! into a 4x4 homogeneous [`Pose`]:
//!
//! ```text
//! | R  -R·t |
//! | 0    1  |
//! ```
//!
//! Computation is carried out in `f64` so that the rotation block stays
//! orthonormal well inside `1e-6`, even though simulator state is `f32`.

use nalgebra::{Matrix3, Matrix4, Quaternion, UnitQuaternion, Vector3};

use crate::types::AgentState;

/// Camera forward axis in the camera's own frame.
const CAMERA_FORWARD: Vector3<f64> = Vector3::new(0.0, 0.0, -1.0);

// ---------------------------------------------------------------------------
// Pose
// ---------------------------------------------------------------------------

/// A world-to-camera rigid transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    matrix: Matrix4<f64>,
}

impl Pose {
    /// The full 4x4 homogeneous matrix.
    #[must_use]
    pub const fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// The top-left 3x3 rotation block.
    #[must_use]
    pub fn rotation(&self) -> Matrix3<f64> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// The translation column (`-R·t`).
    #[must_use]
    pub fn translation(&self) -> Vector3<f64> {
        self.matrix.fixed_view::<3, 1>(0, 3).into_owned()
    }

    /// Camera position in world coordinates, recovered as `-Rᵀ·(-R·t)`.
    #[must_use]
    pub fn world_position(&self) -> Vector3<f64> {
        -(self.rotation().transpose() * self.translation())
    }

    /// Camera forward direction, `R·(0, 0, -1)`.
    #[must_use]
    pub fn forward_direction(&self) -> Vector3<f64> {
        self.rotation() * CAMERA_FORWARD
    }

    /// Row-major rows of the matrix.
    #[must_use]
    pub fn rows(&self) -> [[f64; 4]; 4] {
        let m = &self.matrix;
        std::array::from_fn(|r| std::array::from_fn(|c| m[(r, c)]))
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }
}

// ---------------------------------------------------------------------------
// PoseExtractor
// ---------------------------------------------------------------------------

/// Converts orientation and position state into a [`Pose`].
///
/// Always succeeds for finite input. A degenerate (near-zero) quaternion is
/// treated as the identity rotation; non-finite input yields an unspecified
/// matrix and must be filtered by the caller.
#[derive(Clone, Copy, Debug, Default)]
pub struct PoseExtractor;

impl PoseExtractor {
    /// Build the extrinsic matrix from a world position and orientation.
    ///
    /// The quaternion is renormalized first; repeated compositions drift
    /// off the unit sphere.
    #[must_use]
    pub fn extract(position: &Vector3<f32>, orientation: &Quaternion<f32>) -> Pose {
        let q = orientation.cast::<f64>();
        let unit =
            UnitQuaternion::try_new(q, f64::EPSILON).unwrap_or_else(UnitQuaternion::identity);
        let r = unit.to_rotation_matrix().into_inner();
        let t = position.cast::<f64>();

        let mut matrix = Matrix4::identity();
        matrix.fixed_view_mut::<3, 3>(0, 0).copy_from(&r);
        matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(&(-(r * t)));
        Pose { matrix }
    }

    /// Extract the camera pose from a full agent state.
    #[must_use]
    pub fn extract_state(state: &AgentState) -> Pose {
        Self::extract(
            &state.camera_position(),
            state.camera_orientation().quaternion(),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use super::*;

    const TOL: f64 = 1e-6;

    fn random_quaternion(rng: &mut ChaCha8Rng) -> Quaternion<f32> {
        loop {
            let q = Quaternion::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            if q.norm() > 1e-3 {
                return q.normalize();
            }
        }
    }

    #[test]
    fn identity_at_origin_is_identity_matrix() {
        let pose =
            PoseExtractor::extract(&Vector3::zeros(), UnitQuaternion::identity().quaternion());
        assert_eq!(*pose.matrix(), Matrix4::identity());
    }

    #[test]
    fn rotation_block_is_orthonormal_for_random_input() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..500 {
            let q = random_quaternion(&mut rng);
            let p = Vector3::new(
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
            );
            let pose = PoseExtractor::extract(&p, &q);
            let r = pose.rotation();

            for i in 0..3 {
                assert!((r.row(i).norm() - 1.0).abs() < TOL);
                assert!((r.column(i).norm() - 1.0).abs() < TOL);
            }
            assert!((r.determinant() - 1.0).abs() < TOL);
            assert_eq!(pose.rows()[3], [0.0, 0.0, 0.0, 1.0]);
            assert!(pose.matrix().try_inverse().is_some());
        }
    }

    #[test]
    fn denormalized_quaternion_is_renormalized() {
        let q = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.3).into_inner() * 1.7;
        let pose = PoseExtractor::extract(&Vector3::zeros(), &q);
        assert!((pose.rotation().determinant() - 1.0).abs() < TOL);
    }

    #[test]
    fn zero_quaternion_falls_back_to_identity() {
        let degenerate = Quaternion::new(0.0, 0.0, 0.0, 0.0);
        let pose = PoseExtractor::extract(&Vector3::new(1.0, 2.0, 3.0), &degenerate);
        assert_eq!(pose.rotation(), Matrix3::identity());
        assert_eq!(pose.translation(), Vector3::new(-1.0, -2.0, -3.0));
    }

    #[test]
    fn translation_is_negated_rotated_position() {
        let q = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2);
        let p = Vector3::new(0.0, 0.0, -2.0);
        let pose = PoseExtractor::extract(&p, q.quaternion());

        // R rotates (0,0,-2) to (-2,0,0); translation is the negation.
        assert!((pose.translation() - Vector3::new(2.0, 0.0, 0.0)).norm() < TOL);
        assert!((pose.world_position() - p.cast::<f64>()).norm() < TOL);
    }

    #[test]
    fn identity_faces_negative_z() {
        let pose = Pose::default();
        assert_eq!(pose.forward_direction(), Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn extract_state_uses_camera_frame() {
        let state = AgentState {
            position: Vector3::new(1.0, 0.0, 0.0),
            sensor_position: Vector3::new(0.0, 1.5, 0.0),
            ..AgentState::default()
        };
        let pose = PoseExtractor::extract_state(&state);
        assert!((pose.world_position() - Vector3::new(1.0, 1.5, 0.0)).norm() < TOL);
    }
}
