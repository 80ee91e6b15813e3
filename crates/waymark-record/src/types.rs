//! Record types written by [`SessionRecorder`](crate::SessionRecorder).

use std::path::Path;

use serde::{Deserialize, Serialize};
use waymark_core::config::PoseLayout;
use waymark_core::error::RecordError;
use waymark_core::pose::Pose;
use waymark_core::types::FrameBuffer;

/// Current on-disk format version.
pub const FORMAT_VERSION: u32 = 1;

/// File name of the session manifest inside the poses directory.
pub const MANIFEST_FILE: &str = "session.json";

/// File name of the pose table for [`PoseLayout::DirectionCsv`].
pub const POSE_TABLE_FILE: &str = "poses.csv";

/// Header row of the pose table.
pub const POSE_TABLE_HEADER: &str = "id x y z dirx diry dirz";

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// One recorded step: the image and camera pose after an action.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    step_index: u32,
    image: FrameBuffer,
    pose: Pose,
    action: String,
}

impl Frame {
    /// `step_index` starts at 1 for the first action of a session.
    #[must_use]
    pub fn new(step_index: u32, image: FrameBuffer, pose: Pose, action: impl Into<String>) -> Self {
        Self {
            step_index,
            image,
            pose,
            action: action.into(),
        }
    }

    #[must_use]
    pub const fn step_index(&self) -> u32 {
        self.step_index
    }

    #[must_use]
    pub const fn image(&self) -> &FrameBuffer {
        &self.image
    }

    #[must_use]
    pub const fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Name of the action that produced this frame.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }
}

// ---------------------------------------------------------------------------
// SessionManifest
// ---------------------------------------------------------------------------

/// `session.json`: declares which pose layout a session directory uses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionManifest {
    pub format_version: u32,
    pub layout: PoseLayout,
    pub image_extension: String,
    /// Session start, milliseconds since the Unix epoch.
    pub created_unix_ms: u64,
}

impl SessionManifest {
    #[must_use]
    pub fn new(layout: PoseLayout, created_unix_ms: u64) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            layout,
            image_extension: "png".into(),
            created_unix_ms,
        }
    }

    /// Write `session.json` into `dir`.
    ///
    /// # Errors
    ///
    /// [`RecordError::Serialize`] or [`RecordError::Io`].
    pub fn write_to(&self, dir: &Path) -> Result<(), RecordError> {
        let path = dir.join(MANIFEST_FILE);
        let json =
            serde_json::to_string_pretty(self).map_err(|e| RecordError::Serialize(e.to_string()))?;
        std::fs::write(&path, json).map_err(|e| RecordError::io(&path, e))
    }

    /// Read `session.json` from `dir`.
    ///
    /// # Errors
    ///
    /// [`RecordError::Io`] if the file is missing, [`RecordError::Serialize`]
    /// if it does not parse.
    pub fn read_from(dir: &Path) -> Result<Self, RecordError> {
        let path = dir.join(MANIFEST_FILE);
        let json = std::fs::read_to_string(&path).map_err(|e| RecordError::io(&path, e))?;
        serde_json::from_str(&json).map_err(|e| RecordError::Serialize(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Pose formatting
// ---------------------------------------------------------------------------

/// Four rows of four space-separated values, two decimals.
#[must_use]
pub fn format_extrinsic(pose: &Pose) -> String {
    pose.rows()
        .iter()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(|v| format!("{:.2}", clean_zero(*v))).collect();
            cells.join(" ") + "\n"
        })
        .collect()
}

/// One pose-table row: step id, camera position and forward direction.
#[must_use]
pub fn format_direction_row(step_index: u32, pose: &Pose) -> String {
    let p = pose.world_position();
    let d = pose.forward_direction();
    let values = [p.x, p.y, p.z, d.x, d.y, d.z]
        .iter()
        .map(|v| format!("{:.2}", clean_zero(*v)))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{step_index} {values}\n")
}

/// Map values that round to zero onto `+0.0` so files never hold `-0.00`.
fn clean_zero(v: f64) -> f64 {
    if v.abs() < 0.005 { 0.0 } else { v }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use nalgebra::{UnitQuaternion, Vector3};
    use waymark_core::pose::PoseExtractor;
    use waymark_core::types::PixelFormat;

    use super::*;

    #[test]
    fn identity_extrinsic_text() {
        let text = format_extrinsic(&Pose::default());
        assert_eq!(
            text,
            "1.00 0.00 0.00 0.00\n0.00 1.00 0.00 0.00\n0.00 0.00 1.00 0.00\n0.00 0.00 0.00 1.00\n"
        );
    }

    #[test]
    fn extrinsic_has_four_rows_of_four() {
        let q = UnitQuaternion::from_euler_angles(0.3_f32, -1.1, 0.7);
        let pose = PoseExtractor::extract(&Vector3::new(1.0, 2.0, -3.0), q.quaternion());
        let text = format_extrinsic(&pose);
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 4);
        for row in rows {
            let cells: Vec<&str> = row.split(' ').collect();
            assert_eq!(cells.len(), 4);
            for cell in cells {
                let (_, decimals) = cell.split_once('.').unwrap();
                assert_eq!(decimals.len(), 2);
            }
        }
    }

    #[test]
    fn negative_zero_is_cleaned() {
        let q = UnitQuaternion::from_euler_angles(0.0_f32, std::f32::consts::PI, 0.0);
        let pose = PoseExtractor::extract(&Vector3::zeros(), q.quaternion());
        assert!(!format_extrinsic(&pose).contains("-0.00"));
    }

    #[test]
    fn direction_row_at_origin() {
        let pose =
            PoseExtractor::extract(&Vector3::zeros(), UnitQuaternion::identity().quaternion());
        assert_eq!(
            format_direction_row(1, &pose),
            "1 0.00 0.00 0.00 0.00 0.00 -1.00\n"
        );
    }

    #[test]
    fn direction_row_recovers_world_position() {
        let q = UnitQuaternion::from_euler_angles(0.0_f32, std::f32::consts::FRAC_PI_2, 0.0);
        let pose = PoseExtractor::extract(&Vector3::new(1.5, 0.0, -2.0), q.quaternion());
        assert_eq!(
            format_direction_row(7, &pose),
            "7 1.50 0.00 -2.00 -1.00 0.00 0.00\n"
        );
    }

    #[test]
    fn header_column_count_matches_rows() {
        let row = format_direction_row(3, &Pose::default());
        assert_eq!(
            row.split_whitespace().count(),
            POSE_TABLE_HEADER.split(' ').count()
        );
    }

    #[test]
    fn manifest_write_read() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = SessionManifest::new(PoseLayout::DirectionCsv, 1_700_000_000_000);
        manifest.write_to(dir.path()).unwrap();

        let loaded = SessionManifest::read_from(dir.path()).unwrap();
        assert_eq!(loaded, manifest);
        assert_eq!(loaded.format_version, FORMAT_VERSION);

        let raw = std::fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
        assert!(raw.contains("\"layout\": \"direction_csv\""));
    }

    #[test]
    fn manifest_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SessionManifest::read_from(dir.path()).unwrap_err();
        assert!(matches!(err, RecordError::Io { .. }));
    }

    #[test]
    fn frame_accessors() {
        let image = FrameBuffer::new(1, 1, PixelFormat::default());
        let frame = Frame::new(2, image, Pose::default(), "stop");
        assert_eq!(frame.step_index(), 2);
        assert_eq!(frame.action(), "stop");
        assert_eq!(frame.image().width(), 1);
    }
}
