//! On-disk session recording for Waymark.
//!
//! [`SessionRecorder`] owns `<output_dir>/poses/` for one session and writes,
//! per step, a PNG frame plus a pose record in the session's
//! [`PoseLayout`](waymark_core::config::PoseLayout). A `session.json`
//! [`SessionManifest`] declares the layout and format version so readers can
//! tell the two layouts apart.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use waymark_core::config::PoseLayout;
//! use waymark_core::pose::Pose;
//! use waymark_core::types::{FrameBuffer, PixelFormat};
//! use waymark_record::{Frame, SessionRecorder};
//!
//! let mut recorder = SessionRecorder::open(Path::new("capture"), PoseLayout::Extrinsic).unwrap();
//! let image = FrameBuffer::new(64, 64, PixelFormat::Rgb8);
//! recorder.append_frame(&Frame::new(1, image, Pose::default(), "move_forward")).unwrap();
//! recorder.close().unwrap();
//! ```

pub mod recorder;
pub mod types;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use recorder::{POSES_DIR, SessionRecorder};
pub use types::{
    FORMAT_VERSION, Frame, MANIFEST_FILE, POSE_TABLE_FILE, POSE_TABLE_HEADER, SessionManifest,
    format_direction_row, format_extrinsic,
};

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{Frame, SessionManifest, SessionRecorder};
}
