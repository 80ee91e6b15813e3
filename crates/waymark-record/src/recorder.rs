//! File-backed session recorder.
//!
//! # Layout
//!
//! Everything lands in `<output_dir>/poses/`:
//!
//! | File            | Layout          | Contents                                   |
//! |-----------------|-----------------|--------------------------------------------|
//! | `session.json`  | both            | [`SessionManifest`]                        |
//! | `<step>.png`    | both            | captured frame                             |
//! | `<step>.txt`    | `extrinsic`     | 4x4 world-to-camera matrix, two decimals   |
//! | `poses.csv`     | `direction_csv` | one row per step: id, position, direction  |
//!
//! Opening a recorder on a directory that already holds a session removes
//! that session's files first. Anything else in the directory is left alone.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use image::{ImageBuffer, ImageFormat, Rgb, Rgba};
use tracing::{debug, info, warn};
use waymark_core::config::PoseLayout;
use waymark_core::error::RecordError;
use waymark_core::types::{FrameBuffer, PixelFormat};

use crate::types::{
    Frame, MANIFEST_FILE, POSE_TABLE_FILE, POSE_TABLE_HEADER, SessionManifest,
    format_direction_row, format_extrinsic,
};

/// Name of the per-session subdirectory under the output directory.
pub const POSES_DIR: &str = "poses";

// ---------------------------------------------------------------------------
// SessionRecorder
// ---------------------------------------------------------------------------

/// Writes frames and poses for one session.
///
/// The pose table handle (CSV layout) is opened by [`open`](Self::open) and
/// released exactly once, by [`close`](Self::close) or on drop.
pub struct SessionRecorder {
    poses_dir: PathBuf,
    layout: PoseLayout,
    table: Option<BufWriter<File>>,
    last_step: u32,
    frames: u32,
    closed: bool,
}

impl SessionRecorder {
    /// Create `path` and any missing parents. Succeeds if it already exists.
    ///
    /// # Errors
    ///
    /// [`RecordError::Io`] if the directory cannot be created.
    pub fn ensure_directory(path: &Path) -> Result<(), RecordError> {
        std::fs::create_dir_all(path).map_err(|e| RecordError::io(path, e))
    }

    /// Start a session under `output_dir`.
    ///
    /// # Errors
    ///
    /// [`RecordError::Io`] if the directory, manifest or pose table cannot
    /// be written.
    pub fn open(output_dir: &Path, layout: PoseLayout) -> Result<Self, RecordError> {
        let poses_dir = output_dir.join(POSES_DIR);
        Self::ensure_directory(&poses_dir)?;
        let removed = clear_previous_session(&poses_dir)?;
        if removed > 0 {
            info!(dir = %poses_dir.display(), removed, "cleared previous session");
        }
        SessionManifest::new(layout, unix_millis()).write_to(&poses_dir)?;

        let table = match layout {
            PoseLayout::Extrinsic => None,
            PoseLayout::DirectionCsv => {
                let path = poses_dir.join(POSE_TABLE_FILE);
                let file = File::create(&path).map_err(|e| RecordError::io(&path, e))?;
                let mut writer = BufWriter::new(file);
                writeln!(writer, "{POSE_TABLE_HEADER}").map_err(|e| RecordError::io(&path, e))?;
                Some(writer)
            }
        };

        debug!(dir = %poses_dir.display(), %layout, "session recorder opened");
        Ok(Self {
            poses_dir,
            layout,
            table,
            last_step: 0,
            frames: 0,
            closed: false,
        })
    }

    /// Persist one frame's image and pose record.
    ///
    /// # Errors
    ///
    /// [`RecordError::Closed`] after [`close`](Self::close),
    /// [`RecordError::StepOrder`] if `frame` does not advance the step index,
    /// otherwise I/O or image encoding failures.
    pub fn append_frame(&mut self, frame: &Frame) -> Result<(), RecordError> {
        if self.closed {
            return Err(RecordError::Closed);
        }
        let step = frame.step_index();
        if step <= self.last_step {
            return Err(RecordError::StepOrder {
                last: self.last_step,
                got: step,
            });
        }

        let image_path = self.poses_dir.join(format!("{step}.png"));
        write_png(&image_path, frame.image())?;

        match self.layout {
            PoseLayout::Extrinsic => {
                let path = self.poses_dir.join(format!("{step}.txt"));
                std::fs::write(&path, format_extrinsic(frame.pose()))
                    .map_err(|e| RecordError::io(&path, e))?;
            }
            PoseLayout::DirectionCsv => {
                let path = self.poses_dir.join(POSE_TABLE_FILE);
                let table = self.table.as_mut().ok_or(RecordError::Closed)?;
                table
                    .write_all(format_direction_row(step, frame.pose()).as_bytes())
                    .map_err(|e| RecordError::io(&path, e))?;
            }
        }

        self.last_step = step;
        self.frames += 1;
        debug!(step, action = frame.action(), "frame recorded");
        Ok(())
    }

    /// Flush and release the pose table. Later calls are no-ops.
    ///
    /// # Errors
    ///
    /// [`RecordError::Io`] if the final flush fails.
    pub fn close(&mut self) -> Result<(), RecordError> {
        self.closed = true;
        if let Some(mut table) = self.table.take() {
            table
                .flush()
                .map_err(|e| RecordError::io(self.poses_dir.join(POSE_TABLE_FILE), e))?;
            debug!(frames = self.frames, "session recorder closed");
        }
        Ok(())
    }

    /// Step index the next frame should carry.
    #[must_use]
    pub const fn next_step_index(&self) -> u32 {
        self.last_step + 1
    }

    #[must_use]
    pub const fn frame_count(&self) -> u32 {
        self.frames
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    #[must_use]
    pub const fn layout(&self) -> PoseLayout {
        self.layout
    }

    /// The `<output_dir>/poses` directory.
    #[must_use]
    pub fn poses_dir(&self) -> &Path {
        &self.poses_dir
    }
}

impl std::fmt::Debug for SessionRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRecorder")
            .field("poses_dir", &self.poses_dir)
            .field("layout", &self.layout)
            .field("frames", &self.frames)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl Drop for SessionRecorder {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("failed to close session recorder: {e}");
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write_png(path: &Path, image: &FrameBuffer) -> Result<(), RecordError> {
    let encode_err = |message: String| RecordError::Image {
        path: path.to_path_buf(),
        message,
    };
    let (width, height, data) = (image.width(), image.height(), image.data());

    let result = match image.format() {
        PixelFormat::Rgb8 => ImageBuffer::<Rgb<u8>, &[u8]>::from_raw(width, height, data)
            .ok_or_else(|| encode_err("buffer size mismatch".into()))?
            .save_with_format(path, ImageFormat::Png),
        PixelFormat::Rgba8 => ImageBuffer::<Rgba<u8>, &[u8]>::from_raw(width, height, data)
            .ok_or_else(|| encode_err("buffer size mismatch".into()))?
            .save_with_format(path, ImageFormat::Png),
    };
    result.map_err(|e| encode_err(e.to_string()))
}

/// Whether `name` is a file a recorder writes: the manifest, the pose table
/// or a `<step>.png` / `<step>.txt` pair member.
fn is_session_file(name: &str) -> bool {
    if name == MANIFEST_FILE || name == POSE_TABLE_FILE {
        return true;
    }
    name.rsplit_once('.').is_some_and(|(stem, ext)| {
        matches!(ext, "png" | "txt")
            && !stem.is_empty()
            && stem.bytes().all(|b| b.is_ascii_digit())
    })
}

/// Remove recorder-owned files left in `poses_dir` by an earlier session.
fn clear_previous_session(poses_dir: &Path) -> Result<usize, RecordError> {
    let entries = std::fs::read_dir(poses_dir).map_err(|e| RecordError::io(poses_dir, e))?;
    let mut removed = 0;
    for entry in entries {
        let entry = entry.map_err(|e| RecordError::io(poses_dir, e))?;
        let path = entry.path();
        let owned = path.is_file() && entry.file_name().to_str().is_some_and(is_session_file);
        if owned {
            std::fs::remove_file(&path).map_err(|e| RecordError::io(&path, e))?;
            removed += 1;
        }
    }
    Ok(removed)
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
