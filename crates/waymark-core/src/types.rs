use nalgebra::{Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PixelFormat
// ---------------------------------------------------------------------------

/// Pixel storage format for captured frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// 3 bytes per pixel (red, green, blue).
    #[default]
    Rgb8,
    /// 4 bytes per pixel (red, green, blue, alpha).
    Rgba8,
}

impl PixelFormat {
    /// Number of bytes per pixel.
    #[must_use]
    pub const fn bytes_per_pixel(self) -> u32 {
        match self {
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }
}

// ---------------------------------------------------------------------------
// FrameBuffer
// ---------------------------------------------------------------------------

/// A single captured frame of pixel data.
///
/// # Example
///
/// ```
/// use waymark_core::types::{FrameBuffer, PixelFormat};
///
/// let buf = FrameBuffer::new(4, 2, PixelFormat::Rgb8);
/// assert_eq!(buf.width(), 4);
/// assert_eq!(buf.height(), 2);
/// assert_eq!(buf.data().len(), 4 * 2 * 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl FrameBuffer {
    /// Bytes needed for a `width` x `height` frame, or `None` on overflow.
    #[must_use]
    pub fn byte_len(width: u32, height: u32, format: PixelFormat) -> Option<usize> {
        usize::try_from(width)
            .ok()?
            .checked_mul(usize::try_from(height).ok()?)?
            .checked_mul(usize::try_from(format.bytes_per_pixel()).ok()?)
    }

    /// Create a zero-filled frame buffer.
    ///
    /// # Panics
    ///
    /// Panics if the frame size overflows `usize`; see [`Self::byte_len`].
    #[must_use]
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let Some(byte_count) = Self::byte_len(width, height, format) else {
            panic!("{width}x{height} {format:?} frame overflows usize");
        };
        Self {
            width,
            height,
            format,
            data: vec![0; byte_count],
        }
    }

    /// Wrap existing pixel bytes.
    ///
    /// Returns `None` if `data.len()` does not match the expected frame size.
    #[must_use]
    pub fn from_raw(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Option<Self> {
        (Self::byte_len(width, height, format) == Some(data.len())).then_some(Self {
            width,
            height,
            format,
            data,
        })
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub const fn format(&self) -> PixelFormat {
        self.format
    }

    /// Raw pixel data as a byte slice.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the raw pixel data.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Access a single pixel by (x, y) coordinates.
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        assert!(x < self.width, "x={x} out of bounds (width={})", self.width);
        assert!(
            y < self.height,
            "y={y} out of bounds (height={})",
            self.height
        );
        let bpp = self.format.bytes_per_pixel() as usize;
        let offset = ((y * self.width + x) as usize) * bpp;
        &self.data[offset..offset + bpp]
    }
}

// ---------------------------------------------------------------------------
// Observation
// ---------------------------------------------------------------------------

/// Sensor output returned by the simulator after a reset or step.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    /// RGB image from the agent's camera.
    pub image: FrameBuffer,
}

impl Observation {
    #[must_use]
    pub const fn new(image: FrameBuffer) -> Self {
        Self { image }
    }
}

// ---------------------------------------------------------------------------
// InputCode
// ---------------------------------------------------------------------------

/// Raw keyboard code as delivered by an input source.
///
/// Arrow keys use the reserved codes `0..=3`; printable keys use their
/// Unicode scalar value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InputCode(pub u32);

impl InputCode {
    pub const UP: Self = Self(0);
    pub const DOWN: Self = Self(1);
    pub const LEFT: Self = Self(2);
    pub const RIGHT: Self = Self(3);

    /// Code of a printable character.
    #[must_use]
    pub fn from_char(c: char) -> Self {
        Self(u32::from(c))
    }

    /// Printable character for this code, if it is not an arrow key.
    #[must_use]
    pub fn as_char(self) -> Option<char> {
        if self.0 <= Self::RIGHT.0 {
            return None;
        }
        char::from_u32(self.0).filter(|c| !c.is_control())
    }
}

impl std::fmt::Display for InputCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::UP => f.write_str("up"),
            Self::DOWN => f.write_str("down"),
            Self::LEFT => f.write_str("left"),
            Self::RIGHT => f.write_str("right"),
            code => match code.as_char() {
                Some(c) => write!(f, "{c}"),
                None => write!(f, "code:{}", code.0),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// SceneNode
// ---------------------------------------------------------------------------

/// Local rigid transform of a scene-graph node (agent body or sensor mount).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneNode {
    pub rotation: UnitQuaternion<f32>,
    pub translation: Vector3<f32>,
}

impl Default for SceneNode {
    fn default() -> Self {
        Self::identity()
    }
}

impl SceneNode {
    #[must_use]
    pub fn identity() -> Self {
        Self {
            rotation: UnitQuaternion::identity(),
            translation: Vector3::zeros(),
        }
    }

    #[must_use]
    pub fn from_translation(translation: Vector3<f32>) -> Self {
        Self {
            rotation: UnitQuaternion::identity(),
            translation,
        }
    }

    /// Rotate about an axis expressed in the node's own frame.
    pub fn rotate_local(&mut self, angle_rad: f32, axis: &Unit<Vector3<f32>>) {
        self.rotation *= UnitQuaternion::from_axis_angle(axis, angle_rad);
    }

    /// Translate along a vector expressed in the node's own frame.
    pub fn translate_local(&mut self, offset: &Vector3<f32>) {
        self.translation += self.rotation * offset;
    }
}

// ---------------------------------------------------------------------------
// AgentState
// ---------------------------------------------------------------------------

/// Agent pose as reported by the simulator.
///
/// `position`/`orientation` are the body in world frame. The sensor fields
/// are relative to the body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentState {
    pub position: Vector3<f32>,
    pub orientation: UnitQuaternion<f32>,
    pub sensor_orientation: UnitQuaternion<f32>,
    pub sensor_position: Vector3<f32>,
}

impl Default for AgentState {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            orientation: UnitQuaternion::identity(),
            sensor_orientation: UnitQuaternion::identity(),
            sensor_position: Vector3::zeros(),
        }
    }
}

impl AgentState {
    /// Build a state from body and sensor scene nodes.
    #[must_use]
    pub fn from_nodes(body: &SceneNode, sensor: &SceneNode) -> Self {
        Self {
            position: body.translation,
            orientation: body.rotation,
            sensor_orientation: sensor.rotation,
            sensor_position: sensor.translation,
        }
    }

    /// Camera orientation in world frame.
    #[must_use]
    pub fn camera_orientation(&self) -> UnitQuaternion<f32> {
        self.orientation * self.sensor_orientation
    }

    /// Camera position in world frame.
    #[must_use]
    pub fn camera_position(&self) -> Vector3<f32> {
        self.position + self.orientation * self.sensor_position
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
