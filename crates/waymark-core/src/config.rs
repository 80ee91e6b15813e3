use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::action::names;
use crate::error::ConfigError;
use crate::types::{FrameBuffer, PixelFormat};

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

fn default_output_dir() -> PathBuf {
    PathBuf::from("capture")
}
const fn default_max_episode_steps() -> u32 {
    500
}
const fn default_success_distance() -> f32 {
    0.2
}
const fn default_render_resolution() -> [u32; 2] {
    [256, 256]
}
const fn default_sensor_height() -> f32 {
    1.5
}
const fn default_forward_step() -> f32 {
    0.25
}
const fn default_turn_angle() -> f32 {
    10.0
}
const fn default_tilt_angle() -> f32 {
    15.0
}
fn default_custom_actions() -> Vec<CustomActionConfig> {
    vec![
        CustomActionConfig::new(names::LOOK_LEFTISH, 10.0, MotionKind::YawSensor),
        CustomActionConfig::new(names::LOOK_RIGHTISH, -10.0, MotionKind::YawSensor),
        CustomActionConfig::new(names::MOVE_BACKWARD, 0.25, MotionKind::TranslateBody),
    ]
}

// ---------------------------------------------------------------------------
// PoseLayout
// ---------------------------------------------------------------------------

/// On-disk pose record format. Fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoseLayout {
    /// One `<step>.txt` per frame holding the 4x4 extrinsic matrix.
    #[default]
    Extrinsic,
    /// A single `poses.csv` with position and forward direction per frame.
    DirectionCsv,
}

impl std::fmt::Display for PoseLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Extrinsic => f.write_str("extrinsic"),
            Self::DirectionCsv => f.write_str("direction_csv"),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Main recording-session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Root output directory; frames land in `<output_dir>/poses/`.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Pose record format (default: full extrinsic matrix per frame).
    #[serde(default)]
    pub pose_layout: PoseLayout,

    /// Maximum steps per episode (default: 500). `0` means no limit.
    #[serde(default = "default_max_episode_steps")]
    pub max_episode_steps: u32,

    /// Goal radius in metres for the success judgement (default: 0.2).
    #[serde(default = "default_success_distance")]
    pub success_distance: f32,

    /// Render resolution [width, height] (default: [256, 256]).
    #[serde(default = "default_render_resolution")]
    pub render_resolution: [u32; 2],

    /// Camera height above the agent body origin in metres.
    #[serde(default = "default_sensor_height")]
    pub sensor_height: f32,

    /// Optional navigation goal in world coordinates.
    #[serde(default)]
    pub goal: Option<[f32; 3]>,

    #[serde(default)]
    pub actions: ActionsConfig,

    /// Extra key bindings, applied over the defaults.
    #[serde(default)]
    pub bindings: Vec<BindingConfig>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            pose_layout: PoseLayout::default(),
            max_episode_steps: default_max_episode_steps(),
            success_distance: default_success_distance(),
            render_resolution: default_render_resolution(),
            sensor_height: default_sensor_height(),
            goal: None,
            actions: ActionsConfig::default(),
            bindings: Vec::new(),
        }
    }
}

impl SessionConfig {
    /// Validate configuration. Actuation amounts are deliberately not checked.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let [width, height] = self.render_resolution;
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "render_resolution".into(),
                message: format!("must be positive, got [{width}, {height}]"),
            });
        }
        let frame_bytes = FrameBuffer::byte_len(width, height, PixelFormat::Rgba8);
        if frame_bytes.and_then(|n| u32::try_from(n).ok()).is_none() {
            return Err(ConfigError::InvalidValue {
                field: "render_resolution".into(),
                message: format!("[{width}, {height}] frame exceeds {} bytes", u32::MAX),
            });
        }
        if !self.success_distance.is_finite() || self.success_distance < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "success_distance".into(),
                message: format!("must be finite and >= 0, got {}", self.success_distance),
            });
        }
        if let Some(custom) = self.actions.custom.iter().find(|c| c.name.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "actions.custom.name".into(),
                message: format!("empty action name (amount {})", custom.amount),
            });
        }
        Ok(())
    }

    /// Parse from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

// ---------------------------------------------------------------------------
// ActionsConfig
// ---------------------------------------------------------------------------

/// Actuation amounts for built-ins plus the custom action declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionsConfig {
    /// `move_forward` distance in metres.
    #[serde(default = "default_forward_step")]
    pub forward_step: f32,
    /// `turn_left`/`turn_right` angle in degrees.
    #[serde(default = "default_turn_angle")]
    pub turn_angle: f32,
    /// `look_up`/`look_down` angle in degrees.
    #[serde(default = "default_tilt_angle")]
    pub tilt_angle: f32,
    #[serde(default = "default_custom_actions")]
    pub custom: Vec<CustomActionConfig>,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            forward_step: default_forward_step(),
            turn_angle: default_turn_angle(),
            tilt_angle: default_tilt_angle(),
            custom: default_custom_actions(),
        }
    }
}

/// Motion primitive a configured custom action is wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionKind {
    /// Rotate the sensor mount about its local vertical axis.
    YawSensor,
    /// Rotate the sensor mount about its local lateral axis.
    PitchSensor,
    /// Translate the agent body along its local +Z (backward) axis.
    TranslateBody,
}

/// One `[[actions.custom]]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomActionConfig {
    pub name: String,
    pub amount: f32,
    pub motion: MotionKind,
}

impl CustomActionConfig {
    #[must_use]
    pub fn new(name: impl Into<String>, amount: f32, motion: MotionKind) -> Self {
        Self {
            name: name.into(),
            amount,
            motion,
        }
    }
}

// ---------------------------------------------------------------------------
// BindingConfig
// ---------------------------------------------------------------------------

/// One `[[bindings]]` table. `key` is a single character, an arrow name
/// (`up`, `down`, `left`, `right`) or `code:<n>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingConfig {
    pub key: String,
    pub action: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
