//! Session wiring from [`SessionConfig`].

use tracing::info;
use waymark_actions::{ActionCatalog, ActionSpaceExtender};
use waymark_core::config::SessionConfig;
use waymark_core::error::{ConfigError, SessionError};
use waymark_core::traits::{FrameDisplay, InputSource, Simulator};
use waymark_record::SessionRecorder;
use waymark_teleop::{BindingTable, InputActionMapper};

use crate::control::ControlLoop;
use crate::kinematic::KinematicSim;

/// Default bindings for actions `catalog` declares, then the `[[bindings]]`
/// overrides from `config`.
///
/// Overrides are kept even when they name an unknown action, so the mapper
/// rejects them.
///
/// # Errors
///
/// [`ConfigError::InvalidKey`] if an override key does not parse.
pub fn session_bindings(
    config: &SessionConfig,
    catalog: &ActionCatalog,
) -> Result<BindingTable, ConfigError> {
    BindingTable::defaults()
        .retain(|action| catalog.contains(action))
        .with_config(&config.bindings)
}

/// Build a control loop around `simulator` from `config`.
///
/// Extends and freezes the action space, installs the merged actuation
/// specs on the simulator, resolves key bindings and opens the recorder.
///
/// # Errors
///
/// Invalid config, duplicate custom actions, bindings naming unknown
/// actions or keys that do not parse, and recorder I/O failures. All abort
/// the session before the first step.
pub fn build_session<S, I, D>(
    config: &SessionConfig,
    mut simulator: S,
    input: I,
    display: D,
) -> Result<ControlLoop<S, I, D>, SessionError>
where
    S: Simulator,
    I: InputSource,
    D: FrameDisplay,
{
    config.validate()?;

    let space = ActionSpaceExtender::from_config(&config.actions).build()?;
    simulator.configure_actions(&space.actuation);

    let bindings = session_bindings(config, &space.catalog)?;
    let mapper = InputActionMapper::new(&space.catalog, &bindings)?;
    let recorder = SessionRecorder::open(&config.output_dir, config.pose_layout)?;

    info!(
        actions = space.catalog.len(),
        bindings = bindings.len(),
        layout = %config.pose_layout,
        output = %recorder.poses_dir().display(),
        "session ready"
    );
    Ok(ControlLoop::new(simulator, input, display, mapper, recorder)
        .with_success_distance(config.success_distance))
}

/// [`build_session`] with the reference [`KinematicSim`].
///
/// # Errors
///
/// As for [`build_session`].
pub fn kinematic_session<I, D>(
    config: &SessionConfig,
    input: I,
    display: D,
) -> Result<ControlLoop<KinematicSim, I, D>, SessionError>
where
    I: InputSource,
    D: FrameDisplay,
{
    build_session(config, KinematicSim::new(config), input, display)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use waymark_core::action::names;
    use waymark_core::config::{BindingConfig, CustomActionConfig, MotionKind};
    use waymark_core::error::CatalogError;
    use waymark_core::traits::NullDisplay;
    use waymark_core::types::InputCode;
    use waymark_teleop::ScriptedInput;
    use waymark_test_utils::MockSimulator;

    use super::*;

    fn config_in(dir: &std::path::Path) -> SessionConfig {
        SessionConfig {
            output_dir: dir.to_path_buf(),
            ..SessionConfig::default()
        }
    }

    #[test]
    fn simulator_receives_merged_actuation() {
        let tmp = tempfile::tempdir().unwrap();
        let control = build_session(
            &config_in(tmp.path()),
            MockSimulator::new(),
            ScriptedInput::default(),
            NullDisplay,
        )
        .unwrap();
        let configured = control.simulator().configured();
        assert_eq!(configured.len(), 9);
        assert!(configured.iter().any(|n| n == names::LOOK_LEFTISH));
    }

    #[test]
    fn duplicate_custom_action_aborts() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = config_in(tmp.path());
        config
            .actions
            .custom
            .push(CustomActionConfig::new(names::TURN_LEFT, 5.0, MotionKind::YawSensor));
        let err = kinematic_session(&config, ScriptedInput::default(), NullDisplay).unwrap_err();
        assert!(matches!(err, SessionError::Catalog(CatalogError::DuplicateAction(_))));
    }

    #[test]
    fn binding_to_unknown_action_aborts() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = config_in(tmp.path());
        config.bindings.push(BindingConfig {
            key: "u".into(),
            action: "move_up".into(),
        });
        let err = kinematic_session(&config, ScriptedInput::default(), NullDisplay).unwrap_err();
        assert!(matches!(err, SessionError::Catalog(CatalogError::UnknownAction(_))));
    }

    #[test]
    fn bad_key_aborts() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = config_in(tmp.path());
        config.bindings.push(BindingConfig {
            key: "page-up".into(),
            action: names::LOOK_UP.into(),
        });
        let err = kinematic_session(&config, ScriptedInput::default(), NullDisplay).unwrap_err();
        assert!(matches!(err, SessionError::Config(ConfigError::InvalidKey(_))));
    }

    #[test]
    fn invalid_config_aborts_before_touching_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = config_in(&tmp.path().join("never"));
        config.render_resolution = [0, 0];
        let err = kinematic_session(&config, ScriptedInput::default(), NullDisplay).unwrap_err();
        assert!(matches!(err, SessionError::Config(_)));
        assert!(!tmp.path().join("never").exists());
    }

    #[test]
    fn session_bindings_prune_defaults_but_keep_overrides() {
        let mut config = SessionConfig::from_toml_str(DOCUMENTED_CONFIG).unwrap();
        let space = ActionSpaceExtender::from_config(&config.actions).build().unwrap();
        let bindings = session_bindings(&config, &space.catalog).unwrap();
        assert_eq!(bindings.get(InputCode::LEFT), Some(names::LOOK_LEFTISH));
        assert_eq!(bindings.get(InputCode::RIGHT), None);
        assert_eq!(bindings.get(InputCode::from_char('q')), Some(names::LOOK_LEFTISH));

        config.bindings.push(BindingConfig {
            key: "z".into(),
            action: names::LOOK_RIGHTISH.into(),
        });
        let bindings = session_bindings(&config, &space.catalog).unwrap();
        assert_eq!(bindings.get(InputCode::from_char('z')), Some(names::LOOK_RIGHTISH));
    }

    #[test]
    fn oversized_resolution_aborts_before_rendering() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = config_in(tmp.path());
        config.render_resolution = [40_000, 40_000];
        let err = kinematic_session(&config, ScriptedInput::parse("wf"), NullDisplay).unwrap_err();
        assert!(matches!(err, SessionError::Config(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn config_binding_drives_custom_action() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = config_in(tmp.path());
        config.bindings.push(BindingConfig {
            key: "q".into(),
            action: names::LOOK_LEFTISH.into(),
        });
        let mut control =
            build_session(&config, MockSimulator::new(), ScriptedInput::parse("qf"), NullDisplay)
                .unwrap();
        control.run().unwrap();
        assert_eq!(control.simulator().stepped(), [names::LOOK_LEFTISH, names::STOP]);
    }

    const DOCUMENTED_CONFIG: &str = r#"
output_dir = "capture"
pose_layout = "extrinsic"
max_episode_steps = 500
success_distance = 0.2
render_resolution = [256, 256]
goal = [0.0, 0.0, -5.0]

[actions]
forward_step = 0.25
turn_angle = 10.0
tilt_angle = 30.0

[[actions.custom]]
name = "look_leftish"
amount = 10.0
motion = "yaw_sensor"

[[bindings]]
key = "q"
action = "look_leftish"
"#;

    #[test]
    fn partial_custom_list_keeps_resolvable_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = SessionConfig::from_toml_str(DOCUMENTED_CONFIG).unwrap();
        config.output_dir = tmp.path().to_path_buf();

        let mut control =
            kinematic_session(&config, ScriptedInput::parse("qf"), NullDisplay).unwrap();
        let summary = control.run().unwrap();
        assert_eq!(summary.steps, 2);
        assert_eq!(summary.last_action.as_deref(), Some(names::STOP));
        assert!(control.mapper().map(InputCode::LEFT).is_recognized());
        assert!(!control.mapper().map(InputCode::RIGHT).is_recognized());
        assert!(!control.mapper().map(InputCode::from_char('s')).is_recognized());
    }
}
