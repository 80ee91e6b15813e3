//! Reference kinematic simulator.
//!
//! [`KinematicSim`] moves an agent body and a head-mounted sensor with pure
//! rigid-body kinematics (no collision, no physics) and renders a synthetic
//! frame: sky above the camera horizon, a striped floor below it whose
//! stripes follow the camera azimuth.

use nalgebra::Vector3;
use tracing::debug;
use waymark_actions::builtin_actuation;
use waymark_core::action::{Action, ActuationMap, names};
use waymark_core::config::SessionConfig;
use waymark_core::error::SimError;
use waymark_core::traits::Simulator;
use waymark_core::types::{AgentState, FrameBuffer, Observation, PixelFormat, SceneNode};

/// Horizontal and vertical field of view of the synthetic camera.
const FIELD_OF_VIEW: f32 = std::f32::consts::FRAC_PI_2;

/// Floor stripe width in degrees of azimuth.
const STRIPE_DEGREES: f32 = 30.0;

// ---------------------------------------------------------------------------
// KinematicSim
// ---------------------------------------------------------------------------

/// Kinematic body + sensor simulator.
#[derive(Debug)]
pub struct KinematicSim {
    body: SceneNode,
    sensor: SceneNode,
    sensor_height: f32,
    actuation: ActuationMap,
    resolution: [u32; 2],
    max_steps: u32,
    steps: u32,
    stop_called: bool,
    goal: Option<Vector3<f32>>,
}

impl KinematicSim {
    /// Agent at the origin facing -Z, sensor `sensor_height` above the body.
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            body: SceneNode::identity(),
            sensor: SceneNode::from_translation(Vector3::new(0.0, config.sensor_height, 0.0)),
            sensor_height: config.sensor_height,
            actuation: builtin_actuation(&config.actions),
            resolution: config.render_resolution,
            max_steps: config.max_episode_steps,
            steps: 0,
            stop_called: false,
            goal: config.goal.map(Vector3::from),
        }
    }

    /// Steps taken since the last reset.
    pub const fn steps(&self) -> u32 {
        self.steps
    }

    fn apply(&mut self, action: &Action) -> Result<(), SimError> {
        let spec = self
            .actuation
            .get(action.name())
            .ok_or_else(|| SimError::InvalidAction {
                name: action.name().to_string(),
                reason: "no actuation spec".into(),
            })?;
        let amount = spec.amount;

        if let Some(motion) = &spec.motion {
            let node = if spec.body_action {
                &mut self.body
            } else {
                &mut self.sensor
            };
            motion(node, amount);
            return Ok(());
        }

        match action.name() {
            names::STOP => self.stop_called = true,
            names::MOVE_FORWARD => self.body.translate_local(&Vector3::new(0.0, 0.0, -amount)),
            names::TURN_LEFT => self.body.rotate_local(amount.to_radians(), &Vector3::y_axis()),
            names::TURN_RIGHT => self.body.rotate_local(-amount.to_radians(), &Vector3::y_axis()),
            names::LOOK_UP => self.sensor.rotate_local(amount.to_radians(), &Vector3::x_axis()),
            names::LOOK_DOWN => self.sensor.rotate_local(-amount.to_radians(), &Vector3::x_axis()),
            other => {
                return Err(SimError::InvalidAction {
                    name: other.to_string(),
                    reason: "no motion primitive".into(),
                });
            }
        }
        Ok(())
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn render(&self) -> Observation {
        let [width, height] = self.resolution;
        let mut image = FrameBuffer::new(width, height, PixelFormat::Rgb8);

        let state = self.agent_state();
        let forward = state.camera_orientation() * Vector3::new(0.0, 0.0, -1.0);
        let pitch = forward.y.clamp(-1.0, 1.0).asin();
        let yaw = (-forward.x).atan2(-forward.z);

        let row_bytes = width as usize * 3;
        for (y, row) in image.data_mut().chunks_exact_mut(row_bytes).enumerate() {
            let elevation = pitch + (0.5 - (y as f32 + 0.5) / height as f32) * FIELD_OF_VIEW;
            for (x, pixel) in row.chunks_exact_mut(3).enumerate() {
                let rgb = if elevation > 0.0 {
                    let shade = (elevation / FIELD_OF_VIEW).min(1.0);
                    [
                        (135.0 - 60.0 * shade) as u8,
                        (206.0 - 60.0 * shade) as u8,
                        235,
                    ]
                } else {
                    let azimuth = yaw - ((x as f32 + 0.5) / width as f32 - 0.5) * FIELD_OF_VIEW;
                    let stripe = (azimuth.to_degrees() / STRIPE_DEGREES).floor() as i32;
                    if stripe.rem_euclid(2) == 0 {
                        [120, 100, 80]
                    } else {
                        [90, 75, 60]
                    }
                };
                pixel.copy_from_slice(&rgb);
            }
        }
        Observation::new(image)
    }
}

impl Simulator for KinematicSim {
    fn reset(&mut self) -> Result<Observation, SimError> {
        self.body = SceneNode::identity();
        self.sensor = SceneNode::from_translation(Vector3::new(0.0, self.sensor_height, 0.0));
        self.steps = 0;
        self.stop_called = false;
        Ok(self.render())
    }

    fn step(&mut self, action: &Action) -> Result<Observation, SimError> {
        self.apply(action)?;
        self.steps += 1;
        debug!(
            action = action.name(),
            step = self.steps,
            x = self.body.translation.x,
            z = self.body.translation.z,
            "kinematic step"
        );
        Ok(self.render())
    }

    fn agent_state(&self) -> AgentState {
        AgentState::from_nodes(&self.body, &self.sensor)
    }

    fn episode_over(&self) -> bool {
        self.stop_called || (self.max_steps > 0 && self.steps >= self.max_steps)
    }

    fn goal_distance(&self) -> Option<f32> {
        self.goal.map(|goal| (goal - self.body.translation).norm())
    }

    fn configure_actions(&mut self, actuation: &ActuationMap) {
        self.actuation.clone_from(actuation);
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "KinematicSim"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use waymark_actions::{ActionSpaceExtender, ExtendedActionSpace};
    use waymark_core::action::{ActionId, ActionKind};

    use super::*;

    const EPS: f32 = 1e-4;

    fn setup(config: &SessionConfig) -> (KinematicSim, ExtendedActionSpace) {
        let space = ActionSpaceExtender::from_config(&config.actions).build().unwrap();
        let mut sim = KinematicSim::new(config);
        sim.configure_actions(&space.actuation);
        sim.reset().unwrap();
        (sim, space)
    }

    fn step(sim: &mut KinematicSim, space: &ExtendedActionSpace, name: &str) {
        let action = space.catalog.resolve(name).unwrap();
        sim.step(action).unwrap();
    }

    fn camera_forward(sim: &KinematicSim) -> Vector3<f32> {
        sim.agent_state().camera_orientation() * Vector3::new(0.0, 0.0, -1.0)
    }

    #[test]
    fn reset_places_agent_at_origin() {
        let (sim, _) = setup(&SessionConfig::default());
        let state = sim.agent_state();
        assert!(state.position.norm() < EPS);
        assert!((state.camera_position() - Vector3::new(0.0, 1.5, 0.0)).norm() < EPS);
        assert!((camera_forward(&sim) - Vector3::new(0.0, 0.0, -1.0)).norm() < EPS);
    }

    #[test]
    fn move_forward_goes_along_minus_z() {
        let (mut sim, space) = setup(&SessionConfig::default());
        step(&mut sim, &space, names::MOVE_FORWARD);
        step(&mut sim, &space, names::MOVE_FORWARD);
        assert!((sim.agent_state().position - Vector3::new(0.0, 0.0, -0.5)).norm() < EPS);
        assert_eq!(sim.steps(), 2);
    }

    #[test]
    fn turn_left_rotates_body_counter_clockwise() {
        let mut config = SessionConfig::default();
        config.actions.turn_angle = 90.0;
        let (mut sim, space) = setup(&config);
        step(&mut sim, &space, names::TURN_LEFT);
        assert!((camera_forward(&sim) - Vector3::new(-1.0, 0.0, 0.0)).norm() < EPS);
        step(&mut sim, &space, names::TURN_RIGHT);
        step(&mut sim, &space, names::TURN_RIGHT);
        assert!((camera_forward(&sim) - Vector3::new(1.0, 0.0, 0.0)).norm() < EPS);
    }

    #[test]
    fn look_actions_move_only_the_sensor() {
        let (mut sim, space) = setup(&SessionConfig::default());
        step(&mut sim, &space, names::LOOK_UP);
        step(&mut sim, &space, names::LOOK_LEFTISH);
        let state = sim.agent_state();
        assert!((state.orientation.angle()).abs() < EPS);
        assert!(state.sensor_orientation.angle() > 0.1);
        assert!(camera_forward(&sim).y > 0.0);
    }

    #[test]
    fn move_backward_moves_body() {
        let (mut sim, space) = setup(&SessionConfig::default());
        step(&mut sim, &space, names::MOVE_BACKWARD);
        assert!((sim.agent_state().position - Vector3::new(0.0, 0.0, 0.25)).norm() < EPS);
    }

    #[test]
    fn stop_ends_episode() {
        let (mut sim, space) = setup(&SessionConfig::default());
        assert!(!sim.episode_over());
        step(&mut sim, &space, names::STOP);
        assert!(sim.episode_over());
        sim.reset().unwrap();
        assert!(!sim.episode_over());
    }

    #[test]
    fn step_budget_ends_episode() {
        let config = SessionConfig {
            max_episode_steps: 2,
            ..SessionConfig::default()
        };
        let (mut sim, space) = setup(&config);
        step(&mut sim, &space, names::TURN_LEFT);
        assert!(!sim.episode_over());
        step(&mut sim, &space, names::TURN_LEFT);
        assert!(sim.episode_over());
    }

    #[test]
    fn unlimited_steps_when_zero() {
        let config = SessionConfig {
            max_episode_steps: 0,
            ..SessionConfig::default()
        };
        let (mut sim, space) = setup(&config);
        for _ in 0..50 {
            step(&mut sim, &space, names::TURN_LEFT);
        }
        assert!(!sim.episode_over());
    }

    #[test]
    fn unknown_action_is_rejected() {
        let (mut sim, _) = setup(&SessionConfig::default());
        let bogus = Action::new("fly", ActionId(99), ActionKind::Builtin);
        let err = sim.step(&bogus).unwrap_err();
        assert!(matches!(err, SimError::InvalidAction { ref name, .. } if name == "fly"));
    }

    #[test]
    fn goal_distance_tracks_body() {
        let config = SessionConfig {
            goal: Some([0.0, 0.0, -0.5]),
            ..SessionConfig::default()
        };
        let (mut sim, space) = setup(&config);
        assert!((sim.goal_distance().unwrap() - 0.5).abs() < EPS);
        step(&mut sim, &space, names::MOVE_FORWARD);
        assert!((sim.goal_distance().unwrap() - 0.25).abs() < EPS);
    }

    #[test]
    fn no_goal_means_no_distance() {
        let (sim, _) = setup(&SessionConfig::default());
        assert!(sim.goal_distance().is_none());
    }

    #[test]
    fn render_matches_resolution_and_reacts_to_pitch() {
        let config = SessionConfig {
            render_resolution: [16, 8],
            ..SessionConfig::default()
        };
        let (mut sim, space) = setup(&config);
        let level = sim.render();
        assert_eq!(level.image.width(), 16);
        assert_eq!(level.image.height(), 8);

        for _ in 0..4 {
            step(&mut sim, &space, names::LOOK_UP);
        }
        let raised = sim.render();
        assert_ne!(level.image, raised.image);
        // Looking up puts more sky (blue = 235) into the bottom row.
        let bottom = raised.image.pixel(0, 7);
        assert_eq!(bottom[2], 235);
    }
}
