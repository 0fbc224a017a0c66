use std::time::Instant;

use glam::Mat4;
use tracing::{info, trace};

use crate::controller::input::{CameraAction, InputEvent, InputState};
use crate::controller::{CameraController, PhysicsWorld};
use crate::model::Camera;
use crate::settings::Settings;

/// View and projection for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMatrices {
    pub view: Mat4,
    pub projection: Mat4,
}

/// Main loop state: camera, input, physics and frame timing.
pub struct FrameLoopContext {
    pub camera: Camera,
    pub camera_controller: CameraController,
    pub input: InputState,
    pub world: PhysicsWorld,
    /// Simulated seconds per frame, never adjusted to the measured frame time.
    pub timestep: f32,
    pub steps: u64,
    pub fps: f32,
    last_frame: Instant,
    frame_count: u32,
    fps_timer: f32,
}

impl FrameLoopContext {
    pub fn new(settings: &Settings, world: PhysicsWorld) -> Self {
        let mut input = InputState::new();
        input.wireframe_mode = settings.wireframe;

        Self {
            camera: Camera::new(settings.width, settings.height),
            camera_controller: CameraController::new(),
            input,
            world,
            timestep: settings.timestep,
            steps: 0,
            fps: 0.0,
            last_frame: Instant::now(),
            frame_count: 0,
            fps_timer: 0.0,
        }
    }

    /// Feed one input event; camera motion is applied immediately.
    pub fn handle_input(&mut self, event: &InputEvent) {
        match self.update_input_state(event) {
            Some(CameraAction::Orbit { dx, dy }) => {
                self.camera_controller.move_camera(&mut self.camera, dx, dy)
            }
            Some(CameraAction::Pan { dx, dy }) => {
                self.camera_controller.pan_camera(&mut self.camera, dx, dy)
            }
            Some(CameraAction::Zoom(dy)) => {
                self.camera_controller.scroll_input(&mut self.camera, dy);
                trace!(fov = self.camera.fov, "zoom");
            }
            None => {}
        }
    }

    /// Feed an event the debug overlay already acted on. Presses and scrolls
    /// stop here. Releases and cursor motion still reach the input state so
    /// the button flags and last cursor stay true, but never move the camera.
    pub fn handle_overlay_input(&mut self, event: &InputEvent) {
        if !event.is_press() {
            self.update_input_state(event);
        }
    }

    fn update_input_state(&mut self, event: &InputEvent) -> Option<CameraAction> {
        let was_exiting = self.input.should_exit;
        let action = self.input.process_event(event);
        if self.input.should_exit && !was_exiting {
            info!("quit requested, closing on the next frame");
        }
        action
    }

    pub fn should_exit(&self) -> bool {
        self.input.should_exit
    }

    /// Measure the time since the previous frame. Only feeds the FPS counter.
    pub fn begin_frame(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.record_frame_time(dt);
        dt
    }

    fn record_frame_time(&mut self, dt: f32) {
        self.frame_count += 1;
        self.fps_timer += dt;
        if self.fps_timer >= 1.0 {
            self.fps = self.frame_count as f32 / self.fps_timer;
            self.frame_count = 0;
            self.fps_timer = 0.0;
        }
    }

    /// Compute this frame's matrices and advance the simulation by one fixed step.
    pub fn update(&mut self) -> FrameMatrices {
        let matrices = FrameMatrices {
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(),
        };

        self.world.step_world(self.timestep);
        self.steps += 1;

        matrices
    }
}
