// CONTROLLER: Input, physics and update loop
pub mod input;
pub mod physics;
pub mod camera_controller;
pub mod frame_loop;

pub use input::{InputEvent, InputState, KeyBindings};
pub use physics::PhysicsWorld;
pub use camera_controller::CameraController;
pub use frame_loop::{FrameLoopContext, FrameMatrices};
