// MODEL: bodies, camera and scene description
pub mod body;
pub mod camera;
pub mod scene;

pub use body::{BodyDesc, BodyHandle, BodyShape, Pose};
pub use camera::Camera;
pub use scene::{Scene, SceneBlueprint, SceneObject, TransformSource};
