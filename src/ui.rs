use egui::Context;

use crate::controller::FrameLoopContext;
use crate::model::{BodyShape, Scene};

/// Build the debug overlay and return egui output
pub fn build_ui(egui_ctx: &Context, raw_input: egui::RawInput, frame: &FrameLoopContext, scene: &Scene) -> egui::FullOutput {
    egui_ctx.run(raw_input, |ctx| {
        draw_debug_window(ctx, frame, scene);
    })
}

fn draw_debug_window(ctx: &Context, frame: &FrameLoopContext, scene: &Scene) {
    let cam = &frame.camera;

    egui::Window::new("Debug")
        .default_pos([8.0, 8.0])
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(format!("FPS: {:.0}", frame.fps)).small());
            ui.label(egui::RichText::new(format!("Steps: {} ({:.1} s simulated)", frame.steps, frame.steps as f32 * frame.timestep)).small());
            ui.label(egui::RichText::new(format!("FOV: {:.1}", cam.fov)).small());
            ui.label(egui::RichText::new(format!("Yaw: {:.1} Pitch: {:.1}", cam.yaw.to_degrees(), cam.pitch.to_degrees())).small());
            ui.label(egui::RichText::new(format!("Target: {:.1}, {:.1}, {:.1}", cam.target.x, cam.target.y, cam.target.z)).small());
            ui.separator();

            for (i, object) in scene.moving.iter().enumerate() {
                let body = object.source.body();
                let kind = match body.shape {
                    BodyShape::Sphere { .. } => "sphere",
                    BodyShape::Cube { .. } => "cube",
                    BodyShape::Plane { .. } => "plane",
                };
                if let Some(pose) = frame.world.pose(body) {
                    let p = pose.position;
                    ui.label(egui::RichText::new(format!("{i} {kind}: {:.2}, {:.2}, {:.2}", p.x, p.y, p.z)).small());
                }
            }
            ui.separator();

            ui.label(egui::RichText::new("Controls:").small());
            ui.label(egui::RichText::new("Middle drag - Orbit").small());
            ui.label(egui::RichText::new("Shift + middle drag - Pan").small());
            ui.label(egui::RichText::new("Wheel - Zoom").small());
            ui.label(egui::RichText::new("G - Wireframe").small());
            ui.label(egui::RichText::new("F1 - This window").small());
            ui.label(egui::RichText::new("Q / Esc - Quit").small());
        });
}
