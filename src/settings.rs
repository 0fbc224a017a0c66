/// Fixed demo parameters. Nothing here is read from disk or the command line;
/// logging is the only thing configured from the environment (see `logging`).
#[derive(Debug, Clone)]
pub struct Settings {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Physics step per frame, independent of the measured frame time.
    pub timestep: f32,
    pub gravity: f32,
    pub box_edge: f32,
    pub clear_color: wgpu::Color,
    pub wireframe: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            title: "Boxed Bodies".to_string(),
            timestep: 1.0 / 60.0,
            gravity: -9.81,
            box_edge: 10.0,
            clear_color: wgpu::Color::BLACK,
            wireframe: true,
        }
    }
}
