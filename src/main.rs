use std::sync::Arc;

use tracing::{error, info, warn};
use winit::{
    event::*,
    event_loop::EventLoop,
    window::Window,
};

use boxed_bodies::{
    logging, ui,
    model, view, controller,
};
use boxed_bodies::error::AppError;
use boxed_bodies::settings::Settings;

use controller::{input, FrameLoopContext, PhysicsWorld};
use model::{Scene, SceneBlueprint};
use view::{GpuContext, OverlayFrame, RenderState};

struct App {
    window: Arc<Window>,
    size: winit::dpi::PhysicalSize<u32>,
    gpu: GpuContext,
    render_state: RenderState,
    scene: Scene,
    frame: FrameLoopContext,

    // egui
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,
}

impl App {
    async fn new(window: Arc<Window>, settings: &Settings) -> Result<Self, AppError> {
        let size = window.inner_size();
        let gpu = GpuContext::new(window.clone(), size.width, size.height).await?;
        let render_state = RenderState::new(&gpu, settings.clear_color);

        let mut world = PhysicsWorld::new(settings.gravity);
        let blueprint = SceneBlueprint::demo(&mut world, settings.box_edge);
        let scene = blueprint.upload(&gpu.device, &render_state.shader);

        let mut frame = FrameLoopContext::new(settings, world);
        frame.camera.set_aspect(size.width, size.height);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );

        Ok(Self {
            window,
            size,
            gpu,
            render_state,
            scene,
            frame,
            egui_state,
            egui_ctx,
        })
    }

    /// Returns true when the event was consumed.
    fn input(&mut self, event: &WindowEvent) -> bool {
        let overlay_consumed = self.frame.input.show_overlay
            && self.egui_state.on_window_event(self.window.as_ref(), event).consumed;

        let Some(input_event) = input::from_window_event(event) else {
            return overlay_consumed;
        };
        // releases and cursor motion always reach the input state
        if overlay_consumed {
            self.frame.handle_overlay_input(&input_event);
        } else {
            self.frame.handle_input(&input_event);
        }
        true
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.gpu.resize(new_size.width, new_size.height);
            self.render_state.resize(&self.gpu.device, new_size.width, new_size.height);
            self.frame.camera.set_aspect(new_size.width, new_size.height);
        }
    }

    fn overlay(&mut self) -> Option<OverlayFrame> {
        if !self.frame.input.show_overlay {
            return None;
        }

        let raw_input = self.egui_state.take_egui_input(&self.window);
        let output = ui::build_ui(&self.egui_ctx, raw_input, &self.frame, &self.scene);
        self.egui_state.handle_platform_output(&self.window, output.platform_output);

        let primitives = self.egui_ctx.tessellate(output.shapes, output.pixels_per_point);
        Some(OverlayFrame {
            primitives,
            textures_delta: output.textures_delta,
            screen_descriptor: egui_wgpu::ScreenDescriptor {
                size_in_pixels: [self.gpu.config.width, self.gpu.config.height],
                pixels_per_point: output.pixels_per_point,
            },
        })
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.frame.begin_frame();
        let matrices = self.frame.update();
        let overlay = self.overlay();

        self.render_state.draw_frame(
            &self.gpu,
            &self.scene,
            &self.frame.world,
            matrices.view,
            matrices.projection,
            self.frame.input.wireframe_mode,
            overlay,
        )
    }
}

fn run() -> Result<(), AppError> {
    let settings = Settings::default();

    let event_loop = EventLoop::new().map_err(AppError::EventLoop)?;
    let window_attributes = Window::default_attributes()
        .with_title(settings.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(settings.width, settings.height));
    #[allow(deprecated)]
    let window = Arc::new(event_loop.create_window(window_attributes)?);

    let mut app = pollster::block_on(App::new(window, &settings))?;
    info!("entering main loop");

    #[allow(deprecated)]
    event_loop.run(move |event, elwt| {
        match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == app.window.id() => {
                if !app.input(event) {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(physical_size) => {
                            app.resize(*physical_size);
                        }
                        WindowEvent::RedrawRequested => {
                            // quit requests from the previous frame's input take effect here
                            if app.frame.should_exit() {
                                elwt.exit();
                                return;
                            }

                            match app.render() {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => app.resize(app.size),
                                Err(wgpu::SurfaceError::OutOfMemory) => {
                                    error!("GPU out of memory");
                                    elwt.exit();
                                }
                                Err(e) => warn!("{:?}", e),
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                app.window.request_redraw();
            }
            Event::LoopExiting => {
                info!(steps = app.frame.steps, "shutting down");
            }
            _ => {}
        }
    }).map_err(AppError::Run)
}

fn main() {
    logging::init();

    if let Err(err) = run() {
        error!("{err}");
        std::process::exit(err.exit_code());
    }
}
