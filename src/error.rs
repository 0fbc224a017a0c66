use thiserror::Error;

/// Conventional failure status, as returned when the window manager cannot start.
pub const EXIT_FAILURE: i32 = 1;
/// Status for failures after the window manager is up.
pub const EXIT_SETUP_FAILED: i32 = -1;

/// Startup failures. Every one of them is fatal.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to start the window manager: {0}")]
    EventLoop(#[source] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("surface reports no supported {0}")]
    IncompatibleSurface(&'static str),

    #[error("failed to open GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("event loop terminated abnormally: {0}")]
    Run(#[source] winit::error::EventLoopError),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::EventLoop(_) | AppError::Run(_) => EXIT_FAILURE,
            AppError::Window(_)
            | AppError::Surface(_)
            | AppError::IncompatibleSurface(_)
            | AppError::Adapter(_)
            | AppError::Device(_) => {
                EXIT_SETUP_FAILED
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_loop_failures_use_conventional_status() {
        let err = AppError::EventLoop(winit::error::EventLoopError::ExitFailure(3));
        assert_eq!(err.exit_code(), EXIT_FAILURE);
        let err = AppError::Run(winit::error::EventLoopError::ExitFailure(3));
        assert_eq!(err.exit_code(), EXIT_FAILURE);
    }
}
