//! Asset viewer: shows the background centered in the window with the player
//! sprite in the top-left corner. Both textures are required; the viewer
//! exits with a failure code if either one cannot be loaded.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use smp_core::geometry::Rect;
use smp_platform::window::PlatformConfig;
use smp_render::{Camera2D, GpuContext, Quad, SpriteBatch, Texture, FULL_UV};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

const BACKGROUND_PATH: &str = "assets/mariobackground.png";
const PLAYER_PATH: &str = "assets/mario.png";
const PLAYER_POSITION: (f32, f32) = (10.0, 10.0);

/// Background centered on the window, player at its fixed corner position.
fn viewer_quads(
    window_size: (u32, u32),
    background_size: (u32, u32),
    player_size: (u32, u32),
) -> [Quad<'static>; 2] {
    let (ww, wh) = (window_size.0 as f32, window_size.1 as f32);
    let (bw, bh) = (background_size.0 as f32, background_size.1 as f32);
    let background = Rect::new((ww - bw) * 0.5, (wh - bh) * 0.5, bw, bh);
    let player = Rect::new(
        PLAYER_POSITION.0,
        PLAYER_POSITION.1,
        player_size.0 as f32,
        player_size.1 as f32,
    );
    [
        Quad::textured("background", background, FULL_UV),
        Quad::textured("player", player, FULL_UV),
    ]
}

fn load_required(
    gpu: &GpuContext,
    batch: &mut SpriteBatch,
    key: &str,
    path: &str,
) -> Result<(u32, u32), String> {
    let texture = Texture::from_path(&gpu.device, &gpu.queue, Path::new(path))?;
    let size = texture.size;
    batch.insert_texture(gpu, key, texture);
    log::info!("Loaded texture '{}' ({}x{})", path, size.0, size.1);
    Ok(size)
}

struct ViewerState {
    window: Arc<Window>,
    gpu: GpuContext,
    camera: Camera2D,
    batch: SpriteBatch,
    background_size: (u32, u32),
    player_size: (u32, u32),
}

impl ViewerState {
    fn new(window: Arc<Window>) -> Result<Self, String> {
        let gpu = GpuContext::new(window.clone())?;
        let camera = Camera2D::new(gpu.size.0, gpu.size.1);
        let mut batch = SpriteBatch::new(&gpu, &camera);
        let background_size = load_required(&gpu, &mut batch, "background", BACKGROUND_PATH)?;
        let player_size = load_required(&gpu, &mut batch, "player", PLAYER_PATH)?;
        Ok(Self {
            window,
            gpu,
            camera,
            batch,
            background_size,
            player_size,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.gpu.resize(width, height);
        // Screen-space view: the camera always looks at the window rectangle.
        self.camera = Camera2D::new(width, height);
        log::info!("Resized to {}x{}", width, height);
    }

    fn redraw(&mut self) {
        if self.gpu.size.0 == 0 || self.gpu.size.1 == 0 {
            return;
        }
        let quads = viewer_quads(self.gpu.size, self.background_size, self.player_size);
        self.batch.prepare(&self.gpu, &self.camera, &quads);

        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Viewer Encoder"),
            });
        self.batch.render(&mut encoder, &view, wgpu::Color::BLACK);
        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

struct ViewerApp {
    config: PlatformConfig,
    state: Option<ViewerState>,
    fatal: Option<String>,
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let state = smp_platform::window::create_window(event_loop, &self.config)
            .and_then(ViewerState::new);
        match state {
            Ok(state) => self.state = Some(state),
            Err(err) => {
                log::error!("{err}");
                self.fatal = Some(err);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => state.redraw(),
            _ => {}
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("Failed to create event loop: {err}");
            return ExitCode::FAILURE;
        }
    };
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = ViewerApp {
        config: PlatformConfig {
            title: "Super mario".to_string(),
            width: 1080,
            height: 600,
            resizable: true,
        },
        state: None,
        fatal: None,
    };
    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {err}");
        return ExitCode::FAILURE;
    }

    if app.fatal.is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_is_centered_in_window() {
        let [background, _] = viewer_quads((1080, 600), (800, 400), (40, 60));
        assert_eq!(background.rect, Rect::new(140.0, 100.0, 800.0, 400.0));
        assert_eq!(background.rect.center().x, 540.0);
    }

    #[test]
    fn background_recenters_on_resize() {
        let [small, _] = viewer_quads((800, 600), (1000, 600), (40, 60));
        assert_eq!(small.rect.center().x, 400.0);
        assert_eq!(small.rect.x, -100.0);

        let [square, _] = viewer_quads((900, 900), (800, 400), (40, 60));
        assert_eq!(square.rect.center(), glam::Vec2::new(450.0, 450.0));
    }

    #[test]
    fn player_sits_at_corner_with_native_size() {
        let [_, player] = viewer_quads((1080, 600), (800, 400), (64, 96));
        assert_eq!(player.rect, Rect::new(10.0, 10.0, 64.0, 96.0));
        assert_eq!(player.texture_key, "player");
    }
}
