//! Super Mario -- main loop and application entry point.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler`. All
//! simulation runs inside `RedrawRequested` with a **variable timestep**:
//!
//!   1. `begin_frame()` -- measure the wall-clock delta (capped on stalls)
//!   2. `Game::frame()` -- apply held input and advance the session by that delta
//!   3. Rebuild the sprite mesh from game state and upload it with the camera
//!   4. Draw sprites, composite the egui HUD, present
//!
//! Assets load once when the window comes up. Failures there are not fatal:
//! entities fall back to solid colors and the HUD goes quiet without a font.
//! Errors that do stop the game (window or GPU setup) are stored on the app
//! and turned into a failing exit code once the event loop returns.

mod assets;
mod coin;
mod collision;
mod config;
mod enemy;
mod game;
mod level;
mod player;
#[cfg(test)]
mod replay;
mod scene_draw;

use std::any::Any;
use std::process::ExitCode;
use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use config::GameConfig;
use game::{FrameInput, Game, GameState};
use scene_draw::SceneTextures;
use smp_core::input::{InputState, Key};
use smp_core::time::FrameClock;
use smp_hud::{DebugStats, HudFrame, HudOverlay};
use smp_platform::window::PlatformConfig;
use smp_render::{Camera2D, GpuContext, SpriteBatch};

/// Everything that needs a live window. Built in `ApplicationHandler::resumed`.
struct GameShell {
    window: Arc<Window>,
    gpu: GpuContext,
    camera: Camera2D,
    batch: SpriteBatch,
    hud: HudOverlay,
    textures: SceneTextures,
    input: InputState,
    clock: FrameClock,
    game: Game,
}

impl GameShell {
    fn new(window: Arc<Window>, mut config: GameConfig) -> Result<Self, String> {
        let gpu = GpuContext::new(window.clone())?;
        let (width, height) = gpu.size;
        let camera = Camera2D::new(width, height);
        let mut batch = SpriteBatch::new(&gpu, &camera);

        let loaded = assets::load_game_assets(&gpu, &mut batch);
        let frames = assets::coin_frame_count(
            loaded.coin_size,
            config.coin_size[0],
            config.coin_frame_count,
        );
        if frames != config.coin_frame_count {
            log::info!("Coin image is not a strip, animating {frames} frame(s)");
            config.coin_frame_count = frames;
        }

        let hud = HudOverlay::new(&gpu.device, gpu.surface_format, &window, loaded.font);
        let game = Game::new(config, width as f32, height as f32);

        Ok(Self {
            window,
            gpu,
            camera,
            batch,
            hud,
            textures: loaded.textures,
            input: InputState::new(),
            clock: FrameClock::new(),
            game,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.gpu.resize(width, height);
        self.camera.viewport = (width, height);
        self.game.resize_view(width as f32, height as f32);
        self.camera.position = self.game.camera_center();
        log::info!("Resized to {}x{}", width, height);
    }

    fn frame_input(&self) -> FrameInput {
        FrameInput {
            left: self.input.is_held(Key::Left),
            right: self.input.is_held(Key::Right),
            jump: self.input.is_held(Key::Space),
            restart: self.input.is_just_pressed(Key::R),
        }
    }

    fn redraw(&mut self) {
        if self.gpu.size.0 == 0 || self.gpu.size.1 == 0 {
            return;
        }

        let dt = self.clock.begin_frame();
        let input = self.frame_input();
        let before = self.game.state();
        self.game.frame(dt, &input);
        if self.game.state() != before {
            log::info!(
                "State: {} -> {}",
                before.label(),
                self.game.state().label()
            );
        }
        self.input.end_frame();

        self.camera.position = self.game.camera_center();
        let quads = scene_draw::build_scene_quads(&self.game, &self.textures);
        self.batch.prepare(&self.gpu, &self.camera, &quads);

        // Surface first: every egui texture delta must reach the renderer.
        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let hud_frame = HudFrame {
            score: self.game.score(),
            lives: self.game.lives(),
            game_over: self.game.state() == GameState::GameOver,
            debug: self.hud.debug_visible.then(|| DebugStats {
                quads: self.batch.quad_count() as u32,
                draw_calls: self.batch.draw_call_count() as u32,
                texture_binds: self.batch.texture_bind_count() as u32,
                state_label: self.game.state().label().to_string(),
                camera_x: self.camera.position.x,
                player_x: self.game.player.body.x,
                player_y: self.game.player.body.y,
                on_ground: self.game.player.on_ground,
                wall_contact: self.game.player.contacts.blocked_horizontally(),
                head_bump: self.game.player.contacts.blocked_up,
            }),
        };
        let (hud_primitives, hud_textures_delta) =
            self.hud.prepare(&self.window, &self.clock, &hud_frame);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.batch
            .render(&mut encoder, &view, scene_draw::SKY_COLOR);

        self.hud.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &hud_primitives,
            &hud_textures_delta,
            &screen_descriptor,
        );

        {
            let mut hud_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("HUD Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.hud
                .paint(&mut hud_pass, &hud_primitives, &screen_descriptor);
        }

        self.hud.cleanup(&hud_textures_delta);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

struct App {
    platform: PlatformConfig,
    config: GameConfig,
    shell: Option<GameShell>,
    fatal: Option<String>,
}

impl App {
    fn new(config: GameConfig) -> Self {
        Self {
            platform: PlatformConfig::default(),
            config,
            shell: None,
            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: String) {
        log::error!("{err}");
        self.fatal = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.shell.is_some() {
            return;
        }
        let shell = smp_platform::window::create_window(event_loop, &self.platform)
            .and_then(|window| GameShell::new(window, self.config.clone()));
        match shell {
            Ok(mut shell) => {
                shell.clock.reset();
                self.shell = Some(shell);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(shell) = &self.shell {
            shell.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(shell) = self.shell.as_mut() else {
            return;
        };

        shell.hud.handle_window_event(&shell.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                shell.resize(physical_size.width, physical_size.height);
            }

            WindowEvent::Focused(false) => {
                shell.input.release_all();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(key_code) = event.physical_key else {
                    return;
                };
                let Some(key) = map_key(key_code) else {
                    return;
                };
                match event.state {
                    ElementState::Pressed if !event.repeat => {
                        shell.input.key_down(key);
                        match key {
                            Key::Escape => {
                                log::info!("Escape pressed, exiting.");
                                event_loop.exit();
                            }
                            Key::F3 => shell.hud.toggle_debug(),
                            _ => {}
                        }
                    }
                    ElementState::Pressed => {}
                    ElementState::Released => shell.input.key_up(key),
                }
            }

            WindowEvent::RedrawRequested => shell.redraw(),

            _ => {}
        }
    }
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::Space => Some(Key::Space),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::F3 => Some(Key::F3),
        KeyCode::KeyR => Some(Key::R),
        _ => None,
    }
}

/// Text carried by a panic payload, for `panic!` with a literal or a format string.
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

/// A panic inside the frame loop is logged like any other fatal error and
/// exits with status 1.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown location".to_string());
        log::error!("Fatal error at {location}: {}", panic_message(info.payload()));
        std::process::exit(1);
    }));
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    install_panic_hook();

    log::info!("Super Mario starting...");

    let config = config::load_config_or_default(&assets::asset_path(assets::CONFIG_FILE));

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("Failed to create event loop: {err}");
            return ExitCode::FAILURE;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {err}");
        return ExitCode::FAILURE;
    }

    match app.fatal {
        Some(_) => ExitCode::FAILURE,
        None => ExitCode::SUCCESS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_key_covers_game_controls() {
        assert_eq!(map_key(KeyCode::ArrowLeft), Some(Key::Left));
        assert_eq!(map_key(KeyCode::ArrowRight), Some(Key::Right));
        assert_eq!(map_key(KeyCode::Space), Some(Key::Space));
        assert_eq!(map_key(KeyCode::KeyR), Some(Key::R));
        assert_eq!(map_key(KeyCode::F3), Some(Key::F3));
        assert_eq!(map_key(KeyCode::Escape), Some(Key::Escape));
        assert_eq!(map_key(KeyCode::KeyW), None);
    }

    #[test]
    fn panic_message_reads_literal_and_formatted_payloads() {
        let literal = std::panic::catch_unwind(|| panic!("surface lost")).unwrap_err();
        assert_eq!(panic_message(&*literal), "surface lost");

        let code = 7;
        let formatted = std::panic::catch_unwind(|| panic!("device error {code}")).unwrap_err();
        assert_eq!(panic_message(&*formatted), "device error 7");

        let other = std::panic::catch_unwind(|| std::panic::panic_any(42_u8)).unwrap_err();
        assert_eq!(panic_message(&*other), "unknown panic");
    }
}
