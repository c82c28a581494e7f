//! Screen-space HUD rendered via egui on top of the scrolling world.
//!
//! egui draws in window points, so the score line and game-over banner stay
//! put while the sprite camera scrolls, and the banner re-centers itself on
//! resize through its anchor.
//!
//! Integration follows the usual egui-wgpu split:
//!
//!   1. `prepare()` -- run egui UI logic, produce tessellated primitives
//!   2. `upload()`  -- upload textures and update GPU buffers (borrows encoder mutably)
//!   3. `paint()`   -- render into a render pass created with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references
//!
//! Text needs the game font. When it failed to load, the score line and
//! banner are suppressed entirely; the F3 debug panel still works because it
//! uses egui's built-in font.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use smp_core::time::FrameClock;
use winit::window::Window;

pub const GAME_OVER_TEXT: &str = "GAME OVER!\nPress R to Restart";

const HUD_FONT: &str = "hud";
const SCORE_TEXT_SIZE: f32 = 24.0;
const GAME_OVER_TEXT_SIZE: f32 = 48.0;

pub fn score_line(score: u32, lives: u32) -> String {
    format!("Score: {score}   Lives: {lives}")
}

/// What the HUD shows this frame.
#[derive(Debug, Clone, Default)]
pub struct HudFrame {
    pub score: u32,
    pub lives: u32,
    pub game_over: bool,
    pub debug: Option<DebugStats>,
}

#[derive(Debug, Clone, Default)]
pub struct DebugStats {
    pub quads: u32,
    pub draw_calls: u32,
    pub texture_binds: u32,
    pub state_label: String,
    pub camera_x: f32,
    pub player_x: f32,
    pub player_y: f32,
    pub on_ground: bool,
    pub wall_contact: bool,
    pub head_bump: bool,
}

/// Read a TrueType/OpenType font and check its signature so a bad file is
/// rejected here instead of inside egui's font loader.
pub fn load_font(path: &Path) -> Result<Vec<u8>, String> {
    let bytes =
        fs::read(path).map_err(|e| format!("Failed to read font {}: {e}", path.display()))?;
    let signature = bytes.get(..4).unwrap_or_default();
    let known: [&[u8]; 4] = [&[0x00, 0x01, 0x00, 0x00], b"true", b"OTTO", b"ttcf"];
    if !known.contains(&signature) {
        return Err(format!(
            "Font {} is not a TrueType/OpenType file",
            path.display()
        ));
    }
    Ok(bytes)
}

pub struct HudOverlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub debug_visible: bool,
    font_loaded: bool,
}

impl HudOverlay {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
        font: Option<Vec<u8>>,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let font_loaded = font.is_some();
        if let Some(bytes) = font {
            let mut fonts = egui::FontDefinitions::default();
            fonts.font_data.insert(
                HUD_FONT.to_owned(),
                Arc::new(egui::FontData::from_owned(bytes)),
            );
            fonts.families.insert(
                egui::FontFamily::Name(HUD_FONT.into()),
                vec![HUD_FONT.to_owned()],
            );
            egui_ctx.set_fonts(fonts);
        }

        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            debug_visible: false,
            font_loaded,
        }
    }

    pub fn handle_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) {
        // The HUD never takes focus, so the game always sees the event too.
        let _ = self.egui_winit_state.on_window_event(window, event);
    }

    pub fn toggle_debug(&mut self) {
        self.debug_visible = !self.debug_visible;
        log::info!(
            "Debug panel: {}",
            if self.debug_visible { "ON" } else { "OFF" }
        );
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        clock: &FrameClock,
        frame: &HudFrame,
    ) -> (Vec<egui::ClippedPrimitive>, egui::TexturesDelta) {
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let font_loaded = self.font_loaded;
        let debug_visible = self.debug_visible;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if font_loaded {
                draw_score(ctx, frame);
                if frame.game_over {
                    draw_game_over(ctx);
                }
            }
            if debug_visible {
                draw_debug_panel(ctx, clock, frame.debug.as_ref());
            }
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    /// Render into an existing render pass. Call after `upload()`.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

fn hud_text(text: impl Into<String>, size: f32, color: egui::Color32) -> egui::Label {
    let rich = egui::RichText::new(text)
        .family(egui::FontFamily::Name(HUD_FONT.into()))
        .size(size)
        .color(color);
    egui::Label::new(rich).wrap_mode(egui::TextWrapMode::Extend)
}

fn draw_score(ctx: &egui::Context, frame: &HudFrame) {
    egui::Area::new(egui::Id::new("hud_score"))
        .order(egui::Order::Foreground)
        .interactable(false)
        .fixed_pos(egui::pos2(10.0, 10.0))
        .show(ctx, |ui| {
            ui.add(hud_text(
                score_line(frame.score, frame.lives),
                SCORE_TEXT_SIZE,
                egui::Color32::WHITE,
            ));
        });
}

fn draw_game_over(ctx: &egui::Context) {
    egui::Area::new(egui::Id::new("hud_game_over"))
        .order(egui::Order::Foreground)
        .interactable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.add(hud_text(
                GAME_OVER_TEXT,
                GAME_OVER_TEXT_SIZE,
                egui::Color32::RED,
            ));
        });
}

fn draw_debug_panel(ctx: &egui::Context, clock: &FrameClock, stats: Option<&DebugStats>) {
    egui::Window::new("Debug")
        .default_pos([10.0, 60.0])
        .show(ctx, |ui| {
            ui.label(format!("FPS: {:.1}", clock.smoothed_fps));
            ui.label(format!("Frame time: {:.2} ms", clock.smoothed_frame_time_ms));
            ui.label(format!("Frame: {}", clock.frame_count));
            if let Some(stats) = stats {
                ui.separator();
                ui.label(format!("State: {}", stats.state_label));
                ui.label(format!(
                    "Player: ({:.1}, {:.1})",
                    stats.player_x, stats.player_y
                ));
                ui.label(format!(
                    "Contacts: ground={} wall={} head={}",
                    stats.on_ground, stats.wall_contact, stats.head_bump
                ));
                ui.label(format!("Camera x: {:.1}", stats.camera_x));
                ui.separator();
                ui.label(format!("Quads: {}", stats.quads));
                ui.label(format!("Draw calls: {}", stats.draw_calls));
                ui.label(format!("Texture binds: {}", stats.texture_binds));
            }
        });
}
