//! Startup asset loading.
//!
//! Everything is read once before the first frame. In the game every asset
//! is optional: a texture that fails to load is logged and its entity falls
//! back to a solid color, and a missing font turns HUD text off.

use std::path::{Path, PathBuf};

use smp_render::{GpuContext, SpriteBatch, Texture};

use crate::scene_draw::{
    SceneTextures, BACKGROUND_TEXTURE, COIN_TEXTURE, ENEMY_TEXTURE, PLAYER_TEXTURE,
};

pub const ASSET_ROOT: &str = "assets";
pub const BACKGROUND_FILE: &str = "mariobackground.png";
pub const PLAYER_FILE: &str = "mario.png";
pub const ENEMY_FILE: &str = "goomba.png";
pub const COIN_FILE: &str = "coin.png";
pub const FONT_FILE: &str = "arial.ttf";
pub const CONFIG_FILE: &str = "config/game.json";

pub fn asset_path(file: &str) -> PathBuf {
    Path::new(ASSET_ROOT).join(file)
}

pub struct GameAssets {
    pub textures: SceneTextures,
    /// Pixel size of the coin image, used to decide whether it is a strip.
    pub coin_size: Option<(u32, u32)>,
    pub font: Option<Vec<u8>>,
}

pub fn load_game_assets(gpu: &GpuContext, batch: &mut SpriteBatch) -> GameAssets {
    let background = load_optional_texture(gpu, batch, BACKGROUND_TEXTURE, BACKGROUND_FILE);
    let player = load_optional_texture(gpu, batch, PLAYER_TEXTURE, PLAYER_FILE);
    let enemy = load_optional_texture(gpu, batch, ENEMY_TEXTURE, ENEMY_FILE);
    let coin = load_optional_texture(gpu, batch, COIN_TEXTURE, COIN_FILE);

    let font_path = asset_path(FONT_FILE);
    let font = match smp_hud::load_font(&font_path) {
        Ok(bytes) => {
            log::info!("Loaded font '{}'", font_path.display());
            Some(bytes)
        }
        Err(err) => {
            log::warn!("{err}. Text will not be displayed.");
            None
        }
    };

    GameAssets {
        textures: SceneTextures {
            background,
            player,
            enemy: enemy.is_some(),
            coin: coin.is_some(),
        },
        coin_size: coin,
        font,
    }
}

/// Load `assets/<file>` under `key`; on failure log and return `None`.
pub fn load_optional_texture(
    gpu: &GpuContext,
    batch: &mut SpriteBatch,
    key: &str,
    file: &str,
) -> Option<(u32, u32)> {
    match load_required_texture(gpu, batch, key, file) {
        Ok(size) => Some(size),
        Err(err) => {
            log::warn!("{err}. Using placeholder color.");
            None
        }
    }
}

pub fn load_required_texture(
    gpu: &GpuContext,
    batch: &mut SpriteBatch,
    key: &str,
    file: &str,
) -> Result<(u32, u32), String> {
    let path = asset_path(file);
    let texture = Texture::from_path(&gpu.device, &gpu.queue, &path)?;
    let size = texture.size;
    batch.insert_texture(gpu, key, texture);
    log::info!(
        "Loaded texture '{}' ({}x{}) as '{}'",
        path.display(),
        size.0,
        size.1,
        key
    );
    Ok(size)
}

/// Frame count to animate the coin with. The image counts as a strip only
/// when it is wider than one coin; anything else is a single still frame.
pub fn coin_frame_count(coin_texture: Option<(u32, u32)>, coin_width: f32, configured: u32) -> u32 {
    match coin_texture {
        Some((width, _)) if configured > 1 && width as f32 > coin_width => configured,
        _ => 1,
    }
}
