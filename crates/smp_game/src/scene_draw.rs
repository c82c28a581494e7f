//! Maps game state to sprite quads.
//!
//! Draw order is back to front: background, platforms, coins, enemies,
//! player. Entities whose texture failed to load are drawn as solid
//! rectangles in their fallback color. Collected coins and defeated enemies
//! are skipped.

use smp_core::geometry::Rect;
use smp_render::{Quad, FULL_UV};

use crate::coin::Coin;
use crate::game::Game;

pub const BACKGROUND_TEXTURE: &str = "background";
pub const PLAYER_TEXTURE: &str = "player";
pub const ENEMY_TEXTURE: &str = "enemy";
pub const COIN_TEXTURE: &str = "coin";

pub const PLAYER_FALLBACK: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
pub const ENEMY_FALLBACK: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
pub const COIN_FALLBACK: [f32; 4] = [1.0, 1.0, 0.0, 1.0];

/// Sky blue (135, 206, 235), shown wherever nothing is drawn.
pub const SKY_COLOR: wgpu::Color = wgpu::Color {
    r: 135.0 / 255.0,
    g: 206.0 / 255.0,
    b: 235.0 / 255.0,
    a: 1.0,
};

/// Which textures made it onto the GPU, with pixel sizes where the quad
/// geometry depends on them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SceneTextures {
    pub background: Option<(u32, u32)>,
    pub player: Option<(u32, u32)>,
    pub enemy: bool,
    pub coin: bool,
}

pub fn build_scene_quads(game: &Game, textures: &SceneTextures) -> Vec<Quad<'static>> {
    let level = &game.level;
    let mut quads = Vec::with_capacity(
        2 + level.platforms.len() + level.coins.len() + level.enemies.len(),
    );

    if let Some((w, h)) = textures.background {
        quads.push(Quad::textured(
            BACKGROUND_TEXTURE,
            Rect::new(0.0, 0.0, w as f32, h as f32),
            FULL_UV,
        ));
    }

    quads.extend(
        level
            .platforms
            .iter()
            .map(|platform| Quad::solid(platform.rect, platform.color)),
    );

    for coin in level.coins.iter().filter(|coin| !coin.collected) {
        quads.push(if textures.coin {
            Quad::textured(COIN_TEXTURE, coin.body, coin_uv(coin))
        } else {
            Quad::solid(coin.body, COIN_FALLBACK)
        });
    }

    for enemy in level.enemies.iter().filter(|enemy| !enemy.defeated) {
        quads.push(if textures.enemy {
            Quad::textured(ENEMY_TEXTURE, enemy.body, FULL_UV)
        } else {
            Quad::solid(enemy.body, ENEMY_FALLBACK)
        });
    }

    let body = game.player.body;
    quads.push(match textures.player {
        Some(size) => Quad::textured(PLAYER_TEXTURE, body, top_left_region_uv(body, size)),
        None => Quad::solid(body, PLAYER_FALLBACK),
    });

    quads
}

/// Current strip frame for an animated coin, the whole texture otherwise.
pub fn coin_uv(coin: &Coin) -> [f32; 4] {
    if !coin.animation.is_animated() {
        return FULL_UV;
    }
    let (u0, u1) = coin.animation.strip_u_range();
    [u0, 0.0, u1, 1.0]
}

/// UVs covering the top-left `body`-sized pixel region of a texture.
pub fn top_left_region_uv(body: Rect, texture_size: (u32, u32)) -> [f32; 4] {
    let (tw, th) = texture_size;
    let u1 = (body.w / tw.max(1) as f32).min(1.0);
    let v1 = (body.h / th.max(1) as f32).min(1.0);
    [0.0, 0.0, u1, v1]
}
