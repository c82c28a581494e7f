//! The single stage: platform layout, enemy patrols and coin placement.

use glam::Vec2;
use smp_core::geometry::Rect;

use crate::coin::Coin;
use crate::config::GameConfig;
use crate::enemy::Enemy;

pub const LEVEL_WIDTH: f32 = 2000.0;
pub const PLAYER_START: Vec2 = Vec2::new(100.0, 400.0);

pub const GROUND_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
pub const PLATFORM_COLOR: [f32; 4] = [100.0 / 255.0, 50.0 / 255.0, 0.0, 1.0];

const GROUND: Rect = Rect::new(0.0, 500.0, LEVEL_WIDTH, 50.0);

const FLOATING_PLATFORMS: [Rect; 4] = [
    Rect::new(250.0, 400.0, 200.0, 30.0),
    Rect::new(500.0, 300.0, 150.0, 30.0),
    Rect::new(800.0, 450.0, 300.0, 30.0),
    Rect::new(1100.0, 350.0, 100.0, 30.0),
];

/// Spawn position followed by the two patrol bounds.
const ENEMY_SPAWNS: [(Vec2, f32, f32); 3] = [
    (Vec2::new(300.0, 460.0), 250.0, 450.0),
    (Vec2::new(600.0, 260.0), 550.0, 700.0),
    (Vec2::new(900.0, 410.0), 850.0, 1000.0),
];

const COIN_SPAWNS: [Vec2; 5] = [
    Vec2::new(270.0, 360.0),
    Vec2::new(550.0, 260.0),
    Vec2::new(600.0, 260.0),
    Vec2::new(850.0, 410.0),
    Vec2::new(1120.0, 310.0),
];

/// Static solid rectangle. Never mutated after the level is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    pub rect: Rect,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub coins: Vec<Coin>,
    pub width: f32,
    pub player_start: Vec2,
}

impl Level {
    pub fn build(config: &GameConfig) -> Self {
        let mut platforms = Vec::with_capacity(1 + FLOATING_PLATFORMS.len());
        platforms.push(Platform {
            rect: GROUND,
            color: GROUND_COLOR,
        });
        platforms.extend(FLOATING_PLATFORMS.iter().map(|&rect| Platform {
            rect,
            color: PLATFORM_COLOR,
        }));

        let enemies = ENEMY_SPAWNS
            .iter()
            .map(|&(position, bound_a, bound_b)| Enemy::new(position, bound_a, bound_b, config))
            .collect();

        let coins = COIN_SPAWNS
            .iter()
            .map(|&position| Coin::new(position, config))
            .collect();

        Self {
            platforms,
            enemies,
            coins,
            width: LEVEL_WIDTH,
            player_start: PLAYER_START,
        }
    }

    pub fn platform_rects(&self) -> impl Iterator<Item = &Rect> + Clone {
        self.platforms.iter().map(|platform| &platform.rect)
    }
}
