use glam::Vec2;
use smp_core::animation::FrameCycler;
use smp_core::geometry::Rect;

use crate::config::GameConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coin {
    pub body: Rect,
    /// One-way: once set it stays set until the level is rebuilt.
    pub collected: bool,
    pub animation: FrameCycler,
}

impl Coin {
    pub fn new(position: Vec2, config: &GameConfig) -> Self {
        Self {
            body: Rect::from_position_size(position, config.coin_size()),
            collected: false,
            animation: FrameCycler::new(config.coin_frame_count, config.coin_frame_time),
        }
    }

    /// Spin the coin. A single-frame coin has nothing to animate.
    pub fn update(&mut self, dt: f32) {
        if self.collected {
            return;
        }
        self.animation.tick(dt);
    }

    /// Returns true only on the call that actually collects the coin.
    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        true
    }
}
