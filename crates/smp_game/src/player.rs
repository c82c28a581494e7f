use glam::Vec2;
use smp_core::geometry::Rect;

use crate::collision::{move_and_collide, CollisionMoveResult};
use crate::config::GameConfig;

/// Held-key intent for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub body: Rect,
    pub velocity: Vec2,
    /// Recomputed from collision on every update.
    pub on_ground: bool,
    pub contacts: CollisionMoveResult,
}

impl Player {
    pub fn new(start: Vec2, config: &GameConfig) -> Self {
        Self {
            body: Rect::from_position_size(start, config.player_size()),
            velocity: Vec2::ZERO,
            on_ground: false,
            contacts: CollisionMoveResult::default(),
        }
    }

    /// Horizontal speed is set, not accumulated: no keys means standing still.
    /// Jump only fires from the ground.
    pub fn handle_input(&mut self, input: PlayerInput, config: &GameConfig) {
        self.velocity.x = 0.0;
        if input.left {
            self.velocity.x = -config.move_speed;
        }
        if input.right {
            self.velocity.x = config.move_speed;
        }
        if input.jump && self.on_ground {
            self.velocity.y = config.jump_velocity;
            self.on_ground = false;
        }
    }

    pub fn update<'a, I>(&mut self, dt: f32, platforms: I, world_width: f32, config: &GameConfig)
    where
        I: IntoIterator<Item = &'a Rect>,
        I::IntoIter: Clone,
    {
        self.velocity.y += config.gravity * dt;

        self.on_ground = false;
        self.contacts = move_and_collide(
            &mut self.body,
            &mut self.velocity,
            dt,
            platforms,
            config.collision_epsilon,
        );
        self.on_ground = self.contacts.landed;

        self.clamp_to_world(world_width);
    }

    /// Put the player back at `start`, motionless. Used for respawn and restart.
    pub fn reset(&mut self, start: Vec2) {
        self.body.set_position(start);
        self.velocity = Vec2::ZERO;
        self.on_ground = false;
        self.contacts = CollisionMoveResult::default();
    }

    fn clamp_to_world(&mut self, world_width: f32) {
        if self.body.x < 0.0 {
            self.body.x = 0.0;
            self.velocity.x = 0.0;
        }
        if self.body.right() > world_width {
            self.body.x = world_width - self.body.w;
            self.velocity.x = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn floor() -> [Rect; 1] {
        [Rect::new(0.0, 500.0, 2000.0, 50.0)]
    }

    fn standing_player(config: &GameConfig) -> Player {
        let mut player = Player::new(Vec2::new(100.0, 440.0), config);
        player.update(DT, &floor(), 2000.0, config);
        assert!(player.on_ground);
        player
    }

    #[test]
    fn right_wins_when_both_held() {
        let config = GameConfig::default();
        let mut player = Player::new(Vec2::ZERO, &config);
        player.handle_input(
            PlayerInput {
                left: true,
                right: true,
                jump: false,
            },
            &config,
        );
        assert_eq!(player.velocity.x, 200.0);
    }

    #[test]
    fn releasing_keys_stops_horizontal_motion() {
        let config = GameConfig::default();
        let mut player = Player::new(Vec2::ZERO, &config);
        player.velocity.x = 200.0;
        player.handle_input(PlayerInput::default(), &config);
        assert_eq!(player.velocity.x, 0.0);
    }

    #[test]
    fn jump_requires_ground() {
        let config = GameConfig::default();
        let jump = PlayerInput {
            jump: true,
            ..PlayerInput::default()
        };

        let mut airborne = Player::new(Vec2::ZERO, &config);
        airborne.handle_input(jump, &config);
        assert_eq!(airborne.velocity.y, 0.0);

        let mut grounded = standing_player(&config);
        grounded.handle_input(jump, &config);
        assert_eq!(grounded.velocity.y, -500.0);
        assert!(!grounded.on_ground);
    }

    #[test]
    fn falling_player_lands_on_platform() {
        let config = GameConfig::default();
        let platforms = [Rect::new(0.0, 400.0, 500.0, 30.0)];
        let mut player = Player::new(Vec2::new(100.0, 338.0), &config);
        player.velocity.y = 300.0;

        player.update(DT, &platforms, 2000.0, &config);

        assert!(player.on_ground);
        assert_eq!(player.body.bottom(), 400.0);
        assert_eq!(player.velocity.y, 0.0);
    }

    #[test]
    fn standing_player_stays_grounded_every_frame() {
        let config = GameConfig::default();
        let mut player = standing_player(&config);
        for _ in 0..120 {
            player.update(DT, &floor(), 2000.0, &config);
            assert!(player.on_ground);
            assert_eq!(player.body.bottom(), 500.0);
        }
    }

    #[test]
    fn walking_off_a_ledge_clears_on_ground() {
        let config = GameConfig::default();
        let ledge = [Rect::new(0.0, 500.0, 120.0, 50.0)];
        let mut player = Player::new(Vec2::new(78.0, 440.0), &config);
        player.update(DT, &ledge, 2000.0, &config);
        assert!(player.on_ground);

        player.body.x = 125.0;
        player.update(DT, &ledge, 2000.0, &config);
        assert!(!player.on_ground);
        assert!(player.velocity.y > 0.0);
    }

    #[test]
    fn clamps_to_left_world_edge() {
        let config = GameConfig::default();
        let mut player = Player::new(Vec2::new(1.0, 0.0), &config);
        player.velocity.x = -200.0;
        player.update(DT, &[] as &[Rect], 2000.0, &config);
        assert_eq!(player.body.x, 0.0);
        assert_eq!(player.velocity.x, 0.0);
    }

    #[test]
    fn clamps_to_right_world_edge() {
        let config = GameConfig::default();
        let mut player = Player::new(Vec2::new(1959.0, 0.0), &config);
        player.velocity.x = 200.0;
        player.update(DT, &[] as &[Rect], 2000.0, &config);
        assert_eq!(player.body.right(), 2000.0);
        assert_eq!(player.velocity.x, 0.0);
    }

    #[test]
    fn reset_returns_to_start_at_rest() {
        let config = GameConfig::default();
        let mut player = Player::new(Vec2::new(500.0, 100.0), &config);
        player.velocity = Vec2::new(200.0, -300.0);
        player.on_ground = true;
        player.reset(Vec2::new(100.0, 400.0));
        assert_eq!(player.body.position(), Vec2::new(100.0, 400.0));
        assert_eq!(player.velocity, Vec2::ZERO);
        assert!(!player.on_ground);
    }
}
