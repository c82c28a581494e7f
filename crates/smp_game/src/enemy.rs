use glam::Vec2;
use smp_core::geometry::Rect;

use crate::config::GameConfig;

/// Walker that patrols between two x bounds and reverses on contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    pub body: Rect,
    /// Horizontal velocity; the sign is the walking direction.
    pub velocity_x: f32,
    pub left_bound: f32,
    pub right_bound: f32,
    pub defeated: bool,
}

impl Enemy {
    /// Bounds may be given in either order.
    pub fn new(position: Vec2, bound_a: f32, bound_b: f32, config: &GameConfig) -> Self {
        Self {
            body: Rect::from_position_size(position, config.enemy_size()),
            velocity_x: config.enemy_speed,
            left_bound: bound_a.min(bound_b),
            right_bound: bound_a.max(bound_b),
            defeated: false,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.body.x += self.velocity_x * dt;

        if self.body.x <= self.left_bound {
            self.velocity_x = -self.velocity_x;
            self.body.x = self.left_bound;
        } else if self.body.right() >= self.right_bound {
            self.velocity_x = -self.velocity_x;
            self.body.x = self.right_bound - self.body.w;
        }
    }

    pub fn defeat(&mut self) {
        self.defeated = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walker(x: f32, left: f32, right: f32) -> Enemy {
        Enemy::new(Vec2::new(x, 460.0), left, right, &GameConfig::default())
    }

    #[test]
    fn new_orders_bounds_and_walks_right() {
        let enemy = walker(300.0, 450.0, 250.0);
        assert_eq!(enemy.left_bound, 250.0);
        assert_eq!(enemy.right_bound, 450.0);
        assert_eq!(enemy.velocity_x, 80.0);
        assert_eq!(enemy.body.size(), Vec2::new(40.0, 40.0));
    }

    #[test]
    fn reverses_and_snaps_at_right_bound() {
        let mut enemy = walker(405.0, 250.0, 450.0);
        enemy.update(0.1);
        assert_eq!(enemy.body.x, 410.0);
        assert_eq!(enemy.velocity_x, -80.0);
    }

    #[test]
    fn reverses_and_snaps_at_left_bound() {
        let mut enemy = walker(255.0, 250.0, 450.0);
        enemy.velocity_x = -80.0;
        enemy.update(0.1);
        assert_eq!(enemy.body.x, 250.0);
        assert_eq!(enemy.velocity_x, 80.0);
    }

    #[test]
    fn direction_only_flips_on_bound_contact() {
        let mut enemy = walker(300.0, 250.0, 450.0);
        enemy.update(0.1);
        assert_eq!(enemy.velocity_x, 80.0);
        assert!((enemy.body.x - 308.0).abs() < 1e-4);
    }

    #[test]
    fn patrol_stays_within_bounds() {
        let mut enemy = walker(300.0, 250.0, 450.0);
        for step in 0..2000 {
            // Uneven deltas, including a long stall.
            let dt = if step % 97 == 0 { 0.25 } else { 1.0 / 60.0 };
            enemy.update(dt);
            assert!(enemy.body.x >= enemy.left_bound);
            assert!(enemy.body.right() <= enemy.right_bound);
        }
    }
}
