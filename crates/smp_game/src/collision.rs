//! Platform collision for moving bodies.
//!
//! The algorithm is **axis-separable move-and-slide**: move along X and push
//! the body out of every platform it now overlaps, then move along Y using the
//! already-corrected X. Platforms are visited in list order and each test runs
//! against the body as corrected so far; the last correction applied is the
//! one that sticks.
//!
//! Velocity is zeroed inside the loop on contact. A later platform that also
//! overlaps sees zero velocity on that axis and leaves the body where it is.

use glam::Vec2;
use smp_core::geometry::Rect;

/// Contacts produced by one `move_and_collide` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionMoveResult {
    pub blocked_left: bool,
    pub blocked_right: bool,
    pub blocked_up: bool,
    /// Landed on top of a platform this step.
    pub landed: bool,
}

impl CollisionMoveResult {
    pub fn blocked_horizontally(&self) -> bool {
        self.blocked_left || self.blocked_right
    }
}

/// Move `body` by `velocity * dt` against `solids` and resolve overlaps.
///
/// `velocity` is updated in place: the component along a blocked axis is set
/// to zero.
pub fn move_and_collide<'a, I>(
    body: &mut Rect,
    velocity: &mut Vec2,
    dt: f32,
    solids: I,
    epsilon: f32,
) -> CollisionMoveResult
where
    I: IntoIterator<Item = &'a Rect>,
    I::IntoIter: Clone,
{
    let solids = solids.into_iter();
    let mut result = CollisionMoveResult::default();

    body.x += velocity.x * dt;
    resolve_axis_x(body, velocity, solids.clone(), epsilon, &mut result);

    body.y += velocity.y * dt;
    resolve_axis_y(body, velocity, solids, epsilon, &mut result);

    result
}

fn resolve_axis_x<'a>(
    body: &mut Rect,
    velocity: &mut Vec2,
    solids: impl Iterator<Item = &'a Rect>,
    epsilon: f32,
    result: &mut CollisionMoveResult,
) {
    for solid in solids {
        if !body.overlaps(solid) {
            continue;
        }
        if velocity.x > 0.0 {
            body.x = solid.x - body.w - epsilon;
            result.blocked_right = true;
        } else if velocity.x < 0.0 {
            body.x = solid.right() + epsilon;
            result.blocked_left = true;
        }
        velocity.x = 0.0;
    }
}

fn resolve_axis_y<'a>(
    body: &mut Rect,
    velocity: &mut Vec2,
    solids: impl Iterator<Item = &'a Rect>,
    epsilon: f32,
    result: &mut CollisionMoveResult,
) {
    for solid in solids {
        if !body.overlaps(solid) {
            continue;
        }
        // y-down: positive velocity is falling.
        if velocity.y > 0.0 {
            body.y = solid.y - body.h;
            velocity.y = 0.0;
            result.landed = true;
        } else if velocity.y < 0.0 {
            body.y = solid.bottom() + epsilon;
            velocity.y = 0.0;
            result.blocked_up = true;
        }
    }
}
