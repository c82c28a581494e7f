//! Game session: owns the level, the player and the scoreboard, and advances
//! them one variable-length frame at a time.
//!
//! Per frame, while playing:
//!
//!   1. player physics against the platform list
//!   2. fall check (lose a life, respawn or end the game)
//!   3. enemy patrol, then stomp-or-damage against the player
//!   4. coin animation and pickup
//!   5. camera follow
//!
//! Losing the last life ends the frame immediately: the player is left where
//! it died and nothing later in the list runs.

use glam::Vec2;

use crate::config::GameConfig;
use crate::level::Level;
use crate::player::{Player, PlayerInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    LivesExhausted,
    Restart,
}

impl GameState {
    /// Every pair not listed keeps the current state.
    pub fn transition(self, event: GameEvent) -> GameState {
        match (self, event) {
            (GameState::Playing, GameEvent::LivesExhausted) => GameState::GameOver,
            (GameState::GameOver, GameEvent::Restart) => GameState::Playing,
            (state, _) => state,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GameState::Playing => "Playing",
            GameState::GameOver => "GameOver",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scoreboard {
    pub score: u32,
    pub lives: u32,
}

impl Scoreboard {
    pub fn new(initial_lives: u32) -> Self {
        Self {
            score: 0,
            lives: initial_lives,
        }
    }

    pub fn add_points(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Returns the lives left afterwards.
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }
}

/// Input sampled by the shell for one frame. Movement keys are held state;
/// `restart` is the edge-triggered R press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub restart: bool,
}

impl FrameInput {
    pub fn player_input(&self) -> PlayerInput {
        PlayerInput {
            left: self.left,
            right: self.right,
            jump: self.jump,
        }
    }
}

/// Horizontal camera center that keeps the view inside `[0, level_width]`.
///
/// When the level is narrower than the view the two bounds cross. The left
/// bound is tested first and no panic occurs, unlike `f32::clamp`.
pub fn camera_center_x(player_center_x: f32, half_view_width: f32, level_width: f32) -> f32 {
    let min_x = half_view_width;
    let max_x = level_width - half_view_width;
    if player_center_x < min_x {
        min_x
    } else if player_center_x > max_x {
        max_x
    } else {
        player_center_x
    }
}

pub struct Game {
    pub config: GameConfig,
    pub level: Level,
    pub player: Player,
    pub scoreboard: Scoreboard,
    state: GameState,
    view_size: Vec2,
    camera_center: Vec2,
}

impl Game {
    pub fn new(config: GameConfig, view_width: f32, view_height: f32) -> Self {
        let level = Level::build(&config);
        let player = Player::new(level.player_start, &config);
        let scoreboard = Scoreboard::new(config.initial_lives);
        let view_size = Vec2::new(view_width, view_height);
        let mut game = Self {
            config,
            level,
            player,
            scoreboard,
            state: GameState::Playing,
            view_size,
            camera_center: view_size * 0.5,
        };
        game.update_camera();
        game
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.scoreboard.score
    }

    pub fn lives(&self) -> u32 {
        self.scoreboard.lives
    }

    pub fn camera_center(&self) -> Vec2 {
        self.camera_center
    }

    /// One frame as the shell drives it: restart handling, then movement
    /// input and simulation while playing.
    pub fn frame(&mut self, dt: f32, input: &FrameInput) {
        if input.restart && self.state == GameState::GameOver {
            self.restart();
        }
        if self.state != GameState::Playing {
            return;
        }
        self.player.handle_input(input.player_input(), &self.config);
        self.update(dt);
    }

    /// Advance the simulation by `dt` seconds. Does nothing after game over.
    pub fn update(&mut self, dt: f32) {
        if self.state != GameState::Playing {
            return;
        }

        let start = self.level.player_start;

        self.player
            .update(dt, self.level.platform_rects(), self.level.width, &self.config);

        if self.player.body.y > self.config.fall_threshold_y {
            let lives = self.scoreboard.lose_life();
            log::debug!("Player fell out of the level, lives left: {lives}");
            if lives == 0 {
                self.state = self.state.transition(GameEvent::LivesExhausted);
                log::info!("Game over. Final score: {}", self.scoreboard.score);
                return;
            }
            self.player.reset(start);
        }

        for enemy in self.level.enemies.iter_mut().filter(|e| !e.defeated) {
            enemy.update(dt);
            if !self.player.body.overlaps(&enemy.body) {
                continue;
            }

            let stomp = self.player.velocity.y > 0.0
                && self.player.body.bottom() < enemy.body.y + self.config.stomp_tolerance;
            if stomp {
                enemy.defeat();
                self.scoreboard.add_points(self.config.stomp_score);
                self.player.velocity.y = self.config.jump_velocity / 2.0;
                log::debug!("Stomped enemy at x={:.1}", enemy.body.x);
            } else {
                let lives = self.scoreboard.lose_life();
                log::debug!("Player hit by enemy, lives left: {lives}");
                if lives == 0 {
                    self.state = self.state.transition(GameEvent::LivesExhausted);
                    log::info!("Game over. Final score: {}", self.scoreboard.score);
                    return;
                }
                self.player.reset(start);
            }
        }

        for coin in self.level.coins.iter_mut().filter(|c| !c.collected) {
            coin.update(dt);
            if self.player.body.overlaps(&coin.body) && coin.collect() {
                self.scoreboard.add_points(self.config.coin_score);
                log::debug!("Collected coin at x={:.1}", coin.body.x);
            }
        }

        self.update_camera();
    }

    /// Rebuild the level and reset score, lives and the player. Only takes
    /// effect from the game-over screen.
    pub fn restart(&mut self) {
        let next = self.state.transition(GameEvent::Restart);
        if next == self.state {
            return;
        }
        self.level = Level::build(&self.config);
        self.player.reset(self.level.player_start);
        self.scoreboard = Scoreboard::new(self.config.initial_lives);
        self.state = next;
        self.update_camera();
        log::info!("Restarted");
    }

    pub fn resize_view(&mut self, width: f32, height: f32) {
        self.view_size = Vec2::new(width, height);
        self.update_camera();
    }

    fn update_camera(&mut self) {
        let x = camera_center_x(
            self.player.body.center().x,
            self.view_size.x * 0.5,
            self.level.width,
        );
        self.camera_center = Vec2::new(x, self.view_size.y * 0.5);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::PLAYER_START;

    const DT: f32 = 1.0 / 60.0;

    fn new_game() -> Game {
        Game::new(GameConfig::default(), 800.0, 600.0)
    }

    /// A game with only the given enemy and coin slots kept.
    fn isolated(enemy: Option<usize>, coin: Option<usize>) -> Game {
        let mut game = new_game();
        game.level.enemies = enemy
            .map(|i| vec![game.level.enemies[i]])
            .unwrap_or_default();
        game.level.coins = coin.map(|i| vec![game.level.coins[i]]).unwrap_or_default();
        game
    }

    #[test]
    fn transition_table() {
        use GameEvent::*;
        use GameState::*;
        assert_eq!(Playing.transition(LivesExhausted), GameOver);
        assert_eq!(Playing.transition(Restart), Playing);
        assert_eq!(GameOver.transition(Restart), Playing);
        assert_eq!(GameOver.transition(LivesExhausted), GameOver);
    }

    #[test]
    fn new_game_starts_playing() {
        let game = new_game();
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.score(), 0);
        assert_eq!(game.lives(), 3);
        assert_eq!(game.player.body.position(), PLAYER_START);
        assert_eq!(game.camera_center(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn camera_clamps_to_level_edges() {
        assert_eq!(camera_center_x(50.0, 400.0, 2000.0), 400.0);
        assert_eq!(camera_center_x(1000.0, 400.0, 2000.0), 1000.0);
        assert_eq!(camera_center_x(1900.0, 400.0, 2000.0), 1600.0);
    }

    #[test]
    fn camera_clamp_order_holds_when_level_is_narrow() {
        assert_eq!(camera_center_x(50.0, 1200.0, 2000.0), 1200.0);
        assert_eq!(camera_center_x(1500.0, 1200.0, 2000.0), 800.0);
    }

    #[test]
    fn camera_follows_player_center() {
        let mut game = isolated(None, None);
        game.player.body.x = 980.0;
        game.player.body.y = 300.0;
        game.update(DT);
        assert_eq!(game.camera_center().x, 1000.0);
        assert_eq!(game.camera_center().y, 300.0);
    }

    #[test]
    fn resize_rebuilds_camera_for_new_view() {
        let mut game = new_game();
        game.resize_view(1200.0, 900.0);
        assert_eq!(game.camera_center(), Vec2::new(600.0, 450.0));
    }

    #[test]
    fn player_falls_onto_ground_and_stays() {
        let mut game = isolated(None, None);
        for _ in 0..120 {
            game.update(DT);
        }
        assert!(game.player.on_ground);
        assert_eq!(game.player.body.bottom(), 500.0);
        assert_eq!(game.player.velocity.y, 0.0);
    }

    #[test]
    fn falling_out_of_level_costs_a_life_and_respawns() {
        let mut game = isolated(None, None);
        game.player.body.x = 1500.0;
        game.player.body.y = 690.0;
        game.player.velocity.y = 900.0;
        game.update(DT);

        assert_eq!(game.lives(), 2);
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.player.body.position(), PLAYER_START);
        assert_eq!(game.player.velocity, Vec2::ZERO);
    }

    #[test]
    fn last_fall_ends_game_without_respawn() {
        let mut game = isolated(None, None);
        game.scoreboard.lives = 1;
        game.player.body.x = 1500.0;
        game.player.body.y = 690.0;
        game.player.velocity.y = 900.0;
        game.update(DT);

        assert_eq!(game.lives(), 0);
        assert_eq!(game.state(), GameState::GameOver);
        assert!(game.player.body.y > 700.0);
    }

    #[test]
    fn landing_on_enemy_stomps_it() {
        // Third enemy patrols platform three at y = 410.
        let mut game = isolated(Some(2), None);
        game.player.body.x = 900.0;
        game.player.body.y = 355.0;
        game.player.velocity.y = 100.0;
        game.update(DT);

        assert!(game.level.enemies[0].defeated);
        assert_eq!(game.score(), 100);
        assert_eq!(game.lives(), 3);
        assert_eq!(game.player.velocity.y, -250.0);
    }

    #[test]
    fn falling_bottom_at_stomp_tolerance_is_damage() {
        // Enemy top is 410; a bottom of exactly 430 is outside the window.
        let mut game = isolated(Some(2), None);
        game.player.body.x = 900.0;
        game.player.body.y = 370.0;
        game.player.velocity.y = 100.0;
        game.update(0.0);

        assert!(!game.level.enemies[0].defeated);
        assert_eq!(game.lives(), 2);
        assert_eq!(game.score(), 0);
        assert_eq!(game.player.body.position(), PLAYER_START);
    }

    #[test]
    fn falling_bottom_just_inside_tolerance_is_stomp() {
        let mut game = isolated(Some(2), None);
        game.player.body.x = 900.0;
        game.player.body.y = 369.5;
        game.player.velocity.y = 100.0;
        game.update(0.0);

        assert!(game.level.enemies[0].defeated);
        assert_eq!(game.lives(), 3);
        assert_eq!(game.score(), 100);
    }

    #[test]
    fn defeated_enemy_is_inert() {
        let mut game = isolated(Some(2), None);
        game.level.enemies[0].defeat();
        let before = game.level.enemies[0];
        game.player.body.set_position(before.body.position());
        game.update(DT);
        assert_eq!(game.level.enemies[0], before);
        assert_eq!(game.lives(), 3);
    }

    #[test]
    fn side_contact_costs_a_life_and_respawns() {
        let mut game = isolated(Some(0), None);
        game.player.body.x = 310.0;
        game.player.body.y = 440.0;
        game.update(DT);

        assert_eq!(game.lives(), 2);
        assert_eq!(game.score(), 0);
        assert!(!game.level.enemies[0].defeated);
        assert_eq!(game.player.body.position(), PLAYER_START);
    }

    #[test]
    fn damage_on_last_life_ends_game_in_place() {
        let mut game = isolated(Some(0), None);
        game.scoreboard.lives = 1;
        game.player.body.x = 310.0;
        game.player.body.y = 440.0;
        game.update(DT);

        assert_eq!(game.lives(), 0);
        assert_eq!(game.state(), GameState::GameOver);
        assert_eq!(game.player.body.position(), Vec2::new(310.0, 440.0));
    }

    #[test]
    fn coin_pickup_scores_exactly_once() {
        let mut game = isolated(None, Some(0));
        game.player.body.x = 265.0;
        game.player.body.y = 340.0;
        game.update(DT);
        assert!(game.level.coins[0].collected);
        assert_eq!(game.score(), 10);

        game.update(DT);
        game.update(DT);
        assert!(game.level.coins[0].collected);
        assert_eq!(game.score(), 10);
    }

    #[test]
    fn game_over_ignores_everything_but_restart() {
        let mut game = new_game();
        game.scoreboard.lives = 0;
        game.state = GameState::GameOver;
        let position = game.player.body.position();

        game.frame(
            DT,
            &FrameInput {
                right: true,
                jump: true,
                ..FrameInput::default()
            },
        );
        assert_eq!(game.state(), GameState::GameOver);
        assert_eq!(game.player.body.position(), position);

        game.frame(
            DT,
            &FrameInput {
                restart: true,
                ..FrameInput::default()
            },
        );
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.lives(), 3);
    }

    #[test]
    fn restart_while_playing_is_ignored() {
        let mut game = new_game();
        game.scoreboard.score = 40;
        game.restart();
        assert_eq!(game.score(), 40);
        assert_eq!(game.state(), GameState::Playing);
    }

    #[test]
    fn restart_restores_initial_configuration() {
        let fresh = new_game();
        let mut game = new_game();
        for _ in 0..30 {
            game.frame(
                DT,
                &FrameInput {
                    right: true,
                    ..FrameInput::default()
                },
            );
        }
        game.level.coins[0].collect();
        game.level.enemies[1].defeat();
        game.scoreboard.score = 210;
        game.scoreboard.lives = 0;
        game.state = GameState::GameOver;

        game.restart();

        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.scoreboard, fresh.scoreboard);
        assert_eq!(game.level, fresh.level);
        assert_eq!(game.player, fresh.player);
        assert_eq!(game.camera_center(), fresh.camera_center());
    }

    #[test]
    fn frame_applies_movement_before_physics() {
        let mut game = isolated(None, None);
        game.player.body.y = 440.0;
        game.frame(
            DT,
            &FrameInput {
                right: true,
                ..FrameInput::default()
            },
        );
        assert!(game.player.body.x > PLAYER_START.x);
        assert_eq!(game.player.velocity.x, 200.0);
    }
}
