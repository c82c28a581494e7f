use crate::game::{FrameInput, Game};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub fixed_dt: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub jump: bool,
    #[serde(default)]
    pub restart: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    pub fn expanded_inputs(&self) -> Vec<FrameInput> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(FrameInput {
                    left: frame.left,
                    right: frame.right,
                    jump: frame.jump,
                    restart: frame.restart,
                });
            }
        }
        out
    }

    pub fn run(&self, game: &mut Game) {
        for input in self.expanded_inputs() {
            game.frame(self.fixed_dt, &input);
        }
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.fixed_dt <= 0.0 {
        return Err("Replay validation failed: fixed_dt must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::GameState;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "smp_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn write_replay(name_hint: &str, json: &str) -> ReplaySequence {
        let path = temp_file_path(name_hint);
        fs::write(&path, json).expect("write replay file");
        let replay = load_replay_from_path(&path).expect("replay should load");
        let _ = fs::remove_file(path);
        replay
    }

    fn new_game() -> Game {
        Game::new(GameConfig::default(), 800.0, 600.0)
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let replay = write_replay(
            "parse",
            r#"{
              "fixed_dt": 0.016666667,
              "frames": [
                { "right": true, "repeat": 3 },
                { "jump": true }
              ]
            }"#,
        );
        let expanded = replay.expanded_inputs();
        assert_eq!(expanded.len(), 4);
        assert!(expanded[0].right);
        assert!(expanded[3].jump);
        assert!(!expanded[3].right);
    }

    #[test]
    fn replay_rejects_empty_frames() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("empty replay should fail");
        assert!(err.contains("frames list is empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_run_is_deterministic() {
        let replay = write_replay(
            "deterministic",
            r#"{
              "frames": [
                { "repeat": 40 },
                { "right": true, "repeat": 30 },
                { "right": true, "jump": true },
                { "right": true, "repeat": 60 },
                { "left": true, "repeat": 45 }
              ]
            }"#,
        );

        let mut run_a = new_game();
        let mut run_b = new_game();
        replay.run(&mut run_a);
        replay.run(&mut run_b);

        assert_eq!(run_a.player, run_b.player);
        assert_eq!(run_a.level, run_b.level);
        assert_eq!(run_a.scoreboard, run_b.scoreboard);
        assert_eq!(run_a.state(), run_b.state());
    }

    #[test]
    fn walking_into_first_enemy_costs_a_life() {
        // Land, then walk right along the ground into the patrolling enemy.
        let replay = write_replay(
            "walk_into_enemy",
            r#"{ "frames": [ { "repeat": 40 }, { "right": true, "repeat": 90 } ] }"#,
        );
        let mut game = new_game();
        replay.run(&mut game);
        assert_eq!(game.lives(), 2);
        assert_eq!(game.state(), GameState::Playing);
    }

    #[test]
    fn restart_frame_recovers_from_game_over() {
        let replay = write_replay(
            "restart",
            r#"{ "frames": [ { "repeat": 5 }, { "restart": true } ] }"#,
        );
        let mut game = new_game();
        game.scoreboard.lives = 1;
        game.player.body.y = 800.0;
        game.update(1.0 / 60.0);
        assert_eq!(game.state(), GameState::GameOver);

        replay.run(&mut game);
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.lives(), 3);
        assert_eq!(game.score(), 0);
    }
}
