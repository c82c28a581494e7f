pub mod hud;

pub use hud::{load_font, score_line, DebugStats, HudFrame, HudOverlay, GAME_OVER_TEXT};
