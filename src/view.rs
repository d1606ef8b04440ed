//! Engine-independent snapshot of what the screen should show.

use crate::config::TimingConfig;
use crate::input::{LEFT_KEY, RIGHT_KEY};
use crate::state_machine::RoundMachine;
use crate::types::{BottomPair, Icon};

pub const ICON_SIZE_PX: f32 = 80.0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HudView {
    pub game_points: String,
    /// Hidden while the current round is unresolved.
    pub round_points: Option<String>,
    pub too_late: bool,
    pub top: Option<Icon>,
    /// Placeholders are drawn in place of the pair while this is `None`.
    pub bottom: Option<BottomPair>,
    pub instructions: String,
    pub timing_hint: String,
}

impl HudView {
    pub fn from_machine(machine: &RoundMachine) -> Self {
        let score = machine.score();
        let round = machine.round();
        Self {
            game_points: format!("Game Points: {}", score.game_points),
            round_points: score.round_points.map(|p| format!("Round Points: {p}")),
            too_late: score.round_points.is_some() && round.is_some_and(|r| r.too_late),
            top: round.filter(|r| r.show_top).and_then(|r| r.top),
            bottom: round.filter(|r| r.show_bottom).map(|r| r.bottom),
            instructions: instructions(),
            timing_hint: timing_hint(machine.config()),
        }
    }
}

pub fn instructions() -> String {
    format!("Press {LEFT_KEY} if top matches bottom left, {RIGHT_KEY} if top matches bottom right")
}

pub fn timing_hint(cfg: &TimingConfig) -> String {
    format!(
        "You have {} ms to answer!\nNext round starts in {} ms after you score.",
        cfg.round_window_ms, cfg.new_round_delay_ms
    )
}
