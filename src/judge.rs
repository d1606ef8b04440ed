use crate::config::TimingConfig;
use crate::types::{BottomPair, Icon, Resolution, Side, Verdict};

pub fn clamp_elapsed(elapsed_ms: u64, cfg: &TimingConfig) -> u64 {
    elapsed_ms.min(cfg.max_points_to_correct())
}

/// Scores a keyed answer. Faster correct answers earn more; a wrong side earns
/// the miss constant no matter how fast.
pub fn judge_answer(
    top: Icon,
    pair: &BottomPair,
    side: Side,
    elapsed_ms: u64,
    cfg: &TimingConfig,
) -> Verdict {
    let elapsed = clamp_elapsed(elapsed_ms, cfg);
    if top.tag == pair[side.slot()].tag {
        Verdict {
            resolution: Resolution::Correct,
            points: (cfg.max_points_to_correct() - elapsed) as i32,
            elapsed_ms: Some(elapsed),
        }
    } else {
        Verdict { resolution: Resolution::Miss, points: cfg.miss_points, elapsed_ms: Some(elapsed) }
    }
}

pub fn judge_timeout(cfg: &TimingConfig) -> Verdict {
    Verdict { resolution: Resolution::TooLate, points: cfg.too_late_points, elapsed_ms: None }
}

/// Cumulative points after adding a round's points; never below zero.
pub fn apply_points(game_points: u64, points: i32) -> u64 {
    let next = game_points as i64 + i64::from(points);
    next.max(0) as u64
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Score {
    pub game_points: u64,
    /// Points of the round just resolved; `None` while a round is in progress.
    pub round_points: Option<i32>,
}

impl Score {
    pub fn record(&mut self, points: i32) {
        self.game_points = apply_points(self.game_points, points);
        self.round_points = Some(points);
    }

    pub fn clear_round(&mut self) { self.round_points = None; }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ICONS;
    use proptest::prelude::*;

    const A: Icon = ICONS[0];
    const B: Icon = ICONS[1];

    #[test]
    fn left_match_at_100ms() {
        let cfg = TimingConfig::default();
        let v = judge_answer(A, &[A, B], Side::Left, 100, &cfg);
        assert_eq!(v.resolution, Resolution::Correct);
        assert_eq!(v.points, 399);
        let v = judge_answer(A, &[A, B], Side::Right, 100, &cfg);
        assert_eq!(v.resolution, Resolution::Miss);
        assert_eq!(v.points, 0);
    }

    #[test]
    fn instant_right_match_is_max() {
        let cfg = TimingConfig::default();
        let v = judge_answer(A, &[B, A], Side::Right, 0, &cfg);
        assert_eq!(v.points, 499);
        assert_eq!(v.elapsed_ms, Some(0));
    }

    #[test]
    fn slow_answers_clamp_to_zero_points() {
        let cfg = TimingConfig::default();
        let v = judge_answer(B, &[A, B], Side::Right, 10_000, &cfg);
        assert_eq!(v.resolution, Resolution::Correct);
        assert_eq!(v.elapsed_ms, Some(499));
        assert_eq!(v.points, 0);
    }

    #[test]
    fn timeout_is_penalty() {
        let v = judge_timeout(&TimingConfig::default());
        assert_eq!(v.resolution, Resolution::TooLate);
        assert_eq!(v.points, -1000);
        assert_eq!(v.elapsed_ms, None);
    }

    #[test]
    fn score_floors_at_zero() {
        let mut s = Score { game_points: 500, round_points: None };
        s.record(-1000);
        assert_eq!(s.game_points, 0);
        assert_eq!(s.round_points, Some(-1000));
        s.record(399);
        assert_eq!(s.game_points, 399);
        s.clear_round();
        assert_eq!(s.round_points, None);
        assert_eq!(s.game_points, 399);
    }

    proptest! {
        #[test]
        fn correct_points_track_elapsed(elapsed in 0u64..499, natural in any::<bool>(), left in any::<bool>()) {
            let cfg = TimingConfig::default();
            let pair = if natural { [A, B] } else { [B, A] };
            let side = if left { Side::Left } else { Side::Right };
            let top = pair[side.slot()];
            let v = judge_answer(top, &pair, side, elapsed, &cfg);
            prop_assert_eq!(v.resolution, Resolution::Correct);
            prop_assert_eq!(v.points, 499 - elapsed as i32);
            prop_assert!((1..=499).contains(&v.points));
        }

        #[test]
        fn wrong_side_is_always_zero(elapsed in 0u64..2_000, natural in any::<bool>(), left in any::<bool>()) {
            let cfg = TimingConfig::default();
            let pair = if natural { [A, B] } else { [B, A] };
            let side = if left { Side::Left } else { Side::Right };
            let other = if left { Side::Right } else { Side::Left };
            let top = pair[other.slot()];
            let v = judge_answer(top, &pair, side, elapsed, &cfg);
            prop_assert_eq!(v.resolution, Resolution::Miss);
            prop_assert_eq!(v.points, 0);
        }

        #[test]
        fn cumulative_never_negative(start in 0u64..5_000, points in prop::collection::vec(-1000i32..=499, 0..50)) {
            let mut s = Score { game_points: start, round_points: None };
            for p in points {
                let before = s.game_points as i64;
                s.record(p);
                prop_assert_eq!(s.game_points as i64, (before + p as i64).max(0));
            }
        }
    }
}
