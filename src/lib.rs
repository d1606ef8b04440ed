mod config;
mod types;
mod rng;
mod judge;
mod input;
mod state_machine;
mod logging;
mod view;

#[cfg(feature = "bevy")]
mod events;
#[cfg(feature = "bevy")]
mod hud;
#[cfg(feature = "bevy")]
mod plugin;

pub use config::*;
pub use types::*;
pub use rng::*;
pub use judge::*;
pub use input::*;
pub use state_machine::*;
pub use logging::*;
pub use view::*;

#[cfg(feature = "bevy")]
pub use events::*;
#[cfg(feature = "bevy")]
pub use plugin::*;

#[cfg(test)]
mod tests {
    use super::*;

    const A: Icon = ICONS[0];
    const B: Icon = ICONS[1];

    fn machine() -> RoundMachine {
        RoundMachine::new(TimingConfig::default(), RoundRng::seeded(0x5EED))
    }

    /// Mounts at 0 and brings the first round live at 550 with the given layout.
    fn live_round(bottom: BottomPair, top: Icon) -> RoundMachine {
        let mut m = machine();
        m.mount(0);
        m.tick(50);
        m.force_layout(bottom, top);
        m.tick(550);
        assert!(m.is_live());
        m
    }

    fn resolved(events: &[RoundEvent]) -> Vec<&RoundLog> {
        events
            .iter()
            .filter_map(|e| match e {
                RoundEvent::Resolved(log) => Some(log),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn timer_chain_follows_the_fixed_delays() {
        let mut m = machine();
        assert_eq!(m.phase(), RoundPhase::Idle);
        assert_eq!(m.mount(0), Some(RoundEvent::RoundStarted { round: 1 }));
        assert_eq!(m.phase(), RoundPhase::BottomHidden);

        assert!(m.tick(49).is_empty());
        assert_eq!(m.tick(50), vec![RoundEvent::BottomRevealed { round: 1 }]);
        assert_eq!(m.phase(), RoundPhase::BottomShown);
        assert!(m.round().unwrap().top.is_some());
        assert!(!m.is_live());

        assert!(m.tick(549).is_empty());
        assert_eq!(m.tick(550), vec![RoundEvent::TopRevealed { round: 1, at_ms: 550 }]);
        assert_eq!(m.phase(), RoundPhase::TopShown);
        assert!(m.is_live());

        let events = m.tick(1050);
        assert_eq!(resolved(&events).len(), 1);
        assert_eq!(m.phase(), RoundPhase::Resolved);

        assert!(m.tick(1599).is_empty());
        assert_eq!(m.tick(1600), vec![RoundEvent::RoundStarted { round: 2 }]);
        assert_eq!(m.phase(), RoundPhase::BottomHidden);
        assert_eq!(m.score().round_points, None);
    }

    #[test]
    fn left_key_on_left_match_scores_by_speed() {
        let mut m = live_round([A, B], A);
        let events = m.on_key('1', 650);
        let logs = resolved(&events);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].resolution, Resolution::Correct);
        assert_eq!(logs[0].points, 399);
        assert_eq!(logs[0].elapsed_ms, Some(100));
        assert_eq!(m.score().game_points, 399);
        assert_eq!(m.score().round_points, Some(399));
    }

    #[test]
    fn right_key_on_left_match_is_a_miss() {
        let mut m = live_round([A, B], A);
        let logs = m.on_key('0', 650);
        assert_eq!(resolved(&logs)[0].resolution, Resolution::Miss);
        assert_eq!(m.score().round_points, Some(0));
        assert_eq!(m.score().game_points, 0);
    }

    #[test]
    fn instant_right_match_scores_max() {
        let mut m = live_round([B, A], A);
        let events = m.on_key('0', 550);
        assert_eq!(resolved(&events)[0].points, 499);
    }

    #[test]
    fn timeout_applies_penalty_and_floor() {
        let mut m = machine();
        m.mount(0);
        // Earn 499 then 1 to sit at 500 before the timeout round.
        m.tick(50);
        m.force_layout([A, B], A);
        m.tick(550);
        m.on_key('1', 550);
        m.tick(1100);
        m.tick(1150);
        m.force_layout([A, B], B);
        m.tick(1650);
        m.on_key('0', 1650 + 498);
        assert_eq!(m.score().game_points, 500);

        let start = 1650 + 498 + 550;
        m.tick(start);
        m.tick(start + 50);
        m.tick(start + 550);
        let events = m.tick(start + 1050);
        let logs = resolved(&events);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].resolution, Resolution::TooLate);
        assert_eq!(logs[0].points, -1000);
        assert_eq!(m.score().game_points, 0);
        assert_eq!(m.score().round_points, Some(-1000));
        assert!(m.round().unwrap().too_late);
        assert!(!m.is_live());
    }

    #[test]
    fn logs_record_the_layout_that_was_played() {
        let mut m = live_round([B, A], B);
        let events = m.tick(1050);
        let log = resolved(&events)[0].clone();
        assert_eq!(log.bottom, [IconTag::B, IconTag::A]);
        assert_eq!(log.top, IconTag::B);
        assert_eq!((log.key, log.elapsed_ms), (None, None));

        m.tick(1600);
        m.tick(1650);
        m.force_layout([A, B], B);
        m.tick(2150);
        let events = m.on_key('0', 2200);
        let log = resolved(&events)[0];
        assert_eq!(log.bottom, [IconTag::A, IconTag::B]);
        assert_eq!(log.top, IconTag::B);
        assert_eq!(log.key, Some('0'));
        assert_eq!(log.points, 449);
    }

    #[test]
    fn only_the_first_key_counts() {
        let mut m = live_round([A, B], A);
        assert_eq!(resolved(&m.on_key('0', 600)).len(), 1);
        let after = m.score().clone();
        assert!(m.on_key('1', 610).is_empty());
        assert!(m.on_key('0', 620).is_empty());
        assert_eq!(m.score(), &after);
        // The deadline no longer fires for an answered round.
        assert!(resolved(&m.tick(1050)).is_empty());
        assert_eq!(m.score(), &after);
    }

    #[test]
    fn keys_after_timeout_are_ignored() {
        let mut m = live_round([A, B], A);
        m.tick(1050);
        let after = m.score().clone();
        assert!(m.on_key('1', 1060).is_empty());
        assert_eq!(m.score(), &after);
    }

    #[test]
    fn press_at_the_deadline_loses_to_the_timeout() {
        let mut m = live_round([A, B], A);
        let events = m.on_key('1', 1050);
        let logs = resolved(&events);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].resolution, Resolution::TooLate);
        assert_eq!(logs[0].key, None);
    }

    #[test]
    fn keys_before_the_top_reveal_are_ignored() {
        let mut m = machine();
        m.mount(0);
        assert!(m.on_key('1', 10).is_empty());
        m.tick(50);
        assert!(m.on_key('0', 300).is_empty());
        assert_eq!(m.phase(), RoundPhase::BottomShown);
        assert_eq!(m.score().round_points, None);
    }

    #[test]
    fn other_keys_do_not_resolve() {
        let mut m = live_round([A, B], A);
        assert!(m.on_key('2', 600).is_empty());
        assert!(m.on_key('x', 600).is_empty());
        assert!(m.is_live());
    }

    #[test]
    fn round_points_null_until_first_resolution() {
        let mut m = machine();
        assert_eq!(m.score().round_points, None);
        m.mount(0);
        m.tick(50);
        m.tick(550);
        assert_eq!(m.score().round_points, None);
        m.tick(1050);
        assert!(m.score().round_points.is_some());
    }

    #[test]
    fn every_round_resolves_exactly_once() {
        let mut m = machine();
        let mut now = 0;
        let mut resolutions = 0;
        m.mount(now);
        for i in 0..40u64 {
            // Step in 10 ms frames; answer on odd rounds, let even rounds time out.
            let mut started = 0;
            while started == 0 {
                now += 10;
                let mut events = m.tick(now);
                if m.is_live() && i % 2 == 1 {
                    events.extend(m.on_key(if i % 4 == 1 { '0' } else { '1' }, now));
                }
                resolutions += resolved(&events).len();
                started += events
                    .iter()
                    .filter(|e| matches!(e, RoundEvent::RoundStarted { .. }))
                    .count();
            }
            assert_eq!(resolutions as u64, i + 1);
        }
    }

    #[test]
    fn teardown_silences_everything() {
        let mut m = live_round([A, B], A);
        m.teardown();
        assert!(m.is_torn_down());
        assert!(!m.is_live());
        assert_eq!(m.pending_timer(), None);
        assert!(m.on_key('1', 600).is_empty());
        assert!(m.tick(10_000).is_empty());
        assert_eq!(m.mount(10_000), None);
        assert_eq!(m.score().round_points, None);
    }

    #[test]
    fn teardown_mid_delay_stops_next_round() {
        let mut m = live_round([A, B], A);
        m.on_key('1', 600);
        m.teardown();
        assert!(m.tick(5_000).is_empty());
        assert_eq!(m.round().unwrap().id, 1);
    }

    #[test]
    fn stale_round_timers_are_discarded() {
        let mut m = live_round([A, B], A);
        m.inject_timer(PendingTimer { kind: TimerKind::Deadline, due_ms: 560, round_id: 0 });
        assert!(m.tick(600).is_empty());
        assert_eq!(m.score().round_points, None);
    }

    #[test]
    fn mount_is_idempotent() {
        let mut m = machine();
        assert!(m.mount(0).is_some());
        assert_eq!(m.mount(5), None);
        assert_eq!(m.round().unwrap().id, 1);
    }

    #[test]
    fn late_frame_reveals_at_service_time() {
        let mut m = machine();
        m.mount(0);
        m.tick(50);
        // Frame arrives late; the reveal timestamp is when it was serviced.
        assert_eq!(m.tick(580), vec![RoundEvent::TopRevealed { round: 1, at_ms: 580 }]);
        assert_eq!(m.pending_timer().map(|t| t.due_ms), Some(1080));
    }

    #[test]
    fn played_session_replays_cleanly() {
        let mut m = machine();
        let mut logs = Vec::new();
        let mut now = 0;
        m.mount(now);
        while logs.len() < 12 {
            now += 7;
            let mut events = m.tick(now);
            if m.is_live() && logs.len() % 3 != 2 {
                events.extend(m.on_key(if logs.len() % 2 == 0 { '1' } else { '0' }, now + 120));
            }
            logs.extend(resolved(&events).into_iter().cloned());
        }
        let cfg = TimingConfig::default();
        assert_eq!(replay_session(&logs, &cfg), Ok(m.score().game_points));
        assert_eq!(m.last_round_log(), logs.last());
    }
}
