use tracing::{debug, info, warn};

use crate::config::TimingConfig;
use crate::input::claimed_side;
use crate::judge::{judge_answer, judge_timeout, Score};
use crate::logging::{RoundLog, ROUND_LOG_TARGET};
use crate::rng::{pick_from_pair, random_order, RoundRng};
use crate::types::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimerKind { RevealBottom, RevealTop, Deadline, NextRound }

/// The one outstanding timer. Timers are strictly sequential within a round,
/// so a single slot is enough; replacing it cancels the previous one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PendingTimer {
    pub kind: TimerKind,
    pub due_ms: u64,
    pub round_id: u64,
}

/// Keyboard subscription, held only while a round is live.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyListener { pub round_id: u64 }

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Round {
    pub id: u64,
    pub bottom: BottomPair,
    pub top: Option<Icon>,
    pub show_bottom: bool,
    pub show_top: bool,
    pub answered: bool,
    pub too_late: bool,
    pub top_shown_at_ms: Option<u64>,
}

impl Round {
    fn new(id: u64, bottom: BottomPair) -> Self {
        Self {
            id,
            bottom,
            top: None,
            show_bottom: false,
            show_top: false,
            answered: false,
            too_late: false,
            top_shown_at_ms: None,
        }
    }

    pub fn is_resolved(&self) -> bool { self.answered || self.too_late }

    pub fn bottom_tags(&self) -> [IconTag; 2] { [self.bottom[0].tag, self.bottom[1].tag] }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoundEvent {
    RoundStarted { round: u64 },
    BottomRevealed { round: u64 },
    TopRevealed { round: u64, at_ms: u64 },
    Resolved(RoundLog),
}

#[derive(Clone, Debug)]
pub struct RoundMachine {
    phase: RoundPhase,
    cfg: TimingConfig,
    rng: RoundRng,
    score: Score,
    round: Option<Round>,
    last_round_id: u64,
    pending: Option<PendingTimer>,
    listener: Option<KeyListener>,
    last_log: Option<RoundLog>,
    torn_down: bool,
}

impl RoundMachine {
    pub fn new(cfg: TimingConfig, rng: RoundRng) -> Self {
        Self {
            phase: RoundPhase::Idle,
            cfg,
            rng,
            score: Score::default(),
            round: None,
            last_round_id: 0,
            pending: None,
            listener: None,
            last_log: None,
            torn_down: false,
        }
    }

    pub fn phase(&self) -> RoundPhase { self.phase }
    pub fn score(&self) -> &Score { &self.score }
    pub fn round(&self) -> Option<&Round> { self.round.as_ref() }
    pub fn config(&self) -> &TimingConfig { &self.cfg }
    pub fn pending_timer(&self) -> Option<PendingTimer> { self.pending }
    pub fn last_round_log(&self) -> Option<&RoundLog> { self.last_log.as_ref() }
    pub fn is_torn_down(&self) -> bool { self.torn_down }

    /// True while the keyboard listener is attached.
    pub fn is_live(&self) -> bool { self.listener.is_some() }

    /// Starts the first round. Does nothing once mounted or torn down.
    pub fn mount(&mut self, now_ms: u64) -> Option<RoundEvent> {
        if self.torn_down || self.phase != RoundPhase::Idle {
            return None;
        }
        Some(self.start_round(now_ms))
    }

    /// Cancels the pending timer and detaches the listener for good.
    pub fn teardown(&mut self) {
        if self.torn_down { return; }
        debug!(round = self.last_round_id, "teardown");
        self.pending = None;
        self.listener = None;
        self.torn_down = true;
        self.phase = RoundPhase::Idle;
    }

    /// Fires every timer due at or before `now_ms`, in order.
    pub fn tick(&mut self, now_ms: u64) -> Vec<RoundEvent> {
        let mut events = Vec::new();
        if self.torn_down { return events; }
        while let Some(timer) = self.pending {
            if timer.due_ms > now_ms { break; }
            self.pending = None;
            if timer.round_id != self.last_round_id {
                debug!(?timer, "discarding timer from a superseded round");
                continue;
            }
            if let Some(ev) = self.fire(timer.kind, now_ms) {
                events.push(ev);
            }
        }
        events
    }

    /// Feeds one key press. Due timers are serviced first, so a press at or
    /// past the deadline loses to the timeout.
    pub fn on_key(&mut self, key: char, now_ms: u64) -> Vec<RoundEvent> {
        let mut events = self.tick(now_ms);
        let Some(listener) = self.listener else { return events };
        let Some(side) = claimed_side(key) else { return events };
        let Some(round) = self.round.as_ref() else { return events };
        if listener.round_id != round.id || round.is_resolved() {
            return events;
        }
        let (Some(top), Some(shown_at)) = (round.top, round.top_shown_at_ms) else { return events };

        let elapsed = now_ms.saturating_sub(shown_at);
        let verdict = judge_answer(top, &round.bottom, side, elapsed, &self.cfg);
        let layout = (round.bottom_tags(), top.tag);
        if let Some(r) = self.round.as_mut() { r.answered = true; }
        events.push(self.resolve(verdict, layout, Some(key), now_ms));
        events
    }

    fn start_round(&mut self, now_ms: u64) -> RoundEvent {
        self.last_round_id += 1;
        let id = self.last_round_id;
        self.score.clear_round();
        self.listener = None;
        let bottom = random_order(&mut self.rng);
        self.round = Some(Round::new(id, bottom));
        self.phase = RoundPhase::BottomHidden;
        self.schedule(TimerKind::RevealBottom, now_ms + self.cfg.start_delay_ms);
        debug!(round = id, "round started");
        RoundEvent::RoundStarted { round: id }
    }

    fn schedule(&mut self, kind: TimerKind, due_ms: u64) {
        self.pending = Some(PendingTimer { kind, due_ms, round_id: self.last_round_id });
    }

    fn fire(&mut self, kind: TimerKind, now_ms: u64) -> Option<RoundEvent> {
        match kind {
            TimerKind::NextRound => Some(self.start_round(now_ms)),
            TimerKind::RevealBottom => {
                let round = self.round.as_mut()?;
                round.show_bottom = true;
                round.top = Some(pick_from_pair(&mut self.rng, &round.bottom));
                let id = round.id;
                self.phase = RoundPhase::BottomShown;
                self.schedule(TimerKind::RevealTop, now_ms + self.cfg.round_window_ms);
                Some(RoundEvent::BottomRevealed { round: id })
            }
            TimerKind::RevealTop => {
                let round = self.round.as_mut()?;
                round.show_top = true;
                round.top_shown_at_ms = Some(now_ms);
                let id = round.id;
                self.phase = RoundPhase::TopShown;
                self.schedule(TimerKind::Deadline, now_ms + self.cfg.round_window_ms);
                self.listener = Some(KeyListener { round_id: id });
                Some(RoundEvent::TopRevealed { round: id, at_ms: now_ms })
            }
            TimerKind::Deadline => {
                let round = self.round.as_mut()?;
                if round.is_resolved() { return None; }
                let layout = (round.bottom_tags(), round.top?.tag);
                round.too_late = true;
                let verdict = judge_timeout(&self.cfg);
                Some(self.resolve(verdict, layout, None, now_ms))
            }
        }
    }

    fn resolve(
        &mut self,
        verdict: Verdict,
        (bottom, top): ([IconTag; 2], IconTag),
        key: Option<char>,
        now_ms: u64,
    ) -> RoundEvent {
        self.listener = None;
        self.score.record(verdict.points);
        self.phase = RoundPhase::Resolved;
        self.schedule(TimerKind::NextRound, now_ms + self.cfg.new_round_delay_ms);

        let log = RoundLog {
            round: self.last_round_id,
            bottom,
            top,
            key,
            elapsed_ms: verdict.elapsed_ms,
            resolution: verdict.resolution,
            points: verdict.points,
            game_points: self.score.game_points,
        };

        match (key, verdict.elapsed_ms) {
            (Some(k), Some(elapsed)) => info!(
                round = log.round,
                elapsed_ms = elapsed,
                "{k} pressed after {elapsed} ms: {}, {:+} points",
                verdict.resolution,
                verdict.points
            ),
            _ => info!(round = log.round, "too late, {} points", verdict.points),
        }
        match log.to_json() {
            Ok(json) => info!(target: ROUND_LOG_TARGET, "{json}"),
            Err(e) => warn!("could not serialize round {}: {e}", log.round),
        }

        self.last_log = Some(log.clone());
        RoundEvent::Resolved(log)
    }

    /// Overrides the current round's layout once its bottom pair is revealed.
    #[cfg(test)]
    pub fn force_layout(&mut self, bottom: BottomPair, top: Icon) {
        if let Some(r) = self.round.as_mut() {
            r.bottom = bottom;
            r.top = Some(top);
        }
    }

    #[cfg(test)]
    pub fn inject_timer(&mut self, timer: PendingTimer) { self.pending = Some(timer); }
}
