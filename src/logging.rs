use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::TimingConfig;
use crate::input::claimed_side;
use crate::judge::{apply_points, judge_answer, judge_timeout};
use crate::types::*;

/// Log target for the per-round JSON lines.
pub const ROUND_LOG_TARGET: &str = "bevy_pairmatch::round";

/// One resolved round, as emitted on the round log target.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundLog {
    pub round: u64,
    pub bottom: [IconTag; 2],
    pub top: IconTag,
    pub key: Option<char>,
    pub elapsed_ms: Option<u64>,
    pub resolution: Resolution,
    pub points: i32,
    pub game_points: u64,
}

impl RoundLog {
    pub fn to_json(&self) -> serde_json::Result<String> { serde_json::to_string(self) }
    pub fn from_json(s: &str) -> serde_json::Result<Self> { serde_json::from_str(s) }
}

#[derive(Debug, Error)]
pub enum LogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Json { line: usize, source: serde_json::Error },
    #[error("line {line}: round log entry without a JSON record")]
    MissingRecord { line: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplayError {
    #[error("round {round}: keyed answer without a valid key or elapsed time")]
    MissingInput { round: u64 },
    #[error("round {round}: timeout recorded with a key or elapsed time")]
    TimeoutWithInput { round: u64 },
    #[error("round {round}: elapsed {elapsed_ms} ms is outside the {window_ms} ms window")]
    ElapsedOutOfWindow { round: u64, elapsed_ms: u64, window_ms: u64 },
    #[error("round {round}: expected {expected} for {expected_points} points, log says {found} for {found_points}")]
    OutcomeMismatch {
        round: u64,
        expected: Resolution,
        expected_points: i32,
        found: Resolution,
        found_points: i32,
    },
    #[error("round {round}: cumulative points should be {expected}, log says {found}")]
    GamePointsMismatch { round: u64, expected: u64, found: u64 },
}

/// Re-judges a single round from its recorded inputs.
pub fn replay_round(log: &RoundLog, cfg: &TimingConfig) -> Result<(), ReplayError> {
    let pair = [icon_for(log.bottom[0]), icon_for(log.bottom[1])];
    let top = icon_for(log.top);
    let verdict = match log.resolution {
        Resolution::TooLate => {
            if log.key.is_some() || log.elapsed_ms.is_some() {
                return Err(ReplayError::TimeoutWithInput { round: log.round });
            }
            judge_timeout(cfg)
        }
        Resolution::Correct | Resolution::Miss => {
            let side = log.key.and_then(claimed_side);
            match (side, log.elapsed_ms) {
                (Some(_), Some(elapsed)) if elapsed >= cfg.round_window_ms => {
                    return Err(ReplayError::ElapsedOutOfWindow {
                        round: log.round,
                        elapsed_ms: elapsed,
                        window_ms: cfg.round_window_ms,
                    });
                }
                (Some(side), Some(elapsed)) => judge_answer(top, &pair, side, elapsed, cfg),
                _ => return Err(ReplayError::MissingInput { round: log.round }),
            }
        }
    };
    if verdict.resolution != log.resolution || verdict.points != log.points {
        return Err(ReplayError::OutcomeMismatch {
            round: log.round,
            expected: verdict.resolution,
            expected_points: verdict.points,
            found: log.resolution,
            found_points: log.points,
        });
    }
    Ok(())
}

/// Re-judges every round and checks the cumulative chain, starting from zero.
pub fn replay_session(rounds: &[RoundLog], cfg: &TimingConfig) -> Result<u64, ReplayError> {
    let mut game_points = 0;
    for log in rounds {
        replay_round(log, cfg)?;
        game_points = apply_points(game_points, log.points);
        if game_points != log.game_points {
            return Err(ReplayError::GamePointsMismatch {
                round: log.round,
                expected: game_points,
                found: log.game_points,
            });
        }
    }
    Ok(game_points)
}

/// Drops ANSI escape sequences (terminal colours) from a captured log line.
fn strip_ansi(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        if chars.next() == Some('[') {
            // CSI: parameters, then one final byte in '@'..='~'.
            for c in chars.by_ref() {
                if ('@'..='~').contains(&c) { break; }
            }
        }
    }
    out
}

/// Extracts round records from captured game output.
///
/// Accepts bare JSON lines and formatted log lines on [`ROUND_LOG_TARGET`]
/// (timestamp, level and target in front of the record). Other lines are skipped.
pub fn parse_log(content: &str) -> Result<Vec<RoundLog>, LogError> {
    let mut rounds = Vec::new();
    for (i, raw) in content.lines().enumerate() {
        let line = strip_ansi(raw);
        let line = line.trim();
        let json = if line.starts_with('{') {
            line
        } else if line.contains(ROUND_LOG_TARGET) {
            match line.find('{') {
                Some(start) => &line[start..],
                None => return Err(LogError::MissingRecord { line: i + 1 }),
            }
        } else {
            continue;
        };
        let log = RoundLog::from_json(json).map_err(|source| LogError::Json { line: i + 1, source })?;
        rounds.push(log);
    }
    Ok(rounds)
}

pub fn load_log(path: &Path) -> Result<Vec<RoundLog>, LogError> {
    let content = fs::read_to_string(path)?;
    parse_log(&content)
}
