//! Episode scoring against the oracles.
//!
//! Replays an episode transcript turn by turn. For every turn the primary
//! side's accepted move is compared with the oracle from the pre-move
//! state:
//!
//! - one side: the sequence oracle's next optimal move
//! - two sides: the adversarial oracle's best move with the primary side
//!   minimizing
//!
//! A turn scores 1.0 only when the accepted placement is exactly the one the
//! oracle's move reaches; an equally good alternative still scores 0.0.
//! Aborted episodes are scored, not discarded: they get zero speed but keep
//! their progress credit.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::{SideId, SideMap, TokenPositions, DEFAULT_ATTEMPT_LIMIT};
use crate::engine::{EpisodeEvent, EpisodeReport, EpisodeStatus};
use crate::instance::Instance;
use crate::oracle::{AdversarialOracle, MinimaxConfig, SequenceOracle, SimState};
use crate::rules::{legal_moves, Move};

/// Scores of one turn of the primary side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnScore {
    pub turn: usize,
    /// 1.0 for an optimal accepted move, 0.0 otherwise.
    pub accuracy: f64,
    /// `1 - reprompts / attempt_limit`.
    pub efficiency: f64,
    /// Parse failures as a percentage of all failed replies.
    pub parse_error_share: f64,
    pub reprompts: u32,
    pub parse_errors: u32,
    pub rule_errors: u32,
    pub accepted: bool,
}

/// Scores of a whole episode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeScores {
    pub turns: Vec<TurnScore>,
    /// `min_moves / turns_played * 100`; 0 when aborted.
    pub speed: f64,
    pub aborted: bool,
    pub success: bool,
    pub lose: bool,
    pub turn_limit_reached: bool,
    /// `1 - reprompts / (turns * attempt_limit)`.
    pub efficiency: f64,
    /// Mean turn accuracy, in percent.
    pub move_accuracy: f64,
    /// Parse failures as a percentage of all failed replies.
    pub parse_error_share: f64,
    /// Failed replies per accepted move.
    pub errors_per_accepted_move: f64,
    /// Primary token progress as a percentage of the full track.
    pub progress: f64,
}

/// Scorer for the primary side.
#[derive(Clone, Debug)]
pub struct Scorer {
    attempt_limit: u32,
    minimax: MinimaxConfig,
}

impl Default for Scorer {
    fn default() -> Self {
        Self {
            attempt_limit: DEFAULT_ATTEMPT_LIMIT,
            minimax: MinimaxConfig::default(),
        }
    }
}

#[derive(Default)]
struct TurnLog {
    start: Option<SideMap<TokenPositions>>,
    accepted: Option<(TokenPositions, TokenPositions)>,
    reprompts: u32,
    parse_errors: u32,
    rule_errors: u32,
}

impl Scorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt limit for transcripts that do not record one.
    pub fn with_attempt_limit(mut self, limit: u32) -> Self {
        self.attempt_limit = limit.max(1);
        self
    }

    /// Search configuration for two-side accuracy.
    pub fn with_minimax_config(mut self, config: MinimaxConfig) -> Self {
        self.minimax = config;
        self
    }

    /// Score `report`, an episode played on `instance`.
    pub fn score(&self, instance: &Instance, report: &EpisodeReport) -> EpisodeScores {
        let aborted = report.status == EpisodeStatus::Aborted;
        // The aborted turn was started, so it is scored too.
        let turns_started = report.turns_played + usize::from(aborted);
        let logs = self.collect(report, turns_started);
        let attempt_limit = self.recorded_attempt_limit(report);

        let turns: Vec<TurnScore> = logs
            .iter()
            .enumerate()
            .map(|(turn, log)| self.score_turn(instance, turn, log, attempt_limit))
            .collect();

        let reprompts: u32 = turns.iter().map(|t| t.reprompts).sum();
        let parse_errors: u32 = turns.iter().map(|t| t.parse_errors).sum();
        let errors: u32 = parse_errors + turns.iter().map(|t| t.rule_errors).sum::<u32>();
        let accepted = turns.iter().filter(|t| t.accepted).count();

        let speed = if aborted || report.turns_played == 0 {
            0.0
        } else {
            f64::from(instance.min_moves) / report.turns_played as f64 * 100.0
        };
        let max_retries = (turns_started.max(1) as f64) * f64::from(attempt_limit);
        let move_accuracy = if turns.is_empty() {
            0.0
        } else {
            turns.iter().map(|t| t.accuracy).sum::<f64>() / turns.len() as f64 * 100.0
        };

        let board = &report.board;
        let full_track = (board.n_tokens() * usize::from(board.n_fields())) as f64;
        let progress = f64::from(board.positions(SideId::PRIMARY).progress()) / full_track * 100.0;

        let scores = EpisodeScores {
            speed,
            aborted,
            success: report.status == EpisodeStatus::Win,
            lose: report.status == EpisodeStatus::Lose,
            turn_limit_reached: report.status == EpisodeStatus::Draw,
            efficiency: 1.0 - f64::from(reprompts) / max_retries,
            move_accuracy,
            parse_error_share: share(parse_errors, errors),
            errors_per_accepted_move: if accepted == 0 {
                f64::from(errors)
            } else {
                f64::from(errors) / accepted as f64
            },
            progress,
            turns,
        };
        debug!(
            "scored {}: status={} accuracy={:.1} speed={:.1} efficiency={:.3}",
            instance.game_id, report.status, scores.move_accuracy, scores.speed, scores.efficiency
        );
        scores
    }

    /// The limit recorded in the episode metadata, else the configured one.
    fn recorded_attempt_limit(&self, report: &EpisodeReport) -> u32 {
        report
            .transcript
            .iter()
            .find_map(|record| match &record.event {
                EpisodeEvent::Metadata(metadata) => Some(metadata.attempt_limit),
                _ => None,
            })
            .unwrap_or(self.attempt_limit)
            .max(1)
    }

    /// Group the primary side's events by turn.
    fn collect(&self, report: &EpisodeReport, turns_started: usize) -> Vec<TurnLog> {
        let mut logs: Vec<TurnLog> = (0..turns_started).map(|_| TurnLog::default()).collect();
        for record in report.transcript.iter() {
            let Some(log) = logs.get_mut(record.turn) else {
                continue;
            };
            match &record.event {
                EpisodeEvent::CurrentState { positions } => log.start = Some(positions.clone()),
                _ if record.side != Some(SideId::PRIMARY) => {}
                EpisodeEvent::AcceptedMove { before, after, .. } => {
                    log.accepted = Some((before.clone(), after.clone()))
                }
                EpisodeEvent::Reprompt { .. } => log.reprompts += 1,
                EpisodeEvent::ParseFailed { .. } => log.parse_errors += 1,
                EpisodeEvent::Error { .. } => log.rule_errors += 1,
                _ => {}
            }
        }
        logs
    }

    fn score_turn(
        &self,
        instance: &Instance,
        turn: usize,
        log: &TurnLog,
        attempt_limit: u32,
    ) -> TurnScore {
        let accuracy = match (&log.accepted, &log.start) {
            (Some((before, after)), Some(start)) => {
                if self.is_optimal(instance, turn, start, before, after) {
                    1.0
                } else {
                    0.0
                }
            }
            _ => 0.0,
        };

        TurnScore {
            turn,
            accuracy,
            efficiency: 1.0 - f64::from(log.reprompts) / f64::from(attempt_limit),
            parse_error_share: share(log.parse_errors, log.parse_errors + log.rule_errors),
            reprompts: log.reprompts,
            parse_errors: log.parse_errors,
            rule_errors: log.rule_errors,
            accepted: log.accepted.is_some(),
        }
    }

    /// Whether `after` is the placement the oracle's move reaches.
    ///
    /// Where the oracle has no move (an unsolvable position) the reference is
    /// the first legal move, as played by a search-driven side.
    fn is_optimal(
        &self,
        instance: &Instance,
        turn: usize,
        start: &SideMap<TokenPositions>,
        before: &TokenPositions,
        after: &TokenPositions,
    ) -> bool {
        let n_fields = instance.n_fields;

        let best = if instance.side_count() == 1 {
            SequenceOracle::new(instance.rolls.side_rolls(SideId::PRIMARY), n_fields)
                .solve(before, turn)
                .next_move()
        } else {
            let Ok(oracle) =
                AdversarialOracle::from_sequence(&instance.rolls, n_fields, self.minimax.clone())
            else {
                return false;
            };
            oracle
                .search(&SimState::new(start.clone(), turn, SideId::PRIMARY))
                .best_move
        };

        let reference: Option<Move> = best.or_else(|| {
            let roll = instance.rolls.roll(turn, SideId::PRIMARY)?;
            legal_moves(before, roll, n_fields).first().copied()
        });
        reference.is_some_and(|m| m.apply(before) == *after)
    }
}

fn share(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        f64::from(part) / f64::from(whole) * 100.0
    }
}
