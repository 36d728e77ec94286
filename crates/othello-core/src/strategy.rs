//! Per-turn search configuration: candidate caps, depth and evaluation mode.

use crate::board::Board;
use crate::disc::Disc;

/// Criterion used by the comparator to rank two search outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalMode {
    /// Resolved per turn from the asking color's live piece ratio.
    Auto,
    /// More own pieces wins.
    Pieces,
    /// Fewer own pieces wins (early-game material restraint).
    PiecesInverse,
    /// Ranked by the fallback cascade, whose first rule prefers leaving the
    /// opponent fewer candidates.
    FewCandidates,
    /// More own candidates wins outright.
    ManyPlaces,
}

/// Search configuration for one stretch of the game.
#[derive(Debug, Clone, Copy)]
pub struct StrategyProfile {
    /// Maximum number of root/inner candidates explored per node.
    pub candidate_limit: usize,
    /// Depth ceiling counted in full plies of the searching color.
    pub max_depth: u32,
    /// Outcome ranking criterion.
    pub eval_mode: EvalMode,
}

impl Default for StrategyProfile {
    fn default() -> Self {
        profile(16, 2, EvalMode::PiecesInverse)
    }
}

const fn profile(candidate_limit: usize, max_depth: u32, eval_mode: EvalMode) -> StrategyProfile {
    StrategyProfile {
        candidate_limit,
        max_depth,
        eval_mode,
    }
}

/// Turn-indexed strategy tables. Each entry applies from its turn number
/// until the next entry's turn number.
#[rustfmt::skip]
const SCHEDULES: [&[(u32, StrategyProfile)]; 3] = [
    &[
        (0,  profile(16, 1, EvalMode::PiecesInverse)),
        (8,  profile(16, 2, EvalMode::FewCandidates)),
        (16, profile(16, 4, EvalMode::Auto)),
        (32, profile(16, 4, EvalMode::Pieces)),
    ],
    &[
        (0,  profile(16, 1, EvalMode::PiecesInverse)),
        (6,  profile(16, 2, EvalMode::PiecesInverse)),
        (10, profile(16, 3, EvalMode::FewCandidates)),
        (22, profile(16, 4, EvalMode::Auto)),
        (32, profile(16, 4, EvalMode::Pieces)),
    ],
    &[
        (0,  profile(16, 1, EvalMode::Auto)),
        (8,  profile(16, 2, EvalMode::Auto)),
        (16, profile(16, 4, EvalMode::Auto)),
    ],
];

/// An ordered turn-indexed table of strategy profiles.
#[derive(Debug, Clone)]
pub struct StrategySchedule {
    entries: Vec<(u32, StrategyProfile)>,
}

impl Default for StrategySchedule {
    fn default() -> Self {
        StrategySchedule::builtin(0)
    }
}

impl StrategySchedule {
    /// Builds a schedule from (turn, profile) entries.
    pub fn new(mut entries: Vec<(u32, StrategyProfile)>) -> StrategySchedule {
        entries.sort_by_key(|&(turn, _)| turn);
        StrategySchedule { entries }
    }

    /// A schedule that applies one profile for the whole game.
    pub fn fixed(profile: StrategyProfile) -> StrategySchedule {
        StrategySchedule {
            entries: vec![(0, profile)],
        }
    }

    /// Number of built-in schedules.
    pub fn builtin_count() -> usize {
        SCHEDULES.len()
    }

    /// Returns one of the built-in schedules.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range; see [`StrategySchedule::builtin_count`].
    pub fn builtin(index: usize) -> StrategySchedule {
        StrategySchedule {
            entries: SCHEDULES[index].to_vec(),
        }
    }

    /// Returns the profile in effect at `turn`: the entry with the largest
    /// turn number not exceeding it.
    pub fn profile_for(&self, turn: u32) -> StrategyProfile {
        self.entries
            .iter()
            .rev()
            .find(|&&(t, _)| t <= turn)
            .map(|&(_, p)| p)
            .unwrap_or_default()
    }
}

/// Resolves [`EvalMode::Auto`] for `color` on `board`.
///
/// Deliberately asymmetric: only the asking (CPU) color's live piece ratio is
/// consulted, never both sides uniformly.
pub fn auto_mode(board: &Board, color: Disc) -> EvalMode {
    let scores = board.scores();
    let total = scores[0] + scores[1];
    if total == 0 {
        return EvalMode::Pieces;
    }
    let ratio = scores[color.index()] as f32 / total as f32;

    if ratio >= 0.8 {
        EvalMode::Pieces
    } else if ratio >= 0.6 {
        EvalMode::FewCandidates
    } else if ratio >= 0.2 {
        EvalMode::ManyPlaces
    } else {
        EvalMode::Pieces
    }
}
