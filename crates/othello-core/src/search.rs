//! Game tree search engine.

mod context;
pub mod search_result;
mod threading;

use std::sync::Arc;

use crate::board::Board;
use crate::disc::Disc;
use crate::eval::{DEFAULT_CORNER_RULE_THRESHOLD, MoveEvaluator};
use crate::move_list::{Candidate, ConcurrentMoveIterator};
use crate::search::context::SearchContext;
use crate::search::search_result::{Preference, SearchResult, compare};
use crate::search::threading::{WorkerJob, WorkerPool};
use crate::strategy::{EvalMode, StrategySchedule, auto_mode};

/// Identifies which worker produced a progress event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerId {
    Primary,
    Secondary,
}

/// Progress information emitted after each root candidate finishes.
pub struct SearchProgress {
    pub worker: WorkerId,
    pub cand: Candidate,
    /// 1-based position of the candidate on the shared cursor.
    pub completed: usize,
    pub total: usize,
}

/// Type alias for search progress callback.
pub type SearchProgressCallback = dyn Fn(SearchProgress) + Send + Sync + 'static;

/// Engine construction options.
pub struct SearchOptions {
    /// Requested worker count; clamped to the machine and to two.
    pub n_threads: usize,
    /// Turn-indexed strategy table.
    pub schedule: StrategySchedule,
    /// Decided-corner count at which the shape heuristic switches off.
    pub corner_rule_threshold: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            n_threads: 2,
            schedule: StrategySchedule::default(),
            corner_rule_threshold: DEFAULT_CORNER_RULE_THRESHOLD,
        }
    }
}

impl SearchOptions {
    /// Options with a specific strategy schedule.
    #[must_use]
    pub fn with_schedule(mut self, schedule: StrategySchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Override the worker count; `1` forces serial operation.
    #[must_use]
    pub fn with_threads(mut self, n_threads: usize) -> Self {
        self.n_threads = n_threads;
        self
    }
}

/// Per-call options for [`Search::choose_move`].
#[derive(Default)]
pub struct RunOptions {
    /// Current turn number, used to pick the strategy profile.
    pub turn: u32,
    /// Invoked after each candidate finishes evaluating (redraw hook).
    pub callback: Option<Arc<SearchProgressCallback>>,
}

/// A committed answer from the engine.
#[derive(Clone, Debug)]
pub struct Decision {
    /// The chosen move.
    pub cand: Candidate,
    /// The board after playing the chosen move.
    pub board: Board,
    /// The winning outcome, with its snapshot ownership transferred into
    /// `board`.
    pub result: SearchResult,
}

/// Main search engine structure.
///
/// Owns the resident worker pool; create it once per session and reuse it
/// every turn.
pub struct Search {
    pool: WorkerPool,
    schedule: StrategySchedule,
    corner_rule_threshold: u32,
}

impl Search {
    /// Creates a new search engine with the given options.
    pub fn new(options: SearchOptions) -> Search {
        Search {
            pool: WorkerPool::new(options.n_threads),
            schedule: options.schedule,
            corner_rule_threshold: options.corner_rule_threshold,
        }
    }

    /// Whether the engine has a live secondary worker.
    pub fn is_parallel(&self) -> bool {
        self.pool.has_secondary()
    }

    /// Computes the best next move for `color`, or `None` when `color` has
    /// no legal move (an explicit pass, not an error).
    ///
    /// The root candidate list is capped by the turn's strategy profile and
    /// then split between the primary (calling) thread and the secondary
    /// worker through one shared cursor; the two partial bests are merged by
    /// the comparator. The authoritative board is untouched: the caller
    /// commits the returned move.
    pub fn choose_move(&self, board: &Board, color: Disc, opts: &RunOptions) -> Option<Decision> {
        let profile = self.schedule.profile_for(opts.turn);
        let mode = match profile.eval_mode {
            EvalMode::Auto => auto_mode(board, color),
            mode => mode,
        };

        let mut cands = board.legal_moves(color);
        if cands.is_empty() {
            return None;
        }

        if cands.count() == 1 {
            // Nothing to rank; play the forced move directly.
            let cand = *cands.first()?;
            let mut next = *board;
            next.apply_move(cand.x, cand.y, color);
            let scores = next.scores();
            let opcands = next.legal_moves(color.opposite()).count();
            let result = SearchResult {
                cand: Some(cand),
                scores,
                mycands: 1,
                opcands,
                evaluations: SearchResult::scores_as_evaluations(scores),
                critical: false,
                checkmate: false,
                turns: 1,
                board: None,
            };
            return Some(Decision {
                cand,
                board: next,
                result,
            });
        }

        cands.truncate(profile.candidate_limit);
        let cursor = Arc::new(ConcurrentMoveIterator::new(cands));
        let evaluator = MoveEvaluator::for_root(board, self.corner_rule_threshold);

        let submitted = self.pool.submit(WorkerJob {
            board: *board,
            color,
            cursor: cursor.clone(),
            profile,
            mode,
            evaluator,
            callback: opts.callback.clone(),
        });

        let mut ctx = SearchContext::new(
            profile,
            mode,
            evaluator,
            opts.callback.clone(),
            WorkerId::Primary,
        );
        let primary = ctx.evaluate_candidates(board, color, &cursor);
        let secondary = if submitted {
            self.pool.await_result()
        } else {
            None
        };

        // Merge: the losing side's board snapshot is dropped here, the
        // winner's moves on to the caller.
        let winner = match (primary, secondary) {
            (Some(p), Some(s)) => {
                if compare(&p, &s, color, mode) == Preference::Second {
                    Some(s)
                } else {
                    Some(p)
                }
            }
            (Some(p), None) => Some(p),
            (None, s) => s,
        };

        let mut result = winner?;
        let cand = result.cand?;
        let next = result.board.take()?;
        Some(Decision {
            cand,
            board: next,
            result,
        })
    }
}
