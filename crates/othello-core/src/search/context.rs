//! Per-worker search state and the recursive game-tree walk.

use std::sync::Arc;

use crate::board::Board;
use crate::disc::Disc;
use crate::eval::MoveEvaluator;
use crate::move_list::{Candidate, ConcurrentMoveIterator};
use crate::search::search_result::{Preference, SearchResult, compare};
use crate::search::{SearchProgress, SearchProgressCallback, WorkerId};
use crate::strategy::{EvalMode, StrategyProfile};

/// Evaluation magnitude of a decisive line (zero discs / confirmed loss).
const DECISIVE_WEIGHT: i32 = 99_999;

/// Evaluation magnitude of a forced pass found inside the tree.
const NO_REPLY_WEIGHT: i32 = 100_000;

/// Expansion of the deep queue stops once a returned result is non-critical
/// or critical below this evaluation bar. Empirical cost bound.
const DEEP_EXPANSION_BAR: i32 = 750_000;

/// State one worker carries through a search: the per-turn profile, the
/// resolved evaluation mode and the move evaluator. Workers never share this.
pub(crate) struct SearchContext {
    profile: StrategyProfile,
    mode: EvalMode,
    evaluator: MoveEvaluator,
    callback: Option<Arc<SearchProgressCallback>>,
    worker: WorkerId,
}

impl SearchContext {
    pub(crate) fn new(
        profile: StrategyProfile,
        mode: EvalMode,
        evaluator: MoveEvaluator,
        callback: Option<Arc<SearchProgressCallback>>,
        worker: WorkerId,
    ) -> SearchContext {
        SearchContext {
            profile,
            mode,
            evaluator,
            callback,
            worker,
        }
    }

    fn report(&self, cand: Candidate, completed: usize, total: usize) {
        if let Some(callback) = &self.callback {
            callback(SearchProgress {
                worker: self.worker,
                cand,
                completed,
                total,
            });
        }
    }

    /// Root worker loop: pulls candidates from the shared cursor until it is
    /// exhausted and keeps the comparator-best outcome.
    ///
    /// A candidate that wipes the opponent off the board is decisive and
    /// returned immediately, skipping whatever the cursor still holds.
    pub(crate) fn evaluate_candidates(
        &mut self,
        root: &Board,
        color: Disc,
        cursor: &ConcurrentMoveIterator,
    ) -> Option<SearchResult> {
        let total = cursor.count();
        let opponent = color.opposite();
        let mut best: Option<SearchResult> = None;

        while let Some((cand, n)) = cursor.next() {
            let mut next = *root;
            if next.apply_move(cand.x, cand.y, color) == 0 {
                continue;
            }
            let scores = next.scores();
            let opcands = next.legal_moves(opponent).count();

            if scores[opponent.index()] == 0 {
                self.report(cand, n, total);
                // Decisive: skip whatever the cursor still holds.
                return Some(SearchResult {
                    cand: Some(cand),
                    scores,
                    mycands: total,
                    opcands,
                    evaluations: SearchResult::oriented(color, DECISIVE_WEIGHT),
                    critical: false,
                    checkmate: true,
                    turns: 0,
                    board: Some(next),
                });
            }

            let outcome = if opcands == 0 {
                SearchResult {
                    cand: None,
                    scores,
                    mycands: total,
                    opcands,
                    evaluations: SearchResult::oriented(color, NO_REPLY_WEIGHT),
                    critical: true,
                    checkmate: false,
                    turns: 0,
                    board: None,
                }
            } else {
                let weight = self.evaluator.evaluate(&next, cand.x, cand.y, color);
                if weight != 0 {
                    SearchResult {
                        cand: None,
                        scores,
                        mycands: total,
                        opcands,
                        evaluations: SearchResult::oriented(color, weight),
                        critical: weight > 0,
                        checkmate: false,
                        turns: 0,
                        board: None,
                    }
                } else {
                    // Each root candidate's subtree starts from a clean slate;
                    // worker bests are only merged at this level.
                    match self.deep(&next, color, opponent, 0, None) {
                        Some(result) => result,
                        // Every line below is a confirmed loss; keep the move
                        // with a heavily negative mark so the engine still
                        // answers when all candidates lose.
                        None => SearchResult {
                            cand: None,
                            scores,
                            mycands: total,
                            opcands,
                            evaluations: SearchResult::oriented(color, -DECISIVE_WEIGHT),
                            critical: false,
                            checkmate: false,
                            turns: 0,
                            board: None,
                        },
                    }
                }
            };

            self.report(cand, n, total);

            let better = match &best {
                None => true,
                Some(incumbent) => compare(&outcome, incumbent, color, self.mode) == Preference::First,
            };
            if better {
                best = Some(outcome.take_ownership(cand, next));
            }
        }

        best
    }

    /// Depth-first walk below one root move.
    ///
    /// `turn_color` is the searching side, `place_color` the side to move at
    /// this node, `level` the count of completed own plies. `best` is the
    /// best outcome seen so far on this worker's line.
    ///
    /// Returns `None` when every line through this node is a confirmed loss;
    /// the caller discards the candidate that led here and moves on.
    fn deep(
        &mut self,
        board: &Board,
        turn_color: Disc,
        place_color: Disc,
        level: u32,
        mut best: Option<SearchResult>,
    ) -> Option<SearchResult> {
        let myturn = turn_color == place_color;
        let opponent = place_color.opposite();
        let scores = board.scores();

        let mut cands = board.legal_moves(place_color);
        if cands.is_empty() {
            if myturn {
                // The searching side is out of moves here: a lost branch.
                return None;
            }
            // The opponent passes; not a win by itself, but flagged like one
            // so the comparator prefers lines that corner the opponent.
            return Some(SearchResult {
                cand: None,
                scores,
                mycands: 0,
                opcands: 0,
                evaluations: SearchResult::scores_as_evaluations(scores),
                critical: false,
                checkmate: true,
                turns: level,
                board: None,
            });
        }
        cands.truncate(self.profile.candidate_limit);
        let n_cands = cands.count();

        // Candidates worth a deeper look, kept best-first.
        let mut deep_queue: Vec<(Candidate, SearchResult)> = Vec::new();

        for &cand in cands.iter() {
            let mut next = *board;
            if next.apply_move(cand.x, cand.y, place_color) == 0 {
                continue;
            }
            let sc = next.scores();
            let opcands = next.legal_moves(opponent).count();

            if sc[opponent.index()] == 0 {
                if myturn {
                    // Decisive for the searching side: no sibling can beat it.
                    return Some(SearchResult {
                        cand: None,
                        scores: sc,
                        mycands: n_cands,
                        opcands,
                        evaluations: SearchResult::scores_as_evaluations(sc),
                        critical: false,
                        checkmate: true,
                        turns: level,
                        board: None,
                    });
                }
                // The opponent can erase the searching side from the board:
                // the node above must not enter this line at all.
                return None;
            }

            let outcome = if opcands == 0 {
                let weight = if myturn { NO_REPLY_WEIGHT } else { -NO_REPLY_WEIGHT };
                SearchResult {
                    cand: None,
                    scores: sc,
                    mycands: n_cands,
                    opcands,
                    evaluations: SearchResult::oriented(place_color, weight),
                    critical: true,
                    checkmate: false,
                    turns: level,
                    board: None,
                }
            } else {
                let weight = self.evaluator.evaluate(&next, cand.x, cand.y, place_color);
                let mut expand;
                let shallow = if weight < 0 {
                    // On the mover's own turn a bad shape is never explored
                    // further: the mover would not choose it. Reached through
                    // the opponent it stays on the expansion queue, since the
                    // defender may have to accept it.
                    expand = !myturn;
                    SearchResult {
                        cand: None,
                        scores: sc,
                        mycands: n_cands,
                        opcands,
                        evaluations: SearchResult::oriented(place_color, weight),
                        critical: false,
                        checkmate: false,
                        turns: level,
                        board: None,
                    }
                } else if weight > 0 {
                    // The gain is already locked in on the mover's own turn.
                    expand = !myturn;
                    SearchResult {
                        cand: None,
                        scores: sc,
                        mycands: n_cands,
                        opcands,
                        evaluations: SearchResult::oriented(place_color, weight),
                        critical: true,
                        checkmate: false,
                        turns: level,
                        board: None,
                    }
                } else {
                    expand = true;
                    SearchResult {
                        cand: None,
                        scores: sc,
                        mycands: n_cands,
                        opcands,
                        evaluations: SearchResult::scores_as_evaluations(sc),
                        critical: false,
                        checkmate: false,
                        turns: level,
                        board: None,
                    }
                };

                // Depth ceiling: own plies stop the recursion, the static
                // result stands.
                if myturn && level == self.profile.max_depth {
                    expand = false;
                }

                if expand {
                    let pos = deep_queue
                        .iter()
                        .position(|(_, queued)| {
                            compare(&shallow, queued, place_color, self.mode) == Preference::First
                        })
                        .unwrap_or(deep_queue.len());
                    deep_queue.insert(pos, (cand, shallow));
                    continue;
                }
                shallow
            };

            best = Some(match best {
                None => outcome,
                Some(incumbent) => {
                    if compare(&outcome, &incumbent, place_color, self.mode) == Preference::First {
                        outcome
                    } else {
                        incumbent
                    }
                }
            });
        }

        // Expand the queue best-first; one ply is complete once the opponent
        // has answered, so the level steps only on the opponent's entries.
        for (cand, _) in deep_queue {
            let mut next = *board;
            next.apply_move(cand.x, cand.y, place_color);
            let sub = self.deep(
                &next,
                turn_color,
                opponent,
                level + if myturn { 0 } else { 1 },
                best.clone(),
            );
            if let Some(result) = sub {
                let stop = !result.critical
                    || result.evaluations[place_color.index()] < DEEP_EXPANSION_BAR;
                best = Some(match best {
                    None => result,
                    Some(incumbent) => {
                        if compare(&result, &incumbent, place_color, self.mode)
                            == Preference::First
                        {
                            result
                        } else {
                            incumbent
                        }
                    }
                });
                if stop {
                    break;
                }
            }
        }

        best
    }
}

impl SearchResult {
    /// Attaches the winning root move and its board snapshot, releasing
    /// whatever snapshot the result carried before.
    fn take_ownership(mut self, cand: Candidate, board: Board) -> SearchResult {
        self.cand = Some(cand);
        self.board = Some(board);
        self
    }
}
