//! Search outcome type and the total-preorder comparator.

use rand::RngExt;

use crate::board::Board;
use crate::disc::Disc;
use crate::move_list::Candidate;
use crate::strategy::EvalMode;

/// Outcome of exploring one line of play.
///
/// At most one result at a time owns a board snapshot: ownership moves to the
/// comparator winner, the loser's snapshot is dropped.
#[derive(Clone, Debug)]
pub struct SearchResult {
    /// Root move this outcome descends from (set at the root level only).
    pub cand: Option<Candidate>,
    /// Disc counts as `[white, black]`.
    pub scores: [u32; 2],
    /// Candidate count for the side this outcome belongs to.
    pub mycands: usize,
    /// Opponent reply count after the move.
    pub opcands: usize,
    /// Strategic evaluation per color, `[white, black]`.
    pub evaluations: [i32; 2],
    /// Flagged by the evaluator as a favorable critical shape.
    pub critical: bool,
    /// One color was reduced to zero discs.
    pub checkmate: bool,
    /// Plies of the searching color it took to reach this outcome.
    pub turns: u32,
    /// Board snapshot to commit when this outcome wins.
    pub board: Option<Board>,
}

impl SearchResult {
    /// Evaluation pair oriented for `color`: `weight` for it, `-weight` for
    /// the opponent.
    pub fn oriented(color: Disc, weight: i32) -> [i32; 2] {
        if color == Disc::White {
            [weight, -weight]
        } else {
            [-weight, weight]
        }
    }

    /// Scores reused as a neutral evaluation pair.
    pub fn scores_as_evaluations(scores: [u32; 2]) -> [i32; 2] {
        [scores[0] as i32, scores[1] as i32]
    }
}

/// Which of two compared outcomes is preferred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preference {
    First,
    Second,
}

impl Preference {
    #[inline]
    fn flip(self) -> Preference {
        match self {
            Preference::First => Preference::Second,
            Preference::Second => Preference::First,
        }
    }
}

#[inline]
fn sign<T: PartialOrd>(a: T, b: T) -> Option<Preference> {
    if a > b {
        Some(Preference::First)
    } else if a < b {
        Some(Preference::Second)
    } else {
        None
    }
}

/// Ranks outcome `a` against `b` for `color` under `mode`.
///
/// A total preorder decided by the first applicable rule; exact ties at the
/// bottom of the cascade fall to a coin flip, accepted nondeterminism that
/// keeps play varied.
pub fn compare(a: &SearchResult, b: &SearchResult, color: Disc, mode: EvalMode) -> Preference {
    use Preference::{First, Second};

    // Checkmate is the best; between two, the shorter line.
    if a.checkmate {
        if b.checkmate {
            return if a.turns <= b.turns { First } else { Second };
        }
        return First;
    }
    if b.checkmate {
        return Second;
    }

    let idx = color.index();
    let sign_eval = sign(a.evaluations[idx], b.evaluations[idx]);
    let sign_scores = sign(a.scores[idx], b.scores[idx]);
    let sign_turns = sign(b.turns, a.turns);
    let sign_mycands = sign(a.mycands, b.mycands);

    // Favorable critical outcomes beat everything else below checkmate.
    if a.critical && a.evaluations[idx] > 0 {
        if b.critical && b.evaluations[idx] > 0 {
            if let Some(p) = sign_turns {
                return p;
            }
            if let Some(p) = sign_eval {
                return p;
            }
            if let Some(p) = sign_scores {
                return p;
            }
        } else {
            return First;
        }
    } else if b.critical && b.evaluations[idx] > 0 {
        return Second;
    }

    // A negative evaluation never beats a non-negative one.
    if a.evaluations[idx] < 0 {
        return if b.evaluations[idx] < 0 {
            sign_eval.unwrap_or(Second)
        } else {
            Second
        };
    }
    if b.evaluations[idx] < 0 {
        return First;
    }

    match mode {
        EvalMode::Pieces => {
            if let Some(p) = sign_scores {
                return p;
            }
            if let Some(p) = sign_mycands {
                return p;
            }
        }
        EvalMode::PiecesInverse => {
            if let Some(p) = sign_scores {
                return p.flip();
            }
            if let Some(p) = sign_mycands {
                return p;
            }
        }
        EvalMode::ManyPlaces => {
            if let Some(p) = sign_mycands {
                return p;
            }
        }
        // Auto resolves before search; FewCandidates is the cascade below.
        _ => {}
    }

    if let Some(p) = sign(b.opcands, a.opcands) {
        return p;
    }
    if let Some(p) = sign_mycands {
        return p;
    }
    if let Some(p) = sign_scores {
        return p;
    }
    if let Some(p) = sign_eval {
        return p;
    }
    if let Some(p) = sign_turns {
        return p;
    }

    if rand::rng().random_bool(0.5) { First } else { Second }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> SearchResult {
        SearchResult {
            cand: None,
            scores: [10, 10],
            mycands: 4,
            opcands: 4,
            evaluations: [0, 0],
            critical: false,
            checkmate: false,
            turns: 1,
            board: None,
        }
    }

    #[test]
    fn test_checkmate_beats_everything() {
        let mut a = result();
        a.checkmate = true;
        a.turns = 3;
        let mut b = result();
        b.critical = true;
        b.evaluations = [500_000, -500_000];
        b.scores = [30, 2];
        for color in [Disc::White, Disc::Black] {
            assert_eq!(compare(&a, &b, color, EvalMode::Pieces), Preference::First);
            assert_eq!(compare(&b, &a, color, EvalMode::Pieces), Preference::Second);
        }
    }

    #[test]
    fn test_faster_checkmate_wins() {
        let mut a = result();
        a.checkmate = true;
        a.turns = 1;
        let mut b = result();
        b.checkmate = true;
        b.turns = 2;
        assert_eq!(compare(&a, &b, Disc::White, EvalMode::Pieces), Preference::First);
        assert_eq!(compare(&b, &a, Disc::White, EvalMode::Pieces), Preference::Second);
    }

    #[test]
    fn test_positive_critical_beats_ordinary() {
        let mut a = result();
        a.critical = true;
        a.evaluations = [7_000, -7_000];
        let b = result();
        assert_eq!(compare(&a, &b, Disc::White, EvalMode::Pieces), Preference::First);
        assert_eq!(compare(&b, &a, Disc::White, EvalMode::Pieces), Preference::Second);
        // For Black the same result reads as negative and loses.
        assert_eq!(compare(&a, &b, Disc::Black, EvalMode::Pieces), Preference::Second);
    }

    #[test]
    fn test_two_criticals_prefer_fewer_turns_then_eval() {
        let mut a = result();
        a.critical = true;
        a.evaluations = [5_000, -5_000];
        a.turns = 2;
        let mut b = result();
        b.critical = true;
        b.evaluations = [9_000, -9_000];
        b.turns = 3;
        assert_eq!(compare(&a, &b, Disc::White, EvalMode::Pieces), Preference::First);

        b.turns = 2;
        assert_eq!(compare(&a, &b, Disc::White, EvalMode::Pieces), Preference::Second);
    }

    #[test]
    fn test_negative_eval_always_loses() {
        let mut a = result();
        a.evaluations = [-2_000, 2_000];
        let b = result();
        assert_eq!(compare(&a, &b, Disc::White, EvalMode::Pieces), Preference::Second);
        assert_eq!(compare(&b, &a, Disc::White, EvalMode::Pieces), Preference::First);
        // Between two negatives the higher evaluation survives.
        let mut c = result();
        c.evaluations = [-500, 500];
        assert_eq!(compare(&a, &c, Disc::White, EvalMode::Pieces), Preference::Second);
        assert_eq!(compare(&c, &a, Disc::White, EvalMode::Pieces), Preference::First);
    }

    #[test]
    fn test_mode_pieces() {
        let mut a = result();
        a.scores = [12, 8];
        let mut b = result();
        b.scores = [9, 11];
        assert_eq!(compare(&a, &b, Disc::White, EvalMode::Pieces), Preference::First);
        assert_eq!(compare(&a, &b, Disc::Black, EvalMode::Pieces), Preference::Second);
    }

    #[test]
    fn test_mode_pieces_inverse() {
        let mut a = result();
        a.scores = [12, 8];
        let mut b = result();
        b.scores = [9, 11];
        assert_eq!(
            compare(&a, &b, Disc::White, EvalMode::PiecesInverse),
            Preference::Second
        );
        assert_eq!(
            compare(&a, &b, Disc::Black, EvalMode::PiecesInverse),
            Preference::First
        );
    }

    #[test]
    fn test_mode_many_places() {
        let mut a = result();
        a.mycands = 7;
        a.scores = [2, 2];
        let mut b = result();
        b.mycands = 3;
        b.scores = [20, 20];
        assert_eq!(
            compare(&a, &b, Disc::White, EvalMode::ManyPlaces),
            Preference::First
        );
        assert_eq!(
            compare(&b, &a, Disc::White, EvalMode::ManyPlaces),
            Preference::Second
        );
    }

    #[test]
    fn test_fallback_prefers_fewer_opponent_candidates() {
        let mut a = result();
        a.opcands = 2;
        let mut b = result();
        b.opcands = 5;
        assert_eq!(
            compare(&a, &b, Disc::White, EvalMode::FewCandidates),
            Preference::First
        );
        assert_eq!(
            compare(&b, &a, Disc::White, EvalMode::FewCandidates),
            Preference::Second
        );
    }

    /// compare(a, b) == First exactly when compare(b, a) == Second, for every
    /// pair that does not reach the coin flip.
    #[test]
    fn test_antisymmetry_on_non_tied_inputs() {
        let mut variants = Vec::new();
        for (checkmate, critical, eval, score, my, op, turns) in [
            (true, false, 0, 10, 4, 4, 1),
            (true, false, 0, 10, 4, 4, 2),
            (false, true, 9_000, 10, 4, 4, 1),
            (false, true, 5_000, 12, 3, 4, 2),
            (false, false, -700, 10, 4, 4, 1),
            (false, false, 0, 12, 4, 4, 1),
            (false, false, 0, 10, 6, 2, 1),
            (false, false, 0, 10, 4, 4, 3),
        ] {
            let mut r = result();
            r.checkmate = checkmate;
            r.critical = critical;
            r.evaluations = [eval, -eval];
            r.scores = [score, 20 - score];
            r.mycands = my;
            r.opcands = op;
            r.turns = turns;
            variants.push(r);
        }

        for mode in [
            EvalMode::Pieces,
            EvalMode::PiecesInverse,
            EvalMode::FewCandidates,
            EvalMode::ManyPlaces,
        ] {
            for a in &variants {
                for b in &variants {
                    let ab = compare(a, b, Disc::White, mode);
                    let ba = compare(b, a, Disc::White, mode);
                    // Skip exact ties: those may legitimately coin-flip, and
                    // equal-turn checkmates prefer the first argument.
                    if ab == ba {
                        continue;
                    }
                    assert_eq!(ab, ba.flip());
                }
            }
        }
    }
}
