//! Strategic weighting of candidate moves.
//!
//! Raw piece and flip counts misprice Othello: corner and edge control
//! dominates. The evaluator classifies a just-played move by probing shape
//! rules around the board's corners (folded through its 8-fold symmetry) and
//! by scanning the replies the move leaves open to the opponent.

mod shape;

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::disc::Disc;
use crate::eval::shape::Shape;

/// Weight returned when the move leaves the opponent without a reply.
pub const FORCED_PASS_WEIGHT: i32 = 100_000;

/// Bonus for taking a corner while no corner-sized threat remains.
pub const CORNER_SECURED_WEIGHT: i32 = 1_000_000;

/// Positive shape weight at or above this bar overrides accumulated
/// negative weight ("strongly recommended").
pub const STRONG_RECOMMEND_WEIGHT: i32 = 1_000_000;

/// Penalty for handing the opponent a corner reply.
const CORNER_THREAT_PENALTY: i32 = 999_999;

/// Number of decided corners at which the shape heuristic is skipped.
///
/// An empirical shortcut, not a proven invariant; overridable through
/// [`crate::search::SearchOptions`].
pub const DEFAULT_CORNER_RULE_THRESHOLD: u32 = 2;

const CORNERS: [(usize, usize); 4] = [(0, 0), (7, 0), (0, 7), (7, 7)];

/// Classifies the strategic weight of candidate moves for one search.
///
/// Constructed once per `choose_move` call from the root board, so the
/// corner-decided shortcut is judged against the authoritative position, not
/// against the speculative boards explored below it.
#[derive(Clone, Copy, Debug)]
pub struct MoveEvaluator {
    shape_rules_enabled: bool,
}

impl MoveEvaluator {
    /// Builds an evaluator for a search rooted at `root`.
    pub fn for_root(root: &Board, corner_rule_threshold: u32) -> MoveEvaluator {
        let decided = CORNERS
            .iter()
            .filter(|&&(x, y)| root.get(x, y) != Disc::Empty)
            .count() as u32;
        MoveEvaluator {
            shape_rules_enabled: decided < corner_rule_threshold,
        }
    }

    /// Evaluator with the shape rules unconditionally on (or off).
    #[cfg(test)]
    pub(crate) fn with_shape_rules(enabled: bool) -> MoveEvaluator {
        MoveEvaluator {
            shape_rules_enabled: enabled,
        }
    }

    /// Weighs the move `color` just played at (x, y); `board` is the position
    /// after the move.
    ///
    /// Returns a signed weight: positive favors the mover, negative exposes a
    /// weakness, 0 is an ordinary cell. Lookups are total; shapes without an
    /// authored rule contribute nothing.
    pub fn evaluate(&self, board: &Board, x: usize, y: usize, color: Disc) -> i32 {
        let opponent = color.opposite();
        let replies = board.legal_moves(opponent);
        if replies.is_empty() {
            return FORCED_PASS_WEIGHT;
        }

        if !self.shape_rules_enabled {
            return 0;
        }

        let (positive, mut negative) = shape_weights(board, x, y, color);

        // Replies on a corner or edge are threats, scaled by how far from the
        // board center the edge cell lies.
        for cand in replies.iter() {
            if cand.x % 7 == 0 {
                if cand.y % 7 == 0 {
                    negative -= CORNER_THREAT_PENALTY;
                } else {
                    negative -= edge_threat(cand.y);
                }
            } else if cand.y % 7 == 0 {
                negative -= edge_threat(cand.x);
            }
        }

        if negative > -CORNER_THREAT_PENALTY && x % 7 == 0 && y % 7 == 0 {
            return CORNER_SECURED_WEIGHT + positive;
        }

        // Defence takes precedence over offence below the top bar.
        if positive < STRONG_RECOMMEND_WEIGHT && negative < 0 {
            return negative;
        }

        positive
    }
}

/// Distance-scaled penalty for an edge reply at off-edge coordinate `v`.
fn edge_threat(v: usize) -> i32 {
    (((2 * v as i32 - 7).abs() + 1) / 2) * 1000
}

/// Accumulates the authored shape-rule weights for the cell, split into
/// positive and negative sums.
fn shape_weights(board: &Board, x: usize, y: usize, color: Disc) -> (i32, i32) {
    let (px, py, mx, my, xy_flip) = fold(x, y);
    let Some(probes) = shape::probes_for(px, py) else {
        return (0, 0);
    };

    let mut positive = 0;
    let mut negative = 0;
    for probe in probes {
        // Mirror the authored probe back onto the actual octant.
        let (mut sx, dx, mut sy, dy) = if xy_flip {
            (probe.sy, probe.dy * mx, probe.sx, probe.dx * my)
        } else {
            (probe.sx, probe.dx * mx, probe.sy, probe.dy * my)
        };
        if mx == -1 {
            sx = 7 - sx;
        }
        if my == -1 {
            sy = 7 - sy;
        }

        let mut line: ArrayVec<Shape, 8> = ArrayVec::new();
        let (mut cx, mut cy) = (sx, sy);
        for _ in 0..probe.len {
            line.push(classify(board.get(cx as usize, cy as usize), color));
            cx += dx;
            cy += dy;
        }

        for rule in probe.rules {
            if shape::matches(rule.pattern, &line) {
                if rule.weight > 0 {
                    positive += rule.weight;
                } else {
                    negative += rule.weight;
                }
            }
        }
    }
    (positive, negative)
}

#[inline]
fn classify(disc: Disc, color: Disc) -> Shape {
    if disc == Disc::Empty {
        Shape::Blank
    } else if disc == color {
        Shape::Mine
    } else {
        Shape::Theirs
    }
}

/// Folds (x, y) onto its canonical representative in the upper-left octant.
///
/// Returns the representative, the axis mirror signs, and whether the probe
/// axes swap (cells reached through the vertical edges).
fn fold(x: usize, y: usize) -> (usize, usize, i32, i32, bool) {
    if x == y || x + y == 7 {
        let (px, mx) = if x >= 4 { (7 - x, -1) } else { (x, 1) };
        let (py, my) = if y >= 4 { (7 - y, -1) } else { (y, 1) };
        (px, py, mx, my, false)
    } else if y % 7 == 0 {
        let my = if y >= 4 { -1 } else { 1 };
        let (px, mx) = if x >= 4 { (7 - x, -1) } else { (x, 1) };
        (px, 0, mx, my, false)
    } else if x % 7 == 0 {
        let mx = if x >= 4 { -1 } else { 1 };
        let (px, my) = if y >= 4 { (7 - y, -1) } else { (y, 1) };
        (px, 0, mx, my, true)
    } else {
        (x, y, 1, 1, false)
    }
}
