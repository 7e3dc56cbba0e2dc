//! Minimax search with alpha-beta pruning

use chess_core::{Color, Position, Score, INFINITY};

use crate::eval::Evaluator;

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes visited, root included
    pub nodes: u64,
    /// Nodes whose expansion stopped on `beta <= alpha`
    pub cutoffs: u64,
}

/// Searches from the side to move with a full window.
///
/// White maximizes and Black minimizes, matching the absolute sign
/// convention of the evaluator.
pub fn search_root<P, E>(
    pos: &mut P,
    eval: &E,
    depth: u8,
    stats: &mut SearchStats,
) -> (Score, Option<P::Move>)
where
    P: Position,
    E: Evaluator<P> + ?Sized,
{
    let maximizing = pos.side_to_move() == Color::White;
    search(pos, eval, depth, -INFINITY, INFINITY, maximizing, stats)
}

/// Recursive minimax with alpha-beta pruning.
///
/// `alpha` is the score the maximizer is already guaranteed elsewhere in the
/// tree, `beta` the minimizer's. Returns the node's score and the move that
/// reaches it; the move is `None` at leaves. On equal scores the first move
/// in `legal_moves` order wins.
///
/// Depth exhaustion and game end are not distinguished: both fall back to
/// the static evaluator.
pub fn search<P, E>(
    pos: &mut P,
    eval: &E,
    depth: u8,
    mut alpha: Score,
    mut beta: Score,
    maximizing: bool,
    stats: &mut SearchStats,
) -> (Score, Option<P::Move>)
where
    P: Position,
    E: Evaluator<P> + ?Sized,
{
    stats.nodes += 1;

    if depth == 0 || pos.is_terminal() {
        return (eval.evaluate(pos), None);
    }

    let moves = pos.legal_moves();
    if moves.is_empty() {
        // Only reachable if the adapter's terminal test misses a case
        return (eval.evaluate(pos), None);
    }

    let mut best_score = if maximizing { -INFINITY } else { INFINITY };
    let mut best_move = None;

    for mv in moves {
        pos.apply(mv);
        let (score, _) = search(pos, eval, depth - 1, alpha, beta, !maximizing, stats);
        pos.undo();

        if maximizing {
            if best_move.is_none() || score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            alpha = alpha.max(score);
        } else {
            if best_move.is_none() || score < best_score {
                best_score = score;
                best_move = Some(mv);
            }
            beta = beta.min(score);
        }

        if beta <= alpha {
            stats.cutoffs += 1;
            break;
        }
    }

    (best_score, best_move)
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
