//! Material-based position evaluation.

use chess_core::{Board, Color, Game, Piece, Position, Score};

/// Material values in pawns.
/// The king scores nothing: the rules never let it be captured.
const PIECE_VALUES: [(Piece, Score); 6] = [
    (Piece::Pawn, 1),
    (Piece::Knight, 3),
    (Piece::Bishop, 3),
    (Piece::Rook, 5),
    (Piece::Queen, 9),
    (Piece::King, 0),
];

/// Scores a position for the searcher.
///
/// Implementations must be pure: equal positions get equal scores, and the
/// score is absolute (positive favours White) so the searcher's max/min
/// logic never has to know whose turn it is.
pub trait Evaluator<P: Position> {
    fn evaluate(&self, pos: &P) -> Score;
}

impl<P: Position, F: Fn(&P) -> Score> Evaluator<P> for F {
    fn evaluate(&self, pos: &P) -> Score {
        self(pos)
    }
}

/// Sum of White's piece values minus Black's.
#[derive(Debug, Clone, Copy, Default)]
pub struct Material;

impl Evaluator<Game> for Material {
    fn evaluate(&self, game: &Game) -> Score {
        evaluate(game.board())
    }
}

/// Evaluates the board by material alone, independent of the side to move.
pub fn evaluate(board: &Board) -> Score {
    PIECE_VALUES
        .iter()
        .map(|&(piece, value)| {
            let white = board.colored_pieces(Color::White, piece).len() as Score;
            let black = board.colored_pieces(Color::Black, piece).len() as Score;
            value * (white - black)
        })
        .sum()
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod eval_tests;
