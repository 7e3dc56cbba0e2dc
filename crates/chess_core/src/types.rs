//! Shared scalar types and re-exports of the rules library.

pub use cozy_chess::{Board, Color, File, Move, Piece, Rank, Square};

/// Signed evaluation. Positive favours White regardless of side to move.
pub type Score = i32;

/// Bound used for the initial alpha-beta window.
pub const INFINITY: Score = i32::MAX;

/// Returns the opposing colour.
pub fn other(color: Color) -> Color {
    match color {
        Color::White => Color::Black,
        Color::Black => Color::White,
    }
}
