//! Position adapter.
//!
//! The search only ever talks to a [`Position`]: enumerate legal moves, play
//! one, take it back, ask whether the game is over. [`Game`] implements it on
//! top of `cozy_chess::Board`, which is copy-make, so undo is a pop from a
//! stack of previous boards.

use std::fmt::Debug;

use cozy_chess::{BitBoard, Board, BoardBuilder, CastleRights, Color, FenParseError, Move, Piece, Square};

use crate::error::PositionError;
use crate::types::other;

/// Halfmove clock value at which the seventy-five-move rule ends the game.
const SEVENTY_FIVE_MOVE_PLIES: u16 = 150;

/// Largest halfmove clock cozy-chess stores; the real count lives in [`Game`].
const BOARD_CLOCK_LIMIT: u16 = 100;

/// Occurrences of one position that end the game automatically.
const FIVEFOLD: usize = 5;

/// Everything the searcher needs from a rules engine.
///
/// `apply` and `undo` must be called in strict LIFO order. After any
/// balanced sequence of them the position is equal to where it started.
pub trait Position {
    type Move: Copy + Eq + Debug;

    /// All legal moves for the side to move, in library order.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Plays a move previously returned by [`Position::legal_moves`].
    fn apply(&mut self, mv: Self::Move);

    /// Takes back the most recent [`Position::apply`].
    ///
    /// # Panics
    /// Panics if there is no move to take back.
    fn undo(&mut self);

    /// True on checkmate, stalemate or any automatic draw.
    fn is_terminal(&self) -> bool;

    fn side_to_move(&self) -> Color;
}

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoves,
    FivefoldRepetition,
}

impl Outcome {
    pub fn winner(self) -> Option<Color> {
        match self {
            Outcome::Checkmate { winner } => Some(winner),
            _ => None,
        }
    }
}

/// A board plus the boards it was reached from.
///
/// The halfmove clock is kept here rather than read from the board, since
/// cozy-chess saturates its own copy at 100.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    halfmove: u16,
    history: Vec<(Board, u16)>,
}

impl Default for Game {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Game {
    /// The standard initial position.
    pub fn startpos() -> Self {
        Self::from_board(Board::default())
    }

    pub fn from_board(board: Board) -> Self {
        let halfmove = board.halfmove_clock().into();
        Self {
            board,
            halfmove,
            history: Vec::new(),
        }
    }

    /// Parses a standard six-field FEN.
    ///
    /// Also accepts a position where the side that just moved was left in
    /// check, as long as the side to move is not in check as well.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let invalid = |reason: String| PositionError::InvalidFen {
            fen: fen.to_string(),
            reason,
        };

        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(invalid(format!("expected 6 fields, found {}", fields.len())));
        }
        let halfmove: u16 = fields[4]
            .parse()
            .map_err(|_| invalid(format!("bad halfmove clock `{}`", fields[4])))?;
        let clamped = halfmove.min(BOARD_CLOCK_LIMIT).to_string();
        let mut fields = fields;
        fields[4] = &clamped;

        let board = match Board::from_fen(&fields.join(" "), false) {
            Ok(board) => board,
            Err(FenParseError::InvalidBoard) => opponent_left_in_check(&fields)
                .ok_or_else(|| invalid(FenParseError::InvalidBoard.to_string()))?,
            Err(e) => return Err(invalid(e.to_string())),
        };
        Ok(Self {
            board,
            halfmove,
            history: Vec::new(),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// FEN of the current position, with the unclamped halfmove clock.
    pub fn fen(&self) -> String {
        let fen = self.board.to_string();
        let clock = self.halfmove.to_string();
        let mut fields: Vec<&str> = fen.split(' ').collect();
        if let Some(field) = fields.get_mut(4) {
            *field = &clock;
        }
        fields.join(" ")
    }

    /// Plies since the last capture or pawn move.
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove
    }

    /// Number of moves that can currently be taken back.
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    /// True if `mv` is among [`Position::legal_moves`].
    pub fn is_legal(&self, mv: Move) -> bool {
        self.board.is_legal(mv) && !captures_king(&self.board, mv)
    }

    /// Plays `mv` only if it is legal here; otherwise the game is untouched.
    pub fn try_apply(&mut self, mv: Move) -> Result<(), PositionError> {
        if !self.is_legal(mv) {
            return Err(PositionError::IllegalMove {
                mv: crate::uci::move_to_uci(&self.board, mv),
                fen: self.fen(),
            });
        }
        self.apply(mv);
        Ok(())
    }

    /// Returns how the game ended, or `None` while it is still going.
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.has_legal_moves() {
            return Some(if self.board.checkers().is_empty() {
                Outcome::Stalemate
            } else {
                Outcome::Checkmate {
                    winner: other(self.board.side_to_move()),
                }
            });
        }
        if self.is_insufficient_material() {
            return Some(Outcome::InsufficientMaterial);
        }
        if self.halfmove >= SEVENTY_FIVE_MOVE_PLIES {
            return Some(Outcome::SeventyFiveMoves);
        }
        if self.repetitions() >= FIVEFOLD {
            return Some(Outcome::FivefoldRepetition);
        }
        None
    }

    /// How many times the current position has occurred in this game,
    /// counting the current occurrence.
    pub fn repetitions(&self) -> usize {
        let key = self.board.hash();
        1 + self.history.iter().filter(|(b, _)| b.hash() == key).count()
    }

    /// Neither side can ever deliver mate: bare kings, a single minor piece,
    /// or bishops that all stand on one square colour.
    pub fn is_insufficient_material(&self) -> bool {
        let b = &self.board;
        let heavy = b.pieces(Piece::Pawn) | b.pieces(Piece::Rook) | b.pieces(Piece::Queen);
        if !heavy.is_empty() {
            return false;
        }

        let knights = b.pieces(Piece::Knight);
        let bishops = b.pieces(Piece::Bishop);
        if (knights | bishops).len() <= 1 {
            return true;
        }
        if !knights.is_empty() {
            return false;
        }

        let mut shades = bishops.into_iter().map(is_dark_square);
        match shades.next() {
            Some(first) => shades.all(|shade| shade == first),
            None => true,
        }
    }

    fn has_legal_moves(&self) -> bool {
        let enemy_king = their_king(&self.board);
        self.board.generate_moves(|piece_moves| {
            piece_moves.into_iter().any(|mv| !enemy_king.has(mv.to))
        })
    }
}

/// The king of the side not to move. It can only be attacked when the game
/// was set up that way, and is never a legal target.
fn their_king(board: &Board) -> BitBoard {
    board.colored_pieces(other(board.side_to_move()), Piece::King)
}

pub(crate) fn captures_king(board: &Board, mv: Move) -> bool {
    their_king(board).has(mv.to)
}

/// Builds the board for FEN `fields` whose side not to move is in check,
/// which cozy-chess refuses to parse directly.
///
/// The checked king is lifted onto a free square, the board is built with
/// that side to move, and the king is played back. The checked side loses
/// its castling rights and any en passant square is dropped. Returns `None`
/// if no such board exists, for instance when both kings are in check.
fn opponent_left_in_check(fields: &[&str]) -> Option<Board> {
    let mover = match fields[1] {
        "w" => Color::White,
        "b" => Color::Black,
        _ => return None,
    };
    let checked = other(mover);
    let flipped_side = match checked {
        Color::White => "w",
        Color::Black => "b",
    };
    let flipped = format!(
        "{} {} {} - {} {}",
        fields[0], flipped_side, fields[2], fields[4], fields[5]
    );
    let flipped = Board::from_fen(&flipped, false).ok()?;
    if flipped.checkers().is_empty() {
        return None;
    }

    let king = flipped.king(checked);
    let mut builder = BoardBuilder::from_board(&flipped);
    *builder.square_mut(king) = None;
    *builder.castle_rights_mut(checked) = CastleRights::EMPTY;
    builder.en_passant = None;
    builder.halfmove_clock = 0;
    builder.fullmove_number = 1;

    for square in Square::ALL {
        if square == king || builder.square(square).is_some() {
            continue;
        }
        let mut lifted = builder.clone();
        *lifted.square_mut(square) = Some((Piece::King, checked));
        let Ok(mut board) = lifted.build() else {
            continue;
        };
        board.play_unchecked(Move {
            from: square,
            to: king,
            promotion: None,
        });
        board.set_halfmove_clock(flipped.halfmove_clock());
        board.set_fullmove_number(flipped.fullmove_number());
        return Some(board);
    }
    None
}

fn is_dark_square(sq: Square) -> bool {
    (sq.file() as usize + sq.rank() as usize) % 2 == 0
}

impl Position for Game {
    type Move = Move;

    fn legal_moves(&self) -> Vec<Move> {
        let enemy_king = their_king(&self.board);
        let mut moves = Vec::with_capacity(64);
        self.board.generate_moves(|piece_moves| {
            moves.extend(piece_moves.into_iter().filter(|mv| !enemy_king.has(mv.to)));
            false
        });
        moves
    }

    fn apply(&mut self, mv: Move) {
        debug_assert!(self.is_legal(mv), "applied illegal move {mv}");
        let resets_clock = self.board.piece_on(mv.from) == Some(Piece::Pawn)
            || self.board.colors(other(self.board.side_to_move())).has(mv.to);
        let halfmove = if resets_clock {
            0
        } else {
            self.halfmove.saturating_add(1)
        };

        let mut next = self.board.clone();
        next.play_unchecked(mv);
        let previous = std::mem::replace(&mut self.board, next);
        self.history.push((previous, self.halfmove));
        self.halfmove = halfmove;
    }

    fn undo(&mut self) {
        match self.history.pop() {
            Some((board, halfmove)) => {
                self.board = board;
                self.halfmove = halfmove;
            }
            None => panic!("undo called without a matching apply"),
        }
    }

    fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }
}

#[cfg(test)]
#[path = "position_tests.rs"]
mod position_tests;
