use crate::{
    error::PositionError,
    position::{captures_king, Game},
    types::*,
};

/// FEN of the standard initial position.
pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Formats a move in UCI long algebraic notation (`e2e4`, `e7e8q`).
///
/// cozy-chess encodes castling as the king capturing its own rook; UCI wants
/// the king's two-square destination, so `e1h1` is printed as `e1g1`.
pub fn move_to_uci(board: &Board, mv: Move) -> String {
    let mut mv = mv;
    if is_castle(board, mv) {
        let file = if (mv.to.file() as u8) > (mv.from.file() as u8) {
            File::G
        } else {
            File::C
        };
        mv.to = Square::new(file, mv.from.rank());
    }
    mv.to_string()
}

/// Parses a UCI move and checks it against the legal moves of `board`.
pub fn parse_uci_move(board: &Board, txt: &str) -> Result<Move, PositionError> {
    let mv = decode_uci_move(board, txt)?;
    if board.is_legal(mv) && !captures_king(board, mv) {
        Ok(mv)
    } else {
        Err(PositionError::IllegalMove {
            mv: txt.to_string(),
            fen: board.to_string(),
        })
    }
}

/// Applies a list of UCI moves in order.
///
/// Stops at the first move that does not parse or is illegal; every move
/// before it stays applied.
pub fn apply_uci_moves<S: AsRef<str>>(game: &mut Game, moves: &[S]) -> Result<(), PositionError> {
    for txt in moves {
        let mv = decode_uci_move(game.board(), txt.as_ref())?;
        game.try_apply(mv)?;
    }
    Ok(())
}

/// Reads the move text, mapping the king's two-square castling step back
/// onto the rook square. Legality is left to the caller.
fn decode_uci_move(board: &Board, txt: &str) -> Result<Move, PositionError> {
    let mut mv: Move = txt
        .parse()
        .map_err(|_| PositionError::MalformedMove(txt.to_string()))?;

    if board.piece_on(mv.from) == Some(Piece::King)
        && mv.from.file() == File::E
        && mv.to.rank() == mv.from.rank()
    {
        let rook_file = match mv.to.file() {
            File::G => Some(File::H),
            File::C => Some(File::A),
            _ => None,
        };
        if let Some(file) = rook_file {
            mv.to = Square::new(file, mv.from.rank());
        }
    }
    Ok(mv)
}

fn is_castle(board: &Board, mv: Move) -> bool {
    board.piece_on(mv.from) == Some(Piece::King)
        && board.colors(board.side_to_move()).has(mv.to)
}

#[cfg(test)]
#[path = "uci_tests.rs"]
mod uci_tests;
