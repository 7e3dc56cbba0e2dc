use thiserror::Error;

/// Errors raised when untrusted input is turned into positions or moves.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error("invalid FEN `{fen}`: {reason}")]
    InvalidFen { fen: String, reason: String },
    #[error("unparsable move `{0}`")]
    MalformedMove(String),
    #[error("illegal move `{mv}` in position {fen}")]
    IllegalMove { mv: String, fen: String },
}
