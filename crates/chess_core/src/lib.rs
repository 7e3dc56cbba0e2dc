pub mod error;
pub mod position;
pub mod types;
pub mod uci;

pub use error::PositionError;
pub use position::{Game, Outcome, Position};
pub use types::*;
pub use uci::*;

// =============================================================================
// Engine trait - implemented by every search engine in the workspace
// =============================================================================

/// Result of a search operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// The best move found (None if the position is terminal)
    pub best_move: Option<Move>,
    /// Absolute evaluation in pawns: positive favours White
    pub score: Score,
    /// Search depth in plies
    pub depth: u8,
    /// Number of nodes visited
    pub nodes: u64,
}

/// Trait that all chess engines must implement.
///
/// The protocol driver only talks to engines through this trait, so a
/// stronger search can be dropped in without touching the UCI layer.
pub trait Engine {
    /// Search `game` to a fixed depth.
    ///
    /// The game may be mutated during the search but must be handed back
    /// in the state it was received.
    fn search(&mut self, game: &mut Game, depth: u8) -> SearchResult;

    /// Returns the engine's name for UCI identification
    fn name(&self) -> &str;

    /// Returns the engine's author for UCI identification
    fn author(&self) -> &str {
        "ML-chess"
    }

    /// Reset internal state for a new game
    fn new_game(&mut self) {}
}
