//! Minimax Chess Engine
//!
//! Fixed-depth minimax with alpha-beta pruning over a material-only
//! evaluation. No transposition table, no iterative deepening and no
//! quiescence: this is the baseline the protocol driver ships with.

mod eval;
mod search;

use chess_core::{Engine, Game, SearchResult};
use tracing::debug;

pub use eval::{evaluate, Evaluator, Material};
pub use search::{search, search_root, SearchStats};

/// Chess engine using minimax with alpha-beta pruning.
///
/// The evaluator is pluggable; the default counts material.
#[derive(Debug, Clone, Default)]
pub struct MinimaxEngine<E = Material> {
    evaluator: E,
    /// Statistics of the most recent search
    stats: SearchStats,
}

impl MinimaxEngine {
    pub fn new() -> Self {
        Self::with_evaluator(Material)
    }
}

impl<E> MinimaxEngine<E> {
    pub fn with_evaluator(evaluator: E) -> Self {
        Self {
            evaluator,
            stats: SearchStats::default(),
        }
    }

    pub fn last_stats(&self) -> SearchStats {
        self.stats
    }
}

impl<E: Evaluator<Game>> Engine for MinimaxEngine<E> {
    fn search(&mut self, game: &mut Game, depth: u8) -> SearchResult {
        self.stats = SearchStats::default();
        let (score, best_move) = search_root(game, &self.evaluator, depth, &mut self.stats);

        debug!(
            depth,
            score,
            nodes = self.stats.nodes,
            cutoffs = self.stats.cutoffs,
            found = best_move.is_some(),
            "search finished"
        );

        SearchResult {
            best_move,
            score,
            depth,
            nodes: self.stats.nodes,
        }
    }

    fn name(&self) -> &str {
        "Minimax v1.0"
    }

    fn new_game(&mut self) {
        self.stats = SearchStats::default();
    }
}
