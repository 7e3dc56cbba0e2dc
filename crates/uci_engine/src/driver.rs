//! Protocol driver: a small state machine between the GUI and the engine.

use std::io::{self, BufRead, Write};

use chess_core::{apply_uci_moves, move_to_uci, Color, Engine, Game, Position};
use tracing::{debug, info, warn};

use crate::{
    command::{Command, Setup},
    config::EngineConfig,
};

/// Sent in place of a move when the position has none.
const NO_MOVE: &str = "(none)";

/// Where the driver is in the protocol.
#[derive(Debug, Clone)]
pub enum State {
    /// No position has been set yet
    Idle,
    /// A game is loaded and ready to search
    PositionSet(Game),
    /// `quit` was received
    Terminated,
}

/// Owns the engine state: current game, configuration and output sink.
pub struct Driver<E, W> {
    engine: E,
    out: W,
    config: EngineConfig,
    state: State,
}

impl<E: Engine, W: Write> Driver<E, W> {
    pub fn new(engine: E, out: W, config: EngineConfig) -> Self {
        Self {
            engine,
            out,
            config,
            state: State::Idle,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn game(&self) -> Option<&Game> {
        match &self.state {
            State::PositionSet(game) => Some(game),
            _ => None,
        }
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.state, State::Terminated)
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Reads commands until `quit` or end of input.
    ///
    /// Malformed lines are logged and skipped; only I/O failures end the
    /// loop with an error.
    pub fn run<R: BufRead>(&mut self, input: R) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            debug!(line = line.trim(), "received");

            match Command::parse(&line) {
                Ok(Some(command)) => self.handle(command)?,
                Ok(None) => {}
                Err(e) => warn!(error = %e, line = line.trim(), "malformed command"),
            }

            if self.is_terminated() {
                info!("quit received");
                return Ok(());
            }
        }
        info!("input closed");
        Ok(())
    }

    /// Applies one command and writes any response.
    pub fn handle(&mut self, command: Command) -> io::Result<()> {
        if self.is_terminated() {
            debug!(?command, "ignoring command after quit");
            return Ok(());
        }

        match command {
            Command::Uci => {
                let name = self.config.name.as_deref().unwrap_or(self.engine.name());
                let author = self.config.author.as_deref().unwrap_or(self.engine.author());
                writeln!(self.out, "id name {name}")?;
                writeln!(self.out, "id author {author}")?;
                writeln!(self.out, "uciok")?;
            }
            Command::IsReady => writeln!(self.out, "readyok")?,
            Command::UciNewGame => {
                self.engine.new_game();
                self.state = State::Idle;
            }
            Command::Position { setup, moves } => self.set_position(setup, &moves),
            Command::Go => self.go()?,
            Command::Quit => self.state = State::Terminated,
            Command::Unknown(text) => debug!(command = %text, "ignoring unknown command"),
        }
        self.out.flush()
    }

    /// Replaces the current game. A bad FEN leaves the previous state alone;
    /// an illegal move keeps every move before it.
    fn set_position(&mut self, setup: Setup, moves: &[String]) {
        let mut game = match setup {
            Setup::StartPos => Game::startpos(),
            Setup::Fen(fen) => match Game::from_fen(&fen) {
                Ok(game) => game,
                Err(e) => {
                    warn!(error = %e, "rejected position");
                    return;
                }
            },
        };

        if let Err(e) = apply_uci_moves(&mut game, moves) {
            warn!(
                error = %e,
                applied = game.ply(),
                skipped = moves.len() - game.ply(),
                "stopped applying moves"
            );
        }
        debug!(fen = %game.fen(), "position set");
        self.state = State::PositionSet(game);
    }

    /// Searches the current game. Without one there is nothing to search,
    /// so the reply is the no-move sentinel.
    fn go(&mut self) -> io::Result<()> {
        let State::PositionSet(game) = &mut self.state else {
            warn!("go without a position");
            return writeln!(self.out, "bestmove {NO_MOVE}");
        };

        let depth = self.config.depth;
        let result = self.engine.search(game, depth);

        // UCI scores are centipawns from the side to move
        let cp = match game.side_to_move() {
            Color::White => result.score * 100,
            Color::Black => -result.score * 100,
        };
        let best = match result.best_move {
            Some(mv) => move_to_uci(game.board(), mv),
            None => NO_MOVE.to_string(),
        };

        writeln!(
            self.out,
            "info depth {} score cp {} nodes {}",
            result.depth, cp, result.nodes
        )?;
        writeln!(self.out, "bestmove {best}")
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod driver_tests;
