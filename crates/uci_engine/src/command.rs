//! Tokenizer turning protocol lines into typed commands.

use thiserror::Error;

/// Number of fields in a complete FEN record.
const FEN_FIELDS: usize = 6;

/// Where a `position` command starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setup {
    StartPos,
    Fen(String),
}

/// A command sent from the GUI to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Uci,
    IsReady,
    UciNewGame,
    Position { setup: Setup, moves: Vec<String> },
    /// Search parameters are accepted but the configured depth always applies
    Go,
    Quit,
    Unknown(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("`position` needs `startpos` or `fen`")]
    MissingSetup,
    #[error("expected `startpos` or `fen`, found `{0}`")]
    UnknownSetup(String),
    #[error("FEN needs 6 fields, found {0}")]
    FenFieldCount(usize),
    #[error("expected `moves`, found `{0}`")]
    UnexpectedToken(String),
}

impl Command {
    /// Parses one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            return Ok(None);
        };

        let command = match keyword {
            "uci" => Command::Uci,
            "isready" => Command::IsReady,
            "ucinewgame" => Command::UciNewGame,
            "position" => parse_position(tokens)?,
            "go" => Command::Go,
            "quit" => Command::Quit,
            _ => Command::Unknown(line.trim().to_string()),
        };
        Ok(Some(command))
    }
}

fn parse_position<'a>(tokens: impl Iterator<Item = &'a str>) -> Result<Command, CommandError> {
    let mut tokens = tokens.peekable();
    let setup = match tokens.next() {
        None => return Err(CommandError::MissingSetup),
        Some("startpos") => Setup::StartPos,
        Some("fen") => {
            let mut fields = Vec::with_capacity(FEN_FIELDS);
            while let Some(field) = tokens.next_if(|&tok| tok != "moves") {
                fields.push(field);
            }
            if fields.len() != FEN_FIELDS {
                return Err(CommandError::FenFieldCount(fields.len()));
            }
            Setup::Fen(fields.join(" "))
        }
        Some(other) => return Err(CommandError::UnknownSetup(other.to_string())),
    };
    let moves = parse_moves(tokens)?;
    Ok(Command::Position { setup, moves })
}

/// Parses an optional `moves m1 m2 ...` tail.
fn parse_moves<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Result<Vec<String>, CommandError> {
    match tokens.next() {
        None => Ok(Vec::new()),
        Some("moves") => Ok(tokens.map(str::to_string).collect()),
        Some(other) => Err(CommandError::UnexpectedToken(other.to_string())),
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod command_tests;
