//! Error types for world creation and restoration
//!
//! Only configuration problems are errors. Blocked moves, unreachable
//! goals and failed teleports are ordinary outcomes and never surface here.

use thiserror::Error;

use crate::dungeon::Point;

/// Errors raised while building or restoring a world
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    #[error("invalid grid dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: usize, height: usize },

    #[error("grid {width}x{height} is too small for rooms; need at least {min_width}x{min_height}")]
    GridTooSmall {
        width: usize,
        height: usize,
        min_width: usize,
        min_height: usize,
    },

    #[error("grid {width}x{height} is too large; sides are capped at {max_side} and area at {max_cells} cells")]
    GridTooLarge {
        width: usize,
        height: usize,
        max_side: usize,
        max_cells: usize,
    },

    #[error("difficulty must be at least 1, got {0}")]
    InvalidDifficulty(u32),

    #[error("difficulty {difficulty} needs more rooms than the grid holds (at most {max_rooms})")]
    DifficultyTooHigh { difficulty: u32, max_rooms: usize },

    #[error("room count must be at least 1")]
    NoRooms,

    #[error("{requested} rooms do not fit the grid (at most {max_rooms})")]
    TooManyRooms { requested: usize, max_rooms: usize },

    #[error("could not place {requested} rooms after {restarts} layout restarts (best: {placed})")]
    RoomPlacementExhausted {
        requested: usize,
        placed: usize,
        restarts: u32,
    },

    #[error("position {0} is outside the grid")]
    OutOfBounds(Point),

    #[error("position {0} is not walkable")]
    NotWalkable(Point),

    #[error("position {0} already holds {1}")]
    Occupied(Point, &'static str),
}

/// Result alias for world operations
pub type Result<T> = core::result::Result<T, WorldError>;
