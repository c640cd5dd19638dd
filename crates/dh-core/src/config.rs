//! World configuration
//!
//! Everything a host needs to create a world. Hosts may build this from
//! CLI flags or a JSON file; the core only validates it.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorldError};
use crate::{
    DEFAULT_CONCEALMENT_COST, DEFAULT_HEIGHT, DEFAULT_SEED, DEFAULT_WIDTH, MAX_GRID_CELLS,
    MAX_GRID_SIDE, MIN_GRID_HEIGHT, MIN_GRID_WIDTH, ROOM_MIN_HEIGHT, ROOM_MIN_WIDTH,
};

/// Difficulty level, 1 (easy) and up
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Difficulty(pub u32);

impl Difficulty {
    pub const EASY: Difficulty = Difficulty(1);
    pub const MEDIUM: Difficulty = Difficulty(2);
    pub const HARD: Difficulty = Difficulty(3);

    /// Difficulty earned by a player's accumulated points
    pub fn from_points(points: i32) -> Self {
        if points < 50 {
            Self::EASY
        } else if points < 150 {
            Self::MEDIUM
        } else {
            Self::HARD
        }
    }

    /// Inclusive room-count range for this difficulty
    pub fn room_range(self) -> (usize, usize) {
        let d = self.0 as usize;
        (1 + d, 5 + 3 * d)
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::EASY
    }
}

/// Parameters for creating a world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub seed: u64,
    pub width: usize,
    pub height: usize,
    pub difficulty: Difficulty,
    pub consumables: usize,
    pub obstacles: usize,
    /// Exact number of rooms; drawn from the difficulty range when absent
    pub rooms: Option<usize>,
    /// Seed for the hunter's search walk; fresh entropy when absent
    pub search_seed: Option<u64>,
    /// Points required to buy concealment
    pub concealment_cost: i32,
    /// Score the player starts the world with
    pub starting_points: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            difficulty: Difficulty::EASY,
            consumables: 10,
            obstacles: 10,
            rooms: None,
            search_seed: None,
            concealment_cost: DEFAULT_CONCEALMENT_COST,
            starting_points: 0,
        }
    }
}

impl WorldConfig {
    /// Config with the given seed and defaults elsewhere
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Upper bound on rooms: as many minimum-size rooms as the area holds
    pub fn max_rooms(&self) -> usize {
        self.width.saturating_mul(self.height) / (ROOM_MIN_WIDTH * ROOM_MIN_HEIGHT)
    }

    /// Check the configuration before any generation happens
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(WorldError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.width < MIN_GRID_WIDTH || self.height < MIN_GRID_HEIGHT {
            return Err(WorldError::GridTooSmall {
                width: self.width,
                height: self.height,
                min_width: MIN_GRID_WIDTH,
                min_height: MIN_GRID_HEIGHT,
            });
        }
        if self.width > MAX_GRID_SIDE
            || self.height > MAX_GRID_SIDE
            || self.width * self.height > MAX_GRID_CELLS
        {
            return Err(WorldError::GridTooLarge {
                width: self.width,
                height: self.height,
                max_side: MAX_GRID_SIDE,
                max_cells: MAX_GRID_CELLS,
            });
        }

        let max_rooms = self.max_rooms();
        if self.difficulty.0 == 0 {
            return Err(WorldError::InvalidDifficulty(self.difficulty.0));
        }
        // the smallest room count a difficulty asks for is 1 + difficulty
        if self.difficulty.0 as usize >= max_rooms {
            return Err(WorldError::DifficultyTooHigh {
                difficulty: self.difficulty.0,
                max_rooms,
            });
        }
        match self.rooms {
            Some(0) => Err(WorldError::NoRooms),
            Some(requested) if requested > max_rooms => Err(WorldError::TooManyRooms {
                requested,
                max_rooms,
            }),
            _ => Ok(()),
        }
    }
}
