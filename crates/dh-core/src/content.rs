//! Obstacles, consumables and the other cell occupants
//!
//! Both obstacle types and consumable kinds are closed enums; the effect of
//! each obstacle is resolved by a plain match in the world's resolver.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::rng::GameRng;
use crate::{DARK_MODE_SPACING, ITEM_SPACING, SPIKES_PENALTY};

/// Coarse bucket of a zone difficulty in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DifficultyBand {
    Low,
    Mid,
    High,
}

impl DifficultyBand {
    pub fn of(difficulty: f64) -> Self {
        if difficulty > 0.7 {
            DifficultyBand::High
        } else if difficulty > 0.3 {
            DifficultyBand::Mid
        } else {
            DifficultyBand::Low
        }
    }
}

/// Obstacle types
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
pub enum ObstacleType {
    /// Costs points
    Spikes,
    /// Moves the player somewhere away from the hunter
    Teleporter,
    /// Slides the player until a wall
    Ice,
    /// Shrinks vision; stays on the map after triggering
    DarkMode,
}

impl ObstacleType {
    /// Types chosen per zone; DarkMode is placed separately
    pub const ROLLED: [ObstacleType; 3] = [
        ObstacleType::Spikes,
        ObstacleType::Teleporter,
        ObstacleType::Ice,
    ];

    /// Points added to the score on trigger
    pub const fn point_penalty(self) -> i32 {
        match self {
            ObstacleType::Spikes => SPIKES_PENALTY,
            _ => 0,
        }
    }

    /// Removed from the map after the first trigger
    pub const fn is_one_shot(self) -> bool {
        !matches!(self, ObstacleType::DarkMode)
    }

    /// Placement spacing radius
    pub const fn spacing(self) -> f64 {
        match self {
            ObstacleType::DarkMode => DARK_MODE_SPACING,
            _ => ITEM_SPACING,
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            ObstacleType::Spikes => '^',
            ObstacleType::Teleporter => 'o',
            ObstacleType::Ice => '~',
            ObstacleType::DarkMode => '%',
        }
    }

    /// Percent weights for Spikes, Teleporter, Ice in a band
    ///
    /// Spikes is the harshest and gains weight with difficulty.
    pub const fn weights(band: DifficultyBand) -> [u32; 3] {
        match band {
            DifficultyBand::High => [50, 30, 20],
            DifficultyBand::Mid => [35, 35, 30],
            DifficultyBand::Low => [20, 30, 50],
        }
    }

    /// Draw a non-DarkMode obstacle for a zone difficulty
    pub fn roll(difficulty: f64, rng: &mut GameRng) -> ObstacleType {
        let weights = Self::weights(DifficultyBand::of(difficulty));
        let mut roll = rng.rn2(weights.iter().sum());
        for (ty, weight) in Self::ROLLED.iter().zip(weights) {
            if roll < weight {
                return *ty;
            }
            roll -= weight;
        }
        ObstacleType::Ice
    }
}

/// Consumable kinds
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
pub enum ConsumableKind {
    /// Worth 10 points
    SmileyFace,
    /// Worth 5 points
    NormalFace,
}

impl ConsumableKind {
    pub const fn value(self) -> i32 {
        match self {
            ConsumableKind::SmileyFace => 10,
            ConsumableKind::NormalFace => 5,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ConsumableKind::SmileyFace => "Smiley Face",
            ConsumableKind::NormalFace => "Normal Face",
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            ConsumableKind::SmileyFace => '$',
            ConsumableKind::NormalFace => '*',
        }
    }

    /// Percent chance of the high-value kind in a band
    pub const fn high_value_chance(band: DifficultyBand) -> u32 {
        match band {
            DifficultyBand::High => 70,
            DifficultyBand::Mid => 50,
            DifficultyBand::Low => 30,
        }
    }

    /// Draw a consumable for a zone difficulty
    pub fn roll(difficulty: f64, rng: &mut GameRng) -> ConsumableKind {
        if rng.percent(Self::high_value_chance(DifficultyBand::of(difficulty))) {
            ConsumableKind::SmileyFace
        } else {
            ConsumableKind::NormalFace
        }
    }
}

/// What occupies a cell besides its structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupant {
    Obstacle(ObstacleType),
    Consumable(ConsumableKind),
    /// Vision pickup spawned by dark mode
    Torch,
}

impl Occupant {
    pub const fn symbol(self) -> char {
        match self {
            Occupant::Obstacle(ty) => ty.symbol(),
            Occupant::Consumable(kind) => kind.symbol(),
            Occupant::Torch => 'i',
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Occupant::Obstacle(_) => "an obstacle",
            Occupant::Consumable(_) => "a consumable",
            Occupant::Torch => "a torch",
        }
    }
}
