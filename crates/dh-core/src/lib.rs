//! dh-core: core game logic for Dungeon Hunt
//!
//! Builds a seeded room-and-corridor dungeon, fills it with weighted
//! content, and runs a hunter that chases the player through it.
//! No rendering, audio or file I/O lives here; hosts read views and
//! receive events.

pub mod campaign;
pub mod clock;
pub mod config;
pub mod content;
pub mod dungeon;
pub mod error;
pub mod hunter;
pub mod pathfind;
pub mod world;

mod consts;
mod rng;

pub use campaign::{Campaign, CampaignStatus};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Difficulty, WorldConfig};
pub use consts::*;
pub use error::{Result, WorldError};
pub use hunter::{Hunter, HunterMode};
pub use pathfind::Pathfinder;
pub use rng::GameRng;
pub use world::{EffectsSink, GameEvent, Glyph, GridView, Sight, World, WorldSnapshot};
