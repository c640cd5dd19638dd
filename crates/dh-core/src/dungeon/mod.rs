//! Dungeon system
//!
//! Grid storage, room placement, corridor carving and content zoning.

mod cell;
mod corridor;
mod generation;
mod grid;
mod room;
mod zone;

pub use cell::{CellType, Direction, DoorState, Point};
pub use corridor::{Edge, Hallway, connect_rooms, floor_is_connected};
pub use generation::{DungeonLayout, generate_layout, place_door, place_hunter, place_player};
pub use grid::Grid;
pub use room::{Room, carve_room, place_rooms, roll_room_count};
pub use zone::{Zone, ZonePlanner, partition, roulette, split_evenly};
