//! Level generation
//!
//! Rooms first, then MST corridors, then the player, hunter and exit door.

use tracing::{debug, warn};

use crate::config::WorldConfig;
use crate::error::Result;
use crate::rng::GameRng;

use super::corridor::{Hallway, connect_rooms};
use super::room::{Room, place_rooms, roll_room_count};
use super::{CellType, DoorState, Grid, Point};

/// Rooms and corridors produced for one level
///
/// Only kept long enough for tests and logging; the geometry itself is
/// baked into the grid.
#[derive(Debug, Clone)]
pub struct DungeonLayout {
    pub rooms: Vec<Room>,
    pub hallways: Vec<Hallway>,
}

/// Generate a grid with rooms joined by corridors
pub fn generate_layout(config: &WorldConfig, rng: &mut GameRng) -> Result<(Grid, DungeonLayout)> {
    config.validate()?;
    let count = match config.rooms {
        Some(n) => n,
        None => roll_room_count(rng, config.difficulty),
    };

    let mut grid = Grid::new(config.width, config.height);
    let rooms = place_rooms(&mut grid, rng, count)?;
    let hallways = connect_rooms(&mut grid, &rooms);
    debug!(
        rooms = rooms.len(),
        corridors = hallways.len(),
        floor = grid.count(CellType::Floor),
        "dungeon layout generated"
    );

    Ok((grid, DungeonLayout { rooms, hallways }))
}

/// Pick the player's start: a random floor cell
pub fn place_player(grid: &Grid, rng: &mut GameRng) -> Option<Point> {
    let floors: Vec<Point> = grid.floor_points().collect();
    rng.choose(&floors).copied()
}

/// Pick the hunter's start: the floor cell farthest from the player
pub fn place_hunter(grid: &Grid, player: Point) -> Option<Point> {
    let mut best: Option<(usize, Point)> = None;
    for p in grid.floor_points() {
        if p == player {
            continue;
        }
        let d = p.manhattan(player);
        if best.is_none_or(|(bd, _)| d > bd) {
            best = Some((d, p));
        }
    }
    best.map(|(_, p)| p)
}

/// Wall cell touching floor on one side and open space on another
fn is_door_candidate(grid: &Grid, p: Point) -> bool {
    if !grid.cell(p).is_wall() {
        return false;
    }
    let neighbors = p.neighbors();
    let touches_floor = neighbors.iter().any(|&q| grid.is_floor(q));
    let touches_outside = neighbors
        .iter()
        .any(|&q| grid.get(q).is_none_or(|c| c == CellType::Empty));
    touches_floor && touches_outside
}

/// Turn a random outer wall into the locked exit door
///
/// Returns `None` when no wall qualifies; the level then simply has no exit.
pub fn place_door(grid: &mut Grid, rng: &mut GameRng) -> Option<Point> {
    let candidates: Vec<Point> = grid.points().filter(|&p| is_door_candidate(grid, p)).collect();
    let door = rng.choose(&candidates).copied();
    match door {
        Some(p) => {
            grid.set(p, CellType::Door(DoorState::Locked));
        }
        None => warn!("no wall qualifies for the exit door"),
    }
    door
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::corridor::floor_is_connected;

    fn config(seed: u64) -> WorldConfig {
        WorldConfig {
            seed,
            ..WorldConfig::default()
        }
    }

    #[test]
    fn test_generate_layout_connected() {
        for seed in 0..10 {
            let mut rng = GameRng::new(seed);
            let (grid, layout) = generate_layout(&config(seed), &mut rng).unwrap();
            assert!(floor_is_connected(&grid), "seed {seed}");
            assert_eq!(layout.hallways.len(), layout.rooms.len() - 1);
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let (a, _) = generate_layout(&config(99), &mut GameRng::new(99)).unwrap();
        let (b, _) = generate_layout(&config(99), &mut GameRng::new(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_explicit_room_count() {
        let mut cfg = config(5);
        cfg.rooms = Some(3);
        let (_, layout) = generate_layout(&cfg, &mut GameRng::new(5)).unwrap();
        assert_eq!(layout.rooms.len(), 3);
    }

    #[test]
    fn test_hunter_is_farthest() {
        let grid = Grid::from_rows(&["#######", "#.....#", "#######"]);
        let player = Point::new(1, 1);
        assert_eq!(place_hunter(&grid, player), Some(Point::new(5, 1)));
    }

    #[test]
    fn test_door_on_outer_wall() {
        let mut grid = Grid::from_rows(&["       ", " ##### ", " #...# ", " ##### ", "       "]);
        let door = place_door(&mut grid, &mut GameRng::new(1)).unwrap();
        assert_eq!(grid.cell(door), CellType::Door(DoorState::Locked));
        assert!(door.neighbors().iter().any(|&q| grid.is_floor(q)));
        // corners never touch floor orthogonally
        assert_ne!(door, Point::new(1, 1));
    }

    #[test]
    fn test_no_door_without_candidates() {
        let mut grid = Grid::filled(5, 5, CellType::Floor);
        assert_eq!(place_door(&mut grid, &mut GameRng::new(1)), None);
    }
}
