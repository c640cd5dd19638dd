//! Rectangular rooms and seeded room placement
//!
//! A room at `(x, y)` with size `width × height` occupies the cells
//! `x..=x+width` by `y..=y+height`: the outer ring is wall, the rest floor.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Difficulty;
use crate::error::{Result, WorldError};
use crate::rng::GameRng;
use crate::{
    ROOM_ATTEMPTS_PER_ROOM, ROOM_LAYOUT_RESTARTS, ROOM_MAX_HEIGHT, ROOM_MAX_WIDTH,
    ROOM_MIN_HEIGHT, ROOM_MIN_WIDTH,
};

use super::{CellType, Grid, Point};

/// A generated room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Room {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center cell, always inside the floor area
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Every cell the room occupies, border included
    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        (self.y..=self.y + self.height)
            .flat_map(move |y| (self.x..=self.x + self.width).map(move |x| Point::new(x, y)))
    }

    pub fn is_border(&self, p: Point) -> bool {
        p.x == self.x || p.x == self.x + self.width || p.y == self.y || p.y == self.y + self.height
    }

    /// Floor columns `x+1..x+width`
    pub fn spans_column(&self, x: i32) -> bool {
        x > self.x && x < self.x + self.width
    }

    /// Floor rows `y+1..y+height`
    pub fn spans_row(&self, y: i32) -> bool {
        y > self.y && y < self.y + self.height
    }

    pub fn contains_floor(&self, p: Point) -> bool {
        self.spans_column(p.x) && self.spans_row(p.y)
    }

    /// Manhattan distance between centers
    pub fn distance(&self, other: &Room) -> usize {
        self.center().manhattan(other.center())
    }

    pub fn overlaps(&self, other: &Room) -> bool {
        !(self.x + self.width < other.x
            || other.x + other.width < self.x
            || self.y + self.height < other.y
            || other.y + other.height < self.y)
    }
}

/// Draw a room count for a difficulty
pub fn roll_room_count(rng: &mut GameRng, difficulty: Difficulty) -> usize {
    let (min, max) = difficulty.room_range();
    rng.range(min, max)
}

/// Draw one candidate room inside the grid with a one-cell margin
fn roll_candidate(rng: &mut GameRng, grid_width: usize, grid_height: usize) -> Room {
    let width = rng.range(ROOM_MIN_WIDTH, ROOM_MAX_WIDTH);
    let height = rng.range(ROOM_MIN_HEIGHT, ROOM_MAX_HEIGHT);
    let x = rng.range(1, grid_width.saturating_sub(width + 2));
    let y = rng.range(1, grid_height.saturating_sub(height + 2));
    Room::new(x as i32, y as i32, width as i32, height as i32)
}

/// Carve a room: floor interior, wall border
pub fn carve_room(grid: &mut Grid, room: &Room) {
    for p in room.cells() {
        let cell = if room.is_border(p) {
            CellType::Wall
        } else {
            CellType::Floor
        };
        grid.set(p, cell);
    }
}

/// Place `count` non-overlapping rooms and carve them into `grid`
///
/// Each room gets a bounded number of candidate draws. When one runs out the
/// whole layout is cleared and started again; after the last restart the
/// placement fails with [`WorldError::RoomPlacementExhausted`].
pub fn place_rooms(grid: &mut Grid, rng: &mut GameRng, count: usize) -> Result<Vec<Room>> {
    let (width, height) = (grid.width(), grid.height());
    let mut best = 0;

    for restart in 0..ROOM_LAYOUT_RESTARTS {
        let mut rooms: Vec<Room> = Vec::new();
        let mut used: HashSet<Point> = HashSet::new();

        'rooms: while rooms.len() < count {
            for _ in 0..ROOM_ATTEMPTS_PER_ROOM {
                let candidate = roll_candidate(rng, width, height);
                if candidate.cells().any(|p| used.contains(&p)) {
                    continue;
                }
                used.extend(candidate.cells());
                rooms.push(candidate);
                continue 'rooms;
            }
            break;
        }

        if rooms.len() == count {
            *grid = Grid::new(width, height);
            for room in &rooms {
                carve_room(grid, room);
            }
            debug!(rooms = count, restart, "room layout placed");
            return Ok(rooms);
        }
        best = best.max(rooms.len());
        debug!(placed = rooms.len(), requested = count, restart, "room layout restarted");
    }

    Err(WorldError::RoomPlacementExhausted {
        requested: count,
        placed: best,
        restarts: ROOM_LAYOUT_RESTARTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_geometry() {
        let room = Room::new(2, 3, 6, 4);
        assert_eq!(room.center(), Point::new(5, 5));
        assert!(room.contains_floor(room.center()));
        assert_eq!(room.cells().count(), 7 * 5);
        assert!(room.is_border(Point::new(2, 4)));
        assert!(room.is_border(Point::new(8, 7)));
        assert!(!room.is_border(Point::new(3, 4)));
        assert!(room.spans_column(7));
        assert!(!room.spans_column(8));
    }

    #[test]
    fn test_overlap() {
        let a = Room::new(0, 0, 5, 3);
        let touching = Room::new(5, 0, 5, 3);
        let apart = Room::new(6, 0, 5, 3);
        assert!(a.overlaps(&touching));
        assert!(!a.overlaps(&apart));
    }

    #[test]
    fn test_carve_room() {
        let mut grid = Grid::new(10, 10);
        let room = Room::new(1, 1, 5, 3);
        carve_room(&mut grid, &room);
        assert_eq!(grid.count(CellType::Floor), 4 * 2);
        assert_eq!(grid.count(CellType::Wall), 6 * 4 - 8);
    }

    #[test]
    fn test_room_count_in_range() {
        let mut rng = GameRng::new(3);
        for _ in 0..200 {
            let n = roll_room_count(&mut rng, Difficulty::MEDIUM);
            assert!((3..=11).contains(&n));
        }
    }

    #[test]
    fn test_place_rooms_no_overlap() {
        let mut grid = Grid::new(80, 45);
        let mut rng = GameRng::new(42);
        let rooms = place_rooms(&mut grid, &mut rng, 8).unwrap();
        assert_eq!(rooms.len(), 8);
        for (i, a) in rooms.iter().enumerate() {
            for b in &rooms[i + 1..] {
                assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
            }
            assert!(a.x >= 1 && a.y >= 1);
            assert!(((a.x + a.width) as usize) < grid.width() - 1);
            assert!(((a.y + a.height) as usize) < grid.height() - 1);
        }
    }

    #[test]
    fn test_place_rooms_exhausts_on_impossible_request() {
        let mut grid = Grid::new(17, 12);
        let mut rng = GameRng::new(1);
        let err = place_rooms(&mut grid, &mut rng, 40).unwrap_err();
        assert!(matches!(
            err,
            WorldError::RoomPlacementExhausted { requested: 40, .. }
        ));
    }
}
