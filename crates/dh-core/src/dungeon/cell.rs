//! Map cell types, points and directions

use core::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Door lock state
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum DoorState {
    #[default]
    Locked,
    Unlocked,
}

/// Structural cell tag
///
/// Occupants (player, hunter, items, obstacles) never appear here; they live
/// in the world's overlay map.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum CellType {
    /// Unused space outside rooms and corridors
    #[default]
    Empty,
    Floor,
    Wall,
    Door(DoorState),
}

impl CellType {
    pub const fn is_floor(&self) -> bool {
        matches!(self, CellType::Floor)
    }

    pub const fn is_wall(&self) -> bool {
        matches!(self, CellType::Wall)
    }

    pub const fn is_door(&self) -> bool {
        matches!(self, CellType::Door(_))
    }

    /// The player may stand here
    pub const fn is_walkable(&self) -> bool {
        matches!(self, CellType::Floor | CellType::Door(_))
    }

    /// Get the display character for this cell type
    pub const fn symbol(&self) -> char {
        match self {
            CellType::Empty => ' ',
            CellType::Floor => '.',
            CellType::Wall => '#',
            CellType::Door(DoorState::Locked) => '+',
            CellType::Door(DoorState::Unlocked) => '\'',
        }
    }
}

/// Grid coordinate; y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbor one step in a direction
    pub const fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn manhattan(self, other: Point) -> usize {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as usize
    }

    /// Straight-line distance
    pub fn distance(self, other: Point) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_adjacent(self, other: Point) -> bool {
        self.manhattan(other) == 1
    }

    /// 4-directional neighbors in W, E, N, S order
    pub fn neighbors(self) -> [Point; 4] {
        Direction::ALL.map(|d| self.step(d))
    }

    /// The 8 surrounding points
    pub fn ring(self) -> impl Iterator<Item = Point> {
        (-1..=1)
            .flat_map(move |dy| (-1..=1).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .map(move |(dx, dy)| self.offset(dx, dy))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Orthogonal movement direction
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Direction {
    West,
    East,
    North,
    #[default]
    South,
}

impl Direction {
    /// Fixed neighbor order used wherever the first valid neighbor wins
    pub const ALL: [Direction; 4] = [
        Direction::West,
        Direction::East,
        Direction::North,
        Direction::South,
    ];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
            Direction::North => (0, -1),
            Direction::South => (0, 1),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::West => Direction::East,
            Direction::East => Direction::West,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
        }
    }

    /// WASD key mapping
    pub fn from_key(key: char) -> Option<Direction> {
        match key.to_ascii_lowercase() {
            'w' => Some(Direction::North),
            'a' => Some(Direction::West),
            's' => Some(Direction::South),
            'd' => Some(Direction::East),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_walkable_cells() {
        assert!(CellType::Floor.is_walkable());
        assert!(CellType::Door(DoorState::Locked).is_walkable());
        assert!(!CellType::Wall.is_walkable());
        assert!(!CellType::Empty.is_walkable());
    }

    #[test]
    fn test_symbols_distinct() {
        let symbols: Vec<char> = [
            CellType::Empty,
            CellType::Floor,
            CellType::Wall,
            CellType::Door(DoorState::Locked),
            CellType::Door(DoorState::Unlocked),
        ]
        .iter()
        .map(CellType::symbol)
        .collect();
        for (i, a) in symbols.iter().enumerate() {
            for b in &symbols[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_direction_round_trip() {
        for dir in Direction::iter() {
            let p = Point::new(5, 5);
            assert_eq!(p.step(dir).step(dir.opposite()), p);
            assert!(p.step(dir).is_adjacent(p));
        }
    }

    #[test]
    fn test_ring_has_eight_points() {
        let p = Point::new(0, 0);
        let ring: Vec<Point> = p.ring().collect();
        assert_eq!(ring.len(), 8);
        assert!(!ring.contains(&p));
    }

    #[test]
    fn test_from_key() {
        assert_eq!(Direction::from_key('W'), Some(Direction::North));
        assert_eq!(Direction::from_key('d'), Some(Direction::East));
        assert_eq!(Direction::from_key('x'), None);
    }
}
