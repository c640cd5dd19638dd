//! Corridor generation
//!
//! Rooms are joined along a minimum spanning tree over their centers
//! (Manhattan distance), grown with Prim's algorithm from the first room.
//! Every accepted edge is carved at once as a one-cell floor lane with
//! walls on either side:
//! 1. Straight, when one center lines up with the other room's floor span
//! 2. L-turn otherwise, horizontal leg first, then vertical

use core::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::room::Room;
use super::{CellType, Grid, Point};

/// Candidate MST edge between two rooms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub distance: usize,
}

impl Ord for Edge {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior in BinaryHeap; ties go to
        // the lower room indices so layouts are stable for a seed
        other
            .distance
            .cmp(&self.distance)
            .then_with(|| other.a.cmp(&self.a))
            .then_with(|| other.b.cmp(&self.b))
    }
}

impl PartialOrd for Edge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A carved corridor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hallway {
    /// Single axis-aligned segment
    Straight { start: Point, end: Point },
    /// Two segments meeting at `corner`
    Turn { start: Point, corner: Point, end: Point },
}

impl Hallway {
    /// Pick the corridor shape joining two rooms, center to center
    pub fn between(from: &Room, to: &Room) -> Self {
        let start = from.center();
        let end = to.center();
        if to.spans_column(start.x) {
            Hallway::Straight {
                start,
                end: Point::new(start.x, end.y),
            }
        } else if to.spans_row(start.y) {
            Hallway::Straight {
                start,
                end: Point::new(end.x, start.y),
            }
        } else {
            Hallway::Turn {
                start,
                corner: Point::new(end.x, start.y),
                end,
            }
        }
    }

    pub fn is_straight(&self) -> bool {
        matches!(self, Hallway::Straight { .. })
    }

    /// Lane cells from start to end, each 4-adjacent to the previous one
    pub fn lane(&self) -> Vec<Point> {
        match *self {
            Hallway::Straight { start, end } => segment(start, end),
            Hallway::Turn { start, corner, end } => {
                let mut cells = segment(start, corner);
                cells.extend(segment(corner, end).into_iter().skip(1));
                cells
            }
        }
    }

    /// Rasterize: floor lane first, then walls on the non-floor cells around it
    pub fn carve(&self, grid: &mut Grid) {
        let lane = self.lane();
        for &p in &lane {
            grid.paint(p, CellType::Floor);
        }
        for &p in &lane {
            for q in p.ring() {
                if grid.cell(q) == CellType::Empty {
                    grid.paint(q, CellType::Wall);
                }
            }
        }
    }
}

/// Inclusive axis-aligned run of cells
fn segment(from: Point, to: Point) -> Vec<Point> {
    let dx = (to.x - from.x).signum();
    let dy = (to.y - from.y).signum();
    let steps = from.manhattan(to);
    (0..=steps as i32)
        .map(|i| Point::new(from.x + dx * i, from.y + dy * i))
        .collect()
}

/// Connect every room with a minimum spanning tree of corridors
///
/// Returns the carved hallways in the order they were accepted; there are
/// always `rooms.len() - 1` of them.
pub fn connect_rooms(grid: &mut Grid, rooms: &[Room]) -> Vec<Hallway> {
    let mut hallways = Vec::with_capacity(rooms.len().saturating_sub(1));
    if rooms.len() < 2 {
        return hallways;
    }

    let mut in_tree = vec![false; rooms.len()];
    let mut frontier = BinaryHeap::new();
    in_tree[0] = true;
    push_edges(&mut frontier, rooms, 0, &in_tree);

    while let Some(edge) = frontier.pop() {
        if in_tree[edge.a] && in_tree[edge.b] {
            continue;
        }
        let new_room = if in_tree[edge.a] { edge.b } else { edge.a };
        in_tree[new_room] = true;

        let hallway = Hallway::between(&rooms[edge.a], &rooms[edge.b]);
        hallway.carve(grid);
        debug!(from = edge.a, to = edge.b, distance = edge.distance, straight = hallway.is_straight(), "corridor carved");
        hallways.push(hallway);

        if hallways.len() == rooms.len() - 1 {
            break;
        }
        push_edges(&mut frontier, rooms, new_room, &in_tree);
    }

    hallways
}

fn push_edges(frontier: &mut BinaryHeap<Edge>, rooms: &[Room], from: usize, in_tree: &[bool]) {
    for (to, room) in rooms.iter().enumerate() {
        if !in_tree[to] {
            frontier.push(Edge {
                a: from,
                b: to,
                distance: rooms[from].distance(room),
            });
        }
    }
}

/// Check that all floor cells form one 4-connected region
pub fn floor_is_connected(grid: &Grid) -> bool {
    let Some(start) = grid.floor_points().next() else {
        return true;
    };
    let total = grid.floor_points().count();

    let mut seen = hashbrown::HashSet::new();
    let mut stack = vec![start];
    seen.insert(start);
    while let Some(p) = stack.pop() {
        for q in p.neighbors() {
            if grid.is_floor(q) && seen.insert(q) {
                stack.push(q);
            }
        }
    }
    seen.len() == total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::room::carve_room;

    #[test]
    fn test_edge_min_heap_order() {
        let mut heap = BinaryHeap::new();
        heap.push(Edge { a: 0, b: 1, distance: 9 });
        heap.push(Edge { a: 0, b: 2, distance: 3 });
        heap.push(Edge { a: 0, b: 3, distance: 3 });
        assert_eq!(heap.pop().map(|e| e.b), Some(2));
        assert_eq!(heap.pop().map(|e| e.b), Some(3));
        assert_eq!(heap.pop().map(|e| e.distance), Some(9));
    }

    #[test]
    fn test_vertical_straight_hallway() {
        let top = Room::new(2, 1, 8, 4);
        let bottom = Room::new(3, 10, 8, 4);
        let hallway = Hallway::between(&top, &bottom);
        assert!(hallway.is_straight());
        let lane = hallway.lane();
        assert_eq!(lane.first(), Some(&top.center()));
        assert!(bottom.contains_floor(*lane.last().unwrap()));
    }

    #[test]
    fn test_turn_hallway_lane_is_contiguous() {
        let a = Room::new(1, 1, 5, 3);
        let b = Room::new(12, 9, 5, 3);
        let hallway = Hallway::between(&a, &b);
        assert!(!hallway.is_straight());
        let lane = hallway.lane();
        assert_eq!(lane.first(), Some(&a.center()));
        assert_eq!(lane.last(), Some(&b.center()));
        for pair in lane.windows(2) {
            assert!(pair[0].is_adjacent(pair[1]));
        }
    }

    #[test]
    fn test_carve_flanks_lane_with_walls() {
        let mut grid = Grid::new(12, 5);
        let hallway = Hallway::Straight {
            start: Point::new(1, 2),
            end: Point::new(10, 2),
        };
        hallway.carve(&mut grid);
        for x in 1..=10 {
            assert_eq!(grid.cell(Point::new(x, 2)), CellType::Floor);
            assert_eq!(grid.cell(Point::new(x, 1)), CellType::Wall);
            assert_eq!(grid.cell(Point::new(x, 3)), CellType::Wall);
        }
    }

    #[test]
    fn test_carve_breaks_room_walls_but_keeps_floor() {
        let mut grid = Grid::new(30, 12);
        let a = Room::new(1, 1, 6, 4);
        let b = Room::new(15, 6, 6, 4);
        carve_room(&mut grid, &a);
        carve_room(&mut grid, &b);
        assert!(!floor_is_connected(&grid));

        let hallways = connect_rooms(&mut grid, &[a, b]);
        assert_eq!(hallways.len(), 1);
        assert!(floor_is_connected(&grid));
        assert_eq!(grid.cell(a.center()), CellType::Floor);
        assert_eq!(grid.cell(b.center()), CellType::Floor);
    }

    #[test]
    fn test_mst_edge_count() {
        let rooms = [
            Room::new(1, 1, 5, 3),
            Room::new(20, 1, 6, 4),
            Room::new(40, 2, 7, 5),
            Room::new(5, 20, 8, 6),
            Room::new(30, 25, 9, 4),
        ];
        let mut grid = Grid::new(60, 40);
        for room in &rooms {
            carve_room(&mut grid, room);
        }
        let hallways = connect_rooms(&mut grid, &rooms);
        assert_eq!(hallways.len(), rooms.len() - 1);
        assert!(floor_is_connected(&grid));
    }

    #[test]
    fn test_single_room_needs_no_corridor() {
        let mut grid = Grid::new(20, 20);
        let room = Room::new(2, 2, 6, 4);
        carve_room(&mut grid, &room);
        assert!(connect_rooms(&mut grid, &[room]).is_empty());
        assert!(floor_is_connected(&grid));
    }
}
