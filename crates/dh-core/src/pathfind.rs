//! Grid pathfinding with a short-lived result cache
//!
//! A* over 4-neighbors with unit step cost and a Manhattan heuristic.
//! Floor cells are walkable, and so is the goal itself: the hunter must be
//! able to step onto the player even when the player stands on a door.
//! Equal-priority nodes leave the open set in insertion order.

use core::cmp::Ordering;
use std::collections::BinaryHeap;

use hashbrown::{HashMap, HashSet};

use crate::PATH_CACHE_TTL_MS;
use crate::dungeon::{Grid, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Node {
    f: usize,
    seq: u64,
    point: Point,
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior in BinaryHeap
        other.f.cmp(&self.f).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    path: Option<Vec<Point>>,
    computed_at: u64,
}

/// Shortest-path service shared by the hunter and proximity checks
#[derive(Debug, Clone)]
pub struct Pathfinder {
    cache: HashMap<(Point, Point), CacheEntry>,
    ttl_ms: u64,
    searches: u64,
}

impl Default for Pathfinder {
    fn default() -> Self {
        Self::new()
    }
}

impl Pathfinder {
    pub fn new() -> Self {
        Self::with_ttl(PATH_CACHE_TTL_MS)
    }

    pub fn with_ttl(ttl_ms: u64) -> Self {
        Self {
            cache: HashMap::new(),
            ttl_ms,
            searches: 0,
        }
    }

    /// Number of searches actually run (cache hits excluded)
    pub fn searches(&self) -> u64 {
        self.searches
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Path from `start` to `goal`, excluding `start` and including `goal`
    ///
    /// `None` means unreachable. A repeated query within the TTL returns a
    /// copy of the cached result; older entries are recomputed.
    pub fn find_path(
        &mut self,
        grid: &Grid,
        start: Point,
        goal: Point,
        now_ms: u64,
    ) -> Option<Vec<Point>> {
        if let Some(entry) = self.cache.get(&(start, goal))
            && now_ms.saturating_sub(entry.computed_at) < self.ttl_ms
        {
            return entry.path.clone();
        }

        let path = self.search(grid, start, goal);
        self.cache.insert(
            (start, goal),
            CacheEntry {
                path: path.clone(),
                computed_at: now_ms,
            },
        );
        path
    }

    /// Number of steps from `start` to `goal`, if reachable
    pub fn distance(&mut self, grid: &Grid, start: Point, goal: Point, now_ms: u64) -> Option<usize> {
        self.find_path(grid, start, goal, now_ms).map(|p| p.len())
    }

    fn search(&mut self, grid: &Grid, start: Point, goal: Point) -> Option<Vec<Point>> {
        self.searches += 1;
        if !grid.in_bounds(start) || !grid.in_bounds(goal) {
            return None;
        }
        if start == goal {
            return Some(Vec::new());
        }

        let mut open = BinaryHeap::new();
        let mut g_score: HashMap<Point, usize> = HashMap::new();
        let mut came_from: HashMap<Point, Point> = HashMap::new();
        let mut closed: HashSet<Point> = HashSet::new();
        let mut seq = 0u64;

        g_score.insert(start, 0);
        open.push(Node {
            f: start.manhattan(goal),
            seq,
            point: start,
        });

        while let Some(Node { point: current, .. }) = open.pop() {
            if current == goal {
                return Some(reconstruct(&came_from, start, goal));
            }
            if !closed.insert(current) {
                continue;
            }
            let g = g_score[&current];

            for next in current.neighbors() {
                if closed.contains(&next) || !(next == goal || grid.is_floor(next)) {
                    continue;
                }
                let tentative = g + 1;
                if g_score.get(&next).is_some_and(|&old| tentative >= old) {
                    continue;
                }
                g_score.insert(next, tentative);
                came_from.insert(next, current);
                seq += 1;
                open.push(Node {
                    f: tentative + next.manhattan(goal),
                    seq,
                    point: next,
                });
            }
        }
        None
    }
}

fn reconstruct(came_from: &HashMap<Point, Point>, start: Point, goal: Point) -> Vec<Point> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        if prev == start {
            break;
        }
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
