//! Hunter AI
//!
//! The hunter has no stored mode. Every tick looks at the player's
//! concealment flag: a visible player is pursued along the shortest path,
//! a concealed one leaves the hunter wandering between floor cells.

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::debug;

use crate::dungeon::{Grid, Point};
use crate::pathfind::Pathfinder;
use crate::rng::GameRng;

/// What the hunter does on a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum HunterMode {
    Pursuing,
    Searching,
}

impl HunterMode {
    pub const fn for_concealment(concealed: bool) -> Self {
        if concealed {
            HunterMode::Searching
        } else {
            HunterMode::Pursuing
        }
    }
}

/// The adversarial agent
#[derive(Debug, Clone)]
pub struct Hunter {
    pos: Point,
    last_path: Vec<Point>,
    mode: HunterMode,
    search_rng: GameRng,
}

impl Hunter {
    /// `search_rng` drives the wander walk only; layout randomness stays separate
    pub fn new(pos: Point, search_rng: GameRng) -> Self {
        Self {
            pos,
            last_path: Vec::new(),
            mode: HunterMode::Pursuing,
            search_rng,
        }
    }

    pub fn position(&self) -> Point {
        self.pos
    }

    pub fn set_position(&mut self, pos: Point) {
        self.pos = pos;
        self.last_path.clear();
    }

    /// Path computed on the latest pursuing tick
    pub fn last_path(&self) -> &[Point] {
        &self.last_path
    }

    /// Mode used by the most recent tick
    pub fn mode(&self) -> HunterMode {
        self.mode
    }

    /// Advance one step; returns the new position if the hunter moved
    pub fn tick(
        &mut self,
        grid: &Grid,
        target: Point,
        concealed: bool,
        pathfinder: &mut Pathfinder,
        now_ms: u64,
    ) -> Option<Point> {
        self.mode = HunterMode::for_concealment(concealed);
        let next = match self.mode {
            HunterMode::Pursuing => self.pursue(grid, target, pathfinder, now_ms),
            HunterMode::Searching => self.wander(grid),
        };
        if let Some(p) = next {
            self.pos = p;
        }
        next
    }

    fn pursue(
        &mut self,
        grid: &Grid,
        target: Point,
        pathfinder: &mut Pathfinder,
        now_ms: u64,
    ) -> Option<Point> {
        match pathfinder.find_path(grid, self.pos, target, now_ms) {
            Some(path) => {
                let next = path.first().copied();
                self.last_path = path;
                next
            }
            None => {
                debug!(from = %self.pos, to = %target, "hunter has no path to player");
                self.last_path.clear();
                None
            }
        }
    }

    fn wander(&mut self, grid: &Grid) -> Option<Point> {
        self.last_path.clear();
        let options: Vec<Point> = self
            .pos
            .neighbors()
            .into_iter()
            .filter(|&p| grid.is_floor(p))
            .collect();
        self.search_rng.choose(&options).copied()
    }
}
