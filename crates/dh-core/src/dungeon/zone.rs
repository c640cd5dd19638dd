//! Zone-based content placement
//!
//! The grid is cut into `ZONE_SIZE` squares. Each zone's difficulty is the
//! distance of its center from the player start relative to the grid
//! diagonal, so content gets harsher farther from the start. Within a zone
//! cells are drawn by weighted roulette:
//!
//! `wall_factor × spacing_factor × (1 + difficulty) × access_factor`

use hashbrown::HashSet;
use tracing::{debug, warn};

use crate::content::{ConsumableKind, ObstacleType, Occupant};
use crate::rng::GameRng;
use crate::{ITEM_SPACING, SPACING_SATURATION, ZONE_SIZE};

use super::{Grid, Point};

/// Rectangular slice of the grid with a difficulty in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub difficulty: f64,
}

impl Zone {
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (self.y..self.y + self.height)
            .flat_map(move |y| (self.x..self.x + self.width).map(move |x| Point::new(x, y)))
    }
}

/// Cut the grid into zones, row-major, clipped at the right and bottom edges
pub fn partition(grid: &Grid, player_start: Point) -> Vec<Zone> {
    let (w, h) = (grid.width() as f64, grid.height() as f64);
    let diagonal = (w * w + h * h).sqrt().max(1.0);
    let mut zones = Vec::new();

    for y in (0..grid.height()).step_by(ZONE_SIZE) {
        for x in (0..grid.width()).step_by(ZONE_SIZE) {
            let width = ZONE_SIZE.min(grid.width() - x);
            let height = ZONE_SIZE.min(grid.height() - y);
            let cx = x as f64 + width as f64 / 2.0;
            let cy = y as f64 + height as f64 / 2.0;
            let dx = cx - player_start.x as f64;
            let dy = cy - player_start.y as f64;
            let difficulty = ((dx * dx + dy * dy).sqrt() / diagonal).clamp(0.0, 1.0);
            zones.push(Zone {
                x: x as i32,
                y: y as i32,
                width: width as i32,
                height: height as i32,
                difficulty,
            });
        }
    }
    zones
}

/// Split `count` evenly, handing the remainder to the first zones
pub fn split_evenly(count: usize, zones: usize) -> Vec<usize> {
    if zones == 0 {
        return Vec::new();
    }
    let base = count / zones;
    let extra = count % zones;
    (0..zones).map(|i| base + usize::from(i < extra)).collect()
}

/// Roulette draw over weights; first cumulative match wins
///
/// Falls back to a uniform draw when every weight is zero.
pub fn roulette(weights: &[f64], rng: &mut GameRng) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Some(rng.rn2(weights.len() as u32) as usize);
    }
    let target = rng.unit() * total;
    let mut cumulative = 0.0;
    for (i, w) in weights.iter().enumerate() {
        cumulative += w;
        if target < cumulative {
            return Some(i);
        }
    }
    Some(weights.len() - 1)
}

fn spacing_of(occupant: Occupant) -> f64 {
    match occupant {
        Occupant::Obstacle(ty) => ty.spacing(),
        _ => ITEM_SPACING,
    }
}

/// Places consumables and obstacles across zones
pub struct ZonePlanner<'a> {
    grid: &'a Grid,
    zones: Vec<Zone>,
    occupied: HashSet<Point>,
    placed: Vec<Point>,
    placements: Vec<(Point, Occupant)>,
}

impl<'a> ZonePlanner<'a> {
    /// `reserved` cells (player, hunter, door) never receive content
    pub fn new(grid: &'a Grid, player_start: Point, reserved: &[Point]) -> Self {
        Self {
            grid,
            zones: partition(grid, player_start),
            occupied: reserved.iter().copied().collect(),
            placed: Vec::new(),
            placements: Vec::new(),
        }
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Difficulty of the zone holding `p`
    pub fn difficulty_at(&self, p: Point) -> f64 {
        self.zones
            .iter()
            .find(|z| z.contains(p))
            .map_or(0.0, |z| z.difficulty)
    }

    /// Placement weight of a candidate cell
    pub fn weight(&self, p: Point, difficulty: f64) -> f64 {
        let wall_factor = 1.0 - self.grid.walls_around(p) as f64 / 8.0;
        let spacing_factor = self
            .placed
            .iter()
            .map(|&q| q.distance(p))
            .min_by(f64::total_cmp)
            .map_or(1.0, |d| (d / SPACING_SATURATION).min(1.0));
        let access_factor = self.grid.floors_around(p) as f64 / 8.0;
        wall_factor * spacing_factor * (1.0 + difficulty) * access_factor
    }

    fn is_free(&self, p: Point) -> bool {
        self.grid.is_floor(p) && !self.occupied.contains(&p)
    }

    fn commit(&mut self, p: Point, occupant: Occupant) {
        self.occupied.insert(p);
        self.placed.push(p);
        self.placements.push((p, occupant));
    }

    /// Place `count` occupants zone by zone; returns how many could not be placed
    fn place_in_zones<F>(&mut self, count: usize, rng: &mut GameRng, mut make: F) -> usize
    where
        F: FnMut(f64, &mut GameRng) -> Occupant,
    {
        let quotas = split_evenly(count, self.zones.len());
        let mut carry = 0;

        for (i, zone) in self.zones.clone().into_iter().enumerate() {
            let mut wanted = quotas[i] + carry;
            let mut candidates: Vec<Point> = zone.points().filter(|&p| self.is_free(p)).collect();

            while wanted > 0 {
                let weights: Vec<f64> = candidates
                    .iter()
                    .map(|&p| self.weight(p, zone.difficulty))
                    .collect();
                let Some(idx) = roulette(&weights, rng) else {
                    break;
                };
                let p = candidates.swap_remove(idx);
                let occupant = make(zone.difficulty, rng);
                let radius = spacing_of(occupant);
                candidates.retain(|q| q.distance(p) >= radius);
                self.commit(p, occupant);
                wanted -= 1;
            }
            carry = wanted;
        }

        if carry > 0 {
            debug!(carry, "zone quotas short, placing remainder grid-wide");
            let mut candidates: Vec<Point> = self.grid.points().filter(|&p| self.is_free(p)).collect();
            while carry > 0 {
                let weights: Vec<f64> = candidates
                    .iter()
                    .map(|&p| self.weight(p, self.difficulty_at(p)))
                    .collect();
                let Some(idx) = roulette(&weights, rng) else {
                    break;
                };
                let p = candidates.swap_remove(idx);
                let occupant = make(self.difficulty_at(p), rng);
                self.commit(p, occupant);
                carry -= 1;
            }
        }
        carry
    }

    /// Place obstacles (DarkMode first) and then consumables
    pub fn populate(
        mut self,
        consumables: usize,
        obstacles: usize,
        rng: &mut GameRng,
    ) -> Vec<(Point, Occupant)> {
        let dark = if obstacles == 0 {
            0
        } else {
            (obstacles / 5).max(1).min(obstacles)
        };

        let mut missing = self.place_in_zones(dark, rng, |_, _| {
            Occupant::Obstacle(ObstacleType::DarkMode)
        });
        missing += self.place_in_zones(obstacles - dark, rng, |d, rng| {
            Occupant::Obstacle(ObstacleType::roll(d, rng))
        });
        missing += self.place_in_zones(consumables, rng, |d, rng| {
            Occupant::Consumable(ConsumableKind::roll(d, rng))
        });

        if missing > 0 {
            warn!(missing, "not enough free floor for all content");
        }
        debug!(placed = self.placements.len(), dark, "content placed");
        self.placements
    }
}
