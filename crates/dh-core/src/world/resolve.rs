//! Obstacle effects
//!
//! One match over the closed set of obstacle types. Everything except
//! DarkMode leaves the map the moment it fires.

use tracing::{debug, warn};

use crate::content::{ObstacleType, Occupant};
use crate::dungeon::{Direction, Point};
use crate::{
    DARK_VISION_RADIUS, TELEPORT_DOOR_CLEARANCE, TELEPORT_HUNTER_CLEARANCE, TORCH_VISION_RADIUS,
};

use super::{GameEvent, Slide, World};

impl World {
    pub(super) fn trigger_obstacle(&mut self, ty: ObstacleType, at: Point) {
        if ty.is_one_shot() {
            self.overlay.remove(&at);
        }
        debug!(obstacle = %ty, %at, "obstacle triggered");

        match ty {
            ObstacleType::Spikes => {
                let penalty = ty.point_penalty();
                self.score += penalty;
                self.emit(GameEvent::ObstacleTriggered(format!(
                    "Ouch! Spikes cost you {} points",
                    -penalty
                )));
            }
            ObstacleType::Teleporter => self.teleport(),
            ObstacleType::Ice => {
                self.slide = Some(Slide {
                    direction: self.last_direction,
                    steps: 0,
                });
                self.emit(GameEvent::ObstacleTriggered("You slip on the ice".into()));
            }
            ObstacleType::DarkMode => self.darken(at),
        }
    }

    /// Cells a teleporter may send the player to
    ///
    /// Free floor, away from the door, and far from the hunter either in a
    /// straight line or by path. A cell the hunter cannot reach counts as far.
    pub fn teleport_candidates(&mut self) -> Vec<Point> {
        let now = self.now_ms();
        let hunter = self.hunter.position();
        let clearance = TELEPORT_HUNTER_CLEARANCE as f64;
        let floors: Vec<Point> = self.grid.floor_points().collect();

        let mut candidates = Vec::new();
        for p in floors {
            if p == self.player || self.overlay.contains_key(&p) {
                continue;
            }
            if self
                .door
                .is_some_and(|door| door.distance(p) <= TELEPORT_DOOR_CLEARANCE)
            {
                continue;
            }
            let far = hunter.distance(p) > clearance
                || self
                    .pathfinder
                    .distance(&self.grid, hunter, p, now)
                    .is_none_or(|steps| steps > TELEPORT_HUNTER_CLEARANCE);
            if far {
                candidates.push(p);
            }
        }
        candidates
    }

    fn teleport(&mut self) {
        let candidates = self.teleport_candidates();
        match self.rng.choose(&candidates).copied() {
            Some(dest) => {
                debug!(from = %self.player, to = %dest, "teleported");
                self.player = dest;
                self.emit(GameEvent::ObstacleTriggered(format!(
                    "Teleported to {dest}"
                )));
            }
            None => {
                warn!(at = %self.player, "teleporter found no destination");
                self.emit(GameEvent::ObstacleTriggered(
                    "The teleporter malfunctions".into(),
                ));
            }
        }
    }

    fn darken(&mut self, at: Point) {
        self.dark = true;
        self.vision_radius = DARK_VISION_RADIUS;
        self.emit(GameEvent::ObstacleTriggered("Darkness falls".into()));

        if !self.torch_spent.insert(at) {
            return;
        }
        let spot = Direction::ALL.into_iter().map(|d| at.step(d)).find(|&p| {
            self.grid.is_floor(p) && !self.overlay.contains_key(&p) && p != self.hunter.position()
        });
        match spot {
            Some(p) => {
                self.overlay.insert(p, Occupant::Torch);
                debug!(torch = %p, "torch spawned");
            }
            None => debug!(%at, "no room for a torch"),
        }
    }

    pub(super) fn pick_up_torch(&mut self, p: Point) {
        self.overlay.remove(&p);
        self.vision_radius = TORCH_VISION_RADIUS;
        self.emit(GameEvent::ItemPickedUp("You picked up a torch".into()));
    }

    /// Move one cell along an active ice slide
    ///
    /// Returns `true` while the player keeps sliding. Items on the way are
    /// collected; obstacles are skipped over.
    pub fn advance_slide(&mut self) -> bool {
        let Some(mut slide) = self.slide else {
            return false;
        };
        if self.is_over() {
            self.slide = None;
            return false;
        }

        let next = self.player.step(slide.direction);
        if !self.grid.is_walkable(next) {
            self.slide = None;
            debug!(steps = slide.steps, at = %self.player, "slide stopped");
            self.emit(GameEvent::ObstacleEffectEnded("You stop sliding".into()));
            return false;
        }

        slide.steps += 1;
        self.slide = Some(slide);
        self.arrive(next, false);
        self.check_proximity();
        self.slide.is_some()
    }

    /// Run an active slide to its end
    pub fn finish_slide(&mut self) {
        while self.advance_slide() {}
    }
}

#[cfg(test)]
mod tests {
    use crate::clock::ManualClock;
    use crate::content::{ConsumableKind, ObstacleType, Occupant};
    use crate::dungeon::{Direction, Grid, Point};
    use crate::world::GameEvent;
    use crate::world::tests::test_world;
    use crate::{DARK_VISION_RADIUS, DEFAULT_VISION_RADIUS, TORCH_VISION_RADIUS};

    fn triggered(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::ObstacleTriggered(_)))
            .count()
    }

    #[test]
    fn test_spikes_fire_once() {
        let mut world = test_world(ManualClock::new(0));
        world.set_score(20);
        world.add_obstacle(Point::new(2, 2), ObstacleType::Spikes).unwrap();

        world.move_player(Direction::East);
        assert_eq!(world.score(), 10);
        assert_eq!(world.occupant(Point::new(2, 2)), None);
        assert_eq!(triggered(&world.drain_events()), 1);

        world.move_player(Direction::West);
        world.move_player(Direction::East);
        assert_eq!(world.score(), 10);
        assert_eq!(triggered(&world.drain_events()), 0);
    }

    #[test]
    fn test_teleport_keeps_clear_of_hunter_and_door() {
        let mut world = test_world(ManualClock::new(0));
        world.set_hunter_position(Point::new(8, 1)).unwrap();
        world.add_obstacle(Point::new(2, 2), ObstacleType::Teleporter).unwrap();

        world.move_player(Direction::East);
        let dest = world.player_position();
        assert_ne!(dest, Point::new(2, 2));
        assert!(world.grid().is_floor(dest));
        assert!(dest.distance(Point::new(4, 4)) > 3.0);
        // open room: path length is the manhattan distance
        let hunter = Point::new(8, 1);
        assert!(dest.distance(hunter) > 5.0 || dest.manhattan(hunter) > 5);
        assert_eq!(world.occupant(Point::new(2, 2)), None);
    }

    #[test]
    fn test_teleport_targets_far_by_line_or_by_path() {
        let mut world = test_world(ManualClock::new(0));
        world.grid = Grid::from_rows(&[
            "#########",
            "#.......#",
            "#######.#",
            "#.......#",
            "#########",
        ]);
        world.pathfinder.clear();
        world.door = None;
        world.player = Point::new(1, 3);
        world.set_hunter_position(Point::new(1, 1)).unwrap();
        world
            .add_consumable(Point::new(4, 3), ConsumableKind::NormalFace)
            .unwrap();

        let mut candidates = world.teleport_candidates();
        candidates.sort();
        let mut expected = vec![
            // beyond 5 in a straight line
            Point::new(7, 1),
            Point::new(7, 2),
            // within 5 in a straight line but more than 5 steps around the wall
            Point::new(2, 3),
            Point::new(3, 3),
            Point::new(5, 3),
            Point::new(6, 3),
            Point::new(7, 3),
        ];
        expected.sort();
        assert_eq!(candidates, expected);
    }

    #[test]
    fn test_teleport_skips_cells_near_door() {
        let mut world = test_world(ManualClock::new(0));
        world.set_hunter_position(Point::new(8, 1)).unwrap();
        let candidates = world.teleport_candidates();
        assert!(!candidates.is_empty());
        assert!(candidates.iter().all(|p| p.distance(Point::new(4, 4)) > 3.0));
        assert!(!candidates.contains(&Point::new(1, 2)));
        assert!(!candidates.contains(&Point::new(7, 1)));
    }

    #[test]
    fn test_teleport_malfunction_leaves_player() {
        let mut world = test_world(ManualClock::new(0));
        world.grid = Grid::from_rows(&["#####", "#...#", "#####"]);
        world.door = None;
        world.player = Point::new(1, 1);
        world.set_hunter_position(Point::new(3, 1)).unwrap();
        world.add_obstacle(Point::new(2, 1), ObstacleType::Teleporter).unwrap();

        world.move_player(Direction::East);
        assert_eq!(world.player_position(), Point::new(2, 1));
        assert!(world
            .drain_events()
            .contains(&GameEvent::ObstacleTriggered("The teleporter malfunctions".into())));
    }

    #[test]
    fn test_ice_slides_to_wall() {
        let mut world = test_world(ManualClock::new(0));
        world.set_concealed(true);
        world.add_obstacle(Point::new(2, 2), ObstacleType::Ice).unwrap();
        world
            .add_consumable(Point::new(5, 2), ConsumableKind::NormalFace)
            .unwrap();
        world.add_obstacle(Point::new(6, 2), ObstacleType::Spikes).unwrap();

        world.move_player(Direction::East);
        assert!(world.is_sliding());
        assert!(!world.move_player(Direction::North));

        assert!(world.advance_slide());
        assert_eq!(world.player_position(), Point::new(3, 2));
        world.finish_slide();
        assert!(!world.is_sliding());
        assert_eq!(world.player_position(), Point::new(8, 2));

        // collected on the way, spikes skipped and still armed
        assert_eq!(world.score(), 5);
        assert_eq!(
            world.occupant(Point::new(6, 2)),
            Some(Occupant::Obstacle(ObstacleType::Spikes))
        );
        assert_eq!(world.occupant(Point::new(2, 2)), None);
        let events = world.drain_events();
        assert!(events.contains(&GameEvent::ObstacleEffectEnded("You stop sliding".into())));
        assert!(world.move_player(Direction::West));
    }

    #[test]
    fn test_slide_into_hunter_is_caught() {
        let mut world = test_world(ManualClock::new(0));
        world.add_obstacle(Point::new(2, 2), ObstacleType::Ice).unwrap();
        world.move_player(Direction::East);
        world.finish_slide();
        assert!(world.is_caught());
        assert_eq!(world.player_position(), Point::new(8, 2));
        assert!(!world.is_sliding());
    }

    #[test]
    fn test_dark_mode_persists_and_spawns_one_torch() {
        let mut world = test_world(ManualClock::new(0));
        world.add_obstacle(Point::new(2, 2), ObstacleType::DarkMode).unwrap();

        world.move_player(Direction::East);
        assert!(world.is_dark());
        assert_eq!(world.vision_radius(), DARK_VISION_RADIUS);
        assert_eq!(
            world.occupant(Point::new(2, 2)),
            Some(Occupant::Obstacle(ObstacleType::DarkMode))
        );
        // west neighbor is the first valid spot
        assert_eq!(world.occupant(Point::new(1, 2)), Some(Occupant::Torch));

        world.move_player(Direction::West);
        assert_eq!(world.vision_radius(), TORCH_VISION_RADIUS);
        assert_eq!(world.torches().count(), 0);
        assert!(world.is_dark());

        // re-entering darkens again but never spawns a second torch
        world.move_player(Direction::East);
        assert_eq!(world.vision_radius(), DARK_VISION_RADIUS);
        assert_eq!(world.torches().count(), 0);

        world.exit_dark_mode();
        assert!(!world.is_dark());
        assert_eq!(world.vision_radius(), DEFAULT_VISION_RADIUS);
    }
}
