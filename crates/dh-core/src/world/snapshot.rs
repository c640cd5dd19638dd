//! Save and restore
//!
//! A snapshot only records what the public accessors expose. Restoring
//! regenerates the level from the stored config (same seed, same grid) and
//! then replays the state through the persistence setters.

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::config::WorldConfig;
use crate::content::{ConsumableKind, ObstacleType};
use crate::dungeon::{DoorState, Point};
use crate::error::Result;

use super::World;

/// Serializable copy of a world's dynamic state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub config: WorldConfig,
    pub player: Point,
    pub hunter: Point,
    pub door: Option<Point>,
    #[serde(default)]
    pub door_unlocked: bool,
    pub score: i32,
    pub concealed: bool,
    pub dark: bool,
    pub vision_radius: u32,
    pub consumables: Vec<(Point, ConsumableKind)>,
    pub obstacles: Vec<(Point, ObstacleType)>,
    #[serde(default)]
    pub torches: Vec<Point>,
    #[serde(default)]
    pub spent_torches: Vec<Point>,
}

impl World {
    pub fn snapshot(&self) -> WorldSnapshot {
        let mut consumables: Vec<_> = self.consumables().collect();
        let mut obstacles: Vec<_> = self.obstacles().collect();
        let mut torches: Vec<_> = self.torches().collect();
        let mut spent_torches: Vec<_> = self.spent_torches().collect();
        consumables.sort();
        obstacles.sort();
        torches.sort();
        spent_torches.sort();

        WorldSnapshot {
            config: self.config.clone(),
            player: self.player,
            hunter: self.hunter.position(),
            door: self.door,
            door_unlocked: self.door_state() == Some(DoorState::Unlocked),
            score: self.score,
            concealed: self.concealed,
            dark: self.dark,
            vision_radius: self.vision_radius,
            consumables,
            obstacles,
            torches,
            spent_torches,
        }
    }

    /// Rebuild a world from a snapshot
    pub fn restore(snapshot: &WorldSnapshot, clock: impl Clock + 'static) -> Result<Self> {
        let mut world = World::with_clock(snapshot.config.clone(), clock)?;
        world.clear_content();

        if let Some(door) = snapshot.door {
            world.set_door_position(door)?;
            if snapshot.door_unlocked {
                world.set_door_state(DoorState::Unlocked);
            }
        }
        world.set_player_position(snapshot.player)?;
        world.set_hunter_position(snapshot.hunter)?;
        for &(p, kind) in &snapshot.consumables {
            world.add_consumable(p, kind)?;
        }
        for &(p, ty) in &snapshot.obstacles {
            world.add_obstacle(p, ty)?;
        }
        for &p in &snapshot.torches {
            world.add_torch(p)?;
        }
        for &p in &snapshot.spent_torches {
            world.mark_torch_spent(p)?;
        }
        world.set_dark_mode(snapshot.dark, snapshot.vision_radius);
        world.set_concealed(snapshot.concealed);
        world.set_score(snapshot.score);
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::dungeon::{CellType, Direction};

    #[test]
    fn test_restore_matches_snapshot() {
        let mut world = World::with_clock(WorldConfig::with_seed(21), ManualClock::new(0)).unwrap();
        for dir in [Direction::East, Direction::South, Direction::West, Direction::North] {
            world.move_player(dir);
        }
        world.set_dark_mode(true, 7);
        let snap = world.snapshot();

        let restored = World::restore(&snap, ManualClock::new(0)).unwrap();
        assert_eq!(restored.snapshot(), snap);
        assert_eq!(restored.grid().width(), world.grid().width());
    }

    #[test]
    fn test_restored_dark_cell_keeps_its_torch_spent() {
        let mut world = World::with_clock(WorldConfig::with_seed(21), ManualClock::new(0)).unwrap();
        world.clear_content();
        world.set_concealed(true);
        let start = world.player_position();
        let (dir, dark) = Direction::ALL
            .into_iter()
            .map(|d| (d, start.step(d)))
            .find(|&(_, p)| world.grid().is_floor(p) && p != world.hunter_position())
            .unwrap();
        world.add_obstacle(dark, ObstacleType::DarkMode).unwrap();

        assert!(world.move_player(dir));
        let torch = world.torches().next().unwrap();
        let to_torch = Direction::ALL
            .into_iter()
            .find(|&d| dark.step(d) == torch)
            .unwrap();
        assert!(world.move_player(to_torch));
        assert_eq!(world.torches().count(), 0);

        let snap = world.snapshot();
        assert_eq!(snap.spent_torches, vec![dark]);
        let mut restored = World::restore(&snap, ManualClock::new(0)).unwrap();

        for w in [&mut world, &mut restored] {
            assert!(w.move_player(to_torch.opposite()));
            assert_eq!(w.player_position(), dark);
            assert!(w.is_dark());
            assert_eq!(w.torches().count(), 0);
        }
    }

    #[test]
    fn test_restore_keeps_unlocked_door() {
        let mut world = World::with_clock(WorldConfig::with_seed(21), ManualClock::new(0)).unwrap();
        let door = world.door_position().unwrap();
        assert_eq!(world.door_state(), Some(DoorState::Locked));
        world.set_door_state(DoorState::Unlocked);

        let snap = world.snapshot();
        assert!(snap.door_unlocked);
        let restored = World::restore(&snap, ManualClock::new(0)).unwrap();
        assert_eq!(restored.door_state(), Some(DoorState::Unlocked));
        assert_eq!(restored.grid().cell(door), CellType::Door(DoorState::Unlocked));
        assert_eq!(restored.snapshot(), snap);
    }

    #[test]
    fn test_restore_rejects_bad_positions() {
        let world = World::with_clock(WorldConfig::with_seed(2), ManualClock::new(0)).unwrap();
        let mut snap = world.snapshot();
        snap.player = Point::new(-5, 0);
        assert!(World::restore(&snap, ManualClock::new(0)).is_err());
    }
}
