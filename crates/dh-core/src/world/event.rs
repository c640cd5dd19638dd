//! Events emitted by the world
//!
//! Events are plain data. The world queues every event for hosts that poll
//! with [`World::drain_events`](super::World::drain_events), and also hands
//! it to an optional [`EffectsSink`] for hosts that react immediately
//! (audio, notifications).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Something the player should hear about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A consumable was collected; carries the points gained
    ConsumableCollected { points: i32 },

    ObstacleTriggered(String),

    /// A lingering obstacle effect finished (slide stopped, darkness lifted)
    ObstacleEffectEnded(String),

    ItemPickedUp(String),

    /// Terminal: the hunter reached a visible player
    PlayerCaught,

    /// The player walked through the exit; carries points earned this level
    LevelCompleted { level_points: i32 },

    DoorUnlocked,

    /// The hunter came within warning range, in path steps
    HunterNearby { steps: usize },
}

impl GameEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameEvent::PlayerCaught)
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::ConsumableCollected { points } => write!(f, "Collected {points} points"),
            GameEvent::ObstacleTriggered(msg)
            | GameEvent::ObstacleEffectEnded(msg)
            | GameEvent::ItemPickedUp(msg) => f.write_str(msg),
            GameEvent::PlayerCaught => f.write_str("The hunter caught you!"),
            GameEvent::LevelCompleted { level_points } => {
                write!(f, "Level complete with {level_points} points")
            }
            GameEvent::DoorUnlocked => f.write_str("The door unlocks"),
            GameEvent::HunterNearby { steps } => write!(f, "The hunter is {steps} steps away"),
        }
    }
}

/// Receiver for world effects
///
/// Every method has an empty default so implementors only pick the hooks
/// they care about.
pub trait EffectsSink {
    fn on_consumable_collected(&mut self, _points: i32) {}
    fn on_obstacle_triggered(&mut self, _message: &str) {}
    fn on_obstacle_effect_ended(&mut self, _message: &str) {}
    fn on_item_picked_up(&mut self, _message: &str) {}
    fn on_player_caught(&mut self) {}
    fn on_level_completed(&mut self, _level_points: i32) {}
    fn on_door_unlocked(&mut self) {}
    fn on_hunter_nearby(&mut self, _steps: usize) {}

    /// Route an event to its hook
    fn dispatch(&mut self, event: &GameEvent) {
        match event {
            GameEvent::ConsumableCollected { points } => self.on_consumable_collected(*points),
            GameEvent::ObstacleTriggered(msg) => self.on_obstacle_triggered(msg),
            GameEvent::ObstacleEffectEnded(msg) => self.on_obstacle_effect_ended(msg),
            GameEvent::ItemPickedUp(msg) => self.on_item_picked_up(msg),
            GameEvent::PlayerCaught => self.on_player_caught(),
            GameEvent::LevelCompleted { level_points } => self.on_level_completed(*level_points),
            GameEvent::DoorUnlocked => self.on_door_unlocked(),
            GameEvent::HunterNearby { steps } => self.on_hunter_nearby(*steps),
        }
    }
}
