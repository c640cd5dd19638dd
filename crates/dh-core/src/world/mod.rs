//! World state and the per-tick game rules
//!
//! `World` owns the structural grid, the occupant overlay, both actors and
//! every lingering effect. Hosts drive it with `move_player` and
//! `tick_hunter`, then read views and drain events.

mod event;
mod resolve;
mod snapshot;
mod view;

pub use event::{EffectsSink, GameEvent};
pub use snapshot::WorldSnapshot;
pub use view::{Glyph, GridView, Sight};

use hashbrown::{HashMap, HashSet};
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::config::WorldConfig;
use crate::content::{ConsumableKind, ObstacleType, Occupant};
use crate::dungeon::{
    CellType, Direction, DoorState, Grid, Point, ZonePlanner, generate_layout, place_door,
    place_hunter, place_player,
};
use crate::error::{Result, WorldError};
use crate::hunter::{Hunter, HunterMode};
use crate::pathfind::Pathfinder;
use crate::rng::GameRng;
use crate::{DEFAULT_VISION_RADIUS, HUNTER_WARNING_STEPS};

/// Ice slide in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slide {
    direction: Direction,
    steps: u32,
}

/// A generated level with its actors and content
pub struct World {
    config: WorldConfig,
    grid: Grid,
    overlay: HashMap<Point, Occupant>,
    player: Point,
    hunter: Hunter,
    door: Option<Point>,
    score: i32,
    concealed: bool,
    dark: bool,
    vision_radius: u32,
    /// DarkMode cells that already spawned their torch
    torch_spent: HashSet<Point>,
    last_direction: Direction,
    slide: Option<Slide>,
    caught: bool,
    level_complete: bool,
    hunter_near: bool,
    show_path: bool,
    pathfinder: Pathfinder,
    rng: GameRng,
    clock: Box<dyn Clock>,
    sink: Option<Box<dyn EffectsSink>>,
    events: Vec<GameEvent>,
}

impl World {
    /// Generate a world on the system clock
    pub fn create(config: WorldConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock::new())
    }

    /// Generate a world reading time from `clock`
    pub fn with_clock(config: WorldConfig, clock: impl Clock + 'static) -> Result<Self> {
        let mut rng = GameRng::new(config.seed);
        let (mut grid, layout) = generate_layout(&config, &mut rng)?;

        let player = place_player(&grid, &mut rng).ok_or(WorldError::NoRooms)?;
        let hunter_pos = place_hunter(&grid, player).ok_or(WorldError::NoRooms)?;
        let door = place_door(&mut grid, &mut rng);

        let mut reserved = vec![player, hunter_pos];
        reserved.extend(door);
        let overlay: HashMap<Point, Occupant> = ZonePlanner::new(&grid, player, &reserved)
            .populate(config.consumables, config.obstacles, &mut rng)
            .into_iter()
            .collect();

        let search_rng = config
            .search_seed
            .map_or_else(GameRng::from_entropy, GameRng::new);

        info!(
            seed = config.seed,
            difficulty = config.difficulty.0,
            rooms = layout.rooms.len(),
            items = overlay.len(),
            "world created"
        );

        Ok(Self {
            score: config.starting_points,
            config,
            grid,
            overlay,
            player,
            hunter: Hunter::new(hunter_pos, search_rng),
            door,
            concealed: false,
            dark: false,
            vision_radius: DEFAULT_VISION_RADIUS,
            torch_spent: HashSet::new(),
            last_direction: Direction::default(),
            slide: None,
            caught: false,
            level_complete: false,
            hunter_near: false,
            show_path: false,
            pathfinder: Pathfinder::new(),
            rng,
            clock: Box::new(clock),
            sink: None,
            events: Vec::new(),
        })
    }

    /// Install a sink that receives every event as it happens
    pub fn set_effects_sink(&mut self, sink: Box<dyn EffectsSink>) {
        self.sink = Some(sink);
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: GameEvent) {
        if let Some(sink) = self.sink.as_mut() {
            sink.dispatch(&event);
        }
        self.events.push(event);
    }

    fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    // --- player ---

    /// Move the player one cell; `false` if the move was refused
    ///
    /// Walls, empty space and the grid edge block movement, as does an
    /// active ice slide or a finished game.
    pub fn move_player(&mut self, dir: Direction) -> bool {
        if self.is_over() || self.slide.is_some() {
            return false;
        }
        let target = self.player.step(dir);
        if !self.grid.is_walkable(target) {
            return false;
        }
        self.last_direction = dir;
        self.arrive(target, true);
        self.check_proximity();
        true
    }

    /// Put the player on `p` and apply whatever is there
    ///
    /// Obstacles only fire on deliberate steps, never mid-slide.
    fn arrive(&mut self, p: Point, trigger_obstacles: bool) {
        self.player = p;

        if self.grid.cell(p) == CellType::Door(DoorState::Locked) {
            self.grid.set(p, CellType::Door(DoorState::Unlocked));
            self.emit(GameEvent::DoorUnlocked);
        }

        match self.overlay.get(&p).copied() {
            Some(Occupant::Obstacle(ty)) if trigger_obstacles => self.trigger_obstacle(ty, p),
            Some(Occupant::Obstacle(_)) | None => {}
            Some(Occupant::Consumable(kind)) => self.collect(p, kind),
            Some(Occupant::Torch) => self.pick_up_torch(p),
        }

        self.check_collision();
        if !self.caught && self.door == Some(self.player) {
            self.complete_level();
        }
    }

    fn collect(&mut self, p: Point, kind: ConsumableKind) {
        self.overlay.remove(&p);
        self.score += kind.value();
        debug!(kind = %kind, score = self.score, "consumable collected");
        self.emit(GameEvent::ConsumableCollected {
            points: kind.value(),
        });
    }

    fn complete_level(&mut self) {
        self.level_complete = true;
        self.slide = None;
        let level_points = self.score - self.config.starting_points;
        info!(score = self.score, level_points, "level complete");
        self.emit(GameEvent::LevelCompleted { level_points });
    }

    // --- hunter ---

    /// Advance the hunter one step
    pub fn tick_hunter(&mut self) {
        if self.is_over() {
            return;
        }
        let now = self.now_ms();
        if let Some(p) =
            self.hunter
                .tick(&self.grid, self.player, self.concealed, &mut self.pathfinder, now)
        {
            debug!(to = %p, mode = %self.hunter.mode(), "hunter moved");
        }
        self.check_collision();
        self.check_proximity();
    }

    fn check_collision(&mut self) {
        if self.caught || self.hunter.position() != self.player {
            return;
        }
        if self.concealed {
            debug!(at = %self.player, "hunter passed a concealed player");
            return;
        }
        self.caught = true;
        self.slide = None;
        info!(at = %self.player, score = self.score, "player caught");
        self.emit(GameEvent::PlayerCaught);
    }

    /// Warn once each time the hunter enters warning range
    fn check_proximity(&mut self) {
        if self.is_over() {
            return;
        }
        let now = self.now_ms();
        let steps = self
            .pathfinder
            .distance(&self.grid, self.hunter.position(), self.player, now);
        match steps {
            Some(steps) if steps <= HUNTER_WARNING_STEPS => {
                if !self.hunter_near {
                    self.hunter_near = true;
                    self.emit(GameEvent::HunterNearby { steps });
                }
            }
            _ => self.hunter_near = false,
        }
    }

    // --- external triggers ---

    pub fn set_concealed(&mut self, concealed: bool) {
        self.concealed = concealed;
    }

    /// Spend points on concealment; `false` if the player cannot afford it
    pub fn purchase_concealment(&mut self) -> bool {
        let cost = self.config.concealment_cost;
        if self.concealed || self.score < cost {
            return false;
        }
        self.score -= cost;
        self.concealed = true;
        self.emit(GameEvent::ItemPickedUp(format!(
            "Bought concealment for {cost} points"
        )));
        true
    }

    /// Lift dark mode and restore normal vision
    pub fn exit_dark_mode(&mut self) {
        if !self.dark {
            return;
        }
        self.dark = false;
        self.vision_radius = DEFAULT_VISION_RADIUS;
        self.emit(GameEvent::ObstacleEffectEnded("The darkness lifts".into()));
    }

    /// Show or hide the hunter's path on the visible grid
    pub fn toggle_path_display(&mut self) -> bool {
        self.show_path = !self.show_path;
        self.show_path
    }

    // --- accessors ---

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Structural grid, without occupants or actors
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player_position(&self) -> Point {
        self.player
    }

    pub fn hunter_position(&self) -> Point {
        self.hunter.position()
    }

    pub fn hunter_mode(&self) -> HunterMode {
        self.hunter.mode()
    }

    pub fn hunter_path(&self) -> &[Point] {
        self.hunter.last_path()
    }

    pub fn door_position(&self) -> Option<Point> {
        self.door
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn is_concealed(&self) -> bool {
        self.concealed
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    pub fn vision_radius(&self) -> u32 {
        self.vision_radius
    }

    pub fn is_sliding(&self) -> bool {
        self.slide.is_some()
    }

    pub fn is_caught(&self) -> bool {
        self.caught
    }

    pub fn is_level_complete(&self) -> bool {
        self.level_complete
    }

    /// Caught or through the door
    pub fn is_over(&self) -> bool {
        self.caught || self.level_complete
    }

    pub fn shows_path(&self) -> bool {
        self.show_path
    }

    pub fn pathfinder(&self) -> &Pathfinder {
        &self.pathfinder
    }

    /// Occupant at `p`, if any
    pub fn occupant(&self, p: Point) -> Option<Occupant> {
        self.overlay.get(&p).copied()
    }

    pub fn consumables(&self) -> impl Iterator<Item = (Point, ConsumableKind)> + '_ {
        self.overlay.iter().filter_map(|(&p, o)| match o {
            Occupant::Consumable(kind) => Some((p, *kind)),
            _ => None,
        })
    }

    pub fn obstacles(&self) -> impl Iterator<Item = (Point, ObstacleType)> + '_ {
        self.overlay.iter().filter_map(|(&p, o)| match o {
            Occupant::Obstacle(ty) => Some((p, *ty)),
            _ => None,
        })
    }

    pub fn torches(&self) -> impl Iterator<Item = Point> + '_ {
        self.overlay
            .iter()
            .filter(|(_, o)| **o == Occupant::Torch)
            .map(|(&p, _)| p)
    }

    /// DarkMode cells whose one-time torch has already spawned
    pub fn spent_torches(&self) -> impl Iterator<Item = Point> + '_ {
        self.torch_spent.iter().copied()
    }

    pub fn door_state(&self) -> Option<DoorState> {
        self.door.and_then(|p| match self.grid.cell(p) {
            CellType::Door(state) => Some(state),
            _ => None,
        })
    }

    // --- persistence ---

    fn check_walkable(&self, p: Point) -> Result<()> {
        if !self.grid.in_bounds(p) {
            return Err(WorldError::OutOfBounds(p));
        }
        if !self.grid.is_walkable(p) {
            return Err(WorldError::NotWalkable(p));
        }
        Ok(())
    }

    fn check_free_floor(&self, p: Point) -> Result<()> {
        if !self.grid.in_bounds(p) {
            return Err(WorldError::OutOfBounds(p));
        }
        if !self.grid.is_floor(p) {
            return Err(WorldError::NotWalkable(p));
        }
        if let Some(existing) = self.overlay.get(&p) {
            return Err(WorldError::Occupied(p, existing.label()));
        }
        Ok(())
    }

    pub fn set_player_position(&mut self, p: Point) -> Result<()> {
        self.check_walkable(p)?;
        self.player = p;
        self.slide = None;
        Ok(())
    }

    pub fn set_hunter_position(&mut self, p: Point) -> Result<()> {
        self.check_walkable(p)?;
        self.hunter.set_position(p);
        Ok(())
    }

    /// Move the exit door; the old door cell reverts to wall
    pub fn set_door_position(&mut self, p: Point) -> Result<()> {
        if !self.grid.in_bounds(p) {
            return Err(WorldError::OutOfBounds(p));
        }
        if let Some(old) = self.door.take() {
            self.grid.set(old, CellType::Wall);
        }
        self.grid.set(p, CellType::Door(DoorState::Locked));
        self.door = Some(p);
        Ok(())
    }

    pub fn add_consumable(&mut self, p: Point, kind: ConsumableKind) -> Result<()> {
        self.check_free_floor(p)?;
        self.overlay.insert(p, Occupant::Consumable(kind));
        Ok(())
    }

    pub fn add_obstacle(&mut self, p: Point, ty: ObstacleType) -> Result<()> {
        self.check_free_floor(p)?;
        self.overlay.insert(p, Occupant::Obstacle(ty));
        Ok(())
    }

    pub fn add_torch(&mut self, p: Point) -> Result<()> {
        self.check_free_floor(p)?;
        self.overlay.insert(p, Occupant::Torch);
        Ok(())
    }

    /// Set the exit door's lock state; no-op on a level without a door
    pub fn set_door_state(&mut self, state: DoorState) {
        if let Some(p) = self.door {
            self.grid.set(p, CellType::Door(state));
        }
    }

    /// Record that the DarkMode cell at `p` already spawned its torch
    pub fn mark_torch_spent(&mut self, p: Point) -> Result<()> {
        if !self.grid.in_bounds(p) {
            return Err(WorldError::OutOfBounds(p));
        }
        self.torch_spent.insert(p);
        Ok(())
    }

    pub fn set_dark_mode(&mut self, dark: bool, vision_radius: u32) {
        self.dark = dark;
        self.vision_radius = vision_radius;
    }

    pub fn set_score(&mut self, score: i32) {
        self.score = score;
    }

    /// Remove every occupant, ready for a restore
    pub fn clear_content(&mut self) {
        self.overlay.clear();
        self.torch_spent.clear();
    }
}
