//! Level progression
//!
//! A campaign runs worlds back to back. Clearing a level banks a bonus of
//! `POINTS_PER_LEVEL × level`. Each next world is seeded from the one before
//! it plus the new level number, carries more content, and gets harder as
//! points accumulate.

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::info;

use crate::clock::{Clock, SystemClock};
use crate::config::{Difficulty, WorldConfig};
use crate::error::Result;
use crate::world::World;
use crate::{MAX_LEVEL, POINTS_PER_LEVEL};

/// Where the campaign stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum CampaignStatus {
    Playing,
    /// Current level cleared; `advance` starts the next one
    LevelCleared,
    Caught,
    /// Final level cleared
    Finished,
}

/// A sequence of worlds sharing one score
pub struct Campaign {
    level: u32,
    world: World,
    clock_factory: Box<dyn Fn() -> Box<dyn Clock>>,
}

impl Campaign {
    /// Start at level 1 with `config` as given
    pub fn new(config: WorldConfig) -> Result<Self> {
        Self::with_clock_factory(config, || Box::new(SystemClock::new()) as Box<dyn Clock>)
    }

    /// Like `new`, with every level's world reading time from `make_clock()`
    pub fn with_clock_factory<F>(config: WorldConfig, make_clock: F) -> Result<Self>
    where
        F: Fn() -> Box<dyn Clock> + 'static,
    {
        let world = World::with_clock(config, make_clock())?;
        Ok(Self {
            level: 1,
            world,
            clock_factory: Box::new(make_clock),
        })
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Points including the current level's progress
    pub fn points(&self) -> i32 {
        self.world.score()
    }

    pub fn status(&self) -> CampaignStatus {
        if self.world.is_caught() {
            CampaignStatus::Caught
        } else if !self.world.is_level_complete() {
            CampaignStatus::Playing
        } else if self.level >= MAX_LEVEL {
            CampaignStatus::Finished
        } else {
            CampaignStatus::LevelCleared
        }
    }

    /// Config for the level after `level`, built from that level's config
    /// and the banked points
    pub fn next_config(current: &WorldConfig, level: u32, points: i32) -> WorldConfig {
        let next = level as usize + 1;
        WorldConfig {
            seed: current.seed.wrapping_add(next as u64),
            difficulty: Difficulty::from_points(points),
            consumables: 3 + next,
            obstacles: 10 + 9 * next,
            starting_points: points,
            ..current.clone()
        }
    }

    /// Bank the level bonus and build the next world
    ///
    /// Only acts on a cleared level; returns the status afterwards.
    pub fn advance(&mut self) -> Result<CampaignStatus> {
        if self.status() != CampaignStatus::LevelCleared {
            return Ok(self.status());
        }
        let bonus = POINTS_PER_LEVEL * self.level as i32;
        let points = self.world.score() + bonus;
        let config = Self::next_config(self.world.config(), self.level, points);

        let world = World::with_clock(config, (self.clock_factory)())?;
        self.world = world;
        self.level += 1;
        info!(level = self.level, points, "advanced to next level");
        Ok(self.status())
    }
}
