//! Derived views for renderers and HUDs
//!
//! Nothing here is stored. Each call rebuilds the view from the current
//! grid, overlay, actors and clock.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::FLASH_INTERVAL_MS;
use crate::content::{ConsumableKind, ObstacleType, Occupant};
use crate::dungeon::{CellType, Direction, DoorState, Point};

use super::World;

/// What a renderer draws in one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Glyph {
    /// Outside the player's vision
    Hidden,
    Cell(CellType),
    Item(Occupant),
    Player,
    Hunter,
    /// Part of the hunter's path
    Trail,
}

impl Glyph {
    pub const fn symbol(self) -> char {
        match self {
            Glyph::Hidden => ' ',
            Glyph::Cell(cell) => cell.symbol(),
            Glyph::Item(occupant) => occupant.symbol(),
            Glyph::Player => '@',
            Glyph::Hunter => 'H',
            Glyph::Trail => ':',
        }
    }
}

/// Read-only 2D glyph view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridView {
    width: usize,
    height: usize,
    glyphs: Vec<Glyph>,
}

impl GridView {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Glyph at `p`; out-of-bounds reads as hidden
    pub fn get(&self, p: Point) -> Glyph {
        if p.x < 0 || p.y < 0 || p.x as usize >= self.width || p.y as usize >= self.height {
            return Glyph::Hidden;
        }
        self.glyphs[p.y as usize * self.width + p.x as usize]
    }

    pub fn count(&self, glyph: Glyph) -> usize {
        self.glyphs.iter().filter(|&&g| g == glyph).count()
    }
}

impl fmt::Display for GridView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.glyphs.chunks(self.width.max(1)) {
            let line: String = row.iter().map(|g| g.symbol()).collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

/// Description of a neighboring cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sight {
    Unknown,
    Wall,
    Floor,
    Door(DoorState),
    Hunter,
    Hazard(ObstacleType),
    Consumable(ConsumableKind),
    Torch,
}

impl fmt::Display for Sight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sight::Unknown => f.write_str("Nothing but darkness ahead"),
            Sight::Wall => f.write_str("A wall blocks the way"),
            Sight::Floor => f.write_str("The path ahead is clear"),
            Sight::Door(DoorState::Locked) => f.write_str("A locked door lies ahead"),
            Sight::Door(DoorState::Unlocked) => f.write_str("An open door lies ahead"),
            Sight::Hunter => f.write_str("The hunter is right there!"),
            Sight::Hazard(ty) => write!(f, "Careful, {ty} ahead"),
            Sight::Consumable(kind) => write!(f, "A {} ahead", kind.name()),
            Sight::Torch => f.write_str("A torch lies ahead"),
        }
    }
}

impl World {
    /// Whether the flash window currently shows the hunter's path
    pub fn flash_on(&self) -> bool {
        (self.now_ms() / FLASH_INTERVAL_MS) % 2 == 1
    }

    fn in_vision(&self, p: Point) -> bool {
        !self.dark || p.distance(self.player) <= f64::from(self.vision_radius)
    }

    fn glyph_at(&self, p: Point, show_trail: bool) -> Glyph {
        if p == self.player {
            return Glyph::Player;
        }
        if p == self.hunter.position() {
            return Glyph::Hunter;
        }
        if self.door == Some(p) {
            return Glyph::Cell(self.grid.cell(p));
        }
        let visible = self.in_vision(p);
        let item = self.overlay.get(&p).filter(|_| visible);
        if show_trail && item.is_none() && self.hunter.last_path().contains(&p) {
            return Glyph::Trail;
        }
        match (visible, item) {
            (false, _) => Glyph::Hidden,
            (true, Some(&occupant)) => Glyph::Item(occupant),
            (true, None) => Glyph::Cell(self.grid.cell(p)),
        }
    }

    fn build_view(&self, show_trail: bool, limit_vision: bool) -> GridView {
        let glyphs = self
            .grid
            .points()
            .map(|p| {
                if limit_vision {
                    self.glyph_at(p, show_trail)
                } else {
                    self.glyph_unlimited(p)
                }
            })
            .collect();
        GridView {
            width: self.grid.width(),
            height: self.grid.height(),
            glyphs,
        }
    }

    fn glyph_unlimited(&self, p: Point) -> Glyph {
        if p == self.player {
            Glyph::Player
        } else if p == self.hunter.position() {
            Glyph::Hunter
        } else if let Some(&occupant) = self.overlay.get(&p) {
            Glyph::Item(occupant)
        } else {
            Glyph::Cell(self.grid.cell(p))
        }
    }

    /// Everything, ignoring vision
    pub fn full_view(&self) -> GridView {
        self.build_view(false, false)
    }

    /// What the player can currently see
    ///
    /// In dark mode only cells within the vision radius are shown. The
    /// hunter and the door are always shown. The hunter's path is drawn
    /// when path display is on, or during odd flash windows while dark.
    pub fn visible_grid(&self) -> GridView {
        let show_trail = self.show_path || (self.dark && self.flash_on());
        self.build_view(show_trail, true)
    }

    /// Describe the cell next to the player in `dir`
    pub fn look_ahead(&self, dir: Direction) -> Sight {
        let p = self.player.step(dir);
        if p == self.hunter.position() {
            return Sight::Hunter;
        }
        match self.overlay.get(&p) {
            Some(Occupant::Obstacle(ty)) => return Sight::Hazard(*ty),
            Some(Occupant::Consumable(kind)) => return Sight::Consumable(*kind),
            Some(Occupant::Torch) => return Sight::Torch,
            None => {}
        }
        match self.grid.get(p) {
            Some(CellType::Floor) => Sight::Floor,
            Some(CellType::Wall) => Sight::Wall,
            Some(CellType::Door(state)) => Sight::Door(state),
            Some(CellType::Empty) | None => Sight::Unknown,
        }
    }
}
