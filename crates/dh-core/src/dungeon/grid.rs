//! Fixed-size cell grid

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{CellType, Point};

/// `width × height` array of structural cell tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellType>,
}

impl Grid {
    /// Grid filled with `Empty`
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, CellType::Empty)
    }

    pub fn filled(width: usize, height: usize, cell: CellType) -> Self {
        Self {
            width,
            height,
            cells: vec![cell; width * height],
        }
    }

    /// Build from rows of symbols (`#` wall, `.` floor, `+` door, space empty)
    ///
    /// Short rows are padded with `Empty`. Mostly useful in tests.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut grid = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let cell = match ch {
                    '#' => CellType::Wall,
                    '.' => CellType::Floor,
                    '+' => CellType::Door(super::DoorState::Locked),
                    '\'' => CellType::Door(super::DoorState::Unlocked),
                    _ => CellType::Empty,
                };
                grid.set(Point::new(x as i32, y as i32), cell);
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width && (p.y as usize) < self.height
    }

    fn index(&self, p: Point) -> Option<usize> {
        if self.in_bounds(p) {
            Some(p.y as usize * self.width + p.x as usize)
        } else {
            None
        }
    }

    /// Cell at `p`, or `None` outside the grid
    pub fn get(&self, p: Point) -> Option<CellType> {
        self.index(p).map(|i| self.cells[i])
    }

    /// Cell at `p`, treating out-of-bounds as `Empty`
    pub fn cell(&self, p: Point) -> CellType {
        self.get(p).unwrap_or(CellType::Empty)
    }

    /// Set a cell; out-of-bounds writes are ignored and return false
    pub fn set(&mut self, p: Point, cell: CellType) -> bool {
        match self.index(p) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Paint floor, or wall only where the cell is not already floor
    pub fn paint(&mut self, p: Point, cell: CellType) {
        if cell.is_wall() && self.cell(p).is_floor() {
            return;
        }
        self.set(p, cell);
    }

    pub fn is_floor(&self, p: Point) -> bool {
        self.cell(p).is_floor()
    }

    pub fn is_walkable(&self, p: Point) -> bool {
        self.cell(p).is_walkable()
    }

    /// All points in row-major order
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Point::new(x as i32, y as i32)))
    }

    /// All floor points in row-major order
    pub fn floor_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.points().filter(|&p| self.is_floor(p))
    }

    pub fn count(&self, cell: CellType) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Walls among the 8 cells around `p`
    pub fn walls_around(&self, p: Point) -> usize {
        p.ring().filter(|&q| self.cell(q).is_wall()).count()
    }

    /// Floors among the 8 cells around `p`
    pub fn floors_around(&self, p: Point) -> usize {
        p.ring().filter(|&q| self.is_floor(q)).count()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            let row: String = (0..self.width)
                .map(|x| self.cell(Point::new(x as i32, y as i32)).symbol())
                .collect();
            writeln!(f, "{}", row.trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::DoorState;

    #[test]
    fn test_bounds_checked_access() {
        let mut grid = Grid::new(4, 3);
        assert_eq!(grid.get(Point::new(3, 2)), Some(CellType::Empty));
        assert_eq!(grid.get(Point::new(4, 0)), None);
        assert_eq!(grid.get(Point::new(-1, 0)), None);
        assert!(!grid.set(Point::new(0, 3), CellType::Floor));
        assert!(grid.set(Point::new(0, 2), CellType::Floor));
        assert_eq!(grid.cell(Point::new(0, 2)), CellType::Floor);
        assert_eq!(grid.cell(Point::new(9, 9)), CellType::Empty);
    }

    #[test]
    fn test_paint_never_downgrades_floor() {
        let mut grid = Grid::new(3, 3);
        let p = Point::new(1, 1);
        grid.paint(p, CellType::Floor);
        grid.paint(p, CellType::Wall);
        assert_eq!(grid.cell(p), CellType::Floor);

        let q = Point::new(0, 0);
        grid.paint(q, CellType::Wall);
        assert_eq!(grid.cell(q), CellType::Wall);
    }

    #[test]
    fn test_from_rows_and_display() {
        let grid = Grid::from_rows(&["###", "#.+", "###"]);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.cell(Point::new(1, 1)), CellType::Floor);
        assert_eq!(grid.cell(Point::new(2, 1)), CellType::Door(DoorState::Locked));
        assert_eq!(grid.to_string(), "###\n#.+\n###\n");
    }

    #[test]
    fn test_neighbourhood_counts() {
        let grid = Grid::from_rows(&["###", "#..", "#.."]);
        let p = Point::new(1, 1);
        assert_eq!(grid.walls_around(p), 5);
        assert_eq!(grid.floors_around(p), 3);
    }
}
