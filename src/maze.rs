//! Recursive-division maze generation.
//!
//! Walls are only ever started on even-even coordinates and holes are only
//! punched at odd offsets, so on an odd-sized board every wall lies on an
//! even row or column and every corridor on an odd one.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use crate::coord::{Coordinate, Direction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Block,
    Blank,
}

pub struct MazeGenerator {
    rows: i32,
    columns: i32,
    cells: Vec<Cell>,
}

/// Uniform integer on `[min, max]`, both ends included.
pub fn discrete_rand_inclusive(rng: &mut impl Rng, min: i32, max: i32) -> i32 {
    rng.gen_range(min..=max)
}

pub fn rand_choose<'a, T>(rng: &mut impl Rng, items: &'a [T]) -> Option<&'a T> {
    items.choose(rng)
}

impl MazeGenerator {
    pub fn new(rows: i32, columns: i32) -> Self {
        let len = rows.max(0) as usize * columns.max(0) as usize;
        Self {
            rows,
            columns,
            cells: vec![Cell::Blank; len],
        }
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn columns(&self) -> i32 {
        self.columns
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn in_bounds(&self, pos: Coordinate) -> bool {
        pos.in_bounds(self.rows, self.columns)
    }

    /// Cell at `pos`; anything off the board reads as `Block`.
    pub fn at(&self, pos: Coordinate) -> Cell {
        match self.index(pos) {
            Some(idx) => self.cells[idx],
            None => Cell::Block,
        }
    }

    fn index(&self, pos: Coordinate) -> Option<usize> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(pos.y as usize * self.columns as usize + pos.x as usize)
    }

    fn set(&mut self, pos: Coordinate, cell: Cell) {
        if let Some(idx) = self.index(pos) {
            self.cells[idx] = cell;
        }
    }

    pub fn generate(&mut self, rng: &mut impl Rng) {
        let upper_left = Coordinate::new(0, 0);
        let lower_right = Coordinate::new(self.columns, self.rows);
        self.divide(rng, upper_left, lower_right);
    }

    /// Splits the section spanned by `upper_left` and `lower_right` with one
    /// holed wall and recurses into both halves.
    pub fn divide(&mut self, rng: &mut impl Rng, upper_left: Coordinate, lower_right: Coordinate) {
        let width = lower_right.x - upper_left.x;
        let height = lower_right.y - upper_left.y;
        if width < 3 || height < 3 {
            return;
        }

        let vertical = if width == height {
            discrete_rand_inclusive(rng, 0, 1) == 1
        } else {
            width > height
        };

        // A vertical wall starts on the top edge and runs south, a horizontal
        // one starts on the left edge and runs east.
        let (edge_end, run, length) = if vertical {
            (upper_left.in_direction(Direction::East, width), Direction::South, height)
        } else {
            (upper_left.in_direction(Direction::South, height), Direction::East, width)
        };

        let starts = possible_wall_starts(upper_left, edge_end);
        let Some(&wall_start) = rand_choose(rng, &starts) else {
            return;
        };
        let wall_end = wall_start.in_direction(run, length);
        let hole = hole_in_line(rng, wall_start, wall_end);
        trace!(%upper_left, %lower_right, %wall_start, %wall_end, vertical, "dividing maze section");

        self.make_line(wall_start, wall_end, hole);

        self.divide(rng, upper_left, wall_end);
        self.divide(rng, wall_start, lower_right);
    }

    /// Blocks every cell from `start` up to, not including, `end`, then
    /// reopens `hole`.
    pub fn make_line(&mut self, start: Coordinate, end: Coordinate, hole: Option<Coordinate>) {
        if start == end {
            return;
        }
        let Some(line) = start.all_in_between(end, false) else {
            return;
        };
        for pos in line {
            self.set(pos, Cell::Block);
        }
        if let Some(hole) = hole {
            self.set(hole, Cell::Blank);
        }
    }
}

/// Even-even points on the line from `line_start` to `line_end`, inset by two
/// from both ends.
pub fn possible_wall_starts(line_start: Coordinate, line_end: Coordinate) -> Vec<Coordinate> {
    let length = line_start.distance_from(line_end);
    if length < 2 {
        return Vec::new();
    }
    let direction = line_start.direction_towards(line_end);
    let begin = line_start.in_direction(direction, 2);
    let end = line_end.in_direction(direction.opposite(), 2);
    if begin.distance_from(line_start) > end.distance_from(line_start) {
        return Vec::new();
    }

    begin
        .all_in_between(end, true)
        .unwrap_or_default()
        .into_iter()
        .filter(|pos| pos.x % 2 == 0 && pos.y % 2 == 0)
        .collect()
}

/// A random odd offset strictly inside the line from `start` to `end`.
pub fn hole_in_line(rng: &mut impl Rng, start: Coordinate, end: Coordinate) -> Option<Coordinate> {
    let length = start.distance_from(end);
    if length < 2 {
        return None;
    }
    let direction = start.direction_towards(end);
    let offset = discrete_rand_inclusive(rng, 0, (length - 2) / 2) * 2 + 1;
    Some(start.in_direction(direction, offset))
}

impl fmt::Display for MazeGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rows: {}", self.rows)?;
        writeln!(f, "columns: {}", self.columns)?;
        for row in self.cells.chunks(self.columns.max(1) as usize) {
            for cell in row {
                let ch = match cell {
                    Cell::Block => '#',
                    Cell::Blank => ' ',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn rand_inclusive_hits_both_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut seen = [0u32; 4];
        for _ in 0..4000 {
            let v = discrete_rand_inclusive(&mut rng, 0, 3);
            assert!((0..=3).contains(&v));
            seen[v as usize] += 1;
        }
        for count in seen {
            assert!(count > 850 && count < 1150, "skewed draw: {seen:?}");
        }
        assert_eq!(discrete_rand_inclusive(&mut rng, 7, 7), 7);
    }

    #[test]
    fn wall_starts_are_even_and_inset() {
        let starts = possible_wall_starts(Coordinate::new(0, 0), Coordinate::new(11, 0));
        assert_eq!(
            starts,
            vec![
                Coordinate::new(2, 0),
                Coordinate::new(4, 0),
                Coordinate::new(6, 0),
                Coordinate::new(8, 0),
            ]
        );

        let starts = possible_wall_starts(Coordinate::new(4, 2), Coordinate::new(4, 10));
        assert_eq!(
            starts,
            vec![Coordinate::new(4, 4), Coordinate::new(4, 6), Coordinate::new(4, 8)]
        );
    }

    #[test]
    fn narrow_edges_have_no_wall_start() {
        assert!(possible_wall_starts(Coordinate::new(0, 0), Coordinate::new(3, 0)).is_empty());
        assert!(possible_wall_starts(Coordinate::new(0, 0), Coordinate::new(1, 0)).is_empty());
        assert!(possible_wall_starts(Coordinate::new(0, 0), Coordinate::new(3, 3)).is_empty());
    }

    #[test]
    fn holes_are_odd_and_strictly_inside() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for length in 2..12 {
            let start = Coordinate::new(4, 0);
            let end = start.in_direction(Direction::South, length);
            for _ in 0..50 {
                let hole = hole_in_line(&mut rng, start, end).unwrap();
                assert_eq!(hole.x, 4);
                assert_eq!(hole.y % 2, 1);
                assert!(hole.y > 0 && hole.y < length, "hole {hole} outside line of {length}");
            }
        }
        assert!(hole_in_line(&mut rng, Coordinate::new(0, 0), Coordinate::new(1, 0)).is_none());
        assert!(hole_in_line(&mut rng, Coordinate::new(0, 0), Coordinate::new(1, 1)).is_none());
    }

    #[test]
    fn line_excludes_far_end_and_reopens_hole() {
        let mut maze = MazeGenerator::new(5, 5);
        maze.make_line(Coordinate::new(0, 2), Coordinate::new(4, 2), Some(Coordinate::new(1, 2)));
        assert_eq!(maze.at(Coordinate::new(0, 2)), Cell::Block);
        assert_eq!(maze.at(Coordinate::new(1, 2)), Cell::Blank);
        assert_eq!(maze.at(Coordinate::new(3, 2)), Cell::Block);
        assert_eq!(maze.at(Coordinate::new(4, 2)), Cell::Blank);
    }

    #[test]
    fn tiny_boards_stay_open() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut maze = MazeGenerator::new(3, 3);
        maze.generate(&mut rng);
        assert!(maze.cells().iter().all(|cell| *cell == Cell::Blank));
    }

    #[test]
    fn walls_only_on_even_lines() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for size in [5, 9, 15, 21] {
            let mut maze = MazeGenerator::new(size, size + 6);
            maze.generate(&mut rng);
            for y in 0..maze.rows() {
                for x in 0..maze.columns() {
                    if maze.at(Coordinate::new(x, y)) == Cell::Block {
                        assert!(x % 2 == 0 || y % 2 == 0, "block at odd-odd ({x}, {y})");
                    }
                }
            }
            assert_eq!(maze.at(Coordinate::new(0, 0)), Cell::Blank);
        }
    }

    #[test]
    fn display_draws_blocks_as_hashes() {
        let mut maze = MazeGenerator::new(3, 3);
        maze.make_line(Coordinate::new(0, 1), Coordinate::new(3, 1), None);
        let text = maze.to_string();
        assert!(text.starts_with("rows: 3\ncolumns: 3\n"));
        assert!(text.ends_with("   \n###\n   \n"));
    }
}
