use std::fmt;

/// A compass heading on the board. `None` is the absence of a heading and
/// maps onto itself under every rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
    None,
}

impl Direction {
    /// The four real headings, in the order legal moves are listed.
    pub const COMPASS: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::None => (0, 0),
        }
    }

    pub fn key(self) -> char {
        match self {
            Direction::North => 'w',
            Direction::East => 'd',
            Direction::South => 's',
            Direction::West => 'a',
            Direction::None => ' ',
        }
    }

    pub fn from_key(key: char) -> Direction {
        match key {
            'w' => Direction::North,
            'd' => Direction::East,
            's' => Direction::South,
            'a' => Direction::West,
            _ => Direction::None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
            Direction::None => "none",
        }
    }

    pub fn rotate_left(self) -> Direction {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
            Direction::None => Direction::None,
        }
    }

    pub fn rotate_right(self) -> Direction {
        self.rotate_left().rotate_left().rotate_left()
    }

    pub fn opposite(self) -> Direction {
        self.rotate_left().rotate_left()
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::North | Direction::South)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A cell position. `x` grows east, `y` grows south.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn in_bounds(self, rows: i32, columns: i32) -> bool {
        (0..columns).contains(&self.x) && (0..rows).contains(&self.y)
    }

    /// Distance along the shared row or column, or `-1` when the two points
    /// share neither.
    pub fn distance_from(self, other: Coordinate) -> i32 {
        if self.x == other.x {
            return self.y.wrapping_sub(other.y).wrapping_abs();
        }
        if self.y == other.y {
            return self.x.wrapping_sub(other.x).wrapping_abs();
        }
        -1
    }

    pub fn direction_towards(self, other: Coordinate) -> Direction {
        if self.x == other.x {
            if self.y > other.y {
                return Direction::North;
            }
            if self.y < other.y {
                return Direction::South;
            }
        } else if self.y == other.y {
            if self.x < other.x {
                return Direction::East;
            }
            return Direction::West;
        }
        Direction::None
    }

    pub fn in_direction(self, direction: Direction, distance: i32) -> Coordinate {
        let (dx, dy) = direction.delta();
        Coordinate {
            x: self.x.wrapping_add(dx.wrapping_mul(distance)),
            y: self.y.wrapping_add(dy.wrapping_mul(distance)),
        }
    }

    /// Every point from `self` towards `other` along their shared axis.
    ///
    /// `self` is always the first element. `other` is only included when
    /// `inclusive` is set, so the result holds `distance + 1` points when
    /// inclusive and `distance` points otherwise. Returns `None` for points
    /// that are not axis-aligned.
    pub fn all_in_between(self, other: Coordinate, inclusive: bool) -> Option<Vec<Coordinate>> {
        let distance = self.distance_from(other);
        if distance < 0 {
            return None;
        }
        let len = if inclusive { distance + 1 } else { distance };
        let direction = self.direction_towards(other);
        Some((0..len).map(|step| self.in_direction(direction, step)).collect())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
