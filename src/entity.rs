use std::fmt;

use rand::Rng;

use crate::coord::Coordinate;
use crate::maze::discrete_rand_inclusive;

/// Side length of the square each entity draws itself into.
pub const GLYPH_SIZE: usize = 2;

pub const BLANK_CHAR: char = ' ';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerId {
    P1,
    P2,
}

impl PlayerId {
    pub fn opposite(self) -> PlayerId {
        match self {
            PlayerId::P1 => PlayerId::P2,
            PlayerId::P2 => PlayerId::P1,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            PlayerId::P1 => 0,
            PlayerId::P2 => 1,
        }
    }

    pub fn tint(self) -> Tint {
        match self {
            PlayerId::P1 => Tint::Red,
            PlayerId::P2 => Tint::Blue,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerId::P1 => f.write_str("P1"),
            PlayerId::P2 => f.write_str("P2"),
        }
    }
}

/// Palette entities may ask for. Mapping to terminal colors is the
/// renderer's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    Red,
    Yellow,
    Green,
    Blue,
}

/// The 2x2 picture of one cell. `colors == None` means plain characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub chars: [[char; GLYPH_SIZE]; GLYPH_SIZE],
    pub colors: Option<[[Tint; GLYPH_SIZE]; GLYPH_SIZE]>,
}

impl Glyph {
    const fn plain(chars: [[char; GLYPH_SIZE]; GLYPH_SIZE]) -> Self {
        Self {
            chars,
            colors: None,
        }
    }

    pub fn row(&self, row: usize) -> String {
        self.chars[row].iter().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusKind {
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bonus {
    kind: BonusKind,
    value: i64,
    mystery: bool,
}

impl Bonus {
    pub fn new(kind: BonusKind, value: i64, mystery: bool) -> Self {
        Self {
            kind,
            value,
            mystery,
        }
    }

    /// Rolls a bonus. Subtractions are always hidden, a quarter of everything
    /// else is hidden too.
    pub fn random(rng: &mut impl Rng) -> Self {
        let decider = discrete_rand_inclusive(rng, 0, 10);
        let mystery = discrete_rand_inclusive(rng, 0, 3) == 0 || decider >= 8;

        let (kind, value) = if decider < 4 {
            (BonusKind::Add, discrete_rand_inclusive(rng, 1, 9))
        } else if decider < 6 {
            (BonusKind::Multiply, discrete_rand_inclusive(rng, 2, 3))
        } else if decider < 8 {
            (BonusKind::Add, discrete_rand_inclusive(rng, 2, 3))
        } else {
            (BonusKind::Subtract, discrete_rand_inclusive(rng, 1, 9))
        };

        Self::new(kind, i64::from(value), mystery)
    }

    pub fn kind(&self) -> BonusKind {
        self.kind
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn is_mystery(&self) -> bool {
        self.mystery
    }

    /// Whether the renderer must hide kind and value.
    pub fn is_concealed(&self) -> bool {
        self.mystery || self.kind == BonusKind::Divide
    }

    /// Points after this bonus is collected. Saturates instead of
    /// overflowing; division truncates toward zero and a zero divisor leaves
    /// the points untouched.
    pub fn apply(&self, points: i64) -> i64 {
        match self.kind {
            BonusKind::Add => points.saturating_add(self.value),
            BonusKind::Subtract => points.saturating_sub(self.value),
            BonusKind::Multiply => points.saturating_mul(self.value),
            BonusKind::Divide => points.checked_div(self.value).unwrap_or(points),
        }
    }

    fn symbol(&self) -> char {
        match self.kind {
            BonusKind::Add => '+',
            BonusKind::Subtract => '-',
            BonusKind::Multiply => 'x',
            BonusKind::Divide => '/',
        }
    }

    fn digit(&self) -> char {
        u32::try_from(self.value)
            .ok()
            .and_then(|v| char::from_digit(v, 10))
            .unwrap_or('?')
    }

    pub fn glyph(&self) -> Glyph {
        if self.is_concealed() {
            return Glyph {
                chars: [['?', '?'], ['?', '?']],
                colors: self
                    .mystery
                    .then_some([[Tint::Red, Tint::Yellow], [Tint::Green, Tint::Blue]]),
            };
        }
        Glyph::plain([[self.symbol(), self.digit()], [BLANK_CHAR, BLANK_CHAR]])
    }
}

impl fmt::Display for Bonus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_concealed() {
            return f.write_str("??");
        }
        write!(f, "{}{}", self.symbol(), self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    owner: PlayerId,
    position: Coordinate,
}

impl Endpoint {
    pub fn new(owner: PlayerId, position: Coordinate) -> Self {
        Self { owner, position }
    }

    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    id: PlayerId,
    position: Coordinate,
    points: i64,
}

impl Player {
    pub fn new(id: PlayerId, position: Coordinate) -> Self {
        Self {
            id,
            position,
            points: 1,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn points(&self) -> i64 {
        self.points
    }

    pub(crate) fn set_position(&mut self, position: Coordinate) {
        self.position = position;
    }

    pub(crate) fn charge(&mut self, amount: i64) {
        self.points = self.points.saturating_sub(amount);
    }

    pub(crate) fn collect(&mut self, bonus: &Bonus) {
        self.points = bonus.apply(self.points);
    }

    #[cfg(test)]
    pub(crate) fn set_points(&mut self, points: i64) {
        self.points = points;
    }
}

/// Anything that can occupy a board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Wall,
    Bonus(Bonus),
    Endpoint(PlayerId),
    Player(PlayerId),
}

impl Entity {
    pub fn glyph(&self) -> Glyph {
        match self {
            Entity::Wall => Glyph::plain([['█', '█'], ['█', '█']]),
            Entity::Bonus(bonus) => bonus.glyph(),
            Entity::Endpoint(owner) => {
                let digit = owner_digit(*owner);
                Glyph::plain([[digit, digit], [digit, digit]])
            }
            Entity::Player(id) => {
                let tint = id.tint();
                Glyph {
                    chars: [['P', owner_digit(*id)], ['^', '^']],
                    colors: Some([[tint, tint], [tint, tint]]),
                }
            }
        }
    }

    /// Cells a player may step onto.
    pub fn is_passable(&self) -> bool {
        matches!(self, Entity::Bonus(_) | Entity::Endpoint(_))
    }
}

fn owner_digit(id: PlayerId) -> char {
    match id {
        PlayerId::P1 => '1',
        PlayerId::P2 => '2',
    }
}
