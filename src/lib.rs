//! Two players race through a randomly generated maze to each other's
//! corner, collecting point bonuses on the way.

pub mod config;
pub mod coord;
pub mod entity;
pub mod game;
pub mod maze;
pub mod render;

pub use coord::{Coordinate, Direction};
pub use entity::{Bonus, BonusKind, Endpoint, Entity, Glyph, Player, PlayerId, Tint};
pub use game::{Game, GameError, GameMove, MoveError, MoveKind, MoveOutcome};
pub use maze::{Cell, MazeGenerator};
