use std::fmt;

use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

use crate::coord::{Coordinate, Direction};
use crate::entity::{Bonus, Endpoint, Entity, Player, PlayerId};
use crate::maze::{discrete_rand_inclusive, Cell, MazeGenerator};

/// Largest side length `Game::new` accepts.
pub const MAX_DIMENSION: i32 = 201;
pub const WASTE_KEY: char = 'x';
/// One in `BONUS_ODDS` empty cells receives a bonus.
const BONUS_ODDS: i32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error(
        "a {rows}x{columns} board is not playable, both sides must be between 2 and {max}",
        max = MAX_DIMENSION
    )]
    InvalidDimensions { rows: i32, columns: i32 },
    #[error("game is already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("game has not been initialized")]
    NotInitialized,
    #[error("game is over")]
    GameOver,
    #[error("move '{key}' is not legal right now")]
    IllegalMove { key: char },
    #[error("'{0}' is not a legal move")]
    UnknownKey(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Applied,
    /// The side to move had nothing legal to do and lost on the spot.
    Forfeited { winner: PlayerId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Waste,
    Step {
        start: Coordinate,
        end: Coordinate,
        direction: Direction,
        bonus: Option<Bonus>,
    },
}

/// One entry of the move history.
#[derive(Debug, Clone, Copy)]
pub struct GameMove {
    player: PlayerId,
    number: usize,
    kind: MoveKind,
}

impl GameMove {
    pub fn waste(player: PlayerId, number: usize) -> Self {
        Self {
            player,
            number,
            kind: MoveKind::Waste,
        }
    }

    pub fn step(
        player: PlayerId,
        number: usize,
        start: Coordinate,
        end: Coordinate,
        direction: Direction,
        bonus: Option<Bonus>,
    ) -> Self {
        Self {
            player,
            number,
            kind: MoveKind::Step {
                start,
                end,
                direction,
                bonus,
            },
        }
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    pub fn is_waste(&self) -> bool {
        self.kind == MoveKind::Waste
    }

    pub fn start(&self) -> Option<Coordinate> {
        match self.kind {
            MoveKind::Step { start, .. } => Some(start),
            MoveKind::Waste => None,
        }
    }

    pub fn end(&self) -> Option<Coordinate> {
        match self.kind {
            MoveKind::Step { end, .. } => Some(end),
            MoveKind::Waste => None,
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match self.kind {
            MoveKind::Step { direction, .. } => Some(direction),
            MoveKind::Waste => None,
        }
    }

    pub fn bonus(&self) -> Option<Bonus> {
        match self.kind {
            MoveKind::Step { bonus, .. } => bonus,
            MoveKind::Waste => None,
        }
    }

    pub fn key(&self) -> char {
        match self.kind {
            MoveKind::Step { direction, .. } => direction.key(),
            MoveKind::Waste => WASTE_KEY,
        }
    }

    /// History line, e.g. `3. (0, 0) to (1, 0) (east) +5`.
    pub fn describe(&self) -> String {
        match self.kind {
            MoveKind::Waste => format!("{}. (waste)", self.number),
            MoveKind::Step {
                start,
                end,
                direction,
                bonus,
            } => {
                let mut line = format!("{}. {} to {} ({})", self.number, start, end, direction);
                if let Some(bonus) = bonus {
                    line.push(' ');
                    line.push_str(&bonus.to_string());
                }
                line
            }
        }
    }
}

/// The bonus snapshot is informational and takes no part in equality.
impl PartialEq for GameMove {
    fn eq(&self, other: &Self) -> bool {
        if self.player != other.player || self.number != other.number {
            return false;
        }
        match (self.kind, other.kind) {
            (MoveKind::Waste, MoveKind::Waste) => true,
            (
                MoveKind::Step {
                    start,
                    end,
                    direction,
                    ..
                },
                MoveKind::Step {
                    start: other_start,
                    end: other_end,
                    direction: other_direction,
                    ..
                },
            ) => start == other_start && end == other_end && direction == other_direction,
            _ => false,
        }
    }
}

impl fmt::Display for GameMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MoveKind::Waste => f.write_str("waste"),
            MoveKind::Step {
                direction, bonus, ..
            } => {
                write!(f, "{}", direction.key())?;
                if let Some(bonus) = bonus {
                    write!(f, ": {bonus}")?;
                }
                Ok(())
            }
        }
    }
}

/// Board, pieces and turn state of one match.
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    rows: i32,
    columns: i32,
    grid: Vec<Option<Entity>>,
    players: [Player; 2],
    endpoints: [Endpoint; 2],
    finished: [bool; 2],
    turn: PlayerId,
    running: bool,
    initialized: bool,
    winner: Option<PlayerId>,
    move_count: usize,
    history: Vec<GameMove>,
    bonuses_removed: bool,
}

fn odd(n: i32) -> i32 {
    n / 2 * 2 + 1
}

impl Game {
    /// An empty board; both sides are rounded up to the next odd number.
    pub fn new(rows: i32, columns: i32) -> Result<Self, GameError> {
        let playable = 2..=MAX_DIMENSION;
        if !playable.contains(&rows) || !playable.contains(&columns) {
            return Err(GameError::InvalidDimensions { rows, columns });
        }
        let rows = odd(rows);
        let columns = odd(columns);
        let far_corner = Coordinate::new(columns - 1, rows - 1);

        Ok(Self {
            rows,
            columns,
            grid: vec![None; (rows * columns) as usize],
            players: [
                Player::new(PlayerId::P1, Coordinate::new(0, 0)),
                Player::new(PlayerId::P2, far_corner),
            ],
            endpoints: [
                Endpoint::new(PlayerId::P1, Coordinate::new(0, 0)),
                Endpoint::new(PlayerId::P2, far_corner),
            ],
            finished: [false; 2],
            turn: PlayerId::P1,
            running: true,
            initialized: false,
            winner: None,
            move_count: 0,
            history: Vec::new(),
            bonuses_removed: false,
        })
    }

    /// `new` followed by `initialize`.
    pub fn generate(rows: i32, columns: i32, rng: &mut impl Rng) -> Result<Self, GameError> {
        let mut game = Self::new(rows, columns)?;
        game.initialize(rng)?;
        Ok(game)
    }

    pub fn initialize(&mut self, rng: &mut impl Rng) -> Result<(), GameError> {
        if self.initialized {
            return Err(GameError::AlreadyInitialized);
        }
        self.generate_maze(rng);
        self.add_bonuses(rng);
        self.draw_endpoints();
        self.add_players();
        self.initialized = true;

        let bonuses = self
            .grid
            .iter()
            .filter(|cell| matches!(cell, Some(Entity::Bonus(_))))
            .count();
        info!(rows = self.rows, columns = self.columns, bonuses, "game initialized");
        Ok(())
    }

    fn generate_maze(&mut self, rng: &mut impl Rng) {
        let mut maze = MazeGenerator::new(self.rows, self.columns);
        maze.generate(rng);
        for (slot, cell) in self.grid.iter_mut().zip(maze.cells()) {
            *slot = match cell {
                Cell::Block => Some(Entity::Wall),
                Cell::Blank => None,
            };
        }
    }

    fn add_bonuses(&mut self, rng: &mut impl Rng) {
        for slot in self.grid.iter_mut() {
            if discrete_rand_inclusive(rng, 0, BONUS_ODDS - 1) == 0 && slot.is_none() {
                *slot = Some(Entity::Bonus(Bonus::random(rng)));
            }
        }
        self.bonuses_removed = false;
    }

    /// Puts each endpoint back on the board if its cell is free.
    fn draw_endpoints(&mut self) {
        for endpoint in self.endpoints {
            if self.at(endpoint.position()).is_none() {
                self.replace_at(endpoint.position(), Some(Entity::Endpoint(endpoint.owner())));
            }
        }
    }

    fn add_players(&mut self) {
        for idx in 0..self.players.len() {
            let player = &self.players[idx];
            let (id, position) = (player.id(), player.position());
            self.replace_at(position, Some(Entity::Player(id)));
        }
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn columns(&self) -> i32 {
        self.columns
    }

    pub fn turn(&self) -> PlayerId {
        self.turn
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// `None` while the game runs and after a draw.
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    pub fn points(&self, player: PlayerId) -> i64 {
        self.players[player.index()].points()
    }

    pub fn player(&self, player: PlayerId) -> &Player {
        &self.players[player.index()]
    }

    pub fn endpoint(&self, owner: PlayerId) -> &Endpoint {
        &self.endpoints[owner.index()]
    }

    /// Whether `player` has ever stood on the opponent's endpoint.
    pub fn is_finished(&self, player: PlayerId) -> bool {
        self.finished[player.index()]
    }

    pub fn in_bounds(&self, pos: Coordinate) -> bool {
        pos.in_bounds(self.rows, self.columns)
    }

    fn index(&self, pos: Coordinate) -> Option<usize> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some((pos.y * self.columns + pos.x) as usize)
    }

    pub fn at(&self, pos: Coordinate) -> Option<&Entity> {
        self.index(pos).and_then(|idx| self.grid[idx].as_ref())
    }

    fn replace_at(&mut self, pos: Coordinate, entity: Option<Entity>) {
        if let Some(idx) = self.index(pos) {
            self.grid[idx] = entity;
        }
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Coordinate, Option<&Entity>)> + '_ {
        let columns = self.columns;
        self.grid.iter().enumerate().map(move |(idx, cell)| {
            let idx = idx as i32;
            (Coordinate::new(idx % columns, idx / columns), cell.as_ref())
        })
    }

    pub fn history(&self) -> &[GameMove] {
        &self.history
    }

    /// The last `count` moves, most recent last.
    pub fn recent_moves(&self, count: usize) -> &[GameMove] {
        let start = self.history.len().saturating_sub(count);
        &self.history[start..]
    }

    pub fn last_move(&self) -> Option<&GameMove> {
        self.history.last()
    }

    /// Start and end of the most recent move, when that move was a step.
    pub fn last_step(&self) -> Option<(Coordinate, Coordinate)> {
        let last = self.last_move()?;
        Some((last.start()?, last.end()?))
    }

    fn remove_bonuses(&mut self) {
        if self.bonuses_removed {
            return;
        }
        for slot in self.grid.iter_mut() {
            if matches!(slot, Some(Entity::Bonus(_))) {
                *slot = None;
            }
        }
        self.bonuses_removed = true;
        debug!("bonuses cleared from the board");
    }

    /// Moves available to the side whose turn it is. The waste move, when
    /// affordable, comes first, then steps in compass order.
    pub fn legal_moves(&self) -> Vec<GameMove> {
        let mut moves = Vec::new();
        if !self.initialized || !self.running {
            return moves;
        }

        let mover = &self.players[self.turn.index()];
        let number = self.move_count + 1;
        if mover.points() > 0 {
            moves.push(GameMove::waste(self.turn, number));
        }

        let start = mover.position();
        for direction in Direction::COMPASS {
            let end = start.in_direction(direction, 1);
            if !self.in_bounds(end) {
                continue;
            }
            let bonus = match self.at(end) {
                None => None,
                Some(Entity::Bonus(bonus)) => Some(*bonus),
                Some(Entity::Endpoint(_)) => None,
                Some(Entity::Wall | Entity::Player(_)) => continue,
            };
            moves.push(GameMove::step(self.turn, number, start, end, direction, bonus));
        }
        moves
    }

    pub fn legal_move_keys(&self) -> Vec<char> {
        self.legal_moves().iter().map(GameMove::key).collect()
    }

    fn check_playable(&self) -> Result<(), MoveError> {
        if !self.initialized {
            return Err(MoveError::NotInitialized);
        }
        if !self.running {
            return Err(MoveError::GameOver);
        }
        Ok(())
    }

    fn end(&mut self, winner: Option<PlayerId>) {
        self.running = false;
        self.winner = winner;
        match winner {
            Some(winner) => info!(%winner, moves = self.move_count, "game over"),
            None => info!(moves = self.move_count, "game drawn"),
        }
    }

    fn forfeit(&mut self) -> MoveOutcome {
        let winner = self.turn.opposite();
        info!(loser = %self.turn, "no legal moves left, forfeiting");
        self.end(Some(winner));
        MoveOutcome::Forfeited { winner }
    }

    /// Applies the legal move with the given key.
    pub fn apply_key(&mut self, key: char) -> Result<MoveOutcome, MoveError> {
        self.check_playable()?;
        let legal = self.legal_moves();
        if legal.is_empty() {
            return Ok(self.forfeit());
        }
        let chosen = legal
            .into_iter()
            .find(|candidate| candidate.key() == key)
            .ok_or(MoveError::UnknownKey(key))?;
        self.apply_move(&chosen)
    }

    /// Validates `requested` against a fresh list of legal moves and plays
    /// it. A rejected move leaves the game untouched.
    pub fn apply_move(&mut self, requested: &GameMove) -> Result<MoveOutcome, MoveError> {
        self.check_playable()?;
        let legal = self.legal_moves();
        if legal.is_empty() {
            return Ok(self.forfeit());
        }
        let chosen = legal
            .into_iter()
            .find(|candidate| candidate == requested)
            .ok_or(MoveError::IllegalMove {
                key: requested.key(),
            })?;

        let mover = self.turn;
        let (start, end) = match chosen.kind() {
            MoveKind::Waste => {
                self.players[mover.index()].charge(1);
                self.turn = mover.opposite();
                self.history.push(chosen);
                debug!(player = %mover, points = self.points(mover), "wasted a move");
                return Ok(MoveOutcome::Applied);
            }
            MoveKind::Step { start, end, .. } => (start, end),
        };

        if let Some(Entity::Bonus(bonus)) = self.at(end).copied() {
            self.players[mover.index()].collect(&bonus);
            debug!(player = %mover, %bonus, points = self.points(mover), "bonus collected");
        }
        self.replace_at(end, Some(Entity::Player(mover)));
        self.replace_at(start, None);
        self.players[mover.index()].set_position(end);
        debug!(player = %mover, %start, %end, number = chosen.number(), "move applied");

        self.detect_finishes();
        self.resolve_turn();

        self.draw_endpoints();
        self.history.push(chosen);
        self.move_count += 1;
        Ok(MoveOutcome::Applied)
    }

    fn detect_finishes(&mut self) {
        for id in [PlayerId::P1, PlayerId::P2] {
            let goal = self.endpoints[id.opposite().index()].position();
            if self.players[id.index()].position() != goal {
                continue;
            }
            if !self.finished[id.index()] {
                info!(player = %id, points = self.points(id), "reached the opposing endpoint");
            }
            self.finished[id.index()] = true;
            self.remove_bonuses();
        }
    }

    fn resolve_turn(&mut self) {
        match self.finished {
            [false, false] => self.turn = self.turn.opposite(),
            [true, false] => self.wait_for(PlayerId::P2),
            [false, true] => self.wait_for(PlayerId::P1),
            [true, true] => {
                let p1 = self.points(PlayerId::P1);
                let p2 = self.points(PlayerId::P2);
                let winner = match p1.cmp(&p2) {
                    std::cmp::Ordering::Greater => Some(PlayerId::P1),
                    std::cmp::Ordering::Less => Some(PlayerId::P2),
                    std::cmp::Ordering::Equal => None,
                };
                self.end(winner);
            }
        }
    }

    /// The straggler keeps the turn and bleeds a point per move until the
    /// finished player is strictly ahead.
    fn wait_for(&mut self, straggler: PlayerId) {
        self.turn = straggler;
        self.players[straggler.index()].charge(1);
        let leader = straggler.opposite();
        if self.points(leader) > self.points(straggler) {
            self.end(Some(leader));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::BonusKind;

    /// A board with no walls and no bonuses, pieces in their corners.
    fn open_board(rows: i32, columns: i32) -> Game {
        let mut game = Game::new(rows, columns).unwrap();
        game.draw_endpoints();
        game.add_players();
        game.initialized = true;
        game
    }

    fn play(game: &mut Game, keys: &str) {
        for key in keys.chars() {
            assert_eq!(
                game.apply_key(key),
                Ok(MoveOutcome::Applied),
                "key {key} rejected after {} moves",
                game.move_count()
            );
        }
    }

    fn count_bonuses(game: &Game) -> usize {
        game.cells()
            .filter(|(_, cell)| matches!(cell, Some(Entity::Bonus(_))))
            .count()
    }

    #[test]
    fn dimensions_are_rounded_to_odd() {
        let game = Game::new(10, 14).unwrap();
        assert_eq!((game.rows(), game.columns()), (11, 15));
        assert_eq!(game.player(PlayerId::P2).position(), Coordinate::new(14, 10));
        let game = Game::new(2, 2).unwrap();
        assert_eq!((game.rows(), game.columns()), (3, 3));
    }

    #[test]
    fn absurd_dimensions_are_rejected() {
        for (rows, columns) in [(0, 11), (11, -3), (1, 11), (11, MAX_DIMENSION + 1)] {
            assert_eq!(
                Game::new(rows, columns).unwrap_err(),
                GameError::InvalidDimensions { rows, columns }
            );
        }
    }

    #[test]
    fn moves_before_initialize_are_refused() {
        let mut game = Game::new(5, 5).unwrap();
        assert!(game.legal_moves().is_empty());
        assert_eq!(game.apply_key('d'), Err(MoveError::NotInitialized));
    }

    #[test]
    fn legal_moves_list_waste_first_then_compass_order() {
        let mut game = open_board(5, 5);
        assert_eq!(game.legal_move_keys(), vec!['x', 'd', 's']);
        game.replace_at(Coordinate::new(1, 0), Some(Entity::Wall));
        assert_eq!(game.legal_move_keys(), vec!['x', 's']);
    }

    #[test]
    fn cannot_step_onto_the_opponent() {
        let mut game = open_board(3, 3);
        play(&mut game, "dwd");
        // P1 at (2, 0) sits directly north of P2 at (2, 1).
        assert_eq!(game.turn(), PlayerId::P2);
        assert_eq!(game.legal_move_keys(), vec!['x', 's', 'a']);
    }

    #[test]
    fn waste_move_costs_a_point_and_passes_the_turn() {
        let mut game = open_board(5, 5);
        play(&mut game, "x");
        assert_eq!(game.points(PlayerId::P1), 0);
        assert_eq!(game.turn(), PlayerId::P2);
        assert_eq!(game.move_count(), 0);
        assert_eq!(game.history().len(), 1);
        assert!(game.last_step().is_none());
        assert_eq!(game.player(PlayerId::P1).position(), Coordinate::new(0, 0));

        play(&mut game, "x");
        assert!(!game.legal_move_keys().contains(&'x'));
        assert_eq!(game.apply_key('x'), Err(MoveError::UnknownKey('x')));
        assert_eq!(
            game.apply_move(&GameMove::waste(PlayerId::P1, 1)),
            Err(MoveError::IllegalMove { key: 'x' })
        );
    }

    #[test]
    fn rejected_moves_change_nothing() {
        let mut game = open_board(5, 5);
        let stale = game.legal_moves()[1];
        play(&mut game, "da");
        let before = game.clone();
        assert!(game.apply_move(&stale).is_err());
        let wrong_player = GameMove::waste(PlayerId::P2, game.move_count() + 1);
        assert!(game.apply_move(&wrong_player).is_err());
        assert!(game.apply_key('q').is_err());
        assert_eq!(game, before);
    }

    #[test]
    fn collecting_a_bonus_adjusts_points_and_clears_the_cell() {
        let mut game = open_board(5, 5);
        let bonus = Bonus::new(BonusKind::Add, 5, false);
        game.replace_at(Coordinate::new(1, 0), Some(Entity::Bonus(bonus)));
        game.replace_at(Coordinate::new(2, 2), Some(Entity::Bonus(bonus)));

        play(&mut game, "d");
        assert_eq!(game.points(PlayerId::P1), 6);
        assert_eq!(game.at(Coordinate::new(1, 0)), Some(&Entity::Player(PlayerId::P1)));
        assert_eq!(game.last_move().and_then(GameMove::bonus), Some(bonus));
        assert_eq!(game.at(Coordinate::new(2, 2)), Some(&Entity::Bonus(bonus)));
        assert_eq!(
            game.last_step(),
            Some((Coordinate::new(0, 0), Coordinate::new(1, 0)))
        );
        assert_eq!(game.last_move().unwrap().describe(), "1. (0, 0) to (1, 0) (east) +5");
    }

    #[test]
    fn vacated_start_shows_its_endpoint() {
        let mut game = open_board(5, 5);
        play(&mut game, "d");
        assert_eq!(game.at(Coordinate::new(0, 0)), Some(&Entity::Endpoint(PlayerId::P1)));
        play(&mut game, "a");
        assert_eq!(game.at(Coordinate::new(4, 4)), Some(&Entity::Endpoint(PlayerId::P2)));
    }

    #[test]
    fn finishing_with_the_lead_wins_immediately() {
        let mut game = open_board(5, 5);
        play(&mut game, "dadadadaswswsws");
        assert!(game.is_finished(PlayerId::P1));
        assert!(!game.is_running());
        assert_eq!(game.winner(), Some(PlayerId::P1));
        assert_eq!(game.points(PlayerId::P2), 0);
        assert_eq!(game.apply_key('w'), Err(MoveError::GameOver));
    }

    #[test]
    fn straggler_pays_one_point_per_move() {
        let mut game = open_board(5, 5);
        game.players[PlayerId::P2.index()].set_points(50);
        game.replace_at(Coordinate::new(1, 1), Some(Entity::Bonus(Bonus::new(BonusKind::Add, 2, false))));
        game.replace_at(Coordinate::new(3, 1), Some(Entity::Bonus(Bonus::new(BonusKind::Add, 3, true))));

        play(&mut game, "dadwdadwsasdsas");
        assert!(game.is_finished(PlayerId::P1));
        assert!(game.is_running());
        assert_eq!(game.turn(), PlayerId::P2);
        assert_eq!(game.points(PlayerId::P2), 49);
        assert_eq!(count_bonuses(&game), 0);

        for (key, expected) in [('d', 48), ('d', 47), ('s', 46)] {
            play(&mut game, &key.to_string());
            assert_eq!(game.points(PlayerId::P2), expected);
            assert_eq!(game.turn(), PlayerId::P2);
        }
        assert_eq!(game.points(PlayerId::P1), 1);
    }

    #[test]
    fn equal_points_at_the_finish_is_a_draw() {
        let mut game = open_board(5, 5);
        game.replace_at(
            Coordinate::new(2, 4),
            Some(Entity::Bonus(Bonus::new(BonusKind::Add, 1, false))),
        );
        play(&mut game, "dadadadaswswswsw");
        assert!(game.is_finished(PlayerId::P1));
        assert!(game.is_finished(PlayerId::P2));
        assert!(!game.is_running());
        assert_eq!(game.winner(), None);
        assert_eq!(game.points(PlayerId::P1), 1);
        assert_eq!(game.points(PlayerId::P2), 1);
        assert_eq!(game.move_count(), 16);
    }

    #[test]
    fn a_player_without_moves_forfeits() {
        let mut game = open_board(5, 5);
        game.replace_at(Coordinate::new(1, 0), Some(Entity::Wall));
        game.replace_at(Coordinate::new(0, 1), Some(Entity::Wall));
        game.players[PlayerId::P1.index()].set_points(0);
        assert!(game.legal_moves().is_empty());

        assert_eq!(
            game.apply_key('d'),
            Ok(MoveOutcome::Forfeited {
                winner: PlayerId::P2
            })
        );
        assert!(!game.is_running());
        assert_eq!(game.winner(), Some(PlayerId::P2));
        assert!(game.history().is_empty());
    }

    #[test]
    fn forfeit_triggers_for_structured_moves_too() {
        let mut game = open_board(5, 5);
        game.replace_at(Coordinate::new(1, 0), Some(Entity::Wall));
        game.replace_at(Coordinate::new(0, 1), Some(Entity::Wall));
        game.players[PlayerId::P1.index()].set_points(-4);
        let outcome = game.apply_move(&GameMove::waste(PlayerId::P1, 1));
        assert_eq!(
            outcome,
            Ok(MoveOutcome::Forfeited {
                winner: PlayerId::P2
            })
        );
    }

    #[test]
    fn bonus_sweep_happens_once() {
        let mut game = open_board(5, 5);
        game.players[PlayerId::P2.index()].set_points(50);
        play(&mut game, "dadwdadwsasdsas");
        assert!(game.bonuses_removed);
        let late = Bonus::new(BonusKind::Add, 4, false);
        game.replace_at(Coordinate::new(0, 4), Some(Entity::Bonus(late)));
        game.detect_finishes();
        assert_eq!(game.at(Coordinate::new(0, 4)), Some(&Entity::Bonus(late)));
    }

    #[test]
    fn recent_moves_keep_the_tail() {
        let mut game = open_board(5, 5);
        play(&mut game, "dasw");
        let recent = game.recent_moves(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].number(), 3);
        assert_eq!(recent[1].number(), 4);
        assert_eq!(game.recent_moves(10).len(), 4);
        assert_eq!(recent[1].to_string(), "w");
    }

    #[test]
    fn move_equality_ignores_bonus_snapshot() {
        let start = Coordinate::new(0, 0);
        let end = Coordinate::new(1, 0);
        let with_bonus = GameMove::step(
            PlayerId::P1,
            1,
            start,
            end,
            Direction::East,
            Some(Bonus::new(BonusKind::Add, 1, false)),
        );
        let plain = GameMove::step(PlayerId::P1, 1, start, end, Direction::East, None);
        assert_eq!(with_bonus, plain);
        assert_ne!(plain, GameMove::step(PlayerId::P1, 2, start, end, Direction::East, None));
        assert_ne!(plain, GameMove::waste(PlayerId::P1, 1));
        assert_eq!(GameMove::waste(PlayerId::P2, 3), GameMove::waste(PlayerId::P2, 3));
        assert_ne!(GameMove::waste(PlayerId::P2, 3), GameMove::waste(PlayerId::P1, 3));
    }
}
