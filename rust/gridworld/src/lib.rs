extern crate ndarray;
extern crate rand;
extern crate serde;
extern crate serde_json;

pub mod common;
pub mod maps;
pub mod mdps;
pub mod ui;

pub use common::defs::*;
pub use mdps::SlipModel;

use itertools::Itertools;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::iter::zip;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("invalid state {0}: out of bounds or on a wall")]
    InvalidState(State),
    #[error("invalid action code: {0}")]
    InvalidAction(Discrete),
    #[error("malformed grid: {0}")]
    MalformedGrid(String),
    #[error("invalid probability distribution: {0}")]
    InvalidProbability(String),
    #[error("cannot parse grid description: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot read grid description: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GridError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    White,
    Brown,
    Green,
    Wall,
}

impl Tile {
    pub fn is_wall(&self) -> bool {
        matches!(self, Tile::Wall)
    }

    pub fn glyph(&self) -> char {
        match self {
            Tile::White => '.',
            Tile::Brown => 'B',
            Tile::Green => 'G',
            Tile::Wall => '#',
        }
    }
}

impl FromStr for Tile {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "White" => Ok(Tile::White),
            "Brown" => Ok(Tile::Brown),
            "Green" => Ok(Tile::Green),
            "Wall" => Ok(Tile::Wall),
            e => Err(GridError::MalformedGrid(format!("unknown tile label '{e}'"))),
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Moves available to the agent. The discriminants are the wire encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Action {
    /// Enumeration order. Greedy selection breaks ties in favour of the earlier entry.
    pub const ALL: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    pub fn code(self) -> Discrete {
        self as Discrete
    }

    /// Unit displacement as `(dx, dy)`; y grows downwards.
    pub fn displacement(self) -> (isize, isize) {
        match self {
            Action::Up => (0, -1),
            Action::Down => (0, 1),
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
        }
    }

    /// The two directions at right angles to this one.
    pub fn perpendicular(self) -> [Action; 2] {
        match self {
            Action::Up | Action::Down => [Action::Left, Action::Right],
            Action::Left | Action::Right => [Action::Up, Action::Down],
        }
    }

    pub fn arrow(self) -> char {
        match self {
            Action::Up => '^',
            Action::Down => 'v',
            Action::Left => '<',
            Action::Right => '>',
        }
    }
}

impl TryFrom<Discrete> for Action {
    type Error = GridError;

    fn try_from(code: Discrete) -> Result<Self> {
        Action::ALL
            .into_iter()
            .find(|a| a.code() == code)
            .ok_or(GridError::InvalidAction(code))
    }
}

/// A grid coordinate. Origin is the top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct State {
    pub x: usize,
    pub y: usize,
}

impl State {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub(crate) fn index(&self) -> [usize; 2] {
        [self.y, self.x]
    }
}

impl From<(usize, usize)> for State {
    fn from((x, y): (usize, usize)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Reward collected on arrival at a tile. Walls are never entered and carry no reward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RewardTable {
    pub white: Continous,
    pub brown: Continous,
    pub green: Continous,
}

impl Default for RewardTable {
    fn default() -> Self {
        Self {
            white: -0.04,
            brown: -1.,
            green: 1.,
        }
    }
}

impl RewardTable {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn reward(&self, tile: Tile) -> Option<Continous> {
        match tile {
            Tile::White => Some(self.white),
            Tile::Brown => Some(self.brown),
            Tile::Green => Some(self.green),
            Tile::Wall => None,
        }
    }
}

/// Rectangular, immutable tile layout stored row-major as `[[y, x]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    tiles: Array2<Tile>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Tile>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        if n_rows == 0 || n_cols == 0 {
            return Err(GridError::MalformedGrid("grid has no cells".to_string()));
        }

        if let Some((y, row)) = rows.iter().find_position(|row| row.len() != n_cols) {
            return Err(GridError::MalformedGrid(format!(
                "row {y} has {} tiles, expected {n_cols}",
                row.len()
            )));
        }

        let tiles = Array2::from_shape_vec((n_rows, n_cols), rows.into_iter().flatten().collect())
            .map_err(|e| GridError::MalformedGrid(e.to_string()))?;

        Ok(Self { tiles })
    }

    pub fn from_labels<S: AsRef<str>>(rows: &[Vec<S>]) -> Result<Self> {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|l| l.as_ref().parse()).collect::<Result<Vec<_>>>())
            .collect::<Result<Vec<_>>>()?;

        Self::new(rows)
    }

    /// Parses a JSON array of rows of tile labels, e.g. `[["Green", "Wall"]]`.
    pub fn from_json(json: &str) -> Result<Self> {
        let rows: Vec<Vec<Tile>> = serde_json::from_str(json)?;
        Self::new(rows)
    }

    /// `(rows, cols)`, the shape of value and policy tables over this grid.
    pub fn shape(&self) -> (usize, usize) {
        self.tiles.dim()
    }

    pub fn tile(&self, s: State) -> Option<Tile> {
        self.tiles.get(s.index()).copied()
    }

    pub fn tiles(&self) -> &Array2<Tile> {
        &self.tiles
    }

    pub fn labels(&self) -> Vec<Vec<String>> {
        self.tiles
            .rows()
            .into_iter()
            .map(|row| row.iter().map(Tile::to_string).collect())
            .collect()
    }

    fn traversable_states(&self) -> Vec<State> {
        self.tiles
            .indexed_iter()
            .filter(|(_, t)| !t.is_wall())
            .map(|((y, x), _)| State::new(x, y))
            .collect()
    }
}

impl Default for Grid {
    fn default() -> Self {
        use Tile::*;
        let rows = [
            [Green, Wall, Green, White, White, Green],
            [White, Brown, White, Green, Wall, Brown],
            [White, White, Brown, White, Green, White],
            [White, White, White, Brown, White, Green],
            [White, Wall, Wall, Wall, Brown, White],
            [White, White, White, White, White, White],
        ];

        let mut tiles = Array2::from_elem((6, 6), White);
        for (y, row) in rows.iter().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                tiles[[y, x]] = *tile;
            }
        }

        Self { tiles }
    }
}

/// Weighted outcome of taking an action in a state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub next_state: State,
    pub probability: Continous,
    pub reward: Continous,
}

pub type Transitions = HashMap<(State, Action), Vec<Transition>>;

/// The grid world environment: a fixed grid, its reward table and the derived state space.
#[derive(Debug, Clone)]
pub struct GridWorld {
    grid: Grid,
    rewards: RewardTable,
    states: Vec<State>,
}

impl GridWorld {
    pub fn new(grid: Grid, rewards: RewardTable) -> Result<Self> {
        let states = grid.traversable_states();
        if states.is_empty() {
            return Err(GridError::MalformedGrid(
                "grid has no traversable states".to_string(),
            ));
        }

        Ok(Self {
            grid,
            rewards,
            states,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Non-wall coordinates in row-major order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn shape(&self) -> (usize, usize) {
        self.grid.shape()
    }

    pub fn reward(&self, s: State) -> Result<Continous> {
        self.grid
            .tile(s)
            .and_then(|t| self.rewards.reward(t))
            .ok_or(GridError::InvalidState(s))
    }

    /// Applies `a` from `s`. A move off the grid or into a wall leaves the agent
    /// in place and pays the reward of the current tile.
    pub fn step(&self, s: State, a: Action) -> Result<(State, Continous)> {
        let stay = self.reward(s)?;
        match self.neighbour(s, a) {
            Some(next) => Ok((next, self.reward(next)?)),
            None => Ok((s, stay)),
        }
    }

    /// Outcome table for every state and action under the given slip model.
    pub fn transitions(&self, model: &SlipModel) -> Result<Transitions> {
        let mut transitions = Transitions::new();
        for &s in &self.states {
            for a in Action::ALL {
                let (actual, probs) = model.outcomes(a);
                let ts = zip(actual, probs)
                    .map(|(b, probability)| {
                        let (next_state, reward) = self.step(s, b)?;
                        Ok(Transition {
                            next_state,
                            probability,
                            reward,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;

                transitions.insert((s, a), ts);
            }
        }

        Ok(transitions)
    }

    fn neighbour(&self, s: State, a: Action) -> Option<State> {
        let (dx, dy) = a.displacement();
        let next = State::new(s.x.checked_add_signed(dx)?, s.y.checked_add_signed(dy)?);
        match self.grid.tile(next) {
            Some(t) if !t.is_wall() => Some(next),
            _ => None,
        }
    }
}

impl Default for GridWorld {
    fn default() -> Self {
        let grid = Grid::default();
        let states = grid.traversable_states();

        Self {
            grid,
            rewards: RewardTable::default(),
            states,
        }
    }
}
