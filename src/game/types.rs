use std::{fmt, slice::Iter};

use serde::{Deserialize, Serialize};

use crate::game::{board::Board, error::Error};

/// Travel direction, numbered clockwise from up.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Direction {
    Up    = 0,
    Right = 1,
    Down  = 2,
    Left  = 3,
}

impl Direction {
    pub fn iter() -> Iter<'static, Direction> {
        static DIRECTIONS: [Direction; 4] = [
            Direction::Up,
            Direction::Right,
            Direction::Down,
            Direction::Left,
        ];
        DIRECTIONS.iter()
    }

    #[must_use]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    /// Direction of a single step from `from` to `to` on `board`, treating a
    /// jump from one edge to the opposite edge as a one-cell wrapped step.
    /// Returns `None` if the cells are not neighbours either way.
    #[must_use]
    pub const fn between(
        from: Coord,
        to: Coord,
        board: &Board,
    ) -> Option<Direction> {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        if dy == 0 {
            if dx == 1 || dx == -(board.width - 1) {
                return Some(Direction::Right);
            }
            if dx == -1 || dx == board.width - 1 {
                return Some(Direction::Left);
            }
        } else if dx == 0 {
            if dy == 1 || dy == -(board.height - 1) {
                return Some(Direction::Down);
            }
            if dy == -1 || dy == board.height - 1 {
                return Some(Direction::Up);
            }
        }
        None
    }
}

impl TryFrom<i64> for Direction {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Direction::Up),
            1 => Ok(Direction::Right),
            2 => Ok(Direction::Down),
            3 => Ok(Direction::Left),
            _ => Err(Error::InvalidDirection(value)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Direction::Up => "Up",
                Direction::Right => "Right",
                Direction::Down => "Down",
                Direction::Left => "Left",
            }
        )
    }
}

/// A grid cell. `y` grows downwards, so row 0 is the top edge.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Coord {
    pub x: i64,
    pub y: i64,
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Coord {
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// The adjacent cell in `direction`. May lie off the board.
    #[must_use]
    pub const fn neighbour(&self, direction: Direction) -> Coord {
        Coord {
            x: self.x
                + match direction {
                    Direction::Right => 1,
                    Direction::Left => -1,
                    _ => 0,
                },
            y: self.y
                + match direction {
                    Direction::Down => 1,
                    Direction::Up => -1,
                    _ => 0,
                },
        }
    }
}
