use std::collections::VecDeque;

use itertools::Itertools;

use crate::game::{
    board::Board,
    types::{Coord, Direction},
};

/// The snake's body, tail at the front and head at the back, with an
/// occupancy map keyed by flattened cell index.
#[derive(Clone, Debug)]
pub struct Snake {
    body:     VecDeque<Coord>,
    occupied: Vec<bool>,
    board:    Board,
}

impl Snake {
    /// Builds a snake from `cells`, tail first. Cells must be on the board
    /// and distinct.
    pub fn new(board: Board, cells: impl IntoIterator<Item = Coord>) -> Self {
        let mut snake = Self {
            body: VecDeque::new(),
            occupied: vec![false; board.area()],
            board,
        };
        for cell in cells {
            snake.push_head(cell);
        }
        snake
    }

    /// The starting lane for a snake of `length` travelling `direction`.
    /// Each lane hugs a different edge, one cell in, with the body trailing
    /// behind the head.
    pub fn starting(board: Board, direction: Direction, length: i64) -> Self {
        let (width, height) = (board.width, board.height);
        Self::new(
            board,
            (0..length).map(|i| match direction {
                Direction::Up => Coord::new(1, height - 2 - i),
                Direction::Right => Coord::new(1 + i, 1),
                Direction::Down => Coord::new(width - 2, 1 + i),
                Direction::Left => Coord::new(width - 2 - i, height - 2),
            }),
        )
    }

    #[must_use]
    pub fn head(&self) -> Option<Coord> {
        self.body.back().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        self.board.contains(coord) && self.occupied[self.board.index(coord)]
    }

    pub fn cells(&self) -> impl Iterator<Item = &Coord> + '_ {
        self.body.iter()
    }

    /// Direction of the last step, read off the two head-most segments.
    /// `None` for a single-segment snake.
    #[must_use]
    pub fn facing(&self) -> Option<Direction> {
        let mut segments = self.body.iter().rev();
        let head = segments.next()?;
        let neck = segments.next()?;
        Direction::between(*neck, *head, &self.board)
    }

    pub fn push_head(&mut self, coord: Coord) {
        self.occupied[self.board.index(coord)] = true;
        self.body.push_back(coord);
    }

    pub fn pop_tail(&mut self) -> Option<Coord> {
        let tail = self.body.pop_front()?;
        self.occupied[self.board.index(tail)] = false;
        Some(tail)
    }

    /// Puts a segment back where the tail was.
    pub fn regrow(&mut self, coord: Coord) {
        self.occupied[self.board.index(coord)] = true;
        self.body.push_front(coord);
    }

    /// Human readable body, tail to head.
    #[must_use]
    pub fn describe(&self) -> String {
        self.body.iter().join(" -> ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD: Board = Board {
        width:  10,
        height: 8,
    };

    fn cells(snake: &Snake) -> Vec<Coord> {
        snake.cells().copied().collect()
    }

    #[test]
    fn starting_lanes() {
        let up = Snake::starting(BOARD, Direction::Up, 3);
        assert_eq!(
            cells(&up),
            vec![Coord::new(1, 6), Coord::new(1, 5), Coord::new(1, 4)]
        );

        let right = Snake::starting(BOARD, Direction::Right, 3);
        assert_eq!(
            cells(&right),
            vec![Coord::new(1, 1), Coord::new(2, 1), Coord::new(3, 1)]
        );

        let down = Snake::starting(BOARD, Direction::Down, 3);
        assert_eq!(
            cells(&down),
            vec![Coord::new(8, 1), Coord::new(8, 2), Coord::new(8, 3)]
        );

        let left = Snake::starting(BOARD, Direction::Left, 3);
        assert_eq!(
            cells(&left),
            vec![Coord::new(8, 6), Coord::new(7, 6), Coord::new(6, 6)]
        );
    }

    #[test]
    fn starting_snake_faces_its_direction() {
        for direction in Direction::iter() {
            for length in 2..=5 {
                let snake = Snake::starting(BOARD, *direction, length);
                assert_eq!(snake.len(), length as usize);
                assert_eq!(snake.facing(), Some(*direction));
            }
        }
    }

    #[test]
    fn single_segment_has_no_facing() {
        let snake = Snake::starting(BOARD, Direction::Right, 1);
        assert_eq!(snake.head(), Some(Coord::new(1, 1)));
        assert_eq!(snake.facing(), None);
    }

    #[test]
    fn occupancy_follows_moves() {
        let mut snake = Snake::starting(BOARD, Direction::Right, 3);
        assert!(snake.contains(Coord::new(1, 1)));
        assert!(!snake.contains(Coord::new(4, 1)));
        assert!(!snake.contains(Coord::new(-1, 1)));

        let tail = snake.pop_tail();
        assert_eq!(tail, Some(Coord::new(1, 1)));
        assert!(!snake.contains(Coord::new(1, 1)));

        snake.push_head(Coord::new(4, 1));
        assert!(snake.contains(Coord::new(4, 1)));
        assert_eq!(snake.head(), Some(Coord::new(4, 1)));

        snake.regrow(Coord::new(1, 1));
        assert_eq!(snake.len(), 4);
        assert!(snake.contains(Coord::new(1, 1)));
        assert_eq!(
            snake.describe(),
            "(1, 1) -> (2, 1) -> (3, 1) -> (4, 1)"
        );
    }

    #[test]
    fn facing_across_a_portal() {
        let snake = Snake::new(BOARD, [Coord::new(9, 4), Coord::new(0, 4)]);
        assert_eq!(snake.facing(), Some(Direction::Right));

        let snake = Snake::new(BOARD, [Coord::new(3, 0), Coord::new(3, 7)]);
        assert_eq!(snake.facing(), Some(Direction::Up));
    }
}
