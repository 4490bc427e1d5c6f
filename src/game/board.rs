use crate::game::types::Coord;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board {
    pub width:  i64,
    pub height: i64,
}

impl Board {
    #[must_use]
    pub const fn contains(&self, coord: Coord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.x < self.width
            && coord.y < self.height
    }

    #[must_use]
    pub const fn area(&self) -> usize {
        (self.width * self.height) as usize
    }

    /// Flattened `y * width + x` index of an on-board cell.
    #[must_use]
    pub const fn index(&self, coord: Coord) -> usize {
        (coord.y * self.width + coord.x) as usize
    }

    #[must_use]
    pub const fn coord(&self, index: usize) -> Coord {
        let index = index as i64;
        Coord {
            x: index % self.width,
            y: index / self.width,
        }
    }

    /// Maps a cell that stepped off one edge back in from the opposite edge.
    /// Each axis wraps on its own, so leaving the right edge re-enters on the
    /// left of the same row.
    #[must_use]
    pub const fn wrap(&self, coord: Coord) -> Coord {
        Coord {
            x: coord.x.rem_euclid(self.width),
            y: coord.y.rem_euclid(self.height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD: Board = Board {
        width:  8,
        height: 6,
    };

    #[test]
    fn contains_only_on_board_cells() {
        assert!(BOARD.contains(Coord::new(0, 0)));
        assert!(BOARD.contains(Coord::new(7, 5)));
        assert!(!BOARD.contains(Coord::new(8, 0)));
        assert!(!BOARD.contains(Coord::new(0, 6)));
        assert!(!BOARD.contains(Coord::new(-1, 3)));
        assert!(!BOARD.contains(Coord::new(3, -1)));
    }

    #[test]
    fn index_is_row_major() {
        assert_eq!(BOARD.area(), 48);
        assert_eq!(BOARD.index(Coord::new(0, 0)), 0);
        assert_eq!(BOARD.index(Coord::new(7, 0)), 7);
        assert_eq!(BOARD.index(Coord::new(0, 1)), 8);
        assert_eq!(BOARD.index(Coord::new(3, 2)), 19);
        for index in 0..BOARD.area() {
            assert_eq!(BOARD.index(BOARD.coord(index)), index);
        }
    }

    #[test]
    fn wrap_stays_in_row_and_column() {
        assert_eq!(BOARD.wrap(Coord::new(8, 2)), Coord::new(0, 2));
        assert_eq!(BOARD.wrap(Coord::new(-1, 2)), Coord::new(7, 2));
        assert_eq!(BOARD.wrap(Coord::new(4, 6)), Coord::new(4, 0));
        assert_eq!(BOARD.wrap(Coord::new(4, -1)), Coord::new(4, 5));
        assert_eq!(BOARD.wrap(Coord::new(3, 3)), Coord::new(3, 3));
    }
}
