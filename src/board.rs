use crate::{BoardInt, Coords};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Snake,
    Food,
}

/// Dense occupancy grid. A position with no entry is empty.
pub struct Board {
    width: BoardInt,
    height: BoardInt,
    cells: Vec<Option<Cell>>,
}

impl Board {
    pub fn new(width: BoardInt, height: BoardInt) -> Self {
        let cells = vec![None; width as usize * height as usize];
        Board { width, height, cells }
    }

    pub fn get(&self, pos: Coords) -> Option<Cell> {
        self.index(pos).and_then(|i| self.cells[i])
    }

    pub fn set(&mut self, pos: Coords, cell: Cell) {
        let i = self.index(pos)
            .unwrap_or_else(|| panic!("position {:?} is outside the board", pos));
        self.cells[i] = Some(cell);
    }

    pub fn remove(&mut self, pos: Coords) -> Option<Cell> {
        self.index(pos).and_then(|i| self.cells[i].take())
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
    }

    /// Occupied positions in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coords, Cell)> + '_ {
        let width = self.width as usize;

        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.map(|c| (((i % width) as BoardInt, (i / width) as BoardInt), c))
        })
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|c| **c == Some(cell)).count()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn index(&self, pos: Coords) -> Option<usize> {
        let (x, y) = pos;

        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }

        Some(self.width as usize * y as usize + x as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board_reports_nothing() {
        let board = Board::new(4, 3);

        assert_eq!(board.get((0, 0)), None);
        assert_eq!(board.get((3, 2)), None);
        assert_eq!(board.iter().count(), 0);
    }

    #[test]
    fn set_get_and_remove() {
        let mut board = Board::new(4, 3);

        board.set((1, 2), Cell::Snake);
        board.set((3, 0), Cell::Food);

        assert_eq!(board.get((1, 2)), Some(Cell::Snake));
        assert_eq!(board.get((3, 0)), Some(Cell::Food));
        assert_eq!(board.remove((1, 2)), Some(Cell::Snake));
        assert_eq!(board.get((1, 2)), None);
        assert_eq!(board.remove((1, 2)), None);
    }

    #[test]
    fn set_overwrites_previous_kind() {
        let mut board = Board::new(4, 3);

        board.set((2, 1), Cell::Food);
        board.set((2, 1), Cell::Snake);

        assert_eq!(board.get((2, 1)), Some(Cell::Snake));
        assert_eq!(board.count(Cell::Food), 0);
    }

    #[test]
    fn outside_positions_read_as_empty() {
        let board = Board::new(4, 3);

        assert_eq!(board.get((-1, 0)), None);
        assert_eq!(board.get((0, -1)), None);
        assert_eq!(board.get((4, 0)), None);
        assert_eq!(board.get((0, 3)), None);
    }

    #[test]
    #[should_panic(expected = "outside the board")]
    fn set_outside_board_panics() {
        let mut board = Board::new(4, 3);
        board.set((4, 0), Cell::Snake);
    }

    #[test]
    fn iter_yields_coordinates_in_row_major_order() {
        let mut board = Board::new(4, 3);

        board.set((3, 2), Cell::Snake);
        board.set((0, 1), Cell::Food);
        board.set((2, 0), Cell::Snake);

        let cells: Vec<_> = board.iter().collect();
        assert_eq!(cells, vec![
            ((2, 0), Cell::Snake),
            ((0, 1), Cell::Food),
            ((3, 2), Cell::Snake),
        ]);
    }

    #[test]
    fn clear_wipes_everything() {
        let mut board = Board::new(4, 3);

        board.set((0, 0), Cell::Snake);
        board.set((1, 1), Cell::Food);
        board.clear();

        assert_eq!(board.iter().count(), 0);
    }
}
