pub mod cell;

use crate::GameError;
use cell::Cell;
use log::debug;
use rand::{thread_rng, Rng};
use std::collections::HashSet;
use std::fmt::{Debug, Display, Formatter};

/// The minefield representation.
///
/// The minefield is a rectangular grid of cells with a known number of bombs. The grid is
/// stored as a single contiguous vector in row-major order, indexed by `y * width + x`.
#[derive(PartialEq, Eq)]
pub struct Minefield {
    /// The number of columns in the grid.
    width: u16,
    /// The number of rows in the grid.
    height: u16,
    /// The total number of cells holding a bomb once the field is populated.
    bomb_count: u32,
    /// The cells of the grid, row by row.
    cells: Vec<Cell>,
    /// Whether the bombs have been placed already. Placement happens exactly once per field.
    populated: bool,
}

impl Minefield {
    /// Creates a new [`Minefield`] with the provided dimensions and number of bombs.
    ///
    /// Even though the method accepts the desired bomb count, it doesn't place the bombs yet.
    /// The reason for that is that the player's first revealed cell is guaranteed not to hold
    /// a bomb (i.e., one cell gets excluded from placement), and which cell that is becomes
    /// known only after the field has been created and the player has picked their first cell.
    ///
    /// The configuration, on the other hand, is validated here and now: a bomb count that is
    /// too small or too large for the given dimensions should be reported when the field is
    /// configured, not after the player has already started playing.
    ///
    /// The method fails with [`GameError::InvalidConfiguration`] when either dimension is zero,
    /// when the bomb count is zero, or when the bomb count doesn't leave at least one clear
    /// cell.
    pub fn new(width: u16, height: u16, bomb_count: u32) -> Result<Self, GameError> {
        let invalid_configuration = GameError::InvalidConfiguration {
            width,
            height,
            bombs: bomb_count,
        };

        if width == 0 || height == 0 {
            return Err(invalid_configuration);
        }

        let cells_amount = width as u32 * height as u32;
        if bomb_count == 0 || bomb_count >= cells_amount {
            return Err(invalid_configuration);
        }

        Ok(Minefield {
            width,
            height,
            bomb_count,
            cells: vec![Cell::new(); cells_amount as usize],
            populated: false,
        })
    }

    /// Creates an already-populated [`Minefield`] with bombs at exactly the given positions.
    ///
    /// This is the deterministic counterpart of [`Minefield::populate`], intended for tests
    /// and scripted scenarios where the layout must be known in advance. Duplicate positions
    /// collapse into one bomb. An empty position list is accepted and produces a field whose
    /// every cell is clear (something [`Minefield::new`] deliberately rejects).
    ///
    /// The method fails with [`GameError::InvalidConfiguration`] when either dimension is zero
    /// or the positions cover the whole grid, and with [`GameError::OutOfBounds`] when any
    /// position lies outside the grid.
    pub fn with_bomb_positions(
        width: u16,
        height: u16,
        bomb_positions: &[(u16, u16)],
    ) -> Result<Self, GameError> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidConfiguration {
                width,
                height,
                bombs: bomb_positions.len() as u32,
            });
        }

        let cells_amount = width as u32 * height as u32;

        let mut bomb_indices = HashSet::new();
        for &(x, y) in bomb_positions {
            if x >= width || y >= height {
                return Err(GameError::OutOfBounds { x, y });
            }

            bomb_indices.insert(y as usize * width as usize + x as usize);
        }

        let bomb_count = bomb_indices.len() as u32;
        if bomb_count >= cells_amount {
            return Err(GameError::InvalidConfiguration {
                width,
                height,
                bombs: bomb_count,
            });
        }

        let mut minefield = Minefield {
            width,
            height,
            bomb_count,
            cells: vec![Cell::new(); cells_amount as usize],
            populated: true,
        };

        for &index in &bomb_indices {
            minefield.cells[index].mark_bomb();
        }

        minefield.update_bombs_around();

        Ok(minefield)
    }

    /// Populates the field with randomly distributed bombs, the total amount of which is known
    /// from the time when the field was created. Draws from the thread-local generator; see
    /// [`Minefield::populate_with_rng`] for the deterministic variant.
    pub fn populate(&mut self, excluded_position: Option<(u16, u16)>) -> Result<(), GameError> {
        self.populate_with_rng(excluded_position, &mut thread_rng())
    }

    /// Populates the field with randomly distributed bombs drawn from the provided generator.
    ///
    /// Placement is a rejection-sampling loop: cell indices are drawn uniformly until
    /// `bomb_count` distinct positions have been collected, resampling duplicates. The
    /// optionally excluded position is never kept, which guarantees the cell at that position
    /// ends up clear; the field still receives exactly the pre-configured number of bombs.
    ///
    /// As a side effect, the method computes the bombs-around value of every cell.
    ///
    /// The method fails with [`GameError::OutOfBounds`] when the excluded position lies outside
    /// the grid and with [`GameError::BombsAlreadyPlaced`] when the field has been populated
    /// before. The placed-exactly-once restriction keeps an ongoing round from having its
    /// bombs silently redistributed.
    pub fn populate_with_rng<R: Rng>(
        &mut self,
        excluded_position: Option<(u16, u16)>,
        rng: &mut R,
    ) -> Result<(), GameError> {
        let excluded_index = match excluded_position {
            Some((x, y)) => {
                if x >= self.width || y >= self.height {
                    return Err(GameError::OutOfBounds { x, y });
                }

                Some(self.index_of(x, y))
            }
            None => None,
        };

        if self.populated {
            return Err(GameError::BombsAlreadyPlaced);
        }

        let mut bomb_indices = HashSet::with_capacity(self.bomb_count as usize);
        while (bomb_indices.len() as u32) < self.bomb_count {
            let candidate = rng.gen_range(0..self.cells_amount()) as usize;

            if excluded_index == Some(candidate) {
                continue;
            }

            bomb_indices.insert(candidate);
        }

        for &index in &bomb_indices {
            self.cells[index].mark_bomb();
        }

        self.update_bombs_around();
        self.populated = true;

        debug!(
            "populated a {}x{} minefield with {} bombs, excluded position {:?}",
            self.width, self.height, self.bomb_count, excluded_position
        );

        Ok(())
    }

    /// Computes the bombs-around value of every cell by counting the bombs among its Moore
    /// neighbors. Cells holding a bomb keep no value of their own.
    fn update_bombs_around(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                let bombs_around = self
                    .neighbors_of(x, y)
                    .into_iter()
                    .filter(|&(nx, ny)| self.cells[self.index_of(nx, ny)].is_bomb())
                    .count() as u8;

                let index = self.index_of(x, y);
                self.cells[index].set_bombs_around(bombs_around);
            }
        }
    }

    /// Returns the field's width (the number of columns).
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Returns the field's height (the number of rows).
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Returns the total number of cells in the grid.
    pub fn cells_amount(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// Returns the number of bombs the field holds once populated.
    pub fn bomb_count(&self) -> u32 {
        self.bomb_count
    }

    /// Returns the number of cells that have to be revealed to clear the field, i.e. the
    /// number of cells not holding a bomb. The value is fixed at creation time.
    pub fn to_reveal(&self) -> u32 {
        self.cells_amount() - self.bomb_count
    }

    /// Checks whether the bombs have been placed already.
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    /// Returns a read-only cell reference by its position.
    ///
    /// Fails with [`GameError::OutOfBounds`] for positions outside the grid. Callers derive
    /// their coordinates from the grid dimensions, so hitting that error indicates a caller
    /// bug rather than a user-facing condition.
    pub fn cell_at(&self, x: u16, y: u16) -> Result<&Cell, GameError> {
        if x >= self.width || y >= self.height {
            return Err(GameError::OutOfBounds { x, y });
        }

        Ok(&self.cells[self.index_of(x, y)])
    }

    /// Returns a mutable cell reference by its position or [`None`] if the position lies
    /// outside the grid. Mutation stays within the crate; the public surface only ever hands
    /// out read-only cells.
    pub(crate) fn cell_at_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let index = self.index_of(x, y);
        Some(&mut self.cells[index])
    }

    /// Returns the positions of the up-to-8 Moore neighbors of the given position, clipped to
    /// the grid bounds.
    ///
    /// The order is fixed: row-major, top-left to bottom-right. Both the bombs-around
    /// computation and the reveal cascade iterate neighbors through this method, so the
    /// traversal order of the whole engine is deterministic.
    pub fn neighbors_of(&self, x: u16, y: u16) -> Vec<(u16, u16)> {
        let (x, y) = (x as i32, y as i32);
        let mut neighbors = Vec::with_capacity(8);

        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }

                let (nx, ny) = (x + dx, y + dy);
                if (0..self.width as i32).contains(&nx) && (0..self.height as i32).contains(&ny) {
                    neighbors.push((nx as u16, ny as u16));
                }
            }
        }

        neighbors
    }

    /// Returns the total number of currently flagged cells in the field.
    ///
    /// A use case might be displaying the in-game statistics.
    pub fn flagged_count(&self) -> u32 {
        self.cells.iter().filter(|cell| cell.is_flagged()).count() as u32
    }

    /// Returns the total number of currently revealed cells in the field.
    pub fn revealed_count(&self) -> u32 {
        self.cells.iter().filter(|cell| cell.is_revealed()).count() as u32
    }

    /// Converts a position into its index in the row-major cell vector. The position must be
    /// within the grid bounds.
    fn index_of(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// The `Debug` implementation renders the whole board with the hidden cells disclosed.
impl Debug for Minefield {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                write!(f, "{:?}", self.cells[self.index_of(x, y)])?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}

/// The `Display` implementation renders the board in a real-game fashion, with a coordinate
/// ruler (the last digit of every x and y) around it.
impl Display for Minefield {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "  ")?;
        for x in 0..self.width {
            write!(f, "{}", x % 10)?;
        }
        writeln!(f)?;

        for y in 0..self.height {
            write!(f, "{:>2}", y % 10)?;
            for x in 0..self.width {
                write!(f, "{}", self.cells[self.index_of(x, y)])?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{GameError, Minefield};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn create_minefield_instance_correct_params() {
        let minefield = Minefield::new(3, 3, 3);
        assert!(minefield.is_ok());

        let minefield = minefield.unwrap();
        assert_eq!(minefield.width(), 3);
        assert_eq!(minefield.height(), 3);
        assert_eq!(minefield.bomb_count(), 3);
        assert_eq!(minefield.cells_amount(), 9);
        assert_eq!(minefield.to_reveal(), 6);
        assert!(!minefield.is_populated());
        assert!(minefield.cells.iter().all(|cell| !cell.is_bomb()));
    }

    #[test]
    fn create_minefield_fails_when_a_dimension_is_zero() {
        for (width, height) in [(0, 3), (3, 0), (0, 0)] {
            let minefield = Minefield::new(width, height, 1);
            assert!(minefield.is_err_and(|err| matches!(
                err,
                GameError::InvalidConfiguration { .. }
            )));
        }
    }

    #[test]
    fn create_minefield_fails_when_not_enough_bombs() {
        let minefield = Minefield::new(3, 3, 0);
        assert!(minefield.is_err_and(|err| err
            == GameError::InvalidConfiguration {
                width: 3,
                height: 3,
                bombs: 0
            }));
    }

    #[test]
    fn create_minefield_fails_when_too_many_bombs() {
        let minefield = Minefield::new(3, 3, 9);
        assert!(minefield.is_err_and(|err| err
            == GameError::InvalidConfiguration {
                width: 3,
                height: 3,
                bombs: 9
            }));
    }

    #[test]
    fn the_minefield_gets_exactly_the_requested_amount_of_bombs() {
        let mut minefield = Minefield::new(9, 9, 10).unwrap();
        let result = minefield.populate_with_rng(None, &mut StdRng::seed_from_u64(7));

        assert!(result.is_ok());
        assert!(minefield.is_populated());
        assert_eq!(
            minefield.bomb_count(),
            minefield.cells.iter().filter(|cell| cell.is_bomb()).count() as u32
        );
    }

    #[test]
    fn populate_never_mines_the_excluded_position() {
        for seed in 0..100 {
            let mut minefield = Minefield::new(3, 3, 3).unwrap();
            let result =
                minefield.populate_with_rng(Some((1, 1)), &mut StdRng::seed_from_u64(seed));

            assert!(result.is_ok());
            assert!(!minefield.cell_at(1, 1).unwrap().is_bomb());
            assert_eq!(
                minefield.cells.iter().filter(|cell| cell.is_bomb()).count(),
                3
            );
        }
    }

    #[test]
    fn the_same_seed_reproduces_the_same_layout() {
        let mut first = Minefield::new(9, 9, 10).unwrap();
        let mut second = Minefield::new(9, 9, 10).unwrap();

        first
            .populate_with_rng(Some((4, 4)), &mut StdRng::seed_from_u64(42))
            .unwrap();
        second
            .populate_with_rng(Some((4, 4)), &mut StdRng::seed_from_u64(42))
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn populate_fails_on_an_out_of_bounds_excluded_position() {
        let mut minefield = Minefield::new(3, 3, 3).unwrap();
        let result = minefield.populate(Some((5, 5)));

        assert!(result.is_err_and(|err| err == GameError::OutOfBounds { x: 5, y: 5 }));
        assert!(!minefield.is_populated());
    }

    #[test]
    fn populate_fails_when_bombs_are_already_placed() {
        let mut minefield = Minefield::new(3, 3, 3).unwrap();
        minefield.populate(None).unwrap();
        let result = minefield.populate(None);

        assert!(result.is_err_and(|err| err == GameError::BombsAlreadyPlaced));
    }

    // ##2
    // 23%
    // -11
    fn create_stub_minefield() -> Minefield {
        Minefield::with_bomb_positions(3, 3, &[(0, 0), (1, 0), (2, 1)]).unwrap()
    }

    #[test]
    fn with_bomb_positions_places_bombs_exactly_where_told() {
        let minefield = create_stub_minefield();

        assert!(minefield.is_populated());
        assert_eq!(minefield.bomb_count(), 3);
        assert!(minefield.cell_at(0, 0).unwrap().is_bomb());
        assert!(minefield.cell_at(1, 0).unwrap().is_bomb());
        assert!(minefield.cell_at(2, 1).unwrap().is_bomb());
        assert_eq!(
            minefield.cells.iter().filter(|cell| cell.is_bomb()).count(),
            3
        );
    }

    #[test]
    fn bombs_around_values_get_computed_correctly() {
        let minefield = create_stub_minefield();

        let result = minefield
            .cells
            .iter()
            .map(|cell| cell.bombs_around())
            .collect::<Vec<Option<u8>>>();

        assert_eq!(
            result,
            [
                None,
                None,
                Some(2),
                Some(2),
                Some(3),
                None,
                Some(0),
                Some(1),
                Some(1)
            ]
        );
    }

    #[test]
    fn with_bomb_positions_accepts_an_empty_bomb_list() {
        let minefield = Minefield::with_bomb_positions(2, 2, &[]).unwrap();

        assert!(minefield.is_populated());
        assert_eq!(minefield.bomb_count(), 0);
        assert_eq!(minefield.to_reveal(), 4);
        assert!(minefield
            .cells
            .iter()
            .all(|cell| cell.bombs_around() == Some(0)));
    }

    #[test]
    fn with_bomb_positions_collapses_duplicate_positions() {
        let minefield = Minefield::with_bomb_positions(3, 3, &[(0, 0), (0, 0), (1, 1)]).unwrap();

        assert_eq!(minefield.bomb_count(), 2);
    }

    #[test]
    fn with_bomb_positions_fails_on_an_out_of_bounds_position() {
        let minefield = Minefield::with_bomb_positions(3, 3, &[(0, 0), (3, 1)]);

        assert!(minefield.is_err_and(|err| err == GameError::OutOfBounds { x: 3, y: 1 }));
    }

    #[test]
    fn with_bomb_positions_fails_when_the_whole_grid_would_be_bombs() {
        let minefield =
            Minefield::with_bomb_positions(2, 2, &[(0, 0), (1, 0), (0, 1), (1, 1)]);

        assert!(minefield.is_err_and(|err| matches!(
            err,
            GameError::InvalidConfiguration { .. }
        )));
    }

    #[test]
    fn cell_at_correctly_finds_the_cell_by_its_position() {
        let minefield = create_stub_minefield();
        let cell = minefield.cell_at(2, 1);

        assert!(cell.is_ok_and(|cell| cell.is_bomb()));
    }

    #[test]
    fn cell_at_fails_for_out_of_bounds_positions() {
        let minefield = Minefield::new(3, 3, 3).unwrap();

        assert!(minefield
            .cell_at(10, 10)
            .is_err_and(|err| err == GameError::OutOfBounds { x: 10, y: 10 }));
        assert!(minefield
            .cell_at(3, 0)
            .is_err_and(|err| err == GameError::OutOfBounds { x: 3, y: 0 }));
    }

    #[test]
    fn neighbors_of_returns_all_eight_neighbors_in_row_major_order() {
        let minefield = Minefield::new(3, 3, 3).unwrap();

        assert_eq!(
            minefield.neighbors_of(1, 1),
            vec![
                (0, 0),
                (1, 0),
                (2, 0),
                (0, 1),
                (2, 1),
                (0, 2),
                (1, 2),
                (2, 2)
            ]
        );
    }

    #[test]
    fn neighbors_of_clips_to_the_grid_bounds() {
        let minefield = Minefield::new(3, 3, 3).unwrap();

        assert_eq!(minefield.neighbors_of(0, 0), vec![(1, 0), (0, 1), (1, 1)]);
        assert_eq!(minefield.neighbors_of(2, 2), vec![(1, 1), (2, 1), (1, 2)]);
        assert_eq!(
            minefield.neighbors_of(1, 0),
            vec![(0, 0), (2, 0), (0, 1), (1, 1), (2, 1)]
        );
    }

    #[test]
    fn neighbors_of_never_includes_the_position_itself() {
        let minefield = Minefield::new(4, 3, 3).unwrap();

        for y in 0..3 {
            for x in 0..4 {
                let neighbors = minefield.neighbors_of(x, y);

                assert!(!neighbors.contains(&(x, y)));
                assert!(neighbors.len() <= 8);
            }
        }
    }

    #[test]
    fn flagged_count_returns_the_correct_amount_of_flagged_cells() {
        let mut minefield = Minefield::new(3, 3, 3).unwrap();

        minefield.cell_at_mut(0, 0).unwrap().toggle_flag();
        minefield.cell_at_mut(1, 0).unwrap().toggle_flag();
        minefield.cell_at_mut(2, 2).unwrap().toggle_flag();

        assert_eq!(minefield.flagged_count(), 3);
    }

    #[test]
    fn revealed_count_returns_the_correct_amount_of_revealed_cells() {
        let mut minefield = create_stub_minefield();
        assert_eq!(minefield.revealed_count(), 0);

        minefield.cell_at_mut(0, 2).unwrap().reveal();
        minefield.cell_at_mut(1, 2).unwrap().reveal();

        assert_eq!(minefield.revealed_count(), 2);
    }
}
