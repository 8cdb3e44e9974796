use std::fmt::{Debug, Display, Formatter};

/// The cell's content.
///
/// A cell either holds a bomb or is clear of one.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum CellContent {
    /// Represents a clear cell. A clear cell is one that doesn't hold a bomb.
    ///
    /// The parameter is the amount of bombs in the cells around this one, in the 0..=8 range.
    Clear(u8),
    /// Represents a cell holding a bomb.
    Bomb,
}

/// The cell's state.
///
/// A cell is either hidden or revealed. While hidden, it can also either be or not be flagged.
/// Once revealed, a cell never goes back to hidden, and a revealed cell can't carry a flag.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum CellState {
    /// Represents a hidden cell.
    ///
    /// The boolean value indicates whether the cell is flagged (`true`) or not (`false`).
    Hidden(bool),
    /// Represents a revealed cell.
    Revealed,
}

/// The representation of a single cell of a minefield.
///
/// A cell is described with its content and its state. The grid owns the cell's coordinates;
/// the cell itself carries no positional data.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Cell {
    /// The cell's content is either of the `CellContent` enum.
    content: CellContent,
    /// The cell's state is either of the `CellState` enum.
    state: CellState,
}

impl Cell {
    /// Creates a new hidden un-flagged clear `Cell` instance.
    pub fn new() -> Self {
        Cell {
            content: CellContent::Clear(0),
            state: CellState::Hidden(false),
        }
    }

    /// Checks whether the cell holds a bomb.
    pub fn is_bomb(&self) -> bool {
        self.content == CellContent::Bomb
    }

    /// Puts a bomb into the cell.
    pub fn mark_bomb(&mut self) {
        self.content = CellContent::Bomb;
    }

    /// Returns the amount of bombs around the cell or `None` if the cell itself holds a bomb.
    pub fn bombs_around(&self) -> Option<u8> {
        if let CellContent::Clear(bombs_around) = self.content {
            Some(bombs_around)
        } else {
            None
        }
    }

    /// Sets the number representing the amount of bombs around the cell.
    ///
    /// Won't produce any effect if the cell itself holds a bomb.
    pub fn set_bombs_around(&mut self, bombs_around: u8) {
        if let CellContent::Clear(_) = self.content {
            self.content = CellContent::Clear(bombs_around);
        }
    }

    /// Checks whether the cell is revealed.
    pub fn is_revealed(&self) -> bool {
        self.state == CellState::Revealed
    }

    /// Reveals the cell.
    ///
    /// The transition is one-way: there is no path back to the hidden state. Callers are
    /// expected to check the flag first; revealing drops it.
    pub fn reveal(&mut self) {
        self.state = CellState::Revealed;
    }

    /// Checks whether the cell is flagged.
    pub fn is_flagged(&self) -> bool {
        if let CellState::Hidden(is_flagged) = self.state {
            is_flagged
        } else {
            false
        }
    }

    /// Toggles the flag of the cell.
    ///
    /// Won't produce any effect if the cell is already revealed.
    pub fn toggle_flag(&mut self) {
        if let CellState::Hidden(is_flagged) = self.state {
            self.state = CellState::Hidden(!is_flagged);
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::new()
    }
}

/// The `Debug` implementation displays the hidden cells as revealed. A flag still takes
/// precedence over the content.
impl Debug for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let CellState::Hidden(true) = self.state {
            return write!(f, "#");
        }

        match self.content {
            CellContent::Clear(0) => write!(f, "-"),
            CellContent::Clear(n) => write!(f, "{}", n),
            CellContent::Bomb => write!(f, "%"),
        }
    }
}

/// The `Display` implementation represents the cell in a real-game fashion.
impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.state {
            // In the real game, the cells don't reveal their inner state.
            CellState::Hidden(is_flagged) => {
                if is_flagged {
                    write!(f, "#")
                } else {
                    write!(f, ".")
                }
            }
            // The revealed case is covered by the `Debug` trait's implementation.
            _ => write!(f, "{:?}", self),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Cell;

    #[test]
    fn new_creates_a_hidden_unflagged_clear_cell() {
        let cell = Cell::new();

        assert!(!cell.is_bomb());
        assert!(!cell.is_revealed());
        assert!(!cell.is_flagged());
        assert_eq!(cell.bombs_around(), Some(0));
    }

    #[test]
    fn mark_bomb_turns_the_cell_into_a_bomb() {
        let mut cell = Cell::new();
        cell.mark_bomb();

        assert!(cell.is_bomb());
        assert!(cell.bombs_around().is_none());
    }

    #[test]
    fn set_bombs_around_stores_the_value_for_clear_cells() {
        let mut cell = Cell::new();
        cell.set_bombs_around(3);

        assert_eq!(cell.bombs_around(), Some(3));
    }

    #[test]
    fn set_bombs_around_has_no_effect_on_bomb_cells() {
        let mut cell = Cell::new();
        cell.mark_bomb();
        cell.set_bombs_around(3);

        assert!(cell.is_bomb());
        assert!(cell.bombs_around().is_none());
    }

    #[test]
    fn toggle_flag_round_trips_on_a_hidden_cell() {
        let mut cell = Cell::new();
        assert!(!cell.is_flagged());

        cell.toggle_flag();
        assert!(cell.is_flagged());

        cell.toggle_flag();
        assert!(!cell.is_flagged());
    }

    #[test]
    fn toggle_flag_has_no_effect_on_a_revealed_cell() {
        let mut cell = Cell::new();
        cell.reveal();

        cell.toggle_flag();
        assert!(cell.is_revealed());
        assert!(!cell.is_flagged());
    }

    #[test]
    fn reveal_drops_the_flag_and_never_reverts() {
        let mut cell = Cell::new();
        cell.toggle_flag();
        cell.reveal();

        assert!(cell.is_revealed());
        assert!(!cell.is_flagged());
    }
}
