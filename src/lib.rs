pub mod minefield;

use log::debug;
use minefield::Minefield;
use std::collections::VecDeque;
use thiserror::Error;

/// The enum represents the variants of everything that can possibly go wrong during a game.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The requested field configuration can't produce a playable round: a dimension is zero,
    /// there are no bombs at all, or the bombs would leave no clear cell to reveal.
    #[error("invalid configuration: a {width}x{height} field can't hold {bombs} bomb(s)")]
    InvalidConfiguration {
        width: u16,
        height: u16,
        bombs: u32,
    },
    /// The requested position lies outside the field. Frontends derive their positions from
    /// the field dimensions, so running into this error indicates a frontend bug.
    #[error("the position ({x}, {y}) is outside the field")]
    OutOfBounds { x: u16, y: u16 },
    /// The round has already ended, and therefore the requested action could not be performed.
    #[error("the round has already ended")]
    GameAlreadyOver,
    /// The field has been populated with bombs before. Bombs are placed exactly once per
    /// round; a repeated placement would silently redistribute an ongoing round's bombs.
    #[error("the bombs have already been placed")]
    BombsAlreadyPlaced,
}

/// The outcome of a game round.
///
/// A round starts as `InProgress` and moves to exactly one of the two terminal outcomes. Once
/// the outcome is terminal, the round accepts no further reveal or flag actions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameOutcome {
    /// An ongoing round.
    InProgress,
    /// Every clear cell has been revealed without revealing a single bomb.
    Won,
    /// A bomb has been revealed.
    Lost,
}

impl GameOutcome {
    /// Checks whether the outcome is terminal, i.e. the round has ended either way.
    pub fn is_over(&self) -> bool {
        matches!(self, GameOutcome::Won | GameOutcome::Lost)
    }
}

/// What a frontend is allowed to know about a single cell.
///
/// The view never exposes an unrevealed, unflagged bomb while the round is in progress; once
/// the round is over, the remaining bombs come into view so the board can be disclosed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CellView {
    /// A hidden cell. Unrevealed bombs look exactly like this until the round ends.
    Hidden,
    /// A hidden cell carrying a flag. Flags keep showing after the round ends.
    Flagged,
    /// A revealed clear cell with the amount of bombs around it.
    Revealed(u8),
    /// A revealed bomb, or any unflagged bomb once the round is over.
    Bomb,
}

/// The struct representing a minesweeper round itself.
///
/// It owns the minefield and drives the reveal/flag interaction model over it: the flood-fill
/// disclosure of clear regions, the flag toggling, and the win/loss outcome. Bombs are placed
/// lazily on the round's first reveal, with the revealed position excluded, so the opening
/// move can never lose the round.
#[derive(Debug)]
pub struct Game {
    /// The minefield used in the round.
    minefield: Minefield,
    /// The number of cells revealed so far. Incremented exactly once per cell, the moment the
    /// cell transitions to revealed; there is no decrement path. The round is won the moment
    /// this reaches the minefield's to-reveal value.
    revealed_count: u32,
    /// The current outcome of the round.
    outcome: GameOutcome,
}

impl Game {
    /// Creates a new round with the provided field dimensions and bomb count.
    ///
    /// The configuration is validated here (see [`Minefield::new`]); the bombs themselves are
    /// placed on the first reveal.
    pub fn new(width: u16, height: u16, bomb_count: u32) -> Result<Self, GameError> {
        let minefield = Minefield::new(width, height, bomb_count)?;

        Ok(Game {
            minefield,
            revealed_count: 0,
            outcome: GameOutcome::InProgress,
        })
    }

    /// Creates a round over an existing minefield, typically one built with
    /// [`Minefield::with_bomb_positions`] for a known layout.
    ///
    /// The field is taken as-is: already-revealed cells count towards the reveal progress.
    /// The round is expected not to have been played to completion; the outcome starts as
    /// [`GameOutcome::InProgress`].
    pub fn from_minefield(minefield: Minefield) -> Self {
        let revealed_count = minefield.revealed_count();

        Game {
            minefield,
            revealed_count,
            outcome: GameOutcome::InProgress,
        }
    }

    /// Reveals the cell at the given position and returns the positions of all the cells that
    /// went from hidden to revealed during the call, in reveal order, so a frontend can redraw
    /// just those instead of the whole board.
    ///
    /// Revealing an already-revealed or flagged cell is an idempotent no-op (an empty vector
    /// comes back and bomb placement is not triggered). Otherwise the cell is revealed, and
    /// then exactly one of the following happens:
    ///
    /// - the cell holds a bomb: the round is lost on the spot, with no further disclosure;
    /// - it was the last clear cell: the round is won;
    /// - it has no bombs around it: the disclosure cascades, revealing the whole connected
    ///   region of zero-bombs-around cells plus the numbered cells bordering the region.
    ///
    /// The cascade runs on an explicit queue in a fixed row-major order rather than on the
    /// call stack, so its depth doesn't grow with the field size; each cell is revealed at
    /// most once, which bounds the whole walk by the grid area.
    ///
    /// The method fails with [`GameError::GameAlreadyOver`] when the round has ended and with
    /// [`GameError::OutOfBounds`] when the position lies outside the field.
    pub fn reveal(&mut self, x: u16, y: u16) -> Result<Vec<(u16, u16)>, GameError> {
        if self.outcome.is_over() {
            return Err(GameError::GameAlreadyOver);
        }

        let cell = self.minefield.cell_at(x, y)?;
        if cell.is_revealed() || cell.is_flagged() {
            return Ok(Vec::new());
        }

        // The first reveal of the round triggers bomb placement, with the revealed position
        // excluded so the opening move is always safe.
        if !self.minefield.is_populated() {
            self.minefield.populate(Some((x, y)))?;
        }

        let mut changed = Vec::new();
        let mut to_visit = VecDeque::from([(x, y)]);

        while let Some((cx, cy)) = to_visit.pop_front() {
            // A position can get queued twice by two adjacent zero-cells; the revealed check
            // skips it on the second visit.
            let Some(cell) = self.minefield.cell_at_mut(cx, cy) else {
                continue;
            };
            if cell.is_revealed() || cell.is_flagged() {
                continue;
            }

            cell.reveal();
            let is_bomb = cell.is_bomb();
            let bombs_around = cell.bombs_around();

            self.revealed_count += 1;
            changed.push((cx, cy));

            if is_bomb {
                self.outcome = GameOutcome::Lost;
                debug!("a bomb got revealed at ({cx}, {cy}), the round is lost");
                break;
            }

            if self.revealed_count == self.minefield.to_reveal() {
                self.outcome = GameOutcome::Won;
                debug!("all {} clear cells are revealed, the round is won", self.revealed_count);
                break;
            }

            if bombs_around == Some(0) {
                for (nx, ny) in self.minefield.neighbors_of(cx, cy) {
                    let neighbor = self.minefield.cell_at(nx, ny)?;
                    if !neighbor.is_revealed() && !neighbor.is_flagged() {
                        to_visit.push_back((nx, ny));
                    }
                }
            }
        }

        Ok(changed)
    }

    /// Toggles the flag on the cell at the given position.
    ///
    /// Returns whether anything changed: `true` when the flag got toggled, `false` when the
    /// cell is already revealed (revealed cells can't carry flags). Flagging is allowed
    /// before the first reveal, i.e. before the bombs are even placed. Flags have no win/loss
    /// effect.
    ///
    /// The method fails with [`GameError::GameAlreadyOver`] when the round has ended and with
    /// [`GameError::OutOfBounds`] when the position lies outside the field.
    pub fn flag(&mut self, x: u16, y: u16) -> Result<bool, GameError> {
        if self.outcome.is_over() {
            return Err(GameError::GameAlreadyOver);
        }

        let Some(cell) = self.minefield.cell_at_mut(x, y) else {
            return Err(GameError::OutOfBounds { x, y });
        };

        if cell.is_revealed() {
            return Ok(false);
        }

        cell.toggle_flag();
        Ok(true)
    }

    /// Returns what the frontend is allowed to know about the cell at the given position; see
    /// [`CellView`].
    ///
    /// The method fails with [`GameError::OutOfBounds`] when the position lies outside the
    /// field.
    pub fn cell_view(&self, x: u16, y: u16) -> Result<CellView, GameError> {
        let cell = self.minefield.cell_at(x, y)?;

        let view = if cell.is_flagged() {
            CellView::Flagged
        } else if cell.is_bomb() && (cell.is_revealed() || self.outcome.is_over()) {
            CellView::Bomb
        } else if cell.is_revealed() {
            CellView::Revealed(cell.bombs_around().unwrap_or(0))
        } else {
            CellView::Hidden
        };

        Ok(view)
    }

    /// Returns the current outcome of the round.
    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    /// Returns a read-only reference to the round's minefield.
    pub fn minefield(&self) -> &Minefield {
        &self.minefield
    }

    /// Returns the number of cells revealed so far.
    pub fn revealed_count(&self) -> u32 {
        self.revealed_count
    }
}

#[cfg(test)]
mod test {
    use super::{CellView, Game, GameError, GameOutcome, Minefield};

    // ##2
    // 23%
    // -11
    // ---
    fn create_stub_game() -> Game {
        let minefield = Minefield::with_bomb_positions(3, 4, &[(0, 0), (1, 0), (2, 1)]).unwrap();
        Game::from_minefield(minefield)
    }

    #[test]
    fn reveal_reveals_the_requested_cell() {
        let mut game = create_stub_game();
        let changed = game.reveal(2, 0).unwrap();

        assert_eq!(changed, vec![(2, 0)]);
        assert_eq!(game.revealed_count(), 1);
        assert_eq!(game.outcome(), GameOutcome::InProgress);
        assert!(game.minefield().cell_at(2, 0).unwrap().is_revealed());
    }

    #[test]
    fn reveal_is_idempotent_on_an_already_revealed_cell() {
        let mut game = create_stub_game();
        game.reveal(2, 0).unwrap();

        let changed = game.reveal(2, 0).unwrap();

        assert!(changed.is_empty());
        assert_eq!(game.revealed_count(), 1);
        assert_eq!(game.outcome(), GameOutcome::InProgress);
    }

    #[test]
    fn reveal_is_a_no_op_on_a_flagged_cell() {
        let mut game = create_stub_game();
        game.flag(2, 0).unwrap();

        let changed = game.reveal(2, 0).unwrap();

        assert!(changed.is_empty());
        assert_eq!(game.revealed_count(), 0);
        assert!(!game.minefield().cell_at(2, 0).unwrap().is_revealed());
    }

    #[test]
    fn reveal_cascades_from_a_cell_with_no_bombs_around() {
        let mut game = create_stub_game();
        let mut changed = game.reveal(0, 2).unwrap();
        changed.sort();

        // The connected zero region plus its numbered border.
        assert_eq!(
            changed,
            vec![
                (0, 1),
                (0, 2),
                (0, 3),
                (1, 1),
                (1, 2),
                (1, 3),
                (2, 2),
                (2, 3)
            ]
        );
        assert_eq!(game.revealed_count(), 8);
        assert_eq!(game.outcome(), GameOutcome::InProgress);
        assert!(!game.minefield().cell_at(2, 0).unwrap().is_revealed());
    }

    #[test]
    fn the_cascade_does_not_reveal_or_cross_a_flagged_cell() {
        let mut game = create_stub_game();
        game.flag(1, 3).unwrap();

        let changed = game.reveal(0, 2).unwrap();

        // The flag sits in the middle of the zero region and cuts the far corner off.
        assert_eq!(changed.len(), 5);
        assert_eq!(game.revealed_count(), 5);

        let flagged = game.minefield().cell_at(1, 3).unwrap();
        assert!(flagged.is_flagged());
        assert!(!flagged.is_revealed());
        assert!(!game.minefield().cell_at(2, 3).unwrap().is_revealed());
        assert!(!game.minefield().cell_at(2, 2).unwrap().is_revealed());
    }

    #[test]
    fn revealing_a_bomb_loses_the_round_with_a_single_change() {
        let mut game = create_stub_game();
        let changed = game.reveal(2, 1).unwrap();

        assert_eq!(changed, vec![(2, 1)]);
        assert_eq!(game.revealed_count(), 1);
        assert_eq!(game.outcome(), GameOutcome::Lost);
    }

    #[test]
    fn revealing_the_last_clear_cell_wins_the_round() {
        let minefield = Minefield::with_bomb_positions(2, 2, &[(0, 0), (1, 0), (0, 1)]).unwrap();
        let mut game = Game::from_minefield(minefield);

        let changed = game.reveal(1, 1).unwrap();

        assert_eq!(changed, vec![(1, 1)]);
        assert_eq!(game.outcome(), GameOutcome::Won);
        assert_eq!(game.revealed_count(), game.minefield().to_reveal());

        // With the round over, the untouched bombs come into view.
        assert_eq!(game.cell_view(0, 0).unwrap(), CellView::Bomb);
    }

    #[test]
    fn a_finished_round_rejects_further_actions() {
        let mut game = create_stub_game();
        game.reveal(2, 1).unwrap();
        assert_eq!(game.outcome(), GameOutcome::Lost);

        let reveal_result = game.reveal(0, 2);
        let flag_result = game.flag(0, 2);

        assert!(reveal_result.is_err_and(|err| err == GameError::GameAlreadyOver));
        assert!(flag_result.is_err_and(|err| err == GameError::GameAlreadyOver));
        assert_eq!(game.revealed_count(), 1);
        assert!(!game.minefield().cell_at(0, 2).unwrap().is_revealed());
    }

    #[test]
    fn flag_round_trips_on_the_same_cell() {
        let mut game = create_stub_game();

        assert_eq!(game.flag(0, 2), Ok(true));
        assert!(game.minefield().cell_at(0, 2).unwrap().is_flagged());

        assert_eq!(game.flag(0, 2), Ok(true));
        assert!(!game.minefield().cell_at(0, 2).unwrap().is_flagged());
    }

    #[test]
    fn flagging_a_revealed_cell_is_a_no_op() {
        let mut game = create_stub_game();
        game.reveal(2, 0).unwrap();

        assert_eq!(game.flag(2, 0), Ok(false));
        assert!(!game.minefield().cell_at(2, 0).unwrap().is_flagged());
    }

    #[test]
    fn reveal_and_flag_fail_outside_the_field() {
        let mut game = create_stub_game();

        assert!(game
            .reveal(5, 5)
            .is_err_and(|err| err == GameError::OutOfBounds { x: 5, y: 5 }));
        assert!(game
            .flag(5, 5)
            .is_err_and(|err| err == GameError::OutOfBounds { x: 5, y: 5 }));
    }

    #[test]
    fn the_cascade_terminates_on_a_board_with_no_bombs_at_all() {
        let minefield = Minefield::with_bomb_positions(5, 5, &[]).unwrap();
        let mut game = Game::from_minefield(minefield);

        let changed = game.reveal(2, 2).unwrap();

        assert_eq!(changed.len(), 25);
        assert_eq!(game.revealed_count(), 25);
        assert_eq!(game.outcome(), GameOutcome::Won);
    }

    #[test]
    fn the_first_reveal_never_hits_a_bomb() {
        for _ in 0..20 {
            let mut game = Game::new(9, 9, 10).unwrap();
            let changed = game.reveal(4, 4).unwrap();

            assert!(game.minefield().is_populated());
            assert!(!game.minefield().cell_at(4, 4).unwrap().is_bomb());
            assert_ne!(game.outcome(), GameOutcome::Lost);
            assert_eq!(changed.first(), Some(&(4, 4)));
        }
    }

    #[test]
    fn flagging_before_the_first_reveal_does_not_place_bombs() {
        let mut game = Game::new(3, 3, 3).unwrap();

        assert_eq!(game.flag(0, 0), Ok(true));
        assert!(!game.minefield().is_populated());

        // Revealing the flagged cell is a no-op and must not fix the layout either.
        assert!(game.reveal(0, 0).unwrap().is_empty());
        assert!(!game.minefield().is_populated());

        game.reveal(1, 1).unwrap();
        assert!(game.minefield().is_populated());
    }

    #[test]
    fn cell_view_hides_unrevealed_bombs_while_the_round_runs() {
        let mut game = create_stub_game();

        assert_eq!(game.cell_view(2, 1).unwrap(), CellView::Hidden);
        assert_eq!(game.cell_view(0, 2).unwrap(), CellView::Hidden);

        game.reveal(2, 0).unwrap();
        assert_eq!(game.cell_view(2, 0).unwrap(), CellView::Revealed(2));

        game.flag(0, 0).unwrap();
        assert_eq!(game.cell_view(0, 0).unwrap(), CellView::Flagged);
    }

    #[test]
    fn cell_view_exposes_bombs_once_the_round_is_over() {
        let mut game = create_stub_game();
        game.flag(0, 0).unwrap();
        game.reveal(2, 1).unwrap();
        assert_eq!(game.outcome(), GameOutcome::Lost);

        // The revealed bomb and the missed one show up, the flag stays, clear cells stay
        // hidden.
        assert_eq!(game.cell_view(2, 1).unwrap(), CellView::Bomb);
        assert_eq!(game.cell_view(1, 0).unwrap(), CellView::Bomb);
        assert_eq!(game.cell_view(0, 0).unwrap(), CellView::Flagged);
        assert_eq!(game.cell_view(0, 2).unwrap(), CellView::Hidden);
    }
}
