use std::fmt::{self, Display};
use std::sync::Arc;

use itertools::Itertools;

use crate::error::{Result, TttError};
use crate::game::common::{GameColor, GamePlayer, GameState, GameStatus};

pub const MIN_GRID_SIZE: usize = 3;
/// Both bitboards are `u128`, 11x11 = 121 cells is the largest odd grid that fits
pub const MAX_GRID_SIZE: usize = 11;

/// A cell of the grid. Players see it as a 1-based row-major "label".
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct TttMove {
    idx: u8,
}

impl TttMove {
    pub fn from_idx(idx: usize) -> Self {
        assert!(idx < MAX_GRID_SIZE * MAX_GRID_SIZE);
        Self { idx: idx as u8 }
    }

    pub fn to_idx(&self) -> usize {
        self.idx as usize
    }

    pub fn label(&self) -> usize {
        self.idx as usize + 1
    }
}

impl Display for TttMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug)]
pub struct TttBitboard {
    bitmap: u128,
}

impl TttBitboard {
    pub fn new() -> Self {
        Self { bitmap: 0 }
    }

    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut bitboard = Self::new();
        for idx in indices {
            bitboard.set(idx, true);
        }
        bitboard
    }

    pub fn get_raw(&self) -> u128 {
        self.bitmap
    }

    pub fn get(&self, idx: usize) -> bool {
        assert!(idx < MAX_GRID_SIZE * MAX_GRID_SIZE);
        (self.bitmap & (1u128 << idx)) != 0
    }

    pub fn set(&mut self, idx: usize, val: bool) {
        assert!(idx < MAX_GRID_SIZE * MAX_GRID_SIZE);
        if val {
            self.bitmap |= 1u128 << idx;
        } else {
            self.bitmap &= !(1u128 << idx);
        }
    }

    pub fn count(&self) -> usize {
        self.bitmap.count_ones() as usize
    }

    /// Number of cells set in both bitboards
    pub fn count_common(&self, other: &TttBitboard) -> usize {
        (self.bitmap & other.bitmap).count_ones() as usize
    }

    pub fn contains_all(&self, other: &TttBitboard) -> bool {
        (self.bitmap & other.bitmap) == other.bitmap
    }
}

/// Everything derived from the grid size alone. Built once per match and shared by all copies.
#[derive(Debug)]
pub struct GridLayout {
    grid_size: usize,
    /// Rows, then columns, then the main diagonal and the anti-diagonal
    lines: Vec<TttBitboard>,
    full: TttBitboard,
    score_matrix: Vec<Vec<u32>>,
}

impl GridLayout {
    pub fn new(grid_size: usize) -> Result<Self> {
        if grid_size % 2 == 0 || !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&grid_size) {
            return Err(TttError::MalformedConfiguration(grid_size));
        }
        let n = grid_size;

        let rows = (0..n).map(|r| TttBitboard::from_indices((0..n).map(|c| r * n + c)));
        let columns = (0..n).map(|c| TttBitboard::from_indices((0..n).map(|r| r * n + c)));
        let main_diagonal = TttBitboard::from_indices((0..n).map(|i| i * n + i));
        let anti_diagonal = TttBitboard::from_indices((0..n).map(|i| i * n + (n - 1 - i)));
        let lines = rows
            .chain(columns)
            .chain([main_diagonal, anti_diagonal])
            .collect_vec();

        Ok(Self {
            grid_size,
            lines,
            full: TttBitboard::from_indices(0..n * n),
            score_matrix: generate_score_matrix(n),
        })
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn lines(&self) -> &[TttBitboard] {
        &self.lines
    }

    /// The row, the column and, when the cell lies on them, the two main diagonals.
    /// No other diagonal is ever considered, even on grids larger than 3x3.
    pub fn lines_through(&self, r: usize, c: usize) -> impl Iterator<Item = &TttBitboard> {
        let n = self.grid_size;
        let mut through = vec![&self.lines[r], &self.lines[n + c]];
        if r == c {
            through.push(&self.lines[2 * n]);
        }
        if r + c == n - 1 {
            through.push(&self.lines[2 * n + 1]);
        }
        through.into_iter()
    }

    pub fn score_matrix(&self) -> &[Vec<u32>] {
        &self.score_matrix
    }
}

/// Base score 2 for every cell (one row, one column). A cell on the main diagonal or on the
/// anti-diagonal gets +1 for each, but only in the first, last and center rows.
fn generate_score_matrix(grid_size: usize) -> Vec<Vec<u32>> {
    let key_row = |r: usize| r == 0 || r == grid_size - 1 || r == grid_size / 2;
    (0..grid_size)
        .map(|r| {
            (0..grid_size)
                .map(|c| {
                    let mut score = 2;
                    if r == c && key_row(r) {
                        score += 1;
                    }
                    if r + c == grid_size - 1 && key_row(r) {
                        score += 1;
                    }
                    score
                })
                .collect_vec()
        })
        .collect_vec()
}

#[derive(Clone, Debug)]
pub struct TttGame {
    layout: Arc<GridLayout>,
    board_x: TttBitboard,
    board_o: TttBitboard,
    current_player: GameColor,
}

impl TttGame {
    pub fn new(grid_size: usize) -> Result<Self> {
        Ok(Self {
            layout: Arc::new(GridLayout::new(grid_size)?),
            board_x: TttBitboard::new(),
            board_o: TttBitboard::new(),
            current_player: GameColor::Player1,
        })
    }

    /// An independent game sharing the grid layout. Mutating the copy never affects `self`.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn grid_size(&self) -> usize {
        self.layout.grid_size
    }

    pub fn current_player(&self) -> GameColor {
        self.current_player
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn score_matrix(&self) -> &[Vec<u32>] {
        self.layout.score_matrix()
    }

    pub fn cells_num(&self) -> usize {
        self.grid_size() * self.grid_size()
    }

    pub fn move_from_label(&self, label: usize) -> Option<TttMove> {
        if (1..=self.cells_num()).contains(&label) {
            Some(TttMove::from_idx(label - 1))
        } else {
            None
        }
    }

    pub fn move_at(&self, r: usize, c: usize) -> TttMove {
        assert!(r < self.grid_size() && c < self.grid_size());
        TttMove::from_idx(r * self.grid_size() + c)
    }

    pub fn coords(&self, m: TttMove) -> (usize, usize) {
        (m.to_idx() / self.grid_size(), m.to_idx() % self.grid_size())
    }

    pub fn cell(&self, r: usize, c: usize) -> Option<GameColor> {
        assert!(r < self.grid_size() && c < self.grid_size());
        let idx = r * self.grid_size() + c;
        if self.board_x.get(idx) {
            return Some(GameColor::Player1);
        }
        if self.board_o.get(idx) {
            return Some(GameColor::Player2);
        }
        None
    }

    fn board(&self, player: GameColor) -> &TttBitboard {
        match player {
            GameColor::Player1 => &self.board_x,
            GameColor::Player2 => &self.board_o,
        }
    }

    fn claimed(&self) -> TttBitboard {
        TttBitboard {
            bitmap: self.board_x.get_raw() | self.board_o.get_raw(),
        }
    }

    pub fn claimed_count(&self) -> usize {
        self.claimed().count()
    }

    fn is_empty_cell(&self, m: TttMove) -> bool {
        m.to_idx() < self.cells_num() && !self.claimed().get(m.to_idx())
    }

    pub fn is_valid_move(&self, m: TttMove) -> bool {
        self.is_empty_cell(m)
    }

    /// All empty cells, ascending by label
    pub fn valid_moves(&self) -> Vec<TttMove> {
        let claimed = self.claimed();
        (0..self.cells_num())
            .filter(|idx| !claimed.get(*idx))
            .map(TttMove::from_idx)
            .collect_vec()
    }

    /// Claim the cell for `player` and hand the turn to the opponent.
    /// Returns false, without touching the game, if the cell is taken or outside the grid.
    pub fn apply_move(&mut self, m: TttMove, player: GameColor) -> bool {
        if !self.is_empty_cell(m) {
            return false;
        }
        match player {
            GameColor::Player1 => &mut self.board_x,
            GameColor::Player2 => &mut self.board_o,
        }
        .set(m.to_idx(), true);
        self.current_player = player.opposite();
        true
    }

    pub fn is_winner(&self, player: GameColor) -> bool {
        let board = self.board(player);
        self.layout.lines.iter().any(|line| board.contains_all(line))
    }

    pub fn is_draw(&self) -> bool {
        !self.is_winner(GameColor::Player1)
            && !self.is_winner(GameColor::Player2)
            && self.claimed() == self.layout.full
    }

    /// Whether some line through the cell would be completed, i.e. `owner` already holds the
    /// other N-1 cells of it while the cell itself is still empty.
    fn completes_line_of(&self, m: TttMove, owner: GameColor) -> bool {
        if !self.is_empty_cell(m) {
            return false;
        }
        let (r, c) = self.coords(m);
        let board = self.board(owner);
        self.layout
            .lines_through(r, c)
            .any(|line| board.count_common(line) == self.grid_size() - 1)
    }

    pub fn is_winning_move(&self, m: TttMove, player: GameColor) -> bool {
        self.completes_line_of(m, player)
    }

    pub fn is_blocking_move(&self, m: TttMove, player: GameColor) -> bool {
        self.completes_line_of(m, player.opposite())
    }

    pub fn score(&self, m: TttMove) -> u32 {
        let (r, c) = self.coords(m);
        self.layout.score_matrix[r][c]
    }

    pub fn status(&self) -> GameStatus {
        for player in [GameColor::Player1, GameColor::Player2] {
            if self.is_winner(player) {
                return GameStatus::Finished(Some(player));
            }
        }
        if self.claimed() == self.layout.full {
            return GameStatus::Finished(None);
        }
        GameStatus::Ongoing
    }

    pub fn state(&self) -> GameState {
        self.status().into()
    }

    /// Apply a move for the side to move, failing if the move is rejected
    pub fn play_single_turn(&mut self, next_move: TttMove) -> Result<()> {
        let mover = self.current_player;
        if !self.apply_move(next_move, mover) {
            return Err(TttError::InvalidMove(next_move.label()));
        }
        log::debug!("Player {} played {}", mover.symbol(), next_move);
        Ok(())
    }

    pub fn play_until_over(
        &mut self,
        player_x: &mut dyn GamePlayer,
        player_o: &mut dyn GamePlayer,
    ) -> Result<GameState> {
        self.play_until_over_with_callback(player_x, player_o, &mut |_game: &TttGame, _m: TttMove| {})
    }

    /// Run the match to its end. `on_move` sees the game after every accepted move.
    pub fn play_until_over_with_callback(
        &mut self,
        player_x: &mut dyn GamePlayer,
        player_o: &mut dyn GamePlayer,
        on_move: &mut dyn FnMut(&TttGame, TttMove),
    ) -> Result<GameState> {
        while self.status().is_ongoing() {
            let mover = self.current_player;
            let player: &mut dyn GamePlayer = match mover {
                GameColor::Player1 => &mut *player_x,
                GameColor::Player2 => &mut *player_o,
            };
            let next_move = player.next_move(self).ok_or(TttError::Aborted(mover))?;
            self.play_single_turn(next_move)?;
            on_move(self, next_move);
        }

        let state = self.state();
        match state {
            GameState::Won(winner) => log::debug!("{} wins!", winner.symbol()),
            _ => log::debug!("Draw!"),
        }
        Ok(state)
    }
}

impl Display for TttGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.grid_size();
        let rows = (0..n)
            .map(|r| {
                (0..n)
                    .map(|c| match self.cell(r, c) {
                        None => format!("{:3}", r * n + c + 1),
                        Some(color) => format!("{:^3}", color.symbol()),
                    })
                    .join(" | ")
            })
            .collect_vec();
        let separator = "-".repeat(6 * n - 3);
        write!(f, "{}", rows.join(&format!("\n{}\n", separator)))
    }
}
