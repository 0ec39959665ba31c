use crate::{RevCoord, RevDir, RevInvalidCellError, RevInvalidMoveError, RevPlayer};

/// Represents a rectangular Reversi board of `width` x `height` cells.
/// Each cell is either empty (`None`) or owned by one player. The board
/// provides the raw cell accessors used for opening seeding, the
/// 8-direction capture search, and the legality checks built on it; it
/// knows nothing about whose turn it is.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RevBoard {
    pub width: usize,
    pub height: usize,
    board: Vec<Option<RevPlayer>>,
}

impl RevBoard {
    /// Creates an empty board with the given dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        RevBoard {
            width,
            height,
            board: vec![None; width * height],
        }
    }

    /// Checks if a position lies on the board.
    pub fn in_board(&self, pos: RevCoord) -> bool {
        pos.is_valid(self.width, self.height)
    }

    /// Returns the owner of the cell at `pos`, or `None` if the cell is
    /// empty or the position is off the board.
    pub fn try_get_owner(&self, pos: RevCoord) -> Option<RevPlayer> {
        pos.try_get(&self.board, self.width, self.height)
            .and_then(|cell| *cell)
    }

    /// Returns the cell at `pos` without a bounds check.
    /// Panics if `pos` is off the board; callers check `in_board` first.
    pub fn owner_unchecked(&self, pos: RevCoord) -> Option<RevPlayer> {
        *pos.get(&self.board, self.width, self.height)
    }

    /// Overwrites the cell at `pos` without a bounds check.
    /// Panics if `pos` is off the board; callers check `in_board` first.
    pub fn set_owner_unchecked(&mut self, pos: RevCoord, owner: Option<RevPlayer>) {
        *pos.get_mut(&mut self.board, self.width, self.height) = owner;
    }

    /// Overwrites the cell at `pos`, rejecting off-board positions.
    /// Performs no rule checking beyond the bounds check; this is the
    /// mutator callers use to seed an opening position.
    pub fn try_set_owner(
        &mut self,
        pos: RevCoord,
        owner: Option<RevPlayer>,
    ) -> Result<(), RevInvalidCellError> {
        match pos.try_get_mut(&mut self.board, self.width, self.height) {
            Some(cell) => {
                *cell = owner;
                Ok(())
            }
            None => Err(RevInvalidCellError::InvalidPosition),
        }
    }

    /// Collects every cell that would be captured if `attacker` placed a
    /// tile at `start`. Each of the 8 compass directions is walked one
    /// cell at a time: the run so far is discarded when the walk leaves
    /// the board or reaches an empty cell, and kept when it reaches a
    /// cell `attacker` already owns. An attacker cell immediately next
    /// to `start` terminates the walk with nothing in between, so that
    /// direction contributes nothing. An off-board `start` captures
    /// nothing.
    pub fn captures_for(&self, start: RevCoord, attacker: RevPlayer) -> Vec<RevCoord> {
        let mut captures = Vec::new();
        if !self.in_board(start) {
            return captures;
        }
        for dir in RevDir::ALL {
            let mut run = Vec::new();
            let mut pos = start;
            loop {
                pos = pos.offset_dir(dir);
                match self.try_get_owner(pos) {
                    // Off the board or empty both end the walk empty-handed
                    None => {
                        run.clear();
                        break;
                    }
                    Some(owner) if owner == attacker => break,
                    Some(_) => run.push(pos),
                }
            }
            captures.append(&mut run);
        }
        captures
    }

    /// Checks if `attacker` may place a tile at `pos`: the position must
    /// be on the board, the cell empty, and at least one capture made.
    /// A move onto an occupied cell is rejected regardless of captures.
    pub fn can_place(&self, pos: RevCoord, attacker: RevPlayer) -> Result<(), RevInvalidMoveError> {
        match pos.try_get(&self.board, self.width, self.height) {
            None => Err(RevInvalidMoveError::InvalidPosition),
            Some(Some(_)) => Err(RevInvalidMoveError::PositionOccupied),
            Some(None) => {
                if self.captures_for(pos, attacker).is_empty() {
                    Err(RevInvalidMoveError::NoCaptures)
                } else {
                    Ok(())
                }
            }
        }
    }

    pub fn is_valid_move(&self, pos: RevCoord, attacker: RevPlayer) -> bool {
        self.can_place(pos, attacker).is_ok()
    }

    /// Every position where `attacker` currently has a legal move.
    pub fn valid_moves(&self, attacker: RevPlayer) -> Vec<RevCoord> {
        RevCoord::iter_board(self.width, self.height)
            .filter(|pos| self.is_valid_move(*pos, attacker))
            .collect()
    }

    /// Whether `attacker` has any legal move, stopping at the first hit.
    pub fn has_valid_moves(&self, attacker: RevPlayer) -> bool {
        RevCoord::iter_board(self.width, self.height)
            .any(|pos| self.is_valid_move(pos, attacker))
    }

    /// Counts the tiles each player owns in one scan of the board.
    /// Players without any tile on the board do not appear in the map.
    pub fn count_tiles(&self) -> fixed_map::Map<RevPlayer, usize> {
        let mut counts = fixed_map::Map::new();
        for owner in self.board.iter().flatten() {
            match counts.get_mut(*owner) {
                Some(count) => *count += 1,
                None => {
                    counts.insert(*owner, 1);
                }
            }
        }
        counts
    }

    /// Converts the board contents to grid notation: rows from the top
    /// of the board (`y = height - 1`) down, separated by `/`; cells
    /// within a row separated by `,`; a run of `k` empty cells written
    /// as `x` or `x<k>`; an owned cell written as the digit
    /// `player index + 1`.
    pub fn to_grid(&self) -> String {
        let mut grid = String::new();
        for y in (0..self.height).rev() {
            let mut empty_count = 0;
            for x in 0..self.width {
                let pos = RevCoord::new(x as i32, y as i32);
                match pos.get(&self.board, self.width, self.height) {
                    Some(owner) => {
                        match empty_count {
                            0 => {}
                            1 => grid.push_str("x,"),
                            _ => {
                                grid.push_str(format!("x{},", empty_count).as_str());
                            }
                        }
                        empty_count = 0;
                        grid.push((b'1' + owner.index() as u8) as char);
                        if x < self.width - 1 {
                            grid.push(',');
                        }
                    }
                    None => empty_count += 1,
                }
            }
            match empty_count {
                0 => {}
                1 => grid.push('x'),
                _ => {
                    grid.push_str(format!("x{}", empty_count).as_str());
                }
            }
            if y > 0 {
                grid.push('/');
            }
        }
        grid
    }

    /// Attempts to parse a board from grid notation. Returns `None` on
    /// ragged rows, unknown cell tokens, or an empty grid.
    pub fn try_from_grid(grid: &str) -> Option<Self> {
        let mut width = None;
        let mut height = 0;
        let mut board = Vec::new();
        for line in grid.split('/') {
            let mut x = 0;
            let mut row = Vec::new();
            for part in line.split(',') {
                if let Some(rest) = part.strip_prefix('x') {
                    let empty_count: usize = rest.parse().unwrap_or(1);
                    for _ in 0..empty_count {
                        row.push(None);
                    }
                    x += empty_count;
                } else {
                    let value: usize = part.parse().ok()?;
                    let owner = RevPlayer::from_index(value.checked_sub(1)?)?;
                    row.push(Some(owner));
                    x += 1;
                }
            }
            match width {
                None => width = Some(x),
                Some(w) => {
                    if w != x {
                        return None;
                    }
                }
            }
            height += 1;
            // Rows arrive top-first; reversing each row here and the whole
            // vector below leaves storage in bottom-first row order
            board.extend(row.into_iter().rev());
        }
        let width = width?;
        if width == 0 {
            return None;
        }
        board.reverse();
        if board.len() != width * height {
            return None;
        }
        Some(RevBoard {
            width,
            height,
            board,
        })
    }

    /// Validates the board state against the given player count.
    /// Discovers if the board storage is inconsistent or holds a tile
    /// for a player outside the game.
    pub fn validate(&self, player_count: usize) -> Result<(), String> {
        if self.width < 1 || self.height < 1 {
            return Err("Board dimensions must be at least 1".to_string());
        }
        if self.board.len() != self.width * self.height {
            return Err(format!(
                "Board size mismatch: expected {}, got {}",
                self.width * self.height,
                self.board.len()
            ));
        }
        for (index, owner) in self.board.iter().enumerate() {
            if let Some(player) = owner {
                if player.index() >= player_count {
                    return Err(format!(
                        "Cell {} is owned by player {} but only {} players are seated",
                        index,
                        player.index() + 1,
                        player_count
                    ));
                }
            }
        }
        Ok(())
    }
}
