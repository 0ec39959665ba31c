use crate::{
    RevBoard, RevCoord, RevGameState, RevInvalidMoveError, RevInvalidSettingsError,
    RevInvalidUndoError, RevPlayer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RevGameSettings {
    pub width: usize,
    pub height: usize,
    pub player_count: usize,
}

impl RevGameSettings {
    pub fn new(width: usize, height: usize, player_count: usize) -> Self {
        RevGameSettings {
            width,
            height,
            player_count,
        }
    }
}

/// Everything the presentation layer needs after a successfully applied
/// move: the cells that changed owner (the captured runs plus the placed
/// tile), who moved, who moves next, and whether the naive successor was
/// passed over.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RevMoveResult {
    pub updates: Vec<RevCoord>,
    pub mover: RevPlayer,
    pub next_player: Option<RevPlayer>,
    pub skipped: bool,
}

impl RevMoveResult {
    pub fn is_done(&self) -> bool {
        self.next_player.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RevSnapshot {
    turn: RevPlayer,
    board: RevBoard,
}

/// One in-progress game: the board, the player to move, and the move
/// history. The turn pointer is `None` once no player has a legal move
/// left. History holds a snapshot of `(turn, board)` taken immediately
/// before each applied move, so undoing move `n` restores exactly the
/// state move `n` was played from.
#[derive(Debug, Clone, PartialEq)]
pub struct RevGame {
    pub settings: RevGameSettings,
    pub board: RevBoard,
    turn: Option<RevPlayer>,
    history: Vec<RevSnapshot>,
}

impl RevGame {
    /// Creates a game with an all-empty board; seeding the opening
    /// position is the caller's job, done through `RevBoard::try_set_owner`
    /// (or a `RevOpening`) before the first move.
    pub fn new(settings: RevGameSettings) -> Result<Self, RevInvalidSettingsError> {
        if !(2..=4).contains(&settings.player_count) {
            return Err(RevInvalidSettingsError::InvalidPlayerCount);
        }
        if settings.width < 1 || settings.height < 1 {
            return Err(RevInvalidSettingsError::InvalidSize);
        }
        Ok(RevGame {
            settings,
            board: RevBoard::new(settings.width, settings.height),
            turn: Some(RevPlayer::One),
            history: Vec::new(),
        })
    }

    pub fn current_player(&self) -> Option<RevPlayer> {
        self.turn
    }

    pub fn game_state(&self) -> RevGameState {
        match self.turn {
            Some(_) => RevGameState::Ongoing,
            None => RevGameState::Finished,
        }
    }

    pub fn players(&self) -> impl Iterator<Item = RevPlayer> {
        RevPlayer::participants(self.settings.player_count)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Applies a move for the current turn holder. The move is fully
    /// re-validated: a decided game rejects with `NotAllowed`, and the
    /// board rejects off-board, occupied, and capture-less placements.
    /// On success the pre-move state is pushed onto the history, the
    /// captured cells and the placed tile all flip to the mover, and the
    /// turn advances to the next player who can actually move.
    pub fn try_move(&mut self, pos: RevCoord) -> Result<RevMoveResult, RevInvalidMoveError> {
        let mover = self.turn.ok_or(RevInvalidMoveError::NotAllowed)?;
        self.board.can_place(pos, mover)?;

        self.history.push(RevSnapshot {
            turn: mover,
            board: self.board.clone(),
        });

        let mut updates = self.board.captures_for(pos, mover);
        updates.push(pos);
        for update in &updates {
            self.board.set_owner_unchecked(*update, Some(mover));
        }

        let next_player = self.advance_turn(mover);
        let skipped = next_player != Some(mover.successor(self.settings.player_count));
        Ok(RevMoveResult {
            updates,
            mover,
            next_player,
            skipped,
        })
    }

    /// Probes the players after `mover` in seating order, the mover
    /// itself last, and hands the turn to the first one with a legal
    /// move. When every probe fails the game is over and the turn
    /// pointer clears.
    fn advance_turn(&mut self, mover: RevPlayer) -> Option<RevPlayer> {
        let mut candidate = mover;
        for _ in 0..self.settings.player_count {
            candidate = candidate.successor(self.settings.player_count);
            if self.board.has_valid_moves(candidate) {
                self.turn = Some(candidate);
                return self.turn;
            }
        }
        self.turn = None;
        None
    }

    /// Restores the most recent history snapshot, discarding it.
    pub fn undo(&mut self) -> Result<(), RevInvalidUndoError> {
        match self.history.len() {
            0 => Err(RevInvalidUndoError::NothingToUndo),
            len => self.revert(len - 1),
        }
    }

    /// Restores the snapshot at `index` and truncates the history to
    /// `index` entries, discarding every later snapshot.
    pub fn revert(&mut self, index: usize) -> Result<(), RevInvalidUndoError> {
        if index >= self.history.len() {
            return Err(RevInvalidUndoError::InvalidIndex);
        }
        self.history.truncate(index + 1);
        let snapshot = self
            .history
            .pop()
            .expect("history entry at a checked index should exist");
        self.board = snapshot.board;
        self.turn = Some(snapshot.turn);
        Ok(())
    }

    /// Tile counts for every seated player, zero included.
    pub fn tile_counts(&self) -> fixed_map::Map<RevPlayer, usize> {
        let mut counts = fixed_map::Map::new();
        for player in self.players() {
            counts.insert(player, 0);
        }
        for (player, count) in self.board.count_tiles().iter() {
            if let Some(entry) = counts.get_mut(player) {
                *entry = *count;
            }
        }
        counts
    }

    pub fn valid_moves(&self, player: RevPlayer) -> Vec<RevCoord> {
        self.board.valid_moves(player)
    }

    /// Converts the game to notation: the board grid, the 1-based digit
    /// of the player to move (`-` once the game is over), and the player
    /// count, space-separated.
    pub fn to_notation(&self) -> String {
        let turn = match self.turn {
            Some(player) => ((b'1' + player.index() as u8) as char).to_string(),
            None => "-".to_string(),
        };
        format!(
            "{} {} {}",
            self.board.to_grid(),
            turn,
            self.settings.player_count
        )
    }

    /// Attempts to parse a game from notation. The restored game starts
    /// with an empty history, so nothing before the load point can be
    /// undone.
    pub fn try_from_notation(notation: &str) -> Option<Self> {
        let mut parts = notation.split_whitespace();
        let grid = parts.next()?;
        let turn_str = parts.next()?;
        let player_count = parts.next()?.parse::<usize>().ok()?;
        if !(2..=4).contains(&player_count) {
            return None;
        }
        let board = RevBoard::try_from_grid(grid)?;
        board.validate(player_count).ok()?;
        let turn = match turn_str {
            "-" => None,
            digit => {
                let value = digit.parse::<usize>().ok()?;
                let player = RevPlayer::from_index(value.checked_sub(1)?)?;
                if player.index() >= player_count {
                    return None;
                }
                Some(player)
            }
        };
        let settings = RevGameSettings::new(board.width, board.height, player_count);
        Some(RevGame {
            settings,
            board,
            turn,
            history: Vec::new(),
        })
    }

    /// Validates the game state.
    /// Discovers if the board, settings, and turn pointer disagree. The
    /// requirement that the player to move actually has a move is only
    /// audited once a move has been applied; before that, seeding is
    /// still in the caller's hands.
    pub fn validate(&self) -> Result<(), String> {
        self.board.validate(self.settings.player_count)?;
        if self.board.width != self.settings.width || self.board.height != self.settings.height {
            return Err(format!(
                "Board is {}x{} but settings say {}x{}",
                self.board.width, self.board.height, self.settings.width, self.settings.height
            ));
        }
        match self.turn {
            Some(player) => {
                if player.index() >= self.settings.player_count {
                    return Err(format!(
                        "Turn belongs to player {} but only {} players are seated",
                        player.index() + 1,
                        self.settings.player_count
                    ));
                }
                if !self.history.is_empty() && !self.board.has_valid_moves(player) {
                    return Err("Current player has no legal move".to_string());
                }
            }
            None => {
                for player in self.players() {
                    if self.board.has_valid_moves(player) {
                        return Err(format!(
                            "Game is over but player {} can still move",
                            player.index() + 1
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RevOpening;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn standard_game(player_count: usize) -> RevGame {
        let settings = RevGameSettings::new(8, 8, player_count);
        let mut game = RevGame::new(settings).unwrap();
        let opening = RevOpening::standard(&settings).unwrap();
        opening.apply(&mut game).unwrap();
        game
    }

    fn occupied_cells(game: &RevGame) -> usize {
        RevCoord::iter_board(game.board.width, game.board.height)
            .filter(|pos| game.board.try_get_owner(*pos).is_some())
            .count()
    }

    #[test]
    fn test_new_rejects_bad_settings() {
        assert_eq!(
            RevGame::new(RevGameSettings::new(8, 8, 1)),
            Err(RevInvalidSettingsError::InvalidPlayerCount)
        );
        assert_eq!(
            RevGame::new(RevGameSettings::new(8, 8, 5)),
            Err(RevInvalidSettingsError::InvalidPlayerCount)
        );
        assert_eq!(
            RevGame::new(RevGameSettings::new(0, 8, 2)),
            Err(RevInvalidSettingsError::InvalidSize)
        );
    }

    #[test]
    fn test_opening_move_captures_flanked_tile() {
        let mut game = standard_game(2);
        let result = game.try_move(RevCoord::new(2, 3)).unwrap();

        let mut updates = result.updates.clone();
        updates.sort_by_key(|pos| (pos.x, pos.y));
        assert_eq!(updates, vec![RevCoord::new(2, 3), RevCoord::new(3, 3)]);
        assert_eq!(result.mover, RevPlayer::One);
        assert_eq!(result.next_player, Some(RevPlayer::Two));
        assert!(!result.skipped);
        assert!(!result.is_done());

        for pos in updates {
            assert_eq!(game.board.try_get_owner(pos), Some(RevPlayer::One));
        }
        assert_eq!(game.current_player(), Some(RevPlayer::Two));
        assert_eq!(game.history_len(), 1);
    }

    #[test]
    fn test_rejected_moves_leave_state_untouched() {
        let mut game = standard_game(2);
        let before = game.clone();

        assert_eq!(
            game.try_move(RevCoord::new(3, 3)),
            Err(RevInvalidMoveError::PositionOccupied)
        );
        assert_eq!(
            game.try_move(RevCoord::new(0, 0)),
            Err(RevInvalidMoveError::NoCaptures)
        );
        assert_eq!(
            game.try_move(RevCoord::new(-1, 5)),
            Err(RevInvalidMoveError::InvalidPosition)
        );
        assert_eq!(game, before);
    }

    #[test]
    fn test_move_is_deterministic() {
        let mut game = standard_game(2);
        let mut twin = game.clone();
        let result = game.try_move(RevCoord::new(2, 3)).unwrap();
        let twin_result = twin.try_move(RevCoord::new(2, 3)).unwrap();
        assert_eq!(result, twin_result);
        assert_eq!(game, twin);
    }

    #[test]
    fn test_turn_skips_player_without_moves() {
        // After One plays (2,0), Two is stuck but One can still respond
        let mut game = RevGame::try_from_notation("1,2,x2,2,1 1 2").unwrap();
        let result = game.try_move(RevCoord::new(2, 0)).unwrap();
        assert_eq!(result.next_player, Some(RevPlayer::One));
        assert!(result.skipped);
        assert!(!result.is_done());
        assert_eq!(game.current_player(), Some(RevPlayer::One));
    }

    #[test]
    fn test_game_ends_when_no_player_can_move() {
        let mut game = RevGame::try_from_notation("1,2,x2 1 2").unwrap();
        let result = game.try_move(RevCoord::new(2, 0)).unwrap();
        assert!(result.is_done());
        assert_eq!(result.next_player, None);
        assert!(result.skipped);
        assert_eq!(game.current_player(), None);
        assert_eq!(game.game_state(), RevGameState::Finished);
        for player in game.players() {
            assert!(game.valid_moves(player).is_empty());
        }
        assert_eq!(
            game.try_move(RevCoord::new(3, 0)),
            Err(RevInvalidMoveError::NotAllowed)
        );
    }

    #[test]
    fn test_undo_restores_exact_pre_move_state() {
        let mut game = standard_game(2);
        let initial = game.clone();

        game.try_move(RevCoord::new(2, 3)).unwrap();
        let after_first = game.clone();
        let reply = game.valid_moves(RevPlayer::Two)[0];
        game.try_move(reply).unwrap();
        assert_eq!(game.history_len(), 2);

        game.undo().unwrap();
        assert_eq!(game.board, after_first.board);
        assert_eq!(game.current_player(), Some(RevPlayer::Two));
        assert_eq!(game.history_len(), 1);

        game.undo().unwrap();
        assert_eq!(game.board, initial.board);
        assert_eq!(game.current_player(), Some(RevPlayer::One));
        assert_eq!(game.history_len(), 0);

        assert_eq!(game.undo(), Err(RevInvalidUndoError::NothingToUndo));
    }

    #[test]
    fn test_undo_reopens_a_finished_game() {
        let mut game = RevGame::try_from_notation("1,2,x2 1 2").unwrap();
        game.try_move(RevCoord::new(2, 0)).unwrap();
        assert_eq!(game.game_state(), RevGameState::Finished);
        game.undo().unwrap();
        assert_eq!(game.game_state(), RevGameState::Ongoing);
        assert_eq!(game.current_player(), Some(RevPlayer::One));
        assert_eq!(game.to_notation(), "1,2,x2 1 2");
    }

    #[test]
    fn test_revert_truncates_history() {
        let mut game = standard_game(2);
        let initial = game.clone();
        for _ in 0..3 {
            let player = game.current_player().unwrap();
            let pos = game.valid_moves(player)[0];
            game.try_move(pos).unwrap();
        }
        assert_eq!(game.history_len(), 3);
        assert_eq!(game.revert(5), Err(RevInvalidUndoError::InvalidIndex));

        game.revert(0).unwrap();
        assert_eq!(game.board, initial.board);
        assert_eq!(game.current_player(), Some(RevPlayer::One));
        assert_eq!(game.history_len(), 0);
    }

    #[test]
    fn test_tile_counts_include_zero_for_seated_players() {
        let game = standard_game(3);
        let counts = game.tile_counts();
        let total: usize = counts.values().sum();
        assert_eq!(total, occupied_cells(&game));
        assert_eq!(counts.get(RevPlayer::Four), None);
        for player in game.players() {
            assert!(counts.get(player).is_some());
        }
    }

    #[test]
    fn test_notation_roundtrip() {
        let game = standard_game(2);
        let notation = game.to_notation();
        assert_eq!(notation, "x8/x8/x8/x3,1,2,x3/x3,2,1,x3/x8/x8/x8 1 2");
        let restored = RevGame::try_from_notation(&notation).unwrap();
        assert_eq!(restored.board, game.board);
        assert_eq!(restored.current_player(), game.current_player());
        assert_eq!(restored.history_len(), 0);
    }

    #[test]
    fn test_notation_rejects_garbage() {
        assert!(RevGame::try_from_notation("").is_none());
        assert!(RevGame::try_from_notation("x4/x4 1").is_none());
        assert!(RevGame::try_from_notation("x4/x4 1 7").is_none());
        assert!(RevGame::try_from_notation("x4/x4 3 2").is_none());
        assert!(RevGame::try_from_notation("1,3/x2 2 2").is_none());
    }

    fn random_playout(player_count: usize, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = standard_game(player_count);
        let initial = game.clone();
        let mut moves_made = 0;

        while let Some(player) = game.current_player() {
            let moves = game.valid_moves(player);
            assert!(!moves.is_empty(), "turn holder should always have a move");
            let pos = moves[rng.gen_range(0..moves.len())];
            let result = game.try_move(pos).unwrap();
            assert_eq!(result.mover, player);
            assert!(!result.updates.is_empty());
            for update in &result.updates {
                assert_eq!(game.board.try_get_owner(*update), Some(player));
            }
            let total: usize = game.tile_counts().values().sum();
            assert_eq!(total, occupied_cells(&game));
            game.validate().unwrap();
            moves_made += 1;
            assert!(moves_made <= 200, "playout should terminate");
        }

        for player in game.players() {
            assert!(game.valid_moves(player).is_empty());
        }
        assert_eq!(game.history_len(), moves_made);

        while game.undo().is_ok() {}
        assert_eq!(game.board, initial.board);
        assert_eq!(game.current_player(), Some(RevPlayer::One));
    }

    #[test]
    fn test_random_playouts_uphold_invariants() {
        for (player_count, seed) in [(2, 7), (2, 99), (3, 11), (4, 42)] {
            random_playout(player_count, seed);
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_move_result_serializes_to_json() {
        let mut game = standard_game(2);
        let result = game.try_move(RevCoord::new(2, 3)).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        let back: RevMoveResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
