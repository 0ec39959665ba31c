use crate::{RevCoord, RevGame, RevGameSettings, RevInvalidOpeningError, RevPlayer};

/// A starting layout: the tiles placed on the empty board before the
/// first move. The engine has no canonical layout of its own — there is
/// no symmetric construction that works for every board size and player
/// count — so openings are plain data supplied by the caller.
/// `RevOpening::standard` offers the conventional central layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RevOpening {
    pub placements: Vec<(RevCoord, RevPlayer)>,
}

impl RevOpening {
    pub fn new(placements: Vec<(RevCoord, RevPlayer)>) -> Self {
        RevOpening { placements }
    }

    /// The conventional opening for the given settings, centered on the
    /// board: the diagonal two-player square, a 2x3 block for three
    /// players, and a four-color square for four. These are literal
    /// coordinate lists, not instances of a general rule. Returns `None`
    /// when the board is too small to center the layout or the player
    /// count is out of range.
    pub fn standard(settings: &RevGameSettings) -> Option<Self> {
        if settings.width < 2 || settings.height < 2 {
            return None;
        }
        let cx = (settings.width / 2 - 1) as i32;
        let cy = (settings.height / 2 - 1) as i32;
        let placements = match settings.player_count {
            2 => vec![
                (RevCoord::new(cx, cy), RevPlayer::Two),
                (RevCoord::new(cx + 1, cy + 1), RevPlayer::Two),
                (RevCoord::new(cx + 1, cy), RevPlayer::One),
                (RevCoord::new(cx, cy + 1), RevPlayer::One),
            ],
            3 => {
                if settings.height < 4 {
                    return None;
                }
                vec![
                    (RevCoord::new(cx, cy - 1), RevPlayer::One),
                    (RevCoord::new(cx + 1, cy - 1), RevPlayer::Two),
                    (RevCoord::new(cx, cy), RevPlayer::Three),
                    (RevCoord::new(cx + 1, cy), RevPlayer::One),
                    (RevCoord::new(cx, cy + 1), RevPlayer::Two),
                    (RevCoord::new(cx + 1, cy + 1), RevPlayer::Three),
                ]
            }
            4 => vec![
                (RevCoord::new(cx, cy), RevPlayer::One),
                (RevCoord::new(cx + 1, cy), RevPlayer::Two),
                (RevCoord::new(cx + 1, cy + 1), RevPlayer::Three),
                (RevCoord::new(cx, cy + 1), RevPlayer::Four),
            ],
            _ => return None,
        };
        Some(RevOpening::new(placements))
    }

    /// Seeds the opening onto a game that has not been played yet.
    /// Rejected once any move is in the history, for a placement outside
    /// the board, or for a player who is not seated in this game.
    pub fn apply(&self, game: &mut RevGame) -> Result<(), RevInvalidOpeningError> {
        if game.history_len() > 0 {
            return Err(RevInvalidOpeningError::NotAllowed);
        }
        for &(pos, player) in &self.placements {
            if player.index() >= game.settings.player_count {
                return Err(RevInvalidOpeningError::InvalidPlayer);
            }
            game.board
                .try_set_owner(pos, Some(player))
                .map_err(|_| RevInvalidOpeningError::InvalidPosition)?;
        }
        Ok(())
    }
}
