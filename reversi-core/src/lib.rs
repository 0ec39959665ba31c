mod board;
mod coord;
mod game;
mod opening;

pub use board::*;
pub use coord::*;
pub use game::*;
pub use opening::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, fixed_map::Key)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RevPlayer {
    One,
    Two,
    Three,
    Four,
}

impl RevPlayer {
    pub const ALL: [RevPlayer; 4] = [
        RevPlayer::One,
        RevPlayer::Two,
        RevPlayer::Three,
        RevPlayer::Four,
    ];

    pub fn index(&self) -> usize {
        match self {
            RevPlayer::One => 0,
            RevPlayer::Two => 1,
            RevPlayer::Three => 2,
            RevPlayer::Four => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The next player in seating order among the first `player_count`
    /// players. `player_count` must be in `1..=4`.
    pub fn successor(&self, player_count: usize) -> Self {
        let index = (self.index() + 1) % player_count;
        Self::from_index(index).expect("successor index should be below the player count")
    }

    /// The players taking part in a game with `player_count` seats.
    pub fn participants(player_count: usize) -> impl Iterator<Item = RevPlayer> {
        Self::ALL.into_iter().take(player_count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RevGameState {
    Ongoing,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RevInvalidSettingsError {
    InvalidPlayerCount,
    InvalidSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RevInvalidCellError {
    InvalidPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RevInvalidMoveError {
    NotAllowed,
    InvalidPosition,
    PositionOccupied,
    NoCaptures,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RevInvalidUndoError {
    NothingToUndo,
    InvalidIndex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RevInvalidOpeningError {
    NotAllowed,
    InvalidPosition,
    InvalidPlayer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successor_wraps_within_player_count() {
        assert_eq!(RevPlayer::One.successor(2), RevPlayer::Two);
        assert_eq!(RevPlayer::Two.successor(2), RevPlayer::One);
        assert_eq!(RevPlayer::Three.successor(4), RevPlayer::Four);
        assert_eq!(RevPlayer::Four.successor(4), RevPlayer::One);
    }

    #[test]
    fn test_participants() {
        let players: Vec<_> = RevPlayer::participants(3).collect();
        assert_eq!(
            players,
            vec![RevPlayer::One, RevPlayer::Two, RevPlayer::Three]
        );
    }

    #[test]
    fn test_index_roundtrip() {
        for player in RevPlayer::ALL {
            assert_eq!(RevPlayer::from_index(player.index()), Some(player));
        }
        assert_eq!(RevPlayer::from_index(4), None);
    }
}
