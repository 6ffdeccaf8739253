use serde::{Deserialize, Serialize};

use crate::{Card, Gems, Tokens};

/// Most cards a player may hold at once.
pub const MAX_HELD_CARDS: usize = 3;

/// Most tokens (gold included) a player may keep at the end of a turn.
pub const MAX_TOKENS: u32 = 10;

/// Identifies a player. Always equal to the player's index in
/// [`GameState::players`](crate::GameState::players).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerKey(pub usize);

impl std::fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player {}", self.0)
    }
}

/// The state of a single player during one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub key: PlayerKey,
    /// Permanent discounts from bought cards. Never decreases.
    pub bonus: Gems,
    pub tokens: Tokens,
    /// Never decreases.
    pub score: u8,
    /// Reserved cards, at most [`MAX_HELD_CARDS`].
    pub held: Vec<Card>,
    /// Bought cards, all with status [`CardStatus::Consumed`](crate::CardStatus::Consumed).
    #[serde(default)]
    pub bought: Vec<Card>,
}

impl Player {
    pub fn new(key: PlayerKey) -> Self {
        Self {
            key,
            bonus: Gems::new(),
            tokens: Tokens::new(),
            score: 0,
            held: Vec::new(),
            bought: Vec::new(),
        }
    }

    pub fn gold(&self) -> u8 {
        self.tokens.gold
    }

    pub fn hand_is_full(&self) -> bool {
        self.held.len() >= MAX_HELD_CARDS
    }
}
