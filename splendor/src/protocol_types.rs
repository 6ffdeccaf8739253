use serde::{Deserialize, Serialize};

use crate::{Card, GameState, Noble, Player, PlayerKey, Tokens};

/// What a player does on their turn.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Action {
    /// Buy a card from the board or from the player's own hand.
    Buy { card: Card },
    /// Reserve a card from the board, gaining one gold if the bank has any.
    Hold { card: Card },
    /// Take tokens from the bank.
    Take { tokens: Tokens },
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Buy { card } => write!(f, "buy {}", card),
            Action::Hold { card } => write!(f, "hold {}", card),
            Action::Take { tokens } => write!(f, "take {}", tokens),
        }
    }
}

/// What one player gets to see of the game.
///
/// A read-only projection of the [`GameState`]; deck order is hidden.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    /// The player this view was made for.
    pub me: PlayerKey,
    /// Visible board cards, rank 1 row first.
    pub cards: Vec<Card>,
    /// Cards left in the rank 1, 2 and 3 decks.
    pub deck_remaining: [usize; 3],
    pub nobles: Vec<Noble>,
    pub bank: Tokens,
    pub players: Vec<Player>,
}

impl PlayerView {
    pub fn player(&self) -> &Player {
        &self.players[self.me.0]
    }

    pub fn opponents(&self) -> impl Iterator<Item = &Player> {
        let me = self.me;
        self.players.iter().filter(move |p| p.key != me)
    }
}

impl GameState {
    pub fn view_for(&self, player: PlayerKey) -> PlayerView {
        PlayerView {
            me: player,
            cards: self.board.iter().flatten().copied().collect(),
            deck_remaining: self.deck_remaining(),
            nobles: self.nobles.clone(),
            bank: self.bank,
            players: self.players.clone(),
        }
    }
}
