use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    Card, CardStatus, Catalog, Gems, Noble, Player, PlayerKey, Rank, Tokens, RANKS,
};

/// Visible cards per rank.
pub const BOARD_ROW_SIZE: usize = 4;

/// Score at which a player wins, checked at the end of every round.
pub const WINNING_SCORE: u8 = 15;

pub const MAX_PLAYERS: usize = 4;

/// Setup parameters that depend on the number of players.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GameSettings {
    pub players: usize,
    /// Tokens of each color in the bank at the start.
    pub tokens_per_color: u8,
    pub gold: u8,
    pub nobles: usize,
}

impl GameSettings {
    /// Returns `None` for zero or more than [`MAX_PLAYERS`] players.
    pub fn for_players(players: usize) -> Option<Self> {
        let tokens_per_color = match players {
            1 | 2 => 4,
            3 => 5,
            4 => 7,
            _ => return None,
        };
        Some(Self {
            players,
            tokens_per_color,
            gold: 5,
            nobles: players + 1,
        })
    }
}

/// The authoritative state of one game. Owned by the judge.
///
/// Invariants:
/// - `board[r].len() == min(BOARD_ROW_SIZE, board[r].len() + decks[r].len())`, i.e. a row
///   is only short when its deck is exhausted.
/// - `players[i].key == PlayerKey(i)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Visible cards, indexed by [`Rank::index()`].
    pub board: [Vec<Card>; 3],
    /// Remaining cards per rank. Cards are drawn from the end.
    pub decks: [Vec<Card>; 3],
    pub bank: Tokens,
    pub nobles: Vec<Noble>,
    pub players: Vec<Player>,
}

impl GameState {
    /// Shuffles the catalog and deals a fresh game.
    pub fn new<R: Rng>(catalog: &Catalog, settings: GameSettings, rng: &mut R) -> Self {
        let mut board: [Vec<Card>; 3] = Default::default();
        let mut decks: [Vec<Card>; 3] = Default::default();
        for rank in RANKS {
            let mut deck: Vec<Card> = catalog
                .cards_of_rank(rank)
                .map(|card| card.with_status(CardStatus::Deck))
                .collect();
            deck.shuffle(rng);
            let mut row = Vec::with_capacity(BOARD_ROW_SIZE);
            while row.len() < BOARD_ROW_SIZE {
                match deck.pop() {
                    Some(card) => row.push(card.with_status(CardStatus::Board)),
                    None => break,
                }
            }
            board[rank.index()] = row;
            decks[rank.index()] = deck;
        }

        let mut nobles = catalog.nobles.clone();
        nobles.shuffle(rng);
        nobles.truncate(settings.nobles);

        let bank = initial_bank(settings);

        let players = (0..settings.players)
            .map(|i| Player::new(PlayerKey(i)))
            .collect();

        Self {
            board,
            decks,
            bank,
            nobles,
            players,
        }
    }

    pub fn player(&self, key: PlayerKey) -> &Player {
        let player = &self.players[key.0];
        debug_assert_eq!(player.key, key);
        player
    }

    pub(crate) fn player_mut(&mut self, key: PlayerKey) -> &mut Player {
        let player = &mut self.players[key.0];
        debug_assert_eq!(player.key, key);
        player
    }

    pub fn row(&self, rank: Rank) -> &[Card] {
        &self.board[rank.index()]
    }

    pub fn deck_remaining(&self) -> [usize; 3] {
        [self.decks[0].len(), self.decks[1].len(), self.decks[2].len()]
    }

    /// Total tokens of each kind across the bank and every player, gold included.
    pub fn token_totals(&self) -> Tokens {
        let mut totals = self.bank;
        for player in &self.players {
            totals.deposit(&player.tokens);
        }
        totals
    }

    /// The player that has won, if any player reached [`WINNING_SCORE`].
    ///
    /// Highest score wins, ties go to the player with more bonuses, then to
    /// the earlier seat.
    pub fn winner(&self) -> Option<PlayerKey> {
        let mut best: Option<&Player> = None;
        for player in self.players.iter().filter(|p| p.score >= WINNING_SCORE) {
            let better = match best {
                None => true,
                Some(b) => {
                    (player.score, player.bonus.total()) > (b.score, b.bonus.total())
                }
            };
            if better {
                best = Some(player);
            }
        }
        best.map(|p| p.key)
    }
}

/// Bank contents at the start of a game, used to check token conservation.
pub fn initial_bank(settings: GameSettings) -> Tokens {
    Tokens {
        gems: Gems::splat(settings.tokens_per_color),
        gold: settings.gold,
    }
}
