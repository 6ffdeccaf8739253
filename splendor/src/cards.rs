use serde::{Deserialize, Serialize};

use crate::{Color, Gems};

/// The cost tier of a [card](Card). Each rank has its own deck and board row.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Rank {
    One = 1,
    Two = 2,
    Three = 3,
}

pub const RANKS: [Rank; 3] = [Rank::One, Rank::Two, Rank::Three];

impl Rank {
    /// Position of this rank's row in per-rank arrays.
    pub fn index(self) -> usize {
        self as usize - 1
    }
}

impl TryFrom<u8> for Rank {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Rank::One),
            2 => Ok(Rank::Two),
            3 => Ok(Rank::Three),
            _ => Err(format!("card rank must be 1, 2 or 3, got {}", value)),
        }
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> u8 {
        rank as u8
    }
}

/// Identifies a card by its position in the [`Catalog`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardKey(pub u16);

/// Where a card currently is. Bought cards are consumed and kept in
/// [`Player::bought`](crate::Player::bought).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    Deck,
    Board,
    Held,
    Consumed,
}

/// A development card.
///
/// Everything except `status` is fixed by the catalog.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub key: CardKey,
    pub rank: Rank,
    pub cost: Gems,
    pub provides: Color,
    pub points: u8,
    pub status: CardStatus,
}

impl Card {
    #[must_use]
    pub fn with_status(self, status: CardStatus) -> Self {
        Self { status, ..self }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} (rank {}, {} pts, gives {})",
            self.key.0, self.rank as u8, self.points, self.provides
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NobleKey(pub u16);

/// A noble tile. Its requirement is checked against bonuses, never paid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Noble {
    pub key: NobleKey,
    pub requires: Gems,
    pub points: u8,
}

impl std::fmt::Display for Noble {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "noble #{} ({} pts)", self.key.0, self.points)
    }
}

#[derive(Deserialize)]
struct CardEntry {
    rank: Rank,
    cost: Gems,
    provides: Color,
    points: u8,
}

#[derive(Deserialize)]
struct NobleEntry {
    requires: Gems,
    points: u8,
}

/// The error type for [`Catalog::from_json()`].
#[derive(Debug)]
pub enum CatalogError {
    Cards(serde_json::Error),
    Nobles(serde_json::Error),
    EmptyRank(Rank),
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Cards(err) | CatalogError::Nobles(err) => Some(err),
            CatalogError::EmptyRank(_) => None,
        }
    }
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Cards(_) => write!(f, "Could not parse the card table"),
            CatalogError::Nobles(_) => write!(f, "Could not parse the noble table"),
            CatalogError::EmptyRank(rank) => {
                write!(f, "The card table has no cards of rank {}", *rank as u8)
            }
        }
    }
}

static STANDARD_CARDS: &str = include_str!("../data/cards.json");
static STANDARD_NOBLES: &str = include_str!("../data/nobles.json");

/// The static card and noble tables a game is dealt from.
#[derive(Clone, Debug)]
pub struct Catalog {
    pub cards: Vec<Card>,
    pub nobles: Vec<Noble>,
}

impl Catalog {
    /// The 90 cards and 10 nobles of the standard game.
    pub fn standard() -> Result<Self, CatalogError> {
        Self::from_json(STANDARD_CARDS, STANDARD_NOBLES)
    }

    /// Parses card and noble tables. Keys are assigned by position.
    pub fn from_json(cards: &str, nobles: &str) -> Result<Self, CatalogError> {
        let card_entries: Vec<CardEntry> =
            serde_json::from_str(cards).map_err(CatalogError::Cards)?;
        let noble_entries: Vec<NobleEntry> =
            serde_json::from_str(nobles).map_err(CatalogError::Nobles)?;

        let cards: Vec<Card> = card_entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| Card {
                key: CardKey(i as u16),
                rank: entry.rank,
                cost: entry.cost,
                provides: entry.provides,
                points: entry.points,
                status: CardStatus::Deck,
            })
            .collect();
        for rank in crate::RANKS {
            if !cards.iter().any(|card| card.rank == rank) {
                return Err(CatalogError::EmptyRank(rank));
            }
        }

        let nobles = noble_entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| Noble {
                key: NobleKey(i as u16),
                requires: entry.requires,
                points: entry.points,
            })
            .collect();

        Ok(Self { cards, nobles })
    }

    pub fn cards_of_rank(&self, rank: Rank) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(move |card| card.rank == rank)
    }
}
