use crate::{Card, Color, Noble, PlayerKey, Tokens};

/// Why a token request was refused by [`check_take`](crate::check_take).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TakeViolation {
    GoldRequested,
    NotInBank { color: Color, requested: u8, available: u8 },
    MoreThanThree { total: u32 },
    PairNotIsolated { color: Color },
}

impl std::error::Error for TakeViolation {}

impl std::fmt::Display for TakeViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TakeViolation::GoldRequested => write!(f, "Gold can only be gained by holding a card"),
            TakeViolation::NotInBank {
                color,
                requested,
                available,
            } => write!(
                f,
                "Requested {} {} but the bank only has {}",
                requested, color, available
            ),
            TakeViolation::MoreThanThree { total } => {
                write!(f, "Requested {} tokens, at most 3 may be taken", total)
            }
            TakeViolation::PairNotIsolated { color } => write!(
                f,
                "Two {} tokens may only be taken on their own",
                color
            ),
        }
    }
}

/// The error type for a single action that breaks the rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IllegalAction {
    CannotAfford {
        card: Card,
        shortfall: u32,
        gold: u8,
    },
    /// The card to buy is neither on the board nor in the acting player's hand.
    CardNotAvailable { card: Card },
    CardNotHoldable { card: Card },
    HandFull { card: Card },
    IllegalTake {
        requested: Tokens,
        violation: TakeViolation,
    },
    IllegalDrop { dropped: Tokens, held: Tokens },
    CannotTakeNoble { noble: Noble },
}

impl IllegalAction {
    /// The kind of action that was refused.
    pub fn action_kind(&self) -> &'static str {
        match self {
            IllegalAction::CannotAfford { .. } | IllegalAction::CardNotAvailable { .. } => "buy",
            IllegalAction::CardNotHoldable { .. } | IllegalAction::HandFull { .. } => "hold",
            IllegalAction::IllegalTake { .. } => "take",
            IllegalAction::IllegalDrop { .. } => "drop",
            IllegalAction::CannotTakeNoble { .. } => "pick noble",
        }
    }
}

impl std::error::Error for IllegalAction {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IllegalAction::IllegalTake { violation, .. } => Some(violation),
            _ => None,
        }
    }
}

impl std::fmt::Display for IllegalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ", self.action_kind())?;
        match self {
            IllegalAction::CannotAfford {
                card,
                shortfall,
                gold,
            } => write!(
                f,
                "can't afford card {}, short by {} with only {} gold",
                card, shortfall, gold
            ),
            IllegalAction::CardNotAvailable { card } => {
                write!(f, "card {} is not on the board or in the player's hand", card)
            }
            IllegalAction::CardNotHoldable { card } => {
                write!(f, "can't hold card {}, it is not on the board", card)
            }
            IllegalAction::HandFull { card } => write!(
                f,
                "can't hold card {}, already holding {} cards",
                card,
                crate::MAX_HELD_CARDS
            ),
            IllegalAction::IllegalTake { requested, .. } => {
                write!(f, "trying to take {}", requested)
            }
            IllegalAction::IllegalDrop { dropped, held } => {
                write!(f, "trying to drop {} while holding {}", dropped, held)
            }
            IllegalAction::CannotTakeNoble { noble } => {
                write!(f, "bonuses don't meet the requirement of {}", noble)
            }
        }
    }
}

/// A player kept more than [`MAX_TOKENS`](crate::MAX_TOKENS) tokens after being asked to drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLimitExceeded {
    pub player: PlayerKey,
    pub total: u32,
}

impl std::error::Error for TokenLimitExceeded {}

impl std::fmt::Display for TokenLimitExceeded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} still holds {} tokens after dropping, at most {} are allowed",
            self.player,
            self.total,
            crate::MAX_TOKENS
        )
    }
}
