//! Pure predicates deciding whether an action is legal. Nothing here mutates state.

use crate::{
    Action, Card, CardStatus, IllegalAction, Noble, Player, TakeViolation, Tokens, COLORS,
    MAX_TOKENS,
};

/// Most tokens that may be taken in one turn.
pub const MAX_TAKE: u32 = 3;

/// Tokens still missing after bonuses and colored tokens, i.e. the gold needed.
pub fn shortfall(player: &Player, card: &Card) -> u32 {
    COLORS
        .iter()
        .map(|&c| {
            let covered = u32::from(player.bonus[c]) + u32::from(player.tokens[c]);
            u32::from(card.cost[c]).saturating_sub(covered)
        })
        .sum()
}

pub fn can_afford(player: &Player, card: &Card) -> bool {
    shortfall(player, card) <= u32::from(player.gold())
}

/// What `player` pays for `card`: colored tokens first, gold for the rest.
///
/// Only meaningful if [`can_afford()`] holds.
pub fn payment(player: &Player, card: &Card) -> Tokens {
    let mut pay = Tokens::new();
    let mut short: u32 = 0;
    for color in COLORS {
        let due = card.cost[color].saturating_sub(player.bonus[color]);
        let from_tokens = due.min(player.tokens[color]);
        pay[color] = from_tokens;
        short += u32::from(due - from_tokens);
    }
    pay.gold = short.min(u32::from(u8::MAX)) as u8;
    pay
}

/// Only board cards can be held. The hand size is checked by [`validate_action()`].
pub fn can_hold(card: &Card) -> bool {
    card.status == CardStatus::Board
}

/// Checks a token request against the bank, naming the first rule it breaks.
pub fn check_take(bank: &Tokens, requested: &Tokens) -> Result<(), TakeViolation> {
    if requested.gold > 0 {
        return Err(TakeViolation::GoldRequested);
    }
    let mut pair = None;
    for color in COLORS {
        if requested[color] > bank[color] {
            return Err(TakeViolation::NotInBank {
                color,
                requested: requested[color],
                available: bank[color],
            });
        }
        if requested[color] >= 2 {
            pair = Some(color);
        }
    }
    let total = requested.total();
    if total > MAX_TAKE {
        return Err(TakeViolation::MoreThanThree { total });
    }
    match pair {
        Some(color) if total != 2 => Err(TakeViolation::PairNotIsolated { color }),
        _ => Ok(()),
    }
}

pub fn can_take_tokens(bank: &Tokens, requested: &Tokens) -> bool {
    check_take(bank, requested).is_ok()
}

pub fn should_drop_tokens(player: &Player) -> bool {
    player.tokens.total() > MAX_TOKENS
}

pub fn can_drop_tokens(player: &Player, drop: &Tokens) -> bool {
    player.tokens.gems.dominates(&drop.gems) && player.tokens.gold >= drop.gold
}

/// A noble needs every one of the five bonuses to meet its requirement.
pub fn can_take_noble(player: &Player, noble: &Noble) -> bool {
    player.bonus.dominates(&noble.requires)
}

/// The gate every action passes before the engine applies it.
///
/// Only the player and bank are checked here. Whether the card is really on
/// the board or in the hand, unaltered, is checked by the engine.
pub fn validate_action(
    player: &Player,
    bank: &Tokens,
    action: &Action,
) -> Result<(), IllegalAction> {
    match action {
        Action::Buy { card } => {
            if can_afford(player, card) {
                Ok(())
            } else {
                Err(IllegalAction::CannotAfford {
                    card: *card,
                    shortfall: shortfall(player, card),
                    gold: player.gold(),
                })
            }
        }
        Action::Hold { card } => {
            if !can_hold(card) {
                Err(IllegalAction::CardNotHoldable { card: *card })
            } else if player.hand_is_full() {
                Err(IllegalAction::HandFull { card: *card })
            } else {
                Ok(())
            }
        }
        Action::Take { tokens } => {
            check_take(bank, tokens).map_err(|violation| IllegalAction::IllegalTake {
                requested: *tokens,
                violation,
            })
        }
    }
}

pub fn validate_drop(player: &Player, drop: &Tokens) -> Result<(), IllegalAction> {
    if can_drop_tokens(player, drop) {
        Ok(())
    } else {
        Err(IllegalAction::IllegalDrop {
            dropped: *drop,
            held: player.tokens,
        })
    }
}

pub fn validate_noble(player: &Player, noble: &Noble) -> Result<(), IllegalAction> {
    if can_take_noble(player, noble) {
        Ok(())
    } else {
        Err(IllegalAction::CannotTakeNoble { noble: *noble })
    }
}
