//! Turns an [`Outlook`] and a candidate [`Play`] into a fixed-width vector of
//! values in `[0, 1]`.

use splendor::{Player, COLORS, MAX_HELD_CARDS};

use crate::{Outlook, Play, Sighting};

const BOARD_SLOTS: usize = 12;
const NOBLE_SLOTS: usize = 5;
const OPPONENT_SLOTS: usize = 3;

// Ceilings each raw quantity is divided by.
const BONUS_CEILING: f64 = 10.0;
const TOKEN_CEILING: f64 = 10.0;
const CARD_COST_CEILING: f64 = 20.0;
const BOARD_VALUE_CEILING: f64 = 30.0;
const NOBLE_VALUE_CEILING: f64 = 20.0;
const POINTS_CEILING: f64 = 10.0;
const NOBLE_CEILING: f64 = 3.0;
const DECK_CEILING: f64 = 40.0;
const SCORE_CEILING: f64 = 15.0;

/// `value / ceiling`, clamped to `[0, 1]`.
pub fn normalize(ceiling: f64, value: f64) -> f64 {
    (value / ceiling).clamp(0.0, 1.0)
}

/// Which features are encoded.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FeatureSet {
    /// Four values per card, no opponents.
    Basic,
    /// Six values per card (adds affordability and rank), plus opponent summaries.
    Extended,
}

#[derive(Copy, Clone, Debug)]
pub struct Encoder {
    set: FeatureSet,
}

impl Encoder {
    pub fn new(set: FeatureSet) -> Self {
        Self { set }
    }

    pub fn card_width(&self) -> usize {
        match self.set {
            FeatureSet::Basic => 4,
            FeatureSet::Extended => 6,
        }
    }

    fn opponent_width(&self) -> usize {
        match self.set {
            FeatureSet::Basic => 0,
            FeatureSet::Extended => 5 + 6 + 2,
        }
    }

    pub fn state_width(&self) -> usize {
        5 + 6
            + MAX_HELD_CARDS * self.card_width()
            + BOARD_SLOTS * self.card_width()
            + NOBLE_SLOTS
            + 3
            + 6
            + OPPONENT_SLOTS * self.opponent_width()
    }

    pub fn action_width(&self) -> usize {
        2 * self.card_width() + 6
    }

    pub fn input_width(&self) -> usize {
        self.state_width() + self.action_width()
    }

    pub fn encode_state(&self, outlook: &Outlook) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.state_width());
        let me = &outlook.me;

        for color in COLORS {
            out.push(normalize(BONUS_CEILING, f64::from(me.bonus[color])));
        }
        push_tokens(&mut out, &me.tokens);

        let held: Vec<Sighting> = outlook.held().collect();
        for slot in 0..MAX_HELD_CARDS {
            self.push_card(&mut out, outlook, held.get(slot));
        }
        for slot in 0..BOARD_SLOTS {
            self.push_card(&mut out, outlook, outlook.board.get(slot));
        }

        for slot in 0..NOBLE_SLOTS {
            let value = outlook.nobles.get(slot).map_or(0.0, |noble| {
                let deficit: u32 = COLORS
                    .iter()
                    .map(|&c| u32::from(noble.requires[c].saturating_sub(me.bonus[c])))
                    .sum();
                normalize(
                    NOBLE_CEILING,
                    f64::from(noble.points) / f64::from(deficit + 1),
                )
            });
            out.push(value);
        }

        for remaining in outlook.deck_remaining {
            out.push(normalize(DECK_CEILING, remaining as f64));
        }
        push_tokens(&mut out, &outlook.bank);

        if self.set == FeatureSet::Extended {
            for slot in 0..OPPONENT_SLOTS {
                match outlook.others.get(slot) {
                    Some(player) => push_opponent(&mut out, player),
                    None => out.extend(std::iter::repeat(0.0).take(self.opponent_width())),
                }
            }
        }

        debug_assert_eq!(out.len(), self.state_width());
        out
    }

    pub fn encode_play(&self, outlook: &Outlook, play: &Play) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.action_width());
        let bought = match play {
            Play::Buy(sighting) => Some(sighting),
            _ => None,
        };
        self.push_card(&mut out, outlook, bought);
        let held = match play {
            Play::Hold(sighting) => Some(sighting),
            _ => None,
        };
        self.push_card(&mut out, outlook, held);
        match play {
            Play::Take(tokens) => push_tokens(&mut out, tokens),
            _ => out.extend([0.0; 6]),
        }
        debug_assert_eq!(out.len(), self.action_width());
        out
    }

    /// State features followed by play features.
    pub fn encode(&self, outlook: &Outlook, play: &Play) -> Vec<f64> {
        let mut out = self.encode_state(outlook);
        out.extend(self.encode_play(outlook, play));
        out
    }

    fn push_card(&self, out: &mut Vec<f64>, outlook: &Outlook, sighting: Option<&Sighting>) {
        let Some(sighting) = sighting else {
            out.extend(std::iter::repeat(0.0).take(self.card_width()));
            return;
        };
        out.push(normalize(CARD_COST_CEILING, card_cost(outlook, sighting)));
        out.push(normalize(BOARD_VALUE_CEILING, board_value(outlook, sighting)));
        out.push(normalize(NOBLE_VALUE_CEILING, noble_value(outlook, sighting)));
        out.push(normalize(POINTS_CEILING, sighting.points()));
        if self.set == FeatureSet::Extended {
            out.push(if outlook.can_afford(sighting) { 1.0 } else { 0.0 });
            out.push(f64::from(sighting.rank() as u8) / 3.0);
        }
    }
}

fn push_tokens(out: &mut Vec<f64>, tokens: &splendor::Tokens) {
    for color in COLORS {
        out.push(normalize(TOKEN_CEILING, f64::from(tokens[color])));
    }
    out.push(normalize(TOKEN_CEILING, f64::from(tokens.gold)));
}

fn push_opponent(out: &mut Vec<f64>, player: &Player) {
    for color in COLORS {
        out.push(normalize(BONUS_CEILING, f64::from(player.bonus[color])));
    }
    push_tokens(out, &player.tokens);
    out.push(normalize(SCORE_CEILING, f64::from(player.score)));
    out.push(normalize(MAX_HELD_CARDS as f64, player.held.len() as f64));
}

/// Cost after bonuses plus the part of it that tokens don't cover either.
pub fn card_cost(outlook: &Outlook, sighting: &Sighting) -> f64 {
    let me = &outlook.me;
    COLORS
        .iter()
        .map(|&c| {
            let after_bonus = (sighting.cost(c) - f64::from(me.bonus[c])).max(0.0);
            let uncovered = (after_bonus - f64::from(me.tokens[c])).max(0.0);
            after_bonus + uncovered
        })
        .sum()
}

/// How much the card's bonus would help with every other visible or held card.
pub fn board_value(outlook: &Outlook, sighting: &Sighting) -> f64 {
    let Some(provides) = sighting.provides() else {
        return 0.0;
    };
    let have = f64::from(outlook.me.bonus[provides]);
    outlook
        .board
        .iter()
        .copied()
        .chain(outlook.held())
        .filter(|other| other.key() != sighting.key())
        .map(|other| (other.cost(provides) - have).max(0.0))
        .sum()
}

/// How much the card's bonus is still missing from the available nobles.
pub fn noble_value(outlook: &Outlook, sighting: &Sighting) -> f64 {
    let Some(provides) = sighting.provides() else {
        return 0.0;
    };
    let have = outlook.me.bonus[provides];
    outlook
        .nobles
        .iter()
        .map(|noble| f64::from(noble.requires[provides].saturating_sub(have)))
        .sum()
}
