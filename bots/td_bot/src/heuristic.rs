//! Hand-written evaluation of the agent's own position, used as the reward
//! part of the learning target.

use splendor::COLORS;

use crate::{normalize, Outlook, Sighting};

const SCORE_CEILING: f64 = 20.0;

/// Points per unit of cost still missing, for one card.
fn potential(outlook: &Outlook, sighting: &Sighting) -> f64 {
    let bonus = &outlook.me.bonus;
    let missing: f64 = COLORS
        .iter()
        .map(|&c| (sighting.cost(c) - f64::from(bonus[c])).max(0.0))
        .sum();
    sighting.points() / (missing + 1.0)
}

/// Scores the position of `outlook.me` in `[0, 1]`.
pub fn evaluate(outlook: &Outlook, winning_score: u8) -> f64 {
    let me = &outlook.me;
    let mut value = f64::from(me.score);
    value += f64::from(me.bonus.total()) / 100.0;
    value += f64::from(me.tokens.gems.total()) / 200.0;
    value += f64::from(me.tokens.gold) / 150.0;
    value += me.held.iter().map(|card| f64::from(card.points)).sum::<f64>() / 500.0;

    let mut potentials: Vec<f64> = outlook
        .board
        .iter()
        .copied()
        .chain(outlook.held())
        .map(|sighting| potential(outlook, &sighting))
        .collect();
    potentials.sort_by(|a, b| b.total_cmp(a));
    let top = usize::from(winning_score.saturating_sub(me.score) / 3);
    value += potentials.iter().take(top).sum::<f64>();

    normalize(SCORE_CEILING, value)
}
