use itertools::Itertools;
use splendor::{can_afford, Action, Color, PlayerView, Tokens, COLORS, MAX_HELD_CARDS};

/// Every legal token take from `bank`: each set of one to three distinct
/// available colors, then each double of a color the bank has at least two of.
pub fn take_options(bank: &Tokens) -> Vec<Tokens> {
    let available: Vec<Color> = COLORS.iter().copied().filter(|&c| bank[c] > 0).collect();
    let mut options = Vec::new();
    for size in 1..=3 {
        for colors in available.iter().combinations(size) {
            let mut tokens = Tokens::new();
            for &color in colors {
                tokens[color] = 1;
            }
            options.push(tokens);
        }
    }
    for &color in &available {
        if bank[color] >= 2 {
            let mut tokens = Tokens::new();
            tokens[color] = 2;
            options.push(tokens);
        }
    }
    options
}

/// Every legal action for the viewing player, in a fixed order: buys (board,
/// then hand), holds, takes.
///
/// Never empty: if nothing else is possible, the only action is taking no
/// tokens at all.
pub fn legal_actions(view: &PlayerView) -> Vec<Action> {
    let player = view.player();
    let mut actions: Vec<Action> = view
        .cards
        .iter()
        .chain(player.held.iter())
        .filter(|card| can_afford(player, card))
        .map(|&card| Action::Buy { card })
        .collect();
    if player.held.len() < MAX_HELD_CARDS {
        actions.extend(view.cards.iter().map(|&card| Action::Hold { card }));
    }
    actions.extend(
        take_options(&view.bank)
            .into_iter()
            .map(|tokens| Action::Take { tokens }),
    );
    if actions.is_empty() {
        actions.push(Action::Take {
            tokens: Tokens::new(),
        });
    }
    actions
}
