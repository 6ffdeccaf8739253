use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use splendor::{Action, Card, PlayerView, Tokens};
use splendor_bot_utils::{legal_actions, Agent};

/// Plays whichever action gains the most right now, picking randomly among
/// equally good ones.
pub struct GreedyBot {
    name: String,
    rng: StdRng,
}

impl GreedyBot {
    pub fn new(name: impl Into<String>, rng: StdRng) -> Self {
        Self {
            name: name.into(),
            rng,
        }
    }

    fn best_actions(&self, view: &PlayerView) -> Vec<Action> {
        let mut top_choices: Vec<Action> = Vec::new();
        let mut top_score = 0;
        for action in legal_actions(view) {
            let score = immediate_gain(view, &action);
            match score.cmp(&top_score) {
                Ordering::Less => {}
                Ordering::Equal => top_choices.push(action),
                Ordering::Greater => {
                    top_choices = vec![action];
                    top_score = score;
                }
            }
        }
        top_choices
    }
}

/// Points are worth most, then any card at all, then tokens.
fn immediate_gain(view: &PlayerView, action: &Action) -> u32 {
    match action {
        // Any card beats any take, so the engine keeps moving
        Action::Buy { card } => 4 + 2 * (u32::from(card.points) + noble_points(view, card)),
        Action::Take { tokens } => tokens.total(),
        Action::Hold { .. } => 0,
    }
}

/// Points of the nobles that buying `card` would make the player eligible for.
fn noble_points(view: &PlayerView, card: &Card) -> u32 {
    let mut bonus = view.player().bonus;
    bonus[card.provides] += 1;
    view.nobles
        .iter()
        .filter(|noble| bonus.dominates(&noble.requires))
        .map(|noble| u32::from(noble.points))
        .max()
        .unwrap_or(0)
}

impl Agent for GreedyBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn turn(&mut self, view: &PlayerView) -> Action {
        let choices = self.best_actions(view);
        choices.choose(&mut self.rng).copied().unwrap_or(Action::Take {
            tokens: Tokens::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use splendor::{Catalog, GameSettings, GameState, Gems, PlayerKey};

    use super::*;

    fn opening() -> GameState {
        let catalog = Catalog::standard().unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        GameState::new(&catalog, GameSettings::for_players(2).unwrap(), &mut rng)
    }

    #[test]
    fn takes_three_tokens_when_nothing_is_affordable() {
        let state = opening();
        let mut bot = GreedyBot::new("greedy", StdRng::seed_from_u64(1));
        match bot.turn(&state.view_for(PlayerKey(0))) {
            Action::Take { tokens } => assert_eq!(tokens.total(), 3),
            other => panic!("Expected a take, got {}", other),
        }
    }

    #[test]
    fn buys_the_most_valuable_card() {
        let mut state = opening();
        state.players[0].tokens = Tokens {
            gems: Gems::splat(7),
            gold: 5,
        };
        let view = state.view_for(PlayerKey(0));
        let mut bot = GreedyBot::new("greedy", StdRng::seed_from_u64(2));
        let Action::Buy { card } = bot.turn(&view) else {
            panic!("Expected a buy");
        };
        let best = view
            .cards
            .iter()
            .map(|c| immediate_gain(&view, &Action::Buy { card: *c }))
            .max()
            .unwrap();
        assert_eq!(immediate_gain(&view, &Action::Buy { card }), best);
    }

    #[test]
    fn counts_nobles_a_purchase_completes() {
        let mut state = opening();
        let noble = state.nobles[0];
        let card = state.board[0][0];
        let mut bonus = noble.requires;
        bonus[card.provides] = bonus[card.provides].saturating_sub(1);
        state.players[0].bonus = bonus;
        let view = state.view_for(PlayerKey(0));
        assert!(noble_points(&view, &card) >= u32::from(noble.points));
    }
}
