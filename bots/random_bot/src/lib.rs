use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use splendor::{Action, Noble, PlayerView, Tokens};
use splendor_bot_utils::{drop_random, legal_actions, Agent};

/// Plays a uniformly random legal action every turn.
pub struct RandomBot {
    name: String,
    rng: StdRng,
}

impl RandomBot {
    pub fn new(name: impl Into<String>, rng: StdRng) -> Self {
        Self {
            name: name.into(),
            rng,
        }
    }
}

impl Agent for RandomBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn turn(&mut self, view: &PlayerView) -> Action {
        let actions = legal_actions(view);
        // legal_actions always offers at least the empty take
        actions
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Action::Take {
                tokens: Tokens::new(),
            })
    }

    fn pick_noble(&mut self, _view: &PlayerView, eligible: &[Noble]) -> Noble {
        eligible[self.rng.gen_range(0..eligible.len())]
    }

    fn drop_tokens(&mut self, view: &PlayerView) -> Tokens {
        drop_random(&view.player().tokens, &mut self.rng)
    }
}
