use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::Rng;
use splendor::{Action, GameState, PlayerKey, PlayerView, Tokens};
use splendor_bot_utils::{drop_random, legal_actions, Agent};
use tracing::{debug, info, trace};

use crate::{evaluate, Encoder, LearnerConfig, Outlook, Play, ValueNetwork};

/// One network can back several seats of the same process.
pub type SharedNetwork = Rc<RefCell<ValueNetwork>>;

/// Loads the network for `config`, or creates a fresh one of the right shape.
pub fn load_network<R: Rng>(config: &LearnerConfig, rng: &mut R) -> SharedNetwork {
    let encoder = Encoder::new(config.variant.feature_set());
    let network = ValueNetwork::load_or_init(
        &config.model_path,
        encoder.input_width(),
        config.variant.hidden_layers(),
        rng,
    );
    Rc::new(RefCell::new(network))
}

/// An epsilon-greedy agent that learns action values online with a
/// one-step temporal-difference target.
pub struct TdBot {
    name: String,
    config: LearnerConfig,
    encoder: Encoder,
    network: SharedNetwork,
    rng: StdRng,
    me: PlayerKey,
}

impl TdBot {
    pub fn new(
        name: impl Into<String>,
        config: LearnerConfig,
        network: SharedNetwork,
        rng: StdRng,
    ) -> Self {
        let encoder = Encoder::new(config.variant.feature_set());
        Self {
            name: name.into(),
            config,
            encoder,
            network,
            rng,
            me: PlayerKey(0),
        }
    }

    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    pub fn network(&self) -> &SharedNetwork {
        &self.network
    }

    fn estimate(&self, outlook: &Outlook, play: &Play) -> f64 {
        let features = self.encoder.encode(outlook, play);
        self.network.borrow().estimate(&features)
    }

    /// Index of the play with the highest estimate. The first one wins ties.
    fn best(&self, outlook: &Outlook, plays: &[Play]) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, play) in plays.iter().enumerate() {
            let value = self.estimate(outlook, play);
            if best.map_or(true, |(_, top)| value > top) {
                best = Some((idx, value));
            }
        }
        best
    }

    fn select(&mut self, outlook: &Outlook, plays: &[Play]) -> usize {
        if self.rng.gen_bool(self.config.epsilon.clamp(0.0, 1.0)) {
            let idx = self.rng.gen_range(0..plays.len());
            trace!(player = %self.me, idx, "Exploring");
            return idx;
        }
        self.best(outlook, plays).map_or(0, |(idx, _)| idx)
    }

    /// Moves the estimate of `play` toward the value of the position it leads to.
    fn learn(&mut self, outlook: &Outlook, action: &Action, play: &Play) {
        let next = outlook.after(action, &mut self.rng);
        let future = self
            .best(&next, &next.plays())
            .map_or(0.0, |(_, value)| value);
        let reward = evaluate(&next, self.config.winning_score);
        let target = reward + future;
        let features = self.encoder.encode(outlook, play);
        let before = self
            .network
            .borrow_mut()
            .update(&features, target, self.config.learning_rate);
        trace!(player = %self.me, reward, future, target, before, "Updated estimate");
    }
}

impl Agent for TdBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn new_game(&mut self, me: PlayerKey, _player_count: usize) {
        self.me = me;
    }

    fn turn(&mut self, view: &PlayerView) -> Action {
        let actions = legal_actions(view);
        let outlook = Outlook::from_view(view);
        let plays: Vec<Play> = actions.iter().map(Play::from_action).collect();
        let idx = self.select(&outlook, &plays);
        if self.config.training {
            self.learn(&outlook, &actions[idx], &plays[idx]);
        }
        debug!(player = %self.me, action = %actions[idx], options = actions.len(), "Chose action");
        actions[idx]
    }

    fn drop_tokens(&mut self, view: &PlayerView) -> Tokens {
        drop_random(&view.player().tokens, &mut self.rng)
    }

    fn end_game(&mut self, state: &GameState) -> anyhow::Result<()> {
        if !self.config.training {
            return Ok(());
        }
        self.network.borrow().save(&self.config.model_path)?;
        info!(
            player = %self.me,
            score = state.player(self.me).score,
            path = %self.config.model_path.display(),
            "Saved network"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use splendor::{validate_action, Catalog, Color, GameSettings, Gems};

    use super::*;
    use crate::Variant;

    fn opening(players: usize, seed: u64) -> GameState {
        let catalog = Catalog::standard().unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        GameState::new(&catalog, GameSettings::for_players(players).unwrap(), &mut rng)
    }

    fn bot(config: LearnerConfig, seed: u64) -> TdBot {
        let mut rng = StdRng::seed_from_u64(seed);
        let encoder = Encoder::new(config.variant.feature_set());
        let network = ValueNetwork::new(encoder.input_width(), config.variant.hidden_layers(), &mut rng);
        TdBot::new("td", config, Rc::new(RefCell::new(network)), rng)
    }

    fn frozen(variant: Variant) -> LearnerConfig {
        LearnerConfig {
            training: false,
            epsilon: 0.0,
            ..LearnerConfig::new(variant)
        }
    }

    #[test]
    fn greedy_choice_is_first_best_estimate() {
        let state = opening(2, 1);
        let view = state.view_for(PlayerKey(0));
        let mut bot = bot(frozen(Variant::Simplified), 2);
        let actions = legal_actions(&view);
        let outlook = Outlook::from_view(&view);
        let estimates: Vec<f64> = actions
            .iter()
            .map(|a| bot.estimate(&outlook, &Play::from_action(a)))
            .collect();
        let top = estimates.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let first = estimates.iter().position(|&v| v == top).unwrap();
        assert_eq!(bot.turn(&view), actions[first]);
    }

    #[test]
    fn exploring_still_plays_legal_actions() {
        let config = LearnerConfig {
            epsilon: 1.0,
            ..frozen(Variant::Elaborate)
        };
        let mut bot = bot(config, 3);
        for seed in 0..20 {
            let state = opening(3, seed);
            let view = state.view_for(PlayerKey(1));
            bot.new_game(PlayerKey(1), 3);
            let action = bot.turn(&view);
            assert!(validate_action(view.player(), &view.bank, &action).is_ok());
        }
    }

    #[test]
    fn training_changes_the_shared_network() {
        let config = LearnerConfig {
            training: true,
            ..frozen(Variant::Simplified)
        };
        let mut bot = bot(config, 4);
        let untouched = bot.network().borrow().clone();
        let other_seat = TdBot::new(
            "td 2",
            bot.config().clone(),
            Rc::clone(bot.network()),
            StdRng::seed_from_u64(5),
        );
        let state = opening(2, 6);
        bot.turn(&state.view_for(PlayerKey(0)));
        assert_ne!(*bot.network().borrow(), untouched);
        assert_eq!(*other_seat.network().borrow(), *bot.network().borrow());
    }

    #[test]
    fn learning_steps_toward_reward_plus_best_successor() {
        let config = LearnerConfig {
            training: true,
            learning_rate: 0.05,
            ..frozen(Variant::Simplified)
        };
        let encoder = Encoder::new(config.variant.feature_set());
        let mut init_rng = StdRng::seed_from_u64(20);
        let network = ValueNetwork::new(
            encoder.input_width(),
            config.variant.hidden_layers(),
            &mut init_rng,
        );
        let mut bot = TdBot::new(
            "td",
            config.clone(),
            Rc::new(RefCell::new(network.clone())),
            StdRng::seed_from_u64(21),
        );

        // Nine tokens plus a take of three, so the lookahead has to drop at random
        let mut state = opening(2, 22);
        state.players[0].tokens = Tokens {
            gems: Gems::from_pairs([(Color::Red, 4), (Color::Blue, 4)]),
            gold: 1,
        };
        let view = state.view_for(PlayerKey(0));
        let outlook = Outlook::from_view(&view);
        let action = legal_actions(&view)
            .into_iter()
            .find(|a| matches!(a, Action::Take { tokens } if tokens.total() == 3))
            .unwrap();
        let play = Play::from_action(&action);

        let next = outlook.after(&action, &mut StdRng::seed_from_u64(21));
        let best = next
            .plays()
            .iter()
            .map(|p| network.estimate(&encoder.encode(&next, p)))
            .fold(f64::NEG_INFINITY, f64::max);
        let target = evaluate(&next, config.winning_score) + best;
        let mut expected = network.clone();
        expected.update(&encoder.encode(&outlook, &play), target, config.learning_rate);

        bot.learn(&outlook, &action, &play);
        assert_eq!(*bot.network().borrow(), expected);
    }

    #[test]
    fn frozen_bot_leaves_network_alone() {
        let mut bot = bot(frozen(Variant::Simplified), 7);
        let untouched = bot.network().borrow().clone();
        let state = opening(2, 8);
        bot.turn(&state.view_for(PlayerKey(0)));
        assert_eq!(*bot.network().borrow(), untouched);
    }

    #[test]
    fn end_game_saves_only_when_training() {
        let dir = std::env::temp_dir().join(format!("td_bot_agent_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let state = opening(2, 9);

        let path = dir.join("frozen.json");
        let mut frozen_bot = bot(
            LearnerConfig {
                model_path: path.clone(),
                ..frozen(Variant::Simplified)
            },
            10,
        );
        frozen_bot.end_game(&state).unwrap();
        assert!(!path.exists());

        let path = dir.join("trained.json");
        let config = LearnerConfig {
            training: true,
            model_path: path.clone(),
            ..frozen(Variant::Simplified)
        };
        let mut trained_bot = bot(config.clone(), 11);
        trained_bot.end_game(&state).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(*load_network(&config, &mut rng).borrow(), *trained_bot.network().borrow());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn drops_back_to_ten() {
        let mut state = opening(2, 12);
        state.players[0].tokens = Tokens {
            gems: Gems::splat(2),
            gold: 2,
        };
        let mut bot = bot(frozen(Variant::Simplified), 13);
        let drop = bot.drop_tokens(&state.view_for(PlayerKey(0)));
        assert_eq!(drop.total(), 2);
    }
}
