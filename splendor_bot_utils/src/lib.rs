mod actions;
pub use actions::*;

use rand::seq::SliceRandom;
use rand::Rng;
use splendor::{Action, GameState, Noble, PlayerKey, PlayerView, Tokens, MAX_TOKENS};

/// A trait to simplify writing agents.
///
/// The judge calls these in order: [`new_game`](Agent::new_game) once, then per
/// turn [`turn`](Agent::turn), [`pick_noble`](Agent::pick_noble) if a noble is
/// earned and [`drop_tokens`](Agent::drop_tokens) if the player holds too many
/// tokens, and finally [`end_game`](Agent::end_game).
pub trait Agent {
    fn name(&self) -> &str;

    fn new_game(&mut self, _me: PlayerKey, _player_count: usize) {}

    fn turn(&mut self, view: &PlayerView) -> Action;

    /// Chooses among the nobles the player qualifies for. `eligible` is never empty.
    ///
    /// Defaults to the last one, i.e. the one a stack would pop.
    fn pick_noble(&mut self, _view: &PlayerView, eligible: &[Noble]) -> Noble {
        eligible[eligible.len() - 1]
    }

    /// Returns the tokens to give back so that at most [`MAX_TOKENS`] remain.
    fn drop_tokens(&mut self, view: &PlayerView) -> Tokens {
        drop_most_plentiful(&view.player().tokens)
    }

    /// Called once the game is over, with the final state.
    fn end_game(&mut self, _state: &GameState) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Keeps a random subset of [`MAX_TOKENS`] tokens and returns the rest.
pub fn drop_random<R: Rng>(tokens: &Tokens, rng: &mut R) -> Tokens {
    let mut flat = tokens.flatten();
    if flat.len() <= MAX_TOKENS as usize {
        return Tokens::new();
    }
    flat.shuffle(rng);
    Tokens::from_flat(&flat[MAX_TOKENS as usize..])
}

/// Drops from whichever color the player has most of, one token at a time.
/// Gold only goes once no colored tokens are left.
pub fn drop_most_plentiful(tokens: &Tokens) -> Tokens {
    let mut left = *tokens;
    let mut drop = Tokens::new();
    while left.total() > MAX_TOKENS {
        let color = splendor::COLORS
            .iter()
            .copied()
            .max_by_key(|&c| left[c])
            .unwrap_or(splendor::Color::White);
        if left[color] == 0 {
            // Only gold left over the limit
            drop.gold += (left.total() - MAX_TOKENS) as u8;
            break;
        }
        left[color] -= 1;
        drop[color] += 1;
    }
    drop
}
