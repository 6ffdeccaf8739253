use anyhow::Context;
use rand::rngs::StdRng;
use splendor::{
    should_drop_tokens, validate_action, visualize_state, Catalog, GameSettings, GameState,
    IllegalAction, PlayerKey, TokenLimitExceeded,
};
use splendor_bot_utils::Agent;
use tracing::{debug, trace};

use crate::recording::{Recorder, TurnRecord};

#[derive(Debug)]
pub enum GameResult {
    WonByPlayer {
        player_idx: usize,
        turns: usize,
    },
    /// Nobody had won when the turn limit was reached.
    TurnLimitReached {
        turns: usize,
    },
    IllegalMoveByPlayer {
        player_idx: usize,
        err: IllegalAction,
        /// The state the illegal move was played against.
        state: Box<GameState>,
    },
}

/// Plays one game between `agents`, seated in order.
///
/// Returns an error only when an agent breaks its contract in a way the game
/// can't recover from (still too many tokens after dropping), or on IO
/// failure. Illegal moves are reported as a [`GameResult`].
pub fn play_game(
    rng: &mut StdRng,
    catalog: &Catalog,
    agents: &mut [Box<dyn Agent>],
    max_turns: usize,
    recorder: &mut Option<Recorder>,
) -> anyhow::Result<GameResult> {
    let player_count = agents.len();
    let settings = GameSettings::for_players(player_count)
        .with_context(|| format!("Can't set up a game for {} players", player_count))?;
    let mut state = GameState::new(catalog, settings, rng);

    for (idx, agent) in agents.iter_mut().enumerate() {
        agent.new_game(PlayerKey(idx), player_count);
    }

    let mut player_idx = 0;
    let mut turns = 0;
    let result = loop {
        turns += 1;
        let key = PlayerKey(player_idx);
        let agent = &mut agents[player_idx];

        let action = agent.turn(&state.view_for(key));
        debug!(player = agent.name(), turn = turns, %action);
        let next = validate_action(state.player(key), &state.bank, &action)
            .and_then(|()| state.apply(key, &action));
        state = match next {
            Ok(next) => next,
            Err(err) => return Ok(illegal_move(player_idx, err, state, recorder)),
        };
        if let Some(rec) = recorder {
            rec.store_turn(TurnRecord {
                player: key,
                action,
                noble: None,
                dropped: None,
            });
        }

        let eligible = state.eligible_nobles(key);
        if !eligible.is_empty() {
            let noble = agent.pick_noble(&state.view_for(key), &eligible);
            debug!(player = agent.name(), %noble, "Noble visits");
            state = match state.award_noble(key, &noble) {
                Ok(next) => next,
                Err(err) => return Ok(illegal_move(player_idx, err, state, recorder)),
            };
            if let Some(rec) = recorder {
                rec.amend_last_turn(|turn| turn.noble = Some(noble));
            }
        }

        if should_drop_tokens(state.player(key)) {
            let drop = agent.drop_tokens(&state.view_for(key));
            debug!(player = agent.name(), %drop, "Dropping tokens");
            state = match state.drop_tokens(key, &drop) {
                Ok(next) => next,
                Err(err) => return Ok(illegal_move(player_idx, err, state, recorder)),
            };
            let total = state.player(key).tokens.total();
            if should_drop_tokens(state.player(key)) {
                let err = anyhow::Error::new(TokenLimitExceeded { player: key, total });
                return Err(err.context(format!("{} did not drop enough tokens", agent.name())));
            }
            if let Some(rec) = recorder {
                rec.amend_last_turn(|turn| turn.dropped = Some(drop));
            }
        }

        trace!("\n{}", visualize_state(&state));

        player_idx = (player_idx + 1) % player_count;
        // Only a full round can end the game, so every seat gets the same number of turns
        if player_idx == 0 {
            if let Some(winner) = state.winner() {
                break GameResult::WonByPlayer {
                    player_idx: winner.0,
                    turns,
                };
            }
            if turns >= max_turns {
                break GameResult::TurnLimitReached { turns };
            }
        }
    };

    for agent in agents.iter_mut() {
        agent.end_game(&state)?;
    }

    if let Some(rec) = recorder {
        let names: Vec<String> = agents.iter().map(|a| a.name().to_owned()).collect();
        rec.write_game_recording(&names, &state)?;
    }

    Ok(result)
}

fn illegal_move(
    player_idx: usize,
    err: IllegalAction,
    state: GameState,
    recorder: &mut Option<Recorder>,
) -> GameResult {
    if let Some(rec) = recorder {
        rec.discard_game();
    }
    GameResult::IllegalMoveByPlayer {
        player_idx,
        err,
        state: Box::new(state),
    }
}
