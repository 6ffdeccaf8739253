//! State transitions. Every operation takes the current state by reference and
//! returns the next state, leaving the input untouched.

use crate::{
    can_hold, check_take, payment, shortfall, validate_drop, validate_noble, Action, Card,
    CardStatus, GameState, IllegalAction, Noble, PlayerKey, Tokens,
};

impl GameState {
    /// Applies any turn action.
    pub fn apply(&self, player: PlayerKey, action: &Action) -> Result<GameState, IllegalAction> {
        match action {
            Action::Buy { card } => self.buy(player, card),
            Action::Hold { card } => self.hold(player, card),
            Action::Take { tokens } => self.take(player, tokens),
        }
    }

    /// Buys a card from the board or from the player's hand.
    ///
    /// Colored tokens pay first, gold covers the rest. A board card is
    /// replaced from its deck.
    pub fn buy(&self, key: PlayerKey, card: &Card) -> Result<GameState, IllegalAction> {
        let player = self.player(key);
        let in_hand = player.held.iter().position(|c| c.key == card.key);
        let on_board = self.board_slot(card);
        // Costs and points come from the dealt card, never from the request
        let dealt = match (in_hand, on_board) {
            (Some(idx), _) => player.held[idx],
            (None, Some((row, slot))) => self.board[row][slot],
            (None, None) => return Err(IllegalAction::CardNotAvailable { card: *card }),
        };
        if dealt != *card {
            return Err(IllegalAction::CardNotAvailable { card: *card });
        }
        let card = &dealt;
        let short = shortfall(player, card);
        if short > u32::from(player.gold()) {
            return Err(IllegalAction::CannotAfford {
                card: *card,
                shortfall: short,
                gold: player.gold(),
            });
        }

        let pay = payment(player, card);
        let mut next = self.clone();
        let buyer = next.player_mut(key);
        let paid = buyer.tokens.withdraw(&pay);
        debug_assert!(paid, "payment exceeds tokens despite affordability");
        buyer.bonus[card.provides] += 1;
        buyer.score += card.points;
        buyer.bought.push(card.with_status(CardStatus::Consumed));
        match in_hand {
            Some(idx) => {
                buyer.held.remove(idx);
            }
            None => {
                if let Some((row, slot)) = on_board {
                    next.remove_from_board(row, slot);
                }
            }
        }
        next.bank.deposit(&pay);
        Ok(next)
    }

    /// Moves a board card into the player's hand, with one gold if the bank has any.
    pub fn hold(&self, key: PlayerKey, card: &Card) -> Result<GameState, IllegalAction> {
        if !can_hold(card) {
            return Err(IllegalAction::CardNotHoldable { card: *card });
        }
        if self.player(key).hand_is_full() {
            return Err(IllegalAction::HandFull { card: *card });
        }
        let (row, slot) = self
            .board_slot(card)
            .filter(|&(row, slot)| self.board[row][slot] == *card)
            .ok_or(IllegalAction::CardNotHoldable { card: *card })?;

        let mut next = self.clone();
        let taken = next.remove_from_board(row, slot);
        let gain_gold = next.bank.gold > 0;
        if gain_gold {
            next.bank.gold -= 1;
        }
        let holder = next.player_mut(key);
        if gain_gold {
            holder.tokens.gold += 1;
        }
        holder.held.push(taken.with_status(CardStatus::Held));
        Ok(next)
    }

    /// Moves the requested tokens from the bank to the player.
    pub fn take(&self, key: PlayerKey, tokens: &Tokens) -> Result<GameState, IllegalAction> {
        check_take(&self.bank, tokens).map_err(|violation| IllegalAction::IllegalTake {
            requested: *tokens,
            violation,
        })?;
        let mut next = self.clone();
        let withdrawn = next.bank.withdraw(tokens);
        debug_assert!(withdrawn);
        next.player_mut(key).tokens.deposit(tokens);
        Ok(next)
    }

    /// Returns tokens from the player to the bank.
    pub fn drop_tokens(&self, key: PlayerKey, drop: &Tokens) -> Result<GameState, IllegalAction> {
        validate_drop(self.player(key), drop)?;
        let mut next = self.clone();
        let withdrawn = next.player_mut(key).tokens.withdraw(drop);
        debug_assert!(withdrawn);
        next.bank.deposit(drop);
        Ok(next)
    }

    /// The available nobles whose requirement the player's bonuses meet.
    pub fn eligible_nobles(&self, key: PlayerKey) -> Vec<Noble> {
        let player = self.player(key);
        self.nobles
            .iter()
            .filter(|noble| crate::can_take_noble(player, noble))
            .copied()
            .collect()
    }

    /// Gives a noble's points to the player and removes it from the game.
    pub fn award_noble(&self, key: PlayerKey, noble: &Noble) -> Result<GameState, IllegalAction> {
        validate_noble(self.player(key), noble)?;
        let idx = self
            .nobles
            .iter()
            .position(|n| n.key == noble.key)
            .ok_or(IllegalAction::CannotTakeNoble { noble: *noble })?;
        let mut next = self.clone();
        next.nobles.remove(idx);
        next.player_mut(key).score += noble.points;
        Ok(next)
    }

    fn board_slot(&self, card: &Card) -> Option<(usize, usize)> {
        let row = card.rank.index();
        self.board[row]
            .iter()
            .position(|c| c.key == card.key)
            .map(|slot| (row, slot))
    }

    /// Takes a card off the board and refills its slot from the deck.
    ///
    /// The slot disappears when the deck is empty.
    fn remove_from_board(&mut self, row: usize, slot: usize) -> Card {
        match self.decks[row].pop() {
            Some(next_card) => std::mem::replace(
                &mut self.board[row][slot],
                next_card.with_status(CardStatus::Board),
            ),
            None => self.board[row].remove(slot),
        }
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::{
        can_afford, should_drop_tokens, Catalog, Color, GameSettings, Gems, Rank, BOARD_ROW_SIZE,
        COLORS, MAX_HELD_CARDS, MAX_TOKENS,
    };

    fn new_game(players: usize, seed: u64) -> GameState {
        let catalog = Catalog::standard().unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        GameState::new(&catalog, GameSettings::for_players(players).unwrap(), &mut rng)
    }

    /// Picks some legal action, preferring buys so that games progress.
    fn random_legal_action(state: &GameState, key: PlayerKey, rng: &mut StdRng) -> Action {
        let player = state.player(key);
        let buys: Vec<Action> = state
            .board
            .iter()
            .flatten()
            .chain(player.held.iter())
            .filter(|card| can_afford(player, card))
            .map(|card| Action::Buy { card: *card })
            .collect();
        if let Some(buy) = buys.choose(rng) {
            return buy.clone();
        }
        if player.held.len() < MAX_HELD_CARDS && rng.gen_bool(0.2) {
            if let Some(card) = state.board.iter().flatten().collect::<Vec<_>>().choose(rng) {
                return Action::Hold { card: **card };
            }
        }
        let mut available: Vec<Color> = COLORS
            .iter()
            .copied()
            .filter(|&c| state.bank[c] > 0)
            .collect();
        available.shuffle(rng);
        let mut tokens = Tokens::new();
        for color in available.into_iter().take(3) {
            tokens[color] = 1;
        }
        Action::Take { tokens }
    }

    /// Plays random legal turns, dropping the newest-looking excess, and checks
    /// `check` after every state transition.
    fn play_random<F: FnMut(&GameState, &GameState) -> bool>(seed: u64, mut check: F) -> bool {
        let players = 2 + (seed % 3) as usize;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = new_game(players, seed);
        for turn in 0..120 {
            let key = PlayerKey(turn % players);
            let action = random_legal_action(&state, key, &mut rng);
            let mut next = match state.apply(key, &action) {
                Ok(next) => next,
                Err(_) => return false,
            };
            if let Some(noble) = next.eligible_nobles(key).pop() {
                next = next.award_noble(key, &noble).unwrap();
            }
            if should_drop_tokens(next.player(key)) {
                let mut flat = next.player(key).tokens.flatten();
                flat.shuffle(&mut rng);
                let drop = Tokens::from_flat(&flat[MAX_TOKENS as usize..]);
                next = next.drop_tokens(key, &drop).unwrap();
            }
            if !check(&state, &next) {
                return false;
            }
            state = next;
        }
        true
    }

    quickcheck! {
        fn tokens_are_conserved(seed: u64) -> bool {
            let settings = GameSettings::for_players(2 + (seed % 3) as usize).unwrap();
            let expected = crate::initial_bank(settings);
            play_random(seed, |_, next| next.token_totals() == expected)
        }

        fn bonuses_and_scores_never_decrease(seed: u64) -> bool {
            play_random(seed, |prev, next| {
                prev.players.iter().zip(&next.players).all(|(p, n)| {
                    n.bonus.dominates(&p.bonus) && n.score >= p.score
                })
            })
        }

        fn board_rows_stay_full_while_decks_last(seed: u64) -> bool {
            play_random(seed, |_, next| {
                (0..3).all(|row| {
                    let visible = next.board[row].len();
                    let remaining = next.decks[row].len();
                    visible <= BOARD_ROW_SIZE && (visible == BOARD_ROW_SIZE || remaining == 0)
                })
            })
        }

        fn token_limit_holds_after_turns(seed: u64) -> bool {
            play_random(seed, |_, next| {
                next.players.iter().all(|p| p.tokens.total() <= MAX_TOKENS)
            })
        }
    }

    #[test]
    fn buy_with_bonus_and_gold() {
        let state = new_game(2, 1);
        let key = PlayerKey(0);
        let mut card = state.row(Rank::One)[0];
        card.cost = Gems::from_pairs([(Color::White, 3)]);
        card.points = 1;
        let mut state = state;
        state.board[0][0] = card;
        {
            let player = state.player_mut(key);
            player.bonus.white = 2;
            player.tokens.gems.blue = 3;
            player.tokens.gold = 1;
        }
        state.bank.gems.blue -= 3;
        state.bank.gold -= 1;
        let deck_top = *state.decks[0].last().unwrap();

        let next = state.buy(key, &card).unwrap();
        let player = next.player(key);
        assert_eq!(player.tokens.gold, 0);
        assert_eq!(player.tokens.gems.blue, 3);
        assert_eq!(player.score, 1);
        assert_eq!(player.bought, vec![card.with_status(CardStatus::Consumed)]);
        assert_eq!(player.bonus[card.provides], state.player(key).bonus[card.provides] + 1);
        assert_eq!(next.bank.gold, state.bank.gold + 1);
        assert_eq!(next.board[0][0].key, deck_top.key);
        assert_eq!(next.board[0][0].status, CardStatus::Board);
        assert_eq!(next.decks[0].len(), state.decks[0].len() - 1);
        // The original state is left as it was.
        assert_eq!(state.board[0][0], card);
    }

    #[test]
    fn buy_rejects_unaffordable_and_missing_cards() {
        let state = new_game(2, 2);
        let card = state.row(Rank::Three)[0];
        assert!(matches!(
            state.buy(PlayerKey(0), &card),
            Err(IllegalAction::CannotAfford { .. })
        ));
        let mut free = state.decks[0][0];
        free.cost = Gems::new();
        assert_eq!(
            state.buy(PlayerKey(0), &free),
            Err(IllegalAction::CardNotAvailable { card: free })
        );
    }

    #[test]
    fn altered_cards_are_rejected() {
        let state = new_game(2, 5);
        let key = PlayerKey(0);
        let real = state.row(Rank::Three)[0];
        let mut forged = real;
        forged.cost = Gems::new();
        forged.points = 15;
        assert_eq!(
            state.buy(key, &forged),
            Err(IllegalAction::CardNotAvailable { card: forged })
        );
        assert_eq!(
            state.apply(key, &Action::Buy { card: forged }),
            Err(IllegalAction::CardNotAvailable { card: forged })
        );

        let mut relabeled = state.row(Rank::One)[1];
        relabeled.provides = if relabeled.provides == Color::Red {
            Color::Blue
        } else {
            Color::Red
        };
        assert_eq!(
            state.hold(key, &relabeled),
            Err(IllegalAction::CardNotHoldable { card: relabeled })
        );

        // Once held, the card has to be sent as it sits in the hand
        let held = state.hold(key, &real).unwrap();
        let mut rich = held.clone();
        rich.player_mut(key).tokens.deposit(&Tokens::from_gems(Gems::splat(7)));
        assert!(matches!(
            rich.buy(key, &real),
            Err(IllegalAction::CardNotAvailable { .. })
        ));
        let in_hand = rich.player(key).held[0];
        let bought = rich.buy(key, &in_hand).unwrap();
        assert_eq!(bought.player(key).score, real.points);
    }

    #[test]
    fn buy_from_hand_keeps_board() {
        let state = new_game(2, 3);
        let key = PlayerKey(1);
        let card = state.row(Rank::One)[2];
        let held = state.hold(key, &card).unwrap();
        let mut held = held;
        held.player_mut(key).tokens.deposit(&Tokens::from_gems(card.cost));
        for color in COLORS {
            held.bank[color] -= card.cost[color];
        }
        let bought = held.buy(key, &held.player(key).held[0]).unwrap();
        assert!(bought.player(key).held.is_empty());
        assert_eq!(bought.player(key).bought[0].status, CardStatus::Consumed);
        assert_eq!(bought.board, held.board);
        assert_eq!(bought.player(key).bonus[card.provides], 1);
    }

    #[test]
    fn hold_without_gold_in_bank() {
        let mut state = new_game(2, 4);
        state.bank.gold = 0;
        let key = PlayerKey(0);
        let card = state.row(Rank::Two)[1];
        let next = state.hold(key, &card).unwrap();
        let player = next.player(key);
        assert_eq!(player.tokens.gold, 0);
        assert_eq!(player.held.len(), 1);
        assert_eq!(player.held[0].key, card.key);
        assert_eq!(player.held[0].status, CardStatus::Held);
        assert_eq!(next.row(Rank::Two).len(), BOARD_ROW_SIZE);
        assert_ne!(next.row(Rank::Two)[1].key, card.key);
    }

    #[test]
    fn hold_moves_gold_and_respects_hand_size() {
        let state = new_game(2, 5);
        let key = PlayerKey(0);
        let mut state = state;
        for _ in 0..MAX_HELD_CARDS {
            let card = state.row(Rank::One)[0];
            state = state.hold(key, &card).unwrap();
        }
        assert_eq!(state.player(key).tokens.gold, 3);
        assert_eq!(state.bank.gold, 2);
        let card = state.row(Rank::One)[0];
        assert_eq!(
            state.hold(key, &card),
            Err(IllegalAction::HandFull { card })
        );
    }

    #[test]
    fn exhausted_deck_leaves_slot_empty() {
        let mut state = new_game(2, 6);
        state.decks[2].clear();
        let card = state.row(Rank::Three)[3];
        let next = state.hold(PlayerKey(0), &card).unwrap();
        assert_eq!(next.row(Rank::Three).len(), BOARD_ROW_SIZE - 1);
        assert!(next.row(Rank::Three).iter().all(|c| c.key != card.key));
    }

    #[test]
    fn drop_back_to_ten() {
        let state = new_game(2, 8);
        let key = PlayerKey(0);
        let mut state = state;
        for tokens in [
            Gems::from_pairs([(Color::White, 1), (Color::Blue, 1), (Color::Green, 1)]),
            Gems::from_pairs([(Color::Red, 1), (Color::Black, 1), (Color::Green, 1)]),
            Gems::from_pairs([(Color::White, 1), (Color::Blue, 1), (Color::Red, 1)]),
            Gems::from_pairs([(Color::Black, 2)]),
        ] {
            state = state.take(key, &Tokens::from_gems(tokens)).unwrap();
        }
        assert_eq!(state.player(key).tokens.total(), 11);
        assert!(should_drop_tokens(state.player(key)));

        let drop = Tokens::from_gems(Gems::from_pairs([(Color::Black, 1)]));
        let dropped = state.drop_tokens(key, &drop).unwrap();
        assert_eq!(dropped.player(key).tokens.total(), 10);
        assert!(!should_drop_tokens(dropped.player(key)));

        let too_much = Tokens::from_gems(Gems::from_pairs([(Color::Black, 4)]));
        assert!(matches!(
            state.drop_tokens(key, &too_much),
            Err(IllegalAction::IllegalDrop { .. })
        ));
    }

    #[test]
    fn noble_award_removes_noble() {
        let mut state = new_game(2, 9);
        let key = PlayerKey(1);
        let noble = state.nobles[0];
        assert!(state.eligible_nobles(key).is_empty());
        assert!(state.award_noble(key, &noble).is_err());
        state.player_mut(key).bonus = noble.requires;
        assert!(state.eligible_nobles(key).contains(&noble));
        let next = state.award_noble(key, &noble).unwrap();
        assert_eq!(next.player(key).score, 3);
        assert!(!next.nobles.contains(&noble));
    }
}
