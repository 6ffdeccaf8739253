//! The agent's own working copy of what it sees, and the one-step lookahead on it.

use rand::Rng;
use splendor::{
    can_take_noble, payment, should_drop_tokens, Action, Card, CardKey, CardStatus, Color, Noble,
    Player, PlayerView, Rank, Tokens, COLORS, MAX_HELD_CARDS,
};
use splendor_bot_utils::{drop_random, take_options};

/// Average cost per color and average points of a card of each rank.
///
/// Stands in for the unknown card that refills a board slot during lookahead.
const EXPECTED_CARDS: [(f64, f64); 3] = [(0.825, 0.125), (1.37, 1.83), (2.15, 4.0)];

/// A card slot as the agent sees it: either a real card, or the average card
/// of a rank when the real one is not known yet.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Sighting {
    Dealt(Card),
    Expected(Rank),
}

impl Sighting {
    pub fn card(&self) -> Option<&Card> {
        match self {
            Sighting::Dealt(card) => Some(card),
            Sighting::Expected(_) => None,
        }
    }

    pub fn key(&self) -> Option<CardKey> {
        self.card().map(|card| card.key)
    }

    pub fn rank(&self) -> Rank {
        match self {
            Sighting::Dealt(card) => card.rank,
            Sighting::Expected(rank) => *rank,
        }
    }

    pub fn cost(&self, color: Color) -> f64 {
        match self {
            Sighting::Dealt(card) => f64::from(card.cost[color]),
            Sighting::Expected(rank) => EXPECTED_CARDS[rank.index()].0,
        }
    }

    pub fn points(&self) -> f64 {
        match self {
            Sighting::Dealt(card) => f64::from(card.points),
            Sighting::Expected(rank) => EXPECTED_CARDS[rank.index()].1,
        }
    }

    /// Unknown for expected cards.
    pub fn provides(&self) -> Option<Color> {
        self.card().map(|card| card.provides)
    }
}

/// A candidate move, real or hypothetical.
#[derive(Clone, Debug, PartialEq)]
pub enum Play {
    Buy(Sighting),
    Hold(Sighting),
    Take(Tokens),
}

impl Play {
    pub fn from_action(action: &Action) -> Self {
        match action {
            Action::Buy { card } => Play::Buy(Sighting::Dealt(*card)),
            Action::Hold { card } => Play::Hold(Sighting::Dealt(*card)),
            Action::Take { tokens } => Play::Take(*tokens),
        }
    }
}

/// What the agent knows about the game from one player's seat.
#[derive(Clone, Debug)]
pub struct Outlook {
    pub me: Player,
    pub others: Vec<Player>,
    /// Board cards, rank 1 first.
    pub board: Vec<Sighting>,
    pub deck_remaining: [usize; 3],
    pub nobles: Vec<Noble>,
    pub bank: Tokens,
}

impl Outlook {
    pub fn from_view(view: &PlayerView) -> Self {
        Self {
            me: view.player().clone(),
            others: view.opponents().cloned().collect(),
            board: view.cards.iter().map(|&card| Sighting::Dealt(card)).collect(),
            deck_remaining: view.deck_remaining,
            nobles: view.nobles.clone(),
            bank: view.bank,
        }
    }

    /// Gold needed on top of bonuses and colored tokens.
    pub fn shortfall(&self, sighting: &Sighting) -> f64 {
        COLORS
            .iter()
            .map(|&c| {
                let covered = f64::from(self.me.bonus[c]) + f64::from(self.me.tokens[c]);
                (sighting.cost(c) - covered).max(0.0)
            })
            .sum()
    }

    pub fn can_afford(&self, sighting: &Sighting) -> bool {
        self.shortfall(sighting) <= f64::from(self.me.tokens.gold)
    }

    /// The held cards as sightings.
    pub fn held(&self) -> impl Iterator<Item = Sighting> + '_ {
        self.me.held.iter().map(|&card| Sighting::Dealt(card))
    }

    /// All candidate plays, in the same order as
    /// [`legal_actions`](splendor_bot_utils::legal_actions).
    pub fn plays(&self) -> Vec<Play> {
        let mut plays: Vec<Play> = self
            .board
            .iter()
            .copied()
            .chain(self.held())
            .filter(|s| self.can_afford(s))
            .map(Play::Buy)
            .collect();
        if self.me.held.len() < MAX_HELD_CARDS {
            plays.extend(self.board.iter().copied().map(Play::Hold));
        }
        plays.extend(take_options(&self.bank).into_iter().map(Play::Take));
        if plays.is_empty() {
            plays.push(Play::Take(Tokens::new()));
        }
        plays
    }

    /// The outlook after the agent itself plays `action`.
    ///
    /// Refilled board slots hold an expected card. Illegal actions leave the
    /// outlook as it is.
    pub fn after<R: Rng>(&self, action: &Action, rng: &mut R) -> Outlook {
        let mut next = self.clone();
        match action {
            Action::Buy { card } => next.shadow_buy(card),
            Action::Hold { card } => next.shadow_hold(card),
            Action::Take { tokens } => next.shadow_take(tokens, rng),
        }
        next
    }

    fn shadow_buy(&mut self, card: &Card) {
        if !splendor::can_afford(&self.me, card) {
            return;
        }
        let pay = payment(&self.me, card);
        if !self.me.tokens.withdraw(&pay) {
            return;
        }
        self.bank.deposit(&pay);
        self.me.bonus[card.provides] += 1;
        self.me.score += card.points;
        self.me.bought.push(card.with_status(CardStatus::Consumed));
        match self.me.held.iter().position(|c| c.key == card.key) {
            Some(idx) => {
                self.me.held.remove(idx);
            }
            None => self.replace_on_board(card),
        }
        // A noble is only ever earned by buying, so this is the only place to check.
        if let Some(idx) = self.nobles.iter().rposition(|n| can_take_noble(&self.me, n)) {
            let noble = self.nobles.remove(idx);
            self.me.score += noble.points;
        }
    }

    fn shadow_hold(&mut self, card: &Card) {
        let on_board = self.board.iter().any(|s| s.key() == Some(card.key));
        if self.me.held.len() >= MAX_HELD_CARDS || !on_board {
            return;
        }
        if self.bank.gold > 0 {
            self.bank.gold -= 1;
            self.me.tokens.gold += 1;
        }
        self.me.held.push(card.with_status(CardStatus::Held));
        self.replace_on_board(card);
    }

    fn shadow_take<R: Rng>(&mut self, tokens: &Tokens, rng: &mut R) {
        if !self.bank.withdraw(tokens) {
            return;
        }
        self.me.tokens.deposit(tokens);
        if should_drop_tokens(&self.me) {
            let drop = drop_random(&self.me.tokens, rng);
            if self.me.tokens.withdraw(&drop) {
                self.bank.deposit(&drop);
            }
        }
    }

    /// Refills the card's slot with an expected card, or drops the slot when
    /// the deck is empty.
    fn replace_on_board(&mut self, card: &Card) {
        if let Some(idx) = self.board.iter().position(|s| s.key() == Some(card.key)) {
            let remaining = &mut self.deck_remaining[card.rank.index()];
            if *remaining > 0 {
                *remaining -= 1;
                self.board[idx] = Sighting::Expected(card.rank);
            } else {
                self.board.remove(idx);
            }
        }
    }
}
