use std::str::FromStr;

use greedy_bot::GreedyBot;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use random_bot::RandomBot;
use splendor_bot_utils::Agent;
use td_bot::{LearnerConfig, SharedNetwork, TdBot};

/// The kinds of agent that can take a seat.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AgentKind {
    Td,
    Random,
    Greedy,
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "td" => Ok(AgentKind::Td),
            "random" => Ok(AgentKind::Random),
            "greedy" => Ok(AgentKind::Greedy),
            _ => Err(format!(
                "unknown agent '{}', expected 'td', 'random' or 'greedy'",
                s
            )),
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentKind::Td => write!(f, "td"),
            AgentKind::Random => write!(f, "random"),
            AgentKind::Greedy => write!(f, "greedy"),
        }
    }
}

/// Who sits where. Seat 0 always holds the learner.
#[derive(Clone, Debug)]
pub struct Lineup {
    pub seats: Vec<AgentKind>,
}

impl Lineup {
    pub fn new(players: usize, opponent: AgentKind) -> Self {
        let mut seats = vec![opponent; players];
        if let Some(first) = seats.first_mut() {
            *first = AgentKind::Td;
        }
        Self { seats }
    }

    /// Fresh agents for one game. Every learner shares `network`, and every
    /// agent gets its own rng derived from `rng`.
    pub fn agents(
        &self,
        config: &LearnerConfig,
        network: &SharedNetwork,
        rng: &mut StdRng,
    ) -> Vec<Box<dyn Agent>> {
        self.seats
            .iter()
            .enumerate()
            .map(|(idx, &kind)| {
                let name = format!("{} {}", kind, idx + 1);
                let agent_rng = StdRng::seed_from_u64(rng.gen());
                let agent: Box<dyn Agent> = match kind {
                    AgentKind::Td => Box::new(TdBot::new(
                        name,
                        config.clone(),
                        SharedNetwork::clone(network),
                        agent_rng,
                    )),
                    AgentKind::Random => Box::new(RandomBot::new(name, agent_rng)),
                    AgentKind::Greedy => Box::new(GreedyBot::new(name, agent_rng)),
                };
                agent
            })
            .collect()
    }
}
