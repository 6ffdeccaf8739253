//! A learning agent: an epsilon-greedy player whose action values come from a
//! small neural network trained online against a one-step lookahead.

pub use agent::*;
pub use config::*;
pub use features::*;
pub use heuristic::*;
pub use network::*;
pub use outlook::*;

mod agent;
mod config;
mod features;
mod heuristic;
mod network;
mod outlook;
