pub use cards::*;
pub use errors::*;
pub use player_state::*;
pub use protocol_types::*;
pub use rules::*;
pub use state::*;
pub use tokens::*;
pub use visualization::*;

#[cfg(test)]
mod arbitrary;
mod cards;
mod engine;
mod errors;
mod player_state;
mod protocol_types;
mod rules;
mod state;
mod tokens;
mod visualization;
