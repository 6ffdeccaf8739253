use std::path::PathBuf;
use std::str::FromStr;

use crate::FeatureSet;

/// The two shapes of the learning agent. Both run the same algorithm and
/// differ only in what they encode and how big the network is.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Variant {
    /// Extended card summaries, opponent summaries, two hidden layers.
    Elaborate,
    /// Basic card summaries, one hidden layer.
    Simplified,
}

impl Variant {
    pub fn feature_set(self) -> FeatureSet {
        match self {
            Variant::Elaborate => FeatureSet::Extended,
            Variant::Simplified => FeatureSet::Basic,
        }
    }

    /// Widths of the hidden layers, input side first.
    pub fn hidden_layers(self) -> &'static [usize] {
        match self {
            Variant::Elaborate => &[96, 32],
            Variant::Simplified => &[60],
        }
    }

    pub fn default_model_path(self) -> &'static str {
        match self {
            Variant::Elaborate => "net.json",
            Variant::Simplified => "net-simplified.json",
        }
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "elaborate" => Ok(Variant::Elaborate),
            "simplified" => Ok(Variant::Simplified),
            _ => Err(format!(
                "unknown variant '{}', expected 'elaborate' or 'simplified'",
                s
            )),
        }
    }
}

/// Everything that controls how a [`TdBot`](crate::TdBot) learns.
#[derive(Clone, Debug)]
pub struct LearnerConfig {
    /// Update the network every turn and save it when the game ends.
    pub training: bool,
    /// Probability of playing a uniformly random action.
    pub epsilon: f64,
    pub learning_rate: f64,
    /// Used by the position heuristic to decide how many cards are worth chasing.
    pub winning_score: u8,
    pub variant: Variant,
    pub model_path: PathBuf,
}

impl LearnerConfig {
    pub fn new(variant: Variant) -> Self {
        Self {
            training: true,
            epsilon: 0.5,
            learning_rate: 0.001,
            winning_score: splendor::WINNING_SCORE,
            variant,
            model_path: PathBuf::from(variant.default_model_path()),
        }
    }
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self::new(Variant::Elaborate)
    }
}
