//! A small fully-connected network with sigmoid units that estimates the
//! value of a (state, play) feature vector.

use std::path::Path;

use anyhow::{ensure, Context};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const INIT_RANGE: f64 = 0.1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Layer {
    /// One row of input weights per unit.
    weights: Vec<Vec<f64>>,
    biases: Vec<f64>,
}

impl Layer {
    fn new<R: Rng>(inputs: usize, units: usize, rng: &mut R) -> Self {
        let mut init = || rng.gen_range(-INIT_RANGE..=INIT_RANGE);
        let weights = (0..units)
            .map(|_| (0..inputs).map(|_| init()).collect())
            .collect();
        let biases = (0..units).map(|_| init()).collect();
        Self { weights, biases }
    }

    fn inputs(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.biases)
            .map(|(row, bias)| {
                let z: f64 = row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + bias;
                sigmoid(z)
            })
            .collect()
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueNetwork {
    input: usize,
    layers: Vec<Layer>,
}

impl ValueNetwork {
    /// Fresh network with the given hidden layer sizes and a single output.
    pub fn new<R: Rng>(input: usize, hidden: &[usize], rng: &mut R) -> Self {
        let mut layers = Vec::with_capacity(hidden.len() + 1);
        let mut width = input;
        for &units in hidden.iter().chain(std::iter::once(&1)) {
            layers.push(Layer::new(width, units, rng));
            width = units;
        }
        Self { input, layers }
    }

    pub fn input_width(&self) -> usize {
        self.input
    }

    /// Sizes of all layers after the input, output last.
    pub fn shape(&self) -> Vec<usize> {
        self.layers.iter().map(|layer| layer.biases.len()).collect()
    }

    /// Activations of every layer, input included.
    fn activations(&self, features: &[f64]) -> Vec<Vec<f64>> {
        debug_assert_eq!(features.len(), self.input);
        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        activations.push(features.to_vec());
        for layer in &self.layers {
            let next = layer.forward(activations.last().map_or(&[][..], Vec::as_slice));
            activations.push(next);
        }
        activations
    }

    pub fn estimate(&self, features: &[f64]) -> f64 {
        self.activations(features)
            .last()
            .and_then(|out| out.first().copied())
            .unwrap_or(0.0)
    }

    /// One gradient descent step on ½(target − estimate)². Returns the
    /// estimate before the step.
    pub fn update(&mut self, features: &[f64], target: f64, learning_rate: f64) -> f64 {
        let activations = self.activations(features);
        let out = activations
            .last()
            .and_then(|out| out.first().copied())
            .unwrap_or(0.0);

        // Error terms of the layer currently being updated
        let mut deltas = vec![(out - target) * out * (1.0 - out)];
        for (idx, layer) in self.layers.iter_mut().enumerate().rev() {
            let input = &activations[idx];
            let previous: Vec<f64> = (0..layer.inputs())
                .map(|i| {
                    let back: f64 = layer
                        .weights
                        .iter()
                        .zip(&deltas)
                        .map(|(row, delta)| row[i] * delta)
                        .sum();
                    back * input[i] * (1.0 - input[i])
                })
                .collect();
            for ((row, bias), delta) in layer.weights.iter_mut().zip(&mut layer.biases).zip(&deltas)
            {
                for (w, x) in row.iter_mut().zip(input) {
                    *w -= learning_rate * delta * x;
                }
                *bias -= learning_rate * delta;
            }
            deltas = previous;
        }
        out
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let network: ValueNetwork = serde_json::from_str(json)?;
        network.check_shape()?;
        Ok(network)
    }

    fn check_shape(&self) -> anyhow::Result<()> {
        ensure!(!self.layers.is_empty(), "network has no layers");
        let mut width = self.input;
        for (idx, layer) in self.layers.iter().enumerate() {
            ensure!(
                layer.weights.len() == layer.biases.len(),
                "layer {idx} has {} weight rows but {} biases",
                layer.weights.len(),
                layer.biases.len()
            );
            ensure!(
                layer.weights.iter().all(|row| row.len() == width),
                "layer {idx} expects {width} inputs"
            );
            width = layer.biases.len();
        }
        ensure!(width == 1, "network has {width} outputs instead of one");
        Ok(())
    }

    /// Overwrites the file at `path`.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("Could not write network to {}", path.display()))
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read network from {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Malformed network in {}", path.display()))
    }

    /// Loads the network at `path` if it exists and has the expected shape,
    /// otherwise starts from fresh weights.
    pub fn load_or_init<R: Rng>(path: &Path, input: usize, hidden: &[usize], rng: &mut R) -> Self {
        let fresh = Self::new(input, hidden, rng);
        if !path.exists() {
            debug!(path = %path.display(), "No saved network, starting fresh");
            return fresh;
        }
        match Self::load(path) {
            Ok(network) if network.input == input && network.shape() == fresh.shape() => {
                debug!(path = %path.display(), "Loaded network");
                network
            }
            Ok(network) => {
                warn!(
                    path = %path.display(),
                    saved = ?network.shape(),
                    expected = ?fresh.shape(),
                    "Saved network has a different shape, starting fresh"
                );
                fresh
            }
            Err(err) => {
                warn!(path = %path.display(), "{err:#}, starting fresh");
                fresh
            }
        }
    }
}
