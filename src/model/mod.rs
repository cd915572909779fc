//! Feed-forward classifier used at prediction time.
//!
//! The model is a stack of dense layers. A single layer with one output unit
//! is plain logistic regression; more layers form a multi-layer perceptron
//! with the configured hidden activation. Weights are read-only once loaded.

use crate::io::{Activation, LayerState, ModelMetadata, ModelState};
use crate::{Error, Result};
use ndarray::{Array1, Array2, Axis};
use std::collections::HashSet;

impl Activation {
    /// Apply the activation element-wise.
    pub fn apply(&self, x: &mut Array2<f64>) {
        match self {
            Self::Relu => x.mapv_inplace(|v| v.max(0.0)),
            Self::Tanh => x.mapv_inplace(f64::tanh),
            Self::Logistic => x.mapv_inplace(sigmoid),
            Self::Identity => {}
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[derive(Debug, Clone)]
struct DenseLayer {
    weights: Array2<f64>,
    bias: Array1<f64>,
}

impl DenseLayer {
    fn from_state(index: usize, state: LayerState) -> Result<Self> {
        let rows = state.weights.len();
        let cols = state.weights.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidModel(format!("layer {index} has an empty weight matrix")));
        }
        if state.weights.iter().any(|r| r.len() != cols) {
            return Err(Error::InvalidModel(format!("layer {index} has ragged weight rows")));
        }
        if state.bias.len() != cols {
            return Err(Error::InvalidModel(format!(
                "layer {index} bias has {} entries, expected {cols}",
                state.bias.len()
            )));
        }

        let flat: Vec<f64> = state.weights.into_iter().flatten().collect();
        if flat.iter().chain(&state.bias).any(|v| !v.is_finite()) {
            return Err(Error::InvalidModel(format!("layer {index} has non-finite parameters")));
        }
        let weights = Array2::from_shape_vec((rows, cols), flat)
            .map_err(|e| Error::InvalidModel(format!("layer {index}: {e}")))?;

        Ok(Self { weights, bias: Array1::from(state.bias) })
    }

    fn to_state(&self) -> LayerState {
        LayerState {
            weights: self.weights.outer_iter().map(|row| row.to_vec()).collect(),
            bias: self.bias.to_vec(),
        }
    }

    fn inputs(&self) -> usize {
        self.weights.nrows()
    }

    fn outputs(&self) -> usize {
        self.weights.ncols()
    }
}

/// Loaded, validated classifier.
#[derive(Debug, Clone)]
pub struct Model {
    metadata: ModelMetadata,
    activation: Activation,
    classes: Vec<i64>,
    layers: Vec<DenseLayer>,
}

impl Model {
    /// Build a model from its serialized state, validating every shape.
    pub fn from_state(state: ModelState) -> Result<Self> {
        if state.layers.is_empty() {
            return Err(Error::InvalidModel("model has no layers".to_string()));
        }

        let layers = state
            .layers
            .into_iter()
            .enumerate()
            .map(|(i, layer)| DenseLayer::from_state(i, layer))
            .collect::<Result<Vec<_>>>()?;

        for (i, pair) in layers.windows(2).enumerate() {
            if pair[0].outputs() != pair[1].inputs() {
                return Err(Error::InvalidModel(format!(
                    "layer {i} produces {} units but layer {} expects {}",
                    pair[0].outputs(),
                    i + 1,
                    pair[1].inputs()
                )));
            }
        }

        let classes = state.classes;
        let unique: HashSet<_> = classes.iter().collect();
        if classes.len() < 2 || unique.len() != classes.len() {
            return Err(Error::InvalidModel(format!(
                "expected at least two distinct class labels, got {classes:?}"
            )));
        }

        let outputs = layers.last().map_or(0, DenseLayer::outputs);
        let expected_outputs = if classes.len() == 2 { 1 } else { classes.len() };
        if outputs != expected_outputs && outputs != classes.len() {
            return Err(Error::InvalidModel(format!(
                "output layer has {outputs} units for {} classes",
                classes.len()
            )));
        }

        let input_width = layers[0].inputs();
        if let Some(names) = &state.metadata.feature_names {
            if names.len() != input_width {
                return Err(Error::InvalidModel(format!(
                    "metadata lists {} feature names for {input_width} inputs",
                    names.len()
                )));
            }
        }

        Ok(Self { metadata: state.metadata, activation: state.activation, classes, layers })
    }

    /// Serializable state of this model.
    pub fn to_state(&self) -> ModelState {
        ModelState {
            metadata: self.metadata.clone(),
            activation: self.activation,
            classes: self.classes.clone(),
            layers: self.layers.iter().map(DenseLayer::to_state).collect(),
        }
    }

    /// Model metadata.
    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Class labels in output order.
    pub fn classes(&self) -> &[i64] {
        &self.classes
    }

    /// Number of features the model expects per row.
    pub fn input_width(&self) -> usize {
        self.layers[0].inputs()
    }

    /// Class probabilities, one row per input row and one column per class.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.input_width() {
            return Err(Error::ShapeMismatch { expected: self.input_width(), actual: x.ncols() });
        }

        let last = self.layers.len() - 1;
        let mut h = x.to_owned();
        for (i, layer) in self.layers.iter().enumerate() {
            h = h.dot(&layer.weights) + &layer.bias;
            if i < last {
                self.activation.apply(&mut h);
            }
        }

        if h.ncols() == 1 {
            let p = h.column(0).mapv(sigmoid);
            let mut proba = Array2::zeros((h.nrows(), 2));
            proba.column_mut(0).assign(&p.mapv(|v| 1.0 - v));
            proba.column_mut(1).assign(&p);
            Ok(proba)
        } else {
            for mut row in h.axis_iter_mut(Axis(0)) {
                let max = row.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
                row.mapv_inplace(|v| (v - max).exp());
                let sum = row.sum();
                row.mapv_inplace(|v| v / sum);
            }
            Ok(h)
        }
    }

    /// Predicted class label for every row of `x`.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<i64>> {
        let proba = self.predict_proba(x)?;
        proba
            .outer_iter()
            .enumerate()
            .map(|(row_index, row)| {
                if row.iter().any(|p| !p.is_finite()) {
                    return Err(Error::NonFiniteOutput { row: row_index });
                }
                let (best, _) = row.iter().enumerate().fold(
                    (0, f64::NEG_INFINITY),
                    |best, (i, &p)| if p > best.1 { (i, p) } else { best },
                );
                Ok(self.classes[best])
            })
            .collect()
    }
}
