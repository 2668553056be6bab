// Contract with the externally trained classifier

use crate::error::ClassifierError;
use crate::vector::{FEATURE_COUNT, FeatureVector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::info;

/// Class predicted for a URL. Class values follow the training data:
/// -1 for phishing, 1 for legitimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Phishing,
    Safe,
}

impl Label {
    pub fn class_value(&self) -> i8 {
        match self {
            Label::Phishing => -1,
            Label::Safe => 1,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Phishing => write!(f, "phishing"),
            Label::Safe => write!(f, "safe"),
        }
    }
}

/// A trained model, loaded once and shared read-only between analyses.
pub trait Classifier: fmt::Debug + Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<Label, ClassifierError>;

    /// Class probabilities ordered `[p_phishing, p_safe]`
    fn predict_probabilities(&self, features: &FeatureVector) -> Result<Vec<f64>, ClassifierError>;
}

/// Logistic regression over the feature vector, stored as JSON:
///
/// ```json
/// { "weights": [0.4, -0.1, ...], "bias": 0.25 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub weights: Vec<f64>,
    #[serde(default)]
    pub bias: f64,
}

impl LogisticModel {
    pub fn new(weights: Vec<f64>, bias: f64) -> Result<Self, ClassifierError> {
        let model = Self { weights, bias };
        model.validate()?;
        Ok(model)
    }

    pub fn from_json(json: &str) -> Result<Self, ClassifierError> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let model = Self::from_json(&fs::read_to_string(path)?)?;
        info!("Model loaded from {}", path.display());
        Ok(model)
    }

    fn validate(&self) -> Result<(), ClassifierError> {
        if self.weights.len() != FEATURE_COUNT {
            return Err(ClassifierError::Shape {
                expected: FEATURE_COUNT,
                actual: self.weights.len(),
            });
        }
        Ok(())
    }

    fn safe_probability(&self, features: &FeatureVector) -> Result<f64, ClassifierError> {
        let inputs = features.to_f64();
        if inputs.len() != self.weights.len() {
            return Err(ClassifierError::Shape {
                expected: self.weights.len(),
                actual: inputs.len(),
            });
        }

        let z: f64 = self
            .weights
            .iter()
            .zip(&inputs)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias;

        if !z.is_finite() {
            return Err(ClassifierError::Prediction(format!(
                "non-finite decision value {}",
                z
            )));
        }
        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

impl Classifier for LogisticModel {
    fn predict(&self, features: &FeatureVector) -> Result<Label, ClassifierError> {
        Ok(if self.safe_probability(features)? >= 0.5 {
            Label::Safe
        } else {
            Label::Phishing
        })
    }

    fn predict_probabilities(&self, features: &FeatureVector) -> Result<Vec<f64>, ClassifierError> {
        let safe = self.safe_probability(features)?;
        Ok(vec![1.0 - safe, safe])
    }
}
