use crate::error::ExtractionError;
use crate::scorers::{SCORERS, Scorer};
use crate::signal::Signal;
use phishscan_scanner::ResolvedBundle;
use serde::{Deserialize, Serialize};
use std::ops::Index;
use tracing::debug;

/// Number of heuristics the classifier was trained on
pub const FEATURE_COUNT: usize = 30;

/// Ordered scorer outputs for one URL; index `i` holds scorer `i + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Signal>", into = "Vec<Signal>")]
pub struct FeatureVector(Vec<Signal>);

impl FeatureVector {
    pub fn signals(&self) -> &[Signal] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Signal> {
        self.0.get(index).copied()
    }

    pub fn values(&self) -> Vec<i8> {
        self.0.iter().map(|s| s.value()).collect()
    }

    /// Numeric form handed to the classifier
    pub fn to_f64(&self) -> Vec<f64> {
        self.0.iter().map(|&s| f64::from(s)).collect()
    }
}

impl TryFrom<Vec<Signal>> for FeatureVector {
    type Error = ExtractionError;

    fn try_from(signals: Vec<Signal>) -> Result<Self, Self::Error> {
        if signals.len() != FEATURE_COUNT {
            return Err(ExtractionError::Length {
                expected: FEATURE_COUNT,
                actual: signals.len(),
            });
        }
        Ok(Self(signals))
    }
}

impl From<FeatureVector> for Vec<Signal> {
    fn from(vector: FeatureVector) -> Self {
        vector.0
    }
}

impl Index<usize> for FeatureVector {
    type Output = Signal;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Run every registered scorer over `bundle`, in registry order.
pub fn assemble(bundle: &ResolvedBundle) -> Result<FeatureVector, ExtractionError> {
    assemble_with(&SCORERS, bundle)
}

/// Run an arbitrary scorer set. The result must still have
/// [`FEATURE_COUNT`] entries to be accepted.
pub fn assemble_with(
    scorers: &[Scorer],
    bundle: &ResolvedBundle,
) -> Result<FeatureVector, ExtractionError> {
    let signals: Vec<Signal> = scorers.iter().map(|s| s.evaluate(bundle)).collect();
    debug!("Assembled {} signal(s) for {}", signals.len(), bundle.url);
    FeatureVector::try_from(signals)
}
