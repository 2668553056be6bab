pub mod classifier;
pub mod error;
pub mod report;
pub mod scorers;
pub mod service;
pub mod signal;
pub mod vector;

pub use classifier::{Classifier, Label, LogisticModel};
pub use error::{ClassifierError, ExtractionError};
pub use scorers::{SCORERS, Scorer};
pub use service::{AnalyzeRequest, AnalyzeResponse, Analyzer, ServiceError};
pub use signal::{Fault, Signal};
pub use vector::{FEATURE_COUNT, FeatureVector, assemble};
