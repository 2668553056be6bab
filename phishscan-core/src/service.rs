// Request/response contract of the analysis endpoint

use crate::classifier::{Classifier, Label};
use crate::error::{ClassifierError, ExtractionError};
use crate::vector::assemble;
use phishscan_scanner::{ResolvedBundle, Resolver};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub url: Option<String>,
}

impl AnalyzeRequest {
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub url: String,
    pub prediction: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid JSON data or missing 'url' key")]
    MissingUrl,

    #[error("No URL provided")]
    EmptyUrl,

    #[error("Model not loaded")]
    ModelNotLoaded,

    #[error("Invalid feature extraction")]
    InvalidFeatures(#[source] ExtractionError),

    #[error("Model prediction error: invalid probabilities")]
    InvalidProbabilities(usize),

    #[error("Internal Server Error")]
    Classifier(#[from] ClassifierError),
}

impl ServiceError {
    /// HTTP status a serving layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::MissingUrl | ServiceError::EmptyUrl => 400,
            _ => 500,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        let details = match self {
            ServiceError::Classifier(e) => Some(e.to_string()),
            _ => None,
        };
        ErrorBody {
            error: self.to_string(),
            details,
        }
    }
}

/// Runs the full analysis for one request: validation, resolution, feature
/// extraction and classification.
#[derive(Debug, Clone)]
pub struct Analyzer {
    resolver: Resolver,
    classifier: Option<Arc<dyn Classifier>>,
}

impl Analyzer {
    /// `classifier` is `None` when the model failed to load at startup; every
    /// request is then answered with [`ServiceError::ModelNotLoaded`].
    pub fn new(resolver: Resolver, classifier: Option<Arc<dyn Classifier>>) -> Self {
        Self {
            resolver,
            classifier,
        }
    }

    pub fn has_model(&self) -> bool {
        self.classifier.is_some()
    }

    /// Trimmed URL of a well-formed request
    pub fn validate(request: &AnalyzeRequest) -> Result<String, ServiceError> {
        let url = request.url.as_deref().ok_or(ServiceError::MissingUrl)?.trim();
        if url.is_empty() {
            return Err(ServiceError::EmptyUrl);
        }
        Ok(url.to_string())
    }

    pub async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, ServiceError> {
        let url = Self::validate(request)?;
        let classifier = self
            .classifier
            .as_deref()
            .ok_or(ServiceError::ModelNotLoaded)?;

        let bundle = self.resolver.resolve(&url).await;
        classify_bundle(classifier, &bundle).inspect_err(|e| {
            error!("Error processing {}: {}", url, e);
        })
    }
}

/// Extract features from an already resolved bundle and classify them.
pub fn classify_bundle(
    classifier: &dyn Classifier,
    bundle: &ResolvedBundle,
) -> Result<AnalyzeResponse, ServiceError> {
    let features = assemble(bundle).map_err(ServiceError::InvalidFeatures)?;

    let label = classifier.predict(&features)?;
    let probabilities = classifier.predict_probabilities(&features)?;

    info!("URL: {}", bundle.url);
    info!("Extracted features: {:?}", features.values());
    info!("Prediction probabilities: {:?}", probabilities);

    let &[phishing, safe] = probabilities.as_slice() else {
        return Err(ServiceError::InvalidProbabilities(probabilities.len()));
    };

    Ok(AnalyzeResponse {
        url: bundle.url.clone(),
        prediction: format_verdict(label, phishing, safe),
    })
}

/// Human-readable verdict, e.g. `Safe : 97.25%`
pub fn format_verdict(label: Label, p_phishing: f64, p_safe: f64) -> String {
    match label {
        Label::Safe => format!("Safe : {:.2}%", p_safe * 100.0),
        Label::Phishing => format!("Unsafe : {:.2}%", p_phishing * 100.0),
    }
}
