//! Domain-specific truths.
//!
//! A domain truth is never evaluated itself: it translates onto one of
//! the four base variants and produces evidence under the base
//! variant's expected variable names. The engine never special-cases
//! domain truths.

use crate::evidence::Evidence;
use crate::truth::{Analytic, Empirical, Modal, Probabilistic, Truth};
use claim_ast::{Formula, RelOp, Value};

/// A domain-specific claim type that knows how to convert itself to a
/// base truth and how to extract bindings from domain data.
pub trait DomainTruth {
    /// The domain data this truth binds evidence from (an HTTP
    /// response, a model evaluation, a state snapshot).
    type Observation;

    /// The domain this truth type belongs to (e.g. "api", "ml").
    fn domain(&self) -> &'static str;

    /// Convert to one of: Analytic, Modal, Empirical, Probabilistic.
    fn to_base_truth(&self) -> Truth;

    /// Create evidence from domain-specific data, using the base
    /// variant's expected variable names.
    fn bind(&self, observation: Self::Observation) -> Evidence;
}

/// HTTP endpoint returns the expected status code.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpStatus {
    pub endpoint: String,
    pub expected_status: u16,
}

impl HttpStatus {
    pub fn new(endpoint: &str, expected_status: u16) -> Self {
        HttpStatus {
            endpoint: endpoint.to_string(),
            expected_status,
        }
    }
}

impl DomainTruth for HttpStatus {
    type Observation = u16;

    fn domain(&self) -> &'static str {
        "api"
    }

    fn to_base_truth(&self) -> Truth {
        Analytic::new(
            &format!("GET {} returns {}", self.endpoint, self.expected_status),
            "status_code",
            i64::from(self.expected_status),
        )
        .with_var_name("response")
        .into()
    }

    fn bind(&self, status_code: u16) -> Evidence {
        let mut evidence =
            Evidence::new().with_source(&format!("HTTP {}", self.endpoint));
        evidence.bind("status_code", i64::from(status_code));
        evidence
    }
}

/// Model achieves at least a threshold accuracy.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelAccuracy {
    pub model_name: String,
    /// Minimum required accuracy (0.0 to 1.0).
    pub threshold: f64,
}

impl ModelAccuracy {
    pub fn new(model_name: &str, threshold: f64) -> Self {
        ModelAccuracy {
            model_name: model_name.to_string(),
            threshold,
        }
    }
}

impl DomainTruth for ModelAccuracy {
    type Observation = f64;

    fn domain(&self) -> &'static str {
        "ml"
    }

    fn to_base_truth(&self) -> Truth {
        Probabilistic::new(&format!(
            "{} accuracy >= {}",
            self.model_name, self.threshold
        ))
        .with_metric("accuracy")
        .with_threshold(self.threshold)
        .with_direction(RelOp::Geq)
        .into()
    }

    fn bind(&self, accuracy: f64) -> Evidence {
        let mut evidence = Evidence::new()
            .with_source(&format!("model evaluation: {}", self.model_name));
        evidence.bind("accuracy", accuracy);
        evidence
    }
}

/// A property holds over the observed state.
#[derive(Debug, Clone, PartialEq)]
pub struct StateInvariant {
    pub property_name: String,
    /// The predicate that must hold, over the `state` variable.
    pub predicate: Formula,
}

impl StateInvariant {
    pub fn new(property_name: &str, predicate: Formula) -> Self {
        StateInvariant {
            property_name: property_name.to_string(),
            predicate,
        }
    }
}

impl DomainTruth for StateInvariant {
    type Observation = Value;

    fn domain(&self) -> &'static str {
        "state"
    }

    fn to_base_truth(&self) -> Truth {
        Modal::new(
            &format!("{} holds", self.property_name),
            self.predicate.clone(),
        )
        .into()
    }

    fn bind(&self, state: Value) -> Evidence {
        let mut evidence = Evidence::new()
            .with_source(&format!("invariant check: {}", self.property_name));
        evidence.bind("state", state);
        evidence
    }
}

/// A claim has supporting evidence or documentation.
#[derive(Debug, Clone, PartialEq)]
pub struct DataGrounding {
    pub claim: String,
    /// Type of evidence expected (e.g. "test", "doc", "citation").
    pub evidence_type: String,
}

impl DataGrounding {
    pub fn new(claim: &str, evidence_type: &str) -> Self {
        DataGrounding {
            claim: claim.to_string(),
            evidence_type: evidence_type.to_string(),
        }
    }
}

impl DomainTruth for DataGrounding {
    type Observation = String;

    fn domain(&self) -> &'static str {
        "grounding"
    }

    fn to_base_truth(&self) -> Truth {
        Empirical::new(&format!(
            "{} has {} support",
            self.claim, self.evidence_type
        ))
        .with_observation_var("support")
        .with_predicate(|support| match support {
            // Empty support text is exactly what contradicts grounding.
            Value::Text(s) => !s.is_empty(),
            _ => true,
        })
        .with_contradiction(&format!(
            "No {} found for: {}",
            self.evidence_type, self.claim
        ))
        .into()
    }

    fn bind(&self, support: String) -> Evidence {
        let mut evidence = Evidence::new()
            .with_source(&format!("grounding check: {}", self.evidence_type));
        evidence.bind("support", support);
        evidence
    }
}
