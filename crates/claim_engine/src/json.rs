//! JSON DTOs for verdict reports.
//!
//! Transport models stay independent from engine internals: everything
//! is flattened to strings at the boundary.

use crate::evidence::VerdictResult;
use serde::Serialize;
use std::collections::BTreeMap;

/// Stable schema version for JSON outputs.
pub const SCHEMA_VERSION: u8 = 1;

/// A complete verification result, flattened for transport.
#[derive(Serialize, Debug, Clone)]
pub struct VerdictReportJson {
    pub schema_version: u8,
    pub verdict: String,
    pub reasoning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_description: Option<String>,
    pub evidence: BTreeMap<String, String>,
    pub trace: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mutations: Vec<String>,
}

impl VerdictReportJson {
    pub fn from_result(result: &VerdictResult) -> Self {
        VerdictReportJson {
            schema_version: SCHEMA_VERSION,
            verdict: result.verdict.to_string(),
            reasoning: result.reasoning.clone(),
            form_description: result.form.as_ref().map(|f| f.description.clone()),
            evidence: result
                .evidence
                .as_ref()
                .map(|e| {
                    e.bindings
                        .iter()
                        .map(|(k, v)| (k.clone(), v.to_string()))
                        .collect()
                })
                .unwrap_or_default(),
            trace: result.trace.clone(),
            mutations: result.mutations.clone(),
        }
    }
}

impl From<&VerdictResult> for VerdictReportJson {
    fn from(result: &VerdictResult) -> Self {
        Self::from_result(result)
    }
}
