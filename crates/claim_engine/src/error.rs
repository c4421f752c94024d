use thiserror::Error;

/// Failures inside predicate-based verification paths.
///
/// These never escape the engine: `verify_with_predicate` catches them
/// and converts them to an UNCERTAIN verdict with the message embedded
/// in the reasoning.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("predicate evaluation failed: {0}")]
    Predicate(String),
    #[error("expected a numeric value, got {0} ({1})")]
    NonNumeric(String, &'static str),
}

/// The one failure that escapes the engine: a verified test whose claim
/// did not survive. Only the `verified` wrapper produces this; `verify`
/// and `falsify` always return a `VerdictResult`.
///
/// The `Display` text carries statement, reasoning and evidence so a
/// host test runner reports it like any assertion failure.
#[derive(Error, Debug, Clone)]
pub enum ClaimFailure {
    #[error("Claim KILLED: {statement}\nReasoning: {reasoning}\nEvidence: {evidence}")]
    Killed {
        statement: String,
        reasoning: String,
        evidence: String,
    },
    /// Raised instead of passing through only when the verifier is strict.
    #[error("Claim UNCERTAIN: {statement}\nReasoning: {reasoning}")]
    Uncertain {
        statement: String,
        reasoning: String,
    },
}
