//! Evidence and verdict data structures.
//!
//! - [`Evidence`]: concrete bindings for formula variables
//! - [`Verdict`]: the three possible outcomes of falsification
//! - [`VerdictResult`]: the complete result of one verification

use crate::truth::FalsificationForm;
use claim_ast::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Variable name to concrete value mappings.
pub type Bindings = BTreeMap<String, Value>;

/// Build a [`Bindings`] map from literal pairs.
///
/// ```
/// use claim_engine::bindings;
/// let b = bindings! { "result" => 4, "accuracy" => 0.75 };
/// assert_eq!(b.len(), 2);
/// ```
#[macro_export]
macro_rules! bindings {
    () => { $crate::Bindings::new() };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::Bindings::new();
        $( map.insert($name.to_string(), $crate::Value::from($value)); )+
        map
    }};
}

/// The outcome of a falsification attempt.
///
/// KILLED and SURVIVED are mutually exclusive and both mean the
/// falsification condition was fully evaluable. UNCERTAIN means the
/// evidence was incomplete or the formula did not reduce to a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Falsification criteria met, the claim is false.
    Killed,
    /// Criteria not met with valid evidence, the claim held up.
    Survived,
    /// Inconclusive: evidence missing or evaluation undetermined.
    Uncertain,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Killed => write!(f, "KILLED"),
            Verdict::Survived => write!(f, "SURVIVED"),
            Verdict::Uncertain => write!(f, "UNCERTAIN"),
        }
    }
}

/// Concrete evidence for falsification: bindings plus metadata about
/// how they were gathered.
///
/// Mutable while a scoped claim accumulates bindings; the engine only
/// reads it.
#[derive(Debug, Clone, Default)]
pub struct Evidence {
    /// Variable name to concrete value mappings.
    pub bindings: Bindings,
    /// Description of how evidence was gathered.
    pub source: String,
    /// Additional metadata about the evidence.
    pub metadata: BTreeMap<String, String>,
}

impl Evidence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bindings(bindings: Bindings) -> Self {
        Evidence {
            bindings,
            ..Default::default()
        }
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    /// Add one binding.
    pub fn bind(&mut self, name: &str, value: impl Into<Value>) {
        self.bindings.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Deterministic one-line rendering of the bindings, used in traces
    /// and failure messages.
    pub fn render_bindings(&self) -> String {
        let inner = self
            .bindings
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{{{}}}", inner)
    }
}

/// The complete result of a verification attempt: verdict, the form
/// that was evaluated, the evidence used, and the reasoning trace.
#[derive(Debug, Clone)]
pub struct VerdictResult {
    pub verdict: Verdict,
    /// The falsification form that was evaluated.
    pub form: Option<FalsificationForm>,
    /// The evidence that was gathered.
    pub evidence: Option<Evidence>,
    /// Step-by-step trace of the verification process. Append-only;
    /// kept for auditability, not just debugging.
    pub trace: Vec<String>,
    /// Human-readable explanation of why this verdict was reached.
    pub reasoning: String,
    /// Descriptions of follow-on claims suggested by this verification.
    /// The engine never writes this; callers and tooling do.
    pub mutations: Vec<String>,
}

impl VerdictResult {
    /// Fresh result in the initial UNCERTAIN state.
    pub fn uncertain() -> Self {
        VerdictResult {
            verdict: Verdict::Uncertain,
            form: None,
            evidence: None,
            trace: Vec::new(),
            reasoning: String::new(),
            mutations: Vec::new(),
        }
    }

    /// Add a step to the trace.
    pub fn add_trace(&mut self, step: impl Into<String>) {
        self.trace.push(step.into());
    }

    /// Record a follow-on claim description.
    pub fn add_mutation(&mut self, description: impl Into<String>) {
        self.mutations.push(description.into());
    }
}

impl fmt::Display for VerdictResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Verdict: {}", self.verdict)?;
        if !self.reasoning.is_empty() {
            write!(f, "\nReasoning: {}", self.reasoning)?;
        }
        if let Some(evidence) = &self.evidence {
            if !evidence.bindings.is_empty() {
                write!(f, "\nEvidence: {}", evidence.render_bindings())?;
            }
        }
        Ok(())
    }
}
