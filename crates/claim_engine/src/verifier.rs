//! Verification engine.
//!
//! One verification is a per-call state machine:
//! form construction → evidence completeness check → evaluation →
//! verdict. Missing evidence short-circuits to UNCERTAIN before any
//! evaluation work. Every step appends to the result trace.

use crate::algebra::Algebra;
use crate::evidence::{Bindings, Evidence, Verdict, VerdictResult};
use crate::symbolic::Symbolic;
use crate::truth::Truth;
use claim_ast::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Controls which evaluation path the verifier takes.
///
/// - `DirectFirst` (default): try the variant-specific direct check,
///   fall back to symbolic evaluation when it yields no decision
/// - `SymbolicOnly`: always substitute and simplify symbolically
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EvalMode {
    /// Direct evaluation sidesteps quantifier representation limits for
    /// Analytic and Modal claims.
    #[default]
    DirectFirst,

    /// Pure symbolic pipeline: substitute evidence, simplify, map the
    /// outcome.
    SymbolicOnly,
}

/// Engine for verifying truths against evidence.
///
/// # Example
///
/// ```
/// use claim_engine::{bindings, Analytic, Evidence, Verdict, Verifier};
///
/// let truth = Analytic::new("2 + 2 equals 4", "result", 4).into();
/// let evidence = Evidence::from_bindings(bindings! { "result" => 4 });
/// let result = Verifier::new().verify(&truth, &evidence);
/// assert_eq!(result.verdict, Verdict::Survived);
/// ```
#[derive(Debug, Default)]
pub struct Verifier<A: Algebra = Symbolic> {
    algebra: A,
    mode: EvalMode,
    strict: bool,
}

impl Verifier<Symbolic> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A: Algebra> Verifier<A> {
    /// Verifier over a custom algebra backend.
    pub fn with_algebra(algebra: A) -> Self {
        Verifier {
            algebra,
            mode: EvalMode::default(),
            strict: false,
        }
    }

    pub fn with_mode(mut self, mode: EvalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Strict mode upgrades UNCERTAIN to a failure in the `verified`
    /// wrapper path only. `verify` itself is unaffected.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn algebra(&self) -> &A {
        &self.algebra
    }

    /// Perform complete verification of a truth against evidence.
    ///
    /// Always returns a result object; nothing on this path fails hard.
    pub fn verify(&self, truth: &Truth, evidence: &Evidence) -> VerdictResult {
        let mut result = VerdictResult::uncertain();

        // Step 1: falsification form
        result.add_trace(format!(
            "Constructing falsification form for: {}",
            truth.statement()
        ));
        let form = truth.falsify();
        debug!(form = %form.description, "constructed falsification form");
        result.add_trace(format!("Falsification form: {}", form.description));

        // Step 2: evidence completeness
        result.add_trace(format!("Evidence bindings: {}", evidence.render_bindings()));
        let missing = form.missing_from(&self.algebra, evidence);
        result.form = Some(form.clone());
        result.evidence = Some(evidence.clone());

        if !missing.is_empty() {
            let names = missing.join(", ");
            result.reasoning = format!("Missing evidence for: {{{}}}", names);
            result.add_trace(format!("Cannot evaluate: missing {{{}}}", names));
            return result;
        }

        // Step 3: direct evaluation
        if self.mode == EvalMode::DirectFirst {
            if let Some(direct) = self.evaluate_directly(truth, evidence) {
                result.add_trace(format!("Direct evaluation result: {}", direct));
                self.assign_verdict(&mut result, Some(direct), None);
                return result;
            }
        }

        // Step 4: symbolic fallback
        let substituted = self
            .algebra
            .substitute(&form.formula, &form.bindings_for(&self.algebra, evidence));
        let rendered = self.algebra.render(&substituted);
        result.add_trace(format!("Substituted formula: {}", rendered));

        let outcome = self.algebra.simplify(&substituted);
        result.add_trace(format!(
            "Evaluation result: {}",
            match outcome {
                Some(b) => b.to_string(),
                None => "undetermined".to_string(),
            }
        ));

        // Step 5: verdict
        self.assign_verdict(&mut result, outcome, Some(rendered));
        result
    }

    /// Direct evaluation for Analytic and Modal claims, bypassing the
    /// symbolic pipeline.
    ///
    /// # Returns
    /// - `Some(true)` if the falsification condition is met (KILLED)
    /// - `Some(false)` if it is not met (SURVIVED)
    /// - `None` if this path does not apply
    fn evaluate_directly(&self, truth: &Truth, evidence: &Evidence) -> Option<bool> {
        match truth {
            Truth::Analytic(t) => {
                // Only a bare variable lhs can be looked up directly.
                let name = t.lhs.var_name()?;
                let actual = evidence.get(name)?;
                // Falsification: actual ≠ expected.
                Some(actual != &t.rhs)
            }
            Truth::Modal(t) => {
                let state = evidence.get(&t.state_var)?;
                // Substitute only the state variable; anything else in
                // the invariant keeps this path undetermined.
                let bindings =
                    BTreeMap::from([(self.algebra.sym(&t.state_var), state.clone())]);
                let substituted = self.algebra.substitute(&t.invariant, &bindings);
                self.algebra.simplify(&substituted).map(|holds| !holds)
            }
            _ => None,
        }
    }

    fn assign_verdict(
        &self,
        result: &mut VerdictResult,
        outcome: Option<bool>,
        unresolved: Option<String>,
    ) {
        let description = result
            .form
            .as_ref()
            .map(|f| f.description.clone())
            .unwrap_or_default();
        match outcome {
            Some(true) => {
                result.verdict = Verdict::Killed;
                result.reasoning = format!("Falsification condition met: {}", description);
            }
            Some(false) => {
                result.verdict = Verdict::Survived;
                result.reasoning =
                    "Falsification condition not met with given evidence".to_string();
            }
            None => {
                result.verdict = Verdict::Uncertain;
                result.reasoning = match unresolved {
                    Some(formula) => format!("Could not evaluate formula: {}", formula),
                    None => "Could not evaluate falsification condition".to_string(),
                };
            }
        }
        debug!(verdict = %result.verdict, "verdict assigned");
    }

    /// Verify a truth through its built-in predicate check.
    ///
    /// Empirical truths check the observation, Probabilistic truths
    /// check the threshold. Predicate errors are caught here and become
    /// UNCERTAIN; they never propagate.
    pub fn verify_with_predicate(&self, truth: &Truth, value: &Value) -> VerdictResult {
        let mut result = VerdictResult::uncertain();
        result.add_trace(format!(
            "Checking {} with value: {}",
            truth.statement(),
            value
        ));
        result.evidence = Some(Evidence::from_bindings(BTreeMap::from([(
            "value".to_string(),
            value.clone(),
        )])));

        let checked = match truth {
            Truth::Empirical(t) => t.check_observation(value),
            Truth::Probabilistic(t) => t.check_threshold(value),
            _ => {
                result.reasoning = "Truth has no predicate-based check".to_string();
                return result;
            }
        };

        let form = truth.falsify();
        result.form = Some(form.clone());

        match checked {
            Ok(outcome) => {
                result.add_trace(format!("Predicate result: {}", outcome));
                if outcome {
                    result.verdict = Verdict::Survived;
                    result.reasoning = format!("Value {} satisfies predicate", value);
                } else {
                    result.verdict = Verdict::Killed;
                    result.reasoning =
                        format!("Value {} violates predicate: {}", value, form.description);
                }
            }
            Err(error) => {
                result.verdict = Verdict::Uncertain;
                result.reasoning = format!("Predicate evaluation failed: {}", error);
            }
        }
        result
    }
}

/// Verify a truth against evidence with a default verifier.
pub fn falsify(truth: &Truth, evidence: &Evidence) -> VerdictResult {
    Verifier::new().verify(truth, evidence)
}

/// Quick check of a truth with literal bindings; returns just the
/// verdict.
pub fn quick_check(truth: &Truth, bindings: Bindings) -> Verdict {
    falsify(truth, &Evidence::from_bindings(bindings)).verdict
}
