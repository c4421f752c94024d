//! Testing surface: scoped claim tracking and the verifying wrapper.
//!
//! A [`ClaimScope`] accumulates evidence for the duration of a code
//! block and verifies exactly once when the scope finishes. `Drop` is
//! the guaranteed finalizer: verification runs even while a panic
//! unwinds through the scope, and the result lands in the
//! [`ClaimHandle`], which stays readable afterwards.

use crate::algebra::Algebra;
use crate::error::ClaimFailure;
use crate::evidence::{Bindings, Evidence, Verdict, VerdictResult};
use crate::symbolic::Symbolic;
use crate::truth::Truth;
use crate::verifier::Verifier;
use claim_ast::Value;
use std::cell::RefCell;
use std::rc::Rc;

type ResultSlot = Rc<RefCell<Option<VerdictResult>>>;

/// Read side of a scoped claim. Populated once the scope finishes.
#[derive(Debug, Clone)]
pub struct ClaimHandle {
    slot: ResultSlot,
}

impl ClaimHandle {
    /// The verification result, once the scope has finished.
    pub fn result(&self) -> Option<VerdictResult> {
        self.slot.borrow().clone()
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.slot.borrow().as_ref().map(|r| r.verdict)
    }
}

/// Tracks a claim while a test runs. Bindings accumulate through
/// [`bind`](ClaimScope::bind) and [`observe`](ClaimScope::observe);
/// verification happens exactly once on scope exit.
#[derive(Debug)]
pub struct ClaimScope<A: Algebra = Symbolic> {
    truth: Truth,
    evidence: Evidence,
    verifier: Verifier<A>,
    slot: ResultSlot,
    finished: bool,
}

/// Open a scope for a claim with a default verifier.
///
/// # Example
///
/// ```
/// use claim_engine::{claim, Analytic, Verdict};
///
/// let (mut scope, handle) = claim(Analytic::new("2 + 2 equals 4", "result", 4));
/// scope.bind("result", 2 + 2);
/// drop(scope);
/// assert_eq!(handle.verdict(), Some(Verdict::Survived));
/// ```
pub fn claim(truth: impl Into<Truth>) -> (ClaimScope, ClaimHandle) {
    claim_with(Verifier::new(), truth)
}

/// Open a scope for a claim with a configured verifier.
pub fn claim_with<A: Algebra>(
    verifier: Verifier<A>,
    truth: impl Into<Truth>,
) -> (ClaimScope<A>, ClaimHandle) {
    let slot: ResultSlot = Rc::new(RefCell::new(None));
    let scope = ClaimScope {
        truth: truth.into(),
        evidence: Evidence::new().with_source("scoped claim"),
        verifier,
        slot: slot.clone(),
        finished: false,
    };
    (scope, ClaimHandle { slot })
}

impl<A: Algebra> ClaimScope<A> {
    /// Add a binding to the evidence.
    pub fn bind(&mut self, name: &str, value: impl Into<Value>) {
        self.evidence.bind(name, value);
    }

    /// Observe a value: record it as evidence and hand it back for
    /// inline chaining.
    pub fn observe(&mut self, name: &str, value: impl Into<Value>) -> Value {
        let value = value.into();
        self.evidence.bind(name, value.clone());
        value
    }

    /// Evidence gathered so far.
    pub fn evidence(&self) -> &Evidence {
        &self.evidence
    }

    /// Finish the scope now and take the result. Equivalent to
    /// dropping the scope and reading the handle.
    pub fn finish(mut self) -> VerdictResult {
        self.run_verification();
        self.slot
            .borrow()
            .clone()
            .unwrap_or_else(VerdictResult::uncertain)
    }

    fn run_verification(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        let result = self.verifier.verify(&self.truth, &self.evidence);
        *self.slot.borrow_mut() = Some(result);
    }
}

impl<A: Algebra> Drop for ClaimScope<A> {
    fn drop(&mut self) {
        // Runs during unwinding too: the verification guarantee holds
        // whether the block completed, returned early, or panicked.
        self.run_verification();
    }
}

// =============================================================================
// Verifying wrapper
// =============================================================================

/// What a verified test body hands back: a bindings map, a single
/// value (coerced to a binding named `result`), or nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum TestReturn {
    Bindings(Bindings),
    Single(Value),
    Empty,
}

impl From<Bindings> for TestReturn {
    fn from(bindings: Bindings) -> Self {
        TestReturn::Bindings(bindings)
    }
}

impl From<Value> for TestReturn {
    fn from(value: Value) -> Self {
        TestReturn::Single(value)
    }
}

impl From<()> for TestReturn {
    fn from(_: ()) -> Self {
        TestReturn::Empty
    }
}

impl From<i32> for TestReturn {
    fn from(n: i32) -> Self {
        TestReturn::Single(Value::from(n))
    }
}

impl From<i64> for TestReturn {
    fn from(n: i64) -> Self {
        TestReturn::Single(Value::from(n))
    }
}

impl From<f64> for TestReturn {
    fn from(f: f64) -> Self {
        TestReturn::Single(Value::from(f))
    }
}

impl From<bool> for TestReturn {
    fn from(b: bool) -> Self {
        TestReturn::Single(Value::from(b))
    }
}

impl From<&str> for TestReturn {
    fn from(s: &str) -> Self {
        TestReturn::Single(Value::from(s))
    }
}

/// Run a test body under a claim with a default verifier.
///
/// A KILLED verdict becomes [`ClaimFailure::Killed`]; unwrapping it in
/// a test reports like a normal assertion failure. SURVIVED passes the
/// result through; so does UNCERTAIN unless the verifier is strict.
///
/// # Example
///
/// ```
/// use claim_engine::{verified, Analytic};
///
/// let result = verified(Analytic::new("2 + 2 equals 4", "result", 4), || 2 + 2);
/// assert!(result.is_ok());
/// ```
pub fn verified<F, R>(truth: impl Into<Truth>, test_fn: F) -> Result<VerdictResult, ClaimFailure>
where
    F: FnOnce() -> R,
    R: Into<TestReturn>,
{
    verified_with(Verifier::new(), truth, test_fn)
}

/// Run a test body under a claim with a configured verifier.
pub fn verified_with<A, F, R>(
    verifier: Verifier<A>,
    truth: impl Into<Truth>,
    test_fn: F,
) -> Result<VerdictResult, ClaimFailure>
where
    A: Algebra,
    F: FnOnce() -> R,
    R: Into<TestReturn>,
{
    let truth = truth.into();

    let bindings = match test_fn().into() {
        TestReturn::Bindings(bindings) => bindings,
        TestReturn::Single(value) => Bindings::from([("result".to_string(), value)]),
        TestReturn::Empty => Bindings::new(),
    };
    let evidence = Evidence::from_bindings(bindings).with_source("test function");

    let result = verifier.verify(&truth, &evidence);
    match result.verdict {
        Verdict::Killed => Err(ClaimFailure::Killed {
            statement: truth.statement().to_string(),
            reasoning: result.reasoning.clone(),
            evidence: evidence.render_bindings(),
        }),
        Verdict::Uncertain if verifier.is_strict() => Err(ClaimFailure::Uncertain {
            statement: truth.statement().to_string(),
            reasoning: result.reasoning.clone(),
        }),
        _ => Ok(result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings;
    use crate::truth::Analytic;

    #[test]
    fn test_scope_verifies_on_drop() {
        let (mut scope, handle) = claim(Analytic::new("2 + 2 equals 4", "result", 4));
        scope.bind("result", 4);
        assert_eq!(handle.verdict(), None);
        drop(scope);
        assert_eq!(handle.verdict(), Some(Verdict::Survived));
    }

    #[test]
    fn test_observe_returns_value_for_chaining() {
        let (mut scope, _handle) = claim(Analytic::new("q", "result", 4));
        let seen = scope.observe("result", 4);
        assert_eq!(seen, Value::int(4));
        assert!(scope.evidence().contains("result"));
    }

    #[test]
    fn test_finish_verifies_once() {
        let (mut scope, handle) = claim(Analytic::new("q", "result", 4));
        scope.bind("result", 5);
        let result = scope.finish();
        assert_eq!(result.verdict, Verdict::Killed);
        assert_eq!(handle.verdict(), Some(Verdict::Killed));
    }

    #[test]
    fn test_verified_coerces_single_value() {
        let result = verified(Analytic::new("q", "result", 4), || 4).unwrap();
        assert_eq!(result.verdict, Verdict::Survived);
    }

    #[test]
    fn test_verified_accepts_bindings_map() {
        let result =
            verified(Analytic::new("q", "result", 4), || bindings! { "result" => 4 }).unwrap();
        assert_eq!(result.verdict, Verdict::Survived);
    }

    #[test]
    fn test_verified_killed_is_a_failure() {
        let err = verified(Analytic::new("2 + 2 equals 4", "result", 4), || 5).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("KILLED"));
        assert!(text.contains("2 + 2 equals 4"));
    }

    #[test]
    fn test_strict_upgrades_uncertain() {
        let strict = Verifier::new().strict(true);
        let err = verified_with(strict, Analytic::new("q", "result", 4), || ()).unwrap_err();
        assert!(err.to_string().contains("UNCERTAIN"));

        // Non-strict passes the uncertain result through
        let ok = verified(Analytic::new("q", "result", 4), || ()).unwrap();
        assert_eq!(ok.verdict, Verdict::Uncertain);
    }
}
