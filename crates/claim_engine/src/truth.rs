//! Truth variants and falsification-form construction.
//!
//! A claim is represented by the condition that would disprove it, not
//! by the condition that proves it. Verification is then a uniform
//! "did we find the witness?" test over one evidence binding.
//!
//! The variant set is closed: the engine dispatches on [`Truth`] with
//! `match`, never by probing structure.

use crate::algebra::{Algebra, SymbolBindings};
use crate::error::EngineError;
use crate::evidence::Evidence;
use claim_ast::symbol::SymbolId;
use claim_ast::{Expr, Formula, RelOp, Value};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

/// A formula that, if satisfied, falsifies a claim.
///
/// Produced fresh by each `falsify()` call. `free_symbols` are the
/// variables that require bindings before the formula can evaluate.
#[derive(Debug, Clone, PartialEq)]
pub struct FalsificationForm {
    pub formula: Formula,
    pub free_symbols: BTreeSet<SymbolId>,
    /// Human-readable description of what satisfies this form.
    pub description: String,
}

impl FalsificationForm {
    pub fn new(formula: Formula, description: String) -> Self {
        let free_symbols = formula.free_symbols();
        FalsificationForm {
            formula,
            free_symbols,
            description,
        }
    }

    /// Names of required variables the evidence does not bind, sorted.
    pub fn missing_from<A: Algebra>(&self, algebra: &A, evidence: &Evidence) -> Vec<String> {
        let mut missing: Vec<String> = self
            .free_symbols
            .iter()
            .map(|&id| algebra.name_of(id))
            .filter(|name| !evidence.contains(name))
            .collect();
        missing.sort();
        missing
    }

    /// Bindings for this form's free symbols, keyed by interned id.
    /// Unbound symbols are simply absent.
    pub fn bindings_for<A: Algebra>(&self, algebra: &A, evidence: &Evidence) -> SymbolBindings {
        self.free_symbols
            .iter()
            .filter_map(|&id| {
                evidence
                    .get(&algebra.name_of(id))
                    .map(|value| (id, value.clone()))
            })
            .collect()
    }

    /// Check the falsification condition directly, bypassing the engine.
    ///
    /// # Returns
    /// - `Some(true)` if the condition is met (claim would be KILLED)
    /// - `Some(false)` if it is not met
    /// - `None` if it cannot be determined
    pub fn check<A: Algebra>(&self, algebra: &A, evidence: &Evidence) -> Option<bool> {
        let substituted = algebra.substitute(&self.formula, &self.bindings_for(algebra, evidence));
        algebra.simplify(&substituted)
    }
}

/// Left-hand side of an analytic claim: a bare variable name or a full
/// expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Lhs {
    Var(String),
    Expr(Rc<Expr>),
}

impl Lhs {
    /// The variable name, when the lhs is a bare variable.
    pub fn var_name(&self) -> Option<&str> {
        match self {
            Lhs::Var(name) => Some(name),
            Lhs::Expr(_) => None,
        }
    }

    pub fn to_expr(&self) -> Rc<Expr> {
        match self {
            Lhs::Var(name) => Expr::sym(name),
            Lhs::Expr(e) => e.clone(),
        }
    }
}

impl From<&str> for Lhs {
    fn from(name: &str) -> Self {
        Lhs::Var(name.to_string())
    }
}

impl From<Rc<Expr>> for Lhs {
    fn from(expr: Rc<Expr>) -> Self {
        Lhs::Expr(expr)
    }
}

impl fmt::Display for Lhs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lhs::Var(name) => write!(f, "{}", name),
            Lhs::Expr(e) => write!(f, "{}", e),
        }
    }
}

/// An analytic truth: an equality claim falsified by counterexample.
///
/// "f(x) = y" dies the moment evidence shows `lhs ≠ rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Analytic {
    /// Human-readable statement of the equality claim.
    pub statement: String,
    /// The computed/actual side: a variable name or an expression.
    pub lhs: Lhs,
    /// The expected value.
    pub rhs: Value,
    /// Name for the free variable in the form description. Display
    /// only: the substituted variable is `lhs`, and the two knobs are
    /// deliberately independent.
    pub var_name: String,
}

impl Analytic {
    pub fn new(statement: &str, lhs: impl Into<Lhs>, rhs: impl Into<Value>) -> Self {
        Analytic {
            statement: statement.to_string(),
            lhs: lhs.into(),
            rhs: rhs.into(),
            var_name: "x".to_string(),
        }
    }

    pub fn with_var_name(mut self, var_name: &str) -> Self {
        self.var_name = var_name.to_string();
        self
    }

    /// Falsification: `lhs ≠ rhs`.
    pub fn falsify(&self) -> FalsificationForm {
        let formula = Formula::not_equals(self.lhs.to_expr(), Expr::lit(self.rhs.clone()));
        FalsificationForm::new(
            formula,
            format!("Find {} where {} ≠ {}", self.var_name, self.lhs, self.rhs),
        )
    }
}

/// A modal truth: a necessity claim falsified by a possible violation.
///
/// "P necessarily holds" dies on a state where ¬P.
#[derive(Debug, Clone, PartialEq)]
pub struct Modal {
    /// Human-readable statement of the invariant claim.
    pub statement: String,
    /// The property P that must hold.
    pub invariant: Formula,
    /// Name of the state variable bound by the direct evaluation path.
    pub state_var: String,
}

impl Modal {
    pub fn new(statement: &str, invariant: Formula) -> Self {
        Modal {
            statement: statement.to_string(),
            invariant,
            state_var: "state".to_string(),
        }
    }

    pub fn with_state_var(mut self, state_var: &str) -> Self {
        self.state_var = state_var.to_string();
        self
    }

    /// Falsification: `¬P` (invariant violated).
    pub fn falsify(&self) -> FalsificationForm {
        let description = format!("Find {} where ¬({})", self.state_var, self.invariant);
        FalsificationForm::new(Formula::not(self.invariant.clone()), description)
    }
}

/// Fallible predicate over an observed value. Errors are caught by the
/// engine and become UNCERTAIN verdicts; they never propagate.
pub type ObservationPredicate = Rc<dyn Fn(&Value) -> Result<bool, EngineError>>;

/// An empirical truth: an observation-based claim.
///
/// Falsification is symbolic (`Contradicts(observation)`); concrete
/// verification goes through [`Empirical::check_observation`].
#[derive(Clone)]
pub struct Empirical {
    /// Human-readable statement of the empirical claim.
    pub statement: String,
    /// Name for the observation variable.
    pub observation_var: String,
    predicate: Option<ObservationPredicate>,
    /// Description of what would contradict this claim.
    pub contradiction_description: String,
}

impl Empirical {
    pub fn new(statement: &str) -> Self {
        Empirical {
            statement: statement.to_string(),
            observation_var: "observation".to_string(),
            predicate: None,
            contradiction_description: String::new(),
        }
    }

    pub fn with_observation_var(mut self, name: &str) -> Self {
        self.observation_var = name.to_string();
        self
    }

    /// Predicate that observations should satisfy.
    pub fn with_predicate(mut self, predicate: impl Fn(&Value) -> bool + 'static) -> Self {
        self.predicate = Some(Rc::new(move |v| Ok(predicate(v))));
        self
    }

    /// Predicate that may fail; failures surface as UNCERTAIN.
    pub fn with_fallible_predicate(
        mut self,
        predicate: impl Fn(&Value) -> Result<bool, EngineError> + 'static,
    ) -> Self {
        self.predicate = Some(Rc::new(predicate));
        self
    }

    pub fn with_contradiction(mut self, description: &str) -> Self {
        self.contradiction_description = description.to_string();
        self
    }

    /// Falsification: `Contradicts(observation)`, symbolic only.
    pub fn falsify(&self) -> FalsificationForm {
        let formula = Formula::pred("Contradicts", vec![Expr::sym(&self.observation_var)]);
        let description = if self.contradiction_description.is_empty() {
            format!("Find {} that contradicts claim", self.observation_var)
        } else {
            self.contradiction_description.clone()
        };
        FalsificationForm::new(formula, description)
    }

    /// Check whether an observation satisfies the claim.
    /// No predicate means any observation is ok.
    pub fn check_observation(&self, value: &Value) -> Result<bool, EngineError> {
        match &self.predicate {
            None => Ok(true),
            Some(predicate) => predicate(value),
        }
    }
}

impl fmt::Debug for Empirical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Empirical")
            .field("statement", &self.statement)
            .field("observation_var", &self.observation_var)
            .field("predicate", &self.predicate.as_ref().map(|_| "<predicate>"))
            .field(
                "contradiction_description",
                &self.contradiction_description,
            )
            .finish()
    }
}

/// A probabilistic truth: a threshold claim over a measured metric.
#[derive(Debug, Clone, PartialEq)]
pub struct Probabilistic {
    /// Human-readable statement of the probabilistic claim.
    pub statement: String,
    /// Name of the metric being measured.
    pub metric: String,
    /// The threshold value.
    pub threshold: f64,
    /// Comparison direction. Supported: >, >=, <, <=, =.
    /// Anything else degenerates to equality.
    pub direction: RelOp,
}

impl Probabilistic {
    pub fn new(statement: &str) -> Self {
        Probabilistic {
            statement: statement.to_string(),
            metric: "value".to_string(),
            threshold: 0.5,
            direction: RelOp::Gt,
        }
    }

    pub fn with_metric(mut self, metric: &str) -> Self {
        self.metric = metric.to_string();
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_direction(mut self, direction: RelOp) -> Self {
        self.direction = direction;
        self
    }

    fn effective_direction(&self) -> RelOp {
        match self.direction {
            RelOp::Gt | RelOp::Geq | RelOp::Lt | RelOp::Leq => self.direction,
            _ => RelOp::Eq,
        }
    }

    /// Falsification: `¬(metric <direction> threshold)`.
    pub fn falsify(&self) -> FalsificationForm {
        let direction = self.effective_direction();
        let expected = Formula::rel(
            Expr::sym(&self.metric),
            direction,
            Expr::float(self.threshold),
        );
        let description = format!(
            "Find {} where ¬({} {} {})",
            self.metric, self.metric, direction, self.threshold
        );
        FalsificationForm::new(Formula::not(expected), description)
    }

    /// Check whether a measured value satisfies the threshold.
    ///
    /// For `>`, a value equal to the threshold fails; for `>=` it
    /// passes.
    pub fn check_threshold(&self, value: &Value) -> Result<bool, EngineError> {
        let v = value
            .as_f64()
            .ok_or_else(|| EngineError::NonNumeric(value.to_string(), value.kind()))?;
        Ok(match self.effective_direction() {
            RelOp::Gt => v > self.threshold,
            RelOp::Geq => v >= self.threshold,
            RelOp::Lt => v < self.threshold,
            RelOp::Leq => v <= self.threshold,
            _ => v == self.threshold,
        })
    }
}

/// A typed claim that can be disproved by evidence.
#[derive(Debug, Clone)]
pub enum Truth {
    Analytic(Analytic),
    Modal(Modal),
    Empirical(Empirical),
    Probabilistic(Probabilistic),
}

impl Truth {
    /// Human-readable statement of the claim.
    pub fn statement(&self) -> &str {
        match self {
            Truth::Analytic(t) => &t.statement,
            Truth::Modal(t) => &t.statement,
            Truth::Empirical(t) => &t.statement,
            Truth::Probabilistic(t) => &t.statement,
        }
    }

    /// Construct the falsification form for this truth.
    ///
    /// Pure and deterministic given the claim's fields.
    pub fn falsify(&self) -> FalsificationForm {
        match self {
            Truth::Analytic(t) => t.falsify(),
            Truth::Modal(t) => t.falsify(),
            Truth::Empirical(t) => t.falsify(),
            Truth::Probabilistic(t) => t.falsify(),
        }
    }
}

impl From<Analytic> for Truth {
    fn from(t: Analytic) -> Self {
        Truth::Analytic(t)
    }
}

impl From<Modal> for Truth {
    fn from(t: Modal) -> Self {
        Truth::Modal(t)
    }
}

impl From<Empirical> for Truth {
    fn from(t: Empirical) -> Self {
        Truth::Empirical(t)
    }
}

impl From<Probabilistic> for Truth {
    fn from(t: Probabilistic) -> Self {
        Truth::Probabilistic(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::Symbolic;

    #[test]
    fn test_analytic_form() {
        let truth = Analytic::new("add(2, 2) equals 4", "result", 4);
        let form = truth.falsify();
        assert_eq!(
            form.formula,
            Formula::not_equals(Expr::sym("result"), Expr::num(4))
        );
        assert_eq!(form.description, "Find x where result ≠ 4");
        assert_eq!(form.free_symbols.len(), 1);
    }

    #[test]
    fn test_analytic_var_name_is_display_only() {
        let truth = Analytic::new("q", "result", 4).with_var_name("observation");
        let form = truth.falsify();
        // var_name changes the description, never the substituted variable
        assert_eq!(form.description, "Find observation where result ≠ 4");
        assert_eq!(
            form.formula,
            Formula::not_equals(Expr::sym("result"), Expr::num(4))
        );
    }

    #[test]
    fn test_modal_form() {
        let invariant = Formula::rel(Expr::sym("state"), RelOp::Geq, Expr::num(0));
        let truth = Modal::new("state stays non-negative", invariant.clone());
        let form = truth.falsify();
        assert_eq!(form.formula, Formula::not(invariant));
        assert_eq!(form.description, "Find state where ¬(state >= 0)");
    }

    #[test]
    fn test_empirical_defaults() {
        let truth = Empirical::new("endpoint responds");
        let form = truth.falsify();
        assert_eq!(
            form.description,
            "Find observation that contradicts claim"
        );
        assert_eq!(truth.check_observation(&Value::int(500)), Ok(true));
    }

    #[test]
    fn test_probabilistic_threshold_boundary() {
        let gt = Probabilistic::new("accuracy > 0.6")
            .with_metric("accuracy")
            .with_threshold(0.6);
        assert_eq!(gt.check_threshold(&Value::Float(0.6)), Ok(false));

        let geq = gt.clone().with_direction(RelOp::Geq);
        assert_eq!(geq.check_threshold(&Value::Float(0.6)), Ok(true));
    }

    #[test]
    fn test_probabilistic_neq_degenerates_to_equality() {
        let truth = Probabilistic::new("p = 0.5").with_direction(RelOp::Neq);
        assert_eq!(truth.check_threshold(&Value::Float(0.5)), Ok(true));
        assert_eq!(truth.check_threshold(&Value::Float(0.4)), Ok(false));
    }

    #[test]
    fn test_form_check_bypasses_engine() {
        let alg = Symbolic;
        let form = Analytic::new("2 + 2 equals 4", "result", 4).falsify();

        let survived = Evidence::from_bindings(crate::bindings! { "result" => 4 });
        assert_eq!(form.check(&alg, &survived), Some(false));

        let killed = Evidence::from_bindings(crate::bindings! { "result" => 5 });
        assert_eq!(form.check(&alg, &killed), Some(true));
    }
}
