//! Default symbolic evaluator.
//!
//! Substitution replaces interned symbols with literal values.
//! Simplification folds relation sides to concrete values and applies
//! three-valued logic to the connectives: a connective with an
//! undetermined operand is itself undetermined unless another operand
//! already decides it. Uninterpreted predicates never simplify.
//!
//! # Contract
//!
//! - Exact arithmetic: rationals fold with `BigRational`, floats fold
//!   in f64 so IEEE semantics survive
//! - Safe edge cases: division by zero, `0^0`, `0^(-n)` → undetermined
//! - Bounded: `MAX_ABS_POW` prevents materialization explosion

use crate::algebra::{Algebra, SymbolBindings};
use claim_ast::symbol::{self, SymbolId};
use claim_ast::{Expr, Formula, RelOp, Value};
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::rc::Rc;

/// Maximum absolute value for exponents folded exactly.
/// Larger powers stay symbolic.
pub const MAX_ABS_POW: i64 = 1000;

/// The default [`Algebra`] backend. Stateless; symbols live in the
/// process-wide interner.
#[derive(Debug, Clone, Copy, Default)]
pub struct Symbolic;

impl Algebra for Symbolic {
    fn sym(&self, name: &str) -> SymbolId {
        symbol::intern(name)
    }

    fn name_of(&self, id: SymbolId) -> String {
        symbol::resolve(id)
    }

    fn lookup(&self, name: &str) -> Option<SymbolId> {
        symbol::lookup(name)
    }

    fn substitute(&self, formula: &Formula, bindings: &SymbolBindings) -> Formula {
        subst_formula(formula, bindings)
    }

    fn simplify(&self, formula: &Formula) -> Option<bool> {
        simplify_formula(formula)
    }
}

// =============================================================================
// Substitution
// =============================================================================

fn subst_expr(expr: &Rc<Expr>, bindings: &SymbolBindings) -> Rc<Expr> {
    match &**expr {
        Expr::Sym(id) => match bindings.get(id) {
            Some(value) => Expr::lit(value.clone()),
            None => expr.clone(),
        },
        Expr::Lit(_) => expr.clone(),
        Expr::Add(l, r) => Expr::add(subst_expr(l, bindings), subst_expr(r, bindings)),
        Expr::Sub(l, r) => Expr::sub(subst_expr(l, bindings), subst_expr(r, bindings)),
        Expr::Mul(l, r) => Expr::mul(subst_expr(l, bindings), subst_expr(r, bindings)),
        Expr::Div(l, r) => Expr::div(subst_expr(l, bindings), subst_expr(r, bindings)),
        Expr::Pow(b, e) => Expr::pow(subst_expr(b, bindings), subst_expr(e, bindings)),
        Expr::Neg(e) => Expr::neg(subst_expr(e, bindings)),
        Expr::Func(name, args) => {
            Expr::func(name, args.iter().map(|a| subst_expr(a, bindings)).collect())
        }
    }
}

fn subst_formula(formula: &Formula, bindings: &SymbolBindings) -> Formula {
    match formula {
        Formula::Rel { lhs, op, rhs } => Formula::Rel {
            lhs: subst_expr(lhs, bindings),
            op: *op,
            rhs: subst_expr(rhs, bindings),
        },
        Formula::Not(inner) => Formula::not(subst_formula(inner, bindings)),
        Formula::And(items) => {
            Formula::And(items.iter().map(|f| subst_formula(f, bindings)).collect())
        }
        Formula::Or(items) => {
            Formula::Or(items.iter().map(|f| subst_formula(f, bindings)).collect())
        }
        Formula::Pred { name, args } => Formula::Pred {
            name: name.clone(),
            args: args.iter().map(|a| subst_expr(a, bindings)).collect(),
        },
    }
}

// =============================================================================
// Simplification
// =============================================================================

fn simplify_formula(formula: &Formula) -> Option<bool> {
    match formula {
        Formula::Rel { lhs, op, rhs } => {
            let l = fold(lhs)?;
            let r = fold(rhs)?;
            match op {
                // Numeric equality compares values, not spellings:
                // Number(4) equals Float(4.0).
                RelOp::Eq => Some(l == r),
                RelOp::Neq => Some(l != r),
                RelOp::Lt => l.numeric_cmp(&r).map(|o| o == Ordering::Less),
                RelOp::Gt => l.numeric_cmp(&r).map(|o| o == Ordering::Greater),
                RelOp::Leq => l.numeric_cmp(&r).map(|o| o != Ordering::Greater),
                RelOp::Geq => l.numeric_cmp(&r).map(|o| o != Ordering::Less),
            }
        }
        Formula::Not(inner) => simplify_formula(inner).map(|b| !b),
        Formula::And(items) => {
            let mut undetermined = false;
            for item in items {
                match simplify_formula(item) {
                    Some(false) => return Some(false),
                    None => undetermined = true,
                    Some(true) => {}
                }
            }
            if undetermined {
                None
            } else {
                Some(true)
            }
        }
        Formula::Or(items) => {
            let mut undetermined = false;
            for item in items {
                match simplify_formula(item) {
                    Some(true) => return Some(true),
                    None => undetermined = true,
                    Some(false) => {}
                }
            }
            if undetermined {
                None
            } else {
                Some(false)
            }
        }
        Formula::Pred { .. } => None,
    }
}

// =============================================================================
// Constant folding
// =============================================================================

/// Fold an expression to a concrete value.
///
/// # Returns
/// - `Some(value)` if the expression is fully concrete and defined
/// - `None` for symbols, uninterpreted functions, undefined arithmetic
///   (division by zero, `0^0`), or non-numeric operands
fn fold(expr: &Expr) -> Option<Value> {
    match expr {
        Expr::Lit(v) => Some(v.clone()),
        Expr::Sym(_) | Expr::Func(_, _) => None,
        Expr::Neg(e) => match fold(e)? {
            Value::Number(n) => Some(Value::Number(-n)),
            Value::Float(f) => Some(Value::Float(-f)),
            _ => None,
        },
        Expr::Add(l, r) => num_binop(fold(l)?, fold(r)?, |a, b| Some(a + b), |a, b| a + b),
        Expr::Sub(l, r) => num_binop(fold(l)?, fold(r)?, |a, b| Some(a - b), |a, b| a - b),
        Expr::Mul(l, r) => num_binop(fold(l)?, fold(r)?, |a, b| Some(a * b), |a, b| a * b),
        Expr::Div(l, r) => num_binop(
            fold(l)?,
            fold(r)?,
            |a, b| if b.is_zero() { None } else { Some(a / b) },
            |a, b| a / b,
        ),
        Expr::Pow(b, e) => fold_pow(fold(b)?, fold(e)?),
    }
}

/// Apply a binary numeric operation: f64 when both sides are floats,
/// exact rationals otherwise. Non-numeric operands do not fold.
fn num_binop(
    l: Value,
    r: Value,
    rational_op: impl FnOnce(BigRational, BigRational) -> Option<BigRational>,
    float_op: impl FnOnce(f64, f64) -> f64,
) -> Option<Value> {
    match (&l, &r) {
        (Value::Float(a), Value::Float(b)) => Some(Value::Float(float_op(*a, *b))),
        _ => {
            let a = l.as_rational()?;
            let b = r.as_rational()?;
            rational_op(a, b).map(Value::Number)
        }
    }
}

/// Fold `base^exp` for literal operands. The exponent must be an exact
/// integer with absolute value at most [`MAX_ABS_POW`].
///
/// # Edge Cases
/// - `0^0` → undetermined
/// - `0^(-n)` → undetermined (division by zero)
/// - `a^0` → 1 (when a ≠ 0)
fn fold_pow(base: Value, exp: Value) -> Option<Value> {
    let base_q = base.as_rational()?;
    let exp_q = exp.as_rational()?;
    if !exp_q.is_integer() {
        return None;
    }
    let exp_i = exp_q.to_integer().to_i64()?;

    // Prevent absurd materialization
    if exp_i.unsigned_abs() > MAX_ABS_POW as u64 {
        return None;
    }

    if exp_i == 0 {
        if base_q.is_zero() {
            return None;
        }
        return Some(Value::Number(BigRational::one()));
    }

    if base_q.is_zero() && exp_i < 0 {
        return None;
    }

    let mut result = pow_rational_exact(&base_q, exp_i.unsigned_abs() as u32);
    if exp_i < 0 {
        // base ≠ 0 already guaranteed by earlier check
        result = BigRational::one() / result;
    }

    Some(Value::Number(result))
}

/// Compute base^exp for BigRational using square-and-multiply.
fn pow_rational_exact(base: &BigRational, exp: u32) -> BigRational {
    if exp == 0 {
        return BigRational::one();
    }
    if exp == 1 {
        return base.clone();
    }

    let mut result = BigRational::one();
    let mut b = base.clone();
    let mut e = exp;

    while e > 0 {
        if (e & 1) == 1 {
            result *= &b;
        }
        e >>= 1;
        if e > 0 {
            b = &b * &b;
        }
    }
    result
}
