//! The evaluator seam between verdict logic and the symbolic backend.
//!
//! The engine never manipulates formulas itself: interning,
//! substitution, simplification and rendering all go through this trait
//! so verdict semantics are isolated from backend representational
//! quirks. Construction methods are provided and build plain [`Formula`]
//! data; a backend may override them to normalize or fold eagerly (some
//! algebra systems auto-simplify trivial numeric relations at
//! construction time).

use claim_ast::symbol::SymbolId;
use claim_ast::{Expr, Formula, RelOp, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

/// Bindings from interned symbols to concrete values, as consumed by
/// [`Algebra::substitute`].
pub type SymbolBindings = BTreeMap<SymbolId, Value>;

pub trait Algebra {
    /// Intern a variable name. Same name, same id.
    fn sym(&self, name: &str) -> SymbolId;

    /// Resolve an interned id back to its name.
    fn name_of(&self, id: SymbolId) -> String;

    /// Id for a name if already interned, without interning it.
    fn lookup(&self, name: &str) -> Option<SymbolId>;

    // -------------------------------------------------------------------------
    // Formula construction
    // -------------------------------------------------------------------------

    fn equals(&self, lhs: Rc<Expr>, rhs: Rc<Expr>) -> Formula {
        Formula::equals(lhs, rhs)
    }

    fn not_equals(&self, lhs: Rc<Expr>, rhs: Rc<Expr>) -> Formula {
        Formula::not_equals(lhs, rhs)
    }

    fn relation(&self, lhs: Rc<Expr>, op: RelOp, rhs: Rc<Expr>) -> Formula {
        Formula::rel(lhs, op, rhs)
    }

    fn negate(&self, inner: Formula) -> Formula {
        Formula::not(inner)
    }

    fn and_all(&self, items: Vec<Formula>) -> Formula {
        Formula::and_all(items)
    }

    fn or_all(&self, items: Vec<Formula>) -> Formula {
        Formula::or_all(items)
    }

    // -------------------------------------------------------------------------
    // Evaluation
    // -------------------------------------------------------------------------

    /// Replace bound symbols with their concrete values.
    fn substitute(&self, formula: &Formula, bindings: &SymbolBindings) -> Formula;

    /// Reduce a formula to a boolean if possible.
    ///
    /// # Returns
    /// - `Some(true)` / `Some(false)` when the formula is decidable
    /// - `None` when it cannot be determined (unbound symbols,
    ///   uninterpreted predicates, undefined arithmetic)
    fn simplify(&self, formula: &Formula) -> Option<bool>;

    // -------------------------------------------------------------------------
    // Introspection & rendering
    // -------------------------------------------------------------------------

    fn free_symbols(&self, formula: &Formula) -> BTreeSet<SymbolId> {
        formula.free_symbols()
    }

    /// Whether an expression denotes a concrete number (no symbols, no
    /// uninterpreted functions).
    fn is_concrete(&self, expr: &Expr) -> bool {
        expr.is_concrete()
    }

    fn render(&self, formula: &Formula) -> String {
        formula.to_string()
    }

    fn render_expr(&self, expr: &Expr) -> String {
        expr.to_string()
    }
}
