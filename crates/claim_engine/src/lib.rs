//! Claim-falsification engine.
//!
//! A claim is a typed [`Truth`] that compiles to a falsification form:
//! the condition whose satisfaction disproves it. [`Evidence`] supplies
//! concrete bindings, and the [`Verifier`] renders one of three
//! verdicts: KILLED (disproved), SURVIVED (not disproved) or UNCERTAIN
//! (undecidable with the given evidence), together with a reasoning
//! trace.
//!
//! # Quick start
//!
//! ```
//! use claim_engine::{bindings, falsify, Analytic, Evidence, Verdict};
//!
//! let truth = Analytic::new("add(2, 2) equals 4", "result", 4).into();
//! let evidence = Evidence::from_bindings(bindings! { "result" => 4 });
//!
//! let result = falsify(&truth, &evidence);
//! assert_eq!(result.verdict, Verdict::Survived);
//! ```
//!
//! # Testing API
//!
//! ```
//! use claim_engine::{claim, Analytic, Verdict};
//!
//! let (mut scope, handle) = claim(Analytic::new("2 + 2 equals 4", "result", 4));
//! scope.bind("result", 2 + 2);
//! drop(scope);
//! assert_eq!(handle.verdict(), Some(Verdict::Survived));
//! ```

pub mod algebra;
pub mod error;
pub mod evidence;
pub mod extensions;
pub mod json;
pub mod symbolic;
pub mod testing;
pub mod truth;
pub mod verifier;


pub use algebra::{Algebra, SymbolBindings};
pub use error::{ClaimFailure, EngineError};
pub use evidence::{Bindings, Evidence, Verdict, VerdictResult};
pub use extensions::{DataGrounding, DomainTruth, HttpStatus, ModelAccuracy, StateInvariant};
pub use symbolic::Symbolic;
pub use testing::{claim, claim_with, verified, verified_with, ClaimHandle, ClaimScope, TestReturn};
pub use truth::{
    Analytic, Empirical, FalsificationForm, Lhs, Modal, ObservationPredicate, Probabilistic, Truth,
};
pub use verifier::{falsify, quick_check, EvalMode, Verifier};

// Re-exported so callers build formulas and values without naming the
// ast crate directly.
pub use claim_ast::{Expr, Formula, RelOp, SymbolId, Value};
