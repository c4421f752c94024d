//! End-to-end verification scenarios across all four truth variants
//! and both engine configurations.

use claim_engine::{
    bindings, falsify, quick_check, Analytic, Empirical, EngineError, EvalMode, Evidence, Expr,
    Formula, Modal, Probabilistic, RelOp, Truth, Value, Verdict, Verifier,
};

fn analytic_2_plus_2() -> Truth {
    Analytic::new("add(2, 2) equals 4", "result", 4).into()
}

#[test]
fn analytic_equality_survives() {
    let result = falsify(&analytic_2_plus_2(), &Evidence::from_bindings(bindings! { "result" => 4 }));
    assert_eq!(result.verdict, Verdict::Survived);
    assert_eq!(
        result.reasoning,
        "Falsification condition not met with given evidence"
    );
}

#[test]
fn analytic_inequality_kills() {
    let result = falsify(&analytic_2_plus_2(), &Evidence::from_bindings(bindings! { "result" => 5 }));
    assert_eq!(result.verdict, Verdict::Killed);
    assert!(result.reasoning.starts_with("Falsification condition met"));
    assert!(result.reasoning.contains("result ≠ 4"));
}

#[test]
fn analytic_unbound_is_uncertain_and_names_the_variable() {
    let result = falsify(&analytic_2_plus_2(), &Evidence::new());
    assert_eq!(result.verdict, Verdict::Uncertain);
    assert!(result.reasoning.contains("Missing evidence"));
    assert!(result.reasoning.contains("result"));
}

#[test]
fn analytic_float_evidence_against_integer_expectation() {
    // 4.0 is the same value as 4; spelling must not kill the claim
    let result = falsify(&analytic_2_plus_2(), &Evidence::from_bindings(bindings! { "result" => 4.0 }));
    assert_eq!(result.verdict, Verdict::Survived);
}

#[test]
fn analytic_text_mismatch_kills() {
    let truth: Truth = Analytic::new("status is ok", "status", "ok").into();
    let killed = falsify(&truth, &Evidence::from_bindings(bindings! { "status" => "error" }));
    assert_eq!(killed.verdict, Verdict::Killed);

    let survived = falsify(&truth, &Evidence::from_bindings(bindings! { "status" => "ok" }));
    assert_eq!(survived.verdict, Verdict::Survived);
}

#[test]
fn analytic_expression_lhs_goes_symbolic() {
    // lhs is a full expression, so the direct path does not apply and
    // the symbolic path folds the arithmetic.
    let sum = Expr::add(Expr::sym("a"), Expr::sym("b"));
    let truth: Truth = Analytic::new("a + b equals 4", sum, 4).into();

    let survived = falsify(&truth, &Evidence::from_bindings(bindings! { "a" => 1, "b" => 3 }));
    assert_eq!(survived.verdict, Verdict::Survived);

    let killed = falsify(&truth, &Evidence::from_bindings(bindings! { "a" => 1, "b" => 1 }));
    assert_eq!(killed.verdict, Verdict::Killed);

    let partial = falsify(&truth, &Evidence::from_bindings(bindings! { "a" => 1 }));
    assert_eq!(partial.verdict, Verdict::Uncertain);
    assert!(partial.reasoning.contains("b"));
}

#[test]
fn modal_invariant_violation_kills() {
    let invariant = Formula::rel(Expr::sym("state"), RelOp::Geq, Expr::num(0));
    let truth: Truth = Modal::new("state stays non-negative", invariant).into();

    let violated = falsify(&truth, &Evidence::from_bindings(bindings! { "state" => -1 }));
    assert_eq!(violated.verdict, Verdict::Killed);

    let holds = falsify(&truth, &Evidence::from_bindings(bindings! { "state" => 5 }));
    assert_eq!(holds.verdict, Verdict::Survived);
}

#[test]
fn modal_compound_invariant() {
    // 0 <= state and state <= 100
    let invariant = Formula::and_all(vec![
        Formula::rel(Expr::sym("state"), RelOp::Geq, Expr::num(0)),
        Formula::rel(Expr::sym("state"), RelOp::Leq, Expr::num(100)),
    ]);
    let truth: Truth = Modal::new("state within bounds", invariant).into();

    assert_eq!(
        falsify(&truth, &Evidence::from_bindings(bindings! { "state" => 42 })).verdict,
        Verdict::Survived
    );
    assert_eq!(
        falsify(&truth, &Evidence::from_bindings(bindings! { "state" => 101 })).verdict,
        Verdict::Killed
    );
}

#[test]
fn probabilistic_predicate_path() {
    let truth: Truth = Probabilistic::new("Model accuracy > 60%")
        .with_metric("accuracy")
        .with_threshold(0.6)
        .into();
    let verifier = Verifier::new();

    let good = verifier.verify_with_predicate(&truth, &Value::Float(0.75));
    assert_eq!(good.verdict, Verdict::Survived);

    let bad = verifier.verify_with_predicate(&truth, &Value::Float(0.55));
    assert_eq!(bad.verdict, Verdict::Killed);
    assert!(bad.reasoning.contains("violates predicate"));
}

#[test]
fn probabilistic_symbolic_path_agrees_with_predicate() {
    let truth: Truth = Probabilistic::new("Model accuracy > 60%")
        .with_metric("accuracy")
        .with_threshold(0.6)
        .into();

    // Through the full engine: ¬(accuracy > 0.6) with accuracy bound
    let good = falsify(&truth, &Evidence::from_bindings(bindings! { "accuracy" => 0.75 }));
    assert_eq!(good.verdict, Verdict::Survived);

    let bad = falsify(&truth, &Evidence::from_bindings(bindings! { "accuracy" => 0.55 }));
    assert_eq!(bad.verdict, Verdict::Killed);
}

#[test]
fn probabilistic_non_numeric_value_is_uncertain() {
    let truth: Truth = Probabilistic::new("accuracy > 0.6")
        .with_metric("accuracy")
        .with_threshold(0.6)
        .into();
    let result = Verifier::new().verify_with_predicate(&truth, &Value::text("high"));
    assert_eq!(result.verdict, Verdict::Uncertain);
    assert!(result.reasoning.contains("Predicate evaluation failed"));
}

#[test]
fn empirical_predicate_path() {
    let truth: Truth = Empirical::new("API endpoint returns 200")
        .with_observation_var("status_code")
        .with_predicate(|v| v == &Value::int(200))
        .into();
    let verifier = Verifier::new();

    assert_eq!(
        verifier.verify_with_predicate(&truth, &Value::int(200)).verdict,
        Verdict::Survived
    );
    assert_eq!(
        verifier.verify_with_predicate(&truth, &Value::int(500)).verdict,
        Verdict::Killed
    );
}

#[test]
fn empirical_predicate_error_becomes_uncertain() {
    let truth: Truth = Empirical::new("sensor reads in range")
        .with_fallible_predicate(|_| {
            Err(EngineError::Predicate("sensor offline".to_string()))
        })
        .into();

    let result = Verifier::new().verify_with_predicate(&truth, &Value::int(7));
    assert_eq!(result.verdict, Verdict::Uncertain);
    assert!(result.reasoning.contains("sensor offline"));
}

#[test]
fn empirical_through_engine_stays_uncertain() {
    // The symbolic form is an uninterpreted Contradicts predicate, so
    // the full engine cannot decide it even with the observation bound.
    let truth: Truth = Empirical::new("log contains no errors")
        .with_observation_var("line_count")
        .into();
    let result = falsify(&truth, &Evidence::from_bindings(bindings! { "line_count" => 12 }));
    assert_eq!(result.verdict, Verdict::Uncertain);
    assert!(result.reasoning.contains("Could not evaluate formula"));
    assert!(result.reasoning.contains("Contradicts"));
}

#[test]
fn analytic_predicate_path_is_uncertain() {
    let result = Verifier::new().verify_with_predicate(&analytic_2_plus_2(), &Value::int(4));
    assert_eq!(result.verdict, Verdict::Uncertain);
    assert!(result.reasoning.contains("no predicate"));
}

#[test]
fn symbolic_only_mode_matches_direct_first() {
    let scenarios: Vec<(Truth, claim_engine::Bindings, Verdict)> = vec![
        (analytic_2_plus_2(), bindings! { "result" => 4 }, Verdict::Survived),
        (analytic_2_plus_2(), bindings! { "result" => 5 }, Verdict::Killed),
        (
            Modal::new(
                "state stays non-negative",
                Formula::rel(Expr::sym("state"), RelOp::Geq, Expr::num(0)),
            )
            .into(),
            bindings! { "state" => -1 },
            Verdict::Killed,
        ),
    ];

    for (truth, evidence_bindings, expected) in scenarios {
        let evidence = Evidence::from_bindings(evidence_bindings);
        let direct = Verifier::new().verify(&truth, &evidence);
        let symbolic = Verifier::new()
            .with_mode(EvalMode::SymbolicOnly)
            .verify(&truth, &evidence);
        assert_eq!(direct.verdict, expected);
        assert_eq!(symbolic.verdict, expected);
    }
}

#[test]
fn verification_is_deterministic() {
    let truth = analytic_2_plus_2();
    let evidence = Evidence::from_bindings(bindings! { "result" => 5 });

    let first = falsify(&truth, &evidence);
    let second = falsify(&truth, &evidence);
    assert_eq!(first.verdict, second.verdict);
    assert_eq!(first.reasoning, second.reasoning);
    assert_eq!(
        first.form.as_ref().map(|f| &f.description),
        second.form.as_ref().map(|f| &f.description)
    );
    assert_eq!(first.trace, second.trace);
}

#[test]
fn trace_records_every_step() {
    let result = falsify(&analytic_2_plus_2(), &Evidence::from_bindings(bindings! { "result" => 4 }));
    let trace = result.trace.join("\n");
    assert!(trace.contains("Constructing falsification form for: add(2, 2) equals 4"));
    assert!(trace.contains("Falsification form: Find x where result ≠ 4"));
    assert!(trace.contains("Evidence bindings: {result: 4}"));
}

#[test]
fn quick_check_returns_bare_verdict() {
    assert_eq!(
        quick_check(&analytic_2_plus_2(), bindings! { "result" => 4 }),
        Verdict::Survived
    );
    assert_eq!(quick_check(&analytic_2_plus_2(), bindings! {}), Verdict::Uncertain);
}

#[test]
fn mutations_are_carried_through() {
    let mut result = falsify(&analytic_2_plus_2(), &Evidence::from_bindings(bindings! { "result" => 5 }));
    result.add_mutation("add(2, 2) equals 4 in saturating arithmetic capped at 3");
    assert_eq!(result.mutations.len(), 1);
}
