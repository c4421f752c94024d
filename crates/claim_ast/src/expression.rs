use crate::symbol::{self, SymbolId};
use crate::value::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

/// An arithmetic expression over literals and interned symbols.
///
/// Formulas relate expressions; expressions themselves carry no truth
/// value. `Func` represents uninterpreted functions (quantifier markers,
/// named relations over a single argument) that never fold to a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Lit(Value),
    Sym(SymbolId),
    Add(Rc<Expr>, Rc<Expr>),
    Sub(Rc<Expr>, Rc<Expr>),
    Mul(Rc<Expr>, Rc<Expr>),
    Div(Rc<Expr>, Rc<Expr>),
    Pow(Rc<Expr>, Rc<Expr>),
    Neg(Rc<Expr>),
    Func(String, Vec<Rc<Expr>>),
}

impl Expr {
    // Helper constructors for cleaner code
    pub fn lit(v: impl Into<Value>) -> Rc<Self> {
        Rc::new(Expr::Lit(v.into()))
    }

    pub fn num(n: i64) -> Rc<Self> {
        Rc::new(Expr::Lit(Value::int(n)))
    }

    pub fn float(f: f64) -> Rc<Self> {
        Rc::new(Expr::Lit(Value::Float(f)))
    }

    /// Symbol by name, interned in the process-wide table.
    pub fn sym(name: &str) -> Rc<Self> {
        Rc::new(Expr::Sym(symbol::intern(name)))
    }

    pub fn add(lhs: Rc<Expr>, rhs: Rc<Expr>) -> Rc<Self> {
        Rc::new(Expr::Add(lhs, rhs))
    }

    pub fn sub(lhs: Rc<Expr>, rhs: Rc<Expr>) -> Rc<Self> {
        Rc::new(Expr::Sub(lhs, rhs))
    }

    pub fn mul(lhs: Rc<Expr>, rhs: Rc<Expr>) -> Rc<Self> {
        Rc::new(Expr::Mul(lhs, rhs))
    }

    pub fn div(lhs: Rc<Expr>, rhs: Rc<Expr>) -> Rc<Self> {
        Rc::new(Expr::Div(lhs, rhs))
    }

    pub fn pow(base: Rc<Expr>, exp: Rc<Expr>) -> Rc<Self> {
        Rc::new(Expr::Pow(base, exp))
    }

    pub fn neg(expr: Rc<Expr>) -> Rc<Self> {
        Rc::new(Expr::Neg(expr))
    }

    pub fn func(name: &str, args: Vec<Rc<Expr>>) -> Rc<Self> {
        Rc::new(Expr::Func(name.to_string(), args))
    }

    /// Collect the interned symbols appearing in this expression.
    pub fn collect_symbols(&self, out: &mut BTreeSet<SymbolId>) {
        match self {
            Expr::Lit(_) => {}
            Expr::Sym(id) => {
                out.insert(*id);
            }
            Expr::Add(l, r)
            | Expr::Sub(l, r)
            | Expr::Mul(l, r)
            | Expr::Div(l, r)
            | Expr::Pow(l, r) => {
                l.collect_symbols(out);
                r.collect_symbols(out);
            }
            Expr::Neg(e) => e.collect_symbols(out),
            Expr::Func(_, args) => {
                for a in args {
                    a.collect_symbols(out);
                }
            }
        }
    }

    /// True when the expression contains no symbols and no
    /// uninterpreted functions, i.e. it denotes a concrete value.
    pub fn is_concrete(&self) -> bool {
        match self {
            Expr::Lit(_) => true,
            Expr::Sym(_) | Expr::Func(_, _) => false,
            Expr::Add(l, r)
            | Expr::Sub(l, r)
            | Expr::Mul(l, r)
            | Expr::Div(l, r)
            | Expr::Pow(l, r) => l.is_concrete() && r.is_concrete(),
            Expr::Neg(e) => e.is_concrete(),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(_, _) | Expr::Sub(_, _) => 1,
            Expr::Mul(_, _) | Expr::Div(_, _) => 2,
            Expr::Pow(_, _) => 3,
            Expr::Neg(_) => 4,
            Expr::Func(_, _) | Expr::Lit(_) | Expr::Sym(_) => 5,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Lit(v) => write!(f, "{}", v),
            Expr::Sym(id) => write!(f, "{}", symbol::resolve(*id)),
            Expr::Add(l, r) => {
                let my_prec = self.precedence();
                if l.precedence() < my_prec {
                    write!(f, "({})", l)?
                } else {
                    write!(f, "{}", l)?
                }
                write!(f, " + ")?;
                if r.precedence() < my_prec {
                    write!(f, "({})", r)
                } else {
                    write!(f, "{}", r)
                }
            }
            Expr::Sub(l, r) => {
                let my_prec = self.precedence();
                if l.precedence() < my_prec {
                    write!(f, "({})", l)?
                } else {
                    write!(f, "{}", l)?
                }
                write!(f, " - ")?;
                // Subtraction is left-associative: a - (b - c) needs parens.
                if r.precedence() <= my_prec {
                    write!(f, "({})", r)
                } else {
                    write!(f, "{}", r)
                }
            }
            Expr::Mul(l, r) => {
                let my_prec = self.precedence();
                if l.precedence() < my_prec {
                    write!(f, "({})", l)?
                } else {
                    write!(f, "{}", l)?
                }
                write!(f, " * ")?;
                if r.precedence() < my_prec {
                    write!(f, "({})", r)
                } else {
                    write!(f, "{}", r)
                }
            }
            Expr::Div(l, r) => {
                let my_prec = self.precedence();
                if l.precedence() < my_prec {
                    write!(f, "({})", l)?
                } else {
                    write!(f, "{}", l)?
                }
                write!(f, " / ")?;
                if r.precedence() <= my_prec {
                    write!(f, "({})", r)
                } else {
                    write!(f, "{}", r)
                }
            }
            Expr::Pow(b, e) => {
                let my_prec = self.precedence();
                if b.precedence() < my_prec {
                    write!(f, "({})", b)?
                } else {
                    write!(f, "{}", b)?
                }
                if e.precedence() < my_prec {
                    write!(f, "^({})", e)
                } else {
                    write!(f, "^{}", e)
                }
            }
            Expr::Neg(e) => {
                write!(f, "-")?;
                if e.precedence() < self.precedence() {
                    write!(f, "({})", e)
                } else {
                    write!(f, "{}", e)
                }
            }
            Expr::Func(name, args) => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = Expr::add(Expr::num(1), Expr::mul(Expr::sym("x"), Expr::num(2)));
        assert_eq!(format!("{}", e), "1 + x * 2");
    }

    #[test]
    fn test_complex_display() {
        let e = Expr::pow(Expr::add(Expr::sym("a"), Expr::sym("b")), Expr::num(2));
        assert_eq!(format!("{}", e), "(a + b)^2");
    }

    #[test]
    fn test_func_display() {
        let e = Expr::func("Contradicts", vec![Expr::sym("observation")]);
        assert_eq!(format!("{}", e), "Contradicts(observation)");
    }

    #[test]
    fn test_collect_symbols() {
        let e = Expr::sub(Expr::sym("x"), Expr::mul(Expr::sym("y"), Expr::num(3)));
        let mut syms = BTreeSet::new();
        e.collect_symbols(&mut syms);
        assert_eq!(syms.len(), 2);
        assert!(!e.is_concrete());
        assert!(Expr::num(3).is_concrete());
    }
}
