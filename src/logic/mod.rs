#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! Propositional formula front-end.
//!
//! Parses infix formulas over `~ & | -> <->` with identifiers `[A-Za-z_]+`
//! and encodes them into equisatisfiable CNF via the Tseitin transformation:
//! every subformula receives a DIMACS variable (its index in the subformula
//! store), every non-leaf subformula contributes the clauses of
//! `r <-> op(p, q)`, and a final unit clause asserts the root.
//!
//! Identifiers are hash-consed, so each name maps to one variable no matter
//! how often it occurs; compound subformulas are enumerated in the order the
//! parser finishes them.

pub mod parser;

use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use rustc_hash::FxHashMap;

/// A binary connective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
    Imp,
    Iff,
}

/// One subformula in the store. Children are indices of earlier entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Subformula {
    /// A named atom.
    Atom,
    /// Negation of a subformula.
    Not(usize),
    /// A binary connective over two subformulas.
    Binary(Connective, usize, usize),
}

/// A parsed formula: the subformula store, the root index, and the mapping
/// from identifier to atom variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    pub(crate) subs: Vec<Subformula>,
    root: usize,
    atoms: FxHashMap<String, usize>,
}

impl Formula {
    /// Parses an infix formula.
    ///
    /// # Errors
    ///
    /// Returns a message for unknown tokens, syntax errors, or a chained
    /// `<->` (it does not associate).
    pub fn parse(input: &str) -> Result<Self, String> {
        parser::parse(input)
    }

    /// The number of DIMACS variables the encoding uses: one per
    /// subformula.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.subs.len() - 1
    }

    /// The DIMACS variable of a named atom, if it occurs in the formula.
    #[must_use]
    pub fn var_of(&self, name: &str) -> Option<usize> {
        self.atoms.get(name).copied()
    }

    /// Encodes the formula into CNF. The result is satisfiable exactly when
    /// the formula is, and any model restricted to the atom variables
    /// satisfies the formula.
    #[must_use]
    pub fn to_cnf<L: Literal>(&self) -> Cnf<L> {
        let mut clauses: Vec<Vec<i32>> = Vec::new();

        #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
        for (i, sub) in self.subs.iter().enumerate().skip(1) {
            let r = i as i32;
            match *sub {
                Subformula::Atom => {}
                Subformula::Not(p) => {
                    let p = p as i32;
                    clauses.push(vec![r, p]);
                    clauses.push(vec![-r, -p]);
                }
                Subformula::Binary(op, p, q) => {
                    let (p, q) = (p as i32, q as i32);
                    match op {
                        Connective::And => {
                            clauses.push(vec![-r, p]);
                            clauses.push(vec![-r, q]);
                            clauses.push(vec![r, -p, -q]);
                        }
                        Connective::Or => {
                            clauses.push(vec![r, -p]);
                            clauses.push(vec![r, -q]);
                            clauses.push(vec![-r, p, q]);
                        }
                        Connective::Imp => {
                            clauses.push(vec![r, p]);
                            clauses.push(vec![r, -q]);
                            clauses.push(vec![-r, -p, q]);
                        }
                        Connective::Iff => {
                            clauses.push(vec![-r, p, -q]);
                            clauses.push(vec![-r, -p, q]);
                            clauses.push(vec![r, -p, -q]);
                            clauses.push(vec![r, p, q]);
                        }
                    }
                }
            }
        }

        #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
        clauses.push(vec![self.root as i32]);

        let mut cnf = Cnf::new(clauses);
        cnf.num_vars = cnf.num_vars.max(self.num_vars());
        cnf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::cnf::Cnf;
    use crate::sat::solver::Solver;

    /// Encodes the formula with extra unit constraints pinning atoms, then
    /// decides it.
    fn satisfiable_under(formula: &Formula, pinned: &[(&str, bool)]) -> bool {
        let mut cnf: Cnf = formula.to_cnf();
        for &(name, value) in pinned {
            #[allow(clippy::cast_possible_wrap)]
            let var = formula.var_of(name).expect("unknown atom") as i32;
            cnf.add_clause(vec![if value { var } else { -var }].into());
        }
        Solver::new(cnf).solve().is_some()
    }

    #[test]
    fn test_contradiction_unsat() {
        let formula = Formula::parse("A & ~A").unwrap();
        let cnf: Cnf = formula.to_cnf();
        assert_eq!(Solver::new(cnf).solve(), None);
    }

    #[test]
    fn test_excluded_middle_sat() {
        let formula = Formula::parse("A | ~A").unwrap();
        let cnf: Cnf = formula.to_cnf();
        let solution = Solver::new(cnf.clone()).solve().unwrap();
        assert!(cnf.verify(&solution));
    }

    #[test]
    fn test_de_morgan_tautology_holds_everywhere() {
        let formula = Formula::parse("~(A & B) <-> (~A | ~B)").unwrap();
        for a in [false, true] {
            for b in [false, true] {
                assert!(
                    satisfiable_under(&formula, &[("A", a), ("B", b)]),
                    "tautology fails under A={a}, B={b}"
                );
            }
        }
    }

    #[test]
    fn test_implication_is_right_associative() {
        let chained = Formula::parse("A -> B -> C").unwrap();
        let flat = Formula::parse("~A | ~B | C").unwrap();

        for a in [false, true] {
            for b in [false, true] {
                for c in [false, true] {
                    let pinned = [("A", a), ("B", b), ("C", c)];
                    assert_eq!(
                        satisfiable_under(&chained, &pinned),
                        satisfiable_under(&flat, &pinned),
                        "disagreement under A={a}, B={b}, C={c}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_conjunction_binds_tighter_than_disjunction() {
        // A | B & C parses as A | (B & C): false when A is false and only
        // one of B, C holds
        let formula = Formula::parse("A | B & C").unwrap();
        assert!(!satisfiable_under(
            &formula,
            &[("A", false), ("B", true), ("C", false)]
        ));
        assert!(satisfiable_under(
            &formula,
            &[("A", false), ("B", true), ("C", true)]
        ));
    }

    #[test]
    fn test_negation_binds_tightest() {
        // ~A & B is (~A) & B
        let formula = Formula::parse("~A & B").unwrap();
        assert!(satisfiable_under(&formula, &[("A", false), ("B", true)]));
        assert!(!satisfiable_under(&formula, &[("A", true), ("B", true)]));
    }

    #[test]
    fn test_biconditional_does_not_chain() {
        assert!(Formula::parse("A <-> B <-> C").is_err());
        assert!(Formula::parse("(A <-> B) <-> C").is_ok());
    }

    #[test]
    fn test_atoms_are_shared() {
        let formula = Formula::parse("A & (A | A)").unwrap();
        // one atom plus two connectives
        assert_eq!(formula.num_vars(), 3);
        assert_eq!(formula.var_of("A"), Some(1));
        assert_eq!(formula.var_of("B"), None);
    }

    #[test]
    fn test_model_restricted_to_atoms_satisfies_formula() {
        let formula = Formula::parse("(A -> B) & A").unwrap();
        let cnf: Cnf = formula.to_cnf();
        let solution = Solver::new(cnf).solve().unwrap();
        // A and B must both hold in any model
        #[allow(clippy::cast_possible_wrap)]
        for name in ["A", "B"] {
            let var = formula.var_of(name).unwrap() as i32;
            assert!(solution.contains(var), "{name} should be assigned true");
        }
    }
}
