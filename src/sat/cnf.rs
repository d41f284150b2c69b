#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! Defines the Conjunctive Normal Form (CNF) representation for SAT formulas.
//!
//! A CNF formula is a conjunction of clauses, each a disjunction of literals.
//! This is the input format of the solver and the output format of the
//! front-ends.
//!
//! Construction collapses duplicate literals within a clause and drops
//! tautological clauses; empty clauses are kept, as they make the formula
//! unsatisfiable.

use crate::sat::clause::Clause;
use crate::sat::literal::{Literal, PackedLiteral};
use crate::sat::solver::Solutions;
use std::fmt::Display;

/// Represents a boolean formula in Conjunctive Normal Form.
///
/// # Type Parameters
///
/// * `L`: The type of `Literal` used in the clauses. Defaults to
///   `PackedLiteral`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf<L: Literal = PackedLiteral> {
    /// The clauses that make up the formula.
    pub clauses: Vec<Clause<L>>,
    /// The variable universe: variables are numbered `1..=num_vars`.
    pub num_vars: usize,
}

impl<L: Literal> Cnf<L> {
    /// Creates a formula from clauses of DIMACS literals.
    ///
    /// Duplicate literals within a clause are collapsed and tautological
    /// clauses dropped. `num_vars` is the largest variable mentioned; the
    /// DIMACS reader widens it to the declared header value.
    pub fn new<J: IntoIterator<Item = i32>, I: IntoIterator<Item = J>>(clauses: I) -> Self {
        let mut cnf = Self::default();
        for clause in clauses {
            cnf.add_clause(clause.into_iter().collect::<Vec<i32>>().into());
        }
        cnf
    }

    /// Adds a clause, widening the variable universe as needed. Tautologies
    /// are dropped.
    pub fn add_clause(&mut self, clause: Clause<L>) {
        if clause.is_tautology() {
            return;
        }
        let max_var = clause
            .iter()
            .map(|l| l.variable() as usize)
            .max()
            .unwrap_or(0);
        self.num_vars = self.num_vars.max(max_var);
        self.clauses.push(clause);
    }

    /// Returns an iterator over the clauses.
    pub fn iter(&self) -> impl Iterator<Item = &Clause<L>> {
        self.clauses.iter()
    }

    /// Returns the number of clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Returns `true` if the formula has no clauses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Verifies that a model satisfies every clause of the formula.
    ///
    /// A clause is satisfied when at least one of its literals is assigned
    /// true by the model; literals of unassigned variables do not satisfy a
    /// clause.
    #[must_use]
    pub fn verify(&self, solutions: &Solutions) -> bool {
        self.iter()
            .all(|clause| clause.iter().any(|&lit| solutions.contains(lit.to_dimacs())))
    }
}

impl<L: Literal> Display for Cnf<L> {
    /// Formats the formula in DIMACS CNF format: a `p cnf` header followed by
    /// one `0`-terminated clause per line.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_vars, self.clauses.len())?;
        for clause in &self.clauses {
            for &lit in clause.iter() {
                write!(f, "{} ", lit.to_dimacs())?;
            }
            writeln!(f, "0")?;
        }
        Ok(())
    }
}

impl<L: Literal> From<Vec<Vec<i32>>> for Cnf<L> {
    fn from(clauses: Vec<Vec<i32>>) -> Self {
        Self::new(clauses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::literal::PackedLiteral;

    #[test]
    fn test_new_from_dimacs() {
        let cnf: Cnf<PackedLiteral> = Cnf::new(vec![vec![1, -2], vec![-1, 2, 3]]);
        assert_eq!(cnf.len(), 2);
        assert_eq!(cnf.num_vars, 3);
        assert_eq!(cnf.clauses[0].len(), 2);
    }

    #[test]
    fn test_tautologies_dropped() {
        let cnf: Cnf<PackedLiteral> = Cnf::new(vec![vec![1, -1], vec![2, 3]]);
        assert_eq!(cnf.len(), 1);
    }

    #[test]
    fn test_empty_clause_kept() {
        let cnf: Cnf<PackedLiteral> = Cnf::new(vec![Vec::new(), vec![1]]);
        assert_eq!(cnf.len(), 2);
        assert!(cnf.clauses[0].is_empty());
    }

    #[test]
    fn test_display_dimacs() {
        let cnf: Cnf<PackedLiteral> = Cnf::new(vec![vec![1, -2], vec![2, 3]]);
        let dimacs = format!("{cnf}");
        assert!(dimacs.contains("p cnf 3 2"));
        assert!(dimacs.contains("1 -2 0"));
        assert!(dimacs.contains("2 3 0"));
    }

    #[test]
    fn test_verify() {
        let cnf: Cnf<PackedLiteral> = Cnf::new(vec![vec![1, -2], vec![-1, 2, 3]]);

        let good = Solutions::new(&[1, -2, 3]);
        assert!(cnf.verify(&good));

        let bad = Solutions::new(&[-1, 2, -3]);
        assert!(!cnf.verify(&bad));
    }

    #[test]
    fn test_verify_fails_on_empty_clause() {
        let cnf: Cnf<PackedLiteral> = Cnf::new(vec![Vec::new()]);
        assert!(!cnf.verify(&Solutions::new(&[1])));
    }
}
