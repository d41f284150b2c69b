#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! Contains details of a clause, a fundamental component in SAT solvers.
//!
//! A clause is a disjunction of literals (e.g. `x1 OR !x2 OR x3`). This
//! module defines the `Clause` struct, which stores literals and the metadata
//! the solver needs: an eviction score for learnt clauses, a learnt flag, and
//! a lock flag set while the clause is the reason for a current assignment.
//!
//! The first two literals of a clause are its watched literals; their
//! positions matter to the propagator, the rest are unordered.

use crate::sat::literal::{Literal, PackedLiteral};
use itertools::Itertools;
use ordered_float::OrderedFloat;
use rand::random;
use smallvec::SmallVec;
use std::ops::{Index, IndexMut};

/// Learnt clauses shorter than this score by their length; longer clauses all
/// score just above it, with a random fraction as a tiebreak. Lower scores
/// are kept longer during database reduction.
pub const SCORE_BOUND: usize = 12;

/// Represents a clause in a SAT formula.
///
/// # Type Parameters
///
/// * `L`: The type of literal stored in the clause. Defaults to
///   `PackedLiteral`. Must implement the `Literal` trait.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Clause<L: Literal = PackedLiteral> {
    /// The literals forming the clause. The first two are the watched
    /// literals.
    pub literals: SmallVec<[L; 8]>,
    /// Eviction score. Lower is more valuable.
    pub score: OrderedFloat<f64>,
    /// Whether the clause was learnt during conflict analysis.
    pub learnt: bool,
    /// Whether the clause is the reason for a currently assigned variable.
    /// Locked clauses must not be evicted.
    pub locked: bool,
}

impl<L: Literal> FromIterator<L> for Clause<L> {
    /// Collects literals into a clause, dropping duplicates.
    fn from_iter<I: IntoIterator<Item = L>>(iter: I) -> Self {
        Self {
            literals: iter.into_iter().unique().collect(),
            score: OrderedFloat(0.0),
            learnt: false,
            locked: false,
        }
    }
}

impl<L: Literal> Clause<L> {
    /// Creates a new clause from a slice of literals.
    ///
    /// Duplicate literals are collapsed. The clause is not marked learnt and
    /// carries no score; use [`Clause::learnt`] for learnt clauses.
    #[must_use]
    pub fn new(literals: &[L]) -> Self {
        literals.iter().copied().collect()
    }

    /// Creates a learnt clause and assigns its eviction score: the length for
    /// short clauses, `SCORE_BOUND` plus a uniform tiebreak in `[0, 1)` for
    /// everything else.
    #[must_use]
    pub fn learnt(literals: SmallVec<[L; 8]>) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let score = if literals.len() < SCORE_BOUND {
            literals.len() as f64
        } else {
            SCORE_BOUND as f64 + random::<f64>()
        };

        Self {
            literals,
            score: OrderedFloat(score),
            learnt: true,
            locked: false,
        }
    }

    /// Checks if the clause is a tautology, i.e. contains both a literal and
    /// its negation. Tautologies are dropped when a formula is loaded.
    #[must_use]
    pub fn is_tautology(&self) -> bool {
        self.literals
            .iter()
            .any(|&lit| self.literals.contains(&lit.negated()))
    }

    /// Returns the number of literals in the clause.
    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// Checks if the clause has no literals. An empty clause is a
    /// contradiction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Checks if the clause has exactly one literal.
    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.len() == 1
    }

    /// Returns an iterator over the literals in the clause.
    pub fn iter(&self) -> impl Iterator<Item = &L> {
        self.literals.iter()
    }

    /// Swaps two literals by index. Used by the propagator to maintain the
    /// watched positions.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` are out of bounds.
    pub fn swap(&mut self, i: usize, j: usize) {
        self.literals.swap(i, j);
    }

    /// Returns the raw eviction score.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score.0
    }
}

impl<L: Literal> Index<usize> for Clause<L> {
    type Output = L;

    fn index(&self, index: usize) -> &Self::Output {
        &self.literals[index]
    }
}

impl<L: Literal> IndexMut<usize> for Clause<L> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.literals[index]
    }
}

impl<L: Literal> From<&[i32]> for Clause<L> {
    /// Creates a clause from DIMACS literals. Duplicates are collapsed.
    fn from(literals: &[i32]) -> Self {
        literals.iter().map(|&l| L::from_dimacs(l)).collect()
    }
}

impl<L: Literal> From<Vec<i32>> for Clause<L> {
    fn from(literals: Vec<i32>) -> Self {
        Self::from(literals.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::literal::PackedLiteral;

    #[test]
    fn test_duplicates_collapsed() {
        let clause: Clause = Clause::from(vec![1, 1, 2, 2, 2]);
        assert_eq!(clause.len(), 2);
    }

    #[test]
    fn test_is_tautology() {
        let tautology: Clause = Clause::from(vec![1, -1]);
        assert!(tautology.is_tautology());

        let ordinary: Clause = Clause::from(vec![1, 2]);
        assert!(!ordinary.is_tautology());
    }

    #[test]
    fn test_unit_and_empty() {
        let unit: Clause = Clause::from(vec![3]);
        assert!(unit.is_unit());
        assert!(!unit.is_empty());

        let empty: Clause = Clause::default();
        assert!(empty.is_empty());
        assert!(!empty.is_unit());
    }

    #[test]
    fn test_swap() {
        let mut clause: Clause = Clause::from(vec![1, 2, 3]);
        let first = clause[0];
        let last = clause[2];
        clause.swap(0, 2);
        assert_eq!(clause[0], last);
        assert_eq!(clause[2], first);
    }

    #[test]
    fn test_short_learnt_scores_by_length() {
        let lits: smallvec::SmallVec<[PackedLiteral; 8]> =
            [1, -2, 3].iter().map(|&l| Literal::from_dimacs(l)).collect();
        let clause = Clause::learnt(lits);
        assert!(clause.learnt);
        assert!((clause.score() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_long_learnt_scores_above_bound() {
        let lits: smallvec::SmallVec<[PackedLiteral; 8]> = (1..=SCORE_BOUND as i32 + 2)
            .map(Literal::from_dimacs)
            .collect();
        let clause = Clause::learnt(lits);
        #[allow(clippy::cast_precision_loss)]
        let bound = SCORE_BOUND as f64;
        assert!(clause.score() >= bound);
        assert!(clause.score() < bound + 1.0);
    }
}
